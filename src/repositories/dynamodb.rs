use aws_sdk_dynamodb::error::BuildError;
use aws_sdk_dynamodb::operation::RequestId;
use aws_sdk_dynamodb::types::{AttributeValue, DeleteRequest, PutRequest, WriteRequest};
use aws_sdk_dynamodb::{Client as DynamoDbClient, Error as DynamoDbError};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn, Instrument};

use crate::models::{RepositoryError, RepositoryResult};
use crate::observability::Metrics;

/// Raw DynamoDB item
pub type Item = HashMap<String, AttributeValue>;

/// Maximum number of requests DynamoDB accepts in one BatchWriteItem call
pub const BATCH_WRITE_LIMIT: usize = 25;

/// Attempts made at a batch before unprocessed items are reported as a failure
pub const MAX_BATCH_ATTEMPTS: usize = 3;

/// Filter applied to a table scan
#[derive(Debug, Clone, Default)]
pub struct ScanFilter {
    pub expression: String,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, AttributeValue>,
}

impl ScanFilter {
    /// Equality filter on a single string attribute
    pub fn eq(attribute: &str, value: &str) -> Self {
        Self {
            expression: "#attr = :value".to_string(),
            names: HashMap::from([("#attr".to_string(), attribute.to_string())]),
            values: HashMap::from([(":value".to_string(), AttributeValue::S(value.to_string()))]),
        }
    }
}

/// One DynamoDB table with the span and error conventions shared by every repository
#[derive(Clone)]
pub struct DynamoDbTable {
    client: Arc<DynamoDbClient>,
    table_name: String,
    region: String,
    metrics: Option<Arc<Metrics>>,
}

impl DynamoDbTable {
    pub fn new(client: Arc<DynamoDbClient>, table_name: String, region: String) -> Self {
        Self {
            client,
            table_name,
            region,
            metrics: None,
        }
    }

    /// Record operation counts and latencies into `metrics`
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn name(&self) -> &str {
        &self.table_name
    }

    /// Client span for a single DynamoDB API call
    pub fn span(&self, operation: &str) -> tracing::Span {
        tracing::info_span!(
            "DynamoDB",
            "aws.service" = "DynamoDB",
            "aws.operation" = operation,
            "aws.region" = %self.region,
            "aws.dynamodb.table_name" = %self.table_name,
            "aws.request_id" = tracing::field::Empty,
            "aws.remote.service" = "AWS::DynamoDB",
            "aws.remote.operation" = operation,
            "aws.remote.resource.type" = "AWS::DynamoDB::Table",
            "aws.remote.resource.identifier" = %self.table_name,
            "otel.kind" = "client",
            "otel.name" = format!("DynamoDB.{}", operation),
            "rpc.system" = "aws-api",
            "rpc.service" = "AmazonDynamoDBv2",
            "rpc.method" = operation,
            "http.status_code" = tracing::field::Empty,
            "db.system" = "dynamodb",
            "db.name" = %self.table_name,
            "db.operation" = operation,
        )
    }

    /// Convert DynamoDB error to RepositoryError
    pub fn map_error(&self, error: DynamoDbError) -> RepositoryError {
        error!("DynamoDB error: {:?}", error);

        if let DynamoDbError::ResourceNotFoundException(_) = error {
            return RepositoryError::TableNotFound {
                table_name: self.table_name.clone(),
            };
        }

        RepositoryError::AwsSdk {
            message: error.to_string(),
        }
    }

    fn map_build_error(&self, error: BuildError) -> RepositoryError {
        RepositoryError::InvalidItem {
            message: format!("Failed to build write request for {}: {}", self.table_name, error),
        }
    }

    /// Run one API call inside its client span and record its outcome
    async fn call<T, F>(&self, operation: &str, future: F) -> RepositoryResult<T>
    where
        F: Future<Output = RepositoryResult<T>>,
    {
        let start_time = Instant::now();
        let result = future.instrument(self.span(operation)).await;

        if let Some(metrics) = &self.metrics {
            metrics.record_database_operation(
                operation,
                &self.table_name,
                result.is_ok(),
                start_time.elapsed().as_secs_f64(),
            );
        }

        result
    }

    pub async fn put(&self, item: Item) -> RepositoryResult<()> {
        self.call("PutItem", async {
            self.client
                .put_item()
                .table_name(&self.table_name)
                .set_item(Some(item))
                .send()
                .await
                .map_err(|e| self.map_error(e.into()))
        })
        .await?;

        Ok(())
    }

    pub async fn get(&self, key: &str, value: &str) -> RepositoryResult<Option<Item>> {
        let response = self
            .call("GetItem", async {
                let result = self
                    .client
                    .get_item()
                    .table_name(&self.table_name)
                    .key(key, AttributeValue::S(value.to_string()))
                    .send()
                    .await;

                match &result {
                    Ok(output) => {
                        tracing::Span::current().record("http.status_code", 200);
                        if let Some(request_id) = output.request_id() {
                            tracing::Span::current().record("aws.request_id", request_id);
                        }
                    }
                    Err(e) => {
                        tracing::Span::current().record("http.status_code", 400);
                        error!("DynamoDB GetItem failed: {}", e);
                    }
                }

                result.map_err(|e| self.map_error(e.into()))
            })
            .await?;

        Ok(response.item)
    }

    /// Scan every page of the table, optionally filtered
    pub async fn scan_all(&self, filter: Option<&ScanFilter>) -> RepositoryResult<Vec<Item>> {
        self.scan(filter, None).await
    }

    async fn scan(
        &self,
        filter: Option<&ScanFilter>,
        projection_key: Option<&str>,
    ) -> RepositoryResult<Vec<Item>> {
        let mut names = HashMap::new();
        let mut values = HashMap::new();
        if let Some(filter) = filter {
            names.extend(filter.names.clone());
            values.extend(filter.values.clone());
        }
        if let Some(key) = projection_key {
            names.insert("#key".to_string(), key.to_string());
        }

        let mut items = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let mut request = self
                .client
                .scan()
                .table_name(&self.table_name)
                .set_exclusive_start_key(start_key.take());

            if let Some(filter) = filter {
                request = request.filter_expression(&filter.expression);
            }
            if projection_key.is_some() {
                request = request.projection_expression("#key");
            }
            if !names.is_empty() {
                request = request.set_expression_attribute_names(Some(names.clone()));
            }
            if !values.is_empty() {
                request = request.set_expression_attribute_values(Some(values.clone()));
            }

            let response = self
                .call("Scan", async {
                    request.send().await.map_err(|e| self.map_error(e.into()))
                })
                .await?;

            items.extend(response.items.unwrap_or_default());

            match response.last_evaluated_key {
                Some(key) if !key.is_empty() => start_key = Some(key),
                _ => break,
            }
        }

        Ok(items)
    }

    /// Delete every item in the table, then write `items`.
    ///
    /// Not atomic: a failure part-way leaves the table partially replaced.
    pub async fn replace_all(&self, key: &str, items: Vec<Item>) -> RepositoryResult<usize> {
        let existing = self.scan(None, Some(key)).await?;
        info!(
            table = %self.table_name,
            "Replacing {} existing items with {}",
            existing.len(),
            items.len()
        );

        let deletes = existing
            .into_iter()
            .map(|key_item| {
                DeleteRequest::builder()
                    .set_key(Some(key_item))
                    .build()
                    .map(|request| WriteRequest::builder().delete_request(request).build())
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| self.map_build_error(e))?;
        self.batch_write(deletes).await?;

        let count = items.len();
        let puts = items
            .into_iter()
            .map(|item| {
                PutRequest::builder()
                    .set_item(Some(item))
                    .build()
                    .map(|request| WriteRequest::builder().put_request(request).build())
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| self.map_build_error(e))?;
        self.batch_write(puts).await?;

        Ok(count)
    }

    async fn batch_write(&self, requests: Vec<WriteRequest>) -> RepositoryResult<()> {
        for chunk in requests.chunks(BATCH_WRITE_LIMIT) {
            let mut pending = chunk.to_vec();
            let mut attempts = 0;

            while !pending.is_empty() {
                if attempts == MAX_BATCH_ATTEMPTS {
                    return Err(RepositoryError::BatchWriteFailed {
                        table_name: self.table_name.clone(),
                        unprocessed: pending.len(),
                    });
                }
                attempts += 1;

                let output = self
                    .call("BatchWriteItem", async {
                        self.client
                            .batch_write_item()
                            .request_items(self.table_name.clone(), pending.clone())
                            .send()
                            .await
                            .map_err(|e| self.map_error(e.into()))
                    })
                    .await?;

                pending = output
                    .unprocessed_items
                    .and_then(|mut unprocessed| unprocessed.remove(&self.table_name))
                    .unwrap_or_default();

                if !pending.is_empty() {
                    warn!(
                        table = %self.table_name,
                        "{} items unprocessed after attempt {}",
                        pending.len(),
                        attempts
                    );
                }
            }
        }

        Ok(())
    }
}

pub fn required_s<'a>(item: &'a Item, field: &str) -> RepositoryResult<&'a String> {
    item.get(field)
        .and_then(|v| v.as_s().ok())
        .ok_or_else(|| RepositoryError::InvalidItem {
            message: format!("Missing {}", field),
        })
}

pub fn optional_s(item: &Item, field: &str) -> Option<String> {
    item.get(field).and_then(|v| v.as_s().ok()).cloned()
}

pub fn required_n<T: FromStr>(item: &Item, field: &str) -> RepositoryResult<T> {
    item.get(field)
        .and_then(|v| v.as_n().ok())
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| RepositoryError::InvalidItem {
            message: format!("Invalid {}", field),
        })
}

pub fn required_parsed<T: FromStr>(item: &Item, field: &str) -> RepositoryResult<T> {
    required_s(item, field)?
        .parse()
        .map_err(|_| RepositoryError::InvalidItem {
            message: format!("Invalid {}", field),
        })
}

pub fn required_timestamp(item: &Item, field: &str) -> RepositoryResult<DateTime<Utc>> {
    item.get(field)
        .and_then(|v| v.as_s().ok())
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| RepositoryError::InvalidItem {
            message: format!("Invalid {}", field),
        })
}

/// Parse every item, skipping the ones that fail conversion
pub fn parse_items<T>(
    items: Vec<Item>,
    kind: &str,
    parse: impl Fn(&Item) -> RepositoryResult<T>,
) -> Vec<T> {
    let mut parsed = Vec::with_capacity(items.len());
    for item in &items {
        match parse(item) {
            Ok(value) => parsed.push(value),
            Err(e) => {
                warn!("Failed to parse {} item: {}", kind, e);
                continue;
            }
        }
    }
    parsed
}
