use std::collections::HashSet;

use super::{
    ContactRequest, CreateBookingRequest, ProfileUpdateRequest, ValidationError, ValidationResult,
};

/// Trait for validating input models
pub trait Validate {
    fn validate(&self) -> ValidationResult<()>;
}

/// Validation constants
pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_MESSAGE_LENGTH: usize = 2000;
pub const MAX_PHONE_LENGTH: usize = 20;
pub const MAX_BOOKING_LINES: usize = 100;
pub const MIN_ORDER_QUANTITY: u32 = 1;
pub const MAX_ORDER_QUANTITY: u32 = 1000;

impl Validate for ContactRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_name(&self.name)?;
        validate_message(&self.message)?;
        Ok(())
    }
}

impl Validate for ProfileUpdateRequest {
    fn validate(&self) -> ValidationResult<()> {
        validate_name(&self.name)?;
        validate_phone(&self.phone)?;
        Ok(())
    }
}

impl Validate for CreateBookingRequest {
    fn validate(&self) -> ValidationResult<()> {
        if self.items.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "items".to_string(),
            });
        }

        if self.items.len() > MAX_BOOKING_LINES {
            return Err(ValidationError::InvalidValue {
                field: "items".to_string(),
                value: self.items.len().to_string(),
                reason: format!("Too many lines, maximum allowed: {}", MAX_BOOKING_LINES),
            });
        }

        let mut seen = HashSet::new();
        for (index, line) in self.items.iter().enumerate() {
            validate_product_id(&line.product, index)?;
            validate_order_quantity(line.quantity)?;

            if !seen.insert(line.product.trim()) {
                return Err(ValidationError::InvalidValue {
                    field: format!("items[{}].product", index),
                    value: line.product.clone(),
                    reason: "Duplicate product line".to_string(),
                });
            }
        }

        Ok(())
    }
}

/// Validate a person's display name
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::RequiredField {
            field: "name".to_string(),
        });
    }

    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max_length: MAX_NAME_LENGTH,
            actual_length: trimmed.chars().count(),
        });
    }

    if trimmed.chars().any(char::is_control) {
        return Err(ValidationError::InvalidValue {
            field: "name".to_string(),
            value: name.to_string(),
            reason: "Contains invalid control characters".to_string(),
        });
    }

    Ok(())
}

/// Validate contact message body
pub fn validate_message(message: &str) -> ValidationResult<()> {
    let trimmed = message.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::RequiredField {
            field: "message".to_string(),
        });
    }

    if trimmed.chars().count() > MAX_MESSAGE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "message".to_string(),
            max_length: MAX_MESSAGE_LENGTH,
            actual_length: trimmed.chars().count(),
        });
    }

    Ok(())
}

/// Validate an optional phone number; blank is allowed
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let trimmed = phone.trim();

    if trimmed.is_empty() {
        return Ok(());
    }

    if trimmed.len() > MAX_PHONE_LENGTH {
        return Err(ValidationError::TooLong {
            field: "phone".to_string(),
            max_length: MAX_PHONE_LENGTH,
            actual_length: trimmed.len(),
        });
    }

    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' ' | '(' | ')'))
    {
        return Err(ValidationError::InvalidValue {
            field: "phone".to_string(),
            value: phone.to_string(),
            reason: "Phone may only contain digits, spaces, '+', '-' and parentheses".to_string(),
        });
    }

    Ok(())
}

fn validate_product_id(product_id: &str, index: usize) -> ValidationResult<()> {
    if product_id.trim().is_empty() {
        return Err(ValidationError::RequiredField {
            field: format!("items[{}].product", index),
        });
    }

    Ok(())
}

/// Validate the quantity of an order line
pub fn validate_order_quantity(quantity: u32) -> ValidationResult<()> {
    if !(MIN_ORDER_QUANTITY..=MAX_ORDER_QUANTITY).contains(&quantity) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: MIN_ORDER_QUANTITY.to_string(),
            max: MAX_ORDER_QUANTITY.to_string(),
            value: quantity.to_string(),
        });
    }

    Ok(())
}
