use std::fmt;
use std::str::FromStr;

use super::{Category, Product};

/// Sentinel accepted in place of a category name
pub const ALL_CATEGORIES: &str = "all";

/// Category selection for product listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(selected) => *selected == category,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CategoryFilter::All => "All Categories",
            CategoryFilter::Only(category) => category.label(),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL_CATEGORIES),
            CategoryFilter::Only(category) => write!(f, "{}", category),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case(ALL_CATEGORIES) {
            Ok(CategoryFilter::All)
        } else {
            s.parse::<Category>().map(CategoryFilter::Only)
        }
    }
}

/// Search term and category applied to the product list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub search_term: String,
    pub category: CategoryFilter,
}

impl ProductFilter {
    pub fn new(search_term: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            search_term: search_term.into(),
            category,
        }
    }

    /// Case-insensitive substring match on the name AND a category match
    pub fn matches(&self, product: &Product) -> bool {
        let needle = self.search_term.to_lowercase();
        product.name.to_lowercase().contains(&needle) && self.category.matches(product.category)
    }

    /// Products passing the filter, in their original order
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|product| self.matches(product)).collect()
    }
}

/// Category picker options: `all` first, then each category in first-seen order
pub fn category_options(products: &[Product]) -> Vec<CategoryFilter> {
    let mut options = vec![CategoryFilter::All];
    for product in products {
        let option = CategoryFilter::Only(product.category);
        if !options.contains(&option) {
            options.push(option);
        }
    }
    options
}
