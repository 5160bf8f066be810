use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Category value that the storefront uses to mean "no category filter".
pub const ALL_CATEGORIES: &str = "All Categories";

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Decimal,
    pub image: String,
    pub description: String,
    pub category: String,
}

impl Product {
    fn matches_search(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(term) || self.description.to_lowercase().contains(term)
    }
}

/// Optional criteria for narrowing and paginating the catalog.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub limit: Option<usize>,
    pub skip: Option<usize>,
}

/// One page of filtered products.
///
/// `total` is the number of products that matched before pagination.
#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total: usize,
    pub skip: usize,
    pub limit: usize,
}

impl ProductFilter {
    pub fn with_category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }

    /// Runs the filter over `products`, preserving catalog order.
    pub fn apply(&self, products: &[Product]) -> ProductPage {
        let search = self
            .search
            .as_deref()
            .filter(|term| !term.is_empty())
            .map(str::to_lowercase);

        let filtered: Vec<&Product> = products
            .iter()
            .filter(|p| match self.category.as_deref() {
                Some(category) if !category.is_empty() && category != ALL_CATEGORIES => {
                    p.category == category
                }
                _ => true,
            })
            .filter(|p| search.as_deref().is_none_or(|term| p.matches_search(term)))
            .filter(|p| self.min_price.is_none_or(|min| p.price >= min))
            .filter(|p| self.max_price.is_none_or(|max| p.price <= max))
            .collect();

        let total = filtered.len();
        let skip = self.skip.unwrap_or(0);
        let limit = match self.limit {
            Some(limit) if limit > 0 => limit,
            _ => total,
        };

        ProductPage {
            products: filtered.into_iter().skip(skip).take(limit).cloned().collect(),
            total,
            skip,
            limit,
        }
    }
}
