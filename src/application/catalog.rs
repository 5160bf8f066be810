use crate::domain::product::{Product, ProductFilter, ProductPage};
use crate::error::{Result, ShopError};
use rust_decimal::Decimal;

pub const DEFAULT_FEATURED_LIMIT: usize = 4;
pub const DEFAULT_RELATED_LIMIT: usize = 4;

/// Read-only view over the store's products.
#[derive(Debug, Clone)]
pub struct CatalogService {
    products: Vec<Product>,
}

impl CatalogService {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// The eight-product catalog the storefront ships with.
    pub fn demo() -> Self {
        let product = |id: &str, name: &str, price: i64, description: &str, category: &str| {
            Product {
                id: id.to_string(),
                name: name.to_string(),
                price: Decimal::from(price),
                image: format!("/images/products/{id}.jpg"),
                description: description.to_string(),
                category: category.to_string(),
            }
        };

        Self::new(vec![
            product(
                "1",
                "Wireless Headphones",
                1990,
                "Premium wireless headphones with noise cancellation and superior sound quality.",
                "Electronics",
            ),
            product(
                "2",
                "Smart Watch",
                1000,
                "Advanced fitness tracking, heart rate monitoring, and smartphone connectivity.",
                "Electronics",
            ),
            product(
                "3",
                "Coffee Maker",
                3000,
                "Programmable coffee maker with built-in grinder and thermal carafe.",
                "Home & Kitchen",
            ),
            product(
                "4",
                "Running Shoes",
                3955,
                "Lightweight running shoes with advanced cushioning and breathable design.",
                "Sports & Outdoors",
            ),
            product(
                "5",
                "Laptop Backpack",
                938,
                "Durable laptop backpack with multiple compartments and USB charging port.",
                "Bags & Luggage",
            ),
            product(
                "6",
                "Bluetooth Speaker",
                1699,
                "Portable Bluetooth speaker with 360-degree sound and waterproof design.",
                "Electronics",
            ),
            product(
                "7",
                "Ear Buds",
                1099,
                "True wireless ear buds with deep bass and a pocket-sized charging case.",
                "Sports & Outdoors",
            ),
            product(
                "8",
                "Desk Lamp",
                999,
                "LED desk lamp with adjustable brightness and USB charging port.",
                "Home & Kitchen",
            ),
        ])
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn list(&self, filter: &ProductFilter) -> ProductPage {
        filter.apply(&self.products)
    }

    pub fn get(&self, id: &str) -> Result<&Product> {
        self.products
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| ShopError::NotFound("Product not found".to_string()))
    }

    /// Distinct categories in the order they first appear.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = Vec::new();
        for product in &self.products {
            if !categories.contains(&product.category) {
                categories.push(product.category.clone());
            }
        }
        categories
    }

    pub fn search(&self, query: &str, filter: &ProductFilter) -> ProductPage {
        let filter = ProductFilter {
            search: Some(query.to_string()),
            ..filter.clone()
        };
        self.list(&filter)
    }

    pub fn featured(&self, limit: usize) -> Vec<Product> {
        self.products.iter().take(limit).cloned().collect()
    }

    pub fn by_category(&self, category: &str, limit: Option<usize>) -> Vec<Product> {
        let filter = ProductFilter {
            limit,
            ..ProductFilter::with_category(category)
        };
        self.list(&filter).products
    }

    /// Other products from the same category as `id`.
    pub fn related(&self, id: &str, limit: usize) -> Result<Vec<Product>> {
        let product = self.get(id)?;
        Ok(self
            .products
            .iter()
            .filter(|p| p.category == product.category && p.id != product.id)
            .take(limit)
            .cloned()
            .collect())
    }
}

impl Default for CatalogService {
    fn default() -> Self {
        Self::demo()
    }
}
