use crate::domain::product::Product;
use crate::error::{Result, ShopError};
use std::io::Read;

/// Reads catalog products from a CSV source.
///
/// Expects the header `id,name,price,image,description,category`. Whitespace
/// around fields is trimmed.
pub struct ProductReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> ProductReader<R> {
    /// Creates a new `ProductReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes products.
    pub fn products(self) -> impl Iterator<Item = Result<Product>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(ShopError::from))
    }

    /// Reads every product, skipping malformed rows with a warning.
    pub fn read_all(self) -> Vec<Product> {
        self.products()
            .filter_map(|result| match result {
                Ok(product) => Some(product),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping malformed catalog row");
                    None
                }
            })
            .collect()
    }
}
