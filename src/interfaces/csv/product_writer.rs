use crate::domain::product::Product;
use crate::error::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct ProductRow<'a> {
    id: &'a str,
    name: &'a str,
    price: Decimal,
    category: &'a str,
}

/// Writes product listings as CSV with header `id,name,price,category`.
pub struct ProductWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> ProductWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_products<'a>(
        &mut self,
        products: impl IntoIterator<Item = &'a Product>,
    ) -> Result<()> {
        for product in products {
            self.writer.serialize(ProductRow {
                id: &product.id,
                name: &product.name,
                price: product.price.normalize(),
                category: &product.category,
            })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_writer_output() {
        let products = vec![Product {
            id: "3".to_string(),
            name: "Coffee Maker".to_string(),
            price: dec!(3000.00),
            image: String::new(),
            description: String::new(),
            category: "Home & Kitchen".to_string(),
        }];

        let mut buffer = Vec::new();
        ProductWriter::new(&mut buffer)
            .write_products(&products)
            .unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(
            output,
            "id,name,price,category\n3,Coffee Maker,3000,Home & Kitchen\n"
        );
    }
}
