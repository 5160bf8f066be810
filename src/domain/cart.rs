use super::product::Product;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A product line in a cart.
///
/// Serialized flat, with the product fields next to `quantity`.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

impl CartItem {
    pub fn new(product: Product, quantity: u32) -> Self {
        Self { product, quantity }
    }

    pub fn id(&self) -> &str {
        &self.product.id
    }

    pub fn line_total(&self) -> Decimal {
        self.product.price * Decimal::from(self.quantity)
    }
}

#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct CartSummary {
    pub total_items: u64,
    pub total_price: Decimal,
    pub items: Vec<CartItem>,
}

impl CartSummary {
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let total_items = items.iter().map(|item| u64::from(item.quantity)).sum();
        let total_price = items.iter().map(CartItem::line_total).sum();
        Self {
            total_items,
            total_price,
            items,
        }
    }
}

/// Increases the quantity of an existing line.
///
/// Returns `false` when no line carries `product_id`.
pub fn bump_quantity(items: &mut [CartItem], product_id: &str, quantity: u32) -> bool {
    match items.iter_mut().find(|item| item.id() == product_id) {
        Some(item) => {
            item.quantity = item.quantity.saturating_add(quantity);
            true
        }
        None => false,
    }
}

pub fn set_quantity(items: &mut [CartItem], product_id: &str, quantity: u32) {
    if let Some(item) = items.iter_mut().find(|item| item.id() == product_id) {
        item.quantity = quantity;
    }
}

/// Takes paid quantities out of a cart, dropping lines that reach zero.
///
/// Lines added after `paid` was priced stay in the cart.
pub fn deduct(items: Vec<CartItem>, paid: &[CartItem]) -> Vec<CartItem> {
    items
        .into_iter()
        .filter_map(|mut item| {
            if let Some(line) = paid.iter().find(|line| line.id() == item.id()) {
                item.quantity = item.quantity.saturating_sub(line.quantity);
            }
            (item.quantity > 0).then_some(item)
        })
        .collect()
}

/// Merges a client-side cart with the stored one.
///
/// Local lines win and keep their order; stored lines whose product is not in
/// the local cart are appended after them.
pub fn merge(local: Vec<CartItem>, stored: Vec<CartItem>) -> Vec<CartItem> {
    let mut merged = local;
    let missing: Vec<CartItem> = stored
        .into_iter()
        .filter(|stored_item| !merged.iter().any(|item| item.id() == stored_item.id()))
        .collect();
    merged.extend(missing);
    merged
}
