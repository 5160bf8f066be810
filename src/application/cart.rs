use super::catalog::CatalogService;
use super::repository::{Repository, cart_key};
use crate::domain::cart::{self, CartItem, CartSummary};
use crate::error::{Result, ShopError};
use std::sync::Arc;

/// Per-user carts persisted under `shopease_cart_{user_id}`.
#[derive(Clone)]
pub struct CartService {
    repo: Repository,
    catalog: Arc<CatalogService>,
}

impl CartService {
    pub fn new(repo: Repository, catalog: Arc<CatalogService>) -> Self {
        Self { repo, catalog }
    }

    pub async fn get_cart(&self, user_id: &str) -> Result<Vec<CartItem>> {
        self.repo.load_list(&cart_key(user_id)).await
    }

    pub async fn save_cart(&self, user_id: &str, items: &[CartItem]) -> Result<()> {
        self.repo.save(&cart_key(user_id), items).await
    }

    /// Adds `quantity` of a product, creating the line if needed.
    pub async fn add(&self, user_id: &str, product_id: &str, quantity: u32) -> Result<Vec<CartItem>> {
        if quantity == 0 {
            return Err(ShopError::ValidationError(
                "Quantity must be at least 1".to_string(),
            ));
        }

        let mut items = self.get_cart(user_id).await?;
        if !cart::bump_quantity(&mut items, product_id, quantity) {
            let product = self.catalog.get(product_id)?.clone();
            items.push(CartItem::new(product, quantity));
        }

        self.save_cart(user_id, &items).await?;
        tracing::debug!(user_id, product_id, quantity, "Added to cart");
        Ok(items)
    }

    pub async fn remove(&self, user_id: &str, product_id: &str) -> Result<Vec<CartItem>> {
        let mut items = self.get_cart(user_id).await?;
        items.retain(|item| item.id() != product_id);
        self.save_cart(user_id, &items).await?;
        Ok(items)
    }

    /// Sets a line's quantity; zero or less removes the line.
    pub async fn update_quantity(
        &self,
        user_id: &str,
        product_id: &str,
        quantity: i64,
    ) -> Result<Vec<CartItem>> {
        if quantity <= 0 {
            return self.remove(user_id, product_id).await;
        }
        let quantity = u32::try_from(quantity).map_err(|_| {
            ShopError::ValidationError(format!("Quantity too large: {quantity}"))
        })?;

        let mut items = self.get_cart(user_id).await?;
        cart::set_quantity(&mut items, product_id, quantity);
        self.save_cart(user_id, &items).await?;
        Ok(items)
    }

    pub async fn clear(&self, user_id: &str) -> Result<()> {
        self.save_cart(user_id, &[]).await
    }

    /// Removes the lines an order paid for, keeping anything added since.
    pub async fn settle(&self, user_id: &str, paid: &[CartItem]) -> Result<Vec<CartItem>> {
        let remaining = cart::deduct(self.get_cart(user_id).await?, paid);
        self.save_cart(user_id, &remaining).await?;
        Ok(remaining)
    }

    /// Merges a client-side cart into the stored one and persists the result.
    pub async fn sync(&self, user_id: &str, local: Vec<CartItem>) -> Result<Vec<CartItem>> {
        let stored = self.get_cart(user_id).await?;
        let merged = cart::merge(local, stored);
        self.save_cart(user_id, &merged).await?;
        tracing::debug!(user_id, lines = merged.len(), "Cart synced");
        Ok(merged)
    }

    pub async fn summary(&self, user_id: &str) -> Result<CartSummary> {
        Ok(CartSummary::from_items(self.get_cart(user_id).await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::in_memory::InMemoryStore;
    use rust_decimal_macros::dec;

    fn service() -> CartService {
        CartService::new(
            Repository::new(Arc::new(InMemoryStore::new())),
            Arc::new(CatalogService::demo()),
        )
    }

    #[tokio::test]
    async fn test_add_merges_existing_line() {
        let carts = service();
        carts.add("u1", "1", 1).await.unwrap();
        let items = carts.add("u1", "1", 2).await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 3);
        assert_eq!(carts.get_cart("u1").await.unwrap(), items);
    }

    #[tokio::test]
    async fn test_add_unknown_product_leaves_cart_untouched() {
        let carts = service();
        carts.add("u1", "2", 1).await.unwrap();

        assert!(matches!(
            carts.add("u1", "999", 1).await,
            Err(ShopError::NotFound(_))
        ));
        assert_eq!(carts.get_cart("u1").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_rejects_zero_quantity() {
        let carts = service();
        assert!(matches!(
            carts.add("u1", "1", 0).await,
            Err(ShopError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_update_quantity_to_zero_removes_line() {
        let carts = service();
        carts.add("u1", "1", 1).await.unwrap();
        carts.add("u1", "3", 1).await.unwrap();

        let items = carts.update_quantity("u1", "1", 5).await.unwrap();
        assert_eq!(items[0].quantity, 5);

        let items = carts.update_quantity("u1", "1", 0).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id(), "3");
    }

    #[tokio::test]
    async fn test_negative_quantity_removes_line() {
        let carts = service();
        carts.add("u1", "1", 2).await.unwrap();
        carts.add("u1", "3", 1).await.unwrap();

        let items = carts.update_quantity("u1", "3", -4).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id(), "1");
        assert_eq!(carts.get_cart("u1").await.unwrap(), items);
    }

    #[tokio::test]
    async fn test_update_quantity_unknown_product_leaves_cart_unchanged() {
        let carts = service();
        carts.add("u1", "1", 2).await.unwrap();
        let before = carts.get_cart("u1").await.unwrap();

        let items = carts.update_quantity("u1", "404", 7).await.unwrap();
        assert_eq!(items, before);
        assert_eq!(carts.get_cart("u1").await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_remove_drops_only_that_line() {
        let carts = service();
        carts.add("u1", "1", 1).await.unwrap();
        carts.add("u1", "2", 3).await.unwrap();

        let items = carts.remove("u1", "1").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id(), "2");
        assert_eq!(items[0].quantity, 3);

        // Removing a product that is not in the cart is a no-op
        let items = carts.remove("u1", "404").await.unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_summary_does_not_overflow() {
        let carts = service();
        carts.add("u1", "1", u32::MAX).await.unwrap();
        carts.add("u1", "2", 1).await.unwrap();

        let summary = carts.summary("u1").await.unwrap();
        assert_eq!(summary.total_items, u64::from(u32::MAX) + 1);
    }

    #[tokio::test]
    async fn test_settle_keeps_lines_added_later() {
        let carts = service();
        let paid = carts.add("u1", "1", 1).await.unwrap();
        carts.add("u1", "3", 2).await.unwrap();

        let left = carts.settle("u1", &paid).await.unwrap();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].id(), "3");
        assert_eq!(carts.get_cart("u1").await.unwrap(), left);
    }

    #[tokio::test]
    async fn test_carts_are_isolated_per_user() {
        let carts = service();
        carts.add("u1", "1", 1).await.unwrap();
        assert!(carts.get_cart("u2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_summary_and_clear() {
        let carts = service();
        carts.add("u1", "1", 2).await.unwrap();
        carts.add("u1", "8", 1).await.unwrap();

        let summary = carts.summary("u1").await.unwrap();
        assert_eq!(summary.total_items, 3);
        assert_eq!(summary.total_price, dec!(4979));

        carts.clear("u1").await.unwrap();
        assert_eq!(carts.summary("u1").await.unwrap().total_items, 0);
    }
}
