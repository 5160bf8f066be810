use super::cart::CartService;
use super::ids;
use super::poller::PaymentPoller;
use super::repository::{ORDERS_KEY, Repository};
use crate::config::MerchantConfig;
use crate::domain::cart::CartItem;
use crate::domain::money::Amount;
use crate::domain::payment::{
    BillingAddress, CardDetails, Order, OrderStatus, PaymentMethod, Quote, UpiIntent,
    VerificationRequest,
};
use crate::error::{Result, ShopError};
use chrono::Utc;

/// A UPI payment waiting for the customer to pay from their app.
///
/// `items` are the cart lines `quote` was priced from; the order is built
/// from them whatever happens to the cart while the payment is pending.
#[derive(Debug, Clone, PartialEq)]
pub struct UpiCheckout {
    pub items: Vec<CartItem>,
    pub quote: Quote,
    pub request: VerificationRequest,
    pub intent: UpiIntent,
}

// How an order was paid for.
struct Settlement {
    method: PaymentMethod,
    transaction_id: String,
    reference_id: Option<String>,
}

/// Turns a user's cart into a confirmed order.
pub struct CheckoutService {
    repo: Repository,
    carts: CartService,
    poller: PaymentPoller,
    merchant: MerchantConfig,
}

impl CheckoutService {
    pub fn new(
        repo: Repository,
        carts: CartService,
        poller: PaymentPoller,
        merchant: MerchantConfig,
    ) -> Self {
        Self {
            repo,
            carts,
            poller,
            merchant,
        }
    }

    pub fn merchant(&self) -> &MerchantConfig {
        &self.merchant
    }

    pub fn quote(&self, items: &[CartItem]) -> Quote {
        Quote::for_items(items, self.merchant.tax_rate)
    }

    /// Prices the user's cart and builds the UPI intent to show as a code.
    pub async fn prepare_upi(&self, user_id: &str) -> Result<UpiCheckout> {
        let items = self.non_empty_cart(user_id).await?;
        let quote = self.quote(&items);
        let request = VerificationRequest {
            transaction_id: ids::transaction_id(),
            amount: Amount::new(quote.total)?,
            merchant_id: self.merchant.merchant_id.clone(),
            merchant_name: self.merchant.merchant_name.clone(),
        };
        let intent = UpiIntent::new(&request);

        tracing::info!(
            user_id,
            transaction_id = %request.transaction_id,
            total = %quote.total,
            "UPI payment requested"
        );
        Ok(UpiCheckout {
            items,
            quote,
            request,
            intent,
        })
    }

    /// Waits for the UPI payment to settle, then places the order.
    ///
    /// Only the lines that were paid for leave the cart, and only once the
    /// payment is verified.
    pub async fn confirm_upi(
        &self,
        user_id: &str,
        checkout: &UpiCheckout,
        address: &BillingAddress,
    ) -> Result<Order> {
        address.validate()?;

        let response = self.poller.poll(&checkout.request).await?;
        let settlement = Settlement {
            method: PaymentMethod::Upi,
            transaction_id: checkout.request.transaction_id.clone(),
            reference_id: response.reference_id,
        };
        self.place_order(
            user_id,
            checkout.items.clone(),
            checkout.quote,
            settlement,
            address,
        )
        .await
    }

    pub async fn pay_with_card(
        &self,
        user_id: &str,
        card: &CardDetails,
        address: &BillingAddress,
    ) -> Result<Order> {
        address.validate()?;
        card.validate()?;
        let items = self.non_empty_cart(user_id).await?;
        let quote = self.quote(&items);

        tracing::info!(
            user_id,
            card_last4 = %card.last4(),
            total = %quote.total,
            "Card payment accepted"
        );
        let settlement = Settlement {
            method: PaymentMethod::Card,
            transaction_id: ids::transaction_id(),
            reference_id: None,
        };
        self.place_order(user_id, items, quote, settlement, address).await
    }

    pub async fn orders_for(&self, user_id: &str) -> Result<Vec<Order>> {
        let orders: Vec<Order> = self.repo.load_list(ORDERS_KEY).await?;
        Ok(orders.into_iter().filter(|o| o.user_id == user_id).collect())
    }

    pub async fn order(&self, order_id: &str) -> Result<Order> {
        let orders: Vec<Order> = self.repo.load_list(ORDERS_KEY).await?;
        orders
            .into_iter()
            .find(|o| o.id == order_id)
            .ok_or_else(|| ShopError::NotFound("Order not found".to_string()))
    }

    async fn non_empty_cart(&self, user_id: &str) -> Result<Vec<CartItem>> {
        let items = self.carts.get_cart(user_id).await?;
        if items.is_empty() {
            return Err(ShopError::ValidationError("Cart is empty".to_string()));
        }
        Ok(items)
    }

    async fn place_order(
        &self,
        user_id: &str,
        items: Vec<CartItem>,
        quote: Quote,
        settlement: Settlement,
        address: &BillingAddress,
    ) -> Result<Order> {
        let now = Utc::now();
        let order = Order {
            id: ids::order_id(),
            user_id: user_id.to_string(),
            items,
            subtotal: quote.subtotal,
            tax: quote.tax,
            total_amount: quote.total,
            method: settlement.method,
            transaction_id: settlement.transaction_id,
            reference_id: settlement.reference_id,
            status: OrderStatus::Confirmed,
            created_at: now,
            updated_at: now,
            billing_address: address.clone(),
            tracking_number: ids::tracking_number(),
        };

        let mut orders: Vec<Order> = self.repo.load_list(ORDERS_KEY).await?;
        orders.push(order.clone());
        self.repo.save(ORDERS_KEY, &orders).await?;
        self.carts.settle(user_id, &order.items).await?;

        tracing::info!(
            user_id,
            order_id = %order.id,
            method = %order.method,
            total = %order.total_amount,
            "Order confirmed"
        );
        Ok(order)
    }
}
