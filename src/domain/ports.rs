use super::payment::{VerificationRequest, VerificationResponse};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// String key-value storage backing every service.
///
/// Values are opaque strings; callers store JSON documents.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: String) -> Result<()>;
    async fn remove(&self, key: &str) -> Result<()>;
}

/// Asks the payment network what happened to a transaction.
#[async_trait]
pub trait StatusChecker: Send + Sync {
    async fn check(&self, request: &VerificationRequest) -> Result<VerificationResponse>;
}

pub type KeyValueStoreRef = Arc<dyn KeyValueStore>;
pub type StatusCheckerRef = Arc<dyn StatusChecker>;
