use thiserror::Error;

/// Terminal failures of a payment verification polling session.
#[derive(Error, Debug)]
pub enum VerificationError {
    /// The gateway reported the payment as failed.
    #[error("Payment rejected: {message}")]
    Rejected {
        transaction_id: String,
        message: String,
    },
    /// Every attempt came back pending.
    #[error("Payment verification timeout after {attempts} attempts")]
    Timeout {
        transaction_id: String,
        attempts: u32,
    },
    /// The status check itself failed on the final attempt.
    #[error("Payment status check failed after {attempts} attempts: {source}")]
    Unreachable {
        transaction_id: String,
        attempts: u32,
        #[source]
        source: Box<ShopError>,
    },
}

impl VerificationError {
    pub fn transaction_id(&self) -> &str {
        match self {
            Self::Rejected { transaction_id, .. }
            | Self::Timeout { transaction_id, .. }
            | Self::Unreachable { transaction_id, .. } => transaction_id,
        }
    }
}

#[derive(Error, Debug)]
pub enum ShopError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User already exists")]
    UserExists,
    #[error("{0}")]
    Unauthenticated(String),
    #[error("Gateway error: {0}")]
    GatewayError(String),
    #[error(transparent)]
    Verification(#[from] VerificationError),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("Storage error: {0}")]
    StorageError(#[from] rocksdb::Error),
}

pub type Result<T> = std::result::Result<T, ShopError>;
