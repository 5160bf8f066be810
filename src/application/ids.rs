use chrono::Utc;
use rand::Rng;
use rand::distributions::Alphanumeric;

pub fn epoch_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn random_alphanumeric(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// `TXN_{millis}_{6 lowercase alphanumerics}`
pub fn transaction_id() -> String {
    format!(
        "TXN_{}_{}",
        epoch_millis(),
        random_alphanumeric(6).to_ascii_lowercase()
    )
}

/// `ORDER_{millis}{4 uppercase alphanumerics}`
pub fn order_id() -> String {
    format!(
        "ORDER_{}{}",
        epoch_millis(),
        random_alphanumeric(4).to_ascii_uppercase()
    )
}

/// `TRK{8 uppercase alphanumerics}`
pub fn tracking_number() -> String {
    format!("TRK{}", random_alphanumeric(8).to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_shapes() {
        let txn = transaction_id();
        let parts: Vec<&str> = txn.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "TXN");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 6);
        assert!(!parts[2].chars().any(|c| c.is_ascii_uppercase()));

        let tracking = tracking_number();
        assert!(tracking.starts_with("TRK"));
        assert_eq!(tracking.len(), 11);

        assert!(order_id().starts_with("ORDER_"));
    }
}
