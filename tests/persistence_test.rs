#![cfg(feature = "storage-rocksdb")]

use assert_cmd::cargo_bin;
use std::process::Command;
use tempfile::tempdir;

fn shopease(db_path: &std::path::Path) -> Command {
    let mut cmd = Command::new(cargo_bin!("shopease"));
    cmd.arg("--db-path").arg(db_path);
    cmd
}

#[test]
fn test_rocksdb_persistence_recovery() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    // 1. First run: register an account
    let output1 = shopease(&db_path)
        .args(["signup", "--username", "meera"])
        .args(["--email", "meera@example.com", "--password", "chai4life"])
        .output()
        .expect("Failed to execute command");
    assert!(output1.status.success());
    assert!(String::from_utf8_lossy(&output1.stdout).contains("Registered meera"));

    // 2. Second run: the stored account can pay by card
    let output2 = shopease(&db_path)
        .args(["checkout", "--username", "meera", "--password", "chai4life"])
        .args(["--item", "8", "--method", "card"])
        .args(["--card-number", "4111111111111111", "--expiry", "12/29"])
        .args(["--cvv", "123", "--card-name", "Meera"])
        .args(["--full-name", "Meera", "--phone", "9876543210"])
        .args(["--address", "1 Park St", "--city", "Kolkata"])
        .args(["--state", "West Bengal", "--zip-code", "700016"])
        .output()
        .expect("Failed to execute command");
    assert!(output2.status.success());
    let stdout2 = String::from_utf8_lossy(&output2.stdout);
    assert!(stdout2.contains("method: CARD"));

    // 3. Third run: the same name cannot be registered again
    let output3 = shopease(&db_path)
        .args(["signup", "--username", "meera"])
        .args(["--email", "other@example.com", "--password", "x"])
        .output()
        .expect("Failed to execute command");
    assert!(!output3.status.success());
    assert!(String::from_utf8_lossy(&output3.stderr).contains("User already exists"));
}
