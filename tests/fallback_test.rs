use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

#[cfg(not(feature = "storage-rocksdb"))]
#[test]
fn test_rocksdb_fallback_warning() {
    let mut cmd = Command::new(cargo_bin!("shopease"));
    cmd.env_remove("RUST_LOG")
        .arg("--db-path")
        .arg("some_db")
        .arg("categories");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Electronics"))
        .stderr(predicate::str::contains("Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."))
        .stderr(predicate::str::contains("WARNING:").not());
}

#[cfg(feature = "storage-rocksdb")]
#[test]
fn test_rocksdb_no_fallback_warning() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("test_db");

    let mut cmd = Command::new(cargo_bin!("shopease"));
    cmd.arg("--db-path").arg(&db_path).arg("categories");

    cmd.assert()
        .success()
        .stderr(predicate::str::contains("Falling back to In-Memory storage").not());
}
