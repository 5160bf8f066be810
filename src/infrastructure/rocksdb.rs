use crate::domain::ports::KeyValueStore;
use crate::error::{Result, ShopError};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family holding every stored entry.
pub const CF_ENTRIES: &str = "entries";

/// A persistent key-value store backed by RocksDB.
///
/// Keys are stored as their UTF-8 bytes and values as UTF-8 strings.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the `entries` column family exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_entries = ColumnFamilyDescriptor::new(CF_ENTRIES, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_entries])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn entries(&self) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(CF_ENTRIES).ok_or_else(|| {
            ShopError::IoError(std::io::Error::other("Entries column family not found"))
        })
    }
}

#[async_trait]
impl KeyValueStore for RocksDBStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let cf = self.entries()?;
        match self.db.get_cf(cf, key.as_bytes())? {
            Some(bytes) => {
                let value = String::from_utf8(bytes).map_err(|e| {
                    ShopError::IoError(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        format!("Stored value for '{key}' is not UTF-8: {e}"),
                    ))
                })?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let cf = self.entries()?;
        self.db.put_cf(cf, key.as_bytes(), value.as_bytes())?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let cf = self.entries()?;
        self.db.delete_cf(cf, key.as_bytes())?;
        Ok(())
    }
}
