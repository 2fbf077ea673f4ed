//! Local persistence using RocksDB.
//!
//! The engine only needs a named-blob cache, expressed as [`BlobStore`].

use crate::error::Result;
use rocksdb::{Options, DB};
use std::path::Path;

/// Key-value blob cache that survives restarts.
pub trait BlobStore: Send + Sync {
    /// Read a named blob.
    fn get_blob(&self, name: &str) -> Result<Option<Vec<u8>>>;

    /// Overwrite a named blob.
    fn put_blob(&self, name: &str, data: &[u8]) -> Result<()>;
}

/// Storage backend for GeoSafe client data.
pub struct Storage {
    db: DB,
}

impl Storage {
    /// Open or create storage at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)?;
        Ok(Self { db })
    }

    /// Delete a named blob.
    pub fn delete_blob(&self, name: &str) -> Result<()> {
        let key = format!("blob:{}", name);
        self.db.delete(key.as_bytes())?;
        Ok(())
    }
}

impl BlobStore for Storage {
    fn get_blob(&self, name: &str) -> Result<Option<Vec<u8>>> {
        let key = format!("blob:{}", name);
        Ok(self.db.get(key.as_bytes())?)
    }

    fn put_blob(&self, name: &str, data: &[u8]) -> Result<()> {
        let key = format!("blob:{}", name);
        self.db.put(key.as_bytes(), data)?;
        Ok(())
    }
}
