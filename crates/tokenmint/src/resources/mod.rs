//! # Blob Loaders
//!
//! Vocabulary files reach the pretrained constructors through a
//! [`BlobLoader`]; the loader decides where the bytes come from.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::{
    errors::{TMResult, TokenmintError},
    types::TMHashMap,
};

/// A source of vocabulary blobs, keyed by path or URL.
pub trait BlobLoader: Send + Sync {
    /// Read the blob at `blob_path`.
    fn read_blob(
        &self,
        blob_path: &str,
    ) -> TMResult<Vec<u8>>;
}

impl<L: BlobLoader + ?Sized> BlobLoader for Arc<L> {
    fn read_blob(
        &self,
        blob_path: &str,
    ) -> TMResult<Vec<u8>> {
        (**self).read_blob(blob_path)
    }
}

/// Blobs held in memory.
#[derive(Debug, Default)]
pub struct MemoryBlobLoader {
    blobs: RwLock<TMHashMap<String, Vec<u8>>>,
}

impl MemoryBlobLoader {
    /// Create an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a blob.
    pub fn insert<P: Into<String>, B: Into<Vec<u8>>>(
        &self,
        blob_path: P,
        blob: B,
    ) {
        self.blobs.write().insert(blob_path.into(), blob.into());
    }

    /// Builder form of [`MemoryBlobLoader::insert`].
    pub fn with_blob<P: Into<String>, B: Into<Vec<u8>>>(
        self,
        blob_path: P,
        blob: B,
    ) -> Self {
        self.insert(blob_path, blob);
        self
    }
}

impl BlobLoader for MemoryBlobLoader {
    fn read_blob(
        &self,
        blob_path: &str,
    ) -> TMResult<Vec<u8>> {
        self.blobs
            .read()
            .get(blob_path)
            .cloned()
            .ok_or_else(|| TokenmintError::External(format!("no such blob: {blob_path}")))
    }
}

/// Plain filesystem reads; URLs are not supported.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileBlobLoader;

impl BlobLoader for FileBlobLoader {
    fn read_blob(
        &self,
        blob_path: &str,
    ) -> TMResult<Vec<u8>> {
        Ok(std::fs::read(blob_path)?)
    }
}

#[cfg(feature = "download")]
impl BlobLoader for crate::disk_cache::BlobDiskCache {
    fn read_blob(
        &self,
        blob_path: &str,
    ) -> TMResult<Vec<u8>> {
        crate::disk_cache::BlobDiskCache::read_blob(self, blob_path)
            .map_err(|e| TokenmintError::External(format!("{e:#}")))
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;

    #[test]
    fn test_memory_loader() {
        let loader = MemoryBlobLoader::new().with_blob("a", b"abc".to_vec());
        assert_eq!(loader.read_blob("a").unwrap(), b"abc");
        assert!(matches!(
            loader.read_blob("b"),
            Err(TokenmintError::External(_))
        ));

        loader.insert("a", "xyz");
        let shared: Arc<dyn BlobLoader> = Arc::new(loader);
        assert_eq!(shared.read_blob("a").unwrap(), b"xyz");
    }

    #[test]
    fn test_file_loader() {
        let dir = TempDir::new("tm_blobs").unwrap();
        let path = dir.path().join("blob");
        std::fs::write(&path, b"data").unwrap();

        let loader = FileBlobLoader;
        assert_eq!(loader.read_blob(path.to_str().unwrap()).unwrap(), b"data");
        assert!(matches!(
            loader.read_blob(dir.path().join("missing").to_str().unwrap()),
            Err(TokenmintError::Io(_))
        ));
    }
}
