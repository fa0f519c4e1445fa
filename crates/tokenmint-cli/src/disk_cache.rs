use std::sync::Arc;

use tokenmint::{
    EncodingRegistry,
    disk_cache::{BlobCacheOptions, BlobDiskCache},
};

/// Disk cache argument group.
#[derive(clap::Args, Debug)]
pub struct DiskCacheArgs {
    /// Cache directory; defaults to `$TIKTOKEN_CACHE_DIR`, then `$DATA_GYM_CACHE_DIR`.
    #[arg(long, default_value = None)]
    cache_dir: Option<String>,
}

impl DiskCacheArgs {
    /// Initialize the disk cache.
    pub fn init_disk_cache(&self) -> Result<BlobDiskCache, Box<dyn std::error::Error>> {
        let options = BlobCacheOptions::default().with_cache_dir(self.cache_dir.as_ref());
        let cache = BlobDiskCache::new(options)?;
        log::debug!("blob cache dir: {}", cache.cache_dir().display());
        Ok(cache)
    }

    /// Initialize a registry reading through the disk cache.
    pub fn init_registry(&self) -> Result<EncodingRegistry, Box<dyn std::error::Error>> {
        Ok(EncodingRegistry::new(Arc::new(self.init_disk_cache()?)))
    }
}
