//! # tokenmint-disk-cache
//!
//! A flat, content-keyed cache for vocabulary blobs.
//!
//! Each blob is stored under the hex SHA-1 of the path or URL it was read
//! from; remote blobs are fetched once and then served from disk.
#![warn(missing_docs)]

use crate::path_resolver::PathResolver;

pub mod blob_cache;
pub mod path_resolver;

pub use blob_cache::{BlobCacheOptions, BlobDiskCache};

/// Environment variable key to override the default cache directory.
pub const TIKTOKEN_CACHE_DIR: &str = "TIKTOKEN_CACHE_DIR";

/// Fallback environment variable key for the cache directory.
pub const DATA_GYM_CACHE_DIR: &str = "DATA_GYM_CACHE_DIR";

/// Default [`PathResolver`] for tokenmint.
pub const TOKENMINT_CACHE_CONFIG: PathResolver = PathResolver {
    cache_env_vars: &[TIKTOKEN_CACHE_DIR, DATA_GYM_CACHE_DIR],
    temp_subdir: "data-gym-cache",
};
