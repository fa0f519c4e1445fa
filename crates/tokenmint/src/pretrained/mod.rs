//! # Pretrained Encodings
//!
//! Encoding definitions for the public `OpenAI` vocabularies, and the model
//! name table.
//!
//! ```rust,no_run
//! use tokenmint::{
//!     disk_cache::{BlobCacheOptions, BlobDiskCache},
//!     pretrained::openai::OpenAIEncoding,
//! };
//!
//! fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let cache = BlobDiskCache::new(BlobCacheOptions::default())?;
//!     let enc = OpenAIEncoding::Cl100kBase.load(&cache)?;
//!     assert_eq!(enc.encode_ordinary("hello world")?, vec![15339, 1917]);
//!     Ok(())
//! }
//! ```

pub mod models;
pub mod openai;

use crate::{
    encoders::EncodingDefinition,
    errors::TMResult,
    resources::BlobLoader,
    types::Rank,
};

/// Builds an [`EncodingDefinition`], reading blobs through the loader.
pub type EncodingConstructor = fn(&dyn BlobLoader) -> TMResult<EncodingDefinition<Rank>>;

#[doc(inline)]
pub use models::{MODEL_PREFIX_TO_ENCODING, MODEL_TO_ENCODING, encoding_name_for_model};
