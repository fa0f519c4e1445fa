//! # `tokenmint` BPE Tokenizer
//!
//! A byte pair encoding tokenizer, compatible with the `tiktoken` vocabularies.
//!
//! See:
//! * [`encoders`] to encode text into tokens, and [`Encoding`] for the full surface.
//! * [`decoders`] to decode tokens into text.
//! * [`vocab`] for rank tables and vocabulary file formats.
//! * [`pretrained`] for the public `OpenAI` encodings and the model table.
//! * [`registry`] for shared, build-once encodings.
//!
//! ## Crate Features
//!
//! #### feature: ``default``
//!
//! * ``ahash``
//! * ``download``
//!
//! #### feature: ``download``
//!
//! Pulls in ``tokenmint-disk-cache``, and enables the process-wide registry
//! behind [`get_encoding`] and [`encoding_for_model`].
//!
//! #### feature: ``ahash``
//!
//! This swaps the internal HashMap/HashSet implementations for ``ahash``.
//!
//! This is done by the ``types::TMHash{*}`` type alias machinery.
//!
//! #### feature: ``tracing``
//!
//! This enables a number of ``tracing`` instrumentation points.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tokenmint::{DecodeErrors, SpecialPolicy};
//!
//! fn example() -> tokenmint::TMResult<()> {
//!     let enc = tokenmint::encoding_for_model("gpt-4")?;
//!
//!     let tokens = enc.encode_ordinary("hello world")?;
//!     assert_eq!(tokens, vec![15339, 1917]);
//!     assert_eq!(enc.decode(&tokens, DecodeErrors::Strict)?, "hello world");
//!
//!     let tokens = enc.encode("<|endoftext|>", &SpecialPolicy::allow_all())?;
//!     assert_eq!(tokens, vec![100257]);
//!     Ok(())
//! }
//! ```
#![warn(missing_docs, unused)]

pub mod decoders;
pub mod encoders;
pub mod errors;
pub mod pretrained;
pub mod rayon;
pub mod regex;
pub mod registry;
pub mod resources;
pub mod segmentation;
pub mod types;
pub mod vocab;

#[cfg(feature = "download")]
#[doc(inline)]
pub use tokenmint_disk_cache as disk_cache;

#[doc(inline)]
pub use decoders::DecodeErrors;
#[doc(inline)]
pub use encoders::{Encoding, EncodingDefinition, SpecialPolicy, SpecialTokenSet};
#[doc(inline)]
pub use errors::{TMResult, TokenmintError};
#[cfg(feature = "download")]
#[doc(inline)]
pub use registry::{encoding_for_model, get_encoding};
#[doc(inline)]
pub use registry::EncodingRegistry;
#[doc(inline)]
pub use types::Rank;
