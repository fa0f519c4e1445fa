//! # Vocabulary IO
//!
//! ## Loading A Rank File
//!
//! ```rust,no_run
//! use tokenmint::{
//!     encoders::{Encoding, EncodingDefinition},
//!     pretrained::openai::OA_CL100K_BASE_PATTERN,
//!     vocab::io::load_base64_span_map_path,
//! };
//!
//! fn example() -> tokenmint::TMResult<Encoding<u32>> {
//!     let mergeable_ranks = load_base64_span_map_path("cl100k_base.tiktoken")?;
//!     Encoding::new(EncodingDefinition {
//!         name: "local_cl100k".to_string(),
//!         pattern: OA_CL100K_BASE_PATTERN.to_pattern(),
//!         mergeable_ranks,
//!         special_tokens: vec![("<|endoftext|>".to_string(), 100257)],
//!         explicit_n_vocab: None,
//!     })
//! }
//! ```

mod base64_vocab;
mod datagym_vocab;

#[doc(inline)]
pub use base64_vocab::*;
#[doc(inline)]
pub use datagym_vocab::*;
