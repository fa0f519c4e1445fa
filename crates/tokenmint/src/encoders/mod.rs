//! # Encoders
//!
//! * [`byte_pair`] - the rank-driven pair merge.
//! * [`CoreBpe`] - vocabulary + segmentation, no special token policy.
//! * [`Encoding`] - the public, named tokenizer.

pub mod byte_pair;
mod core_bpe;
mod definition;
mod encoding;
mod special_policy;

#[doc(inline)]
pub use core_bpe::CoreBpe;
#[doc(inline)]
pub use definition::{ENDOFTEXT, EncodingDefinition};
#[doc(inline)]
pub use encoding::Encoding;
#[doc(inline)]
pub use special_policy::{SpecialPolicy, SpecialTokenSet};
