//! # Decoding Support
//!
//! Token to byte lookups live on [`Vocabulary`](crate::vocab::Vocabulary);
//! this module turns the bytes back into text.

mod decode_errors;
mod offsets;

#[doc(inline)]
pub use decode_errors::{DecodeErrors, decode_utf8};
#[doc(inline)]
pub use offsets::{token_char_offsets, token_text_ranges};
