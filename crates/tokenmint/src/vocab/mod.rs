//! # Vocabulary
//!
//! * [`span_order`] - ordering and hashing over byte-span keys.
//! * [`Vocabulary`] - the immutable ordinary/special rank tables.
//! * [`io`] - the tiktoken and data gym file formats.

pub mod io;
pub mod span_order;
#[cfg(test)]
pub(crate) mod testing;
pub mod vocab_types;
pub mod vocabulary;

#[doc(inline)]
pub use vocab_types::*;
#[doc(inline)]
pub use vocabulary::Vocabulary;
