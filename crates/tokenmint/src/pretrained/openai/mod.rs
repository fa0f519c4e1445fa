//! Public `OpenAI` Patterns, Constants, and Encodings.

pub mod encodings;
pub mod patterns;
pub mod resources;
pub mod specials;

#[doc(inline)]
pub use encodings::{OPENAI_ENCODINGS, OpenAIEncoding};
#[doc(inline)]
pub use patterns::*;
