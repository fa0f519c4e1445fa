//! # Encoding Definitions

use crate::{regex::RegexWrapperPattern, types::TokenType, vocab::SpanTokenMap};

/// The name of the end-of-text special token.
pub const ENDOFTEXT: &str = "<|endoftext|>";

/// Everything needed to build an [`Encoding`](crate::encoders::Encoding).
#[derive(Debug, Clone)]
pub struct EncodingDefinition<T: TokenType> {
    /// The encoding name, e.g. `"cl100k_base"`.
    pub name: String,

    /// The piece splitting pattern.
    pub pattern: RegexWrapperPattern,

    /// The ordinary span to rank map.
    pub mergeable_ranks: SpanTokenMap<T>,

    /// The special token strings and their ranks.
    pub special_tokens: Vec<(String, T)>,

    /// When present, the exact expected vocabulary size.
    pub explicit_n_vocab: Option<usize>,
}
