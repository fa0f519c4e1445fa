//! # Error Types

/// Errors from tokenmint operations.
#[derive(Debug, thiserror::Error)]
pub enum TokenmintError {
    /// The vocabulary is malformed; no encoding can be built from it.
    #[error("invalid vocabulary: {0}")]
    Construction(String),

    /// The encoding name is not in the registry's constructor table.
    #[error("unknown encoding {name:?}")]
    UnknownEncodingName {
        /// The requested encoding name.
        name: String,
    },

    /// The model name could not be mapped to an encoding.
    #[error(
        "Could not automatically map {model} to a tokeniser. \
         Please use get_encoding to explicitly get the tokeniser you expect."
    )]
    UnknownModel {
        /// The requested model name.
        model: String,
    },

    /// The token is in neither the ordinary nor the special decoder.
    #[error("unknown token {token}")]
    UnknownToken {
        /// The token value, widened for display.
        token: u64,
    },

    /// A byte span has no rank in the vocabulary.
    #[error("no token for byte span {span:?}")]
    UnknownSpan {
        /// The span bytes.
        span: Vec<u8>,
    },

    /// The input contained a special token that the policy disallows.
    #[error(
        "Encountered text corresponding to disallowed special token {token:?}. \
         If you want this text to be encoded as a special token, \
         allow it in the policy's allowed set. \
         If you want this text to be encoded as normal text, \
         remove it from the policy's disallowed set. \
         To disable this check for all special tokens, use an empty disallowed set."
    )]
    DisallowedSpecialToken {
        /// The offending special token.
        token: String,
    },

    /// Strict decoding hit an invalid UTF-8 sequence.
    #[error("invalid utf-8 sequence after {valid_up_to} valid bytes")]
    Decode {
        /// The length of the valid prefix.
        valid_up_to: usize,
    },

    /// Regex compilation or matching failed.
    #[error("regex error: {0}")]
    Regex(String),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Parse error (base64, integer, json, etc.)
    #[error("parse error: {0}")]
    Parse(String),

    /// Error from an external component.
    #[error("{0}")]
    External(String),
}

impl From<crate::regex::ErrorWrapper> for TokenmintError {
    fn from(err: crate::regex::ErrorWrapper) -> Self {
        Self::Regex(err.to_string())
    }
}

/// Result type for tokenmint operations.
pub type TMResult<T> = core::result::Result<T, TokenmintError>;
