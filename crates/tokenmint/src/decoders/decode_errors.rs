//! # UTF-8 Decode Policies

use crate::errors::{TMResult, TokenmintError};

/// How [`decode_utf8`] treats invalid UTF-8.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::EnumString, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum DecodeErrors {
    /// Replace each invalid sequence with `U+FFFD`.
    #[default]
    Replace,

    /// Drop invalid bytes.
    Ignore,

    /// Fail on the first invalid sequence.
    Strict,
}

/// Decode bytes as UTF-8 under the given policy.
///
/// ## Errors
/// [`TokenmintError::Decode`] under [`DecodeErrors::Strict`] only.
pub fn decode_utf8(
    bytes: Vec<u8>,
    errors: DecodeErrors,
) -> TMResult<String> {
    match errors {
        DecodeErrors::Replace => Ok(match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }),
        DecodeErrors::Ignore => {
            let mut text = String::with_capacity(bytes.len());
            for chunk in bytes.utf8_chunks() {
                text.push_str(chunk.valid());
            }
            Ok(text)
        }
        DecodeErrors::Strict => String::from_utf8(bytes).map_err(|e| TokenmintError::Decode {
            valid_up_to: e.utf8_error().valid_up_to(),
        }),
    }
}
