//! # Model Table
//!
//! Maps model names onto encoding names.

use crate::errors::{TMResult, TokenmintError};

/// Model name prefixes with their encoding.
///
/// Consulted only when [`MODEL_TO_ENCODING`] has no exact entry.
pub const MODEL_PREFIX_TO_ENCODING: &[(&str, &str)] = &[
    // e.g. gpt-4-0314, gpt-4-32k
    ("gpt-4-", "cl100k_base"),
    // e.g. gpt-3.5-turbo-0301
    ("gpt-3.5-turbo-", "cl100k_base"),
    // azure deployment names
    ("gpt-35-turbo", "cl100k_base"),
];

/// Exact model names with their encoding.
pub const MODEL_TO_ENCODING: &[(&str, &str)] = &[
    // chat
    ("gpt-4", "cl100k_base"),
    ("gpt-3.5-turbo-instruct", "cl100k_base"),
    ("gpt-3.5-turbo", "cl100k_base"),
    ("gpt-35-turbo", "cl100k_base"),
    // base
    ("ada-002", "cl100k_base"),
    ("babbage-002", "cl100k_base"),
    ("curie-002", "cl100k_base"),
    ("davinci-002", "cl100k_base"),
    // embeddings
    ("text-embedding-ada-002", "cl100k_base"),
    // code
    ("code-davinci-002", "p50k_base"),
    ("code-davinci-001", "p50k_base"),
    ("code-cushman-002", "p50k_base"),
    ("code-cushman-001", "p50k_base"),
    ("davinci-codex", "p50k_base"),
    ("cushman-codex", "p50k_base"),
    // text
    ("text-davinci-003", "p50k_base"),
    ("text-davinci-002", "p50k_base"),
    ("text-davinci-001", "r50k_base"),
    ("text-curie-001", "r50k_base"),
    ("text-babbage-001", "r50k_base"),
    ("text-ada-001", "r50k_base"),
    ("davinci", "r50k_base"),
    ("curie", "r50k_base"),
    ("babbage", "r50k_base"),
    ("ada", "r50k_base"),
    // edit
    ("text-davinci-edit-001", "p50k_edit"),
    ("code-davinci-edit-001", "p50k_edit"),
    // old embeddings
    ("text-similarity-davinci-001", "r50k_base"),
    ("text-similarity-curie-001", "r50k_base"),
    ("text-similarity-babbage-001", "r50k_base"),
    ("text-similarity-ada-001", "r50k_base"),
    ("text-search-davinci-doc-001", "r50k_base"),
    ("text-search-curie-doc-001", "r50k_base"),
    ("text-search-babbage-doc-001", "r50k_base"),
    ("text-search-ada-doc-001", "r50k_base"),
    ("code-search-babbage-code-001", "r50k_base"),
    ("code-search-ada-code-001", "r50k_base"),
    // open source
    ("gpt2", "gpt2"),
];

/// The encoding name for a model.
///
/// An exact [`MODEL_TO_ENCODING`] entry wins; otherwise the first
/// [`MODEL_PREFIX_TO_ENCODING`] entry which prefixes `model`.
///
/// ## Errors
/// [`TokenmintError::UnknownModel`] if no entry matches.
pub fn encoding_name_for_model(model: &str) -> TMResult<&'static str> {
    if let Some(&(_, encoding)) = MODEL_TO_ENCODING.iter().find(|(name, _)| *name == model) {
        return Ok(encoding);
    }
    MODEL_PREFIX_TO_ENCODING
        .iter()
        .find(|(prefix, _)| model.starts_with(prefix))
        .map(|&(_, encoding)| encoding)
        .ok_or_else(|| TokenmintError::UnknownModel {
            model: model.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact() {
        assert_eq!(encoding_name_for_model("gpt2").unwrap(), "gpt2");
        assert_eq!(encoding_name_for_model("davinci").unwrap(), "r50k_base");
        assert_eq!(
            encoding_name_for_model("text-davinci-edit-001").unwrap(),
            "p50k_edit"
        );
        assert_eq!(
            encoding_name_for_model("text-davinci-003").unwrap(),
            "p50k_base"
        );
    }

    #[test]
    fn test_prefix() {
        assert_eq!(encoding_name_for_model("gpt-4-0314").unwrap(), "cl100k_base");
        assert_eq!(
            encoding_name_for_model("gpt-3.5-turbo-0301").unwrap(),
            "cl100k_base"
        );
        assert_eq!(
            encoding_name_for_model("gpt-3.5-turbo-instruct-0914").unwrap(),
            "cl100k_base"
        );
    }

    #[test]
    fn test_exact_beats_prefix() {
        // "gpt-3.5-turbo-instruct" also starts with the "gpt-3.5-turbo-" prefix.
        assert_eq!(encoding_name_for_model("davinci-002").unwrap(), "cl100k_base");
        assert_eq!(
            encoding_name_for_model("gpt-3.5-turbo-instruct").unwrap(),
            "cl100k_base"
        );
    }

    #[test]
    fn test_exact_names_are_not_prefixes() {
        for model in ["adapter", "davinci-foo", "gpt2-xl", "gpt-4o", "curieosity"] {
            match encoding_name_for_model(model) {
                Err(TokenmintError::UnknownModel { model: m }) => assert_eq!(m, model),
                other => panic!("{model}: unexpected {other:?}"),
            }
        }
        assert_eq!(encoding_name_for_model("gpt-4-32k").unwrap(), "cl100k_base");
        assert_eq!(
            encoding_name_for_model("gpt-35-turbo-16k").unwrap(),
            "cl100k_base"
        );
    }

    #[test]
    fn test_unknown() {
        let err = encoding_name_for_model("llama-3").unwrap_err();
        assert!(matches!(err, TokenmintError::UnknownModel { ref model } if model == "llama-3"));
        assert!(err.to_string().contains("Could not automatically map llama-3"));
    }
}
