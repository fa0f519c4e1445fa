//! # `OpenAI` Pretrained Encodings

use crate::{
    encoders::{Encoding, EncodingDefinition},
    errors::TMResult,
    pretrained::{
        EncodingConstructor,
        openai::{
            patterns::{OA_CL100K_BASE_PATTERN, OA_P50K_BASE_PATTERN, OA_R50K_BASE_PATTERN},
            resources::{
                OA_CL100K_BASE_TIKTOKEN_URL,
                OA_GPT2_DATAGYM_ENCODER_JSON_URL,
                OA_GPT2_DATAGYM_VOCAB_BPE_URL,
                OA_P50K_BASE_TIKTOKEN_URL,
                OA_R50K_BASE_TIKTOKEN_URL,
            },
            specials::{
                OA_CL100K_BASE_SPECIALS,
                OA_P50K_BASE_SPECIALS,
                OA_P50K_EDIT_SPECIALS,
                OA_R50K_BASE_SPECIALS,
                owned_specials,
            },
        },
    },
    regex::ConstRegexWrapperPattern,
    resources::BlobLoader,
    types::Rank,
    vocab::{
        SpanTokenMap,
        io::{read_base64_span_map, read_datagym_vocab},
    },
};

/// `OpenAI` pretrained encodings.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::EnumString,
    strum::EnumIter,
    strum::Display,
    strum::IntoStaticStr,
)]
#[non_exhaustive]
pub enum OpenAIEncoding {
    /// The original GPT-2 encoding, from the data gym files.
    #[strum(serialize = "gpt2")]
    Gpt2,

    /// GPT-2/GPT-3 "`r50k_base`" encoding.
    #[strum(serialize = "r50k_base")]
    R50kBase,

    /// Codex "`p50k_base`" encoding.
    #[strum(serialize = "p50k_base")]
    P50kBase,

    /// "`p50k_base`" plus the fill-in-the-middle tokens.
    #[strum(serialize = "p50k_edit")]
    P50kEdit,

    /// GPT-3.5/GPT-4 "`cl100k_base`" encoding.
    #[strum(serialize = "cl100k_base")]
    Cl100kBase,
}

impl OpenAIEncoding {
    /// The registry name.
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// The piece pattern.
    pub fn pattern(self) -> ConstRegexWrapperPattern {
        use OpenAIEncoding::*;
        match self {
            Gpt2 | R50kBase => OA_R50K_BASE_PATTERN,
            P50kBase | P50kEdit => OA_P50K_BASE_PATTERN,
            Cl100kBase => OA_CL100K_BASE_PATTERN,
        }
    }

    /// The special tokens.
    pub fn special_tokens(self) -> &'static [(&'static str, u32)] {
        use OpenAIEncoding::*;
        match self {
            Gpt2 | R50kBase => OA_R50K_BASE_SPECIALS,
            P50kBase => OA_P50K_BASE_SPECIALS,
            P50kEdit => OA_P50K_EDIT_SPECIALS,
            Cl100kBase => OA_CL100K_BASE_SPECIALS,
        }
    }

    /// The expected vocabulary size, where one is checked.
    pub fn explicit_n_vocab(self) -> Option<usize> {
        use OpenAIEncoding::*;
        match self {
            Gpt2 | R50kBase => Some(50257),
            P50kBase => Some(50281),
            P50kEdit | Cl100kBase => None,
        }
    }

    /// Read the ordinary ranks through `loader`.
    pub fn load_mergeable_ranks(
        self,
        loader: &dyn BlobLoader,
    ) -> TMResult<SpanTokenMap<Rank>> {
        use OpenAIEncoding::*;
        let url = match self {
            Gpt2 => {
                let vocab_bpe = loader.read_blob(OA_GPT2_DATAGYM_VOCAB_BPE_URL)?;
                let encoder_json = loader.read_blob(OA_GPT2_DATAGYM_ENCODER_JSON_URL)?;
                return read_datagym_vocab(vocab_bpe.as_slice(), encoder_json.as_slice());
            }
            R50kBase => OA_R50K_BASE_TIKTOKEN_URL,
            P50kBase | P50kEdit => OA_P50K_BASE_TIKTOKEN_URL,
            Cl100kBase => OA_CL100K_BASE_TIKTOKEN_URL,
        };
        read_base64_span_map(loader.read_blob(url)?.as_slice())
    }

    /// Build the encoding definition, reading blobs through `loader`.
    pub fn definition(
        self,
        loader: &dyn BlobLoader,
    ) -> TMResult<EncodingDefinition<Rank>> {
        Ok(EncodingDefinition {
            name: self.name().to_string(),
            pattern: self.pattern().to_pattern(),
            mergeable_ranks: self.load_mergeable_ranks(loader)?,
            special_tokens: owned_specials(self.special_tokens()),
            explicit_n_vocab: self.explicit_n_vocab(),
        })
    }

    /// Load the encoding, reading blobs through `loader`.
    pub fn load(
        self,
        loader: &dyn BlobLoader,
    ) -> TMResult<Encoding<Rank>> {
        Encoding::new(self.definition(loader)?)
    }
}

/// The "gpt2" definition.
pub fn gpt2(loader: &dyn BlobLoader) -> TMResult<EncodingDefinition<Rank>> {
    OpenAIEncoding::Gpt2.definition(loader)
}

/// The "`r50k_base`" definition.
pub fn r50k_base(loader: &dyn BlobLoader) -> TMResult<EncodingDefinition<Rank>> {
    OpenAIEncoding::R50kBase.definition(loader)
}

/// The "`p50k_base`" definition.
pub fn p50k_base(loader: &dyn BlobLoader) -> TMResult<EncodingDefinition<Rank>> {
    OpenAIEncoding::P50kBase.definition(loader)
}

/// The "`p50k_edit`" definition.
pub fn p50k_edit(loader: &dyn BlobLoader) -> TMResult<EncodingDefinition<Rank>> {
    OpenAIEncoding::P50kEdit.definition(loader)
}

/// The "`cl100k_base`" definition.
pub fn cl100k_base(loader: &dyn BlobLoader) -> TMResult<EncodingDefinition<Rank>> {
    OpenAIEncoding::Cl100kBase.definition(loader)
}

/// The `OpenAI` constructor table.
pub const OPENAI_ENCODINGS: &[(&str, EncodingConstructor)] = &[
    ("gpt2", gpt2),
    ("r50k_base", r50k_base),
    ("p50k_base", p50k_base),
    ("p50k_edit", p50k_edit),
    ("cl100k_base", cl100k_base),
];

#[cfg(test)]
mod tests {
    use core::str::FromStr;

    use strum::IntoEnumIterator;

    use super::*;
    use crate::{
        SpecialPolicy,
        errors::TokenmintError,
        resources::MemoryBlobLoader,
        vocab::testing::build_test_tiktoken_blob,
    };

    #[test]
    fn test_names() {
        assert_eq!(OpenAIEncoding::Cl100kBase.to_string(), "cl100k_base");
        assert_eq!(
            OpenAIEncoding::from_str("p50k_edit").unwrap(),
            OpenAIEncoding::P50kEdit
        );
        assert!(OpenAIEncoding::from_str("nope").is_err());

        // The table and the enum agree.
        let names: Vec<&str> = OpenAIEncoding::iter().map(OpenAIEncoding::name).collect();
        let table: Vec<&str> = OPENAI_ENCODINGS.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, table);
    }

    #[test]
    fn test_load_cl100k_from_memory() {
        let loader = MemoryBlobLoader::new().with_blob(
            OA_CL100K_BASE_TIKTOKEN_URL,
            build_test_tiktoken_blob(&["he", "ll", "hell", "hello"]),
        );

        let enc = OpenAIEncoding::Cl100kBase.load(&loader).unwrap();
        assert_eq!(enc.name(), "cl100k_base");
        assert_eq!(enc.eot_token(), Some(100257));
        assert_eq!(enc.max_token_value(), 100276);

        let tokens = enc
            .encode("hello<|endofprompt|>", &SpecialPolicy::allow_all())
            .unwrap();
        assert_eq!(tokens, vec![259, 100276]);
    }

    #[test]
    fn test_vocab_size_hint() {
        let loader = MemoryBlobLoader::new().with_blob(
            OA_R50K_BASE_TIKTOKEN_URL,
            build_test_tiktoken_blob(&["he"]),
        );
        assert!(matches!(
            OpenAIEncoding::R50kBase.load(&loader),
            Err(TokenmintError::Construction(_))
        ));
    }

    #[test]
    fn test_missing_blob() {
        let loader = MemoryBlobLoader::new();
        assert!(matches!(
            p50k_edit(&loader),
            Err(TokenmintError::External(_))
        ));
    }
}
