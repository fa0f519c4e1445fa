//! # Special Tokens

pub use crate::encoders::ENDOFTEXT;

/// The fill-in-the-middle prefix token.
pub const FIM_PREFIX: &str = "<|fim_prefix|>";

/// The fill-in-the-middle middle token.
pub const FIM_MIDDLE: &str = "<|fim_middle|>";

/// The fill-in-the-middle suffix token.
pub const FIM_SUFFIX: &str = "<|fim_suffix|>";

/// The end-of-prompt token.
pub const ENDOFPROMPT: &str = "<|endofprompt|>";

/// The "`r50k_base`" (and "gpt2") special tokens.
pub const OA_R50K_BASE_SPECIALS: &[(&str, u32)] = &[(ENDOFTEXT, 50256)];

/// The "`p50k_base`" special tokens.
pub const OA_P50K_BASE_SPECIALS: &[(&str, u32)] = &[(ENDOFTEXT, 50256)];

/// The "`p50k_edit`" special tokens.
pub const OA_P50K_EDIT_SPECIALS: &[(&str, u32)] = &[
    (ENDOFTEXT, 50256),
    (FIM_PREFIX, 50281),
    (FIM_MIDDLE, 50282),
    (FIM_SUFFIX, 50283),
];

/// The "`cl100k_base`" special tokens.
pub const OA_CL100K_BASE_SPECIALS: &[(&str, u32)] = &[
    (ENDOFTEXT, 100257),
    (FIM_PREFIX, 100258),
    (FIM_MIDDLE, 100259),
    (FIM_SUFFIX, 100260),
    (ENDOFPROMPT, 100276),
];

/// Own a special token table.
pub fn owned_specials(specials: &[(&str, u32)]) -> Vec<(String, u32)> {
    specials.iter().map(|&(k, v)| (k.to_string(), v)).collect()
}
