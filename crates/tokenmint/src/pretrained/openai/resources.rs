//! # Public `OpenAI` Resources

/// The GPT-2 Data Gym "vocab.bpe" vocabulary resource.
pub const OA_GPT2_DATAGYM_VOCAB_BPE_URL: &str =
    "https://openaipublic.blob.core.windows.net/gpt-2/encodings/main/vocab.bpe";

/// The GPT-2 Data Gym "encoder.json" vocabulary resource.
pub const OA_GPT2_DATAGYM_ENCODER_JSON_URL: &str =
    "https://openaipublic.blob.core.windows.net/gpt-2/encodings/main/encoder.json";

/// The "`r50k_base.tiktoken`" vocabulary resource.
pub const OA_R50K_BASE_TIKTOKEN_URL: &str =
    "https://openaipublic.blob.core.windows.net/encodings/r50k_base.tiktoken";

/// The "`p50k_base.tiktoken`" vocabulary resource.
pub const OA_P50K_BASE_TIKTOKEN_URL: &str =
    "https://openaipublic.blob.core.windows.net/encodings/p50k_base.tiktoken";

/// The "`cl100k_base.tiktoken`" vocabulary resource.
pub const OA_CL100K_BASE_TIKTOKEN_URL: &str =
    "https://openaipublic.blob.core.windows.net/encodings/cl100k_base.tiktoken";
