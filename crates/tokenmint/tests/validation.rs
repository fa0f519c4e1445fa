#![allow(missing_docs)]
#![cfg(feature = "download")]

use tiktoken_rs::CoreBPE;
use tokenmint::{
    DecodeErrors,
    SpecialPolicy,
    disk_cache::{BlobCacheOptions, BlobDiskCache},
    pretrained::openai::OpenAIEncoding,
};

const SAMPLES: &[&str] = &[
    "hello world",
    "The quick brown fox jumps over the lazy dog.",
    "It's a beautiful day, and I'll be taking my 3 dogs for a walk.",
    "Don't forget: the temperature is 72 degrees!",
    "  multiple   spaces  ",
    "line1\nline2\r\nline3",
    "123 + 456 = 789",
    "caf\u{00e9} na\u{00ef}ve \u{4f60}\u{597d}",
    "$$$!!!...---",
    " ",
    "a",
    "\t\ttabs\tand\tspaces ",
    "emoji: \u{1f600}\u{1f680}\u{1f4a1}",
    "mixed: hello\u{00a0}world\u{2003}wide",
];

fn load(model: OpenAIEncoding) -> tokenmint::Encoding<u32> {
    let cache = BlobDiskCache::new(BlobCacheOptions::default()).unwrap();
    model.load(&cache).unwrap()
}

fn roundtrip_validation(model: OpenAIEncoding) {
    let enc = load(model);
    for text in SAMPLES {
        let tokens = enc.encode_ordinary(text).unwrap();
        let decoded = enc.decode(&tokens, DecodeErrors::Strict).unwrap();
        assert_eq!(&decoded, text, "Roundtrip mismatch for {model:?}: {text:?}");
    }
}

fn tiktoken_validation(
    model: OpenAIEncoding,
    tiktoken_bpe: &CoreBPE,
) {
    let enc = load(model);
    for text in SAMPLES {
        let tm_tokens = enc.encode(text, &SpecialPolicy::allow_all()).unwrap();
        let tt_tokens: Vec<u32> = tiktoken_bpe
            .encode_with_special_tokens(text)
            .into_iter()
            .map(|t| t as u32)
            .collect();

        assert_eq!(
            tm_tokens, tt_tokens,
            "Encode mismatch (tokenmint vs tiktoken) for {model:?}: {text:?}"
        );
    }
}

#[test]
#[ignore]
fn cl100k_known_tokens() {
    let enc = tokenmint::get_encoding("cl100k_base").unwrap();
    assert_eq!(enc.encode_ordinary("hello world").unwrap(), vec![15339, 1917]);
    assert_eq!(
        enc.encode("<|endoftext|>", &SpecialPolicy::allow_all())
            .unwrap(),
        vec![100257]
    );
    assert_eq!(enc.vocab_size(), 100277);
}

#[test]
#[ignore]
fn gpt2_known_tokens() {
    let enc = tokenmint::encoding_for_model("gpt2").unwrap();
    assert_eq!(enc.encode_ordinary("hello world").unwrap(), vec![31373, 995]);
    assert_eq!(enc.eot_token(), Some(50256));
}

#[test]
#[ignore]
fn cl100k_roundtrip() {
    roundtrip_validation(OpenAIEncoding::Cl100kBase);
}

#[test]
#[ignore]
fn p50k_roundtrip() {
    roundtrip_validation(OpenAIEncoding::P50kBase);
}

#[test]
#[ignore]
fn cl100k_vs_tiktoken() {
    let bpe = tiktoken_rs::cl100k_base().unwrap();
    tiktoken_validation(OpenAIEncoding::Cl100kBase, &bpe);
}

#[test]
#[ignore]
fn r50k_vs_tiktoken() {
    let bpe = tiktoken_rs::r50k_base().unwrap();
    tiktoken_validation(OpenAIEncoding::R50kBase, &bpe);
}

#[test]
#[ignore]
fn gpt2_matches_r50k() {
    let gpt2 = load(OpenAIEncoding::Gpt2);
    let r50k = load(OpenAIEncoding::R50kBase);
    for text in SAMPLES {
        assert_eq!(
            gpt2.encode_ordinary(text).unwrap(),
            r50k.encode_ordinary(text).unwrap(),
            "{text:?}"
        );
    }
}
