#![allow(missing_docs)]

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
};

use tokenmint::{
    DecodeErrors,
    EncodingDefinition,
    EncodingRegistry,
    Rank,
    SpecialPolicy,
    TMResult,
    TokenmintError,
    pretrained::{
        EncodingConstructor,
        openai::{OA_CL100K_BASE_PATTERN, resources::OA_CL100K_BASE_TIKTOKEN_URL},
    },
    resources::{BlobLoader, MemoryBlobLoader},
    vocab::{
        SpanTokenMap,
        io::{read_base64_span_map, write_base64_span_map},
    },
};

const MERGES: &[&str] = &[
    "he", "ll", "hell", "hello", " w", "or", " wor", "ld", " world", "in", "ing", " th", " the",
];

fn span_map() -> SpanTokenMap<Rank> {
    let mut span_map: SpanTokenMap<Rank> = (0..=255u8).map(|b| (vec![b], b as Rank)).collect();
    for (i, s) in MERGES.iter().enumerate() {
        span_map.insert(s.as_bytes().to_vec(), 256 + i as Rank);
    }
    span_map
}

fn tiktoken_blob() -> Vec<u8> {
    let mut blob = Vec::new();
    write_base64_span_map(&span_map(), &mut blob).unwrap();
    blob
}

fn loader() -> Arc<dyn BlobLoader> {
    Arc::new(
        MemoryBlobLoader::new()
            .with_blob(OA_CL100K_BASE_TIKTOKEN_URL, tiktoken_blob())
            .with_blob("toy.tiktoken", tiktoken_blob()),
    )
}

static TOY_BUILDS: AtomicUsize = AtomicUsize::new(0);

fn toy(loader: &dyn BlobLoader) -> TMResult<EncodingDefinition<Rank>> {
    TOY_BUILDS.fetch_add(1, Ordering::SeqCst);
    Ok(EncodingDefinition {
        name: "toy".to_string(),
        pattern: OA_CL100K_BASE_PATTERN.into(),
        mergeable_ranks: read_base64_span_map(loader.read_blob("toy.tiktoken")?.as_slice())?,
        special_tokens: vec![("<|endoftext|>".to_string(), 1000)],
        explicit_n_vocab: None,
    })
}

#[test]
fn test_registry_round_trip() {
    let registry = EncodingRegistry::new(loader());
    let enc = registry.encoding_for_model("gpt-3.5-turbo").unwrap();
    assert_eq!(enc.name(), "cl100k_base");

    let samples = [
        "hello world",
        "singing in the rain",
        "  multiple   spaces  ",
        "line1\nline2\r\nline3",
        "caf\u{00e9} na\u{00ef}ve \u{4f60}\u{597d}",
        "emoji: \u{1f600}\u{1f680}",
    ];
    for text in samples {
        let tokens = enc.encode_ordinary(text).unwrap();
        assert_eq!(enc.decode(&tokens, DecodeErrors::Strict).unwrap(), text);
        assert_eq!(
            enc.count_tokens(text, &SpecialPolicy::default()).unwrap(),
            tokens.len()
        );
    }

    let hello = 259;
    let world = 264;
    assert_eq!(enc.encode_ordinary("hello world").unwrap(), vec![hello, world]);
}

#[test]
fn test_specials_through_registry() {
    let registry = EncodingRegistry::new(loader());
    let enc = registry.get_encoding("cl100k_base").unwrap();
    let eot = enc.eot_token().unwrap();

    let text = "hello<|endoftext|> world<|fim_prefix|>";
    assert!(matches!(
        enc.encode(text, &SpecialPolicy::default()),
        Err(TokenmintError::DisallowedSpecialToken { .. })
    ));

    let policy = SpecialPolicy::default()
        .with_allowed_tokens(["<|endoftext|>"])
        .with_disallowed_tokens(Vec::<String>::new());
    let tokens = enc.encode(text, &policy).unwrap();
    assert_eq!(tokens.iter().filter(|&&t| t == eot).count(), 1);
    assert_eq!(enc.decode(&tokens, DecodeErrors::Strict).unwrap(), text);

    let tokens = enc.encode(text, &SpecialPolicy::allow_all()).unwrap();
    assert_eq!(tokens.last().copied(), Some(100258));
}

#[test]
fn test_batch_order() {
    let registry = EncodingRegistry::new(loader());
    let enc = registry.get_encoding("cl100k_base").unwrap();

    let texts: Vec<String> = (0..64).map(|i| format!("hello {i} world")).collect();
    let batch = enc.encode_ordinary_batch(&texts).unwrap();
    for (text, tokens) in texts.iter().zip(&batch) {
        assert_eq!(&enc.encode_ordinary(text).unwrap(), tokens);
    }
    assert_eq!(enc.decode_batch(&batch, DecodeErrors::Strict).unwrap(), texts);
}

#[test]
fn test_concurrent_get_encoding() {
    let registry =
        EncodingRegistry::with_constructors(loader(), [("toy", toy as EncodingConstructor)]);

    let encodings: Vec<_> = thread::scope(|s| {
        let handles: Vec<_> = (0..8)
            .map(|_| s.spawn(|| registry.get_encoding("toy").unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    // Everyone sees the same instance, however many builds raced.
    for enc in &encodings {
        assert!(Arc::ptr_eq(enc, &encodings[0]));
    }
    assert!(TOY_BUILDS.load(Ordering::SeqCst) >= 1);

    let builds = TOY_BUILDS.load(Ordering::SeqCst);
    let again = registry.get_encoding("toy").unwrap();
    assert!(Arc::ptr_eq(&again, &encodings[0]));
    assert_eq!(TOY_BUILDS.load(Ordering::SeqCst), builds);

    // A shared encoding is usable from many threads at once.
    thread::scope(|s| {
        for i in 0..8 {
            let enc = &again;
            s.spawn(move || {
                let text = format!("hello world {i}");
                let tokens = enc.encode_ordinary(&text).unwrap();
                assert_eq!(enc.decode(&tokens, DecodeErrors::Strict).unwrap(), text);
            });
        }
    });
}

#[test]
fn test_unstable_tail() {
    let registry = EncodingRegistry::new(loader());
    let enc = registry.get_encoding("cl100k_base").unwrap();

    let (stable, completions) = enc
        .encode_with_unstable("hello wor", &SpecialPolicy::default())
        .unwrap();
    assert_eq!(stable, vec![259]);

    // " wor" could still grow into " world".
    assert!(completions.contains(&vec![262]));
    assert!(completions.contains(&vec![264]));
}

#[test]
fn test_invalid_utf8_bytes() {
    let registry = EncodingRegistry::new(loader());
    let enc = registry.get_encoding("cl100k_base").unwrap();

    let bytes = b"hello \xe4\xbd";
    let tokens = enc.encode_bytes(bytes).unwrap();
    assert_eq!(enc.decode_bytes(&tokens).unwrap(), bytes);
    assert_eq!(tokens[0], 259);
    assert_eq!(
        enc.decode(&tokens, DecodeErrors::Replace).unwrap(),
        "hello \u{fffd}"
    );
}
