//! # Encoding
//!
//! The public tokenizer: an immutable [`CoreBpe`] plus a name, with the
//! special token policy and the batch entry points on top.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tokenmint::{DecodeErrors, SpecialPolicy};
//!
//! fn example() -> tokenmint::TMResult<()> {
//!     let enc = tokenmint::get_encoding("cl100k_base")?;
//!
//!     let tokens = enc.encode_ordinary("hello world")?;
//!     assert_eq!(enc.decode(&tokens, DecodeErrors::Strict)?, "hello world");
//!
//!     let policy = SpecialPolicy::default().with_allowed_tokens(["<|endoftext|>"]);
//!     let tokens = enc.encode("hello<|endoftext|>", &policy)?;
//!     assert_eq!(tokens.last().copied(), enc.eot_token());
//!     Ok(())
//! }
//! ```

use core::ops::Range;

use crate::{
    decoders::{DecodeErrors, decode_utf8, token_char_offsets, token_text_ranges},
    encoders::{
        core_bpe::CoreBpe,
        definition::{ENDOFTEXT, EncodingDefinition},
        special_policy::SpecialPolicy,
    },
    errors::{TMResult, TokenmintError},
    rayon::{BatchPool, BatchPools, DEFAULT_BATCH_THREADS},
    types::{TMHashSet, TokenType},
    vocab::Vocabulary,
};

/// A named, ready to use BPE encoding.
///
/// `Encoding` is `Send + Sync`; share it behind an `Arc` and call it from
/// any number of threads.
///
/// Batch methods run on worker pools owned by the encoding. A pool is built
/// the first time its worker count is used and then reused, so each distinct
/// `num_threads` passed to a `*_with_threads` method costs one pool for the
/// life of the encoding.
#[derive(Debug)]
pub struct Encoding<T: TokenType> {
    name: String,
    core: CoreBpe<T>,
    batch_pools: BatchPools,
}

impl<T: TokenType> Encoding<T> {
    /// Build an encoding.
    ///
    /// ## Errors
    /// [`TokenmintError::Construction`] for inconsistent vocabularies;
    /// [`TokenmintError::Regex`] if the pattern does not compile.
    pub fn new(definition: EncodingDefinition<T>) -> TMResult<Self> {
        let EncodingDefinition {
            name,
            pattern,
            mergeable_ranks,
            special_tokens,
            explicit_n_vocab,
        } = definition;

        let vocab = Vocabulary::init(mergeable_ranks, special_tokens, explicit_n_vocab)?;
        let core = CoreBpe::new(vocab, pattern)?;

        log::debug!(
            "built encoding {name}: {} ranks, {} specials",
            core.vocab().mergeable_ranks().len(),
            core.vocab().special_tokens().len()
        );

        Ok(Self {
            name,
            core,
            batch_pools: BatchPools::default(),
        })
    }

    /// The encoding name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The underlying vocabulary.
    pub fn vocab(&self) -> &Vocabulary<T> {
        self.core.vocab()
    }

    /// The policy-free core encoder.
    pub fn core(&self) -> &CoreBpe<T> {
        &self.core
    }

    /// The largest rank.
    pub fn max_token_value(&self) -> T {
        self.vocab().max_token_value()
    }

    /// `max_token_value + 1`.
    pub fn vocab_size(&self) -> usize {
        self.vocab().vocab_size()
    }

    /// The `<|endoftext|>` rank, if this encoding has one.
    pub fn eot_token(&self) -> Option<T> {
        self.vocab().special_rank_of(ENDOFTEXT)
    }

    /// The special token strings.
    pub fn special_tokens_set(&self) -> TMHashSet<&str> {
        self.vocab().special_token_names().collect()
    }

    /// Every ordinary token's bytes, in byte order.
    pub fn token_byte_values(&self) -> &[Vec<u8>] {
        self.vocab().sorted_token_bytes()
    }

    /// Fail if `text` contains a token `policy` disallows.
    fn check_disallowed(
        &self,
        text: &str,
        policy: &SpecialPolicy,
    ) -> TMResult<()> {
        let disallowed = policy.resolve_disallowed(self.vocab().special_token_names());
        match self.core.segmentor().find_disallowed(text, &disallowed)? {
            Some(token) => Err(TokenmintError::DisallowedSpecialToken { token }),
            None => Ok(()),
        }
    }

    /// Encode text, ignoring special tokens.
    ///
    /// Special token strings in `text` are encoded as ordinary text.
    pub fn encode_ordinary(
        &self,
        text: &str,
    ) -> TMResult<Vec<T>> {
        self.core.encode_ordinary(text)
    }

    /// Encode text under a special token policy.
    ///
    /// ## Errors
    /// [`TokenmintError::DisallowedSpecialToken`] if `text` contains a
    /// disallowed special token.
    pub fn encode(
        &self,
        text: &str,
        policy: &SpecialPolicy,
    ) -> TMResult<Vec<T>> {
        self.check_disallowed(text, policy)?;
        let (tokens, _) = self
            .core
            .encode_native(text, |s| policy.allowed.contains(s))?;
        Ok(tokens)
    }

    /// Encode, splitting off the unstable tail and its possible completions.
    ///
    /// ## Returns
    /// `(stable_tokens, completions)`.
    pub fn encode_with_unstable(
        &self,
        text: &str,
        policy: &SpecialPolicy,
    ) -> TMResult<(Vec<T>, TMHashSet<Vec<T>>)> {
        self.check_disallowed(text, policy)?;
        self.core
            .encode_unstable_native(text, |s| policy.allowed.contains(s))
    }

    /// Encode raw bytes; invalid UTF-8 is merged at the byte level.
    pub fn encode_bytes(
        &self,
        bytes: &[u8],
    ) -> TMResult<Vec<T>> {
        self.core.encode_bytes(bytes)
    }

    /// The single rank of `bytes`; ordinary first, then special.
    ///
    /// ## Errors
    /// [`TokenmintError::UnknownSpan`] if `bytes` is not a single token.
    pub fn encode_single_token(
        &self,
        bytes: &[u8],
    ) -> TMResult<T> {
        if let Some(token) = self.vocab().rank_of(bytes) {
            return Ok(token);
        }
        if let Ok(text) = std::str::from_utf8(bytes)
            && let Some(token) = self.vocab().special_rank_of(text)
        {
            return Ok(token);
        }
        Err(TokenmintError::UnknownSpan {
            span: bytes.to_vec(),
        })
    }

    /// Encode `bytes` as one piece, skipping segmentation.
    pub fn encode_single_piece(
        &self,
        bytes: &[u8],
    ) -> TMResult<Vec<T>> {
        self.core.encode_piece(bytes)
    }

    /// The length of [`Encoding::encode`].
    pub fn count_tokens(
        &self,
        text: &str,
        policy: &SpecialPolicy,
    ) -> TMResult<usize> {
        self.encode(text, policy).map(|tokens| tokens.len())
    }

    /// The length of [`Encoding::encode_ordinary`].
    pub fn count_tokens_ordinary(
        &self,
        text: &str,
    ) -> TMResult<usize> {
        self.encode_ordinary(text).map(|tokens| tokens.len())
    }

    /// The number of batch worker pools built so far.
    pub fn num_batch_pools(&self) -> usize {
        self.batch_pools.num_pools()
    }

    /// Concatenate the bytes of `tokens`.
    pub fn decode_bytes(
        &self,
        tokens: &[T],
    ) -> TMResult<Vec<u8>> {
        self.core.decode_bytes(tokens)
    }

    /// Decode `tokens` to text under an error policy.
    pub fn decode(
        &self,
        tokens: &[T],
        errors: DecodeErrors,
    ) -> TMResult<String> {
        decode_utf8(self.decode_bytes(tokens)?, errors)
    }

    /// The bytes of one token.
    ///
    /// ## Errors
    /// [`TokenmintError::UnknownToken`] for a rank in neither table.
    pub fn decode_single_token_bytes(
        &self,
        token: T,
    ) -> TMResult<&[u8]> {
        self.core.token_bytes(token)
    }

    /// The bytes of each token.
    pub fn decode_tokens_bytes(
        &self,
        tokens: &[T],
    ) -> TMResult<Vec<&[u8]>> {
        tokens
            .iter()
            .map(|&t| self.decode_single_token_bytes(t))
            .collect()
    }

    /// Decode, also returning the character offset where each token starts.
    ///
    /// ## Errors
    /// [`TokenmintError::Decode`] if the joined bytes are not valid UTF-8.
    pub fn decode_with_offsets(
        &self,
        tokens: &[T],
    ) -> TMResult<(String, Vec<usize>)> {
        let token_bytes = self.decode_tokens_bytes(tokens)?;
        let offsets = token_char_offsets(token_bytes.iter().copied());
        let text = decode_utf8(token_bytes.concat(), DecodeErrors::Strict)?;
        Ok((text, offsets))
    }

    /// Decode each token on its own (lossily) and concatenate.
    ///
    /// ## Returns
    /// `(text, ranges)` where `ranges[i]` is the byte range (not the character
    /// range) of token `i`'s text within `text`; `&text[ranges[i].clone()]`
    /// is always a valid slice.
    pub fn decode_with_ranges(
        &self,
        tokens: &[T],
    ) -> TMResult<(String, Vec<Range<usize>>)> {
        let token_bytes = self.decode_tokens_bytes(tokens)?;
        Ok(token_text_ranges(token_bytes))
    }

    /// [`Encoding::encode_ordinary`] over a batch, on the default pool.
    pub fn encode_ordinary_batch<S: AsRef<str> + Sync>(
        &self,
        texts: &[S],
    ) -> TMResult<Vec<Vec<T>>> {
        self.encode_ordinary_batch_with_threads(texts, DEFAULT_BATCH_THREADS)
    }

    /// [`Encoding::encode_ordinary`] over a batch, with `num_threads` workers.
    pub fn encode_ordinary_batch_with_threads<S: AsRef<str> + Sync>(
        &self,
        texts: &[S],
        num_threads: usize,
    ) -> TMResult<Vec<Vec<T>>> {
        self.encode_ordinary_batch_on(&self.batch_pools.get(num_threads), texts)
    }

    fn encode_ordinary_batch_on<S: AsRef<str> + Sync>(
        &self,
        pool: &BatchPool,
        texts: &[S],
    ) -> TMResult<Vec<Vec<T>>> {
        pool.try_map(texts, |text| self.encode_ordinary(text.as_ref()))
    }

    /// [`Encoding::encode`] over a batch, on the default pool.
    ///
    /// Fails on the first error; no partial results.
    pub fn encode_batch<S: AsRef<str> + Sync>(
        &self,
        texts: &[S],
        policy: &SpecialPolicy,
    ) -> TMResult<Vec<Vec<T>>> {
        self.encode_batch_with_threads(texts, policy, DEFAULT_BATCH_THREADS)
    }

    /// [`Encoding::encode`] over a batch, with `num_threads` workers.
    pub fn encode_batch_with_threads<S: AsRef<str> + Sync>(
        &self,
        texts: &[S],
        policy: &SpecialPolicy,
        num_threads: usize,
    ) -> TMResult<Vec<Vec<T>>> {
        self.encode_batch_on(&self.batch_pools.get(num_threads), texts, policy)
    }

    fn encode_batch_on<S: AsRef<str> + Sync>(
        &self,
        pool: &BatchPool,
        texts: &[S],
        policy: &SpecialPolicy,
    ) -> TMResult<Vec<Vec<T>>> {
        pool.try_map(texts, |text| self.encode(text.as_ref(), policy))
    }

    /// [`Encoding::decode`] over a batch, on the default pool.
    pub fn decode_batch<B: AsRef<[T]> + Sync>(
        &self,
        batch: &[B],
        errors: DecodeErrors,
    ) -> TMResult<Vec<String>> {
        self.decode_batch_with_threads(batch, errors, DEFAULT_BATCH_THREADS)
    }

    /// [`Encoding::decode`] over a batch, with `num_threads` workers.
    pub fn decode_batch_with_threads<B: AsRef<[T]> + Sync>(
        &self,
        batch: &[B],
        errors: DecodeErrors,
        num_threads: usize,
    ) -> TMResult<Vec<String>> {
        self.batch_pools
            .get(num_threads)
            .try_map(batch, |tokens| self.decode(tokens.as_ref(), errors))
    }

    /// [`Encoding::decode_bytes`] over a batch, on the default pool.
    pub fn decode_bytes_batch<B: AsRef<[T]> + Sync>(
        &self,
        batch: &[B],
    ) -> TMResult<Vec<Vec<u8>>> {
        self.decode_bytes_batch_with_threads(batch, DEFAULT_BATCH_THREADS)
    }

    /// [`Encoding::decode_bytes`] over a batch, with `num_threads` workers.
    pub fn decode_bytes_batch_with_threads<B: AsRef<[T]> + Sync>(
        &self,
        batch: &[B],
        num_threads: usize,
    ) -> TMResult<Vec<Vec<u8>>> {
        self.batch_pools
            .get(num_threads)
            .try_map(batch, |tokens| self.decode_bytes(tokens.as_ref()))
    }
}
