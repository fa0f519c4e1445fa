//! # Vocabulary Store
//!
//! [`Vocabulary`] is immutable after [`Vocabulary::init`]; encoders share it
//! read-only across threads.

use crate::{
    errors::{TMResult, TokenmintError},
    types::TokenType,
    vocab::{
        span_order::{prefix_range, sorted_spans},
        vocab_types::{SpanTokenMap, SpecialTokenMap, TokenSpanMap},
    },
};

/// The ordinary and special rank tables of an encoding.
#[derive(Debug, Clone)]
pub struct Vocabulary<T: TokenType> {
    encoder: SpanTokenMap<T>,
    decoder: TokenSpanMap<T>,
    special_encoder: SpecialTokenMap<T>,
    special_decoder: TokenSpanMap<T>,
    sorted_token_bytes: Vec<Vec<u8>>,
    max_token_value: T,
}

impl<T: TokenType> Vocabulary<T> {
    /// Build a vocabulary.
    ///
    /// ## Arguments
    /// * `mergeable_ranks` - the ordinary span to rank map.
    /// * `special_tokens` - the special token strings and their ranks.
    /// * `explicit_n_vocab` - an optional expected vocabulary size.
    ///
    /// ## Errors
    /// [`TokenmintError::Construction`] when two spans (or two specials) share a
    /// rank, or when `explicit_n_vocab` disagrees with the tables.
    pub fn init<I, S>(
        mergeable_ranks: SpanTokenMap<T>,
        special_tokens: I,
        explicit_n_vocab: Option<usize>,
    ) -> TMResult<Self>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
    {
        let special_encoder: SpecialTokenMap<T> = special_tokens
            .into_iter()
            .map(|(s, t)| (s.into(), t))
            .collect();

        let decoder: TokenSpanMap<T> = mergeable_ranks
            .iter()
            .map(|(span, &token)| (token, span.clone()))
            .collect();
        if decoder.len() != mergeable_ranks.len() {
            return Err(TokenmintError::Construction(format!(
                "encoder and decoder must be of equal length ({} spans, {} distinct ranks); \
                 maybe you had duplicate token indices in your encoder?",
                mergeable_ranks.len(),
                decoder.len()
            )));
        }

        let special_decoder: TokenSpanMap<T> = special_encoder
            .iter()
            .map(|(s, &token)| (token, s.as_bytes().to_vec()))
            .collect();
        if special_decoder.len() != special_encoder.len() {
            return Err(TokenmintError::Construction(
                "duplicate special token ranks".to_string(),
            ));
        }

        let max_token_value = mergeable_ranks
            .values()
            .chain(special_encoder.values())
            .copied()
            .max()
            .ok_or_else(|| TokenmintError::Construction("empty vocabulary".to_string()))?;

        if let Some(n_vocab) = explicit_n_vocab {
            let total = mergeable_ranks.len() + special_encoder.len();
            if total != n_vocab {
                return Err(TokenmintError::Construction(format!(
                    "expected {n_vocab} tokens, found {total}"
                )));
            }
            if max_token_value.to_usize() != n_vocab.checked_sub(1) {
                return Err(TokenmintError::Construction(format!(
                    "expected max token value {}, found {max_token_value}",
                    n_vocab.saturating_sub(1)
                )));
            }
        }

        let sorted_token_bytes = sorted_spans(mergeable_ranks.keys().cloned());

        Ok(Self {
            encoder: mergeable_ranks,
            decoder,
            special_encoder,
            special_decoder,
            sorted_token_bytes,
            max_token_value,
        })
    }

    /// The ordinary rank of a span.
    pub fn rank_of(
        &self,
        span: &[u8],
    ) -> Option<T> {
        self.encoder.get(span).copied()
    }

    /// The rank of a special token string.
    pub fn special_rank_of(
        &self,
        token: &str,
    ) -> Option<T> {
        self.special_encoder.get(token).copied()
    }

    /// The bytes of a rank; ordinary ranks first, then special ranks.
    pub fn bytes_of(
        &self,
        token: T,
    ) -> Option<&[u8]> {
        self.decoder
            .get(&token)
            .or_else(|| self.special_decoder.get(&token))
            .map(Vec::as_slice)
    }

    /// The bytes of an ordinary rank.
    pub fn ordinary_bytes_of(
        &self,
        token: T,
    ) -> Option<&[u8]> {
        self.decoder.get(&token).map(Vec::as_slice)
    }

    /// Is this a special token rank?
    pub fn is_special(
        &self,
        token: T,
    ) -> bool {
        self.special_decoder.contains_key(&token)
    }

    /// The ordinary spans in byte order.
    pub fn sorted_token_bytes(&self) -> &[Vec<u8>] {
        &self.sorted_token_bytes
    }

    /// The ordinary spans which start with `prefix`, in byte order.
    pub fn completions_of<'a>(
        &'a self,
        prefix: &[u8],
    ) -> impl Iterator<Item = &'a [u8]> + use<'a, T> {
        self.sorted_token_bytes[prefix_range(&self.sorted_token_bytes, prefix)]
            .iter()
            .map(Vec::as_slice)
    }

    /// The ordinary span to rank map.
    pub fn mergeable_ranks(&self) -> &SpanTokenMap<T> {
        &self.encoder
    }

    /// The special token map.
    pub fn special_tokens(&self) -> &SpecialTokenMap<T> {
        &self.special_encoder
    }

    /// The special token strings.
    pub fn special_token_names(&self) -> impl Iterator<Item = &str> {
        self.special_encoder.keys().map(String::as_str)
    }

    /// The largest rank in either table.
    pub fn max_token_value(&self) -> T {
        self.max_token_value
    }

    /// `max_token_value + 1`.
    pub fn vocab_size(&self) -> usize {
        self.max_token_value
            .to_usize()
            .map_or(usize::MAX, |m| m.saturating_add(1))
    }
}
