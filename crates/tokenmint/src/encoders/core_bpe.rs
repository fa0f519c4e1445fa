//! # Core BPE Encoder
//!
//! [`CoreBpe`] joins a [`Vocabulary`] with the [`TextSegmentor`] built from
//! its special tokens; it is the policy-free engine behind
//! [`Encoding`](crate::encoders::Encoding).

use crate::{
    encoders::byte_pair::{byte_pair_encode, encode_piece},
    errors::{TMResult, TokenmintError},
    regex::RegexWrapperPattern,
    segmentation::TextSegmentor,
    types::{TMHashSet, TokenType},
    vocab::Vocabulary,
};

/// Tokens whose bytes are all in this set are "all whitespace".
const UNSTABLE_WHITESPACE: [u8; 3] = [b' ', b'\n', b'\t'];

/// Vocabulary + segmentation; no special token policy.
#[derive(Debug, Clone)]
pub struct CoreBpe<T: TokenType> {
    vocab: Vocabulary<T>,
    segmentor: TextSegmentor,
}

impl<T: TokenType> CoreBpe<T> {
    /// Build a core encoder for `vocab`, splitting pieces with `pattern`.
    pub fn new<P: Into<RegexWrapperPattern>>(
        vocab: Vocabulary<T>,
        pattern: P,
    ) -> TMResult<Self> {
        let specials: Vec<&str> = vocab.special_token_names().collect();
        let segmentor = TextSegmentor::from_patterns(pattern, &specials)?;
        Ok(Self { vocab, segmentor })
    }

    /// The vocabulary.
    pub fn vocab(&self) -> &Vocabulary<T> {
        &self.vocab
    }

    /// The segmentor.
    pub fn segmentor(&self) -> &TextSegmentor {
        &self.segmentor
    }

    fn rank_fn(&self) -> impl Fn(&[u8]) -> Option<T> + '_ {
        |span: &[u8]| self.vocab.rank_of(span)
    }

    /// Encode one piece; a whole-piece hit wins.
    pub fn encode_piece(
        &self,
        piece: &[u8],
    ) -> TMResult<Vec<T>> {
        encode_piece(piece, self.rank_fn())
    }

    /// Merge-only encode of arbitrary bytes; no whole-piece lookup.
    pub fn byte_pair_encode(
        &self,
        bytes: &[u8],
    ) -> TMResult<Vec<T>> {
        byte_pair_encode(bytes, self.rank_fn())
    }

    /// Encode ordinary text appending to `tokens`.
    ///
    /// ## Returns
    /// The number of tokens contributed by the final piece; 0 if there was none.
    fn encode_ordinary_append(
        &self,
        text: &str,
        tokens: &mut Vec<T>,
    ) -> TMResult<usize> {
        let mut last_piece_token_len = 0;
        for range in self.segmentor.split_pieces(text) {
            let piece = text[range?].as_bytes();
            match self.vocab.rank_of(piece) {
                Some(token) => {
                    tokens.push(token);
                    last_piece_token_len = 1;
                }
                None => {
                    let merged = self.byte_pair_encode(piece)?;
                    last_piece_token_len = merged.len();
                    tokens.extend(merged);
                }
            }
        }
        Ok(last_piece_token_len)
    }

    /// Encode text with no special token handling.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, text)))]
    pub fn encode_ordinary(
        &self,
        text: &str,
    ) -> TMResult<Vec<T>> {
        let mut tokens = Vec::with_capacity(text.len() / 4 + 1);
        self.encode_ordinary_append(text, &mut tokens)?;
        Ok(tokens)
    }

    /// Encode text, emitting the special tokens `is_allowed` accepts.
    ///
    /// ## Returns
    /// `(tokens, last_piece_token_len)`, where `last_piece_token_len` counts
    /// the tokens of the final ordinary piece; it is 0 when the text ends in a
    /// special token.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, text, is_allowed)))]
    pub fn encode_native<F>(
        &self,
        text: &str,
        is_allowed: F,
    ) -> TMResult<(Vec<T>, usize)>
    where
        F: Fn(&str) -> bool,
    {
        let mut tokens = Vec::with_capacity(text.len() / 4 + 1);
        let mut start = 0;
        let mut last_piece_token_len = 0;
        loop {
            let next_special = self.segmentor.next_special(text, start, &is_allowed)?;
            let end = next_special.as_ref().map_or(text.len(), |m| m.start);

            if start < end {
                last_piece_token_len = self.encode_ordinary_append(&text[start..end], &mut tokens)?;
            }

            match next_special {
                Some(m) => {
                    let special = &text[m.clone()];
                    let token = self.vocab.special_rank_of(special).ok_or_else(|| {
                        TokenmintError::UnknownSpan {
                            span: special.as_bytes().to_vec(),
                        }
                    })?;
                    tokens.push(token);
                    start = m.end;
                    last_piece_token_len = 0;
                }
                None => break,
            }
        }
        Ok((tokens, last_piece_token_len))
    }

    fn is_all_whitespace(
        &self,
        token: T,
    ) -> bool {
        self.vocab
            .ordinary_bytes_of(token)
            .is_some_and(|bytes| bytes.iter().all(|b| UNSTABLE_WHITESPACE.contains(b)))
    }

    /// Extend the unstable tail backward over whitespace-only tokens.
    ///
    /// Applies only when the first token of the tail is itself whitespace-only;
    /// such tokens may merge differently once more text arrives.
    pub fn extend_unstable_whitespace(
        &self,
        tokens: &[T],
        mut last_piece_token_len: usize,
    ) -> usize {
        let n = tokens.len();
        if last_piece_token_len == 0 || last_piece_token_len > n {
            return last_piece_token_len;
        }
        if self.is_all_whitespace(tokens[n - last_piece_token_len]) {
            while last_piece_token_len < n
                && self.is_all_whitespace(tokens[n - last_piece_token_len - 1])
            {
                last_piece_token_len += 1;
            }
        }
        last_piece_token_len
    }

    /// Concatenate the bytes of `tokens`.
    ///
    /// ## Errors
    /// [`TokenmintError::UnknownToken`] for a rank in neither table.
    pub fn decode_bytes(
        &self,
        tokens: &[T],
    ) -> TMResult<Vec<u8>> {
        let mut bytes = Vec::with_capacity(tokens.len() * 4);
        for &token in tokens {
            bytes.extend_from_slice(self.token_bytes(token)?);
        }
        Ok(bytes)
    }

    /// The bytes of one token.
    pub fn token_bytes(
        &self,
        token: T,
    ) -> TMResult<&[u8]> {
        self.vocab
            .bytes_of(token)
            .ok_or_else(|| TokenmintError::UnknownToken {
                token: token.to_u64().unwrap_or(u64::MAX),
            })
    }

    /// Encode, then split off the unstable tail and enumerate its completions.
    ///
    /// ## Returns
    /// `(stable_tokens, completions)`: every completion is a token sequence
    /// which could replace the removed tail once more text is appended.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self, text, is_allowed)))]
    pub fn encode_unstable_native<F>(
        &self,
        text: &str,
        is_allowed: F,
    ) -> TMResult<(Vec<T>, TMHashSet<Vec<T>>)>
    where
        F: Fn(&str) -> bool,
    {
        let (mut tokens, last_piece_token_len) = self.encode_native(text, is_allowed)?;
        let mut completions = TMHashSet::default();
        if last_piece_token_len == 0 {
            return Ok((tokens, completions));
        }

        let last_piece_token_len = self.extend_unstable_whitespace(&tokens, last_piece_token_len);
        let split = tokens.len() - last_piece_token_len;
        let unstable_bytes = self.decode_bytes(&tokens[split..])?;
        tokens.truncate(split);

        if unstable_bytes.is_empty() {
            return Ok((tokens, completions));
        }

        // Single tokens which extend the unstable bytes.
        for span in self.vocab.completions_of(&unstable_bytes) {
            if let Some(token) = self.vocab.rank_of(span) {
                completions.insert(vec![token]);
            }
        }

        // Tokens which could straddle a split point inside the unstable bytes.
        for i in 1..unstable_bytes.len() {
            let (prefix, suffix) = unstable_bytes.split_at(i);
            for span in self.vocab.completions_of(suffix) {
                let possibility = [prefix, span].concat();
                let encoded = match std::str::from_utf8(&possibility) {
                    Ok(s) => self.encode_ordinary(s)?,
                    Err(_) => self.byte_pair_encode(&possibility)?,
                };

                let mut seq = Vec::new();
                let mut seq_len = 0;
                for token in encoded {
                    seq.push(token);
                    seq_len += self.vocab.ordinary_bytes_of(token).map_or(0, <[u8]>::len);
                    if seq_len >= unstable_bytes.len() {
                        break;
                    }
                }
                completions.insert(seq);
            }
        }

        // A trailing whitespace character may later merge with what follows it,
        // leaving the rest of the tail to merge on its own.
        if unstable_bytes.len() > 1
            && let Some((c, width)) = last_char(&unstable_bytes)
            && c.is_whitespace()
            && unstable_bytes.len() > width
        {
            let cut = unstable_bytes.len() - width;
            let mut reencoded = self.byte_pair_encode(&unstable_bytes[..cut])?;
            reencoded.extend(self.byte_pair_encode(&unstable_bytes[cut..])?);
            completions.insert(reencoded);
        }

        Ok((tokens, completions))
    }

    /// Encode arbitrary bytes.
    ///
    /// Valid UTF-8 takes the ordinary path. Otherwise the valid prefix is
    /// encoded, its unstable tail is dropped back to bytes, and the tail plus
    /// the invalid remainder are merged as one unit.
    pub fn encode_bytes(
        &self,
        bytes: &[u8],
    ) -> TMResult<Vec<T>> {
        let valid_up_to = match std::str::from_utf8(bytes) {
            Ok(text) => return self.encode_ordinary(text),
            Err(e) => e.valid_up_to(),
        };

        let text = std::str::from_utf8(&bytes[..valid_up_to]).map_err(|e| {
            TokenmintError::Decode {
                valid_up_to: e.valid_up_to(),
            }
        })?;
        let (mut tokens, last_piece_token_len) = self.encode_native(text, |_| false)?;
        let last_piece_token_len = self.extend_unstable_whitespace(&tokens, last_piece_token_len);

        let mut unstable_bytes;
        if !tokens.is_empty() && last_piece_token_len > 0 {
            let split = tokens.len() - last_piece_token_len;
            unstable_bytes = self.decode_bytes(&tokens[split..])?;
            unstable_bytes.extend_from_slice(&bytes[valid_up_to..]);
            tokens.truncate(split);
        } else {
            unstable_bytes = bytes[valid_up_to..].to_vec();
        }

        if !unstable_bytes.is_empty() {
            tokens.extend(self.encode_piece(&unstable_bytes)?);
        }
        Ok(tokens)
    }
}

/// Decode the last UTF-8 character of `bytes`.
///
/// ## Returns
/// `(char, byte width)`, or `None` if the tail is not a valid character.
fn last_char(bytes: &[u8]) -> Option<(char, usize)> {
    let floor = bytes.len().saturating_sub(4);
    let start = (floor..bytes.len())
        .rev()
        .find(|&i| !(0x80..0xC0).contains(&bytes[i]))?;
    let tail = std::str::from_utf8(&bytes[start..]).ok()?;
    let mut chars = tail.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some((c, tail.len())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{pretrained::openai::OA_R50K_BASE_PATTERN, vocab::SpanTokenMap};

    /// All 256 bytes, plus a handful of merges.
    fn test_core() -> CoreBpe<u32> {
        let mut span_map: SpanTokenMap<u32> = (0..=255u8).map(|b| (vec![b], b as u32)).collect();
        for (i, s) in [
            "he", "ll", "hell", "hello", " w", "or", " wor", "ld", " world", "  ", "\n\n", "Al",
            " Al", "ex", " Alex", "an", " Alan",
        ]
        .iter()
        .enumerate()
        {
            span_map.insert(s.as_bytes().to_vec(), 256 + i as u32);
        }
        let vocab = Vocabulary::init(span_map, [("<|endoftext|>", 300u32)], None).unwrap();
        CoreBpe::new(vocab, OA_R50K_BASE_PATTERN).unwrap()
    }

    fn rank(
        core: &CoreBpe<u32>,
        s: &str,
    ) -> u32 {
        core.vocab().rank_of(s.as_bytes()).unwrap()
    }

    #[test]
    fn test_encode_native_last_piece() {
        let core = test_core();

        let (tokens, lptl) = core.encode_native("hello world", |_| true).unwrap();
        assert_eq!(tokens, vec![rank(&core, "hello"), rank(&core, " world")]);
        assert_eq!(lptl, 1);

        // " qz" is merged from three single bytes.
        let (tokens, lptl) = core.encode_native("hello qz", |_| true).unwrap();
        assert_eq!(tokens.len(), 4);
        assert_eq!(lptl, 3);

        let (tokens, lptl) = core.encode_native("hello<|endoftext|>", |_| true).unwrap();
        assert_eq!(tokens, vec![rank(&core, "hello"), 300]);
        assert_eq!(lptl, 0);

        // Not allowed; encoded as ordinary text.
        let (tokens, _) = core.encode_native("<|endoftext|>", |_| false).unwrap();
        assert!(!tokens.contains(&300));
        assert_eq!(core.decode_bytes(&tokens).unwrap(), b"<|endoftext|>");
    }

    #[test]
    fn test_whitespace_extension() {
        let core = test_core();
        let space = rank(&core, " ");
        let double = rank(&core, "  ");
        let nl = rank(&core, "\n\n");
        let hello = rank(&core, "hello");

        // Tail is a whitespace token; extend over preceding whitespace tokens.
        let tokens = vec![hello, nl, double, space];
        assert_eq!(core.extend_unstable_whitespace(&tokens, 1), 3);

        // Tail is not whitespace; no extension.
        let tokens = vec![nl, hello];
        assert_eq!(core.extend_unstable_whitespace(&tokens, 1), 1);

        // All whitespace; stops at the front.
        let tokens = vec![space, space];
        assert_eq!(core.extend_unstable_whitespace(&tokens, 1), 2);

        assert_eq!(core.extend_unstable_whitespace(&tokens, 0), 0);
    }

    #[test]
    fn test_unstable_completions() {
        let core = test_core();
        let (stable, completions) = core
            .encode_unstable_native("hello world Al", |_| true)
            .unwrap();

        assert_eq!(stable, vec![rank(&core, "hello"), rank(&core, " world")]);
        assert!(!completions.is_empty());

        // The whole tail as one token, and its longer extensions.
        assert!(completions.contains(&vec![rank(&core, " Al")]));
        assert!(completions.contains(&vec![rank(&core, " Alex")]));
        assert!(completions.contains(&vec![rank(&core, " Alan")]));

        for seq in &completions {
            let bytes = core.decode_bytes(seq).unwrap();
            assert!(bytes.starts_with(b" Al") || b" Al".starts_with(&bytes[..]));
        }
    }

    #[test]
    fn test_unstable_ends_in_special() {
        let core = test_core();
        let (stable, completions) = core
            .encode_unstable_native("hello<|endoftext|>", |_| true)
            .unwrap();
        assert_eq!(stable, vec![rank(&core, "hello"), 300]);
        assert!(completions.is_empty());
    }

    #[test]
    fn test_unstable_trailing_whitespace() {
        let core = test_core();
        let (stable, completions) = core
            .encode_unstable_native("hello \n", |_| true)
            .unwrap();
        assert_eq!(stable, vec![rank(&core, "hello")]);

        // The two-way split of the tail.
        assert!(completions.contains(&vec![rank(&core, " "), rank(&core, "\n")]));
    }

    #[test]
    fn test_encode_bytes() {
        let core = test_core();

        assert_eq!(
            core.encode_bytes(b"hello world").unwrap(),
            core.encode_ordinary("hello world").unwrap()
        );

        let bytes = b"hello \xff";
        let tokens = core.encode_bytes(bytes).unwrap();
        assert_eq!(core.decode_bytes(&tokens).unwrap(), bytes);
        assert_eq!(tokens[0], rank(&core, "hello"));

        let tokens = core.encode_bytes(b"\xe2\x82").unwrap();
        assert_eq!(tokens, vec![0xe2, 0x82]);
    }

    #[test]
    fn test_decode_unknown() {
        let core = test_core();
        assert!(matches!(
            core.decode_bytes(&[1, 9999]),
            Err(TokenmintError::UnknownToken { token: 9999 })
        ));
    }

    #[test]
    fn test_last_char() {
        assert_eq!(last_char(b"ab "), Some((' ', 1)));
        assert_eq!(last_char("a€".as_bytes()), Some(('€', 3)));
        assert_eq!(last_char(b"a\xe2\x82"), None);
        assert_eq!(last_char(b""), None);
    }
}
