//! # Token Offsets
//!
//! Map each token of a decode back onto the decoded text.

use core::ops::Range;

fn is_continuation(b: u8) -> bool {
    (0x80..0xC0).contains(&b)
}

/// The character offset at which each token starts in the decoded text.
///
/// A token that starts with a UTF-8 continuation byte begins in the middle
/// of a character; it is attributed to the character it continues.
pub fn token_char_offsets<'a, I>(token_bytes: I) -> Vec<usize>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut text_len = 0usize;
    token_bytes
        .into_iter()
        .map(|bytes| {
            let continues = bytes.first().copied().is_some_and(is_continuation);
            let offset = text_len.saturating_sub(continues as usize);
            text_len += bytes.iter().filter(|&&b| !is_continuation(b)).count();
            offset
        })
        .collect()
}

/// Decode each token on its own (lossily) and concatenate.
///
/// ## Returns
/// `(text, ranges)` where `ranges[i]` is the byte range of token `i`'s
/// text within `text`.
pub fn token_text_ranges<'a, I>(token_bytes: I) -> (String, Vec<Range<usize>>)
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut text = String::new();
    let ranges = token_bytes
        .into_iter()
        .map(|bytes| {
            let start = text.len();
            text.push_str(&String::from_utf8_lossy(bytes));
            start..text.len()
        })
        .collect();
    (text, ranges)
}
