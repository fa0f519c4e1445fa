//! # Text Segmentor

use core::ops::Range;

use crate::{
    errors::{TMResult, TokenmintError},
    regex::{RegexWrapper, RegexWrapperPattern, exact_match_union::exact_match_union_regex_pattern},
    types::TMHashSet,
};

/// Piece splitting + special token scanning.
///
/// Holds the two compiled patterns of an encoding:
/// * the piece pattern, which cuts ordinary text into pieces;
/// * the special pattern, an escaped union over every special token string.
#[derive(Debug, Clone)]
pub struct TextSegmentor {
    piece_re: RegexWrapper,
    special_re: Option<RegexWrapper>,
    specials: TMHashSet<String>,
}

/// Sort specials so that, at any given position, the longest token wins.
fn union_order<S: AsRef<str>>(specials: &[S]) -> Vec<&str> {
    let mut specials: Vec<&str> = specials.iter().map(|s| s.as_ref()).collect();
    specials.sort_unstable_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    specials.dedup();
    specials
}

fn compile_union<S: AsRef<str>>(specials: &[S]) -> TMResult<Option<RegexWrapper>> {
    if specials.is_empty() {
        return Ok(None);
    }
    Ok(Some(
        exact_match_union_regex_pattern(&union_order(specials)).compile()?,
    ))
}

impl TextSegmentor {
    /// Create a new text segmentor with the given piece pattern and special tokens.
    ///
    /// ## Arguments
    /// * `piece_pattern` - The piece split pattern.
    /// * `specials` - A slice of special token strings.
    pub fn from_patterns<P, S>(
        piece_pattern: P,
        specials: &[S],
    ) -> TMResult<Self>
    where
        P: Into<RegexWrapperPattern>,
        S: AsRef<str>,
    {
        let piece_re = piece_pattern.into().compile()?;
        let special_re = compile_union(specials)?;

        Ok(Self {
            piece_re,
            special_re,
            specials: specials.iter().map(|s| s.as_ref().to_string()).collect(),
        })
    }

    /// Get the piece split regex.
    pub fn piece_regex(&self) -> &RegexWrapper {
        &self.piece_re
    }

    /// Get the optional special token regex.
    pub fn special_regex(&self) -> Option<&RegexWrapper> {
        self.special_re.as_ref()
    }

    /// Iterate over the ordinary pieces of `text`, left to right.
    ///
    /// `text` must not contain special tokens which should be honored;
    /// cut it at [`TextSegmentor::next_special`] first.
    pub fn split_pieces<'a>(
        &'a self,
        text: &'a str,
    ) -> impl Iterator<Item = TMResult<Range<usize>>> + 'a {
        self.piece_re
            .find_iter(text)
            .map(|m| m.map_err(TokenmintError::from))
    }

    /// Find the next allowed special token at or after `start`.
    ///
    /// Matches which `is_allowed` rejects are skipped; scanning resumes one
    /// character after the start of the rejected match.
    pub fn next_special<F>(
        &self,
        text: &str,
        start: usize,
        is_allowed: F,
    ) -> TMResult<Option<Range<usize>>>
    where
        F: Fn(&str) -> bool,
    {
        let Some(special_re) = self.special_re.as_ref() else {
            return Ok(None);
        };

        let mut start_find = start;
        while start_find <= text.len() {
            let Some(m) = special_re.find_iter_from(text, start_find).next() else {
                return Ok(None);
            };
            let m = m?;
            if is_allowed(&text[m.clone()]) {
                return Ok(Some(m));
            }
            start_find = m.start + text[m.start..].chars().next().map_or(1, char::len_utf8);
        }
        Ok(None)
    }

    /// Find the first literal occurrence of any `disallowed` token in `text`.
    ///
    /// Reuses the compiled special pattern when `disallowed` is exactly the
    /// set of known special tokens.
    pub fn find_disallowed<S: AsRef<str>>(
        &self,
        text: &str,
        disallowed: &[S],
    ) -> TMResult<Option<String>> {
        if disallowed.is_empty() {
            return Ok(None);
        }

        let covers_specials = disallowed.len() == self.specials.len()
            && disallowed.iter().all(|s| self.specials.contains(s.as_ref()));

        let adhoc;
        let re = if covers_specials && let Some(re) = self.special_re.as_ref() {
            re
        } else {
            adhoc = compile_union(disallowed)?;
            match adhoc.as_ref() {
                Some(re) => re,
                None => return Ok(None),
            }
        };

        match re.find_iter(text).next() {
            Some(m) => Ok(Some(text[m?].to_string())),
            None => Ok(None),
        }
    }
}
