//! # Regex Wrapper
//! This modules provides mechanisms to mix `regex` and `fancy_regex` types.

use core::{fmt::Debug, ops::Range};

/// Error wrapper for regex patterns.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub enum ErrorWrapper {
    /// Error from `regex`.
    Basic(regex::Error),

    /// Error from `fancy_regex`.
    Fancy(fancy_regex::Error),
}

impl From<regex::Error> for ErrorWrapper {
    fn from(err: regex::Error) -> Self {
        Self::Basic(err)
    }
}

impl From<fancy_regex::Error> for ErrorWrapper {
    fn from(err: fancy_regex::Error) -> Self {
        Self::Fancy(err)
    }
}

impl core::fmt::Display for ErrorWrapper {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        match self {
            Self::Basic(err) => core::fmt::Display::fmt(err, f),
            Self::Fancy(err) => core::fmt::Display::fmt(err, f),
        }
    }
}

impl core::error::Error for ErrorWrapper {}

/// A pattern known at compile time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstRegexWrapperPattern {
    /// This is a pattern for the `regex` crate.
    Basic(&'static str),

    /// This is a pattern for the `fancy_regex` crate.
    Fancy(&'static str),
}

impl ConstRegexWrapperPattern {
    /// Get the underlying regex pattern.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic(pattern) => pattern,
            Self::Fancy(pattern) => pattern,
        }
    }

    /// Convert to [`RegexWrapperPattern`].
    pub fn to_pattern(self) -> RegexWrapperPattern {
        self.into()
    }
}

impl From<ConstRegexWrapperPattern> for RegexWrapperPattern {
    fn from(pattern: ConstRegexWrapperPattern) -> Self {
        use ConstRegexWrapperPattern::*;
        match pattern {
            Basic(pattern) => RegexWrapperPattern::Basic(pattern.to_string()),
            Fancy(pattern) => RegexWrapperPattern::Fancy(pattern.to_string()),
        }
    }
}

/// Label for regex patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegexWrapperPattern {
    /// This is a pattern for the `regex` crate.
    Basic(String),

    /// This is a pattern for the `fancy_regex` crate.
    Fancy(String),

    /// This pattern will try the `regex` crate first,
    /// and fallback to `fancy_regex` if it fails.
    Adaptive(String),
}

impl From<&str> for RegexWrapperPattern {
    fn from(pattern: &str) -> Self {
        Self::Adaptive(pattern.to_string())
    }
}

impl From<String> for RegexWrapperPattern {
    fn from(pattern: String) -> Self {
        Self::Adaptive(pattern)
    }
}

impl RegexWrapperPattern {
    /// Get the underlying regex pattern.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Basic(pattern) => pattern,
            Self::Fancy(pattern) => pattern,
            Self::Adaptive(pattern) => pattern,
        }
    }

    /// Compile the regex pattern into a [`RegexWrapper`].
    ///
    /// `Adaptive` patterns report the `fancy_regex` error when both engines reject them.
    pub fn compile(&self) -> Result<RegexWrapper, ErrorWrapper> {
        match self {
            Self::Basic(pattern) => regex::Regex::new(pattern)
                .map(RegexWrapper::from)
                .map_err(ErrorWrapper::from),
            Self::Fancy(pattern) => fancy_regex::Regex::new(pattern)
                .map(RegexWrapper::from)
                .map_err(ErrorWrapper::from),
            Self::Adaptive(pattern) => regex::Regex::new(pattern)
                .map(RegexWrapper::from)
                .or_else(|_| {
                    fancy_regex::Regex::new(pattern)
                        .map(RegexWrapper::from)
                        .map_err(ErrorWrapper::from)
                }),
        }
    }
}

/// Wrapper for compiled regex patterns.
#[derive(Debug, Clone)]
pub enum RegexWrapper {
    /// Wrapper for `regex::Regex`.
    Basic(regex::Regex),

    /// Wrapper for `fancy_regex::Regex`.
    Fancy(fancy_regex::Regex),
}

impl From<regex::Regex> for RegexWrapper {
    fn from(regex: regex::Regex) -> Self {
        Self::Basic(regex)
    }
}

impl From<fancy_regex::Regex> for RegexWrapper {
    fn from(regex: fancy_regex::Regex) -> Self {
        Self::Fancy(regex)
    }
}

impl RegexWrapper {
    /// Is this `Fancy`?
    pub fn is_fancy(&self) -> bool {
        matches!(self, Self::Fancy(_))
    }

    /// Get the underlying regex pattern.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Basic(regex) => regex.as_str(),
            Self::Fancy(regex) => regex.as_str(),
        }
    }

    /// Iterate over the non-overlapping match ranges in `haystack`.
    pub fn find_iter<'r, 'h>(
        &'r self,
        haystack: &'h str,
    ) -> MatchesWrapper<'r, 'h> {
        self.find_iter_from(haystack, 0)
    }

    /// Iterate over the match ranges in `haystack[start..]`.
    ///
    /// Ranges are reported relative to the full `haystack`.
    pub fn find_iter_from<'r, 'h>(
        &'r self,
        haystack: &'h str,
        start: usize,
    ) -> MatchesWrapper<'r, 'h> {
        let tail = &haystack[start..];
        let inner = match self {
            Self::Basic(regex) => MatchesInner::Regex(regex.find_iter(tail)),
            Self::Fancy(regex) => MatchesInner::FancyRegex(regex.find_iter(tail)),
        };
        MatchesWrapper {
            inner,
            offset: start,
        }
    }
}

enum MatchesInner<'r, 'h> {
    Regex(regex::Matches<'r, 'h>),
    FancyRegex(fancy_regex::Matches<'r, 'h>),
}

/// Iterator over match ranges.
///
/// `fancy_regex` can fail mid-scan (e.g. on backtrack limits);
/// such failures are yielded rather than swallowed.
pub struct MatchesWrapper<'r, 'h> {
    inner: MatchesInner<'r, 'h>,
    offset: usize,
}

impl Iterator for MatchesWrapper<'_, '_> {
    type Item = Result<Range<usize>, ErrorWrapper>;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.offset;
        let shift = |r: Range<usize>| (r.start + offset)..(r.end + offset);
        match &mut self.inner {
            MatchesInner::Regex(matches) => matches.next().map(|m| Ok(shift(m.range()))),
            MatchesInner::FancyRegex(matches) => matches.next().map(|m| {
                m.map(|m| shift(m.range()))
                    .map_err(ErrorWrapper::from)
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adaptive_falls_up_to_fancy() {
        let basic = RegexWrapperPattern::from(r"\p{L}+").compile().unwrap();
        assert!(!basic.is_fancy());

        let fancy = RegexWrapperPattern::from(r"\s+(?!\S)").compile().unwrap();
        assert!(fancy.is_fancy());
    }

    #[test]
    fn test_find_iter_from_offsets() {
        let re = RegexWrapperPattern::Fancy(r"\d+".to_string())
            .compile()
            .unwrap();
        let text = "a1 b22 c333";

        let all = re
            .find_iter(text)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(all, vec![1..2, 4..6, 8..11]);

        let tail = re
            .find_iter_from(text, 3)
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(tail, vec![4..6, 8..11]);
    }

    #[test]
    fn test_bad_pattern() {
        assert!(
            RegexWrapperPattern::Basic("(unclosed".to_string())
                .compile()
                .is_err()
        );
    }
}
