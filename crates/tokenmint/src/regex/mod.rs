//! # Regex Utilities
//!
//! The OpenAI piece patterns use lookahead (`\s+(?!\S)`), which requires the
//! extended machinery of [`fancy_regex`]; special-token alternations are plain
//! escaped unions and run on the faster [`regex`] crate.
//!
//! * Labeling Patterns - [`RegexWrapperPattern`]
//!   * [`RegexWrapperPattern::Basic`] - a pattern which was written for [`regex`].
//!   * [`RegexWrapperPattern::Fancy`] - a pattern which was written for [`fancy_regex`].
//!   * [`RegexWrapperPattern::Adaptive`] - unknown target, try basic; then fall-up to fancy.
//! * Wrapping Compiled Regex - [`RegexWrapper`]

pub mod exact_match_union;
pub mod regex_wrapper;

#[doc(inline)]
pub use regex_wrapper::{ConstRegexWrapperPattern, ErrorWrapper, RegexWrapper, RegexWrapperPattern};
