//! # Vocabulary Type Aliases
//!
//! ## Style Hints
//!
//! Instance names should prefer `${SOURCE}_${TARGET}_map`,
//! for example, `span_token_map: SpanTokenMap<T>`.

use std::collections::HashMap;

use crate::{types::TMHashMap, vocab::span_order::SampledSpanBuildHasher};

/// Map from byte spans to ranks; the ordinary ("mergeable") encoder.
///
/// Keyed with [`SampledSpanBuildHasher`]; see [`crate::vocab::span_order`].
pub type SpanTokenMap<T> = HashMap<Vec<u8>, T, SampledSpanBuildHasher>;

/// Map from ranks to byte spans.
pub type TokenSpanMap<T> = TMHashMap<T, Vec<u8>>;

/// Map from special token strings to ranks.
pub type SpecialTokenMap<T> = TMHashMap<String, T>;
