//! # Vocabulary Test Utilities

use crate::vocab::{SpanTokenMap, io::write_base64_span_map};

/// All 256 single bytes, then `merges` in rank order.
pub fn build_test_span_map(merges: &[&str]) -> SpanTokenMap<u32> {
    let mut span_map: SpanTokenMap<u32> = (0..=255u8).map(|b| (vec![b], b as u32)).collect();
    for (i, s) in merges.iter().enumerate() {
        span_map.insert(s.as_bytes().to_vec(), 256 + i as u32);
    }
    span_map
}

/// [`build_test_span_map`], as a tiktoken rank file.
pub fn build_test_tiktoken_blob(merges: &[&str]) -> Vec<u8> {
    let mut blob = Vec::new();
    write_base64_span_map(&build_test_span_map(merges), &mut blob).unwrap();
    blob
}
