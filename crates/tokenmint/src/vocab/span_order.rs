//! # Byte Span Ordering and Hashing
//!
//! Vocabulary keys are raw byte spans. Two contracts share them:
//!
//! * map keys need exact equality plus a hash;
//! * the sorted completion index needs a total order.
//!
//! The order is plain lexicographic byte order, where a strict prefix sorts
//! before its extensions. The hash samples at most [`HASH_SAMPLES`] evenly
//! spaced bytes; every hit is confirmed by an exact byte compare.

use core::{
    cmp::Ordering,
    hash::{BuildHasher, Hasher},
    ops::Range,
};

/// The maximum number of bytes sampled by [`SampledSpanHasher`].
pub const HASH_SAMPLES: usize = 8;

const HASH_SEED: u64 = 47;
const HASH_MULTIPLIER: u64 = 61;

/// Total order over byte spans.
///
/// Compares the first differing byte numerically; when one span is a strict
/// prefix of the other, the shorter span sorts first.
pub fn compare_spans(
    a: &[u8],
    b: &[u8],
) -> Ordering {
    let common = a.len().min(b.len());
    for i in 0..common {
        match a[i].cmp(&b[i]) {
            Ordering::Equal => continue,
            ord => return ord,
        }
    }
    a.len().cmp(&b.len())
}

/// Sampled rolling hash over a byte span.
///
/// Feed spans through [`Hasher::write`]; the `[u8]`/`Vec<u8>` `Hash` impls
/// deliver the whole span in one call, after a length prefix.
#[derive(Debug, Clone, Copy)]
pub struct SampledSpanHasher {
    state: u64,
}

impl Default for SampledSpanHasher {
    fn default() -> Self {
        Self { state: HASH_SEED }
    }
}

impl Hasher for SampledSpanHasher {
    fn write(
        &mut self,
        bytes: &[u8],
    ) {
        let step = (bytes.len() / HASH_SAMPLES).max(1);
        for &b in bytes.iter().step_by(step) {
            self.state = self
                .state
                .wrapping_mul(HASH_MULTIPLIER)
                .wrapping_add(b as u64);
        }
    }

    fn write_usize(
        &mut self,
        i: usize,
    ) {
        self.state = self
            .state
            .wrapping_mul(HASH_MULTIPLIER)
            .wrapping_add(i as u64);
    }

    fn finish(&self) -> u64 {
        // The rolling state is small for short spans; spread it over the high
        // bits the table uses for probing.
        let mut h = self.state;
        h ^= h >> 33;
        h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
        h ^= h >> 33;
        h = h.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
        h ^ (h >> 33)
    }
}

/// [`BuildHasher`] for [`SampledSpanHasher`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SampledSpanBuildHasher;

impl BuildHasher for SampledSpanBuildHasher {
    type Hasher = SampledSpanHasher;

    fn build_hasher(&self) -> Self::Hasher {
        SampledSpanHasher::default()
    }
}

/// Sort spans with [`compare_spans`].
pub fn sorted_spans<I>(spans: I) -> Vec<Vec<u8>>
where
    I: IntoIterator<Item = Vec<u8>>,
{
    let mut spans: Vec<Vec<u8>> = spans.into_iter().collect();
    spans.sort_unstable_by(|a, b| compare_spans(a, b));
    spans
}

/// The index range of the entries in `sorted` which start with `prefix`.
///
/// `sorted` must be ordered by [`compare_spans`]; the matching entries are
/// contiguous and begin at the lower bound of `prefix`.
pub fn prefix_range<S: AsRef<[u8]>>(
    sorted: &[S],
    prefix: &[u8],
) -> Range<usize> {
    let start = sorted.partition_point(|s| compare_spans(s.as_ref(), prefix) == Ordering::Less);
    let len = sorted[start..]
        .iter()
        .take_while(|s| s.as_ref().starts_with(prefix))
        .count();
    start..start + len
}

#[cfg(test)]
mod tests {
    use core::hash::Hash;

    use super::*;

    fn hash_of(span: &[u8]) -> u64 {
        let mut h = SampledSpanBuildHasher.build_hasher();
        span.hash(&mut h);
        h.finish()
    }

    #[test]
    fn test_compare_spans() {
        assert_eq!(compare_spans(b"", b""), Ordering::Equal);
        assert_eq!(compare_spans(b"", b"a"), Ordering::Less);
        assert_eq!(compare_spans(b"ab", b"abc"), Ordering::Less);
        assert_eq!(compare_spans(b"abc", b"ab"), Ordering::Greater);
        assert_eq!(compare_spans(b"abd", b"abc"), Ordering::Greater);
        assert_eq!(compare_spans(b"b", b"abc"), Ordering::Greater);
        assert_eq!(compare_spans(&[0x7f], &[0x80]), Ordering::Less);
        assert_eq!(compare_spans(&[0xff, 0x00], &[0xff, 0x00]), Ordering::Equal);
    }

    #[test]
    fn test_compare_agrees_with_slice_order() {
        let spans: [&[u8]; 6] = [b"", b"a", b"ab", b"b", b"\xff", b"a\x00"];
        for a in spans {
            for b in spans {
                assert_eq!(compare_spans(a, b), a.cmp(b));
            }
        }
    }

    #[test]
    fn test_hash_vec_and_slice_agree() {
        let v: Vec<u8> = b"hello world".to_vec();
        let mut h = SampledSpanBuildHasher.build_hasher();
        v.hash(&mut h);
        assert_eq!(h.finish(), hash_of(b"hello world"));
    }

    #[test]
    fn test_hash_sampling() {
        // Long spans differing only in an unsampled position collide;
        // the map still tells them apart by exact compare.
        let a = vec![b'x'; 64];
        let mut b = a.clone();
        b[1] = b'y';
        assert_eq!(hash_of(&a), hash_of(&b));

        let mut map: std::collections::HashMap<Vec<u8>, u32, SampledSpanBuildHasher> =
            Default::default();
        map.insert(a.clone(), 1);
        map.insert(b.clone(), 2);
        assert_eq!(map.get(a.as_slice()), Some(&1));
        assert_eq!(map.get(b.as_slice()), Some(&2));

        // Short spans are hashed in full.
        assert_ne!(hash_of(b"ab"), hash_of(b"ba"));
        assert_ne!(hash_of(b"a"), hash_of(b"a\x00"));
    }

    #[test]
    fn test_prefix_range() {
        let sorted = sorted_spans(
            ["b", "abc", "a", "ab", "abd", "ac", ""]
                .iter()
                .map(|s| s.as_bytes().to_vec()),
        );
        assert_eq!(
            sorted,
            vec![
                b"".to_vec(),
                b"a".to_vec(),
                b"ab".to_vec(),
                b"abc".to_vec(),
                b"abd".to_vec(),
                b"ac".to_vec(),
                b"b".to_vec(),
            ]
        );

        assert_eq!(prefix_range(&sorted, b"ab"), 2..5);
        assert_eq!(prefix_range(&sorted, b"a"), 1..6);
        assert_eq!(prefix_range(&sorted, b"abcd"), 4..4);
        assert_eq!(prefix_range(&sorted, b"z"), 7..7);
        assert_eq!(prefix_range(&sorted, b""), 0..7);
    }
}
