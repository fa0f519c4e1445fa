//! # Byte Pair Merge
//!
//! The merge order is global, not left-to-right: at each step the adjacent
//! pair with the lowest rank anywhere in the piece is merged, ties going to
//! the leftmost pair.
//!
//! Parts live in an arena of boundary nodes, one per byte offset. A merge
//! unlinks one boundary; only the pairs starting at the merged part and at
//! its left neighbour change rank, so only those two are re-ranked. Stale
//! heap entries are skipped by generation.

use core::{cmp::Reverse, ops::Range};
use std::collections::BinaryHeap;

use crate::{
    errors::{TMResult, TokenmintError},
    types::TokenType,
};

const NIL: usize = usize::MAX;

#[derive(Debug, Clone, Copy)]
struct Boundary {
    prev: usize,
    next: usize,
    generation: u32,
    live: bool,
}

struct MergeArena<'p, T, F> {
    piece: &'p [u8],
    nodes: Vec<Boundary>,
    heap: BinaryHeap<Reverse<(T, usize, u32)>>,
    rank_of: F,
}

impl<'p, T, F> MergeArena<'p, T, F>
where
    T: TokenType,
    F: Fn(&[u8]) -> Option<T>,
{
    fn new(
        piece: &'p [u8],
        rank_of: F,
    ) -> Self {
        let n = piece.len();
        // Node `n` is the end sentinel.
        let nodes = (0..=n)
            .map(|i| Boundary {
                prev: if i == 0 { NIL } else { i - 1 },
                next: if i == n { NIL } else { i + 1 },
                generation: 0,
                live: true,
            })
            .collect();

        let mut arena = Self {
            piece,
            nodes,
            heap: BinaryHeap::with_capacity(n),
            rank_of,
        };
        for i in 0..n.saturating_sub(1) {
            arena.rank_pair(i);
        }
        arena
    }

    /// (Re-)rank the pair starting at boundary `i`.
    fn rank_pair(
        &mut self,
        i: usize,
    ) {
        let node = &mut self.nodes[i];
        node.generation = node.generation.wrapping_add(1);
        let generation = node.generation;

        let mid = node.next;
        if mid == NIL || mid == self.piece.len() {
            return;
        }
        let end = self.nodes[mid].next;
        if let Some(rank) = (self.rank_of)(&self.piece[i..end]) {
            self.heap.push(Reverse((rank, i, generation)));
        }
    }

    fn run(&mut self) {
        while let Some(Reverse((_rank, i, generation))) = self.heap.pop() {
            let node = self.nodes[i];
            if !node.live || node.generation != generation {
                continue;
            }

            // Unlink the boundary between the pair.
            let mid = node.next;
            let end = self.nodes[mid].next;
            self.nodes[mid].live = false;
            self.nodes[i].next = end;
            self.nodes[end].prev = i;

            self.rank_pair(i);
            if node.prev != NIL {
                self.rank_pair(node.prev);
            }
        }
    }

    fn spans(&self) -> Vec<Range<usize>> {
        let mut spans = Vec::new();
        let mut i = 0;
        while i < self.piece.len() {
            let next = self.nodes[i].next;
            spans.push(i..next);
            i = next;
        }
        spans
    }
}

/// Merge `piece` into its final spans.
///
/// ## Arguments
/// * `piece` - the bytes of one piece.
/// * `rank_of` - the rank lookup; `None` means "never merge".
///
/// ## Returns
/// Contiguous ranges covering `piece`, in order.
pub fn byte_pair_merge<T, F>(
    piece: &[u8],
    rank_of: F,
) -> Vec<Range<usize>>
where
    T: TokenType,
    F: Fn(&[u8]) -> Option<T>,
{
    match piece.len() {
        0 => vec![],
        1 => vec![0..1],
        _ => {
            let mut arena = MergeArena::new(piece, rank_of);
            arena.run();
            arena.spans()
        }
    }
}

/// Merge `piece` and return the merged spans.
pub fn byte_pair_split<'p, T, F>(
    piece: &'p [u8],
    rank_of: F,
) -> Vec<&'p [u8]>
where
    T: TokenType,
    F: Fn(&[u8]) -> Option<T>,
{
    byte_pair_merge(piece, rank_of)
        .into_iter()
        .map(|r| &piece[r])
        .collect()
}

/// Merge `piece` into ranks.
///
/// A single byte resolves directly. No whole-piece lookup is made; see
/// [`encode_piece`].
///
/// ## Errors
/// [`TokenmintError::UnknownSpan`] if a final span has no rank; with a
/// complete vocabulary this only happens for a missing single byte.
pub fn byte_pair_encode<T, F>(
    piece: &[u8],
    rank_of: F,
) -> TMResult<Vec<T>>
where
    T: TokenType,
    F: Fn(&[u8]) -> Option<T>,
{
    let lookup = |span: &[u8]| {
        rank_of(span).ok_or_else(|| TokenmintError::UnknownSpan {
            span: span.to_vec(),
        })
    };

    if piece.len() == 1 {
        return Ok(vec![lookup(piece)?]);
    }

    byte_pair_merge(piece, &rank_of)
        .into_iter()
        .map(|r| lookup(&piece[r]))
        .collect()
}

/// Encode one piece: a whole-piece vocabulary hit wins, otherwise merge.
pub fn encode_piece<T, F>(
    piece: &[u8],
    rank_of: F,
) -> TMResult<Vec<T>>
where
    T: TokenType,
    F: Fn(&[u8]) -> Option<T>,
{
    match rank_of(piece) {
        Some(token) => Ok(vec![token]),
        None => byte_pair_encode(piece, rank_of),
    }
}
