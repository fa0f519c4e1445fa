//! # `DataGym` Vocabulary
//!
//! The legacy GPT-2 release ships two files:
//!
//! * `vocab.bpe` - a version line, then one `{FIRST} {SECOND}` merge per line,
//!   in rank order;
//! * `encoder.json` - a `{"span": rank}` object used as a cross-check.
//!
//! Spans are written as "mojibake": every byte is shown as a printable
//! character so that the files are whitespace-delimited text.

use std::{collections::HashMap, io::BufRead};

use crate::{
    errors::{TMResult, TokenmintError},
    types::{TMHashMap, TokenType},
    vocab::vocab_types::SpanTokenMap,
};

/// Special tokens present in `encoder.json` but not in `vocab.bpe`.
pub const DATAGYM_ENCODER_SPECIALS: [&str; 2] = ["<|endoftext|>", "<|startoftext|>"];

/// A map from mojibake characters to their byte representation.
pub type MojibakeMap = TMHashMap<char, u8>;

/// Decode a string of mojibake characters into bytes.
pub fn decode_mojibake(
    map: &MojibakeMap,
    value: &str,
) -> TMResult<Vec<u8>> {
    value
        .chars()
        .map(|c| {
            map.get(&c).copied().ok_or_else(|| {
                TokenmintError::Parse(format!("unexpected data gym character {c:?}"))
            })
        })
        .collect()
}

/// Builds the mojibake map, and the byte order of the first 256 ranks.
///
/// Printable non-space bytes stand for themselves; the remaining 68 bytes are
/// shifted, in order, to the characters `U+0100..`.
pub fn datagym_base_maps() -> (MojibakeMap, Vec<u8>) {
    let mut rank_to_byte: Vec<u8> = vec![];
    rank_to_byte.extend(0x21..=0x7E);
    rank_to_byte.extend(0xA1..=0xAC);
    rank_to_byte.extend(0xAE..=0xFF);

    let mut mojibake_map: MojibakeMap = rank_to_byte.iter().map(|&b| (char::from(b), b)).collect();

    let mut n = 0u32;
    for b in 0..=255u8 {
        if !rank_to_byte.contains(&b) {
            rank_to_byte.push(b);
            if let Some(c) = char::from_u32(256 + n) {
                mojibake_map.insert(c, b);
            }
            n += 1;
        }
    }

    (mojibake_map, rank_to_byte)
}

/// Read a data gym `vocab.bpe` file.
///
/// Ranks `0..256` are the single bytes, in [`datagym_base_maps`] order;
/// each merge line then takes the next rank.
pub fn read_datagym_vocab_bpe<T, R>(vocab_bpe_reader: R) -> TMResult<SpanTokenMap<T>>
where
    T: TokenType,
    R: BufRead,
{
    let (mojibake_map, rank_to_byte) = datagym_base_maps();

    let to_token = |n: usize| {
        T::from_usize(n).ok_or_else(|| TokenmintError::Parse(format!("rank {n} out of range")))
    };

    let mut span_map = SpanTokenMap::default();
    for (rank, b) in rank_to_byte.into_iter().enumerate() {
        span_map.insert(vec![b], to_token(rank)?);
    }

    let mut n = span_map.len();
    for (idx, line) in vocab_bpe_reader.lines().enumerate().skip(1) {
        let line = line?;
        let mut parts = line.split_whitespace();
        let (first, second) = match (parts.next(), parts.next(), parts.next()) {
            (None, _, _) => continue,
            (Some(first), Some(second), None) => (first, second),
            _ => {
                return Err(TokenmintError::Parse(format!(
                    "vocab.bpe line {}: expected two merge parts",
                    idx + 1
                )));
            }
        };

        let mut key = decode_mojibake(&mojibake_map, first)?;
        key.extend(decode_mojibake(&mojibake_map, second)?);
        span_map.insert(key, to_token(n)?);
        n += 1;
    }

    Ok(span_map)
}

/// Read a data gym `encoder.json` file, dropping [`DATAGYM_ENCODER_SPECIALS`].
pub fn read_datagym_encoder_json<T, R>(encoder_json_reader: R) -> TMResult<SpanTokenMap<T>>
where
    T: TokenType,
    R: BufRead,
{
    let (mojibake_map, _) = datagym_base_maps();

    let encoder_json: HashMap<String, u64> = serde_json::from_reader(encoder_json_reader)
        .map_err(|e| TokenmintError::Parse(format!("encoder.json: {e}")))?;

    let mut span_map = SpanTokenMap::default();
    for (key, rank) in encoder_json {
        if DATAGYM_ENCODER_SPECIALS.contains(&key.as_str()) {
            continue;
        }
        let token = T::from_u64(rank)
            .ok_or_else(|| TokenmintError::Parse(format!("rank {rank} out of range")))?;
        span_map.insert(decode_mojibake(&mojibake_map, &key)?, token);
    }

    Ok(span_map)
}

/// Read a data gym vocabulary, cross-checked against its `encoder.json`.
///
/// Merge priority is the rank order, so the two files must agree exactly.
pub fn read_datagym_vocab<T, VR, ER>(
    vocab_bpe_reader: VR,
    encoder_json_reader: ER,
) -> TMResult<SpanTokenMap<T>>
where
    T: TokenType,
    VR: BufRead,
    ER: BufRead,
{
    let span_map = read_datagym_vocab_bpe(vocab_bpe_reader)?;
    let encoder_map = read_datagym_encoder_json(encoder_json_reader)?;

    if span_map != encoder_map {
        return Err(TokenmintError::Parse(format!(
            "vocab.bpe ({} ranks) disagrees with encoder.json ({} ranks)",
            span_map.len(),
            encoder_map.len()
        )));
    }

    Ok(span_map)
}
