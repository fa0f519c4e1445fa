//! # Tiktoken Rank Files
//!
//! Lines are:
//! ```terminaloutput
//! {BASE64 SPAN} {RANK}
//! ```
//! Blank lines are skipped.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use base64::{Engine, prelude::BASE64_STANDARD};

use crate::{
    errors::{TMResult, TokenmintError},
    types::TokenType,
    vocab::vocab_types::SpanTokenMap,
};

/// Load a [`SpanTokenMap`] from a base64 rank file.
pub fn load_base64_span_map_path<T, P>(path: P) -> TMResult<SpanTokenMap<T>>
where
    T: TokenType,
    P: AsRef<Path>,
{
    let reader = BufReader::new(File::open(path)?);
    read_base64_span_map(reader)
}

/// Read a [`SpanTokenMap`] from a base64 rank line reader.
///
/// `&[u8]` is a [`BufRead`], so in-memory blobs can be passed directly.
pub fn read_base64_span_map<T, R>(reader: R) -> TMResult<SpanTokenMap<T>>
where
    T: TokenType,
    R: BufRead,
{
    let mut span_map = SpanTokenMap::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }

        let (span, rank) = line.split_once(' ').ok_or_else(|| {
            TokenmintError::Parse(format!("line {}: expected `<base64> <rank>`", idx + 1))
        })?;

        let span = BASE64_STANDARD
            .decode(span)
            .map_err(|e| TokenmintError::Parse(format!("line {}: {e}", idx + 1)))?;

        let rank: u64 = rank
            .trim()
            .parse()
            .map_err(|e| TokenmintError::Parse(format!("line {}: {e}", idx + 1)))?;
        let token = T::from_u64(rank).ok_or_else(|| {
            TokenmintError::Parse(format!("line {}: rank {rank} out of range", idx + 1))
        })?;

        span_map.insert(span, token);
    }

    Ok(span_map)
}

/// Save a [`SpanTokenMap`] to a base64 rank file.
pub fn save_base64_span_map_path<T: TokenType, P: AsRef<Path>>(
    span_map: &SpanTokenMap<T>,
    path: P,
) -> TMResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write_base64_span_map(span_map, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a [`SpanTokenMap`] to a [`Write`] writer, ordered by rank.
pub fn write_base64_span_map<T, W>(
    span_map: &SpanTokenMap<T>,
    writer: &mut W,
) -> TMResult<()>
where
    T: TokenType,
    W: Write,
{
    let mut items: Vec<(T, &Vec<u8>)> = span_map
        .iter()
        .map(|(span, &token)| (token, span))
        .collect();
    items.sort_by_key(|(t, _)| *t);

    for (token, span) in items {
        writeln!(writer, "{} {}", BASE64_STANDARD.encode(span), token)?;
    }

    Ok(())
}
