//! Chunked ingest of the delimited transaction log.
//!
//! The log may exceed memory, so rows are surfaced as bounded chunks: at most
//! `chunk_rows` non-empty lines at a time, each tagged with its 1-based line
//! number for error reporting. Parsing into records happens per chunk so the
//! aggregation driver can parallelize it.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use tx_common::{Result, Transaction};

/// A chunk of raw rows: (1-based line number, line text).
pub type RawChunk = Vec<(usize, String)>;

/// Iterator over bounded chunks of input lines. Blank lines are skipped;
/// I/O errors end the iteration with an error item.
#[derive(Debug)]
pub struct ChunkedLines {
    lines: Lines<BufReader<File>>,
    chunk_rows: usize,
    line_no: usize,
}

impl ChunkedLines {
    pub fn open(path: &Path, chunk_rows: usize) -> Result<Self> {
        let file = File::open(path)?;
        Ok(ChunkedLines {
            lines: BufReader::new(file).lines(),
            chunk_rows,
            line_no: 0,
        })
    }
}

impl Iterator for ChunkedLines {
    type Item = Result<RawChunk>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut rows = Vec::with_capacity(self.chunk_rows.min(1024));
        while rows.len() < self.chunk_rows {
            match self.lines.next() {
                Some(Ok(line)) => {
                    self.line_no += 1;
                    if line.trim().is_empty() {
                        continue;
                    }
                    rows.push((self.line_no, line));
                }
                Some(Err(e)) => return Some(Err(e.into())),
                None => break,
            }
        }
        if rows.is_empty() {
            None
        } else {
            Some(Ok(rows))
        }
    }
}

/// Parse a raw chunk into transaction records. The first malformed row
/// aborts with its line number; there is no row-level recovery.
pub fn parse_chunk(chunk: &RawChunk, delimiter: char) -> Result<Vec<Transaction>> {
    chunk
        .iter()
        .map(|(line_no, line)| Transaction::parse(line, delimiter, *line_no))
        .collect()
}
