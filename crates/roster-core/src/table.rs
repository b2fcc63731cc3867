// Encoding-resilient tabular reader.
//
// Decodes a roster file under each candidate of a `DecoderChain` in turn and
// parses it as headerless-after-the-first-row CSV. The first candidate that
// decodes cleanly, parses, and is wide enough wins.

use std::path::Path;

use encoding_rs::Encoding;
use thiserror::Error;
use tracing::{debug, warn};

use crate::decode::{recode_cell, DecoderChain};

/// Why a roster file contributed nothing. Never fatal to an ingestion run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("file is empty")]
    EmptyFile,

    #[error("could not be read: {0}")]
    Unreadable(String),

    #[error("no candidate encoding could decode it (tried {})", .tried.join(", "))]
    NoUsableEncoding { tried: Vec<String> },

    #[error("has {found} column(s), needs at least {required}")]
    TooFewColumns { found: usize, required: usize },

    #[error("malformed CSV: {0}")]
    Malformed(String),
}

/// Rows of a decoded roster file, header row already discarded.
#[derive(Debug, Clone)]
pub struct DecodedTable {
    /// Label of the decoder that won, e.g. `utf-8` or `bom:UTF-16LE`.
    pub label: String,
    pub encoding: &'static Encoding,
    pub rows: Vec<Vec<String>>,
    /// Widest row, in cells.
    pub width: usize,
}

impl DecodedTable {
    /// Normalization step 2 for a single cell; see [`crate::decode::Decoded::recode`].
    pub fn recode(&self, cell: &str) -> String {
        recode_cell(self.encoding, cell)
    }
}

/// Read and decode the file at `path`.
pub fn read_table_file(
    path: &Path,
    chain: &DecoderChain,
    required_columns: usize,
) -> Result<DecodedTable, SkipReason> {
    let bytes = std::fs::read(path).map_err(|e| SkipReason::Unreadable(e.to_string()))?;
    read_table(&bytes, chain, required_columns)
}

/// Decode `bytes` with the first workable candidate in `chain`.
///
/// A header-only file decodes to zero rows and is not subject to the column
/// requirement.
pub fn read_table(
    bytes: &[u8],
    chain: &DecoderChain,
    required_columns: usize,
) -> Result<DecodedTable, SkipReason> {
    if bytes.is_empty() {
        return Err(SkipReason::EmptyFile);
    }

    let mut last_failure: Option<SkipReason> = None;

    for decoder in chain.decoders() {
        let Some(decoded) = decoder.decode(bytes) else {
            debug!("decoder '{}' declined", decoder.label());
            continue;
        };

        let rows = match parse_rows(&decoded.text) {
            Ok(rows) => rows,
            Err(e) => {
                warn!("'{}' decoded but CSV parsing failed: {}", decoded.label, e);
                last_failure = Some(SkipReason::Malformed(e.to_string()));
                continue;
            }
        };

        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if !rows.is_empty() && width < required_columns {
            warn!(
                "'{}' decoded {} column(s), need {}",
                decoded.label, width, required_columns
            );
            last_failure = Some(SkipReason::TooFewColumns {
                found: width,
                required: required_columns,
            });
            continue;
        }

        return Ok(DecodedTable {
            label: decoded.label,
            encoding: decoded.encoding,
            rows,
            width,
        });
    }

    Err(last_failure.unwrap_or_else(|| SkipReason::NoUsableEncoding {
        tried: chain.labels(),
    }))
}

/// Parse CSV text, discarding the first row. Ragged rows are kept as-is.
fn parse_rows(text: &str) -> Result<Vec<Vec<String>>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::{BomSniffer, EncodingDecoder};

    fn default_chain() -> DecoderChain {
        DecoderChain::from_labels(&["utf-8", "ISO-8859-1", "latin1"], true).unwrap()
    }

    fn utf8_only() -> DecoderChain {
        DecoderChain::new().with(EncodingDecoder::for_label("utf-8").unwrap())
    }

    #[test]
    fn header_row_is_discarded() {
        let table = read_table(b"id,name,pos\nx,John,GK\nx,Mark,PT\n", &default_chain(), 3).unwrap();
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["x", "John", "GK"]);
        assert_eq!(table.width, 3);
        assert_eq!(table.label, "utf-8");
    }

    #[test]
    fn empty_file_skipped_without_decoding() {
        assert_eq!(read_table(b"", &default_chain(), 3).unwrap_err(), SkipReason::EmptyFile);
    }

    #[test]
    fn falls_back_to_latin1_on_invalid_utf8() {
        let table = read_table(b"h,h,h\nx,Jos\xe9,DF\n", &default_chain(), 3).unwrap();
        assert_eq!(table.label, "ISO-8859-1");
        assert_eq!(table.rows[0][1], "José");
    }

    #[test]
    fn bom_wins_before_candidates() {
        let table = read_table(b"\xEF\xBB\xBFh,h,h\nx,Ana,DF\n", &default_chain(), 3).unwrap();
        assert_eq!(table.label, "bom:UTF-8");
        assert_eq!(table.rows[0][1], "Ana");
    }

    #[test]
    fn no_candidate_decodes() {
        let err = read_table(b"h,h,h\nx,Jos\xe9,DF\n", &utf8_only(), 3).unwrap_err();
        assert_eq!(
            err,
            SkipReason::NoUsableEncoding {
                tried: vec!["utf-8".to_string()]
            }
        );
    }

    #[test]
    fn bom_sniffer_alone_declining_reports_no_encoding() {
        let chain = DecoderChain::new().with(BomSniffer);
        let err = read_table(b"h,h\nx,y\n", &chain, 2).unwrap_err();
        assert!(matches!(err, SkipReason::NoUsableEncoding { .. }));
    }

    #[test]
    fn too_few_columns() {
        let err = read_table(b"h,h\nx,John\n", &default_chain(), 3).unwrap_err();
        assert_eq!(
            err,
            SkipReason::TooFewColumns {
                found: 2,
                required: 3
            }
        );
    }

    #[test]
    fn width_is_widest_row() {
        let table = read_table(b"h\nx,John\nx,Mark,MF\n", &default_chain(), 3).unwrap();
        assert_eq!(table.width, 3);
        assert_eq!(table.rows[0].len(), 2);
    }

    #[test]
    fn header_only_file_yields_no_rows() {
        let table = read_table(b"id,name,pos\n", &default_chain(), 3).unwrap();
        assert!(table.rows.is_empty());
    }

    #[test]
    fn quoted_fields_keep_commas() {
        let table = read_table(b"h,h,h\nx,\"Cruz, De La\",DF\n", &default_chain(), 3).unwrap();
        assert_eq!(table.rows[0][1], "Cruz, De La");
    }

    #[test]
    fn missing_file_is_unreadable() {
        let path = std::env::temp_dir().join("roster_table_no_such_file.csv");
        let _ = std::fs::remove_file(&path);
        let err = read_table_file(&path, &default_chain(), 3).unwrap_err();
        assert!(matches!(err, SkipReason::Unreadable(_)));
    }

    #[test]
    fn skip_reason_messages() {
        assert_eq!(SkipReason::EmptyFile.to_string(), "file is empty");
        assert_eq!(
            SkipReason::NoUsableEncoding {
                tried: vec!["utf-8".into(), "latin1".into()]
            }
            .to_string(),
            "no candidate encoding could decode it (tried utf-8, latin1)"
        );
    }
}
