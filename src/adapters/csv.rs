//! CSV format adapter
//!
//! A CSV document becomes an Array of row Objects keyed by header names, so
//! a cell's path for rule-matching purposes is exactly its column header.
//! Cells are strings unless numeric inference is switched on. Serialization
//! writes the original header line verbatim and keeps the delimiter and
//! line-ending style of the input.

use super::FormatAdapter;
use crate::config::CsvConfig;
use crate::domain::errors::VeilError;
use crate::domain::node::{Node, Scalar};
use crate::domain::result::Result;
use csv::{ReaderBuilder, Terminator, WriterBuilder};
use std::str::FromStr;

const CANDIDATE_DELIMITERS: [u8; 4] = [b',', b';', b'\t', b'|'];

/// CSV parse/serialize boundary.
#[derive(Debug, Default)]
pub struct CsvAdapter {
    delimiter: Option<u8>,
    infer_numbers: bool,
}

impl CsvAdapter {
    /// Build from the CSV dialect configuration.
    pub fn new(config: &CsvConfig) -> Self {
        Self {
            delimiter: config.delimiter_byte(),
            infer_numbers: config.infer_numbers,
        }
    }

    fn delimiter_for(&self, raw: &[u8]) -> u8 {
        self.delimiter.unwrap_or_else(|| sniff_delimiter(raw))
    }

    fn cell_scalar(&self, cell: &str) -> Scalar {
        if self.infer_numbers {
            if let Ok(n) = serde_json::Number::from_str(cell) {
                // only when the lexical form survives unchanged; "007" and
                // "1e3" stay strings so column content is never rewritten
                if n.to_string() == cell {
                    return Scalar::Number(n);
                }
            }
        }
        Scalar::String(cell.to_string())
    }
}

impl FormatAdapter for CsvAdapter {
    fn parse(&self, raw: &[u8]) -> Result<Node> {
        let delimiter = self.delimiter_for(raw);
        let mut reader = ReaderBuilder::new().delimiter(delimiter).from_reader(raw);

        let headers = reader.headers()?.clone();
        let mut rows = Vec::new();

        for record in reader.records() {
            let record = record?;
            let entries = headers
                .iter()
                .zip(record.iter())
                .map(|(header, cell)| {
                    (header.to_string(), Node::Scalar(self.cell_scalar(cell)))
                })
                .collect();
            rows.push(Node::Object(entries));
        }

        Ok(Node::Array(rows))
    }

    fn serialize(&self, node: &Node, original_raw: &[u8]) -> Result<Vec<u8>> {
        let rows = match node {
            Node::Array(rows) => rows,
            _ => {
                return Err(VeilError::Serialization(
                    "CSV document must be an array of records".to_string(),
                ))
            }
        };

        let delimiter = self.delimiter_for(original_raw);
        let crlf = original_raw.windows(2).any(|w| w == b"\r\n");
        let terminator = if crlf {
            Terminator::CRLF
        } else {
            Terminator::Any(b'\n')
        };

        let mut writer = WriterBuilder::new()
            .delimiter(delimiter)
            .terminator(terminator)
            .from_writer(Vec::new());

        for row in rows {
            let Node::Object(entries) = row else {
                return Err(VeilError::Serialization(
                    "CSV rows must be records".to_string(),
                ));
            };
            let cells = entries
                .iter()
                .map(|(_, value)| match value {
                    Node::Scalar(s) => Ok(s.lexical()),
                    _ => Err(VeilError::Serialization(
                        "CSV cells must be scalar values".to_string(),
                    )),
                })
                .collect::<Result<Vec<String>>>()?;
            writer
                .write_record(&cells)
                .map_err(|e| VeilError::Serialization(e.to_string()))?;
        }

        let body = writer
            .into_inner()
            .map_err(|e| VeilError::Serialization(e.to_string()))?;

        // the header record is carried over verbatim, preserving column
        // order and any original quoting
        let mut out = Vec::with_capacity(original_raw.len());
        out.extend_from_slice(header_line(original_raw));
        out.extend_from_slice(if crlf { b"\r\n" } else { b"\n" });
        out.extend_from_slice(&body);
        Ok(out)
    }
}

/// The raw header record: everything up to the first line break.
fn header_line(raw: &[u8]) -> &[u8] {
    let end = raw
        .iter()
        .position(|&b| b == b'\n')
        .unwrap_or(raw.len());
    let line = &raw[..end];
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Pick the candidate delimiter occurring most often in the header line,
/// preferring the comma on ties.
fn sniff_delimiter(raw: &[u8]) -> u8 {
    let header = header_line(raw);
    CANDIDATE_DELIMITERS
        .iter()
        .rev()
        .copied()
        .max_by_key(|&candidate| header.iter().filter(|&&b| b == candidate).count())
        .unwrap_or(b',')
}
