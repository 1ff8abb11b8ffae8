//! Format adapters
//!
//! Each adapter owns exactly the parse/serialize boundary for one document
//! format; everything between those calls works on the generic
//! [`Node`](crate::domain::Node) tree. `serialize` receives the original
//! raw bytes so style details (JSON indentation, CSV delimiter and header
//! line, the XML declaration) survive the round trip.

pub mod csv;
pub mod json;
pub mod xml;

use crate::domain::node::Node;
use crate::domain::result::Result;
use clap::ValueEnum;
use std::fmt;
use std::path::Path;

pub use self::csv::CsvAdapter;
pub use self::json::JsonAdapter;
pub use self::xml::XmlAdapter;

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Csv,
    Xml,
}

impl Format {
    /// Infer the format from a file extension.
    pub fn from_extension(path: &Path) -> Option<Format> {
        match path
            .extension()
            .and_then(|ext| ext.to_str())?
            .to_ascii_lowercase()
            .as_str()
        {
            "json" => Some(Format::Json),
            "csv" => Some(Format::Csv),
            "xml" => Some(Format::Xml),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Format::Json => "json",
            Format::Csv => "csv",
            Format::Xml => "xml",
        };
        f.write_str(label)
    }
}

/// Parse/serialize boundary implemented per format.
pub trait FormatAdapter {
    /// Parse raw bytes into the generic traversal tree.
    ///
    /// Malformed input fails fast with a parse error carrying the
    /// underlying position; no partial tree is returned.
    fn parse(&self, raw: &[u8]) -> Result<Node>;

    /// Serialize a traversal tree back to bytes in this format.
    ///
    /// `original_raw` is consulted only for style (indentation, delimiter,
    /// line endings), never for values.
    fn serialize(&self, node: &Node, original_raw: &[u8]) -> Result<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            Format::from_extension(Path::new("data.json")),
            Some(Format::Json)
        );
        assert_eq!(
            Format::from_extension(Path::new("data.CSV")),
            Some(Format::Csv)
        );
        assert_eq!(
            Format::from_extension(Path::new("export.xml")),
            Some(Format::Xml)
        );
        assert_eq!(Format::from_extension(Path::new("data.yaml")), None);
        assert_eq!(Format::from_extension(Path::new("noext")), None);
    }

    #[test]
    fn test_format_display() {
        assert_eq!(Format::Json.to_string(), "json");
        assert_eq!(Format::Csv.to_string(), "csv");
        assert_eq!(Format::Xml.to_string(), "xml");
    }
}
