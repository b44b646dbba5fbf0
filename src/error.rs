//! Error types for colorset-dedupe.
//!
//! Only file-level failures are errors. Bad numeric tokens default
//! silently and unattributable usages are dropped, so neither shows up here.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A source file could not be read.
    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An asset catalog `Contents.json` is not valid JSON for the expected shape.
    #[error("invalid asset JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A storyboard or xib is not well-formed XML.
    #[error("malformed markup in {file}: {source}")]
    Xml {
        file: String,
        #[source]
        source: quick_xml::Error,
    },

    /// Output could not be written.
    #[error("could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The scan root does not exist.
    #[error("scan root does not exist: {}", .0.display())]
    MissingRoot(PathBuf),
}

pub type Result<T> = std::result::Result<T, Error>;
