//! Shared types: configuration and scan results.

use serde::Serialize;
use std::path::PathBuf;

use crate::asset::NamedAssetColor;
use crate::markup::ParsedDocument;

// ============================================================================
// SCAN RESULTS
// ============================================================================

/// A source file that was left out of the run, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Source files found under the scan roots, in walk order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFiles {
    /// `Contents.json` files inside `.colorset` directories.
    pub asset_files: Vec<PathBuf>,
    /// `.storyboard` and `.xib` files.
    pub document_files: Vec<PathBuf>,
}

impl SourceFiles {
    pub fn len(&self) -> usize {
        self.asset_files.len() + self.document_files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Full text of one source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    pub path: PathBuf,
    pub text: String,
}

/// Everything extracted from a project, ready for grouping.
#[derive(Debug, Default)]
pub struct ScanResult {
    /// Asset colors with a base entry, in walk order.
    pub assets: Vec<NamedAssetColor>,
    /// Parsed storyboards and xibs, in walk order.
    pub documents: Vec<ParsedDocument>,
    /// Files that failed to read or parse.
    pub skipped: Vec<SkippedFile>,
    /// Total size of the files read.
    pub bytes_read: u64,
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable table.
    #[default]
    Human,
    /// Machine-readable JSON.
    Json,
    /// Standalone HTML page with color swatches.
    Html,
}

/// Configuration for scanning operations.
#[derive(Debug)]
pub struct ScanConfig {
    /// Root directories to scan.
    pub roots: Vec<PathBuf>,
    /// Maximum directory depth (None = unlimited).
    pub max_depth: Option<usize>,
    /// Whether to follow symbolic links.
    pub follow_symlinks: bool,
    /// Descend into hidden directories (`.git`, `.build`, ...).
    pub include_hidden: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            max_depth: None,
            follow_symlinks: false,
            include_hidden: false,
        }
    }
}

/// Configuration for writing the generated catalog and HTML sample.
#[derive(Debug)]
pub struct ExportConfig {
    /// Directory receiving `Colors.xcassets` and `sample.html`.
    /// Default: ~/Desktop/Outputs
    pub output_dir: PathBuf,
    /// Write the `Colors.xcassets` catalog.
    pub catalog: bool,
    /// Write the `sample.html` page.
    pub html: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::new(), // Will be set at runtime
            catalog: true,
            html: true,
        }
    }
}
