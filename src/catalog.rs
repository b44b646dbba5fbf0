//! Writing the generated color catalog and HTML sample.
//!
//! Structure:
//! - Pure functions: output paths, catalog entries
//! - Effect functions: directory creation, file writes

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::asset::{ColorSetContents, Contents};
use crate::color::Components;
use crate::error::{Error, Result};
use crate::naming::ResolvedGroup;
use crate::report::{ReportRow, format_html};
use crate::scanner::COLORSET_EXTENSION;
use crate::types::ExportConfig;

/// Name of the generated asset catalog directory.
pub const ASSETS_DIR_NAME: &str = "Colors.xcassets";

/// Description file inside every catalog directory.
pub const CONTENTS_FILENAME: &str = "Contents.json";

/// Name of the generated HTML page.
pub const SAMPLE_FILENAME: &str = "sample.html";

/// What an export wrote.
#[derive(Debug, Default)]
pub struct ExportSummary {
    /// The `Colors.xcassets` directory, if written.
    pub catalog_dir: Option<PathBuf>,
    /// Number of colorsets written.
    pub colorsets_written: usize,
    /// Identifiers already taken by an earlier group, not written again.
    pub duplicate_identifiers: Vec<String>,
    /// The HTML sample, if written.
    pub html_path: Option<PathBuf>,
}

/// A colorset to write: its directory identifier and contents.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub identifier: String,
    pub contents: ColorSetContents,
}

// ============================================================================
// PURE FUNCTIONS (Computations)
// ============================================================================

/// Returns the default output directory.
///
/// ~/Desktop/Outputs, or ./Outputs without a desktop directory.
pub fn default_output_dir() -> PathBuf {
    dirs::desktop_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Outputs")
}

/// Directory of one colorset inside the catalog.
pub fn colorset_dir(assets_dir: &Path, identifier: &str) -> PathBuf {
    assets_dir.join(format!("{}.{}", identifier, COLORSET_EXTENSION))
}

/// Directory-safe form of an identifier: always a single path component.
///
/// Path separators become `-`, so `Brand/Primary` is written as
/// `Brand-Primary` and `../../x` as `..-..-x`, both inside the catalog.
pub fn catalog_identifier(identifier: &str) -> String {
    identifier
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '-',
            _ => c,
        })
        .collect()
}

/// Catalog entries for groups in emission order.
///
/// Each entry is rebuilt from the group's raw value; a raw value that does
/// not parse falls back to opaque white.
pub fn catalog_entries(resolved: &[ResolvedGroup<'_, '_>]) -> Vec<CatalogEntry> {
    resolved
        .iter()
        .map(|entry| {
            let components =
                Components::from_raw_value(&entry.group.raw_value).unwrap_or_default();
            let identifier = catalog_identifier(&entry.identifier);
            if identifier != entry.identifier {
                debug!(from = %entry.identifier, to = %identifier, "renamed colorset for the catalog");
            }
            CatalogEntry {
                identifier,
                contents: ColorSetContents::with_components(&components),
            }
        })
        .collect()
}

// ============================================================================
// EFFECT FUNCTIONS (Actions)
// ============================================================================

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).map_err(|e| Error::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    write_text(path, &json)
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    fs::write(path, text).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Write `Colors.xcassets` under `output_dir`, replacing any previous one.
///
/// When two groups resolve to the same identifier, the first in emission
/// order is written and later ones are reported in the summary.
///
/// # Errors
/// Returns an error if the catalog directory or a file cannot be written.
pub fn write_catalog(entries: &[CatalogEntry], output_dir: &Path, summary: &mut ExportSummary) -> Result<PathBuf> {
    let assets_dir = output_dir.join(ASSETS_DIR_NAME);

    if assets_dir.exists() {
        fs::remove_dir_all(&assets_dir).map_err(|source| Error::Write {
            path: assets_dir.clone(),
            source,
        })?;
    }
    create_dir(&assets_dir)?;
    write_json(&assets_dir.join(CONTENTS_FILENAME), &Contents::default())?;

    let mut taken: HashSet<&str> = HashSet::new();
    for entry in entries {
        if !taken.insert(entry.identifier.as_str()) {
            warn!(identifier = %entry.identifier, "identifier already written, skipping colorset");
            summary.duplicate_identifiers.push(entry.identifier.clone());
            continue;
        }

        let dir = colorset_dir(&assets_dir, &entry.identifier);
        create_dir(&dir)?;
        write_json(&dir.join(CONTENTS_FILENAME), &entry.contents)?;
        summary.colorsets_written += 1;
    }

    info!(
        path = %assets_dir.display(),
        colorsets = summary.colorsets_written,
        "wrote color catalog"
    );
    Ok(assets_dir)
}

/// Write `sample.html` under `output_dir`.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_html_sample(rows: &[ReportRow], output_dir: &Path) -> Result<PathBuf> {
    let path = output_dir.join(SAMPLE_FILENAME);
    write_text(&path, &format_html(rows))?;
    info!(path = %path.display(), rows = rows.len(), "wrote HTML sample");
    Ok(path)
}

/// Write the outputs selected in `config`.
///
/// # Errors
/// Returns an error if the output directory or any output file cannot be written.
pub fn export(
    resolved: &[ResolvedGroup<'_, '_>],
    rows: &[ReportRow],
    config: &ExportConfig,
) -> Result<ExportSummary> {
    let output_dir = if config.output_dir.as_os_str().is_empty() {
        default_output_dir()
    } else {
        config.output_dir.clone()
    };
    create_dir(&output_dir)?;

    let mut summary = ExportSummary::default();

    if config.catalog {
        let entries = catalog_entries(resolved);
        let catalog_dir = write_catalog(&entries, &output_dir, &mut summary)?;
        summary.catalog_dir = Some(catalog_dir);
    }

    if config.html {
        summary.html_path = Some(write_html_sample(rows, &output_dir)?);
    }

    Ok(summary)
}

// ============================================================================
// TESTS
// ============================================================================
