//! Project scanning: find, read and parse color sources.
//!
//! Walks the project tree for colorset `Contents.json` files and
//! storyboard/xib documents, reads them, and parses each one in isolation.
//! A file that fails to read or parse is recorded as skipped and the run
//! continues.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::asset::{ColorSetContents, NamedAssetColor};
use crate::error::{Error, Result};
use crate::markup::ParsedDocument;
use crate::types::{ScanConfig, ScanResult, SkippedFile, SourceFiles, SourceText};

/// Directory extension marking an asset catalog color.
pub const COLORSET_EXTENSION: &str = "colorset";

/// File extension of asset catalog descriptions.
const ASSET_FILE_EXTENSION: &str = "json";

/// File extensions of UI layout documents.
const DOCUMENT_EXTENSIONS: [&str; 2] = ["storyboard", "xib"];

/// One file read attempt: the path plus its text or the failure.
pub type SourceRead = (PathBuf, Result<SourceText>);

// ============================================================================
// PURE FUNCTIONS (Classification)
// ============================================================================

/// Kind of color source a path holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// `*.colorset/*.json`
    Asset,
    /// `*.storyboard` or `*.xib`
    Document,
}

/// Classify a file path by extension and parent directory.
pub fn classify(path: &Path) -> Option<SourceKind> {
    let extension = path.extension().and_then(OsStr::to_str)?;

    if DOCUMENT_EXTENSIONS.contains(&extension) {
        return Some(SourceKind::Document);
    }

    let in_colorset = path
        .parent()
        .and_then(Path::extension)
        .is_some_and(|ext| ext == COLORSET_EXTENSION);

    if extension == ASSET_FILE_EXTENSION && in_colorset {
        return Some(SourceKind::Asset);
    }

    None
}

/// Color name for an asset file: its directory name without the last extension.
///
/// `Colors.xcassets/Brand.colorset/Contents.json` → `Brand`
/// `Colors.xcassets/brand.primary.colorset/Contents.json` → `brand.primary`
pub fn colorset_name(path: &Path) -> Option<String> {
    let directory = path.parent()?;
    directory
        .file_stem()
        .and_then(OsStr::to_str)
        .map(str::to_string)
}

/// File name of a document, used for provenance.
pub fn document_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.'))
}

// ============================================================================
// DISCOVERY
// ============================================================================

/// Find all color sources under the configured roots.
///
/// # Errors
/// Returns an error if a root directory does not exist.
pub fn find_source_files(config: &ScanConfig) -> Result<SourceFiles> {
    find_source_files_with_progress(config, |_, _| {})
}

/// Find all color sources, reporting `(entries scanned, sources found)` as it goes.
///
/// # Errors
/// Returns an error if a root directory does not exist.
pub fn find_source_files_with_progress<F>(config: &ScanConfig, mut on_progress: F) -> Result<SourceFiles>
where
    F: FnMut(usize, usize),
{
    let mut files = SourceFiles::default();
    let mut scanned = 0;

    for root in &config.roots {
        if !root.exists() {
            return Err(Error::MissingRoot(root.clone()));
        }

        let mut walker = WalkDir::new(root)
            .follow_links(config.follow_symlinks)
            .sort_by_file_name();

        if let Some(max_depth) = config.max_depth {
            walker = walker.max_depth(max_depth);
        }

        let entries = walker
            .into_iter()
            .filter_entry(|entry| config.include_hidden || !is_hidden(entry));

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(error = %e, "skipping unreadable directory entry");
                    continue;
                }
            };

            scanned += 1;

            if entry.file_type().is_file() {
                match classify(entry.path()) {
                    Some(SourceKind::Asset) => files.asset_files.push(entry.into_path()),
                    Some(SourceKind::Document) => files.document_files.push(entry.into_path()),
                    None => {}
                }
            }

            on_progress(scanned, files.len());
        }
    }

    if files.is_empty() {
        warn!(roots = ?config.roots, "no colorsets, storyboards or xibs found");
    } else {
        info!(
            assets = files.asset_files.len(),
            documents = files.document_files.len(),
            "found color sources"
        );
    }
    Ok(files)
}

// ============================================================================
// READING
// ============================================================================

/// Read one source file as UTF-8 text.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn read_source(path: &Path) -> Result<SourceText> {
    let text = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(SourceText {
        path: path.to_path_buf(),
        text,
    })
}

/// Read many source files in parallel. Output order matches `paths`.
pub fn read_sources(paths: &[PathBuf]) -> Vec<SourceRead> {
    paths
        .par_iter()
        .map(|path| (path.clone(), read_source(path)))
        .collect()
}

// ============================================================================
// EXTRACTION
// ============================================================================

/// Parse a colorset `Contents.json` into its named base color.
///
/// Returns `Ok(None)` when the colorset only defines appearance variants.
///
/// # Errors
/// Returns an error if the text is not valid colorset JSON.
pub fn extract_asset_color(source: &SourceText) -> Result<Option<NamedAssetColor>> {
    let contents: ColorSetContents =
        serde_json::from_str(&source.text).map_err(|e| Error::Json {
            path: source.path.clone(),
            source: e,
        })?;
    let name = colorset_name(&source.path).unwrap_or_default();
    Ok(NamedAssetColor::from_contents(name, &contents))
}

/// Parse a storyboard or xib.
///
/// # Errors
/// Returns an error if the text is not well-formed XML.
pub fn extract_document(source: &SourceText) -> Result<ParsedDocument> {
    ParsedDocument::parse(&document_name(&source.path), &source.text)
}

/// Turn read attempts into a scan result, isolating every failure to its file.
///
/// Processing is sequential and keeps input order.
pub fn assemble_scan(asset_reads: Vec<SourceRead>, document_reads: Vec<SourceRead>) -> ScanResult {
    let mut result = ScanResult::default();

    for (path, read) in asset_reads {
        let extracted = read.and_then(|source| {
            result.bytes_read += source.text.len() as u64;
            extract_asset_color(&source)
        });
        match extracted {
            Ok(Some(color)) => result.assets.push(color),
            Ok(None) => debug!(path = %path.display(), "colorset has no base entry"),
            Err(e) => skip(&mut result, path, e),
        }
    }

    for (path, read) in document_reads {
        let extracted = read.and_then(|source| {
            result.bytes_read += source.text.len() as u64;
            extract_document(&source)
        });
        match extracted {
            Ok(document) => {
                debug!(
                    document = %document.name,
                    named_colors = document.named_colors.len(),
                    usages = document.colors.len(),
                    "parsed document"
                );
                result.documents.push(document);
            }
            Err(e) => skip(&mut result, path, e),
        }
    }

    info!(
        assets = result.assets.len(),
        documents = result.documents.len(),
        skipped = result.skipped.len(),
        "extracted colors"
    );
    result
}

fn skip(result: &mut ScanResult, path: PathBuf, error: Error) {
    warn!(path = %path.display(), error = %error, "skipping file");
    result.skipped.push(SkippedFile {
        path,
        reason: error.to_string(),
    });
}

/// Scan the configured roots and extract every color.
///
/// # Errors
/// Returns an error if a root directory does not exist. Individual files
/// never fail the scan.
pub fn scan(config: &ScanConfig) -> Result<ScanResult> {
    let files = find_source_files(config)?;
    let asset_reads = read_sources(&files.asset_files);
    let document_reads = read_sources(&files.document_files);
    Ok(assemble_scan(asset_reads, document_reads))
}

/// Scan a single directory with default settings.
///
/// # Errors
/// Returns an error if the directory does not exist.
pub fn scan_dir(path: &Path) -> Result<ScanResult> {
    let config = ScanConfig {
        roots: vec![path.to_path_buf()],
        ..Default::default()
    };
    scan(&config)
}

// ============================================================================
// TESTS
// ============================================================================
