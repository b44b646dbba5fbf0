//! Report formatting for grouped colors.
//!
//! Pure functions — (ColorReport, OutputFormat) → String.
//! No I/O, no side effects.

use humansize::{BINARY, format_size};
use serde::Serialize;

use crate::naming::{ResolvedGroup, TbdCounter};
use crate::types::{OutputFormat, ScanResult, SkippedFile};

/// One row of the report, in emission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// CSS color for the swatch cell.
    pub swatch_color: String,
    pub raw_value: String,
    pub resolved_name: String,
    /// Usages found in markup. Direct uses in source code are not counted.
    pub usage_count: usize,
}

/// Complete report for one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ColorReport {
    pub rows: Vec<ReportRow>,
    /// Asset colors that went into grouping.
    pub asset_colors: usize,
    /// Documents that went into grouping.
    pub documents: usize,
    /// Total usages counted across all groups.
    pub total_usages: usize,
    /// Bytes of source read.
    pub bytes_read: u64,
    /// Files skipped due to read or parse errors.
    pub skipped: Vec<SkippedFile>,
}

/// Build report rows from groups already in emission order.
pub fn build_rows(resolved: &[ResolvedGroup<'_, '_>]) -> Vec<ReportRow> {
    resolved
        .iter()
        .map(|entry| ReportRow {
            swatch_color: entry.group.raw_value.clone(),
            raw_value: entry.group.raw_value.clone(),
            resolved_name: entry.identifier.clone(),
            usage_count: entry.group.use_count(),
        })
        .collect()
}

/// Build the full report for a scan.
pub fn build_report(scan: &ScanResult, resolved: &[ResolvedGroup<'_, '_>]) -> ColorReport {
    let rows = build_rows(resolved);
    ColorReport {
        total_usages: rows.iter().map(|row| row.usage_count).sum(),
        rows,
        asset_colors: scan.assets.len(),
        documents: scan.documents.len(),
        bytes_read: scan.bytes_read,
        skipped: scan.skipped.clone(),
    }
}

/// Format a report for output.
///
/// Pure function: takes data, returns formatted string.
pub fn format_report(report: &ColorReport, format: OutputFormat) -> String {
    match format {
        OutputFormat::Human => format_human(report),
        OutputFormat::Json => format_json(report),
        OutputFormat::Html => format_html(&report.rows),
    }
}

/// One line per group listing every name, sorted.
///
/// `tbd` numbering follows the emission order of `resolved`.
pub fn debug_listing(resolved: &[ResolvedGroup<'_, '_>]) -> Vec<String> {
    let mut counter = TbdCounter::default();
    let mut lines: Vec<String> = resolved
        .iter()
        .map(|entry| {
            format!(
                "{} - {} IB uses - {}",
                counter.disambiguate(&entry.group.debug_name()),
                entry.group.use_count(),
                entry.group.raw_value
            )
        })
        .collect();
    lines.sort();
    lines
}

// ============================================================================
// HUMAN FORMAT
// ============================================================================

fn format_human(report: &ColorReport) -> String {
    let mut out = String::new();

    if !report.rows.is_empty() {
        let name_width = report
            .rows
            .iter()
            .map(|row| row.resolved_name.chars().count())
            .max()
            .unwrap_or(0)
            .max("Color Name".len());

        out.push_str("=== Colors ===\n");
        out.push_str(&format!(
            "{:<name_width$}  {:<24}  {}\n",
            "Color Name", "Raw Value", "Uses"
        ));
        for row in &report.rows {
            out.push_str(&format!(
                "{:<name_width$}  {:<24}  {}\n",
                row.resolved_name, row.raw_value, row.usage_count
            ));
        }
        out.push('\n');
    }

    if !report.skipped.is_empty() {
        out.push_str("=== Skipped (read or parse errors) ===\n");
        for skipped in &report.skipped {
            out.push_str(&format!("  {} - {}\n", skipped.path.display(), skipped.reason));
        }
        out.push('\n');
    }

    out.push_str(&format_summary(report));

    out
}

fn format_summary(report: &ColorReport) -> String {
    let mut out = String::new();
    out.push_str("=== Summary ===\n");
    out.push_str(&format!("Unique colors:   {}\n", report.rows.len()));
    out.push_str(&format!("Markup usages:   {}\n", report.total_usages));
    out.push_str(&format!("Asset colors:    {}\n", report.asset_colors));
    out.push_str(&format!("Documents:       {}\n", report.documents));
    if !report.skipped.is_empty() {
        out.push_str(&format!("Skipped (errors): {}\n", report.skipped.len()));
    }
    out.push_str(&format!(
        "Source read:     {}\n",
        format_size(report.bytes_read, BINARY)
    ));
    out.push_str("* Usage counts do not include direct uses in source code.\n");

    out
}

// ============================================================================
// JSON FORMAT
// ============================================================================

fn format_json(report: &ColorReport) -> String {
    // serde_json::to_string_pretty for readable output
    serde_json::to_string_pretty(report).unwrap_or_else(|e| {
        // Only plain strings and integers in here; cannot fail
        panic!("Failed to serialize report to JSON: {}", e)
    })
}

// ============================================================================
// HTML FORMAT
// ============================================================================

const HTML_HEAD: &str = r#"<!DOCTYPE html>
<html>
    <head>
        <meta charset="utf-8">
        <style>
            html, body {
                margin: 0;
                font-family: sans-serif;
            }

            table {
                margin: 0px auto;
                border: 1px solid #000;
                border-collapse: collapse;
                width: 100%;
                max-width: 900px;
            }

            td, th {
                border: 1px solid #000;
                padding: 16px;
            }
        </style>
    </head>
    <body>
        <table>
            <tr>
                <th>Color</th>
                <th>Raw Value</th>
                <th>Color Name</th>
                <th>Uses*</th>
            </tr>
"#;

const HTML_FOOT: &str = r#"        </table>
        <div style="padding: 1em; text-align: center;">* The count of uses does not include direct uses in source code.</div>
    </body>
</html>
"#;

/// Render rows as a standalone HTML page with a swatch per color.
pub fn format_html(rows: &[ReportRow]) -> String {
    let mut out = String::from(HTML_HEAD);
    for row in rows {
        out.push_str(&format!(
            "            <tr>\n                <td style=\"background: {}\"></td>\n                <td>{}</td>\n                <td>{}</td>\n                <td>{}</td>\n            </tr>\n",
            escape_html(&row.swatch_color),
            escape_html(&row.raw_value),
            escape_html(&row.resolved_name),
            row.usage_count
        ));
    }
    out.push_str(HTML_FOOT);
    out
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::GroupedColor;
    use crate::naming::emission_order;
    use std::path::PathBuf;

    fn group(raw_value: &str, names: &[&str]) -> GroupedColor<'static> {
        GroupedColor {
            raw_value: raw_value.to_string(),
            names: names.iter().map(|n| n.to_string()).collect(),
            colors: Vec::new(),
        }
    }

    fn sample_groups() -> Vec<GroupedColor<'static>> {
        vec![
            group("rgba(10, 20, 30, 1)", &["brand", "brandAlt"]),
            group("rgba(1, 2, 3, 0.5)", &[]),
            group("rgba(128, 128, 128, 1)", &["gray128"]),
        ]
    }

    fn sample_report(groups: &[GroupedColor<'_>]) -> ColorReport {
        let resolved = emission_order(groups);
        ColorReport {
            rows: build_rows(&resolved),
            asset_colors: 2,
            documents: 1,
            total_usages: 0,
            bytes_read: 2048,
            skipped: vec![SkippedFile {
                path: PathBuf::from("/project/Broken.xib"),
                reason: "malformed markup".to_string(),
            }],
        }
    }

    // --- rows tests ---

    #[test]
    fn test_rows_in_emission_order() {
        let groups = sample_groups();
        let rows = build_rows(&emission_order(&groups));
        let names: Vec<&str> = rows.iter().map(|r| r.resolved_name.as_str()).collect();
        assert_eq!(names, ["brand", "gray128", "tbd-001"]);
        assert_eq!(rows[0].swatch_color, rows[0].raw_value);
        assert_eq!(rows[2].raw_value, "rgba(1, 2, 3, 0.5)");
    }

    // --- human format tests ---

    #[test]
    fn test_human_format_lists_colors() {
        let groups = sample_groups();
        let output = format_report(&sample_report(&groups), OutputFormat::Human);

        assert!(output.contains("=== Colors ==="));
        assert!(output.contains("brand"));
        assert!(output.contains("rgba(10, 20, 30, 1)"));
        assert!(output.contains("tbd-001"));
    }

    #[test]
    fn test_human_format_includes_skipped_and_summary() {
        let groups = sample_groups();
        let output = format_report(&sample_report(&groups), OutputFormat::Human);

        assert!(output.contains("=== Skipped"));
        assert!(output.contains("/project/Broken.xib - malformed markup"));
        assert!(output.contains("Unique colors:   3"));
        assert!(output.contains("2 KiB"));
    }

    #[test]
    fn test_human_format_empty_report() {
        let output = format_report(&ColorReport::default(), OutputFormat::Human);
        assert!(!output.contains("=== Colors"));
        assert!(!output.contains("=== Skipped"));
        assert!(output.contains("Unique colors:   0"));
    }

    // --- JSON format tests ---

    #[test]
    fn test_json_format_has_rows() {
        let groups = sample_groups();
        let output = format_report(&sample_report(&groups), OutputFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        let rows = parsed["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["resolved_name"], "brand");
        assert_eq!(rows[0]["swatch_color"], "rgba(10, 20, 30, 1)");
        assert_eq!(rows[0]["usage_count"], 0);
        assert_eq!(parsed["skipped"][0]["reason"], "malformed markup");
    }

    // --- HTML format tests ---

    #[test]
    fn test_html_has_row_per_group() {
        let groups = sample_groups();
        let html = format_report(&sample_report(&groups), OutputFormat::Html);

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert_eq!(html.matches("<tr>").count(), 4); // header + 3 rows
        assert!(html.contains("<td style=\"background: rgba(10, 20, 30, 1)\"></td>"));
        assert!(html.contains("<td>tbd-001</td>"));
        assert!(html.contains("does not include direct uses in source code"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_html_escapes_names() {
        let rows = vec![ReportRow {
            swatch_color: "rgba(0, 0, 0, 1)".to_string(),
            raw_value: "rgba(0, 0, 0, 1)".to_string(),
            resolved_name: "<b>&co".to_string(),
            usage_count: 1,
        }];
        let html = format_html(&rows);
        assert!(html.contains("<td>&lt;b&gt;&amp;co</td>"));
    }

    // --- debug listing tests ---

    #[test]
    fn test_debug_listing_joins_names() {
        let groups = sample_groups();
        let lines = debug_listing(&emission_order(&groups));
        assert_eq!(
            lines,
            [
                "brand, brandAlt - 0 IB uses - rgba(10, 20, 30, 1)",
                "gray128 - 0 IB uses - rgba(128, 128, 128, 1)",
                "tbd-001 - 0 IB uses - rgba(1, 2, 3, 0.5)",
            ]
        );
    }
}
