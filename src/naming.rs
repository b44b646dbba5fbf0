//! Output identifiers for color groups.
//!
//! Pure functions — no I/O.
//!
//! A group is named after its first name containing a digit, else its first
//! name, else `tbd`. Groups are emitted sorted by that name with a
//! locale-aware, numeric-aware comparison, and repeated `tbd`s are
//! numbered in emission order (`tbd-001`, `tbd-002`, ...).

use std::cmp::Ordering;
use std::sync::LazyLock;

use icu_collator::options::CollatorOptions;
use icu_collator::{Collator, CollatorBorrowed, CollatorPreferences};
use icu_locale_core::locale;
use tracing::warn;

use crate::group::GroupedColor;

/// Placeholder name for a group without any names.
pub const TBD_NAME: &str = "tbd";

impl GroupedColor<'_> {
    /// The name used for the catalog and the report.
    pub fn output_name(&self) -> &str {
        self.names
            .iter()
            .find(|name| name.chars().any(|c| c.is_ascii_digit()))
            .or_else(|| self.names.first())
            .map(String::as_str)
            .unwrap_or(TBD_NAME)
    }

    /// Every name of the group, comma separated. Diagnostic output only.
    pub fn debug_name(&self) -> String {
        if self.names.is_empty() {
            return TBD_NAME.to_string();
        }
        self.names
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ============================================================================
// EMISSION ORDER
// ============================================================================

/// A group paired with its final, unique-per-`tbd` identifier.
#[derive(Debug, Clone)]
pub struct ResolvedGroup<'g, 'a> {
    pub identifier: String,
    pub group: &'g GroupedColor<'a>,
}

/// Numbers successive `tbd` names.
#[derive(Debug, Default)]
pub struct TbdCounter {
    count: u32,
}

impl TbdCounter {
    /// Suffix a `tbd` name with the next sequence number; other names pass through.
    pub fn disambiguate(&mut self, name: &str) -> String {
        if name != TBD_NAME {
            return name.to_string();
        }
        self.count += 1;
        format!("{}-{:03}", name, self.count)
    }
}

/// Sort groups for emission and assign identifiers.
///
/// The sort is stable, so groups with equal names keep their fold order.
/// `tbd` numbering follows the sorted order.
pub fn emission_order<'g, 'a>(groups: &'g [GroupedColor<'a>]) -> Vec<ResolvedGroup<'g, 'a>> {
    let mut sorted: Vec<&GroupedColor<'a>> = groups.iter().collect();
    sorted.sort_by(|a, b| natural_cmp(a.output_name(), b.output_name()));

    let mut counter = TbdCounter::default();
    sorted
        .into_iter()
        .map(|group| ResolvedGroup {
            identifier: counter.disambiguate(group.output_name()),
            group,
        })
        .collect()
}

// ============================================================================
// NUMERIC-AWARE COMPARISON
// ============================================================================

/// Root-locale collator with numeric ordering (`-u-kn`).
///
/// `None` only when the compiled collation data cannot be loaded.
static NAME_COLLATOR: LazyLock<Option<CollatorBorrowed<'static>>> = LazyLock::new(|| {
    let preferences: CollatorPreferences = locale!("und-u-kn").into();
    Collator::try_new(preferences, CollatorOptions::default())
        .map_err(|e| warn!(error = %e, "collation data unavailable, sorting names bytewise"))
        .ok()
});

/// Compare names the way a person would: digit runs by value, accents and
/// case as secondary differences, punctuation before digits before letters
/// (`color2` < `color10`, `color_a` < `color1`, `Ávila` < `banana`).
///
/// Names the collator considers equal fall back to bytewise order, so the
/// result is total.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    NAME_COLLATOR
        .as_ref()
        .map_or(Ordering::Equal, |collator| collator.compare(a, b))
        .then_with(|| a.cmp(b))
}

// ============================================================================
// TESTS
// ============================================================================
