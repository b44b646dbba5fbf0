//! Deduplication of colors by raw value.
//!
//! Three folds over one accumulator, in a fixed order:
//! asset colors, then each document's named colors, then each document's
//! usages. Groups are created in that processing order.

use indexmap::{IndexMap, IndexSet};

use crate::asset::NamedAssetColor;
use crate::color::{Color, NamedRawValue};
use crate::markup::ParsedDocument;

/// All names and usages that share one raw value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedColor<'a> {
    pub raw_value: String,
    /// Distinct names, in the order they were first seen.
    pub names: IndexSet<String>,
    /// Usages borrowed from their documents.
    pub colors: Vec<&'a Color>,
}

impl<'a> GroupedColor<'a> {
    fn new(raw_value: String) -> Self {
        Self {
            raw_value,
            ..Default::default()
        }
    }

    /// Merge a named color's name. Empty names are ignored.
    pub fn add_named_color(&mut self, named: &impl NamedRawValue) {
        let name = named.name();
        if !name.is_empty() {
            self.names.insert(name.to_string());
        }
    }

    /// Merge a usage: its name, if any, and the usage itself.
    pub fn add_color(&mut self, color: &'a Color) {
        if let Some(name) = color.color_name.as_deref().filter(|name| !name.is_empty()) {
            self.names.insert(name.to_string());
        }
        self.colors.push(color);
    }

    /// Number of usages found in markup.
    pub fn use_count(&self) -> usize {
        self.colors.len()
    }
}

/// Caller-owned accumulator threaded through the folds.
///
/// Keyed by raw value; iteration follows creation order.
#[derive(Debug, Default)]
pub struct ColorGroups<'a> {
    groups: IndexMap<String, GroupedColor<'a>>,
}

impl<'a> ColorGroups<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    fn find_or_create(&mut self, raw_value: String) -> &mut GroupedColor<'a> {
        self.groups
            .entry(raw_value)
            .or_insert_with_key(|raw| GroupedColor::new(raw.clone()))
    }

    /// Fold asset catalog colors.
    pub fn add_asset_colors(&mut self, assets: &[NamedAssetColor]) {
        for named in assets {
            self.find_or_create(named.raw_value()).add_named_color(named);
        }
    }

    /// Fold each document's named color declarations.
    pub fn add_named_colors(&mut self, documents: &[ParsedDocument]) {
        for named in documents.iter().flat_map(|doc| &doc.named_colors) {
            self.find_or_create(named.raw_value()).add_named_color(named);
        }
    }

    /// Fold each document's usages.
    pub fn add_usages(&mut self, documents: &'a [ParsedDocument]) {
        for color in documents.iter().flat_map(|doc| &doc.colors) {
            self.find_or_create(color.raw_value()).add_color(color);
        }
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn get(&self, raw_value: &str) -> Option<&GroupedColor<'a>> {
        self.groups.get(raw_value)
    }

    /// Finish folding. Groups are not mutated after this point.
    pub fn into_groups(self) -> Vec<GroupedColor<'a>> {
        self.groups.into_values().collect()
    }
}

/// Group every asset color and document color by raw value.
pub fn group_colors<'a>(
    assets: &[NamedAssetColor],
    documents: &'a [ParsedDocument],
) -> Vec<GroupedColor<'a>> {
    let mut groups = ColorGroups::new();
    groups.add_asset_colors(assets);
    groups.add_named_colors(documents);
    groups.add_usages(documents);
    groups.into_groups()
}

// ============================================================================
// TESTS
// ============================================================================
