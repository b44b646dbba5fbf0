//! Asset catalog color model (`*.colorset/Contents.json`).
//!
//! Every field of the on-disk shape is optional; defaults are applied per
//! field. The same types serialize the generated catalog back out.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::color::{ChannelTokens, Components, NamedRawValue};

const DEFAULT_AUTHOR: &str = "xcode";
const DEFAULT_VERSION: u32 = 1;
const DEFAULT_IDIOM: &str = "universal";
const DEFAULT_COLOR_SPACE: &str = "srgb";

fn default_author() -> String {
    DEFAULT_AUTHOR.to_string()
}

fn default_version() -> u32 {
    DEFAULT_VERSION
}

fn default_idiom() -> String {
    DEFAULT_IDIOM.to_string()
}

fn default_color_space() -> String {
    DEFAULT_COLOR_SPACE.to_string()
}

// ============================================================================
// SHAPE
// ============================================================================

/// `info` block shared by every `Contents.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Info {
    #[serde(default = "default_author")]
    pub author: String,
    #[serde(default = "default_version")]
    pub version: u32,
}

impl Default for Info {
    fn default() -> Self {
        Self {
            author: default_author(),
            version: default_version(),
        }
    }
}

/// Root `Contents.json` of an `.xcassets` folder: just `info`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contents {
    #[serde(default)]
    pub info: Info,
}

/// `Contents.json` of a `.colorset` folder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColorSetContents {
    #[serde(default)]
    pub info: Info,
    #[serde(default)]
    pub colors: Vec<AssetColor>,
}

/// One entry of `colors`: an idiom, optional appearance variants, a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetColor {
    #[serde(default = "default_idiom")]
    pub idiom: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub appearances: Option<Vec<Appearance>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ColorDetails>,
}

/// Appearance variant tag, e.g. `{ "appearance": "luminosity", "value": "dark" }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    #[serde(default)]
    pub appearance: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorDetails {
    #[serde(rename = "colorSpace", alias = "color-space", default = "default_color_space")]
    pub color_space: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<AssetComponents>,
}

/// Channel values as written in the catalog.
///
/// Xcode writes strings (`"0.500"`, `"0x7F"`, `"127"`) but hand-edited
/// files sometimes carry plain numbers, so both are accepted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetComponents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub white: Option<Token>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub red: Option<Token>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub green: Option<Token>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blue: Option<Token>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<Token>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Token {
    Text(String),
    Number(serde_json::Number),
}

impl Token {
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Token::Text(text) => Cow::Borrowed(text),
            Token::Number(number) => Cow::Owned(number.to_string()),
        }
    }
}

// ============================================================================
// PARSING
// ============================================================================

impl AssetComponents {
    /// Normalize into `Components` using the plain channel rules.
    pub fn to_components(&self) -> Components {
        let white = self.white.as_ref().map(Token::as_text);
        let red = self.red.as_ref().map(Token::as_text);
        let green = self.green.as_ref().map(Token::as_text);
        let blue = self.blue.as_ref().map(Token::as_text);
        let alpha = self.alpha.as_ref().map(Token::as_text);

        let tokens = ChannelTokens {
            white: white.as_deref(),
            red: red.as_deref(),
            green: green.as_deref(),
            blue: blue.as_deref(),
            alpha: alpha.as_deref(),
        };
        Components::from_tokens(&tokens, false)
    }

    /// Catalog form of normalized components: integer strings, alpha to one decimal.
    pub fn from_components(components: &Components) -> Self {
        Self {
            white: None,
            red: Some(Token::Text(components.red.to_string())),
            green: Some(Token::Text(components.green.to_string())),
            blue: Some(Token::Text(components.blue.to_string())),
            alpha: Some(Token::Text(format!("{:.1}", components.alpha))),
        }
    }
}

impl AssetColor {
    /// Normalized value of this entry. Entries without color data are opaque white.
    pub fn components(&self) -> Components {
        self.color
            .as_ref()
            .and_then(|details| details.components.as_ref())
            .map(AssetComponents::to_components)
            .unwrap_or_default()
    }

    pub fn raw_value(&self) -> String {
        self.components().raw_value()
    }
}

impl ColorSetContents {
    /// The base entry: the first one without appearance variants.
    ///
    /// Returns `None` for colorsets that only define appearance variants.
    pub fn any_idiom_color(&self) -> Option<&AssetColor> {
        self.colors.iter().find(|color| color.appearances.is_none())
    }

    /// A single-entry colorset for the given components, as written to the output catalog.
    pub fn with_components(components: &Components) -> Self {
        Self {
            info: Info::default(),
            colors: vec![AssetColor {
                idiom: default_idiom(),
                appearances: None,
                color: Some(ColorDetails {
                    color_space: default_color_space(),
                    components: Some(AssetComponents::from_components(components)),
                }),
            }],
        }
    }
}

// ============================================================================
// NAMED ASSET COLOR
// ============================================================================

/// A colorset's base entry paired with the colorset's name.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedAssetColor {
    pub name: String,
    pub color: AssetColor,
}

impl NamedAssetColor {
    /// Pair a parsed colorset with its name, if it has a base entry.
    pub fn from_contents(name: impl Into<String>, contents: &ColorSetContents) -> Option<Self> {
        contents.any_idiom_color().map(|color| Self {
            name: name.into(),
            color: color.clone(),
        })
    }
}

impl NamedRawValue for NamedAssetColor {
    fn name(&self) -> &str {
        &self.name
    }

    fn raw_value(&self) -> String {
        self.color.raw_value()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> ColorSetContents {
        serde_json::from_str(json).unwrap()
    }

    const SRGB_COLORSET: &str = r#"{
        "colors": [{
            "idiom": "universal",
            "color": {
                "color-space": "srgb",
                "components": { "red": "0x0A", "green": "20", "blue": "0.118", "alpha": "1.000" }
            }
        }],
        "info": { "author": "xcode", "version": 1 }
    }"#;

    const APPEARANCE_COLORSET: &str = r#"{
        "colors": [
            {
                "idiom": "universal",
                "color": { "components": { "white": "0.2", "alpha": "0.5" } }
            },
            {
                "idiom": "universal",
                "appearances": [{ "appearance": "luminosity", "value": "dark" }],
                "color": { "components": { "white": "0.9", "alpha": "1" } }
            }
        ]
    }"#;

    // --- parsing tests ---

    #[test]
    fn test_parse_srgb_components() {
        let contents = parse(SRGB_COLORSET);
        let color = contents.any_idiom_color().unwrap();
        assert_eq!(color.raw_value(), "rgba(10, 20, 30, 1)");
        assert_eq!(color.color.as_ref().unwrap().color_space, "srgb");
    }

    #[test]
    fn test_picks_entry_without_appearances() {
        let contents = parse(APPEARANCE_COLORSET);
        let color = contents.any_idiom_color().unwrap();
        assert_eq!(color.raw_value(), "rgba(51, 51, 51, 0.5)");
    }

    #[test]
    fn test_appearance_only_colorset_has_no_base() {
        let contents = parse(
            r#"{ "colors": [{
                "idiom": "universal",
                "appearances": [{ "appearance": "luminosity", "value": "dark" }],
                "color": { "components": { "white": "0.9" } }
            }] }"#,
        );
        assert!(contents.any_idiom_color().is_none());
        assert!(NamedAssetColor::from_contents("Night", &contents).is_none());
    }

    #[test]
    fn test_missing_fields_default() {
        let contents = parse(r#"{ "colors": [{}] }"#);
        assert_eq!(contents.info, Info::default());
        let color = contents.any_idiom_color().unwrap();
        assert_eq!(color.idiom, "universal");
        assert_eq!(color.raw_value(), "rgba(255, 255, 255, 1)");
    }

    #[test]
    fn test_numeric_components_accepted() {
        let contents = parse(
            r#"{ "colors": [{ "color": { "components": { "red": 255, "green": 0.5, "blue": 0, "alpha": 0.25 } } }] }"#,
        );
        let color = contents.any_idiom_color().unwrap();
        assert_eq!(color.raw_value(), "rgba(255, 128, 0, 0.3)");
    }

    #[test]
    fn test_named_asset_color_raw_value() {
        let named = NamedAssetColor::from_contents("Brand", &parse(SRGB_COLORSET)).unwrap();
        assert_eq!(named.name(), "Brand");
        assert_eq!(named.raw_value(), "rgba(10, 20, 30, 1)");
    }

    // --- output shape tests ---

    #[test]
    fn test_with_components_shape() {
        let components = Components {
            red: 10,
            green: 20,
            blue: 30,
            alpha: 1.0,
        };
        let value = serde_json::to_value(ColorSetContents::with_components(&components)).unwrap();

        assert_eq!(value["info"]["author"], "xcode");
        assert_eq!(value["info"]["version"], 1);
        let entry = &value["colors"][0];
        assert_eq!(entry["idiom"], "universal");
        assert!(entry.get("appearances").is_none());
        assert_eq!(entry["color"]["colorSpace"], "srgb");
        let out = &entry["color"]["components"];
        assert_eq!(out["red"], "10");
        assert_eq!(out["green"], "20");
        assert_eq!(out["blue"], "30");
        assert_eq!(out["alpha"], "1.0");
        assert!(out.get("white").is_none());
    }

    #[test]
    fn test_written_colorset_reads_back() {
        let components = Components {
            red: 1,
            green: 2,
            blue: 3,
            alpha: 0.4,
        };
        let json = serde_json::to_string(&ColorSetContents::with_components(&components)).unwrap();
        let reread = parse(&json);
        assert_eq!(reread.any_idiom_color().unwrap().components(), components);
    }
}
