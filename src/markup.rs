//! Storyboard and xib parsing.
//!
//! A document is read once into a flat list of declarations and color
//! elements, then resolved in two passes:
//!
//! 1. `namedColor` / `systemColor` declarations become `NamedColor`s.
//! 2. Every `color` element owned by an element with an `id` becomes a
//!    usage. Usages that reference a declared name take the declaration's
//!    channels, whatever their own attributes say.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::color::{ChannelTokens, Color, Components, NamedColor};
use crate::error::{Error, Result};

const COLOR_TAG: &str = "color";
const NAMED_COLOR_TAGS: [&str; 2] = ["namedColor", "systemColor"];

// ============================================================================
// ELEMENT ATTRIBUTES
// ============================================================================

/// Decoded attributes of one element, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn owned(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Build a color from a markup `color` element.
///
/// Markup always writes channels as fractions (`1` meaning `1.0`), so the
/// floating point interpretation is forced.
pub fn color_from_element(attributes: &Attributes, color_name: Option<String>) -> Color {
    let tokens = ChannelTokens {
        white: attributes.get("white"),
        red: attributes.get("red"),
        green: attributes.get("green"),
        blue: attributes.get("blue"),
        alpha: attributes.get("alpha"),
    };

    Color {
        color_space: attributes.owned("colorSpace"),
        custom_color_space: attributes.owned("customColorSpace"),
        ..Color::new(Components::from_tokens(&tokens, true), color_name)
    }
}

// ============================================================================
// PARSED DOCUMENT
// ============================================================================

/// A parsed storyboard or xib: its declared named colors and every usage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDocument {
    pub name: String,
    /// Declarations in document order. Duplicate names are kept.
    pub named_colors: Vec<NamedColor>,
    /// Attributable color usages in document order.
    pub colors: Vec<Color>,
}

impl ParsedDocument {
    /// Parse a document's full text.
    ///
    /// # Errors
    /// Returns an error if the text is not well-formed XML.
    pub fn parse(name: &str, text: &str) -> Result<Self> {
        let scan = scan_elements(text).map_err(|source| Error::Xml {
            file: name.to_string(),
            source,
        })?;

        let named_colors = resolve_named_colors(name, &scan.declarations);
        let colors = resolve_usages(name, &scan.usages, &named_colors);

        Ok(Self {
            name: name.to_string(),
            named_colors,
            colors,
        })
    }
}

// ============================================================================
// INTERNAL: Element scan
// ============================================================================

/// A `namedColor` / `systemColor` element and the first color nested in it.
#[derive(Debug, Default)]
struct Declaration {
    name: Option<String>,
    color: Option<Attributes>,
}

/// A `color` element with the context needed to attribute it.
#[derive(Debug)]
struct ColorElement {
    attributes: Attributes,
    parent_tag: Option<String>,
    owner_id: Option<String>,
}

#[derive(Debug)]
struct OpenElement {
    tag: String,
    id: Option<String>,
    declaration: Option<usize>,
}

#[derive(Debug, Default)]
struct ElementScan {
    declarations: Vec<Declaration>,
    usages: Vec<ColorElement>,
}

fn scan_elements(text: &str) -> quick_xml::Result<ElementScan> {
    let mut reader = Reader::from_str(text);
    let mut scan = ElementScan::default();
    let mut stack: Vec<OpenElement> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let element = visit_element(&reader, &start, &stack, &mut scan)?;
                stack.push(element);
            }
            Event::Empty(start) => {
                visit_element(&reader, &start, &stack, &mut scan)?;
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(scan)
}

/// Record one element and return its stack entry.
fn visit_element(
    reader: &Reader<&[u8]>,
    start: &BytesStart<'_>,
    stack: &[OpenElement],
    scan: &mut ElementScan,
) -> quick_xml::Result<OpenElement> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let attributes = read_attributes(reader, start)?;
    let mut declaration = None;

    if NAMED_COLOR_TAGS.contains(&tag.as_str()) {
        declaration = Some(scan.declarations.len());
        scan.declarations.push(Declaration {
            name: attributes.owned("name"),
            color: None,
        });
    } else if tag == COLOR_TAG {
        // The first color inside a declaration is its value.
        if let Some(index) = stack.iter().rev().find_map(|open| open.declaration) {
            let declared = &mut scan.declarations[index];
            if declared.color.is_none() {
                declared.color = Some(attributes.clone());
            }
        }

        let parent = stack.last();
        let grandparent = stack.len().checked_sub(2).map(|i| &stack[i]);
        scan.usages.push(ColorElement {
            parent_tag: parent.map(|open| open.tag.clone()),
            owner_id: parent
                .and_then(|open| open.id.clone())
                .or_else(|| grandparent.and_then(|open| open.id.clone())),
            attributes: attributes.clone(),
        });
    }

    Ok(OpenElement {
        tag,
        id: attributes.owned("id"),
        declaration,
    })
}

fn read_attributes(reader: &Reader<&[u8]>, start: &BytesStart<'_>) -> quick_xml::Result<Attributes> {
    let mut pairs = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .decode_and_unescape_value(reader.decoder())?
            .into_owned();
        pairs.push((key, value));
    }
    Ok(Attributes(pairs))
}

// ============================================================================
// INTERNAL: Resolution passes
// ============================================================================

fn find_named<'a>(named_colors: &'a [NamedColor], name: &str) -> Option<&'a NamedColor> {
    named_colors.iter().find(|named| named.name == name)
}

fn resolve_named_colors(file_name: &str, declarations: &[Declaration]) -> Vec<NamedColor> {
    declarations
        .iter()
        .map(|declaration| {
            let attributes = declaration.color.clone().unwrap_or_default();
            let color = Color {
                file_name: Some(file_name.to_string()),
                ..color_from_element(&attributes, declaration.name.clone())
            };
            NamedColor::new(declaration.name.clone().unwrap_or_default(), color)
        })
        .collect()
}

fn resolve_usages(
    file_name: &str,
    elements: &[ColorElement],
    named_colors: &[NamedColor],
) -> Vec<Color> {
    elements
        .iter()
        .filter_map(|element| {
            // Not attributable to a concrete UI element.
            let owner_id = element.owner_id.clone().filter(|id| !id.is_empty())?;

            let attributes = &element.attributes;
            let reference = attributes
                .owned("systemColor")
                .or_else(|| attributes.owned("cocoaTouchSystemColor"))
                .or_else(|| attributes.owned("name"));

            let mut color = Color {
                file_name: Some(file_name.to_string()),
                parent_name: element.parent_tag.clone(),
                parent_id: Some(owner_id),
                key: attributes.owned("key"),
                ..color_from_element(attributes, reference.clone())
            };

            if let Some(named) = reference
                .as_deref()
                .and_then(|name| find_named(named_colors, name))
            {
                color.components = named.color.components;
            }

            Some(color)
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::NamedRawValue;

    const STORYBOARD: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<document type="com.apple.InterfaceBuilder3.CocoaTouch.Storyboard.XIB" version="3.0">
    <scenes>
        <scene sceneID="s1">
            <objects>
                <viewController id="vc1" sceneMemberID="viewController">
                    <view key="view" contentMode="scaleToFill" id="v1">
                        <subviews>
                            <label text="Title" id="l1">
                                <color key="textColor" name="Brand" red="1" green="0" blue="0" alpha="1" colorSpace="custom" customColorSpace="sRGB"/>
                                <nil key="highlightedColor"/>
                            </label>
                        </subviews>
                        <color key="backgroundColor" systemColor="systemBackgroundColor"/>
                    </view>
                </viewController>
            </objects>
        </scene>
    </scenes>
    <resources>
        <namedColor name="Brand">
            <color red="0.039" green="0.078" blue="0.118" alpha="1" colorSpace="custom" customColorSpace="sRGB"/>
        </namedColor>
        <systemColor name="systemBackgroundColor">
            <color white="1" alpha="1" colorSpace="custom" customColorSpace="genericGamma22GrayColorSpace"/>
        </systemColor>
    </resources>
</document>
"#;

    fn attrs(pairs: &[(&str, &str)]) -> Attributes {
        pairs.iter().copied().collect()
    }

    // --- color_from_element tests ---

    #[test]
    fn test_element_channels_forced_float() {
        let color = color_from_element(
            &attrs(&[("red", "1"), ("green", "0"), ("blue", "0.5"), ("alpha", "1")]),
            None,
        );
        assert_eq!(color.raw_value(), "rgba(255, 0, 128, 1)");
        assert_eq!(color.color_name, None);
    }

    #[test]
    fn test_element_keeps_color_space() {
        let color = color_from_element(
            &attrs(&[("white", "0.5"), ("colorSpace", "custom"), ("customColorSpace", "sRGB")]),
            None,
        );
        assert_eq!(color.color_space.as_deref(), Some("custom"));
        assert_eq!(color.custom_color_space.as_deref(), Some("sRGB"));
        assert_eq!(color.name(), "gray128");
    }

    // --- named color pass tests ---

    #[test]
    fn test_named_colors_in_document_order() {
        let doc = ParsedDocument::parse("Main.storyboard", STORYBOARD).unwrap();
        let names: Vec<&str> = doc.named_colors.iter().map(|n| n.name()).collect();
        assert_eq!(names, ["Brand", "systemBackgroundColor"]);
        assert_eq!(doc.named_colors[0].raw_value(), "rgba(10, 20, 30, 1)");
        assert_eq!(doc.named_colors[1].raw_value(), "rgba(255, 255, 255, 1)");
        assert_eq!(doc.named_colors[0].color.file_name.as_deref(), Some("Main.storyboard"));
    }

    #[test]
    fn test_duplicate_declarations_kept_first_wins() {
        let doc = ParsedDocument::parse(
            "Dup.xib",
            r#"<document><resources>
                <namedColor name="Accent"><color white="0"/></namedColor>
                <namedColor name="Accent"><color white="1"/></namedColor>
            </resources></document>"#,
        )
        .unwrap();
        assert_eq!(doc.named_colors.len(), 2);
        assert_eq!(find_named(&doc.named_colors, "Accent").unwrap().raw_value(), "rgba(0, 0, 0, 1)");
    }

    #[test]
    fn test_declaration_without_color_is_white() {
        let doc = ParsedDocument::parse(
            "Empty.xib",
            r#"<document><resources><namedColor name="Ghost"/></resources></document>"#,
        )
        .unwrap();
        assert_eq!(doc.named_colors[0].raw_value(), "rgba(255, 255, 255, 1)");
    }

    // --- usage pass tests ---

    #[test]
    fn test_named_reference_overrides_local_channels() {
        let doc = ParsedDocument::parse("Main.storyboard", STORYBOARD).unwrap();
        let label_color = doc
            .colors
            .iter()
            .find(|c| c.parent_id.as_deref() == Some("l1"))
            .unwrap();

        // Local attributes say pure red; the declaration wins.
        assert_eq!(label_color.raw_value(), "rgba(10, 20, 30, 1)");
        assert_eq!(label_color.name(), "Brand");
        assert_eq!(label_color.key.as_deref(), Some("textColor"));
        assert_eq!(label_color.parent_name.as_deref(), Some("label"));
    }

    #[test]
    fn test_system_color_reference_resolves() {
        let doc = ParsedDocument::parse("Main.storyboard", STORYBOARD).unwrap();
        let background = doc
            .colors
            .iter()
            .find(|c| c.key.as_deref() == Some("backgroundColor"))
            .unwrap();
        assert_eq!(background.parent_id.as_deref(), Some("v1"));
        assert_eq!(background.parent_name.as_deref(), Some("view"));
        assert_eq!(background.name(), "systemBackgroundColor");
        assert_eq!(background.raw_value(), "rgba(255, 255, 255, 1)");
    }

    #[test]
    fn test_declaration_colors_without_owner_are_skipped() {
        let doc = ParsedDocument::parse("Main.storyboard", STORYBOARD).unwrap();
        // Only the label and view colors are attributable; the resource colors
        // sit under namedColor/resources which carry no id.
        assert_eq!(doc.colors.len(), 2);
        assert_eq!(doc.colors[0].parent_id.as_deref(), Some("l1"));
        assert_eq!(doc.colors[1].parent_id.as_deref(), Some("v1"));
    }

    #[test]
    fn test_owner_id_falls_back_to_grandparent() {
        let doc = ParsedDocument::parse(
            "Cell.xib",
            r#"<document><objects>
                <tableViewCell id="c1"><backgroundConfiguration>
                    <color key="backgroundColor" red="0.2" green="0.4" blue="0.6" alpha="0.94"/>
                </backgroundConfiguration></tableViewCell>
            </objects></document>"#,
        )
        .unwrap();
        assert_eq!(doc.colors.len(), 1);
        let color = &doc.colors[0];
        assert_eq!(color.parent_id.as_deref(), Some("c1"));
        assert_eq!(color.parent_name.as_deref(), Some("backgroundConfiguration"));
        assert_eq!(color.raw_value(), "rgba(51, 102, 153, 0.9)");
        assert_eq!(color.color_name, None);
    }

    #[test]
    fn test_unresolved_reference_keeps_own_channels() {
        let doc = ParsedDocument::parse(
            "Button.xib",
            r#"<document><button id="b1">
                <color key="tintColor" cocoaTouchSystemColor="darkTextColor" white="0.0" alpha="1"/>
            </button></document>"#,
        )
        .unwrap();
        let color = &doc.colors[0];
        assert_eq!(color.name(), "darkTextColor");
        assert_eq!(color.raw_value(), "rgba(0, 0, 0, 1)");
    }

    #[test]
    fn test_usage_before_declaration_still_resolves() {
        let doc = ParsedDocument::parse(
            "Order.xib",
            r#"<document>
                <view id="v1"><color key="backgroundColor" name="Late"/></view>
                <resources><namedColor name="Late"><color white="0" alpha="0.5"/></namedColor></resources>
            </document>"#,
        )
        .unwrap();
        assert_eq!(doc.colors[0].raw_value(), "rgba(0, 0, 0, 0.5)");
    }

    #[test]
    fn test_malformed_document_errors() {
        let result = ParsedDocument::parse("Broken.xib", "<document><view id=\"v1\"></document>");
        match result {
            Err(Error::Xml { file, .. }) => assert_eq!(file, "Broken.xib"),
            other => panic!("expected XML error, got {:?}", other),
        }
    }
}
