//! Canonical color representation.
//!
//! Pure functions — channel tokens in, `Color` out. No I/O.
//!
//! Every source encoding (asset JSON, markup attributes) is normalized into
//! `Components`: integer RGB in 0..=255 plus an alpha fraction rounded to
//! tenths. The formatted raw value `rgba(r, g, b, a)` is the only equality
//! key used for grouping.

use tracing::debug;

/// Default value for a channel that is missing or unparseable.
const DEFAULT_CHANNEL: u8 = 255;

/// Default alpha for a missing or unparseable alpha token.
const DEFAULT_ALPHA: f64 = 1.0;

/// Name given to any fully transparent color without an explicit name.
pub const CLEAR_NAME: &str = "clear";

// ============================================================================
// CHANNEL PARSING
// ============================================================================

/// Raw text tokens for one color, as found in a source file.
///
/// All fields are optional; missing channels fall back to opaque white.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelTokens<'a> {
    pub white: Option<&'a str>,
    pub red: Option<&'a str>,
    pub green: Option<&'a str>,
    pub blue: Option<&'a str>,
    pub alpha: Option<&'a str>,
}

/// Parse a single channel token into 0..=255.
///
/// - Contains `.` (or `force_float`): fraction, scaled by 255 and rounded.
/// - Contains `0x`: base 16.
/// - Otherwise: base 10 integer.
///
/// `force_float` exists because markup writes `1` instead of `1.0` for a
/// saturated channel. Returns `None` for unparseable tokens; values outside
/// the channel range saturate.
pub fn parse_channel(token: &str, force_float: bool) -> Option<u8> {
    let token = token.trim();

    let value = if token.contains('.') || force_float {
        let fraction: f64 = token.parse().ok()?;
        if !fraction.is_finite() {
            return None;
        }
        (fraction * 255.0).round()
    } else if let Some(pos) = token.find("0x") {
        i64::from_str_radix(&token[pos + 2..], 16).ok()? as f64
    } else {
        token.parse::<i64>().ok()? as f64
    };

    Some(value.clamp(0.0, 255.0) as u8)
}

/// Parse an alpha token as a fraction and round it to one decimal place.
///
/// Missing or unparseable tokens yield fully opaque.
pub fn parse_alpha(token: Option<&str>) -> f64 {
    let alpha = match token {
        None => DEFAULT_ALPHA,
        Some(token) => match token.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => value,
            _ => {
                debug!(token = %token, "unparseable alpha token, defaulting to opaque");
                DEFAULT_ALPHA
            }
        },
    };
    round_alpha(alpha)
}

/// Round an alpha fraction to tenths, clamped to 0..=1.
///
/// Lossy on purpose: alphas that differ only below a tenth collapse into
/// the same raw value.
pub fn round_alpha(alpha: f64) -> f64 {
    // `+ 0.0` turns -0.0 into 0.0 so it never prints as "-0"
    (alpha.clamp(0.0, 1.0) * 10.0).round() / 10.0 + 0.0
}

fn channel_or_default(token: Option<&str>, force_float: bool) -> u8 {
    match token {
        None => DEFAULT_CHANNEL,
        Some(token) => parse_channel(token, force_float).unwrap_or_else(|| {
            debug!(token = %token, "unparseable channel token, defaulting to 255");
            DEFAULT_CHANNEL
        }),
    }
}

// ============================================================================
// COMPONENTS
// ============================================================================

/// Normalized RGBA channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Components {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    /// Always a multiple of 0.1 in 0..=1.
    pub alpha: f64,
}

impl Default for Components {
    fn default() -> Self {
        Self {
            red: DEFAULT_CHANNEL,
            green: DEFAULT_CHANNEL,
            blue: DEFAULT_CHANNEL,
            alpha: DEFAULT_ALPHA,
        }
    }
}

impl Components {
    /// Build components from raw tokens.
    ///
    /// A white token overrides any individual red/green/blue tokens.
    pub fn from_tokens(tokens: &ChannelTokens<'_>, force_float: bool) -> Self {
        let (red, green, blue) = match tokens.white {
            Some(white) => {
                let value = channel_or_default(Some(white), force_float);
                (value, value, value)
            }
            None => (
                channel_or_default(tokens.red, force_float),
                channel_or_default(tokens.green, force_float),
                channel_or_default(tokens.blue, force_float),
            ),
        };

        Self {
            red,
            green,
            blue,
            alpha: parse_alpha(tokens.alpha),
        }
    }

    /// Parse a raw value (`rgba(r, g, b, a)`) back into components.
    ///
    /// Returns `None` if the string is not in raw value form.
    pub fn from_raw_value(raw: &str) -> Option<Self> {
        let inner = raw.trim().strip_prefix("rgba(")?.strip_suffix(')')?;
        let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
        let [red, green, blue, alpha] = parts.as_slice() else {
            return None;
        };

        Some(Self {
            red: parse_channel(red, false)?,
            green: parse_channel(green, false)?,
            blue: parse_channel(blue, false)?,
            alpha: round_alpha(alpha.parse().ok()?),
        })
    }

    /// Canonical `rgba(r, g, b, a)` string, the grouping key.
    pub fn raw_value(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.red, self.green, self.blue, self.alpha
        )
    }

    /// Alpha as a whole percentage (0.5 → 50).
    pub fn alpha_percent(&self) -> u8 {
        (self.alpha * 100.0).round() as u8
    }

    /// Name synthesized for unnamed clear and gray colors.
    ///
    /// - alpha 0 → `clear`
    /// - r = g = b → `gray{r}`, plus `-{alpha%}%` when not opaque
    /// - anything else → `None`
    pub fn derived_name(&self) -> Option<String> {
        if self.alpha == 0.0 {
            return Some(CLEAR_NAME.to_string());
        }

        if self.red == self.green && self.green == self.blue {
            let alpha_label = if self.alpha == 1.0 {
                String::new()
            } else {
                format!("-{}%", self.alpha_percent())
            };
            return Some(format!("gray{}{}", self.red, alpha_label));
        }

        None
    }
}

// ============================================================================
// COLOR
// ============================================================================

/// One color occurrence: normalized channels plus where it came from.
///
/// Provenance fields are informational and never affect grouping.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Color {
    /// File the color was found in.
    pub file_name: Option<String>,
    /// Tag name of the owning element (e.g. `view`, `label`).
    pub parent_name: Option<String>,
    /// `id` of the owning element.
    pub parent_id: Option<String>,
    /// `key` attribute of the color element (e.g. `backgroundColor`).
    pub key: Option<String>,
    pub color_space: Option<String>,
    pub custom_color_space: Option<String>,
    /// Explicit or synthesized name.
    pub color_name: Option<String>,
    pub components: Components,
}

impl Color {
    /// Create a color, synthesizing a name when none is given.
    ///
    /// An empty name counts as no name.
    pub fn new(components: Components, color_name: Option<String>) -> Self {
        let color_name = color_name
            .filter(|name| !name.is_empty())
            .or_else(|| components.derived_name());

        Self {
            color_name,
            components,
            ..Default::default()
        }
    }

    /// Canonical raw value of this color.
    pub fn raw_value(&self) -> String {
        self.components.raw_value()
    }

    /// The color's name, or an empty string.
    pub fn name(&self) -> &str {
        self.color_name.as_deref().unwrap_or("")
    }
}

// ============================================================================
// NAMED COLORS
// ============================================================================

/// Anything that pairs a name with a color value.
///
/// Both markup declarations and asset catalog entries group by the same
/// contract: one name, one raw value.
pub trait NamedRawValue {
    fn name(&self) -> &str;
    fn raw_value(&self) -> String;
}

/// A named color declared in a markup document.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedColor {
    pub name: String,
    pub color: Color,
}

impl NamedColor {
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Self {
            name: name.into(),
            color,
        }
    }
}

impl NamedRawValue for NamedColor {
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
