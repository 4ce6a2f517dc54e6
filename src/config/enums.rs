//! Configuration enum types.

use crate::draw::{Color, color::*};
use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Configured color: a named color, a hex string, or RGB values.
///
/// # Examples
/// ```toml
/// # Named color
/// color = "red"
///
/// # Hex string
/// color = "#3388ff"
///
/// # Custom RGB color (0-255 per component)
/// color = [255, 128, 0]  # Orange
/// ```
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
#[serde(untagged)]
pub enum ColorSpec {
    /// Named color (red, green, blue, yellow, orange, pink, white, black) or `#rrggbb`
    Name(String),
    /// RGB color as [red, green, blue] where each component is 0-255
    Rgb([u8; 3]),
}

impl ColorSpec {
    /// Converts the configured value to an opaque [`Color`].
    ///
    /// Strings starting with `#` are parsed as hex, anything else as a color name.
    /// Unrecognized strings fall back to `fallback` with a warning.
    pub fn to_color_or(&self, fallback: Color) -> Color {
        match self {
            ColorSpec::Name(name) if name.starts_with('#') => {
                Color::from_hex(name).unwrap_or_else(|| {
                    warn!("Invalid hex color '{}', using {}", name, fallback.to_hex());
                    fallback
                })
            }
            ColorSpec::Name(name) => Color::from_name(name).unwrap_or_else(|| {
                warn!("Unknown color '{}', using {}", name, fallback.to_hex());
                fallback
            }),
            ColorSpec::Rgb([r, g, b]) => Color::from_rgb8(*r, *g, *b),
        }
    }

    /// Same as [`to_color_or`](Self::to_color_or) with red as the fallback.
    pub fn to_color(&self) -> Color {
        self.to_color_or(RED)
    }
}

impl From<&str> for ColorSpec {
    fn from(name: &str) -> Self {
        ColorSpec::Name(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_hex_and_rgb_specs_resolve() {
        assert_eq!(ColorSpec::from("blue").to_color(), BLUE);
        assert_eq!(
            ColorSpec::from("#ff8000").to_color(),
            Color::from_rgb8(255, 128, 0)
        );
        assert_eq!(ColorSpec::Rgb([0, 255, 0]).to_color(), GREEN);
    }

    #[test]
    fn unknown_spec_uses_fallback() {
        assert_eq!(ColorSpec::from("mauve").to_color_or(WHITE), WHITE);
        assert_eq!(ColorSpec::from("#12").to_color_or(BLACK), BLACK);
    }
}
