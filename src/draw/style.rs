//! Per-kind style bundles and the defaults provider that snapshots them.

use super::color::{BLUE, Color, ORANGE, RED, WHITE};
use super::entity::EntityKind;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Marker glyph drawn for a point entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum PointSymbol {
    #[default]
    Circle,
    Square,
    Triangle,
    Cross,
}

/// Stroke pattern for line entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum DashStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Error returned when parsing an unknown symbol or dash name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown style name '{0}'")]
pub struct UnknownStyleName(pub String);

impl PointSymbol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Square => "square",
            Self::Triangle => "triangle",
            Self::Cross => "cross",
        }
    }
}

impl FromStr for PointSymbol {
    type Err = UnknownStyleName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "circle" => Ok(Self::Circle),
            "square" => Ok(Self::Square),
            "triangle" => Ok(Self::Triangle),
            "cross" => Ok(Self::Cross),
            other => Err(UnknownStyleName(other.to_string())),
        }
    }
}

impl DashStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Solid => "solid",
            Self::Dashed => "dashed",
            Self::Dotted => "dotted",
        }
    }
}

impl FromStr for DashStyle {
    type Err = UnknownStyleName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solid" => Ok(Self::Solid),
            "dashed" => Ok(Self::Dashed),
            "dotted" => Ok(Self::Dotted),
            other => Err(UnknownStyleName(other.to_string())),
        }
    }
}

impl fmt::Display for PointSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DashStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointStyle {
    pub color: Color,
    pub symbol: PointSymbol,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: Color,
    pub dash: DashStyle,
    /// Stroke width in pixels
    pub weight: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonStyle {
    pub color: Color,
    /// Fill opacity (0.0 - 1.0); the outline is always opaque
    pub fill_alpha: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectorStyle {
    pub color: Color,
    pub fill_alpha: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub color: Color,
    /// Font size in points
    pub font_size: f64,
}

/// Default attribute bundle for one entity kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StyleBundle {
    Point(PointStyle),
    Line(LineStyle),
    Polygon(PolygonStyle),
    Sector(SectorStyle),
    Text(TextStyle),
}

/// Immutable set of style defaults, injected into tools and copied onto every new
/// draft or entity. Later changes to the defaults never reach existing entities.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleDefaults {
    pub point: PointStyle,
    pub line: LineStyle,
    pub polygon: PolygonStyle,
    pub sector: SectorStyle,
    pub text: TextStyle,
    /// Angular span in degrees given to new sector drafts
    pub sector_angle: f64,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            point: PointStyle {
                color: RED,
                symbol: PointSymbol::Circle,
            },
            line: LineStyle {
                color: BLUE,
                dash: DashStyle::Solid,
                weight: 3.0,
            },
            polygon: PolygonStyle {
                color: ORANGE,
                fill_alpha: 0.3,
            },
            sector: SectorStyle {
                color: RED,
                fill_alpha: 0.25,
            },
            text: TextStyle {
                color: WHITE,
                font_size: 14.0,
            },
            sector_angle: 60.0,
        }
    }
}

impl StyleDefaults {
    /// Returns a copy of the defaults for the given entity kind.
    pub fn defaults(&self, kind: EntityKind) -> StyleBundle {
        match kind {
            EntityKind::Point => StyleBundle::Point(self.point),
            EntityKind::Line => StyleBundle::Line(self.line),
            EntityKind::Polygon => StyleBundle::Polygon(self.polygon),
            EntityKind::Sector => StyleBundle::Sector(self.sector),
            EntityKind::Text => StyleBundle::Text(self.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_returns_bundle_matching_kind() {
        let styles = StyleDefaults::default();
        assert!(matches!(
            styles.defaults(EntityKind::Sector),
            StyleBundle::Sector(SectorStyle { fill_alpha, .. }) if fill_alpha == 0.25
        ));
        assert_eq!(styles.sector_angle, 60.0);
        assert!(matches!(
            styles.defaults(EntityKind::Text),
            StyleBundle::Text(_)
        ));
    }

    #[test]
    fn style_names_parse_back() {
        for symbol in [
            PointSymbol::Circle,
            PointSymbol::Square,
            PointSymbol::Triangle,
            PointSymbol::Cross,
        ] {
            assert_eq!(symbol.as_str().parse::<PointSymbol>(), Ok(symbol));
        }
        assert_eq!("dotted".parse::<DashStyle>(), Ok(DashStyle::Dotted));
        assert!("wavy".parse::<DashStyle>().is_err());
    }
}
