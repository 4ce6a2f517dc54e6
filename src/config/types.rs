//! Configuration type definitions.

use super::enums::ColorSpec;
use crate::draw::{DashStyle, PointSymbol};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Style defaults copied onto every new entity, one table per entity kind.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct StylesConfig {
    #[serde(default)]
    pub point: PointStyleConfig,
    #[serde(default)]
    pub line: LineStyleConfig,
    #[serde(default)]
    pub polygon: PolygonStyleConfig,
    #[serde(default)]
    pub sector: SectorStyleConfig,
    #[serde(default)]
    pub text: TextStyleConfig,
}

/// `[styles.point]`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PointStyleConfig {
    /// Marker color
    #[serde(default = "default_point_color")]
    pub color: ColorSpec,

    /// Marker glyph: circle, square, triangle, or cross
    #[serde(default)]
    pub symbol: PointSymbol,
}

impl Default for PointStyleConfig {
    fn default() -> Self {
        Self {
            color: default_point_color(),
            symbol: PointSymbol::default(),
        }
    }
}

/// `[styles.line]`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct LineStyleConfig {
    #[serde(default = "default_line_color")]
    pub color: ColorSpec,

    /// Stroke pattern: solid, dashed, or dotted
    #[serde(default)]
    pub dash_style: DashStyle,

    /// Stroke width in pixels (valid range: 1.0 - 20.0)
    #[serde(default = "default_line_weight")]
    pub weight: f64,
}

impl Default for LineStyleConfig {
    fn default() -> Self {
        Self {
            color: default_line_color(),
            dash_style: DashStyle::default(),
            weight: default_line_weight(),
        }
    }
}

/// `[styles.polygon]`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PolygonStyleConfig {
    #[serde(default = "default_polygon_color")]
    pub color: ColorSpec,

    /// Fill opacity (valid range: 0.0 - 1.0)
    #[serde(default = "default_polygon_fill_alpha")]
    pub fill_alpha: f64,
}

impl Default for PolygonStyleConfig {
    fn default() -> Self {
        Self {
            color: default_polygon_color(),
            fill_alpha: default_polygon_fill_alpha(),
        }
    }
}

/// `[styles.sector]`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SectorStyleConfig {
    #[serde(default = "default_sector_color")]
    pub color: ColorSpec,

    /// Fill opacity (valid range: 0.0 - 1.0)
    #[serde(default = "default_sector_fill_alpha")]
    pub fill_alpha: f64,

    /// Angular span of new sectors in degrees (valid range: 1.0 - 360.0)
    #[serde(default = "default_sector_angle")]
    pub angle: f64,
}

impl Default for SectorStyleConfig {
    fn default() -> Self {
        Self {
            color: default_sector_color(),
            fill_alpha: default_sector_fill_alpha(),
            angle: default_sector_angle(),
        }
    }
}

/// `[styles.text]`
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TextStyleConfig {
    #[serde(default = "default_text_color")]
    pub color: ColorSpec,

    /// Font size in points (valid range: 6.0 - 72.0)
    #[serde(default = "default_text_font_size")]
    pub font_size: f64,
}

impl Default for TextStyleConfig {
    fn default() -> Self {
        Self {
            color: default_text_color(),
            font_size: default_text_font_size(),
        }
    }
}

/// Hit-detection settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PickingConfig {
    /// Pick radius around the pointer in pixels (valid range: 1.0 - 50.0)
    #[serde(default = "default_tolerance_px")]
    pub tolerance_px: f64,
}

impl Default for PickingConfig {
    fn default() -> Self {
        Self {
            tolerance_px: default_tolerance_px(),
        }
    }
}

/// Elevation lookup settings.
///
/// Lookups are fire-and-forget; a failed lookup simply leaves the elevation unset.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ElevationConfig {
    /// Issue lookups for new points, line vertices, and sector centers
    #[serde(default = "default_elevation_enabled")]
    pub enabled: bool,

    /// Decimal places of lat/lng kept in cache keys (valid range: 0 - 8)
    #[serde(default = "default_cache_precision")]
    pub cache_precision: u32,

    /// Quiet period before a status-bar lookup is sent, in milliseconds (valid range: 0 - 5000)
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for ElevationConfig {
    fn default() -> Self {
        Self {
            enabled: default_elevation_enabled(),
            cache_precision: default_cache_precision(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// Sector rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SectorConfig {
    /// Angular step between generated arc points in degrees (valid range: 0.5 - 15.0)
    #[serde(default = "default_step_degrees")]
    pub step_degrees: f64,
}

impl Default for SectorConfig {
    fn default() -> Self {
        Self {
            step_degrees: default_step_degrees(),
        }
    }
}

// =============================================================================
// Default value functions
// =============================================================================

fn default_point_color() -> ColorSpec {
    ColorSpec::from("red")
}

fn default_line_color() -> ColorSpec {
    ColorSpec::from("blue")
}

fn default_line_weight() -> f64 {
    3.0
}

fn default_polygon_color() -> ColorSpec {
    ColorSpec::from("orange")
}

fn default_polygon_fill_alpha() -> f64 {
    0.3
}

fn default_sector_color() -> ColorSpec {
    ColorSpec::from("red")
}

fn default_sector_fill_alpha() -> f64 {
    0.25
}

fn default_sector_angle() -> f64 {
    60.0
}

fn default_text_color() -> ColorSpec {
    ColorSpec::from("white")
}

fn default_text_font_size() -> f64 {
    14.0
}

fn default_tolerance_px() -> f64 {
    10.0
}

fn default_elevation_enabled() -> bool {
    true
}

fn default_cache_precision() -> u32 {
    5
}

fn default_debounce_ms() -> u64 {
    250
}

fn default_step_degrees() -> f64 {
    2.0
}
