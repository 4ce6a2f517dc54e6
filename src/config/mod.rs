//! Configuration file support for geoscribe.
//!
//! This module handles loading and validating user settings from the configuration file
//! located at `~/.config/geoscribe/config.toml`. Settings include per-kind style defaults,
//! picking tolerance, elevation lookup tuning, and sector tessellation.
//!
//! If no config file exists, sensible defaults are used automatically.

pub mod enums;
pub mod types;

pub use enums::ColorSpec;
pub use types::{
    ElevationConfig, LineStyleConfig, PickingConfig, PointStyleConfig, PolygonStyleConfig,
    SectorConfig, SectorStyleConfig, StylesConfig, TextStyleConfig,
};

use crate::draw::{
    LineStyle, PointStyle, PolygonStyle, RenderOptions, SectorStyle, StyleDefaults, TextStyle,
};
use crate::elevation::ElevationSettings;
use anyhow::{Context, Result};
use log::{debug, info, warn};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main configuration structure containing all user settings.
///
/// All fields have defaults and will use those if not specified in the config file.
///
/// # Example TOML
/// ```toml
/// [styles.line]
/// color = "#3388ff"
/// dash_style = "dashed"
/// weight = 4.0
///
/// [styles.sector]
/// angle = 45.0
///
/// [picking]
/// tolerance_px = 12.0
///
/// [elevation]
/// enabled = true
/// cache_precision = 5
/// debounce_ms = 250
///
/// [sector]
/// step_degrees = 2.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, JsonSchema)]
pub struct Config {
    /// Per-kind style defaults
    #[serde(default)]
    pub styles: StylesConfig,

    /// Hit-detection settings
    #[serde(default)]
    pub picking: PickingConfig,

    /// Elevation lookup settings
    #[serde(default)]
    pub elevation: ElevationConfig,

    /// Sector rendering settings
    #[serde(default)]
    pub sector: SectorConfig,
}

impl Config {
    /// Validates and clamps all configuration values to acceptable ranges.
    ///
    /// Invalid values are clamped to the nearest valid value and a warning is logged.
    ///
    /// Validated ranges:
    /// - `styles.line.weight`: 1.0 - 20.0
    /// - `styles.*.fill_alpha`: 0.0 - 1.0
    /// - `styles.sector.angle`: 1.0 - 360.0
    /// - `styles.text.font_size`: 6.0 - 72.0
    /// - `picking.tolerance_px`: 1.0 - 50.0
    /// - `elevation.cache_precision`: 0 - 8
    /// - `elevation.debounce_ms`: 0 - 5000
    /// - `sector.step_degrees`: 0.5 - 15.0
    pub fn validate_and_clamp(&mut self) {
        clamp_f64(&mut self.styles.line.weight, 1.0, 20.0, "styles.line.weight");
        clamp_f64(
            &mut self.styles.polygon.fill_alpha,
            0.0,
            1.0,
            "styles.polygon.fill_alpha",
        );
        clamp_f64(
            &mut self.styles.sector.fill_alpha,
            0.0,
            1.0,
            "styles.sector.fill_alpha",
        );
        clamp_f64(&mut self.styles.sector.angle, 1.0, 360.0, "styles.sector.angle");
        clamp_f64(
            &mut self.styles.text.font_size,
            6.0,
            72.0,
            "styles.text.font_size",
        );
        clamp_f64(
            &mut self.picking.tolerance_px,
            1.0,
            50.0,
            "picking.tolerance_px",
        );
        clamp_f64(&mut self.sector.step_degrees, 0.5, 15.0, "sector.step_degrees");

        if self.elevation.cache_precision > 8 {
            warn!(
                "Invalid elevation.cache_precision {}, clamping to 0-8 range",
                self.elevation.cache_precision
            );
            self.elevation.cache_precision = 8;
        }

        if self.elevation.debounce_ms > 5000 {
            warn!(
                "Invalid elevation.debounce_ms {}, clamping to 0-5000 range",
                self.elevation.debounce_ms
            );
            self.elevation.debounce_ms = 5000;
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// The config file is located at `~/.config/geoscribe/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("geoscribe");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads configuration from the default location, or returns defaults if not found.
    ///
    /// # Errors
    /// Returns an error if:
    /// - The config directory path cannot be determined
    /// - The file exists but cannot be read
    /// - The file exists but contains invalid TOML syntax
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads and validates configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {}", path.display()))?;

        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config from {}", path.display()))?;

        config.validate_and_clamp();

        info!("Loaded config from {}", path.display());
        debug!("Config: {:?}", config);

        Ok(config)
    }

    /// JSON schema of the configuration file, for editor tooling.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Builds the style defaults injected into the drawing tools.
    pub fn style_defaults(&self) -> StyleDefaults {
        let fallback = StyleDefaults::default();
        let styles = &self.styles;
        StyleDefaults {
            point: PointStyle {
                color: styles.point.color.to_color_or(fallback.point.color),
                symbol: styles.point.symbol,
            },
            line: LineStyle {
                color: styles.line.color.to_color_or(fallback.line.color),
                dash: styles.line.dash_style,
                weight: styles.line.weight,
            },
            polygon: PolygonStyle {
                color: styles.polygon.color.to_color_or(fallback.polygon.color),
                fill_alpha: styles.polygon.fill_alpha,
            },
            sector: SectorStyle {
                color: styles.sector.color.to_color_or(fallback.sector.color),
                fill_alpha: styles.sector.fill_alpha,
            },
            text: TextStyle {
                color: styles.text.color.to_color_or(fallback.text.color),
                font_size: styles.text.font_size,
            },
            sector_angle: styles.sector.angle,
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            sector_step_degrees: self.sector.step_degrees,
        }
    }

    pub fn elevation_settings(&self) -> ElevationSettings {
        ElevationSettings {
            cache_precision: self.elevation.cache_precision,
            debounce: Duration::from_millis(self.elevation.debounce_ms),
        }
    }
}

fn clamp_f64(value: &mut f64, min: f64, max: f64, name: &str) {
    if !(min..=max).contains(value) {
        warn!(
            "Invalid {} {:.2}, clamping to {:.1}-{:.1} range",
            name,
            value,
            min,
            max
        );
        // NaN fails `contains` and `clamp` would keep it
        *value = if value.is_nan() {
            min
        } else {
            value.clamp(min, max)
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{Color, DashStyle, PointSymbol};

    #[test]
    fn empty_file_matches_builtin_style_defaults() {
        let config: Config = toml::from_str("").expect("empty config parses");
        assert_eq!(config.style_defaults(), StyleDefaults::default());
        assert_eq!(config.render_options(), RenderOptions::default());
        assert_eq!(config.elevation_settings(), ElevationSettings::default());
        assert!(config.elevation.enabled);
    }

    #[test]
    fn partial_tables_fill_in_defaults() {
        let config: Config = toml::from_str(
            r##"
            [styles.point]
            symbol = "triangle"

            [styles.line]
            color = "#00ff00"
            dash_style = "dotted"

            [styles.sector]
            angle = 90.0

            [picking]
            tolerance_px = 6.0
            "##,
        )
        .expect("config parses");

        let styles = config.style_defaults();
        assert_eq!(styles.point.symbol, PointSymbol::Triangle);
        assert_eq!(styles.line.color, Color::from_rgb8(0, 255, 0));
        assert_eq!(styles.line.dash, DashStyle::Dotted);
        assert_eq!(styles.line.weight, 3.0);
        assert_eq!(styles.sector_angle, 90.0);
        assert_eq!(styles.sector, StyleDefaults::default().sector);
        assert_eq!(config.picking.tolerance_px, 6.0);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let mut config: Config = toml::from_str(
            r#"
            [styles.sector]
            angle = 720.0
            fill_alpha = -1.0

            [elevation]
            cache_precision = 12
            debounce_ms = 60000

            [sector]
            step_degrees = 0.0
            "#,
        )
        .expect("config parses");
        config.validate_and_clamp();

        assert_eq!(config.styles.sector.angle, 360.0);
        assert_eq!(config.styles.sector.fill_alpha, 0.0);
        assert_eq!(config.elevation.cache_precision, 8);
        assert_eq!(config.elevation.debounce_ms, 5000);
        assert_eq!(config.sector.step_degrees, 0.5);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "[picking\ntolerance_px = 3").expect("write config");
        let err = Config::load_from(&path).expect_err("invalid TOML");
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn schema_mentions_every_section() {
        let schema = serde_json::to_string(&Config::json_schema()).expect("schema serializes");
        for section in ["styles", "picking", "elevation", "sector"] {
            assert!(schema.contains(section), "missing {section}");
        }
    }
}
