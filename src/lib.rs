//! Interactive geographic annotation editing engine.
//!
//! Turns pointer events from a map view into points, lines, polygons, sectors, and
//! text labels, measures them on a spherical earth, and exchanges them as GeoJSON.
//! Rendering, tiles, and the elevation network service are supplied by the
//! embedding application through the traits in [`draw`] and [`elevation`].

pub mod config;
pub mod draw;
pub mod elevation;
pub mod geodesy;
pub mod input;
pub mod interchange;

pub use config::Config;
pub use input::{InputEvent, ToolRegistry};
