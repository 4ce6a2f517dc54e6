//! Entity definitions, the entity store, and the renderer contract.
//!
//! This module defines the core data types for geographic annotation:
//! - [`Entity`]: closed tagged union of points, lines, polygons, sectors, and text
//! - [`EntityStore`]: central table of committed entities addressed by [`EntityId`]
//! - [`StyleDefaults`]: per-kind style bundles copied onto new entities
//! - [`Surface`] / [`Projection`]: what the embedding map view must provide
//! - Rendering functions that turn entities into surface primitives

pub mod color;
pub mod entity;
pub mod render;
pub mod store;
pub mod style;
pub mod surface;

// Re-export commonly used types at module level
pub use color::Color;
pub use entity::{
    Entity, EntityKind, LineEntity, PointEntity, PolygonEntity, SectorEntity, TextEntity, Vertex,
};
pub use render::{RenderOptions, render_entities, render_entity};
pub use store::{EntityId, EntityStore};
pub use style::{
    DashStyle, LineStyle, PointStyle, PointSymbol, PolygonStyle, SectorStyle, StyleBundle,
    StyleDefaults, TextStyle,
};
pub use surface::{Label, MercatorView, Projection, ScreenPoint, Stroke, Surface};

pub use color::{BLACK, BLUE, GREEN, ORANGE, PINK, RED, WHITE, YELLOW};
