//! Built-in tools.
//!
//! Five entity tools each own one collection in the store; the move and delete
//! meta-tools act on the collections of every other registered tool.

mod delete;
mod move_tool;
mod points;
mod polygon;
mod polyline;
mod sector;
mod text;

pub use delete::DeleteTool;
pub use move_tool::MoveTool;
pub use points::PointsTool;
pub use polygon::PolygonTool;
pub use polyline::PolylineTool;
pub use sector::SectorTool;
pub use text::TextTool;

/// Names the default tool set is registered under.
pub mod names {
    /// Pass-through placeholder: events go to the map, not to a tool
    pub const EXPLORE: &str = "explore";
    pub const POINTS: &str = "points";
    pub const POLYLINE: &str = "polyline";
    pub const POLYGON: &str = "polygon";
    pub const SECTOR: &str = "sector";
    pub const TEXT: &str = "text";
    pub const MOVE: &str = "move";
    pub const DELETE: &str = "delete";
}
