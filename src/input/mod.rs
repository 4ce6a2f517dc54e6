//! Input handling and the tool state machine.
//!
//! This module turns pointer events from the map view into entity edits. The
//! [`ToolRegistry`] routes each event to the single active [`Tool`]; entity tools
//! grow their drafts and commit into the shared store, while the move and delete
//! meta-tools use the [`HitDetector`] to reach entities owned by other tools.

pub mod events;
pub mod hit;
pub mod registry;
pub mod tool;
pub mod tools;

// Re-export commonly used types at module level
pub use events::InputEvent;
pub use hit::{DEFAULT_TOLERANCE_PX, Hit, HitDetector};
pub use registry::{RegistryEvent, ToolRegistry, ToolStats};
pub use tool::{Tool, ToolContext, ToolRole};
pub use tools::{
    DeleteTool, MoveTool, PointsTool, PolygonTool, PolylineTool, SectorTool, TextTool, names,
};
