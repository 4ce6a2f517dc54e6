use std::any::Any;

use crate::geodesy::LatLng;
use crate::input::tool::{Tool, ToolContext, ToolRole};

/// Removes the entity under the pointer on click.
#[derive(Debug, Default)]
pub struct DeleteTool;

impl DeleteTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for DeleteTool {
    fn role(&self) -> ToolRole {
        ToolRole::Meta
    }

    fn add(&mut self, at: LatLng, ctx: &mut ToolContext<'_>) {
        let Some((owner, index)) = ctx
            .hit
            .pick_for_delete(at, ctx.candidates, ctx.store, ctx.projection)
        else {
            return;
        };
        if ctx.store.remove_at(&owner, index).is_some() {
            ctx.mark_changed();
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
