use std::any::Any;

use log::debug;

use crate::draw::{Entity, EntityId};
use crate::geodesy::LatLng;
use crate::input::tool::{Tool, ToolContext, ToolRole};

#[derive(Debug)]
struct Drag {
    target: EntityId,
    /// Snapshot taken at pointer-down; live coordinates are always origin + delta
    origin: Entity,
    start: LatLng,
}

/// Drags any entity owned by another tool.
#[derive(Debug, Default)]
pub struct MoveTool {
    drag: Option<Drag>,
}

impl MoveTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entity currently being dragged.
    pub fn target(&self) -> Option<EntityId> {
        self.drag.as_ref().map(|d| d.target)
    }
}

impl Tool for MoveTool {
    fn role(&self) -> ToolRole {
        ToolRole::Meta
    }

    fn on_pointer_down(&mut self, at: LatLng, ctx: &mut ToolContext<'_>) {
        let Some(hit) = ctx.hit.pick(at, ctx.candidates, ctx.store, ctx.projection) else {
            return;
        };
        if let Some(entity) = ctx.store.get(hit.id) {
            debug!("Starting drag of {} from '{}'", hit.id, hit.owner);
            self.drag = Some(Drag {
                target: hit.id,
                origin: entity.clone(),
                start: at,
            });
        }
    }

    fn on_pointer_move(&mut self, at: LatLng, ctx: &mut ToolContext<'_>) {
        let Some(drag) = &self.drag else {
            return;
        };
        let d_lat = at.lat - drag.start.lat;
        let d_lng = at.lng - drag.start.lng;
        let moved = ctx
            .store
            .get_mut(drag.target)
            .is_some_and(|live| live.translate_from(&drag.origin, d_lat, d_lng));
        if moved {
            ctx.mark_changed();
        }
    }

    fn on_pointer_up(&mut self, _at: LatLng, _ctx: &mut ToolContext<'_>) {
        self.drag = None;
    }

    fn cancel(&mut self) {
        self.drag = None;
    }

    fn on_deactivate(&mut self) {
        self.drag = None;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
