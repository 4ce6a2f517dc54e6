use std::any::Any;

use geojson::Feature;
use log::debug;

use crate::draw::render::render_vertex_handles;
use crate::draw::{
    Entity, EntityId, EntityStore, LineEntity, RenderOptions, StyleDefaults, Surface, Vertex,
    render_entity,
};
use crate::geodesy::LatLng;
use crate::input::tool::{Tool, ToolContext, draw_committed};
use crate::interchange::codec;

/// Minimum vertex count for a committed line.
const MIN_VERTICES: usize = 2;

#[derive(Debug)]
struct LineDraft {
    id: EntityId,
    line: LineEntity,
}

/// Builds open polylines one click at a time; double-click finishes.
#[derive(Debug, Default)]
pub struct PolylineTool {
    draft: Option<LineDraft>,
    hover: Option<LatLng>,
}

impl PolylineTool {
    pub fn new() -> Self {
        Self::default()
    }

    /// The in-progress line, if any.
    pub fn draft(&self) -> Option<&LineEntity> {
        self.draft.as_ref().map(|d| &d.line)
    }

    pub fn hover(&self) -> Option<LatLng> {
        self.hover
    }
}

impl Tool for PolylineTool {
    fn add(&mut self, at: LatLng, ctx: &mut ToolContext<'_>) {
        let draft = self.draft.get_or_insert_with(|| LineDraft {
            id: ctx.store.allocate_id(),
            line: LineEntity {
                vertices: Vec::new(),
                style: ctx.styles.line,
            },
        });
        draft.line.vertices.push(Vertex::new(at));
        let index = draft.line.vertices.len() - 1;
        ctx.request_elevation(draft.id, Some(index), at);
    }

    fn finish(&mut self, ctx: &mut ToolContext<'_>) {
        self.hover = None;
        let Some(draft) = self.draft.take() else {
            return;
        };
        if draft.line.vertices.len() >= MIN_VERTICES {
            ctx.commit(draft.id, Entity::Line(draft.line));
        } else {
            debug!(
                "Discarding line draft with {} vertex(es)",
                draft.line.vertices.len()
            );
        }
    }

    fn cancel(&mut self) {
        self.draft = None;
        self.hover = None;
    }

    fn on_pointer_move(&mut self, at: LatLng, _ctx: &mut ToolContext<'_>) {
        self.hover = Some(at);
    }

    fn has_draft(&self) -> bool {
        self.draft.is_some()
    }

    fn apply_draft_elevation(
        &mut self,
        id: EntityId,
        vertex: Option<usize>,
        elevation: Option<f64>,
    ) -> bool {
        match (&mut self.draft, vertex) {
            (Some(draft), Some(index)) if draft.id == id => {
                match draft.line.vertices.get_mut(index) {
                    Some(v) => {
                        v.elevation = elevation;
                        true
                    }
                    None => false,
                }
            }
            _ => false,
        }
    }

    fn draw(
        &self,
        owner: &str,
        store: &EntityStore,
        surface: &mut dyn Surface,
        options: &RenderOptions,
    ) {
        draw_committed(owner, store, surface, options);

        let Some(draft) = &self.draft else {
            return;
        };
        let mut preview = draft.line.clone();
        if let Some(hover) = self.hover {
            preview.vertices.push(Vertex::new(hover));
        }
        render_entity(surface, &Entity::Line(preview), options);
        render_vertex_handles(surface, &draft.line.positions(), draft.line.style.color);
    }

    fn accepts(&self, feature: &Feature) -> bool {
        codec::is_line(feature)
    }

    fn import(
        &mut self,
        feature: &Feature,
        owner: &str,
        store: &mut EntityStore,
        styles: &StyleDefaults,
    ) -> bool {
        match codec::decode_line(feature, &styles.line) {
            Some(line) => {
                store.push(owner, Entity::Line(line));
                true
            }
            None => false,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
