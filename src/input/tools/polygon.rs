use std::any::Any;

use geojson::Feature;
use log::debug;

use crate::draw::render::render_vertex_handles;
use crate::draw::{
    Entity, EntityId, EntityStore, PolygonEntity, RenderOptions, StyleDefaults, Surface,
    render_entity,
};
use crate::geodesy::LatLng;
use crate::input::tool::{Tool, ToolContext, draw_committed};
use crate::interchange::codec;

/// Minimum vertex count for a committed polygon.
const MIN_VERTICES: usize = 3;

#[derive(Debug)]
struct PolygonDraft {
    id: EntityId,
    polygon: PolygonEntity,
}

/// Builds closed polygons one click at a time; double-click finishes.
///
/// Polygons carry no elevation, so no lookups are issued.
#[derive(Debug, Default)]
pub struct PolygonTool {
    draft: Option<PolygonDraft>,
    hover: Option<LatLng>,
}

impl PolygonTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> Option<&PolygonEntity> {
        self.draft.as_ref().map(|d| &d.polygon)
    }
}

impl Tool for PolygonTool {
    fn add(&mut self, at: LatLng, ctx: &mut ToolContext<'_>) {
        let draft = self.draft.get_or_insert_with(|| PolygonDraft {
            id: ctx.store.allocate_id(),
            polygon: PolygonEntity {
                vertices: Vec::new(),
                style: ctx.styles.polygon,
            },
        });
        draft.polygon.vertices.push(at);
    }

    fn finish(&mut self, ctx: &mut ToolContext<'_>) {
        self.hover = None;
        let Some(draft) = self.draft.take() else {
            return;
        };
        if draft.polygon.vertices.len() >= MIN_VERTICES {
            ctx.commit(draft.id, Entity::Polygon(draft.polygon));
        } else {
            debug!(
                "Discarding polygon draft with {} vertex(es)",
                draft.polygon.vertices.len()
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

    fn draw(
        &self,
        owner: &str,
        store: &EntityStore,
        surface: &mut dyn Surface,
        options: &RenderOptions,
    ) {
        draw_committed(owner, store, surface, options);

        if let Some(draft) = &self.draft {
            let mut preview = draft.polygon.clone();
            preview.vertices.extend(self.hover);
            render_entity(surface, &Entity::Polygon(preview), options);
            render_vertex_handles(surface, &draft.polygon.vertices, draft.polygon.style.color);
        }
    }

    fn accepts(&self, feature: &Feature) -> bool {
        codec::is_polygon(feature)
    }

    fn import(
        &mut self,
        feature: &Feature,
        owner: &str,
        store: &mut EntityStore,
        styles: &StyleDefaults,
    ) -> bool {
        match codec::decode_polygon(feature, &styles.polygon) {
            Some(polygon) => {
                store.push(owner, Entity::Polygon(polygon));
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
