use std::any::Any;

use geojson::Feature;
use log::debug;

use crate::draw::{
    Entity, EntityId, EntityStore, RenderOptions, SectorEntity, StyleDefaults, Surface,
    render_entity,
};
use crate::geodesy::{self, LatLng};
use crate::input::tool::{Tool, ToolContext, draw_committed};
use crate::interchange::codec;

#[derive(Debug)]
struct SectorDraft {
    id: EntityId,
    sector: SectorEntity,
}

/// Two-click sector tool.
///
/// The first click fixes the center. While the draft is pending, pointer movement
/// sets the radius and bearing from the center to the pointer. The second click
/// commits the draft exactly as it is.
#[derive(Debug, Default)]
pub struct SectorTool {
    draft: Option<SectorDraft>,
}

impl SectorTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> Option<&SectorEntity> {
        self.draft.as_ref().map(|d| &d.sector)
    }

    /// Overrides the angular span of the pending draft. Returns false without a draft
    /// or for a span outside (0, 360].
    pub fn set_draft_angle(&mut self, angle: f64) -> bool {
        if !SectorEntity::is_valid_angle(angle) {
            return false;
        }
        match &mut self.draft {
            Some(draft) => {
                draft.sector.angle = angle;
                true
            }
            None => false,
        }
    }
}

impl Tool for SectorTool {
    fn add(&mut self, at: LatLng, ctx: &mut ToolContext<'_>) {
        if let Some(draft) = self.draft.take() {
            ctx.commit(draft.id, Entity::Sector(draft.sector));
            return;
        }

        let id = ctx.store.allocate_id();
        let style = ctx.styles.sector;
        self.draft = Some(SectorDraft {
            id,
            sector: SectorEntity {
                center: at,
                radius: 0.0,
                bearing: 0.0,
                angle: ctx.styles.sector_angle,
                elevation: None,
                style,
            },
        });
        ctx.request_elevation(id, None, at);
    }

    /// Commits only a draft with a non-zero radius.
    fn finish(&mut self, ctx: &mut ToolContext<'_>) {
        let Some(draft) = self.draft.take() else {
            return;
        };
        if draft.sector.radius > 0.0 {
            ctx.commit(draft.id, Entity::Sector(draft.sector));
        } else {
            debug!("Discarding sector draft without a radius");
        }
    }

    fn cancel(&mut self) {
        self.draft = None;
    }

    fn on_pointer_move(&mut self, at: LatLng, _ctx: &mut ToolContext<'_>) {
        if let Some(draft) = &mut self.draft {
            draft.sector.radius = geodesy::distance(draft.sector.center, at);
            draft.sector.bearing = geodesy::bearing(draft.sector.center, at);
        }
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
        match &mut self.draft {
            Some(draft) if draft.id == id && vertex.is_none() => {
                draft.sector.elevation = elevation;
                true
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
        if let Some(draft) = &self.draft {
            render_entity(surface, &Entity::Sector(draft.sector.clone()), options);
        }
    }

    fn accepts(&self, feature: &Feature) -> bool {
        codec::is_sector(feature)
    }

    fn import(
        &mut self,
        feature: &Feature,
        owner: &str,
        store: &mut EntityStore,
        styles: &StyleDefaults,
    ) -> bool {
        match codec::decode_sector(feature, &styles.sector, styles.sector_angle) {
            Some(sector) => {
                store.push(owner, Entity::Sector(sector));
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
