use std::any::Any;

use geojson::Feature;

use crate::draw::{Entity, EntityStore, PointEntity, StyleDefaults};
use crate::geodesy::LatLng;
use crate::input::tool::{Tool, ToolContext};
use crate::interchange::codec;

/// Drops a marker on every click. There is no draft: each `add` commits at once.
#[derive(Debug, Default)]
pub struct PointsTool {
    hover: Option<LatLng>,
}

impl PointsTool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hover(&self) -> Option<LatLng> {
        self.hover
    }
}

impl Tool for PointsTool {
    fn add(&mut self, at: LatLng, ctx: &mut ToolContext<'_>) {
        let id = ctx.store.allocate_id();
        ctx.commit(
            id,
            Entity::Point(PointEntity {
                position: at,
                elevation: None,
                style: ctx.styles.point,
            }),
        );
        ctx.request_elevation(id, None, at);
    }

    fn finish(&mut self, _ctx: &mut ToolContext<'_>) {
        self.hover = None;
    }

    fn cancel(&mut self) {
        self.hover = None;
    }

    fn on_pointer_move(&mut self, at: LatLng, _ctx: &mut ToolContext<'_>) {
        self.hover = Some(at);
    }

    fn accepts(&self, feature: &Feature) -> bool {
        codec::is_point(feature)
    }

    fn import(
        &mut self,
        feature: &Feature,
        owner: &str,
        store: &mut EntityStore,
        styles: &StyleDefaults,
    ) -> bool {
        match codec::decode_point(feature, &styles.point) {
            Some(point) => {
                store.push(owner, Entity::Point(point));
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
