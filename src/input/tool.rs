//! The tool contract shared by entity tools and meta-tools.

use std::any::Any;

use geojson::Feature;

use super::hit::HitDetector;
use crate::draw::{
    Entity, EntityId, EntityStore, Projection, RenderOptions, StyleDefaults, Surface,
    render_entities,
};
use crate::elevation::ElevationRequest;
use crate::geodesy::LatLng;
use crate::interchange::codec;

/// How the registry treats a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolRole {
    /// Creates entities and owns a collection
    Drawing,
    /// Operates on other tools' collections (move, delete)
    Meta,
}

/// Everything a tool may touch while handling one event.
///
/// Built by the registry for the active tool. `owner` is the name the tool was
/// registered under, which is also the key of its collection in the store.
pub struct ToolContext<'a> {
    pub owner: &'a str,
    pub store: &'a mut EntityStore,
    pub styles: &'a StyleDefaults,
    pub hit: &'a HitDetector,
    pub projection: &'a dyn Projection,
    /// Every other registered tool, in registration order
    pub candidates: &'a [String],
    pub(crate) elevation_outbox: &'a mut Vec<ElevationRequest>,
    pub(crate) elevation_enabled: bool,
    pub(crate) data_changed: bool,
}

impl ToolContext<'_> {
    /// Commits an entity under a previously allocated id to this tool's collection.
    pub fn commit(&mut self, id: EntityId, entity: Entity) {
        self.store.commit(self.owner, id, entity);
        self.data_changed = true;
    }

    /// Queues an elevation lookup; it is sent once the event has been handled.
    pub fn request_elevation(&mut self, id: EntityId, vertex: Option<usize>, at: LatLng) {
        if self.elevation_enabled {
            self.elevation_outbox
                .push(ElevationRequest::for_entity(id, vertex, at));
        }
    }

    /// Records that committed data changed without going through [`commit`](Self::commit).
    pub fn mark_changed(&mut self) {
        self.data_changed = true;
    }
}

/// A tool registered with the [`ToolRegistry`](super::ToolRegistry).
///
/// Entity tools own at most one draft and a collection in the [`EntityStore`];
/// meta-tools own nothing and act on other tools' collections. Every method has a
/// no-op default so a tool only implements the events it cares about.
pub trait Tool {
    fn role(&self) -> ToolRole {
        ToolRole::Drawing
    }

    /// Starts or extends the draft at `at` (or commits directly for one-click kinds).
    fn add(&mut self, _at: LatLng, _ctx: &mut ToolContext<'_>) {}

    /// Commits the draft if it is valid, otherwise discards it. Always clears hover.
    fn finish(&mut self, _ctx: &mut ToolContext<'_>) {}

    /// Discards the draft and hover preview.
    fn cancel(&mut self) {}

    /// Updates the hover preview (and, for sectors, the draft's radius and bearing).
    fn on_pointer_move(&mut self, _at: LatLng, _ctx: &mut ToolContext<'_>) {}

    fn on_pointer_down(&mut self, _at: LatLng, _ctx: &mut ToolContext<'_>) {}

    fn on_pointer_up(&mut self, _at: LatLng, _ctx: &mut ToolContext<'_>) {}

    /// Called when another tool becomes active. Drafts are left alone.
    fn on_deactivate(&mut self) {}

    fn has_draft(&self) -> bool {
        false
    }

    /// Patches the elevation of the draft with id `id`. Returns false if this tool
    /// has no such draft.
    fn apply_draft_elevation(
        &mut self,
        _id: EntityId,
        _vertex: Option<usize>,
        _elevation: Option<f64>,
    ) -> bool {
        false
    }

    /// Renders committed entities, then whatever is in progress.
    fn draw(
        &self,
        owner: &str,
        store: &EntityStore,
        surface: &mut dyn Surface,
        options: &RenderOptions,
    ) {
        draw_committed(owner, store, surface, options);
    }

    /// One feature per committed entity, in collection order.
    fn export(&self, owner: &str, store: &EntityStore, options: &RenderOptions) -> Vec<Feature> {
        store
            .entities_of(owner)
            .map(|(_, entity)| codec::encode(entity, options.sector_step_degrees))
            .collect()
    }

    /// Whether this tool claims `feature` on import.
    fn accepts(&self, _feature: &Feature) -> bool {
        false
    }

    /// Decodes and commits a claimed feature. Returns false if the feature is malformed.
    fn import(
        &mut self,
        _feature: &Feature,
        _owner: &str,
        _store: &mut EntityStore,
        _styles: &StyleDefaults,
    ) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Renders `owner`'s committed entities in collection order.
pub fn draw_committed(
    owner: &str,
    store: &EntityStore,
    surface: &mut dyn Surface,
    options: &RenderOptions,
) {
    render_entities(
        surface,
        store.entities_of(owner).map(|(_, entity)| entity),
        options,
    );
}
