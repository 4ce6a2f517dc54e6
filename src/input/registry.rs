//! Tool registry: owns every tool, the entity store, and event routing.

use std::sync::Arc;

use geojson::Feature;
use log::{debug, info, warn};

use super::events::InputEvent;
use super::hit::{Hit, HitDetector};
use super::tool::{Tool, ToolContext, ToolRole};
use super::tools::{
    DeleteTool, MoveTool, PointsTool, PolygonTool, PolylineTool, SectorTool, TextTool, names,
};
use crate::config::Config;
use crate::draw::{EntityStore, Projection, RenderOptions, StyleDefaults, Surface};
use crate::elevation::{
    ElevationRequest, ElevationResult, ElevationService, ElevationSource, ElevationTarget,
    NoElevationSource,
};
use crate::geodesy::{LatLng, LatLngBounds};
use crate::interchange::ImportReport;

/// Change notifications queued for the embedding application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryEvent {
    /// The active tool changed (`old` is `None` if nothing was active)
    ToolChanged { old: Option<String>, new: String },
    /// Committed entities were added, removed, moved, or patched
    DataChanged,
}

/// Committed entity counts per drawing tool.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolStats {
    /// `(tool name, count)` in registration order
    pub per_tool: Vec<(String, usize)>,
    pub total: usize,
}

impl ToolStats {
    pub fn count(&self, name: &str) -> usize {
        self.per_tool
            .iter()
            .find(|(n, _)| n == name)
            .map_or(0, |(_, count)| *count)
    }
}

struct Slot {
    name: String,
    /// `None` is the pass-through placeholder
    tool: Option<Box<dyn Tool>>,
}

/// Holds all tools and routes input to the single active one.
pub struct ToolRegistry {
    slots: Vec<Slot>,
    active: Option<String>,
    store: EntityStore,
    styles: StyleDefaults,
    render_options: RenderOptions,
    hit: HitDetector,
    elevation: Option<ElevationService>,
    elevation_outbox: Vec<ElevationRequest>,
    status_elevation: Option<(LatLng, Option<f64>)>,
    events: Vec<RegistryEvent>,
    /// Whether the map view needs to call [`draw`](Self::draw)
    pub needs_redraw: bool,
}

impl ToolRegistry {
    /// Creates an empty registry; tools are added with [`register`](Self::register).
    pub fn new(styles: StyleDefaults) -> Self {
        Self {
            slots: Vec::new(),
            active: None,
            store: EntityStore::new(),
            styles,
            render_options: RenderOptions::default(),
            hit: HitDetector::default(),
            elevation: None,
            elevation_outbox: Vec::new(),
            status_elevation: None,
            events: Vec::new(),
            needs_redraw: true,
        }
    }

    /// Registry with the built-in tool set, starting in explore mode.
    ///
    /// Registration order (and therefore import routing and pick order) is points,
    /// polyline, polygon, sector, text.
    pub fn with_default_tools(styles: StyleDefaults) -> Self {
        let mut registry = Self::new(styles);
        registry.register(names::EXPLORE, None);
        registry.register(names::POINTS, Some(Box::new(PointsTool::new())));
        registry.register(names::POLYLINE, Some(Box::new(PolylineTool::new())));
        registry.register(names::POLYGON, Some(Box::new(PolygonTool::new())));
        registry.register(names::SECTOR, Some(Box::new(SectorTool::new())));
        registry.register(names::TEXT, Some(Box::new(TextTool::new())));
        registry.register(names::MOVE, Some(Box::new(MoveTool::new())));
        registry.register(names::DELETE, Some(Box::new(DeleteTool::new())));
        registry.set_active(names::EXPLORE);
        registry.events.clear();
        registry
    }

    /// Default tool set configured from the user's settings.
    pub fn from_config(config: &Config) -> Self {
        let mut registry = Self::with_default_tools(config.style_defaults());
        registry.render_options = config.render_options();
        registry.hit.set_tolerance(config.picking.tolerance_px);
        registry
    }

    /// Attaches an elevation service built from the `[elevation]` settings.
    ///
    /// With `elevation.enabled = false` the service answers from
    /// [`NoElevationSource`], so `source` is never queried and elevations stay null.
    pub fn with_configured_elevation(
        self,
        config: &Config,
        runtime: &tokio::runtime::Handle,
        source: Arc<dyn ElevationSource>,
    ) -> Self {
        let source: Arc<dyn ElevationSource> = if config.elevation.enabled {
            source
        } else {
            info!("Elevation lookups disabled by config");
            Arc::new(NoElevationSource)
        };
        let service = ElevationService::new(runtime, source, config.elevation_settings());
        self.with_elevation(service)
    }

    /// Attaches the elevation service used for new points, vertices, and sector centers.
    pub fn with_elevation(mut self, service: ElevationService) -> Self {
        self.elevation = Some(service);
        self
    }

    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Registers a tool under `name`, replacing any tool already registered there.
    ///
    /// A `None` tool is the pass-through placeholder: while it is active, events are
    /// ignored so the map can pan and zoom.
    pub fn register(&mut self, name: &str, tool: Option<Box<dyn Tool>>) {
        if let Some(slot) = self.slots.iter_mut().find(|s| s.name == name) {
            debug!("Replacing tool '{}'", name);
            slot.tool = tool;
            return;
        }
        debug!("Registering tool '{}'", name);
        self.slots.push(Slot {
            name: name.to_string(),
            tool,
        });
    }

    /// Removes a tool along with its committed entities.
    pub fn unregister(&mut self, name: &str) {
        let before = self.slots.len();
        self.slots.retain(|s| s.name != name);
        if self.slots.len() == before {
            return;
        }
        if self.store.len_of(name) > 0 {
            self.events.push(RegistryEvent::DataChanged);
        }
        self.store.drop_collection(name);
        if self.active.as_deref() == Some(name) {
            self.active = None;
        }
        self.needs_redraw = true;
    }

    /// Makes `name` the active tool.
    ///
    /// Unknown names are logged and ignored (returns false). The previous tool's
    /// draft is deliberately left in place.
    pub fn set_active(&mut self, name: &str) -> bool {
        let Some(index) = self.index_of(name) else {
            warn!("Ignoring activation of unknown tool '{}'", name);
            return false;
        };
        let old = self.active.take();
        if old.as_deref() != Some(name) {
            if let Some(previous) = old.as_deref().and_then(|o| self.index_of(o)) {
                if let Some(tool) = self.slots[previous].tool.as_mut() {
                    tool.on_deactivate();
                }
            }
        }
        info!("Active tool: {}", name);
        self.active = Some(self.slots[index].name.clone());
        self.events.push(RegistryEvent::ToolChanged {
            old,
            new: name.to_string(),
        });
        self.needs_redraw = true;
        true
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Names of tools that create entities, in registration order.
    pub fn drawing_tools(&self) -> Vec<&str> {
        self.slots
            .iter()
            .filter(|s| {
                s.tool
                    .as_ref()
                    .is_some_and(|t| t.role() == ToolRole::Drawing)
            })
            .map(|s| s.name.as_str())
            .collect()
    }

    /// Borrows a registered tool as its concrete type.
    pub fn tool<T: Tool + 'static>(&self, name: &str) -> Option<&T> {
        self.slots
            .iter()
            .find(|s| s.name == name)
            .and_then(|s| s.tool.as_ref())
            .and_then(|t| t.as_any().downcast_ref::<T>())
    }

    /// Mutably borrows a registered tool as its concrete type (e.g. to set draft text).
    pub fn tool_mut<T: Tool + 'static>(&mut self, name: &str) -> Option<&mut T> {
        self.needs_redraw = true;
        self.slots
            .iter_mut()
            .find(|s| s.name == name)
            .and_then(|s| s.tool.as_mut())
            .and_then(|t| t.as_any_mut().downcast_mut::<T>())
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn styles(&self) -> &StyleDefaults {
        &self.styles
    }

    pub fn render_options(&self) -> &RenderOptions {
        &self.render_options
    }

    /// Routes a pointer event to the active tool.
    ///
    /// Click adds, double-click finishes, and the pointer events map one-to-one.
    /// Nothing happens while the pass-through placeholder is active.
    pub fn handle_event(&mut self, event: InputEvent, projection: &dyn Projection) {
        self.with_active_tool(projection, |tool, ctx| match event {
            InputEvent::Click(at) => tool.add(at, ctx),
            InputEvent::DoubleClick(_) => tool.finish(ctx),
            InputEvent::PointerDown(at) => tool.on_pointer_down(at, ctx),
            InputEvent::PointerMove(at) => tool.on_pointer_move(at, ctx),
            InputEvent::PointerUp(at) => tool.on_pointer_up(at, ctx),
        });
    }

    /// Finishes the active tool's draft (commit if valid, discard otherwise).
    pub fn finish_active_tool(&mut self, projection: &dyn Projection) {
        self.with_active_tool(projection, |tool, ctx| tool.finish(ctx));
    }

    /// Cancels the active tool's draft.
    pub fn cancel_active_tool(&mut self) {
        if let Some(index) = self.active_index() {
            if let Some(tool) = self.slots[index].tool.as_mut() {
                tool.cancel();
                self.needs_redraw = true;
            }
        }
    }

    /// Empties every collection and cancels every pending draft.
    pub fn clear_all_data(&mut self) {
        self.store.clear();
        for tool in self.slots.iter_mut().filter_map(|s| s.tool.as_mut()) {
            tool.cancel();
        }
        info!("Cleared all annotation data");
        self.events.push(RegistryEvent::DataChanged);
        self.needs_redraw = true;
    }

    /// Committed entity counts per drawing tool.
    pub fn stats(&self) -> ToolStats {
        let per_tool: Vec<(String, usize)> = self
            .drawing_tools()
            .into_iter()
            .map(|name| (name.to_string(), self.store.len_of(name)))
            .collect();
        let total = per_tool.iter().map(|(_, count)| count).sum();
        ToolStats { per_tool, total }
    }

    /// Renders every tool's committed entities, drafts, and previews.
    pub fn draw(&mut self, surface: &mut dyn Surface) {
        for slot in &self.slots {
            if let Some(tool) = &slot.tool {
                tool.draw(&slot.name, &self.store, surface, &self.render_options);
            }
        }
        self.needs_redraw = false;
    }

    /// Changes the pick radius at runtime.
    pub fn set_hit_tolerance(&mut self, tolerance_px: f64) {
        self.hit.set_tolerance(tolerance_px);
    }

    pub fn hit_tolerance(&self) -> f64 {
        self.hit.tolerance()
    }

    /// Entities of all drawing tools with a coordinate inside `bounds`.
    pub fn select_in_bounds(&self, bounds: &LatLngBounds) -> Vec<Hit> {
        self.hit
            .pick_in_bounds(bounds, &self.drawing_tools(), &self.store)
    }

    /// Drains queued change notifications.
    pub fn take_events(&mut self) -> Vec<RegistryEvent> {
        std::mem::take(&mut self.events)
    }

    /// Requests a debounced elevation readout for the status bar.
    pub fn query_status_elevation(&mut self, at: LatLng) {
        if let Some(service) = &self.elevation {
            service.request_debounced(at);
        }
    }

    /// Last resolved status readout: the queried coordinate and its elevation.
    pub fn status_elevation(&self) -> Option<(LatLng, Option<f64>)> {
        self.status_elevation
    }

    /// Applies every elevation result that has arrived. Returns how many landed.
    pub fn apply_elevation_results(&mut self) -> usize {
        let results = match self.elevation.as_mut() {
            Some(service) => service.drain(),
            None => return 0,
        };
        results
            .into_iter()
            .filter(|result| self.apply_elevation(result))
            .count()
    }

    /// Patches one elevation result into its target.
    ///
    /// Committed entities are looked up in the store first, then drafts. Results for
    /// entities that no longer exist are dropped.
    pub fn apply_elevation(&mut self, result: &ElevationResult) -> bool {
        let (id, vertex) = match result.target {
            ElevationTarget::Status => {
                self.status_elevation = Some((result.position, result.elevation));
                self.needs_redraw = true;
                return true;
            }
            ElevationTarget::Entity { id, vertex } => (id, vertex),
        };

        if let Some(entity) = self.store.get_mut(id) {
            if entity.set_elevation(vertex, result.elevation) {
                self.events.push(RegistryEvent::DataChanged);
                self.needs_redraw = true;
                return true;
            }
            return false;
        }

        let patched = self
            .slots
            .iter_mut()
            .filter_map(|s| s.tool.as_mut())
            .any(|tool| tool.apply_draft_elevation(id, vertex, result.elevation));
        if patched {
            self.needs_redraw = true;
        } else {
            debug!("Dropping elevation for {} (no longer present)", id);
        }
        patched
    }

    /// Features of every drawing tool, in registration then collection order.
    pub fn export_features(&self) -> Vec<Feature> {
        self.slots
            .iter()
            .filter_map(|s| s.tool.as_ref().map(|tool| (s.name.as_str(), tool)))
            .filter(|(_, tool)| tool.role() == ToolRole::Drawing)
            .flat_map(|(name, tool)| tool.export(name, &self.store, &self.render_options))
            .collect()
    }

    /// Routes a feature to the first drawing tool that accepts it.
    ///
    /// Returns false when no tool accepts the feature or the claiming tool finds
    /// it malformed.
    pub fn import_feature(&mut self, feature: &Feature) -> bool {
        for slot in &mut self.slots {
            let Some(tool) = slot.tool.as_mut() else {
                continue;
            };
            if tool.role() != ToolRole::Drawing || !tool.accepts(feature) {
                continue;
            }
            return tool.import(feature, &slot.name, &mut self.store, &self.styles);
        }
        false
    }

    /// Imports a batch of features, skipping the ones no tool can take.
    pub fn import_features(&mut self, features: &[Feature]) -> ImportReport {
        let mut report = ImportReport::default();
        for feature in features {
            if self.import_feature(feature) {
                report.imported += 1;
            } else {
                report.skipped += 1;
            }
        }
        if report.skipped > 0 {
            warn!("Skipped {} unrecognized feature(s)", report.skipped);
        }
        if report.imported > 0 {
            self.events.push(RegistryEvent::DataChanged);
            self.needs_redraw = true;
        }
        report
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.name == name)
    }

    fn active_index(&self) -> Option<usize> {
        self.active.as_deref().and_then(|name| self.index_of(name))
    }

    /// Builds a context for the active tool, runs `f`, then publishes side effects.
    fn with_active_tool<F>(&mut self, projection: &dyn Projection, f: F)
    where
        F: FnOnce(&mut dyn Tool, &mut ToolContext<'_>),
    {
        let Some(index) = self.active_index() else {
            return;
        };
        let candidates: Vec<String> = self
            .slots
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != index)
            .map(|(_, s)| s.name.clone())
            .collect();

        let slot = &mut self.slots[index];
        let Some(tool) = slot.tool.as_mut() else {
            return;
        };
        let mut ctx = ToolContext {
            owner: &slot.name,
            store: &mut self.store,
            styles: &self.styles,
            hit: &self.hit,
            projection,
            candidates: &candidates,
            elevation_outbox: &mut self.elevation_outbox,
            elevation_enabled: self.elevation.is_some(),
            data_changed: false,
        };
        f(tool.as_mut(), &mut ctx);
        let data_changed = ctx.data_changed;

        if data_changed {
            self.events.push(RegistryEvent::DataChanged);
        }
        self.needs_redraw = true;
        self.flush_elevation_requests();
    }

    fn flush_elevation_requests(&mut self) {
        if self.elevation_outbox.is_empty() {
            return;
        }
        let requests = std::mem::take(&mut self.elevation_outbox);
        if let Some(service) = &self.elevation {
            service.submit(requests);
        }
    }
}
