//! Screen-space hit detection over tool collections.

use crate::draw::{Entity, EntityId, EntityStore, Projection, ScreenPoint};
use crate::geodesy::{LatLng, LatLngBounds};
use log::debug;

/// Default pick radius in pixels.
pub const DEFAULT_TOLERANCE_PX: f64 = 10.0;

/// An entity located by the hit detector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    /// Name of the tool whose collection holds the entity
    pub owner: String,
    /// Position within that collection
    pub index: usize,
    pub id: EntityId,
}

/// Resolves "what is under the pointer".
///
/// Distances are measured in projected pixels so the pick radius feels the same at
/// every zoom level. A distance exactly equal to the tolerance is not a hit.
#[derive(Debug, Clone)]
pub struct HitDetector {
    tolerance_px: f64,
}

impl Default for HitDetector {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE_PX)
    }
}

impl HitDetector {
    pub fn new(tolerance_px: f64) -> Self {
        Self { tolerance_px }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance_px
    }

    pub fn set_tolerance(&mut self, tolerance_px: f64) {
        self.tolerance_px = tolerance_px;
    }

    /// Returns the first entity within tolerance of `at`.
    ///
    /// Owners are scanned in the order given, entities in collection order; the
    /// first match wins even if a later entity is closer.
    pub fn pick<S: AsRef<str>>(
        &self,
        at: LatLng,
        owners: &[S],
        store: &EntityStore,
        projection: &dyn Projection,
    ) -> Option<Hit> {
        let pointer = projection.project(at);
        for owner in owners {
            let owner = owner.as_ref();
            for (index, (id, entity)) in store.entities_of(owner).enumerate() {
                if self.hits(entity, pointer, projection) {
                    debug!("Picked {:?} {} in '{}' at index {}", entity.kind(), id, owner, index);
                    return Some(Hit {
                        owner: owner.to_string(),
                        index,
                        id,
                    });
                }
            }
        }
        None
    }

    /// Same search as [`pick`](Self::pick), reduced to the owning collection and index.
    pub fn pick_for_delete<S: AsRef<str>>(
        &self,
        at: LatLng,
        owners: &[S],
        store: &EntityStore,
        projection: &dyn Projection,
    ) -> Option<(String, usize)> {
        self.pick(at, owners, store, projection)
            .map(|hit| (hit.owner, hit.index))
    }

    /// Every entity with a coordinate inside `bounds`.
    ///
    /// Point-like entities test their anchor; paths are selected if any vertex is inside.
    pub fn pick_in_bounds<S: AsRef<str>>(
        &self,
        bounds: &LatLngBounds,
        owners: &[S],
        store: &EntityStore,
    ) -> Vec<Hit> {
        let mut hits = Vec::new();
        for owner in owners {
            let owner = owner.as_ref();
            for (index, (id, entity)) in store.entities_of(owner).enumerate() {
                let inside = match entity.anchor() {
                    Some(anchor) => bounds.contains(anchor),
                    None => entity.path().into_iter().any(|v| bounds.contains(v)),
                };
                if inside {
                    hits.push(Hit {
                        owner: owner.to_string(),
                        index,
                        id,
                    });
                }
            }
        }
        hits
    }

    /// Whether `entity` lies within tolerance of the projected pointer.
    pub fn hits(&self, entity: &Entity, pointer: ScreenPoint, projection: &dyn Projection) -> bool {
        let within = |d: f64| d < self.tolerance_px;
        match entity {
            Entity::Point(point) => within(projection.project(point.position).distance_to(pointer)),
            Entity::Text(text) => within(projection.project(text.position).distance_to(pointer)),
            // Only the center is grabbable; the wedge area is not.
            Entity::Sector(sector) => {
                within(projection.project(sector.center).distance_to(pointer))
            }
            Entity::Line(line) => {
                let points: Vec<ScreenPoint> = line
                    .vertices
                    .iter()
                    .map(|v| projection.project(v.position))
                    .collect();
                path_distance(pointer, &points, false).is_some_and(within)
            }
            Entity::Polygon(polygon) => {
                let points: Vec<ScreenPoint> = polygon
                    .vertices
                    .iter()
                    .map(|v| projection.project(*v))
                    .collect();
                path_distance(pointer, &points, true).is_some_and(within)
            }
        }
    }
}

/// Shortest distance from `p` to the segment `a`-`b`, with the projection parameter
/// clamped to the segment.
pub fn point_segment_distance(p: ScreenPoint, a: ScreenPoint, b: ScreenPoint) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance_to(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance_to(ScreenPoint::new(a.x + t * dx, a.y + t * dy))
}

/// Minimum distance to a polyline, optionally including the closing segment.
fn path_distance(p: ScreenPoint, points: &[ScreenPoint], closed: bool) -> Option<f64> {
    let mut best: Option<f64> = None;
    let mut consider = |d: f64| best = Some(best.map_or(d, |b| b.min(d)));

    for pair in points.windows(2) {
        consider(point_segment_distance(p, pair[0], pair[1]));
    }
    if closed && points.len() >= 3 {
        if let (Some(last), Some(first)) = (points.last(), points.first()) {
            consider(point_segment_distance(p, *last, *first));
        }
    }
    best
}
