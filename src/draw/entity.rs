//! Entity definitions for geographic annotations.

use super::style::{LineStyle, PointStyle, PolygonStyle, SectorStyle, TextStyle};
use crate::geodesy::{self, LatLng};

/// Closed set of entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Point,
    Line,
    Polygon,
    Sector,
    Text,
}

/// Line vertex with an optional elevation sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: LatLng,
    /// Meters above sea level, `None` until a lookup resolves (or if it failed)
    pub elevation: Option<f64>,
}

impl Vertex {
    pub fn new(position: LatLng) -> Self {
        Self {
            position,
            elevation: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointEntity {
    pub position: LatLng,
    pub elevation: Option<f64>,
    pub style: PointStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineEntity {
    /// Ordered path; insertion order is rendering and export order
    pub vertices: Vec<Vertex>,
    pub style: LineStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PolygonEntity {
    /// Open ring; the closing edge back to the first vertex is implicit
    pub vertices: Vec<LatLng>,
    pub style: PolygonStyle,
}

/// Widest span a sector can have, in degrees.
pub const MAX_SECTOR_ANGLE: f64 = 360.0;
/// Finest arc step used when tessellating a wedge, in degrees.
pub const MIN_WEDGE_STEP_DEGREES: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct SectorEntity {
    pub center: LatLng,
    /// Radius in meters
    pub radius: f64,
    /// Direction of the sector's center line, degrees clockwise from north
    pub bearing: f64,
    /// Angular span in degrees, split evenly on both sides of `bearing`
    pub angle: f64,
    pub elevation: Option<f64>,
    pub style: SectorStyle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextEntity {
    pub position: LatLng,
    pub text: String,
    pub style: TextStyle,
}

/// A geographic annotation.
///
/// Every variant carries its own style snapshot; nothing refers back to the style
/// defaults it was created from.
#[derive(Debug, Clone, PartialEq)]
pub enum Entity {
    /// Single marker with elevation
    Point(PointEntity),
    /// Open polyline (at least two vertices once committed)
    Line(LineEntity),
    /// Implicitly closed polygon (at least three vertices once committed)
    Polygon(PolygonEntity),
    /// Pie-slice wedge defined by center, radius, bearing, and angle
    Sector(SectorEntity),
    /// Text label anchored at a coordinate
    Text(TextEntity),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Point(_) => EntityKind::Point,
            Entity::Line(_) => EntityKind::Line,
            Entity::Polygon(_) => EntityKind::Polygon,
            Entity::Sector(_) => EntityKind::Sector,
            Entity::Text(_) => EntityKind::Text,
        }
    }

    /// Returns the single anchor coordinate for point-like kinds (point, text, sector center).
    pub fn anchor(&self) -> Option<LatLng> {
        match self {
            Entity::Point(point) => Some(point.position),
            Entity::Text(text) => Some(text.position),
            Entity::Sector(sector) => Some(sector.center),
            Entity::Line(_) | Entity::Polygon(_) => None,
        }
    }

    /// Returns the vertex path for path-like kinds; empty for point-like kinds.
    pub fn path(&self) -> Vec<LatLng> {
        match self {
            Entity::Line(line) => line.positions(),
            Entity::Polygon(polygon) => polygon.vertices.clone(),
            Entity::Point(_) | Entity::Sector(_) | Entity::Text(_) => Vec::new(),
        }
    }

    /// Overwrites this entity's coordinates with `origin`'s coordinates shifted by
    /// the given degree deltas.
    ///
    /// Only coordinates are touched: radius, bearing, styles and elevations on `self`
    /// stay as they are. Vertex `i` of `origin` maps to vertex `i` of `self`; the two
    /// must be the same kind with the same vertex count, otherwise nothing changes and
    /// `false` is returned.
    pub fn translate_from(&mut self, origin: &Entity, d_lat: f64, d_lng: f64) -> bool {
        match (self, origin) {
            (Entity::Point(live), Entity::Point(start)) => {
                live.position = start.position.offset(d_lat, d_lng);
            }
            (Entity::Text(live), Entity::Text(start)) => {
                live.position = start.position.offset(d_lat, d_lng);
            }
            (Entity::Sector(live), Entity::Sector(start)) => {
                live.center = start.center.offset(d_lat, d_lng);
            }
            (Entity::Line(live), Entity::Line(start)) => {
                if live.vertices.len() != start.vertices.len() {
                    return false;
                }
                for (vertex, original) in live.vertices.iter_mut().zip(&start.vertices) {
                    vertex.position = original.position.offset(d_lat, d_lng);
                }
            }
            (Entity::Polygon(live), Entity::Polygon(start)) => {
                if live.vertices.len() != start.vertices.len() {
                    return false;
                }
                for (vertex, original) in live.vertices.iter_mut().zip(&start.vertices) {
                    *vertex = original.offset(d_lat, d_lng);
                }
            }
            _ => return false,
        }
        true
    }

    /// Writes an elevation sample into the entity.
    ///
    /// `vertex` selects the line vertex; point and sector entities ignore it.
    /// Returns `false` when the entity has no elevation slot at that position.
    pub fn set_elevation(&mut self, vertex: Option<usize>, elevation: Option<f64>) -> bool {
        match (self, vertex) {
            (Entity::Point(point), None) => point.elevation = elevation,
            (Entity::Sector(sector), None) => sector.elevation = elevation,
            (Entity::Line(line), Some(index)) => match line.vertices.get_mut(index) {
                Some(v) => v.elevation = elevation,
                None => return false,
            },
            _ => return false,
        }
        true
    }
}

impl LineEntity {
    pub fn positions(&self) -> Vec<LatLng> {
        self.vertices.iter().map(|v| v.position).collect()
    }

    /// Cumulative great-circle length in meters.
    pub fn length(&self) -> f64 {
        geodesy::polyline_length(&self.positions())
    }
}

impl PolygonEntity {
    /// Planar-approximated area in square meters.
    pub fn area(&self) -> f64 {
        geodesy::polygon_area(&self.vertices)
    }
}

impl SectorEntity {
    /// True for a finite span in (0, 360].
    pub fn is_valid_angle(angle: f64) -> bool {
        angle > 0.0 && angle <= MAX_SECTOR_ANGLE
    }

    /// Wedge area in square meters (π·r²·angle/360).
    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius * self.angle / 360.0
    }

    /// Bearings of the left and right edges.
    pub fn edge_bearings(&self) -> (f64, f64) {
        let half = self.angle / 2.0;
        (self.bearing - half, self.bearing + half)
    }

    /// Outline ring: center, arc points every `step_degrees` from the left edge to
    /// the right edge (both edges included), then the center again.
    ///
    /// The span is capped at a full circle and the step is at least
    /// [`MIN_WEDGE_STEP_DEGREES`], so the ring size stays bounded.
    pub fn wedge(&self, step_degrees: f64) -> Vec<LatLng> {
        let (left, _) = self.edge_bearings();
        let span = self.angle.clamp(0.0, MAX_SECTOR_ANGLE);
        let right = left + span;
        let step = if step_degrees.is_finite() && step_degrees > 0.0 {
            step_degrees.max(MIN_WEDGE_STEP_DEGREES)
        } else {
            1.0
        };
        let segments = (span / step).ceil().max(1.0) as usize;

        let mut ring = Vec::with_capacity(segments + 3);
        ring.push(self.center);
        for i in 0..=segments {
            let b = (left + step * i as f64).min(right);
            ring.push(geodesy::destination(self.center, self.radius, b));
        }
        ring.push(self.center);
        ring
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::style::StyleDefaults;

    fn sector() -> SectorEntity {
        let styles = StyleDefaults::default();
        SectorEntity {
            center: LatLng::new(10.0, 20.0),
            radius: 1_000.0,
            bearing: 90.0,
            angle: 60.0,
            elevation: None,
            style: styles.sector,
        }
    }

    #[test]
    fn sector_area_is_fraction_of_circle() {
        let s = sector();
        let full = std::f64::consts::PI * 1_000.0 * 1_000.0;
        assert!((s.area() - full / 6.0).abs() < 1e-6);
    }

    #[test]
    fn wedge_starts_and_ends_at_center_and_spans_edges() {
        let s = sector();
        let ring = s.wedge(7.0);
        assert_eq!(ring.first(), Some(&s.center));
        assert_eq!(ring.last(), Some(&s.center));

        let first_arc = ring[1];
        let last_arc = ring[ring.len() - 2];
        assert!((geodesy::bearing(s.center, first_arc) - 60.0).abs() < 1e-6);
        assert!((geodesy::bearing(s.center, last_arc) - 120.0).abs() < 1e-6);
        for p in &ring[1..ring.len() - 1] {
            assert!((geodesy::distance(s.center, *p) - 1_000.0).abs() < 1e-3);
        }
    }

    #[test]
    fn wedge_ring_stays_bounded_for_oversized_spans() {
        let mut s = sector();
        s.angle = 1e20;
        assert_eq!(s.wedge(1.0).len(), 363);

        s.angle = 90.0;
        assert_eq!(s.wedge(1e-300).len(), 903);
        assert_eq!(s.wedge(f64::NAN).len(), 93);
    }

    #[test]
    fn angle_validity_excludes_zero_and_more_than_a_circle() {
        assert!(SectorEntity::is_valid_angle(360.0));
        assert!(SectorEntity::is_valid_angle(0.5));
        assert!(!SectorEntity::is_valid_angle(0.0));
        assert!(!SectorEntity::is_valid_angle(360.5));
        assert!(!SectorEntity::is_valid_angle(f64::NAN));
        assert!(!SectorEntity::is_valid_angle(f64::INFINITY));
    }

    #[test]
    fn translate_from_keeps_non_coordinate_fields() {
        let origin = Entity::Sector(sector());
        let mut live = origin.clone();
        if let Entity::Sector(s) = &mut live {
            s.elevation = Some(42.0);
        }
        assert!(live.translate_from(&origin, 1.0, -2.0));

        let Entity::Sector(s) = live else {
            panic!("kind changed");
        };
        assert_eq!(s.center, LatLng::new(11.0, 18.0));
        assert_eq!(s.radius, 1_000.0);
        assert_eq!(s.elevation, Some(42.0));
    }

    #[test]
    fn translate_from_rejects_mismatched_shapes() {
        let styles = StyleDefaults::default();
        let origin = Entity::Polygon(PolygonEntity {
            vertices: vec![LatLng::new(0.0, 0.0); 3],
            style: styles.polygon,
        });
        let mut live = Entity::Polygon(PolygonEntity {
            vertices: vec![LatLng::new(0.0, 0.0); 4],
            style: styles.polygon,
        });
        assert!(!live.translate_from(&origin, 1.0, 1.0));
        assert!(!live.translate_from(&Entity::Sector(sector()), 1.0, 1.0));
    }

    #[test]
    fn set_elevation_targets_line_vertex() {
        let styles = StyleDefaults::default();
        let mut line = Entity::Line(LineEntity {
            vertices: vec![Vertex::new(LatLng::new(0.0, 0.0)); 2],
            style: styles.line,
        });
        assert!(line.set_elevation(Some(1), Some(12.5)));
        assert!(!line.set_elevation(Some(5), Some(1.0)));
        assert!(!line.set_elevation(None, Some(1.0)));
        let Entity::Line(l) = line else { unreachable!() };
        assert_eq!(l.vertices[1].elevation, Some(12.5));
        assert_eq!(l.vertices[0].elevation, None);
    }
}
