//! Rendering of entities onto a [`Surface`], including measurement callouts.

use super::color::Color;
use super::entity::{Entity, LineEntity, PointEntity, PolygonEntity, SectorEntity, TextEntity};
use super::style::{DashStyle, PointSymbol};
use super::surface::{Label, MEASUREMENT_FONT_SIZE, ScreenPoint, Stroke, Surface};
use crate::geodesy::{self, LatLng};

/// Knobs that affect rendering but are not part of any entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Angular step between generated arc points of a sector wedge, in degrees
    pub sector_step_degrees: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            sector_step_degrees: 2.0,
        }
    }
}

/// Outline width for polygons and sectors.
const OUTLINE_WIDTH: f64 = 2.0;

/// Renders all entities in order (first = bottom layer).
pub fn render_entities<'a>(
    surface: &mut dyn Surface,
    entities: impl IntoIterator<Item = &'a Entity>,
    options: &RenderOptions,
) {
    for entity in entities {
        render_entity(surface, entity, options);
    }
}

/// Renders a single entity, dispatching on its kind.
pub fn render_entity(surface: &mut dyn Surface, entity: &Entity, options: &RenderOptions) {
    match entity {
        Entity::Point(point) => render_point(surface, point),
        Entity::Line(line) => render_line(surface, line),
        Entity::Polygon(polygon) => render_polygon(surface, polygon),
        Entity::Sector(sector) => render_sector(surface, sector, options),
        Entity::Text(text) => render_text(surface, text),
    }
}

fn render_point(surface: &mut dyn Surface, point: &PointEntity) {
    let at = surface.project(point.position);
    surface.draw_marker(at, point.style.symbol, point.style.color);
}

fn render_line(surface: &mut dyn Surface, line: &LineEntity) {
    let positions = line.positions();
    let points = project_all(surface, &positions);
    let stroke = Stroke {
        color: line.style.color,
        width: line.style.weight,
        dash: line.style.dash,
    };
    surface.stroke_path(&points, &stroke);

    if let Some(mid) = path_midpoint(&positions) {
        let at = surface.project(mid);
        let text = geodesy::format_distance(geodesy::polyline_length(&positions));
        surface.draw_label(&Label::callout(at, text, line.style.color));
    }
}

fn render_polygon(surface: &mut dyn Surface, polygon: &PolygonEntity) {
    let vertices = &polygon.vertices;
    let ring = project_all(surface, vertices);
    let stroke = Stroke::solid(polygon.style.color, OUTLINE_WIDTH);

    if ring.len() >= 3 {
        let fill = polygon.style.color.with_alpha(polygon.style.fill_alpha);
        surface.fill_polygon(&ring, &stroke, fill);
    } else {
        surface.stroke_path(&ring, &stroke);
    }

    // Closing edge only once the ring actually encloses something.
    let segment_count = match vertices.len() {
        0 | 1 => 0,
        2 => 1,
        n => n,
    };
    for i in 0..segment_count {
        let a = vertices[i];
        let b = vertices[(i + 1) % vertices.len()];
        let position = surface.project(geodesy::midpoint(a, b));
        let rotation_deg = segment_label_angle(ring[i], ring[(i + 1) % ring.len()]);
        surface.draw_label(&Label {
            position,
            text: geodesy::format_distance(geodesy::distance(a, b)),
            color: polygon.style.color,
            font_size: MEASUREMENT_FONT_SIZE,
            rotation_deg,
            boxed: false,
        });
    }

    if vertices.len() >= 3 {
        if let Some(center) = geodesy::centroid(vertices) {
            let at = surface.project(center);
            let text = geodesy::format_area(geodesy::polygon_area(vertices));
            surface.draw_label(&Label::callout(at, text, polygon.style.color));
        }
    }
}

fn render_sector(surface: &mut dyn Surface, sector: &SectorEntity, options: &RenderOptions) {
    let center = surface.project(sector.center);
    if sector.radius <= 0.0 {
        surface.draw_marker(center, PointSymbol::Cross, sector.style.color);
        return;
    }

    let color = sector.style.color;
    let wedge = project_all(surface, &sector.wedge(options.sector_step_degrees));
    let stroke = Stroke::solid(color, OUTLINE_WIDTH);
    surface.fill_polygon(&wedge, &stroke, color.with_alpha(sector.style.fill_alpha));

    let (left, right) = sector.edge_bearings();
    let radius_text = geodesy::format_distance(sector.radius);
    for edge_bearing in [left, right] {
        let tip = geodesy::destination(sector.center, sector.radius, edge_bearing);
        let at = surface.project(geodesy::midpoint(sector.center, tip));
        surface.draw_label(&Label::callout(at, radius_text.clone(), color));
    }

    let tip = geodesy::destination(sector.center, sector.radius, sector.bearing);
    let tip_screen = surface.project(tip);
    let dashed = Stroke {
        color,
        width: 1.0,
        dash: DashStyle::Dashed,
    };
    surface.stroke_path(&[center, tip_screen], &dashed);
    let mid = surface.project(geodesy::midpoint(sector.center, tip));
    surface.draw_label(&Label::callout(mid, radius_text.clone(), color));

    let summary = format!(
        "R: {}\nA: {}\n∠: {:.0}°",
        radius_text,
        geodesy::format_area(sector.area()),
        sector.angle
    );
    surface.draw_label(&Label::callout(tip_screen, summary, color));
}

fn render_text(surface: &mut dyn Surface, text: &TextEntity) {
    let at = surface.project(text.position);
    if text.text.trim().is_empty() {
        // Placement caret for a draft whose text hasn't been typed yet.
        surface.draw_marker(at, PointSymbol::Cross, text.style.color);
        return;
    }
    surface.draw_label(&Label {
        position: at,
        text: text.text.clone(),
        color: text.style.color,
        font_size: text.style.font_size,
        rotation_deg: 0.0,
        boxed: false,
    });
}

/// Draws small vertex handles for an in-progress path.
pub fn render_vertex_handles(surface: &mut dyn Surface, vertices: &[LatLng], color: Color) {
    for vertex in vertices {
        let at = surface.project(*vertex);
        surface.draw_marker(at, PointSymbol::Circle, color);
    }
}

/// Where a path's length label goes.
///
/// With an even vertex count this is the spherical midpoint of the two central
/// vertices; with an odd count it is the middle vertex itself.
pub fn path_midpoint(vertices: &[LatLng]) -> Option<LatLng> {
    let n = vertices.len();
    if n < 2 {
        return None;
    }
    if n % 2 == 0 {
        Some(geodesy::midpoint(vertices[n / 2 - 1], vertices[n / 2]))
    } else {
        Some(vertices[n / 2])
    }
}

/// On-screen rotation for a segment label, kept upright.
///
/// The raw angle of `a → b` is flipped by 180° whenever its magnitude exceeds 90°,
/// so the result always lies in [-90, 90].
pub fn segment_label_angle(a: ScreenPoint, b: ScreenPoint) -> f64 {
    let angle = (b.y - a.y).atan2(b.x - a.x).to_degrees();
    if angle.abs() > 90.0 {
        angle - 180.0 * angle.signum()
    } else {
        angle
    }
}

fn project_all(surface: &dyn Surface, vertices: &[LatLng]) -> Vec<ScreenPoint> {
    vertices.iter().map(|v| surface.project(*v)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::style::StyleDefaults;
    use crate::draw::surface::testing::RecordingSurface;

    #[test]
    fn odd_path_midpoint_is_middle_vertex() {
        let path = [
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 5.0),
            LatLng::new(3.0, 9.0),
        ];
        assert_eq!(path_midpoint(&path), Some(path[1]));
    }

    #[test]
    fn even_path_midpoint_is_between_central_vertices() {
        let path = [
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 2.0),
            LatLng::new(0.0, 4.0),
            LatLng::new(0.0, 6.0),
        ];
        let mid = path_midpoint(&path).expect("two or more vertices");
        assert!(mid.lat.abs() < 1e-9);
        assert!((mid.lng - 3.0).abs() < 1e-9);
        assert!(path_midpoint(&path[..1]).is_none());
    }

    #[test]
    fn segment_angle_flips_to_stay_upright() {
        let origin = ScreenPoint::new(0.0, 0.0);
        assert!((segment_label_angle(origin, ScreenPoint::new(10.0, 10.0)) - 45.0).abs() < 1e-9);
        // Pointing left-down (135°) flips to -45°.
        assert!(
            (segment_label_angle(origin, ScreenPoint::new(-10.0, 10.0)) + 45.0).abs() < 1e-9
        );
        // Pointing left-up (-135°) flips to 45°.
        assert!(
            (segment_label_angle(origin, ScreenPoint::new(-10.0, -10.0)) - 45.0).abs() < 1e-9
        );
        // Exactly vertical is not flipped.
        assert!((segment_label_angle(origin, ScreenPoint::new(0.0, 10.0)) - 90.0).abs() < 1e-9);
    }

    #[test]
    fn polygon_renders_segment_and_area_labels() {
        let styles = StyleDefaults::default();
        let polygon = Entity::Polygon(PolygonEntity {
            vertices: vec![
                LatLng::new(0.0, 0.0),
                LatLng::new(0.0, 0.005),
                LatLng::new(0.005, 0.005),
                LatLng::new(0.005, 0.0),
            ],
            style: styles.polygon,
        });
        let mut surface = RecordingSurface::new(1000.0);
        render_entity(&mut surface, &polygon, &RenderOptions::default());

        assert_eq!(surface.polygons().len(), 1);
        let labels = surface.labels();
        // Four edges plus the area callout.
        assert_eq!(labels.len(), 5);
        assert!(labels.last().is_some_and(|l| l.text.ends_with("ha")));
        assert!(labels.iter().all(|l| l.rotation_deg.abs() <= 90.0));
    }

    #[test]
    fn sector_renders_wedge_and_four_callouts() {
        let styles = StyleDefaults::default();
        let sector = Entity::Sector(SectorEntity {
            center: LatLng::new(0.0, 0.0),
            radius: 500.0,
            bearing: 45.0,
            angle: 90.0,
            elevation: None,
            style: styles.sector,
        });
        let mut surface = RecordingSurface::new(1000.0);
        render_entity(&mut surface, &sector, &RenderOptions::default());

        assert_eq!(surface.polygons().len(), 1);
        assert_eq!(surface.paths().len(), 1);
        let labels = surface.labels();
        assert_eq!(labels.len(), 4);
        assert!(labels[3].text.contains("∠: 90°"));
    }

    #[test]
    fn zero_radius_sector_draws_only_center() {
        let styles = StyleDefaults::default();
        let sector = Entity::Sector(SectorEntity {
            center: LatLng::new(0.0, 0.0),
            radius: 0.0,
            bearing: 0.0,
            angle: 60.0,
            elevation: None,
            style: styles.sector,
        });
        let mut surface = RecordingSurface::new(1000.0);
        render_entity(&mut surface, &sector, &RenderOptions::default());
        assert_eq!(surface.markers(), 1);
        assert!(surface.labels().is_empty());
    }
}
