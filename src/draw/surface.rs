//! Renderer contract consumed by the tools.
//!
//! The embedding map view implements [`Projection`] (geographic ↔ screen mapping)
//! and [`Surface`] (drawing primitives). Tools never talk to a concrete renderer.

use super::color::Color;
use super::style::{DashStyle, PointSymbol};
use crate::geodesy::LatLng;

/// Position in local drawing coordinates (pixels, y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: ScreenPoint) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// Forward and reverse mapping between geographic and screen coordinates.
pub trait Projection {
    fn project(&self, at: LatLng) -> ScreenPoint;
    fn unproject(&self, at: ScreenPoint) -> LatLng;
}

/// Outline parameters for paths and polygons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Color,
    pub width: f64,
    pub dash: DashStyle,
}

impl Stroke {
    pub fn solid(color: Color, width: f64) -> Self {
        Self {
            color,
            width,
            dash: DashStyle::Solid,
        }
    }
}

/// A text callout placed on the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub position: ScreenPoint,
    pub text: String,
    pub color: Color,
    pub font_size: f64,
    /// Clockwise rotation in degrees around `position`
    pub rotation_deg: f64,
    /// Whether to draw a background box behind the text
    pub boxed: bool,
}

impl Label {
    /// Unrotated, boxed measurement callout.
    pub fn callout(position: ScreenPoint, text: impl Into<String>, color: Color) -> Self {
        Self {
            position,
            text: text.into(),
            color,
            font_size: MEASUREMENT_FONT_SIZE,
            rotation_deg: 0.0,
            boxed: true,
        }
    }
}

/// Font size used for length and area callouts.
pub const MEASUREMENT_FONT_SIZE: f64 = 12.0;

/// Drawing primitives issued by tools during a redraw.
pub trait Surface: Projection {
    /// Strokes an open path.
    fn stroke_path(&mut self, points: &[ScreenPoint], stroke: &Stroke);

    /// Fills and outlines a closed ring (the closing edge is implicit).
    fn fill_polygon(&mut self, ring: &[ScreenPoint], stroke: &Stroke, fill: Color);

    /// Draws a point marker.
    fn draw_marker(&mut self, at: ScreenPoint, symbol: PointSymbol, color: Color);

    /// Draws a text label.
    fn draw_label(&mut self, label: &Label);
}

/// Spherical Web Mercator view with 256-pixel tiles.
///
/// `center` maps to the middle of a `width` × `height` viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MercatorView {
    pub center: LatLng,
    pub zoom: f64,
    pub width: f64,
    pub height: f64,
}

const TILE_SIZE: f64 = 256.0;

impl MercatorView {
    pub fn new(center: LatLng, zoom: f64, width: f64, height: f64) -> Self {
        Self {
            center,
            zoom,
            width,
            height,
        }
    }

    fn world_size(&self) -> f64 {
        TILE_SIZE * 2f64.powf(self.zoom)
    }

    fn to_world(&self, at: LatLng) -> (f64, f64) {
        let size = self.world_size();
        let lat = at.lat.clamp(-85.051_128_78, 85.051_128_78).to_radians();
        let x = (at.lng + 180.0) / 360.0 * size;
        let y = (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / std::f64::consts::PI) / 2.0 * size;
        (x, y)
    }
}

impl Projection for MercatorView {
    fn project(&self, at: LatLng) -> ScreenPoint {
        let (cx, cy) = self.to_world(self.center);
        let (x, y) = self.to_world(at);
        ScreenPoint::new(x - cx + self.width / 2.0, y - cy + self.height / 2.0)
    }

    fn unproject(&self, at: ScreenPoint) -> LatLng {
        let size = self.world_size();
        let (cx, cy) = self.to_world(self.center);
        let x = at.x + cx - self.width / 2.0;
        let y = at.y + cy - self.height / 2.0;
        let lng = x / size * 360.0 - 180.0;
        let n = std::f64::consts::PI * (1.0 - 2.0 * y / size);
        let lat = n.sinh().atan().to_degrees();
        LatLng::new(lat, lng)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Primitive recorded by [`RecordingSurface`].
    #[derive(Debug, Clone, PartialEq)]
    pub enum Primitive {
        Path(Vec<ScreenPoint>, Stroke),
        Polygon(Vec<ScreenPoint>, Stroke, Color),
        Marker(ScreenPoint, PointSymbol, Color),
        Label(Label),
    }

    /// Surface that records primitives and projects with a fixed pixels-per-degree scale.
    ///
    /// x = lng · scale, y = −lat · scale.
    pub struct RecordingSurface {
        pub scale: f64,
        pub primitives: Vec<Primitive>,
    }

    impl RecordingSurface {
        pub fn new(scale: f64) -> Self {
            Self {
                scale,
                primitives: Vec::new(),
            }
        }

        pub fn labels(&self) -> Vec<&Label> {
            self.primitives
                .iter()
                .filter_map(|p| match p {
                    Primitive::Label(label) => Some(label),
                    _ => None,
                })
                .collect()
        }

        pub fn paths(&self) -> Vec<&Vec<ScreenPoint>> {
            self.primitives
                .iter()
                .filter_map(|p| match p {
                    Primitive::Path(points, _) => Some(points),
                    _ => None,
                })
                .collect()
        }

        pub fn polygons(&self) -> Vec<&Vec<ScreenPoint>> {
            self.primitives
                .iter()
                .filter_map(|p| match p {
                    Primitive::Polygon(ring, _, _) => Some(ring),
                    _ => None,
                })
                .collect()
        }

        pub fn markers(&self) -> usize {
            self.primitives
                .iter()
                .filter(|p| matches!(p, Primitive::Marker(..)))
                .count()
        }
    }

    impl Projection for RecordingSurface {
        fn project(&self, at: LatLng) -> ScreenPoint {
            ScreenPoint::new(at.lng * self.scale, -at.lat * self.scale)
        }

        fn unproject(&self, at: ScreenPoint) -> LatLng {
            LatLng::new(-at.y / self.scale, at.x / self.scale)
        }
    }

    impl Surface for RecordingSurface {
        fn stroke_path(&mut self, points: &[ScreenPoint], stroke: &Stroke) {
            self.primitives.push(Primitive::Path(points.to_vec(), *stroke));
        }

        fn fill_polygon(&mut self, ring: &[ScreenPoint], stroke: &Stroke, fill: Color) {
            self.primitives
                .push(Primitive::Polygon(ring.to_vec(), *stroke, fill));
        }

        fn draw_marker(&mut self, at: ScreenPoint, symbol: PointSymbol, color: Color) {
            self.primitives.push(Primitive::Marker(at, symbol, color));
        }

        fn draw_label(&mut self, label: &Label) {
            self.primitives.push(Primitive::Label(label.clone()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mercator_center_projects_to_viewport_middle() {
        let view = MercatorView::new(LatLng::new(48.0, 11.0), 12.0, 800.0, 600.0);
        let p = view.project(view.center);
        assert!((p.x - 400.0).abs() < 1e-9);
        assert!((p.y - 300.0).abs() < 1e-9);
    }

    #[test]
    fn mercator_unproject_inverts_project() {
        let view = MercatorView::new(LatLng::new(-33.9, 18.4), 10.0, 1024.0, 768.0);
        let at = LatLng::new(-33.85, 18.5);
        let back = view.unproject(view.project(at));
        assert!((back.lat - at.lat).abs() < 1e-9);
        assert!((back.lng - at.lng).abs() < 1e-9);
    }

    #[test]
    fn north_is_up_on_screen() {
        let view = MercatorView::new(LatLng::new(0.0, 0.0), 5.0, 100.0, 100.0);
        let north = view.project(LatLng::new(1.0, 0.0));
        let east = view.project(LatLng::new(0.0, 1.0));
        assert!(north.y < 50.0);
        assert!(east.x > 50.0);
    }
}
