//! Spherical-earth geometry: distances, bearings, areas, and unit formatting.
//!
//! All functions are stateless and operate on a sphere of radius [`EARTH_RADIUS_M`].
//! Area and centroid use planar approximations on raw degree coordinates, which is
//! adequate for the small extents users sketch on a map but not geodesically exact.

/// Mean earth radius used by every spherical formula, in meters.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Approximate meters covered by one degree of arc on [`EARTH_RADIUS_M`].
pub const METERS_PER_DEGREE: f64 = 111_319.490_793_273_57;

/// Distance at which formatted lengths switch from meters to kilometers.
const KILOMETER_THRESHOLD_M: f64 = 1_000.0;

/// Area at which formatted areas switch from square meters to hectares.
const HECTARE_THRESHOLD_M2: f64 = 10_000.0;

/// Area at which formatted areas switch from hectares to square kilometers.
const SQUARE_KM_THRESHOLD_M2: f64 = 1_000_000.0;

/// A geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns this coordinate shifted by the given degree offsets.
    pub fn offset(&self, d_lat: f64, d_lng: f64) -> Self {
        Self {
            lat: self.lat + d_lat,
            lng: self.lng + d_lng,
        }
    }
}

/// Axis-aligned latitude/longitude rectangle used for area selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLngBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl LatLngBounds {
    /// Builds bounds from two opposite corners in any order.
    pub fn from_corners(a: LatLng, b: LatLng) -> Self {
        Self {
            south: a.lat.min(b.lat),
            west: a.lng.min(b.lng),
            north: a.lat.max(b.lat),
            east: a.lng.max(b.lng),
        }
    }

    /// Returns true if the coordinate lies inside the rectangle (edges inclusive).
    pub fn contains(&self, at: LatLng) -> bool {
        (self.south..=self.north).contains(&at.lat) && (self.west..=self.east).contains(&at.lng)
    }
}

/// Great-circle distance in meters between two coordinates (haversine formula).
pub fn distance(a: LatLng, b: LatLng) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Initial bearing in degrees (0–360, clockwise from north) from `from` toward `to`.
pub fn bearing(from: LatLng, to: LatLng) -> f64 {
    let phi1 = from.lat.to_radians();
    let phi2 = to.lat.to_radians();
    let d_lambda = (to.lng - from.lng).to_radians();

    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Coordinate reached by travelling `distance_m` meters from `origin` along `bearing_deg`.
pub fn destination(origin: LatLng, distance_m: f64, bearing_deg: f64) -> LatLng {
    let delta = distance_m / EARTH_RADIUS_M;
    let theta = bearing_deg.to_radians();
    let phi1 = origin.lat.to_radians();
    let lambda1 = origin.lng.to_radians();

    let phi2 = (phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos()).asin();
    let lambda2 = lambda1
        + (theta.sin() * delta.sin() * phi1.cos()).atan2(delta.cos() - phi1.sin() * phi2.sin());

    LatLng::new(phi2.to_degrees(), normalize_longitude(lambda2.to_degrees()))
}

/// Spherical midpoint of the great-circle arc between two coordinates.
pub fn midpoint(a: LatLng, b: LatLng) -> LatLng {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let lambda1 = a.lng.to_radians();
    let d_lambda = (b.lng - a.lng).to_radians();

    let bx = phi2.cos() * d_lambda.cos();
    let by = phi2.cos() * d_lambda.sin();
    let phi3 = (phi1.sin() + phi2.sin()).atan2(((phi1.cos() + bx).powi(2) + by.powi(2)).sqrt());
    let lambda3 = lambda1 + by.atan2(phi1.cos() + bx);

    LatLng::new(phi3.to_degrees(), normalize_longitude(lambda3.to_degrees()))
}

/// Cumulative great-circle length of a vertex path in meters.
pub fn polyline_length(vertices: &[LatLng]) -> f64 {
    vertices
        .windows(2)
        .map(|pair| distance(pair[0], pair[1]))
        .fold(0.0, |total, leg| total + leg)
}

/// Planar polygon area in square meters.
///
/// Runs the shoelace formula on raw degree coordinates and scales the result by
/// [`METERS_PER_DEGREE`] squared. Longitude convergence toward the poles is ignored,
/// so the figure is only meaningful for small extents.
pub fn polygon_area(vertices: &[LatLng]) -> f64 {
    if vertices.len() < 3 {
        return 0.0;
    }

    let mut twice_area = 0.0;
    for (i, current) in vertices.iter().enumerate() {
        let next = vertices[(i + 1) % vertices.len()];
        twice_area += current.lng * next.lat - next.lng * current.lat;
    }

    (twice_area / 2.0).abs() * METERS_PER_DEGREE * METERS_PER_DEGREE
}

/// Arithmetic mean of the vertices. Returns `None` for an empty slice.
pub fn centroid(vertices: &[LatLng]) -> Option<LatLng> {
    if vertices.is_empty() {
        return None;
    }
    let count = vertices.len() as f64;
    let (lat_sum, lng_sum) = vertices
        .iter()
        .fold((0.0, 0.0), |(lat, lng), v| (lat + v.lat, lng + v.lng));
    Some(LatLng::new(lat_sum / count, lng_sum / count))
}

/// Ray-casting containment test treating longitude as x and latitude as y.
pub fn point_in_polygon(point: LatLng, polygon: &[LatLng]) -> bool {
    if polygon.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = polygon.len() - 1;
    for i in 0..polygon.len() {
        let (xi, yi) = (polygon[i].lng, polygon[i].lat);
        let (xj, yj) = (polygon[j].lng, polygon[j].lat);

        let crosses = (yi > point.lat) != (yj > point.lat)
            && point.lng < (xj - xi) * (point.lat - yi) / (yj - yi) + xi;
        if crosses {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Formats a distance, switching to kilometers at 1000 m (inclusive).
pub fn format_distance(meters: f64) -> String {
    if meters >= KILOMETER_THRESHOLD_M {
        format!("{:.2} km", meters / 1_000.0)
    } else {
        format!("{:.1} m", meters)
    }
}

/// Formats an area as m², hectares, or km² depending on magnitude.
pub fn format_area(square_meters: f64) -> String {
    if square_meters >= SQUARE_KM_THRESHOLD_M2 {
        format!("{:.2} km²", square_meters / 1_000_000.0)
    } else if square_meters >= HECTARE_THRESHOLD_M2 {
        format!("{:.2} ha", square_meters / 10_000.0)
    } else {
        format!("{:.0} m²", square_meters)
    }
}

fn normalize_longitude(lng: f64) -> f64 {
    (lng + 540.0) % 360.0 - 180.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-6;

    fn square() -> Vec<LatLng> {
        vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 1.0),
            LatLng::new(1.0, 1.0),
            LatLng::new(1.0, 0.0),
        ]
    }

    #[test]
    fn one_degree_of_longitude_on_equator() {
        let d = distance(LatLng::new(0.0, 0.0), LatLng::new(0.0, 1.0));
        assert!((d - METERS_PER_DEGREE).abs() < 1e-3);
    }

    #[test]
    fn distance_is_symmetric_and_zero_for_same_point() {
        let a = LatLng::new(48.85, 2.35);
        let b = LatLng::new(51.5, -0.12);
        assert!((distance(a, b) - distance(b, a)).abs() < EPS);
        assert_eq!(distance(a, a), 0.0);
    }

    #[test]
    fn bearing_cardinal_directions() {
        let origin = LatLng::new(0.0, 0.0);
        assert!((bearing(origin, LatLng::new(1.0, 0.0)) - 0.0).abs() < EPS);
        assert!((bearing(origin, LatLng::new(0.0, 1.0)) - 90.0).abs() < EPS);
        assert!((bearing(origin, LatLng::new(-1.0, 0.0)) - 180.0).abs() < EPS);
        assert!((bearing(origin, LatLng::new(0.0, -1.0)) - 270.0).abs() < EPS);
    }

    #[test]
    fn destination_inverts_distance_and_bearing() {
        let origin = LatLng::new(45.0, 7.0);
        let target = destination(origin, 2_500.0, 33.0);
        assert!((distance(origin, target) - 2_500.0).abs() < 1e-3);
        assert!((bearing(origin, target) - 33.0).abs() < 1e-6);
    }

    #[test]
    fn midpoint_is_equidistant() {
        let a = LatLng::new(10.0, 10.0);
        let b = LatLng::new(12.0, 15.0);
        let m = midpoint(a, b);
        assert!((distance(a, m) - distance(m, b)).abs() < 1e-3);
    }

    #[test]
    fn polyline_length_sums_pairwise_distances() {
        let path = vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.01, 0.02),
            LatLng::new(0.03, 0.01),
        ];
        let expected = distance(path[0], path[1]) + distance(path[1], path[2]);
        assert!((polyline_length(&path) - expected).abs() < EPS);
        assert_eq!(polyline_length(&path[..1]), 0.0);
        assert!(polyline_length(&[]).is_sign_positive());
        assert_eq!(format_distance(polyline_length(&[])), "0.0 m");
    }

    #[test]
    fn polygon_area_of_unit_degree_square() {
        let area = polygon_area(&square());
        let expected = METERS_PER_DEGREE * METERS_PER_DEGREE;
        assert!((area - expected).abs() < 1.0);
        assert_eq!(polygon_area(&square()[..2]), 0.0);
    }

    #[test]
    fn polygon_area_ignores_winding() {
        let mut reversed = square();
        reversed.reverse();
        assert!((polygon_area(&reversed) - polygon_area(&square())).abs() < EPS);
    }

    #[test]
    fn centroid_is_vertex_mean() {
        let c = centroid(&square()).expect("non-empty");
        assert!((c.lat - 0.5).abs() < EPS);
        assert!((c.lng - 0.5).abs() < EPS);
        assert!(centroid(&[]).is_none());
    }

    #[test]
    fn point_in_polygon_basic() {
        assert!(point_in_polygon(LatLng::new(0.5, 0.5), &square()));
        assert!(!point_in_polygon(LatLng::new(1.5, 0.5), &square()));
        assert!(!point_in_polygon(LatLng::new(-3.0, 7.0), &square()));
    }

    #[test]
    fn point_in_polygon_invariant_under_rotation() {
        let polygon = vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.2, 1.0),
            LatLng::new(1.0, 1.2),
            LatLng::new(1.1, 0.1),
            LatLng::new(0.6, -0.3),
        ];
        let probes = [
            LatLng::new(0.5, 0.5),
            LatLng::new(0.9, 1.1),
            LatLng::new(2.0, 0.0),
            LatLng::new(0.1, -0.2),
        ];
        for shift in 0..polygon.len() {
            let mut rotated = polygon.clone();
            rotated.rotate_left(shift);
            for probe in probes {
                assert_eq!(
                    point_in_polygon(probe, &rotated),
                    point_in_polygon(probe, &polygon),
                    "rotation {shift} changed result for {probe:?}"
                );
            }
        }
    }

    #[test]
    fn distance_format_switches_at_exactly_one_kilometer() {
        assert_eq!(format_distance(999.9), "999.9 m");
        assert_eq!(format_distance(1_000.0), "1.00 km");
        assert_eq!(format_distance(12_500.0), "12.50 km");
    }

    #[test]
    fn area_format_thresholds() {
        assert_eq!(format_area(9_999.0), "9999 m²");
        assert_eq!(format_area(10_000.0), "1.00 ha");
        assert_eq!(format_area(999_999.0), "100.00 ha");
        assert_eq!(format_area(1_000_000.0), "1.00 km²");
    }

    #[test]
    fn bounds_from_corners_in_any_order() {
        let bounds = LatLngBounds::from_corners(LatLng::new(2.0, 3.0), LatLng::new(-1.0, -4.0));
        assert!(bounds.contains(LatLng::new(0.0, 0.0)));
        assert!(bounds.contains(LatLng::new(2.0, 3.0)));
        assert!(!bounds.contains(LatLng::new(2.1, 0.0)));
    }
}
