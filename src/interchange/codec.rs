//! Per-entity GeoJSON feature encoding and decoding.
//!
//! Coordinates are written `[lng, lat]`. Elevations never go into the coordinate
//! arrays; they live in properties so a missing elevation can be an explicit `null`.

use geojson::{Feature, Geometry, JsonObject, Value};
use log::debug;
use serde_json::{Value as JsonValue, json};

use crate::draw::{
    Color, DashStyle, Entity, LineEntity, LineStyle, PointEntity, PointStyle, PointSymbol,
    PolygonEntity, PolygonStyle, SectorEntity, SectorStyle, TextEntity, TextStyle, Vertex,
};
use crate::geodesy::LatLng;

/// `type` property value marking a text feature.
pub const TEXT_TAG: &str = "text";
/// `type` property value marking a sector feature.
pub const SECTOR_TAG: &str = "sector";

/// Encodes one entity as a feature.
///
/// `step_degrees` controls the tessellation of a sector's wedge ring; the sector itself
/// is described exactly by its properties.
pub fn encode(entity: &Entity, step_degrees: f64) -> Feature {
    match entity {
        Entity::Point(point) => {
            let mut props = JsonObject::new();
            props.insert("color".into(), json!(point.style.color.to_hex()));
            props.insert("symbol".into(), json!(point.style.symbol.as_str()));
            props.insert("elevation".into(), json!(point.elevation));
            feature(Value::Point(position(point.position)), props)
        }
        Entity::Text(text) => {
            let mut props = JsonObject::new();
            props.insert("type".into(), json!(TEXT_TAG));
            props.insert("text".into(), json!(text.text));
            props.insert("color".into(), json!(text.style.color.to_hex()));
            props.insert("fontSize".into(), json!(text.style.font_size));
            feature(Value::Point(position(text.position)), props)
        }
        Entity::Line(line) => {
            let elevations: Vec<Option<f64>> = line.vertices.iter().map(|v| v.elevation).collect();
            let mut props = JsonObject::new();
            props.insert("color".into(), json!(line.style.color.to_hex()));
            props.insert("dashStyle".into(), json!(line.style.dash.as_str()));
            props.insert("weight".into(), json!(line.style.weight));
            props.insert("elevations".into(), json!(elevations));
            let coords = line.vertices.iter().map(|v| position(v.position)).collect();
            feature(Value::LineString(coords), props)
        }
        Entity::Polygon(polygon) => {
            let mut ring: Vec<Vec<f64>> = polygon.vertices.iter().map(|v| position(*v)).collect();
            if let Some(first) = ring.first().cloned() {
                ring.push(first);
            }
            let mut props = JsonObject::new();
            props.insert("color".into(), json!(polygon.style.color.to_hex()));
            props.insert("fillAlpha".into(), json!(polygon.style.fill_alpha));
            feature(Value::Polygon(vec![ring]), props)
        }
        Entity::Sector(sector) => {
            let ring = sector
                .wedge(step_degrees)
                .into_iter()
                .map(position)
                .collect();
            let mut props = JsonObject::new();
            props.insert("type".into(), json!(SECTOR_TAG));
            props.insert("center".into(), json!(position(sector.center)));
            props.insert("radius".into(), json!(sector.radius));
            props.insert("bearing".into(), json!(sector.bearing));
            props.insert("angle".into(), json!(sector.angle));
            props.insert("elevation".into(), json!(sector.elevation));
            props.insert("color".into(), json!(sector.style.color.to_hex()));
            props.insert("fillAlpha".into(), json!(sector.style.fill_alpha));
            feature(Value::Polygon(vec![ring]), props)
        }
    }
}

/// The feature's `type` property, if it is a string.
pub fn type_tag(feature: &Feature) -> Option<&str> {
    feature.property("type").and_then(JsonValue::as_str)
}

pub fn is_point(feature: &Feature) -> bool {
    matches!(geometry(feature), Some(Value::Point(_))) && type_tag(feature).is_none()
}

pub fn is_text(feature: &Feature) -> bool {
    matches!(geometry(feature), Some(Value::Point(_))) && type_tag(feature) == Some(TEXT_TAG)
}

pub fn is_line(feature: &Feature) -> bool {
    matches!(geometry(feature), Some(Value::LineString(_))) && type_tag(feature).is_none()
}

pub fn is_polygon(feature: &Feature) -> bool {
    matches!(geometry(feature), Some(Value::Polygon(_))) && type_tag(feature).is_none()
}

pub fn is_sector(feature: &Feature) -> bool {
    matches!(geometry(feature), Some(Value::Polygon(_))) && type_tag(feature) == Some(SECTOR_TAG)
}

pub fn decode_point(feature: &Feature, defaults: &PointStyle) -> Option<PointEntity> {
    let Some(Value::Point(coords)) = geometry(feature) else {
        return None;
    };
    let symbol = feature
        .property("symbol")
        .and_then(JsonValue::as_str)
        .and_then(|name| name.parse::<PointSymbol>().ok())
        .unwrap_or(defaults.symbol);
    Some(PointEntity {
        position: lat_lng(coords)?,
        elevation: number(feature, "elevation"),
        style: PointStyle {
            color: color(feature, defaults.color),
            symbol,
        },
    })
}

pub fn decode_text(feature: &Feature, defaults: &TextStyle) -> Option<TextEntity> {
    let Some(Value::Point(coords)) = geometry(feature) else {
        return None;
    };
    let text = feature.property("text").and_then(JsonValue::as_str)?;
    if text.trim().is_empty() {
        return None;
    }
    Some(TextEntity {
        position: lat_lng(coords)?,
        text: text.to_string(),
        style: TextStyle {
            color: color(feature, defaults.color),
            font_size: number(feature, "fontSize").unwrap_or(defaults.font_size),
        },
    })
}

pub fn decode_line(feature: &Feature, defaults: &LineStyle) -> Option<LineEntity> {
    let Some(Value::LineString(coords)) = geometry(feature) else {
        return None;
    };
    let elevations: Vec<Option<f64>> = feature
        .property("elevations")
        .and_then(JsonValue::as_array)
        .map(|values| values.iter().map(JsonValue::as_f64).collect())
        .unwrap_or_default();

    let vertices = coords
        .iter()
        .enumerate()
        .map(|(i, c)| {
            Some(Vertex {
                position: lat_lng(c)?,
                elevation: elevations.get(i).copied().flatten(),
            })
        })
        .collect::<Option<Vec<_>>>()?;
    if vertices.len() < 2 {
        return None;
    }

    let dash = feature
        .property("dashStyle")
        .and_then(JsonValue::as_str)
        .and_then(|name| name.parse::<DashStyle>().ok())
        .unwrap_or(defaults.dash);
    Some(LineEntity {
        vertices,
        style: LineStyle {
            color: color(feature, defaults.color),
            dash,
            weight: number(feature, "weight").unwrap_or(defaults.weight),
        },
    })
}

pub fn decode_polygon(feature: &Feature, defaults: &PolygonStyle) -> Option<PolygonEntity> {
    let ring = outer_ring(feature)?;
    let mut vertices = ring
        .iter()
        .map(|c| lat_lng(c))
        .collect::<Option<Vec<_>>>()?;
    if vertices.len() > 1 && vertices.first() == vertices.last() {
        vertices.pop();
    }
    if vertices.len() < 3 {
        return None;
    }
    Some(PolygonEntity {
        vertices,
        style: PolygonStyle {
            color: color(feature, defaults.color),
            fill_alpha: number(feature, "fillAlpha").unwrap_or(defaults.fill_alpha),
        },
    })
}

/// Sector geometry comes from the properties only; the wedge ring is ignored.
/// A missing `angle` takes `default_angle`; one outside (0, 360] rejects the feature.
pub fn decode_sector(
    feature: &Feature,
    defaults: &SectorStyle,
    default_angle: f64,
) -> Option<SectorEntity> {
    let center = feature
        .property("center")
        .and_then(JsonValue::as_array)
        .and_then(|values| {
            let coords: Vec<f64> = values.iter().filter_map(JsonValue::as_f64).collect();
            (coords.len() == values.len()).then_some(coords)
        })
        .and_then(|coords| lat_lng(&coords))?;
    let radius = number(feature, "radius").filter(|r| r.is_finite() && *r >= 0.0)?;
    let bearing = number(feature, "bearing").filter(|b| b.is_finite())?;
    let angle = number(feature, "angle").unwrap_or(default_angle);
    if !SectorEntity::is_valid_angle(angle) {
        debug!("Rejecting sector with angle {angle}");
        return None;
    }
    Some(SectorEntity {
        center,
        radius,
        bearing,
        angle,
        elevation: number(feature, "elevation"),
        style: SectorStyle {
            color: color(feature, defaults.color),
            fill_alpha: number(feature, "fillAlpha").unwrap_or(defaults.fill_alpha),
        },
    })
}

fn feature(value: Value, properties: JsonObject) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn geometry(feature: &Feature) -> Option<&Value> {
    feature.geometry.as_ref().map(|g| &g.value)
}

fn outer_ring(feature: &Feature) -> Option<&Vec<Vec<f64>>> {
    match geometry(feature) {
        Some(Value::Polygon(rings)) => rings.first(),
        _ => None,
    }
}

fn position(at: LatLng) -> Vec<f64> {
    vec![at.lng, at.lat]
}

fn lat_lng(coords: &[f64]) -> Option<LatLng> {
    match coords {
        [lng, lat, ..] if lng.is_finite() && lat.is_finite() => Some(LatLng::new(*lat, *lng)),
        _ => None,
    }
}

fn number(feature: &Feature, key: &str) -> Option<f64> {
    feature.property(key).and_then(JsonValue::as_f64)
}

fn color(feature: &Feature, fallback: Color) -> Color {
    feature
        .property("color")
        .and_then(JsonValue::as_str)
        .and_then(Color::from_hex)
        .unwrap_or(fallback)
}
