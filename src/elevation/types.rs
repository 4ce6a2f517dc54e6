//! Data types for elevation lookups.

use crate::draw::EntityId;
use crate::geodesy::LatLng;
use thiserror::Error;

/// What a resolved elevation should be written into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElevationTarget {
    /// A committed entity or a draft, addressed by id. `vertex` selects a line vertex.
    Entity { id: EntityId, vertex: Option<usize> },
    /// The pointer-position status readout.
    Status,
}

/// A lookup issued by a tool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationRequest {
    pub target: ElevationTarget,
    pub position: LatLng,
}

impl ElevationRequest {
    pub fn for_entity(id: EntityId, vertex: Option<usize>, position: LatLng) -> Self {
        Self {
            target: ElevationTarget::Entity { id, vertex },
            position,
        }
    }
}

/// A resolved lookup. `elevation` is `None` when the source has no data there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationResult {
    pub target: ElevationTarget,
    pub position: LatLng,
    pub elevation: Option<f64>,
}

/// Cache key: a coordinate rounded to a fixed number of decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CoordKey {
    lat: i64,
    lng: i64,
}

impl CoordKey {
    pub fn new(at: LatLng, decimals: u32) -> Self {
        let scale = 10f64.powi(decimals as i32);
        Self {
            lat: (at.lat * scale).round() as i64,
            lng: (at.lng * scale).round() as i64,
        }
    }
}

/// Errors that can occur during an elevation lookup.
#[derive(Debug, Error)]
pub enum ElevationError {
    #[error("Elevation service request failed: {0}")]
    Request(String),

    #[error("Elevation service returned status {0}")]
    Status(u16),

    #[error("Malformed elevation response: {0}")]
    InvalidResponse(String),
}
