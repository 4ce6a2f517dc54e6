use async_trait::async_trait;
use futures::future::join_all;

use crate::elevation::types::ElevationError;
use crate::geodesy::LatLng;

/// Abstraction over the network service that answers elevation queries.
#[async_trait]
pub trait ElevationSource: Send + Sync {
    /// Elevation in meters at a coordinate, or `None` when the service has no data.
    async fn lookup(&self, at: LatLng) -> Result<Option<f64>, ElevationError>;

    /// Looks up several coordinates. Sources with a batch endpoint should override this.
    async fn lookup_many(&self, points: &[LatLng]) -> Vec<Result<Option<f64>, ElevationError>> {
        join_all(points.iter().map(|at| self.lookup(*at))).await
    }
}

/// Source that never has data; used when elevation lookups are disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoElevationSource;

#[async_trait]
impl ElevationSource for NoElevationSource {
    async fn lookup(&self, _at: LatLng) -> Result<Option<f64>, ElevationError> {
        Ok(None)
    }
}
