//! Asynchronous elevation augmentation for new entities.
//!
//! Points, line vertices, and sector centers get an elevation sample from an
//! external [`ElevationSource`]. Lookups run on a tokio runtime and never block the
//! editing engine; results come back over a channel and are applied by the tool
//! registry on its own thread. Results are cached by coordinate rounded to a fixed
//! number of decimal places, and a debounced variant throttles high-frequency
//! status queries (e.g. a pointer-move readout).

pub mod types;

mod dependencies;
mod manager;
#[cfg(test)]
mod tests;

pub use dependencies::{ElevationSource, NoElevationSource};
pub use manager::{ElevationService, ElevationSettings};
pub use types::{CoordKey, ElevationError, ElevationRequest, ElevationResult, ElevationTarget};
