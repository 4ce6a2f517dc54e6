//! GeoJSON import and export of annotation data.
//!
//! A document is a single FeatureCollection with one feature per entity. Export
//! walks the drawing tools in registration order; import hands each feature to the
//! first tool that accepts it. Unknown or malformed features are skipped one by one,
//! while a document that is not a FeatureCollection is rejected before anything is
//! applied.

pub mod codec;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use geojson::{FeatureCollection, GeoJson, JsonObject};
use log::{debug, info};
use serde_json::json;
use thiserror::Error;

use crate::input::ToolRegistry;

/// Foreign member naming the program that wrote a document.
pub const GENERATOR_MEMBER: &str = "generator";
/// Foreign member holding the export timestamp.
pub const EXPORTED_AT_MEMBER: &str = "exportedAt";

/// Errors that reject a document as a whole.
#[derive(Debug, Error)]
pub enum InterchangeError {
    #[error("Failed to parse GeoJSON: {0}")]
    Parse(#[from] geojson::Error),

    #[error("Expected a FeatureCollection at the top level, found a {0}")]
    NotFeatureCollection(&'static str),

    #[error("Failed to serialize document: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
}

/// Parses a document, rejecting anything but a FeatureCollection.
pub fn parse_document(text: &str) -> Result<FeatureCollection, InterchangeError> {
    match text.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        GeoJson::Feature(_) => Err(InterchangeError::NotFeatureCollection("Feature")),
        GeoJson::Geometry(_) => Err(InterchangeError::NotFeatureCollection("Geometry")),
    }
}

/// Builds the FeatureCollection for every committed entity, tagged with the
/// generator and export time.
pub fn export_collection(registry: &ToolRegistry) -> FeatureCollection {
    let mut members = JsonObject::new();
    members.insert(
        GENERATOR_MEMBER.into(),
        json!(concat!("geoscribe ", env!("CARGO_PKG_VERSION"))),
    );
    members.insert(
        EXPORTED_AT_MEMBER.into(),
        json!(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
    );

    FeatureCollection {
        bbox: None,
        features: registry.export_features(),
        foreign_members: Some(members),
    }
}

/// Serializes every committed entity as a pretty-printed document.
pub fn export_document(registry: &ToolRegistry) -> Result<String, InterchangeError> {
    let collection = export_collection(registry);
    debug!("Exporting {} feature(s)", collection.features.len());
    Ok(serde_json::to_string_pretty(&collection)?)
}

/// Imports a document into the registry, appending to existing collections.
///
/// # Errors
/// Fails without touching the registry if the text is not GeoJSON or not a
/// FeatureCollection. Individual unrecognized features only count as skipped.
pub fn import_document(
    registry: &mut ToolRegistry,
    text: &str,
) -> Result<ImportReport, InterchangeError> {
    let collection = parse_document(text)?;
    let report = registry.import_features(&collection.features);
    info!(
        "Imported {} feature(s), skipped {}",
        report.imported, report.skipped
    );
    Ok(report)
}

/// Reads and imports a document from disk.
pub fn import_file(
    registry: &mut ToolRegistry,
    path: &Path,
) -> Result<ImportReport, InterchangeError> {
    let text = fs::read_to_string(path).map_err(|source| InterchangeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    import_document(registry, &text)
}

/// Exports every committed entity to a file on disk.
pub fn export_file(registry: &ToolRegistry, path: &Path) -> Result<(), InterchangeError> {
    let text = export_document(registry)?;
    fs::write(path, text).map_err(|source| InterchangeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Wrote {}", path.display());
    Ok(())
}
