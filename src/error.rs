use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the school dataset or the boundary overlay.
#[derive(Debug, Error)]
pub enum DataError {
    /// The file could not be opened or read.
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV header could not be decoded.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header.
    #[error("required column '{0}' not found in dataset header")]
    MissingColumn(String),

    /// The boundary file is not valid JSON.
    #[error("boundary file is not valid JSON: {0}")]
    Json(#[from] simd_json::Error),

    /// The boundary JSON is not valid GeoJSON.
    #[error("boundary file is not valid GeoJSON: {0}")]
    GeoJson(#[from] geojson::Error),

    /// The boundary GeoJSON contains no polygon features.
    #[error("no polygon features found in {0:?}")]
    NoPolygons(PathBuf),
}
