//! Error types for the grouping engine.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading polygons or grouping geometries.
#[derive(Error, Debug)]
pub enum TileGroupError {
    /// The polygon directory does not exist or cannot be listed.
    #[error(
        "No directory called {}. Please, place the polygons to read in {}",
        .path.display(),
        .path.display()
    )]
    DirectoryNotFound { path: PathBuf },

    /// A matching polygon file is not a valid GeoJSON FeatureCollection.
    #[error("Malformed feature file {}: {reason}", .path.display())]
    MalformedFeatureFile { path: PathBuf, reason: String },

    /// Grid cell size must be finite and strictly positive.
    #[error("Cell size must be finite and greater than zero, got: {0}")]
    InvalidCellSize(f64),

    /// Groups always hold at least one geometry.
    #[error("Cannot build a group without geometries")]
    EmptyGroup,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TileGroupError {
    /// True for the conditions that must terminate a batch run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TileGroupError::DirectoryNotFound { .. } | TileGroupError::MalformedFeatureFile { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, TileGroupError>;
