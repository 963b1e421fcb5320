//! Precondition checks for grouping inputs.

use crate::error::{Result, TileGroupError};
use tilegroup_types::point::Point3d;

/// Validates a merge-grid cell size.
///
/// The cell size divides every centroid coordinate, so it must be finite and
/// strictly positive.
///
/// # Examples
///
/// ```
/// use tilegroup::compute::validation::validate_cell_size;
///
/// assert!(validate_cell_size(300.0).is_ok());
/// assert!(validate_cell_size(0.0).is_err());
/// assert!(validate_cell_size(-1.0).is_err());
/// assert!(validate_cell_size(f64::NAN).is_err());
/// ```
pub fn validate_cell_size(cell_size: f64) -> Result<()> {
    if !cell_size.is_finite() || cell_size <= 0.0 {
        return Err(TileGroupError::InvalidCellSize(cell_size));
    }
    Ok(())
}

/// Validates the kd-tree group size bound.
pub fn validate_max_group_size(max_group_size: usize) -> Result<()> {
    if max_group_size == 0 {
        return Err(TileGroupError::InvalidInput(
            "Max group size must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

/// Reason a centroid is unusable, if any.
fn centroid_problem(point: &Point3d) -> Option<String> {
    if point.is_finite() {
        return None;
    }
    let [x, y, z] = point.coords();
    Some(format!("Centroid must be finite, got: ({}, {}, {})", x, y, z))
}

/// Validates a single centroid has finite coordinates.
pub fn validate_centroid(point: &Point3d) -> Result<()> {
    match centroid_problem(point) {
        Some(reason) => Err(TileGroupError::InvalidInput(reason)),
        None => Ok(()),
    }
}

/// Validates multiple centroids.
///
/// # Examples
///
/// ```
/// use tilegroup::compute::validation::validate_centroids;
/// use tilegroup::Point3d;
///
/// let centroids = vec![
///     Point3d::new(0.0, 0.0, 0.0),
///     Point3d::new(f64::INFINITY, 1.0, 0.0), // Invalid
/// ];
/// assert!(validate_centroids(&centroids).is_err());
/// ```
pub fn validate_centroids(points: &[Point3d]) -> Result<()> {
    for (idx, point) in points.iter().enumerate() {
        if let Some(reason) = centroid_problem(point) {
            return Err(TileGroupError::InvalidInput(format!(
                "Geometry at index {}: {}",
                idx, reason
            )));
        }
    }
    Ok(())
}
