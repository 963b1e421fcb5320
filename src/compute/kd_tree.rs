//! Balanced kd-tree splitting of geometry collections.
//!
//! The splitter sorts a collection along one axis, cuts it at the median and
//! recurses on each half with the next axis until every piece holds at most
//! `max_size` geometries. Axes alternate between x and y.

use crate::collection::{Geometry, GeometryCollection};
use crate::compute::validation::validate_max_group_size;
use crate::error::Result;

/// Partitions a collection into ordered sub-collections of bounded size.
pub trait SpatialSplitter<G> {
    /// Split `collection` into pieces of at most `max_size` geometries.
    ///
    /// The output is deterministic for a given input and never contains an
    /// empty collection.
    fn split(
        &self,
        collection: GeometryCollection<G>,
        max_size: usize,
    ) -> Result<Vec<GeometryCollection<G>>>;
}

/// Median-split kd-tree over centroid x/y coordinates.
///
/// ```rust
/// use tilegroup::compute::kd_tree::{KdTreeSplitter, SpatialSplitter};
/// use tilegroup::{GeometryCollection, Point3d};
///
/// let points: GeometryCollection<Point3d> =
///     (0..10).map(|i| Point3d::new(i as f64, 0.0, 0.0)).collect();
/// let pieces = KdTreeSplitter.split(points, 4).unwrap();
/// assert!(pieces.iter().all(|p| p.len() <= 4));
/// assert_eq!(pieces.iter().map(|p| p.len()).sum::<usize>(), 10);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct KdTreeSplitter;

impl KdTreeSplitter {
    const AXES: usize = 2;

    fn split_recursive<G: Geometry>(
        items: Vec<G>,
        max_size: usize,
        depth: usize,
        out: &mut Vec<GeometryCollection<G>>,
    ) {
        if items.is_empty() {
            return;
        }
        if items.len() <= max_size {
            out.push(GeometryCollection::new(items));
            return;
        }

        let axis = depth % Self::AXES;
        let mut keyed: Vec<(f64, G)> = items
            .into_iter()
            .map(|g| (g.centroid().coords()[axis], g))
            .collect();
        // Stable: equal coordinates keep their input order
        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

        let median = keyed.len() / 2;
        let right: Vec<G> = keyed.split_off(median).into_iter().map(|(_, g)| g).collect();
        let left: Vec<G> = keyed.into_iter().map(|(_, g)| g).collect();

        Self::split_recursive(left, max_size, depth + 1, out);
        Self::split_recursive(right, max_size, depth + 1, out);
    }
}

impl<G: Geometry> SpatialSplitter<G> for KdTreeSplitter {
    fn split(
        &self,
        collection: GeometryCollection<G>,
        max_size: usize,
    ) -> Result<Vec<GeometryCollection<G>>> {
        validate_max_group_size(max_size)?;

        let mut out = Vec::new();
        Self::split_recursive(collection.into_vec(), max_size, 0, &mut out);
        log::debug!("kd-tree split produced {} collections", out.len());
        Ok(out)
    }
}
