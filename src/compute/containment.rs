//! First-match point-in-polygon classification.
//!
//! Polygons are indexed by their bounding rectangles in an R-tree. A lookup
//! retrieves the rectangles that cover the query point, then runs the exact
//! `geo::Contains` test on those candidates only. When several polygons
//! contain the point, the one that came first in catalog order wins; overlaps
//! are otherwise not resolved.

use rstar::{AABB, RTree, RTreeObject};
use tilegroup_types::point::Point3d;
use tilegroup_types::polygon::PolygonRing;

/// Bounding rectangle of one catalog polygon.
#[derive(Debug, Clone, PartialEq)]
struct IndexedRing {
    index: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedRing {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// Spatial index over an ordered list of polygons.
pub struct PolygonIndex<'a> {
    rings: &'a [PolygonRing],
    tree: RTree<IndexedRing>,
}

impl<'a> PolygonIndex<'a> {
    /// Index `rings`, keeping their order as the tie-break order.
    pub fn new(rings: &'a [PolygonRing]) -> Self {
        let entries: Vec<IndexedRing> = rings
            .iter()
            .enumerate()
            .filter_map(|(index, ring)| {
                let rect = ring.bounding_rect()?;
                Some(IndexedRing {
                    index,
                    envelope: AABB::from_corners(
                        [rect.min().x, rect.min().y],
                        [rect.max().x, rect.max().y],
                    ),
                })
            })
            .collect();

        Self {
            rings,
            tree: RTree::bulk_load(entries),
        }
    }

    pub fn len(&self) -> usize {
        self.rings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// Index of the first polygon whose interior contains `point`.
    ///
    /// ```rust
    /// use tilegroup::compute::containment::PolygonIndex;
    /// use tilegroup::{Point3d, PolygonRing};
    ///
    /// let square = |lo: f64, hi: f64| {
    ///     PolygonRing::new(vec![
    ///         Point3d::new(lo, lo, 0.0),
    ///         Point3d::new(hi, lo, 0.0),
    ///         Point3d::new(hi, hi, 0.0),
    ///         Point3d::new(lo, hi, 0.0),
    ///     ])
    ///     .unwrap()
    /// };
    /// let rings = vec![square(0.0, 10.0), square(-20.0, 20.0)];
    /// let index = PolygonIndex::new(&rings);
    ///
    /// assert_eq!(index.locate(&Point3d::new(5.0, 5.0, 0.0)), Some(0));
    /// assert_eq!(index.locate(&Point3d::new(-5.0, -5.0, 0.0)), Some(1));
    /// assert_eq!(index.locate(&Point3d::new(50.0, 0.0, 0.0)), None);
    /// ```
    pub fn locate(&self, point: &Point3d) -> Option<usize> {
        let query = AABB::from_point([point.x(), point.y()]);
        self.tree
            .locate_in_envelope_intersecting(&query)
            .map(|entry| entry.index)
            .filter(|&index| self.rings[index].contains_2d(point))
            .min()
    }

    /// Classify every centroid; output is aligned with the input.
    #[cfg(not(feature = "parallel"))]
    pub fn classify(&self, centroids: &[Point3d]) -> Vec<Option<usize>> {
        centroids.iter().map(|c| self.locate(c)).collect()
    }

    /// Classify every centroid; output is aligned with the input.
    #[cfg(feature = "parallel")]
    pub fn classify(&self, centroids: &[Point3d]) -> Vec<Option<usize>> {
        use rayon::prelude::*;

        centroids.par_iter().map(|c| self.locate(c)).collect()
    }
}
