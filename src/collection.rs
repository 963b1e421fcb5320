//! Ordered geometry collections.
//!
//! The grouping engine never looks inside a geometry: all it needs is a
//! centroid. Anything that implements [`Geometry`] can be grouped, and
//! [`GeometryCollection`] is the ordered, owned container the engine moves
//! geometries around in.

use serde::{Deserialize, Serialize};
use tilegroup_types::point::Point3d;

/// A geometry that can be placed into a tile group.
pub trait Geometry {
    /// Geometric center of this geometry.
    fn centroid(&self) -> Point3d;
}

impl Geometry for Point3d {
    fn centroid(&self) -> Point3d {
        *self
    }
}

/// A named point geometry, the simplest thing that can be grouped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointGeometry {
    pub id: String,
    pub position: Point3d,
}

impl PointGeometry {
    pub fn new(id: impl Into<String>, position: Point3d) -> Self {
        Self {
            id: id.into(),
            position,
        }
    }
}

impl Geometry for PointGeometry {
    fn centroid(&self) -> Point3d {
        self.position
    }
}

/// Ordered collection of geometries.
///
/// Collections are recombined by concatenation and never edited in place.
///
/// ```rust
/// use tilegroup::{GeometryCollection, Point3d};
///
/// let a = GeometryCollection::new(vec![Point3d::new(0.0, 0.0, 0.0)]);
/// let b = GeometryCollection::new(vec![Point3d::new(4.0, 2.0, 0.0)]);
/// let joined = GeometryCollection::concat([a, b]);
/// assert_eq!(joined.len(), 2);
/// assert_eq!(joined.centroid(), Some(Point3d::new(2.0, 1.0, 0.0)));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryCollection<G> {
    items: Vec<G>,
}

impl<G> GeometryCollection<G> {
    pub fn new(items: Vec<G>) -> Self {
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&G> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, G> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[G] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<G> {
        self.items
    }

    /// Join collections end to end, keeping their relative order.
    pub fn concat<I>(collections: I) -> Self
    where
        I: IntoIterator<Item = GeometryCollection<G>>,
    {
        let mut items = Vec::new();
        for collection in collections {
            items.extend(collection.items);
        }
        Self { items }
    }
}

impl<G: Geometry> GeometryCollection<G> {
    /// Mean of the member centroids, `None` for an empty collection.
    pub fn centroid(&self) -> Option<Point3d> {
        Point3d::mean(self.items.iter().map(Geometry::centroid))
    }

    /// Member centroids in collection order.
    pub fn centroids(&self) -> Vec<Point3d> {
        self.items.iter().map(Geometry::centroid).collect()
    }
}

impl<G> Default for GeometryCollection<G> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<G> From<Vec<G>> for GeometryCollection<G> {
    fn from(items: Vec<G>) -> Self {
        Self::new(items)
    }
}

impl<G> FromIterator<G> for GeometryCollection<G> {
    fn from_iter<I: IntoIterator<Item = G>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<G> IntoIterator for GeometryCollection<G> {
    type Item = G;
    type IntoIter = std::vec::IntoIter<G>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, G> IntoIterator for &'a GeometryCollection<G> {
    type Item = &'a G;
    type IntoIter = std::slice::Iter<'a, G>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
