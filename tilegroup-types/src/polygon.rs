use crate::point::Point3d;
use geo::{BoundingRect, Contains, Coord, LineString, Polygon, Rect};
use serde::{Deserialize, Serialize};

/// An open exterior ring together with its planar polygon.
///
/// `points` keeps the ring exactly as it was read (including z values) but
/// without the repeated closing point; `polygon` is the 2D projection used for
/// point-in-polygon tests. Interior rings are never represented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonRing {
    points: Vec<Point3d>,
    polygon: Polygon<f64>,
}

impl PolygonRing {
    /// Build a ring from its vertices.
    ///
    /// A trailing point equal to the first one is treated as the explicit
    /// closing point and dropped. Returns `None` when fewer than three
    /// distinct 2D vertices remain. Repeated vertices are otherwise kept.
    ///
    /// ```
    /// use tilegroup_types::point::Point3d;
    /// use tilegroup_types::polygon::PolygonRing;
    ///
    /// let closed = PolygonRing::new(vec![
    ///     Point3d::new(0.0, 0.0, 0.0),
    ///     Point3d::new(1.0, 0.0, 0.0),
    ///     Point3d::new(1.0, 1.0, 0.0),
    ///     Point3d::new(0.0, 0.0, 0.0),
    /// ])
    /// .unwrap();
    /// assert_eq!(closed.points().len(), 3);
    /// ```
    pub fn new(mut points: Vec<Point3d>) -> Option<Self> {
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        if distinct_vertices(&points) < 3 {
            return None;
        }

        let exterior: Vec<Coord<f64>> = points
            .iter()
            .map(|p| Coord { x: p.x(), y: p.y() })
            .collect();
        // geo closes the LineString itself
        let polygon = Polygon::new(LineString::from(exterior), Vec::new());

        Some(Self { points, polygon })
    }

    /// The ring vertices without the closing point.
    pub fn points(&self) -> &[Point3d] {
        &self.points
    }

    /// The planar polygon used for containment.
    pub fn polygon(&self) -> &Polygon<f64> {
        &self.polygon
    }

    /// Bounding rectangle of the planar polygon.
    pub fn bounding_rect(&self) -> Option<Rect<f64>> {
        self.polygon.bounding_rect()
    }

    /// Whether the point's 2D projection lies strictly inside the ring.
    ///
    /// Points on the boundary are not contained.
    pub fn contains_2d(&self, point: &Point3d) -> bool {
        self.polygon.contains(&point.to_2d())
    }
}

/// Number of distinct x/y positions in a ring.
fn distinct_vertices(points: &[Point3d]) -> usize {
    // + 0.0 folds -0.0 into 0.0
    let mut xy: Vec<[f64; 2]> = points.iter().map(|p| [p.x() + 0.0, p.y() + 0.0]).collect();
    xy.sort_by(|a, b| a[0].total_cmp(&b[0]).then(a[1].total_cmp(&b[1])));
    xy.dedup();
    xy.len()
}
