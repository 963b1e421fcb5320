use geo::Point;
use serde::{Deserialize, Serialize};

/// A 3D point with x, y (planar or lon/lat) and a z coordinate.
///
/// Geometry centroids are carried as `Point3d` so that grid bucketing can
/// round all three axes, while polygon containment only looks at the 2D
/// projection.
///
/// # Examples
///
/// ```
/// use tilegroup_types::point::Point3d;
///
/// let centroid = Point3d::new(1840.5, 5170.25, 12.0);
/// assert_eq!(centroid.coords(), [1840.5, 5170.25, 12.0]);
/// assert_eq!(centroid.to_2d().x(), 1840.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3d {
    /// The 2D point (x/y or longitude/latitude)
    pub point: Point<f64>,
    /// The z coordinate (elevation)
    pub z: f64,
}

impl Point3d {
    /// Create a new 3D point from x, y, and z coordinates.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            point: Point::new(x, y),
            z,
        }
    }

    /// Create a 3D point from a 2D point and an elevation.
    pub fn from_point_and_z(point: Point<f64>, z: f64) -> Self {
        Self { point, z }
    }

    /// Build a point from a coordinate slice, as found in GeoJSON positions.
    ///
    /// Returns `None` when fewer than two values are present. A missing third
    /// value defaults to `0.0`; values past the third are ignored.
    ///
    /// ```
    /// use tilegroup_types::point::Point3d;
    ///
    /// assert_eq!(Point3d::from_slice(&[1.0, 2.0]), Some(Point3d::new(1.0, 2.0, 0.0)));
    /// assert_eq!(Point3d::from_slice(&[1.0]), None);
    /// ```
    pub fn from_slice(coords: &[f64]) -> Option<Self> {
        match coords {
            [x, y] => Some(Self::new(*x, *y, 0.0)),
            [x, y, z, ..] => Some(Self::new(*x, *y, *z)),
            _ => None,
        }
    }

    /// Get the x coordinate.
    pub fn x(&self) -> f64 {
        self.point.x()
    }

    /// Get the y coordinate.
    pub fn y(&self) -> f64 {
        self.point.y()
    }

    /// Get the z coordinate.
    pub fn z(&self) -> f64 {
        self.z
    }

    /// All three coordinates in axis order.
    pub fn coords(&self) -> [f64; 3] {
        [self.x(), self.y(), self.z]
    }

    /// Project this point to 2D by discarding the z coordinate.
    pub fn to_2d(&self) -> Point<f64> {
        self.point
    }

    /// True when every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.coords().iter().all(|c| c.is_finite())
    }

    /// Arithmetic mean of a set of points; `None` for an empty input.
    ///
    /// ```
    /// use tilegroup_types::point::Point3d;
    ///
    /// let mean = Point3d::mean([Point3d::new(0.0, 0.0, 0.0), Point3d::new(2.0, 4.0, 6.0)]);
    /// assert_eq!(mean, Some(Point3d::new(1.0, 2.0, 3.0)));
    /// ```
    pub fn mean<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point3d>,
    {
        let mut sum = [0.0_f64; 3];
        let mut count = 0usize;
        for p in points {
            sum[0] += p.x();
            sum[1] += p.y();
            sum[2] += p.z;
            count += 1;
        }
        if count == 0 {
            return None;
        }
        let n = count as f64;
        Some(Self::new(sum[0] / n, sum[1] / n, sum[2] / n))
    }
}

impl From<[f64; 3]> for Point3d {
    fn from(c: [f64; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl From<Point<f64>> for Point3d {
    fn from(point: Point<f64>) -> Self {
        Self::from_point_and_z(point, 0.0)
    }
}
