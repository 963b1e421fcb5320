//! # tilegroup-types
//!
//! Value types shared by the tilegroup grouping engine.
//!
//! - **Point types**: `Point3d`, a `geo::Point` with an extra z coordinate
//! - **Polygon types**: `PolygonRing`, an open exterior ring kept alongside
//!   the 2D `geo::Polygon` used for containment tests
//!
//! All types are serializable with Serde and built on top of the `geo` crate's
//! geometric primitives.
//!
//! ## Examples
//!
//! ```rust
//! use tilegroup_types::point::Point3d;
//! use tilegroup_types::polygon::PolygonRing;
//!
//! let ring = PolygonRing::new(vec![
//!     Point3d::new(0.0, 0.0, 0.0),
//!     Point3d::new(10.0, 0.0, 0.0),
//!     Point3d::new(10.0, 10.0, 0.0),
//! ])
//! .unwrap();
//! assert!(ring.contains_2d(&Point3d::new(7.0, 2.0, 50.0)));
//! ```

pub mod point;
pub mod polygon;

pub use geo;
