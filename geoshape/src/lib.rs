//! Geoshape provides geographic shapes on the surface of the Earth: [`Rectangle`], [`Circle`], [`Path`] and
//! [`Polygon`], built from WGS84 [`Coordinate`]s.
//!
//! All the shapes implement the [`GeoShape`] trait, which answers the same set of questions for any shape: is it
//! valid, is it empty, where is its center, does it contain a coordinate, and what is its bounding rectangle.
//! [`Shape`] wraps any of them into a single value that can be stored, compared, hashed and encoded.
//!
//! ```
//! use geoshape::{Coordinate, GeoShape, Polygon, Shape};
//!
//! let pacific = Polygon::new(vec![
//!     Coordinate::new(-5.0, 170.0),
//!     Coordinate::new(-5.0, -170.0),
//!     Coordinate::new(5.0, -170.0),
//!     Coordinate::new(5.0, 170.0),
//! ]);
//!
//! assert!(pacific.contains(&Coordinate::new(0.0, 180.0)));
//! assert_eq!(pacific.bounding_rectangle().width(), 20.0);
//!
//! let shape = Shape::from(pacific);
//! let bytes = shape.to_bytes().unwrap();
//! assert_eq!(Shape::decode(&mut bytes.clone()).unwrap(), shape);
//! ```
//!
//! # Antimeridian and poles
//!
//! Longitudes are always kept in `-180..=180`. Rectangles whose left edge is east of their right edge cross the
//! antimeridian, and bounding boxes of paths and polygons are computed taking the short way between consecutive
//! vertices, so shapes spanning the date line get narrow boxes instead of ones covering the rest of the globe.
//! Translations never move a shape over a pole: the latitude offset is limited instead.
//!
//! # Planar approximations
//!
//! Edges of paths and polygons are straight lines in the [`WebMercator`] projection. Containment tests for these
//! shapes are done in that plane, while distances are always measured along great circles.
//!
//! # Features
//!
//! * `geo-types` (default): conversions to and from the [`geo_types`](https://docs.rs/geo-types) crate.

mod circle;
pub mod codec;
mod coordinate;
mod error;
mod hash;
mod path;
mod planar;
mod polygon;
mod projection;
mod rectangle;
mod segment;
mod shape;

#[cfg(feature = "geo-types")]
mod geo_types;

pub use circle::Circle;
pub use coordinate::{
    is_valid_latitude, is_valid_longitude, wrap_longitude, Coordinate, CoordinateFormat, CoordinateType,
    EARTH_MEAN_RADIUS,
};
pub use error::GeoShapeError;
pub use hash::{seeded_hash, SeededHasher};
pub use path::{CacheState, Path, UpdatePolicy};
pub use polygon::Polygon;
pub use projection::{MercatorPoint, WebMercator};
pub use rectangle::Rectangle;
pub use shape::{GeoShape, Shape, ShapeType};
