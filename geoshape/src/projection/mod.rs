//! Planar projections used by the containment algorithms.
//!
//! Only the normalized [`WebMercator`] projection is provided. It is used for distance-to-segment and
//! point-in-polygon computations, never for measuring distances.

mod web_mercator;

pub use web_mercator::{MercatorPoint, WebMercator};
