//! Conversions between the crate's types and the [`geo_types`] crate.
//!
//! `geo_types` stores coordinates as `x` (longitude) and `y` (latitude). Converting values out of the valid
//! latitude/longitude range gives invalid coordinates. Polygon rings in `geo_types` are explicitly closed, so the
//! closing vertex is dropped on the way in and added on the way out.

use geo_types::{coord, Coord, LineString, Point};

use crate::{Coordinate, Path, Polygon};

impl From<Coordinate> for Coord<f64> {
    fn from(value: Coordinate) -> Self {
        coord!(x: value.longitude(), y: value.latitude())
    }
}

impl From<Coord<f64>> for Coordinate {
    fn from(value: Coord<f64>) -> Self {
        Coordinate::new(value.y, value.x)
    }
}

impl From<Coordinate> for Point<f64> {
    fn from(value: Coordinate) -> Self {
        Point(value.into())
    }
}

impl From<Point<f64>> for Coordinate {
    fn from(value: Point<f64>) -> Self {
        value.0.into()
    }
}

fn line_string(coordinates: &[Coordinate]) -> LineString<f64> {
    coordinates.iter().map(|&c| Coord::from(c)).collect()
}

fn open_ring(ring: &LineString<f64>) -> Vec<Coordinate> {
    let mut coordinates: Vec<Coordinate> = ring.coords().map(|&c| c.into()).collect();
    if ring.is_closed() && coordinates.len() > 1 {
        coordinates.pop();
    }
    coordinates
}

impl From<&Path> for LineString<f64> {
    fn from(value: &Path) -> Self {
        line_string(value.path())
    }
}

impl From<&LineString<f64>> for Path {
    fn from(value: &LineString<f64>) -> Self {
        Path::new(value.coords().map(|&c| c.into()).collect(), 0.0)
    }
}

impl From<&Polygon> for geo_types::Polygon<f64> {
    fn from(value: &Polygon) -> Self {
        geo_types::Polygon::new(
            line_string(value.perimeter()),
            value.holes().iter().map(|hole| line_string(hole)).collect(),
        )
    }
}

impl From<&geo_types::Polygon<f64>> for Polygon {
    fn from(value: &geo_types::Polygon<f64>) -> Self {
        let mut polygon = Polygon::new(open_ring(value.exterior()));
        for interior in value.interiors() {
            polygon.add_hole(open_ring(interior));
        }
        polygon
    }
}
