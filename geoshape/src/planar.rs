//! Polygons projected into the Mercator plane for point-in-polygon tests.

use crate::path::bounds::PathBounds;
use crate::segment::Segment;
use crate::{Coordinate, MercatorPoint, Rectangle, WebMercator};

/// Moves points west of `left_bound` by one full turn, so that a ring crossing the antimeridian becomes continuous.
pub(crate) fn unwrap_x(mut point: MercatorPoint, left_bound: f64) -> MercatorPoint {
    if point.x < left_bound {
        point.x += 1.0;
    }
    point
}

/// Closed ring of a polygon in the Mercator plane.
#[derive(Debug, Clone)]
pub(crate) struct PlanarRing {
    /// Mercator `x` of the west edge of the ring's bounding box.
    left_bound: f64,
    points: Vec<MercatorPoint>,
}

impl PlanarRing {
    /// Projects the ring whose bounding box is `bounds`.
    pub fn new(vertices: &[Coordinate], bounds: &Rectangle) -> Self {
        let left_bound = WebMercator::to_mercator(&bounds.top_left()).x;
        let points = vertices
            .iter()
            .map(|v| unwrap_x(WebMercator::to_mercator(v), left_bound))
            .collect();

        Self { left_bound, points }
    }

    /// Returns true if the coordinate lies inside the ring or on its boundary.
    ///
    /// Uses the nonzero winding rule, so self-intersecting rings contain the areas they wind around.
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        let point = unwrap_x(WebMercator::to_mercator(coordinate), self.left_bound);
        let next = self.points.iter().cycle().skip(1);

        let mut winding = 0i64;
        for (a, b) in self.points.iter().zip(next) {
            let edge = Segment(a, b);
            if edge.contains(&point) {
                return true;
            }

            if a.y <= point.y {
                if b.y > point.y && edge.side(&point) > 0.0 {
                    winding += 1;
                }
            } else if b.y <= point.y && edge.side(&point) < 0.0 {
                winding -= 1;
            }
        }

        winding != 0
    }
}

/// Perimeter and holes of a polygon in the Mercator plane.
#[derive(Debug, Clone)]
pub(crate) struct PlanarPolygon {
    perimeter: PlanarRing,
    holes: Vec<PlanarRing>,
}

impl PlanarPolygon {
    pub fn new(perimeter: &[Coordinate], bounds: &Rectangle, holes: &[Vec<Coordinate>]) -> Self {
        Self {
            perimeter: PlanarRing::new(perimeter, bounds),
            holes: holes
                .iter()
                .filter(|hole| hole.len() > 2)
                .map(|hole| PlanarRing::new(hole, &PathBounds::compute(hole).rectangle()))
                .collect(),
        }
    }

    /// Returns true if the coordinate is inside the perimeter and outside all the holes. Hole boundaries belong to
    /// the holes.
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        self.perimeter.contains(coordinate) && !self.holes.iter().any(|h| h.contains(coordinate))
    }
}
