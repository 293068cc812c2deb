//! Straight segments in the Mercator plane.

use nalgebra::Vector2;

use crate::MercatorPoint;

/// A straight line segment between two points of the Mercator plane.
#[derive(Debug, PartialEq)]
pub(crate) struct Segment<'a>(pub &'a MercatorPoint, pub &'a MercatorPoint);

impl Segment<'_> {
    /// Point of the segment closest to `point`.
    ///
    /// The normal from `point` to the line is used if it ends within the segment and is shorter than the distance
    /// to the nearest endpoint, otherwise the nearest endpoint is returned.
    pub fn closest_point(&self, point: &MercatorPoint) -> MercatorPoint {
        let (a, b) = (self.0, self.1);
        let nearest_end = if (point - a).norm() < (point - b).norm() {
            *a
        } else {
            *b
        };

        let ds = b - a;
        let len_sq = ds.norm_squared();
        if len_sq == 0.0 {
            return nearest_end;
        }

        let u = (point - a).dot(&ds) / len_sq;
        let projection = a + ds * u;
        if u > 0.0 && u < 1.0 && (point - projection).norm() < (point - nearest_end).norm() {
            projection
        } else {
            nearest_end
        }
    }

    /// Signed area of the parallelogram built on the segment and `point`. Positive if `point` is on the left side
    /// of the segment direction (in a y-up frame).
    pub fn side(&self, point: &MercatorPoint) -> f64 {
        let ds: Vector2<f64> = self.1 - self.0;
        let dp: Vector2<f64> = point - self.0;
        ds.x * dp.y - ds.y * dp.x
    }

    /// Returns true if `point` lies exactly on the segment.
    pub fn contains(&self, point: &MercatorPoint) -> bool {
        let (a, b) = (self.0, self.1);
        self.side(point) == 0.0
            && point.x >= a.x.min(b.x)
            && point.x <= a.x.max(b.x)
            && point.y >= a.y.min(b.y)
            && point.y <= a.y.max(b.y)
    }
}
