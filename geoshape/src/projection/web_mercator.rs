use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use nalgebra::Point2;

use crate::Coordinate;

/// Point in the normalized Web-Mercator plane.
///
/// `x` goes from `0` at -180° to `1` at 180°, `y` from `0` at the north edge of the usual square map to `1` at its
/// south edge.
pub type MercatorPoint = Point2<f64>;

/// Normalized spherical Web-Mercator projection.
///
/// All the functions are pure, so the type carries no state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WebMercator;

impl WebMercator {
    /// Smallest `y` value produced by [`WebMercator::to_mercator`]. Corresponds to the north pole.
    pub const Y_MIN: f64 = -4.0;
    /// Largest `y` value produced by [`WebMercator::to_mercator`]. Corresponds to the south pole.
    pub const Y_MAX: f64 = 5.0;

    /// Projects the coordinate into the Mercator plane.
    ///
    /// The `y` value is clamped to `Y_MIN..=Y_MAX` so that the poles (which are infinitely far away in Mercator
    /// space) stay finite.
    pub fn to_mercator(coord: &Coordinate) -> MercatorPoint {
        let x = coord.longitude() / 360.0 + 0.5;
        let y = 0.5 - (FRAC_PI_4 + coord.latitude() * PI / 360.0).tan().ln() / (2.0 * PI);

        Point2::new(x, y.clamp(Self::Y_MIN, Self::Y_MAX))
    }

    /// Converts a point of the Mercator plane back to geographic coordinates.
    ///
    /// `x` wraps around, so any value maps to a valid longitude. `y` values beyond the clamping range map to the
    /// poles.
    pub fn from_mercator(point: &MercatorPoint) -> Coordinate {
        let lat = if point.y < Self::Y_MIN {
            90.0
        } else if point.y > Self::Y_MAX {
            -90.0
        } else if point.y == 0.5 {
            0.0
        } else {
            (2.0 * (PI * (1.0 - 2.0 * point.y)).exp().atan() - FRAC_PI_2).to_degrees()
        };

        let lon = point.x.rem_euclid(1.0) * 360.0 - 180.0;

        Coordinate::new(lat.clamp(-90.0, 90.0), lon)
    }

    /// Point at the fraction `progress` of the way from `from` to `to`.
    ///
    /// Interpolation is linear in Mercator space taking the shorter way around the antimeridian. Altitude is
    /// interpolated linearly in meters and stays unset if either end has no altitude.
    pub fn interpolate(from: &Coordinate, to: &Coordinate, progress: f64) -> Coordinate {
        let start = Self::to_mercator(from);
        let end = Self::to_mercator(to);

        let x = if (end.x - start.x).abs() > 0.5 {
            let (mut sx, mut ex) = (start.x, end.x);
            if ex < sx {
                sx -= 1.0;
            } else {
                ex -= 1.0;
            }
            (1.0 - progress) * sx + progress * ex
        } else {
            (1.0 - progress) * start.x + progress * end.x
        };
        let y = (1.0 - progress) * start.y + progress * end.y;

        let mut result = Self::from_mercator(&Point2::new(x, y));
        result.set_altitude((1.0 - progress) * from.altitude() + progress * to.altitude());
        result
    }
}
