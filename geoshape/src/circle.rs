//! Circle on the surface of the Earth (see [`Circle`]).

use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::coordinate::wrap_longitude;
use crate::hash::{f64_eq, hash_f64};
use crate::shape::fmt_coordinate;
use crate::{Coordinate, GeoShape, Rectangle, ShapeType, EARTH_MEAN_RADIUS};

const RADIUS_EPSILON: f64 = 1e-7;

/// Set of points within a great-circle distance from the center.
///
/// The radius is given in meters. A circle with a valid center and a radius of `0` is valid but empty. The default
/// circle has an invalid center and the radius `-1`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Circle {
    center: Coordinate,
    #[serde(with = "nan_as_null")]
    radius: f64,
}

impl Circle {
    /// Creates a new circle.
    pub fn new(center: Coordinate, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Radius in meters.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Sets the radius in meters.
    pub fn set_radius(&mut self, radius: f64) {
        self.radius = radius;
    }

    /// Sets the center.
    pub fn set_center(&mut self, center: Coordinate) {
        self.center = center;
    }

    /// Moves the center by the given number of degrees.
    ///
    /// If the new center passes over a pole, its latitude is reflected back into range and the longitude moves to
    /// the opposite meridian.
    pub fn translate(&mut self, d_lat: f64, d_lon: f64) {
        if !self.center.is_valid() {
            return;
        }

        let mut lat = self.center.latitude() + d_lat;
        let mut lon = wrap_longitude(self.center.longitude() + d_lon);

        if lat > 90.0 || lat < -90.0 {
            lat = if lat > 90.0 { 180.0 - lat } else { -180.0 - lat };
            lon = if lon < 0.0 { lon + 180.0 } else { lon - 180.0 };
        }

        self.center = Coordinate::new_3d(lat, lon, self.center.altitude());
    }

    /// Returns a copy of the circle moved by the given number of degrees. See [`Circle::translate`].
    pub fn translated(&self, d_lat: f64, d_lon: f64) -> Self {
        let mut result = *self;
        result.translate(d_lat, d_lon);
        result
    }

    /// Increases the radius so that the circle contains `coordinate`.
    pub fn extend(&mut self, coordinate: &Coordinate) {
        if !self.is_valid() || !coordinate.is_valid() || self.contains(coordinate) {
            return;
        }

        self.radius = self.center.distance_to(coordinate);
    }

    fn crosses_north_pole(&self) -> bool {
        let pole = Coordinate::new(90.0, self.center.longitude());
        self.center.distance_to(&pole) < self.radius
    }

    fn crosses_south_pole(&self) -> bool {
        let pole = Coordinate::new(-90.0, self.center.longitude());
        self.center.distance_to(&pole) < self.radius
    }
}

impl Default for Circle {
    fn default() -> Self {
        Self::new(Coordinate::INVALID, -1.0)
    }
}

impl GeoShape for Circle {
    fn shape_type(&self) -> ShapeType {
        ShapeType::Circle
    }

    fn is_valid(&self) -> bool {
        self.center.is_valid() && !self.radius.is_nan() && self.radius >= -RADIUS_EPSILON
    }

    fn is_empty(&self) -> bool {
        !self.is_valid() || self.radius <= RADIUS_EPSILON
    }

    fn center(&self) -> Coordinate {
        self.center
    }

    fn contains(&self, coordinate: &Coordinate) -> bool {
        self.is_valid() && coordinate.is_valid() && self.center.distance_to(coordinate) <= self.radius
    }

    fn bounding_rectangle(&self) -> Rectangle {
        if !self.is_valid() {
            return Rectangle::default();
        }
        if self.radius <= 0.0 {
            return Rectangle::new(self.center, self.center);
        }

        match (self.crosses_north_pole(), self.crosses_south_pole()) {
            (true, true) => Rectangle::full_width(90.0, -90.0),
            (true, false) => {
                let south = self.center.at_distance_and_azimuth(self.radius, 180.0, 0.0);
                Rectangle::full_width(90.0, south.latitude())
            }
            (false, true) => {
                let north = self.center.at_distance_and_azimuth(self.radius, 0.0, 0.0);
                Rectangle::full_width(north.latitude(), -90.0)
            }
            (false, false) => {
                let north = self.center.at_distance_and_azimuth(self.radius, 0.0, 0.0);
                let south = self.center.at_distance_and_azimuth(self.radius, 180.0, 0.0);

                // azimuth of the point with the largest longitude
                let angular_radius = self.radius / EARTH_MEAN_RADIUS;
                let lat = self.center.latitude().to_radians();
                let tangent = (angular_radius.tan() * lat.tan())
                    .clamp(-1.0, 1.0)
                    .acos()
                    .to_degrees();

                let east = self.center.at_distance_and_azimuth(self.radius, tangent, 0.0);
                let west = self
                    .center
                    .at_distance_and_azimuth(self.radius, 360.0 - tangent, 0.0);

                Rectangle::new(
                    Coordinate::new(north.latitude(), west.longitude()),
                    Coordinate::new(south.latitude(), east.longitude()),
                )
            }
        }
    }
}

impl PartialEq for Circle {
    fn eq(&self, other: &Self) -> bool {
        self.center == other.center && f64_eq(self.radius, other.radius)
    }
}

impl Eq for Circle {}

impl Hash for Circle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.center.hash(state);
        hash_f64(self.radius, state);
    }
}

impl Display for Circle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Circle(")?;
        fmt_coordinate(&self.center, f)?;
        write!(f, ", {})", self.radius)
    }
}

mod nan_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::seeded_hash;
    use approx::assert_abs_diff_eq;

    fn one_degree() -> f64 {
        EARTH_MEAN_RADIUS * 1f64.to_radians()
    }

    #[test]
    fn validity() {
        let circle = Circle::default();
        assert!(!circle.is_valid());
        assert!(circle.is_empty());

        let point = Circle::new(Coordinate::new(0.0, 0.0), 0.0);
        assert!(point.is_valid());
        assert!(point.is_empty());

        assert!(!Circle::new(Coordinate::new(0.0, 0.0), -1.0).is_valid());
        assert!(!Circle::new(Coordinate::new(0.0, 0.0), f64::NAN).is_valid());
        assert!(!Circle::new(Coordinate::INVALID, 10.0).is_valid());
        assert!(!Circle::new(Coordinate::new(0.0, 0.0), 10.0).is_empty());
    }

    #[test]
    fn contains() {
        let circle = Circle::new(Coordinate::new(0.0, 0.0), one_degree());
        assert!(circle.contains(&Coordinate::new(0.0, 0.9)));
        assert!(circle.contains(&Coordinate::new(-0.5, 0.5)));
        assert!(!circle.contains(&Coordinate::new(0.0, 1.1)));
        assert!(!circle.contains(&Coordinate::INVALID));
        assert!(!Circle::default().contains(&Coordinate::new(0.0, 0.0)));
    }

    #[test]
    fn bounding_rectangle_at_equator() {
        let circle = Circle::new(Coordinate::new(0.0, 0.0), one_degree());
        let bbox = circle.bounding_rectangle();

        assert_abs_diff_eq!(bbox.top_left().latitude(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bbox.top_left().longitude(), -1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bbox.bottom_right().latitude(), -1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bbox.bottom_right().longitude(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn bounding_rectangle_at_mid_latitude() {
        let center = Coordinate::new(45.0, 10.0);
        let circle = Circle::new(center, one_degree());
        let bbox = circle.bounding_rectangle();

        let expected_half_width = (1f64.to_radians().sin() / 45f64.to_radians().cos())
            .asin()
            .to_degrees();
        assert_abs_diff_eq!(bbox.width(), 2.0 * expected_half_width, epsilon = 1e-9);
        assert_abs_diff_eq!(bbox.center().longitude(), 10.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bbox.top_left().latitude(), 46.0, epsilon = 1e-9);
        assert_abs_diff_eq!(bbox.bottom_right().latitude(), 44.0, epsilon = 1e-9);

        // every point of the circle is inside
        for azimuth in (0..360).step_by(5) {
            let point = center.at_distance_and_azimuth(one_degree() * 0.999, azimuth as f64, 0.0);
            assert!(bbox.contains(&point), "{azimuth}");
        }
    }

    #[test]
    fn bounding_rectangle_across_antimeridian() {
        let circle = Circle::new(Coordinate::new(0.0, 179.5), one_degree());
        let bbox = circle.bounding_rectangle();

        assert_abs_diff_eq!(bbox.top_left().longitude(), 178.5, epsilon = 1e-9);
        assert_abs_diff_eq!(bbox.bottom_right().longitude(), -179.5, epsilon = 1e-9);
        assert_abs_diff_eq!(bbox.width(), 2.0, epsilon = 1e-9);
        assert!(bbox.contains(&Coordinate::new(0.0, 180.0)));
    }

    #[test]
    fn bounding_rectangle_over_pole() {
        let north = Circle::new(Coordinate::new(89.0, 0.0), 2.0 * one_degree());
        let bbox = north.bounding_rectangle();
        assert_eq!(bbox.top_left(), Coordinate::new(90.0, -180.0));
        assert_eq!(bbox.width(), 360.0);
        assert_abs_diff_eq!(bbox.bottom_right().latitude(), 87.0, epsilon = 1e-9);

        let south = Circle::new(Coordinate::new(-89.0, 0.0), 2.0 * one_degree());
        let bbox = south.bounding_rectangle();
        assert_eq!(bbox.bottom_right().latitude(), -90.0);
        assert_eq!(bbox.width(), 360.0);
        assert_abs_diff_eq!(bbox.top_left().latitude(), -87.0, epsilon = 1e-9);

        let globe = Circle::new(Coordinate::new(0.0, 0.0), 20_000_000.0);
        assert_eq!(
            globe.bounding_rectangle(),
            Rectangle::new(Coordinate::new(90.0, -180.0), Coordinate::new(-90.0, 180.0))
        );
    }

    #[test]
    fn bounding_rectangle_of_point() {
        let center = Coordinate::new(12.0, 34.0);
        let circle = Circle::new(center, 0.0);
        assert_eq!(circle.bounding_rectangle(), Rectangle::new(center, center));
        assert!(!Circle::default().bounding_rectangle().is_valid());
    }

    #[test]
    fn translate() {
        let circle = Circle::new(Coordinate::new(10.0, 175.0), 100.0);
        assert_eq!(
            circle.translated(5.0, 10.0).center(),
            Coordinate::new(15.0, -175.0)
        );

        let over_north = Circle::new(Coordinate::new(80.0, 10.0), 100.0).translated(20.0, 0.0);
        assert_eq!(over_north.center(), Coordinate::new(80.0, -170.0));

        let over_south = Circle::new(Coordinate::new(-80.0, -10.0), 100.0).translated(-20.0, 0.0);
        assert_eq!(over_south.center(), Coordinate::new(-80.0, 170.0));
        assert_eq!(over_south.radius(), 100.0);
    }

    #[test]
    fn extend() {
        let mut circle = Circle::new(Coordinate::new(0.0, 0.0), 1000.0);
        circle.extend(&Coordinate::new(0.0, 0.001));
        assert_eq!(circle.radius(), 1000.0);

        let far = Coordinate::new(0.0, 1.0);
        circle.extend(&far);
        assert_abs_diff_eq!(circle.radius(), one_degree(), epsilon = 1e-6);
        assert!(circle.contains(&far));
    }

    #[test]
    fn equality_and_hash() {
        let a = Circle::new(Coordinate::new(1.0, 2.0), 5.0);
        let b = Circle::new(Coordinate::new(1.0, 2.0), 5.0);
        assert_eq!(a, b);
        assert_eq!(seeded_hash(&a, 0), seeded_hash(&b, 0));
        assert_ne!(a, Circle::new(Coordinate::new(1.0, 2.0), 6.0));

        let nan = Circle::new(Coordinate::new(1.0, 2.0), f64::NAN);
        assert_eq!(nan, nan);
    }

    #[test]
    fn display() {
        let circle = Circle::new(Coordinate::new(-27.5, 153.0), 1000.0);
        assert_eq!(circle.to_string(), "Circle({-27.5, 153}, 1000)");
    }

    #[test]
    fn serde_unset_radius() {
        let mut circle = Circle::new(Coordinate::new(1.0, 2.0), 5.0);
        circle.set_radius(f64::NAN);

        let json = serde_json::to_string(&circle).expect("serialize");
        assert!(json.contains(r#""radius":null"#), "{json}");

        let restored: Circle = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, circle);
    }
}
