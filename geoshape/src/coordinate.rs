//! Geographic coordinate on the surface of the Earth (see [`Coordinate`]).

use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

use crate::hash::{f64_eq, hash_f64};

/// Mean radius of the Earth in meters, used by all spherical computations of the crate.
pub const EARTH_MEAN_RADIUS: f64 = 6_371_007.2;

/// Position on the surface of the Earth given by latitude and longitude in degrees (WGS84) and an optional
/// altitude in meters.
///
/// A coordinate is valid if its latitude is in `-90..=90` and its longitude is in `-180..=180`. Constructing a
/// coordinate with values out of these ranges gives the invalid coordinate with all fields unset (NaN).
///
/// Operations on invalid coordinates never fail, they fall back to documented values instead: distance and
/// azimuth are `0`, derived coordinates are invalid and the string representation is empty.
///
/// ```
/// use geoshape::Coordinate;
///
/// let brisbane = Coordinate::new(-27.46758, 153.027892);
/// assert!(brisbane.is_valid());
/// assert!(!Coordinate::new(91.0, 0.0).is_valid());
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(from = "CoordinateRepr", into = "CoordinateRepr")]
pub struct Coordinate {
    lat: f64,
    lon: f64,
    alt: f64,
}

/// Kind of a coordinate, see [`Coordinate::coordinate_type`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinateType {
    /// Latitude or longitude is not set or out of range.
    Invalid,
    /// Valid latitude and longitude without altitude.
    Coordinate2D,
    /// Valid latitude and longitude with altitude.
    Coordinate3D,
}

/// Output formats of [`Coordinate::to_formatted_string`].
///
/// For the coordinate `(-27.46758, 153.027892, 28.1)` the formats give:
///
/// | Format | Output |
/// |---|---|
/// | `Degrees` | `-27.46758°, 153.02789°, 28.1m` |
/// | `DegreesWithHemisphere` | `27.46758° S, 153.02789° E, 28.1m` |
/// | `DegreesMinutes` | `-27° 28.055', 153° 1.674', 28.1m` |
/// | `DegreesMinutesWithHemisphere` | `27° 28.055' S, 153° 1.674' E, 28.1m` |
/// | `DegreesMinutesSeconds` | `-27° 28' 3.3", 153° 1' 40.4", 28.1m` |
/// | `DegreesMinutesSecondsWithHemisphere` | `27° 28' 3.3" S, 153° 1' 40.4" E, 28.1m` |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CoordinateFormat {
    /// Signed decimal degrees.
    Degrees,
    /// Decimal degrees with hemisphere letter.
    DegreesWithHemisphere,
    /// Signed degrees and decimal minutes.
    DegreesMinutes,
    /// Degrees and decimal minutes with hemisphere letter.
    DegreesMinutesWithHemisphere,
    /// Signed degrees, minutes and decimal seconds.
    DegreesMinutesSeconds,
    /// Degrees, minutes and decimal seconds with hemisphere letter.
    #[default]
    DegreesMinutesSecondsWithHemisphere,
}

impl CoordinateFormat {
    fn with_hemisphere(&self) -> bool {
        matches!(
            self,
            Self::DegreesWithHemisphere
                | Self::DegreesMinutesWithHemisphere
                | Self::DegreesMinutesSecondsWithHemisphere
        )
    }
}

/// Returns true if `lat` is a valid latitude value.
pub fn is_valid_latitude(lat: f64) -> bool {
    (-90.0..=90.0).contains(&lat)
}

/// Returns true if `lon` is a valid longitude value.
pub fn is_valid_longitude(lon: f64) -> bool {
    (-180.0..=180.0).contains(&lon)
}

/// Brings any finite longitude into the `-180..=180` range.
pub fn wrap_longitude(lon: f64) -> f64 {
    if is_valid_longitude(lon) || !lon.is_finite() {
        lon
    } else {
        (lon + 180.0).rem_euclid(360.0) - 180.0
    }
}

impl Coordinate {
    /// The invalid coordinate with all the fields unset.
    pub const INVALID: Self = Self {
        lat: f64::NAN,
        lon: f64::NAN,
        alt: f64::NAN,
    };

    /// Creates a 2d coordinate. Returns [`Coordinate::INVALID`] if the values are out of range.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self::new_3d(lat, lon, f64::NAN)
    }

    /// Creates a coordinate with altitude. Returns [`Coordinate::INVALID`] if latitude or longitude is out of
    /// range.
    pub fn new_3d(lat: f64, lon: f64, alt: f64) -> Self {
        if is_valid_latitude(lat) && is_valid_longitude(lon) {
            Self { lat, lon, alt }
        } else {
            Self::INVALID
        }
    }

    /// Creates a coordinate from the given values without any checks.
    pub(crate) const fn from_raw(lat: f64, lon: f64, alt: f64) -> Self {
        Self { lat, lon, alt }
    }

    /// Latitude in degrees. NaN if not set.
    pub fn latitude(&self) -> f64 {
        self.lat
    }

    /// Longitude in degrees. NaN if not set.
    pub fn longitude(&self) -> f64 {
        self.lon
    }

    /// Altitude in meters above sea level. NaN if not set.
    pub fn altitude(&self) -> f64 {
        self.alt
    }

    /// Sets the latitude. The value is stored as is, so the coordinate becomes invalid if it is out of range.
    pub fn set_latitude(&mut self, lat: f64) {
        self.lat = lat;
    }

    /// Sets the longitude. The value is stored as is, so the coordinate becomes invalid if it is out of range.
    pub fn set_longitude(&mut self, lon: f64) {
        self.lon = lon;
    }

    /// Sets the altitude. NaN unsets it.
    pub fn set_altitude(&mut self, alt: f64) {
        self.alt = alt;
    }

    /// Type of the coordinate.
    pub fn coordinate_type(&self) -> CoordinateType {
        if !is_valid_latitude(self.lat) || !is_valid_longitude(self.lon) {
            CoordinateType::Invalid
        } else if self.alt.is_nan() {
            CoordinateType::Coordinate2D
        } else {
            CoordinateType::Coordinate3D
        }
    }

    /// Returns true if latitude and longitude are set and in range.
    pub fn is_valid(&self) -> bool {
        self.coordinate_type() != CoordinateType::Invalid
    }

    /// Returns true if the latitude is exactly at one of the poles.
    pub(crate) fn is_pole(&self) -> bool {
        self.lat == 90.0 || self.lat == -90.0
    }

    /// Great-circle distance in meters to `other`, ignoring altitude.
    ///
    /// Uses the haversine formula on a sphere of [`EARTH_MEAN_RADIUS`]. Returns `0` if either coordinate is
    /// invalid.
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        if !self.is_valid() || !other.is_valid() {
            return 0.0;
        }

        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();
        let haversine_lat = (d_lat / 2.0).sin().powi(2);
        let haversine_lon = (d_lon / 2.0).sin().powi(2);
        let y = haversine_lat
            + self.lat.to_radians().cos() * other.lat.to_radians().cos() * haversine_lon;

        // y can leave [0, 1] by rounding for antipodal points
        2.0 * y.clamp(0.0, 1.0).sqrt().asin() * EARTH_MEAN_RADIUS
    }

    /// Initial bearing in degrees (`0..360`, clockwise from true north) of the great circle from this coordinate
    /// to `other`. Returns `0` if either coordinate is invalid.
    pub fn azimuth_to(&self, other: &Coordinate) -> f64 {
        if !self.is_valid() || !other.is_valid() {
            return 0.0;
        }

        let d_lon = (other.lon - self.lon).to_radians();
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let y = d_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();

        let azimuth = y.atan2(x).to_degrees().rem_euclid(360.0);
        if azimuth >= 360.0 {
            0.0
        } else {
            azimuth
        }
    }

    /// Coordinate reached by travelling `distance` meters along the great circle starting at `azimuth` degrees.
    ///
    /// The altitude of the result is this coordinate's altitude plus `distance_up`. The longitude is wrapped into
    /// the valid range. Returns an invalid coordinate if this one is invalid.
    pub fn at_distance_and_azimuth(&self, distance: f64, azimuth: f64, distance_up: f64) -> Self {
        if !self.is_valid() {
            return Self::INVALID;
        }

        let (lat, lon) = self.direct(distance, azimuth);
        Self::new_3d(lat, wrap_longitude(lon), self.alt + distance_up)
    }

    /// Solution of the direct geodesic problem on the sphere. The returned longitude is not wrapped.
    fn direct(&self, distance: f64, azimuth: f64) -> (f64, f64) {
        let lat = self.lat.to_radians();
        let lon = self.lon.to_radians();
        let azimuth = azimuth.to_radians();
        let ratio = distance / EARTH_MEAN_RADIUS;

        let result_lat =
            (lat.sin() * ratio.cos() + lat.cos() * ratio.sin() * azimuth.cos()).asin();
        let result_lon = lon
            + (azimuth.sin() * ratio.sin() * lat.cos())
                .atan2(ratio.cos() - lat.sin() * result_lat.sin());

        (
            result_lat.to_degrees().clamp(-90.0, 90.0),
            result_lon.to_degrees(),
        )
    }

    /// String representation in the given `format`. Empty string for an invalid coordinate.
    pub fn to_formatted_string(&self, format: CoordinateFormat) -> String {
        if !self.is_valid() {
            return String::new();
        }

        let mut lat = format_angle(self.lat.abs(), format);
        let mut lon = format_angle(self.lon.abs(), format);

        if format.with_hemisphere() {
            if self.lat < 0.0 {
                lat.push_str(" S");
            } else if self.lat > 0.0 {
                lat.push_str(" N");
            }
            if self.lon < 0.0 {
                lon.push_str(" W");
            } else if self.lon > 0.0 {
                lon.push_str(" E");
            }
        } else {
            if self.lat < 0.0 {
                lat.insert(0, '-');
            }
            if self.lon < 0.0 {
                lon.insert(0, '-');
            }
        }

        if self.alt.is_nan() {
            format!("{lat}, {lon}")
        } else {
            format!("{lat}, {lon}, {}m", self.alt)
        }
    }
}

fn format_angle(value: f64, format: CoordinateFormat) -> String {
    match format {
        CoordinateFormat::Degrees | CoordinateFormat::DegreesWithHemisphere => {
            format!("{value:.5}°")
        }
        CoordinateFormat::DegreesMinutes | CoordinateFormat::DegreesMinutesWithHemisphere => {
            let mut degrees = value.trunc();
            let mut minutes = (value - degrees) * 60.0;

            // Would be printed as 60.000
            if minutes > 59.9995 {
                degrees += 1.0;
                minutes = 0.0;
            }

            format!("{degrees}° {minutes:.3}'")
        }
        CoordinateFormat::DegreesMinutesSeconds
        | CoordinateFormat::DegreesMinutesSecondsWithHemisphere => {
            let mut degrees = value.trunc();
            let mut minutes = (value - degrees) * 60.0;
            let mut seconds = (minutes - minutes.trunc()) * 60.0;

            // Would be printed as 60.0
            if seconds >= 59.95 {
                minutes += 1.0;
                seconds = 0.0;
                if minutes.round() >= 60.0 {
                    degrees += 1.0;
                    minutes = 0.0;
                }
            }

            format!("{degrees}° {}' {seconds:.1}\"", minutes.trunc())
        }
    }
}

impl Default for Coordinate {
    fn default() -> Self {
        Self::INVALID
    }
}

impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        let lat_eq = f64_eq(self.lat, other.lat);
        let lon_eq = f64_eq(self.lon, other.lon) || (!self.lat.is_nan() && self.is_pole());
        let alt_eq = f64_eq(self.alt, other.alt);

        lat_eq && lon_eq && alt_eq
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // All longitudes at a pole are the same point
        if !self.is_pole() {
            hash_f64(self.lon, state);
        }
        hash_f64(self.lat, state);
        hash_f64(self.alt, state);
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_formatted_string(CoordinateFormat::default()))
    }
}

impl AbsDiffEq for Coordinate {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        let close = |a: f64, b: f64| (a.is_nan() && b.is_nan()) || a.abs_diff_eq(&b, epsilon);
        close(self.lat, other.lat)
            && (close(self.lon, other.lon) || (self.is_pole() && other.is_pole()))
            && close(self.alt, other.alt)
    }
}

impl RelativeEq for Coordinate {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        let close = |a: f64, b: f64| {
            (a.is_nan() && b.is_nan()) || a.relative_eq(&b, epsilon, max_relative)
        };
        close(self.lat, other.lat)
            && (close(self.lon, other.lon) || (self.is_pole() && other.is_pole()))
            && close(self.alt, other.alt)
    }
}

/// Serialized form of a coordinate: unset values are written as `null`.
#[derive(Serialize, Deserialize)]
struct CoordinateRepr {
    latitude: Option<f64>,
    longitude: Option<f64>,
    #[serde(default)]
    altitude: Option<f64>,
}

impl From<CoordinateRepr> for Coordinate {
    fn from(value: CoordinateRepr) -> Self {
        Self::from_raw(
            value.latitude.unwrap_or(f64::NAN),
            value.longitude.unwrap_or(f64::NAN),
            value.altitude.unwrap_or(f64::NAN),
        )
    }
}

impl From<Coordinate> for CoordinateRepr {
    fn from(value: Coordinate) -> Self {
        let set = |v: f64| if v.is_nan() { None } else { Some(v) };
        Self {
            latitude: set(value.lat),
            longitude: set(value.lon),
            altitude: set(value.alt),
        }
    }
}
