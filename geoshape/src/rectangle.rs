//! Latitude/longitude aligned rectangle (see [`Rectangle`]).

use std::fmt::{Display, Formatter};
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

use crate::coordinate::wrap_longitude;
use crate::shape::fmt_coordinate;
use crate::{Coordinate, GeoShape, ShapeType};

/// Rectangle with edges along meridians and parallels, defined by its top-left and bottom-right corners.
///
/// If the longitude of the top-left corner is greater than the one of the bottom-right corner, the rectangle
/// crosses the antimeridian. A rectangle spanning all longitudes has `-180` as its left edge and `180` as its
/// right edge.
///
/// ```
/// use geoshape::{Coordinate, GeoShape, Rectangle};
///
/// let pacific = Rectangle::new(Coordinate::new(10.0, 170.0), Coordinate::new(-10.0, -170.0));
/// assert_eq!(pacific.width(), 20.0);
/// assert!(pacific.contains(&Coordinate::new(0.0, 180.0)));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rectangle {
    top_left: Coordinate,
    bottom_right: Coordinate,
}

impl Rectangle {
    /// Creates a new rectangle from its corners.
    pub fn new(top_left: Coordinate, bottom_right: Coordinate) -> Self {
        Self {
            top_left,
            bottom_right,
        }
    }

    /// Creates a rectangle centered at `center` with the given width and height in degrees.
    pub fn from_center(center: Coordinate, width: f64, height: f64) -> Self {
        let mut rect = Self::new(center, center);
        rect.set_width(width);
        rect.set_height(height);
        rect
    }

    /// Creates the smallest rectangle containing all the `coordinates`.
    ///
    /// Returns an invalid rectangle if the list is empty.
    pub fn from_coordinates<'a>(coordinates: impl IntoIterator<Item = &'a Coordinate>) -> Self {
        let mut iter = coordinates.into_iter();
        let Some(first) = iter.next() else {
            return Self::default();
        };

        let mut rect = Self::new(*first, *first);
        for coordinate in iter {
            rect.extend(coordinate);
        }

        rect
    }

    /// Rectangle spanning all longitudes between the given latitudes.
    pub(crate) fn full_width(top: f64, bottom: f64) -> Self {
        Self::new(Coordinate::new(top, -180.0), Coordinate::new(bottom, 180.0))
    }

    /// Top-left corner.
    pub fn top_left(&self) -> Coordinate {
        self.top_left
    }

    /// Sets the top-left corner.
    pub fn set_top_left(&mut self, top_left: Coordinate) {
        self.top_left = top_left;
    }

    /// Bottom-right corner.
    pub fn bottom_right(&self) -> Coordinate {
        self.bottom_right
    }

    /// Sets the bottom-right corner.
    pub fn set_bottom_right(&mut self, bottom_right: Coordinate) {
        self.bottom_right = bottom_right;
    }

    /// Top-right corner. Invalid if the rectangle is invalid.
    pub fn top_right(&self) -> Coordinate {
        if !self.is_valid() {
            return Coordinate::INVALID;
        }

        Coordinate::new(self.top_left.latitude(), self.bottom_right.longitude())
    }

    /// Moves the top edge to the latitude and the right edge to the longitude of `top_right`.
    pub fn set_top_right(&mut self, top_right: Coordinate) {
        self.top_left.set_latitude(top_right.latitude());
        self.bottom_right.set_longitude(top_right.longitude());
    }

    /// Bottom-left corner. Invalid if the rectangle is invalid.
    pub fn bottom_left(&self) -> Coordinate {
        if !self.is_valid() {
            return Coordinate::INVALID;
        }

        Coordinate::new(self.bottom_right.latitude(), self.top_left.longitude())
    }

    /// Moves the bottom edge to the latitude and the left edge to the longitude of `bottom_left`.
    pub fn set_bottom_left(&mut self, bottom_left: Coordinate) {
        self.bottom_right.set_latitude(bottom_left.latitude());
        self.top_left.set_longitude(bottom_left.longitude());
    }

    /// Width in degrees of longitude, in `0..=360`. NaN for an invalid rectangle.
    pub fn width(&self) -> f64 {
        if !self.is_valid() {
            return f64::NAN;
        }

        let mut width = self.bottom_right.longitude() - self.top_left.longitude();
        if width < 0.0 {
            width += 360.0;
        }
        if width > 360.0 {
            width -= 360.0;
        }

        width
    }

    /// Height in degrees of latitude. NaN for an invalid rectangle.
    pub fn height(&self) -> f64 {
        if !self.is_valid() {
            return f64::NAN;
        }

        self.top_left.latitude() - self.bottom_right.latitude()
    }

    /// Changes the width keeping the center longitude.
    ///
    /// Widths of 360 degrees or more make the rectangle span all longitudes. Negative values and invalid
    /// rectangles are ignored.
    pub fn set_width(&mut self, width: f64) {
        if !self.is_valid() || width.is_nan() || width < 0.0 {
            return;
        }

        if width >= 360.0 {
            self.top_left.set_longitude(-180.0);
            self.bottom_right.set_longitude(180.0);
            return;
        }

        let center = self.center();
        self.top_left = Coordinate::new(
            self.top_left.latitude(),
            wrap_longitude(center.longitude() - width / 2.0),
        );
        self.bottom_right = Coordinate::new(
            self.bottom_right.latitude(),
            wrap_longitude(center.longitude() + width / 2.0),
        );
    }

    /// Changes the height keeping the center latitude where possible.
    ///
    /// Heights are limited to 180 degrees. If an edge would pass a pole, it stops at the pole and the other edge
    /// is placed so that the center stays where it was. Negative values and invalid rectangles are ignored.
    pub fn set_height(&mut self, height: f64) {
        if !self.is_valid() || height.is_nan() || height < 0.0 {
            return;
        }

        let height = height.min(180.0);
        let center = self.center();
        let (top, bottom) = clamp_latitudes(
            center.latitude(),
            center.latitude() + height / 2.0,
            center.latitude() - height / 2.0,
        );

        self.top_left = Coordinate::new(top, self.top_left.longitude());
        self.bottom_right = Coordinate::new(bottom, self.bottom_right.longitude());
    }

    /// Moves the rectangle so that its center is at `center`, keeping the size where possible.
    ///
    /// For an invalid rectangle both corners are set to `center`.
    pub fn set_center(&mut self, center: Coordinate) {
        if !self.is_valid() {
            self.top_left = center;
            self.bottom_right = center;
            return;
        }

        let width = self.width();
        let height = self.height();

        let (top, bottom) = clamp_latitudes(
            center.latitude(),
            center.latitude() + height / 2.0,
            center.latitude() - height / 2.0,
        );
        let (left, right) = if width == 360.0 {
            (-180.0, 180.0)
        } else {
            (
                wrap_longitude(center.longitude() - width / 2.0),
                wrap_longitude(center.longitude() + width / 2.0),
            )
        };

        self.top_left = Coordinate::new(top, left);
        self.bottom_right = Coordinate::new(bottom, right);
    }

    /// Returns true if every corner of `other` lies within this rectangle.
    pub fn contains_rectangle(&self, other: &Rectangle) -> bool {
        self.contains(&other.top_left())
            && self.contains(&other.top_right())
            && self.contains(&other.bottom_left())
            && self.contains(&other.bottom_right())
    }

    /// Returns true if the rectangles have at least one common point.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        if !self.is_valid() || !other.is_valid() {
            return false;
        }

        let (left1, right1) = (self.top_left.longitude(), self.bottom_right.longitude());
        let (top1, bottom1) = (self.top_left.latitude(), self.bottom_right.latitude());
        let (left2, right2) = (other.top_left.longitude(), other.bottom_right.longitude());
        let (top2, bottom2) = (other.top_left.latitude(), other.bottom_right.latitude());

        if top1 < bottom2 || bottom1 > top2 {
            return false;
        }

        // Touching at a pole means touching at any longitude.
        if (top1 == 90.0 && top2 == 90.0) || (bottom1 == -90.0 && bottom2 == -90.0) {
            return true;
        }

        match (left1 <= right1, left2 <= right2) {
            (true, true) => left1 <= right2 && left2 <= right1,
            (true, false) => !(left1 > right2 && right1 < left2),
            (false, true) => !(left2 > right1 && right2 < left1),
            // both contain the antimeridian
            (false, false) => true,
        }
    }

    /// Grows the rectangle just enough to include `coordinate`.
    ///
    /// When the coordinate is outside the longitude span, the edge that needs to move less is moved, which may
    /// make the rectangle cross the antimeridian.
    pub fn extend(&mut self, coordinate: &Coordinate) {
        if !self.is_valid() || !coordinate.is_valid() || self.contains(coordinate) {
            return;
        }

        let mut left = self.top_left.longitude();
        let mut right = self.bottom_right.longitude();
        let top = self.top_left.latitude().max(coordinate.latitude());
        let bottom = self.bottom_right.latitude().min(coordinate.latitude());

        let lon = coordinate.longitude();
        let wraps = left > right;
        if wraps && lon > right && lon < left {
            if (left - lon).abs() < (right - lon).abs() {
                left = lon;
            } else {
                right = lon;
            }
        } else if !wraps {
            if lon < left {
                if 360.0 - (right - lon) < left - lon {
                    right = lon;
                } else {
                    left = lon;
                }
            } else if lon > right {
                if 360.0 - (lon - left) < lon - right {
                    left = lon;
                } else {
                    right = lon;
                }
            }
        }

        self.top_left = Coordinate::new(top, left);
        self.bottom_right = Coordinate::new(bottom, right);
    }

    /// Smallest rectangle containing both `self` and `other`.
    ///
    /// If one of the rectangles is invalid, the other one is returned. When the centers of the rectangles are
    /// exactly 180 degrees of longitude apart, the result spans all longitudes, so the result does not depend on
    /// the order of the operands.
    pub fn union(&self, other: &Rectangle) -> Rectangle {
        if !other.is_valid() {
            return *self;
        }
        if !self.is_valid() {
            return *other;
        }

        let top = self.top_left.latitude().max(other.top_left.latitude());
        let bottom = self.bottom_right.latitude().min(other.bottom_right.latitude());

        let mut candidate = Rectangle::new(
            Coordinate::new(top, self.top_left.longitude()),
            Coordinate::new(bottom, other.bottom_right.longitude()),
        );
        let other_candidate = Rectangle::new(
            Coordinate::new(top, other.top_left.longitude()),
            Coordinate::new(bottom, self.bottom_right.longitude()),
        );

        // a candidate narrower than the rectangle it must contain actually goes around the globe
        let unwrapped = |candidate: &Rectangle, inner: &Rectangle| {
            let width = candidate.width();
            if width < inner.width() {
                width + 360.0
            } else {
                width
            }
        };

        let mut unwrapped_width = unwrapped(&candidate, other);
        let other_unwrapped_width = unwrapped(&other_candidate, self);
        if other_unwrapped_width < unwrapped_width {
            candidate = other_candidate;
            unwrapped_width = other_unwrapped_width;
        }

        if unwrapped_width >= 360.0 {
            candidate = Rectangle::full_width(top, bottom);
        }
        for inner in [self, other] {
            if candidate.width() < inner.width() {
                candidate = Rectangle::new(
                    Coordinate::new(top, inner.top_left.longitude()),
                    Coordinate::new(bottom, inner.bottom_right.longitude()),
                );
            }
        }

        let middle1 = self.center().longitude();
        let middle2 = other.center().longitude();
        let offset = if middle1 <= middle2 { 0.0 } else { 360.0 };
        if offset + middle2 - middle1 == 180.0 {
            candidate = Rectangle::full_width(top, bottom);
        }

        candidate.top_left.set_latitude(top);
        candidate.bottom_right.set_latitude(bottom);
        candidate
    }

    /// Moves the rectangle by the given number of degrees.
    ///
    /// The latitude offset is limited so that the rectangle does not pass a pole. Rectangles spanning all
    /// longitudes are moved only along the meridians.
    pub fn translate(&mut self, d_lat: f64, d_lon: f64) {
        if !self.is_valid() {
            return;
        }

        let (top, bottom) = (self.top_left.latitude(), self.bottom_right.latitude());
        let d_lat = if d_lat >= 0.0 {
            d_lat.min(90.0 - top)
        } else {
            d_lat.max(-90.0 - bottom)
        };

        let mut left = self.top_left.longitude();
        let mut right = self.bottom_right.longitude();
        if left != -180.0 || right != 180.0 {
            left = wrap_longitude(left + d_lon);
            right = wrap_longitude(right + d_lon);
        }

        self.top_left = Coordinate::new(top + d_lat, left);
        self.bottom_right = Coordinate::new(bottom + d_lat, right);
    }

    /// Returns a copy of the rectangle moved by the given number of degrees. See [`Rectangle::translate`].
    pub fn translated(&self, d_lat: f64, d_lon: f64) -> Self {
        let mut result = *self;
        result.translate(d_lat, d_lon);
        result
    }
}

/// Limits the edges of a box centered at `center_lat` to the poles, moving the opposite edge so that the center
/// is kept where possible. Returns `(top, bottom)`.
fn clamp_latitudes(center_lat: f64, mut top: f64, mut bottom: f64) -> (f64, f64) {
    if top > 90.0 {
        bottom = 2.0 * center_lat - 90.0;
        top = 90.0;
    }
    if top < -90.0 {
        bottom = -90.0;
        top = -90.0;
    }
    if bottom > 90.0 {
        top = 90.0;
        bottom = 90.0;
    }
    if bottom < -90.0 {
        top = 2.0 * center_lat + 90.0;
        bottom = -90.0;
    }

    (top, bottom)
}

impl GeoShape for Rectangle {
    fn shape_type(&self) -> ShapeType {
        ShapeType::Rectangle
    }

    fn is_valid(&self) -> bool {
        self.top_left.is_valid()
            && self.bottom_right.is_valid()
            && self.top_left.latitude() >= self.bottom_right.latitude()
    }

    fn is_empty(&self) -> bool {
        !self.is_valid()
            || self.top_left.latitude() == self.bottom_right.latitude()
            || self.top_left.longitude() == self.bottom_right.longitude()
    }

    fn center(&self) -> Coordinate {
        if !self.is_valid() {
            return Coordinate::INVALID;
        }

        let lat = (self.top_left.latitude() + self.bottom_right.latitude()) / 2.0;
        let mut lon = (self.top_left.longitude() + self.bottom_right.longitude()) / 2.0;
        if self.top_left.longitude() > self.bottom_right.longitude() {
            lon -= 180.0;
        }

        Coordinate::new(lat, wrap_longitude(lon))
    }

    fn contains(&self, coordinate: &Coordinate) -> bool {
        if !self.is_valid() || !coordinate.is_valid() {
            return false;
        }

        let (left, right) = (self.top_left.longitude(), self.bottom_right.longitude());
        let (top, bottom) = (self.top_left.latitude(), self.bottom_right.latitude());
        let (lat, lon) = (coordinate.latitude(), coordinate.longitude());

        if lat > top || lat < bottom {
            return false;
        }
        if (lat == 90.0 && top == 90.0) || (lat == -90.0 && bottom == -90.0) {
            return true;
        }

        if left <= right {
            left <= lon && lon <= right
        } else {
            lon >= left || lon <= right
        }
    }

    fn bounding_rectangle(&self) -> Rectangle {
        *self
    }
}

impl BitOr for Rectangle {
    type Output = Rectangle;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(&rhs)
    }
}

impl BitOrAssign for Rectangle {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(&rhs);
    }
}

impl Display for Rectangle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Rectangle(")?;
        fmt_coordinate(&self.top_left, f)?;
        f.write_str(", ")?;
        fmt_coordinate(&self.bottom_right, f)?;
        f.write_str(")")
    }
}
