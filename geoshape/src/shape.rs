//! Common shape capability ([`GeoShape`]) and the closed set of shapes ([`Shape`]).

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{Circle, Coordinate, Path, Polygon, Rectangle};

/// Operations every geographic shape supports.
///
/// The results of [`GeoShape::contains`], [`GeoShape::center`] and [`GeoShape::bounding_rectangle`] are always
/// defined, but meaningful only for shapes that are [valid](GeoShape::is_valid).
pub trait GeoShape {
    /// Discriminant of the shape.
    fn shape_type(&self) -> ShapeType;

    /// Returns true if the shape is defined well enough to describe an area or a line on the Earth's surface.
    fn is_valid(&self) -> bool;

    /// Returns true if the shape does not cover any area (or line).
    fn is_empty(&self) -> bool;

    /// Geometric center of the shape.
    fn center(&self) -> Coordinate;

    /// Returns true if the coordinate lies within the shape.
    fn contains(&self, coordinate: &Coordinate) -> bool;

    /// Smallest latitude/longitude aligned rectangle containing the whole shape.
    fn bounding_rectangle(&self) -> Rectangle;
}

/// Type of a shape. The numeric values are used as discriminants by the [binary codec](crate::codec).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum ShapeType {
    /// Shape of an unknown type.
    #[default]
    Unknown = 0,
    /// [`Rectangle`].
    Rectangle = 1,
    /// [`Circle`].
    Circle = 2,
    /// [`Path`].
    Path = 3,
    /// [`Polygon`].
    Polygon = 4,
}

impl TryFrom<u32> for ShapeType {
    type Error = u32;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Unknown,
            1 => Self::Rectangle,
            2 => Self::Circle,
            3 => Self::Path,
            4 => Self::Polygon,
            other => return Err(other),
        })
    }
}

/// Any of the shapes of the crate.
///
/// The default value is [`Shape::Unknown`], which is invalid and empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shape {
    /// Shape without a type.
    #[default]
    Unknown,
    /// Rectangle.
    Rectangle(Rectangle),
    /// Circle.
    Circle(Circle),
    /// Path.
    Path(Path),
    /// Polygon.
    Polygon(Polygon),
}

impl Shape {
    /// Returns the rectangle if the shape is one.
    pub fn as_rectangle(&self) -> Option<&Rectangle> {
        match self {
            Shape::Rectangle(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the circle if the shape is one.
    pub fn as_circle(&self) -> Option<&Circle> {
        match self {
            Shape::Circle(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the path if the shape is one.
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Shape::Path(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the polygon if the shape is one.
    pub fn as_polygon(&self) -> Option<&Polygon> {
        match self {
            Shape::Polygon(v) => Some(v),
            _ => None,
        }
    }
}

impl GeoShape for Shape {
    fn shape_type(&self) -> ShapeType {
        match self {
            Shape::Unknown => ShapeType::Unknown,
            Shape::Rectangle(v) => v.shape_type(),
            Shape::Circle(v) => v.shape_type(),
            Shape::Path(v) => v.shape_type(),
            Shape::Polygon(v) => v.shape_type(),
        }
    }

    fn is_valid(&self) -> bool {
        match self {
            Shape::Unknown => false,
            Shape::Rectangle(v) => v.is_valid(),
            Shape::Circle(v) => v.is_valid(),
            Shape::Path(v) => v.is_valid(),
            Shape::Polygon(v) => v.is_valid(),
        }
    }

    fn is_empty(&self) -> bool {
        match self {
            Shape::Unknown => true,
            Shape::Rectangle(v) => v.is_empty(),
            Shape::Circle(v) => v.is_empty(),
            Shape::Path(v) => v.is_empty(),
            Shape::Polygon(v) => v.is_empty(),
        }
    }

    fn center(&self) -> Coordinate {
        match self {
            Shape::Unknown => Coordinate::INVALID,
            Shape::Rectangle(v) => v.center(),
            Shape::Circle(v) => v.center(),
            Shape::Path(v) => v.center(),
            Shape::Polygon(v) => v.center(),
        }
    }

    fn contains(&self, coordinate: &Coordinate) -> bool {
        match self {
            Shape::Unknown => false,
            Shape::Rectangle(v) => v.contains(coordinate),
            Shape::Circle(v) => v.contains(coordinate),
            Shape::Path(v) => v.contains(coordinate),
            Shape::Polygon(v) => v.contains(coordinate),
        }
    }

    fn bounding_rectangle(&self) -> Rectangle {
        match self {
            Shape::Unknown => Rectangle::default(),
            Shape::Rectangle(v) => v.bounding_rectangle(),
            Shape::Circle(v) => v.bounding_rectangle(),
            Shape::Path(v) => v.bounding_rectangle(),
            Shape::Polygon(v) => v.bounding_rectangle(),
        }
    }
}

impl Display for Shape {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Shape::Unknown => f.write_str("Shape(unknown)"),
            Shape::Rectangle(v) => v.fmt(f),
            Shape::Circle(v) => v.fmt(f),
            Shape::Path(v) => v.fmt(f),
            Shape::Polygon(v) => v.fmt(f),
        }
    }
}

impl From<Rectangle> for Shape {
    fn from(value: Rectangle) -> Self {
        Self::Rectangle(value)
    }
}

impl From<Circle> for Shape {
    fn from(value: Circle) -> Self {
        Self::Circle(value)
    }
}

impl From<Path> for Shape {
    fn from(value: Path) -> Self {
        Self::Path(value)
    }
}

impl From<Polygon> for Shape {
    fn from(value: Polygon) -> Self {
        Self::Polygon(value)
    }
}

/// Formats a coordinate as `{lat, lon}` for the shape `Display` implementations.
pub(crate) fn fmt_coordinate(coordinate: &Coordinate, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "{{{}, {}}}", coordinate.latitude(), coordinate.longitude())
}

/// Formats a vertex list as `[ {lat, lon}, ... ]`.
pub(crate) fn fmt_coordinates(coordinates: &[Coordinate], f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str("[")?;
    for (index, coordinate) in coordinates.iter().enumerate() {
        f.write_str(if index == 0 { " " } else { ", " })?;
        fmt_coordinate(coordinate, f)?;
    }
    f.write_str(" ]")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Vec<Coordinate> {
        vec![
            Coordinate::new(-1.0, -1.0),
            Coordinate::new(-1.0, 1.0),
            Coordinate::new(1.0, 1.0),
            Coordinate::new(1.0, -1.0),
        ]
    }

    #[test]
    fn unknown_shape() {
        let shape = Shape::default();
        assert_eq!(shape.shape_type(), ShapeType::Unknown);
        assert!(!shape.is_valid());
        assert!(shape.is_empty());
        assert!(!shape.center().is_valid());
        assert!(!shape.contains(&Coordinate::new(0.0, 0.0)));
        assert!(!shape.bounding_rectangle().is_valid());
    }

    #[test]
    fn dispatch() {
        let origin = Coordinate::new(0.0, 0.0);
        let shapes: Vec<Shape> = vec![
            Rectangle::new(Coordinate::new(1.0, -1.0), Coordinate::new(-1.0, 1.0)).into(),
            Circle::new(origin, 1000.0).into(),
            Path::new(vec![Coordinate::new(0.0, -1.0), Coordinate::new(0.0, 1.0)], 10.0).into(),
            Polygon::new(square()).into(),
        ];

        let types: Vec<ShapeType> = shapes.iter().map(|s| s.shape_type()).collect();
        assert_eq!(
            types,
            [
                ShapeType::Rectangle,
                ShapeType::Circle,
                ShapeType::Path,
                ShapeType::Polygon
            ]
        );

        for shape in &shapes {
            assert!(shape.is_valid(), "{shape}");
            assert!(!shape.is_empty(), "{shape}");
            assert!(shape.contains(&origin), "{shape}");
            assert!(shape.bounding_rectangle().contains(&origin), "{shape}");
            assert!(!shape.contains(&Coordinate::new(10.0, 10.0)), "{shape}");
        }
    }

    #[test]
    fn downcast() {
        let shape = Shape::from(Circle::new(Coordinate::new(1.0, 2.0), 5.0));
        assert!(shape.as_circle().is_some());
        assert!(shape.as_rectangle().is_none());
        assert!(shape.as_path().is_none());
        assert!(shape.as_polygon().is_none());
    }

    #[test]
    fn shape_type_from_u32() {
        assert_eq!(ShapeType::try_from(4), Ok(ShapeType::Polygon));
        assert_eq!(ShapeType::try_from(5), Err(5));
        assert_eq!(ShapeType::Path as u32, 3);
    }

    #[test]
    fn queries_are_idempotent() {
        let shape = Shape::from(Polygon::new(square()));
        let point = Coordinate::new(0.5, 0.5);

        let first = (shape.contains(&point), shape.bounding_rectangle(), shape.center());
        let second = (shape.contains(&point), shape.bounding_rectangle(), shape.center());
        assert_eq!(first, second);
        assert!(shape.is_valid());
        assert!(!shape.is_empty());
    }

    #[test]
    fn serde_round_trip() {
        let shape = Shape::from(Circle::new(Coordinate::new(1.0, 2.0), 5.0));
        let json = serde_json::to_string(&shape).expect("serialize");
        let restored: Shape = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, shape);
    }
}
