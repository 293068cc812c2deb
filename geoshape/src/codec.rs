//! Binary encoding of shapes.
//!
//! All the values are big-endian. A shape starts with its [`ShapeType`] as `u32`, followed by the fields of the
//! shape:
//!
//! | Shape | Fields |
//! |---|---|
//! | Unknown | none |
//! | Rectangle | top left, bottom right |
//! | Circle | center, radius (`f64`) |
//! | Path | vertex count (`u32`), vertices, width (`f64`) |
//! | Polygon | vertex count (`u32`), vertices, hole count (`u32`), for each hole: vertex count (`u32`), vertices |
//!
//! A coordinate is written as latitude, longitude and altitude, each as `f64`. Unset values are written as NaN.

use std::mem::size_of;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use log::debug;

use crate::error::GeoShapeError;
use crate::{Circle, Coordinate, GeoShape, Path, Polygon, Rectangle, Shape, ShapeType};

const COORDINATE_SIZE: usize = 3 * size_of::<f64>();

impl Shape {
    /// Writes the shape into `buf`.
    ///
    /// Fails only if a vertex list is too long for its `u32` length prefix.
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> Result<(), GeoShapeError> {
        buf.put_u32(self.shape_type() as u32);

        match self {
            Shape::Unknown => {}
            Shape::Rectangle(rect) => {
                put_coordinate(buf, &rect.top_left());
                put_coordinate(buf, &rect.bottom_right());
            }
            Shape::Circle(circle) => {
                put_coordinate(buf, &circle.center());
                buf.put_f64(circle.radius());
            }
            Shape::Path(path) => {
                put_coordinates(buf, path.path())?;
                buf.put_f64(path.width());
            }
            Shape::Polygon(polygon) => {
                put_coordinates(buf, polygon.perimeter())?;
                put_len(buf, polygon.holes().len())?;
                for hole in polygon.holes() {
                    put_coordinates(buf, hole)?;
                }
            }
        }

        Ok(())
    }

    /// Encodes the shape into a new buffer.
    pub fn to_bytes(&self) -> Result<Bytes, GeoShapeError> {
        let mut buf = BytesMut::new();
        self.encode(&mut buf)?;
        Ok(buf.freeze())
    }

    /// Reads a shape from `buf`.
    ///
    /// Fails if the shape type is unknown or the input ends before the shape is complete. Bytes after the end of the
    /// shape are left in `buf`.
    pub fn decode<B: Buf>(buf: &mut B) -> Result<Self, GeoShapeError> {
        let result = decode_shape(buf);
        if let Err(err) = &result {
            debug!("Failed to decode shape: {err}");
        }

        result
    }
}

fn decode_shape<B: Buf>(buf: &mut B) -> Result<Shape, GeoShapeError> {
    let tag = get_u32(buf)?;
    let shape_type = ShapeType::try_from(tag).map_err(GeoShapeError::UnknownShapeType)?;

    Ok(match shape_type {
        ShapeType::Unknown => Shape::Unknown,
        ShapeType::Rectangle => {
            let top_left = get_coordinate(buf)?;
            let bottom_right = get_coordinate(buf)?;
            Rectangle::new(top_left, bottom_right).into()
        }
        ShapeType::Circle => {
            let center = get_coordinate(buf)?;
            let radius = get_f64(buf)?;
            Circle::new(center, radius).into()
        }
        ShapeType::Path => {
            let vertices = get_coordinates(buf)?;
            let width = get_f64(buf)?;
            Path::new(vertices, width).into()
        }
        ShapeType::Polygon => {
            let mut polygon = Polygon::new(get_coordinates(buf)?);
            let holes = get_u32(buf)?;
            for _ in 0..holes {
                polygon.add_hole(get_coordinates(buf)?);
            }
            polygon.into()
        }
    })
}

fn put_len<B: BufMut>(buf: &mut B, len: usize) -> Result<(), GeoShapeError> {
    let len = u32::try_from(len).map_err(|_| GeoShapeError::TooManyElements(len))?;
    buf.put_u32(len);
    Ok(())
}

fn put_coordinate<B: BufMut>(buf: &mut B, coordinate: &Coordinate) {
    buf.put_f64(coordinate.latitude());
    buf.put_f64(coordinate.longitude());
    buf.put_f64(coordinate.altitude());
}

fn put_coordinates<B: BufMut>(buf: &mut B, coordinates: &[Coordinate]) -> Result<(), GeoShapeError> {
    put_len(buf, coordinates.len())?;
    for coordinate in coordinates {
        put_coordinate(buf, coordinate);
    }
    Ok(())
}

fn ensure_remaining<B: Buf>(buf: &B, needed: usize) -> Result<(), GeoShapeError> {
    let remaining = buf.remaining();
    if remaining < needed {
        return Err(GeoShapeError::UnexpectedEnd { needed, remaining });
    }
    Ok(())
}

fn get_u32<B: Buf>(buf: &mut B) -> Result<u32, GeoShapeError> {
    ensure_remaining(buf, size_of::<u32>())?;
    Ok(buf.get_u32())
}

fn get_f64<B: Buf>(buf: &mut B) -> Result<f64, GeoShapeError> {
    ensure_remaining(buf, size_of::<f64>())?;
    Ok(buf.get_f64())
}

fn get_coordinate<B: Buf>(buf: &mut B) -> Result<Coordinate, GeoShapeError> {
    ensure_remaining(buf, COORDINATE_SIZE)?;
    Ok(Coordinate::from_raw(buf.get_f64(), buf.get_f64(), buf.get_f64()))
}

fn get_coordinates<B: Buf>(buf: &mut B) -> Result<Vec<Coordinate>, GeoShapeError> {
    let count = get_u32(buf)? as usize;
    ensure_remaining(buf, count.saturating_mul(COORDINATE_SIZE))?;

    (0..count).map(|_| get_coordinate(buf)).collect()
}
