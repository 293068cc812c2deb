//! Error type used by the crate.

use thiserror::Error;

/// Error enum.
///
/// Invalid coordinates and shapes are not errors: they are represented by the values themselves (see
/// [`Coordinate::is_valid`](crate::Coordinate::is_valid) and [`GeoShape::is_valid`](crate::GeoShape::is_valid)).
/// This type only covers failures of the binary codec.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeoShapeError {
    /// The shape type tag read from the input does not name any known shape.
    #[error("unknown shape type: {0}")]
    UnknownShapeType(u32),
    /// Input ended before the value was fully read.
    #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEnd {
        /// Number of bytes the reader tried to consume.
        needed: usize,
        /// Number of bytes left in the input.
        remaining: usize,
    },
    /// A list is too long to be written with a 32-bit length prefix.
    #[error("too many elements to encode: {0}")]
    TooManyElements(usize),
}
