//! Polygon with holes on the surface of the Earth (see [`Polygon`]).

use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::path::chain::{shift_vertices, VertexChain};
use crate::planar::PlanarPolygon;
use crate::shape::fmt_coordinates;
use crate::{CacheState, Coordinate, GeoShape, Rectangle, ShapeType, UpdatePolicy};

/// Area on the surface of the Earth bounded by a closed perimeter, optionally with holes.
///
/// The perimeter is closed implicitly: the last vertex connects back to the first one. Edges are straight lines in
/// the Web-Mercator projection. A polygon is valid if its perimeter has at least three vertices.
///
/// Containment uses the nonzero winding rule. Points on the perimeter are inside the polygon, points on the border
/// of a hole are outside.
///
/// ```
/// use geoshape::{Coordinate, GeoShape, Polygon};
///
/// let square = |size: f64| {
///     vec![
///         Coordinate::new(-size, -size),
///         Coordinate::new(-size, size),
///         Coordinate::new(size, size),
///         Coordinate::new(size, -size),
///     ]
/// };
///
/// let mut polygon = Polygon::new(square(1.0));
/// polygon.add_hole(square(0.1));
///
/// assert!(!polygon.contains(&Coordinate::new(0.0, 0.0)));
/// assert!(polygon.contains(&Coordinate::new(0.5, 0.5)));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "PolygonRepr", into = "PolygonRepr")]
pub struct Polygon {
    chain: VertexChain,
    holes: Vec<Vec<Coordinate>>,
    planar: OnceLock<PlanarPolygon>,
}

impl Polygon {
    /// Creates a new polygon without holes, with the lazy update policy. Invalid coordinates are skipped.
    pub fn new(perimeter: Vec<Coordinate>) -> Self {
        Self::with_policy(perimeter, UpdatePolicy::Lazy)
    }

    /// Creates a new polygon without holes, with the given cache update policy.
    pub fn with_policy(perimeter: Vec<Coordinate>, policy: UpdatePolicy) -> Self {
        let mut polygon = Self {
            chain: VertexChain::new(perimeter, policy),
            holes: Vec::new(),
            planar: OnceLock::new(),
        };
        polygon.invalidate_planar();
        polygon
    }

    /// Drops the planar form, or rebuilds it right away for the eager policy.
    fn invalidate_planar(&mut self) {
        self.planar = match self.chain.policy() {
            UpdatePolicy::Lazy => OnceLock::new(),
            UpdatePolicy::Eager => OnceLock::from(self.build_planar()),
        };
    }

    fn build_planar(&self) -> PlanarPolygon {
        trace!(
            "Projecting polygon with {} vertices and {} holes",
            self.chain.vertices().len(),
            self.holes.len()
        );
        PlanarPolygon::new(
            self.chain.vertices(),
            &self.chain.bounding_rectangle(),
            &self.holes,
        )
    }

    /// Vertices of the perimeter.
    pub fn perimeter(&self) -> &[Coordinate] {
        self.chain.vertices()
    }

    /// Replaces all the vertices of the perimeter, skipping invalid ones. Holes are kept.
    pub fn set_perimeter(&mut self, perimeter: Vec<Coordinate>) {
        self.chain.set_vertices(perimeter);
        self.invalidate_planar();
    }

    /// Number of vertices of the perimeter.
    pub fn size(&self) -> usize {
        self.chain.vertices().len()
    }

    /// Perimeter vertex at `index`, or the invalid coordinate if the index is out of bounds.
    pub fn coordinate_at(&self, index: usize) -> Coordinate {
        self.chain
            .vertices()
            .get(index)
            .copied()
            .unwrap_or(Coordinate::INVALID)
    }

    /// Returns true if `coordinate` is one of the perimeter vertices.
    pub fn contains_coordinate(&self, coordinate: &Coordinate) -> bool {
        self.chain.vertices().contains(coordinate)
    }

    /// Appends a vertex to the perimeter. Invalid coordinates are ignored.
    pub fn add_coordinate(&mut self, coordinate: Coordinate) {
        if coordinate.is_valid() {
            self.chain.push(coordinate);
            self.invalidate_planar();
        }
    }

    /// Inserts a perimeter vertex at `index`. Invalid coordinates and indices past the end are ignored.
    pub fn insert_coordinate(&mut self, index: usize, coordinate: Coordinate) {
        if self.chain.insert(index, coordinate) {
            self.invalidate_planar();
        }
    }

    /// Replaces the perimeter vertex at `index`. Invalid coordinates and out of bounds indices are ignored.
    pub fn replace_coordinate(&mut self, index: usize, coordinate: Coordinate) {
        if self.chain.replace(index, coordinate) {
            self.invalidate_planar();
        }
    }

    /// Removes the last perimeter vertex equal to `coordinate`, if any.
    pub fn remove_coordinate(&mut self, coordinate: &Coordinate) {
        if self.chain.remove(coordinate) {
            self.invalidate_planar();
        }
    }

    /// Removes the perimeter vertex at `index`. Out of bounds indices are ignored.
    pub fn remove_coordinate_at(&mut self, index: usize) {
        if self.chain.remove_at(index) {
            self.invalidate_planar();
        }
    }

    /// Removes all the vertices of the perimeter. Holes are kept.
    pub fn clear_perimeter(&mut self) {
        self.chain.clear();
        self.invalidate_planar();
    }

    /// Length in meters of the part of the perimeter between the vertices `from` and `to`.
    ///
    /// With `to` set to `None` the length includes the closing edge, so `length(0, None)` is the full perimeter.
    /// Indices past the end stand for the last vertex.
    pub fn length(&self, from: usize, to: Option<usize>) -> f64 {
        self.chain.length(from, to)
    }

    /// Adds a hole. Holes with invalid vertices are ignored.
    pub fn add_hole(&mut self, hole: Vec<Coordinate>) {
        if !hole.iter().all(Coordinate::is_valid) {
            return;
        }

        self.holes.push(hole);
        self.invalidate_planar();
    }

    /// Removes the hole at `index`. Out of bounds indices are ignored.
    pub fn remove_hole(&mut self, index: usize) {
        if index >= self.holes.len() {
            return;
        }

        self.holes.remove(index);
        self.invalidate_planar();
    }

    /// Vertices of the hole at `index`.
    pub fn hole(&self, index: usize) -> Option<&[Coordinate]> {
        self.holes.get(index).map(Vec::as_slice)
    }

    /// All the holes.
    pub fn holes(&self) -> &[Vec<Coordinate>] {
        &self.holes
    }

    /// Number of holes.
    pub fn holes_count(&self) -> usize {
        self.holes.len()
    }

    /// Moves the polygon with its holes by the given number of degrees.
    ///
    /// The latitude offset is limited so that no perimeter vertex passes a pole. Longitudes are wrapped.
    pub fn translate(&mut self, d_lat: f64, d_lon: f64) {
        if self.size() == 0 {
            return;
        }

        let d_lat = self.chain.clamp_latitude_offset(d_lat);
        self.chain.shift(d_lat, d_lon);
        for hole in &mut self.holes {
            shift_vertices(hole, d_lat, d_lon);
        }
        self.invalidate_planar();
    }

    /// Returns a copy of the polygon moved by the given number of degrees. See [`Polygon::translate`].
    pub fn translated(&self, d_lat: f64, d_lon: f64) -> Self {
        let mut result = self.clone();
        result.translate(d_lat, d_lon);
        result
    }

    /// State of the cached bounding box and planar form. Clean only if both are up to date.
    pub fn cache_state(&self) -> CacheState {
        match (self.chain.cache_state(), self.planar.get()) {
            (CacheState::Clean, Some(_)) => CacheState::Clean,
            _ => CacheState::Dirty,
        }
    }

    /// Update policy of the cache, chosen at construction.
    pub fn update_policy(&self) -> UpdatePolicy {
        self.chain.policy()
    }
}

impl GeoShape for Polygon {
    fn shape_type(&self) -> ShapeType {
        ShapeType::Polygon
    }

    fn is_valid(&self) -> bool {
        self.size() > 2
    }

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn center(&self) -> Coordinate {
        self.bounding_rectangle().center()
    }

    fn contains(&self, coordinate: &Coordinate) -> bool {
        if !self.is_valid() || !coordinate.is_valid() {
            return false;
        }

        self.planar
            .get_or_init(|| self.build_planar())
            .contains(coordinate)
    }

    fn bounding_rectangle(&self) -> Rectangle {
        self.chain.bounding_rectangle()
    }
}

impl PartialEq for Polygon {
    fn eq(&self, other: &Self) -> bool {
        self.chain == other.chain && self.holes == other.holes
    }
}

impl Eq for Polygon {}

impl Hash for Polygon {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.perimeter().hash(state);
        self.holes.hash(state);
    }
}

impl Display for Polygon {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Polygon(")?;
        fmt_coordinates(self.perimeter(), f)?;
        f.write_str(")")
    }
}

#[derive(Serialize, Deserialize)]
struct PolygonRepr {
    perimeter: Vec<Coordinate>,
    #[serde(default)]
    holes: Vec<Vec<Coordinate>>,
    #[serde(default)]
    policy: UpdatePolicy,
}

impl From<PolygonRepr> for Polygon {
    fn from(value: PolygonRepr) -> Self {
        let mut polygon = Self::with_policy(value.perimeter, value.policy);
        for hole in value.holes {
            polygon.add_hole(hole);
        }
        polygon
    }
}

impl From<Polygon> for PolygonRepr {
    fn from(value: Polygon) -> Self {
        Self {
            perimeter: value.perimeter().to_vec(),
            policy: value.update_policy(),
            holes: value.holes,
        }
    }
}
