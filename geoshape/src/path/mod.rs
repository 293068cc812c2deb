//! Polyline with a width (see [`Path`]) and the vertex chain machinery shared with [`Polygon`](crate::Polygon).

use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::hash::{f64_eq, hash_f64};
use crate::planar::unwrap_x;
use crate::segment::Segment;
use crate::shape::fmt_coordinates;
use crate::{Coordinate, GeoShape, Rectangle, ShapeType, WebMercator};

pub(crate) mod bounds;
pub(crate) mod chain;

pub use bounds::{CacheState, UpdatePolicy};
use chain::VertexChain;

/// Smallest distance in meters from the path line that still counts as lying on the path.
const MIN_LINE_RADIUS: f64 = 0.2;

/// Ordered list of coordinates forming a line on the surface of the Earth, with a width in meters.
///
/// Edges between the vertices are straight lines in the Web-Mercator projection. A path is valid if it has at least
/// one vertex.
///
/// The bounding box of the path is cached. With [`UpdatePolicy::Lazy`] (the default) mutations drop the cache and
/// the next query recomputes it, with [`UpdatePolicy::Eager`] every mutation keeps it up to date.
///
/// ```
/// use geoshape::{Coordinate, GeoShape, Path};
///
/// let path = Path::new(vec![Coordinate::new(0.0, 170.0), Coordinate::new(0.0, -170.0)], 1000.0);
/// assert_eq!(path.bounding_rectangle().width(), 20.0);
/// assert!(path.contains(&Coordinate::new(0.0, 180.0)));
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "PathRepr", into = "PathRepr")]
pub struct Path {
    chain: VertexChain,
    width: f64,
}

impl Path {
    /// Creates a new path with the lazy update policy. Invalid coordinates are skipped.
    pub fn new(path: Vec<Coordinate>, width: f64) -> Self {
        Self::with_policy(path, width, UpdatePolicy::Lazy)
    }

    /// Creates a new path with the given cache update policy.
    pub fn with_policy(path: Vec<Coordinate>, width: f64, policy: UpdatePolicy) -> Self {
        let width = if width >= 0.0 { width } else { 0.0 };
        Self {
            chain: VertexChain::new(path, policy),
            width,
        }
    }

    /// Vertices of the path.
    pub fn path(&self) -> &[Coordinate] {
        self.chain.vertices()
    }

    /// Replaces all the vertices. Invalid coordinates are skipped.
    pub fn set_path(&mut self, path: Vec<Coordinate>) {
        self.chain.set_vertices(path);
    }

    /// Width of the path in meters.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Sets the width of the path in meters. Negative and NaN values are ignored.
    pub fn set_width(&mut self, width: f64) {
        if width.is_nan() || width < 0.0 {
            return;
        }

        self.width = width;
    }

    /// Number of vertices.
    pub fn size(&self) -> usize {
        self.chain.vertices().len()
    }

    /// Vertex at `index`, or the invalid coordinate if the index is out of bounds.
    pub fn coordinate_at(&self, index: usize) -> Coordinate {
        self.chain
            .vertices()
            .get(index)
            .copied()
            .unwrap_or(Coordinate::INVALID)
    }

    /// Returns true if `coordinate` is one of the vertices.
    pub fn contains_coordinate(&self, coordinate: &Coordinate) -> bool {
        self.chain.vertices().contains(coordinate)
    }

    /// Appends a vertex. Invalid coordinates are ignored.
    pub fn add_coordinate(&mut self, coordinate: Coordinate) {
        self.chain.push(coordinate);
    }

    /// Inserts a vertex at `index`. Invalid coordinates and indices past the end are ignored.
    pub fn insert_coordinate(&mut self, index: usize, coordinate: Coordinate) {
        self.chain.insert(index, coordinate);
    }

    /// Replaces the vertex at `index`. Invalid coordinates and out of bounds indices are ignored.
    pub fn replace_coordinate(&mut self, index: usize, coordinate: Coordinate) {
        self.chain.replace(index, coordinate);
    }

    /// Removes the last vertex equal to `coordinate`, if any.
    pub fn remove_coordinate(&mut self, coordinate: &Coordinate) {
        self.chain.remove(coordinate);
    }

    /// Removes the vertex at `index`. Out of bounds indices are ignored.
    pub fn remove_coordinate_at(&mut self, index: usize) {
        self.chain.remove_at(index);
    }

    /// Removes all the vertices.
    pub fn clear_path(&mut self) {
        self.chain.clear();
    }

    /// Length in meters of the part of the path between the vertices `from` and `to`.
    ///
    /// With `to` set to `None` the length is measured up to the last vertex and then back to the first one.
    /// Indices past the end stand for the last vertex.
    pub fn length(&self, from: usize, to: Option<usize>) -> f64 {
        self.chain.length(from, to)
    }

    /// Moves the path by the given number of degrees.
    ///
    /// The latitude offset is limited so that no vertex passes a pole. Longitudes are wrapped.
    pub fn translate(&mut self, d_lat: f64, d_lon: f64) {
        if self.size() == 0 {
            return;
        }

        let d_lat = self.chain.clamp_latitude_offset(d_lat);
        self.chain.shift(d_lat, d_lon);
    }

    /// Returns a copy of the path moved by the given number of degrees. See [`Path::translate`].
    pub fn translated(&self, d_lat: f64, d_lon: f64) -> Self {
        let mut result = self.clone();
        result.translate(d_lat, d_lon);
        result
    }

    /// State of the cached bounding box.
    pub fn cache_state(&self) -> CacheState {
        self.chain.cache_state()
    }

    /// Update policy of the cache, chosen at construction.
    pub fn update_policy(&self) -> UpdatePolicy {
        self.chain.policy()
    }
}

impl GeoShape for Path {
    fn shape_type(&self) -> ShapeType {
        ShapeType::Path
    }

    fn is_valid(&self) -> bool {
        self.size() > 0
    }

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn center(&self) -> Coordinate {
        self.bounding_rectangle().center()
    }

    fn contains(&self, coordinate: &Coordinate) -> bool {
        if !coordinate.is_valid() {
            return false;
        }

        let radius = (self.width / 2.0).max(MIN_LINE_RADIUS);
        match self.chain.vertices() {
            [] => false,
            [vertex] => vertex.distance_to(coordinate) <= radius,
            vertices => line_contains(vertices, &self.bounding_rectangle(), coordinate, radius),
        }
    }

    fn bounding_rectangle(&self) -> Rectangle {
        self.chain.bounding_rectangle()
    }
}

/// Returns true if `coordinate` is within `radius` meters from the line through the `vertices`.
///
/// Each edge is projected into the Mercator plane, where the closest point to the coordinate is found and then
/// projected back to measure the great-circle distance.
fn line_contains(vertices: &[Coordinate], bounds: &Rectangle, coordinate: &Coordinate, radius: f64) -> bool {
    let left_bound = WebMercator::to_mercator(&bounds.top_left()).x;
    let project = |c: &Coordinate| unwrap_x(WebMercator::to_mercator(c), left_bound);

    let point = project(coordinate);
    let projected: Vec<_> = vertices.iter().map(project).collect();

    for edge in projected.windows(2) {
        let (a, b) = (&edge[0], &edge[1]);
        if a == b {
            continue;
        }

        let mut closest = Segment(a, b).closest_point(&point);
        if closest.x > 1.0 {
            closest.x -= 1.0;
        }

        let closest = WebMercator::from_mercator(&closest);
        if coordinate.distance_to(&closest) <= radius {
            return true;
        }
    }

    vertices[0].distance_to(coordinate) <= radius
}

impl PartialEq for Path {
    fn eq(&self, other: &Self) -> bool {
        self.chain == other.chain && f64_eq(self.width, other.width)
    }
}

impl Eq for Path {}

impl Hash for Path {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.path().hash(state);
        hash_f64(self.width, state);
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Path(")?;
        fmt_coordinates(self.path(), f)?;
        f.write_str(")")
    }
}

#[derive(Serialize, Deserialize)]
struct PathRepr {
    path: Vec<Coordinate>,
    width: f64,
    #[serde(default)]
    policy: UpdatePolicy,
}

impl From<PathRepr> for Path {
    fn from(value: PathRepr) -> Self {
        Self::with_policy(value.path, value.width, value.policy)
    }
}

impl From<Path> for PathRepr {
    fn from(value: Path) -> Self {
        Self {
            path: value.path().to_vec(),
            width: value.width,
            policy: value.update_policy(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::seeded_hash;
    use approx::assert_abs_diff_eq;

    fn coords(values: &[(f64, f64)]) -> Vec<Coordinate> {
        values
            .iter()
            .map(|&(lat, lon)| Coordinate::new(lat, lon))
            .collect()
    }

    #[test]
    fn validity() {
        let mut path = Path::default();
        assert!(!path.is_valid());
        assert!(path.is_empty());
        assert!(!path.bounding_rectangle().is_valid());

        path.add_coordinate(Coordinate::new(1.0, 2.0));
        assert!(path.is_valid());
        assert!(!path.is_empty());
        assert_eq!(path.center(), Coordinate::new(1.0, 2.0));
    }

    #[test]
    fn bounding_rectangle_across_antimeridian() {
        let path = Path::new(coords(&[(0.0, 170.0), (0.0, -170.0)]), 0.0);
        let bbox = path.bounding_rectangle();

        assert_eq!(bbox.width(), 20.0);
        assert_eq!(bbox.top_left(), Coordinate::new(0.0, 170.0));
        assert_eq!(path.center(), Coordinate::new(0.0, -180.0));
    }

    #[test]
    fn contains_near_line() {
        let path = Path::new(coords(&[(0.0, -1.0), (0.0, 1.0)]), 1000.0);

        assert!(path.contains(&Coordinate::new(0.0, 0.0)));
        assert!(path.contains(&Coordinate::new(0.004, 0.3)));
        assert!(path.contains(&Coordinate::new(0.0, 1.004)));
        assert!(!path.contains(&Coordinate::new(0.006, 0.0)));
        assert!(!path.contains(&Coordinate::new(0.0, 1.01)));
        assert!(!path.contains(&Coordinate::INVALID));
    }

    #[test]
    fn contains_uses_minimal_radius() {
        let path = Path::new(coords(&[(0.0, -1.0), (0.0, 1.0)]), 0.0);
        assert!(path.contains(&Coordinate::new(0.0, 0.5)));
        assert!(!path.contains(&Coordinate::new(0.0001, 0.5)));
    }

    #[test]
    fn contains_single_vertex() {
        let path = Path::new(coords(&[(10.0, 10.0)]), 200.0);
        assert!(path.contains(&Coordinate::new(10.0, 10.0)));
        assert!(path.contains(&Coordinate::new(10.0005, 10.0)));
        assert!(!path.contains(&Coordinate::new(10.01, 10.0)));
        assert!(!Path::default().contains(&Coordinate::new(10.0, 10.0)));
    }

    #[test]
    fn contains_across_antimeridian() {
        let path = Path::new(coords(&[(0.0, 170.0), (0.0, -170.0)]), 1000.0);

        assert!(path.contains(&Coordinate::new(0.0, 180.0)));
        assert!(path.contains(&Coordinate::new(0.0, -180.0)));
        assert!(path.contains(&Coordinate::new(0.0, 175.0)));
        assert!(path.contains(&Coordinate::new(0.0, -175.0)));
        assert!(!path.contains(&Coordinate::new(0.0, 0.0)));
        assert!(!path.contains(&Coordinate::new(0.0, 160.0)));
    }

    #[test]
    fn mutators() {
        let mut path = Path::new(coords(&[(0.0, 0.0), (1.0, 1.0)]), 10.0);

        path.add_coordinate(Coordinate::new(2.0, 2.0));
        path.add_coordinate(Coordinate::INVALID);
        assert_eq!(path.size(), 3);

        path.insert_coordinate(1, Coordinate::new(0.5, 0.5));
        assert_eq!(path.coordinate_at(1), Coordinate::new(0.5, 0.5));
        assert_eq!(path.size(), 4);

        path.replace_coordinate(0, Coordinate::new(-1.0, -1.0));
        path.replace_coordinate(0, Coordinate::INVALID);
        path.replace_coordinate(10, Coordinate::new(3.0, 3.0));
        assert_eq!(path.coordinate_at(0), Coordinate::new(-1.0, -1.0));
        assert!(!path.coordinate_at(10).is_valid());

        assert!(path.contains_coordinate(&Coordinate::new(2.0, 2.0)));
        path.remove_coordinate(&Coordinate::new(2.0, 2.0));
        assert!(!path.contains_coordinate(&Coordinate::new(2.0, 2.0)));

        path.remove_coordinate_at(0);
        assert_eq!(path.path(), coords(&[(0.5, 0.5), (1.0, 1.0)]));

        path.clear_path();
        assert_eq!(path.size(), 0);
        assert!(!path.is_valid());
    }

    #[test]
    fn bounding_rectangle_follows_mutations() {
        let mut path = Path::new(coords(&[(0.0, 0.0), (1.0, 1.0)]), 0.0);
        assert_eq!(path.bounding_rectangle().width(), 1.0);

        path.add_coordinate(Coordinate::new(5.0, 10.0));
        assert_eq!(
            path.bounding_rectangle(),
            Rectangle::new(Coordinate::new(5.0, 0.0), Coordinate::new(0.0, 10.0))
        );

        path.set_path(coords(&[(3.0, 3.0)]));
        assert_eq!(
            path.bounding_rectangle(),
            Rectangle::new(Coordinate::new(3.0, 3.0), Coordinate::new(3.0, 3.0))
        );
    }

    #[test]
    fn width() {
        let mut path = Path::new(vec![], 10.0);
        path.set_width(f64::NAN);
        path.set_width(-1.0);
        assert_eq!(path.width(), 10.0);
        path.set_width(0.0);
        assert_eq!(path.width(), 0.0);

        assert_eq!(Path::new(vec![], -5.0).width(), 0.0);
    }

    #[test]
    fn length() {
        let path = Path::new(coords(&[(0.0, 0.0), (0.0, 1.0), (0.0, 2.0)]), 0.0);
        let one_degree = Coordinate::new(0.0, 0.0).distance_to(&Coordinate::new(0.0, 1.0));

        assert_abs_diff_eq!(path.length(0, Some(2)), 2.0 * one_degree, epsilon = 1e-6);
        assert_abs_diff_eq!(path.length(1, Some(5)), one_degree, epsilon = 1e-6);
        assert_abs_diff_eq!(path.length(0, None), 4.0 * one_degree, epsilon = 1e-6);
    }

    #[test]
    fn translate() {
        let path = Path::new(coords(&[(10.0, 0.0), (80.0, 10.0)]), 0.0);
        let moved = path.translated(20.0, 175.0);

        assert_eq!(moved.path(), coords(&[(20.0, 175.0), (90.0, -175.0)]));
        assert_eq!(
            moved.bounding_rectangle(),
            Rectangle::new(Coordinate::new(90.0, 175.0), Coordinate::new(20.0, -175.0))
        );

        let moved = path.translated(-200.0, 0.0);
        assert_eq!(moved.path(), coords(&[(-90.0, 0.0), (-20.0, 10.0)]));

        let mut empty = Path::default();
        empty.translate(1.0, 1.0);
        assert!(empty.is_empty());
    }

    #[test]
    fn lazy_and_eager_agree() {
        let vertices = coords(&[(0.0, 160.0), (5.0, 175.0), (-3.0, -170.0)]);
        let mut lazy = Path::with_policy(vertices.clone(), 100.0, UpdatePolicy::Lazy);
        let mut eager = Path::with_policy(vertices, 100.0, UpdatePolicy::Eager);

        assert_eq!(lazy.cache_state(), CacheState::Dirty);
        assert_eq!(eager.cache_state(), CacheState::Clean);

        let steps: [&dyn Fn(&mut Path); 6] = [
            &|p: &mut Path| p.add_coordinate(Coordinate::new(8.0, -150.0)),
            &|p: &mut Path| p.translate(10.5, 20.0),
            &|p: &mut Path| p.add_coordinate(Coordinate::new(2.0, 150.0)),
            &|p: &mut Path| p.remove_coordinate_at(1),
            &|p: &mut Path| p.translate(-100.0, -40.5),
            &|p: &mut Path| p.insert_coordinate(0, Coordinate::new(1.0, 1.0)),
        ];

        for step in steps {
            step(&mut lazy);
            step(&mut eager);

            assert_eq!(lazy, eager);
            assert_eq!(lazy.bounding_rectangle(), eager.bounding_rectangle());
            assert_eq!(eager.cache_state(), CacheState::Clean);
            assert_eq!(lazy.cache_state(), CacheState::Clean);
        }
    }

    #[test]
    fn copies_are_independent() {
        let original = Path::new(coords(&[(0.0, 0.0), (1.0, 1.0)]), 5.0);
        original.bounding_rectangle();

        let mut copy = original.clone();
        copy.add_coordinate(Coordinate::new(10.0, 10.0));

        assert_eq!(original.size(), 2);
        assert_eq!(original.bounding_rectangle().height(), 1.0);
        assert_eq!(copy.bounding_rectangle().height(), 10.0);
    }

    #[test]
    fn equality_and_hash() {
        let a = Path::with_policy(coords(&[(0.0, 0.0), (1.0, 1.0)]), 5.0, UpdatePolicy::Lazy);
        let b = Path::with_policy(coords(&[(0.0, 0.0), (1.0, 1.0)]), 5.0, UpdatePolicy::Eager);
        assert_eq!(a, b);
        assert_eq!(seeded_hash(&a, 1), seeded_hash(&b, 1));

        assert_ne!(a, Path::new(coords(&[(0.0, 0.0), (1.0, 1.0)]), 6.0));
        assert_ne!(a, Path::new(coords(&[(1.0, 1.0), (0.0, 0.0)]), 5.0));
    }

    #[test]
    fn display() {
        let path = Path::new(coords(&[(0.0, 170.0), (0.5, -170.0)]), 0.0);
        assert_eq!(path.to_string(), "Path([ {0, 170}, {0.5, -170} ])");
    }

    #[test]
    fn serde_round_trip() {
        let path = Path::new(coords(&[(0.0, 170.0), (0.5, -170.0)]), 12.5);
        let json = serde_json::to_string(&path).expect("serialize");
        let restored: Path = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored, path);
        assert_eq!(restored.cache_state(), CacheState::Dirty);

        let eager = Path::with_policy(path.path().to_vec(), 12.5, UpdatePolicy::Eager);
        let json = serde_json::to_string(&eager).expect("serialize");
        let restored: Path = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored.update_policy(), UpdatePolicy::Eager);
        assert_eq!(restored.cache_state(), CacheState::Clean);

        let restored: Path = serde_json::from_str(r#"{"path":[],"width":1.0}"#).expect("deserialize");
        assert_eq!(restored.update_policy(), UpdatePolicy::Lazy);
    }

    #[test]
    fn invalid_vertices_are_skipped() {
        let path = Path::new(
            vec![Coordinate::INVALID, Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0)],
            0.0,
        );
        assert_eq!(path.size(), 2);
        assert!(!path.contains(&Coordinate::new(-45.0, 120.0)));

        let mut path = Path::default();
        path.set_path(vec![Coordinate::INVALID]);
        assert!(!path.is_valid());
        assert!(!path.contains(&Coordinate::new(-45.0, 120.0)));
    }
}
