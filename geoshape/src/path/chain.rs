use std::sync::OnceLock;

use log::trace;

use crate::coordinate::wrap_longitude;
use crate::path::bounds::{CacheState, PathBounds, UpdatePolicy};
use crate::{Coordinate, Rectangle};

/// Ordered list of vertices with a cached bounding box. Shared by paths and polygons.
#[derive(Debug, Clone, Default)]
pub(crate) struct VertexChain {
    vertices: Vec<Coordinate>,
    policy: UpdatePolicy,
    bounds: OnceLock<PathBounds>,
}

impl VertexChain {
    /// Invalid coordinates are dropped.
    pub fn new(mut vertices: Vec<Coordinate>, policy: UpdatePolicy) -> Self {
        vertices.retain(Coordinate::is_valid);
        let mut chain = Self {
            vertices,
            policy,
            bounds: OnceLock::new(),
        };
        chain.invalidate();
        chain
    }

    pub fn vertices(&self) -> &[Coordinate] {
        &self.vertices
    }

    pub fn policy(&self) -> UpdatePolicy {
        self.policy
    }

    pub fn cache_state(&self) -> CacheState {
        match self.bounds.get() {
            Some(_) => CacheState::Clean,
            None => CacheState::Dirty,
        }
    }

    pub fn bounds(&self) -> &PathBounds {
        self.bounds.get_or_init(|| {
            trace!("Computing bounds of {} vertices", self.vertices.len());
            PathBounds::compute(&self.vertices)
        })
    }

    pub fn bounding_rectangle(&self) -> Rectangle {
        self.bounds().rectangle()
    }

    /// Drops the cached bounds, or recomputes them right away for the eager policy.
    fn invalidate(&mut self) {
        self.bounds = match self.policy {
            UpdatePolicy::Lazy => OnceLock::new(),
            UpdatePolicy::Eager => OnceLock::from(PathBounds::compute(&self.vertices)),
        };
    }

    /// Invalid coordinates are dropped.
    pub fn set_vertices(&mut self, mut vertices: Vec<Coordinate>) {
        vertices.retain(Coordinate::is_valid);
        self.vertices = vertices;
        self.invalidate();
    }

    pub fn push(&mut self, coordinate: Coordinate) {
        if !coordinate.is_valid() {
            return;
        }

        self.vertices.push(coordinate);
        match self.policy {
            UpdatePolicy::Lazy => self.bounds = OnceLock::new(),
            UpdatePolicy::Eager => match self.bounds.get_mut() {
                Some(bounds) => bounds.append(&self.vertices),
                None => self.invalidate(),
            },
        }
    }

    pub fn insert(&mut self, index: usize, coordinate: Coordinate) -> bool {
        if !coordinate.is_valid() || index > self.vertices.len() {
            return false;
        }

        self.vertices.insert(index, coordinate);
        self.invalidate();
        true
    }

    pub fn replace(&mut self, index: usize, coordinate: Coordinate) -> bool {
        if !coordinate.is_valid() || index >= self.vertices.len() {
            return false;
        }

        self.vertices[index] = coordinate;
        self.invalidate();
        true
    }

    pub fn remove(&mut self, coordinate: &Coordinate) -> bool {
        match self.vertices.iter().rposition(|v| v == coordinate) {
            Some(index) => self.remove_at(index),
            None => false,
        }
    }

    pub fn remove_at(&mut self, index: usize) -> bool {
        if index >= self.vertices.len() {
            return false;
        }

        self.vertices.remove(index);
        self.invalidate();
        true
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.invalidate();
    }

    /// Latitude offset limited so that no vertex passes a pole.
    pub fn clamp_latitude_offset(&self, d_lat: f64) -> f64 {
        let bounds = self.bounds();
        if d_lat > 0.0 {
            d_lat.min(90.0 - bounds.max_latitude())
        } else {
            d_lat.max(-90.0 - bounds.min_latitude())
        }
    }

    /// Moves every vertex by the given offsets. The latitude offset must be already clamped.
    pub fn shift(&mut self, d_lat: f64, d_lon: f64) {
        shift_vertices(&mut self.vertices, d_lat, d_lon);

        match self.policy {
            UpdatePolicy::Lazy => self.bounds = OnceLock::new(),
            UpdatePolicy::Eager => match self.bounds.get_mut() {
                Some(bounds) => bounds.translate(d_lat, d_lon),
                None => self.invalidate(),
            },
        }
    }

    /// Sum of the great-circle distances between consecutive vertices from `from` to `to`.
    ///
    /// `None` as `to` means the last vertex and the closing edge back to the first vertex. Indices past the end are
    /// clamped to the last vertex.
    pub fn length(&self, from: usize, to: Option<usize>) -> f64 {
        let Some(last) = self.vertices.len().checked_sub(1) else {
            return 0.0;
        };

        let wrap = to.is_none();
        let to = to.unwrap_or(last).min(last);
        if from > to {
            return 0.0;
        }

        let mut length: f64 = self.vertices[from..=to]
            .windows(2)
            .map(|edge| edge[0].distance_to(&edge[1]))
            .sum();

        if wrap {
            length += self.vertices[last].distance_to(&self.vertices[0]);
        }

        length
    }
}

/// Moves the vertices by the given offsets, wrapping longitudes. Latitudes stay within the valid range.
pub(crate) fn shift_vertices(vertices: &mut [Coordinate], d_lat: f64, d_lon: f64) {
    for vertex in vertices {
        let lat = (vertex.latitude() + d_lat).clamp(-90.0, 90.0);
        let lon = wrap_longitude(vertex.longitude() + d_lon);
        *vertex = Coordinate::new_3d(lat, lon, vertex.altitude());
    }
}

impl PartialEq for VertexChain {
    fn eq(&self, other: &Self) -> bool {
        self.vertices == other.vertices
    }
}

impl Eq for VertexChain {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn chain(policy: UpdatePolicy) -> VertexChain {
        VertexChain::new(
            vec![
                Coordinate::new(0.0, 0.0),
                Coordinate::new(0.0, 1.0),
                Coordinate::new(1.0, 1.0),
            ],
            policy,
        )
    }

    #[test]
    fn lazy_cache_state() {
        let mut chain = chain(UpdatePolicy::Lazy);
        assert_eq!(chain.cache_state(), CacheState::Dirty);

        chain.bounding_rectangle();
        assert_eq!(chain.cache_state(), CacheState::Clean);

        chain.push(Coordinate::new(2.0, 2.0));
        assert_eq!(chain.cache_state(), CacheState::Dirty);
    }

    #[test]
    fn eager_cache_state() {
        let mut chain = chain(UpdatePolicy::Eager);
        assert_eq!(chain.cache_state(), CacheState::Clean);

        chain.push(Coordinate::new(2.0, 2.0));
        assert_eq!(chain.cache_state(), CacheState::Clean);
        chain.remove_at(0);
        assert_eq!(chain.cache_state(), CacheState::Clean);
        chain.shift(1.0, 1.0);
        assert_eq!(chain.cache_state(), CacheState::Clean);
    }

    #[test]
    fn invalid_vertices_are_ignored() {
        let mut chain = chain(UpdatePolicy::Lazy);
        chain.push(Coordinate::INVALID);
        assert!(!chain.insert(0, Coordinate::INVALID));
        assert!(!chain.replace(0, Coordinate::INVALID));
        assert!(!chain.insert(10, Coordinate::new(0.0, 0.0)));
        assert!(!chain.remove_at(3));
        assert_eq!(chain.vertices().len(), 3);
    }

    #[test]
    fn invalid_vertices_are_dropped_on_construction() {
        let mut chain = VertexChain::new(
            vec![Coordinate::INVALID, Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0)],
            UpdatePolicy::Eager,
        );
        assert_eq!(chain.vertices(), &[Coordinate::new(0.0, 0.0), Coordinate::new(0.0, 1.0)]);

        chain.set_vertices(vec![Coordinate::new(1.0, 1.0), Coordinate::new(95.0, 0.0)]);
        assert_eq!(chain.vertices(), &[Coordinate::new(1.0, 1.0)]);
    }

    #[test]
    fn remove_last_occurrence() {
        let mut chain = VertexChain::new(
            vec![
                Coordinate::new(0.0, 0.0),
                Coordinate::new(1.0, 1.0),
                Coordinate::new(0.0, 0.0),
                Coordinate::new(2.0, 2.0),
            ],
            UpdatePolicy::Lazy,
        );
        assert!(chain.remove(&Coordinate::new(0.0, 0.0)));
        assert_eq!(
            chain.vertices(),
            [
                Coordinate::new(0.0, 0.0),
                Coordinate::new(1.0, 1.0),
                Coordinate::new(2.0, 2.0)
            ]
        );
        assert!(!chain.remove(&Coordinate::new(5.0, 5.0)));
    }

    #[test]
    fn length() {
        let chain = chain(UpdatePolicy::Lazy);
        let one_degree = Coordinate::new(0.0, 0.0).distance_to(&Coordinate::new(0.0, 1.0));

        assert_eq!(chain.length(0, Some(1)), one_degree);
        assert_abs_diff_eq!(chain.length(0, Some(2)), 2.0 * one_degree, epsilon = 1e-6);
        assert_eq!(chain.length(0, Some(100)), chain.length(0, Some(2)));
        assert_eq!(chain.length(2, Some(1)), 0.0);

        let closing = Coordinate::new(1.0, 1.0).distance_to(&Coordinate::new(0.0, 0.0));
        assert_abs_diff_eq!(
            chain.length(0, None),
            chain.length(0, Some(2)) + closing,
            epsilon = 1e-6
        );
        assert_eq!(VertexChain::default().length(0, None), 0.0);
    }

    #[test]
    fn clamp_latitude_offset() {
        let chain = chain(UpdatePolicy::Lazy);
        assert_eq!(chain.clamp_latitude_offset(100.0), 89.0);
        assert_eq!(chain.clamp_latitude_offset(-100.0), -90.0);
        assert_eq!(chain.clamp_latitude_offset(5.0), 5.0);
    }
}
