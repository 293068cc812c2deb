//! Bounding box of a vertex chain and the state of its cache.

use serde::{Deserialize, Serialize};

use crate::coordinate::wrap_longitude;
use crate::{Coordinate, Rectangle};

/// When the derived state of a [`Path`](crate::Path) or a [`Polygon`](crate::Polygon) is recomputed.
///
/// Both policies give the same results, they differ only in when the cost is paid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpdatePolicy {
    /// Mutations only invalidate the cache, the next query recomputes it.
    #[default]
    Lazy,
    /// Every mutation updates the cache, incrementally where possible.
    Eager,
}

/// State of the derived data of a [`Path`](crate::Path) or a [`Polygon`](crate::Polygon).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheState {
    /// The vertices changed since the cache was last computed.
    Dirty,
    /// The cache corresponds to the current vertices.
    Clean,
}

/// Bounding box of a vertex chain together with the data needed to update it incrementally.
///
/// Longitudes are accumulated edge by edge taking the short way around the globe, so the box is correct for chains
/// crossing the antimeridian.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PathBounds {
    /// Accumulated longitude offset of each vertex from the first one.
    delta_xs: Vec<f64>,
    min_x: f64,
    max_x: f64,
    /// Longitudes of the vertices with the smallest and largest offsets.
    west: f64,
    east: f64,
    min_lat: f64,
    max_lat: f64,
}

impl PathBounds {
    /// Computes the bounds of the `vertices` from scratch.
    pub fn compute(vertices: &[Coordinate]) -> Self {
        let Some(first) = vertices.first() else {
            return Self::empty();
        };

        let mut bounds = Self {
            delta_xs: Vec::with_capacity(vertices.len()),
            min_x: 0.0,
            max_x: 0.0,
            west: first.longitude(),
            east: first.longitude(),
            min_lat: first.latitude(),
            max_lat: first.latitude(),
        };
        bounds.delta_xs.push(0.0);

        for edge in vertices.windows(2) {
            bounds.push_edge(&edge[0], &edge[1]);
        }

        bounds
    }

    fn empty() -> Self {
        Self {
            delta_xs: Vec::new(),
            min_x: f64::INFINITY,
            max_x: f64::NEG_INFINITY,
            west: f64::NAN,
            east: f64::NAN,
            min_lat: f64::NAN,
            max_lat: f64::NAN,
        }
    }

    /// Updates the bounds after `vertices` got a new last vertex.
    ///
    /// Falls back to a full recompute if the bounds were not computed for all the vertices but the last one.
    pub fn append(&mut self, vertices: &[Coordinate]) {
        match vertices {
            [.., from, to] if self.delta_xs.len() + 1 == vertices.len() => self.push_edge(from, to),
            _ => *self = Self::compute(vertices),
        }
    }

    fn push_edge(&mut self, from: &Coordinate, to: &Coordinate) {
        let lon_from = from.longitude();
        let mut lon_to = to.longitude();
        if (lon_to - lon_from).abs() > 180.0 {
            if lon_to > 0.0 {
                lon_to -= 360.0;
            } else {
                lon_to += 360.0;
            }
        }

        let last = self.delta_xs.last().copied().unwrap_or(0.0);
        let delta_x = last + lon_to - lon_from;
        self.delta_xs.push(delta_x);

        if delta_x < self.min_x {
            self.min_x = delta_x;
            self.west = to.longitude();
        }
        if delta_x > self.max_x {
            self.max_x = delta_x;
            self.east = to.longitude();
        }

        self.min_lat = self.min_lat.min(to.latitude());
        self.max_lat = self.max_lat.max(to.latitude());
    }

    /// Shifts the bounds together with all the vertices of the chain.
    pub fn translate(&mut self, d_lat: f64, d_lon: f64) {
        self.min_lat += d_lat;
        self.max_lat += d_lat;
        self.west = wrap_longitude(self.west + d_lon);
        self.east = wrap_longitude(self.east + d_lon);
    }

    /// Smallest latitude of the chain. NaN for an empty chain.
    pub fn min_latitude(&self) -> f64 {
        self.min_lat
    }

    /// Largest latitude of the chain. NaN for an empty chain.
    pub fn max_latitude(&self) -> f64 {
        self.max_lat
    }

    /// Bounding rectangle of the chain. Invalid for an empty chain.
    ///
    /// A chain winding around the globe gets a rectangle spanning all longitudes.
    pub fn rectangle(&self) -> Rectangle {
        if self.delta_xs.is_empty() {
            return Rectangle::default();
        }

        if self.max_x - self.min_x > 360.0 {
            Rectangle::full_width(self.max_lat, self.min_lat)
        } else {
            Rectangle::new(
                Coordinate::new(self.max_lat, self.west),
                Coordinate::new(self.min_lat, self.east),
            )
        }
    }
}
