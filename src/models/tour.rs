//! Tour type.

use serde::{Deserialize, Serialize};

use crate::distance::DistanceMatrix;

/// A closed tour: vertices in visiting order, returning to the first one.
///
/// # Examples
///
/// ```
/// use u_kstsp::models::Tour;
///
/// let tour = Tour::new(vec![0, 1, 2, 3]);
/// assert_eq!(tour.len(), 4);
/// let edges: Vec<_> = tour.edges().collect();
/// assert_eq!(edges, vec![(0, 1), (1, 2), (2, 3), (0, 3)]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tour {
    vertices: Vec<usize>,
}

impl Tour {
    /// Creates a tour from vertices in visiting order.
    pub fn new(vertices: Vec<usize>) -> Self {
        Self { vertices }
    }

    /// Vertices in visiting order.
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    /// Number of vertices visited.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns `true` if the tour visits no vertex.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Edges of the closed tour as canonical `(min, max)` pairs, including
    /// the closing edge back to the start.
    ///
    /// Tours with fewer than two vertices have no edges.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let n = self.vertices.len();
        let count = if n < 2 { 0 } else { n };
        (0..count).map(move |i| {
            let u = self.vertices[i];
            let v = self.vertices[(i + 1) % n];
            if u < v {
                (u, v)
            } else {
                (v, u)
            }
        })
    }

    /// Total length of the closed tour under the given distances.
    pub fn cost(&self, distances: &DistanceMatrix) -> f64 {
        self.edges().map(|(u, v)| distances.get(u, v)).sum()
    }

    /// Number of edges this tour shares with another one.
    pub fn shared_edges(&self, other: &Tour) -> usize {
        let mut mine: Vec<_> = self.edges().collect();
        mine.sort_unstable();
        other
            .edges()
            .filter(|e| mine.binary_search(e).is_ok())
            .count()
    }
}
