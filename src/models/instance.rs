//! Two-instance problem input.

use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{DualPoint, Point, Side};
use crate::distance::DistanceMatrix;
use crate::error::{Error, Result};

/// Vertices of a k-similar two-instance TSP, indexed by input order.
///
/// Each line of the text format holds four whitespace-separated integers
/// `x1 y1 x2 y2`: the vertex coordinates in the first and in the second
/// instance.
///
/// # Examples
///
/// ```
/// use u_kstsp::models::{Instance, Point, Side};
///
/// let instance = Instance::parse("0 0 5 5\n3 4 5 9\n").unwrap();
/// assert_eq!(instance.len(), 2);
/// assert_eq!(instance.point(1, Side::Second), Point::new(5, 9));
/// assert_eq!(instance.distance(Side::First, 0, 1), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instance {
    vertices: Vec<DualPoint>,
}

impl Instance {
    /// Creates an instance from an explicit vertex list.
    pub fn new(vertices: Vec<DualPoint>) -> Self {
        Self { vertices }
    }

    /// Parses the four-integers-per-line text format. Blank lines are skipped.
    pub fn parse(text: &str) -> Result<Self> {
        let mut vertices = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let values = line
                .split_whitespace()
                .map(|token| {
                    token.parse::<i64>().map_err(|e| {
                        Error::invalid_input(format!("line {}: {token:?}: {e}", lineno + 1))
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            let [x1, y1, x2, y2] = values[..] else {
                return Err(Error::invalid_input(format!(
                    "line {}: expected 4 integers, found {}",
                    lineno + 1,
                    values.len()
                )));
            };
            vertices.push(DualPoint::new(Point::new(x1, y1), Point::new(x2, y2)));
        }
        Ok(Self { vertices })
    }

    /// Reads and parses a coordinate file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Generates `n` vertices with coordinates uniform in `[0, max_coord]`.
    pub fn random(n: usize, max_coord: i64, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let max_coord = max_coord.max(0);
        let vertices = (0..n)
            .map(|_| {
                let first = Point::new(
                    rng.random_range(0..=max_coord),
                    rng.random_range(0..=max_coord),
                );
                let second = Point::new(
                    rng.random_range(0..=max_coord),
                    rng.random_range(0..=max_coord),
                );
                DualPoint::new(first, second)
            })
            .collect();
        Self { vertices }
    }

    /// Keeps only the first `n` vertices.
    pub fn truncate(mut self, n: usize) -> Self {
        self.vertices.truncate(n);
        self
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns `true` if the instance has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// All vertices in index order.
    pub fn vertices(&self) -> &[DualPoint] {
        &self.vertices
    }

    /// Coordinates of `vertex` in the given instance.
    pub fn point(&self, vertex: usize, side: Side) -> Point {
        self.vertices[vertex].get(side)
    }

    /// All coordinates of one instance, in index order.
    pub fn points(&self, side: Side) -> Vec<Point> {
        self.vertices.iter().map(|v| v.get(side)).collect()
    }

    /// Rounded-up Euclidean distance between two vertices in one instance.
    pub fn distance(&self, side: Side, u: usize, v: usize) -> u64 {
        self.point(u, side).distance_to(&self.point(v, side))
    }

    /// Distance matrix of one instance.
    pub fn distance_matrix(&self, side: Side) -> DistanceMatrix {
        DistanceMatrix::from_points(&self.points(side))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let instance = Instance::parse("1 2 3 4\n  5 6 7 8  \n").expect("valid");
        assert_eq!(instance.len(), 2);
        assert_eq!(instance.point(0, Side::First), Point::new(1, 2));
        assert_eq!(instance.point(0, Side::Second), Point::new(3, 4));
        assert_eq!(instance.point(1, Side::First), Point::new(5, 6));
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let instance = Instance::parse("\n1 2 3 4\n\n5 6 7 8\n\n").expect("valid");
        assert_eq!(instance.len(), 2);
    }

    #[test]
    fn test_parse_wrong_arity() {
        let err = Instance::parse("1 2 3\n").unwrap_err();
        assert!(err.to_string().contains("expected 4 integers"));
    }

    #[test]
    fn test_parse_non_integer() {
        let err = Instance::parse("1 2 3 x\n").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_truncate() {
        let instance = Instance::random(10, 100, 7).truncate(4);
        assert_eq!(instance.len(), 4);
        let unchanged = Instance::random(3, 100, 7).truncate(10);
        assert_eq!(unchanged.len(), 3);
    }

    #[test]
    fn test_random_is_seeded() {
        let a = Instance::random(8, 50, 42);
        let b = Instance::random(8, 50, 42);
        assert_eq!(a, b);
        for v in a.vertices() {
            for side in Side::BOTH {
                let p = v.get(side);
                assert!((0..=50).contains(&p.x()));
                assert!((0..=50).contains(&p.y()));
            }
        }
    }

    #[test]
    fn test_distance_per_side() {
        let instance = Instance::parse("0 0 0 0\n3 4 6 8\n").expect("valid");
        assert_eq!(instance.distance(Side::First, 0, 1), 5);
        assert_eq!(instance.distance(Side::Second, 1, 0), 10);
    }

    #[test]
    fn test_from_file_missing() {
        let err = Instance::from_file("/nonexistent/coords.txt").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
