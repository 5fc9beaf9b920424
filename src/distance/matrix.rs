//! Dense distance matrix.

use crate::models::Point;

/// A dense n×n edge-cost matrix stored in row-major order.
///
/// Costs built from points are Euclidean lengths rounded up to the next
/// integer, so every tour length is integral.
///
/// # Examples
///
/// ```
/// use u_kstsp::models::Point;
/// use u_kstsp::distance::DistanceMatrix;
///
/// let points = vec![Point::new(0, 0), Point::new(3, 4), Point::new(1, 1)];
/// let dm = DistanceMatrix::from_points(&points);
/// assert_eq!(dm.get(0, 1), 5.0);
/// assert_eq!(dm.get(0, 2), 2.0);
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    costs: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// An all-zero matrix over `size` vertices.
    pub fn new(size: usize) -> Self {
        Self {
            costs: vec![0.0; size * size],
            size,
        }
    }

    /// Symmetric matrix with `cost(u, v)` computed once per pair `u < v`.
    pub fn from_fn<F>(size: usize, mut cost: F) -> Self
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut dm = Self::new(size);
        for u in 0..size {
            for v in (u + 1)..size {
                let c = cost(u, v);
                dm.costs[u * size + v] = c;
                dm.costs[v * size + u] = c;
            }
        }
        dm
    }

    /// Rounded-up Euclidean distances between points.
    pub fn from_points(points: &[Point]) -> Self {
        Self::from_fn(points.len(), |u, v| points[u].distance_to(&points[v]) as f64)
    }

    /// Entry-wise sum of two matrices, or `None` if their sizes differ.
    ///
    /// Summing both instances' distances prices an edge by what it costs
    /// when both tours use it.
    pub fn sum(a: &DistanceMatrix, b: &DistanceMatrix) -> Option<Self> {
        if a.size != b.size {
            return None;
        }
        let costs = a.costs.iter().zip(&b.costs).map(|(x, y)| x + y).collect();
        Some(Self {
            costs,
            size: a.size,
        })
    }

    /// Cost of the edge from `u` to `v`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, u: usize, v: usize) -> f64 {
        self.costs[u * self.size + v]
    }

    /// Number of vertices.
    pub fn size(&self) -> usize {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_points() -> Vec<Point> {
        vec![Point::new(0, 0), Point::new(3, 4), Point::new(0, 8)]
    }

    #[test]
    fn test_from_points() {
        let dm = DistanceMatrix::from_points(&sample_points());
        assert_eq!(dm.size(), 3);
        assert_eq!(dm.get(0, 1), 5.0);
        assert_eq!(dm.get(2, 0), 8.0);
        assert_eq!(dm.get(0, 0), 0.0);
        assert_eq!(dm.get(1, 2), 5.0);
    }

    #[test]
    fn test_rounding_up() {
        let dm = DistanceMatrix::from_points(&[Point::new(0, 0), Point::new(2, 3)]);
        // sqrt(13) = 3.60..
        assert_eq!(dm.get(0, 1), 4.0);
    }

    #[test]
    fn test_from_fn_is_symmetric() {
        let dm = DistanceMatrix::from_fn(4, |u, v| (10 * u + v) as f64);
        assert_eq!(dm.get(1, 3), 13.0);
        assert_eq!(dm.get(3, 1), 13.0);
        assert_eq!(dm.get(2, 2), 0.0);
    }

    #[test]
    fn test_sum() {
        let a = DistanceMatrix::from_points(&sample_points());
        let b = DistanceMatrix::from_fn(3, |_, _| 1.0);
        let s = DistanceMatrix::sum(&a, &b).expect("same size");
        assert_eq!(s.get(0, 1), 6.0);
        assert_eq!(s.get(1, 1), 0.0);
        assert!(DistanceMatrix::sum(&a, &DistanceMatrix::new(2)).is_none());
    }
}
