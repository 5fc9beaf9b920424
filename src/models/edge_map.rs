//! Symmetric edge map over a complete undirected graph.

/// Canonical `(min, max)` ordering of an undirected vertex pair.
pub fn canonical(u: usize, v: usize) -> (usize, usize) {
    if u < v {
        (u, v)
    } else {
        (v, u)
    }
}

/// Iterates over every unordered pair `(u, v)` with `u < v < size`.
///
/// Pairs come out in the storage order of [`EdgeMap`]: grouped by the larger
/// endpoint, then by the smaller one.
pub fn pairs(size: usize) -> impl Iterator<Item = (usize, usize)> {
    (1..size).flat_map(|v| (0..v).map(move |u| (u, v)))
}

/// Number of unordered pairs over `size` vertices.
pub fn pair_count(size: usize) -> usize {
    size * size.saturating_sub(1) / 2
}

/// One value per unordered vertex pair, stored once under the canonical key.
///
/// Lookups accept either orientation: `get(u, v)` and `get(v, u)` address
/// the same slot.
///
/// # Examples
///
/// ```
/// use u_kstsp::models::EdgeMap;
///
/// let mut map = EdgeMap::from_fn(4, |u, v| u + v);
/// assert_eq!(map.len(), 6);
/// assert_eq!(*map.get(1, 3), 4);
/// assert_eq!(*map.get(3, 1), 4);
///
/// *map.get_mut(3, 1) = 10;
/// assert_eq!(*map.get(1, 3), 10);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeMap<T> {
    size: usize,
    data: Vec<T>,
}

impl<T> EdgeMap<T> {
    /// Builds a map over `size` vertices, computing each value from its
    /// canonical pair.
    pub fn from_fn<F>(size: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> T,
    {
        let data = pairs(size).map(|(u, v)| f(u, v)).collect();
        Self { size, data }
    }

    /// Number of vertices.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of stored pairs.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if no pair is stored (fewer than two vertices).
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Value stored for the pair, in either orientation.
    ///
    /// # Panics
    ///
    /// Panics if `u == v` or either index is out of bounds.
    pub fn get(&self, u: usize, v: usize) -> &T {
        &self.data[self.index(u, v)]
    }

    /// Mutable value stored for the pair, in either orientation.
    ///
    /// # Panics
    ///
    /// Panics if `u == v` or either index is out of bounds.
    pub fn get_mut(&mut self, u: usize, v: usize) -> &mut T {
        let idx = self.index(u, v);
        &mut self.data[idx]
    }

    /// Iterates over `((u, v), value)` with `u < v`, in storage order.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &T)> {
        pairs(self.size).zip(self.data.iter())
    }

    /// Iterates over the stored values in storage order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Mutable iteration over the stored values in storage order.
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.data.iter_mut()
    }

    /// Builds a new map by transforming every value.
    pub fn map<U, F>(&self, mut f: F) -> EdgeMap<U>
    where
        F: FnMut((usize, usize), &T) -> U,
    {
        EdgeMap {
            size: self.size,
            data: self.iter().map(|(uv, value)| f(uv, value)).collect(),
        }
    }

    fn index(&self, u: usize, v: usize) -> usize {
        assert!(u != v, "self-loop ({u}, {u}) has no edge");
        assert!(
            u < self.size && v < self.size,
            "pair ({u}, {v}) out of bounds for {} vertices",
            self.size
        );
        let (a, b) = canonical(u, v);
        b * (b - 1) / 2 + a
    }
}

impl<T: Clone> EdgeMap<T> {
    /// Builds a map with every pair set to `value`.
    pub fn filled(size: usize, value: T) -> Self {
        Self {
            size,
            data: vec![value; pair_count(size)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical() {
        assert_eq!(canonical(3, 1), (1, 3));
        assert_eq!(canonical(1, 3), (1, 3));
    }

    #[test]
    fn test_pairs_cover_all() {
        let all: Vec<_> = pairs(4).collect();
        assert_eq!(all.len(), pair_count(4));
        assert_eq!(all, vec![(0, 1), (0, 2), (1, 2), (0, 3), (1, 3), (2, 3)]);
    }

    #[test]
    fn test_pair_count_small() {
        assert_eq!(pair_count(0), 0);
        assert_eq!(pair_count(1), 0);
        assert_eq!(pair_count(2), 1);
        assert_eq!(pair_count(5), 10);
    }

    #[test]
    fn test_symmetric_lookup() {
        let map = EdgeMap::from_fn(5, |u, v| (u, v));
        for (u, v) in pairs(5) {
            assert_eq!(*map.get(u, v), (u, v));
            assert_eq!(*map.get(v, u), (u, v));
        }
    }

    #[test]
    fn test_iter_matches_storage() {
        let map = EdgeMap::from_fn(4, |u, v| u * 10 + v);
        for ((u, v), value) in map.iter() {
            assert!(u < v);
            assert_eq!(*value, u * 10 + v);
        }
    }

    #[test]
    fn test_filled_and_map() {
        let map = EdgeMap::filled(3, 1.5_f64);
        assert_eq!(map.len(), 3);
        let doubled = map.map(|_, &x| x * 2.0);
        assert!(doubled.values().all(|&x| (x - 3.0).abs() < 1e-12));
    }

    #[test]
    fn test_empty_map() {
        let map: EdgeMap<u8> = EdgeMap::filled(1, 0);
        assert!(map.is_empty());
        assert_eq!(map.iter().count(), 0);
    }

    #[test]
    #[should_panic(expected = "self-loop")]
    fn test_self_loop_panics() {
        let map = EdgeMap::filled(3, 0);
        let _ = map.get(1, 1);
    }
}
