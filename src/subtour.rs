//! Subtour detection over a selected edge set.
//!
//! # Algorithm
//!
//! Build the adjacency lists of the selected edges (neighbors sorted
//! ascending), then repeatedly start a depth-first traversal from the
//! lowest unvisited vertex. Each traversal yields one connected component;
//! the smallest component with at least two vertices is kept, ties going to
//! the first one found.
//!
//! If that component spans every vertex the selection is a single tour and
//! no cut exists. Otherwise it is a subtour `S`, and the subtour elimination
//! constraint
//!
//! ```text
//! sum(x[u][v] for u < v in S) <= |S| - 1
//! ```
//!
//! cuts it off.
//!
//! Isolated vertices are skipped: a one-vertex component has no internal
//! edge, so its constraint would be vacuous.
//!
//! # Complexity
//!
//! O(n + m log m) for n vertices and m selected edges (sorting adjacency).
//!
//! # Reference
//!
//! Dantzig, G., Fulkerson, R. & Johnson, S. (1954). "Solution of a
//! large-scale traveling-salesman problem", *Operations Research* 2(4),
//! 393-410.

use crate::models::Tour;

/// A connected component of the selected-edge graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    vertices: Vec<usize>,
    graph_size: usize,
}

impl Component {
    /// Vertices in traversal order. For a cycle this is the visiting order.
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    /// Number of vertices in the component.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always `false`: components hold at least two vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Returns `true` if the component spans every vertex of the graph.
    pub fn is_full_tour(&self) -> bool {
        self.vertices.len() >= self.graph_size
    }

    /// Right-hand side of the subtour elimination constraint, `|S| - 1`.
    pub fn cut_rhs(&self) -> f64 {
        (self.vertices.len() - 1) as f64
    }

    /// Consumes the component, returning its vertices.
    pub fn into_vertices(self) -> Vec<usize> {
        self.vertices
    }
}

/// Finds the smallest connected component (of at least two vertices)
/// induced by the selected edges.
///
/// Returns `None` when no edge is selected. Edges with an endpoint outside
/// `0..size`, and self-loops, are ignored.
///
/// # Examples
///
/// ```
/// use u_kstsp::subtour::smallest_component;
///
/// // Two disjoint triangles on six vertices.
/// let edges = [(0, 1), (1, 2), (0, 2), (3, 4), (4, 5), (3, 5)];
/// let component = smallest_component(6, &edges).unwrap();
/// assert_eq!(component.vertices(), &[0, 1, 2]);
/// assert!(!component.is_full_tour());
/// assert_eq!(component.cut_rhs(), 2.0);
/// ```
pub fn smallest_component(size: usize, selected: &[(usize, usize)]) -> Option<Component> {
    let adjacency = adjacency(size, selected);
    let mut visited = vec![false; size];
    let mut best: Option<Vec<usize>> = None;

    for start in 0..size {
        if visited[start] || adjacency[start].is_empty() {
            continue;
        }
        let component = traverse(start, &adjacency, &mut visited);
        if best.as_ref().map_or(true, |b| component.len() < b.len()) {
            best = Some(component);
        }
    }

    best.map(|vertices| Component {
        vertices,
        graph_size: size,
    })
}

/// Returns the smallest subtour, or `None` if the selection contains no
/// component smaller than the whole graph.
///
/// # Examples
///
/// ```
/// use u_kstsp::subtour::find_subtour;
///
/// let tour = [(0, 1), (1, 2), (2, 3), (0, 3)];
/// assert_eq!(find_subtour(4, &tour), None);
///
/// let split = [(0, 1), (2, 3), (3, 4), (2, 4)];
/// assert_eq!(find_subtour(5, &split), Some(vec![0, 1]));
/// ```
pub fn find_subtour(size: usize, selected: &[(usize, usize)]) -> Option<Vec<usize>> {
    smallest_component(size, selected)
        .filter(|c| !c.is_full_tour())
        .map(Component::into_vertices)
}

/// Reads a Hamiltonian cycle off the selected edges.
///
/// Returns `None` unless every vertex has exactly two selected edges and
/// they form one connected cycle over all `size` vertices.
pub fn tour_from_edges(size: usize, selected: &[(usize, usize)]) -> Option<Tour> {
    let adjacency = adjacency(size, selected);
    if size < 3 || adjacency.iter().any(|nbrs| nbrs.len() != 2) {
        return None;
    }
    let mut visited = vec![false; size];
    let vertices = traverse(0, &adjacency, &mut visited);
    if vertices.len() == size {
        Some(Tour::new(vertices))
    } else {
        None
    }
}

fn adjacency(size: usize, selected: &[(usize, usize)]) -> Vec<Vec<usize>> {
    let mut adjacency = vec![Vec::new(); size];
    for &(u, v) in selected {
        if u == v || u >= size || v >= size {
            continue;
        }
        adjacency[u].push(v);
        adjacency[v].push(u);
    }
    for nbrs in &mut adjacency {
        nbrs.sort_unstable();
        nbrs.dedup();
    }
    adjacency
}

/// Depth-first traversal from `start`; lower-numbered neighbors first.
fn traverse(start: usize, adjacency: &[Vec<usize>], visited: &mut [bool]) -> Vec<usize> {
    let mut component = Vec::new();
    let mut stack = vec![start];
    visited[start] = true;

    while let Some(u) = stack.pop() {
        component.push(u);
        for &v in adjacency[u].iter().rev() {
            if !visited[v] {
                visited[v] = true;
                stack.push(v);
            }
        }
    }
    component
}
