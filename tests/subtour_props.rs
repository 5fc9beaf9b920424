//! Property tests for subtour detection.

use proptest::prelude::*;

use u_kstsp::models::canonical;
use u_kstsp::subtour::{find_subtour, smallest_component, tour_from_edges};

/// Edges of the closed cycle visiting `order`.
fn cycle_edges(order: &[usize]) -> Vec<(usize, usize)> {
    let n = order.len();
    (0..n)
        .map(|i| canonical(order[i], order[(i + 1) % n]))
        .collect()
}

/// A random Hamiltonian cycle on 3..12 vertices.
fn hamiltonian() -> impl Strategy<Value = Vec<usize>> {
    (3usize..12).prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle())
}

/// Cycle sizes and a vertex order; consecutive chunks of the order form
/// the disjoint cycles.
fn disjoint_cycles() -> impl Strategy<Value = (Vec<usize>, Vec<usize>)> {
    prop::collection::vec(3usize..7, 2..5).prop_flat_map(|sizes| {
        let n = sizes.iter().sum::<usize>();
        (Just(sizes), Just((0..n).collect::<Vec<_>>()).prop_shuffle())
    })
}

fn split<'a>(sizes: &[usize], order: &'a [usize]) -> Vec<&'a [usize]> {
    let mut chunks = Vec::new();
    let mut rest = order;
    for &size in sizes {
        let (head, tail) = rest.split_at(size);
        chunks.push(head);
        rest = tail;
    }
    chunks
}

proptest! {
    #[test]
    fn prop_single_cycle_has_no_cut(order in hamiltonian()) {
        let n = order.len();
        let edges = cycle_edges(&order);

        let component = smallest_component(n, &edges).expect("edges selected");
        prop_assert!(component.is_full_tour());
        prop_assert_eq!(component.len(), n);
        prop_assert_eq!(find_subtour(n, &edges), None);

        let tour = tour_from_edges(n, &edges).expect("hamiltonian");
        prop_assert_eq!(tour.len(), n);
        let mut walked: Vec<_> = tour.edges().collect();
        let mut given = edges.clone();
        walked.sort_unstable();
        given.sort_unstable();
        prop_assert_eq!(walked, given);
    }

    #[test]
    fn prop_disjoint_cycles_yield_smallest((sizes, order) in disjoint_cycles()) {
        let n = order.len();
        let chunks = split(&sizes, &order);
        let edges: Vec<_> = chunks.iter().flat_map(|c| cycle_edges(c)).collect();

        let smallest = *sizes.iter().min().expect("non-empty");
        // Components are discovered from their lowest vertex upward.
        let expected = chunks
            .iter()
            .filter(|c| c.len() == smallest)
            .min_by_key(|c| c.iter().min().copied())
            .expect("some chunk has the smallest size");

        let component = smallest_component(n, &edges).expect("edges selected");
        prop_assert!(!component.is_full_tour());
        prop_assert_eq!(component.len(), smallest);
        prop_assert_eq!(component.cut_rhs(), (smallest - 1) as f64);

        let mut found = component.vertices().to_vec();
        let mut want = expected.to_vec();
        found.sort_unstable();
        want.sort_unstable();
        prop_assert_eq!(found, want);

        prop_assert!(tour_from_edges(n, &edges).is_none());
    }

    #[test]
    fn prop_detection_is_deterministic((sizes, order) in disjoint_cycles()) {
        let n = order.len();
        let edges: Vec<_> = split(&sizes, &order)
            .iter()
            .flat_map(|c| cycle_edges(c))
            .collect();
        prop_assert_eq!(find_subtour(n, &edges), find_subtour(n, &edges));
        prop_assert_eq!(smallest_component(n, &edges), smallest_component(n, &edges));
    }
}

#[test]
fn test_empty_selection_has_no_cut() {
    assert!(smallest_component(5, &[]).is_none());
    assert!(find_subtour(5, &[]).is_none());
    assert!(tour_from_edges(5, &[]).is_none());
}
