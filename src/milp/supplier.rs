//! Lazy cut suppliers.

use super::{LinearConstraint, VarId};

/// Variable values of an integer-feasible candidate (or of the final
/// solution), indexed by [`VarId`].
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    values: Vec<f64>,
}

impl Assignment {
    /// Wraps raw values in registration order.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Value of a variable.
    ///
    /// # Panics
    ///
    /// Panics if the variable does not belong to the solved model.
    pub fn value(&self, var: VarId) -> f64 {
        self.values[var.index()]
    }

    /// Returns `true` if a binary variable is set (value above one half).
    pub fn is_selected(&self, var: VarId) -> bool {
        self.value(var) > 0.5
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no variables.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Produces constraints violated by an integer-feasible candidate.
///
/// The solver calls [`on_integer_candidate`](Self::on_integer_candidate)
/// once per candidate, possibly many times within one search. Returned
/// cuts are added to the model for the rest of the session; an empty list
/// accepts the candidate.
pub trait CutSupplier {
    fn on_integer_candidate(&self, candidate: &Assignment) -> Vec<LinearConstraint>;
}

/// Supplier that accepts every candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCuts;

impl CutSupplier for NoCuts {
    fn on_integer_candidate(&self, _candidate: &Assignment) -> Vec<LinearConstraint> {
        Vec::new()
    }
}

/// Concatenates the cuts of several suppliers, in order.
///
/// # Examples
///
/// ```
/// use u_kstsp::milp::{Assignment, CompositeSupplier, CutSupplier, NoCuts};
///
/// let composite = CompositeSupplier::new().with(&NoCuts).with(&NoCuts);
/// assert_eq!(composite.len(), 2);
/// assert!(composite.on_integer_candidate(&Assignment::new(vec![])).is_empty());
/// ```
#[derive(Default)]
pub struct CompositeSupplier<'a> {
    suppliers: Vec<&'a dyn CutSupplier>,
}

impl<'a> CompositeSupplier<'a> {
    /// Creates an empty composite.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a supplier.
    pub fn with(mut self, supplier: &'a dyn CutSupplier) -> Self {
        self.suppliers.push(supplier);
        self
    }

    /// Number of inner suppliers.
    pub fn len(&self) -> usize {
        self.suppliers.len()
    }

    /// Returns `true` if there are no inner suppliers.
    pub fn is_empty(&self) -> bool {
        self.suppliers.is_empty()
    }
}

impl CutSupplier for CompositeSupplier<'_> {
    fn on_integer_candidate(&self, candidate: &Assignment) -> Vec<LinearConstraint> {
        self.suppliers
            .iter()
            .flat_map(|s| s.on_integer_candidate(candidate))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::milp::LinearExpr;

    struct FixedCut(f64);

    impl CutSupplier for FixedCut {
        fn on_integer_candidate(&self, _candidate: &Assignment) -> Vec<LinearConstraint> {
            vec![LinearExpr::sum([VarId(0)]).leq(self.0)]
        }
    }

    #[test]
    fn test_assignment_selection() {
        let a = Assignment::new(vec![0.0, 1.0, 0.9999, 0.2]);
        assert!(!a.is_selected(VarId(0)));
        assert!(a.is_selected(VarId(1)));
        assert!(a.is_selected(VarId(2)));
        assert!(!a.is_selected(VarId(3)));
        assert_eq!(a.len(), 4);
    }

    #[test]
    fn test_composite_concatenates_in_order() {
        let first = FixedCut(1.0);
        let second = FixedCut(2.0);
        let composite = CompositeSupplier::new().with(&first).with(&NoCuts).with(&second);
        let cuts = composite.on_integer_candidate(&Assignment::new(vec![1.0]));
        assert_eq!(cuts.len(), 2);
        assert_eq!(cuts[0].rhs(), 1.0);
        assert_eq!(cuts[1].rhs(), 2.0);
    }

    #[test]
    fn test_empty_composite() {
        let composite = CompositeSupplier::new();
        assert!(composite.is_empty());
        assert!(composite
            .on_integer_candidate(&Assignment::new(vec![]))
            .is_empty());
    }
}
