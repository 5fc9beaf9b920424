//! Linear expressions and constraints.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Handle to a variable registered in a [`MilpModel`](super::MilpModel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// Position of the variable in registration order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Sense {
    #[default]
    Minimize,
    Maximize,
}

/// Comparison between a linear expression and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    LessEqual,
    GreaterEqual,
    Equal,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LessEqual => write!(f, "<="),
            Self::GreaterEqual => write!(f, ">="),
            Self::Equal => write!(f, "=="),
        }
    }
}

/// A sparse linear expression `sum(coef * var) + constant`.
///
/// # Examples
///
/// ```
/// use u_kstsp::milp::{LinearExpr, MilpModel, SolverConfig};
///
/// let mut model = MilpModel::new(SolverConfig::new("doc"));
/// let x = model.add_binary(3.0);
/// let y = model.add_binary(1.0);
///
/// let mut expr = LinearExpr::new();
/// expr.add_term(x, 2.0);
/// expr.add_term(y, -1.0);
/// expr.add_constant(5.0);
/// assert_eq!(expr.evaluate(|_| 1.0), 6.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearExpr {
    terms: Vec<(VarId, f64)>,
    constant: f64,
}

impl LinearExpr {
    /// Creates an empty expression (value zero).
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of the given variables, each with coefficient one.
    pub fn sum<I: IntoIterator<Item = VarId>>(vars: I) -> Self {
        Self {
            terms: vars.into_iter().map(|v| (v, 1.0)).collect(),
            constant: 0.0,
        }
    }

    /// Appends `coef * var`. Repeated variables are allowed and add up.
    pub fn add_term(&mut self, var: VarId, coef: f64) {
        self.terms.push((var, coef));
    }

    /// Adds a constant offset.
    pub fn add_constant(&mut self, value: f64) {
        self.constant += value;
    }

    /// Appends every term (and the constant) of another expression.
    pub fn extend(&mut self, other: LinearExpr) {
        self.terms.extend(other.terms);
        self.constant += other.constant;
    }

    /// Terms in insertion order.
    pub fn terms(&self) -> &[(VarId, f64)] {
        &self.terms
    }

    /// Constant offset.
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Evaluates the expression for the given variable values.
    pub fn evaluate<F: Fn(VarId) -> f64>(&self, value: F) -> f64 {
        self.constant
            + self
                .terms
                .iter()
                .map(|&(var, coef)| coef * value(var))
                .sum::<f64>()
    }

    /// Builds the constraint `self <relation> rhs`.
    pub fn constrain(self, relation: Relation, rhs: f64) -> LinearConstraint {
        LinearConstraint {
            expr: self,
            relation,
            rhs,
        }
    }

    /// Builds `self <= rhs`.
    pub fn leq(self, rhs: f64) -> LinearConstraint {
        self.constrain(Relation::LessEqual, rhs)
    }

    /// Builds `self >= rhs`.
    pub fn geq(self, rhs: f64) -> LinearConstraint {
        self.constrain(Relation::GreaterEqual, rhs)
    }

    /// Builds `self == rhs`.
    pub fn equals(self, rhs: f64) -> LinearConstraint {
        self.constrain(Relation::Equal, rhs)
    }
}

impl FromIterator<(VarId, f64)> for LinearExpr {
    fn from_iter<I: IntoIterator<Item = (VarId, f64)>>(iter: I) -> Self {
        Self {
            terms: iter.into_iter().collect(),
            constant: 0.0,
        }
    }
}

/// A linear constraint `expr <relation> rhs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConstraint {
    expr: LinearExpr,
    relation: Relation,
    rhs: f64,
}

impl LinearConstraint {
    /// Left-hand side.
    pub fn expr(&self) -> &LinearExpr {
        &self.expr
    }

    /// Comparison operator.
    pub fn relation(&self) -> Relation {
        self.relation
    }

    /// Right-hand side.
    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    /// Returns `true` if the constraint holds for the given values, within
    /// `tol`.
    pub fn is_satisfied<F: Fn(VarId) -> f64>(&self, value: F, tol: f64) -> bool {
        let lhs = self.expr.evaluate(value);
        match self.relation {
            Relation::LessEqual => lhs <= self.rhs + tol,
            Relation::GreaterEqual => lhs >= self.rhs - tol,
            Relation::Equal => (lhs - self.rhs).abs() <= tol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_and_evaluate() {
        let expr = LinearExpr::sum([VarId(0), VarId(2)]);
        let values = [1.0, 5.0, 3.0];
        assert_eq!(expr.evaluate(|v| values[v.index()]), 4.0);
    }

    #[test]
    fn test_repeated_terms_add_up() {
        let mut expr = LinearExpr::new();
        expr.add_term(VarId(0), 2.0);
        expr.add_term(VarId(0), 3.0);
        assert_eq!(expr.evaluate(|_| 1.0), 5.0);
    }

    #[test]
    fn test_extend() {
        let mut a: LinearExpr = [(VarId(0), 1.0)].into_iter().collect();
        let mut b = LinearExpr::sum([VarId(1)]);
        b.add_constant(2.0);
        a.extend(b);
        assert_eq!(a.terms().len(), 2);
        assert_eq!(a.constant(), 2.0);
    }

    #[test]
    fn test_constraint_satisfaction() {
        let c = LinearExpr::sum([VarId(0), VarId(1)]).leq(1.0);
        assert!(c.is_satisfied(|v| if v.index() == 0 { 1.0 } else { 0.0 }, 1e-9));
        assert!(!c.is_satisfied(|_| 1.0, 1e-9));

        let g = LinearExpr::sum([VarId(0)]).geq(1.0);
        assert!(g.is_satisfied(|_| 1.0, 1e-9));
        assert!(!g.is_satisfied(|_| 0.0, 1e-9));

        let e = LinearExpr::sum([VarId(0), VarId(1)]).equals(2.0);
        assert!(e.is_satisfied(|_| 1.0, 1e-9));
        assert_eq!(e.relation(), Relation::Equal);
        assert_eq!(e.rhs(), 2.0);
    }

    #[test]
    fn test_relation_display() {
        assert_eq!(Relation::LessEqual.to_string(), "<=");
        assert_eq!(Relation::GreaterEqual.to_string(), ">=");
        assert_eq!(Relation::Equal.to_string(), "==");
    }
}
