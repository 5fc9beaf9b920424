//! Point and dual-instance vertex types.

use serde::{Deserialize, Serialize};

/// An integer coordinate pair.
///
/// # Examples
///
/// ```
/// use u_kstsp::models::Point;
///
/// let a = Point::new(0, 0);
/// let b = Point::new(3, 4);
/// assert_eq!(a.distance_to(&b), 5);
///
/// // Non-integral lengths are rounded up.
/// assert_eq!(a.distance_to(&Point::new(1, 1)), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    x: i64,
    y: i64,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// X-coordinate.
    pub fn x(&self) -> i64 {
        self.x
    }

    /// Y-coordinate.
    pub fn y(&self) -> i64 {
        self.y
    }

    /// Euclidean distance to another point, rounded up to the next integer.
    pub fn distance_to(&self, other: &Point) -> u64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt().ceil() as u64
    }
}

/// Which of the two coordinate instances a cycle lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    First,
    Second,
}

impl Side {
    /// Both sides, in order.
    pub const BOTH: [Side; 2] = [Side::First, Side::Second];

    /// Zero-based position (0 for the first instance, 1 for the second).
    pub fn index(self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }
}

/// One vertex seen in both instances: its coordinates in the first and in
/// the second point set.
///
/// # Examples
///
/// ```
/// use u_kstsp::models::{DualPoint, Point, Side};
///
/// let v = DualPoint::new(Point::new(1, 2), Point::new(3, 4));
/// assert_eq!(v.get(Side::First), Point::new(1, 2));
/// assert_eq!(v.get(Side::Second), Point::new(3, 4));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DualPoint {
    first: Point,
    second: Point,
}

impl DualPoint {
    /// Creates a vertex from its coordinates in both instances.
    pub fn new(first: Point, second: Point) -> Self {
        Self { first, second }
    }

    /// Coordinates in the requested instance.
    pub fn get(&self, side: Side) -> Point {
        match side {
            Side::First => self.first,
            Side::Second => self.second,
        }
    }

    /// Coordinates in the first instance.
    pub fn first(&self) -> Point {
        self.first
    }

    /// Coordinates in the second instance.
    pub fn second(&self) -> Point {
        self.second
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_exact() {
        let a = Point::new(0, 0);
        let b = Point::new(6, 8);
        assert_eq!(a.distance_to(&b), 10);
        assert_eq!(b.distance_to(&a), 10);
    }

    #[test]
    fn test_distance_rounds_up() {
        let a = Point::new(0, 0);
        // sqrt(2) = 1.41..
        assert_eq!(a.distance_to(&Point::new(1, 1)), 2);
        // sqrt(5) = 2.23..
        assert_eq!(a.distance_to(&Point::new(1, 2)), 3);
    }

    #[test]
    fn test_distance_to_self() {
        let a = Point::new(-7, 12);
        assert_eq!(a.distance_to(&a), 0);
    }

    #[test]
    fn test_negative_coordinates() {
        let a = Point::new(-3, 0);
        let b = Point::new(0, -4);
        assert_eq!(a.distance_to(&b), 5);
    }

    #[test]
    fn test_dual_point_sides() {
        let v = DualPoint::new(Point::new(1, 1), Point::new(2, 2));
        assert_eq!(v.first(), v.get(Side::First));
        assert_eq!(v.second(), v.get(Side::Second));
        assert_eq!(Side::First.index(), 0);
        assert_eq!(Side::Second.index(), 1);
    }
}
