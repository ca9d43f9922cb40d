//! Plane geometry for two-variable problems.

use crate::problem::Constraint;

/// Determinant magnitude below which two lines count as parallel
pub const PARALLEL_TOLERANCE: f64 = 1e-8;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_vec(self) -> Vec<f64> {
        vec![self.x, self.y]
    }

    pub fn approx_eq(self, other: Point, tolerance: f64) -> bool {
        (self.x - other.x).abs() <= tolerance && (self.y - other.y).abs() <= tolerance
    }
}

/// The line `a·x + b·y = c`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl Line {
    /// `x2 = 0`
    pub const X_AXIS: Line = Line { a: 0.0, b: 1.0, c: 0.0 };
    /// `x1 = 0`
    pub const Y_AXIS: Line = Line { a: 1.0, b: 0.0, c: 0.0 };

    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// Boundary line of a two-variable constraint
    pub fn from_constraint(constraint: &Constraint) -> Self {
        let a = constraint.coefficients.first().copied().unwrap_or(0.0);
        let b = constraint.coefficients.get(1).copied().unwrap_or(0.0);
        Self::new(a, b, constraint.rhs)
    }
}

/// Intersection of two lines, `None` when they are parallel or coincident
pub fn intersect(l1: &Line, l2: &Line) -> Option<Point> {
    let det = l1.a * l2.b - l2.a * l1.b;
    if det.abs() < PARALLEL_TOLERANCE {
        return None;
    }
    let x = (l1.c * l2.b - l2.c * l1.b) / det;
    let y = (l1.a * l2.c - l2.a * l1.c) / det;
    // Adding 0.0 turns -0.0 into 0.0
    Some(Point::new(x + 0.0, y + 0.0))
}

/// Whether `point` satisfies every constraint and lies in the first quadrant
pub fn is_feasible(point: Point, constraints: &[Constraint], tolerance: f64) -> bool {
    if point.x < -tolerance || point.y < -tolerance {
        return false;
    }
    constraints.iter().all(|c| {
        let line = Line::from_constraint(c);
        let lhs = line.a * point.x + line.b * point.y;
        c.op.holds(lhs, c.rhs, tolerance)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::ConstraintOp;

    fn constraint(a: f64, b: f64, op: ConstraintOp, rhs: f64) -> Constraint {
        Constraint {
            name: "c".to_string(),
            coefficients: vec![a, b],
            op,
            rhs,
        }
    }

    #[test]
    fn test_intersect() {
        let p = intersect(&Line::new(2.0, 1.0, 10.0), &Line::new(1.0, 2.0, 8.0)).unwrap();
        assert!((p.x - 4.0).abs() < 1e-12, "x = {}", p.x);
        assert!((p.y - 2.0).abs() < 1e-12, "y = {}", p.y);
    }

    #[test]
    fn test_parallel_lines_have_no_intersection() {
        assert_eq!(intersect(&Line::new(1.0, 1.0, 1.0), &Line::new(2.0, 2.0, 10.0)), None);
        // Coincident lines are treated the same way
        assert_eq!(intersect(&Line::new(1.0, 1.0, 1.0), &Line::new(1.0, 1.0, 1.0)), None);
    }

    #[test]
    fn test_axis_intercepts() {
        let line = Line::new(2.0, 1.0, 10.0);
        assert_eq!(intersect(&line, &Line::Y_AXIS), Some(Point::new(0.0, 10.0)));
        assert_eq!(intersect(&line, &Line::X_AXIS), Some(Point::new(5.0, 0.0)));
        // A horizontal line never meets the x axis
        assert_eq!(intersect(&Line::new(0.0, 1.0, 3.0), &Line::X_AXIS), None);
    }

    #[test]
    fn test_is_feasible() {
        let constraints = vec![
            constraint(2.0, 1.0, ConstraintOp::Le, 10.0),
            constraint(1.0, 1.0, ConstraintOp::Ge, 2.0),
            constraint(1.0, -1.0, ConstraintOp::Eq, 0.0),
        ];
        assert!(is_feasible(Point::new(2.0, 2.0), &constraints, 1e-8));
        assert!(is_feasible(Point::new(10.0 / 3.0, 10.0 / 3.0), &constraints, 1e-8));
        assert!(!is_feasible(Point::new(0.5, 0.5), &constraints, 1e-8));
        assert!(!is_feasible(Point::new(4.0, 4.0), &constraints, 1e-8));
        assert!(!is_feasible(Point::new(-1e-6, 3.0), &[], 1e-8));
        assert!(is_feasible(Point::new(-1e-9, 3.0), &[], 1e-8));
    }
}
