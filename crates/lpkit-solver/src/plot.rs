//! Shapes for charting a two-variable problem.

use crate::geometry::{intersect, is_feasible, Line, Point};
use crate::graphical::candidate_vertices;
use crate::problem::{Constraint, LpProblem};

const FEASIBILITY_TOLERANCE: f64 = 1e-8;
const SAME_POINT: f64 = 1e-9;

/// Feasible vertices ordered counter-clockwise around their centroid.
///
/// Empty when the problem is infeasible or does not have 2 variables. For
/// an unbounded region only the finite vertices are returned.
pub fn feasible_region(problem: &LpProblem) -> Vec<Point> {
    if problem.num_variables() != 2 || problem.validate().is_err() {
        return Vec::new();
    }

    let mut vertices: Vec<Point> = Vec::new();
    for p in candidate_vertices(problem) {
        if is_feasible(p, &problem.constraints, FEASIBILITY_TOLERANCE)
            && !vertices.iter().any(|q| q.approx_eq(p, SAME_POINT))
        {
            vertices.push(p);
        }
    }
    if vertices.len() < 3 {
        return vertices;
    }

    let count = vertices.len() as f64;
    let cx = vertices.iter().map(|p| p.x).sum::<f64>() / count;
    let cy = vertices.iter().map(|p| p.y).sum::<f64>() / count;
    vertices.sort_by(|a, b| {
        let angle_a = (a.y - cy).atan2(a.x - cx);
        let angle_b = (b.y - cy).atan2(b.x - cx);
        angle_a.total_cmp(&angle_b)
    });
    vertices
}

/// The constraint line clipped to `[0, x_max] x [0, y_max]`, endpoints sorted by x
pub fn constraint_segment(constraint: &Constraint, x_max: f64, y_max: f64) -> Option<(Point, Point)> {
    let line = Line::from_constraint(constraint);
    let borders = [
        Line::Y_AXIS,
        Line::X_AXIS,
        Line::new(1.0, 0.0, x_max),
        Line::new(0.0, 1.0, y_max),
    ];

    let mut points: Vec<Point> = Vec::new();
    for border in &borders {
        let Some(p) = intersect(&line, border) else {
            continue;
        };
        let inside = p.x >= -SAME_POINT && p.x <= x_max + SAME_POINT && p.y >= -SAME_POINT && p.y <= y_max + SAME_POINT;
        if inside && !points.iter().any(|q| q.approx_eq(p, SAME_POINT)) {
            points.push(p);
        }
    }

    points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    match points.as_slice() {
        [first, .., last] => Some((*first, *last)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::{ConstraintOp, Sense};

    fn textbook_problem() -> LpProblem {
        let mut problem = LpProblem::with_dimension(2);
        problem.set_objective(vec![3.0, 2.0], Sense::Max);
        problem.add_constraint("c1", vec![2.0, 1.0], ConstraintOp::Le, 10.0);
        problem.add_constraint("c2", vec![1.0, 2.0], ConstraintOp::Le, 8.0);
        problem
    }

    #[test]
    fn test_feasible_region_polygon() {
        let region = feasible_region(&textbook_problem());
        assert_eq!(region.len(), 4);

        // Counter-clockwise order starting from the lowest angle
        let expected = [
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(4.0, 2.0),
            Point::new(0.0, 4.0),
        ];
        for (got, want) in region.iter().zip(expected) {
            assert!(got.approx_eq(want, 1e-9), "got {:?} expected {:?}", got, want);
        }
    }

    #[test]
    fn test_feasible_region_empty_cases() {
        let mut infeasible = textbook_problem();
        infeasible.add_constraint("c3", vec![1.0, 1.0], ConstraintOp::Ge, 20.0);
        assert!(feasible_region(&infeasible).is_empty());

        let mut three = LpProblem::with_dimension(3);
        three.set_objective(vec![1.0, 1.0, 1.0], Sense::Max);
        assert!(feasible_region(&three).is_empty());
    }

    #[test]
    fn test_constraint_segment() {
        let problem = textbook_problem();
        let (a, b) = constraint_segment(&problem.constraints[0], 20.0, 20.0).unwrap();
        assert!(a.approx_eq(Point::new(0.0, 10.0), 1e-9));
        assert!(b.approx_eq(Point::new(5.0, 0.0), 1e-9));

        // Entirely outside the viewport
        let far = Constraint {
            name: "far".to_string(),
            coefficients: vec![1.0, 1.0],
            op: ConstraintOp::Le,
            rhs: 100.0,
        };
        assert_eq!(constraint_segment(&far, 20.0, 20.0), None);
    }
}
