//! Vertex enumeration for two-variable problems.
//!
//! Every vertex of the feasible region is the meeting point of two tight
//! boundaries, where the boundaries are the constraint lines and the two
//! axes. Enumerating all such pairs and keeping the feasible ones is
//! quadratic in the number of constraints, which is fine for a method
//! restricted to the plane.

use log::debug;

use crate::error::SolveError;
use crate::geometry::{intersect, is_feasible, Line, Point};
use crate::problem::{LpProblem, Sense};
use crate::solution::Solution;
use crate::solver::Method;
use crate::table::{self, TableData};

/// Points shown per constraint in the display table
const POINTS_PER_ROW: usize = 3;

pub(crate) fn solve(problem: &LpProblem, tolerance: f64) -> Result<Solution, SolveError> {
    let n = problem.num_variables();
    if n != 2 {
        return Err(SolveError::NotTwoVariables(n));
    }

    let feasible: Vec<Point> = candidate_vertices(problem)
        .into_iter()
        .filter(|p| is_feasible(*p, &problem.constraints, tolerance))
        .collect();
    debug!("graphical: {} feasible candidate vertices", feasible.len());

    let Some(first) = feasible.first() else {
        return Err(SolveError::Infeasible);
    };

    let maximize = problem.objective.sense == Sense::Max;
    let mut best = *first;
    let mut best_value = evaluate(problem, best);
    for &p in &feasible[1..] {
        let value = evaluate(problem, p);
        let better = if maximize { value > best_value } else { value < best_value };
        if better {
            best = p;
            best_value = value;
        }
    }

    if let Some(ray) = improving_ray(problem, tolerance) {
        debug!("graphical: objective improves along ({}, {})", ray.x, ray.y);
        return Err(SolveError::Unbounded);
    }

    Ok(Solution::optimal(
        Method::Graphical,
        best.to_vec(),
        best_value,
        build_table(problem),
    ))
}

fn evaluate(problem: &LpProblem, p: Point) -> f64 {
    problem.objective.coefficients[0] * p.x + problem.objective.coefficients[1] * p.y
}

/// Candidate vertices: pairwise constraint intersections, then each
/// constraint's intercepts with `x1 = 0` and `x2 = 0`, then the origin.
pub fn candidate_vertices(problem: &LpProblem) -> Vec<Point> {
    let lines: Vec<Line> = problem.constraints.iter().map(Line::from_constraint).collect();
    let mut points = Vec::new();

    for i in 0..lines.len() {
        for j in (i + 1)..lines.len() {
            if let Some(p) = intersect(&lines[i], &lines[j]) {
                points.push(p);
            }
        }
    }
    for line in &lines {
        points.extend(intersect(line, &Line::Y_AXIS));
        points.extend(intersect(line, &Line::X_AXIS));
    }
    points.push(Point::ORIGIN);

    points
}

/// A unit direction of the recession cone along which the objective
/// strictly improves.
///
/// The region lies in the first quadrant, so its recession cone is pointed
/// and its extreme rays are among the axis directions and the directions
/// of the constraint lines.
fn improving_ray(problem: &LpProblem, tolerance: f64) -> Option<Point> {
    let mut directions = vec![Point::new(1.0, 0.0), Point::new(0.0, 1.0)];
    for c in &problem.constraints {
        let line = Line::from_constraint(c);
        directions.push(Point::new(line.b, -line.a));
        directions.push(Point::new(-line.b, line.a));
    }

    let maximize = problem.objective.sense == Sense::Max;
    directions.into_iter().find_map(|d| {
        let norm = d.x.hypot(d.y);
        if norm < tolerance {
            return None;
        }
        let d = Point::new(d.x / norm, d.y / norm);
        if d.x < -tolerance || d.y < -tolerance {
            return None;
        }
        let recedes = problem.constraints.iter().all(|c| {
            let line = Line::from_constraint(c);
            c.op.holds(line.a * d.x + line.b * d.y, 0.0, tolerance)
        });
        let gain = evaluate(problem, d);
        let improves = if maximize { gain > tolerance } else { gain < -tolerance };
        (recedes && improves).then_some(d)
    })
}

fn build_table(problem: &LpProblem) -> TableData {
    let names = vec![problem.variable_name(0), problem.variable_name(1)];
    let mut table = TableData::new(
        ["Constraint", "Equation", "Point 1", "Point 2", "Point 3"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    );

    let lines: Vec<Line> = problem.constraints.iter().map(Line::from_constraint).collect();
    for (i, c) in problem.constraints.iter().enumerate() {
        let lhs = table::linear_expression(&c.coefficients, &names);
        let rhs = table::short(c.rhs);

        let mut points: Vec<Point> = Vec::new();
        let others = lines
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, l)| *l);
        for other in [Line::Y_AXIS, Line::X_AXIS].into_iter().chain(others) {
            if let Some(p) = intersect(&lines[i], &other) {
                if !points.iter().any(|q| q.approx_eq(p, 1e-9)) {
                    points.push(p);
                }
            }
            if points.len() == POINTS_PER_ROW {
                break;
            }
        }

        let mut row = vec![
            format!("{} {} {}", lhs, c.op.symbol(), rhs),
            format!("{} = {}", lhs, rhs),
        ];
        row.extend(points.iter().map(|p| table::point(p.x, p.y)));
        row.resize(2 + POINTS_PER_ROW, "-".to_string());
        table.push_row(row);
    }

    let mut row = vec![
        format!("{}, {} ≥ 0", names[0], names[1]),
        format!("{} = 0, {} = 0", names[0], names[1]),
        table::point(0.0, 0.0),
    ];
    row.resize(2 + POINTS_PER_ROW, "-".to_string());
    table.push_row(row);

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::ConstraintOp;
    use crate::solution::SolutionStatus;

    fn textbook_problem() -> LpProblem {
        let mut problem = LpProblem::with_dimension(2);
        problem.set_objective(vec![3.0, 2.0], Sense::Max);
        problem.add_constraint("c1", vec![2.0, 1.0], ConstraintOp::Le, 10.0);
        problem.add_constraint("c2", vec![1.0, 2.0], ConstraintOp::Le, 8.0);
        problem
    }

    #[test]
    fn test_simple_maximization() {
        let solution = solve(&textbook_problem(), 1e-8).unwrap();

        println!("Coordinates: {:?}", solution.coordinates);
        println!("Value: {}", solution.value);

        assert_eq!(solution.status, SolutionStatus::Optimal);
        assert!((solution.coordinates[0] - 4.0).abs() < 1e-6, "x1 = {} (expected 4)", solution.coordinates[0]);
        assert!((solution.coordinates[1] - 2.0).abs() < 1e-6, "x2 = {} (expected 2)", solution.coordinates[1]);
        assert!((solution.value - 16.0).abs() < 1e-6, "value = {} (expected 16)", solution.value);
    }

    #[test]
    fn test_candidate_order() {
        let candidates = candidate_vertices(&textbook_problem());
        // 1 pairwise + 2 intercepts per constraint + origin
        assert_eq!(candidates.len(), 6);
        assert!(candidates[0].approx_eq(Point::new(4.0, 2.0), 1e-12));
        assert!(candidates[1].approx_eq(Point::new(0.0, 10.0), 1e-12));
        assert!(candidates[2].approx_eq(Point::new(5.0, 0.0), 1e-12));
        assert_eq!(candidates[5], Point::ORIGIN);
    }

    #[test]
    fn test_minimization_ties_keep_first() {
        let mut problem = LpProblem::with_dimension(2);
        problem.set_objective(vec![1.0, 1.0], Sense::Min);
        problem.add_constraint("c1", vec![1.0, 1.0], ConstraintOp::Ge, 4.0);

        let solution = solve(&problem, 1e-8).unwrap();
        assert!((solution.value - 4.0).abs() < 1e-9, "value = {}", solution.value);
        // (0, 4) is found on x1 = 0 before (4, 0) on x2 = 0
        assert_eq!(solution.coordinates, vec![0.0, 4.0]);
    }

    #[test]
    fn test_unbounded_region() {
        let mut problem = LpProblem::with_dimension(2);
        problem.set_objective(vec![1.0, 1.0], Sense::Max);
        problem.add_constraint("c1", vec![1.0, -1.0], ConstraintOp::Le, 1.0);

        assert_eq!(solve(&problem, 1e-8), Err(SolveError::Unbounded));
    }

    #[test]
    fn test_unbounded_region_with_bounded_objective() {
        // The region is unbounded but minimizing stops at the origin
        let mut problem = LpProblem::with_dimension(2);
        problem.set_objective(vec![1.0, 1.0], Sense::Min);
        problem.add_constraint("c1", vec![1.0, -1.0], ConstraintOp::Le, 1.0);

        let solution = solve(&problem, 1e-8).unwrap();
        assert_eq!(solution.coordinates, vec![0.0, 0.0]);
        assert_eq!(solution.value, 0.0);
    }

    #[test]
    fn test_infeasible() {
        let mut problem = LpProblem::with_dimension(2);
        problem.set_objective(vec![1.0, 1.0], Sense::Max);
        problem.add_constraint("c1", vec![1.0, 1.0], ConstraintOp::Le, 1.0);
        problem.add_constraint("c2", vec![1.0, 1.0], ConstraintOp::Ge, 5.0);

        assert_eq!(solve(&problem, 1e-8), Err(SolveError::Infeasible));
    }

    #[test]
    fn test_rejects_three_variables() {
        let mut problem = LpProblem::with_dimension(3);
        problem.set_objective(vec![1.0, 1.0, 1.0], Sense::Max);
        assert_eq!(solve(&problem, 1e-8), Err(SolveError::NotTwoVariables(3)));
    }

    #[test]
    fn test_display_table() {
        let solution = solve(&textbook_problem(), 1e-8).unwrap();
        let table = &solution.table;

        assert_eq!(table.headers, vec!["Constraint", "Equation", "Point 1", "Point 2", "Point 3"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0], vec!["2x1 + x2 ≤ 10", "2x1 + x2 = 10", "(0, 10)", "(5, 0)", "(4, 2)"]);
        assert_eq!(table.rows[1], vec!["x1 + 2x2 ≤ 8", "x1 + 2x2 = 8", "(0, 4)", "(8, 0)", "(4, 2)"]);
        assert_eq!(table.rows[2], vec!["x1, x2 ≥ 0", "x1 = 0, x2 = 0", "(0, 0)", "-", "-"]);
    }

    #[test]
    fn test_display_table_pads_missing_points() {
        let mut problem = LpProblem::with_dimension(2);
        problem.set_objective(vec![1.0, 1.0], Sense::Max);
        problem.add_constraint("c1", vec![0.0, 1.0], ConstraintOp::Le, 2.5);

        let solution = solve(&problem, 1e-8);
        // x1 is unbounded here, so build the table directly
        assert_eq!(solution, Err(SolveError::Unbounded));
        let table = build_table(&problem);
        assert_eq!(table.rows[0], vec!["x2 ≤ 2.5", "x2 = 2.5", "(0, 2.5)", "-", "-"]);
    }
}
