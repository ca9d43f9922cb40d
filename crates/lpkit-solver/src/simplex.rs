use log::{debug, trace, warn};

use crate::error::SolveError;
use crate::problem::{ConstraintOp, LpProblem, Sense};
use crate::solution::Solution;
use crate::solver::Method;
use crate::table::{self, TableData};
use crate::trace::{self as snapshot, Phase, Pivot, Snapshot};

/// Tableau simplex with an optional first phase for `>=` and `=` rows
pub(crate) struct Engine {
    /// Pivots allowed across both phases
    pub max_iterations: usize,
    /// Threshold for reduced costs and pivot elements
    pub tolerance: f64,
    /// Largest artificial sum still accepted as feasible
    pub feasibility_tolerance: f64,
}

/// Outcome of one successful run
pub(crate) struct Run {
    pub coordinates: Vec<f64>,
    pub value: f64,
    pub columns: Vec<Column>,
    pub standard_form: Vec<Vec<String>>,
    pub trace: Vec<Snapshot>,
    pub two_phase: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnKind {
    Decision,
    Slack,
    Surplus,
    Artificial,
}

#[derive(Debug, Clone)]
pub(crate) struct Column {
    pub kind: ColumnKind,
    pub name: String,
}

/// Solve with the simplex engine and render its trace for `method`
pub(crate) fn solve(problem: &LpProblem, engine: &Engine, method: Method) -> Result<Solution, SolveError> {
    let run = engine.run(problem)?;

    let mut table = snapshot::new_table(&run.columns);
    if method == Method::General {
        snapshot::push_standard_form(&mut table, &run.standard_form);
    }
    snapshot::push_iterations(&mut table, &run.columns, &run.trace, run.two_phase);

    Ok(Solution::optimal(method, run.coordinates, run.value, table))
}

impl Engine {
    pub fn run(&self, problem: &LpProblem) -> Result<Run, SolveError> {
        let mut tableau = Tableau::build(problem);
        let standard_form = tableau.standard_form(problem);
        let two_phase = tableau.has_artificial();
        let mut trace = Vec::new();
        let mut iterations = 0;

        // Phase 1: find an initial basic feasible solution
        if two_phase {
            tableau.cj = tableau.phase_one_costs();
            let all_columns = tableau.columns.len();
            match self.iterate(&mut tableau, Phase::One, all_columns, &mut iterations, &mut trace) {
                Ok(()) => {}
                // Unbounded in phase 1 means infeasible original
                Err(SolveError::Unbounded) => return Err(SolveError::Infeasible),
                Err(e) => return Err(e),
            }
            let artificial_sum = -tableau.objective_value();
            if artificial_sum > self.feasibility_tolerance {
                debug!("simplex: phase 1 ended with artificial sum {}", artificial_sum);
                return Err(SolveError::Infeasible);
            }
            tableau.drive_out_artificials(self.tolerance);
        }

        // Phase 2: optimize, never letting artificials back in
        tableau.cj = tableau.phase_two_costs(problem);
        let eligible = tableau.artificial_start;
        self.iterate(&mut tableau, Phase::Two, eligible, &mut iterations, &mut trace)?;

        let z = tableau.objective_value();
        let value = match problem.objective.sense {
            Sense::Max => z,
            Sense::Min => -z,
        };
        debug!("simplex: optimal after {} pivots, value {}", iterations, value);

        Ok(Run {
            coordinates: tableau.coordinates(),
            value,
            columns: tableau.columns,
            standard_form,
            trace,
            two_phase,
        })
    }

    fn iterate(
        &self,
        tableau: &mut Tableau,
        phase: Phase,
        eligible: usize,
        iterations: &mut usize,
        trace: &mut Vec<Snapshot>,
    ) -> Result<(), SolveError> {
        loop {
            tableau.refresh();

            let Some(col) = tableau.entering_column(eligible, self.tolerance) else {
                trace.push(tableau.snapshot(phase, *iterations, None));
                return Ok(());
            };
            if *iterations >= self.max_iterations {
                warn!("simplex: iteration cap of {} reached", self.max_iterations);
                return Err(SolveError::IterationLimit {
                    limit: self.max_iterations,
                });
            }

            let ratios = tableau.ratios(col, self.tolerance);
            trace!("simplex: ratios for column {}: {:?}", col, ratios);
            let leaving = min_ratio_row(&ratios);
            let pivot = Pivot {
                entering: col,
                leaving,
                element: leaving.map(|row| tableau.data[row + 1][col]),
                ratios,
            };
            trace.push(tableau.snapshot(phase, *iterations, Some(pivot)));

            let Some(row) = leaving else {
                return Err(SolveError::Unbounded);
            };
            debug!(
                "simplex: {} enters, {} leaves",
                tableau.columns[col].name, tableau.columns[tableau.basis[row]].name
            );
            tableau.pivot(row, col);
            *iterations += 1;
        }
    }
}

/// Smallest ratio, first occurrence on ties
fn min_ratio_row(ratios: &[Option<f64>]) -> Option<usize> {
    let mut min_ratio = f64::INFINITY;
    let mut min_row = None;
    for (i, ratio) in ratios.iter().enumerate() {
        if let Some(r) = *ratio {
            if r < min_ratio {
                min_ratio = r;
                min_row = Some(i);
            }
        }
    }
    min_row
}

/// Row 0 holds the reduced costs and `Z`; rows `1..=m` hold the constraints.
/// The last column is the right-hand side.
pub(crate) struct Tableau {
    data: Vec<Vec<f64>>,
    /// Column index of the basic variable of each constraint row
    basis: Vec<usize>,
    /// Cost of each column in the current phase
    cj: Vec<f64>,
    columns: Vec<Column>,
    n_vars: usize,
    artificial_start: usize,
}

impl Tableau {
    pub fn build(problem: &LpProblem) -> Tableau {
        let n_vars = problem.num_variables();
        let n_constraints = problem.num_constraints();

        // Rows with a negative RHS are negated so every RHS starts non-negative
        let rows: Vec<(Vec<f64>, ConstraintOp, f64)> = problem
            .constraints
            .iter()
            .map(|c| {
                if c.rhs < 0.0 {
                    (c.coefficients.iter().map(|x| -x).collect(), c.op.flipped(), -c.rhs)
                } else {
                    (c.coefficients.clone(), c.op, c.rhs)
                }
            })
            .collect();

        let mut columns: Vec<Column> = (0..n_vars)
            .map(|j| Column {
                kind: ColumnKind::Decision,
                name: problem.variable_name(j),
            })
            .collect();
        for (i, (_, op, _)) in rows.iter().enumerate() {
            match op {
                ConstraintOp::Le => columns.push(Column {
                    kind: ColumnKind::Slack,
                    name: format!("s{}", i + 1),
                }),
                ConstraintOp::Ge => columns.push(Column {
                    kind: ColumnKind::Surplus,
                    name: format!("e{}", i + 1),
                }),
                ConstraintOp::Eq => {}
            }
        }
        let artificial_start = columns.len();
        for (i, (_, op, _)) in rows.iter().enumerate() {
            if *op != ConstraintOp::Le {
                columns.push(Column {
                    kind: ColumnKind::Artificial,
                    name: format!("a{}", i + 1),
                });
            }
        }

        let total_cols = columns.len() + 1;
        let mut tableau = Tableau {
            data: vec![vec![0.0; total_cols]; n_constraints + 1],
            basis: vec![0; n_constraints],
            cj: vec![0.0; columns.len()],
            columns,
            n_vars,
            artificial_start,
        };

        let mut slack_idx = n_vars;
        let mut artificial_idx = artificial_start;
        for (i, (coefficients, op, rhs)) in rows.into_iter().enumerate() {
            let row = &mut tableau.data[i + 1];
            row[..n_vars].copy_from_slice(&coefficients);
            row[total_cols - 1] = rhs;

            match op {
                ConstraintOp::Le => {
                    row[slack_idx] = 1.0;
                    tableau.basis[i] = slack_idx;
                    slack_idx += 1;
                }
                ConstraintOp::Ge => {
                    row[slack_idx] = -1.0;
                    slack_idx += 1;
                    row[artificial_idx] = 1.0;
                    tableau.basis[i] = artificial_idx;
                    artificial_idx += 1;
                }
                ConstraintOp::Eq => {
                    row[artificial_idx] = 1.0;
                    tableau.basis[i] = artificial_idx;
                    artificial_idx += 1;
                }
            }
        }

        tableau
    }

    fn has_artificial(&self) -> bool {
        self.artificial_start < self.columns.len()
    }

    fn rhs_col(&self) -> usize {
        self.columns.len()
    }

    /// Maximize the negated sum of artificials
    fn phase_one_costs(&self) -> Vec<f64> {
        self.columns
            .iter()
            .map(|c| if c.kind == ColumnKind::Artificial { -1.0 } else { 0.0 })
            .collect()
    }

    /// Objective costs, negated when minimizing so the engine always maximizes
    fn phase_two_costs(&self, problem: &LpProblem) -> Vec<f64> {
        let sign = match problem.objective.sense {
            Sense::Max => 1.0,
            Sense::Min => -1.0,
        };
        let mut cj = vec![0.0; self.columns.len()];
        for (j, &c) in problem.objective.coefficients.iter().enumerate() {
            cj[j] = sign * c;
        }
        cj
    }

    fn basis_costs(&self) -> Vec<f64> {
        self.basis.iter().map(|&b| self.cj[b]).collect()
    }

    /// Recompute `Δj = cj − Σ cB·a_ij` and `Z = Σ cB·b_i` into row 0
    fn refresh(&mut self) {
        let costs = self.basis_costs();
        let width = self.columns.len() + 1;
        let mut objective_row = vec![0.0; width];
        for (j, cell) in objective_row.iter_mut().enumerate() {
            let weighted: f64 = costs
                .iter()
                .enumerate()
                .map(|(i, cb)| cb * self.data[i + 1][j])
                .sum();
            *cell = if j < self.columns.len() { self.cj[j] - weighted } else { weighted };
        }
        self.data[0] = objective_row;
    }

    fn objective_value(&self) -> f64 {
        self.data[0][self.rhs_col()]
    }

    /// Largest positive reduced cost among the first `eligible` columns
    fn entering_column(&self, eligible: usize, tolerance: f64) -> Option<usize> {
        let mut max_val = tolerance;
        let mut max_col = None;
        for j in 0..eligible.min(self.columns.len()) {
            if self.data[0][j] > max_val {
                max_val = self.data[0][j];
                max_col = Some(j);
            }
        }
        max_col
    }

    /// `RHS / a_ij` for every constraint row with a positive entry in `col`
    fn ratios(&self, col: usize, tolerance: f64) -> Vec<Option<f64>> {
        let rhs = self.rhs_col();
        self.data[1..]
            .iter()
            .map(|row| (row[col] > tolerance).then(|| row[rhs] / row[col]))
            .collect()
    }

    /// Pivot on constraint `row` (0-based) and column `col`
    fn pivot(&mut self, row: usize, col: usize) {
        self.basis[row] = col;

        let pivot_row = row + 1;
        let pivot_val = self.data[pivot_row][col];
        for value in self.data[pivot_row].iter_mut() {
            *value /= pivot_val;
        }

        let normalized = self.data[pivot_row].clone();
        for (i, current) in self.data.iter_mut().enumerate().skip(1) {
            if i == pivot_row {
                continue;
            }
            let factor = current[col];
            if factor != 0.0 {
                for (value, p) in current.iter_mut().zip(&normalized) {
                    *value -= factor * p;
                }
            }
        }
    }

    /// Swap zero-level artificials out of the basis where a real column allows it
    fn drive_out_artificials(&mut self, tolerance: f64) {
        for i in 0..self.basis.len() {
            if self.basis[i] < self.artificial_start {
                continue;
            }
            let replacement = (0..self.artificial_start).find(|&j| self.data[i + 1][j].abs() > tolerance);
            if let Some(j) = replacement {
                debug!("simplex: {} replaces artificial {}", self.columns[j].name, self.columns[self.basis[i]].name);
                self.pivot(i, j);
            }
        }
    }

    fn coordinates(&self) -> Vec<f64> {
        let rhs = self.rhs_col();
        let mut values = vec![0.0; self.n_vars];
        for (i, &basic) in self.basis.iter().enumerate() {
            if basic < self.n_vars {
                values[basic] = self.data[i + 1][rhs];
            }
        }
        values
    }

    fn snapshot(&self, phase: Phase, iteration: usize, pivot: Option<Pivot>) -> Snapshot {
        Snapshot {
            phase,
            iteration,
            rows: self.data[1..].to_vec(),
            basis: self.basis.clone(),
            basis_costs: self.basis_costs(),
            cj: self.cj.clone(),
            delta_j: self.data[0][..self.columns.len()].to_vec(),
            z: self.objective_value(),
            pivot,
        }
    }

    /// Objective and constraint rows written as equations over every column
    fn standard_form(&self, problem: &LpProblem) -> Vec<Vec<String>> {
        let names: Vec<String> = self.columns.iter().map(|c| c.name.clone()).collect();
        let decision = &names[..self.n_vars];
        let sense = match problem.objective.sense {
            Sense::Max => "max",
            Sense::Min => "min",
        };

        let mut rows = vec![vec![
            String::new(),
            "Z".to_string(),
            format!(
                "{} Z = {}",
                sense,
                table::linear_expression(&problem.objective.coefficients, decision)
            ),
        ]];
        if self.has_artificial() {
            rows.push(vec![
                String::new(),
                "W".to_string(),
                format!(
                    "max W = {}",
                    table::linear_expression(&self.phase_one_costs(), &names)
                ),
            ]);
        }
        for (i, constraint) in problem.constraints.iter().enumerate() {
            let row = &self.data[i + 1];
            rows.push(vec![
                String::new(),
                constraint.name.clone(),
                format!(
                    "{} = {}",
                    table::linear_expression(&row[..self.columns.len()], &names),
                    table::short(row[self.rhs_col()])
                ),
            ]);
        }
        rows
    }
}
