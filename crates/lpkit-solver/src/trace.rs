//! Iteration snapshots of a simplex run and their rendering as a
//! textbook-style tableau listing.

use crate::simplex::Column;
use crate::table::{self, TableData};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Phase {
    One,
    Two,
}

/// The choice made from one tableau state
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Pivot {
    pub entering: usize,
    /// Constraint row that leaves; `None` when the column is unbounded
    pub leaving: Option<usize>,
    pub element: Option<f64>,
    pub ratios: Vec<Option<f64>>,
}

/// One visited tableau state
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Snapshot {
    pub phase: Phase,
    /// Pivots performed before this state
    pub iteration: usize,
    /// Constraint rows, RHS last
    pub rows: Vec<Vec<f64>>,
    pub basis: Vec<usize>,
    pub basis_costs: Vec<f64>,
    pub cj: Vec<f64>,
    pub delta_j: Vec<f64>,
    pub z: f64,
    pub pivot: Option<Pivot>,
}

const DECIMALS: usize = 2;

pub(crate) fn new_table(columns: &[Column]) -> TableData {
    let mut headers = vec!["Cb".to_string(), "Basis".to_string()];
    headers.extend(columns.iter().map(|c| c.name.clone()));
    headers.push("RHS".to_string());
    headers.push("Ratio".to_string());
    TableData::new(headers)
}

pub(crate) fn push_standard_form(table: &mut TableData, rows: &[Vec<String>]) {
    table.push_title("Standard form");
    for row in rows {
        table.push_row(row.clone());
    }
}

pub(crate) fn push_iterations(table: &mut TableData, columns: &[Column], trace: &[Snapshot], two_phase: bool) {
    for snapshot in trace {
        table.push_title(title(columns, snapshot, two_phase));
        table.push_row(table.headers.clone());

        let ratios = snapshot.pivot.as_ref().map(|p| p.ratios.as_slice());
        for (i, row) in snapshot.rows.iter().enumerate() {
            let mut cells = vec![
                table::fixed(snapshot.basis_costs[i], DECIMALS),
                columns[snapshot.basis[i]].name.clone(),
            ];
            cells.extend(row.iter().map(|v| table::fixed(*v, DECIMALS)));
            let ratio = ratios.and_then(|r| r[i]);
            cells.push(ratio.map_or_else(|| "-".to_string(), |r| table::fixed(r, DECIMALS)));
            table.push_row(cells);
        }

        let mut cj = vec![String::new(), "Cj".to_string()];
        cj.extend(snapshot.cj.iter().map(|v| table::fixed(*v, DECIMALS)));
        table.push_row(cj);

        let mut delta = vec![String::new(), "Δj".to_string()];
        delta.extend(snapshot.delta_j.iter().map(|v| table::fixed(*v, DECIMALS)));
        delta.push(format!("Z = {}", table::fixed(snapshot.z, DECIMALS)));
        table.push_row(delta);
    }
}

fn title(columns: &[Column], snapshot: &Snapshot, two_phase: bool) -> String {
    let mut title = format!("Iteration {}", snapshot.iteration);
    if two_phase {
        let phase = match snapshot.phase {
            Phase::One => 1,
            Phase::Two => 2,
        };
        title.push_str(&format!(" (phase {phase})"));
    }

    match &snapshot.pivot {
        None => title.push_str(": optimal"),
        Some(Pivot {
            entering,
            leaving: Some(row),
            element,
            ..
        }) => {
            title.push_str(&format!(
                ": {} enters, {} leaves, pivot = {}",
                columns[*entering].name,
                columns[snapshot.basis[*row]].name,
                table::fixed(element.unwrap_or(0.0), DECIMALS)
            ));
        }
        Some(Pivot {
            entering,
            leaving: None,
            ..
        }) => {
            title.push_str(&format!(": {} enters, no leaving row (unbounded)", columns[*entering].name));
        }
    }
    title
}
