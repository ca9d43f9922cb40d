//! Display tables and the number formatting shared by every solving method.
//!
//! Tables are plain strings: the display layer renders `headers` and `rows`
//! as given and never interprets them.

use std::fmt;

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableData {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableData {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty() && self.rows.is_empty()
    }

    /// Append a row, padding it with empty cells to the header width
    pub fn push_row(&mut self, mut cells: Vec<String>) {
        if cells.len() < self.headers.len() {
            cells.resize(self.headers.len(), String::new());
        }
        self.rows.push(cells);
    }

    /// Append a row whose first cell is `title` and the rest are empty
    pub fn push_title(&mut self, title: impl Into<String>) {
        self.push_row(vec![title.into()]);
    }
}

impl fmt::Display for TableData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let columns = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headers.len()))
            .max()
            .unwrap_or(0);
        let mut widths = vec![0; columns];
        for row in std::iter::once(&self.headers).chain(&self.rows) {
            for (j, cell) in row.iter().enumerate() {
                widths[j] = widths[j].max(cell.chars().count());
            }
        }

        for row in std::iter::once(&self.headers).chain(&self.rows) {
            let line: Vec<String> = row
                .iter()
                .enumerate()
                .map(|(j, cell)| format!("{:>width$}", cell, width = widths[j]))
                .collect();
            writeln!(f, "{}", line.join("  ").trim_end())?;
        }
        Ok(())
    }
}

/// Fixed number of decimals, never printing `-0`
pub fn fixed(value: f64, decimals: usize) -> String {
    let text = format!("{:.*}", decimals, value);
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text[1..].to_string()
    } else {
        text
    }
}

/// 0 decimals when the value is integral, 1 decimal otherwise
pub fn compact(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        fixed(value.round(), 0)
    } else {
        fixed(value, 1)
    }
}

/// Up to 4 decimals with trailing zeros removed
pub fn short(value: f64) -> String {
    let text = fixed(value, 4);
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        text
    }
}

pub fn point(x: f64, y: f64) -> String {
    format!("({}, {})", compact(x), compact(y))
}

/// Render `Σ c_j·name_j`, skipping zero terms: `2x1 - x2 + 0.5x3`
pub fn linear_expression(coefficients: &[f64], names: &[String]) -> String {
    let mut out = String::new();
    for (c, name) in coefficients.iter().zip(names) {
        if *c == 0.0 {
            continue;
        }
        let magnitude = c.abs();
        let factor = if (magnitude - 1.0).abs() < 1e-12 {
            String::new()
        } else {
            short(magnitude)
        };
        if out.is_empty() {
            if *c < 0.0 {
                out.push('-');
            }
        } else {
            out.push_str(if *c < 0.0 { " - " } else { " + " });
        }
        out.push_str(&factor);
        out.push_str(name);
    }
    if out.is_empty() {
        out.push('0');
    }
    out
}
