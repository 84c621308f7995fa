//! Terminal output.
//!
//! Status lines are colored and printed to stdout; every status line is also
//! forwarded to `tracing` so the log file carries the same story as the
//! terminal. [`Table`] renders the end-of-run summary.

use colored::*;
use std::cmp;

pub fn info(msg: impl AsRef<str>) {
    let msg = msg.as_ref();
    tracing::info!("{}", msg);
    println!("{} {}", "ℹ".blue(), msg);
}

pub fn success(msg: impl AsRef<str>) {
    let msg = msg.as_ref();
    tracing::info!("{}", msg);
    println!("{} {}", "✓".green(), msg);
}

pub fn warn(msg: impl AsRef<str>) {
    let msg = msg.as_ref();
    tracing::warn!("{}", msg);
    println!("{} {}", "!".yellow(), msg);
}

pub fn error(msg: impl AsRef<str>) {
    let msg = msg.as_ref();
    tracing::error!("{}", msg);
    println!("{} {}", "x".red(), msg);
}

/// Auto-sizing box-drawn table.
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Rows with the wrong number of cells are ignored.
    pub fn add_row(&mut self, row: Vec<String>) {
        if row.len() == self.headers.len() {
            self.rows.push(row);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn print(&self) {
        for line in self.render(terminal_width()) {
            println!("{}", line);
        }
    }

    /// Renders every line of the table, shrinking the widest columns until
    /// the table fits in `max_width`.
    pub fn render(&self, max_width: usize) -> Vec<String> {
        if self.headers.is_empty() {
            return Vec::new();
        }

        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = cmp::max(widths[i], console::measure_text_width(cell));
            }
        }

        let overhead = 3 + 3 * widths.len();
        let available = max_width.saturating_sub(overhead);
        let mut total: usize = widths.iter().sum();
        while total > available {
            let Some((idx, &widest)) = widths.iter().enumerate().max_by_key(|(_, w)| **w) else {
                break;
            };
            if widest <= 8 {
                break;
            }
            widths[idx] -= 1;
            total -= 1;
        }

        let rule = |left: &str, mid: &str, right: &str| -> String {
            let inner: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("  {}{}{}", left, inner.join(mid), right)
        };
        let line = |cells: &[String], bold: bool| -> String {
            let mut s = String::from("  │");
            for (cell, width) in cells.iter().zip(&widths) {
                let flat = cell.replace(['\n', '\r', '\t'], " ");
                let shown = console::truncate_str(&flat, *width, "...").to_string();
                let pad = width.saturating_sub(console::measure_text_width(&shown));
                let shown = if bold { shown.bold().to_string() } else { shown };
                s.push_str(&format!(" {}{} │", shown, " ".repeat(pad)));
            }
            s
        };

        let mut out = vec![rule("┌", "┬", "┐"), line(&self.headers, true), rule("├", "┼", "┤")];
        out.extend(self.rows.iter().map(|row| line(row, false)));
        out.push(rule("└", "┴", "┘"));
        out
    }
}

fn terminal_width() -> usize {
    let (_rows, cols) = console::Term::stdout().size();
    cols as usize
}
