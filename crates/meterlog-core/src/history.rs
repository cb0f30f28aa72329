//! Consumption rendering
//!
//! Readings are ordered most recent date first and scanned once, keeping the
//! last value seen for each category. A row's consumption is that last seen
//! value minus the row's own value, i.e. the difference to the next more
//! recent reading of the same category.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use crate::models::{Category, Reading};

/// Shown instead of a table when there is nothing to render
pub const EMPTY_MESSAGE: &str = "No readings recorded yet.";

/// Unit suffix for consumption values
pub const UNIT: &str = "m³";

/// Consumption column of a history row
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Consumption {
    /// First row of its category in display order
    NoPriorReading,
    Delta(f64),
}

impl Consumption {
    pub fn delta(&self) -> Option<f64> {
        match self {
            Consumption::NoPriorReading => None,
            Consumption::Delta(d) => Some(*d),
        }
    }
}

impl fmt::Display for Consumption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Consumption::NoPriorReading => f.write_str("-"),
            Consumption::Delta(d) => write!(f, "{:.2} {}", round_cents(*d), UNIT),
        }
    }
}

/// Round to two decimals with ties away from zero
///
/// `{:.2}` alone rounds ties to even (0.125 would print as 0.12).
fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One rendered reading
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub reading: Reading,
    pub consumption: Consumption,
}

impl HistoryRow {
    pub fn label(&self) -> &str {
        self.reading.category.label()
    }
}

/// Rendered history table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    rows: Vec<HistoryRow>,
}

impl History {
    pub fn rows(&self) -> &[HistoryRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Build the history table for a list of readings
pub fn render(readings: &[Reading]) -> History {
    let mut sorted = readings.to_vec();
    sorted.sort_by(newest_first);

    let mut last_seen: HashMap<Category, f64> = HashMap::new();
    let rows = sorted
        .into_iter()
        .map(|reading| {
            let consumption = match last_seen.get(&reading.category) {
                Some(last) => Consumption::Delta(last - reading.value),
                None => Consumption::NoPriorReading,
            };
            last_seen.insert(reading.category.clone(), reading.value);
            HistoryRow {
                reading,
                consumption,
            }
        })
        .collect();

    History { rows }
}

/// Descending by calendar date; unrecognised dates go last
///
/// Same-date readings keep their stored order.
fn newest_first(a: &Reading, b: &Reading) -> Ordering {
    match (a.calendar_date(), b.calendar_date()) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.date.cmp(&a.date),
    }
}
