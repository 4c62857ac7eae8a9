//! Aggregations over a (filtered) consumption table.
//!
//! Every function is pure and independent of row order. Missing consumption
//! values (`NaN`) are skipped, the same way the sums and means of the
//! dashboard ignore empty cells.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::data::ConsumptionTable;

/// How many states the ranking keeps.
pub const TOP_STATES: usize = 5;

/// Total consumption of one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearTotal {
    pub year: i32,
    pub consumption_mwh: f64,
}

/// Mean consumption of one calendar month across all selected years.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthMean {
    pub month: u32,
    /// `NaN` when every value of the month is missing.
    pub consumption_mwh: f64,
}

/// Summed consumption of one state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateTotal {
    pub state: String,
    pub consumption_mwh: f64,
}

/// The three headline numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpis {
    pub total_mwh: f64,
    /// `None` for an empty selection.
    pub mean_mwh: Option<f64>,
    pub distinct_years: usize,
}

// ---------------------------------------------------------------------------
// Running mean
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn push(&mut self, value: f64) {
        if !value.is_nan() {
            self.sum += value;
            self.count += 1;
        }
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

/// Sum of consumption; `0.0` for an empty table.
pub fn total(table: &ConsumptionTable) -> f64 {
    table
        .iter()
        .map(|r| r.consumption_mwh)
        .filter(|v| !v.is_nan())
        .sum()
}

/// Mean consumption, or `None` when there is nothing to average.
pub fn mean(table: &ConsumptionTable) -> Option<f64> {
    let mut acc = Accumulator::default();
    for rec in table {
        acc.push(rec.consumption_mwh);
    }
    acc.mean()
}

/// Number of distinct years present.
pub fn distinct_years(table: &ConsumptionTable) -> usize {
    table.iter().map(|r| r.year()).collect::<BTreeSet<_>>().len()
}

pub fn kpis(table: &ConsumptionTable) -> Kpis {
    Kpis {
        total_mwh: total(table),
        mean_mwh: mean(table),
        distinct_years: distinct_years(table),
    }
}

// ---------------------------------------------------------------------------
// Grouped views
// ---------------------------------------------------------------------------

/// Consumption summed per year, ascending by year.
pub fn yearly_totals(table: &ConsumptionTable) -> Vec<YearTotal> {
    let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
    for rec in table {
        let slot = by_year.entry(rec.year()).or_insert(0.0);
        if !rec.consumption_mwh.is_nan() {
            *slot += rec.consumption_mwh;
        }
    }
    by_year
        .into_iter()
        .map(|(year, consumption_mwh)| YearTotal {
            year,
            consumption_mwh,
        })
        .collect()
}

/// Mean consumption per calendar month, ascending by month.
pub fn monthly_means(table: &ConsumptionTable) -> Vec<MonthMean> {
    let mut by_month: BTreeMap<u32, Accumulator> = BTreeMap::new();
    for rec in table {
        by_month.entry(rec.month()).or_default().push(rec.consumption_mwh);
    }
    by_month
        .into_iter()
        .map(|(month, acc)| MonthMean {
            month,
            consumption_mwh: acc.mean().unwrap_or(f64::NAN),
        })
        .collect()
}

/// The five states with the largest summed consumption in `year`,
/// largest first. Equal sums are ordered by state name.
pub fn top5_states(table: &ConsumptionTable, year: i32) -> Vec<StateTotal> {
    let mut by_state: BTreeMap<&str, f64> = BTreeMap::new();
    for rec in table.iter().filter(|r| r.year() == year) {
        let slot = by_state.entry(rec.state.as_str()).or_insert(0.0);
        if !rec.consumption_mwh.is_nan() {
            *slot += rec.consumption_mwh;
        }
    }

    let mut ranked: Vec<StateTotal> = by_state
        .into_iter()
        .map(|(state, consumption_mwh)| StateTotal {
            state: state.to_string(),
            consumption_mwh,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.consumption_mwh
            .total_cmp(&a.consumption_mwh)
            .then_with(|| a.state.cmp(&b.state))
    });
    ranked.truncate(TOP_STATES);
    ranked
}

// ---------------------------------------------------------------------------
// Year × month pivot
// ---------------------------------------------------------------------------

/// Mean consumption indexed by year (rows) and month (columns).
///
/// Only years and months that occur in the data get a row or column. A cell
/// whose (year, month) has no values is `None`, never zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct YearMonthPivot {
    pub years: Vec<i32>,
    pub months: Vec<u32>,
    /// Row-major: `values[i][j]` belongs to `years[i]`, `months[j]`.
    pub values: Vec<Vec<Option<f64>>>,
}

impl YearMonthPivot {
    pub fn get(&self, year: i32, month: u32) -> Option<f64> {
        let row = self.years.binary_search(&year).ok()?;
        let col = self.months.binary_search(&month).ok()?;
        self.values[row][col]
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }
}

pub fn year_month_pivot(table: &ConsumptionTable) -> YearMonthPivot {
    let mut cells: BTreeMap<(i32, u32), Accumulator> = BTreeMap::new();
    for rec in table {
        cells
            .entry((rec.year(), rec.month()))
            .or_default()
            .push(rec.consumption_mwh);
    }

    let years: Vec<i32> = cells
        .keys()
        .map(|(y, _)| *y)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let months: Vec<u32> = cells
        .keys()
        .map(|(_, m)| *m)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let values = years
        .iter()
        .map(|y| {
            months
                .iter()
                .map(|m| cells.get(&(*y, *m)).and_then(Accumulator::mean))
                .collect()
        })
        .collect();

    YearMonthPivot {
        years,
        months,
        values,
    }
}
