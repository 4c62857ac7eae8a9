//! Filter + aggregate in one pure step, recomputed on every selection change.

use serde::Serialize;

use crate::aggregate::{self, Kpis, MonthMean, StateTotal, YearMonthPivot, YearTotal};
use crate::data::{filter, ConsumptionTable, Selections};

/// State ranking for one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopStates {
    pub year: i32,
    pub states: Vec<StateTotal>,
}

/// Everything the presentation layer needs to draw the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub filtered_rows: usize,
    pub kpis: Kpis,
    pub yearly_totals: Vec<YearTotal>,
    pub monthly_means: Vec<MonthMean>,
    /// `None` when no year is selected; the ranking chart is suppressed then.
    pub top_states: Option<TopStates>,
    pub pivot: YearMonthPivot,
}

/// Apply `selections` to `table` and compute every derived view.
///
/// The state ranking uses the latest *selected* year, even when the
/// filtered table has no rows for it.
pub fn compute_view(table: &ConsumptionTable, selections: &Selections) -> DashboardView {
    let filtered = filter(table, selections);

    let top_states = selections.latest_year().map(|year| TopStates {
        year,
        states: aggregate::top5_states(&filtered, year),
    });

    DashboardView {
        filtered_rows: filtered.len(),
        kpis: aggregate::kpis(&filtered),
        yearly_totals: aggregate::yearly_totals(&filtered),
        monthly_means: aggregate::monthly_means(&filtered),
        top_states,
        pivot: aggregate::year_month_pivot(&filtered),
    }
}
