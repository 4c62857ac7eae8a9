use std::sync::Arc;

use crate::data::{ConsumptionTable, Dimension, Selections};
use crate::pipeline::{compute_view, DashboardView};

// ---------------------------------------------------------------------------
// Dashboard session state
// ---------------------------------------------------------------------------

/// The full dashboard state, independent of rendering.
///
/// Every mutation recomputes the view through [`compute_view`], so `view()`
/// always reflects the current selections.
pub struct DashboardState {
    /// Source table, shared with the load cache and never mutated.
    table: Arc<ConsumptionTable>,

    /// Per-dimension selections.
    selections: Selections,

    /// Derived views for the current selections.
    view: DashboardView,
}

impl DashboardState {
    /// Start a session with every known value selected.
    pub fn new(table: Arc<ConsumptionTable>) -> Self {
        let selections = Selections::all(&table);
        let view = compute_view(&table, &selections);
        Self {
            table,
            selections,
            view,
        }
    }

    pub fn table(&self) -> &ConsumptionTable {
        &self.table
    }

    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    pub fn view(&self) -> &DashboardView {
        &self.view
    }

    /// Selectable values per dimension (everything present in the table).
    pub fn options(&self) -> Selections {
        Selections::all(&self.table)
    }

    /// Replace all selections at once.
    pub fn set_selections(&mut self, selections: Selections) {
        self.selections = selections;
        self.recompute();
    }

    /// Select every known value of one dimension.
    pub fn select_all(&mut self, dimension: Dimension) {
        let all = Selections::all(&self.table);
        match dimension {
            Dimension::Year => self.selections.years = all.years,
            Dimension::ConsumerClass => self.selections.consumer_classes = all.consumer_classes,
            Dimension::ActivityBranch => {
                self.selections.activity_branches = all.activity_branches
            }
            Dimension::Region => self.selections.regions = all.regions,
            Dimension::CovidPeriod => self.selections.covid_flags = all.covid_flags,
        }
        self.recompute();
    }

    /// Deselect every value of one dimension.
    pub fn select_none(&mut self, dimension: Dimension) {
        match dimension {
            Dimension::Year => self.selections.years.clear(),
            Dimension::CovidPeriod => self.selections.covid_flags.clear(),
            categorical => {
                if let Some(set) = self.selections.categories_mut(categorical) {
                    set.clear();
                }
            }
        }
        self.recompute();
    }

    pub fn toggle_year(&mut self, year: i32) {
        if !self.selections.years.remove(&year) {
            self.selections.years.insert(year);
        }
        self.recompute();
    }

    pub fn toggle_covid(&mut self, flag: i32) {
        if !self.selections.covid_flags.remove(&flag) {
            self.selections.covid_flags.insert(flag);
        }
        self.recompute();
    }

    /// Toggle a value of a string dimension. Numeric dimensions are ignored;
    /// use [`toggle_year`](Self::toggle_year) or
    /// [`toggle_covid`](Self::toggle_covid) for those.
    pub fn toggle_category(&mut self, dimension: Dimension, value: &str) {
        let Some(set) = self.selections.categories_mut(dimension) else {
            log::warn!("{dimension} is not a categorical dimension, ignoring toggle");
            return;
        };
        if !set.remove(value) {
            set.insert(value.to_string());
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        self.view = compute_view(&self.table, &self.selections);
    }
}
