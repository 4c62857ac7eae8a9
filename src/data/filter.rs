use std::collections::BTreeSet;

use super::model::{ConsumptionRecord, ConsumptionTable, Dimension};

// ---------------------------------------------------------------------------
// Selections: which values are allowed per dimension
// ---------------------------------------------------------------------------

/// Allowed values for each of the five filter dimensions.
///
/// An empty set matches nothing. There is no "unset means everything":
/// use [`Selections::all`] to build a selection that keeps every row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selections {
    pub years: BTreeSet<i32>,
    pub consumer_classes: BTreeSet<String>,
    pub activity_branches: BTreeSet<String>,
    pub regions: BTreeSet<String>,
    pub covid_flags: BTreeSet<i32>,
}

impl Selections {
    /// Every distinct value present in `table`, per dimension.
    pub fn all(table: &ConsumptionTable) -> Self {
        let mut sel = Self::none();
        for rec in table {
            sel.years.insert(rec.year());
            sel.consumer_classes.insert(rec.consumer_class.clone());
            sel.activity_branches.insert(rec.activity_branch.clone());
            sel.regions.insert(rec.region.clone());
            if let Some(flag) = rec.covid_indicator {
                sel.covid_flags.insert(flag);
            }
        }
        sel
    }

    /// A selection with nothing chosen in any dimension.
    pub fn none() -> Self {
        Self::default()
    }

    /// Highest selected year, if any year is selected.
    pub fn latest_year(&self) -> Option<i32> {
        self.years.last().copied()
    }

    /// Number of values selected in `dimension`.
    pub fn count(&self, dimension: Dimension) -> usize {
        match dimension {
            Dimension::Year => self.years.len(),
            Dimension::ConsumerClass => self.consumer_classes.len(),
            Dimension::ActivityBranch => self.activity_branches.len(),
            Dimension::Region => self.regions.len(),
            Dimension::CovidPeriod => self.covid_flags.len(),
        }
    }

    pub fn is_empty(&self, dimension: Dimension) -> bool {
        self.count(dimension) == 0
    }

    /// The string-valued set behind a categorical dimension.
    pub fn categories_mut(&mut self, dimension: Dimension) -> Option<&mut BTreeSet<String>> {
        match dimension {
            Dimension::ConsumerClass => Some(&mut self.consumer_classes),
            Dimension::ActivityBranch => Some(&mut self.activity_branches),
            Dimension::Region => Some(&mut self.regions),
            Dimension::Year | Dimension::CovidPeriod => None,
        }
    }

    /// Whether `rec` passes every dimension of this selection.
    pub fn matches(&self, rec: &ConsumptionRecord) -> bool {
        self.years.contains(&rec.year())
            && self.consumer_classes.contains(&rec.consumer_class)
            && self.activity_branches.contains(&rec.activity_branch)
            && self.regions.contains(&rec.region)
            && rec
                .covid_indicator
                .is_some_and(|flag| self.covid_flags.contains(&flag))
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Return indices of records that pass all five selections.
pub fn filtered_indices(table: &ConsumptionTable, selections: &Selections) -> Vec<usize> {
    table
        .iter()
        .enumerate()
        .filter(|(_, rec)| selections.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

/// Build a new table holding only the records that pass all five selections.
/// The source table is left untouched.
pub fn filter(table: &ConsumptionTable, selections: &Selections) -> ConsumptionTable {
    if Dimension::ALL.iter().any(|d| selections.is_empty(*d)) {
        log::debug!("Empty selection set, filter yields no rows");
        return ConsumptionTable::default();
    }

    let filtered: ConsumptionTable = table
        .iter()
        .filter(|rec| selections.matches(rec))
        .cloned()
        .collect();
    log::debug!("Filter kept {} of {} rows", filtered.len(), table.len());
    filtered
}
