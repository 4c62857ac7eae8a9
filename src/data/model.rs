use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};

// ---------------------------------------------------------------------------
// Dimension – the five filterable axes of the dataset
// ---------------------------------------------------------------------------

/// A dimension the dashboard can filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    Year,
    ConsumerClass,
    ActivityBranch,
    Region,
    CovidPeriod,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Year,
        Dimension::ConsumerClass,
        Dimension::ActivityBranch,
        Dimension::Region,
        Dimension::CovidPeriod,
    ];

    /// Whether values of this dimension are free-text categories.
    pub fn is_categorical(self) -> bool {
        matches!(
            self,
            Dimension::ConsumerClass | Dimension::ActivityBranch | Dimension::Region
        )
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Dimension::Year => "Ano",
            Dimension::ConsumerClass => "Classe de Consumidor",
            Dimension::ActivityBranch => "Ramo de Atividade",
            Dimension::Region => "Região/Submercado",
            Dimension::CovidPeriod => "Período Covid",
        };
        write!(f, "{label}")
    }
}

// ---------------------------------------------------------------------------
// CovidPeriod – human label of the covid flag
// ---------------------------------------------------------------------------

/// Interpretation of the raw `covid_indicator` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CovidPeriod {
    PreCovid,
    PostCovid,
    /// Any flag outside `{0, 1}`; kept as-is since the loader does not validate it.
    Other(i32),
}

impl From<i32> for CovidPeriod {
    fn from(flag: i32) -> Self {
        match flag {
            0 => CovidPeriod::PreCovid,
            1 => CovidPeriod::PostCovid,
            other => CovidPeriod::Other(other),
        }
    }
}

impl fmt::Display for CovidPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CovidPeriod::PreCovid => write!(f, "Pré-Covid"),
            CovidPeriod::PostCovid => write!(f, "Pós-Covid"),
            CovidPeriod::Other(flag) => write!(f, "{flag}"),
        }
    }
}

// ---------------------------------------------------------------------------
// ConsumptionRecord – one row of the normalized table
// ---------------------------------------------------------------------------

/// A single consumption measurement, with columns already renamed to the
/// normalized vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumptionRecord {
    pub date: NaiveDate,
    pub consumer_class: String,
    pub activity_branch: String,
    /// Submarket the state trades in.
    pub region: String,
    pub state: String,
    /// `NaN` when the source cell was empty.
    pub consumption_mwh: f64,
    /// `None` when the source cell was empty or a missing-value marker.
    pub covid_indicator: Option<i32>,
}

impl ConsumptionRecord {
    /// Calendar year, always derived from `date`.
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// Month in `1..=12`, always derived from `date`.
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    pub fn covid_period(&self) -> Option<CovidPeriod> {
        self.covid_indicator.map(CovidPeriod::from)
    }
}

// ---------------------------------------------------------------------------
// ConsumptionTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// An immutable table of consumption records.
///
/// Rows live behind an `Arc<[_]>`, so clones are cheap and no caller can
/// mutate a table once it has been built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsumptionTable {
    records: Arc<[ConsumptionRecord]>,
}

impl ConsumptionTable {
    pub fn from_records(records: Vec<ConsumptionRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn records(&self) -> &[ConsumptionRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConsumptionRecord> {
        self.records.iter()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a ConsumptionTable {
    type Item = &'a ConsumptionRecord;
    type IntoIter = std::slice::Iter<'a, ConsumptionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<ConsumptionRecord> for ConsumptionTable {
    fn from_iter<I: IntoIterator<Item = ConsumptionRecord>>(iter: I) -> Self {
        Self::from_records(iter.into_iter().collect())
    }
}
