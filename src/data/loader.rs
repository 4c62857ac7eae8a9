use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

use super::model::{ConsumptionRecord, ConsumptionTable};

// ---------------------------------------------------------------------------
// Source layout
// ---------------------------------------------------------------------------

/// Day-first format of the `Data` column.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

pub const DATE_COLUMN: &str = "Data";
pub const CLASS_COLUMN: &str = "Classe";
pub const BRANCH_COLUMN: &str = "Ramo";
pub const REGION_COLUMN: &str = "Submercado";
pub const STATE_COLUMN: &str = "UF";
pub const CONSUMPTION_COLUMN: &str = "Consumo";
pub const COVID_COLUMN: &str = "Covid";

/// Cell contents read as a missing value, the same set pandas treats as NA.
pub const MISSING_MARKERS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Columns that must be present in the header; any others are ignored.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    DATE_COLUMN,
    CLASS_COLUMN,
    BRANCH_COLUMN,
    REGION_COLUMN,
    STATE_COLUMN,
    CONSUMPTION_COLUMN,
    COVID_COLUMN,
];

#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing expected column '{0}'")]
    MissingColumn(&'static str),
    #[error("row {row}: cannot parse date '{value}' (expected DD/MM/YYYY)")]
    InvalidDate { row: usize, value: String },
    #[error("row {row}: column '{column}' has non-numeric value '{value}'")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load and normalize a consumption CSV from disk.
pub fn load(path: &Path) -> Result<ConsumptionTable, DataLoadError> {
    let file = File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = load_reader(file)?;
    log::info!("Loaded {} records from {}", table.len(), path.display());
    Ok(table)
}

/// Parse consumption records from any reader producing comma-delimited text.
pub fn load_reader<R: Read>(reader: R) -> Result<ConsumptionTable, DataLoadError> {
    let mut reader = csv::Reader::from_reader(reader);
    let columns = ColumnIndex::resolve(reader.headers()?)?;

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        // 1-based data row, header excluded.
        let row = row_no + 1;
        records.push(columns.parse_row(&record, row)?);
    }

    log::debug!("Parsed {} rows", records.len());
    Ok(ConsumptionTable::from_records(records))
}

// ---------------------------------------------------------------------------
// Column resolution and row parsing
// ---------------------------------------------------------------------------

/// Positions of the required columns within a header row.
struct ColumnIndex {
    date: usize,
    class: usize,
    branch: usize,
    region: usize,
    state: usize,
    consumption: usize,
    covid: usize,
}

impl ColumnIndex {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, DataLoadError> {
        let names: Vec<&str> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim())
            .collect();
        let find = |name: &'static str| {
            names
                .iter()
                .position(|h| *h == name)
                .ok_or(DataLoadError::MissingColumn(name))
        };

        Ok(Self {
            date: find(DATE_COLUMN)?,
            class: find(CLASS_COLUMN)?,
            branch: find(BRANCH_COLUMN)?,
            region: find(REGION_COLUMN)?,
            state: find(STATE_COLUMN)?,
            consumption: find(CONSUMPTION_COLUMN)?,
            covid: find(COVID_COLUMN)?,
        })
    }

    fn parse_row(
        &self,
        record: &csv::StringRecord,
        row: usize,
    ) -> Result<ConsumptionRecord, DataLoadError> {
        let field = |idx: usize| record.get(idx).unwrap_or("");

        Ok(ConsumptionRecord {
            date: parse_date(field(self.date), row)?,
            consumer_class: field(self.class).to_string(),
            activity_branch: field(self.branch).to_string(),
            region: field(self.region).to_string(),
            state: field(self.state).to_string(),
            consumption_mwh: parse_consumption(field(self.consumption), row)?,
            covid_indicator: parse_flag(field(self.covid), row)?,
        })
    }
}

fn parse_date(s: &str, row: usize) -> Result<NaiveDate, DataLoadError> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).map_err(|_| DataLoadError::InvalidDate {
        row,
        value: s.to_string(),
    })
}

fn is_missing(s: &str) -> bool {
    MISSING_MARKERS.contains(&s)
}

/// Missing cells stay missing (`NaN`) instead of failing the load.
fn parse_consumption(s: &str, row: usize) -> Result<f64, DataLoadError> {
    let s = s.trim();
    if is_missing(s) {
        return Ok(f64::NAN);
    }
    s.parse::<f64>().map_err(|_| DataLoadError::InvalidNumber {
        row,
        column: CONSUMPTION_COLUMN,
        value: s.to_string(),
    })
}

/// Accepts `1` as well as float-formatted integers such as `1.0`.
/// Missing cells load as `None`.
fn parse_flag(s: &str, row: usize) -> Result<Option<i32>, DataLoadError> {
    let s = s.trim();
    if is_missing(s) {
        return Ok(None);
    }
    if let Ok(i) = s.parse::<i32>() {
        return Ok(Some(i));
    }
    let in_range = |f: f64| (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(&f);
    match s.parse::<f64>() {
        Ok(f) if f.fract() == 0.0 && in_range(f) => Ok(Some(f as i32)),
        _ => Err(DataLoadError::InvalidNumber {
            row,
            column: COVID_COLUMN,
            value: s.to_string(),
        }),
    }
}
