/// Data layer: core types, loading, caching and filtering.
///
/// Architecture:
/// ```text
///   CCEE_BR_Data.csv
///        │
///        ▼
///   ┌──────────┐
///   │  cache   │  path + mtime → Arc<ConsumptionTable>
///   └──────────┘
///        │ (miss)
///        ▼
///   ┌──────────┐
///   │  loader  │  parse CSV, rename columns → ConsumptionTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────────────┐
///   │ ConsumptionTable │  immutable Vec<ConsumptionRecord>
///   └──────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter  │  apply per-dimension selections → filtered table
///   └──────────┘
/// ```

pub mod cache;
pub mod filter;
pub mod loader;
pub mod model;

pub use cache::LoadCache;
pub use filter::{filter, filtered_indices, Selections};
pub use loader::{load, load_reader, DataLoadError};
pub use model::{ConsumptionRecord, ConsumptionTable, CovidPeriod, Dimension};
