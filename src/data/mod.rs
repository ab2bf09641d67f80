/// Data layer: core types, loading, filtering and chart resolution.
///
/// Architecture:
/// ```text
///  .db / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read source → RawTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ PensionTable  │  (Country, Year) records, indicator columns
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  Selection → FilteredTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ resolve   │  FilteredTable → table view + chart decision
///   └──────────┘
/// ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod resolve;
