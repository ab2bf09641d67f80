use std::path::PathBuf;

use clap::Parser;

// ---------------------------------------------------------------------------
// Command line / environment configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Parser)]
#[command(name = "pension-dashboard", version, about = "Interactive pension data dashboard")]
pub struct Config {
    /// Data source: SQLite database, CSV, JSON or Parquet file.
    #[arg(long, env = "PENSION_DASHBOARD_SOURCE", default_value = "cleaned_data.db")]
    pub source: PathBuf,

    /// Table to read when the source is a SQLite database.
    #[arg(long, env = "PENSION_DASHBOARD_TABLE", default_value = "pension_data")]
    pub table: String,

    /// Maximum number of countries in "Compare Countries" mode.
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u16).range(1..))]
    pub max_countries: u16,

    /// Maximum number of indicators in "Single Country" mode.
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u16).range(1..))]
    pub max_indicators: u16,
}

impl Config {
    pub fn limits(&self) -> SelectionLimits {
        SelectionLimits {
            max_countries: self.max_countries as usize,
            max_indicators: self.max_indicators as usize,
        }
    }
}

/// Caps applied by the restricted analysis modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionLimits {
    pub max_countries: usize,
    pub max_indicators: usize,
}

impl Default for SelectionLimits {
    fn default() -> Self {
        Self {
            max_countries: 5,
            max_indicators: 3,
        }
    }
}
