use std::collections::BTreeSet;
use std::fmt;

use super::error::DataError;

/// Name of the required country column.
pub const COUNTRY_COLUMN: &str = "Country";
/// Name of the required year column.
pub const YEAR_COLUMN: &str = "Year";

// ---------------------------------------------------------------------------
// CellValue – a single cell as read from a source
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the value types of SQLite / CSV / Arrow.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    /// Numeric value of the cell. NaN counts as missing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) if !v.is_nan() => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Coerce the cell to an integer year. Floats are truncated toward zero.
    pub fn as_year(&self) -> Option<i64> {
        match self {
            CellValue::Integer(i) => Some(*i),
            CellValue::Float(v) if v.is_finite() => Some(v.trunc() as i64),
            CellValue::String(s) => {
                let s = s.trim();
                s.parse::<i64>().ok().or_else(|| {
                    s.parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite())
                        .map(|v| v.trunc() as i64)
                })
            }
            _ => None,
        }
    }

    /// Text label of the cell, used for the country key.
    pub fn as_label(&self) -> Option<String> {
        match self {
            CellValue::String(s) if s.is_empty() => None,
            CellValue::Null => None,
            other => Some(other.to_string()),
        }
    }

    fn is_null(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(v) => v.is_nan(),
            _ => false,
        }
    }

    fn is_numeric(&self) -> bool {
        matches!(self, CellValue::Integer(_) | CellValue::Float(_))
    }
}

// ---------------------------------------------------------------------------
// RawTable – untyped output of every loader
// ---------------------------------------------------------------------------

/// Column names plus rows of cells, in source order.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// A column is numeric when it holds at least one value and every
    /// non-missing value is an integer or a float.
    fn is_numeric_column(&self, idx: usize) -> bool {
        let mut seen = false;
        for cell in self.rows.iter().filter_map(|row| row.get(idx)) {
            if cell.is_null() {
                continue;
            }
            if !cell.is_numeric() {
                return false;
            }
            seen = true;
        }
        seen
    }
}

// ---------------------------------------------------------------------------
// Record – one (Country, Year) row of the pension table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub country: String,
    pub year: i64,
    /// Indicator values, aligned with [`PensionTable::indicators`].
    pub values: Vec<Option<f64>>,
}

// ---------------------------------------------------------------------------
// PensionTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The loaded table with pre-computed filter domains.
#[derive(Debug, Clone, Default)]
pub struct PensionTable {
    pub records: Vec<Record>,
    /// Numeric columns other than Country/Year, in source order.
    pub indicators: Vec<String>,
    /// Distinct countries, sorted.
    pub countries: BTreeSet<String>,
    /// Distinct years, sorted.
    pub years: BTreeSet<i64>,
}

impl PensionTable {
    /// Type a raw table: locate Country/Year, detect indicator columns and
    /// drop rows without a usable Year or Country.
    pub fn from_raw(raw: RawTable) -> Result<Self, DataError> {
        let country_idx = raw
            .column_index(COUNTRY_COLUMN)
            .ok_or(DataError::MissingColumn(COUNTRY_COLUMN))?;
        let year_idx = raw
            .column_index(YEAR_COLUMN)
            .ok_or(DataError::MissingColumn(YEAR_COLUMN))?;

        let indicator_cols: Vec<(usize, String)> = raw
            .columns
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != country_idx && *i != year_idx)
            .filter(|(i, _)| raw.is_numeric_column(*i))
            .map(|(i, name)| (i, name.clone()))
            .collect();

        let mut records = Vec::with_capacity(raw.rows.len());
        let mut countries = BTreeSet::new();
        let mut years = BTreeSet::new();
        let mut missing_year = 0usize;
        let mut missing_country = 0usize;

        for row in &raw.rows {
            let Some(year) = row.get(year_idx).and_then(CellValue::as_year) else {
                missing_year += 1;
                continue;
            };
            let Some(country) = row.get(country_idx).and_then(CellValue::as_label) else {
                missing_country += 1;
                continue;
            };

            let values = indicator_cols
                .iter()
                .map(|(i, _)| row.get(*i).and_then(CellValue::as_f64))
                .collect();

            countries.insert(country.clone());
            years.insert(year);
            records.push(Record {
                country,
                year,
                values,
            });
        }

        if missing_year > 0 {
            log::info!("Dropped {missing_year} rows without a usable {YEAR_COLUMN}");
        }
        if missing_country > 0 {
            log::info!("Dropped {missing_country} rows without a {COUNTRY_COLUMN}");
        }

        Ok(PensionTable {
            records,
            indicators: indicator_cols.into_iter().map(|(_, name)| name).collect(),
            countries,
            years,
        })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    fn raw(columns: &[&str], rows: Vec<Vec<CellValue>>) -> RawTable {
        RawTable {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    #[test]
    fn year_coercion() {
        assert_eq!(CellValue::Integer(2001).as_year(), Some(2001));
        assert_eq!(CellValue::Float(2001.0).as_year(), Some(2001));
        assert_eq!(CellValue::Float(2001.7).as_year(), Some(2001));
        assert_eq!(s(" 1999 ").as_year(), Some(1999));
        assert_eq!(s("2004.0").as_year(), Some(2004));
        assert_eq!(CellValue::Float(f64::NAN).as_year(), None);
        assert_eq!(s("n/a").as_year(), None);
        assert_eq!(CellValue::Null.as_year(), None);
    }

    #[test]
    fn drops_rows_without_year_or_country() {
        let table = PensionTable::from_raw(raw(
            &["Country", "Year", "Assets"],
            vec![
                vec![s("US"), CellValue::Integer(2000), CellValue::Float(5.0)],
                vec![s("US"), CellValue::Null, CellValue::Float(6.0)],
                vec![s("FR"), CellValue::Float(f64::NAN), CellValue::Float(7.0)],
                vec![CellValue::Null, CellValue::Integer(2001), CellValue::Float(8.0)],
                vec![s("FR"), s("2001"), CellValue::Integer(9)],
            ],
        ))
        .unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.years, BTreeSet::from([2000, 2001]));
        assert_eq!(
            table.countries.iter().cloned().collect::<Vec<_>>(),
            vec!["FR".to_string(), "US".to_string()]
        );
        assert_eq!(table.records[1].values, vec![Some(9.0)]);
    }

    #[test]
    fn detects_numeric_indicator_columns_in_source_order() {
        let table = PensionTable::from_raw(raw(
            &["Replacement", "Country", "Note", "Year", "Assets", "Empty", "Flag"],
            vec![
                vec![
                    CellValue::Float(40.0),
                    s("US"),
                    s("x"),
                    CellValue::Integer(2000),
                    CellValue::Null,
                    CellValue::Null,
                    CellValue::Bool(true),
                ],
                vec![
                    CellValue::Integer(41),
                    s("US"),
                    CellValue::Null,
                    CellValue::Integer(2001),
                    CellValue::Float(3.5),
                    CellValue::Null,
                    CellValue::Bool(false),
                ],
            ],
        ))
        .unwrap();

        assert_eq!(table.indicators, vec!["Replacement", "Assets"]);
        assert_eq!(table.records[0].values, vec![Some(40.0), None]);
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let err = PensionTable::from_raw(raw(&["Country", "Value"], Vec::new())).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn("Year")));
    }
}
