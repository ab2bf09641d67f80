use std::collections::BTreeSet;

use super::model::PensionTable;

// ---------------------------------------------------------------------------
// Selection: the user's current filter choice
// ---------------------------------------------------------------------------

/// Chosen countries, years and indicators. Rebuilt on every interaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub countries: BTreeSet<String>,
    pub years: BTreeSet<i64>,
    pub indicators: BTreeSet<String>,
}

impl Selection {
    /// True when no row can match: no country or no year is chosen.
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty() || self.years.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct FilteredRow {
    pub country: String,
    pub year: i64,
    /// Values aligned with [`FilteredTable::indicators`].
    pub values: Vec<Option<f64>>,
}

/// Rows passing the selection, restricted to Country, Year and the chosen
/// indicator columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredTable {
    pub indicators: Vec<String>,
    pub rows: Vec<FilteredRow>,
}

impl FilteredTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Indices into [`PensionTable::indicators`] of the selected indicators, in
/// table order. Names the table does not know are skipped.
pub fn selected_indicator_indices(table: &PensionTable, selection: &Selection) -> Vec<usize> {
    table
        .indicators
        .iter()
        .enumerate()
        .filter(|(_, name)| selection.indicators.contains(*name))
        .map(|(i, _)| i)
        .collect()
}

/// Keep rows whose Country and Year are both selected, sorted by
/// (Country, Year).
pub fn filter_rows(table: &PensionTable, selection: &Selection) -> FilteredTable {
    let columns = selected_indicator_indices(table, selection);

    let mut rows: Vec<FilteredRow> = table
        .records
        .iter()
        .filter(|r| selection.countries.contains(&r.country) && selection.years.contains(&r.year))
        .map(|r| FilteredRow {
            country: r.country.clone(),
            year: r.year,
            values: columns.iter().map(|&c| r.values.get(c).copied().flatten()).collect(),
        })
        .collect();

    // stable: duplicate (Country, Year) rows keep source order
    rows.sort_by(|a, b| a.country.cmp(&b.country).then(a.year.cmp(&b.year)));

    FilteredTable {
        indicators: columns.iter().map(|&c| table.indicators[c].clone()).collect(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;

    fn table() -> PensionTable {
        let records = vec![
            Record { country: "US".into(), year: 2001, values: vec![Some(7.0), Some(1.0)] },
            Record { country: "FR".into(), year: 2000, values: vec![Some(9.0), None] },
            Record { country: "US".into(), year: 2000, values: vec![Some(5.0), Some(2.0)] },
            Record { country: "DE".into(), year: 2000, values: vec![Some(3.0), Some(4.0)] },
        ];
        PensionTable {
            countries: records.iter().map(|r| r.country.clone()).collect(),
            years: records.iter().map(|r| r.year).collect(),
            indicators: vec!["ValueA".into(), "ValueB".into()],
            records,
        }
    }

    fn selection(countries: &[&str], years: &[i64], indicators: &[&str]) -> Selection {
        Selection {
            countries: countries.iter().map(|s| s.to_string()).collect(),
            years: years.iter().copied().collect(),
            indicators: indicators.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn keeps_only_selected_countries_and_years() {
        let out = filter_rows(&table(), &selection(&["US", "FR"], &[2000], &["ValueA"]));
        let keys: Vec<_> = out.rows.iter().map(|r| (r.country.as_str(), r.year)).collect();
        assert_eq!(keys, vec![("FR", 2000), ("US", 2000)]);
        assert_eq!(out.indicators, vec!["ValueA"]);
        assert_eq!(out.rows[1].values, vec![Some(5.0)]);
    }

    #[test]
    fn rows_sorted_by_country_then_year() {
        let out = filter_rows(&table(), &selection(&["US"], &[2000, 2001], &[]));
        let years: Vec<_> = out.rows.iter().map(|r| r.year).collect();
        assert_eq!(years, vec![2000, 2001]);
        assert!(out.indicators.is_empty());
        assert!(out.rows.iter().all(|r| r.values.is_empty()));
    }

    #[test]
    fn indicator_columns_follow_table_order_and_skip_unknown() {
        let out = filter_rows(
            &table(),
            &selection(&["FR"], &[2000], &["ValueB", "Missing", "ValueA"]),
        );
        assert_eq!(out.indicators, vec!["ValueA", "ValueB"]);
        assert_eq!(out.rows[0].values, vec![Some(9.0), None]);
    }

    #[test]
    fn empty_year_selection_matches_nothing() {
        let sel = selection(&["US"], &[], &["ValueA"]);
        assert!(sel.is_empty());
        assert!(filter_rows(&table(), &sel).is_empty());
    }
}
