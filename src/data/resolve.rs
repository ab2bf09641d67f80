use std::collections::BTreeMap;
use std::fmt;

use super::filter::{FilteredTable, Selection, filter_rows};
use super::model::PensionTable;

// ---------------------------------------------------------------------------
// Resolver output
// ---------------------------------------------------------------------------

/// What the table area shows.
#[derive(Debug, Clone, PartialEq)]
pub enum TableView {
    /// Nothing selected: show a prompt instead of an empty table.
    Prompt,
    Rows(FilteredTable),
}

/// One line of a time-series chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    /// (year, mean value), year ascending.
    pub points: Vec<(i64, f64)>,
}

/// Year × Country reshape of a single indicator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pivot {
    pub cells: BTreeMap<i64, BTreeMap<String, f64>>,
}

impl Pivot {
    pub fn get(&self, year: i64, country: &str) -> Option<f64> {
        self.cells.get(&year)?.get(country).copied()
    }

    /// Column axis: every country that has at least one cell.
    pub fn countries(&self) -> Vec<String> {
        let mut out: Vec<String> = self
            .cells
            .values()
            .flat_map(|row| row.keys().cloned())
            .collect();
        out.sort();
        out.dedup();
        out
    }

    /// The pivot read column-wise, one series per country.
    pub fn series(&self) -> Vec<Series> {
        self.countries()
            .into_iter()
            .map(|country| Series {
                points: self
                    .cells
                    .iter()
                    .filter_map(|(year, row)| row.get(&country).map(|v| (*year, *v)))
                    .collect(),
                name: country,
            })
            .collect()
    }
}

/// Why no chart is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guidance {
    NothingSelected,
    SelectIndicator,
    NarrowSelection,
}

impl fmt::Display for Guidance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Guidance::NothingSelected => {
                write!(f, "Select at least one country and one year to view data.")
            }
            Guidance::SelectIndicator => {
                write!(f, "Select at least one indicator to draw a chart.")
            }
            Guidance::NarrowSelection => write!(
                f,
                "Too many countries and indicators to chart together. \
                 Narrow the selection to one country or one indicator."
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Chart {
    /// One country: per-year mean of each indicator.
    TimeSeries(Vec<Series>),
    /// Several countries, one indicator.
    Comparison { indicator: String, pivot: Pivot },
    None(Guidance),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub view: TableView,
    pub chart: Chart,
}

impl Resolution {
    pub fn guidance(&self) -> Option<Guidance> {
        match self.chart {
            Chart::None(g) => Some(g),
            _ => None,
        }
    }

    /// Number of table rows shown.
    pub fn shown_rows(&self) -> usize {
        match &self.view {
            TableView::Rows(t) => t.len(),
            TableView::Prompt => 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Clone, Copy)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: Option<f64>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn value(self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

fn time_series(rows: &FilteredTable) -> Vec<Series> {
    rows.indicators
        .iter()
        .enumerate()
        .map(|(col, name)| {
            let mut by_year: BTreeMap<i64, Mean> = BTreeMap::new();
            for row in &rows.rows {
                by_year.entry(row.year).or_default().push(row.values[col]);
            }
            Series {
                name: name.clone(),
                points: by_year
                    .into_iter()
                    .filter_map(|(year, mean)| mean.value().map(|v| (year, v)))
                    .collect(),
            }
        })
        .collect()
}

/// Duplicate (Country, Year) rows are averaged.
fn comparison(rows: &FilteredTable) -> Pivot {
    let mut acc: BTreeMap<i64, BTreeMap<String, Mean>> = BTreeMap::new();
    for row in &rows.rows {
        acc.entry(row.year)
            .or_default()
            .entry(row.country.clone())
            .or_default()
            .push(row.values[0]);
    }

    let cells = acc
        .into_iter()
        .filter_map(|(year, row)| {
            let row: BTreeMap<String, f64> = row
                .into_iter()
                .filter_map(|(country, mean)| mean.value().map(|v| (country, v)))
                .collect();
            (!row.is_empty()).then_some((year, row))
        })
        .collect();

    Pivot { cells }
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

/// Decide the filtered table and the chart for a selection.
pub fn resolve(table: &PensionTable, selection: &Selection) -> Resolution {
    if selection.is_empty() {
        return Resolution {
            view: TableView::Prompt,
            chart: Chart::None(Guidance::NothingSelected),
        };
    }

    let rows = filter_rows(table, selection);
    let n_countries = selection.countries.len();
    let n_indicators = rows.indicators.len();

    let chart = if n_indicators == 0 {
        Chart::None(Guidance::SelectIndicator)
    } else if n_countries == 1 {
        Chart::TimeSeries(time_series(&rows))
    } else if n_indicators == 1 {
        Chart::Comparison {
            indicator: rows.indicators[0].clone(),
            pivot: comparison(&rows),
        }
    } else {
        Chart::None(Guidance::NarrowSelection)
    };

    log::debug!(
        "Resolved {} rows for {n_countries} countries / {n_indicators} indicators",
        rows.len()
    );

    Resolution {
        view: TableView::Rows(rows),
        chart,
    }
}
