use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::config::SelectionLimits;
use crate::data::filter::Selection;
use crate::data::model::PensionTable;
use crate::data::resolve::{Resolution, resolve};

// ---------------------------------------------------------------------------
// Analysis mode
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisMode {
    SingleCountry,
    CompareCountries,
    Explore,
}

impl AnalysisMode {
    pub const ALL: [AnalysisMode; 3] = [
        AnalysisMode::SingleCountry,
        AnalysisMode::CompareCountries,
        AnalysisMode::Explore,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AnalysisMode::SingleCountry => "Single Country",
            AnalysisMode::CompareCountries => "Compare Countries",
            AnalysisMode::Explore => "Explore",
        }
    }

    pub fn country_limit(self, limits: SelectionLimits) -> Option<usize> {
        match self {
            AnalysisMode::SingleCountry => Some(1),
            AnalysisMode::CompareCountries => Some(limits.max_countries),
            AnalysisMode::Explore => None,
        }
    }

    pub fn indicator_limit(self, limits: SelectionLimits) -> Option<usize> {
        match self {
            AnalysisMode::SingleCountry => Some(limits.max_indicators),
            AnalysisMode::CompareCountries => Some(1),
            AnalysisMode::Explore => None,
        }
    }
}

/// Keep the first `limit` entries in sorted order.
fn truncate_set<T: Ord>(set: &mut BTreeSet<T>, limit: Option<usize>) {
    if let Some(limit) = limit {
        while set.len() > limit {
            set.pop_last();
        }
    }
}

/// Which filter list an edit applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    Countries,
    Years,
    Indicators,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded table (None until a source loads successfully).
    pub table: Option<PensionTable>,

    /// Path the table was read from.
    pub source: Option<PathBuf>,

    /// SQLite table name used for database sources.
    pub table_name: String,

    pub mode: AnalysisMode,
    pub limits: SelectionLimits,
    pub selection: Selection,

    /// Resolver output for the current selection (cached).
    pub resolution: Option<Resolution>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new("pension_data", SelectionLimits::default())
    }
}

impl AppState {
    pub fn new(table_name: &str, limits: SelectionLimits) -> Self {
        Self {
            table: None,
            source: None,
            table_name: table_name.to_string(),
            mode: AnalysisMode::SingleCountry,
            limits,
            selection: Selection::default(),
            resolution: None,
            status_message: None,
        }
    }

    /// Load a source and make it the current table. Errors go to the status line.
    pub fn load(&mut self, path: PathBuf) {
        match crate::data::loader::load_source(&path, &self.table_name) {
            Ok(table) => {
                self.source = Some(path);
                self.set_table(table);
            }
            Err(e) => {
                log::error!("Failed to load {}: {e:#}", path.display());
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest a newly loaded table and reset the selection.
    pub fn set_table(&mut self, table: PensionTable) {
        self.selection = Selection {
            countries: table.countries.iter().take(1).cloned().collect(),
            years: table.years.clone(),
            indicators: BTreeSet::new(),
        };
        self.table = Some(table);
        self.status_message = None;
        self.refresh();
    }

    /// Re-run the resolver for the current selection.
    pub fn refresh(&mut self) {
        self.resolution = self
            .table
            .as_ref()
            .map(|table| resolve(table, &self.selection));
    }

    /// Switch mode, trimming the selection to the new mode's limits. A facet
    /// driven by a combo box is never left empty.
    pub fn set_mode(&mut self, mode: AnalysisMode) {
        self.mode = mode;
        truncate_set(&mut self.selection.countries, mode.country_limit(self.limits));
        truncate_set(&mut self.selection.indicators, mode.indicator_limit(self.limits));

        if let Some(table) = &self.table {
            if mode == AnalysisMode::SingleCountry && self.selection.countries.is_empty() {
                self.selection.countries.extend(table.countries.iter().take(1).cloned());
            }
            if mode == AnalysisMode::CompareCountries && self.selection.indicators.is_empty() {
                self.selection.indicators.extend(table.indicators.iter().take(1).cloned());
            }
        }
        self.refresh();
    }

    fn limit(&self, facet: Facet) -> Option<usize> {
        match facet {
            Facet::Countries => self.mode.country_limit(self.limits),
            Facet::Indicators => self.mode.indicator_limit(self.limits),
            Facet::Years => None,
        }
    }

    /// Whether another value can be added to `facet` without exceeding the mode's limit.
    pub fn can_add(&self, facet: Facet) -> bool {
        let len = match facet {
            Facet::Countries => self.selection.countries.len(),
            Facet::Years => self.selection.years.len(),
            Facet::Indicators => self.selection.indicators.len(),
        };
        self.limit(facet).map_or(true, |limit| len < limit)
    }

    pub fn toggle_country(&mut self, country: &str) {
        if self.selection.countries.contains(country) {
            self.selection.countries.remove(country);
        } else if self.can_add(Facet::Countries) {
            self.selection.countries.insert(country.to_string());
        } else {
            log::warn!("Country limit reached, not adding {country}");
            return;
        }
        self.refresh();
    }

    pub fn toggle_indicator(&mut self, indicator: &str) {
        if self.selection.indicators.contains(indicator) {
            self.selection.indicators.remove(indicator);
        } else if self.can_add(Facet::Indicators) {
            self.selection.indicators.insert(indicator.to_string());
        } else {
            log::warn!("Indicator limit reached, not adding {indicator}");
            return;
        }
        self.refresh();
    }

    pub fn toggle_year(&mut self, year: i64) {
        if !self.selection.years.remove(&year) {
            self.selection.years.insert(year);
        }
        self.refresh();
    }

    /// Replace the country selection with a single country (combo boxes).
    pub fn choose_country(&mut self, country: &str) {
        self.selection.countries = BTreeSet::from([country.to_string()]);
        self.refresh();
    }

    /// Replace the indicator selection with a single indicator (combo boxes).
    pub fn choose_indicator(&mut self, indicator: &str) {
        self.selection.indicators = BTreeSet::from([indicator.to_string()]);
        self.refresh();
    }

    /// Select every value of a facet, up to the mode's limit.
    pub fn select_all(&mut self, facet: Facet) {
        let Some(table) = &self.table else {
            return;
        };
        let limit = self.limit(facet);
        match facet {
            Facet::Countries => {
                self.selection.countries = table.countries.clone();
                truncate_set(&mut self.selection.countries, limit);
            }
            Facet::Years => self.selection.years = table.years.clone(),
            Facet::Indicators => {
                self.selection.indicators = table.indicators.iter().cloned().collect();
                truncate_set(&mut self.selection.indicators, limit);
            }
        }
        self.refresh();
    }

    pub fn select_none(&mut self, facet: Facet) {
        match facet {
            Facet::Countries => self.selection.countries.clear(),
            Facet::Years => self.selection.years.clear(),
            Facet::Indicators => self.selection.indicators.clear(),
        }
        self.refresh();
    }

    /// Heading for the central panel.
    pub fn title(&self) -> String {
        match (self.mode, self.selection.countries.len()) {
            (AnalysisMode::CompareCountries, _) => {
                "Pension Data Comparison Across Countries".to_string()
            }
            (_, 1) => {
                let country = self.selection.countries.iter().next().cloned().unwrap_or_default();
                format!("Pension Data Dashboard: {country}")
            }
            (_, 0) => "Pension Data Dashboard".to_string(),
            _ => "Pension Data Comparison Across Countries".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;
    use crate::data::resolve::{Chart, Guidance};

    fn table() -> PensionTable {
        let mut records = Vec::new();
        for country in ["DE", "FR", "JP", "US"] {
            for year in [2000, 2001] {
                records.push(Record {
                    country: country.into(),
                    year,
                    values: vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)],
                });
            }
        }
        PensionTable {
            countries: records.iter().map(|r| r.country.clone()).collect(),
            years: records.iter().map(|r| r.year).collect(),
            indicators: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            records,
        }
    }

    fn state() -> AppState {
        let mut state = AppState::new(
            "pension_data",
            SelectionLimits {
                max_countries: 2,
                max_indicators: 2,
            },
        );
        state.set_table(table());
        state
    }

    #[test]
    fn initial_selection_is_first_country_all_years() {
        let state = state();
        assert_eq!(state.selection.countries, BTreeSet::from(["DE".to_string()]));
        assert_eq!(state.selection.years, BTreeSet::from([2000, 2001]));
        assert_eq!(
            state.resolution.as_ref().and_then(Resolution::guidance),
            Some(Guidance::SelectIndicator)
        );
        assert_eq!(state.title(), "Pension Data Dashboard: DE");
    }

    #[test]
    fn single_country_mode_caps_indicators() {
        let mut state = state();
        state.toggle_indicator("A");
        state.toggle_indicator("B");
        state.toggle_indicator("C");
        assert_eq!(state.selection.indicators.len(), 2);
        assert!(!state.can_add(Facet::Indicators));
        assert!(matches!(
            state.resolution.as_ref().map(|r| &r.chart),
            Some(Chart::TimeSeries(series)) if series.len() == 2
        ));
    }

    #[test]
    fn switching_to_compare_trims_selection() {
        let mut state = state();
        state.set_mode(AnalysisMode::Explore);
        state.select_all(Facet::Countries);
        state.select_all(Facet::Indicators);
        assert_eq!(state.selection.countries.len(), 4);
        assert_eq!(
            state.resolution.as_ref().and_then(Resolution::guidance),
            Some(Guidance::NarrowSelection)
        );

        state.set_mode(AnalysisMode::CompareCountries);
        assert_eq!(
            state.selection.countries,
            BTreeSet::from(["DE".to_string(), "FR".to_string()])
        );
        assert_eq!(state.selection.indicators, BTreeSet::from(["A".to_string()]));
        assert!(matches!(
            state.resolution.as_ref().map(|r| &r.chart),
            Some(Chart::Comparison { .. })
        ));
        assert_eq!(state.title(), "Pension Data Comparison Across Countries");
    }

    #[test]
    fn compare_mode_defaults_to_first_indicator() {
        let mut state = state();
        assert!(state.selection.indicators.is_empty());

        state.set_mode(AnalysisMode::CompareCountries);
        assert_eq!(state.selection.indicators, BTreeSet::from(["A".to_string()]));
        assert_eq!(state.selection.countries, BTreeSet::from(["DE".to_string()]));

        state.toggle_country("US");
        let Some(Chart::Comparison { indicator, .. }) = state.resolution.as_ref().map(|r| &r.chart)
        else {
            panic!("expected comparison chart");
        };
        assert_eq!(indicator, "A");
    }

    #[test]
    fn single_country_mode_defaults_to_first_country() {
        let mut state = state();
        state.set_mode(AnalysisMode::Explore);
        state.select_none(Facet::Countries);

        state.set_mode(AnalysisMode::SingleCountry);
        assert_eq!(state.selection.countries, BTreeSet::from(["DE".to_string()]));
        assert_eq!(state.title(), "Pension Data Dashboard: DE");
    }

    #[test]
    fn clearing_years_prompts() {
        let mut state = state();
        state.select_none(Facet::Years);
        assert_eq!(
            state.resolution.as_ref().and_then(Resolution::guidance),
            Some(Guidance::NothingSelected)
        );
        state.toggle_year(2001);
        assert_eq!(state.selection.years, BTreeSet::from([2001]));
    }

    #[test]
    fn failed_load_keeps_previous_table() {
        let mut state = state();
        state.load(PathBuf::from("missing.unknown"));
        assert!(state.status_message.is_some());
        assert_eq!(state.table.as_ref().map(PensionTable::len), Some(8));
    }
}
