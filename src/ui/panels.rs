use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::{AnalysisMode, AppState, Facet};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    let Some(table) = &state.table else {
        ui.label("No data loaded.");
        return;
    };

    // Clone what we need so we can mutate state inside the widgets.
    let countries: Vec<String> = table.countries.iter().cloned().collect();
    let years: Vec<i64> = table.years.iter().copied().collect();
    let indicators = table.indicators.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Analysis mode ----
            ui.strong("Choose Analysis Mode");
            let mut mode = state.mode;
            for m in AnalysisMode::ALL {
                ui.radio_value(&mut mode, m, m.label());
            }
            if mode != state.mode {
                state.set_mode(mode);
            }
            ui.separator();

            // ---- Countries ----
            if state.mode == AnalysisMode::SingleCountry {
                ui.strong("Select Country");
                let current = state.selection.countries.iter().next().cloned().unwrap_or_default();
                egui::ComboBox::from_id_salt("country")
                    .selected_text(&current)
                    .show_ui(ui, |ui: &mut Ui| {
                        for c in &countries {
                            if ui.selectable_label(current == *c, c).clicked() {
                                state.choose_country(c);
                            }
                        }
                    });
            } else {
                facet_list(ui, state, Facet::Countries, "Countries", &countries, |s, c| {
                    s.selection.countries.contains(c)
                });
            }
            ui.separator();

            // ---- Indicators ----
            if indicators.is_empty() {
                ui.label("No numeric indicators in this table.");
            } else if state.mode == AnalysisMode::CompareCountries {
                ui.strong("Select Numeric Indicator to Compare");
                let current = state.selection.indicators.iter().next().cloned().unwrap_or_default();
                egui::ComboBox::from_id_salt("indicator")
                    .selected_text(&current)
                    .show_ui(ui, |ui: &mut Ui| {
                        for i in &indicators {
                            if ui.selectable_label(current == *i, i).clicked() {
                                state.choose_indicator(i);
                            }
                        }
                    });
            } else {
                facet_list(ui, state, Facet::Indicators, "Indicators", &indicators, |s, i| {
                    s.selection.indicators.contains(i)
                });
            }
            ui.separator();

            // ---- Years ----
            let year_labels: Vec<String> = years.iter().map(|y| y.to_string()).collect();
            facet_list(ui, state, Facet::Years, "Years", &year_labels, |s, y| {
                y.parse::<i64>().is_ok_and(|y| s.selection.years.contains(&y))
            });
        });
}

/// A collapsible checkbox list for one facet with All/None buttons.
/// Unchecked entries are disabled once the mode's limit is reached.
fn facet_list(
    ui: &mut Ui,
    state: &mut AppState,
    facet: Facet,
    title: &str,
    values: &[String],
    is_selected: impl Fn(&AppState, &str) -> bool,
) {
    let n_selected = values.iter().filter(|v| is_selected(state, v)).count();
    let header_text = format!("{title}  ({n_selected}/{})", values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(facet);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(facet);
                }
            });

            for value in values {
                let mut checked = is_selected(state, value);
                let enabled = checked || state.can_add(facet);
                let response = ui.add_enabled(enabled, egui::Checkbox::new(&mut checked, value));
                if response.changed() {
                    match facet {
                        Facet::Countries => state.toggle_country(value),
                        Facet::Indicators => state.toggle_indicator(value),
                        Facet::Years => {
                            if let Ok(year) = value.parse::<i64>() {
                                state.toggle_year(year);
                            }
                        }
                    }
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(table) = &state.table {
            let shown = state.resolution.as_ref().map_or(0, |r| r.shown_rows());
            ui.label(format!("{} rows loaded, {shown} shown", table.len()));
        }
        if let Some(path) = &state.source {
            ui.separator();
            ui.label(RichText::new(path.display().to_string()).weak());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open pension data")
        .add_filter("Supported files", &["db", "sqlite", "sqlite3", "csv", "json", "parquet", "pq"])
        .add_filter("SQLite", &["db", "sqlite", "sqlite3"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.load(path);
    }
}
