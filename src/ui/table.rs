use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::filter::FilteredTable;
use crate::data::resolve::TableView;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Data table (lower half of the central panel)
// ---------------------------------------------------------------------------

pub fn data_table(ui: &mut Ui, state: &AppState) {
    let Some(resolution) = &state.resolution else {
        return;
    };

    match &resolution.view {
        TableView::Prompt => {
            ui.label(RichText::new("Select at least one country and one year to view data.").italics());
        }
        TableView::Rows(rows) if rows.is_empty() => {
            ui.label("No rows match the current selection.");
        }
        TableView::Rows(rows) => rows_table(ui, rows),
    }
}

fn format_value(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.2}")).unwrap_or_default()
}

fn rows_table(ui: &mut Ui, table: &FilteredTable) {
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(120.0))
        .column(Column::auto().at_least(60.0))
        .columns(Column::auto().at_least(80.0), table.indicators.len())
        .header(20.0, |mut header| {
            header.col(|ui| {
                ui.strong("Country");
            });
            header.col(|ui| {
                ui.strong("Year");
            });
            for name in &table.indicators {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, table.rows.len(), |mut row| {
                let record = &table.rows[row.index()];
                row.col(|ui| {
                    ui.label(&record.country);
                });
                row.col(|ui| {
                    ui.label(record.year.to_string());
                });
                for value in &record.values {
                    row.col(|ui| {
                        ui.label(format_value(*value));
                    });
                }
            });
        });
}
