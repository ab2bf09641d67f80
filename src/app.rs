use eframe::egui;

use crate::state::AppState;
use crate::ui::{chart, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PensionDashboardApp {
    pub state: AppState,
}

impl PensionDashboardApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for PensionDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: chart above, table below ----
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.table.is_some() {
                ui.heading(self.state.title());
                ui.add_space(4.0);
            }
            let chart_height = (ui.available_height() * 0.5).max(200.0);
            chart::chart(ui, &self.state, chart_height);
            ui.separator();
            table::data_table(ui, &self.state);
        });
    }
}
