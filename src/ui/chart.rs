use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::color::generate_palette;
use crate::data::resolve::{Chart, Series};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Line chart (upper half of the central panel)
// ---------------------------------------------------------------------------

/// Render the chart chosen by the resolver, or its guidance message.
pub fn chart(ui: &mut Ui, state: &AppState, height: f32) {
    let Some(resolution) = &state.resolution else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a data source to begin  (File → Open…)");
        });
        return;
    };

    match &resolution.chart {
        Chart::TimeSeries(series) => {
            ui.strong("Indicators over time");
            line_chart(ui, "time_series", "Value", series, height);
        }
        Chart::Comparison { indicator, pivot } => {
            ui.strong(format!("{indicator} across selected countries"));
            line_chart(ui, "comparison", indicator, &pivot.series(), height);
        }
        Chart::None(guidance) => {
            ui.label(RichText::new(guidance.to_string()).color(Color32::LIGHT_YELLOW));
        }
    }
}

fn line_chart(ui: &mut Ui, id: &str, y_label: &str, series: &[Series], height: f32) {
    let colours = generate_palette(series.len());

    Plot::new(id)
        .legend(Legend::default())
        .height(height)
        .x_axis_label("Year")
        .y_axis_label(y_label)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (s, colour) in series.iter().zip(colours) {
                let points: PlotPoints = s
                    .points
                    .iter()
                    .map(|&(year, value)| [year as f64, value])
                    .collect();
                plot_ui.line(Line::new(points).name(&s.name).color(colour).width(2.0));
            }
        });
}
