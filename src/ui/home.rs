// src/ui/home.rs
use eframe::egui;

use crate::model::TimeSeriesData;
use crate::state::AppState;
use crate::ui::charts::{build_time_series_charts, draw_line_chart, ChartSurfaces, LineChart, OVERALL_SURFACE};

/// The home trend charts and the time-series revision they were built from.
#[derive(Default)]
pub struct HomeCharts {
    surfaces: ChartSurfaces<LineChart>,
    revision: Option<u64>,
    order: Vec<String>,
}

impl HomeCharts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild every chart from `data` when `revision` is not the one they were
    /// built from. Returns whether anything was rebuilt.
    pub fn sync(&mut self, data: &TimeSeriesData, revision: u64) -> bool {
        if self.revision == Some(revision) {
            return false;
        }

        let built = build_time_series_charts(data);
        self.order = built.iter().map(|c| c.id.clone()).collect();
        let order = &self.order;
        self.surfaces.retain(|id| order.iter().any(|keep| keep == id));
        for chart in built {
            let id = chart.id.clone();
            self.surfaces.ensure(&id, revision, move || Some(chart));
        }
        self.revision = Some(revision);
        true
    }

    /// Chart ids in display order.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn get(&self, id: &str) -> Option<&LineChart> {
        self.surfaces.get(id)
    }

    pub fn clear(&mut self) {
        self.surfaces.clear();
        self.order.clear();
        self.revision = None;
    }

    pub fn live(&self) -> usize {
        self.surfaces.live()
    }
}

pub fn show_home(ui: &mut egui::Ui, state: &AppState, charts: &mut HomeCharts) {
    ui.heading("Course evaluation trends");
    ui.add_space(8.0);

    if state.loading_analysis {
        charts.clear();
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading time-series data...");
        });
        return;
    }

    let Some(data) = state.time_series.as_ref().filter(|d| !d.is_empty()) else {
        charts.clear();
        ui.label("No time-series data available. Upload comments to analyse them.");
        return;
    };

    charts.sync(data, state.time_series_revision);

    if let Some(overall) = charts.get(OVERALL_SURFACE) {
        draw_line_chart(ui, overall, 220.0);
    }
    ui.add_space(8.0);

    let categories: Vec<&LineChart> = charts
        .order()
        .iter()
        .filter(|id| id.as_str() != OVERALL_SURFACE)
        .filter_map(|id| charts.get(id))
        .collect();

    if categories.is_empty() {
        ui.label("No per-category time-series data available.");
        return;
    }

    // Two charts per row
    egui::Grid::new("category_trend_grid")
        .num_columns(2)
        .spacing([12.0, 12.0])
        .show(ui, |ui| {
            let width = (ui.available_width() / 2.0 - 12.0).max(200.0);
            for (index, chart) in categories.iter().enumerate() {
                ui.vertical(|ui| {
                    ui.set_width(width);
                    draw_line_chart(ui, chart, 180.0);
                });
                if index % 2 == 1 {
                    ui.end_row();
                }
            }
        });
}
