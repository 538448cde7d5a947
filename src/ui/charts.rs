// src/ui/charts.rs
//! Drawing-surface bookkeeping and the time-series line charts.
use std::collections::HashMap;

use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints, Points};

use crate::format::{date_label, format_percent};
use crate::model::TimeSeriesData;

struct Surface<H> {
    generation: u64,
    // None when the last build for this generation failed
    handle: Option<H>,
}

/// Owned chart handles keyed by surface id. At most one handle per surface
/// is alive; replacing one drops the old handle before building the next.
pub struct ChartSurfaces<H> {
    surfaces: HashMap<String, Surface<H>>,
}

impl<H> ChartSurfaces<H> {
    pub fn new() -> Self {
        Self { surfaces: HashMap::new() }
    }

    /// The handle for `surface`, rebuilt only when `generation` differs from
    /// the one it was built for. A failed build is remembered and not retried
    /// until the generation changes.
    pub fn ensure<F>(&mut self, surface: &str, generation: u64, build: F) -> Option<&H>
    where
        F: FnOnce() -> Option<H>,
    {
        let stale = self
            .surfaces
            .get(surface)
            .map_or(true, |existing| existing.generation != generation);

        if stale {
            // Destroy before create
            self.surfaces.remove(surface);
            let handle = build();
            self.surfaces
                .insert(surface.to_string(), Surface { generation, handle });
        }

        self.surfaces.get(surface).and_then(|s| s.handle.as_ref())
    }

    pub fn get(&self, surface: &str) -> Option<&H> {
        self.surfaces.get(surface).and_then(|s| s.handle.as_ref())
    }

    pub fn release(&mut self, surface: &str) {
        self.surfaces.remove(surface);
    }

    /// Drop every surface whose id does not satisfy `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.surfaces.retain(|id, _| keep(id));
    }

    pub fn clear(&mut self) {
        self.surfaces.clear();
    }

    /// Number of live handles.
    pub fn live(&self) -> usize {
        self.surfaces.values().filter(|s| s.handle.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

impl<H> Default for ChartSurfaces<H> {
    fn default() -> Self {
        Self::new()
    }
}

const PALETTE: [egui::Color32; 6] = [
    egui::Color32::from_rgb(75, 192, 192),
    egui::Color32::from_rgb(255, 99, 132),
    egui::Color32::from_rgb(54, 162, 235),
    egui::Color32::from_rgb(255, 159, 64),
    egui::Color32::from_rgb(153, 102, 255),
    egui::Color32::from_rgb(201, 203, 207),
];

/// A prepared positive-ratio line chart over the session dates.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChart {
    pub id: String,
    pub title: String,
    pub series_name: String,
    pub color: egui::Color32,
    /// Runs of consecutive present values, as (x, y) with x the date index.
    pub segments: Vec<Vec<[f64; 2]>>,
    pub labels: Vec<String>,
}

impl LineChart {
    pub fn new(id: &str, title: String, series_name: String, color: egui::Color32, values: &[Option<f64>], dates: &[String]) -> Self {
        let mut segments = Vec::new();
        let mut current: Vec<[f64; 2]> = Vec::new();
        for (x, value) in values.iter().enumerate() {
            match value {
                Some(y) if y.is_finite() => current.push([x as f64, *y]),
                _ => {
                    if !current.is_empty() {
                        segments.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if !current.is_empty() {
            segments.push(current);
        }

        Self {
            id: id.to_string(),
            title,
            series_name,
            color,
            segments,
            labels: dates.iter().map(|d| date_label(d)).collect(),
        }
    }

    pub fn point_count(&self) -> usize {
        self.segments.iter().map(Vec::len).sum()
    }

    pub fn last_value(&self) -> Option<f64> {
        self.segments.last().and_then(|s| s.last()).map(|p| p[1])
    }
}

pub const OVERALL_SURFACE: &str = "overall";

pub fn category_surface(category: &str) -> String {
    format!("category:{}", category)
}

/// One chart for the overall ratio, then one per category in key order.
pub fn build_time_series_charts(data: &TimeSeriesData) -> Vec<LineChart> {
    let mut charts = vec![LineChart::new(
        OVERALL_SURFACE,
        "Overall positive comment ratio".to_string(),
        "Overall positive %".to_string(),
        PALETTE[0],
        &data.aligned_overall(),
        &data.dates,
    )];

    for (index, category) in data.category_positive_percents.keys().enumerate() {
        charts.push(LineChart::new(
            &category_surface(category),
            format!("Category: {} positive comment ratio", category),
            format!("{} positive %", category),
            PALETTE[(index + 1) % PALETTE.len()],
            &data.aligned_category(category),
            &data.dates,
        ));
    }

    charts
}

pub fn draw_line_chart(ui: &mut egui::Ui, chart: &LineChart, height: f32) {
    ui.group(|ui| {
        ui.vertical(|ui| {
            ui.heading(&chart.title);

            let plot = Plot::new(format!("plot_{}", chart.id))
                .height(height)
                .allow_zoom(false)
                .allow_drag(false)
                .allow_scroll(false)
                .include_y(0.0)
                .include_y(100.0)
                .include_x(0.0)
                .legend(Legend::default());

            plot.show(ui, |plot_ui| {
                for segment in &chart.segments {
                    if segment.len() == 1 {
                        plot_ui.points(
                            Points::new(PlotPoints::from(segment.clone()))
                                .radius(3.0)
                                .color(chart.color)
                                .name(&chart.series_name),
                        );
                    } else {
                        plot_ui.line(
                            Line::new(PlotPoints::from(segment.clone()))
                                .color(chart.color)
                                .width(2.0)
                                .name(&chart.series_name),
                        );
                    }
                }
            });

            // x axis is the date index; spell the dates out underneath
            if !chart.labels.is_empty() {
                ui.horizontal_wrapped(|ui| {
                    for (index, label) in chart.labels.iter().enumerate() {
                        ui.small(format!("{}: {}", index, label));
                    }
                });
            }
            if let Some(last) = chart.last_value() {
                ui.label(format!("Latest: {}", format_percent(last)));
            }
        });
    });
}
