// src/ui/analysis.rs
use eframe::egui;

use crate::controller::Action;
use crate::state::{AnalysisTab, AppState};
use crate::ui::chart_panel::{show_pn_chart, PnSurfaces};
use crate::ui::ranking::show_ranking;

pub const TOTAL_PN_SURFACE: &str = "pn:total";

pub fn page_title(session_id: Option<i64>) -> String {
    match session_id {
        Some(id) => format!("Analysis results (history session ID: {})", id),
        None => "Latest analysis results".to_string(),
    }
}

pub fn tab_label(tab: AnalysisTab) -> &'static str {
    match tab {
        AnalysisTab::PnCharts => "PN ratio charts",
        AnalysisTab::Ranking => "Important comment ranking",
        AnalysisTab::AiComment => "AI analysis comment",
    }
}

pub fn show_analysis(
    ui: &mut egui::Ui,
    state: &AppState,
    surfaces: &mut PnSurfaces,
    urgency_tag: &str,
    actions: &mut Vec<Action>,
) {
    ui.heading(page_title(state.session_id));
    ui.add_space(4.0);

    ui.horizontal(|ui| {
        for tab in [AnalysisTab::PnCharts, AnalysisTab::Ranking, AnalysisTab::AiComment] {
            if ui.selectable_label(state.active_tab == tab, tab_label(tab)).clicked() {
                actions.push(Action::SelectTab(tab));
            }
        }
    });
    ui.separator();

    if state.loading_analysis {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading analysis results...");
        });
        return;
    }

    match state.active_tab {
        AnalysisTab::PnCharts => show_pn_tab(ui, state, surfaces),
        AnalysisTab::Ranking => show_ranking(ui, &state.top_clusters, urgency_tag, actions),
        AnalysisTab::AiComment => {
            ui.group(|ui| {
                ui.set_width(ui.available_width());
                ui.strong("AI analysis comment");
                ui.add_space(4.0);
                if state.ai_comment.is_empty() {
                    ui.label("No AI analysis comment available.");
                } else {
                    // Labels wrap and keep the backend's line breaks
                    ui.label(&state.ai_comment);
                }
            });
        }
    }
}

fn show_pn_tab(ui: &mut egui::Ui, state: &AppState, surfaces: &mut PnSurfaces) {
    let charts = state.pn_charts.as_ref();

    // Surfaces of categories that are no longer in the payload
    let keep: Vec<String> = charts
        .map(|c| c.category_pn_charts.keys().map(|k| category_surface(k)).collect())
        .unwrap_or_default();
    surfaces.retain(|id| id == TOTAL_PN_SURFACE || keep.iter().any(|k| k == id));

    egui::ScrollArea::vertical()
        .id_source("pn_scroll")
        .show(ui, |ui| {
            ui.columns(2, |columns| {
                show_pn_chart(
                    &mut columns[0],
                    surfaces,
                    TOTAL_PN_SURFACE,
                    state.pn_revision,
                    "Overall comment PN ratio",
                    charts.map(|c| c.total_pn_chart.as_str()),
                );

                match charts.filter(|c| !c.category_pn_charts.is_empty()) {
                    Some(charts) => {
                        for (category, payload) in &charts.category_pn_charts {
                            show_pn_chart(
                                &mut columns[1],
                                surfaces,
                                &category_surface(category),
                                state.pn_revision,
                                &format!("Category: {} PN ratio", category),
                                Some(payload.as_str()),
                            );
                            columns[1].add_space(8.0);
                        }
                    }
                    None => {
                        columns[1].label("No per-category PN ratio data available.");
                    }
                }
            });
        });
}

fn category_surface(category: &str) -> String {
    format!("pn:category:{}", category)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_names_the_pinned_session() {
        assert!(page_title(Some(17)).contains("17"));
        assert_eq!(page_title(None), "Latest analysis results");
    }

    #[test]
    fn every_tab_has_a_label() {
        let labels: Vec<_> = [AnalysisTab::PnCharts, AnalysisTab::Ranking, AnalysisTab::AiComment]
            .into_iter()
            .map(tab_label)
            .collect();
        assert_eq!(labels.len(), 3);
        assert!(labels.iter().all(|l| !l.is_empty()));
    }
}
