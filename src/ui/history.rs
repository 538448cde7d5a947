// src/ui/history.rs
use eframe::egui;

use crate::controller::Action;
use crate::format::{format_date_time, format_percent};
use crate::model::AnalysisSession;
use crate::state::AppState;

pub fn session_heading(session: &AnalysisSession) -> String {
    format!("{} - {}", format_date_time(&session.created_at), session.csv_filename)
}

pub fn session_summary(session: &AnalysisSession) -> String {
    format!(
        "Comments: {} / P: {} / N: {} / Dangerous: {}",
        session.total_comments,
        format_percent(session.overall_positive_percent),
        format_percent(session.overall_negative_percent),
        session.dangerous_comment_count
    )
}

pub fn show_history(ui: &mut egui::Ui, state: &AppState, actions: &mut Vec<Action>) {
    if state.loading_history {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading analysis history...");
        });
        return;
    }

    if state.sessions.is_empty() {
        ui.label("No analysis history yet. Upload a CSV to run an analysis.");
        return;
    }

    ui.heading("Analysis history");
    ui.add_space(4.0);

    egui::ScrollArea::vertical()
        .id_source("history_scroll")
        .show(ui, |ui| {
            for session in &state.sessions {
                let response = ui
                    .group(|ui| {
                        ui.set_width(ui.available_width());
                        ui.horizontal(|ui| {
                            ui.vertical(|ui| {
                                ui.strong(session_heading(session));
                                ui.small(session_summary(session));
                            });
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                ui.button("View details").clicked()
                            })
                            .inner
                        })
                        .inner
                    });

                // The whole row is clickable, not just the button
                let row = response.response.interact(egui::Sense::click());
                if response.inner || row.clicked() {
                    actions.push(Action::SessionClicked(session.id));
                }
                ui.add_space(4.0);
            }
        });
}
