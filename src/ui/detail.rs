// src/ui/detail.rs
use eframe::egui;

use crate::controller::Action;
use crate::format::format_score;
use crate::model::{tag_badges, ClusterDetail};
use crate::ui::ranking::show_badges;

pub fn detail_title(detail: &ClusterDetail) -> String {
    format!("Comments in cluster {}", detail.cluster_id)
}

/// Modal listing every comment of a cluster. Draws nothing without a payload.
pub fn show_detail(ctx: &egui::Context, detail: Option<&ClusterDetail>, urgency_tag: &str, actions: &mut Vec<Action>) {
    let Some(detail) = detail else {
        return;
    };

    let mut open = true;
    let mut close_clicked = false;

    egui::Window::new(detail_title(detail))
        .id(egui::Id::new("cluster_detail"))
        .open(&mut open)
        .collapsible(false)
        .resizable(true)
        .default_size([640.0, 480.0])
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.strong("Representative comment:");
            ui.label(&detail.representative_text);
            ui.add_space(8.0);
            ui.strong(format!("Comments ({}):", detail.comments.len()));

            egui::ScrollArea::vertical()
                .id_source("detail_scroll")
                .max_height(360.0)
                .show(ui, |ui| {
                    for comment in &detail.comments {
                        ui.group(|ui| {
                            ui.set_width(ui.available_width());
                            ui.small(format!("Score: {}", format_score(comment.importance_score)));
                            ui.label(&comment.text);
                            ui.small(format!(
                                "Category: {}, Sentiment: {}, Danger: {}",
                                comment.category_label(),
                                comment.sentiment_label(),
                                comment.danger_label()
                            ));
                            show_badges(ui, &tag_badges(comment.tags.as_ref(), urgency_tag), true);
                        });
                    }
                });

            ui.separator();
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Close").clicked() {
                    close_clicked = true;
                }
            });
        });

    if !open || close_clicked {
        actions.push(Action::CloseDetail);
    }
}
