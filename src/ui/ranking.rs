// src/ui/ranking.rs
use eframe::egui;

use crate::controller::Action;
use crate::format::format_score;
use crate::model::{tag_badges, Cluster, TagBadge};

pub fn badge(ui: &mut egui::Ui, text: String, fill: egui::Color32) {
    egui::Frame::none()
        .fill(fill)
        .rounding(4.0)
        .inner_margin(egui::Margin::symmetric(6.0, 2.0))
        .show(ui, |ui| {
            ui.label(egui::RichText::new(text).small().color(egui::Color32::WHITE));
        });
}

pub fn show_badges(ui: &mut egui::Ui, badges: &[TagBadge], detailed: bool) {
    if badges.is_empty() {
        return;
    }
    ui.horizontal_wrapped(|ui| {
        for tag in badges {
            if detailed {
                badge(ui, tag.detail_label(), egui::Color32::from_rgb(13, 110, 153));
            } else {
                badge(ui, tag.compact_label(), egui::Color32::DARK_GRAY);
            }
        }
    });
}

/// Clusters in the order given, with a button per row that asks for details.
pub fn show_ranking(ui: &mut egui::Ui, clusters: &[Cluster], urgency_tag: &str, actions: &mut Vec<Action>) {
    if clusters.is_empty() {
        ui.label("No importance ranking data available.");
        return;
    }

    ui.heading("Important comment ranking");
    ui.add_space(4.0);

    egui::ScrollArea::vertical()
        .id_source("ranking_scroll")
        .show(ui, |ui| {
            for (index, cluster) in clusters.iter().enumerate() {
                ui.group(|ui| {
                    ui.set_width(ui.available_width());

                    ui.horizontal(|ui| {
                        ui.strong(format!(
                            "{}. Score: {} (comments: {})",
                            index + 1,
                            cluster.score,
                            cluster.comment_count
                        ));
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            if ui.button("View comments").clicked() {
                                actions.push(Action::ClusterClicked(cluster.cluster_id));
                            }
                        });
                    });

                    ui.label(format!("Representative: {}", cluster.representative_text));
                    show_badges(ui, &tag_badges(cluster.tags.as_ref(), urgency_tag), false);

                    if !cluster.comments_examples.is_empty() {
                        egui::CollapsingHeader::new(format!("Examples ({})", cluster.comments_examples.len()))
                            .id_source(("cluster_examples", cluster.cluster_id))
                            .show(ui, |ui| {
                                for example in &cluster.comments_examples {
                                    ui.label(format!("• {}", example.text));
                                    ui.small(format!(
                                        "Score: {} / {}",
                                        format_score(example.importance_score),
                                        example.sentiment_label()
                                    ));
                                }
                            });
                    }
                });
                ui.add_space(4.0);
            }
        });
}
