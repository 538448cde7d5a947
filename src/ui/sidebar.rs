// src/ui/sidebar.rs
use eframe::egui;

use crate::controller::Action;
use crate::state::route::Route;
use crate::state::{AppState, MessageStatus, UploadMessage};

pub fn message_color(status: MessageStatus) -> egui::Color32 {
    match status {
        MessageStatus::Info => egui::Color32::from_rgb(13, 110, 253),
        MessageStatus::Success => egui::Color32::from_rgb(25, 135, 84),
        MessageStatus::Error => egui::Color32::from_rgb(220, 53, 69),
    }
}

fn show_message(ui: &mut egui::Ui, message: &UploadMessage) {
    let color = message_color(message.status);
    egui::Frame::none()
        .stroke(egui::Stroke::new(1.0, color))
        .rounding(4.0)
        .inner_margin(egui::Margin::same(6.0))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.colored_label(color, &message.text);
        });
}

/// Navigation links, the upload form and the shared status banner.
pub fn show_sidebar(ui: &mut egui::Ui, state: &AppState, actions: &mut Vec<Action>) {
    ui.heading("Navigation");
    ui.add_space(4.0);

    let home_active = state.route == Route::Home && state.session_id.is_none();
    if ui.selectable_label(home_active, "Home (evaluation trends)").clicked() {
        actions.push(Action::Navigate("/".to_string()));
    }
    if ui.selectable_label(state.route == Route::History, "Analysis history").clicked() {
        actions.push(Action::Navigate("/history".to_string()));
    }

    ui.add_space(8.0);
    ui.separator();
    ui.heading("Upload");
    ui.add_space(4.0);

    ui.add_enabled_ui(!state.loading_upload, |ui| {
        ui.horizontal(|ui| {
            if ui.button("Choose CSV...").clicked() {
                actions.push(Action::BrowseFile);
            }
        });

        let selected = state
            .selected_file
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|name| name.to_string_lossy().into_owned());
        match selected {
            Some(name) => ui.label(name),
            None => ui.weak("No file selected"),
        };

        ui.add_space(4.0);
        let label = if state.loading_upload { "Processing..." } else { "Upload & analyse" };
        let button = egui::Button::new(label).min_size(egui::vec2(ui.available_width(), 0.0));
        if ui.add(button).clicked() {
            actions.push(Action::Upload);
        }
    });

    if state.loading_upload {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Processing...");
        });
    }

    if let Some(message) = &state.message {
        ui.add_space(8.0);
        show_message(ui, message);
    }
}

/// Back, forward, reload and the address field.
pub fn show_toolbar(
    ui: &mut egui::Ui,
    address: &mut String,
    can_go_back: bool,
    can_go_forward: bool,
    actions: &mut Vec<Action>,
) {
    egui::menu::bar(ui, |ui| {
        if ui.add_enabled(can_go_back, egui::Button::new("◀")).on_hover_text("Back (Alt+Left)").clicked() {
            actions.push(Action::Back);
        }
        if ui.add_enabled(can_go_forward, egui::Button::new("▶")).on_hover_text("Forward (Alt+Right)").clicked() {
            actions.push(Action::Forward);
        }
        if ui.button("⟳").on_hover_text("Reload (F5)").clicked() {
            actions.push(Action::Reload);
        }

        let response = ui.add(
            egui::TextEdit::singleline(address)
                .desired_width(320.0)
                .hint_text("/analysis/1"),
        );
        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
            actions.push(Action::Navigate(address.clone()));
        }

        ui.separator();
        if ui.button("Settings").clicked() {
            actions.push(Action::OpenSettings);
        }
    });
}
