// src/ui/settings.rs
use std::path::PathBuf;

use eframe::egui;

use crate::config::AppConfig;

/// Edits the backend address and timeouts. Saving writes the config file
/// and hands the new config back to the app.
#[derive(Default)]
pub struct SettingsDialog {
    open: bool,
    server_url: String,
    request_timeout_secs: String,
    upload_timeout_secs: String,
    error: Option<String>,
    config_path: Option<PathBuf>,
}

impl SettingsDialog {
    pub fn new(config_path: Option<PathBuf>) -> Self {
        Self { config_path, ..Self::default() }
    }

    pub fn open(&mut self, config: &AppConfig) {
        self.server_url = config.server_url.clone();
        self.request_timeout_secs = config.request_timeout_secs.to_string();
        self.upload_timeout_secs = config.upload_timeout_secs.to_string();
        self.error = None;
        self.open = true;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Build the edited config, or explain why it is not acceptable.
    pub fn edited(&self, current: &AppConfig) -> Result<AppConfig, String> {
        let parse = |label: &str, value: &str| {
            value
                .trim()
                .parse::<u64>()
                .map_err(|_| format!("{} must be a whole number of seconds", label))
        };

        let mut next = current.clone();
        next.server_url = self.server_url.trim().trim_end_matches('/').to_string();
        next.request_timeout_secs = parse("Request timeout", &self.request_timeout_secs)?;
        next.upload_timeout_secs = parse("Upload timeout", &self.upload_timeout_secs)?;
        next.validate().map_err(|e| e.to_string())?;
        Ok(next)
    }

    pub fn show(&mut self, ctx: &egui::Context, current: &AppConfig) -> Option<AppConfig> {
        if !self.open {
            return None;
        }

        let mut applied = None;
        let mut should_close = false;

        egui::Window::new("Settings")
            .collapsible(false)
            .resizable(false)
            .fixed_size([360.0, 200.0])
            .show(ctx, |ui| {
                egui::Grid::new("settings_grid")
                    .num_columns(2)
                    .spacing([8.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("Server URL:").on_hover_text("Base address of the analysis backend");
                        ui.add(
                            egui::TextEdit::singleline(&mut self.server_url)
                                .desired_width(240.0)
                                .hint_text("http://127.0.0.1:8000"),
                        );
                        ui.end_row();

                        ui.label("Request timeout (s):");
                        ui.add(egui::TextEdit::singleline(&mut self.request_timeout_secs).desired_width(80.0));
                        ui.end_row();

                        ui.label("Upload timeout (s):");
                        ui.add(egui::TextEdit::singleline(&mut self.upload_timeout_secs).desired_width(80.0));
                        ui.end_row();
                    });

                if let Some(path) = &self.config_path {
                    ui.weak(format!("Saved to {}", path.display()));
                }
                if let Some(error) = &self.error {
                    ui.colored_label(egui::Color32::RED, error);
                }

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Cancel").clicked() {
                        should_close = true;
                    }

                    if ui.button("Save").clicked() {
                        match self.edited(current) {
                            Ok(next) => {
                                if let Some(path) = &self.config_path {
                                    if let Err(e) = next.save(path) {
                                        tracing::error!("failed to save settings: {:#}", e);
                                        self.error = Some(format!("Could not save settings: {}", e));
                                        return;
                                    }
                                }
                                applied = Some(next);
                                should_close = true;
                            }
                            Err(message) => self.error = Some(message),
                        }
                    }
                });
            });

        if should_close {
            self.open = false;
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_are_validated() {
        let current = AppConfig::default();
        let mut dialog = SettingsDialog::new(None);
        dialog.open(&current);
        assert!(dialog.is_open());

        dialog.server_url = " https://insight.example.org/ ".to_string();
        dialog.upload_timeout_secs = "900".to_string();
        let next = dialog.edited(&current).unwrap();
        assert_eq!(next.server_url, "https://insight.example.org");
        assert_eq!(next.upload_timeout_secs, 900);
        assert_eq!(next.urgency_tag, current.urgency_tag);

        dialog.request_timeout_secs = "soon".to_string();
        assert!(dialog.edited(&current).unwrap_err().contains("Request timeout"));

        dialog.request_timeout_secs = "30".to_string();
        dialog.server_url = "ftp://nope".to_string();
        assert!(dialog.edited(&current).is_err());
    }
}
