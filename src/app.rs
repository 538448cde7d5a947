// src/app.rs
use std::path::PathBuf;

use eframe::egui;
use rfd::FileDialog;
use serde::{Deserialize, Serialize};

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::controller::{Action, Controller};
use crate::state::route::Route;
use crate::state::AnalysisTab;
use crate::ui::chart_panel::PnSurfaces;
use crate::ui::home::HomeCharts;
use crate::ui::settings::SettingsDialog;
use crate::ui::{analysis, detail, fonts, history, home, sidebar};
use crate::worker::Worker;

const VIEW_KEY: &str = "comment_insight_view";

/// What survives a restart. Analysis data is always fetched fresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SavedView {
    path: String,
    tab: AnalysisTab,
}

pub struct InsightApp {
    controller: Controller,
    worker: Worker,
    config: AppConfig,
    address: String,
    shown_path: String,
    pn_surfaces: PnSurfaces,
    home_charts: HomeCharts,
    settings: SettingsDialog,
}

impl InsightApp {
    /// `restore_view` lets the last session's path and tab win over `config.start_path`.
    pub fn new(cc: &eframe::CreationContext<'_>, config: AppConfig, config_path: Option<PathBuf>, restore_view: bool) -> Self {
        fonts::install(&cc.egui_ctx, config.font_path.as_deref());

        let saved: Option<SavedView> = if restore_view {
            cc.storage.and_then(|storage| eframe::get_value(storage, VIEW_KEY))
        } else {
            None
        };

        let ctx = cc.egui_ctx.clone();
        let mut worker = Worker::spawn(ApiClient::from_config(&config), move || ctx.request_repaint());

        let mut controller = Controller::new();
        let start_path = saved.as_ref().map_or(config.start_path.as_str(), |view| view.path.as_str());
        controller.start(start_path, &mut worker);
        if let Some(view) = &saved {
            controller.select_tab(view.tab);
        }

        let path = controller.state.path.clone();
        Self {
            controller,
            worker,
            config,
            address: path.clone(),
            shown_path: path,
            pn_surfaces: PnSurfaces::new(),
            home_charts: HomeCharts::new(),
            settings: SettingsDialog::new(config_path),
        }
    }

    fn shortcut_actions(ctx: &egui::Context, actions: &mut Vec<Action>) {
        ctx.input(|i| {
            let back = (i.modifiers.alt && i.key_pressed(egui::Key::ArrowLeft))
                || i.pointer.button_pressed(egui::PointerButton::Extra1);
            let forward = (i.modifiers.alt && i.key_pressed(egui::Key::ArrowRight))
                || i.pointer.button_pressed(egui::PointerButton::Extra2);

            if back {
                actions.push(Action::Back);
            }
            if forward {
                actions.push(Action::Forward);
            }
            if i.key_pressed(egui::Key::F5) {
                actions.push(Action::Reload);
            }
        });
    }

    fn apply_actions(&mut self, actions: Vec<Action>) {
        for action in actions {
            match action {
                Action::BrowseFile => {
                    let file_dialog = FileDialog::new()
                        .add_filter("CSV files", &["csv"])
                        .set_title("Choose comment CSV");
                    if let Some(path) = file_dialog.pick_file() {
                        self.controller.select_file(path);
                    }
                }
                Action::OpenSettings => self.settings.open(&self.config),
                action => self.controller.apply(action, &mut self.worker),
            }
        }
    }

    fn apply_settings(&mut self, next: AppConfig) {
        tracing::info!(server = %next.server_url, "settings changed");
        self.worker.reconfigure(ApiClient::from_config(&next));
        self.config = next;
    }

    fn show_not_found(ui: &mut egui::Ui, path: &str, actions: &mut Vec<Action>) {
        ui.heading("Page not found");
        ui.label(format!("Nothing lives at {}.", path));
        if ui.link("Go to the home page").clicked() {
            actions.push(Action::Navigate("/".to_string()));
        }
    }
}

impl eframe::App for InsightApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        for completion in self.worker.drain() {
            self.controller.complete(completion, &mut self.worker);
        }

        if self.controller.state.path != self.shown_path {
            self.shown_path = self.controller.state.path.clone();
            self.address = self.shown_path.clone();
        }

        // The detail overlay is modal
        let modal = self.controller.state.modal_open();

        let mut actions = Vec::new();
        if !modal {
            Self::shortcut_actions(ctx, &mut actions);
        }

        let can_go_back = self.controller.history().can_go_back();
        let can_go_forward = self.controller.history().can_go_forward();
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.set_enabled(!modal);
            sidebar::show_toolbar(ui, &mut self.address, can_go_back, can_go_forward, &mut actions);
        });

        let state = &self.controller.state;
        egui::SidePanel::left("sidebar")
            .resizable(false)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.set_enabled(!modal);
                sidebar::show_sidebar(ui, state, &mut actions);
            });

        // Charts of views that are off screen are torn down
        if !state.shows_home() {
            self.home_charts.clear();
        }
        if !state.shows_analysis() || state.active_tab != AnalysisTab::PnCharts {
            self.pn_surfaces.clear();
        }

        let urgency_tag = self.config.urgency_tag.as_str();
        let home_charts = &mut self.home_charts;
        let pn_surfaces = &mut self.pn_surfaces;
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.set_enabled(!modal);
            egui::ScrollArea::vertical()
                .id_source("main_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    if state.shows_home() {
                        home::show_home(ui, state, home_charts);
                    }
                    if state.shows_analysis() {
                        if state.shows_home() {
                            ui.add_space(16.0);
                            ui.separator();
                        }
                        analysis::show_analysis(ui, state, pn_surfaces, urgency_tag, &mut actions);
                    }
                    if state.shows_history() {
                        history::show_history(ui, state, &mut actions);
                    }
                    if state.route == Route::NotFound {
                        Self::show_not_found(ui, &state.path, &mut actions);
                    }
                });
        });

        detail::show_detail(ctx, state.detail_visible(), urgency_tag, &mut actions);

        if let Some(next) = self.settings.show(ctx, &self.config) {
            self.apply_settings(next);
        }

        self.apply_actions(actions);
    }

    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let view = SavedView {
            path: self.controller.state.path.clone(),
            tab: self.controller.state.active_tab,
        };
        eframe::set_value(storage, VIEW_KEY, &view);
    }
}
