// src/controller.rs
//! Root controller: owns `AppState`, turns user actions into requests and
//! completed requests into state.
use std::collections::HashMap;
use std::path::PathBuf;

use crate::state::route::{self, Fetch, NavHistory, Navigation, SessionChange, Trigger};
use crate::state::{AnalysisTab, AppState, UploadMessage};
use crate::worker::{AnalysisStage, Completion, Job, JobSink, Outcome, Slot, Ticket};

const RESULTS_FAILED: &str = "Failed to load the analysis results.";
const COMMENT_FAILED: &str = "Failed to load the AI analysis comment.";
const SESSIONS_FAILED: &str = "Failed to load the analysis history.";
const TIME_SERIES_FAILED: &str = "Failed to load the time-series data.";
const CLUSTER_FAILED: &str = "Failed to load the cluster details.";
const UPLOAD_FAILED: &str = "The file upload failed.";
const UPLOAD_STARTED: &str = "Uploading the file and running the analysis...";
const UPLOAD_DONE: &str = "Upload and analysis finished. Loading the results...";
const NO_FILE: &str = "Choose a CSV file to upload first.";

/// Things views ask for. Applied after the frame is drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Navigate(String),
    Back,
    Forward,
    Reload,
    SelectTab(AnalysisTab),
    ClusterClicked(i64),
    SessionClicked(i64),
    CloseDetail,
    BrowseFile,
    FileChosen(PathBuf),
    Upload,
    OpenSettings,
}

#[derive(Debug)]
pub struct Controller {
    pub state: AppState,
    history: NavHistory,
    generations: HashMap<Slot, u64>,
}

impl Controller {
    pub fn new() -> Self {
        Self {
            state: AppState::new(),
            history: NavHistory::new("/"),
            generations: HashMap::new(),
        }
    }

    pub fn history(&self) -> &NavHistory {
        &self.history
    }

    /// Initial mount: look at the starting path once and fetch what it needs.
    pub fn start(&mut self, path: &str, sink: &mut dyn JobSink) {
        self.history = NavHistory::new(path);
        let nav = route::resolve(path, Trigger::Initial);
        tracing::info!(path = %nav.path, "starting");
        self.apply_navigation(nav, sink);
    }

    /// In-app navigation: new history entry, then the route's fetches.
    pub fn navigate(&mut self, path: &str, sink: &mut dyn JobSink) {
        let nav = route::resolve(path, Trigger::Navigate);
        tracing::info!(path = %nav.path, "navigate");
        self.history.push(&nav.path);
        self.apply_navigation(nav, sink);
    }

    pub fn go_back(&mut self, sink: &mut dyn JobSink) {
        if let Some(path) = self.history.back() {
            self.pop_to(&path, sink);
        }
    }

    pub fn go_forward(&mut self, sink: &mut dyn JobSink) {
        if let Some(path) = self.history.forward() {
            self.pop_to(&path, sink);
        }
    }

    /// Re-run the current entry as if the app had just started on it.
    pub fn reload(&mut self, sink: &mut dyn JobSink) {
        let nav = route::resolve(self.history.current(), Trigger::Initial);
        tracing::info!(path = %nav.path, "reload");
        self.apply_navigation(nav, sink);
    }

    fn pop_to(&mut self, path: &str, sink: &mut dyn JobSink) {
        let nav = route::resolve(path, Trigger::HistoryPop);
        tracing::info!(path = %nav.path, "history pop");
        self.apply_navigation(nav, sink);
    }

    fn apply_navigation(&mut self, nav: Navigation, sink: &mut dyn JobSink) {
        self.dismiss_detail();
        self.state.path = nav.path;
        self.state.route = nav.route;
        match nav.session {
            SessionChange::Keep => {}
            SessionChange::Clear => self.state.session_id = None,
            SessionChange::Pin(id) => self.state.session_id = Some(id),
        }

        for fetch in nav.fetches {
            match fetch {
                Fetch::TimeSeries => self.fetch_time_series_data(sink),
                Fetch::Sessions => self.fetch_analysis_sessions(sink),
                Fetch::Analysis(session_id) => self.fetch_analysis_results(session_id, sink),
            }
        }
    }

    fn issue(&mut self, job: Job, sink: &mut dyn JobSink) {
        let slot = job.slot();
        let generation = self.generations.entry(slot).or_insert(0);
        *generation += 1;
        let ticket = Ticket { slot, generation: *generation };
        sink.submit(ticket, job);
    }

    /// Make any request already in flight for `slot` stale.
    fn supersede(&mut self, slot: Slot) {
        *self.generations.entry(slot).or_insert(0) += 1;
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        self.generations.get(&ticket.slot) == Some(&ticket.generation)
    }

    pub fn fetch_analysis_results(&mut self, session_id: Option<i64>, sink: &mut dyn JobSink) {
        self.state.loading_analysis = true;
        self.issue(Job::AnalysisResults { session_id }, sink);
    }

    pub fn fetch_analysis_sessions(&mut self, sink: &mut dyn JobSink) {
        self.state.loading_history = true;
        self.issue(Job::Sessions, sink);
    }

    /// Shares `loading_analysis` with the analysis view.
    pub fn fetch_time_series_data(&mut self, sink: &mut dyn JobSink) {
        self.state.loading_analysis = true;
        self.issue(Job::TimeSeries, sink);
    }

    pub fn select_file(&mut self, file: PathBuf) {
        self.state.selected_file = Some(file);
    }

    pub fn handle_file_upload(&mut self, sink: &mut dyn JobSink) {
        if self.state.loading_upload {
            return;
        }
        let Some(file) = self.state.selected_file.clone() else {
            self.state.message = Some(UploadMessage::error(NO_FILE));
            return;
        };

        self.state.message = Some(UploadMessage::info(UPLOAD_STARTED));
        self.state.loading_upload = true;
        self.issue(Job::Upload { file }, sink);
    }

    pub fn handle_cluster_click(&mut self, cluster_id: i64, sink: &mut dyn JobSink) {
        let session_id = self.state.session_id;
        self.issue(Job::ClusterDetail { cluster_id, session_id }, sink);
    }

    pub fn handle_history_session_click(&mut self, session_id: i64, sink: &mut dyn JobSink) {
        self.dismiss_detail();
        self.state.session_id = Some(session_id);
        self.fetch_analysis_results(Some(session_id), sink);

        let path = route::analysis_path(session_id);
        self.history.push(&path);
        self.state.path = path;
        self.state.route = route::Route::Analysis;
    }

    pub fn select_tab(&mut self, tab: AnalysisTab) {
        self.state.active_tab = tab;
    }

    pub fn close_detail(&mut self) {
        self.state.show_detail = false;
        self.state.selected_detail = None;
    }

    /// Leaving a page closes its overlay, including one still being fetched.
    fn dismiss_detail(&mut self) {
        self.close_detail();
        self.supersede(Slot::ClusterDetail);
    }

    /// Apply a view action. `BrowseFile` and `OpenSettings` belong to the app shell.
    pub fn apply(&mut self, action: Action, sink: &mut dyn JobSink) {
        match action {
            Action::Navigate(path) => self.navigate(&path, sink),
            Action::Back => self.go_back(sink),
            Action::Forward => self.go_forward(sink),
            Action::Reload => self.reload(sink),
            Action::SelectTab(tab) => self.select_tab(tab),
            // The overlay is modal
            Action::ClusterClicked(_) if self.state.modal_open() => {}
            Action::ClusterClicked(id) => self.handle_cluster_click(id, sink),
            Action::SessionClicked(id) => self.handle_history_session_click(id, sink),
            Action::CloseDetail => self.close_detail(),
            Action::FileChosen(file) => self.select_file(file),
            Action::Upload => self.handle_file_upload(sink),
            Action::BrowseFile | Action::OpenSettings => {}
        }
    }

    pub fn complete(&mut self, completion: Completion, sink: &mut dyn JobSink) {
        let Completion { ticket, outcome } = completion;
        if !self.is_current(ticket) {
            tracing::debug!(?ticket, "discarding superseded response");
            return;
        }

        match outcome {
            Outcome::Analysis(result) => {
                match result {
                    Ok((results, comment)) => {
                        self.state.set_pn_charts(Some(results.pn_charts));
                        self.state.top_clusters = results.top_clusters;
                        self.state.ai_comment = comment.comment;
                    }
                    Err((stage, error)) => {
                        tracing::error!(?stage, "error fetching analysis results: {}", error);
                        let fallback = match stage {
                            AnalysisStage::Results => RESULTS_FAILED,
                            AnalysisStage::Comment => COMMENT_FAILED,
                        };
                        self.state.message = Some(UploadMessage::error(error.user_message(fallback)));
                        self.state.clear_analysis();
                    }
                }
                self.state.loading_analysis = false;
            }
            Outcome::Sessions(result) => {
                match result {
                    Ok(sessions) => self.state.sessions = sessions,
                    Err(error) => {
                        tracing::error!("error fetching analysis sessions: {}", error);
                        self.state.message = Some(UploadMessage::error(error.user_message(SESSIONS_FAILED)));
                        self.state.sessions.clear();
                    }
                }
                self.state.loading_history = false;
            }
            Outcome::TimeSeries(result) => {
                match result {
                    Ok(data) => self.state.set_time_series(Some(data)),
                    Err(error) => {
                        tracing::error!("error fetching time-series data: {}", error);
                        self.state.message = Some(UploadMessage::error(error.user_message(TIME_SERIES_FAILED)));
                        self.state.set_time_series(None);
                    }
                }
                self.state.loading_analysis = false;
            }
            Outcome::ClusterDetail(result) => match result {
                Ok(detail) => {
                    self.state.selected_detail = Some(detail);
                    self.state.show_detail = true;
                }
                Err(error) => {
                    tracing::error!("error fetching cluster details: {}", error);
                    self.state.message = Some(UploadMessage::error(error.user_message(CLUSTER_FAILED)));
                }
            },
            Outcome::Upload(result) => {
                self.state.loading_upload = false;
                match result {
                    Ok(receipt) => {
                        tracing::info!(status = receipt.status, "upload finished");
                        let text = receipt.message.unwrap_or_else(|| UPLOAD_DONE.to_string());
                        self.state.message = Some(UploadMessage::success(text));
                        self.after_upload(sink);
                    }
                    Err(error) => {
                        tracing::error!("upload error: {}", error);
                        self.state.message = Some(UploadMessage::error(error.user_message(UPLOAD_FAILED)));
                    }
                }
            }
        }
    }

    /// Refresh home and history, then show home for the latest session.
    fn after_upload(&mut self, sink: &mut dyn JobSink) {
        self.dismiss_detail();
        self.fetch_time_series_data(sink);
        self.fetch_analysis_sessions(sink);
        self.history.push("/");
        self.state.path = "/".to_string();
        self.state.route = route::Route::Home;
        self.state.session_id = None;
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}
