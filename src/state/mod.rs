// src/state/mod.rs
use std::path::PathBuf;
use serde::{Deserialize, Serialize};

use crate::model::{AnalysisSession, Cluster, ClusterDetail, PnCharts, TimeSeriesData};
use crate::state::route::Route;

pub mod route;

// Analysis view tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnalysisTab {
    #[default]
    PnCharts,
    Ranking,
    AiComment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageStatus {
    Info,
    Success,
    Error,
}

/// The shared banner. Every action overwrites it.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadMessage {
    pub status: MessageStatus,
    pub text: String,
}

impl UploadMessage {
    pub fn info(text: impl Into<String>) -> Self {
        Self { status: MessageStatus::Info, text: text.into() }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self { status: MessageStatus::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { status: MessageStatus::Error, text: text.into() }
    }
}

// Core application state
#[derive(Debug)]
pub struct AppState {
    // Loading flags, independent of each other
    pub loading_analysis: bool,
    pub loading_upload: bool,
    pub loading_history: bool,

    // Fetched datasets, replaced wholesale
    pub pn_charts: Option<PnCharts>,
    /// Bumped whenever `pn_charts` is replaced. PN textures are keyed on it.
    pub pn_revision: u64,
    pub top_clusters: Vec<Cluster>,
    pub ai_comment: String,
    pub sessions: Vec<AnalysisSession>,
    pub time_series: Option<TimeSeriesData>,
    /// Bumped whenever `time_series` is replaced so charts know to rebuild.
    pub time_series_revision: u64,

    // Detail overlay
    pub show_detail: bool,
    pub selected_detail: Option<ClusterDetail>,

    pub message: Option<UploadMessage>,

    // Routing
    pub path: String,
    pub route: Route,
    pub session_id: Option<i64>,
    pub active_tab: AnalysisTab,

    pub selected_file: Option<PathBuf>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            loading_analysis: true,
            loading_upload: false,
            loading_history: true,
            pn_charts: None,
            pn_revision: 0,
            top_clusters: Vec::new(),
            ai_comment: String::new(),
            sessions: Vec::new(),
            time_series: None,
            time_series_revision: 0,
            show_detail: false,
            selected_detail: None,
            message: None,
            path: "/".to_string(),
            route: Route::Home,
            session_id: None,
            active_tab: AnalysisTab::default(),
            selected_file: None,
        }
    }

    pub fn set_time_series(&mut self, data: Option<TimeSeriesData>) {
        self.time_series = data;
        self.time_series_revision += 1;
    }

    pub fn set_pn_charts(&mut self, charts: Option<PnCharts>) {
        self.pn_charts = charts;
        self.pn_revision += 1;
    }

    pub fn clear_analysis(&mut self) {
        self.set_pn_charts(None);
        self.top_clusters.clear();
        self.ai_comment.clear();
    }

    pub fn shows_home(&self) -> bool {
        self.route == Route::Home
    }

    /// `/analysis…`, or home while a history session is pinned.
    pub fn shows_analysis(&self) -> bool {
        self.route == Route::Analysis || (self.route == Route::Home && self.session_id.is_some())
    }

    pub fn shows_history(&self) -> bool {
        self.route == Route::History
    }

    /// The detail overlay needs both the flag and a payload.
    pub fn detail_visible(&self) -> Option<&ClusterDetail> {
        if self.show_detail {
            self.selected_detail.as_ref()
        } else {
            None
        }
    }

    /// While the detail overlay is up nothing behind it takes input.
    pub fn modal_open(&self) -> bool {
        self.detail_visible().is_some()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
