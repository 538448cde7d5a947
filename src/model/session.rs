// src/model/session.rs
use serde::{Deserialize, Serialize};

/// One completed upload-and-analysis run, as listed on the history page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSession {
    pub id: i64,
    pub created_at: String,
    pub csv_filename: String,
    pub total_comments: u64,
    pub overall_positive_percent: f64,
    pub overall_negative_percent: f64,
    pub dangerous_comment_count: u64,
}
