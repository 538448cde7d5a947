// src/model/results.rs
use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};

use super::Cluster;

/// Pre-rendered positive/negative ratio charts, each a base64 PNG.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PnCharts {
    #[serde(default)]
    pub total_pn_chart: String,
    #[serde(default)]
    pub category_pn_charts: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResults {
    pub pn_charts: PnCharts,
    #[serde(default)]
    pub top_clusters: Vec<Cluster>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiComment {
    #[serde(default)]
    pub comment: String,
}
