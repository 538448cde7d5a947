// src/model/mod.rs
pub mod cluster;
pub mod results;
pub mod session;
pub mod time_series;

// Re-export commonly used types
pub use cluster::{tag_badges, Cluster, ClusterDetail, Comment, TagBadge, TagMap};
pub use results::{AiComment, AnalysisResults, PnCharts};
pub use session::AnalysisSession;
pub use time_series::{CategoryPoint, TimeSeriesData};
