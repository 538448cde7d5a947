// src/api/mod.rs
//! Blocking client for the comment-analysis backend.
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::config::AppConfig;
use crate::model::{AiComment, AnalysisResults, AnalysisSession, ClusterDetail, TimeSeriesData};

pub mod multipart;
#[cfg(test)]
pub mod mock;

use multipart::MultipartForm;

pub const ANALYSIS_RESULTS_PATH: &str = "/api/analysis_results";
pub const AI_COMMENT_PATH: &str = "/api/ai_analysis_comment";
pub const SESSIONS_PATH: &str = "/api/analysis_sessions";
pub const TIME_SERIES_PATH: &str = "/api/time_series_data";
pub const CLUSTER_DETAILS_PATH: &str = "/api/cluster_details";
pub const UPLOAD_PATH: &str = "/upload";

pub const NETWORK_ERROR_MESSAGE: &str =
    "A network error or unexpected failure occurred. See the log for details.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: u16,
        detail: Option<String>,
    },

    #[error("unexpected response body from {url}: {message}")]
    Decode { url: String, message: String },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ApiError {
    /// Text for the message banner.
    ///
    /// The server's `detail` wins; otherwise the operation's own fallback for
    /// HTTP-level failures, and a generic message for transport failures.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Status { detail: Some(detail), .. } => detail.clone(),
            ApiError::Status { .. } | ApiError::Decode { .. } => fallback.to_string(),
            ApiError::Transport { .. } | ApiError::Io { .. } => NETWORK_ERROR_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct UploadBody {
    #[serde(default)]
    message: Option<String>,
}

/// A successful upload. `message` is set when the backend answered with JSON
/// instead of a redirect.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadReceipt {
    pub status: u16,
    pub message: Option<String>,
}

fn with_session(path: String, session_id: Option<i64>) -> String {
    match session_id {
        Some(id) => format!("{}?session_id={}", path, id),
        None => path,
    }
}

pub fn analysis_results_path(session_id: Option<i64>) -> String {
    with_session(ANALYSIS_RESULTS_PATH.to_string(), session_id)
}

pub fn ai_comment_path(session_id: Option<i64>) -> String {
    with_session(AI_COMMENT_PATH.to_string(), session_id)
}

pub fn cluster_details_path(cluster_id: i64, session_id: Option<i64>) -> String {
    with_session(format!("{}/{}", CLUSTER_DETAILS_PATH, cluster_id), session_id)
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    agent: ureq::Agent,
    request_timeout: Duration,
    upload_timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: &str, request_timeout: Duration, upload_timeout: Duration) -> Self {
        // Redirects stay visible: a 303 from /upload is the success signal.
        let agent = ureq::AgentBuilder::new().redirects(0).build();
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            agent,
            request_timeout,
            upload_timeout,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(&config.server_url, config.request_timeout(), config.upload_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");

        let response = self
            .agent
            .get(&url)
            .timeout(self.request_timeout)
            .call()
            .map_err(|e| map_error(&url, e))?;

        if response.status() >= 300 {
            return Err(ApiError::Status {
                status: response.status(),
                url,
                detail: None,
            });
        }

        response.into_json::<T>().map_err(|e| ApiError::Decode {
            url,
            message: e.to_string(),
        })
    }

    pub fn analysis_results(&self, session_id: Option<i64>) -> Result<AnalysisResults, ApiError> {
        self.get_json(&analysis_results_path(session_id))
    }

    pub fn ai_analysis_comment(&self, session_id: Option<i64>) -> Result<AiComment, ApiError> {
        self.get_json(&ai_comment_path(session_id))
    }

    pub fn analysis_sessions(&self) -> Result<Vec<AnalysisSession>, ApiError> {
        self.get_json(SESSIONS_PATH)
    }

    pub fn time_series_data(&self) -> Result<TimeSeriesData, ApiError> {
        self.get_json(TIME_SERIES_PATH)
    }

    pub fn cluster_details(&self, cluster_id: i64, session_id: Option<i64>) -> Result<ClusterDetail, ApiError> {
        self.get_json(&cluster_details_path(cluster_id, session_id))
    }

    /// Post a CSV file as the multipart field `file`.
    ///
    /// Any 2xx or 3xx answer is a success; 4xx and 5xx surface as
    /// [`ApiError::Status`] carrying the body's `detail`.
    pub fn upload(&self, file: &Path) -> Result<UploadReceipt, ApiError> {
        let data = fs::read(file).map_err(|source| ApiError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        let filename = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.csv".to_string());

        let form = MultipartForm::new().file("file", &filename, "text/csv", &data);
        let content_type = form.content_type();
        let url = self.url(UPLOAD_PATH);
        tracing::info!(%url, file = %filename, bytes = data.len(), "uploading");

        let response = self
            .agent
            .post(&url)
            .timeout(self.upload_timeout)
            .set("Content-Type", &content_type)
            .send_bytes(&form.finish())
            .map_err(|e| map_error(&url, e))?;

        let status = response.status();
        let message = if (200..300).contains(&status) {
            response
                .into_string()
                .ok()
                .and_then(|body| serde_json::from_str::<UploadBody>(&body).ok())
                .and_then(|body| body.message)
        } else {
            None
        };

        Ok(UploadReceipt { status, message })
    }
}

fn map_error(url: &str, error: ureq::Error) -> ApiError {
    match error {
        ureq::Error::Status(status, response) => ApiError::Status {
            url: url.to_string(),
            status,
            detail: error_detail(response),
        },
        ureq::Error::Transport(transport) => ApiError::Transport {
            url: url.to_string(),
            message: transport.to_string(),
        },
    }
}

fn error_detail(response: ureq::Response) -> Option<String> {
    let body: ErrorBody = response.into_json().ok()?;
    match body.detail {
        Some(serde_json::Value::String(detail)) if !detail.is_empty() => Some(detail),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::mock::{serve, Canned};
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Duration::from_secs(5), Duration::from_secs(5))
    }

    #[test]
    fn paths_carry_session_scope() {
        assert_eq!(analysis_results_path(None), "/api/analysis_results");
        assert_eq!(analysis_results_path(Some(42)), "/api/analysis_results?session_id=42");
        assert_eq!(ai_comment_path(Some(42)), "/api/ai_analysis_comment?session_id=42");
        assert_eq!(cluster_details_path(7, Some(3)), "/api/cluster_details/7?session_id=3");
        assert_eq!(cluster_details_path(7, None), "/api/cluster_details/7");
    }

    #[test]
    fn base_url_is_normalised() {
        assert_eq!(client(" http://host:8000/ ").base_url(), "http://host:8000");
    }

    #[test]
    fn fetches_scoped_results() {
        let (base, server) = serve(vec![Canned::json(
            200,
            r#"{"pn_charts": {"total_pn_chart": "", "category_pn_charts": {}}, "top_clusters": []}"#,
        )]);
        let results = client(&base).analysis_results(Some(42)).unwrap();
        assert!(results.top_clusters.is_empty());

        let recorded = server.join().unwrap();
        assert_eq!(recorded[0].method, "GET");
        assert_eq!(recorded[0].url, "/api/analysis_results?session_id=42");
    }

    #[test]
    fn error_detail_is_surfaced() {
        let (base, server) = serve(vec![Canned::json(404, r#"{"detail": "Analysis session not found"}"#)]);
        let err = client(&base).ai_analysis_comment(Some(9)).unwrap_err();
        server.join().unwrap();

        match &err {
            ApiError::Status { status, detail, .. } => {
                assert_eq!(*status, 404);
                assert_eq!(detail.as_deref(), Some("Analysis session not found"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(err.user_message("fallback"), "Analysis session not found");
    }

    #[test]
    fn non_string_detail_uses_fallback() {
        let (base, server) = serve(vec![
            Canned::json(422, r#"{"detail": [{"loc": ["query"], "msg": "bad"}]}"#),
            Canned::json(500, "Internal Server Error"),
        ]);
        let api = client(&base);
        let err = api.analysis_sessions().unwrap_err();
        assert_eq!(err.user_message("Could not load history."), "Could not load history.");
        let err = api.time_series_data().unwrap_err();
        assert_eq!(err.user_message("Could not load trends."), "Could not load trends.");
        server.join().unwrap();
    }

    #[test]
    fn malformed_success_body_is_a_decode_error() {
        let (base, server) = serve(vec![Canned::json(200, r#"{"dates": "not a list"}"#)]);
        let err = client(&base).time_series_data().unwrap_err();
        server.join().unwrap();
        assert!(matches!(err, ApiError::Decode { .. }));
    }

    #[test]
    fn unreachable_server_is_a_transport_error() {
        // Bind then drop to get a port nobody listens on.
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let err = client(&format!("http://127.0.0.1:{}", port))
            .analysis_sessions()
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport { .. }));
        assert_eq!(err.user_message("ignored"), NETWORK_ERROR_MESSAGE);
    }

    #[test]
    fn cluster_details_round_trip() {
        let (base, server) = serve(vec![Canned::json(
            200,
            r#"{"cluster_id": 7, "representative_text": "rep", "comments": [
                {"id": 1, "text": "a", "importance_score": 0.456},
                {"id": 2, "text": "b", "importance_score": null}
            ]}"#,
        )]);
        let detail = client(&base).cluster_details(7, Some(3)).unwrap();
        let recorded = server.join().unwrap();
        assert_eq!(recorded[0].url, "/api/cluster_details/7?session_id=3");
        assert_eq!(detail.comments.len(), 2);
    }

    fn csv_file(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("week1.csv");
        fs::write(&path, "comment\n説明が丁寧\n").unwrap();
        path
    }

    #[test]
    fn upload_redirect_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let file = csv_file(&dir);
        let (base, server) = serve(vec![Canned::redirect("/")]);

        let receipt = client(&base).upload(&file).unwrap();
        assert_eq!(receipt, UploadReceipt { status: 303, message: None });

        let recorded = server.join().unwrap();
        assert_eq!(recorded.len(), 1, "redirect must not be followed");
        assert_eq!(recorded[0].method, "POST");
        assert_eq!(recorded[0].url, "/upload");
        assert!(recorded[0]
            .content_type
            .as_deref()
            .unwrap()
            .starts_with("multipart/form-data; boundary="));
        let body = String::from_utf8(recorded[0].body.clone()).unwrap();
        assert!(body.contains("name=\"file\"; filename=\"week1.csv\""));
        assert!(body.contains("説明が丁寧"));
    }

    #[test]
    fn upload_json_message_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let file = csv_file(&dir);
        let (base, server) = serve(vec![Canned::json(200, r#"{"message": "Processed 2 comments"}"#)]);

        let receipt = client(&base).upload(&file).unwrap();
        server.join().unwrap();
        assert_eq!(receipt.message.as_deref(), Some("Processed 2 comments"));
    }

    #[test]
    fn upload_failure_carries_detail() {
        let dir = tempfile::tempdir().unwrap();
        let file = csv_file(&dir);
        let (base, server) = serve(vec![Canned::json(400, r#"{"detail":"bad csv"}"#)]);

        let err = client(&base).upload(&file).unwrap_err();
        server.join().unwrap();
        assert_eq!(err.user_message("Upload failed."), "bad csv");
    }

    #[test]
    fn upload_of_missing_file_is_io_error() {
        let err = client("http://127.0.0.1:1")
            .upload(Path::new("/definitely/not/here.csv"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Io { .. }));
    }
}
