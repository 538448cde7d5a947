// src/worker.rs
//! Runs backend requests off the UI thread, one at a time, in submission order.
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::api::{ApiClient, ApiError, UploadReceipt};
use crate::model::{AiComment, AnalysisResults, AnalysisSession, ClusterDetail, TimeSeriesData};

/// Independent request streams. Only the newest request per slot may land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Analysis,
    Sessions,
    TimeSeries,
    ClusterDetail,
    Upload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub slot: Slot,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Job {
    AnalysisResults { session_id: Option<i64> },
    Sessions,
    TimeSeries,
    ClusterDetail { cluster_id: i64, session_id: Option<i64> },
    Upload { file: PathBuf },
}

impl Job {
    pub fn slot(&self) -> Slot {
        match self {
            Job::AnalysisResults { .. } => Slot::Analysis,
            Job::Sessions => Slot::Sessions,
            Job::TimeSeries => Slot::TimeSeries,
            Job::ClusterDetail { .. } => Slot::ClusterDetail,
            Job::Upload { .. } => Slot::Upload,
        }
    }
}

/// Which half of the results-then-commentary pair failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStage {
    Results,
    Comment,
}

#[derive(Debug)]
pub enum Outcome {
    Analysis(Result<(AnalysisResults, AiComment), (AnalysisStage, ApiError)>),
    Sessions(Result<Vec<AnalysisSession>, ApiError>),
    TimeSeries(Result<TimeSeriesData, ApiError>),
    ClusterDetail(Result<ClusterDetail, ApiError>),
    Upload(Result<UploadReceipt, ApiError>),
}

#[derive(Debug)]
pub struct Completion {
    pub ticket: Ticket,
    pub outcome: Outcome,
}

/// Where the controller sends work.
pub trait JobSink {
    fn submit(&mut self, ticket: Ticket, job: Job);
}

/// Blocking execution of one job.
pub fn execute(client: &ApiClient, job: Job) -> Outcome {
    match job {
        Job::AnalysisResults { session_id } => {
            // The commentary is only requested once the results are in.
            let outcome = client
                .analysis_results(session_id)
                .map_err(|e| (AnalysisStage::Results, e))
                .and_then(|results| {
                    client
                        .ai_analysis_comment(session_id)
                        .map(|comment| (results, comment))
                        .map_err(|e| (AnalysisStage::Comment, e))
                });
            Outcome::Analysis(outcome)
        }
        Job::Sessions => Outcome::Sessions(client.analysis_sessions()),
        Job::TimeSeries => Outcome::TimeSeries(client.time_series_data()),
        Job::ClusterDetail { cluster_id, session_id } => {
            Outcome::ClusterDetail(client.cluster_details(cluster_id, session_id))
        }
        Job::Upload { file } => Outcome::Upload(client.upload(&file)),
    }
}

enum Command {
    Run(Ticket, Job),
    Reconfigure(ApiClient),
}

pub struct Worker {
    commands: Sender<Command>,
    completions: Receiver<Completion>,
}

impl Worker {
    /// Start the request thread. `notify` runs after every completion, to wake the UI.
    pub fn spawn<F>(client: ApiClient, notify: F) -> Self
    where
        F: Fn() + Send + 'static,
    {
        let (command_tx, command_rx) = mpsc::channel::<Command>();
        let (completion_tx, completion_rx) = mpsc::channel();

        thread::Builder::new()
            .name("api-worker".to_string())
            .spawn(move || {
                let mut client = client;
                // Ends when the Worker (and its sender) is dropped
                while let Ok(command) = command_rx.recv() {
                    match command {
                        Command::Reconfigure(next) => {
                            tracing::info!(server = next.base_url(), "worker now targets a new server");
                            client = next;
                        }
                        Command::Run(ticket, job) => {
                            tracing::debug!(?ticket, ?job, "running job");
                            let outcome = execute(&client, job);
                            if completion_tx.send(Completion { ticket, outcome }).is_err() {
                                break;
                            }
                            notify();
                        }
                    }
                }
            })
            .map(|_| ())
            .unwrap_or_else(|e| tracing::error!("failed to start request thread: {}", e));

        Self {
            commands: command_tx,
            completions: completion_rx,
        }
    }

    /// Point subsequent jobs at another server. Jobs already queued use the new client too.
    pub fn reconfigure(&self, client: ApiClient) {
        if self.commands.send(Command::Reconfigure(client)).is_err() {
            tracing::error!("request thread is gone; cannot switch server");
        }
    }

    /// Everything that finished since the last call.
    pub fn drain(&self) -> Vec<Completion> {
        self.completions.try_iter().collect()
    }

    #[cfg(test)]
    pub fn wait(&self, timeout: std::time::Duration) -> Option<Completion> {
        self.completions.recv_timeout(timeout).ok()
    }
}

impl JobSink for Worker {
    fn submit(&mut self, ticket: Ticket, job: Job) {
        if self.commands.send(Command::Run(ticket, job)).is_err() {
            tracing::error!(?ticket, "request thread is gone; job dropped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{serve, Canned};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    const RESULTS: &str = r#"{"pn_charts": {"total_pn_chart": "", "category_pn_charts": {}}, "top_clusters": []}"#;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, Duration::from_secs(5), Duration::from_secs(5))
    }

    #[test]
    fn analysis_fetches_results_then_comment() {
        let (base, server) = serve(vec![
            Canned::json(200, RESULTS),
            Canned::json(200, r#"{"comment": "全体的に好評"}"#),
        ]);
        let outcome = execute(&client(&base), Job::AnalysisResults { session_id: Some(42) });
        let recorded = server.join().unwrap();

        let urls: Vec<_> = recorded.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec!["/api/analysis_results?session_id=42", "/api/ai_analysis_comment?session_id=42"]
        );
        match outcome {
            Outcome::Analysis(Ok((_, comment))) => assert_eq!(comment.comment, "全体的に好評"),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn failed_results_skip_the_comment_request() {
        let (base, server) = serve(vec![Canned::json(404, r#"{"detail": "No analysis results found."}"#)]);
        let outcome = execute(&client(&base), Job::AnalysisResults { session_id: None });
        assert_eq!(server.join().unwrap().len(), 1);
        assert!(matches!(outcome, Outcome::Analysis(Err((AnalysisStage::Results, _)))));
    }

    #[test]
    fn failed_comment_is_reported_as_comment_stage() {
        let (base, server) = serve(vec![
            Canned::json(200, RESULTS),
            Canned::json(500, r#"{"detail": "llm down"}"#),
        ]);
        let outcome = execute(&client(&base), Job::AnalysisResults { session_id: None });
        server.join().unwrap();
        assert!(matches!(outcome, Outcome::Analysis(Err((AnalysisStage::Comment, _)))));
    }

    #[test]
    fn worker_runs_jobs_in_order_and_notifies() {
        let (base, server) = serve(vec![
            Canned::json(200, r#"{"dates": [], "overall_positive_percents": [], "category_positive_percents": {}}"#),
            Canned::json(200, "[]"),
        ]);
        let wakeups = Arc::new(AtomicUsize::new(0));
        let counter = wakeups.clone();
        let mut worker = Worker::spawn(client(&base), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let first = Ticket { slot: Slot::TimeSeries, generation: 1 };
        let second = Ticket { slot: Slot::Sessions, generation: 1 };
        worker.submit(first, Job::TimeSeries);
        worker.submit(second, Job::Sessions);

        let a = worker.wait(Duration::from_secs(5)).unwrap();
        let b = worker.wait(Duration::from_secs(5)).unwrap();
        assert_eq!(a.ticket, first);
        assert!(matches!(a.outcome, Outcome::TimeSeries(Ok(_))));
        assert_eq!(b.ticket, second);
        assert!(matches!(b.outcome, Outcome::Sessions(Ok(ref s)) if s.is_empty()));

        let recorded = server.join().unwrap();
        assert_eq!(recorded[0].url, "/api/time_series_data");
        assert_eq!(recorded[1].url, "/api/analysis_sessions");
        assert!(wakeups.load(Ordering::SeqCst) >= 1);
        assert!(worker.drain().is_empty());
    }

    #[test]
    fn job_slots() {
        assert_eq!(Job::Sessions.slot(), Slot::Sessions);
        assert_eq!(Job::ClusterDetail { cluster_id: 1, session_id: None }.slot(), Slot::ClusterDetail);
        assert_eq!(Job::Upload { file: PathBuf::from("a.csv") }.slot(), Slot::Upload);
    }
}
