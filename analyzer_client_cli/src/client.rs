use std::path::Path;
use std::time::{Duration, Instant};

use reqwest::multipart;
use reqwest::Client;
use tokio::time::MissedTickBehavior;
use url::Url;

use crate::cache::ResultsCache;
use crate::cancel::AbortRegistry;
use crate::error::ClientError;
use crate::session::{SessionPhase, TaskSession};
use crate::validate;
use crate::{AnalysisResults, ExportFormat, StatusResponse, UploadResponse};

/// Client for the feedback analyzer API, normally reached through the BFF's
/// `/api` prefix. Drives the upload -> poll -> results flow and owns the
/// results cache and the cancellation registry.
pub struct AnalyzerClient {
    http: Client,
    base: Url,
    poll_interval: Duration,
    stall_timeout: Duration,
    pub cancel: AbortRegistry,
    pub results: ResultsCache,
}

impl AnalyzerClient {
    pub fn new(
        base: Url,
        poll_interval: Duration,
        stall_timeout: Duration,
    ) -> Result<Self, ClientError> {
        Ok(AnalyzerClient {
            http: Client::builder().timeout(Duration::from_secs(30)).build()?,
            base,
            poll_interval,
            stall_timeout,
            cancel: AbortRegistry::new(),
            results: ResultsCache::new(),
        })
    }

    fn base_str(&self) -> &str {
        self.base.as_str().trim_end_matches('/')
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json().await?)
    }

    /// Validates the file locally, uploads it, and moves the session from
    /// idle to processing. Validation failures never reach the network.
    pub async fn upload(
        &self,
        session: &mut TaskSession,
        path: &Path,
        segment: Option<&str>,
    ) -> Result<UploadResponse, ClientError> {
        let meta = validate::validate_upload(path)?;
        session.begin_upload()?;

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(err) => {
                session.fail(err.to_string());
                return Err(err.into());
            }
        };
        let part = multipart::Part::bytes(bytes).file_name(meta.name.clone());
        let mut form = multipart::Form::new().part("file", part);
        if let Some(segment) = segment {
            form = form.text("segment", segment.to_string());
        }

        let url = format!("{}/upload", self.base_str());
        let send = async {
            let response = self.http.post(&url).multipart(form).send().await?;
            Self::read_json::<UploadResponse>(response).await
        };

        match self.cancel.run("upload", send).await? {
            Ok(upload) => {
                session.uploaded(upload.task_id.clone())?;
                Ok(upload)
            }
            Err(err) => {
                session.fail(err.to_string());
                Err(err)
            }
        }
    }

    /// Polls the status endpoint on a fixed interval until the task reaches a
    /// terminal state or makes no progress for the stall timeout. No backoff:
    /// the interval is deliberately constant.
    pub async fn poll_to_completion(&self, session: &mut TaskSession) -> Result<(), ClientError> {
        let task_id = session
            .task_id
            .clone()
            .ok_or(ClientError::InvalidTransition("no active task to poll"))?;
        let url = format!("{}/status/{}", self.base_str(), task_id);

        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            let now = Instant::now();

            let send = async {
                let response = self.http.get(&url).send().await?;
                Self::read_json::<StatusResponse>(response).await
            };
            let status = match self.cancel.run("status", send).await? {
                Ok(status) => status,
                Err(err) => {
                    session.fail(err.to_string());
                    return Err(err);
                }
            };

            session.apply_status(&status, now);
            if let Some(step) = &status.current_step {
                println!("task {task_id}: {}% ({step})", session.progress);
            } else {
                println!("task {task_id}: {}%", session.progress);
            }

            match session.phase {
                SessionPhase::Completed => return Ok(()),
                SessionPhase::Failed => {
                    let reason = session
                        .error
                        .clone()
                        .unwrap_or_else(|| "task failed".to_string());
                    return Err(ClientError::TaskFailed { task_id, reason });
                }
                _ => {}
            }

            if session.is_stalled(Instant::now(), self.stall_timeout) {
                let seconds = self.stall_timeout.as_secs();
                session.fail(format!("no progress for {seconds}s"));
                return Err(ClientError::Stalled { task_id, seconds });
            }
        }
    }

    /// Fetches the full results for a completed task, at most once per task:
    /// later calls are served from the cache.
    pub async fn fetch_results(&self, task_id: &str) -> Result<AnalysisResults, ClientError> {
        if let Some(hit) = self.results.get(task_id) {
            return Ok(hit);
        }

        let url = format!("{}/results/{}", self.base_str(), task_id);
        let send = async {
            let response = self.http.get(&url).send().await?;
            Self::read_json::<AnalysisResults>(response).await
        };
        let results = self.cancel.run("results", send).await??;

        self.results.insert(results.clone());
        Ok(results)
    }

    /// Downloads an export blob for a completed task.
    pub async fn export(
        &self,
        task_id: &str,
        format: ExportFormat,
    ) -> Result<Vec<u8>, ClientError> {
        let url = format!(
            "{}/export/{}?format={}",
            self.base_str(),
            task_id,
            format.as_str()
        );
        let send = async {
            let response = self.http.get(&url).send().await?;
            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(ClientError::Api {
                    status: status.as_u16(),
                    message,
                });
            }
            Ok(response.bytes().await?.to_vec())
        };
        self.cancel.run("export", send).await?
    }

    /// Full reset: aborts everything in flight, drops cached results, and
    /// returns the session to idle.
    pub fn reset(&self, session: &mut TaskSession) {
        self.cancel.abort_all();
        self.results.clear();
        session.reset();
    }
}
