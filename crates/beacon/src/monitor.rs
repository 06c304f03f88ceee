// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2024 Jonathan Lee
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License version 3
// as published by the Free Software Foundation.
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see https://www.gnu.org/licenses/.

use crate::error::{TrackerError, TrackerResult};
use crate::tracker::TaskTracker;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExternalJobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    #[serde(other)]
    Unknown,
}
impl ExternalJobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ExternalJobStatus::Completed | ExternalJobStatus::Failed
        )
    }
}
impl std::fmt::Display for ExternalJobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExternalJobStatus::Pending => write!(f, "pending"),
            ExternalJobStatus::Processing => write!(f, "processing"),
            ExternalJobStatus::Completed => write!(f, "completed"),
            ExternalJobStatus::Failed => write!(f, "failed"),
            ExternalJobStatus::Unknown => write!(f, "unknown"),
        }
    }
}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStatusReport {
    pub status: ExternalJobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_files: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_files: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
impl JobStatusReport {
    pub fn new(status: ExternalJobStatus) -> Self {
        Self {
            status,
            progress_percentage: None,
            completed_files: None,
            failed_files: None,
            error: None,
        }
    }
    pub fn with_progress(mut self, percent: f64) -> Self {
        self.progress_percentage = Some(percent);
        self
    }
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}
#[async_trait]
pub trait JobStatusClient: Send + Sync {
    async fn fetch_status(&self, job_id: &str) -> TrackerResult<JobStatusReport>;
}
pub struct HttpJobStatusClient {
    client: reqwest::Client,
    base_url: String,
}
impl HttpJobStatusClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}
#[async_trait]
impl JobStatusClient for HttpJobStatusClient {
    async fn fetch_status(&self, job_id: &str) -> TrackerResult<JobStatusReport> {
        let url = format!(
            "{}/jobs/{}/status",
            self.base_url.trim_end_matches('/'),
            job_id
        );
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let report = response.json::<JobStatusReport>().await?;
        Ok(report)
    }
}
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub poll_interval: Duration,
    pub max_attempts: Option<u32>,
}
impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(2000),
            max_attempts: Some(900),
        }
    }
}
impl MonitorConfig {
    pub fn unbounded() -> Self {
        Self {
            max_attempts: None,
            ..Default::default()
        }
    }
    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval.is_zero() {
            return Err("poll_interval must be greater than zero".to_string());
        }
        if self.max_attempts == Some(0) {
            return Err("max_attempts must be greater than 0 when set".to_string());
        }
        Ok(())
    }
}
pub struct MonitorHandle {
    task_id: String,
    join: JoinHandle<()>,
}
impl MonitorHandle {
    pub fn task_id(&self) -> &str {
        &self.task_id
    }
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }
    pub fn stop(&self) {
        self.join.abort();
    }
    pub async fn join(self) -> TrackerResult<()> {
        match self.join.await {
            Ok(()) => Ok(()),
            Err(error) if error.is_cancelled() => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}
pub struct JobMonitor;
impl JobMonitor {
    pub fn spawn(
        tracker: TaskTracker,
        task_id: impl Into<String>,
        job_id: impl Into<String>,
        client: Arc<dyn JobStatusClient>,
        config: MonitorConfig,
    ) -> TrackerResult<MonitorHandle> {
        config
            .validate()
            .map_err(|reason| TrackerError::InvalidConfig { reason })?;
        let task_id = task_id.into();
        let job_id = job_id.into();
        let join = tokio::spawn({
            let task_id = task_id.clone();
            async move {
                let mut ticker = tokio::time::interval(config.poll_interval);
                let mut seq: u64 = 0;
                let mut attempts: u32 = 0;
                loop {
                    ticker.tick().await;
                    attempts += 1;
                    seq += 1;
                    match client.fetch_status(&job_id).await {
                        Ok(report) => {
                            let applied =
                                tracker.apply_external_status(&task_id, seq, &report).await;
                            if applied && report.status.is_terminal() {
                                debug!(
                                    task_id = %task_id,
                                    job_id = %job_id,
                                    status = %report.status,
                                    "job reached terminal status, stopping monitor"
                                );
                                break;
                            }
                            if !applied {
                                let gone_or_done = tracker
                                    .get_task(&task_id)
                                    .await
                                    .map(|task| task.status.is_terminal())
                                    .unwrap_or(true);
                                if gone_or_done {
                                    debug!(
                                        task_id = %task_id,
                                        "task finished or removed elsewhere, stopping monitor"
                                    );
                                    break;
                                }
                            }
                        }
                        Err(error) => {
                            warn!(
                                task_id = %task_id,
                                job_id = %job_id,
                                error = %error,
                                "job status poll failed"
                            );
                        }
                    }
                    if let Some(max_attempts) = config.max_attempts {
                        if attempts >= max_attempts {
                            warn!(
                                task_id = %task_id,
                                job_id = %job_id,
                                attempts,
                                "job status polling exhausted, failing task"
                            );
                            tracker
                                .fail_task(
                                    &task_id,
                                    format!(
                                        "job status polling exceeded {max_attempts} attempts"
                                    ),
                                )
                                .await;
                            break;
                        }
                    }
                }
            }
        });
        Ok(MonitorHandle { task_id, join })
    }
}
