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

use async_trait::async_trait;
use beacon::{
    CompletionMode, ExternalJobStatus, JobMonitor, JobStatusClient, JobStatusReport,
    MonitorConfig, TaskDescriptor, TaskKind, TaskTracker, TrackerError, TrackerResult,
};
use facet::{ChartDataAdapter, ChartKind, ColumnMapping, GraphDescriptor, Record};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

struct ScriptedStatusClient {
    reports: Vec<JobStatusReport>,
    cursor: AtomicUsize,
}
impl ScriptedStatusClient {
    fn new(reports: Vec<JobStatusReport>) -> Self {
        Self {
            reports,
            cursor: AtomicUsize::new(0),
        }
    }
}
#[async_trait]
impl JobStatusClient for ScriptedStatusClient {
    async fn fetch_status(&self, _job_id: &str) -> TrackerResult<JobStatusReport> {
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        self.reports
            .get(index.min(self.reports.len().saturating_sub(1)))
            .cloned()
            .ok_or_else(|| TrackerError::InvalidStatusPayload {
                reason: "no scripted report available".to_string(),
            })
    }
}

fn sample_records() -> Vec<Record> {
    [
        json!({"region": "North", "revenue": "1200", "quarter": "Q1", "headcount": 14}),
        json!({"region": "North", "revenue": "900", "quarter": "Q2", "headcount": 15}),
        json!({"region": "South", "revenue": "640", "quarter": "Q1", "headcount": 9}),
        json!({"region": "South", "revenue": "710", "quarter": "Q2", "headcount": 9}),
        json!({"region": "East", "revenue": "980", "quarter": "Q1", "headcount": 12}),
        json!({"region": "West", "revenue": null, "quarter": "Q2", "headcount": 7}),
    ]
    .into_iter()
    .filter_map(|value| value.as_object().cloned())
    .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_target(false)
        .init();

    info!("Starting report pipeline demo");

    let records = sample_records();
    let columns: Vec<String> = ["region", "revenue", "quarter", "headcount"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let adapter = ChartDataAdapter::new();

    let mapping = ColumnMapping::new("region", "revenue");
    for kind in [ChartKind::Bar, ChartKind::Histogram, ChartKind::Radar] {
        match adapter.transform(&records, Some(&mapping), kind, &columns) {
            Some(points) => {
                info!(chart = %kind, points = points.len(), "transformed dataset");
                for point in &points {
                    info!(chart = %kind, point = %serde_json::to_string(point)?);
                }
            }
            None => info!(chart = %kind, "no renderable data"),
        }
    }

    let stacked = GraphDescriptor::new("stacked_bar")
        .with_mapping(ColumnMapping::new("region", "revenue").with_color("quarter"));
    if let Some(points) = adapter.transform_descriptor(&records, &stacked, &columns) {
        info!(points = points.len(), "stacked bar series built");
    }

    if let Some(suggested) = adapter.suggest_mapping(&columns, &records) {
        info!(
            x = suggested.x.as_deref().unwrap_or("-"),
            y = suggested.y.as_deref().unwrap_or("-"),
            "suggested default mapping"
        );
    }

    let tracker = TaskTracker::new();
    let mut badge = tracker.subscribe();

    let upload_id = tracker
        .add_task(
            TaskDescriptor::new(
                TaskKind::FileUpload,
                "Quarterly revenue bundle",
                "Upload and process the Q1/Q2 revenue export",
            )
            .with_metadata("file_count", json!(4)),
        )
        .await;
    badge.changed().await?;
    info!(
        active = badge.borrow_and_update().counts.active,
        "notification badge updated"
    );
    tracker.start_task(&upload_id).await;

    let client = Arc::new(ScriptedStatusClient::new(vec![
        JobStatusReport::new(ExternalJobStatus::Pending),
        JobStatusReport::new(ExternalJobStatus::Processing).with_progress(35.0),
        JobStatusReport::new(ExternalJobStatus::Processing).with_progress(80.0),
        JobStatusReport::new(ExternalJobStatus::Completed),
    ]));
    let config = MonitorConfig {
        poll_interval: Duration::from_millis(50),
        max_attempts: Some(20),
    };
    let handle = JobMonitor::spawn(tracker.clone(), &upload_id, "job-42", client, config)?;
    handle.join().await?;

    let upload = tracker.require_task(&upload_id).await?;
    info!(task = %upload, progress = upload.progress, "upload finished");

    let query_id = tracker
        .add_task(TaskDescriptor::new(
            TaskKind::QueryExecution,
            "Top regions query",
            "Aggregate revenue by region",
        ))
        .await;
    let rows: Result<serde_json::Value, TrackerError> = Ok(json!({"rows": 4}));
    let result = tracker
        .execute_task(&query_id, CompletionMode::OnReturn, async move { rows })
        .await?;
    info!(result = %result, "query task completed");

    let snapshot = tracker.snapshot().await;
    info!(
        active = snapshot.counts.active,
        completed = snapshot.counts.completed,
        failed = snapshot.counts.failed,
        total = snapshot.counts.total,
        "final registry snapshot"
    );

    Ok(())
}
