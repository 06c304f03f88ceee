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
use crate::monitor::JobStatusReport;
use crate::registry::TaskRegistry;
use crate::schemas::{RegistrySnapshot, Task, TaskCounts, TaskDescriptor};
use serde::Serialize;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionMode {
    OnReturn,
    Deferred,
}
#[derive(Clone)]
pub struct TaskTracker {
    registry: Arc<RwLock<TaskRegistry>>,
    snapshot_tx: Arc<watch::Sender<RegistrySnapshot>>,
}
impl TaskTracker {
    pub fn new() -> Self {
        let (snapshot_tx, _) = watch::channel(RegistrySnapshot::default());
        Self {
            registry: Arc::new(RwLock::new(TaskRegistry::new())),
            snapshot_tx: Arc::new(snapshot_tx),
        }
    }
    fn publish(&self, registry: &TaskRegistry) {
        let _ = self.snapshot_tx.send(registry.snapshot());
    }
    pub fn subscribe(&self) -> watch::Receiver<RegistrySnapshot> {
        self.snapshot_tx.subscribe()
    }
    pub async fn add_task(&self, descriptor: TaskDescriptor) -> String {
        let mut registry = self.registry.write().await;
        let task_id = registry.add_task(descriptor);
        self.publish(&registry);
        task_id
    }
    pub async fn start_task(&self, task_id: &str) {
        let mut registry = self.registry.write().await;
        registry.start_task(task_id);
        self.publish(&registry);
    }
    pub async fn update_progress(&self, task_id: &str, percent: f64) {
        let mut registry = self.registry.write().await;
        registry.update_progress(task_id, percent);
        self.publish(&registry);
    }
    pub async fn complete_task(&self, task_id: &str, result: Option<Value>) {
        let mut registry = self.registry.write().await;
        registry.complete_task(task_id, result);
        self.publish(&registry);
    }
    pub async fn fail_task(&self, task_id: &str, error: impl Into<String>) {
        let mut registry = self.registry.write().await;
        registry.fail_task(task_id, error);
        self.publish(&registry);
    }
    pub async fn cancel_task(&self, task_id: &str) {
        let mut registry = self.registry.write().await;
        registry.cancel_task(task_id);
        self.publish(&registry);
    }
    pub async fn remove_task(&self, task_id: &str) -> bool {
        let mut registry = self.registry.write().await;
        let removed = registry.remove_task(task_id);
        self.publish(&registry);
        removed
    }
    pub async fn clear_completed_tasks(&self) -> usize {
        let mut registry = self.registry.write().await;
        let cleared = registry.clear_completed_tasks();
        self.publish(&registry);
        cleared
    }
    pub async fn apply_external_status(
        &self,
        task_id: &str,
        seq: u64,
        report: &JobStatusReport,
    ) -> bool {
        let mut registry = self.registry.write().await;
        let applied = registry.apply_external_status(task_id, seq, report);
        if applied {
            self.publish(&registry);
        }
        applied
    }
    pub async fn get_task(&self, task_id: &str) -> Option<Task> {
        self.registry.read().await.get_task(task_id).cloned()
    }
    pub async fn require_task(&self, task_id: &str) -> TrackerResult<Task> {
        self.get_task(task_id)
            .await
            .ok_or_else(|| TrackerError::TaskNotFound {
                id: task_id.to_string(),
            })
    }
    pub async fn tasks(&self) -> Vec<Task> {
        self.registry.read().await.tasks()
    }
    pub async fn snapshot(&self) -> RegistrySnapshot {
        self.registry.read().await.snapshot()
    }
    pub async fn counts(&self) -> TaskCounts {
        self.registry.read().await.counts()
    }
    pub async fn active_tasks_count(&self) -> usize {
        self.registry.read().await.active_tasks_count()
    }
    pub async fn completed_tasks_count(&self) -> usize {
        self.registry.read().await.completed_tasks_count()
    }
    pub async fn failed_tasks_count(&self) -> usize {
        self.registry.read().await.failed_tasks_count()
    }
    pub async fn execute_task<T, E, F>(
        &self,
        task_id: &str,
        mode: CompletionMode,
        work: F,
    ) -> Result<T, E>
    where
        T: Serialize,
        E: std::fmt::Display,
        F: Future<Output = Result<T, E>>,
    {
        self.start_task(task_id).await;
        match work.await {
            Ok(value) => {
                if mode == CompletionMode::OnReturn {
                    let result = serde_json::to_value(&value).unwrap_or(Value::Null);
                    self.complete_task(task_id, Some(result)).await;
                }
                Ok(value)
            }
            Err(error) => {
                self.fail_task(task_id, error.to_string()).await;
                Err(error)
            }
        }
    }
}
impl Default for TaskTracker {
    fn default() -> Self {
        Self::new()
    }
}
