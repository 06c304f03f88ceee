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

use crate::monitor::{ExternalJobStatus, JobStatusReport};
use crate::schemas::{RegistrySnapshot, Task, TaskCounts, TaskDescriptor, TaskStatus};
use chrono::Utc;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, warn};
#[derive(Debug, Default)]
pub struct TaskRegistry {
    tasks: IndexMap<String, Task>,
}
impl TaskRegistry {
    pub fn new() -> Self {
        Self {
            tasks: IndexMap::new(),
        }
    }
    pub fn add_task(&mut self, descriptor: TaskDescriptor) -> String {
        let task = Task::new(descriptor);
        let task_id = task.id.clone();
        debug!(task_id = %task_id, kind = %task.kind, "task added");
        self.tasks.insert(task_id.clone(), task);
        task_id
    }
    pub fn start_task(&mut self, task_id: &str) {
        let Some(task) = self.tasks.get_mut(task_id) else {
            debug!(task_id, "start_task ignored: unknown task");
            return;
        };
        if task.status != TaskStatus::Pending {
            debug!(task_id, status = %task.status, "start_task ignored: not pending");
            return;
        }
        task.status = TaskStatus::Running;
        task.started_at = Some(Utc::now());
    }
    pub fn update_progress(&mut self, task_id: &str, percent: f64) {
        let Some(task) = self.tasks.get_mut(task_id) else {
            debug!(task_id, "update_progress ignored: unknown task");
            return;
        };
        if task.status != TaskStatus::Running {
            debug!(task_id, status = %task.status, "update_progress ignored: not running");
            return;
        }
        // Progress is monotonic non-decreasing while running.
        task.progress = task.progress.max(percent.clamp(0.0, 100.0));
    }
    pub fn complete_task(&mut self, task_id: &str, result: Option<Value>) {
        let Some(task) = self.tasks.get_mut(task_id) else {
            debug!(task_id, "complete_task ignored: unknown task");
            return;
        };
        if task.status.is_terminal() {
            debug!(task_id, status = %task.status, "complete_task ignored: already terminal");
            return;
        }
        task.status = TaskStatus::Completed;
        task.progress = 100.0;
        task.completed_at = Some(Utc::now());
        task.result = result;
    }
    pub fn fail_task(&mut self, task_id: &str, error: impl Into<String>) {
        let Some(task) = self.tasks.get_mut(task_id) else {
            debug!(task_id, "fail_task ignored: unknown task");
            return;
        };
        if task.status.is_terminal() {
            debug!(task_id, status = %task.status, "fail_task ignored: already terminal");
            return;
        }
        task.status = TaskStatus::Failed;
        task.progress = 0.0;
        task.completed_at = Some(Utc::now());
        task.error = Some(error.into());
    }
    pub fn cancel_task(&mut self, task_id: &str) {
        let Some(task) = self.tasks.get_mut(task_id) else {
            debug!(task_id, "cancel_task ignored: unknown task");
            return;
        };
        if task.status.is_terminal() {
            debug!(task_id, status = %task.status, "cancel_task ignored: already terminal");
            return;
        }
        task.status = TaskStatus::Cancelled;
        task.completed_at = Some(Utc::now());
    }
    pub fn remove_task(&mut self, task_id: &str) -> bool {
        self.tasks.shift_remove(task_id).is_some()
    }
    pub fn clear_completed_tasks(&mut self) -> usize {
        let before = self.tasks.len();
        self.tasks
            .retain(|_, task| task.status != TaskStatus::Completed);
        before - self.tasks.len()
    }
    pub fn apply_external_status(
        &mut self,
        task_id: &str,
        seq: u64,
        report: &JobStatusReport,
    ) -> bool {
        let Some(task) = self.tasks.get_mut(task_id) else {
            debug!(task_id, "apply_external_status ignored: unknown task");
            return false;
        };
        if seq <= task.poll_seq {
            warn!(
                task_id,
                seq,
                last_applied = task.poll_seq,
                "stale job status report discarded"
            );
            return false;
        }
        if task.status.is_terminal() {
            debug!(task_id, status = %task.status, "apply_external_status ignored: already terminal");
            return false;
        }
        task.poll_seq = seq;
        match report.status {
            ExternalJobStatus::Pending
            | ExternalJobStatus::Processing
            | ExternalJobStatus::Unknown => {
                if task.status == TaskStatus::Pending {
                    task.started_at = Some(Utc::now());
                }
                task.status = TaskStatus::Running;
                let percent = report.progress_percentage.unwrap_or(0.0).clamp(0.0, 100.0);
                task.progress = task.progress.max(percent);
            }
            ExternalJobStatus::Completed => {
                if let Some(completed_files) = report.completed_files {
                    task.metadata
                        .insert("completed_files".to_string(), completed_files.into());
                }
                if let Some(failed_files) = report.failed_files {
                    task.metadata
                        .insert("failed_files".to_string(), failed_files.into());
                }
                task.status = TaskStatus::Completed;
                task.progress = 100.0;
                task.completed_at = Some(Utc::now());
            }
            ExternalJobStatus::Failed => {
                task.status = TaskStatus::Failed;
                task.progress = 0.0;
                task.completed_at = Some(Utc::now());
                task.error = Some(
                    report
                        .error
                        .clone()
                        .unwrap_or_else(|| "external job failed".to_string()),
                );
            }
        }
        debug!(task_id, status = %task.status, progress = task.progress, "external status applied");
        true
    }
    pub fn get_task(&self, task_id: &str) -> Option<&Task> {
        self.tasks.get(task_id)
    }
    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.values().cloned().collect()
    }
    pub fn active_tasks_count(&self) -> usize {
        self.tasks
            .values()
            .filter(|task| task.status.is_active())
            .count()
    }
    pub fn completed_tasks_count(&self) -> usize {
        self.tasks
            .values()
            .filter(|task| task.status == TaskStatus::Completed)
            .count()
    }
    pub fn failed_tasks_count(&self) -> usize {
        self.tasks
            .values()
            .filter(|task| task.status == TaskStatus::Failed)
            .count()
    }
    pub fn counts(&self) -> TaskCounts {
        TaskCounts {
            active: self.active_tasks_count(),
            completed: self.completed_tasks_count(),
            failed: self.failed_tasks_count(),
            total: self.tasks.len(),
        }
    }
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            tasks: self.tasks(),
            counts: self.counts(),
        }
    }
    pub fn len(&self) -> usize {
        self.tasks.len()
    }
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
