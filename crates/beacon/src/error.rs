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

use thiserror::Error;
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Task '{id}' not found")]
    TaskNotFound { id: String },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Invalid status payload: {reason}")]
    InvalidStatusPayload { reason: String },
    #[error("Invalid monitor configuration: {reason}")]
    InvalidConfig { reason: String },
    #[error("Serialisation error: {0}")]
    Serialisation(#[from] serde_json::Error),
    #[error("Join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}
pub type TrackerResult<T> = std::result::Result<T, TrackerError>;
