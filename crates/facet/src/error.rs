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
pub enum AdapterError {
    #[error("Mapping error: {0}")]
    Mapping(#[from] MappingError),
    #[error("Data error: {0}")]
    Data(#[from] DataError),
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialisation error: {0}")]
    Serialisation(#[from] serde_yaml::Error),
}
#[derive(Error, Debug)]
pub enum MappingError {
    #[error("No column mapping supplied")]
    MissingMapping,
    #[error("Column mapping is missing required role '{role}'")]
    MissingRole { role: String },
    #[error("Mapped column '{column}' not found in any record")]
    UnknownColumn { column: String },
}
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Empty dataset provided")]
    EmptyDataset,
    #[error("Column '{column}' has no usable numeric values")]
    NoNumericValues { column: String },
    #[error("Failed to read data for column '{column}': {reason}")]
    ColumnReadError { column: String, reason: String },
}
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {reason}")]
    ValidationFailed { reason: String },
    #[error("Failed to read configuration file '{path}': {source}")]
    ConfigFileError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
pub type Result<T> = std::result::Result<T, AdapterError>;
