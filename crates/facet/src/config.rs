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

use crate::error::{AdapterError, ConfigError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdapterConfig {
    pub unknown_label: String,
    pub default_series_key: String,
    pub max_histogram_bins: usize,
    pub bin_label_precision: usize,
    pub radar_metric_limit: usize,
    pub radar_point_limit: usize,
}
impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            unknown_label: "Unknown".to_string(),
            default_series_key: "Default".to_string(),
            max_histogram_bins: 10,
            bin_label_precision: 1,
            radar_metric_limit: 5,
            radar_point_limit: 10,
        }
    }
}
impl AdapterConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.unknown_label.is_empty() {
            return Err("unknown_label must not be empty".to_string());
        }
        if self.default_series_key.is_empty() {
            return Err("default_series_key must not be empty".to_string());
        }
        if self.max_histogram_bins == 0 {
            return Err("max_histogram_bins must be greater than 0".to_string());
        }
        if self.max_histogram_bins > 100 {
            return Err(
                "max_histogram_bins should not exceed 100 for readability reasons".to_string(),
            );
        }
        if self.radar_metric_limit == 0 {
            return Err("radar_metric_limit must be greater than 0".to_string());
        }
        if self.radar_point_limit == 0 {
            return Err("radar_point_limit must be greater than 0".to_string());
        }
        Ok(())
    }
    pub fn for_dense_datasets() -> Self {
        Self {
            max_histogram_bins: 20,
            radar_point_limit: 20,
            ..Default::default()
        }
    }
    pub fn for_presentation() -> Self {
        Self {
            max_histogram_bins: 8,
            radar_metric_limit: 4,
            radar_point_limit: 6,
            ..Default::default()
        }
    }
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, AdapterError> {
        let path_str = path.as_ref().display().to_string();
        let content = fs::read_to_string(path.as_ref()).map_err(|source| {
            ConfigError::ConfigFileError {
                path: path_str,
                source,
            }
        })?;
        let config: Self = serde_yaml::from_str(&content)?;
        config
            .validate()
            .map_err(|reason| ConfigError::ValidationFailed { reason })?;
        Ok(config)
    }
}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfilingConfig {
    pub max_sample_values: usize,
    pub numeric_majority_threshold: f64,
    pub max_categorical_cardinality: usize,
    pub temporal_formats: Vec<String>,
}
impl Default for ProfilingConfig {
    fn default() -> Self {
        Self {
            max_sample_values: 100,
            numeric_majority_threshold: 0.8,
            max_categorical_cardinality: 50,
            temporal_formats: vec![
                "%Y-%m-%d".to_string(),
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%Y-%m-%dT%H:%M:%S".to_string(),
                "%Y-%m-%dT%H:%M:%SZ".to_string(),
                "%m/%d/%Y".to_string(),
                "%d/%m/%Y".to_string(),
            ],
        }
    }
}
impl ProfilingConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_sample_values == 0 {
            return Err("max_sample_values must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.numeric_majority_threshold) {
            return Err("numeric_majority_threshold must be between 0.0 and 1.0".to_string());
        }
        if self.max_categorical_cardinality == 0 {
            return Err("max_categorical_cardinality must be greater than 0".to_string());
        }
        Ok(())
    }
}
