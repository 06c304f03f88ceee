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

use crate::config::ProfilingConfig;
use crate::mapping::ColumnMapping;
use crate::value::{display_label, parse_number_strict, Record};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(rename_all = "PascalCase")]
pub enum ColumnType {
    Numeric,
    Categorical,
    Temporal,
}
impl ColumnType {
    pub fn is_numeric(&self) -> bool {
        matches!(self, ColumnType::Numeric)
    }
    pub fn is_categorical(&self) -> bool {
        matches!(self, ColumnType::Categorical)
    }
    pub fn is_temporal(&self) -> bool {
        matches!(self, ColumnType::Temporal)
    }
}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub name: String,
    pub column_type: ColumnType,
    pub total_count: usize,
    pub null_count: usize,
    pub null_percentage: f64,
    pub cardinality: usize,
    pub sample_values: Vec<String>,
}
fn is_temporal_value(value: &Value, formats: &[String]) -> bool {
    let Value::String(s) = value else {
        return false;
    };
    let candidate = s.trim();
    formats.iter().any(|format| {
        NaiveDateTime::parse_from_str(candidate, format).is_ok()
            || NaiveDate::parse_from_str(candidate, format).is_ok()
    })
}
pub fn classify_column(name: &str, records: &[Record], config: &ProfilingConfig) -> ColumnProfile {
    let total_count = records.len();
    let mut null_count = 0usize;
    let mut distinct: HashSet<String> = HashSet::new();
    let mut sample_values: Vec<String> = Vec::new();
    let mut sampled = 0usize;
    let mut numeric_hits = 0usize;
    let mut temporal_hits = 0usize;
    for record in records {
        let value = record.get(name);
        match value {
            None | Some(Value::Null) => {
                null_count += 1;
                continue;
            }
            Some(value) => {
                let label = display_label(Some(value), "");
                if sample_values.len() < 5 && !sample_values.contains(&label) {
                    sample_values.push(label.clone());
                }
                distinct.insert(label);
                if sampled < config.max_sample_values {
                    sampled += 1;
                    if parse_number_strict(value).is_some() {
                        numeric_hits += 1;
                    } else if is_temporal_value(value, &config.temporal_formats) {
                        temporal_hits += 1;
                    }
                }
            }
        }
    }
    let column_type = if sampled == 0 {
        ColumnType::Categorical
    } else {
        let numeric_ratio = numeric_hits as f64 / sampled as f64;
        let temporal_ratio = temporal_hits as f64 / sampled as f64;
        if numeric_ratio >= config.numeric_majority_threshold {
            ColumnType::Numeric
        } else if temporal_ratio >= config.numeric_majority_threshold {
            ColumnType::Temporal
        } else {
            ColumnType::Categorical
        }
    };
    let null_percentage = if total_count == 0 {
        0.0
    } else {
        null_count as f64 / total_count as f64 * 100.0
    };
    ColumnProfile {
        name: name.to_string(),
        column_type,
        total_count,
        null_count,
        null_percentage,
        cardinality: distinct.len(),
        sample_values,
    }
}
pub fn profile_columns(
    columns: &[String],
    records: &[Record],
    config: &ProfilingConfig,
) -> Vec<ColumnProfile> {
    columns
        .iter()
        .map(|column| classify_column(column, records, config))
        .collect()
}
pub fn suggest_mapping(
    columns: &[String],
    records: &[Record],
    config: &ProfilingConfig,
) -> Option<ColumnMapping> {
    let profiles = profile_columns(columns, records, config);
    let y = profiles
        .iter()
        .find(|profile| profile.column_type.is_numeric())?;
    let x = profiles
        .iter()
        .find(|profile| !profile.column_type.is_numeric())
        .or_else(|| profiles.iter().find(|profile| profile.name != y.name))
        .unwrap_or(y);
    let color = profiles.iter().find(|profile| {
        profile.column_type.is_categorical()
            && profile.name != x.name
            && profile.name != y.name
            && profile.cardinality <= config.max_categorical_cardinality
    });
    let mut mapping = ColumnMapping::new(x.name.clone(), y.name.clone());
    if let Some(color) = color {
        mapping = mapping.with_color(color.name.clone());
    }
    Some(mapping)
}
