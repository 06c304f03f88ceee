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

use crate::config::AdapterConfig;
use crate::error::{AdapterError, ConfigError, MappingError};
use crate::kind::{AggregationPolicy, ChartKind};
use crate::mapping::{ColumnMapping, MappedRoles};
use crate::point::ChartPoint;
use crate::value::{column_present, display_label, parse_number, parse_number_strict, Record};
use indexmap::{IndexMap, IndexSet};
use tracing::warn;

fn point_preserving(records: &[Record], roles: MappedRoles<'_>, config: &AdapterConfig) -> Vec<ChartPoint> {
    records
        .iter()
        .map(|record| {
            let mut point = ChartPoint::new(display_label(record.get(roles.x), &config.unknown_label))
                .with_field(
                    "value",
                    record.get(roles.y).map(parse_number).unwrap_or(0.0),
                );
            let size = match roles.size {
                Some(column) => record.get(column).map(parse_number).unwrap_or(0.0),
                None => 1.0,
            };
            point.set("size", size);
            if let Some(column) = roles.color {
                point.set(
                    "color",
                    display_label(record.get(column), &config.unknown_label),
                );
            }
            point
        })
        .collect()
}

fn binned(records: &[Record], roles: MappedRoles<'_>, config: &AdapterConfig) -> Vec<ChartPoint> {
    let values: Vec<f64> = records
        .iter()
        .filter_map(|record| record.get(roles.y).and_then(parse_number_strict))
        .collect();
    if values.is_empty() {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let bin_count = ((values.len() as f64).sqrt().ceil() as usize).clamp(1, config.max_histogram_bins);
    let width = (max - min) / bin_count as f64;
    let mut counts = vec![0u64; bin_count];
    for value in &values {
        // Width is zero when every value is identical; everything lands in bin 0.
        let index = if width > 0.0 {
            (((value - min) / width).floor() as usize).min(bin_count - 1)
        } else {
            0
        };
        counts[index] += 1;
    }
    let precision = config.bin_label_precision;
    counts
        .iter()
        .enumerate()
        .map(|(index, count)| {
            let lower = min + index as f64 * width;
            let upper = lower + width;
            ChartPoint::new(format!("{lower:.precision$}-{upper:.precision$}"))
                .with_field("value", *count as f64)
        })
        .collect()
}

fn grouped_sum(records: &[Record], roles: MappedRoles<'_>, config: &AdapterConfig) -> Vec<ChartPoint> {
    let mut groups: IndexMap<String, f64> = IndexMap::new();
    for record in records {
        let name = display_label(record.get(roles.x), &config.unknown_label);
        let value = record.get(roles.y).map(parse_number).unwrap_or(0.0);
        *groups.entry(name).or_insert(0.0) += value;
    }
    groups
        .into_iter()
        .map(|(name, value)| ChartPoint::new(name).with_field("value", value))
        .collect()
}

fn grouped_series(records: &[Record], roles: MappedRoles<'_>, config: &AdapterConfig) -> Vec<ChartPoint> {
    let mut groups: IndexMap<String, IndexMap<String, f64>> = IndexMap::new();
    for record in records {
        let name = display_label(record.get(roles.x), &config.unknown_label);
        let series = match roles.color {
            Some(column) => display_label(record.get(column), &config.default_series_key),
            None => config.default_series_key.clone(),
        };
        let value = record.get(roles.y).map(parse_number).unwrap_or(0.0);
        *groups.entry(name).or_default().entry(series).or_insert(0.0) += value;
    }
    groups
        .into_iter()
        .map(|(name, series)| {
            let mut point = ChartPoint::new(name);
            for (key, value) in series {
                point.set(key, value);
            }
            point
        })
        .collect()
}

fn matrix(records: &[Record], roles: MappedRoles<'_>, config: &AdapterConfig) -> Vec<ChartPoint> {
    let secondary = roles.color.unwrap_or(roles.y);
    let mut x_values: IndexSet<String> = IndexSet::new();
    let mut secondary_values: IndexSet<String> = IndexSet::new();
    for record in records {
        x_values.insert(display_label(record.get(roles.x), &config.unknown_label));
        secondary_values.insert(display_label(record.get(secondary), &config.unknown_label));
    }
    x_values
        .into_iter()
        .map(|x_value| {
            let mut point = ChartPoint::new(x_value.clone());
            for secondary_value in &secondary_values {
                let cell = records
                    .iter()
                    .find(|record| {
                        display_label(record.get(roles.x), &config.unknown_label) == x_value
                            && display_label(record.get(secondary), &config.unknown_label)
                                == *secondary_value
                    })
                    .map(|record| record.get(roles.y).map(parse_number).unwrap_or(0.0))
                    .unwrap_or(0.0);
                point.set(secondary_value.clone(), cell);
            }
            point
        })
        .collect()
}

fn multi_metric(
    records: &[Record],
    roles: MappedRoles<'_>,
    all_columns: &[String],
    config: &AdapterConfig,
) -> Vec<ChartPoint> {
    let metrics: Vec<&String> = all_columns
        .iter()
        .filter(|column| column.as_str() != roles.x)
        .take(config.radar_metric_limit)
        .collect();
    records
        .iter()
        .take(config.radar_point_limit)
        .enumerate()
        .map(|(index, record)| {
            let fallback = format!("Point {}", index + 1);
            let mut point = ChartPoint::new(display_label(record.get(roles.x), &fallback));
            for metric in &metrics {
                let value = record.get(metric.as_str()).map(parse_number).unwrap_or(0.0);
                point.set(metric.as_str(), value);
            }
            point
        })
        .collect()
}

pub fn try_transform(
    records: &[Record],
    mapping: Option<&ColumnMapping>,
    kind: ChartKind,
    all_columns: &[String],
    config: &AdapterConfig,
) -> Result<Vec<ChartPoint>, AdapterError> {
    config
        .validate()
        .map_err(|reason| ConfigError::ValidationFailed { reason })?;
    let mapping = mapping.ok_or(MappingError::MissingMapping)?;
    let roles = mapping.roles().ok_or_else(|| MappingError::MissingRole {
        role: mapping.missing_role().unwrap_or("x").to_string(),
    })?;
    if !records.is_empty() {
        for column in [roles.x, roles.y] {
            if !column_present(records, column) {
                return Err(MappingError::UnknownColumn {
                    column: column.to_string(),
                }
                .into());
            }
        }
    }
    let points = match kind.policy() {
        AggregationPolicy::PointPreserving => point_preserving(records, roles, config),
        AggregationPolicy::Binning => binned(records, roles, config),
        AggregationPolicy::GroupedSum => grouped_sum(records, roles, config),
        AggregationPolicy::GroupedSeries => grouped_series(records, roles, config),
        AggregationPolicy::Matrix => matrix(records, roles, config),
        AggregationPolicy::MultiMetric => multi_metric(records, roles, all_columns, config),
    };
    Ok(points)
}

pub fn transform(
    records: &[Record],
    mapping: Option<&ColumnMapping>,
    kind: ChartKind,
    all_columns: &[String],
    config: &AdapterConfig,
) -> Option<Vec<ChartPoint>> {
    match try_transform(records, mapping, kind, all_columns, config) {
        Ok(points) => Some(points),
        Err(error) => {
            warn!(chart = %kind, error = %error, "chart transform failed");
            None
        }
    }
}
