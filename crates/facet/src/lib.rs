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

pub mod aggregate;
pub mod config;
pub mod error;
pub mod kind;
pub mod mapping;
pub mod point;
pub mod profile;
pub mod value;

pub use aggregate::{transform, try_transform};
pub use config::{AdapterConfig, ProfilingConfig};
pub use error::{AdapterError, ConfigError, DataError, MappingError, Result};
pub use kind::{AggregationPolicy, ChartKind};
pub use mapping::{ColumnMapping, GraphDescriptor, MappedRoles};
pub use point::{ChartPoint, PointValue};
pub use profile::{classify_column, profile_columns, suggest_mapping, ColumnProfile, ColumnType};
pub use value::{display_label, parse_number, parse_number_strict, Record};

use tracing::debug;

pub struct ChartDataAdapter {
    config: AdapterConfig,
    profiling_config: ProfilingConfig,
}
impl ChartDataAdapter {
    pub fn new() -> Self {
        Self {
            config: AdapterConfig::default(),
            profiling_config: ProfilingConfig::default(),
        }
    }
    pub fn with_config(config: AdapterConfig, profiling_config: ProfilingConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|reason| ConfigError::ValidationFailed { reason })?;
        profiling_config
            .validate()
            .map_err(|reason| ConfigError::ValidationFailed { reason })?;
        Ok(Self {
            config,
            profiling_config,
        })
    }
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let config = AdapterConfig::from_yaml_file(path)?;
        Ok(Self {
            config,
            profiling_config: ProfilingConfig::default(),
        })
    }
    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }
    pub fn transform(
        &self,
        records: &[Record],
        mapping: Option<&ColumnMapping>,
        kind: ChartKind,
        all_columns: &[String],
    ) -> Option<Vec<ChartPoint>> {
        aggregate::transform(records, mapping, kind, all_columns, &self.config)
    }
    pub fn try_transform(
        &self,
        records: &[Record],
        mapping: Option<&ColumnMapping>,
        kind: ChartKind,
        all_columns: &[String],
    ) -> Result<Vec<ChartPoint>> {
        aggregate::try_transform(records, mapping, kind, all_columns, &self.config)
    }
    pub fn transform_descriptor(
        &self,
        records: &[Record],
        descriptor: &GraphDescriptor,
        all_columns: &[String],
    ) -> Option<Vec<ChartPoint>> {
        let kind = match ChartKind::parse(&descriptor.graph_type) {
            Some(kind) => kind,
            None => {
                debug!(
                    graph_type = %descriptor.graph_type,
                    "unrecognised graph type, falling back to grouped sum"
                );
                ChartKind::Bar
            }
        };
        let suggested;
        let mapping = match descriptor.column_mapping.as_ref() {
            Some(mapping) => Some(mapping),
            None => {
                suggested = profile::suggest_mapping(all_columns, records, &self.profiling_config);
                suggested.as_ref()
            }
        };
        self.transform(records, mapping, kind, all_columns)
    }
    pub fn suggest_mapping(
        &self,
        all_columns: &[String],
        records: &[Record],
    ) -> Option<ColumnMapping> {
        profile::suggest_mapping(all_columns, records, &self.profiling_config)
    }
    pub fn profile_columns(&self, all_columns: &[String], records: &[Record]) -> Vec<ColumnProfile> {
        profile::profile_columns(all_columns, records, &self.profiling_config)
    }
}
impl Default for ChartDataAdapter {
    fn default() -> Self {
        Self::new()
    }
}
