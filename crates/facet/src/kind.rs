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

use serde::{Deserialize, Serialize};
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Line,
    Area,
    Pie,
    Donut,
    Scatter,
    Bubble,
    #[serde(rename = "3d_scatter")]
    Scatter3d,
    Histogram,
    Density,
    GroupedBar,
    StackedBar,
    Heatmap,
    CorrelationMatrix,
    Radar,
    Polar,
    Treemap,
    Sunburst,
    Funnel,
}
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregationPolicy {
    PointPreserving,
    Binning,
    GroupedSum,
    GroupedSeries,
    Matrix,
    MultiMetric,
}
impl ChartKind {
    pub fn parse(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "bar" => Some(ChartKind::Bar),
            "line" => Some(ChartKind::Line),
            "area" => Some(ChartKind::Area),
            "pie" => Some(ChartKind::Pie),
            "donut" => Some(ChartKind::Donut),
            "scatter" => Some(ChartKind::Scatter),
            "bubble" => Some(ChartKind::Bubble),
            "3d_scatter" | "scatter_3d" => Some(ChartKind::Scatter3d),
            "histogram" => Some(ChartKind::Histogram),
            "density" => Some(ChartKind::Density),
            "grouped_bar" => Some(ChartKind::GroupedBar),
            "stacked_bar" => Some(ChartKind::StackedBar),
            "heatmap" => Some(ChartKind::Heatmap),
            "correlation_matrix" => Some(ChartKind::CorrelationMatrix),
            "radar" => Some(ChartKind::Radar),
            "polar" => Some(ChartKind::Polar),
            "treemap" => Some(ChartKind::Treemap),
            "sunburst" => Some(ChartKind::Sunburst),
            "funnel" => Some(ChartKind::Funnel),
            _ => None,
        }
    }
    pub fn policy(&self) -> AggregationPolicy {
        match self {
            ChartKind::Scatter | ChartKind::Bubble | ChartKind::Scatter3d => {
                AggregationPolicy::PointPreserving
            }
            ChartKind::Histogram | ChartKind::Density => AggregationPolicy::Binning,
            ChartKind::GroupedBar | ChartKind::StackedBar => AggregationPolicy::GroupedSeries,
            ChartKind::Heatmap | ChartKind::CorrelationMatrix => AggregationPolicy::Matrix,
            ChartKind::Radar | ChartKind::Polar => AggregationPolicy::MultiMetric,
            ChartKind::Bar
            | ChartKind::Line
            | ChartKind::Area
            | ChartKind::Pie
            | ChartKind::Donut
            | ChartKind::Treemap
            | ChartKind::Sunburst
            | ChartKind::Funnel => AggregationPolicy::GroupedSum,
        }
    }
    pub fn is_point_preserving(&self) -> bool {
        matches!(self.policy(), AggregationPolicy::PointPreserving)
    }
    pub fn uses_series_keys(&self) -> bool {
        matches!(
            self.policy(),
            AggregationPolicy::GroupedSeries | AggregationPolicy::Matrix
        )
    }
}
impl AggregationPolicy {
    pub fn for_tag(tag: &str) -> Self {
        ChartKind::parse(tag)
            .map(|kind| kind.policy())
            .unwrap_or(AggregationPolicy::GroupedSum)
    }
}
impl std::fmt::Display for ChartKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self {
            ChartKind::Bar => "bar",
            ChartKind::Line => "line",
            ChartKind::Area => "area",
            ChartKind::Pie => "pie",
            ChartKind::Donut => "donut",
            ChartKind::Scatter => "scatter",
            ChartKind::Bubble => "bubble",
            ChartKind::Scatter3d => "3d_scatter",
            ChartKind::Histogram => "histogram",
            ChartKind::Density => "density",
            ChartKind::GroupedBar => "grouped_bar",
            ChartKind::StackedBar => "stacked_bar",
            ChartKind::Heatmap => "heatmap",
            ChartKind::CorrelationMatrix => "correlation_matrix",
            ChartKind::Radar => "radar",
            ChartKind::Polar => "polar",
            ChartKind::Treemap => "treemap",
            ChartKind::Sunburst => "sunburst",
            ChartKind::Funnel => "funnel",
        };
        write!(f, "{tag}")
    }
}
