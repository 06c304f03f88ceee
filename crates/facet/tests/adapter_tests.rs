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

use facet::{
    parse_number, transform, AdapterConfig, AggregationPolicy, ChartDataAdapter, ChartKind,
    ColumnMapping, GraphDescriptor, Record,
};
use proptest::prelude::*;
use serde_json::{json, Value};

fn records_from(values: Vec<Value>) -> Vec<Record> {
    values
        .into_iter()
        .filter_map(|value| value.as_object().cloned())
        .collect()
}

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}

#[test]
fn bar_chart_sums_by_category() {
    let records = records_from(vec![
        json!({"cat": "A", "val": "10"}),
        json!({"cat": "A", "val": "5"}),
        json!({"cat": "B", "val": "3"}),
    ]);
    let mapping = ColumnMapping::new("cat", "val");
    let points = transform(
        &records,
        Some(&mapping),
        ChartKind::Bar,
        &columns(&["cat", "val"]),
        &AdapterConfig::default(),
    )
    .expect("bar transform should produce points");
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].name, "A");
    assert_eq!(points[0].value(), Some(15.0));
    assert_eq!(points[1].name, "B");
    assert_eq!(points[1].value(), Some(3.0));
}

#[test]
fn grouped_sum_preserves_first_seen_order() {
    let records = records_from(vec![
        json!({"cat": "Z", "val": 1}),
        json!({"cat": "A", "val": 2}),
        json!({"cat": "Z", "val": 3}),
        json!({"cat": "M", "val": 4}),
    ]);
    let mapping = ColumnMapping::new("cat", "val");
    let points = transform(
        &records,
        Some(&mapping),
        ChartKind::Pie,
        &columns(&["cat", "val"]),
        &AdapterConfig::default(),
    )
    .unwrap();
    let names: Vec<&str> = points.iter().map(|point| point.name.as_str()).collect();
    assert_eq!(names, vec!["Z", "A", "M"]);
}

#[test]
fn null_category_falls_back_to_unknown_label() {
    let records = records_from(vec![
        json!({"cat": null, "val": 7}),
        json!({"val": 3}),
        json!({"cat": "B", "val": 1}),
    ]);
    let mapping = ColumnMapping::new("cat", "val");
    let points = transform(
        &records,
        Some(&mapping),
        ChartKind::Bar,
        &columns(&["cat", "val"]),
        &AdapterConfig::default(),
    )
    .unwrap();
    assert_eq!(points[0].name, "Unknown");
    assert_eq!(points[0].value(), Some(10.0));
}

#[test]
fn histogram_bins_ten_values_into_four_bins() {
    let records = records_from(
        (1..=10)
            .map(|value| json!({"x": "row", "y": value}))
            .collect(),
    );
    let mapping = ColumnMapping::new("x", "y");
    let points = transform(
        &records,
        Some(&mapping),
        ChartKind::Histogram,
        &columns(&["x", "y"]),
        &AdapterConfig::default(),
    )
    .unwrap();
    assert_eq!(points.len(), 4);
    let total: f64 = points.iter().filter_map(|point| point.value()).sum();
    assert_eq!(total, 10.0);
    assert_eq!(points[0].name, "1.0-3.2");
}

#[test]
fn histogram_top_edge_lands_in_last_bin() {
    let records = records_from(
        [0.0, 2.5, 5.0, 7.5, 10.0]
            .iter()
            .map(|value| json!({"x": "row", "y": value}))
            .collect(),
    );
    let mapping = ColumnMapping::new("x", "y");
    let points = transform(
        &records,
        Some(&mapping),
        ChartKind::Histogram,
        &columns(&["x", "y"]),
        &AdapterConfig::default(),
    )
    .unwrap();
    assert_eq!(points.len(), 3);
    assert_eq!(points.last().unwrap().value(), Some(2.0));
    let total: f64 = points.iter().filter_map(|point| point.value()).sum();
    assert_eq!(total, 5.0);
}

#[test]
fn histogram_identical_values_use_single_bucket() {
    let records = records_from(vec![
        json!({"x": "a", "y": 5}),
        json!({"x": "b", "y": 5}),
        json!({"x": "c", "y": 5}),
    ]);
    let mapping = ColumnMapping::new("x", "y");
    let points = transform(
        &records,
        Some(&mapping),
        ChartKind::Density,
        &columns(&["x", "y"]),
        &AdapterConfig::default(),
    )
    .unwrap();
    let total: f64 = points.iter().filter_map(|point| point.value()).sum();
    assert_eq!(total, 3.0);
    assert_eq!(points[0].value(), Some(3.0));
}

#[test]
fn histogram_without_numeric_values_is_empty() {
    let records = records_from(vec![
        json!({"x": "a", "y": "not-a-number"}),
        json!({"x": "b", "y": null}),
    ]);
    let mapping = ColumnMapping::new("x", "y");
    let points = transform(
        &records,
        Some(&mapping),
        ChartKind::Histogram,
        &columns(&["x", "y"]),
        &AdapterConfig::default(),
    )
    .unwrap();
    assert!(points.is_empty());
}

#[test]
fn scatter_emits_one_point_per_record() {
    let records = records_from(vec![
        json!({"x": "a", "y": 1, "s": 4}),
        json!({"x": "b", "y": "oops", "s": null}),
        json!({"x": null, "y": 3}),
    ]);
    let mapping = ColumnMapping::new("x", "y").with_size("s");
    let points = transform(
        &records,
        Some(&mapping),
        ChartKind::Scatter,
        &columns(&["x", "y", "s"]),
        &AdapterConfig::default(),
    )
    .unwrap();
    assert_eq!(points.len(), 3);
    assert_eq!(points[0].number("size"), Some(4.0));
    assert_eq!(points[1].value(), Some(0.0));
    assert_eq!(points[2].name, "Unknown");
}

#[test]
fn bubble_without_size_mapping_defaults_to_one() {
    let records = records_from(vec![json!({"x": "a", "y": 2, "c": "red"})]);
    let mapping = ColumnMapping::new("x", "y").with_color("c");
    let points = transform(
        &records,
        Some(&mapping),
        ChartKind::Bubble,
        &columns(&["x", "y", "c"]),
        &AdapterConfig::default(),
    )
    .unwrap();
    assert_eq!(points[0].number("size"), Some(1.0));
    assert_eq!(points[0].text("color"), Some("red"));
}

#[test]
fn missing_mapping_returns_none() {
    let records = records_from(vec![json!({"a": 1, "b": 2})]);
    let cols = columns(&["a", "b"]);
    assert!(transform(
        &records,
        None,
        ChartKind::Bar,
        &cols,
        &AdapterConfig::default()
    )
    .is_none());

    let partial = ColumnMapping {
        x: Some("a".to_string()),
        ..Default::default()
    };
    assert!(transform(
        &records,
        Some(&partial),
        ChartKind::Bar,
        &cols,
        &AdapterConfig::default()
    )
    .is_none());
}

#[test]
fn mapping_to_absent_column_returns_none() {
    let records = records_from(vec![json!({"a": 1, "b": 2})]);
    let mapping = ColumnMapping::new("missing", "b");
    assert!(transform(
        &records,
        Some(&mapping),
        ChartKind::Bar,
        &columns(&["a", "b"]),
        &AdapterConfig::default()
    )
    .is_none());
}

#[test]
fn empty_records_produce_empty_output() {
    let records: Vec<Record> = Vec::new();
    let mapping = ColumnMapping::new("a", "b");
    let cols = columns(&["a", "b"]);
    for kind in [
        ChartKind::Bar,
        ChartKind::Scatter,
        ChartKind::Histogram,
        ChartKind::StackedBar,
        ChartKind::Heatmap,
        ChartKind::Radar,
    ] {
        let points = transform(&records, Some(&mapping), kind, &cols, &AdapterConfig::default())
            .unwrap_or_else(|| panic!("empty input must not fail for {kind}"));
        assert!(points.is_empty(), "expected empty output for {kind}");
    }
}

#[test]
fn transform_is_idempotent() {
    let records = records_from(vec![
        json!({"cat": "A", "val": 10, "grp": "g1"}),
        json!({"cat": "B", "val": 5, "grp": "g2"}),
        json!({"cat": "A", "val": 2, "grp": "g2"}),
    ]);
    let mapping = ColumnMapping::new("cat", "val").with_color("grp");
    let cols = columns(&["cat", "val", "grp"]);
    let config = AdapterConfig::default();
    for kind in [ChartKind::Bar, ChartKind::StackedBar, ChartKind::Heatmap] {
        let first = transform(&records, Some(&mapping), kind, &cols, &config).unwrap();
        let second = transform(&records, Some(&mapping), kind, &cols, &config).unwrap();
        assert_eq!(first, second, "repeated transform diverged for {kind}");
    }
}

#[test]
fn unrecognised_graph_type_falls_back_to_grouped_sum() {
    assert_eq!(
        AggregationPolicy::for_tag("wordcloud"),
        AggregationPolicy::GroupedSum
    );
    let adapter = ChartDataAdapter::new();
    let records = records_from(vec![
        json!({"cat": "A", "val": 1}),
        json!({"cat": "A", "val": 2}),
    ]);
    let descriptor = GraphDescriptor::new("wordcloud")
        .with_mapping(ColumnMapping::new("cat", "val"));
    let points = adapter
        .transform_descriptor(&records, &descriptor, &columns(&["cat", "val"]))
        .unwrap();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].value(), Some(3.0));
}

#[test]
fn stacked_bar_builds_one_field_per_series() {
    let records = records_from(vec![
        json!({"region": "N", "rev": 10, "q": "Q1"}),
        json!({"region": "N", "rev": 4, "q": "Q2"}),
        json!({"region": "S", "rev": 6, "q": "Q1"}),
        json!({"region": "N", "rev": 1, "q": "Q1"}),
    ]);
    let mapping = ColumnMapping::new("region", "rev").with_color("q");
    let points = transform(
        &records,
        Some(&mapping),
        ChartKind::StackedBar,
        &columns(&["region", "rev", "q"]),
        &AdapterConfig::default(),
    )
    .unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].name, "N");
    assert_eq!(points[0].number("Q1"), Some(11.0));
    assert_eq!(points[0].number("Q2"), Some(4.0));
    assert_eq!(points[1].number("Q1"), Some(6.0));
    assert_eq!(points[1].number("Q2"), None);
}

#[test]
fn grouped_bar_without_color_uses_default_series_key() {
    let records = records_from(vec![
        json!({"region": "N", "rev": 10}),
        json!({"region": "N", "rev": 5}),
    ]);
    let mapping = ColumnMapping::new("region", "rev");
    let points = transform(
        &records,
        Some(&mapping),
        ChartKind::GroupedBar,
        &columns(&["region", "rev"]),
        &AdapterConfig::default(),
    )
    .unwrap();
    assert_eq!(points[0].number("Default"), Some(15.0));
}

#[test]
fn heatmap_takes_first_matching_cell() {
    let records = records_from(vec![
        json!({"row": "a", "col": "x", "v": 3}),
        json!({"row": "a", "col": "x", "v": 99}),
        json!({"row": "a", "col": "y", "v": 5}),
        json!({"row": "b", "col": "x", "v": 7}),
    ]);
    let mapping = ColumnMapping::new("row", "v").with_color("col");
    let points = transform(
        &records,
        Some(&mapping),
        ChartKind::Heatmap,
        &columns(&["row", "col", "v"]),
        &AdapterConfig::default(),
    )
    .unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].number("x"), Some(3.0));
    assert_eq!(points[0].number("y"), Some(5.0));
    assert_eq!(points[1].number("x"), Some(7.0));
    assert_eq!(points[1].number("y"), Some(0.0));
}

#[test]
fn radar_limits_points_and_metrics() {
    let mut raw = Vec::new();
    for index in 0..12 {
        raw.push(json!({
            "label": format!("r{index}"),
            "m1": index, "m2": index, "m3": index, "m4": index,
            "m5": index, "m6": index, "m7": index,
        }));
    }
    let records = records_from(raw);
    let cols = columns(&["label", "m1", "m2", "m3", "m4", "m5", "m6", "m7"]);
    let mapping = ColumnMapping::new("label", "m1");
    let points = transform(
        &records,
        Some(&mapping),
        ChartKind::Radar,
        &cols,
        &AdapterConfig::default(),
    )
    .unwrap();
    assert_eq!(points.len(), 10);
    assert_eq!(points[0].fields.len(), 5);
    assert!(points[0].number("m5").is_some());
    assert!(points[0].number("m6").is_none());
}

#[test]
fn radar_names_default_to_point_index() {
    let records = records_from(vec![
        json!({"label": null, "m1": 1, "m2": 2}),
        json!({"label": "second", "m1": 3, "m2": 4}),
    ]);
    let mapping = ColumnMapping::new("label", "m1");
    let points = transform(
        &records,
        Some(&mapping),
        ChartKind::Polar,
        &columns(&["label", "m1", "m2"]),
        &AdapterConfig::default(),
    )
    .unwrap();
    assert_eq!(points[0].name, "Point 1");
    assert_eq!(points[1].name, "second");
}

#[test]
fn chart_point_serialises_with_flattened_fields() {
    let records = records_from(vec![json!({"cat": "A", "val": 15})]);
    let mapping = ColumnMapping::new("cat", "val");
    let points = transform(
        &records,
        Some(&mapping),
        ChartKind::Bar,
        &columns(&["cat", "val"]),
        &AdapterConfig::default(),
    )
    .unwrap();
    let encoded = serde_json::to_value(&points[0]).unwrap();
    assert_eq!(encoded, json!({"name": "A", "value": 15.0}));
}

#[test]
fn parse_number_never_yields_nan() {
    assert_eq!(parse_number(&json!("12.5")), 12.5);
    assert_eq!(parse_number(&json!(" 3 ")), 3.0);
    assert_eq!(parse_number(&json!("abc")), 0.0);
    assert_eq!(parse_number(&json!(null)), 0.0);
    assert_eq!(parse_number(&json!(true)), 0.0);
    assert_eq!(parse_number(&json!([1, 2])), 0.0);
}

proptest! {
    #[test]
    fn grouped_sum_conserves_mass(
        rows in prop::collection::vec((0usize..4, -1000.0f64..1000.0), 0..40)
    ) {
        let categories = ["A", "B", "C", "D"];
        let records = records_from(
            rows.iter()
                .map(|(index, value)| json!({"cat": categories[*index], "val": value}))
                .collect(),
        );
        let mapping = ColumnMapping::new("cat", "val");
        let expected: f64 = records
            .iter()
            .map(|record| parse_number(record.get("val").unwrap()))
            .sum();
        let points = transform(
            &records,
            Some(&mapping),
            ChartKind::Bar,
            &columns(&["cat", "val"]),
            &AdapterConfig::default(),
        )
        .unwrap();
        let total: f64 = points.iter().filter_map(|point| point.value()).sum();
        prop_assert!((total - expected).abs() < 1e-6);
    }

    #[test]
    fn point_preserving_keeps_length(
        rows in prop::collection::vec((0usize..4, -1000.0f64..1000.0), 0..40)
    ) {
        let categories = ["A", "B", "C", "D"];
        let records = records_from(
            rows.iter()
                .map(|(index, value)| json!({"cat": categories[*index], "val": value}))
                .collect(),
        );
        let mapping = ColumnMapping::new("cat", "val");
        let points = transform(
            &records,
            Some(&mapping),
            ChartKind::Scatter,
            &columns(&["cat", "val"]),
            &AdapterConfig::default(),
        )
        .unwrap();
        prop_assert_eq!(points.len(), records.len());
    }

    #[test]
    fn binning_counts_every_numeric_value(
        values in prop::collection::vec(-1000.0f64..1000.0, 1..60)
    ) {
        let records = records_from(
            values.iter().map(|value| json!({"x": "row", "y": value})).collect(),
        );
        let mapping = ColumnMapping::new("x", "y");
        let points = transform(
            &records,
            Some(&mapping),
            ChartKind::Histogram,
            &columns(&["x", "y"]),
            &AdapterConfig::default(),
        )
        .unwrap();
        let total: f64 = points.iter().filter_map(|point| point.value()).sum();
        prop_assert_eq!(total, values.len() as f64);
    }
}
