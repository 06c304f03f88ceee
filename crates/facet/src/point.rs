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

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PointValue {
    Number(f64),
    Text(String),
}
impl PointValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            PointValue::Number(n) => Some(*n),
            PointValue::Text(_) => None,
        }
    }
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PointValue::Text(s) => Some(s),
            PointValue::Number(_) => None,
        }
    }
}
impl From<f64> for PointValue {
    fn from(value: f64) -> Self {
        PointValue::Number(value)
    }
}
impl From<&str> for PointValue {
    fn from(value: &str) -> Self {
        PointValue::Text(value.to_string())
    }
}
impl From<String> for PointValue {
    fn from(value: String) -> Self {
        PointValue::Text(value)
    }
}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub name: String,
    #[serde(flatten)]
    pub fields: IndexMap<String, PointValue>,
}
impl ChartPoint {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<PointValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<PointValue>) {
        self.fields.insert(key.into(), value.into());
    }
    pub fn number(&self, key: &str) -> Option<f64> {
        self.fields.get(key).and_then(PointValue::as_number)
    }
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(PointValue::as_text)
    }
    pub fn value(&self) -> Option<f64> {
        self.number("value")
    }
}
