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
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}
#[derive(Debug, Clone, Copy)]
pub struct MappedRoles<'a> {
    pub x: &'a str,
    pub y: &'a str,
    pub color: Option<&'a str>,
    pub size: Option<&'a str>,
}
impl ColumnMapping {
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: Some(x.into()),
            y: Some(y.into()),
            color: None,
            size: None,
        }
    }
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }
    pub fn roles(&self) -> Option<MappedRoles<'_>> {
        match (self.x.as_deref(), self.y.as_deref()) {
            (Some(x), Some(y)) => Some(MappedRoles {
                x,
                y,
                color: self.color.as_deref(),
                size: self.size.as_deref(),
            }),
            _ => None,
        }
    }
    pub fn missing_role(&self) -> Option<&'static str> {
        if self.x.is_none() {
            Some("x")
        } else if self.y.is_none() {
            Some("y")
        } else {
            None
        }
    }
}
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphDescriptor {
    pub graph_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_mapping: Option<ColumnMapping>,
}
impl GraphDescriptor {
    pub fn new(graph_type: impl Into<String>) -> Self {
        Self {
            graph_type: graph_type.into(),
            column_mapping: None,
        }
    }
    pub fn with_mapping(mut self, mapping: ColumnMapping) -> Self {
        self.column_mapping = Some(mapping);
        self
    }
}
