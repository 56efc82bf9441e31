// File: json.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use anyhow::Result;

use super::{ReportConfig, ReportData, ReportGenerator};

pub struct JsonGenerator;

impl JsonGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl ReportGenerator for JsonGenerator {
    fn generate(&self, data: &ReportData, config: &ReportConfig) -> Result<String> {
        let json = if config.include_raw_response {
            serde_json::to_string_pretty(data)
        } else {
            let mut trimmed = data.clone();
            trimmed.raw_response = None;
            serde_json::to_string_pretty(&trimmed)
        }
        .map_err(|e| anyhow::anyhow!("Failed to serialize report to JSON: {}", e))?;
        Ok(json)
    }

    fn file_extension(&self) -> &'static str {
        "json"
    }
}
