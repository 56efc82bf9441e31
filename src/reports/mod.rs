// File: mod.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::executor::{ExecutionResult, Outcome};
use crate::generator::PlanSource;
use crate::request::RequestDescriptor;
use crate::run_state::RunState;

pub mod html;
pub mod json;
pub mod text;

#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub generated_at: DateTime<Utc>,
    pub title: String,
    pub command: String,
    pub base_request: RequestDescriptor,
    pub plan_source: PlanSource,
    pub summary: ReportSummary,
    pub results: Vec<ExecutionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    pub pass_rate: f64,
    pub duration_ms: i64,
    /// Observed status codes, `"none"` for transport errors.
    pub status_distribution: BTreeMap<String, usize>,
}

#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub theme: Theme,
    pub include_raw_response: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Unknown theme: {}", other)),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Light,
            include_raw_response: true,
        }
    }
}

pub trait ReportGenerator {
    fn generate(&self, data: &ReportData, config: &ReportConfig) -> Result<String>;
    fn file_extension(&self) -> &'static str;
}

pub struct ReportEngine;

impl ReportEngine {
    pub fn new() -> Self {
        Self
    }

    pub fn get_generator(&self, format: &str) -> Result<Box<dyn ReportGenerator>> {
        match format.to_lowercase().as_str() {
            "html" => Ok(Box::new(html::HtmlGenerator::new())),
            "json" => Ok(Box::new(json::JsonGenerator::new())),
            "text" | "txt" => Ok(Box::new(text::TextGenerator::new())),
            _ => Err(anyhow::anyhow!("Unsupported report format: {}", format)),
        }
    }

    pub fn generate_report<P: AsRef<Path>>(
        &self,
        format: &str,
        data: &ReportData,
        config: &ReportConfig,
        output_path: Option<P>,
    ) -> Result<String> {
        let generator = self.get_generator(format)?;
        let content = generator.generate(data, config)?;

        if let Some(path) = output_path {
            std::fs::write(path.as_ref(), &content).with_context(|| {
                format!("Failed to write report to {}", path.as_ref().display())
            })?;
        }

        Ok(content)
    }

    /// Writes `test_report_<timestamp>.<ext>` into `output_dir`, creating it
    /// when missing.
    pub fn write_report<P: AsRef<Path>>(
        &self,
        format: &str,
        data: &ReportData,
        config: &ReportConfig,
        output_dir: P,
    ) -> Result<PathBuf> {
        let generator = self.get_generator(format)?;
        let output_dir = output_dir.as_ref();
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create {}", output_dir.display()))?;

        let path = output_dir.join(format!(
            "test_report_{}.{}",
            data.generated_at.format("%Y%m%d_%H%M%S"),
            generator.file_extension()
        ));
        self.generate_report(format, data, config, Some(&path))?;
        Ok(path)
    }

    pub fn create_report_data(
        &self,
        command: &str,
        base_request: &RequestDescriptor,
        plan_source: PlanSource,
        raw_response: Option<String>,
        results: Vec<ExecutionResult>,
        state: &RunState,
    ) -> ReportData {
        let summary = self.calculate_summary(&results, state);

        ReportData {
            generated_at: Utc::now(),
            title: "curlprobe API Test Report".to_string(),
            command: command.trim().to_string(),
            base_request: base_request.clone(),
            plan_source,
            summary,
            results,
            raw_response,
        }
    }

    fn calculate_summary(&self, results: &[ExecutionResult], state: &RunState) -> ReportSummary {
        let count = |outcome: Outcome| results.iter().filter(|r| r.outcome == outcome).count();
        let total = results.len();
        let passed = count(Outcome::Pass);

        let mut status_distribution = BTreeMap::new();
        for result in results {
            let key = result
                .status_code
                .map_or_else(|| "none".to_string(), |s| s.to_string());
            *status_distribution.entry(key).or_insert(0) += 1;
        }

        ReportSummary {
            total,
            passed,
            failed: count(Outcome::Fail),
            errored: count(Outcome::Error),
            pass_rate: if total == 0 {
                0.0
            } else {
                passed as f64 * 100.0 / total as f64
            },
            duration_ms: state.duration_ms(),
            status_distribution,
        }
    }
}

#[cfg(test)]
#[path = "reports_tests.rs"]
mod tests;
