// File: text.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use anyhow::Result;

use super::{ReportConfig, ReportData, ReportGenerator};
use crate::executor::{ExecutionResult, Outcome};

const RULE: &str =
    "===============================================================================\n";

pub struct TextGenerator;

impl TextGenerator {
    pub fn new() -> Self {
        Self
    }

    fn format_outcome(&self, outcome: Outcome) -> &str {
        match outcome {
            Outcome::Pass => "[PASS] ",
            Outcome::Fail => "[FAIL] ",
            Outcome::Error => "[ERROR]",
        }
    }

    fn format_result(&self, index: usize, result: &ExecutionResult) -> String {
        let observed = result
            .status_code
            .map_or_else(|| "-".to_string(), |s| s.to_string());

        let mut line = format!(
            "{} {:>3}. {}\n        {} {} | type: {} | expected: {} | observed: {} | {} ms\n",
            self.format_outcome(result.outcome),
            index + 1,
            result.test_case.description,
            result.request.method,
            result.request.full_url(),
            result.test_case.test_type.as_str(),
            result.test_case.expected_status,
            observed,
            result.elapsed_ms
        );
        if let Some(error) = &result.error {
            line.push_str(&format!("        error: {}\n", error));
        }
        line
    }
}

impl ReportGenerator for TextGenerator {
    fn generate(&self, data: &ReportData, config: &ReportConfig) -> Result<String> {
        let mut output = String::new();

        output.push_str(RULE);
        output.push_str(&format!(
            "                          {}\n",
            data.title.to_uppercase()
        ));
        output.push_str(RULE);
        output.push_str(&format!(
            "Generated: {}\n",
            data.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        output.push_str(&format!("Tool: curlprobe v{}\n", env!("CARGO_PKG_VERSION")));
        output.push_str(&format!(
            "Target: {} {}\n",
            data.base_request.method, data.base_request.url
        ));
        output.push_str(&format!("Plan: {}\n", data.plan_source));
        output.push_str(RULE);
        output.push('\n');

        let summary = &data.summary;
        output.push_str("EXECUTIVE SUMMARY\n");
        output.push_str("-----------------\n");
        output.push_str(&format!("Total Cases:          {}\n", summary.total));
        output.push_str(&format!("Passed:               {}\n", summary.passed));
        output.push_str(&format!("Failed:               {}\n", summary.failed));
        output.push_str(&format!("Errors:               {}\n", summary.errored));
        output.push_str(&format!(
            "Pass Rate:            {:.1}%\n",
            summary.pass_rate
        ));
        output.push_str(&format!(
            "Duration:             {} ms\n",
            summary.duration_ms
        ));

        output.push_str("\nSTATUS CODE DISTRIBUTION\n");
        output.push_str("------------------------\n");
        let mut status_codes: Vec<_> = summary.status_distribution.iter().collect();
        status_codes.sort_by(|a, b| b.1.cmp(a.1));
        for (status, count) in status_codes {
            let status_name = match status.as_str() {
                "none" => "No response",
                s if s.starts_with('2') => "Success (2xx)",
                s if s.starts_with('3') => "Redirect (3xx)",
                s if s.starts_with('4') => "Client Error (4xx)",
                s if s.starts_with('5') => "Server Error (5xx)",
                _ => "Other",
            };
            output.push_str(&format!("  {:<6} {:<20} {}\n", status, status_name, count));
        }

        output.push_str("\nTEST RESULTS\n");
        output.push_str("------------\n");
        for (index, result) in data.results.iter().enumerate() {
            output.push_str(&self.format_result(index, result));
        }

        output.push_str("\nSOURCE COMMAND\n");
        output.push_str("--------------\n");
        output.push_str(&data.command);
        output.push('\n');

        if let (Some(raw), true) = (&data.raw_response, config.include_raw_response) {
            output.push_str("\nPROVIDER RESPONSE\n");
            output.push_str("-----------------\n");
            output.push_str(raw);
            output.push('\n');
        }

        output.push('\n');
        output.push_str(RULE);
        Ok(output)
    }

    fn file_extension(&self) -> &'static str {
        "txt"
    }
}
