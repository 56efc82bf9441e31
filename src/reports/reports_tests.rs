// File: reports_tests.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

#[cfg(test)]
mod tests {
    use crate::executor::{ExecutionResult, Outcome};
    use crate::generator::PlanSource;
    use crate::recovery::RecoveryStage;
    use crate::reports::*;
    use crate::request::{HttpMethod, RequestDescriptor};
    use crate::run_state::RunState;
    use crate::testcase::{Modification, TestCase};
    use pretty_assertions::assert_eq;
    use rstest::*;
    use serde_json::{json, Value};
    use std::fs;
    use tempfile::TempDir;

    const COMMAND: &str = "curl 'https://api.test/payments?paymentMethod=ALL' -H 'x-merchant-id: A'";

    fn base() -> RequestDescriptor {
        RequestDescriptor::new(HttpMethod::Get, "https://api.test/payments")
            .with_header("x-merchant-id", "A")
            .with_param("paymentMethod", "ALL")
    }

    fn result(case: TestCase, status: Option<u16>, outcome: Outcome) -> ExecutionResult {
        let request = case.resolve(&base());
        ExecutionResult {
            test_case: case,
            request,
            status_code: status,
            body: json!({"ok": status.is_some()}),
            outcome,
            error: status.map_or(Some("connection refused".to_string()), |_| None),
            elapsed_ms: 12,
        }
    }

    fn results() -> Vec<ExecutionResult> {
        vec![
            result(TestCase::baseline("Valid Request Test"), Some(200), Outcome::Pass),
            result(
                TestCase::negative(
                    "Missing x-merchant-id <header>",
                    Modification::RemoveHeader("x-merchant-id".to_string()),
                ),
                Some(200),
                Outcome::Fail,
            ),
            result(
                TestCase::negative(
                    "Invalid paymentMethod",
                    Modification::SetParam("paymentMethod".to_string(), "INVALID_VALUE".to_string()),
                ),
                None,
                Outcome::Error,
            ),
        ]
    }

    fn report(raw_response: Option<&str>) -> ReportData {
        let results = results();
        let mut state = RunState::new(results.len());
        state.start();
        for r in &results {
            state.record(r);
        }
        state.finish();

        ReportEngine::new().create_report_data(
            COMMAND,
            &base(),
            PlanSource::Recovered(RecoveryStage::Sections),
            raw_response.map(str::to_string),
            results,
            &state,
        )
    }

    #[test]
    fn test_summary_counts() {
        let data = report(None);

        assert_eq!(data.summary.total, 3);
        assert_eq!(data.summary.passed, 1);
        assert_eq!(data.summary.failed, 1);
        assert_eq!(data.summary.errored, 1);
        assert!((data.summary.pass_rate - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(data.summary.status_distribution.get("200"), Some(&2));
        assert_eq!(data.summary.status_distribution.get("none"), Some(&1));
        assert_eq!(data.title, "curlprobe API Test Report");
        assert_eq!(data.command, COMMAND);
    }

    #[test]
    fn test_empty_run_summary() {
        let data = ReportEngine::new().create_report_data(
            COMMAND,
            &base(),
            PlanSource::Basic,
            None,
            Vec::new(),
            &RunState::new(0),
        );

        assert_eq!(data.summary.total, 0);
        assert_eq!(data.summary.pass_rate, 0.0);
        assert!(data.summary.status_distribution.is_empty());
    }

    #[test]
    fn test_json_report() {
        let engine = ReportEngine::new();
        let data = report(Some("1. Test Case: ..."));
        let content = engine
            .generate_report::<&str>("json", &data, &ReportConfig::default(), None)
            .unwrap();
        let value: Value = serde_json::from_str(&content).unwrap();

        assert_eq!(value["summary"]["passed"], json!(1));
        assert_eq!(value["plan_source"], json!({"kind": "recovered", "stage": "sections"}));
        assert_eq!(value["results"][1]["outcome"], json!("FAIL"));
        assert_eq!(value["results"][2]["status_code"], Value::Null);
        assert_eq!(value["results"][2]["error"], json!("connection refused"));
        assert_eq!(value["base_request"]["method"], json!("GET"));
        assert_eq!(value["raw_response"], json!("1. Test Case: ..."));
    }

    #[test]
    fn test_json_report_can_omit_raw_response() {
        let config = ReportConfig {
            include_raw_response: false,
            ..ReportConfig::default()
        };
        let content = ReportEngine::new()
            .generate_report::<&str>("json", &report(Some("secret")), &config, None)
            .unwrap();
        let value: Value = serde_json::from_str(&content).unwrap();

        assert!(value.get("raw_response").is_none());
        assert!(!content.contains("secret"));
    }

    #[test]
    fn test_html_report() {
        let content = ReportEngine::new()
            .generate_report::<&str>("html", &report(Some("raw <reply>")), &ReportConfig::default(), None)
            .unwrap();

        assert!(content.starts_with("<!DOCTYPE html>"));
        assert!(content.contains("curlprobe API Test Report"));
        assert!(content.contains("Missing x-merchant-id &lt;header&gt;"));
        assert!(content.contains("raw &lt;reply&gt;"));
        assert!(content.contains("PASS"));
        assert!(content.contains("connection refused"));
        assert!(content.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_html_theme() {
        let config = ReportConfig {
            theme: Theme::Dark,
            ..ReportConfig::default()
        };
        let content = ReportEngine::new()
            .generate_report::<&str>("html", &report(None), &config, None)
            .unwrap();
        assert!(content.contains(r#"<html lang="en" class="dark">"#));
    }

    #[test]
    fn test_text_report() {
        let content = ReportEngine::new()
            .generate_report::<&str>("text", &report(Some("raw reply")), &ReportConfig::default(), None)
            .unwrap();

        assert!(content.contains("CURLPROBE API TEST REPORT"));
        assert!(content.contains("EXECUTIVE SUMMARY"));
        assert!(content.contains("Total Cases:          3"));
        assert!(content.contains("[PASS]    1. Valid Request Test"));
        assert!(content.contains("[ERROR]   3. Invalid paymentMethod"));
        assert!(content.contains("paymentMethod=INVALID_VALUE"));
        assert!(content.contains("error: connection refused"));
        assert!(content.contains("No response"));
        assert!(content.contains("PROVIDER RESPONSE"));
    }

    #[rstest]
    #[case("json", "json")]
    #[case("HTML", "html")]
    #[case("txt", "txt")]
    #[case("text", "txt")]
    fn test_generator_lookup(#[case] format: &str, #[case] ext: &str) {
        let generator = ReportEngine::new().get_generator(format).unwrap();
        assert_eq!(generator.file_extension(), ext);
    }

    #[test]
    fn test_theme_from_str() {
        assert_eq!("Dark".parse::<Theme>(), Ok(Theme::Dark));
        assert_eq!(" light ".parse::<Theme>(), Ok(Theme::Light));
        assert!("sepia".parse::<Theme>().is_err());
    }

    #[test]
    fn test_unsupported_format() {
        let err = ReportEngine::new()
            .generate_report::<&str>("pdf", &report(None), &ReportConfig::default(), None)
            .unwrap_err();
        assert!(err.to_string().contains("Unsupported report format: pdf"));
    }

    #[test]
    fn test_write_report_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let output_dir = temp_dir.path().join("reports").join("nested");
        let data = report(None);

        let path = ReportEngine::new()
            .write_report("json", &data, &ReportConfig::default(), &output_dir)
            .unwrap();

        assert!(path.starts_with(&output_dir));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("test_report_"));
        assert!(name.ends_with(".json"));

        let value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["summary"]["total"], json!(3));
    }

    #[test]
    fn test_generate_report_writes_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.txt");

        let content = ReportEngine::new()
            .generate_report("text", &report(None), &ReportConfig::default(), Some(&path))
            .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), content);
    }
}
