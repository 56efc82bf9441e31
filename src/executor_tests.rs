// File: executor_tests.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

#[cfg(test)]
mod tests {
    use crate::config::ConfigParameter;
    use crate::error::TransportError;
    use crate::executor::*;
    use crate::mutation::generate_basic_cases;
    use crate::request::{HttpMethod, RequestDescriptor};
    use crate::response::TransportResponse;
    use crate::testcase::{CasePayload, Modification, TestCase, TestType};
    use crate::transport::HttpTransport;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::time::Duration;

    /// Answers every request with a fixed status and records what it saw.
    struct StubTransport {
        status: u16,
        body: String,
        seen: RefCell<Vec<RequestDescriptor>>,
    }

    impl StubTransport {
        fn always(status: u16, body: &str) -> Self {
            StubTransport {
                status,
                body: body.to_string(),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl HttpTransport for StubTransport {
        fn send(
            &self,
            request: &RequestDescriptor,
            _timeout: Duration,
        ) -> Result<TransportResponse, TransportError> {
            self.seen.borrow_mut().push(request.clone());
            Ok(TransportResponse::new(self.status, &self.body, &request.url))
        }
    }

    /// Fails whenever the request lacks the named header.
    struct PickyTransport {
        required: &'static str,
    }

    impl HttpTransport for PickyTransport {
        fn send(
            &self,
            request: &RequestDescriptor,
            _timeout: Duration,
        ) -> Result<TransportResponse, TransportError> {
            if request.headers.contains_key(self.required) {
                Ok(TransportResponse::new(200, "ok", &request.url))
            } else {
                Err(TransportError::Timeout("operation timed out".to_string()))
            }
        }
    }

    fn base() -> RequestDescriptor {
        RequestDescriptor::new(HttpMethod::Get, "https://x/y")
            .with_header("x-merchant-id", "A")
            .with_header("x-signature", "B")
            .with_param("paymentMethod", "ALL")
    }

    #[rstest]
    #[case(200, Some(200), Outcome::Pass)]
    #[case(400, Some(200), Outcome::Fail)]
    #[case(400, Some(401), Outcome::Fail)]
    #[case(200, None, Outcome::Error)]
    fn test_classify(#[case] expected: u16, #[case] observed: Option<u16>, #[case] outcome: Outcome) {
        assert_eq!(classify(expected, observed), outcome);
    }

    #[test]
    fn test_always_200_passes_positive_and_fails_negative() {
        let executor = Executor::new(StubTransport::always(200, "{}"), Duration::from_secs(1));
        let cases = generate_basic_cases(&base(), &ConfigParameter::new());
        let results = executor.run_all(&base(), &cases);

        assert_eq!(results.len(), cases.len());
        for (result, case) in results.iter().zip(&cases) {
            assert_eq!(&result.test_case, case);
            match case.test_type {
                TestType::Positive => assert_eq!(result.outcome, Outcome::Pass),
                _ => assert_eq!(result.outcome, Outcome::Fail),
            }
            assert_eq!(result.status_code, Some(200));
            assert_eq!(result.error, None);
        }
    }

    #[test]
    fn test_modifications_are_applied_to_fresh_copies() {
        let transport = StubTransport::always(200, "");
        let executor = Executor::new(transport, Duration::from_secs(1));
        let base = base();
        let cases = generate_basic_cases(&base, &ConfigParameter::new());
        let results = executor.run_all(&base, &cases);

        assert_eq!(results[0].request, base);
        assert!(!results[1].request.headers.contains_key("x-merchant-id"));
        assert_eq!(results[1].request.headers["x-signature"], "B");
        assert_eq!(results[2].request.headers["x-merchant-id"], "invalid_value");
        assert_eq!(results[5].request.params["paymentMethod"], "INVALID_VALUE");
        assert_eq!(base.headers.len(), 2);
        assert_eq!(base.params["paymentMethod"], "ALL");
    }

    #[test]
    fn test_transport_error_does_not_abort_run() {
        let executor = Executor::new(
            PickyTransport {
                required: "x-merchant-id",
            },
            Duration::from_secs(1),
        );
        let cases = generate_basic_cases(&base(), &ConfigParameter::new());
        let results = executor.run_all(&base(), &cases);

        assert_eq!(results.len(), 6);
        assert_eq!(results[1].outcome, Outcome::Error);
        assert_eq!(results[1].status_code, None);
        assert_eq!(results[1].body, serde_json::Value::Null);
        assert!(results[1].error.as_deref().unwrap().contains("timed out"));
        assert_eq!(results[0].outcome, Outcome::Pass);
        assert_eq!(results[2].outcome, Outcome::Fail);
        assert!(results
            .iter()
            .enumerate()
            .all(|(i, r)| (i == 1) == (r.outcome == Outcome::Error)));
    }

    #[test]
    fn test_replacement_request_is_sent_verbatim() {
        let other = RequestDescriptor::new(HttpMethod::Delete, "https://other.test/items/1");
        let case = TestCase {
            description: "Delete instead".to_string(),
            test_type: TestType::Negative,
            expected_status: 405,
            payload: CasePayload::Replace(other.clone()),
        };
        let executor = Executor::new(StubTransport::always(405, "nope"), Duration::from_secs(1));
        let result = executor.execute(&base(), &case);

        assert_eq!(result.request, other);
        assert_eq!(result.outcome, Outcome::Pass);
        assert_eq!(result.body, json!("nope"));
    }

    #[test]
    fn test_json_body_is_kept_structured() {
        let executor = Executor::new(
            StubTransport::always(400, r#"{"error": "bad signature"}"#),
            Duration::from_secs(1),
        );
        let case = TestCase::negative(
            "Invalid x-signature",
            Modification::SetHeader("x-signature".to_string(), "bad".to_string()),
        );
        let result = executor.execute(&base(), &case);

        assert_eq!(result.outcome, Outcome::Pass);
        assert_eq!(result.body, json!({"error": "bad signature"}));
    }

    #[test]
    fn test_callback_sees_results_in_order() {
        let executor = Executor::new(StubTransport::always(200, ""), Duration::from_secs(1));
        let cases = generate_basic_cases(&base(), &ConfigParameter::new());
        let mut seen = Vec::new();
        let results = executor.run_all_with(&base(), &cases, |r| {
            seen.push(r.test_case.description.clone())
        });

        let expected: Vec<String> = results.iter().map(|r| r.test_case.description.clone()).collect();
        assert_eq!(seen, expected);
        assert_eq!(seen[0], "Valid Request Test");
    }

    #[test]
    fn test_result_serializes_outcome_uppercase() {
        let executor = Executor::new(StubTransport::always(200, ""), Duration::from_secs(1));
        let result = executor.execute(&base(), &TestCase::baseline("Valid Request Test"));
        let value = serde_json::to_value(&result).unwrap();

        assert_eq!(value["outcome"], json!("PASS"));
        assert_eq!(value["status_code"], json!(200));
        assert_eq!(value["test_case"]["description"], json!("Valid Request Test"));
        assert_eq!(value["request"]["method"], json!("GET"));
    }
}
