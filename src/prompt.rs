// File: prompt.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use indexmap::IndexMap;
use serde::Serialize;

use crate::request::RequestDescriptor;
use crate::testcase::TestType;

/// One entry of the plan the provider is asked to fill in. `curl_command`
/// holds an instruction until the provider replaces it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedCase {
    pub description: String,
    pub test_type: TestType,
    pub expected_status_code: u16,
    pub curl_command: String,
}

impl PlannedCase {
    fn negative(description: String, instruction: String) -> Self {
        Self {
            description,
            test_type: TestType::Negative,
            expected_status_code: TestType::Negative.default_status(),
            curl_command: instruction,
        }
    }
}

pub fn free_form_prompt(command: &str) -> String {
    format!(
        r#"You are an API testing expert. Generate test cases for the API called by this curl command:

```
{}
```

Include positive test cases (valid input that should succeed) and negative test cases
(invalid input that should fail). Cover every header: remove it, and send an invalid value.
If the request has a body, cover missing fields, wrong data types and boundary values.

Return only a JSON array, without any other text, where every element has this shape:
[
  {{
    "description": "what the test checks",
    "test_type": "positive or negative",
    "expected_status_code": 200,
    "curl_command": "the complete modified curl command"
  }}
]"#,
        command.trim()
    )
}

/// Baseline, then missing and invalid cases per header, body field and query
/// parameter.
pub fn build_test_plan(command: &str, descriptor: &RequestDescriptor) -> Vec<PlannedCase> {
    let mut plan = vec![PlannedCase {
        description: "Baseline positive test with all valid parameters".to_string(),
        test_type: TestType::Positive,
        expected_status_code: TestType::Positive.default_status(),
        curl_command: command.trim().to_string(),
    }];

    for header in descriptor.headers.keys() {
        plan.push(PlannedCase::negative(
            format!("Missing required header: {}", header),
            format!("Remove the {} header", header),
        ));
        plan.push(PlannedCase::negative(
            format!("Invalid value for header: {}", header),
            format!("Set {} to an invalid value", header),
        ));
    }

    let fields = descriptor
        .body
        .as_ref()
        .map(|body| body.field_names())
        .unwrap_or_default();
    for field in fields {
        plan.push(PlannedCase::negative(
            format!("Missing required body parameter: {}", field),
            format!("Remove the {} field from the request body", field),
        ));
        plan.push(PlannedCase::negative(
            format!("Invalid value for body parameter: {}", field),
            format!("Set the body field {} to an invalid value", field),
        ));
    }

    for param in descriptor.params.keys() {
        plan.push(PlannedCase::negative(
            format!("Missing required query parameter: {}", param),
            format!("Remove the {} query parameter", param),
        ));
        plan.push(PlannedCase::negative(
            format!("Invalid value for query parameter: {}", param),
            format!("Set the query parameter {} to an invalid value", param),
        ));
    }

    plan
}

pub fn test_plan_prompt(command: &str, descriptor: &RequestDescriptor) -> String {
    let plan = build_test_plan(command, descriptor);

    format!(
        r#"You are an API testing expert. Implement the test plan below by modifying the curl command for each test case.

Original curl command:
```
{}
```

API details:
- Method: {}
- URL: {}
- Headers: {}
- Body: {}
- Query parameters: {}

Test plan:
{}

For every test case keep description, test_type and expected_status_code unchanged and
replace curl_command with the complete modified curl command that implements it.
Return the completed plan as a JSON array with the same structure and no other text."#,
        command.trim(),
        descriptor.method,
        descriptor.url,
        pretty_map(&descriptor.headers),
        descriptor
            .body
            .as_ref()
            .map(|body| body.to_text())
            .unwrap_or_else(|| "None".to_string()),
        pretty_map(&descriptor.params),
        serde_json::to_string_pretty(&plan).unwrap_or_else(|_| "[]".to_string()),
    )
}

fn pretty_map(map: &IndexMap<String, String>) -> String {
    if map.is_empty() {
        return "None".to_string();
    }
    serde_json::to_string_pretty(map).unwrap_or_else(|_| "None".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{HttpMethod, RequestBody};
    use serde_json::json;

    fn descriptor() -> RequestDescriptor {
        RequestDescriptor::new(HttpMethod::Post, "https://api.test/orders")
            .with_header("x-merchant-id", "A")
            .with_param("dryRun", "true")
            .with_body(RequestBody::Json(json!({"amount": 10, "currency": "EUR"})))
    }

    #[test]
    fn test_plan_covers_headers_fields_and_params() {
        let plan = build_test_plan("curl 'https://api.test/orders'", &descriptor());

        assert_eq!(plan.len(), 1 + 2 + 2 * 2 + 2);
        assert_eq!(plan[0].test_type, TestType::Positive);
        assert_eq!(plan[0].curl_command, "curl 'https://api.test/orders'");
        assert_eq!(plan[1].description, "Missing required header: x-merchant-id");
        assert_eq!(plan[3].description, "Missing required body parameter: amount");
        assert_eq!(plan[5].description, "Missing required body parameter: currency");
        assert_eq!(plan[8].description, "Invalid value for query parameter: dryRun");
        assert!(plan[1..].iter().all(|c| c.expected_status_code == 400));
    }

    #[test]
    fn test_raw_body_has_no_fields() {
        let request = RequestDescriptor::new(HttpMethod::Post, "https://api.test/")
            .with_body(RequestBody::Raw("a=1".to_string()));
        assert_eq!(build_test_plan("curl", &request).len(), 1);
    }

    #[test]
    fn test_plan_prompt_embeds_request_details() {
        let prompt = test_plan_prompt("curl 'https://api.test/orders'", &descriptor());

        assert!(prompt.contains("- Method: POST"));
        assert!(prompt.contains("- URL: https://api.test/orders"));
        assert!(prompt.contains("\"x-merchant-id\": \"A\""));
        assert!(prompt.contains("\"dryRun\": \"true\""));
        assert!(prompt.contains("Remove the currency field from the request body"));
        assert!(prompt.contains("\"test_type\": \"negative\""));
    }

    #[test]
    fn test_free_form_prompt_asks_for_json_array() {
        let prompt = free_form_prompt("  curl https://api.test/  ");
        assert!(prompt.contains("```\ncurl https://api.test/\n```"));
        assert!(prompt.contains("\"expected_status_code\": 200"));
        assert!(prompt.contains("Return only a JSON array"));
    }
}
