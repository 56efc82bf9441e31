// File: testcase.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use indexmap::IndexMap;
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::curl_parser;
use crate::request::{HttpMethod, RequestBody, RequestDescriptor};

const NEGATIVE_KEYWORDS: &[&str] = &["invalid", "error", "fail", "negative"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestType {
    Positive,
    Negative,
    Security,
}

impl TestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestType::Positive => "positive",
            TestType::Negative => "negative",
            TestType::Security => "security",
        }
    }

    /// Reads an explicit label such as `"Negative"` or `"positive test"`.
    pub fn from_label(label: &str) -> Option<TestType> {
        let label = label.to_lowercase();
        if label.contains("positive") {
            Some(TestType::Positive)
        } else if label.contains("negative") {
            Some(TestType::Negative)
        } else if label.contains("security") {
            Some(TestType::Security)
        } else {
            None
        }
    }

    /// Keyword heuristic used when no label is present.
    pub fn infer(text: &str) -> TestType {
        let text = text.to_lowercase();
        if NEGATIVE_KEYWORDS.iter().any(|word| text.contains(word)) {
            TestType::Negative
        } else {
            TestType::Positive
        }
    }

    pub fn default_status(&self) -> u16 {
        match self {
            TestType::Positive => 200,
            TestType::Negative | TestType::Security => 400,
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A pure edit applied to a copy of the base request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Modification {
    RemoveHeader(String),
    SetHeader(String, String),
    SetParam(String, String),
}

impl Modification {
    pub fn apply(&self, request: &RequestDescriptor) -> RequestDescriptor {
        let mut modified = request.clone();
        match self {
            Modification::RemoveHeader(name) => {
                modified.headers.shift_remove(name);
            }
            Modification::SetHeader(name, value) => {
                modified.headers.insert(name.clone(), value.clone());
            }
            Modification::SetParam(name, value) => {
                modified.params.insert(name.clone(), value.clone());
            }
        }
        modified
    }

    /// Reads one `{"key": value}` entry as emitted by completion providers.
    pub fn from_entry(key: &str, value: &Value) -> Option<Modification> {
        match key {
            "remove_header" => value
                .as_str()
                .map(|name| Modification::RemoveHeader(name.to_string())),
            "set_header" | "modify_header" => {
                pair(value).map(|(name, value)| Modification::SetHeader(name, value))
            }
            "set_param" | "modify_param" => {
                pair(value).map(|(name, value)| Modification::SetParam(name, value))
            }
            _ => None,
        }
    }
}

fn pair(value: &Value) -> Option<(String, String)> {
    match value {
        Value::Array(items) if items.len() == 2 => {
            Some((scalar_to_string(&items[0])?, scalar_to_string(&items[1])?))
        }
        Value::Object(map) => {
            let name = map.get("name").and_then(scalar_to_string)?;
            let value = map.get("value").and_then(scalar_to_string)?;
            Some((name, value))
        }
        _ => None,
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

pub fn apply_all(modifications: &[Modification], base: &RequestDescriptor) -> RequestDescriptor {
    modifications
        .iter()
        .fold(base.clone(), |request, modification| modification.apply(&request))
}

/// What a test case does to the base request.
#[derive(Debug, Clone, PartialEq)]
pub enum CasePayload {
    /// Edits against the base request. Empty means the base request as-is.
    Modify(Vec<Modification>),
    /// A fully independent request, used when the provider returned
    /// literal commands instead of edits.
    Replace(RequestDescriptor),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "WireCase", try_from = "WireCase")]
pub struct TestCase {
    pub description: String,
    pub test_type: TestType,
    pub expected_status: u16,
    pub payload: CasePayload,
}

impl TestCase {
    pub fn baseline(description: &str) -> Self {
        Self {
            description: description.to_string(),
            test_type: TestType::Positive,
            expected_status: TestType::Positive.default_status(),
            payload: CasePayload::Modify(Vec::new()),
        }
    }

    pub fn negative(description: &str, modification: Modification) -> Self {
        Self {
            description: description.to_string(),
            test_type: TestType::Negative,
            expected_status: TestType::Negative.default_status(),
            payload: CasePayload::Modify(vec![modification]),
        }
    }

    /// The concrete request this case issues. The base is never mutated.
    pub fn resolve(&self, base: &RequestDescriptor) -> RequestDescriptor {
        match &self.payload {
            CasePayload::Modify(modifications) => apply_all(modifications, base),
            CasePayload::Replace(request) => request.clone(),
        }
    }
}

/// Raised when a provider-supplied case cannot be executed.
#[derive(Debug, Clone, PartialEq)]
pub struct UnusableCase(pub String);

impl fmt::Display for UnusableCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unusable test case: {}", self.0)
    }
}

impl std::error::Error for UnusableCase {}

/// Loose JSON shape of a test case, covering the variants completion
/// providers emit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireCase {
    #[serde(default, alias = "name", alias = "title", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, alias = "type", skip_serializing_if = "Option::is_none")]
    pub test_type: Option<String>,
    #[serde(
        default,
        alias = "expected_status",
        alias = "status_code",
        skip_serializing_if = "Option::is_none"
    )]
    pub expected_status_code: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifications: Option<Value>,
    #[serde(default, alias = "modified_curl_command", skip_serializing_if = "Option::is_none")]
    pub curl_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, alias = "endpoint", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<IndexMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<IndexMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl From<TestCase> for WireCase {
    fn from(case: TestCase) -> Self {
        let mut wire = WireCase {
            description: Some(case.description),
            test_type: Some(case.test_type.to_string()),
            expected_status_code: Some(Value::from(case.expected_status)),
            ..WireCase::default()
        };
        match case.payload {
            CasePayload::Modify(modifications) => {
                wire.modifications = Some(serde_json::to_value(&modifications).unwrap_or_default());
            }
            CasePayload::Replace(request) => {
                wire.curl_command = Some(request.to_curl());
            }
        }
        wire
    }
}

impl TryFrom<WireCase> for TestCase {
    type Error = UnusableCase;

    fn try_from(wire: WireCase) -> Result<Self, Self::Error> {
        let description = wire
            .description
            .clone()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| "Unnamed test case".to_string());

        let test_type = match &wire.test_type {
            Some(label) => TestType::from_label(label).unwrap_or(TestType::Positive),
            None => TestType::infer(&description),
        };

        let expected_status = wire
            .expected_status_code
            .as_ref()
            .and_then(status_from_value)
            .unwrap_or_else(|| test_type.default_status());

        let payload = wire_payload(&wire)?;

        Ok(TestCase {
            description,
            test_type,
            expected_status,
            payload,
        })
    }
}

fn status_from_value(value: &Value) -> Option<u16> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn wire_payload(wire: &WireCase) -> Result<CasePayload, UnusableCase> {
    if let Some(modifications) = wire.modifications.as_ref().filter(|m| !m.is_null()) {
        return modifications_from_value(modifications).map(CasePayload::Modify);
    }

    if let Some(command) = &wire.curl_command {
        return curl_parser::parse(command)
            .map(CasePayload::Replace)
            .map_err(|e| UnusableCase(e.to_string()));
    }

    if let Some(url) = &wire.url {
        let method = wire
            .method
            .as_deref()
            .and_then(|m| m.parse::<HttpMethod>().ok())
            .unwrap_or_default();
        let (url, mut params) =
            curl_parser::split_query(url.trim()).map_err(|e| UnusableCase(e.to_string()))?;
        params.extend(wire.params.clone().unwrap_or_default());

        let mut request = RequestDescriptor::new(method, &url);
        request.headers = wire.headers.clone().unwrap_or_default();
        request.params = params;
        request.body = wire.body.as_ref().and_then(inline_body);
        return Ok(CasePayload::Replace(request));
    }

    Ok(CasePayload::Modify(Vec::new()))
}

/// Inline bodies follow the parser's rule: only a brace-delimited object
/// is a body.
fn inline_body(value: &Value) -> Option<RequestBody> {
    match value {
        Value::Object(map) if !map.is_empty() => Some(RequestBody::Json(value.clone())),
        Value::String(text) => {
            let text = text.trim();
            (text.starts_with('{') && text.ends_with('}')).then(|| RequestBody::from_text(text))
        }
        Value::Null | Value::Object(_) => None,
        other => {
            debug!("Ignoring non-object inline body {}", other);
            None
        }
    }
}

fn modifications_from_value(value: &Value) -> Result<Vec<Modification>, UnusableCase> {
    let entries: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(_) => vec![value],
        other => return Err(UnusableCase(format!("modifications must be an object, got {}", other))),
    };

    let mut modifications = Vec::new();
    for entry in entries {
        let Value::Object(map) = entry else {
            return Err(UnusableCase(format!("unrecognised modification {}", entry)));
        };
        for (key, value) in map {
            match Modification::from_entry(key, value) {
                Some(modification) => modifications.push(modification),
                None => {
                    debug!("Unsupported modification {}: {}", key, value);
                    return Err(UnusableCase(format!("unsupported modification {}", key)));
                }
            }
        }
    }
    Ok(modifications)
}
