// File: request.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::error::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "PATCH" => Ok(HttpMethod::Patch),
            "DELETE" => Ok(HttpMethod::Delete),
            "HEAD" => Ok(HttpMethod::Head),
            "OPTIONS" => Ok(HttpMethod::Options),
            other => Err(ParseError::UnsupportedMethod(other.to_string())),
        }
    }
}

/// Request payload. Text that is not valid JSON is kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestBody {
    Json(serde_json::Value),
    Raw(String),
}

impl RequestBody {
    pub fn from_text(text: &str) -> Self {
        match serde_json::from_str(text) {
            Ok(value) => RequestBody::Json(value),
            Err(_) => RequestBody::Raw(text.to_string()),
        }
    }

    pub fn to_text(&self) -> String {
        match self {
            RequestBody::Json(value) => value.to_string(),
            RequestBody::Raw(text) => text.clone(),
        }
    }

    /// Top-level field names when the body is a JSON object.
    pub fn field_names(&self) -> Vec<&str> {
        match self {
            RequestBody::Json(serde_json::Value::Object(map)) => {
                map.keys().map(|k| k.as_str()).collect()
            }
            _ => Vec::new(),
        }
    }
}

/// Canonical description of one HTTP call.
///
/// `url` never carries a query string; query parameters live in `params`.
/// Absence of a header or parameter is represented by a missing key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub url: String,
    pub headers: IndexMap<String, String>,
    pub params: IndexMap<String, String>,
    pub body: Option<RequestBody>,
}

impl RequestDescriptor {
    pub fn new(method: HttpMethod, url: &str) -> Self {
        Self {
            method,
            url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_param(mut self, name: &str, value: &str) -> Self {
        self.params.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    /// The URL including the encoded query parameters.
    pub fn full_url(&self) -> String {
        if self.params.is_empty() {
            return self.url.clone();
        }
        match Url::parse(&self.url) {
            Ok(mut url) => {
                {
                    let mut pairs = url.query_pairs_mut();
                    for (name, value) in &self.params {
                        pairs.append_pair(name, value);
                    }
                }
                url.to_string()
            }
            Err(_) => {
                let query: Vec<String> = self
                    .params
                    .iter()
                    .map(|(name, value)| format!("{}={}", name, value))
                    .collect();
                format!("{}?{}", self.url, query.join("&"))
            }
        }
    }

    /// Renders the descriptor back into a curl command the parser reads
    /// back into an equal descriptor.
    pub fn to_curl(&self) -> String {
        let mut parts = vec![
            "curl".to_string(),
            format!("'{}'", self.full_url()),
            "-X".to_string(),
            self.method.to_string(),
        ];
        for (name, value) in &self.headers {
            parts.push("-H".to_string());
            parts.push(double_quoted(&format!("{}: {}", name, value)));
        }
        if let Some(body) = &self.body {
            parts.push("-d".to_string());
            parts.push(double_quoted(&body.to_text()));
        }
        parts.join(" ")
    }
}

/// Wraps `text` in double quotes, escaping the characters a shell expands
/// inside them.
fn double_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        if matches!(c, '"' | '\\' | '$' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}
