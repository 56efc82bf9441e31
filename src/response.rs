// File: response.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use serde_json::Value;

/// What came back from the endpoint for one issued request.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    status: u16,
    body: String,
    url: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: &str, url: &str) -> Self {
        TransportResponse {
            status,
            body: body.to_string(),
            url: url.to_string(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// The body as JSON when it parses, else as a JSON string.
    pub fn body_value(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or_else(|_| Value::String(self.body.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_body_value() {
        let json_body = TransportResponse::new(200, r#"{"ok": true}"#, "https://a.test/");
        assert_eq!(json_body.body_value(), json!({"ok": true}));

        let text_body = TransportResponse::new(502, "Bad Gateway", "https://a.test/");
        assert_eq!(text_body.body_value(), json!("Bad Gateway"));
        assert_eq!(text_body.status(), 502);
        assert_eq!(text_body.url(), "https://a.test/");
    }
}
