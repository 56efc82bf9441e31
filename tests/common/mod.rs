// File: common/mod.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

#![allow(dead_code)]

use curlprobe::config::ConfigParameter;
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// A payments listing that only answers 200 when both credentials and the
/// expected query parameter are present. Anything else gets a 400.
pub async fn mount_payments_api(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/payments"))
        .and(header("x-merchant-id", "A"))
        .and(header("x-signature", "B"))
        .and(query_param("paymentMethod", "ALL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"payments": []})))
        .with_priority(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/payments"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({"error": "invalid request"})),
        )
        .with_priority(10)
        .mount(server)
        .await;
}

pub fn payments_command(base_url: &str) -> String {
    format!(
        "curl --location '{}/payments?paymentMethod=ALL' \\\n  \
         --header 'x-merchant-id: A' \\\n  \
         --header 'x-signature: B'",
        base_url
    )
}

pub fn test_config(provider_url: &str) -> ConfigParameter {
    let mut config = ConfigParameter::new();
    config.set_timeout(5);
    config.set_provider_timeout(5);
    config.set_provider_retries(1);
    config.set_retry_backoff(0);
    config.set_provider_url(provider_url);
    config
}

/// Runs blocking client code off the async test runtime.
pub async fn run_blocking<F, R>(f: F) -> R
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .expect("blocking task panicked")
}
