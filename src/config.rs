// File: config.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Ollama,
    OpenAi,
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(ProviderKind::Ollama),
            "openai" | "local" => Ok(ProviderKind::OpenAi),
            other => Err(format!("Unknown provider: {}", other)),
        }
    }
}

/// Every tunable default of a run in one place.
#[derive(Debug, Clone)]
pub struct ConfigParameter {
    timeout: u64,
    provider_timeout: u64,
    provider_retries: u32,
    retry_backoff: u64,
    provider_kind: ProviderKind,
    provider_url: String,
    model: Option<String>,
    fallback_model: String,
    invalid_header_value: String,
    invalid_param_value: String,
    insecure: bool,
    output_dir: String,
}

impl Default for ConfigParameter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigParameter {
    pub fn new() -> Self {
        Self {
            timeout: 10,
            provider_timeout: 120,
            provider_retries: 3,
            retry_backoff: 5,
            provider_kind: ProviderKind::Ollama,
            provider_url: "http://localhost:11434".to_string(),
            model: None,
            fallback_model: "mistral".to_string(),
            invalid_header_value: "invalid_value".to_string(),
            invalid_param_value: "INVALID_VALUE".to_string(),
            insecure: false,
            output_dir: "test_reports".to_string(),
        }
    }

    pub fn set_timeout(&mut self, timeout: u64) {
        self.timeout = timeout;
    }

    pub fn timeout(&self) -> u64 {
        self.timeout
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn set_provider_timeout(&mut self, provider_timeout: u64) {
        self.provider_timeout = provider_timeout;
    }

    pub fn provider_timeout(&self) -> u64 {
        self.provider_timeout
    }

    pub fn set_provider_retries(&mut self, provider_retries: u32) {
        self.provider_retries = provider_retries.max(1);
    }

    pub fn provider_retries(&self) -> u32 {
        self.provider_retries
    }

    pub fn set_retry_backoff(&mut self, retry_backoff: u64) {
        self.retry_backoff = retry_backoff;
    }

    pub fn retry_backoff(&self) -> u64 {
        self.retry_backoff
    }

    pub fn set_provider_kind(&mut self, provider_kind: ProviderKind) {
        self.provider_kind = provider_kind;
    }

    pub fn provider_kind(&self) -> ProviderKind {
        self.provider_kind
    }

    pub fn set_provider_url(&mut self, provider_url: &str) {
        self.provider_url = provider_url.trim_end_matches('/').to_string();
    }

    pub fn provider_url(&self) -> &str {
        &self.provider_url
    }

    pub fn set_model(&mut self, model: Option<String>) {
        self.model = model.filter(|m| !m.trim().is_empty());
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn set_fallback_model(&mut self, fallback_model: &str) {
        self.fallback_model = fallback_model.to_string();
    }

    pub fn fallback_model(&self) -> &str {
        &self.fallback_model
    }

    pub fn set_invalid_header_value(&mut self, value: &str) {
        self.invalid_header_value = value.to_string();
    }

    pub fn invalid_header_value(&self) -> &str {
        &self.invalid_header_value
    }

    pub fn set_invalid_param_value(&mut self, value: &str) {
        self.invalid_param_value = value.to_string();
    }

    pub fn invalid_param_value(&self) -> &str {
        &self.invalid_param_value
    }

    pub fn set_insecure(&mut self, insecure: bool) {
        self.insecure = insecure;
    }

    pub fn insecure(&self) -> bool {
        self.insecure
    }

    pub fn set_output_dir(&mut self, output_dir: &str) {
        self.output_dir = output_dir.to_string();
    }

    pub fn output_dir(&self) -> &str {
        &self.output_dir
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
