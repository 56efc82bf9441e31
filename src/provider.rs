// File: provider.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

//! Completion providers consulted for test case proposals.
//!
//! Providers are untrusted: they may be down, slow, or answer with prose.
//! Nothing here interprets the returned text; that is the job of
//! [`crate::recovery`].

use log::{debug, info, warn};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::thread;
use std::time::Duration;

use crate::config::{ConfigParameter, ProviderKind};
use crate::error::ProviderError;
use crate::recovery::envelope_text;

const MIN_COMPLETION_CHARS: usize = 100;
const OPENAI_MAX_TOKENS: u32 = 1000;

pub trait CompletionProvider {
    fn name(&self) -> &str;
    fn complete(&self, prompt: &str) -> Result<String, ProviderError>;
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
    top_p: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Deserialize)]
struct ModelTag {
    name: String,
}

fn build_client(config: &ConfigParameter) -> Result<Client, ProviderError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(config.provider_timeout()))
        .build()?;
    Ok(client)
}

fn check_status(response: &reqwest::blocking::Response, url: &str) -> Result<(), ProviderError> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(ProviderError::BadEnvelope(format!(
            "{} returned status {}",
            url, status
        )))
    }
}

/// Local Ollama server.
pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: Option<String>,
    fallback_model: String,
}

impl OllamaProvider {
    pub fn new(config: &ConfigParameter) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(config)?,
            base_url: config.provider_url().to_string(),
            model: config.model().map(str::to_string),
            fallback_model: config.fallback_model().to_string(),
        })
    }

    /// The configured model, else the first installed one, else the fallback.
    pub fn resolve_model(&self) -> String {
        if let Some(model) = &self.model {
            return model.clone();
        }

        match self.list_models() {
            Ok(models) if !models.is_empty() => {
                debug!("Available models: {:?}", models);
                models[0].clone()
            }
            Ok(_) => {
                warn!("No models installed, using {}", self.fallback_model);
                self.fallback_model.clone()
            }
            Err(e) => {
                warn!("Failed to list models ({}), using {}", e, self.fallback_model);
                self.fallback_model.clone()
            }
        }
    }

    fn list_models(&self) -> Result<Vec<String>, ProviderError> {
        let url = format!("{}/api/tags", self.base_url);
        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(10))
            .send()?;
        check_status(&response, &url)?;
        let tags: TagsResponse = response
            .json()
            .map_err(|e| ProviderError::BadEnvelope(e.to_string()))?;
        Ok(tags.models.into_iter().map(|m| m.name).collect())
    }
}

impl CompletionProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let model = self.resolve_model();
        let url = format!("{}/api/generate", self.base_url);
        info!("Calling {} with model {}", url, model);

        let request = GenerateRequest {
            model: &model,
            prompt,
            stream: false,
            options: GenerateOptions {
                temperature: 0.7,
                top_p: 0.9,
            },
        };

        let response = self.client.post(&url).json(&request).send()?;
        check_status(&response, &url)?;
        let generated: GenerateResponse = response
            .json()
            .map_err(|e| ProviderError::BadEnvelope(e.to_string()))?;

        generated
            .response
            .ok_or_else(|| ProviderError::BadEnvelope("missing response field".to_string()))
    }
}

/// Any server speaking the OpenAI completions protocol.
pub struct OpenAiCompatProvider {
    client: Client,
    base_url: String,
    model: Option<String>,
}

impl OpenAiCompatProvider {
    pub fn new(config: &ConfigParameter) -> Result<Self, ProviderError> {
        Ok(Self {
            client: build_client(config)?,
            base_url: config.provider_url().to_string(),
            model: config.model().map(str::to_string),
        })
    }
}

impl CompletionProvider for OpenAiCompatProvider {
    fn name(&self) -> &str {
        "openai"
    }

    fn complete(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = format!("{}/v1/completions", self.base_url);
        info!("Calling {}", url);

        let mut request = serde_json::json!({
            "prompt": prompt,
            "max_tokens": OPENAI_MAX_TOKENS,
        });
        if let Some(model) = &self.model {
            request["model"] = Value::from(model.as_str());
        }

        let response = self.client.post(&url).json(&request).send()?;
        check_status(&response, &url)?;
        let envelope: Value = response
            .json()
            .map_err(|e| ProviderError::BadEnvelope(e.to_string()))?;

        envelope_text(&envelope)
            .map(str::to_string)
            .ok_or_else(|| ProviderError::BadEnvelope("no completion text in choices".to_string()))
    }
}

pub fn provider_from_config(
    config: &ConfigParameter,
) -> Result<Box<dyn CompletionProvider>, ProviderError> {
    match config.provider_kind() {
        ProviderKind::Ollama => Ok(Box::new(OllamaProvider::new(config)?)),
        ProviderKind::OpenAi => Ok(Box::new(OpenAiCompatProvider::new(config)?)),
    }
}

/// Whether the text plausibly carries a test case array.
pub fn looks_complete(text: &str) -> bool {
    text.contains('[') && text.contains(']') && text.chars().count() > MIN_COMPLETION_CHARS
}

/// Calls the provider up to `attempts` times, sleeping `backoff` between
/// attempts.
///
/// Text that does not look like a test case array is retried, but the last
/// text received is returned rather than discarded. Only when every attempt
/// failed is [`ProviderError::Exhausted`] returned.
pub fn complete_with_retry(
    provider: &dyn CompletionProvider,
    prompt: &str,
    attempts: u32,
    backoff: Duration,
) -> Result<String, ProviderError> {
    let attempts = attempts.max(1);
    let mut last_text = None;

    for attempt in 1..=attempts {
        info!(
            "Attempt {}/{} to call {} provider",
            attempt,
            attempts,
            provider.name()
        );

        match provider.complete(prompt) {
            Ok(text) if looks_complete(&text) => {
                info!("Received {} characters from {}", text.len(), provider.name());
                return Ok(text);
            }
            Ok(text) => {
                warn!("Response does not appear to contain test cases");
                last_text = Some(text);
            }
            Err(e) => {
                warn!("Provider attempt {} failed: {}", attempt, e);
            }
        }

        if attempt < attempts && !backoff.is_zero() {
            thread::sleep(backoff);
        }
    }

    last_text.ok_or(ProviderError::Exhausted { attempts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    struct ScriptedProvider {
        replies: RefCell<VecDeque<Result<String, ProviderError>>>,
        calls: RefCell<u32>,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<Result<String, ProviderError>>) -> Self {
            Self {
                replies: RefCell::new(replies.into()),
                calls: RefCell::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.borrow()
        }
    }

    impl CompletionProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        fn complete(&self, _prompt: &str) -> Result<String, ProviderError> {
            *self.calls.borrow_mut() += 1;
            self.replies
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::BadEnvelope("script exhausted".into())))
        }
    }

    fn good_reply() -> String {
        format!("[{}]", "x".repeat(120))
    }

    #[test]
    fn test_first_complete_reply_wins() {
        let provider = ScriptedProvider::new(vec![Ok(good_reply()), Ok("unused".into())]);
        let text = complete_with_retry(&provider, "p", 3, Duration::ZERO).unwrap();
        assert_eq!(text, good_reply());
        assert_eq!(provider.calls(), 1);
    }

    #[test]
    fn test_short_reply_is_retried_then_returned() {
        let provider = ScriptedProvider::new(vec![
            Ok("no cases".into()),
            Ok("still nothing".into()),
            Ok("last words".into()),
        ]);
        let text = complete_with_retry(&provider, "p", 3, Duration::ZERO).unwrap();
        assert_eq!(text, "last words");
        assert_eq!(provider.calls(), 3);
    }

    #[test]
    fn test_failures_then_success() {
        let provider = ScriptedProvider::new(vec![
            Err(ProviderError::BadEnvelope("boom".into())),
            Ok(good_reply()),
        ]);
        assert_eq!(
            complete_with_retry(&provider, "p", 3, Duration::ZERO).unwrap(),
            good_reply()
        );
        assert_eq!(provider.calls(), 2);
    }

    #[test]
    fn test_all_failures_exhaust() {
        let provider = ScriptedProvider::new(vec![]);
        let result = complete_with_retry(&provider, "p", 2, Duration::ZERO);
        assert!(matches!(result, Err(ProviderError::Exhausted { attempts: 2 })));
        assert_eq!(provider.calls(), 2);
    }

    #[test]
    fn test_zero_attempts_still_tries_once() {
        let provider = ScriptedProvider::new(vec![Ok(good_reply())]);
        assert!(complete_with_retry(&provider, "p", 0, Duration::ZERO).is_ok());
        assert_eq!(provider.calls(), 1);
    }

    #[test]
    fn test_looks_complete() {
        assert!(looks_complete(&good_reply()));
        assert!(!looks_complete("[short]"));
        assert!(!looks_complete(&"y".repeat(200)));
    }
}
