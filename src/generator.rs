// File: generator.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use log::{info, warn};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::config::ConfigParameter;
use crate::mutation::generate_basic_cases;
use crate::prompt::{free_form_prompt, test_plan_prompt};
use crate::provider::{complete_with_retry, CompletionProvider};
use crate::recovery::{recover_with_stage, RecoveryStage};
use crate::request::RequestDescriptor;
use crate::testcase::TestCase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// Deterministic cases only, the provider is never called.
    Basic,
    FreeForm,
    TestPlan,
}

impl FromStr for GenerationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "basic" => Ok(GenerationMode::Basic),
            "free-form" | "freeform" => Ok(GenerationMode::FreeForm),
            "test-plan" | "plan" => Ok(GenerationMode::TestPlan),
            other => Err(format!("Unknown generation mode: {}", other)),
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GenerationMode::Basic => "basic",
            GenerationMode::FreeForm => "free-form",
            GenerationMode::TestPlan => "test-plan",
        };
        write!(f, "{}", name)
    }
}

/// Where a plan came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "stage", rename_all = "snake_case")]
pub enum PlanSource {
    Basic,
    Recovered(RecoveryStage),
    ProviderUnavailable,
}

impl PlanSource {
    /// True when the plan is not what the provider was asked for.
    pub fn is_degraded(&self) -> bool {
        match self {
            PlanSource::Basic => false,
            PlanSource::Recovered(stage) => stage.is_degraded(),
            PlanSource::ProviderUnavailable => true,
        }
    }
}

impl fmt::Display for PlanSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanSource::Basic => write!(f, "basic test cases"),
            PlanSource::Recovered(stage) => write!(f, "provider response ({})", stage),
            PlanSource::ProviderUnavailable => {
                write!(f, "basic test cases (provider unavailable)")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedPlan {
    pub cases: Vec<TestCase>,
    pub source: PlanSource,
    pub raw_response: Option<String>,
}

pub struct TestCaseGenerator {
    config: ConfigParameter,
    provider: Option<Box<dyn CompletionProvider>>,
}

impl TestCaseGenerator {
    pub fn new(config: ConfigParameter) -> Self {
        TestCaseGenerator {
            config,
            provider: None,
        }
    }

    pub fn with_provider(mut self, provider: Box<dyn CompletionProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Always returns a non-empty plan.
    pub fn generate(
        &self,
        command: &str,
        descriptor: &RequestDescriptor,
        mode: GenerationMode,
    ) -> GeneratedPlan {
        if mode == GenerationMode::Basic {
            return self.basic_plan(descriptor, PlanSource::Basic);
        }

        let Some(provider) = self.provider.as_deref() else {
            warn!("No completion provider configured, using basic test cases");
            return self.basic_plan(descriptor, PlanSource::ProviderUnavailable);
        };

        let prompt = match mode {
            GenerationMode::FreeForm => free_form_prompt(command),
            _ => test_plan_prompt(command, descriptor),
        };

        let backoff = Duration::from_secs(self.config.retry_backoff());
        match complete_with_retry(provider, &prompt, self.config.provider_retries(), backoff) {
            Ok(text) => {
                let (cases, stage) = recover_with_stage(&text, descriptor, &self.config);
                info!("Generated {} test cases from {}", cases.len(), stage);
                GeneratedPlan {
                    cases,
                    source: PlanSource::Recovered(stage),
                    raw_response: Some(text),
                }
            }
            Err(e) => {
                // Exhausted retries fall back to the full basic plan, not a
                // single synthetic case.
                warn!("{}, using basic test cases", e);
                self.basic_plan(descriptor, PlanSource::ProviderUnavailable)
            }
        }
    }

    fn basic_plan(&self, descriptor: &RequestDescriptor, source: PlanSource) -> GeneratedPlan {
        GeneratedPlan {
            cases: generate_basic_cases(descriptor, &self.config),
            source,
            raw_response: None,
        }
    }
}
