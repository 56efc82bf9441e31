// File: executor.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

//! Runs a test plan against the live endpoint, one case at a time.
//!
//! Every case resolves its own copy of the base request, so the base stays
//! untouched for the whole run. Transport failures become `ERROR` results and
//! never stop the remaining cases.

use log::{info, warn};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::time::{Duration, Instant};

use crate::request::RequestDescriptor;
use crate::testcase::TestCase;
use crate::transport::HttpTransport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Pass,
    Fail,
    Error,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Pass => "PASS",
            Outcome::Fail => "FAIL",
            Outcome::Error => "ERROR",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub fn classify(expected: u16, observed: Option<u16>) -> Outcome {
    match observed {
        Some(status) if status == expected => Outcome::Pass,
        Some(_) => Outcome::Fail,
        None => Outcome::Error,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionResult {
    pub test_case: TestCase,
    pub request: RequestDescriptor,
    /// `None` when the transport failed before a status was seen.
    pub status_code: Option<u16>,
    pub body: Value,
    pub outcome: Outcome,
    pub error: Option<String>,
    pub elapsed_ms: u64,
}

pub struct Executor<T: HttpTransport> {
    transport: T,
    timeout: Duration,
}

impl<T: HttpTransport> Executor<T> {
    pub fn new(transport: T, timeout: Duration) -> Self {
        Executor { transport, timeout }
    }

    pub fn execute(&self, base: &RequestDescriptor, test_case: &TestCase) -> ExecutionResult {
        let request = test_case.resolve(base);
        let started = Instant::now();
        let sent = self.transport.send(&request, self.timeout);
        let elapsed_ms = started.elapsed().as_millis() as u64;

        let (status_code, body, error) = match sent {
            Ok(response) => (Some(response.status()), response.body_value(), None),
            Err(e) => {
                warn!("Transport error for '{}': {}", test_case.description, e);
                (None, Value::Null, Some(e.to_string()))
            }
        };
        let outcome = classify(test_case.expected_status, status_code);

        info!(
            "{} {} (expected {}, got {})",
            outcome,
            test_case.description,
            test_case.expected_status,
            status_code.map_or_else(|| "no response".to_string(), |s| s.to_string())
        );

        ExecutionResult {
            test_case: test_case.clone(),
            request,
            status_code,
            body,
            outcome,
            error,
            elapsed_ms,
        }
    }

    pub fn run_all(&self, base: &RequestDescriptor, cases: &[TestCase]) -> Vec<ExecutionResult> {
        self.run_all_with(base, cases, |_| {})
    }

    /// Like [`Executor::run_all`], calling `on_result` after each case.
    pub fn run_all_with<F>(
        &self,
        base: &RequestDescriptor,
        cases: &[TestCase],
        mut on_result: F,
    ) -> Vec<ExecutionResult>
    where
        F: FnMut(&ExecutionResult),
    {
        cases
            .iter()
            .map(|case| {
                let result = self.execute(base, case);
                on_result(&result);
                result
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
