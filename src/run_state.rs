// File: run_state.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use chrono::{DateTime, Local};

use crate::executor::{ExecutionResult, Outcome};

#[derive(Debug, Clone, Copy, Default)]
pub struct RunState {
    total_cases: usize,
    passed: usize,
    failed: usize,
    errored: usize,
    start_time: Option<DateTime<Local>>,
    end_time: Option<DateTime<Local>>,
}

impl RunState {
    pub fn new(total_cases: usize) -> RunState {
        RunState {
            total_cases,
            ..RunState::default()
        }
    }

    pub fn start(&mut self) {
        self.start_time = Some(Local::now());
    }

    pub fn finish(&mut self) {
        self.end_time = Some(Local::now());
    }

    pub fn record(&mut self, result: &ExecutionResult) {
        match result.outcome {
            Outcome::Pass => self.passed += 1,
            Outcome::Fail => self.failed += 1,
            Outcome::Error => self.errored += 1,
        }
    }

    pub fn total_cases(&self) -> usize {
        self.total_cases
    }

    pub fn completed(&self) -> usize {
        self.passed + self.failed + self.errored
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn errored(&self) -> usize {
        self.errored
    }

    pub fn start_time(&self) -> Option<DateTime<Local>> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Local>> {
        self.end_time
    }

    /// Percentage of completed cases that passed.
    pub fn pass_rate(&self) -> f64 {
        match self.completed() {
            0 => 0.0,
            done => self.passed as f64 * 100.0 / done as f64,
        }
    }

    pub fn duration_ms(&self) -> i64 {
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => (end - start).num_milliseconds(),
            _ => 0,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.completed() > 0 && self.passed == self.completed()
    }
}
