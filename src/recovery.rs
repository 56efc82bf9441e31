// File: recovery.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

//! Recovers test cases from untrusted completion-provider text.
//!
//! Recovery is a chain of pure stages `&str -> Option<Vec<TestCase>>`. A stage
//! runs only when every earlier stage produced nothing; when all of them fail
//! the deterministic plan from [`crate::mutation`] is returned, so recovery
//! never fails and never returns an empty plan.

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

use crate::config::ConfigParameter;
use crate::curl_parser;
use crate::mutation::generate_basic_cases;
use crate::request::RequestDescriptor;
use crate::testcase::{CasePayload, TestCase, TestType};

const CONTEXT_WINDOW: usize = 200;
const MAX_DESCRIPTION_CHARS: usize = 100;

static SECTION_MARKERS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"(?i)Test Case \d+[:.]\s*").unwrap(),
        Regex::new(r"(?i)Test \d+[:.]\s*").unwrap(),
        Regex::new(r"(?i)\d+\.\s+Test Case[:.]\s*").unwrap(),
        Regex::new(r"(?m)^\s*\d+\.\s+").unwrap(),
    ]
});

static SECTION_KEYWORDS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)description|test type|status code|curl").unwrap());
static DESCRIPTION_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:description|title)\**\s*[:.]\s*([^\n]*)").unwrap());
static TYPE_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)test\s*type\**\s*[:.]\s*([^\n]*)").unwrap());
static STATUS_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:expected\s+)?status\s*code\**\s*[:.]\s*\**\s*(\d+)").unwrap()
});
static COMMAND_START: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bcurl\s+").unwrap());
static COMMAND_END: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n|\n[A-Za-z`]").unwrap());
static LINE_CONTINUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*\\\s*\n\s*").unwrap());
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryStage {
    StrictJson,
    Envelope,
    EmbeddedArray,
    Sections,
    BareCommands,
    /// Nothing usable was recovered; the deterministic plan was used.
    Fallback,
}

impl RecoveryStage {
    pub fn is_degraded(&self) -> bool {
        matches!(self, RecoveryStage::Fallback)
    }
}

impl fmt::Display for RecoveryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecoveryStage::StrictJson => "strict JSON",
            RecoveryStage::Envelope => "provider envelope",
            RecoveryStage::EmbeddedArray => "embedded array",
            RecoveryStage::Sections => "test case sections",
            RecoveryStage::BareCommands => "bare commands",
            RecoveryStage::Fallback => "deterministic fallback",
        };
        write!(f, "{}", name)
    }
}

type Stage = fn(&str) -> Option<Vec<TestCase>>;

const STAGES: &[(RecoveryStage, Stage)] = &[
    (RecoveryStage::StrictJson, strict_json),
    (RecoveryStage::Envelope, provider_envelope),
    (RecoveryStage::EmbeddedArray, embedded_array),
    (RecoveryStage::Sections, section_markers),
    (RecoveryStage::BareCommands, bare_commands),
];

pub fn recover(
    raw_text: &str,
    fallback: &RequestDescriptor,
    config: &ConfigParameter,
) -> Vec<TestCase> {
    recover_with_stage(raw_text, fallback, config).0
}

/// Like [`recover`], also reporting which stage produced the cases.
pub fn recover_with_stage(
    raw_text: &str,
    fallback: &RequestDescriptor,
    config: &ConfigParameter,
) -> (Vec<TestCase>, RecoveryStage) {
    for (stage, run) in STAGES {
        if let Some(cases) = run(raw_text).filter(|cases| !cases.is_empty()) {
            info!("Recovered {} test cases using {} stage", cases.len(), stage);
            return (cases, *stage);
        }
        debug!("Recovery stage {} produced nothing", stage);
    }

    warn!("Could not recover test cases from provider response, using basic test cases");
    (
        generate_basic_cases(fallback, config),
        RecoveryStage::Fallback,
    )
}

/// Stage 1: the whole text is a JSON array, possibly with control characters
/// and bad escapes.
pub fn strict_json(text: &str) -> Option<Vec<TestCase>> {
    let trimmed = text.trim();
    if !(trimmed.starts_with('[') && trimmed.ends_with(']')) {
        return None;
    }
    let repaired = repair_escapes(&strip_control_chars(trimmed));
    parse_case_array(&repaired)
}

/// Stage 2: a provider wrapper object carrying the completion text.
pub fn provider_envelope(text: &str) -> Option<Vec<TestCase>> {
    let trimmed = text.trim();
    if !trimmed.starts_with('{') {
        return None;
    }
    let envelope: Value = serde_json::from_str(trimmed).ok()?;
    let inner = envelope_text(&envelope)?;
    debug!("Extracted completion text from provider envelope ({} chars)", inner.len());
    strict_json(inner).or_else(|| embedded_array(inner))
}

/// Completion text of a known envelope shape.
pub fn envelope_text(envelope: &Value) -> Option<&str> {
    if let Some(response) = envelope.get("response").and_then(Value::as_str) {
        return Some(response);
    }
    let choice = envelope.get("choices")?.get(0)?;
    choice
        .get("text")
        .and_then(Value::as_str)
        .or_else(|| choice.pointer("/message/content").and_then(Value::as_str))
}

/// Stage 2b: a JSON array wrapped in prose or a markdown fence.
pub fn embedded_array(text: &str) -> Option<Vec<TestCase>> {
    let start = text.find('[')?;
    let end = text.rfind(']')?;
    if end <= start {
        return None;
    }
    strict_json(&text[start..=end])
}

/// Stage 3: split on "Test Case N:" style headings and read each section.
pub fn section_markers(text: &str) -> Option<Vec<TestCase>> {
    for marker in SECTION_MARKERS.iter() {
        let mut sections: Vec<&str> = marker.split(text).collect();
        if sections.len() <= 1 {
            continue;
        }
        if !SECTION_KEYWORDS.is_match(sections[0]) {
            sections.remove(0);
        }
        debug!("Split response into {} sections using marker {}", sections.len(), marker);

        let cases: Vec<TestCase> = sections
            .into_iter()
            .filter(|section| !section.trim().is_empty())
            .map(case_from_section)
            .collect();

        if !cases.is_empty() {
            return Some(cases);
        }
    }
    None
}

fn case_from_section(section: &str) -> TestCase {
    let description = labelled(&DESCRIPTION_LABEL, section)
        .unwrap_or_else(|| first_line(section));

    let test_type = match labelled(&TYPE_LABEL, section) {
        Some(label) => TestType::from_label(&label).unwrap_or(TestType::Positive),
        None => TestType::infer(&description),
    };

    let expected_status = status_in(section).unwrap_or_else(|| test_type.default_status());

    let payload = command_runs(section)
        .into_iter()
        .find_map(|(start, end)| curl_parser::parse(&clean_command(&section[start..end])).ok())
        .map_or(CasePayload::Modify(Vec::new()), CasePayload::Replace);

    TestCase {
        description,
        test_type,
        expected_status,
        payload,
    }
}

/// Stage 4: no structure at all, scrape every command and read the text
/// around it.
pub fn bare_commands(text: &str) -> Option<Vec<TestCase>> {
    let mut cases = Vec::new();

    for (start, end) in command_runs(text) {
        let command = clean_command(&text[start..end]);
        let Ok(request) = curl_parser::parse(&command) else {
            debug!("Skipping command-like text without a URL: {}", command);
            continue;
        };

        let context = window(text, start, end, CONTEXT_WINDOW);
        let description = labelled(&DESCRIPTION_LABEL, context)
            .unwrap_or_else(|| format!("Test Case {}", cases.len() + 1));
        let test_type = match labelled(&TYPE_LABEL, context) {
            Some(label) => TestType::from_label(&label).unwrap_or(TestType::Positive),
            None => TestType::infer(context),
        };
        let expected_status = status_in(context).unwrap_or_else(|| test_type.default_status());

        cases.push(TestCase {
            description,
            test_type,
            expected_status,
            payload: CasePayload::Replace(request),
        });
    }

    if cases.is_empty() {
        None
    } else {
        Some(cases)
    }
}

fn parse_case_array(json: &str) -> Option<Vec<TestCase>> {
    let items: Vec<Value> = match serde_json::from_str(json) {
        Ok(items) => items,
        Err(e) => {
            debug!("Failed to parse response as JSON: {}", e);
            return None;
        }
    };

    let cases: Vec<TestCase> = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<TestCase>(item) {
            Ok(case) => Some(case),
            Err(e) => {
                debug!("Dropping test case: {}", e);
                None
            }
        })
        .collect();

    if cases.is_empty() {
        None
    } else {
        Some(cases)
    }
}

/// Removes ASCII control characters, including raw newlines.
pub fn strip_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(*c as u32, 0x00..=0x1F | 0x7F))
        .collect()
}

/// Doubles every backslash that does not start a valid JSON escape.
pub fn repair_escapes(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if chars[i] != '\\' {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        match chars.get(i + 1) {
            Some('"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't') => {
                out.push('\\');
                out.push(chars[i + 1]);
                i += 2;
            }
            Some('u')
                if chars.len() >= i + 6
                    && chars[i + 2..i + 6].iter().all(|c| c.is_ascii_hexdigit()) =>
            {
                out.push('\\');
                i += 1;
            }
            _ => {
                out.push_str("\\\\");
                i += 1;
            }
        }
    }
    out
}

fn labelled(regex: &Regex, text: &str) -> Option<String> {
    regex
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| clean_line(m.as_str()))
        .filter(|value| !value.is_empty())
}

fn status_in(text: &str) -> Option<u16> {
    STATUS_LABEL
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn first_line(section: &str) -> String {
    let line = section
        .lines()
        .map(clean_line)
        .find(|line| !line.is_empty())
        .unwrap_or_default();
    line.chars().take(MAX_DESCRIPTION_CHARS).collect()
}

fn clean_line(line: &str) -> String {
    line.trim_matches(|c: char| c.is_whitespace() || c == '*' || c == '#' || c == '`')
        .to_string()
}

/// Byte ranges of command-shaped runs. A run ends at a blank line or at a
/// line starting with a letter or a code fence.
pub fn command_runs(text: &str) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut from = 0;
    while let Some(start) = COMMAND_START.find_at(text, from) {
        let end = COMMAND_END
            .find_at(text, start.end())
            .map_or(text.len(), |m| m.start());
        runs.push((start.start(), end));
        from = end.max(start.end());
    }
    runs
}

/// Collapses line continuations and whitespace runs into single spaces.
pub fn clean_command(command: &str) -> String {
    let joined = LINE_CONTINUATION.replace_all(command.trim(), " ");
    let collapsed = WHITESPACE_RUN.replace_all(&joined, " ");
    collapsed.trim().trim_end_matches('`').trim().to_string()
}

/// Up to `size` bytes either side of a match, snapped to char boundaries.
fn window(text: &str, start: usize, end: usize, size: usize) -> &str {
    let mut from = start.saturating_sub(size);
    while !text.is_char_boundary(from) {
        from -= 1;
    }
    let mut to = (end + size).min(text.len());
    while !text.is_char_boundary(to) {
        to += 1;
    }
    &text[from..to]
}

#[cfg(test)]
#[path = "recovery_tests.rs"]
mod tests;
