// File: curl_parser.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

//! Parses a captured curl command into a [`RequestDescriptor`].
//!
//! Capture tools disagree on flag style, so every part of the command is
//! located by an ordered list of strategies. The first strategy that
//! produces something wins; the order of each list matters.

use indexmap::IndexMap;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use url::Url;

use crate::error::{ParseError, ParseResult};
use crate::request::{HttpMethod, RequestBody, RequestDescriptor};

type UrlStrategy = fn(&str) -> Option<String>;
type HeaderStrategy = fn(&str) -> Vec<(String, String)>;

static LOCATION_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"--location\s+['"](https?://[^'"]+)['"]"#).unwrap());
static QUOTED_URL_AFTER_CURL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"\bcurl\s+['"](https?://[^'"]+)['"]?"#).unwrap());
static BARE_URL_AFTER_CURL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bcurl\s+(https?://\S+)(?:\s|$)").unwrap());
static URL_FLAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?:--url|-L)\s+['"]?(https?://[^'"\s]+)['"]?"#).unwrap());
static ANY_URL: Lazy<Regex> = Lazy::new(|| Regex::new(r#"(https?://[^\s'"]+)"#).unwrap());

static METHOD_FLAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:^|\s)(?:-X\s*|--request\s+)['"]?([A-Za-z]+)['"]?"#).unwrap()
});
static DATA_FLAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|\s)(?:-d|--data(?:-raw|-binary|-ascii)?)(?:\s+|=)").unwrap()
});

static QUOTED_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:^|\s)(?:-H|--header)\s+(?:'([^']*)'|"((?:[^"\\]|\\.)*)")"#).unwrap()
});
static UNQUOTED_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:^|\s)(?:-H|--header)\s+([^\s'":][^\s:]*):\s*([^\s'"]+)"#).unwrap()
});

const URL_STRATEGIES: &[(&str, UrlStrategy)] = &[
    ("location flag", url_from_location_flag),
    ("quoted argument", url_from_quoted_argument),
    ("bare argument", url_from_bare_argument),
    ("url flag", url_from_url_flag),
    ("any url", url_from_anywhere),
];

const HEADER_STRATEGIES: &[(&str, HeaderStrategy)] = &[
    ("quoted", headers_quoted),
    ("unquoted", headers_unquoted),
];

/// Parses a captured curl command.
///
/// Fails only when no URL can be located or the explicit method is unknown.
pub fn parse(raw: &str) -> ParseResult<RequestDescriptor> {
    let command = normalize(raw);
    debug!("Parsing curl command: {}", command);

    let url = locate_url(&command).ok_or_else(|| ParseError::MissingUrl {
        fragment: truncate(&command, 120),
    })?;
    let (url, params) = split_query(&url)?;

    let body = extract_body(&command);
    let method = match extract_method(&command) {
        Some(method) => method.parse::<HttpMethod>()?,
        None if has_data_flag(&command) => HttpMethod::Post,
        None => HttpMethod::Get,
    };

    Ok(RequestDescriptor {
        method,
        url,
        headers: extract_headers(&command),
        params,
        body,
    })
}

/// Joins continuation lines and trims the command.
pub fn normalize(raw: &str) -> String {
    raw.replace("\\\r\n", " ")
        .replace("\\\n", " ")
        .trim()
        .to_string()
}

pub fn locate_url(command: &str) -> Option<String> {
    URL_STRATEGIES.iter().find_map(|(name, strategy)| {
        strategy(command).map(|url| {
            debug!("Found URL using {} strategy: {}", name, url);
            url.trim_end_matches(&['\'', '"'][..]).to_string()
        })
    })
}

fn capture_first(regex: &Regex, command: &str) -> Option<String> {
    regex
        .captures(command)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

fn url_from_location_flag(command: &str) -> Option<String> {
    capture_first(&LOCATION_URL, command)
}

fn url_from_quoted_argument(command: &str) -> Option<String> {
    capture_first(&QUOTED_URL_AFTER_CURL, command)
}

fn url_from_bare_argument(command: &str) -> Option<String> {
    capture_first(&BARE_URL_AFTER_CURL, command)
}

fn url_from_url_flag(command: &str) -> Option<String> {
    capture_first(&URL_FLAG, command)
}

fn url_from_anywhere(command: &str) -> Option<String> {
    capture_first(&ANY_URL, command)
}

/// Separates the query component from the URL. Only the first occurrence of
/// a repeated key is kept.
pub(crate) fn split_query(raw_url: &str) -> ParseResult<(String, IndexMap<String, String>)> {
    let mut url = Url::parse(raw_url).map_err(|e| ParseError::InvalidUrl {
        url: raw_url.to_string(),
        reason: e.to_string(),
    })?;

    let mut params = IndexMap::new();
    for (name, value) in url.query_pairs() {
        if params.contains_key(name.as_ref()) {
            debug!("Ignoring duplicate query parameter {}={}", name, value);
            continue;
        }
        params.insert(name.into_owned(), value.into_owned());
    }

    url.set_query(None);
    url.set_fragment(None);
    Ok((url.to_string(), params))
}

pub fn extract_method(command: &str) -> Option<String> {
    capture_first(&METHOD_FLAG, command).map(|m| m.to_uppercase())
}

fn has_data_flag(command: &str) -> bool {
    DATA_FLAG.is_match(command)
}

pub fn extract_headers(command: &str) -> IndexMap<String, String> {
    let pairs = HEADER_STRATEGIES
        .iter()
        .find_map(|(name, strategy)| {
            let found = strategy(command);
            if found.is_empty() {
                None
            } else {
                debug!("Found {} headers using {} form", found.len(), name);
                Some(found)
            }
        })
        .unwrap_or_default();

    pairs.into_iter().collect()
}

fn headers_quoted(command: &str) -> Vec<(String, String)> {
    QUOTED_HEADER
        .captures_iter(command)
        .filter_map(|caps| {
            let raw = match (caps.get(1), caps.get(2)) {
                (Some(single), _) => single.as_str().to_string(),
                (None, Some(double)) => unescape_double_quoted(double.as_str()),
                (None, None) => return None,
            };
            split_header(&raw)
        })
        .collect()
}

fn headers_unquoted(command: &str) -> Vec<(String, String)> {
    UNQUOTED_HEADER
        .captures_iter(command)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str();
            let value = caps.get(2)?.as_str();
            split_header(&format!("{}:{}", name, value))
        })
        .collect()
}

/// Splits `name: value` on the first colon.
fn split_header(raw: &str) -> Option<(String, String)> {
    let (name, value) = raw.split_once(':')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let value = value.trim().trim_matches('\\').trim();
    Some((name.to_string(), value.to_string()))
}

/// Finds the first data flag whose value is a brace-delimited object.
pub fn extract_body(command: &str) -> Option<RequestBody> {
    for flag in DATA_FLAG.find_iter(command) {
        let rest = &command[flag.end()..];
        let Some(value) = data_value(rest) else {
            continue;
        };
        let value = value.trim();
        if !(value.starts_with('{') && value.ends_with('}')) {
            continue;
        }
        debug!("Found body: {}", value);
        let body = RequestBody::from_text(value);
        if matches!(body, RequestBody::Raw(_)) {
            warn!("Could not parse body as JSON, keeping it as text");
        }
        return Some(body);
    }
    None
}

fn data_value(rest: &str) -> Option<String> {
    match rest.chars().next()? {
        '\'' => rest[1..].find('\'').map(|end| rest[1..1 + end].to_string()),
        '"' => {
            let mut escaped = false;
            for (idx, c) in rest.char_indices().skip(1) {
                match c {
                    '\\' if !escaped => escaped = true,
                    '"' if !escaped => return Some(unescape_double_quoted(&rest[1..idx])),
                    _ => escaped = false,
                }
            }
            None
        }
        '{' => balanced_braces(rest),
        _ => None,
    }
}

fn balanced_braces(text: &str) -> Option<String> {
    let mut depth = 0usize;
    for (idx, c) in text.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(text[..=idx].to_string());
                }
            }
            _ => {}
        }
    }
    None
}

fn unescape_double_quoted(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if matches!(next, '"' | '\\' | '$' | '`') {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
#[path = "curl_parser_tests.rs"]
mod tests;
