// File: error.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use std::fmt;

/// Raised when a capture-tool command cannot be turned into a request.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    MissingUrl { fragment: String },
    InvalidUrl { url: String, reason: String },
    UnsupportedMethod(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingUrl { fragment } => {
                write!(f, "URL not found in curl command: {}", fragment)
            }
            Self::InvalidUrl { url, reason } => write!(f, "Invalid URL {}: {}", url, reason),
            Self::UnsupportedMethod(method) => write!(f, "Unsupported HTTP method: {}", method),
        }
    }
}

impl std::error::Error for ParseError {}

#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    Timeout(String),
    Connect(String),
    Body(String),
    Request(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout(e) => write!(f, "Request timed out: {}", e),
            Self::Connect(e) => write!(f, "Connection failed: {}", e),
            Self::Body(e) => write!(f, "Failed to read body: {}", e),
            Self::Request(e) => write!(f, "Request error: {}", e),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error.to_string())
        } else if error.is_connect() {
            Self::Connect(error.to_string())
        } else if error.is_body() || error.is_decode() {
            Self::Body(error.to_string())
        } else {
            Self::Request(error.to_string())
        }
    }
}

/// Failures talking to the completion provider. Callers degrade to the
/// deterministic plan on any of these.
#[derive(Debug)]
pub enum ProviderError {
    Unreachable(TransportError),
    BadEnvelope(String),
    Exhausted { attempts: u32 },
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unreachable(e) => write!(f, "Completion provider unreachable: {}", e),
            Self::BadEnvelope(msg) => write!(f, "Unexpected provider response: {}", msg),
            Self::Exhausted { attempts } => {
                write!(f, "Completion provider failed after {} attempts", attempts)
            }
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Unreachable(e) => Some(e),
            Self::BadEnvelope(_) => None,
            Self::Exhausted { .. } => None,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        Self::Unreachable(TransportError::from(error))
    }
}

impl From<TransportError> for ProviderError {
    fn from(error: TransportError) -> Self {
        Self::Unreachable(error)
    }
}

pub type ParseResult<T> = Result<T, ParseError>;
