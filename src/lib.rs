// File: lib.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::module_inception)]
#![allow(clippy::new_without_default)]

pub mod cli;
pub mod config;
pub mod curl_parser;
pub mod error;
pub mod executor;
pub mod generator;
pub mod mutation;
pub mod prompt;
pub mod provider;
pub mod recovery;
pub mod reports;
pub mod request;
pub mod response;
pub mod run_state;
pub mod testcase;
pub mod transport;
