// File: mutation.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use crate::config::ConfigParameter;
use crate::request::RequestDescriptor;
use crate::testcase::{Modification, TestCase};

/// Deterministic test plan that needs no completion provider.
///
/// Produces one baseline, then a missing and an invalid case per header, then
/// an invalid case per query parameter, always `1 + 2H + P` cases in that
/// order.
pub fn generate_basic_cases(
    descriptor: &RequestDescriptor,
    config: &ConfigParameter,
) -> Vec<TestCase> {
    let mut cases =
        Vec::with_capacity(1 + 2 * descriptor.headers.len() + descriptor.params.len());

    cases.push(TestCase::baseline("Valid Request Test"));

    for header in descriptor.headers.keys() {
        cases.push(TestCase::negative(
            &format!("Missing {} Test", header),
            Modification::RemoveHeader(header.clone()),
        ));
        cases.push(TestCase::negative(
            &format!("Invalid {} Value Test", header),
            Modification::SetHeader(header.clone(), config.invalid_header_value().to_string()),
        ));
    }

    for param in descriptor.params.keys() {
        cases.push(TestCase::negative(
            &format!("Invalid {} Test", param),
            Modification::SetParam(param.clone(), config.invalid_param_value().to_string()),
        ));
    }

    cases
}
