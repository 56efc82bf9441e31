// File: transport.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use log::debug;
use reqwest::blocking::Client;
use reqwest::Method;
use std::time::Duration;

use crate::config::ConfigParameter;
use crate::error::TransportError;
use crate::request::{HttpMethod, RequestBody, RequestDescriptor};
use crate::response::TransportResponse;

/// Issues one concrete request. Implementations must not retry.
pub trait HttpTransport {
    fn send(
        &self,
        request: &RequestDescriptor,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &ConfigParameter) -> Result<Self, TransportError> {
        let client = Client::builder()
            .danger_accept_invalid_certs(config.insecure())
            .build()?;
        Ok(ReqwestTransport { client })
    }
}

fn reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Head => Method::HEAD,
        HttpMethod::Options => Method::OPTIONS,
    }
}

impl HttpTransport for ReqwestTransport {
    fn send(
        &self,
        request: &RequestDescriptor,
        timeout: Duration,
    ) -> Result<TransportResponse, TransportError> {
        debug!("{} {}", request.method, request.full_url());

        let mut builder = self
            .client
            .request(reqwest_method(request.method), &request.url)
            .timeout(timeout);

        if !request.params.is_empty() {
            builder = builder.query(&request.params);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match &request.body {
            Some(RequestBody::Json(value)) => builder.json(value),
            Some(RequestBody::Raw(text)) => builder.body(text.clone()),
            None => builder,
        };

        let response = builder.send()?;
        let status = response.status().as_u16();
        let url = response.url().to_string();
        let body = response.text()?;

        Ok(TransportResponse::new(status, &body, &url))
    }
}
