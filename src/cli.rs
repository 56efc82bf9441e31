// File: cli.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;
use std::io::Read;
use std::path::PathBuf;

use crate::config::{ConfigParameter, ProviderKind};
use crate::generator::GenerationMode;
use crate::reports::{ReportConfig, Theme};

#[derive(Parser, Debug)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = env!("CARGO_PKG_DESCRIPTION"),
)]
pub struct Cli {
    /// Captured curl command. Read from --input-file or stdin when omitted.
    pub command: Option<String>,

    #[arg(short = 'i', long = "input-file", conflicts_with = "command")]
    pub input_file: Option<PathBuf>,

    #[arg(
        short = 'm',
        long = "mode",
        default_value = "test-plan",
        help = "Test generation mode: basic, free-form or test-plan"
    )]
    pub mode: GenerationMode,

    #[arg(
        long = "provider",
        default_value = "ollama",
        help = "Completion provider: ollama or openai"
    )]
    pub provider: ProviderKind,

    #[arg(long = "provider-url", env = "CURLPROBE_PROVIDER_URL")]
    pub provider_url: Option<String>,

    #[arg(long = "model", env = "CURLPROBE_MODEL")]
    pub model: Option<String>,

    #[arg(
        short = 't',
        long = "timeout",
        default_value_t = 10,
        help = "HTTP request timeout in seconds"
    )]
    pub timeout: u64,

    #[arg(
        long = "provider-timeout",
        default_value_t = 120,
        help = "Completion provider timeout in seconds"
    )]
    pub provider_timeout: u64,

    #[arg(
        short = 'r',
        long = "retries",
        default_value_t = 3,
        help = "Completion provider attempts"
    )]
    pub retries: u32,

    #[arg(short = 'k', long = "insecure", help = "Accept invalid TLS certificates")]
    pub insecure: bool,

    #[arg(
        short = 'f',
        long = "format",
        default_value = "json",
        value_parser = ["json", "html", "text"]
    )]
    pub format: String,

    #[arg(short = 'o', long = "output-dir", default_value = "test_reports")]
    pub output_dir: String,

    #[arg(long = "theme", default_value = "light", help = "HTML report theme: light or dark")]
    pub theme: Theme,

    #[arg(
        long = "no-raw-response",
        help = "Leave the provider response out of the report"
    )]
    pub no_raw_response: bool,

    #[arg(long = "no-report", help = "Skip writing a report file")]
    pub no_report: bool,

    #[arg(long = "dry-run", help = "List the generated cases without executing them")]
    pub dry_run: bool,

    #[arg(long = "log-level", default_value = "warn")]
    pub log_level: String,

    #[arg(short = 'v', long = "verbose", help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(short = 'q', long = "quiet", help = "Reduce output verbosity")]
    pub quiet: bool,

    #[arg(long = "no-color", help = "Disable colored output")]
    pub no_color: bool,
}

impl Cli {
    pub fn to_config(&self) -> ConfigParameter {
        let mut config = ConfigParameter::new();
        config.set_timeout(self.timeout);
        config.set_provider_timeout(self.provider_timeout);
        config.set_provider_retries(self.retries.max(1));
        config.set_provider_kind(self.provider);
        if let Some(url) = &self.provider_url {
            config.set_provider_url(url);
        }
        config.set_model(self.model.clone());
        config.set_insecure(self.insecure);
        config.set_output_dir(&self.output_dir);
        config
    }

    pub fn report_config(&self) -> ReportConfig {
        ReportConfig {
            theme: self.theme,
            include_raw_response: !self.no_raw_response,
        }
    }

    /// `-v` wins over `-q`, both win over `--log-level`.
    pub fn level_filter(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else if self.quiet {
            LevelFilter::Error
        } else {
            self.log_level.parse().unwrap_or(LevelFilter::Warn)
        }
    }

    pub fn read_command(&self) -> Result<String> {
        if let Some(command) = &self.command {
            return Ok(command.clone());
        }
        if let Some(path) = &self.input_file {
            return std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()));
        }

        let mut command = String::new();
        std::io::stdin()
            .read_to_string(&mut command)
            .context("Failed to read curl command from stdin")?;
        Ok(command)
    }
}
