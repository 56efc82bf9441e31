// File: main.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use log::warn;
use simple_logger::SimpleLogger;
use std::fmt::Write;

use curlprobe::cli::Cli;
use curlprobe::curl_parser;
use curlprobe::executor::{ExecutionResult, Executor, Outcome};
use curlprobe::generator::{GenerationMode, TestCaseGenerator};
use curlprobe::provider::provider_from_config;
use curlprobe::reports::ReportEngine;
use curlprobe::run_state::RunState;
use curlprobe::testcase::TestCase;
use curlprobe::transport::ReqwestTransport;

fn main() {
    if let Err(e) = run() {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    SimpleLogger::new()
        .with_level(cli.level_filter())
        .init()
        .context("Failed to initialize logger")?;

    let command = cli.read_command()?;
    let descriptor =
        curl_parser::parse(&command).context("Could not parse the curl command")?;
    let config = cli.to_config();

    print_info(&format!(
        "Target: {} {}",
        descriptor.method,
        descriptor.full_url()
    ));

    let mut generator = TestCaseGenerator::new(config.clone());
    if cli.mode != GenerationMode::Basic {
        match provider_from_config(&config) {
            Ok(provider) => generator = generator.with_provider(provider),
            Err(e) => warn!("Completion provider unavailable: {}", e),
        }
    }

    let plan = generator.generate(&command, &descriptor, cli.mode);
    if plan.source.is_degraded() {
        print_warning(&format!("Test plan built from {}", plan.source));
    } else {
        print_info(&format!("Test plan built from {}", plan.source));
    }

    if cli.dry_run {
        for (index, case) in plan.cases.iter().enumerate() {
            println!("{}", format_case(index, case));
        }
        return Ok(());
    }

    let transport = ReqwestTransport::new(&config).context("Failed to build HTTP client")?;
    let executor = Executor::new(transport, config.request_timeout());

    let pb = ProgressBar::new(plan.cases.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} ({eta})",
        )?
        .with_key("eta", |state: &ProgressState, w: &mut dyn std::fmt::Write| {
            let _ = write!(w, "{:.1}s", state.eta().as_secs_f64());
        })
        .progress_chars("█▉▊▋▌▍▎▏  "),
    );

    let mut state = RunState::new(plan.cases.len());
    state.start();
    let results = executor.run_all_with(&descriptor, &plan.cases, |result| {
        state.record(result);
        pb.suspend(|| println!("{}", format_result(result)));
        pb.inc(1);
    });
    state.finish();
    pb.finish_and_clear();

    print_summary(&state);

    if !cli.no_report {
        let engine = ReportEngine::new();
        let data = engine.create_report_data(
            &command,
            &descriptor,
            plan.source,
            plan.raw_response,
            results,
            &state,
        );
        let path = engine.write_report(
            &cli.format,
            &data,
            &cli.report_config(),
            config.output_dir(),
        )?;
        print_success(&format!("Report written to {}", path.display()));
    }

    Ok(())
}

fn format_case(index: usize, case: &TestCase) -> String {
    format!(
        "{:>3}. {} [{}] expects {}",
        index + 1,
        case.description,
        case.test_type,
        case.expected_status
    )
}

fn format_result(result: &ExecutionResult) -> String {
    let marker = match result.outcome {
        Outcome::Pass => "✓ PASS ".green().bold(),
        Outcome::Fail => "✗ FAIL ".red().bold(),
        Outcome::Error => "⚠ ERROR".yellow().bold(),
    };
    let observed = match (result.status_code, &result.error) {
        (Some(status), _) => status.to_string(),
        (None, Some(error)) => error.clone(),
        (None, None) => "-".to_string(),
    };

    format!(
        "{} {} (expected {}, got {}, {})",
        marker,
        result.test_case.description,
        result.test_case.expected_status,
        observed,
        format_duration(result.elapsed_ms)
    )
}

fn print_summary(state: &RunState) {
    println!();
    println!("{}", "Summary".bold());
    println!("  Total:     {}", state.total_cases());
    println!("  Passed:    {}", state.passed().to_string().green());
    println!("  Failed:    {}", state.failed().to_string().red());
    println!("  Errors:    {}", state.errored().to_string().yellow());
    println!("  Pass rate: {:.1}%", state.pass_rate());
    println!(
        "  Duration:  {}",
        format_duration(state.duration_ms().max(0) as u64)
    );
}

fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

fn format_duration(ms: u64) -> String {
    if ms >= 60000 {
        format!("{}m {:.1}s", ms / 60000, (ms % 60000) as f64 / 1000.0)
    } else if ms >= 1000 {
        format!("{:.2}s", ms as f64 / 1000.0)
    } else {
        format!("{}ms", ms)
    }
}
