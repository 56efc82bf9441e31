// File: html.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use anyhow::Result;

use super::{ReportConfig, ReportData, ReportGenerator, Theme};
use crate::executor::{ExecutionResult, Outcome};

pub struct HtmlGenerator;

impl HtmlGenerator {
    pub fn new() -> Self {
        Self
    }

    fn render_theme_toggle(&self) -> String {
        r#"
        <script>
        function toggleTheme() {
            const html = document.documentElement;
            const next = html.classList.contains('dark') ? 'light' : 'dark';
            html.classList.remove('light', 'dark');
            html.classList.add(next);
            document.getElementById('theme-toggle').textContent = next === 'light' ? '🌙' : '☀️';
        }
        </script>
        "#
        .to_string()
    }

    fn render_header(&self, data: &ReportData) -> String {
        format!(
            r#"
        <header class="bg-white dark:bg-gray-900 shadow-sm border-b border-gray-200 dark:border-gray-700">
            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8">
                <div class="flex justify-between items-center py-6">
                    <div>
                        <h1 class="text-3xl font-bold text-gray-900 dark:text-white">{}</h1>
                        <p class="mt-1 text-sm text-gray-500 dark:text-gray-400">
                            Generated on {} | {} {} | plan from {}
                        </p>
                    </div>
                    <div class="flex items-center space-x-4">
                        <button id="theme-toggle" onclick="toggleTheme()"
                            class="p-2 rounded-lg bg-gray-100 dark:bg-gray-800 text-gray-700 dark:text-gray-300 hover:bg-gray-200 dark:hover:bg-gray-700 transition-colors">🌙</button>
                        <div class="flex items-center text-sm text-gray-500 dark:text-gray-400">
                            <span class="inline-block w-3 h-3 bg-green-500 rounded-full mr-2"></span>
                            curlprobe v{}
                        </div>
                    </div>
                </div>
            </div>
        </header>
        "#,
            escape_html(&data.title),
            data.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            data.base_request.method,
            escape_html(&data.base_request.url),
            escape_html(&data.plan_source.to_string()),
            env!("CARGO_PKG_VERSION")
        )
    }

    fn render_card(&self, label: &str, value: &str, accent: &str) -> String {
        format!(
            r#"
            <div class="bg-white dark:bg-gray-800 rounded-lg shadow-sm border border-gray-200 dark:border-gray-700 p-6">
                <p class="text-sm font-medium text-gray-500 dark:text-gray-400">{}</p>
                <p class="text-2xl font-semibold {}">{}</p>
            </div>"#,
            label, accent, value
        )
    }

    fn render_summary_cards(&self, data: &ReportData) -> String {
        let summary = &data.summary;
        let cards = [
            self.render_card(
                "Total Cases",
                &summary.total.to_string(),
                "text-gray-900 dark:text-white",
            ),
            self.render_card(
                "Passed",
                &summary.passed.to_string(),
                "text-green-600 dark:text-green-400",
            ),
            self.render_card(
                "Failed",
                &summary.failed.to_string(),
                "text-red-600 dark:text-red-400",
            ),
            self.render_card(
                "Errors",
                &summary.errored.to_string(),
                "text-orange-600 dark:text-orange-400",
            ),
            self.render_card(
                "Pass Rate",
                &format!("{:.1}%", summary.pass_rate),
                "text-blue-600 dark:text-blue-400",
            ),
        ];

        format!(
            r#"
        <div class="grid grid-cols-1 md:grid-cols-3 lg:grid-cols-5 gap-6 mb-8">{}
        </div>
        <p class="mb-8 text-sm text-gray-500 dark:text-gray-400">Duration: {} ms</p>
        "#,
            cards.concat(),
            summary.duration_ms
        )
    }

    fn render_command(&self, data: &ReportData) -> String {
        format!(
            r#"
        <div class="bg-white dark:bg-gray-800 rounded-lg shadow-sm border border-gray-200 dark:border-gray-700 p-6 mb-8">
            <h2 class="text-xl font-semibold text-gray-900 dark:text-white mb-4">Source Command</h2>
            <pre class="text-xs font-mono whitespace-pre-wrap break-all text-gray-700 dark:text-gray-300">{}</pre>
        </div>
        "#,
            escape_html(&data.command)
        )
    }

    fn render_results_table(&self, data: &ReportData) -> String {
        let mut html = String::from(
            r#"
        <div class="bg-white dark:bg-gray-800 rounded-lg shadow-sm border border-gray-200 dark:border-gray-700 overflow-hidden">
            <div class="px-6 py-4 border-b border-gray-200 dark:border-gray-700">
                <h2 class="text-xl font-semibold text-gray-900 dark:text-white">Test Results</h2>
            </div>
            <div class="overflow-x-auto">
                <table class="min-w-full divide-y divide-gray-200 dark:divide-gray-700">
                    <thead class="bg-gray-50 dark:bg-gray-900">
                        <tr>
                            <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 dark:text-gray-400 uppercase tracking-wider">Test Case</th>
                            <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 dark:text-gray-400 uppercase tracking-wider">Type</th>
                            <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 dark:text-gray-400 uppercase tracking-wider">Expected</th>
                            <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 dark:text-gray-400 uppercase tracking-wider">Observed</th>
                            <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 dark:text-gray-400 uppercase tracking-wider">Result</th>
                            <th class="px-6 py-3 text-left text-xs font-medium text-gray-500 dark:text-gray-400 uppercase tracking-wider">Time</th>
                        </tr>
                    </thead>
                    <tbody class="bg-white dark:bg-gray-800 divide-y divide-gray-200 dark:divide-gray-700">
        "#,
        );

        for result in &data.results {
            html.push_str(&self.render_result_row(result));
        }

        html.push_str("</tbody></table></div></div>");
        html
    }

    fn render_result_row(&self, result: &ExecutionResult) -> String {
        let observed = match (result.status_code, &result.error) {
            (Some(code), _) => code.to_string(),
            (None, Some(error)) => format!(
                r#"<span class="text-xs text-red-600 dark:text-red-400">{}</span>"#,
                escape_html(error)
            ),
            (None, None) => "-".to_string(),
        };

        format!(
            r#"
                <tr class="hover:bg-gray-50 dark:hover:bg-gray-700">
                    <td class="px-6 py-4 text-sm text-gray-900 dark:text-white">
                        <div class="max-w-md truncate" title="{}">{}</div>
                        <div class="text-xs font-mono text-gray-500 dark:text-gray-400 truncate-url">{} {}</div>
                    </td>
                    <td class="px-6 py-4 text-sm text-gray-700 dark:text-gray-300">{}</td>
                    <td class="px-6 py-4 text-sm text-gray-700 dark:text-gray-300">{}</td>
                    <td class="px-6 py-4 text-sm text-gray-700 dark:text-gray-300">{}</td>
                    <td class="px-6 py-4 text-sm">
                        <span class="inline-flex items-center px-2 py-1 rounded-full text-xs {}">{}</span>
                    </td>
                    <td class="px-6 py-4 text-sm text-gray-500 dark:text-gray-400">{} ms</td>
                </tr>
                "#,
            escape_html(&result.test_case.description),
            escape_html(&result.test_case.description),
            result.request.method,
            escape_html(&result.request.full_url()),
            result.test_case.test_type.as_str(),
            result.test_case.expected_status,
            observed,
            self.get_outcome_class(result.outcome),
            result.outcome,
            result.elapsed_ms
        )
    }

    fn get_outcome_class(&self, outcome: Outcome) -> &'static str {
        match outcome {
            Outcome::Pass => "bg-green-100 dark:bg-green-900 text-green-800 dark:text-green-200",
            Outcome::Fail => "bg-red-100 dark:bg-red-900 text-red-800 dark:text-red-200",
            Outcome::Error => {
                "bg-orange-100 dark:bg-orange-900 text-orange-800 dark:text-orange-200"
            }
        }
    }

    fn render_raw_response(&self, data: &ReportData, config: &ReportConfig) -> String {
        match &data.raw_response {
            Some(raw) if config.include_raw_response => format!(
                r#"
        <details class="mt-8 bg-white dark:bg-gray-800 rounded-lg shadow-sm border border-gray-200 dark:border-gray-700 p-6">
            <summary class="cursor-pointer text-sm font-medium text-gray-700 dark:text-gray-300">Provider response</summary>
            <pre class="mt-4 text-xs font-mono whitespace-pre-wrap text-gray-700 dark:text-gray-300">{}</pre>
        </details>
        "#,
                escape_html(raw)
            ),
            _ => String::new(),
        }
    }

    fn render_footer(&self) -> String {
        format!(
            r#"
        <footer class="bg-white dark:bg-gray-900 border-t border-gray-200 dark:border-gray-700 mt-12">
            <div class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-6">
                <div class="text-sm text-gray-500 dark:text-gray-400">
                    Generated by curlprobe v{} | API Test Report
                </div>
            </div>
        </footer>
        "#,
            env!("CARGO_PKG_VERSION")
        )
    }
}

impl ReportGenerator for HtmlGenerator {
    fn generate(&self, data: &ReportData, config: &ReportConfig) -> Result<String> {
        let theme_class = match config.theme {
            Theme::Dark => "dark",
            Theme::Light => "light",
        };

        let html = format!(
            r#"<!DOCTYPE html>
<html lang="en" class="{}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{}</title>
    <script src="https://cdn.tailwindcss.com"></script>
    <script>
        tailwind.config = {{ darkMode: 'class' }}
    </script>
    {}
    <style>
        .truncate-url {{
            max-width: 420px;
            overflow: hidden;
            text-overflow: ellipsis;
            white-space: nowrap;
        }}
    </style>
</head>
<body class="bg-gray-50 dark:bg-gray-900 min-h-screen">
    {}

    <main class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8">
        {}
        {}
        {}
        {}
    </main>

    {}
</body>
</html>"#,
            theme_class,
            escape_html(&data.title),
            self.render_theme_toggle(),
            self.render_header(data),
            self.render_summary_cards(data),
            self.render_command(data),
            self.render_results_table(data),
            self.render_raw_response(data, config),
            self.render_footer()
        );
        Ok(html)
    }

    fn file_extension(&self) -> &'static str {
        "html"
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
