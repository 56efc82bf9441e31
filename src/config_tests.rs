// File: config_tests.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

#[cfg(test)]
mod tests {
    use crate::config::{ConfigParameter, ProviderKind};
    use rstest::*;
    use std::time::Duration;

    #[test]
    fn test_config_parameter_default() {
        let config = ConfigParameter::default();

        assert_eq!(config.timeout(), 10);
        assert_eq!(config.provider_timeout(), 120);
        assert_eq!(config.provider_retries(), 3);
        assert_eq!(config.retry_backoff(), 5);
        assert_eq!(config.provider_kind(), ProviderKind::Ollama);
        assert_eq!(config.provider_url(), "http://localhost:11434");
        assert_eq!(config.model(), None);
        assert_eq!(config.fallback_model(), "mistral");
        assert_eq!(config.invalid_header_value(), "invalid_value");
        assert_eq!(config.invalid_param_value(), "INVALID_VALUE");
        assert_eq!(config.insecure(), false);
        assert_eq!(config.output_dir(), "test_reports");
    }

    #[rstest]
    #[case(0)]
    #[case(5)]
    #[case(30)]
    #[case(60)]
    #[case(120)]
    fn test_set_timeout(#[case] timeout_value: u64) {
        let mut config = ConfigParameter::new();

        config.set_timeout(timeout_value);
        assert_eq!(config.timeout(), timeout_value);
        assert_eq!(config.request_timeout(), Duration::from_secs(timeout_value));
    }

    #[rstest]
    #[case(0, 1)]
    #[case(1, 1)]
    #[case(3, 3)]
    #[case(7, 7)]
    fn test_set_provider_retries_never_below_one(#[case] requested: u32, #[case] expected: u32) {
        let mut config = ConfigParameter::new();

        config.set_provider_retries(requested);
        assert_eq!(config.provider_retries(), expected);
    }

    #[rstest]
    #[case("http://localhost:11434/", "http://localhost:11434")]
    #[case("http://127.0.0.1:8080", "http://127.0.0.1:8080")]
    #[case("https://llm.internal//", "https://llm.internal")]
    fn test_set_provider_url_strips_trailing_slash(#[case] input: &str, #[case] expected: &str) {
        let mut config = ConfigParameter::new();

        config.set_provider_url(input);
        assert_eq!(config.provider_url(), expected);
    }

    #[test]
    fn test_blank_model_is_treated_as_unset() {
        let mut config = ConfigParameter::new();

        config.set_model(Some("llama3".to_string()));
        assert_eq!(config.model(), Some("llama3"));

        config.set_model(Some("  ".to_string()));
        assert_eq!(config.model(), None);
    }

    #[rstest]
    #[case("ollama", Some(ProviderKind::Ollama))]
    #[case("OpenAI", Some(ProviderKind::OpenAi))]
    #[case("local", Some(ProviderKind::OpenAi))]
    #[case("gpt2", None)]
    fn test_provider_kind_from_str(#[case] input: &str, #[case] expected: Option<ProviderKind>) {
        assert_eq!(input.parse::<ProviderKind>().ok(), expected);
    }

    #[test]
    fn test_sentinels_are_configurable() {
        let mut config = ConfigParameter::new();

        config.set_invalid_header_value("bogus");
        config.set_invalid_param_value("");
        assert_eq!(config.invalid_header_value(), "bogus");
        assert_eq!(config.invalid_param_value(), "");
    }

    #[test]
    fn test_config_clone_is_independent() {
        let mut config = ConfigParameter::new();
        config.set_timeout(30);
        config.set_insecure(true);
        config.set_output_dir("custom_output");

        let mut cloned = config.clone();
        cloned.set_timeout(1);

        assert_eq!(config.timeout(), 30);
        assert_eq!(cloned.timeout(), 1);
        assert_eq!(cloned.insecure(), true);
        assert_eq!(cloned.output_dir(), "custom_output");
    }
}
