//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

use crate::cycle::{CycleSettings, RetryPolicy};

/// Longest work or break phase accepted on the command line (one day)
pub const MAX_PHASE_MINUTES: u64 = 24 * 60;

/// Longest base delay between completion attempts (ten minutes)
pub const MAX_BACKOFF_MS: u64 = 10 * 60 * 1000;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "pomotask")]
#[command(about = "A pomodoro task cycle server: work/break countdowns over a remote task list")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Task collection URL of the remote task API (in-memory store when absent)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Work phase duration in minutes
    #[arg(short, long = "work", default_value = "25", value_parser = clap::value_parser!(u64).range(1..=MAX_PHASE_MINUTES))]
    pub work_minutes: u64,

    /// Break phase duration in minutes
    #[arg(short, long = "break", default_value = "5", value_parser = clap::value_parser!(u64).range(1..=MAX_PHASE_MINUTES))]
    pub break_minutes: u64,

    /// Countdown tick interval in milliseconds
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..=60_000))]
    pub tick_ms: u64,

    /// How many times a task completion is attempted before the cycle halts
    #[arg(long, default_value = "3", value_parser = clap::value_parser!(u32).range(1..=20))]
    pub completion_attempts: u32,

    /// Base delay between completion attempts in milliseconds
    #[arg(long, default_value = "2000", value_parser = clap::value_parser!(u64).range(0..=MAX_BACKOFF_MS))]
    pub retry_backoff_ms: u64,

    /// Timeout for a single task API request in seconds
    #[arg(long, default_value = "10", value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub request_timeout_secs: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Durations and retry policy handed to the task cycle controller
    pub fn cycle_settings(&self) -> CycleSettings {
        CycleSettings {
            work: Duration::from_secs(self.work_minutes.saturating_mul(60)),
            rest: Duration::from_secs(self.break_minutes.saturating_mul(60)),
            tick: Duration::from_millis(self.tick_ms),
            retry: RetryPolicy {
                attempts: self.completion_attempts,
                backoff: Duration::from_millis(self.retry_backoff_ms),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_pomodoro() {
        let config = Config::try_parse_from(["pomotask"]).unwrap();
        let settings = config.cycle_settings();

        assert_eq!(config.address(), "127.0.0.1:20554");
        assert!(config.api_url.is_none());
        assert_eq!(settings.work, Duration::from_secs(25 * 60));
        assert_eq!(settings.rest, Duration::from_secs(5 * 60));
        assert_eq!(settings.tick, Duration::from_secs(1));
        assert_eq!(settings.retry.attempts, 3);
        assert_eq!(config.log_level(), "info");
    }

    #[test]
    fn flags_override_durations() {
        let config = Config::try_parse_from([
            "pomotask",
            "--work",
            "50",
            "--break",
            "10",
            "--tick-ms",
            "250",
            "--api-url",
            "http://localhost:3000/tasks",
            "-v",
        ])
        .unwrap();
        let settings = config.cycle_settings();

        assert_eq!(settings.work, Duration::from_secs(50 * 60));
        assert_eq!(settings.rest, Duration::from_secs(10 * 60));
        assert_eq!(settings.tick, Duration::from_millis(250));
        assert_eq!(config.api_url.as_deref(), Some("http://localhost:3000/tasks"));
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn zero_tick_is_rejected() {
        assert!(Config::try_parse_from(["pomotask", "--tick-ms", "0"]).is_err());
    }

    #[test]
    fn out_of_range_durations_are_rejected() {
        for args in [
            ["pomotask", "--work", "400000000000000000"],
            ["pomotask", "--work", "0"],
            ["pomotask", "--break", "1441"],
            ["pomotask", "--retry-backoff-ms", "18446744073709551615"],
            ["pomotask", "--completion-attempts", "0"],
            ["pomotask", "--request-timeout-secs", "0"],
        ] {
            assert!(Config::try_parse_from(args).is_err(), "accepted {:?}", args);
        }
    }

    #[test]
    fn largest_accepted_values_build_settings() {
        let config = Config::try_parse_from([
            "pomotask",
            "--work",
            "1440",
            "--break",
            "1440",
            "--retry-backoff-ms",
            "600000",
            "--completion-attempts",
            "20",
        ])
        .unwrap();
        let settings = config.cycle_settings();

        assert_eq!(settings.work, Duration::from_secs(MAX_PHASE_MINUTES * 60));
        assert_eq!(
            settings.retry.delay_after(settings.retry.attempts),
            Duration::from_millis(MAX_BACKOFF_MS * 20)
        );
    }
}
