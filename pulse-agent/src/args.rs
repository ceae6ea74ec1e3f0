//! CLI argument parsing.

use std::path::PathBuf;

use clap::Parser;

use pulse_common::LoggingConfig;

/// Configuration file used when `--config` is not given.
pub const DEFAULT_CONFIG: &str = "pulse.json5";

/// CLI arguments for the agent.
#[derive(Parser, Debug, Clone)]
#[command(about = "Pulse host telemetry agent", version)]
pub struct AgentArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value = DEFAULT_CONFIG)]
    pub config: PathBuf,

    /// Override the configured log level (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,
}

impl AgentArgs {
    /// Effective logging configuration: the CLI override wins over the file.
    pub fn logging(&self, configured: &LoggingConfig) -> LoggingConfig {
        match &self.log_level {
            Some(level) => LoggingConfig {
                level: level.clone(),
                ..configured.clone()
            },
            None => configured.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulse_common::LogFormat;

    #[test]
    fn test_config_defaults_when_omitted() {
        let args = AgentArgs::try_parse_from(["pulse-agent"]).unwrap();

        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG));
        assert!(args.log_level.is_none());
    }

    #[test]
    fn test_explicit_arguments() {
        let args = AgentArgs::try_parse_from([
            "pulse-agent",
            "--config",
            "/etc/pulse/agent.json5",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(args.config, PathBuf::from("/etc/pulse/agent.json5"));
        assert_eq!(args.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_log_level_override_wins() {
        let args = AgentArgs::try_parse_from(["pulse-agent", "--log-level", "trace"]).unwrap();
        let configured = LoggingConfig {
            level: "warn".to_string(),
            format: LogFormat::Json,
        };

        let effective = args.logging(&configured);

        assert_eq!(effective.level, "trace");
        // Only the level is overridden; the format still comes from the file
        assert_eq!(effective.format, LogFormat::Json);
    }

    #[test]
    fn test_configured_logging_kept_without_override() {
        let args = AgentArgs::try_parse_from(["pulse-agent"]).unwrap();
        let configured = LoggingConfig::default();

        assert_eq!(args.logging(&configured).level, configured.level);
    }
}
