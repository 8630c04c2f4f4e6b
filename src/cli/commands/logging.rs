use crate::cli::telemetry::{LogFormat, TelemetryConfig};
use clap::{Arg, ArgMatches, Command, builder::PossibleValuesParser, builder::TypedValueParser, builder::ValueParser};
use tracing::Level;

pub const ARG_VERBOSITY: &str = "verbosity";
pub const ARG_LOG_FORMAT: &str = "log-format";
pub const ARG_SERVICE_NAME: &str = "service-name";
pub const ARG_INSTANCE_ID: &str = "instance-id";

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        if let Ok(parsed) = level.parse::<u8>() {
            // Successfully parsed as a number
            if parsed <= 5 {
                return Ok(parsed);
            }
        }

        match level.to_lowercase().as_str() {
            "error" => Ok(0),
            "warn" => Ok(1),
            "info" => Ok(2),
            "debug" => Ok(3),
            "trace" => Ok(4),
            _ => Err("invalid log level".to_string()),
        }
    })
}

/// Telemetry settings from the parsed arguments and the resolved log level.
#[must_use]
pub fn telemetry_config(matches: &ArgMatches, level: Option<Level>) -> TelemetryConfig {
    let defaults = TelemetryConfig::default();

    TelemetryConfig {
        level,
        format: matches
            .get_one::<LogFormat>(ARG_LOG_FORMAT)
            .copied()
            .unwrap_or(defaults.format),
        service_name: matches
            .get_one::<String>(ARG_SERVICE_NAME)
            .cloned()
            .unwrap_or(defaults.service_name),
        instance_id: matches.get_one::<String>(ARG_INSTANCE_ID).cloned(),
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_VERBOSITY)
                .short('v')
                .long("verbose")
                .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
                .env("AUTHGATE_LOG_LEVEL")
                .global(true)
                .action(clap::ArgAction::Count)
                .value_parser(validator_log_level()),
        )
        .arg(
            Arg::new(ARG_LOG_FORMAT)
                .long("log-format")
                .help("Log output format")
                .env("AUTHGATE_LOG_FORMAT")
                .default_value("pretty")
                .value_parser(
                    PossibleValuesParser::new(["pretty", "json"])
                        .try_map(|format| format.parse::<LogFormat>()),
                ),
        )
        .arg(
            Arg::new(ARG_SERVICE_NAME)
                .long("service-name")
                .help("service.name reported on exported spans")
                .env("OTEL_SERVICE_NAME")
                .default_value(env!("CARGO_PKG_NAME")),
        )
        .arg(
            Arg::new(ARG_INSTANCE_ID)
                .long("instance-id")
                .help("service.instance.id reported on exported spans (random ULID when unset)")
                .env("OTEL_SERVICE_INSTANCE_ID"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ArgMatches {
        with_args(Command::new("authgate")).get_matches_from(args.iter().copied())
    }

    #[test]
    fn telemetry_defaults() {
        temp_env::with_vars(
            [
                ("AUTHGATE_LOG_FORMAT", None::<&str>),
                ("OTEL_SERVICE_NAME", None),
                ("OTEL_SERVICE_INSTANCE_ID", None),
            ],
            || {
                let config = telemetry_config(&parse(&["authgate"]), None);
                assert_eq!(config, TelemetryConfig::default());
            },
        );
    }

    #[test]
    fn telemetry_from_args() {
        temp_env::with_vars([("AUTHGATE_LOG_FORMAT", None::<&str>)], || {
            let matches = parse(&[
                "authgate",
                "--log-format",
                "json",
                "--service-name",
                "authgate-eu",
                "--instance-id",
                "node-1",
            ]);
            let config = telemetry_config(&matches, Some(Level::INFO));
            assert_eq!(config.format, LogFormat::Json);
            assert_eq!(config.service_name, "authgate-eu");
            assert_eq!(config.instance_id.as_deref(), Some("node-1"));
            assert_eq!(config.level, Some(Level::INFO));
        });
    }

    #[test]
    fn telemetry_from_env() {
        temp_env::with_vars(
            [
                ("AUTHGATE_LOG_FORMAT", Some("json")),
                ("OTEL_SERVICE_NAME", Some("authgate-test")),
                ("OTEL_SERVICE_INSTANCE_ID", Some("01J0000000000000000000000")),
            ],
            || {
                let config = telemetry_config(&parse(&["authgate"]), None);
                assert_eq!(config.format, LogFormat::Json);
                assert_eq!(config.service_name, "authgate-test");
                assert_eq!(
                    config.instance_id.as_deref(),
                    Some("01J0000000000000000000000")
                );
            },
        );
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        temp_env::with_vars([("AUTHGATE_LOG_FORMAT", None::<&str>)], || {
            let result = with_args(Command::new("authgate"))
                .try_get_matches_from(["authgate", "--log-format", "xml"]);
            assert!(result.is_err());
        });
    }
}
