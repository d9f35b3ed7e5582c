//! WireChat CLI entry point.

use clap::Parser;
use tracing_subscriber::EnvFilter;

use wirechat_core::config::{ClientConfig, LoggingConfig};

mod commands;
mod output;

use commands::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let logging = ClientConfig::load(&cli.env)
        .map(|c| c.logging)
        .unwrap_or_default();
    init_tracing(&logging);

    if let Err(e) = cli.execute().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level; the configured format selects JSON or pretty output.
fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| base_filter(logging));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn base_filter(logging: &LoggingConfig) -> EnvFilter {
    EnvFilter::new(&logging.level)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_filter_uses_configured_level() {
        let logging = LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        };
        assert_eq!(base_filter(&logging).to_string(), "debug");
    }

    #[test]
    fn test_base_filter_accepts_per_target_directives() {
        let logging = LoggingConfig {
            level: "warn,wirechat_gateway=trace".to_string(),
            format: "json".to_string(),
        };
        assert_eq!(
            base_filter(&logging).to_string(),
            "warn,wirechat_gateway=trace"
        );
    }
}
