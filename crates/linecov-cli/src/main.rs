//! linecov: line coverage for bytecode dumps
//!
//! ## Usage
//!
//! ```bash
//! linecov analyze dump.json                     # Tail analysis per body
//! linecov report dump.json --hits trace.json    # Coverage as JSON
//! linecov report dump.json --format text        # Per-file summary
//! ```

use clap::Parser;
use linecov_cli::{
    handlers, load_session_config, Cli, CliConfig, CliResult, ColorChoice, Commands, Verbosity,
};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    let config = build_config(&cli)?;
    init_logging(config.verbosity);
    config.color.apply();
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Analyze(args) => handlers::execute_analyze(&config, &args),
        Commands::Report(args) => handlers::execute_report(&config, &args),
    }
}

fn build_config(cli: &Cli) -> CliResult<CliConfig> {
    let mut config = CliConfig::new()
        .with_verbosity(Verbosity::from_flags(cli.verbose, cli.quiet))
        .with_color(ColorChoice::from(cli.color.clone()));

    if let Some(path) = &cli.config {
        config = config.with_session(load_session_config(path)?);
    }
    Ok(config)
}

/// Install the stderr subscriber; `RUST_LOG` overrides the verbosity flags
fn init_logging(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbosity == Verbosity::Debug)
        .try_init();
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_build_config_flags() {
        let cli = Cli::try_parse_from(["linecov", "-v", "--color", "never", "analyze", "d.json"])
            .unwrap();
        let config = build_config(&cli).unwrap();
        assert_eq!(config.verbosity, Verbosity::Verbose);
        assert_eq!(config.color, ColorChoice::Never);
        assert!(config.session.extended_info);
    }

    #[test]
    fn test_build_config_reads_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("linecov.yaml");
        std::fs::write(&path, "trailer:\n  dead_tail: 3\n").unwrap();
        let cli = Cli::try_parse_from([
            "linecov",
            "--config",
            path.to_str().unwrap(),
            "report",
            "d.json",
        ])
        .unwrap();
        assert_eq!(build_config(&cli).unwrap().session.trailer.dead_tail, 3);
    }

    #[test]
    fn test_build_config_missing_yaml() {
        let cli = Cli::try_parse_from(["linecov", "--config", "/nope.yaml", "report", "d.json"])
            .unwrap();
        assert!(build_config(&cli).is_err());
    }
}
