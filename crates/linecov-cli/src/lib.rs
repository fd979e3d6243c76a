//! linecov CLI Library
//!
//! Command-line interface over the linecov coverage engine: inspects the
//! tail analysis of bytecode dumps and replays hit traces into reports.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
pub mod dump;
mod error;
pub mod handlers;

pub use commands::{AnalyzeArgs, Cli, ColorArg, Commands, FormatArg, ReportArgs};
pub use config::{
    load_session_config, parse_session_config, CliConfig, ColorChoice, OutputFormat, Verbosity,
};
pub use dump::{load_dump, load_hits, HitEvent, ProgramDump};
pub use error::{CliError, CliResult};
