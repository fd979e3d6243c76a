//! Command handlers - extracted from main.rs for testability
//!
//! Each handler module contains:
//! - The execution logic for a CLI command
//! - Pure helpers that build the rendered output

pub mod analyze;
pub mod report;

pub use analyze::{analyze_dump, execute_analyze, render_analysis_text, BodyAnalysis};
pub use report::{build_report, execute_report, render_report_text, ReportOutcome};

use crate::error::CliResult;
use std::path::Path;

/// Write `content` to `path`, or to stdout when no path is given
pub(crate) fn emit(content: &str, path: Option<&Path>) -> CliResult<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => println!("{content}"),
    }
    Ok(())
}
