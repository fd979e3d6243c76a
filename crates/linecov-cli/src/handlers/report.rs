//! Report command handler

use crate::commands::ReportArgs;
use crate::config::{CliConfig, OutputFormat};
use crate::dump::{load_dump, load_hits, HitEvent, ProgramDump};
use crate::error::CliResult;
use console::style;
use linecov::{CoverageOptions, CoverageSession, CoverageSnapshot, LineStatus, SessionConfig};
use std::fmt::Write as _;

/// Result of replaying one program
#[derive(Debug, Clone)]
pub struct ReportOutcome {
    /// Coverage at the end of the replay
    pub snapshot: CoverageSnapshot,
    /// Instructions recorded by static prefill
    pub prefilled: usize,
    /// Statements replayed
    pub hits: usize,
}

/// Execute the report command
pub fn execute_report(config: &CliConfig, args: &ReportArgs) -> CliResult<()> {
    let dump = load_dump(&args.dump)?;
    let hits = match &args.hits {
        Some(path) => load_hits(path)?,
        None => Vec::new(),
    };

    let outcome = build_report(&config.session, &dump, &hits, !args.no_prefill)?;
    tracing::info!(
        files = outcome.snapshot.len(),
        prefilled = outcome.prefilled,
        hits = outcome.hits,
        "report built"
    );

    let rendered = match OutputFormat::from(args.format) {
        OutputFormat::Json => outcome.snapshot.to_json()?,
        OutputFormat::Text => render_report_text(&outcome.snapshot),
    };
    if args.output.is_some() || !config.verbosity.is_quiet() {
        super::emit(&rendered, args.output.as_deref())?;
    }
    Ok(())
}

/// Run one measurement window over `dump`
///
/// Every script is entered once, which prefills it and every user body
/// from its file, then `hits` are replayed in order.
pub fn build_report(
    config: &SessionConfig,
    dump: &ProgramDump,
    hits: &[HitEvent],
    prefill: bool,
) -> CliResult<ReportOutcome> {
    let mut session = CoverageSession::new(config.clone());
    let options = if prefill {
        CoverageOptions::UNUSED
    } else {
        CoverageOptions::NONE
    };
    session.start(options)?;

    let mut prefilled = 0;
    for script in &dump.scripts {
        prefilled += session.on_body_entered(script, &dump.registry);
    }
    for hit in hits {
        session.on_statement(&hit.file, hit.line);
    }

    let snapshot = session.coverage();
    session.stop(true);
    Ok(ReportOutcome {
        snapshot,
        prefilled,
        hits: hits.len(),
    })
}

/// Render a per-file summary followed by totals
pub fn render_report_text(snapshot: &CoverageSnapshot) -> String {
    let mut out = String::new();
    for (name, file) in snapshot.files() {
        let covered = file.count(LineStatus::Covered);
        let percent = if file.is_empty() {
            100.0
        } else {
            covered as f64 * 100.0 / file.len() as f64
        };
        let missed: Vec<String> = file
            .lines()
            .iter()
            .filter(|(_, status)| *status == LineStatus::Missed)
            .map(|(line, _)| line.to_string())
            .collect();
        let _ = write!(
            out,
            "{} {covered}/{} {}",
            style(name).bold(),
            file.len(),
            colored_percent(percent),
        );
        if !missed.is_empty() {
            let _ = write!(out, " missed: {}", missed.join(","));
        }
        out.push('\n');
    }

    let summary = snapshot.summary();
    let _ = write!(
        out,
        "TOTAL {} files, {}/{} lines {}",
        summary.files,
        summary.covered_lines,
        summary.lines,
        colored_percent(summary.coverage_percent),
    );
    out
}

fn colored_percent(percent: f64) -> String {
    let text = format!("{percent:.1}%");
    if percent >= 80.0 {
        style(text).green().to_string()
    } else if percent >= 50.0 {
        style(text).yellow().to_string()
    } else {
        style(text).red().to_string()
    }
}
