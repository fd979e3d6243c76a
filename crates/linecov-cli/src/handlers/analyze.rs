//! Analyze command handler

use crate::commands::AnalyzeArgs;
use crate::config::{CliConfig, OutputFormat};
use crate::dump::{load_dump, ProgramDump};
use crate::error::CliResult;
use console::style;
use linecov::{BytecodeBody, CompiledBody, Origin, TailAnalysis, TailAnalyzer};
use serde::Serialize;
use std::fmt::Write as _;

/// Tail analysis of one body, ready for rendering
#[derive(Debug, Clone, Serialize)]
pub struct BodyAnalysis {
    /// Function name or `{main}`
    pub name: String,
    /// Source file
    pub filename: String,
    /// Author
    pub origin: Origin,
    /// Analyzer decisions
    pub analysis: TailAnalysis,
    /// Distinct executable lines, ascending
    pub lines: Vec<u32>,
}

impl BodyAnalysis {
    fn of(analyzer: &TailAnalyzer, body: &BytecodeBody) -> Self {
        let mut lines = analyzer.executable_lines(body);
        lines.sort_unstable();
        lines.dedup();
        Self {
            name: body.display_name().to_string(),
            filename: body.filename().to_string(),
            origin: body.origin(),
            analysis: analyzer.inspect(body),
            lines,
        }
    }
}

/// Execute the analyze command
pub fn execute_analyze(config: &CliConfig, args: &AnalyzeArgs) -> CliResult<()> {
    let dump = load_dump(&args.dump)?;
    let analyzer = TailAnalyzer::new(config.session.trailer);
    let analyses = analyze_dump(&analyzer, &dump, args.file.as_deref());
    tracing::debug!(bodies = analyses.len(), "dump analyzed");

    let rendered = match OutputFormat::from(args.format) {
        OutputFormat::Json => serde_json::to_string_pretty(&analyses)?,
        OutputFormat::Text => render_analysis_text(&analyses),
    };
    if !config.verbosity.is_quiet() {
        super::emit(&rendered, None)?;
    }
    Ok(())
}

/// Analyze every body of `dump`, optionally only those from `file`
pub fn analyze_dump(
    analyzer: &TailAnalyzer,
    dump: &ProgramDump,
    file: Option<&str>,
) -> Vec<BodyAnalysis> {
    dump.bodies()
        .filter(|body| file.map_or(true, |f| body.filename() == f))
        .map(|body| BodyAnalysis::of(analyzer, body))
        .collect()
}

/// Render analyses as text, one block per body
pub fn render_analysis_text(analyses: &[BodyAnalysis]) -> String {
    let mut out = String::new();
    for body in analyses {
        let a = &body.analysis;
        let decision = if a.abstract_body {
            style("abstract, skipped").yellow().to_string()
        } else if a.jumps_into_trailer {
            style("trailer reachable, full scan").cyan().to_string()
        } else if a.trailer {
            style("dead trailer dropped").green().to_string()
        } else {
            "no trailer, full scan".to_string()
        };
        let _ = writeln!(
            out,
            "{} {} ({} instructions, scan {}): {decision}",
            style(&body.filename).bold(),
            body.name,
            a.len,
            a.scan_end,
        );
        let lines: Vec<String> = body.lines.iter().map(u32::to_string).collect();
        let _ = writeln!(out, "  lines: [{}]", lines.join(", "));
    }
    if out.ends_with('\n') {
        out.pop();
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use linecov::{Instruction, JumpCondition, Opcode, TrailerConfig};

    fn trailer(line: u32) -> Vec<Instruction> {
        [
            Opcode::Return,
            Opcode::StatementMarker,
            Opcode::Return,
            Opcode::HandleException,
        ]
        .into_iter()
        .map(|op| Instruction::new(op, line))
        .collect()
    }

    fn dump() -> ProgramDump {
        let mut main = vec![
            Instruction::new(Opcode::Other { code: 1 }, 10),
            Instruction::new(Opcode::Other { code: 1 }, 11),
        ];
        main.extend(trailer(12));
        let mut looping = vec![
            Instruction::new(
                Opcode::CondJump {
                    cond: JumpCondition::Zero,
                    target: 3,
                },
                20,
            ),
            Instruction::new(Opcode::Other { code: 1 }, 21),
        ];
        looping.extend(trailer(22));

        let mut dump = ProgramDump::default();
        dump.scripts.push(BytecodeBody::new("/app/a.php", main));
        dump.registry
            .add_function(BytecodeBody::new("/app/b.php", looping).with_name("spin"));
        dump
    }

    #[test]
    fn test_analyze_all_bodies() {
        let analyses = analyze_dump(&TailAnalyzer::default(), &dump(), None);
        assert_eq!(analyses.len(), 2);
        assert_eq!(analyses[0].name, "{main}");
        assert_eq!(analyses[0].lines, [10, 11]);
        assert!(analyses[0].analysis.trailer);
        assert_eq!(analyses[1].name, "spin");
        assert!(analyses[1].analysis.jumps_into_trailer);
        assert_eq!(analyses[1].lines, [20, 21, 22]);
    }

    #[test]
    fn test_filter_by_file() {
        let analyses = analyze_dump(&TailAnalyzer::default(), &dump(), Some("/app/b.php"));
        assert_eq!(analyses.len(), 1);
        assert_eq!(analyses[0].filename, "/app/b.php");
    }

    #[test]
    fn test_dead_tail_from_config() {
        let analyzer = TailAnalyzer::new(TrailerConfig { dead_tail: 3 });
        let analyses = analyze_dump(&analyzer, &dump(), Some("/app/a.php"));
        assert_eq!(analyses[0].lines, [10, 11, 12]);
    }

    #[test]
    fn test_render_text() {
        console::set_colors_enabled(false);
        let text = render_analysis_text(&analyze_dump(&TailAnalyzer::default(), &dump(), None));
        assert!(text.contains("/app/a.php {main} (6 instructions, scan 2): dead trailer dropped"));
        assert!(text.contains("lines: [10, 11]"));
        assert!(text.contains("trailer reachable, full scan"));
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn test_json_shape() {
        let analyses = analyze_dump(&TailAnalyzer::default(), &dump(), Some("/app/a.php"));
        let value = serde_json::to_value(&analyses).unwrap();
        assert_eq!(value[0]["name"], "{main}");
        assert_eq!(value[0]["origin"], "user");
        assert_eq!(value[0]["analysis"]["scan_end"], 2);
        assert_eq!(value[0]["lines"], serde_json::json!([10, 11]));
    }
}
