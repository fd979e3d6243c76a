//! Bytecode Tail Analyzer
//!
//! Discovers the executable lines of a compiled body without running it.
//!
//! Compilers append a fixed trailer to every body so that it has a single
//! exit even when the source has none:
//!
//! ```text
//!   ...              <- last instruction the developer wrote (boundary)
//!   RETURN           \
//!   STATEMENT_MARKER  |  synthetic trailer
//!   RETURN            |
//!   HANDLE_EXCEPTION /
//! ```
//!
//! The trailer only carries real source lines when some jump lands in it,
//! i.e. an explicit `return` was compiled as a forward jump to the shared
//! exit. Otherwise it is excluded so it does not show up as never-executed
//! code.

use super::body::CompiledBody;
use super::opcode::Opcode;
use super::table::CoverageTable;
use serde::{Deserialize, Serialize};

/// Trailer pattern, in order, as the last instructions of a body
const TRAILER: [Opcode; 4] = [
    Opcode::Return,
    Opcode::StatementMarker,
    Opcode::Return,
    Opcode::HandleException,
];

/// Number of instructions in the synthetic trailer
pub const TRAILER_LEN: usize = TRAILER.len();

/// Offset from the end of the instruction that marks an abstract body
const ABSTRACT_MARKER_FROM_END: usize = 4;

/// How much of a dead trailer is excluded from the scan
///
/// Kept separate from [`TRAILER_LEN`]: the trailer is detected by a 4-opcode
/// pattern but the excluded tail is a policy knob. The analyzer clamps it to
/// `1..=TRAILER_LEN` so it never reaches past the trailer into developer code
/// and always drops the final `HANDLE_EXCEPTION`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrailerConfig {
    /// Instructions dropped from the end when nothing jumps into the trailer
    pub dead_tail: usize,
}

impl TrailerConfig {
    /// Smallest accepted `dead_tail`
    pub const MIN_DEAD_TAIL: usize = 1;
    /// Largest accepted `dead_tail`
    pub const MAX_DEAD_TAIL: usize = TRAILER_LEN;

    /// Whether `dead_tail` is within `MIN_DEAD_TAIL..=MAX_DEAD_TAIL`
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.dead_tail >= Self::MIN_DEAD_TAIL && self.dead_tail <= Self::MAX_DEAD_TAIL
    }

    /// Copy with `dead_tail` forced into the accepted range
    #[must_use]
    pub const fn clamped(self) -> Self {
        let dead_tail = if self.dead_tail < Self::MIN_DEAD_TAIL {
            Self::MIN_DEAD_TAIL
        } else if self.dead_tail > Self::MAX_DEAD_TAIL {
            Self::MAX_DEAD_TAIL
        } else {
            self.dead_tail
        };
        Self { dead_tail }
    }
}

impl Default for TrailerConfig {
    fn default() -> Self {
        Self {
            dead_tail: TRAILER_LEN,
        }
    }
}

/// Decisions taken for one body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TailAnalysis {
    /// Instruction count
    pub len: usize,
    /// Body is an abstract method stub; nothing is recorded
    pub abstract_body: bool,
    /// The synthetic trailer was found at the end
    pub trailer: bool,
    /// Some jump targets an index inside the trailer
    pub jumps_into_trailer: bool,
    /// Instructions `[0, scan_end)` are considered
    pub scan_end: usize,
}

/// Static analyzer for compiled bodies
#[derive(Debug, Clone, Copy, Default)]
pub struct TailAnalyzer {
    config: TrailerConfig,
}

impl TailAnalyzer {
    /// Create an analyzer with the given trailer policy
    ///
    /// An out-of-range `dead_tail` is clamped; see [`TrailerConfig::clamped`].
    #[must_use]
    pub const fn new(config: TrailerConfig) -> Self {
        Self {
            config: config.clamped(),
        }
    }

    /// Get the trailer policy
    #[must_use]
    pub const fn config(&self) -> TrailerConfig {
        self.config
    }

    /// Decide which instruction range of `body` holds source lines
    #[must_use]
    pub fn inspect(&self, body: &dyn CompiledBody) -> TailAnalysis {
        let len = body.len();
        let mut analysis = TailAnalysis {
            len,
            abstract_body: false,
            trailer: false,
            jumps_into_trailer: false,
            scan_end: len,
        };

        if let Some(marker) = len.checked_sub(ABSTRACT_MARKER_FROM_END) {
            if body.instruction(marker).opcode == Opcode::RaiseAbstractError {
                analysis.abstract_body = true;
                analysis.scan_end = 0;
                return analysis;
            }
        }

        let Some(trailer_start) = len.checked_sub(TRAILER_LEN) else {
            return analysis;
        };
        analysis.trailer = (0..TRAILER_LEN)
            .all(|i| body.instruction(trailer_start + i).opcode == TRAILER[i]);
        if !analysis.trailer {
            return analysis;
        }

        // Landing anywhere past the boundary means landing in the trailer.
        analysis.jumps_into_trailer = (0..len)
            .flat_map(|i| body.instruction(i).opcode.jump_targets())
            .any(|target| target >= trailer_start);

        if !analysis.jumps_into_trailer {
            analysis.scan_end = len.saturating_sub(self.config.dead_tail);
        }
        analysis
    }

    /// Lines of `body` that are executable, in instruction order
    ///
    /// A line appears once per contributing instruction.
    #[must_use]
    pub fn executable_lines(&self, body: &dyn CompiledBody) -> Vec<u32> {
        let analysis = self.inspect(body);
        (0..analysis.scan_end)
            .map(|i| body.instruction(i))
            .filter(|instr| !instr.opcode.is_administrative())
            .map(|instr| instr.line)
            .collect()
    }

    /// Mark every executable line of `body` in `table`
    ///
    /// Returns the number of instructions recorded.
    pub fn prefill(&self, body: &dyn CompiledBody, table: &mut CoverageTable) -> usize {
        let filename = body.filename();
        let lines = self.executable_lines(body);
        for &line in &lines {
            table.record_line(filename, line, true);
        }
        tracing::trace!(
            file = filename,
            body = %body.id(),
            instructions = body.len(),
            recorded = lines.len(),
            "prefilled body"
        );
        lines.len()
    }
}
