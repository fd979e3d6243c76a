//! linecov: Line Coverage Engine for Bytecode Virtual Machines
//!
//! Records, per source file and line, whether a line is executable and how
//! many times it executed while a measurement window was open.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    LINECOV Architecture                          │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐            │
//! │   │ Host VM    │    │ Coverage   │    │ Coverage   │            │
//! │   │ hooks      │───►│ Session    │───►│ Snapshot   │            │
//! │   │            │    │            │    │            │            │
//! │   └────────────┘    └────────────┘    └────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use linecov::{BytecodeBody, CoverageOptions, CoverageSession, Instruction, LineStatus, Opcode};
//!
//! let body = BytecodeBody::new(
//!     "/app/index.php",
//!     vec![
//!         Instruction::new(Opcode::Other { code: 0 }, 3),
//!         Instruction::new(Opcode::Other { code: 0 }, 4),
//!         Instruction::new(Opcode::Return, 5),
//!         Instruction::new(Opcode::StatementMarker, 5),
//!         Instruction::new(Opcode::Return, 5),
//!         Instruction::new(Opcode::HandleException, 5),
//!     ],
//! );
//!
//! let mut session = CoverageSession::default();
//! session.start(CoverageOptions::UNUSED).unwrap();
//! session.prefill_body(&body);
//! session.on_statement("/app/index.php", 3);
//!
//! let snapshot = session.coverage();
//! assert_eq!(snapshot.status("/app/index.php", 3), Some(LineStatus::Covered));
//! assert_eq!(snapshot.status("/app/index.php", 4), Some(LineStatus::Missed));
//! assert_eq!(snapshot.status("/app/index.php", 5), None);
//! ```

#![warn(missing_docs)]

/// Line coverage collection
///
/// Coverage table, tail analyzer, prefill cache, symbol walker and reports.
#[allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_const_for_fn,
    clippy::missing_errors_doc,
    clippy::doc_markdown,
    clippy::cast_precision_loss,
    clippy::missing_panics_doc
)]
pub mod coverage;
mod result;

pub use coverage::{
    user_bodies_in, BodyId, BytecodeBody, ClassDecl, ClassEntry, CompiledBody, CoverageFile,
    CoverageLine, CoverageOptions, CoverageSession, CoverageSnapshot, CoverageSummary,
    CoverageTable, FileCoverage, Instruction, JumpCondition, LineStatus, NoSymbols, Opcode,
    Origin, PrefillCache, Registry, SessionConfig, SessionConfigBuilder, SymbolTable,
    TailAnalysis, TailAnalyzer, TrailerConfig,
};
pub use result::{LinecovError, LinecovResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::coverage::{
        BytecodeBody, CompiledBody, CoverageOptions, CoverageSession, CoverageSnapshot,
        Instruction, LineStatus, Opcode, Registry, SymbolTable,
    };
    pub use super::result::{LinecovError, LinecovResult};
}
