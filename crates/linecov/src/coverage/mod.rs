//! Line Coverage for Bytecode VMs
//!
//! Records, per source file and line, whether a line is executable and how
//! many times it ran during a measurement window.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  LINECOV ARCHITECTURE                                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  statement hook ──────────────────────────┐                     │
//! │                                           ▼                     │
//! │  body entry → Prefill Cache → Tail Analyzer → Coverage Table    │
//! │                    ▲                            │               │
//! │            Symbol-Table Walker                  ▼               │
//! │                                          Coverage Snapshot      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The statement hook counts hits. Prefill marks lines executable without
//! counting them, so lines that never ran can be reported as missed.

mod analyzer;
mod body;
mod cache;
mod hash_table;
mod opcode;
mod report;
mod session;
mod symbols;
mod table;

pub use analyzer::{TailAnalysis, TailAnalyzer, TrailerConfig, TRAILER_LEN};
pub use body::{BodyId, BytecodeBody, CompiledBody, Origin};
pub use cache::PrefillCache;
pub use hash_table::{Destructor, HashTable};
pub use opcode::{Instruction, JumpCondition, Opcode};
pub use report::{CoverageSnapshot, CoverageSummary, FileCoverage, LineStatus};
pub use session::{CoverageOptions, CoverageSession, SessionConfig, SessionConfigBuilder};
pub use symbols::{user_bodies_in, ClassDecl, ClassEntry, NoSymbols, Registry, SymbolTable};
pub use table::{
    CoverageFile, CoverageLine, CoverageTable, DEFAULT_FILE_CAPACITY, DEFAULT_LINE_CAPACITY,
};
