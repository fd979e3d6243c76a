//! Opcode Classification
//!
//! A closed set of instruction kinds the coverage analyzer cares about. Hosts
//! map their own opcode numbers onto these variants; everything the analyzer
//! does not need to distinguish becomes [`Opcode::Other`].
//!
//! Jump targets are absolute instruction indices already resolved by the host.

use serde::{Deserialize, Serialize};

/// Condition tested by a conditional jump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JumpCondition {
    /// Jump if the operand is falsy
    Zero,
    /// Jump if the operand is truthy
    NonZero,
    /// Jump if falsy, keeping the tested value as the result
    ZeroKeep,
    /// Jump if truthy, keeping the tested value as the result
    NonZeroKeep,
}

/// Instruction kind as seen by the coverage analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Opcode {
    /// No operation
    Nop,
    /// Extended no-op emitted for debugger hooks
    ExtNop,
    /// Bind a positional parameter
    Recv,
    /// Bind a parameter that has a default value
    RecvInit,
    /// Check that a class being instantiated is not abstract
    VerifyAbstractClass,
    /// Statement boundary marker emitted for debugger hooks
    StatementMarker,
    /// Return from the body
    Return,
    /// Propagate a pending exception out of the body
    HandleException,
    /// Raise the "cannot call abstract method" error
    RaiseAbstractError,
    /// Unconditional jump
    Jump {
        /// Target instruction index
        target: usize,
    },
    /// Conditional jump
    CondJump {
        /// Tested condition
        cond: JumpCondition,
        /// Target instruction index
        target: usize,
    },
    /// Two-way jump: one target when zero, another when non-zero
    Switch {
        /// Target taken when the operand is falsy
        if_zero: usize,
        /// Target taken when the operand is truthy
        if_nonzero: usize,
    },
    /// Any other instruction, carrying the host's raw opcode number
    Other {
        /// Host opcode number
        code: u16,
    },
}

impl Opcode {
    /// Bookkeeping instructions that never correspond to a source line a
    /// developer wrote
    #[must_use]
    pub const fn is_administrative(self) -> bool {
        matches!(
            self,
            Self::Nop | Self::ExtNop | Self::Recv | Self::RecvInit | Self::VerifyAbstractClass
        )
    }

    /// Whether this instruction transfers control to another index
    #[must_use]
    pub const fn is_jump(self) -> bool {
        matches!(
            self,
            Self::Jump { .. } | Self::CondJump { .. } | Self::Switch { .. }
        )
    }

    /// Resolved jump targets, empty for non-jumps
    pub fn jump_targets(self) -> impl Iterator<Item = usize> {
        let targets = match self {
            Self::Jump { target } | Self::CondJump { target, .. } => [Some(target), None],
            Self::Switch {
                if_zero,
                if_nonzero,
            } => [Some(if_zero), Some(if_nonzero)],
            _ => [None, None],
        };
        targets.into_iter().flatten()
    }
}

/// One instruction of a compiled body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    /// Instruction kind
    #[serde(flatten)]
    pub opcode: Opcode,
    /// Source line the compiler attributed to the instruction
    pub line: u32,
}

impl Instruction {
    /// Create an instruction
    #[inline]
    #[must_use]
    pub const fn new(opcode: Opcode, line: u32) -> Self {
        Self { opcode, line }
    }
}
