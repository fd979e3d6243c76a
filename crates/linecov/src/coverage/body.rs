//! Compiled Bodies
//!
//! A compiled body is the instruction sequence for a script's top level, a
//! function or a method. The analyzer only sees it through [`CompiledBody`],
//! so any VM that can report opcode kind, line and jump targets per
//! instruction can be measured.

use super::opcode::Instruction;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity of a compiled body (Poka-Yoke)
///
/// Derived from the body's handle, never from its content: two bodies with
/// identical instructions compiled separately have different ids.
///
/// Ids from [`fresh`](Self::fresh) carry the top bit, which user-space
/// addresses from [`of`](Self::of) never have, so the two sources cannot
/// collide. Handles passed to [`new`](Self::new) share the address space;
/// a host should pick one of `new` or `of` for all its bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(u64);

/// Marks ids allocated by [`BodyId::fresh`]
const FRESH_TAG: u64 = 1 << 63;

static NEXT_BODY_ID: AtomicU64 = AtomicU64::new(1);

impl BodyId {
    /// Wrap a host-provided handle value
    #[inline]
    #[must_use]
    pub const fn new(handle: u64) -> Self {
        Self(handle)
    }

    /// Derive the id from the address of a host-owned body
    ///
    /// Only meaningful while the body stays at that address.
    #[must_use]
    pub fn of<T: ?Sized>(body: &T) -> Self {
        Self((body as *const T).cast::<()>() as usize as u64)
    }

    /// Allocate a process-unique id for a body that has no stable address
    #[must_use]
    pub fn fresh() -> Self {
        Self(FRESH_TAG | NEXT_BODY_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw handle value
    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Byte-string form used as a hash table key
    #[inline]
    #[must_use]
    pub const fn to_key(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}", self.0)
    }
}

/// Who authored a body or class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Compiled from user source
    #[default]
    User,
    /// Provided by the engine or an extension
    Internal,
}

impl Origin {
    /// Whether this is user-authored code
    #[must_use]
    pub const fn is_user(self) -> bool {
        matches!(self, Self::User)
    }
}

/// Read-only view of a compiled body supplied by the host runtime
pub trait CompiledBody {
    /// Stable identity of this body
    fn id(&self) -> BodyId;

    /// Source file the body was compiled from
    fn filename(&self) -> &str;

    /// Who authored the body
    fn origin(&self) -> Origin {
        Origin::User
    }

    /// Number of instructions
    fn len(&self) -> usize;

    /// Whether the body has no instructions
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Instruction at `index`, which is always `< len()`
    fn instruction(&self, index: usize) -> Instruction;
}

/// In-memory compiled body
///
/// Deserialized bodies get a fresh identity each time, matching a fresh
/// compilation.
#[derive(Debug, Serialize, Deserialize)]
pub struct BytecodeBody {
    #[serde(skip, default = "BodyId::fresh")]
    id: BodyId,
    /// Function or method name, `None` for a script's top level
    #[serde(default)]
    pub name: Option<String>,
    /// Source file
    pub filename: String,
    /// Author
    #[serde(default)]
    pub origin: Origin,
    /// Instruction sequence
    pub instructions: Vec<Instruction>,
}

impl BytecodeBody {
    /// Create a user-authored body with a fresh identity
    #[must_use]
    pub fn new(filename: impl Into<String>, instructions: Vec<Instruction>) -> Self {
        Self {
            id: BodyId::fresh(),
            name: None,
            filename: filename.into(),
            origin: Origin::User,
            instructions,
        }
    }

    /// Set the function or method name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the author
    #[must_use]
    pub const fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// Name for diagnostics: the function name or `{main}`
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("{main}")
    }
}

impl CompiledBody for BytecodeBody {
    fn id(&self) -> BodyId {
        self.id
    }

    fn filename(&self) -> &str {
        &self.filename
    }

    fn origin(&self) -> Origin {
        self.origin
    }

    fn len(&self) -> usize {
        self.instructions.len()
    }

    fn instruction(&self, index: usize) -> Instruction {
        self.instructions[index]
    }
}
