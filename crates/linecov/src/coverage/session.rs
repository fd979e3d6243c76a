//! Coverage Session
//!
//! One measurement context: the coverage table, the prefill cache and the
//! start/stop lifecycle. The host owns one session per interpreter and calls
//! its hooks from the single thread that drives that interpreter.

use super::analyzer::{TailAnalyzer, TrailerConfig};
use super::body::CompiledBody;
use super::cache::PrefillCache;
use super::report::CoverageSnapshot;
use super::symbols::{user_bodies_in, NoSymbols, SymbolTable};
use super::table::{CoverageTable, DEFAULT_FILE_CAPACITY, DEFAULT_LINE_CAPACITY};
use crate::result::{LinecovError, LinecovResult};
use serde::{Deserialize, Serialize};

/// Options accepted by [`CoverageSession::start`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CoverageOptions(u32);

impl CoverageOptions {
    /// No options
    pub const NONE: Self = Self(0);
    /// Also report executable lines that never ran
    pub const UNUSED: Self = Self(1);

    /// Build from the raw integer a script passed
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw integer form
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Whether every flag in `other` is set
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Host emits statement markers; coverage cannot start without them
    pub extended_info: bool,
    /// Capacity hint for the file table
    pub file_capacity: usize,
    /// Capacity hint for each file's line table
    pub line_capacity: usize,
    /// Dead trailer policy
    pub trailer: TrailerConfig,
}

impl SessionConfig {
    /// Create a builder for session config
    #[must_use]
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            extended_info: true,
            file_capacity: DEFAULT_FILE_CAPACITY,
            line_capacity: DEFAULT_LINE_CAPACITY,
            trailer: TrailerConfig::default(),
        }
    }
}

/// Builder for session configuration
#[derive(Debug, Default)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    /// Set whether the host runs with extended debug info
    #[must_use]
    pub const fn extended_info(mut self, enabled: bool) -> Self {
        self.config.extended_info = enabled;
        self
    }

    /// Set the file table capacity hint
    #[must_use]
    pub const fn file_capacity(mut self, capacity: usize) -> Self {
        self.config.file_capacity = capacity;
        self
    }

    /// Set the per-file line table capacity hint
    #[must_use]
    pub const fn line_capacity(mut self, capacity: usize) -> Self {
        self.config.line_capacity = capacity;
        self
    }

    /// Set how many trailing instructions a dead trailer drops
    ///
    /// Clamped to `1..=TRAILER_LEN`.
    #[must_use]
    pub const fn dead_tail(mut self, instructions: usize) -> Self {
        self.config.trailer = TrailerConfig {
            dead_tail: instructions,
        }
        .clamped();
        self
    }

    /// Build the configuration
    #[must_use]
    pub fn build(self) -> SessionConfig {
        self.config
    }
}

/// Coverage state for one interpreter
#[derive(Debug)]
pub struct CoverageSession {
    /// Configuration
    config: SessionConfig,
    /// Accumulated line data
    table: CoverageTable,
    /// Bodies already prefilled this window
    cache: PrefillCache,
    /// Static analyzer
    analyzer: TailAnalyzer,
    /// Measurement window open
    collecting: bool,
    /// Prefill bodies on entry
    track_unused: bool,
    /// Function entries reported by the host
    function_count: u64,
}

impl CoverageSession {
    /// Create a session with the given configuration
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            table: CoverageTable::with_capacity(config.file_capacity, config.line_capacity),
            cache: PrefillCache::new(),
            analyzer: TailAnalyzer::new(config.trailer),
            config,
            collecting: false,
            track_unused: false,
            function_count: 0,
        }
    }

    /// Open a measurement window
    ///
    /// Refused when the host runs without extended debug info; the session
    /// then stays idle.
    pub fn start(&mut self, options: CoverageOptions) -> LinecovResult<()> {
        self.track_unused = options.contains(CoverageOptions::UNUSED);

        if !self.config.extended_info {
            tracing::warn!("code coverage requested without extended debug info");
            return Err(LinecovError::ExtendedInfoDisabled);
        }
        self.collecting = true;
        tracing::debug!(track_unused = self.track_unused, "coverage started");
        Ok(())
    }

    /// Close the measurement window
    ///
    /// With `cleanup` the collected data is discarded; without it the data
    /// stays readable through [`coverage`](Self::coverage). Does nothing
    /// if no window is open.
    pub fn stop(&mut self, cleanup: bool) {
        if !self.collecting {
            return;
        }
        if cleanup {
            self.reset();
        }
        self.collecting = false;
        tracing::debug!(cleanup, "coverage stopped");
    }

    /// Snapshot of everything recorded so far
    #[must_use]
    pub fn coverage(&self) -> CoverageSnapshot {
        CoverageSnapshot::from_table(&self.table)
    }

    /// Number of function entries reported through
    /// [`enter_function`](Self::enter_function)
    #[must_use]
    pub fn function_count(&self) -> u64 {
        self.function_count
    }

    /// Count one function entry
    pub fn enter_function(&mut self) {
        self.function_count += 1;
    }

    /// Statement hook: count one execution of `file:line`
    ///
    /// Ignored outside a measurement window.
    #[inline]
    pub fn on_statement(&mut self, file: &str, line: u32) {
        if self.collecting {
            self.table.record_line(file, line, false);
        }
    }

    /// Body entry hook: prefill `body` and its file's other bodies
    ///
    /// Only runs inside a window opened with [`CoverageOptions::UNUSED`].
    pub fn on_body_entered<S>(&mut self, body: &dyn CompiledBody, symbols: &S) -> usize
    where
        S: SymbolTable + ?Sized,
    {
        if self.collecting && self.track_unused {
            self.prefill(body, symbols)
        } else {
            0
        }
    }

    /// Prefill `body`, then every other user body from the same file
    ///
    /// If `body` was already prefilled in this window nothing happens, the
    /// file walk included. Ignored outside a measurement window, so the
    /// cache never carries claims into the next one. Returns the number of
    /// instructions recorded.
    pub fn prefill<S>(&mut self, body: &dyn CompiledBody, symbols: &S) -> usize
    where
        S: SymbolTable + ?Sized,
    {
        if !self.collecting || !self.cache.try_begin(body.id()) {
            return 0;
        }
        let mut recorded = self.analyzer.prefill(body, &mut self.table);

        for found in user_bodies_in(symbols, body.filename()) {
            if self.cache.try_begin(found.id()) {
                recorded += self.analyzer.prefill(found, &mut self.table);
            }
        }
        recorded
    }

    /// Prefill a single body without walking any registry
    pub fn prefill_body(&mut self, body: &dyn CompiledBody) -> usize {
        self.prefill(body, &NoSymbols)
    }

    /// Record one fact directly; see [`CoverageTable::record_line`]
    pub fn record_line(&mut self, file: &str, line: u32, executable: bool) {
        self.table.record_line(file, line, executable);
    }

    /// Discard all data and forget which bodies were prefilled
    pub fn reset(&mut self) {
        self.table.reset();
        self.cache.clear();
        tracing::debug!("coverage table reset");
    }

    /// Check if a measurement window is open
    #[must_use]
    pub fn is_collecting(&self) -> bool {
        self.collecting
    }

    /// Check if unused-line tracking was requested
    #[must_use]
    pub fn tracks_unused(&self) -> bool {
        self.track_unused
    }

    /// Get the underlying table
    #[must_use]
    pub fn table(&self) -> &CoverageTable {
        &self.table
    }

    /// Get the prefill cache
    #[must_use]
    pub fn cache(&self) -> &PrefillCache {
        &self.cache
    }

    /// Get the configuration
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

impl Default for CoverageSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
