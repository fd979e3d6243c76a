//! Coverage Table and Line Recorder
//!
//! Two levels of [`HashTable`]: filename → [`CoverageFile`], and inside each
//! file, line number → [`CoverageLine`]. Entries are created lazily on first
//! touch and never removed individually.

use super::hash_table::HashTable;

/// Default capacity hint for the file table
pub const DEFAULT_FILE_CAPACITY: usize = 32;

/// Default capacity hint for each file's line table
pub const DEFAULT_LINE_CAPACITY: usize = 128;

/// Accounting for one source line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverageLine {
    /// Line number
    pub line: u32,
    /// Times the line executed
    pub hit_count: u64,
    /// Statically discovered as executable
    pub executable: bool,
}

impl CoverageLine {
    const fn new(line: u32) -> Self {
        Self {
            line,
            hit_count: 0,
            executable: false,
        }
    }

    /// Executable but never hit
    #[must_use]
    pub const fn is_missed(&self) -> bool {
        self.executable && self.hit_count == 0
    }
}

/// Accounting for one source file
#[derive(Debug)]
pub struct CoverageFile {
    name: String,
    lines: HashTable<CoverageLine>,
}

impl CoverageFile {
    fn new(name: &str, line_capacity: usize) -> Self {
        Self {
            name: name.to_string(),
            lines: HashTable::new(line_capacity),
        }
    }

    /// File name as reported by the VM
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Look up a line
    #[must_use]
    pub fn line(&self, line: u32) -> Option<&CoverageLine> {
        self.lines.find(&line_key(line))
    }

    /// Number of distinct lines touched
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Iterate over lines in unspecified order
    pub fn lines(&self) -> impl Iterator<Item = &CoverageLine> {
        self.lines.values()
    }

    /// Lines sorted by line number
    #[must_use]
    pub fn sorted_lines(&self) -> Vec<CoverageLine> {
        let mut lines: Vec<CoverageLine> = self.lines.values().copied().collect();
        lines.sort_unstable_by_key(|l| l.line);
        lines
    }
}

/// Line keys are fixed-width so lookups never allocate
#[inline]
const fn line_key(line: u32) -> [u8; 4] {
    line.to_be_bytes()
}

fn release_file(file: CoverageFile) {
    tracing::trace!(file = %file.name, lines = file.line_count(), "releasing file coverage");
}

/// Session-scoped filename → file accounting table
#[derive(Debug)]
pub struct CoverageTable {
    files: HashTable<CoverageFile>,
    file_capacity: usize,
    line_capacity: usize,
}

impl CoverageTable {
    /// Create an empty table with the default capacity hints
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_FILE_CAPACITY, DEFAULT_LINE_CAPACITY)
    }

    /// Create an empty table with explicit capacity hints
    #[must_use]
    pub fn with_capacity(file_capacity: usize, line_capacity: usize) -> Self {
        Self {
            files: HashTable::with_destructor(file_capacity, release_file),
            file_capacity,
            line_capacity,
        }
    }

    /// Record one fact about `file:line`
    ///
    /// `executable = true` marks the line as executable without counting it;
    /// only static prefill passes `true`. `executable = false` counts one
    /// execution; only the runtime statement hook passes `false`.
    pub fn record_line(&mut self, file: &str, line: u32, executable: bool) {
        let line_capacity = self.line_capacity;
        let entry = self
            .files
            .find_or_insert_with(file.as_bytes(), || CoverageFile::new(file, line_capacity))
            .lines
            .find_or_insert_with(&line_key(line), || CoverageLine::new(line));

        if executable {
            entry.executable = true;
        } else {
            entry.hit_count += 1;
        }
    }

    /// Look up a file
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&CoverageFile> {
        self.files.find(name.as_bytes())
    }

    /// Look up a line
    #[must_use]
    pub fn line(&self, file: &str, line: u32) -> Option<&CoverageLine> {
        self.file(file).and_then(|f| f.line(line))
    }

    /// Visit every file in unspecified order
    pub fn for_each_file(&self, mut visitor: impl FnMut(&CoverageFile)) {
        self.files.for_each(|_, file| visitor(file));
    }

    /// Number of files touched
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Replace this table with a fresh empty one of the same capacity
    pub fn reset(&mut self) {
        *self = Self::with_capacity(self.file_capacity, self.line_capacity);
    }
}

impl Default for CoverageTable {
    fn default() -> Self {
        Self::new()
    }
}
