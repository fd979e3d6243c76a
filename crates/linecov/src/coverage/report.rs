//! Coverage Report Generation
//!
//! Snapshots a [`CoverageTable`] into per-file line sequences ordered by
//! line number. Each line carries a status:
//!
//! - `-1` (missed): executable but never hit
//! - `1` (covered): hit at least once, or touched without being marked
//!   executable

use super::table::CoverageTable;
use crate::result::{LinecovError, LinecovResult};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;

/// Reported state of one line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineStatus {
    /// Hit, or touched without being marked executable
    Covered,
    /// Executable but never hit
    Missed,
}

impl LineStatus {
    /// Integer form used by script-level callers: `1` or `-1`
    #[must_use]
    pub const fn as_i8(self) -> i8 {
        match self {
            Self::Covered => 1,
            Self::Missed => -1,
        }
    }
}

impl Serialize for LineStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.as_i8())
    }
}

/// Lines of one file, ascending by line number
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileCoverage {
    lines: Vec<(u32, LineStatus)>,
}

impl FileCoverage {
    /// (line, status) pairs in ascending line order
    #[must_use]
    pub fn lines(&self) -> &[(u32, LineStatus)] {
        &self.lines
    }

    /// Status of one line
    #[must_use]
    pub fn status(&self, line: u32) -> Option<LineStatus> {
        self.lines
            .binary_search_by_key(&line, |&(l, _)| l)
            .ok()
            .map(|idx| self.lines[idx].1)
    }

    /// Number of lines with the given status
    #[must_use]
    pub fn count(&self, status: LineStatus) -> usize {
        self.lines.iter().filter(|&&(_, s)| s == status).count()
    }

    /// Number of lines reported
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether no line is reported
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Serialized as a `line -> status` object, in line order
impl Serialize for FileCoverage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.lines.len()))?;
        for (line, status) in &self.lines {
            map.serialize_entry(line, status)?;
        }
        map.end()
    }
}

/// Coverage summary statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoverageSummary {
    /// Number of files
    pub files: usize,
    /// Number of lines reported
    pub lines: usize,
    /// Number of covered lines
    pub covered_lines: usize,
    /// Number of missed lines
    pub missed_lines: usize,
    /// Covered share of reported lines
    pub coverage_percent: f64,
}

/// Point-in-time coverage for every file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CoverageSnapshot {
    files: BTreeMap<String, FileCoverage>,
}

impl CoverageSnapshot {
    /// Build a snapshot from the table without modifying it
    #[must_use]
    pub fn from_table(table: &CoverageTable) -> Self {
        let mut files = BTreeMap::new();
        table.for_each_file(|file| {
            let lines = file
                .sorted_lines()
                .into_iter()
                .map(|l| {
                    let status = if l.is_missed() {
                        LineStatus::Missed
                    } else {
                        LineStatus::Covered
                    };
                    (l.line, status)
                })
                .collect();
            files.insert(file.name().to_string(), FileCoverage { lines });
        });
        Self { files }
    }

    /// Coverage for one file
    #[must_use]
    pub fn file(&self, name: &str) -> Option<&FileCoverage> {
        self.files.get(name)
    }

    /// Status of one line
    #[must_use]
    pub fn status(&self, file: &str, line: u32) -> Option<LineStatus> {
        self.file(file).and_then(|f| f.status(line))
    }

    /// Files in name order
    pub fn files(&self) -> impl Iterator<Item = (&str, &FileCoverage)> {
        self.files.iter().map(|(name, cov)| (name.as_str(), cov))
    }

    /// Number of files
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether no file was touched
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Get coverage summary
    #[must_use]
    pub fn summary(&self) -> CoverageSummary {
        let lines: usize = self.files.values().map(FileCoverage::len).sum();
        let missed_lines: usize = self
            .files
            .values()
            .map(|f| f.count(LineStatus::Missed))
            .sum();
        let covered_lines = lines - missed_lines;
        let coverage_percent = if lines == 0 {
            100.0 // Vacuously true
        } else {
            (covered_lines as f64 / lines as f64) * 100.0
        };
        CoverageSummary {
            files: self.files.len(),
            lines,
            covered_lines,
            missed_lines,
            coverage_percent,
        }
    }

    /// Serialize as pretty JSON: `{ file: { line: status } }`
    pub fn to_json(&self) -> LinecovResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| LinecovError::Serialization {
            message: e.to_string(),
        })
    }
}
