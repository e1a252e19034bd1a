use serde::{Deserialize, Serialize};

/// How two lines are considered equivalent.
///
/// The flags are independent; `unicode` switches the whitespace and case
/// tables used by the other flags from ASCII to Unicode semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CompareOptions {
    /// Ignore case differences in file contents.
    #[serde(default)]
    pub ignore_case: bool,
    /// Ignore changes in the amount of white space.
    #[serde(default)]
    pub ignore_space_change: bool,
    /// Ignore all white space.
    #[serde(default)]
    pub ignore_all_space: bool,
    /// Ignore changes whose lines are all blank.
    #[serde(default)]
    pub ignore_blank_lines: bool,
    /// Apply Unicode rules for white space and upper/lower case.
    #[serde(default)]
    pub unicode: bool,
}

impl CompareOptions {
    /// True when any normalizing flag is active; otherwise lines compare
    /// byte-for-byte.
    pub fn is_exact(&self) -> bool {
        !(self.ignore_case || self.ignore_space_change || self.ignore_all_space)
    }
}

/// Kind of a single edit operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Same,
    Modify,
    Insert,
    Remove,
}

/// One edit operation over half-open line ranges of both sides.
///
/// `Same` carries equal-length ranges, `Insert` has an empty side-1 range,
/// `Remove` an empty side-2 range, `Modify` two non-empty ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffOp {
    pub kind: OpKind,
    pub start1: usize,
    pub end1: usize,
    pub start2: usize,
    pub end2: usize,
}

impl DiffOp {
    pub fn new(kind: OpKind, start1: usize, end1: usize, start2: usize, end2: usize) -> Self {
        Self {
            kind,
            start1,
            end1,
            start2,
            end2,
        }
    }
}

/// Which of the four report renderers to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportStyle {
    /// Side-by-side HTML table.
    #[default]
    Html,
    /// Single-column unified HTML.
    HtmlUnified,
    /// Plain text, `NcM` change lines.
    Text,
    /// Unified text with `@@` hunk headers.
    TextUnified,
}

impl ReportStyle {
    pub fn is_html(&self) -> bool {
        matches!(self, ReportStyle::Html | ReportStyle::HtmlUnified)
    }
}

/// Rendering knobs shared by all report styles.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub style: ReportStyle,
    /// Lines of unchanged context around each change group.
    pub context_lines: usize,
    /// Report files that turn out identical.
    pub show_identical: bool,
    /// Do not compute or display changes within modified lines.
    pub suppress_line_changes: bool,
    /// Do not show content previews for files missing on one side.
    pub suppress_missing_content: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            style: ReportStyle::default(),
            context_lines: 3,
            show_identical: false,
            suppress_line_changes: false,
            suppress_missing_content: false,
        }
    }
}
