use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Mismatch records
// ---------------------------------------------------------------------------

/// Sentinel reported when a keyed counterpart row does not exist on one
/// side. Never equal to any folded field value; renderers print it
/// literally.
pub const MISSING: &str = "<missing>";

/// Where a mismatch was found: the zero-based row index under positional
/// alignment, or the ordered key-column values of the row under keyed
/// alignment. Single-column keys are a one-element tuple.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Locator {
    Row(usize),
    Key(Vec<String>),
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row(index) => write!(f, "row {index}"),
            Self::Key(parts) => write!(f, "key ({})", parts.join(", ")),
        }
    }
}

/// One detected inequality for a (locator, column) pair.
///
/// `left` and `right` carry the values as loaded (pre-fold), or the
/// `<missing>` sentinel, so a mismatch caused purely by casing still
/// surfaces the real source strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    pub locator: Locator,
    pub column: String,
    pub left: String,
    pub right: String,
}

// ---------------------------------------------------------------------------
// Summary + Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignMode {
    Positional,
    Keyed,
}

impl fmt::Display for AlignMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positional => write!(f, "positional"),
            Self::Keyed => write!(f, "keyed"),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconSummary {
    pub left_rows: usize,
    pub right_rows: usize,
    /// Aligned row count (positional) or key-union size (keyed).
    pub compared: usize,
    /// Keys present only on the left side; 0 under positional alignment.
    pub left_only: usize,
    /// Keys present only on the right side; 0 under positional alignment.
    pub right_only: usize,
    pub mismatches: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub mode: AlignMode,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconReport {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub mismatches: Vec<Mismatch>,
}
