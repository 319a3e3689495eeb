//! Page selection: turning user text into page groups.
//!
//! A range specification such as `"1,3-5,1"` is scanned into an ordered list
//! of [`PageSelection`]s by [`parse_selections`]. Each selection is later
//! clamped against a concrete page count by [`resolve`], yielding a
//! [`PageGroup`] of 1-based page numbers or nothing at all.
//!
//! Selections stay compact until resolved, so `1-4000000000` costs two
//! integers to hold and at most one entry per existing page to resolve.

mod parser;
mod resolver;

pub use parser::parse_selections;
pub use resolver::{resolve, resolve_all};

use std::fmt;

/// Ordered, 1-based page numbers for one output document.
///
/// Order follows the selection that produced it. Duplicates are kept.
pub type PageGroup = Vec<u32>;

/// One matched unit of a range specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageSelection {
    /// A single page, e.g. `7`.
    Single(u32),
    /// An inclusive range with `start <= end`, e.g. `2-5`.
    Range {
        /// First page of the range.
        start: u32,
        /// Last page of the range.
        end: u32,
    },
}

impl PageSelection {
    /// Build a range selection, swapping reversed bounds.
    pub fn range(a: u32, b: u32) -> Self {
        Self::Range {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Number of pages this selection names before clamping.
    pub fn raw_len(&self) -> u64 {
        match *self {
            Self::Single(_) => 1,
            Self::Range { start, end } => u64::from(end - start) + 1,
        }
    }
}

impl fmt::Display for PageSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(page) => write!(f, "{page}"),
            Self::Range { start, end } => write!(f, "{start}-{end}"),
        }
    }
}
