//! Permissive range-specification scanner.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::PageSelection;
use crate::error::{PdfKnifeError, Result};

// ASCII digits only; `\d` in the regex crate also matches other scripts.
static RE_SELECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+)(?:-([0-9]+))?").expect("valid page selection regex")
});

/// Scan free text for page numbers and ranges.
///
/// Every maximal match of `N` or `N-M` becomes one selection, in input
/// order; all other characters are ignored. Separators are therefore
/// tolerated rather than validated:
///
/// - `"1--3"` yields `1` and `3`
/// - `"1-2-3"` yields `1-2` and `3`
/// - `"[[1],[2,3]]"` yields `1`, `2` and `3`
///
/// Reversed ranges are swapped, and numbers too large for `u32` saturate to
/// `u32::MAX`, which no document can satisfy.
///
/// # Errors
///
/// Returns [`PdfKnifeError::EmptySelection`] if the input contains no digits.
///
/// # Examples
///
/// ```
/// use pdfknife::selection::{PageSelection, parse_selections};
///
/// let selections = parse_selections("1, 5-2").unwrap();
/// assert_eq!(
///     selections,
///     vec![PageSelection::Single(1), PageSelection::Range { start: 2, end: 5 }]
/// );
/// ```
pub fn parse_selections(input: &str) -> Result<Vec<PageSelection>> {
    let selections: Vec<PageSelection> = RE_SELECTION
        .captures_iter(input)
        .map(|caps| {
            let first = parse_page_number(&caps[1]);
            match caps.get(2) {
                Some(last) => PageSelection::range(first, parse_page_number(last.as_str())),
                None => PageSelection::Single(first),
            }
        })
        .collect();

    if selections.is_empty() {
        return Err(PdfKnifeError::EmptySelection {
            input: input.to_string(),
        });
    }

    debug!(count = selections.len(), "parsed page selections");
    Ok(selections)
}

/// Parse a run of ASCII digits, saturating on overflow.
fn parse_page_number(digits: &str) -> u32 {
    digits.parse().unwrap_or(u32::MAX)
}
