//! Clamp selections against a document's page count.

use tracing::{debug, warn};

use super::{PageGroup, PageSelection};

/// Resolve one selection against a document with `total_pages` pages.
///
/// Keeps only pages in `1..=total_pages`, in selection order. Returns `None`
/// when nothing survives; such a group is dropped by the caller rather than
/// treated as an error.
///
/// Ranges are clamped by their bounds, so the cost is proportional to the
/// pages that exist, never to the width of the requested range.
pub fn resolve(selection: &PageSelection, total_pages: usize) -> Option<PageGroup> {
    let last_page = u32::try_from(total_pages).unwrap_or(u32::MAX);

    match *selection {
        PageSelection::Single(page) => (1..=last_page).contains(&page).then(|| vec![page]),
        PageSelection::Range { start, end } => {
            let first = start.max(1);
            let last = end.min(last_page);
            (first <= last).then(|| (first..=last).collect())
        }
    }
}

/// Resolve every selection, dropping the ones that fall outside the document.
///
/// The surviving groups keep their original relative order.
pub fn resolve_all(selections: &[PageSelection], total_pages: usize) -> Vec<PageGroup> {
    let groups: Vec<PageGroup> = selections
        .iter()
        .filter_map(|selection| {
            let group = resolve(selection, total_pages);
            if group.is_none() {
                warn!(%selection, total_pages, "dropping selection outside the document");
            }
            group
        })
        .collect();

    debug!(
        requested = selections.len(),
        resolved = groups.len(),
        total_pages,
        "resolved page groups"
    );
    groups
}
