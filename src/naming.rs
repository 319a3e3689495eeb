//! Output filename allocation for split results.

use std::collections::HashMap;

/// Allocates collision-free filenames for the groups of one split.
///
/// A group gets the base name `page_{p}` when it holds one page and
/// `pages_{first}-{last}` otherwise, where `first` and `last` are taken in
/// group order. The first use of a base name yields `{base}.pdf`; the Nth
/// yields `{base}_{N}.pdf`.
///
/// An allocator is scoped to a single invocation. Two fresh allocators fed
/// the same groups in the same order produce the same names.
#[derive(Debug, Default)]
pub struct NameAllocator {
    counters: HashMap<String, u32>,
}

impl NameAllocator {
    /// Create an allocator with no names issued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the filename for the next group.
    ///
    /// `group` must be non-empty; an empty group is named `pages.pdf`.
    pub fn allocate(&mut self, group: &[u32]) -> String {
        let base = base_name(group);
        let count = self.counters.entry(base.clone()).or_insert(0);
        *count += 1;

        if *count == 1 {
            format!("{base}.pdf")
        } else {
            format!("{base}_{count}.pdf")
        }
    }

    /// Issue filenames for every group, in order.
    pub fn allocate_all<G: AsRef<[u32]>>(&mut self, groups: &[G]) -> Vec<String> {
        groups.iter().map(|g| self.allocate(g.as_ref())).collect()
    }
}

fn base_name(group: &[u32]) -> String {
    match group {
        [page] => format!("page_{page}"),
        [first, .., last] => format!("pages_{first}-{last}"),
        [] => "pages".to_string(),
    }
}
