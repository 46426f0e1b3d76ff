//! Path queries over a flattened document.
//!
//! A path is a sequence of tag names leading from a section root down
//! through nested parents, e.g. `["album", "availability", "territories"]`.
//! Misses are values, not errors: optional catalogue fields are routinely
//! absent, so callers match on `Option` instead of handling exceptions.

use crate::document::{FlattenedDocument, Record};

impl FlattenedDocument {
    /// Resolve a single record by path.
    ///
    /// `path[0]` selects a section through the root index; when several
    /// sections share the root tag, the first registered one is used. A
    /// one-element path yields that section's root record. For longer
    /// paths, the target is the record whose tag equals the last path
    /// element and whose parent index is `path.len() - 2`, consistent with
    /// the builder's indexing of one record per path level.
    ///
    /// The scan is linear over the whole section and the LAST matching
    /// record wins. Existing callers depend on both the first-section and
    /// the last-match rule, so they are kept exactly even though the
    /// last-match rule looks more like a leftover of an unconditional
    /// overwrite than a deliberate priority policy.
    ///
    /// Returns `None` when the root tag is unknown or no record matches.
    pub fn get_tag(&self, path: &[&str]) -> Option<&Record> {
        let first = *path.first()?;
        let section_index = *self.sections_rooted_at(first).first()?;
        let section = &self.sections()[section_index];

        if path.len() == 1 {
            return Some(section.root());
        }

        let expected_parent = path.len() - 2;
        let name = *path.last()?;

        let mut found = None;
        for record in section.records() {
            if record.parent == Some(expected_parent) && record.tag == name {
                found = Some(record);
            }
        }
        found
    }

    /// The root record of every section rooted at `tag`, in the order the
    /// sections were registered. Unknown tags yield an empty vector.
    pub fn get_tags(&self, tag: &str) -> Vec<&Record> {
        self.sections_rooted_at(tag)
            .iter()
            .map(|&i| self.sections()[i].root())
            .collect()
    }
}
