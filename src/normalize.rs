//! Per-field normalization rules.
//!
//! The service emits namespace-qualified tag names and text padded with the
//! whitespace of the surrounding markup. Normalization is applied on read:
//! the stored raw records are never mutated, and normalizing an already
//! normalized value is a no-op.

use crate::document::{FlattenedDocument, Record};

/// Strip a `{namespace}` qualifier from a raw tag name, returning the local
/// part. Tags without a qualifier are returned unchanged.
pub fn local_name(raw: &str) -> &str {
    match raw.split_once('}') {
        Some((prefix, local)) if prefix.starts_with('{') => local,
        _ => raw,
    }
}

/// Trim the spaces and newlines the service's pretty-printing leaves around
/// text content. Other whitespace is deliberately preserved.
pub fn clean_text(raw: &str) -> &str {
    raw.trim_matches([' ', '\n'])
}

impl Record {
    /// A copy of this record with its tag and text normalized. Attributes
    /// and the parent reference pass through unchanged.
    pub fn normalized(&self) -> Record {
        Record {
            tag: local_name(&self.tag).to_string(),
            text: self.text.as_deref().map(|t| clean_text(t).to_string()),
            attributes: self.attributes.clone(),
            parent: self.parent,
        }
    }
}

impl FlattenedDocument {
    /// A normalized copy of the whole document: same sections, same parent
    /// references, same root index, with every record's tag and text
    /// normalized.
    pub fn normalized(&self) -> FlattenedDocument {
        self.map_records(Record::normalized)
    }
}
