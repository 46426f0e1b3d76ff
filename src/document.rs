//! Flattened Document Representation
//!
//! This module turns a parsed XML tree into an addressable structure: an
//! ordered list of sections, one per direct child of the document's base
//! element, where each section is a flat list of records carrying integer
//! back-references to their parent within the same section. The original
//! tree is not retained; queries run over the flattened structure.

use std::collections::HashMap;
use std::sync::OnceLock;

use log::debug;
use roxmltree::{Node, NodeId};

use crate::error::DocumentError;
use crate::normalize;

/// One flattened XML element.
///
/// `tag` and `text` are stored exactly as parsed; namespace qualifiers keep
/// the `{namespace}local` form and text keeps its surrounding whitespace.
/// Use the normalized view of the document for cleaned-up values.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Element tag name, `{namespace}local` when the element is namespaced.
    pub tag: String,
    /// Direct text content of the element, if any.
    pub text: Option<String>,
    /// Attribute name/value pairs.
    pub attributes: HashMap<String, String>,
    /// Index of this record's parent within the same section; `None` for
    /// section roots.
    pub parent: Option<usize>,
}

impl Record {
    /// Convenience accessor for a single attribute value.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }
}

/// An independent group of records descending from one direct child of the
/// base element. Index 0 is always the section root, and every `parent`
/// index refers to an earlier position in the same section.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    records: Vec<Record>,
}

impl Section {
    /// The section's root record (index 0).
    pub fn root(&self) -> &Record {
        &self.records[0]
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records in the section, never less than one: a section
    /// only exists once its root record is in place.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.records.len()
    }
}

/// A complete flattened document: the base tag, the ordered sections, and a
/// root index mapping root tag names to the sections they open.
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenedDocument {
    base_tag: String,
    sections: Vec<Section>,
    roots: HashMap<String, Vec<usize>>,
}

impl FlattenedDocument {
    /// Flatten a parsed XML tree.
    ///
    /// Elements are consumed in document order. The document's single base
    /// element is recorded but not materialized as a record; each of its
    /// direct children opens a new section, and every deeper element is
    /// appended to the most recently opened section with its parent resolved
    /// by node identity.
    ///
    /// This relies on each top-level subtree appearing contiguously before
    /// the next sibling begins, which holds for any well-formed XML tree
    /// walked in document order. A parent that cannot be resolved inside the
    /// current section is reported as
    /// [`DocumentError::InconsistentStructure`]; no partial document is ever
    /// produced.
    pub fn build(doc: &roxmltree::Document) -> Result<Self, DocumentError> {
        let parents = parent_map(doc);

        let mut base: Option<(NodeId, String)> = None;
        let mut sections: Vec<Section> = Vec::new();
        let mut roots: HashMap<String, Vec<usize>> = HashMap::new();
        // Node ids of the records in the most recently opened section, used
        // only during the build to resolve parent indices.
        let mut current_ids: Vec<NodeId> = Vec::new();

        for node in doc.root_element().descendants().filter(Node::is_element) {
            let tag = raw_tag(&node);

            match parents.get(&node.id()).copied() {
                // No parent: this is the document's base element.
                None => {
                    base = Some((node.id(), tag));
                }
                // Direct child of the base element: opens a new section.
                Some(pid) if Some(pid) == base.as_ref().map(|(id, _)| *id) => {
                    let index = sections.len();
                    sections.push(Section {
                        records: vec![record_for(&node, tag.clone(), None)],
                    });
                    current_ids.clear();
                    current_ids.push(node.id());

                    // Register the section under both the full tag name and
                    // the namespace-stripped one, so root lookups work on
                    // the raw view as well.
                    roots.entry(tag.clone()).or_default().push(index);
                    let local = normalize::local_name(&tag);
                    if local != tag {
                        roots.entry(local.to_string()).or_default().push(index);
                    }
                }
                // Nested element: belongs to the most recently opened
                // section.
                Some(pid) => {
                    let parent = current_ids.iter().position(|&id| id == pid).ok_or_else(
                        || DocumentError::InconsistentStructure { tag: tag.clone() },
                    )?;
                    let section = sections
                        .last_mut()
                        .ok_or_else(|| DocumentError::InconsistentStructure {
                            tag: tag.clone(),
                        })?;
                    section.records.push(record_for(&node, tag, Some(parent)));
                    current_ids.push(node.id());
                }
            }
        }

        let base_tag = base.map(|(_, tag)| tag).unwrap_or_default();
        debug!(
            "flattened document: base <{}>, {} section(s)",
            base_tag,
            sections.len()
        );

        Ok(Self {
            base_tag,
            sections,
            roots,
        })
    }

    /// Tag name of the document's base element. The base element itself is
    /// never a record; its direct children are the section roots.
    pub fn base_tag(&self) -> &str {
        &self.base_tag
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Indices of the sections whose root record carries `tag`, in the order
    /// the sections were opened. Unknown tags yield an empty slice. Only
    /// root tags are indexed; nested tags go through
    /// [`FlattenedDocument::get_tag`](crate::FlattenedDocument::get_tag).
    pub fn sections_rooted_at(&self, tag: &str) -> &[usize] {
        self.roots.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn map_records(&self, f: impl Fn(&Record) -> Record) -> Self {
        Self {
            base_tag: normalize::local_name(&self.base_tag).to_string(),
            sections: self
                .sections
                .iter()
                .map(|s| Section {
                    records: s.records.iter().map(&f).collect(),
                })
                .collect(),
            roots: self.roots.clone(),
        }
    }
}

/// An interpreted service response holding the raw flattened document and a
/// lazily computed normalized view. The normalized view is computed at most
/// once and cached for the lifetime of the value; the raw view is never
/// touched by normalization.
#[derive(Debug)]
pub struct InterpretedDocument {
    raw: FlattenedDocument,
    normalized: OnceLock<FlattenedDocument>,
}

impl InterpretedDocument {
    /// Parse and flatten an XML document in one step.
    pub fn parse(xml: &str) -> Result<Self, DocumentError> {
        let doc = roxmltree::Document::parse(xml)?;
        Self::from_tree(&doc)
    }

    /// Flatten an already-parsed XML tree.
    pub fn from_tree(doc: &roxmltree::Document) -> Result<Self, DocumentError> {
        Ok(Self {
            raw: FlattenedDocument::build(doc)?,
            normalized: OnceLock::new(),
        })
    }

    /// The flattened document exactly as parsed.
    pub fn raw(&self) -> &FlattenedDocument {
        &self.raw
    }

    /// The normalized view: namespace qualifiers stripped from tag names,
    /// text trimmed. Computed on first access and cached.
    pub fn normalized(&self) -> &FlattenedDocument {
        self.normalized.get_or_init(|| self.raw.normalized())
    }
}

/// Map every element to its immediate parent element, keyed by the parser's
/// stable per-node id. The traversal order is irrelevant; document order is
/// re-imposed by [`FlattenedDocument::build`].
fn parent_map(doc: &roxmltree::Document) -> HashMap<NodeId, NodeId> {
    let mut map = HashMap::new();
    for parent in doc.root_element().descendants().filter(Node::is_element) {
        for child in parent.children().filter(Node::is_element) {
            map.insert(child.id(), parent.id());
        }
    }
    map
}

/// Raw tag name in the `{namespace}local` form the service emits for
/// namespaced elements.
fn raw_tag(node: &Node) -> String {
    match node.tag_name().namespace() {
        Some(ns) => format!("{{{}}}{}", ns, node.tag_name().name()),
        None => node.tag_name().name().to_string(),
    }
}

fn record_for(node: &Node, tag: String, parent: Option<usize>) -> Record {
    let attributes = node
        .attributes()
        .map(|a| {
            let name = match a.namespace() {
                Some(ns) => format!("{{{}}}{}", ns, a.name()),
                None => a.name().to_string(),
            };
            (name, a.value().to_string())
        })
        .collect();

    Record {
        tag,
        text: node.text().map(str::to_string),
        attributes,
        parent,
    }
}
