//! Object lookup over the identifier graph.
//!
//! Objects are direct children of the document root and carry one of two
//! identifier attributes: `ObjectID` (primary) or `ObjectUID` (unique).
//! Reference attributes (`ObjectRef` / `ObjectURef`) point at them.
//! Resolutions are memoized so the document is scanned at most once per
//! identifier; the cache belongs to one conversion session and is never
//! shared across documents.

use std::collections::HashMap;
use std::fmt;

use crate::document::{Document, NodeId};
use crate::error::{Error, Result};

/// Which of the two identifier attribute kinds a lookup uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    /// `ObjectID`, referenced through `ObjectRef`.
    Primary,
    /// `ObjectUID`, referenced through `ObjectURef`.
    Unique,
}

impl IdKind {
    /// Attribute that declares an identifier of this kind.
    pub fn id_attribute(self) -> &'static str {
        match self {
            IdKind::Primary => "ObjectID",
            IdKind::Unique => "ObjectUID",
        }
    }

    /// Attribute that references an identifier of this kind.
    pub fn ref_attribute(self) -> &'static str {
        match self {
            IdKind::Primary => "ObjectRef",
            IdKind::Unique => "ObjectURef",
        }
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id_attribute())
    }
}

/// Memoizing index from `(identifier kind, identifier value)` to object node.
pub struct ObjectIndex<'doc> {
    doc: &'doc Document,
    primary: HashMap<String, NodeId>,
    unique: HashMap<String, NodeId>,
}

impl<'doc> ObjectIndex<'doc> {
    /// Create an empty index over a document.
    pub fn new(doc: &'doc Document) -> Self {
        Self {
            doc,
            primary: HashMap::new(),
            unique: HashMap::new(),
        }
    }

    /// Resolve an identifier to its object node.
    ///
    /// Fails with [`Error::ObjectNotFound`] when no object declares the
    /// identifier, or [`Error::ObjectMalformed`] when the declaring node has
    /// no child elements (structurally empty and unusable).
    pub fn resolve(&mut self, kind: IdKind, id: &str) -> Result<NodeId> {
        let cache = match kind {
            IdKind::Primary => &mut self.primary,
            IdKind::Unique => &mut self.unique,
        };
        if let Some(&node) = cache.get(id) {
            return Ok(node);
        }

        let attribute = kind.id_attribute();
        let node = self
            .doc
            .children(self.doc.root())
            .iter()
            .copied()
            .find(|&child| self.doc.attribute(child, attribute) == Some(id))
            .ok_or_else(|| Error::ObjectNotFound {
                kind,
                id: id.to_string(),
            })?;
        if self.doc.children(node).is_empty() {
            return Err(Error::ObjectMalformed {
                kind,
                id: id.to_string(),
            });
        }

        let cache = match kind {
            IdKind::Primary => &mut self.primary,
            IdKind::Unique => &mut self.unique,
        };
        cache.insert(id.to_string(), node);
        Ok(node)
    }

    /// Resolve a primary (`ObjectID`) identifier.
    pub fn resolve_primary(&mut self, id: &str) -> Result<NodeId> {
        self.resolve(IdKind::Primary, id)
    }

    /// Resolve a unique (`ObjectUID`) identifier.
    pub fn resolve_unique(&mut self, id: &str) -> Result<NodeId> {
        self.resolve(IdKind::Unique, id)
    }

    /// Follow a reference node to the object it points at.
    ///
    /// Tries `ObjectRef` (primary) first, then `ObjectURef` (unique); a node
    /// carrying neither is a [`Error::MissingReferenceAttribute`].
    pub fn dereference(&mut self, node: NodeId) -> Result<NodeId> {
        let doc = self.doc;
        if let Some(id) = doc.attribute(node, IdKind::Primary.ref_attribute()) {
            return self.resolve(IdKind::Primary, id);
        }
        if let Some(id) = doc.attribute(node, IdKind::Unique.ref_attribute()) {
            return self.resolve(IdKind::Unique, id);
        }
        Err(Error::MissingReferenceAttribute {
            tag: doc.tag(node).to_string(),
        })
    }

    #[cfg(test)]
    fn cached_count(&self) -> usize {
        self.primary.len() + self.unique.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"<PremiereData>
  <Clip ObjectID="1">
    <Source ObjectRef="2"/>
    <Media ObjectURef="abc"/>
    <Bare/>
  </Clip>
  <Source ObjectID="2">
    <Name>src</Name>
  </Source>
  <Media ObjectUID="abc">
    <Title>m</Title>
  </Media>
  <Empty ObjectID="3"/>
</PremiereData>"#;

    fn doc() -> Document {
        Document::from_slice(SAMPLE.as_bytes()).unwrap()
    }

    #[test]
    fn test_resolve_primary_and_unique() {
        let doc = doc();
        let mut index = ObjectIndex::new(&doc);
        let source = index.resolve_primary("2").unwrap();
        assert_eq!(doc.tag(source), "Source");
        let media = index.resolve_unique("abc").unwrap();
        assert_eq!(doc.tag(media), "Media");
    }

    #[test]
    fn test_resolution_is_memoized_and_identity_stable() {
        let doc = doc();
        let mut index = ObjectIndex::new(&doc);
        let first = index.resolve(IdKind::Primary, "2").unwrap();
        assert_eq!(index.cached_count(), 1);
        let second = index.resolve(IdKind::Primary, "2").unwrap();
        assert_eq!(first, second);
        assert_eq!(index.cached_count(), 1);
    }

    #[test]
    fn test_same_value_different_kinds_do_not_collide() {
        let doc = doc();
        let mut index = ObjectIndex::new(&doc);
        assert!(index.resolve(IdKind::Unique, "2").is_err());
        assert!(index.resolve(IdKind::Primary, "2").is_ok());
    }

    #[test]
    fn test_missing_object() {
        let doc = doc();
        let mut index = ObjectIndex::new(&doc);
        match index.resolve(IdKind::Primary, "99") {
            Err(Error::ObjectNotFound { kind, id }) => {
                assert_eq!(kind, IdKind::Primary);
                assert_eq!(id, "99");
            }
            other => panic!("expected ObjectNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_childless_object_is_malformed() {
        let doc = doc();
        let mut index = ObjectIndex::new(&doc);
        match index.resolve(IdKind::Primary, "3") {
            Err(Error::ObjectMalformed { .. }) => {}
            other => panic!("expected ObjectMalformed, got {other:?}"),
        }
    }

    #[test]
    fn test_dereference_prefers_primary() {
        let doc = doc();
        let clip = doc.child(doc.root(), "Clip").unwrap();
        let mut index = ObjectIndex::new(&doc);

        let source_ref = doc.child(clip, "Source").unwrap();
        let source = index.dereference(source_ref).unwrap();
        assert_eq!(doc.tag(source), "Source");

        let media_ref = doc.child(clip, "Media").unwrap();
        let media = index.dereference(media_ref).unwrap();
        assert_eq!(doc.tag(media), "Media");
    }

    #[test]
    fn test_dereference_without_ref_attributes() {
        let doc = doc();
        let clip = doc.child(doc.root(), "Clip").unwrap();
        let bare = doc.child(clip, "Bare").unwrap();
        let mut index = ObjectIndex::new(&doc);
        match index.dereference(bare) {
            Err(Error::MissingReferenceAttribute { tag }) => assert_eq!(tag, "Bare"),
            other => panic!("expected MissingReferenceAttribute, got {other:?}"),
        }
    }
}
