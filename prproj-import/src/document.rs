//! Owned XML document tree.
//!
//! Premiere projects are flat graphs: every object is a direct child of the
//! document root, and objects point at each other through identifier
//! attributes rather than nesting. The tree is parsed once into an arena of
//! elements addressed by [`NodeId`], which stays valid (and cheap to copy)
//! for the lifetime of the document.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};

/// Handle to one element in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<NodeId>,
}

/// A parsed XML document, read-only after load.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Element>,
    root: NodeId,
}

impl Document {
    /// Parse a document from raw (already decompressed) XML bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(bytes);
        reader.trim_text(true);

        let mut nodes: Vec<Element> = Vec::new();
        let mut stack: Vec<usize> = Vec::new();
        let mut root: Option<usize> = None;
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(start) => {
                    let id = nodes.len();
                    nodes.push(element_from(&start)?);
                    attach(&mut nodes, &stack, &mut root, id);
                    stack.push(id);
                }
                Event::Empty(start) => {
                    let id = nodes.len();
                    nodes.push(element_from(&start)?);
                    attach(&mut nodes, &stack, &mut root, id);
                }
                Event::Text(text) => {
                    if let Some(&top) = stack.last() {
                        nodes[top].text.push_str(&text.unescape()?);
                    }
                }
                Event::CData(cdata) => {
                    if let Some(&top) = stack.last() {
                        let raw = cdata.into_inner();
                        nodes[top].text.push_str(&String::from_utf8_lossy(&raw));
                    }
                }
                Event::End(_) => {
                    stack.pop();
                }
                Event::Eof => break,
                // Declarations, comments, processing instructions.
                _ => {}
            }
            buf.clear();
        }

        let root = root.ok_or_else(|| Error::MissingElement {
            tag: "document root".into(),
            context: "input".into(),
        })?;
        Ok(Self {
            nodes,
            root: NodeId(root),
        })
    }

    /// The document's root element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Tag name of an element.
    pub fn tag(&self, id: NodeId) -> &str {
        &self.nodes[id.0].tag
    }

    /// Accumulated text content of an element (direct text only).
    pub fn text(&self, id: NodeId) -> &str {
        &self.nodes[id.0].text
    }

    /// Value of an attribute, when present.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes[id.0]
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Direct child elements, in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// First direct child with the given tag.
    pub fn child(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .find(|&child| self.tag(child) == tag)
    }

    /// Text of the first direct child with the given tag.
    pub fn child_text(&self, id: NodeId, tag: &str) -> Option<&str> {
        self.child(id, tag).map(|child| self.text(child))
    }

    /// All elements matching a slash-separated tag path, in document order.
    pub fn find_all(&self, id: NodeId, path: &str) -> Vec<NodeId> {
        let mut current = vec![id];
        for segment in path.split('/') {
            let mut next = Vec::new();
            for node in current {
                for &child in self.children(node) {
                    if self.tag(child) == segment {
                        next.push(child);
                    }
                }
            }
            current = next;
        }
        current
    }

    /// First element matching a slash-separated tag path.
    pub fn find(&self, id: NodeId, path: &str) -> Option<NodeId> {
        self.find_all(id, path).into_iter().next()
    }

    /// Like [`Self::find`], but a missing element is a parse error.
    pub(crate) fn required(&self, id: NodeId, path: &str) -> Result<NodeId> {
        self.find(id, path).ok_or_else(|| Error::MissingElement {
            tag: path.into(),
            context: self.tag(id).into(),
        })
    }

    /// Integer text content of a required child element.
    pub(crate) fn int_text(&self, id: NodeId, tag: &str) -> Result<i64> {
        let node = self.required(id, tag)?;
        let text = self.text(node).trim();
        text.parse().map_err(|_| Error::MalformedValue {
            tag: tag.into(),
            value: text.into(),
        })
    }

    /// Float text content of a required child element.
    pub(crate) fn float_text(&self, id: NodeId, tag: &str) -> Result<f64> {
        let node = self.required(id, tag)?;
        let text = self.text(node).trim();
        text.parse().map_err(|_| Error::MalformedValue {
            tag: tag.into(),
            value: text.into(),
        })
    }
}

fn element_from(start: &BytesStart<'_>) -> Result<Element> {
    let tag = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        tag,
        attributes,
        text: String::new(),
        children: Vec::new(),
    })
}

fn attach(nodes: &mut [Element], stack: &[usize], root: &mut Option<usize>, id: usize) {
    if let Some(&parent) = stack.last() {
        nodes[parent].children.push(NodeId(id));
    } else if root.is_none() {
        *root = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<PremiereData Version="3">
  <Sequence ObjectID="1">
    <Name>Seq1</Name>
    <TrackGroups>
      <TrackGroup>
        <Second ObjectRef="2"/>
      </TrackGroup>
      <TrackGroup>
        <Second ObjectRef="3"/>
      </TrackGroup>
    </TrackGroups>
  </Sequence>
  <Media ObjectUID="abc-123">
    <Start>42</Start>
  </Media>
</PremiereData>"#;

    #[test]
    fn test_root_and_children() {
        let doc = Document::from_slice(SAMPLE.as_bytes()).unwrap();
        assert_eq!(doc.tag(doc.root()), "PremiereData");
        assert_eq!(doc.attribute(doc.root(), "Version"), Some("3"));
        assert_eq!(doc.children(doc.root()).len(), 2);
    }

    #[test]
    fn test_child_text() {
        let doc = Document::from_slice(SAMPLE.as_bytes()).unwrap();
        let sequence = doc.child(doc.root(), "Sequence").unwrap();
        assert_eq!(doc.child_text(sequence, "Name"), Some("Seq1"));
        assert_eq!(doc.child_text(sequence, "Missing"), None);
    }

    #[test]
    fn test_find_all_walks_every_branch() {
        let doc = Document::from_slice(SAMPLE.as_bytes()).unwrap();
        let sequence = doc.child(doc.root(), "Sequence").unwrap();
        let seconds = doc.find_all(sequence, "TrackGroups/TrackGroup/Second");
        assert_eq!(seconds.len(), 2);
        assert_eq!(doc.attribute(seconds[0], "ObjectRef"), Some("2"));
        assert_eq!(doc.attribute(seconds[1], "ObjectRef"), Some("3"));
    }

    #[test]
    fn test_int_text() {
        let doc = Document::from_slice(SAMPLE.as_bytes()).unwrap();
        let media = doc.child(doc.root(), "Media").unwrap();
        assert_eq!(doc.int_text(media, "Start").unwrap(), 42);
        match doc.int_text(media, "Missing") {
            Err(Error::MissingElement { tag, context }) => {
                assert_eq!(tag, "Missing");
                assert_eq!(context, "Media");
            }
            other => panic!("expected MissingElement, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_int() {
        let doc = Document::from_slice(b"<R><N>abc</N></R>").unwrap();
        match doc.int_text(doc.root(), "N") {
            Err(Error::MalformedValue { tag, value }) => {
                assert_eq!(tag, "N");
                assert_eq!(value, "abc");
            }
            other => panic!("expected MalformedValue, got {other:?}"),
        }
    }

    #[test]
    fn test_not_xml_is_an_error() {
        assert!(Document::from_slice(b"\x00\x01definitely not xml").is_err());
    }

    #[test]
    fn test_empty_input_is_an_error() {
        assert!(Document::from_slice(b"").is_err());
    }
}
