//! Generic attribute tree built from an XML schema document.
//!
//! The settings schema only needs element names, attributes and text content,
//! so the document is read once with `quick_xml` into a small owned [`Node`]
//! tree and the reader is dropped.

use crate::domain::error::{PanelError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Deepest element nesting accepted in a schema document.
pub const MAX_DEPTH: usize = 256;

/// One element of a parsed schema document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Node {
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
    /// Text directly inside this element (not its descendants).
    pub text: String,
}

impl Node {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the value of attribute `name`, if present.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Concatenated text of this element and all descendants, in document order.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        out.push_str(&self.text);
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// First descendant element (depth-first, document order) named `name`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Node> {
        self.children.iter().find_map(|child| {
            if child.name == name {
                Some(child)
            } else {
                child.find(name)
            }
        })
    }

    /// All descendant elements named `name`, in document order.
    #[must_use]
    pub fn find_all(&self, name: &str) -> Vec<&Node> {
        let mut found = Vec::new();
        self.collect_named(name, &mut found);
        found
    }

    fn collect_named<'a>(&'a self, name: &str, found: &mut Vec<&'a Node>) {
        for child in &self.children {
            if child.name == name {
                found.push(child);
            }
            child.collect_named(name, found);
        }
    }
}

/// A parsed schema document. Owns its root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaDocument {
    root: Node,
}

impl SchemaDocument {
    /// Parses an XML string.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::Xml`] on malformed markup, unbalanced tags,
    /// nesting deeper than [`MAX_DEPTH`] or a document without a root element.
    ///
    /// # Example
    ///
    /// ```rust
    /// use settings_panel::schema::SchemaDocument;
    ///
    /// let doc = SchemaDocument::parse(r#"<settings><row type="link" text="About"/></settings>"#)?;
    /// assert_eq!(doc.root().name, "settings");
    /// assert_eq!(doc.root().find_all("row").len(), 1);
    /// # Ok::<(), settings_panel::PanelError>(())
    /// ```
    pub fn parse(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut stack: Vec<Node> = Vec::new();
        let mut root: Option<Node> = None;
        let mut buf = Vec::new();

        loop {
            let event = reader.read_event_into(&mut buf).map_err(|e| {
                PanelError::Xml(format!("at byte {}: {e}", reader.buffer_position()))
            })?;

            match event {
                Event::Start(ref e) => {
                    if stack.len() >= MAX_DEPTH {
                        return Err(PanelError::Xml(format!(
                            "at byte {}: elements nested deeper than {MAX_DEPTH}",
                            reader.buffer_position()
                        )));
                    }
                    stack.push(Self::element(e)?);
                }
                Event::Empty(ref e) => {
                    let node = Self::element(e)?;
                    Self::attach(node, &mut stack, &mut root)?;
                }
                Event::End(_) => {
                    let node = stack
                        .pop()
                        .ok_or_else(|| PanelError::Xml("unbalanced closing tag".to_string()))?;
                    Self::attach(node, &mut stack, &mut root)?;
                }
                Event::Text(ref e) => {
                    if let Some(current) = stack.last_mut() {
                        let text = e.unescape()?;
                        current.text.push_str(&text);
                    }
                }
                Event::CData(e) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if let Some(open) = stack.last() {
            return Err(PanelError::Xml(format!("unclosed element <{}>", open.name)));
        }

        let root = root.ok_or_else(|| PanelError::Xml("document has no root element".to_string()))?;
        tracing::debug!(root = %root.name, children = root.children.len(), "schema document parsed");
        Ok(Self { root })
    }

    #[must_use]
    pub const fn root(&self) -> &Node {
        &self.root
    }

    fn element(start: &BytesStart<'_>) -> Result<Node> {
        let mut node = Node::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
        for attr in start.attributes() {
            let attr = attr.map_err(|e| PanelError::Xml(format!("attribute error: {e}")))?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            node.attributes.push((key, value));
        }
        Ok(node)
    }

    fn attach(node: Node, stack: &mut [Node], root: &mut Option<Node>) -> Result<()> {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(node);
            return Ok(());
        }
        if root.is_some() {
            return Err(PanelError::Xml(format!(
                "multiple root elements (found <{}>)",
                node.name
            )));
        }
        *root = Some(node);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_tree_with_attributes_and_text() {
        let doc = SchemaDocument::parse(
            r#"
            <settings>
                <done action="close()"/>
                <row type="bool" text="Sound" property="audio.enabled">
                    <rule>audio.available</rule>
                </row>
            </settings>
            "#,
        )
        .unwrap();

        let root = doc.root();
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.find("done").unwrap().attribute("action"), Some("close()"));

        let row = root.find("row").unwrap();
        assert_eq!(row.attribute("property"), Some("audio.enabled"));
        assert_eq!(row.find("rule").unwrap().text_content(), "audio.available");
    }

    #[test]
    fn unescapes_entities() {
        let doc = SchemaDocument::parse(
            r#"<s><row text="A &amp; B"><rule>a &lt; 3 &amp;&amp; b</rule></row></s>"#,
        )
        .unwrap();
        let row = doc.root().find("row").unwrap();
        assert_eq!(row.attribute("text"), Some("A & B"));
        assert_eq!(row.find("rule").unwrap().text_content(), "a < 3 && b");
    }

    #[test]
    fn cdata_is_text() {
        let doc = SchemaDocument::parse("<s><rule><![CDATA[a && !b]]></rule></s>").unwrap();
        assert_eq!(doc.root().find("rule").unwrap().text_content(), "a && !b");
    }

    #[test]
    fn find_all_preserves_document_order() {
        let doc = SchemaDocument::parse(
            r#"<s><row text="1"/><group><row text="2"/></group><row text="3"/></s>"#,
        )
        .unwrap();
        let texts: Vec<_> = doc
            .root()
            .find_all("row")
            .into_iter()
            .filter_map(|n| n.attribute("text"))
            .collect();
        assert_eq!(texts, vec!["1", "2", "3"]);
    }

    #[test]
    fn rejects_unbalanced_markup() {
        assert!(matches!(
            SchemaDocument::parse("<s><row></s>"),
            Err(PanelError::Xml(_))
        ));
        assert!(matches!(SchemaDocument::parse("<s>"), Err(PanelError::Xml(_))));
    }

    #[test]
    fn rejects_excessive_nesting() {
        let nested = |depth: usize| format!("{}{}", "<g>".repeat(depth), "</g>".repeat(depth));
        assert!(SchemaDocument::parse(&nested(MAX_DEPTH)).is_ok());

        let err = SchemaDocument::parse(&nested(100_000)).unwrap_err();
        assert!(matches!(err, PanelError::Xml(ref msg) if msg.contains("nested deeper")));
    }

    #[test]
    fn rejects_empty_document() {
        assert!(matches!(SchemaDocument::parse("   "), Err(PanelError::Xml(_))));
    }
}
