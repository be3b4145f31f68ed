//! Row and done-control extraction from a parsed schema document.
//!
//! Optional fields (`rule`, `action`) are looked up with [`resolve_field`]:
//! attribute first, then the text of a same-named child element. Required
//! fields (`type`, `text`, `property` on bool rows) must be attributes.

use crate::domain::error::{PanelError, Result};
use crate::domain::row::{DoneDescriptor, RowDescriptor, RowKind};
use crate::schema::document::{Node, SchemaDocument};

/// Resolves an optional schema field on `node`.
///
/// Returns the attribute `name` when present, even if a same-named child also
/// exists. Otherwise returns the text content of the first descendant element
/// called `name`. Returns `None` when neither exists.
///
/// # Example
///
/// ```rust
/// use settings_panel::schema::{resolve_field, SchemaDocument};
///
/// let doc = SchemaDocument::parse(r#"<row rule="a"><action>b()</action></row>"#)?;
/// assert_eq!(resolve_field(doc.root(), "rule").as_deref(), Some("a"));
/// assert_eq!(resolve_field(doc.root(), "action").as_deref(), Some("b()"));
/// assert_eq!(resolve_field(doc.root(), "missing"), None);
/// # Ok::<(), settings_panel::PanelError>(())
/// ```
#[must_use]
pub fn resolve_field(node: &Node, name: &str) -> Option<String> {
    node.attribute(name)
        .map(str::to_string)
        .or_else(|| node.find(name).map(Node::text_content))
}

fn required_attribute(node: &Node, ordinal: usize, name: &str) -> Result<String> {
    node.attribute(name).map(str::to_string).ok_or_else(|| {
        PanelError::schema(
            Some(ordinal),
            format!("missing required attribute `{name}`"),
        )
    })
}

/// Reads every `row` element of `document`, in document order.
///
/// # Errors
///
/// Returns [`PanelError::Schema`] naming the first row that lacks `type` or
/// `text`, has an unrecognised `type`, or is a bool row without `property`.
pub fn extract_rows(document: &SchemaDocument) -> Result<Vec<RowDescriptor>> {
    document
        .root()
        .find_all("row")
        .into_iter()
        .enumerate()
        .map(|(ordinal, node)| extract_row(ordinal, node))
        .collect()
}

fn extract_row(ordinal: usize, node: &Node) -> Result<RowDescriptor> {
    let kind = required_attribute(node, ordinal, "type")?
        .parse::<RowKind>()
        .map_err(|e| match e {
            PanelError::Schema { message, .. } => PanelError::schema(Some(ordinal), message),
            other => other,
        })?;
    let text = required_attribute(node, ordinal, "text")?;
    let property = match kind {
        RowKind::Bool => Some(required_attribute(node, ordinal, "property")?),
        RowKind::Link => node.attribute("property").map(str::to_string),
    };

    Ok(RowDescriptor {
        ordinal,
        kind,
        text,
        property,
        action: resolve_field(node, "action"),
        rule: resolve_field(node, "rule"),
    })
}

/// Reads the header done control from the document's own tree.
///
/// A document without a `done` element yields a control with no action.
#[must_use]
pub fn extract_done(document: &SchemaDocument) -> DoneDescriptor {
    DoneDescriptor {
        action: document
            .root()
            .find("done")
            .and_then(|node| resolve_field(node, "action")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(xml: &str) -> SchemaDocument {
        SchemaDocument::parse(xml).unwrap()
    }

    #[test]
    fn attribute_wins_over_child() {
        let doc = parse(r#"<row rule="attr"><rule>child</rule></row>"#);
        assert_eq!(resolve_field(doc.root(), "rule").as_deref(), Some("attr"));
    }

    #[test]
    fn child_text_used_when_attribute_absent() {
        let doc = parse(r#"<row><rule>child</rule></row>"#);
        assert_eq!(resolve_field(doc.root(), "rule").as_deref(), Some("child"));
    }

    #[test]
    fn absent_field_is_none() {
        let doc = parse(r#"<row text="x"/>"#);
        assert_eq!(resolve_field(doc.root(), "rule"), None);
    }

    #[test]
    fn extracts_rows_in_order() {
        let doc = parse(
            r#"
            <settings>
                <row type="link" text="About" action="open('about')"/>
                <row type="bool" text="Music" property="audio.music">
                    <rule>audio.available</rule>
                </row>
                <row type="link" text="Credits"/>
            </settings>
            "#,
        );

        let rows = extract_rows(&doc).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].kind, RowKind::Link);
        assert_eq!(rows[0].action.as_deref(), Some("open('about')"));
        assert_eq!(rows[1].ordinal, 1);
        assert_eq!(rows[1].property.as_deref(), Some("audio.music"));
        assert_eq!(rows[1].rule.as_deref(), Some("audio.available"));
        assert_eq!(rows[2].text, "Credits");
        assert_eq!(rows[2].action, None);
    }

    #[test]
    fn bool_row_requires_property_attribute() {
        let doc = parse(
            r#"<s><row type="link" text="a"/><row type="bool" text="b"><property>x</property></row></s>"#,
        );
        let err = extract_rows(&doc).unwrap_err();
        match err {
            PanelError::Schema { row, message } => {
                assert_eq!(row, Some(1));
                assert!(message.contains("property"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_text_names_row() {
        let doc = parse(r#"<s><row type="link"/></s>"#);
        assert!(matches!(
            extract_rows(&doc),
            Err(PanelError::Schema { row: Some(0), .. })
        ));
    }

    #[test]
    fn unknown_type_names_row() {
        let doc = parse(r#"<s><row type="link" text="a"/><row type="slider" text="b"/></s>"#);
        match extract_rows(&doc).unwrap_err() {
            PanelError::Schema { row, message } => {
                assert_eq!(row, Some(1));
                assert!(message.contains("slider"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn done_action_from_attribute_or_child() {
        let attr = parse(r#"<s><done action="close()"/></s>"#);
        assert_eq!(extract_done(&attr).action.as_deref(), Some("close()"));

        let child = parse(r#"<s><done><action>close()</action></done></s>"#);
        assert_eq!(extract_done(&child).action.as_deref(), Some("close()"));

        let absent = parse(r#"<s><row type="link" text="a"/></s>"#);
        assert_eq!(extract_done(&absent), DoneDescriptor::default());
    }
}
