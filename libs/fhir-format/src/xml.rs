//! XML writer
//!
//! Serialize only. Primitives become self-closing elements carrying a `value`
//! attribute, complex values wrap their children in schema order, lists repeat
//! the element, and a resource root is named after its type. The namespace is
//! declared on the root element only.

use crate::error::{FormatError, Result};
use crate::layout::{layout, Slot};
use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::Writer;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::io::Cursor;
use tessera_models::{ComplexNode, Element, ResourceNode};
use tessera_schema::{registry, SchemaRegistry};

pub const FHIR_NS: &str = "http://hl7.org/fhir";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XmlOptions {
    /// Spaces per nesting level; `None` writes everything on one line.
    pub indent: Option<usize>,
    /// Declare [`FHIR_NS`] on the root element.
    pub namespace: bool,
}

impl Default for XmlOptions {
    fn default() -> Self {
        Self {
            indent: Some(2),
            namespace: true,
        }
    }
}

impl XmlOptions {
    pub fn compact() -> Self {
        Self {
            indent: None,
            ..Self::default()
        }
    }
}

type XmlWriter = Writer<Cursor<Vec<u8>>>;

pub struct XmlSerializer<'r> {
    registry: &'r SchemaRegistry,
    options: XmlOptions,
}

impl<'r> XmlSerializer<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self::with_options(registry, XmlOptions::default())
    }

    pub fn with_options(registry: &'r SchemaRegistry, options: XmlOptions) -> Self {
        Self { registry, options }
    }

    pub fn options(&self) -> &XmlOptions {
        &self.options
    }

    pub fn resource(&self, resource: &ResourceNode) -> Result<String> {
        let mut writer = self.writer();
        let namespace = self.options.namespace.then_some(FHIR_NS);
        self.write_resource(&mut writer, resource, resource.resource_type(), namespace)?;
        finish(writer)
    }

    /// Render a datatype value under `name`. Fragments carry no namespace.
    pub fn element(&self, name: &str, element: &Element) -> Result<String> {
        let mut writer = self.writer();
        self.write_value(&mut writer, name, element, name)?;
        finish(writer)
    }

    fn writer(&self) -> XmlWriter {
        let buffer = Cursor::new(Vec::new());
        match self.options.indent {
            Some(size) => Writer::new_with_indent(buffer, b' ', size),
            None => Writer::new(buffer),
        }
    }

    fn write_value(
        &self,
        writer: &mut XmlWriter,
        name: &str,
        element: &Element,
        path: &str,
    ) -> Result<()> {
        match element {
            Element::Primitive(p) => {
                let lexical = p.lexical();
                let value = escape_attribute(&lexical);
                let mut start = BytesStart::new(name);
                start.push_attribute(Attribute {
                    key: QName(b"value"),
                    value: Cow::Borrowed(value.as_bytes()),
                });
                writer.write_event(Event::Empty(start))?;
            }
            Element::Complex(node) => {
                self.write_node(writer, name, node, path, None)?;
            }
            Element::Resource(resource) => {
                writer.write_event(Event::Start(BytesStart::new(name)))?;
                self.write_resource(writer, resource, path, None)?;
                writer.write_event(Event::End(BytesEnd::new(name)))?;
            }
            Element::List(_) | Element::Choice(_) => {
                return Err(FormatError::shape(path, "single value", element.describe()));
            }
        }
        Ok(())
    }

    fn write_resource(
        &self,
        writer: &mut XmlWriter,
        resource: &ResourceNode,
        path: &str,
        namespace: Option<&str>,
    ) -> Result<()> {
        self.write_node(
            writer,
            resource.resource_type(),
            resource.node(),
            path,
            namespace,
        )
    }

    fn write_node(
        &self,
        writer: &mut XmlWriter,
        name: &str,
        node: &ComplexNode,
        path: &str,
        namespace: Option<&str>,
    ) -> Result<()> {
        let entries = layout(self.registry, node, path)?;

        let mut start = BytesStart::new(name);
        if let Some(ns) = namespace {
            start.push_attribute(("xmlns", ns));
        }

        if entries.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        for entry in entries {
            let field_path = format!("{path}.{}", entry.name);
            match entry.slot {
                Slot::Single(value) => self.write_value(writer, entry.name, value, &field_path)?,
                Slot::Many(items) => {
                    for (idx, item) in items.iter().enumerate() {
                        let item_path = format!("{field_path}[{idx}]");
                        self.write_value(writer, entry.name, item, &item_path)?;
                    }
                }
                Slot::Choice(variants) => {
                    for (key, value) in variants {
                        let variant_path = format!("{path}.{key}");
                        self.write_value(writer, &key, value, &variant_path)?;
                    }
                }
            }
        }
        writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }
}

/// Markup escaping plus character references for tab, line feed and carriage
/// return, which parsers would otherwise normalize to spaces.
fn escape_attribute(text: &str) -> Cow<'_, str> {
    let escaped = escape(text);
    if !escaped.contains(['\t', '\n', '\r']) {
        return escaped;
    }

    let mut out = String::with_capacity(escaped.len() + 8);
    for c in escaped.chars() {
        match c {
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

fn finish(writer: XmlWriter) -> Result<String> {
    let bytes = writer.into_inner().into_inner();
    Ok(String::from_utf8(bytes)?)
}

#[tracing::instrument(level = "trace", skip_all, fields(resource_type = %resource.resource_type()))]
pub fn to_xml(resource: &ResourceNode) -> Result<String> {
    XmlSerializer::new(registry()).resource(resource)
}

pub fn to_xml_with(resource: &ResourceNode, options: &XmlOptions) -> Result<String> {
    XmlSerializer::with_options(registry(), options.clone()).resource(resource)
}

pub fn datatype_to_xml(name: &str, element: &Element) -> Result<String> {
    XmlSerializer::new(registry()).element(name, element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_models::{Choice, Primitive};

    fn compact(resource: &ResourceNode) -> String {
        to_xml_with(resource, &XmlOptions::compact()).unwrap()
    }

    #[test]
    fn primitive_is_a_value_attribute() {
        let resource = ResourceNode::new("Binary").with("contentType", Primitive::code("image/png"));
        assert_eq!(
            compact(&resource),
            r#"<Binary xmlns="http://hl7.org/fhir"><contentType value="image/png"/></Binary>"#
        );
    }

    #[test]
    fn id_comes_first() {
        let resource = ResourceNode::new("Binary")
            .with("contentType", Primitive::code("text/plain"))
            .with_id("b1");
        let xml = compact(&resource);
        assert!(xml.starts_with(r#"<Binary xmlns="http://hl7.org/fhir"><id value="b1"/>"#));
    }

    #[test]
    fn namespace_can_be_left_out() {
        let resource = ResourceNode::new("Binary").with("contentType", Primitive::code("a/b"));
        let options = XmlOptions {
            indent: None,
            namespace: false,
        };
        assert_eq!(
            to_xml_with(&resource, &options).unwrap(),
            r#"<Binary><contentType value="a/b"/></Binary>"#
        );
    }

    #[test]
    fn lists_repeat_the_element() {
        let name = ComplexNode::new("HumanName")
            .with("family", Primitive::string("Lovelace"))
            .with("given", vec![Primitive::string("Ada"), Primitive::string("King")]);
        let xml = datatype_to_xml("name", &name.into()).unwrap();
        let compact: String = xml.lines().map(str::trim).collect();
        assert_eq!(
            compact,
            r#"<name><family value="Lovelace"/><given value="Ada"/><given value="King"/></name>"#
        );
    }

    #[test]
    fn choice_uses_suffixed_element_name() {
        let resource = ResourceNode::new("Observation")
            .with("status", Primitive::code("final"))
            .with("code", ComplexNode::new("CodeableConcept").with("text", Primitive::string("hr")))
            .with("value", Choice::new("integer", Primitive::integer(72)));
        let xml = compact(&resource);
        assert!(xml.contains(r#"<valueInteger value="72"/>"#));
        assert!(!xml.contains("<value>"));
    }

    #[test]
    fn contained_resources_are_wrapped() {
        let resource = ResourceNode::new("Patient").with(
            "contained",
            vec![ResourceNode::new("Binary")
                .with_id("pic")
                .with("contentType", Primitive::code("image/png"))],
        );
        assert_eq!(
            compact(&resource),
            concat!(
                r#"<Patient xmlns="http://hl7.org/fhir"><contained><Binary>"#,
                r#"<id value="pic"/><contentType value="image/png"/>"#,
                r#"</Binary></contained></Patient>"#
            )
        );
    }

    #[test]
    fn empty_complex_value_is_self_closing() {
        let resource = ResourceNode::new("Observation")
            .with("status", Primitive::code("final"))
            .with("code", ComplexNode::new("CodeableConcept"));
        assert!(compact(&resource).contains("<code/>"));
    }

    #[test]
    fn attribute_values_are_escaped() {
        let resource = ResourceNode::new("Binary")
            .with("contentType", Primitive::code(r#"a<b&"c""#));
        let xml = compact(&resource);
        assert!(xml.contains("&lt;"));
        assert!(xml.contains("&amp;"));
        assert!(xml.contains("&quot;"));
        assert!(!xml.contains(r#"a<b"#));
    }

    #[test]
    fn line_breaks_and_tabs_become_character_references() {
        let resource = ResourceNode::new("Binary")
            .with("contentType", Primitive::code("a\nb\r\tc"));
        assert!(compact(&resource).contains(r#"<contentType value="a&#xA;b&#xD;&#x9;c"/>"#));
    }

    #[test]
    fn indentation_follows_options() {
        let resource = ResourceNode::new("Binary").with("contentType", Primitive::code("image/png"));
        let xml = to_xml(&resource).unwrap();
        assert_eq!(
            xml,
            "<Binary xmlns=\"http://hl7.org/fhir\">\n  <contentType value=\"image/png\"/>\n</Binary>"
        );
    }
}
