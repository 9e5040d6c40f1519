//! Validation steps
//!
//! Each step walks the typed tree through [`walk`] and pushes issues for the
//! findings it owns. Steps never fail; a tree that cannot be understood
//! produces issues, not errors.

pub mod choices;
pub mod formats;
pub mod structure;

use tessera_models::{ComplexNode, Element, Primitive, ResourceNode};
use tessera_schema::{FieldDef, SchemaRegistry, TypeDef, TypeRef};

/// Root of a validation walk.
#[derive(Debug, Clone, Copy)]
pub enum Target<'a> {
    Resource(&'a ResourceNode),
    Element(&'a Element),
}

/// Callbacks for a schema-aware walk over a typed tree.
pub(crate) trait Visit {
    /// A complex node or resource; `def` is `None` for unregistered types.
    fn node(&mut self, _path: &str, _type_name: &str, _def: Option<&TypeDef>) {}

    /// A declared field, visited whether present or not.
    fn field(&mut self, _path: &str, _def: &FieldDef, _value: Option<&Element>) {}

    /// A present field the node's type does not declare.
    fn undeclared(&mut self, _path: &str, _value: &Element) {}

    fn primitive(&mut self, _path: &str, _value: &Primitive) {}
}

pub(crate) fn walk_target(
    registry: &SchemaRegistry,
    path: &str,
    target: Target<'_>,
    v: &mut dyn Visit,
) {
    match target {
        Target::Resource(resource) => walk_node(registry, path, resource.node(), v),
        Target::Element(element) => walk(registry, path, element, v),
    }
}

pub(crate) fn walk(registry: &SchemaRegistry, path: &str, element: &Element, v: &mut dyn Visit) {
    match element {
        Element::Primitive(p) => v.primitive(path, p),
        Element::Complex(node) => walk_node(registry, path, node, v),
        Element::Resource(resource) => walk_node(registry, path, resource.node(), v),
        Element::List(items) => {
            for (idx, item) in items.iter().enumerate() {
                walk(registry, &format!("{path}[{idx}]"), item, v);
            }
        }
        Element::Choice(choice) => {
            for entry in choice.entries() {
                let suffix = TypeRef::parse(&entry.type_code)
                    .map(|t| t.variant_suffix())
                    .unwrap_or_else(|_| entry.type_code.clone());
                walk(registry, &format!("{path}{suffix}"), &entry.value, v);
            }
        }
    }
}

pub(crate) fn walk_node(
    registry: &SchemaRegistry,
    path: &str,
    node: &ComplexNode,
    v: &mut dyn Visit,
) {
    let def = registry.get(node.type_name()).map(|d| d.as_ref());
    v.node(path, node.type_name(), def);

    if let Some(def) = def {
        for field in &def.fields {
            v.field(&format!("{path}.{}", field.name), field, node.get(&field.name));
        }
    }

    for (name, value) in node.fields() {
        let field_path = format!("{path}.{name}");
        if def.and_then(|d| d.field(name)).is_none() {
            v.undeclared(&field_path, value);
        }
        walk(registry, &field_path, value, v);
    }
}
