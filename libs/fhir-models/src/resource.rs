//! Resource envelope node
//!
//! A resource is a complex node whose type name is its `resourceType`
//! discriminant. `id` and `meta` are ordinary envelope fields declared by the
//! schema registry for every resource type.

use crate::value::{ComplexNode, Element, Primitive};
use tessera_schema::envelope::{ID_FIELD, META_FIELD};
use tessera_schema::PrimitiveKind;

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceNode {
    node: ComplexNode,
}

impl ResourceNode {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            node: ComplexNode::new(resource_type),
        }
    }

    pub fn from_node(node: ComplexNode) -> Self {
        Self { node }
    }

    pub fn resource_type(&self) -> &str {
        self.node.type_name()
    }

    pub fn id(&self) -> Option<&str> {
        self.node.get_str(ID_FIELD)
    }

    pub fn meta(&self) -> Option<&ComplexNode> {
        self.node.get(META_FIELD)?.as_complex()
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.node.set(ID_FIELD, Primitive::text(PrimitiveKind::Id, id));
        self
    }

    pub fn with_meta(mut self, meta: ComplexNode) -> Self {
        self.node.set(META_FIELD, meta);
        self
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<Element>) -> Self {
        self.node.set(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Element> {
        self.node.get(name)
    }

    pub fn node(&self) -> &ComplexNode {
        &self.node
    }

    pub fn into_node(self) -> ComplexNode {
        self.node
    }
}
