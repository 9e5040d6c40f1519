//! Resource envelope entry points
//!
//! [`Resource`] gives every record type the shared `resourceType`/`id`/`meta`
//! accessors and the default JSON and XML entry points. Concrete record types
//! wrap a [`ResourceNode`] of their own type and add their own accessors on top.

use crate::error::Result;
use crate::json::resource_to_json;
use crate::xml::{to_xml, to_xml_with, XmlOptions};
use serde_json::Value;
use tessera_models::{normalize_resource_as, ComplexNode, Element, Error, ResourceNode};

pub trait Resource {
    fn resource_node(&self) -> &ResourceNode;

    fn resource_type(&self) -> &str {
        self.resource_node().resource_type()
    }

    fn id(&self) -> Option<&str> {
        self.resource_node().id()
    }

    fn meta(&self) -> Option<&ComplexNode> {
        self.resource_node().meta()
    }

    fn get(&self, field: &str) -> Option<&Element> {
        self.resource_node().get(field)
    }

    fn to_json(&self) -> Result<Value> {
        resource_to_json(self.resource_node())
    }

    fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_json()?)?)
    }

    fn to_xml(&self) -> Result<String> {
        to_xml(self.resource_node())
    }

    fn to_xml_with(&self, options: &XmlOptions) -> Result<String> {
        to_xml_with(self.resource_node(), options)
    }
}

impl Resource for ResourceNode {
    fn resource_node(&self) -> &ResourceNode {
        self
    }
}

/// A record type bound to one resource type name.
pub trait TypedResource: Resource + Sized {
    const RESOURCE_TYPE: &'static str;

    /// Wrap a node, rejecting nodes of any other resource type.
    fn from_node(node: ResourceNode) -> Result<Self>;

    fn into_node(self) -> ResourceNode;

    /// Normalize raw JSON; a missing `resourceType` is filled in.
    fn from_json(value: Value) -> Result<Self> {
        Self::from_node(normalize_resource_as(Self::RESOURCE_TYPE, value)?)
    }

    fn from_json_str(input: &str) -> Result<Self> {
        Self::from_json(serde_json::from_str(input)?)
    }
}

macro_rules! typed_resources {
    ($($(#[$doc:meta])* $name:ident),* $(,)?) => {$(
        $(#[$doc])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name(ResourceNode);

        impl $name {
            pub fn new() -> Self {
                Self(ResourceNode::new(Self::RESOURCE_TYPE))
            }

            pub fn with(self, field: impl Into<String>, value: impl Into<Element>) -> Self {
                Self(self.0.with(field, value))
            }

            pub fn with_id(self, id: impl Into<String>) -> Self {
                Self(self.0.with_id(id))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Resource for $name {
            fn resource_node(&self) -> &ResourceNode {
                &self.0
            }
        }

        impl TypedResource for $name {
            const RESOURCE_TYPE: &'static str = stringify!($name);

            fn from_node(node: ResourceNode) -> Result<Self> {
                if node.resource_type() != Self::RESOURCE_TYPE {
                    return Err(Error::ResourceTypeMismatch {
                        expected: Self::RESOURCE_TYPE.to_string(),
                        found: node.resource_type().to_string(),
                    }
                    .into());
                }
                Ok(Self(node))
            }

            fn into_node(self) -> ResourceNode {
                self.0
            }
        }

        impl TryFrom<ResourceNode> for $name {
            type Error = crate::FormatError;

            fn try_from(node: ResourceNode) -> Result<Self> {
                Self::from_node(node)
            }
        }

        impl From<$name> for ResourceNode {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    )*};
}

typed_resources!(
    Basic,
    /// Raw content with its MIME type.
    Binary,
    Patient,
    CarePlan,
    Claim,
    Coverage,
    Contract,
    MedicationRequest,
    Observation,
);
