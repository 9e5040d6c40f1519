//! JSON codec
//!
//! Writing is schema driven: `resourceType` first, then fields in declaration
//! order, absent values omitted (never `null` or `[]`), choice variants under
//! their suffixed key. Reading is normalization.

use crate::error::{FormatError, Result};
use crate::layout::{layout, Slot};
use serde_json::{Map, Number, Value};
use tessera_models::{
    normalize, normalize_resource, ComplexNode, Element, Primitive, PrimitiveData, ResourceNode,
};
use tessera_schema::{registry, SchemaRegistry, RESOURCE_TYPE_KEY};

pub struct JsonSerializer<'r> {
    registry: &'r SchemaRegistry,
}

impl<'r> JsonSerializer<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self { registry }
    }

    pub fn element(&self, element: &Element) -> Result<Value> {
        self.value(element, &element.describe())
    }

    pub fn resource(&self, resource: &ResourceNode) -> Result<Value> {
        self.resource_at(resource, resource.resource_type())
    }

    fn value(&self, element: &Element, path: &str) -> Result<Value> {
        match element {
            Element::Primitive(p) => primitive_value(p),
            Element::Complex(node) => self.object(node, path).map(Value::Object),
            Element::Resource(resource) => self.resource_at(resource, path),
            Element::List(_) | Element::Choice(_) => {
                Err(FormatError::shape(path, "single value", element.describe()))
            }
        }
    }

    fn resource_at(&self, resource: &ResourceNode, path: &str) -> Result<Value> {
        let mut map = Map::new();
        map.insert(
            RESOURCE_TYPE_KEY.to_string(),
            Value::String(resource.resource_type().to_string()),
        );
        self.fill(&mut map, resource.node(), path)?;
        Ok(Value::Object(map))
    }

    fn object(&self, node: &ComplexNode, path: &str) -> Result<Map<String, Value>> {
        let mut map = Map::new();
        self.fill(&mut map, node, path)?;
        Ok(map)
    }

    fn fill(&self, map: &mut Map<String, Value>, node: &ComplexNode, path: &str) -> Result<()> {
        for entry in layout(self.registry, node, path)? {
            let field_path = format!("{path}.{}", entry.name);
            match entry.slot {
                Slot::Single(value) => {
                    map.insert(entry.name.to_string(), self.value(value, &field_path)?);
                }
                Slot::Many(items) => {
                    let items = items
                        .iter()
                        .enumerate()
                        .map(|(idx, item)| self.value(item, &format!("{field_path}[{idx}]")))
                        .collect::<Result<Vec<_>>>()?;
                    map.insert(entry.name.to_string(), Value::Array(items));
                }
                Slot::Choice(variants) => {
                    for (key, value) in variants {
                        let value = self.value(value, &format!("{path}.{key}"))?;
                        map.insert(key, value);
                    }
                }
            }
        }
        Ok(())
    }
}

fn primitive_value(value: &Primitive) -> Result<Value> {
    Ok(match value.data() {
        PrimitiveData::Boolean(b) => Value::Bool(*b),
        PrimitiveData::Integer(i) => Value::from(*i),
        // Written from the decimal's own digits, never through f64.
        PrimitiveData::Decimal(d) => Value::Number(d.to_string().parse::<Number>()?),
        PrimitiveData::Text(s) => Value::String(s.clone()),
    })
}

/// Serialize any element against the global registry.
pub fn to_json(element: &Element) -> Result<Value> {
    JsonSerializer::new(registry()).element(element)
}

#[tracing::instrument(level = "trace", skip_all, fields(resource_type = %resource.resource_type()))]
pub fn resource_to_json(resource: &ResourceNode) -> Result<Value> {
    JsonSerializer::new(registry()).resource(resource)
}

pub fn to_json_string(resource: &ResourceNode) -> Result<String> {
    Ok(serde_json::to_string(&resource_to_json(resource)?)?)
}

pub fn to_json_string_pretty(resource: &ResourceNode) -> Result<String> {
    Ok(serde_json::to_string_pretty(&resource_to_json(resource)?)?)
}

/// Parse a value of a named type; exactly normalization.
pub fn from_json(type_name: &str, value: Value) -> Result<Element> {
    Ok(normalize(type_name, value)?)
}

pub fn resource_from_json(value: Value) -> Result<ResourceNode> {
    Ok(normalize_resource(value)?)
}

pub fn resource_from_str(input: &str) -> Result<ResourceNode> {
    let value: Value = serde_json::from_str(input)?;
    resource_from_json(value)
}
