//! Schema-driven normalization
//!
//! Turns [`RawValue`] input into a typed [`Element`] tree:
//!
//! - already-typed input of the target type passes through unchanged, so
//!   normalization is idempotent;
//! - a repeatable field given a single value is promoted to a one-item list;
//! - fields are visited in schema order, absent ones are skipped;
//! - every present choice variant is collected, and by default more than one
//!   is accepted (exclusivity is checked by the validator, on demand);
//! - a missing required field fails the whole attempt.
//!
//! Primitive format grammars are never checked here.

use crate::error::{Error, Result};
use crate::raw::RawValue;
use crate::resource::ResourceNode;
use crate::value::{Choice, ChoiceEntry, ComplexNode, Element, Primitive, PrimitiveData};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tessera_schema::{
    registry, ChoiceGroup, FieldDef, FieldKind, JsonShape, PrimitiveKind, SchemaRegistry,
    TypeDef, TypeRef, RESOURCE_TYPE_KEY,
};

/// What to do when a choice field has more than one variant present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ChoicePolicy {
    /// Keep every variant; exclusivity is left to on-demand validation.
    #[default]
    Permissive,
    /// Fail construction with [`Error::ChoiceExclusivity`].
    Strict,
}

/// What to do with input keys the schema does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnknownFieldPolicy {
    #[default]
    Ignore,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    pub choice_policy: ChoicePolicy,
    pub unknown_fields: UnknownFieldPolicy,
    pub max_depth: usize,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            choice_policy: ChoicePolicy::Permissive,
            unknown_fields: UnknownFieldPolicy::Ignore,
            max_depth: 64,
        }
    }
}

/// Normalize against the process-wide registry with default options.
pub fn normalize(type_code: &str, raw: impl Into<RawValue>) -> Result<Element> {
    Normalizer::new(registry()).normalize(type_code, raw)
}

/// Normalize a resource whose type is given by its `resourceType` key.
pub fn normalize_resource(raw: impl Into<RawValue>) -> Result<ResourceNode> {
    Normalizer::new(registry()).normalize_resource(raw)
}

/// Normalize a resource of a known type, filling in a missing `resourceType`.
pub fn normalize_resource_as(type_name: &str, raw: impl Into<RawValue>) -> Result<ResourceNode> {
    Normalizer::new(registry()).normalize_resource_as(type_name, raw)
}

#[derive(Debug, Clone)]
pub struct Normalizer<'r> {
    registry: &'r SchemaRegistry,
    options: NormalizeOptions,
}

impl<'r> Normalizer<'r> {
    pub fn new(registry: &'r SchemaRegistry) -> Self {
        Self {
            registry,
            options: NormalizeOptions::default(),
        }
    }

    pub fn with_options(mut self, options: NormalizeOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    pub fn registry(&self) -> &'r SchemaRegistry {
        self.registry
    }

    /// Normalize raw input against any type code: a primitive kind
    /// (`positiveInt`), a datatype (`Quantity`), a resource type
    /// (`CarePlan`) or `Resource`.
    #[tracing::instrument(level = "trace", skip_all, fields(type_code = %type_code))]
    pub fn normalize(&self, type_code: &str, raw: impl Into<RawValue>) -> Result<Element> {
        let type_ref =
            TypeRef::parse(type_code).map_err(|_| Error::UnknownType(type_code.to_string()))?;
        self.value(&type_ref, raw.into(), type_code, 0)
    }

    #[tracing::instrument(level = "trace", skip_all)]
    pub fn normalize_resource(&self, raw: impl Into<RawValue>) -> Result<ResourceNode> {
        self.resource(None, raw.into(), "Resource", 0)
    }

    #[tracing::instrument(level = "trace", skip_all, fields(type_name = %type_name))]
    pub fn normalize_resource_as(
        &self,
        type_name: &str,
        raw: impl Into<RawValue>,
    ) -> Result<ResourceNode> {
        self.resource(Some(type_name), raw.into(), type_name, 0)
    }

    fn value(&self, type_ref: &TypeRef, raw: RawValue, path: &str, depth: usize) -> Result<Element> {
        if depth > self.options.max_depth {
            return Err(Error::DepthExceeded {
                path: path.to_string(),
            });
        }

        match type_ref {
            TypeRef::Primitive(kind) => self.primitive(*kind, raw, path).map(Element::Primitive),
            TypeRef::Resource => self
                .resource(None, raw, path, depth)
                .map(|r| Element::Resource(Box::new(r))),
            TypeRef::Complex(name) => {
                let type_def = self
                    .registry
                    .get(name)
                    .ok_or_else(|| Error::UnknownType(name.clone()))?;
                if type_def.is_resource() {
                    self.resource(Some(name.as_str()), raw, path, depth)
                        .map(|r| Element::Resource(Box::new(r)))
                } else {
                    self.complex(type_def, raw, path, depth).map(Element::Complex)
                }
            }
        }
    }

    fn primitive(&self, kind: PrimitiveKind, raw: RawValue, path: &str) -> Result<Primitive> {
        match raw {
            RawValue::Typed(Element::Primitive(p)) if p.kind() == kind => Ok(p),
            RawValue::Typed(Element::Primitive(p)) => {
                self.primitive(kind, RawValue::from(p.into_data()), path)
            }
            RawValue::Typed(other) => Err(Error::shape(path, kind.name(), other.describe())),
            raw => coerce_primitive(kind, raw, path).map(|data| Primitive::new(kind, data)),
        }
    }

    fn complex(
        &self,
        type_def: &TypeDef,
        raw: RawValue,
        path: &str,
        depth: usize,
    ) -> Result<ComplexNode> {
        match raw {
            RawValue::Typed(Element::Complex(node)) if node.type_name() == type_def.name => {
                Ok(node)
            }
            RawValue::Object(map) => self.fields(type_def, map, path, depth),
            other => Err(Error::shape(path, &type_def.name, other.describe())),
        }
    }

    fn resource(
        &self,
        expected: Option<&str>,
        raw: RawValue,
        path: &str,
        depth: usize,
    ) -> Result<ResourceNode> {
        let mut map = match raw {
            RawValue::Typed(Element::Resource(resource)) => {
                return match expected {
                    Some(expected) if expected != resource.resource_type() => {
                        Err(Error::ResourceTypeMismatch {
                            expected: expected.to_string(),
                            found: resource.resource_type().to_string(),
                        })
                    }
                    _ => Ok(*resource),
                };
            }
            RawValue::Object(map) => map,
            other => return Err(Error::shape(path, "resource object", other.describe())),
        };

        let declared = match map.remove(RESOURCE_TYPE_KEY) {
            Some(RawValue::String(s)) => Some(s),
            Some(RawValue::Null) | None => None,
            Some(other) => {
                return Err(Error::shape(
                    format!("{path}.{RESOURCE_TYPE_KEY}"),
                    "string",
                    other.describe(),
                ))
            }
        };

        let type_name = match (expected, declared) {
            (Some(expected), Some(found)) if expected != found => {
                return Err(Error::ResourceTypeMismatch {
                    expected: expected.to_string(),
                    found,
                })
            }
            (Some(expected), _) => expected.to_string(),
            (None, Some(found)) => found,
            (None, None) => {
                return Err(Error::MissingRequiredField {
                    path: format!("{path}.{RESOURCE_TYPE_KEY}"),
                })
            }
        };

        let type_def = match self.registry.get(&type_name) {
            Some(def) if def.is_resource() => def,
            Some(_) => return Err(Error::NotAResource(type_name)),
            None => return Err(Error::UnknownType(type_name)),
        };

        // Root paths start at the resource type; contained resources keep
        // the path of the field holding them.
        let path = if depth == 0 { type_name.as_str() } else { path };
        self.fields(type_def, map, path, depth)
            .map(ResourceNode::from_node)
    }

    fn fields(
        &self,
        type_def: &TypeDef,
        mut map: BTreeMap<String, RawValue>,
        path: &str,
        depth: usize,
    ) -> Result<ComplexNode> {
        let mut node = ComplexNode::new(&type_def.name);

        for field in &type_def.fields {
            let value = match &field.kind {
                FieldKind::Single(type_ref) => match map.remove(&field.name) {
                    Some(raw) if !raw.is_absent() => {
                        let field_path = format!("{path}.{}", field.name);
                        self.field_value(field, type_ref, raw, &field_path, depth)?
                    }
                    _ => None,
                },
                FieldKind::Choice(group) => self.choice(field, group, &mut map, path, depth)?,
            };

            match value {
                Some(value) => node.push(field.name.clone(), value),
                None if field.is_required() => {
                    return Err(Error::MissingRequiredField {
                        path: format!("{path}.{}", field.name),
                    })
                }
                None => {}
            }
        }

        for key in map.keys() {
            match self.options.unknown_fields {
                UnknownFieldPolicy::Ignore => {
                    tracing::debug!(path = %path, field = %key, "ignoring undeclared field");
                }
                UnknownFieldPolicy::Reject => {
                    return Err(Error::UnknownField {
                        path: format!("{path}.{key}"),
                    })
                }
            }
        }

        Ok(node)
    }

    fn field_value(
        &self,
        field: &FieldDef,
        type_ref: &TypeRef,
        raw: RawValue,
        path: &str,
        depth: usize,
    ) -> Result<Option<Element>> {
        if !field.is_repeating() {
            return self.single(type_ref, raw, path, depth).map(Some);
        }

        let items = match raw {
            RawValue::Array(items) => items,
            RawValue::Typed(Element::List(items)) => {
                items.into_iter().map(RawValue::Typed).collect()
            }
            single => vec![single],
        };

        let mut out = Vec::with_capacity(items.len());
        for (idx, item) in items.into_iter().enumerate() {
            if matches!(item, RawValue::Null) {
                continue;
            }
            let item_path = format!("{path}[{idx}]");
            out.push(self.value(type_ref, item, &item_path, depth + 1)?);
        }

        Ok((!out.is_empty()).then_some(Element::List(out)))
    }

    fn single(&self, type_ref: &TypeRef, raw: RawValue, path: &str, depth: usize) -> Result<Element> {
        match raw {
            RawValue::Array(_) | RawValue::Typed(Element::List(_)) => {
                Err(Error::shape(path, "single value", "array"))
            }
            raw => self.value(type_ref, raw, path, depth + 1),
        }
    }

    fn choice(
        &self,
        field: &FieldDef,
        group: &ChoiceGroup,
        map: &mut BTreeMap<String, RawValue>,
        path: &str,
        depth: usize,
    ) -> Result<Option<Element>> {
        let base_path = format!("{path}.{}", field.name);

        let mut entries = Vec::new();
        match map.remove(&field.name) {
            Some(RawValue::Typed(Element::Choice(choice))) => {
                for entry in choice.entries() {
                    if group.variant_for_code(&entry.type_code).is_none() {
                        return Err(Error::shape(
                            &base_path,
                            "declared choice variant",
                            entry.type_code.as_str(),
                        ));
                    }
                }
                entries.extend(choice.entries().iter().cloned());
            }
            Some(raw) if !raw.is_absent() => {
                return Err(Error::shape(
                    &base_path,
                    format!("{}[x] variant key", field.name),
                    raw.describe(),
                ))
            }
            _ => {}
        }

        for variant in &group.variants {
            let key = ChoiceGroup::key_for(&field.name, variant);
            match map.remove(&key) {
                Some(raw) if !raw.is_absent() => {
                    let variant_path = format!("{path}.{key}");
                    let value = self.single(variant, raw, &variant_path, depth)?;
                    entries.push(ChoiceEntry {
                        type_code: variant.code().to_string(),
                        value,
                    });
                }
                _ => {}
            }
        }

        if entries.len() > 1 {
            let variants: Vec<String> = entries.iter().map(|e| e.type_code.clone()).collect();
            match self.options.choice_policy {
                ChoicePolicy::Strict => {
                    return Err(Error::ChoiceExclusivity {
                        path: base_path,
                        variants,
                    })
                }
                ChoicePolicy::Permissive => {
                    tracing::debug!(
                        path = %base_path,
                        variants = ?variants,
                        "choice has more than one variant set"
                    );
                }
            }
        }

        Ok((!entries.is_empty()).then(|| Element::Choice(Choice::from_entries(entries))))
    }
}

fn coerce_primitive(kind: PrimitiveKind, raw: RawValue, path: &str) -> Result<PrimitiveData> {
    let data = match (kind.json_shape(), raw) {
        (JsonShape::Bool, RawValue::Bool(b)) => Some(PrimitiveData::Boolean(b)),
        (JsonShape::Bool, RawValue::String(s)) => match s.as_str() {
            "true" => Some(PrimitiveData::Boolean(true)),
            "false" => Some(PrimitiveData::Boolean(false)),
            _ => None,
        },
        (JsonShape::Number, RawValue::Number(n)) if kind.is_integral() => {
            n.as_i64().map(PrimitiveData::Integer)
        }
        (JsonShape::Number, RawValue::String(s)) if kind.is_integral() => {
            s.parse::<i64>().ok().map(PrimitiveData::Integer)
        }
        (JsonShape::Number, RawValue::Number(n)) => {
            parse_decimal(&n.to_string()).map(PrimitiveData::Decimal)
        }
        (JsonShape::Number, RawValue::String(s)) => parse_decimal(&s).map(PrimitiveData::Decimal),
        (JsonShape::String, RawValue::String(s)) => Some(PrimitiveData::Text(s)),
        (_, other) => return Err(Error::shape(path, kind.name(), other.describe())),
    };

    data.ok_or_else(|| Error::shape(path, kind.name(), "incompatible value"))
}

/// Exact decimal parse; input that would need rounding is rejected.
fn parse_decimal(text: &str) -> Option<Decimal> {
    if !text
        .bytes()
        .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'))
    {
        return None;
    }
    if text.contains(['e', 'E']) {
        Decimal::from_scientific(text).ok()
    } else {
        Decimal::from_str_exact(text).ok()
    }
}
