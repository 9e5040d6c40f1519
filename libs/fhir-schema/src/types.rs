//! Field and type definitions
//!
//! A [`TypeDef`] is the static description of one node type: its category and
//! its fields in declaration order. Field order drives serialization order.

use crate::cardinality::Cardinality;
use crate::error::{Result, SchemaError};
use crate::primitive::PrimitiveKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Type code that means "any resource" (contained resources).
pub const RESOURCE_TYPE_CODE: &str = "Resource";

/// Suffix marking a choice field in catalog names (`value[x]`).
pub const CHOICE_SUFFIX: &str = "[x]";

/// Reference from a field to the type of its values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Primitive(PrimitiveKind),
    Complex(String),
    /// Any resource type; the concrete type comes from `resourceType`.
    Resource,
}

impl TypeRef {
    /// Parse a type code. Codes starting with a lowercase letter are
    /// primitive kinds.
    pub fn parse(code: &str) -> Result<Self> {
        match code.chars().next() {
            Some(c) if c.is_ascii_lowercase() => Ok(Self::Primitive(code.parse()?)),
            Some(_) if code == RESOURCE_TYPE_CODE => Ok(Self::Resource),
            Some(_) => Ok(Self::Complex(code.to_string())),
            None => Err(SchemaError::UnknownPrimitiveKind(String::new())),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::Primitive(kind) => kind.name(),
            Self::Complex(name) => name,
            Self::Resource => RESOURCE_TYPE_CODE,
        }
    }

    /// Suffix used when this type is a choice variant (`dateTime` → `DateTime`).
    pub fn variant_suffix(&self) -> String {
        let code = self.code();
        let mut chars = code.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, Self::Primitive(_))
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Variants of a polymorphic field, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceGroup {
    pub variants: Vec<TypeRef>,
}

impl ChoiceGroup {
    /// Wire key of one variant: `<base><Suffix>`.
    pub fn key_for(base: &str, variant: &TypeRef) -> String {
        format!("{}{}", base, variant.variant_suffix())
    }

    /// Resolve a wire key (e.g. `valueQuantity`) back to its variant.
    pub fn variant_for_key(&self, base: &str, key: &str) -> Option<&TypeRef> {
        let suffix = key.strip_prefix(base)?;
        self.variants.iter().find(|v| v.variant_suffix() == suffix)
    }

    /// Resolve a type code (e.g. `string`, `Quantity`) to its variant.
    pub fn variant_for_code(&self, code: &str) -> Option<&TypeRef> {
        self.variants.iter().find(|v| v.code() == code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Single(TypeRef),
    Choice(ChoiceGroup),
}

/// One declared field of a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDef {
    /// Field name; for choice fields this is the base name without `[x]`.
    pub name: String,
    pub cardinality: Cardinality,
    pub kind: FieldKind,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, type_ref: TypeRef, cardinality: Cardinality) -> Self {
        Self {
            name: name.into(),
            cardinality,
            kind: FieldKind::Single(type_ref),
        }
    }

    pub fn choice(name: impl Into<String>, variants: Vec<TypeRef>, cardinality: Cardinality) -> Self {
        Self {
            name: name.into(),
            cardinality,
            kind: FieldKind::Choice(ChoiceGroup { variants }),
        }
    }

    /// Build a field from catalog notation: a name (`value[x]` for choices),
    /// one or more type codes, and a cardinality such as `0..*`.
    pub fn from_codes(name: &str, codes: &[&str], cardinality: &str) -> Result<Self> {
        let cardinality: Cardinality = cardinality.parse()?;
        let types = codes
            .iter()
            .map(|code| TypeRef::parse(code))
            .collect::<Result<Vec<_>>>()?;

        match name.strip_suffix(CHOICE_SUFFIX) {
            Some(base) => Ok(Self::choice(base, types, cardinality)),
            None => match <[TypeRef; 1]>::try_from(types) {
                Ok([single]) => Ok(Self::new(name, single, cardinality)),
                Err(types) => Ok(Self::choice(name, types, cardinality)),
            },
        }
    }

    pub fn is_required(&self) -> bool {
        self.cardinality.is_required()
    }

    pub fn is_repeating(&self) -> bool {
        self.cardinality.is_repeating()
    }

    pub fn choice_group(&self) -> Option<&ChoiceGroup> {
        match &self.kind {
            FieldKind::Choice(group) => Some(group),
            FieldKind::Single(_) => None,
        }
    }

    /// Every type this field may hold.
    pub fn type_refs(&self) -> impl Iterator<Item = &TypeRef> {
        let (single, variants) = match &self.kind {
            FieldKind::Single(t) => (Some(t), &[][..]),
            FieldKind::Choice(group) => (None, group.variants.as_slice()),
        };
        single.into_iter().chain(variants.iter())
    }
}

/// Category of a node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TypeCategory {
    /// Reusable complex datatype or backbone element.
    Datatype,
    /// Top-level record carrying only the identity envelope.
    Resource,
    /// Top-level record carrying the identity envelope plus contained
    /// resources and extensions.
    DomainResource,
}

impl TypeCategory {
    pub fn is_resource(self) -> bool {
        !matches!(self, Self::Datatype)
    }
}

/// Static description of one node type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDef {
    pub name: String,
    pub category: TypeCategory,
    pub fields: Vec<FieldDef>,
}

impl TypeDef {
    pub fn new(name: impl Into<String>, category: TypeCategory, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            category,
            fields,
        }
    }

    pub fn is_resource(&self) -> bool {
        self.category.is_resource()
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.is_required())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_type_codes() {
        assert_eq!(
            TypeRef::parse("dateTime").unwrap(),
            TypeRef::Primitive(PrimitiveKind::DateTime)
        );
        assert_eq!(
            TypeRef::parse("Quantity").unwrap(),
            TypeRef::Complex("Quantity".to_string())
        );
        assert_eq!(TypeRef::parse("Resource").unwrap(), TypeRef::Resource);
        assert!(TypeRef::parse("notAKind").is_err());
    }

    #[test]
    fn variant_suffix_capitalizes_first_letter() {
        assert_eq!(TypeRef::parse("string").unwrap().variant_suffix(), "String");
        assert_eq!(TypeRef::parse("dateTime").unwrap().variant_suffix(), "DateTime");
        assert_eq!(TypeRef::parse("Quantity").unwrap().variant_suffix(), "Quantity");
    }

    #[test]
    fn choice_keys_resolve_both_ways() {
        let field = FieldDef::from_codes("value[x]", &["Quantity", "string", "dateTime"], "0..1")
            .unwrap();
        let group = field.choice_group().unwrap();
        assert_eq!(field.name, "value");
        assert_eq!(
            ChoiceGroup::key_for("value", &group.variants[2]),
            "valueDateTime"
        );
        assert_eq!(
            group.variant_for_key("value", "valueString"),
            Some(&TypeRef::Primitive(PrimitiveKind::String))
        );
        assert_eq!(group.variant_for_key("value", "valueBoolean"), None);
        assert_eq!(group.variant_for_key("other", "valueString"), None);
    }

    #[test]
    fn from_codes_single_field() {
        let field = FieldDef::from_codes("given", &["string"], "0..*").unwrap();
        assert!(field.is_repeating());
        assert!(field.choice_group().is_none());
        assert_eq!(field.type_refs().count(), 1);
    }
}
