//! Schema registry
//!
//! Maps every node-type name to its [`TypeDef`]. A registry is assembled once
//! (from a catalog document or a [`RegistryBuilder`]), checked for internal
//! consistency, and is read-only afterwards.

use crate::cardinality::Cardinality;
use crate::envelope::envelope_fields;
use crate::error::{Result, SchemaError};
use crate::types::{FieldDef, FieldKind, TypeCategory, TypeDef, TypeRef, RESOURCE_TYPE_CODE};
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Catalog of datatypes and record kinds shipped with the crate.
pub const CORE_CATALOG: &str = include_str!("../catalog/core.json");

static CORE_REGISTRY: Lazy<SchemaRegistry> = Lazy::new(|| {
    let registry = SchemaRegistry::from_catalog_json(CORE_CATALOG)
        .expect("embedded core catalog must be consistent");
    tracing::info!(
        types = registry.len(),
        resources = registry.resource_types().count(),
        "schema registry initialized"
    );
    registry
});

/// Process-wide registry built from [`CORE_CATALOG`] on first use.
pub fn registry() -> &'static SchemaRegistry {
    &CORE_REGISTRY
}

#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    types: HashMap<String, Arc<TypeDef>>,
    order: Vec<String>,
}

impl SchemaRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Builder preloaded with the embedded core catalog, for registries that
    /// extend the shipped record kinds.
    pub fn core_builder() -> Result<RegistryBuilder> {
        RegistryBuilder::default().catalog_json(CORE_CATALOG)
    }

    pub fn from_catalog_json(json: &str) -> Result<Self> {
        Self::builder().catalog_json(json)?.build()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<TypeDef>> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Look up a resource type by name; datatypes do not qualify.
    pub fn resource(&self, name: &str) -> Option<&Arc<TypeDef>> {
        self.get(name).filter(|t| t.is_resource())
    }

    /// Type definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<TypeDef>> {
        self.order.iter().filter_map(|name| self.types.get(name))
    }

    pub fn resource_types(&self) -> impl Iterator<Item = &Arc<TypeDef>> {
        self.iter().filter(|t| t.is_resource())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Collects type definitions and checks them as a whole on [`build`](Self::build).
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    types: Vec<TypeDef>,
}

impl RegistryBuilder {
    pub fn datatype(self, name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        self.add(TypeDef::new(name, TypeCategory::Datatype, fields))
    }

    pub fn resource(self, name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        self.add(TypeDef::new(name, TypeCategory::Resource, fields))
    }

    pub fn domain_resource(self, name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        self.add(TypeDef::new(name, TypeCategory::DomainResource, fields))
    }

    pub fn add(mut self, type_def: TypeDef) -> Self {
        self.types.push(type_def);
        self
    }

    /// Append every type declared in a catalog document.
    pub fn catalog_json(mut self, json: &str) -> Result<Self> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        for entry in document.types {
            let fields = entry
                .fields
                .iter()
                .map(|f| f.to_field_def(&entry.name))
                .collect::<Result<Vec<_>>>()?;
            self.types.push(TypeDef::new(entry.name, entry.category, fields));
        }
        Ok(self)
    }

    pub fn build(self) -> Result<SchemaRegistry> {
        let mut types = HashMap::with_capacity(self.types.len());
        let mut order = Vec::with_capacity(self.types.len());

        for mut type_def in self.types {
            if type_def.name == RESOURCE_TYPE_CODE {
                return Err(SchemaError::ReservedTypeName(type_def.name));
            }
            if types.contains_key(&type_def.name) {
                return Err(SchemaError::DuplicateType(type_def.name));
            }

            let mut fields = envelope_fields(type_def.category);
            fields.append(&mut type_def.fields);
            type_def.fields = fields;

            check_fields(&type_def)?;
            order.push(type_def.name.clone());
            types.insert(type_def.name.clone(), Arc::new(type_def));
        }

        for type_def in types.values() {
            check_references(type_def, &types)?;
        }

        Ok(SchemaRegistry { types, order })
    }
}

fn check_fields(type_def: &TypeDef) -> Result<()> {
    let mut seen = HashSet::new();
    for field in &type_def.fields {
        if !seen.insert(field.name.as_str()) {
            return Err(SchemaError::DuplicateField {
                type_name: type_def.name.clone(),
                field: field.name.clone(),
            });
        }
        if let FieldKind::Choice(group) = &field.kind {
            if group.variants.is_empty() {
                return Err(SchemaError::EmptyChoice {
                    type_name: type_def.name.clone(),
                    field: field.name.clone(),
                });
            }
            if field.is_repeating() {
                return Err(SchemaError::RepeatingChoice {
                    type_name: type_def.name.clone(),
                    field: field.name.clone(),
                });
            }
        }
    }
    Ok(())
}

fn check_references(type_def: &TypeDef, types: &HashMap<String, Arc<TypeDef>>) -> Result<()> {
    for field in &type_def.fields {
        for type_ref in field.type_refs() {
            if let TypeRef::Complex(name) = type_ref {
                if !types.contains_key(name) {
                    return Err(SchemaError::UnknownType {
                        name: name.clone(),
                        referenced_by: format!("{}.{}", type_def.name, field.name),
                    });
                }
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Catalog document
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    types: Vec<CatalogType>,
}

#[derive(Debug, Deserialize)]
struct CatalogType {
    name: String,
    category: TypeCategory,
    #[serde(default)]
    fields: Vec<CatalogField>,
}

#[derive(Debug, Deserialize)]
struct CatalogField {
    name: String,
    #[serde(rename = "type", default)]
    type_code: Option<String>,
    #[serde(default)]
    types: Vec<String>,
    #[serde(default)]
    card: Option<String>,
}

impl CatalogField {
    fn to_field_def(&self, type_name: &str) -> Result<FieldDef> {
        let codes: Vec<&str> = self
            .type_code
            .iter()
            .chain(self.types.iter())
            .map(String::as_str)
            .collect();
        if codes.is_empty() {
            return Err(SchemaError::MissingFieldType {
                type_name: type_name.to_string(),
                field: self.name.clone(),
            });
        }
        let card = match &self.card {
            Some(card) => card.clone(),
            None => Cardinality::OPTIONAL.to_string(),
        };
        FieldDef::from_codes(&self.name, &codes, &card)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::PrimitiveKind;

    fn meta() -> TypeDef {
        TypeDef::new(
            "Meta",
            TypeCategory::Datatype,
            vec![FieldDef::new(
                "versionId",
                TypeRef::Primitive(PrimitiveKind::Id),
                Cardinality::OPTIONAL,
            )],
        )
    }

    #[test]
    fn builder_prepends_envelope_to_resources() {
        let registry = SchemaRegistry::builder()
            .add(meta())
            .resource(
                "Widget",
                vec![FieldDef::from_codes("label", &["string"], "1..1").unwrap()],
            )
            .build()
            .unwrap();

        let widget = registry.resource("Widget").unwrap();
        let names: Vec<_> = widget.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["id", "meta", "implicitRules", "language", "label"]);
        assert!(registry.resource("Meta").is_none());
    }

    #[test]
    fn unknown_complex_reference_fails() {
        let err = SchemaRegistry::builder()
            .datatype(
                "Holder",
                vec![FieldDef::from_codes("thing", &["Missing"], "0..1").unwrap()],
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownType { ref name, .. } if name == "Missing"));
    }

    #[test]
    fn resource_without_meta_type_fails() {
        let err = SchemaRegistry::builder().resource("Lonely", vec![]).build().unwrap_err();
        assert!(matches!(err, SchemaError::UnknownType { ref name, .. } if name == "Meta"));
    }

    #[test]
    fn repeating_choice_is_rejected() {
        let err = SchemaRegistry::builder()
            .datatype(
                "Bad",
                vec![FieldDef::from_codes("value[x]", &["string", "integer"], "0..*").unwrap()],
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::RepeatingChoice { .. }));
    }

    #[test]
    fn duplicate_types_and_fields_are_rejected() {
        let err = SchemaRegistry::builder()
            .add(meta())
            .add(meta())
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateType(_)));

        let err = SchemaRegistry::builder()
            .add(meta())
            .resource(
                "Widget",
                vec![FieldDef::from_codes("id", &["string"], "0..1").unwrap()],
            )
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { ref field, .. } if field == "id"));
    }

    #[test]
    fn reserved_resource_name() {
        let err = SchemaRegistry::builder().datatype("Resource", vec![]).build().unwrap_err();
        assert!(matches!(err, SchemaError::ReservedTypeName(_)));
    }

    #[test]
    fn catalog_field_without_type_fails() {
        let json = r#"{"types":[{"name":"Odd","category":"datatype","fields":[{"name":"x"}]}]}"#;
        let err = SchemaRegistry::from_catalog_json(json).unwrap_err();
        assert!(matches!(err, SchemaError::MissingFieldType { .. }));
    }

    #[test]
    fn catalog_defaults_to_optional_cardinality() {
        let json = r#"{"types":[{"name":"Pair","category":"datatype","fields":[
            {"name":"left","type":"string"},
            {"name":"right","type":"string","card":"1..1"}
        ]}]}"#;
        let registry = SchemaRegistry::from_catalog_json(json).unwrap();
        let pair = registry.get("Pair").unwrap();
        assert_eq!(pair.field("left").unwrap().cardinality, Cardinality::OPTIONAL);
        assert_eq!(pair.field("right").unwrap().cardinality, Cardinality::REQUIRED);
    }
}
