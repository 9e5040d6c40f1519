//! Identity envelope shared by every resource type
//!
//! Resource types get `id`, `meta`, `implicitRules` and `language` ahead of
//! their own fields. Domain resources additionally get `contained`,
//! `extension` and `modifierExtension`.

use crate::cardinality::Cardinality;
use crate::primitive::PrimitiveKind;
use crate::types::{FieldDef, TypeCategory, TypeRef};

/// JSON discriminant key of a resource.
pub const RESOURCE_TYPE_KEY: &str = "resourceType";

pub const ID_FIELD: &str = "id";
pub const META_FIELD: &str = "meta";
pub const META_TYPE: &str = "Meta";
pub const EXTENSION_TYPE: &str = "Extension";

/// Envelope fields for a category, in wire order. Datatypes get none.
pub fn envelope_fields(category: TypeCategory) -> Vec<FieldDef> {
    let mut fields = Vec::new();
    if !category.is_resource() {
        return fields;
    }

    fields.push(FieldDef::new(
        ID_FIELD,
        TypeRef::Primitive(PrimitiveKind::Id),
        Cardinality::OPTIONAL,
    ));
    fields.push(FieldDef::new(
        META_FIELD,
        TypeRef::Complex(META_TYPE.to_string()),
        Cardinality::OPTIONAL,
    ));
    fields.push(FieldDef::new(
        "implicitRules",
        TypeRef::Primitive(PrimitiveKind::Uri),
        Cardinality::OPTIONAL,
    ));
    fields.push(FieldDef::new(
        "language",
        TypeRef::Primitive(PrimitiveKind::Code),
        Cardinality::OPTIONAL,
    ));

    if category == TypeCategory::DomainResource {
        fields.push(FieldDef::new("contained", TypeRef::Resource, Cardinality::MANY));
        fields.push(FieldDef::new(
            "extension",
            TypeRef::Complex(EXTENSION_TYPE.to_string()),
            Cardinality::MANY,
        ));
        fields.push(FieldDef::new(
            "modifierExtension",
            TypeRef::Complex(EXTENSION_TYPE.to_string()),
            Cardinality::MANY,
        ));
    }

    fields
}
