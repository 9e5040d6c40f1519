//! Schema-ordered view of a node's fields, shared by both writers.
//!
//! Fields come out in declaration order regardless of how the node was
//! assembled. Absent values (empty lists, empty choices) are dropped, single
//! values on repeating fields are treated as one-item lists, and anything the
//! wire formats cannot express is rejected with a path.

use crate::error::{FormatError, Result};
use tessera_models::{Choice, ComplexNode, Element};
use tessera_schema::{ChoiceGroup, FieldKind, SchemaRegistry};

pub(crate) enum Slot<'a> {
    Single(&'a Element),
    Many(&'a [Element]),
    /// Wire key and value of every set variant.
    Choice(Vec<(String, &'a Element)>),
}

pub(crate) struct Entry<'a> {
    pub name: &'a str,
    pub slot: Slot<'a>,
}

pub(crate) fn layout<'a>(
    registry: &'a SchemaRegistry,
    node: &'a ComplexNode,
    path: &str,
) -> Result<Vec<Entry<'a>>> {
    let def = registry
        .get(node.type_name())
        .ok_or_else(|| FormatError::UnknownType(node.type_name().to_string()))?;

    if let Some((name, _)) = node.fields().find(|(name, _)| def.field(name).is_none()) {
        return Err(FormatError::UnknownField {
            type_name: def.name.clone(),
            field: name.to_string(),
        });
    }

    let mut entries = Vec::with_capacity(node.len());
    for field in &def.fields {
        let Some(value) = node.get(&field.name) else {
            continue;
        };
        let field_path = format!("{path}.{}", field.name);

        let slot = match (&field.kind, value) {
            (FieldKind::Choice(_), Element::Choice(choice)) if choice.is_empty() => continue,
            (FieldKind::Choice(group), Element::Choice(choice)) => {
                Slot::Choice(choice_variants(&field.name, choice, group, &field_path)?)
            }
            (FieldKind::Choice(_), other) => {
                return Err(FormatError::shape(field_path, "choice", other.describe()))
            }
            (FieldKind::Single(_), Element::Choice(_)) => {
                return Err(FormatError::shape(field_path, "single value", "choice"))
            }
            (FieldKind::Single(_), Element::List(items)) if items.is_empty() => continue,
            (FieldKind::Single(_), Element::List(items)) if field.is_repeating() => {
                Slot::Many(items)
            }
            (FieldKind::Single(_), Element::List(_)) => {
                return Err(FormatError::shape(field_path, "single value", "list"))
            }
            (FieldKind::Single(_), value) if field.is_repeating() => {
                Slot::Many(std::slice::from_ref(value))
            }
            (FieldKind::Single(_), value) => Slot::Single(value),
        };

        entries.push(Entry {
            name: &field.name,
            slot,
        });
    }

    Ok(entries)
}

fn choice_variants<'a>(
    base: &str,
    choice: &'a Choice,
    group: &ChoiceGroup,
    path: &str,
) -> Result<Vec<(String, &'a Element)>> {
    choice
        .entries()
        .iter()
        .map(|entry| {
            let variant = group.variant_for_code(&entry.type_code).ok_or_else(|| {
                FormatError::shape(path, format!("{base}[x] variant"), entry.type_code.as_str())
            })?;
            Ok((ChoiceGroup::key_for(base, variant), &entry.value))
        })
        .collect()
}
