//! Structural checks for hand-assembled trees
//!
//! The normalizer already guarantees these for trees it builds; trees put
//! together by hand (or edited after construction) can still violate them:
//! - required fields present, repetition within the declared cardinality
//! - values of the declared kind or type
//! - choice variants drawn from the declared group
//! - no undeclared fields (unless allowed by the plan)

use super::{walk_target, Target, Visit};
use crate::validator::{IssueCode, ValidationIssue};
use crate::StructurePlan;
use tessera_models::Element;
use tessera_schema::{FieldDef, FieldKind, SchemaRegistry, TypeDef, TypeRef};

pub fn validate_structure(
    target: Target<'_>,
    root_path: &str,
    plan: &StructurePlan,
    registry: &SchemaRegistry,
    issues: &mut Vec<ValidationIssue>,
) {
    let mut check = StructureCheck {
        plan,
        registry,
        issues,
    };
    walk_target(registry, root_path, target, &mut check);
}

struct StructureCheck<'a> {
    plan: &'a StructurePlan,
    registry: &'a SchemaRegistry,
    issues: &'a mut Vec<ValidationIssue>,
}

impl StructureCheck<'_> {
    fn push(&mut self, code: IssueCode, path: &str, diagnostics: String) {
        self.issues.push(
            ValidationIssue::error(code, diagnostics)
                .with_location(path.to_string())
                .with_expression(vec![path.to_string()]),
        );
    }

    fn check_cardinality(&mut self, path: &str, def: &FieldDef, value: &Element) {
        let count = match value {
            Element::List(items) => {
                if !def.is_repeating() {
                    self.push(
                        IssueCode::Structure,
                        path,
                        format!("Field {} does not repeat but holds a list", def.name),
                    );
                }
                items.len()
            }
            Element::Choice(choice) => choice.len().min(1),
            _ => 1,
        };

        if count == 0 && def.is_required() {
            self.push(
                IssueCode::Required,
                path,
                format!("Missing required field {}", def.name),
            );
        } else if count > 0 && !def.cardinality.allows(count) {
            self.push(
                IssueCode::Structure,
                path,
                format!(
                    "Field {} has {} items, cardinality is {}",
                    def.name, count, def.cardinality
                ),
            );
        }
    }

    fn check_type(&mut self, path: &str, expected: &TypeRef, value: &Element) {
        let found = match (expected, value) {
            (TypeRef::Primitive(kind), Element::Primitive(p)) if p.kind() == *kind => return,
            (TypeRef::Complex(name), Element::Complex(node)) if node.type_name() == name => {
                return
            }
            (TypeRef::Complex(name), Element::Resource(r)) if r.resource_type() == name => return,
            (TypeRef::Resource, Element::Resource(r)) => {
                if self.registry.resource(r.resource_type()).is_some() {
                    return;
                }
                r.resource_type().to_string()
            }
            (_, other) => other.describe(),
        };

        self.push(
            IssueCode::Structure,
            path,
            format!("Expected {expected}, found {found}"),
        );
    }
}

impl Visit for StructureCheck<'_> {
    fn node(&mut self, path: &str, type_name: &str, def: Option<&TypeDef>) {
        if def.is_none() {
            self.push(
                IssueCode::Structure,
                path,
                format!("Unknown type {type_name}"),
            );
        }
    }

    fn field(&mut self, path: &str, def: &FieldDef, value: Option<&Element>) {
        let Some(value) = value else {
            if def.is_required() {
                self.push(
                    IssueCode::Required,
                    path,
                    format!("Missing required field {}", def.name),
                );
            }
            return;
        };

        self.check_cardinality(path, def, value);

        match &def.kind {
            FieldKind::Single(expected) => {
                if let Element::List(items) = value {
                    for (idx, item) in items.iter().enumerate() {
                        self.check_type(&format!("{path}[{idx}]"), expected, item);
                    }
                } else {
                    self.check_type(path, expected, value);
                }
            }
            FieldKind::Choice(group) => {
                let Element::Choice(choice) = value else {
                    self.push(
                        IssueCode::Structure,
                        path,
                        format!("Field {} must hold a choice, found {}", def.name, value.describe()),
                    );
                    return;
                };
                for entry in choice.entries() {
                    match group.variant_for_code(&entry.type_code) {
                        Some(variant) => {
                            let variant_path = format!("{path}{}", variant.variant_suffix());
                            self.check_type(&variant_path, variant, &entry.value)
                        }
                        None => self.push(
                            IssueCode::Structure,
                            path,
                            format!(
                                "{} is not a permitted type for {}[x]",
                                entry.type_code, def.name
                            ),
                        ),
                    }
                }
            }
        }
    }

    fn undeclared(&mut self, path: &str, _value: &Element) {
        if !self.plan.allow_unknown_fields {
            self.push(IssueCode::Structure, path, "Unknown field".to_string());
        }
    }
}
