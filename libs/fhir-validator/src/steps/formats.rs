//! Primitive format grammars over every primitive in the tree.

use super::{walk_target, Target, Visit};
use crate::primitive::validate_value;
use crate::validator::{IssueCode, ValidationIssue};
use crate::FormatsPlan;
use tessera_models::{Element, Primitive};
use tessera_schema::SchemaRegistry;

pub fn validate_formats(
    target: Target<'_>,
    root_path: &str,
    plan: &FormatsPlan,
    registry: &SchemaRegistry,
    issues: &mut Vec<ValidationIssue>,
) {
    let mut check = FormatCheck { plan, issues };
    walk_target(registry, root_path, target, &mut check);
}

struct FormatCheck<'a> {
    plan: &'a FormatsPlan,
    issues: &'a mut Vec<ValidationIssue>,
}

impl Visit for FormatCheck<'_> {
    fn primitive(&mut self, path: &str, value: &Primitive) {
        if validate_value(value) {
            return;
        }

        self.issues.push(
            ValidationIssue::new(
                self.plan.severity,
                IssueCode::Value,
                format!("Invalid {} value '{}'", value.kind(), value.lexical()),
            )
            .with_location(path.to_string())
            .with_expression(vec![path.to_string()]),
        );
    }
}
