//! Choice exclusivity: at most one variant of a `[x]` field may be set.

use super::{walk_target, Target, Visit};
use crate::validator::{IssueCode, ValidationIssue};
use crate::ChoicesPlan;
use tessera_models::Element;
use tessera_schema::{FieldDef, SchemaRegistry};

pub fn validate_choices(
    target: Target<'_>,
    root_path: &str,
    plan: &ChoicesPlan,
    registry: &SchemaRegistry,
    issues: &mut Vec<ValidationIssue>,
) {
    let mut check = ChoiceCheck { plan, issues };
    walk_target(registry, root_path, target, &mut check);
}

struct ChoiceCheck<'a> {
    plan: &'a ChoicesPlan,
    issues: &'a mut Vec<ValidationIssue>,
}

impl Visit for ChoiceCheck<'_> {
    fn field(&mut self, path: &str, def: &FieldDef, value: Option<&Element>) {
        let Some(choice) = value.and_then(Element::as_choice) else {
            return;
        };
        if choice.is_exclusive() {
            return;
        }

        let variants: Vec<&str> = choice.type_codes().collect();
        self.issues.push(
            ValidationIssue::new(
                self.plan.severity,
                IssueCode::Invariant,
                format!(
                    "Only one of {}[x] may be set, found {}",
                    def.name,
                    variants.join(", ")
                ),
            )
            .with_location(path.to_string())
            .with_expression(vec![path.to_string()]),
        );
    }
}
