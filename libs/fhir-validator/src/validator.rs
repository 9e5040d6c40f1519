use crate::steps::Target;
use crate::{ConfigError, ValidationPlan};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tessera_models::{Element, ResourceNode};
use tessera_schema::SchemaRegistry;

/// Reusable validator - owns the plan, borrows the schema registry
#[derive(Debug, Clone)]
pub struct Validator<'r> {
    plan: ValidationPlan,
    registry: &'r SchemaRegistry,
}

impl<'r> Validator<'r> {
    pub fn new(plan: ValidationPlan, registry: &'r SchemaRegistry) -> Self {
        Self { plan, registry }
    }

    pub fn from_config(
        config: &crate::ValidatorConfig,
        registry: &'r SchemaRegistry,
    ) -> Result<Self, ConfigError> {
        let plan = config.compile()?;
        Ok(Self::new(plan, registry))
    }

    #[tracing::instrument(level = "trace", skip_all, fields(resource_type = %resource.resource_type()))]
    pub fn validate(&self, resource: &ResourceNode) -> ValidationOutcome {
        ValidationRun::new(
            &self.plan,
            self.registry,
            Target::Resource(resource),
            resource.resource_type(),
            Some(resource.resource_type().to_string()),
        )
        .execute()
    }

    /// Validate a datatype value; `type_name` only roots the issue paths.
    pub fn validate_element(&self, type_name: &str, element: &Element) -> ValidationOutcome {
        let resource_type = element.as_resource().map(|r| r.resource_type().to_string());
        ValidationRun::new(
            &self.plan,
            self.registry,
            Target::Element(element),
            type_name,
            resource_type,
        )
        .execute()
    }

    pub fn validate_batch(&self, resources: &[ResourceNode]) -> Vec<ValidationOutcome> {
        resources.iter().map(|r| self.validate(r)).collect()
    }

    pub fn is_valid(&self, resource: &ResourceNode) -> bool {
        self.validate(resource).valid
    }

    pub fn plan(&self) -> &ValidationPlan {
        &self.plan
    }

    pub fn registry(&self) -> &'r SchemaRegistry {
        self.registry
    }
}

/// Short-lived validation execution
struct ValidationRun<'a> {
    plan: &'a ValidationPlan,
    registry: &'a SchemaRegistry,
    target: Target<'a>,
    root_path: &'a str,
    resource_type: Option<String>,
    issues: Vec<ValidationIssue>,
}

impl<'a> ValidationRun<'a> {
    fn new(
        plan: &'a ValidationPlan,
        registry: &'a SchemaRegistry,
        target: Target<'a>,
        root_path: &'a str,
        resource_type: Option<String>,
    ) -> Self {
        Self {
            plan,
            registry,
            target,
            root_path,
            resource_type,
            issues: Vec::new(),
        }
    }

    fn execute(mut self) -> ValidationOutcome {
        for step in &self.plan.steps {
            if self.plan.fail_fast && self.has_errors() {
                break;
            }

            if self.issues.len() >= self.plan.max_issues {
                break;
            }

            self.execute_step(step);
        }

        self.issues.truncate(self.plan.max_issues);
        let valid = !self.has_errors();
        tracing::debug!(
            path = %self.root_path,
            valid,
            issues = self.issues.len(),
            "validation finished"
        );

        ValidationOutcome {
            resource_type: self.resource_type,
            valid,
            issues: self.issues,
        }
    }

    fn execute_step(&mut self, step: &crate::Step) {
        use crate::steps::{choices, formats, structure};
        use crate::Step;

        match step {
            Step::Structure(plan) => structure::validate_structure(
                self.target,
                self.root_path,
                plan,
                self.registry,
                &mut self.issues,
            ),
            Step::Choices(plan) => choices::validate_choices(
                self.target,
                self.root_path,
                plan,
                self.registry,
                &mut self.issues,
            ),
            Step::Formats(plan) => formats::validate_formats(
                self.target,
                self.root_path,
                plan,
                self.registry,
                &mut self.issues,
            ),
        }
    }

    fn has_errors(&self) -> bool {
        self.issues.iter().any(ValidationIssue::is_error)
    }
}

/// Validation result for a single resource
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub resource_type: Option<String>,
    pub valid: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationOutcome {
    pub fn success(resource_type: Option<String>) -> Self {
        Self {
            resource_type,
            valid: true,
            issues: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.valid
    }

    pub fn error_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == IssueSeverity::Warning)
            .count()
    }

    pub fn to_operation_outcome(&self) -> Value {
        serde_json::json!({
            "resourceType": "OperationOutcome",
            "issue": self.issues.iter().map(|i| i.to_json()).collect::<Vec<_>>()
        })
    }
}

/// Individual validation issue
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub code: IssueCode,
    pub diagnostics: String,
    pub location: Option<String>,
    pub expression: Option<Vec<String>>,
}

impl ValidationIssue {
    pub fn new(severity: IssueSeverity, code: IssueCode, diagnostics: String) -> Self {
        Self {
            severity,
            code,
            diagnostics,
            location: None,
            expression: None,
        }
    }

    pub fn error(code: IssueCode, diagnostics: String) -> Self {
        Self::new(IssueSeverity::Error, code, diagnostics)
    }

    pub fn warning(code: IssueCode, diagnostics: String) -> Self {
        Self::new(IssueSeverity::Warning, code, diagnostics)
    }

    pub fn with_location(mut self, location: String) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_expression(mut self, expression: Vec<String>) -> Self {
        self.expression = Some(expression);
        self
    }

    pub fn is_error(&self) -> bool {
        matches!(self.severity, IssueSeverity::Error | IssueSeverity::Fatal)
    }

    fn to_json(&self) -> Value {
        let mut issue = serde_json::json!({
            "severity": self.severity.to_string().to_lowercase(),
            "code": self.code.to_string(),
            "diagnostics": self.diagnostics,
        });

        if let Some(ref loc) = self.location {
            issue["location"] = serde_json::json!([loc]);
        }

        if let Some(ref expr) = self.expression {
            issue["expression"] = serde_json::json!(expr);
        }

        issue
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueSeverity {
    Fatal,
    Error,
    Warning,
    Information,
}

impl std::fmt::Display for IssueSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fatal => write!(f, "Fatal"),
            Self::Error => write!(f, "Error"),
            Self::Warning => write!(f, "Warning"),
            Self::Information => write!(f, "Information"),
        }
    }
}

/// Issue codes raised by the validation steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueCode {
    Structure,
    Required,
    Value,
    Invariant,
}

impl std::fmt::Display for IssueCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Structure => "structure",
            Self::Required => "required",
            Self::Value => "value",
            Self::Invariant => "invariant",
        };
        write!(f, "{}", s)
    }
}
