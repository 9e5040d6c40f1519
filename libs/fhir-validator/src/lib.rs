//! On-demand validation of typed record trees
//!
//! Construction (normalization) only enforces structure. Everything that may
//! legitimately be deferred is checked here, when the caller asks for it:
//!
//! - primitive format grammars ([`validate_primitive`])
//! - choice exclusivity (at most one `[x]` variant set)
//! - structure and cardinality of hand-assembled trees
//!
//! Validation runs in three phases: a declarative [`ValidatorConfig`] is
//! compiled into a [`ValidationPlan`], which a reusable [`Validator`] executes
//! against any number of trees.
//!
//! ```rust
//! use tessera_models::normalize_resource;
//! use tessera_validator::{validate_primitive, PrimitiveKind};
//!
//! assert!(validate_primitive(PrimitiveKind::PositiveInt, "7"));
//! assert!(!validate_primitive(PrimitiveKind::PositiveInt, "0"));
//!
//! let observation = normalize_resource(serde_json::json!({
//!     "resourceType": "Observation",
//!     "status": "final",
//!     "code": {"text": "x"},
//!     "valueString": "a",
//!     "valueInteger": 1
//! }))
//! .unwrap();
//! assert!(!tessera_validator::is_valid(&observation));
//! ```

mod config;
mod error;
mod plan;
pub mod primitive;
pub mod steps;
mod validator;

pub use config::{
    ChoicesConfig, ExecConfig, FormatsConfig, Preset, StructureConfig, ValidatorConfig,
    ValidatorConfigBuilder,
};
pub use error::ConfigError;
pub use plan::{ChoicesPlan, FormatsPlan, Step, StructurePlan, ValidationPlan};
pub use primitive::{validate_primitive, validate_value};
pub use validator::{
    IssueCode, IssueSeverity, ValidationIssue, ValidationOutcome, Validator,
};

pub use tessera_schema::PrimitiveKind;

use tessera_models::ResourceNode;
use tessera_schema::registry;

/// Run every check against the global registry.
pub fn validate(resource: &ResourceNode) -> ValidationOutcome {
    Validator::new(ValidationPlan::full(), registry()).validate(resource)
}

/// `true` when [`validate`] reports no errors.
pub fn is_valid(resource: &ResourceNode) -> bool {
    validate(resource).valid
}
