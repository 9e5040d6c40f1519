use crate::{ChoicesConfig, FormatsConfig, IssueSeverity, StructureConfig};

/// Compiled validation plan - list of steps to execute
#[derive(Debug, Clone)]
pub struct ValidationPlan {
    pub steps: Vec<Step>,
    pub fail_fast: bool,
    pub max_issues: usize,
}

impl ValidationPlan {
    /// Every step enabled, findings reported as errors.
    pub fn full() -> Self {
        Self {
            steps: vec![
                Step::Structure(StructurePlan {
                    allow_unknown_fields: false,
                }),
                Step::Choices(ChoicesPlan {
                    severity: IssueSeverity::Error,
                }),
                Step::Formats(FormatsPlan {
                    severity: IssueSeverity::Error,
                }),
            ],
            fail_fast: false,
            max_issues: 1000,
        }
    }
}

#[derive(Debug, Clone)]
pub enum Step {
    Structure(StructurePlan),
    Choices(ChoicesPlan),
    Formats(FormatsPlan),
}

// ============================================================================
// Step Plans
// ============================================================================

#[derive(Debug, Clone)]
pub struct StructurePlan {
    pub allow_unknown_fields: bool,
}

impl From<&StructureConfig> for StructurePlan {
    fn from(cfg: &StructureConfig) -> Self {
        Self {
            allow_unknown_fields: cfg.allow_unknown_fields,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChoicesPlan {
    pub severity: IssueSeverity,
}

impl From<&ChoicesConfig> for ChoicesPlan {
    fn from(cfg: &ChoicesConfig) -> Self {
        Self {
            severity: cfg.severity,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormatsPlan {
    pub severity: IssueSeverity,
}

impl From<&FormatsConfig> for FormatsPlan {
    fn from(cfg: &FormatsConfig) -> Self {
        Self {
            severity: cfg.severity,
        }
    }
}
