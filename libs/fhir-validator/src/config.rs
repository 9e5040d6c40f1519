//! Declarative validator configuration
//!
//! A [`ValidatorConfig`] is plain, serializable data. It is checked and turned
//! into an executable [`ValidationPlan`] by [`ValidatorConfig::compile`].

use crate::plan::{ChoicesPlan, FormatsPlan, Step, StructurePlan, ValidationPlan};
use crate::{ConfigError, IssueSeverity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Preset {
    /// Every check, findings are errors, undeclared fields rejected.
    #[default]
    Strict,
    /// Structural checks only, stopping at the first error. Suited to bulk
    /// loading where grammars are checked later.
    Ingestion,
    /// Every check, but choice and format findings are warnings and
    /// undeclared fields are tolerated.
    Lenient,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    pub preset: Preset,
    pub structure: StructureConfig,
    pub choices: ChoicesConfig,
    pub formats: FormatsConfig,
    pub exec: ExecConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureConfig {
    pub enabled: bool,
    pub allow_unknown_fields: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChoicesConfig {
    pub enabled: bool,
    pub severity: IssueSeverity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatsConfig {
    pub enabled: bool,
    pub severity: IssueSeverity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecConfig {
    pub fail_fast: bool,
    pub max_issues: usize,
}

impl Default for StructureConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allow_unknown_fields: false,
        }
    }
}

impl Default for ChoicesConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            severity: IssueSeverity::Error,
        }
    }
}

impl Default for FormatsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            severity: IssueSeverity::Error,
        }
    }
}

impl Default for ExecConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            max_issues: 1000,
        }
    }
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self::preset(Preset::Strict)
    }
}

impl ValidatorConfig {
    pub fn preset(preset: Preset) -> Self {
        let mut cfg = Self {
            preset,
            structure: StructureConfig::default(),
            choices: ChoicesConfig::default(),
            formats: FormatsConfig::default(),
            exec: ExecConfig::default(),
        };

        match preset {
            Preset::Strict => {}
            Preset::Ingestion => {
                cfg.structure.allow_unknown_fields = true;
                cfg.formats.enabled = false;
                cfg.exec.fail_fast = true;
            }
            Preset::Lenient => {
                cfg.structure.allow_unknown_fields = true;
                cfg.choices.severity = IssueSeverity::Warning;
                cfg.formats.severity = IssueSeverity::Warning;
            }
        }

        cfg
    }

    pub fn builder() -> ValidatorConfigBuilder {
        ValidatorConfigBuilder::default()
    }

    /// Parse YAML. Sections left out keep the values of the chosen preset.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        #[derive(Deserialize)]
        struct PresetOnly {
            #[serde(default)]
            preset: Preset,
        }

        let PresetOnly { preset } = serde_yaml::from_str(yaml)?;
        let mut merged = serde_yaml::to_value(Self::preset(preset))?;
        let overrides: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        merge_yaml(&mut merged, overrides);
        Ok(serde_yaml::from_value(merged)?)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn compile(&self) -> Result<ValidationPlan, ConfigError> {
        if self.exec.max_issues == 0 {
            return Err(ConfigError::InvalidConfig(
                "exec.max_issues must be greater than zero".to_string(),
            ));
        }

        let mut steps = Vec::new();
        if self.structure.enabled {
            steps.push(Step::Structure(StructurePlan::from(&self.structure)));
        }
        if self.choices.enabled {
            steps.push(Step::Choices(ChoicesPlan::from(&self.choices)));
        }
        if self.formats.enabled {
            steps.push(Step::Formats(FormatsPlan::from(&self.formats)));
        }

        if steps.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "at least one validation step must be enabled".to_string(),
            ));
        }

        Ok(ValidationPlan {
            steps,
            fail_fast: self.exec.fail_fast,
            max_issues: self.exec.max_issues,
        })
    }
}

/// Deep-merge `overrides` into `base`. A `null` override (`formats:` with no
/// value) keeps the base value.
fn merge_yaml(base: &mut serde_yaml::Value, overrides: serde_yaml::Value) {
    match (base, overrides) {
        (_, serde_yaml::Value::Null) => {}
        (serde_yaml::Value::Mapping(base), serde_yaml::Value::Mapping(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => merge_yaml(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[derive(Debug, Default)]
pub struct ValidatorConfigBuilder {
    cfg: ValidatorConfig,
}

impl ValidatorConfigBuilder {
    /// Reset every setting to the preset's; later calls override it.
    pub fn preset(mut self, preset: Preset) -> Self {
        self.cfg = ValidatorConfig::preset(preset);
        self
    }

    pub fn structure(mut self, enabled: bool) -> Self {
        self.cfg.structure.enabled = enabled;
        self
    }

    pub fn allow_unknown_fields(mut self, allow: bool) -> Self {
        self.cfg.structure.allow_unknown_fields = allow;
        self
    }

    pub fn choices(mut self, enabled: bool) -> Self {
        self.cfg.choices.enabled = enabled;
        self
    }

    pub fn choice_severity(mut self, severity: IssueSeverity) -> Self {
        self.cfg.choices.severity = severity;
        self
    }

    pub fn formats(mut self, enabled: bool) -> Self {
        self.cfg.formats.enabled = enabled;
        self
    }

    pub fn format_severity(mut self, severity: IssueSeverity) -> Self {
        self.cfg.formats.severity = severity;
        self
    }

    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.cfg.exec.fail_fast = fail_fast;
        self
    }

    pub fn max_issues(mut self, max_issues: usize) -> Self {
        self.cfg.exec.max_issues = max_issues;
        self
    }

    pub fn build(self) -> ValidatorConfig {
        self.cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_compile() {
        let strict = ValidatorConfig::preset(Preset::Strict).compile().unwrap();
        assert_eq!(strict.steps.len(), 3);
        assert!(!strict.fail_fast);

        let ingestion = ValidatorConfig::preset(Preset::Ingestion).compile().unwrap();
        assert_eq!(ingestion.steps.len(), 2);
        assert!(ingestion.fail_fast);
        assert!(!ingestion
            .steps
            .iter()
            .any(|s| matches!(s, Step::Formats(_))));
    }

    #[test]
    fn builder_overrides_preset() {
        let cfg = ValidatorConfig::builder()
            .preset(Preset::Ingestion)
            .formats(true)
            .fail_fast(false)
            .max_issues(10)
            .build();

        assert_eq!(cfg.preset, Preset::Ingestion);
        let plan = cfg.compile().unwrap();
        assert_eq!(plan.steps.len(), 3);
        assert_eq!(plan.max_issues, 10);
        assert!(!plan.fail_fast);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let zero = ValidatorConfig::builder().max_issues(0).build();
        assert!(matches!(zero.compile(), Err(ConfigError::InvalidConfig(_))));

        let nothing = ValidatorConfig::builder()
            .structure(false)
            .choices(false)
            .formats(false)
            .build();
        assert!(matches!(nothing.compile(), Err(ConfigError::InvalidConfig(_))));
    }

    #[test]
    fn yaml_keeps_preset_values_for_missing_sections() {
        let yaml = r#"
preset: Lenient
formats:
  severity: Error
exec:
  max_issues: 25
"#;
        let cfg = ValidatorConfig::from_yaml(yaml).unwrap();
        assert_eq!(cfg.preset, Preset::Lenient);
        assert_eq!(cfg.formats.severity, IssueSeverity::Error);
        assert!(cfg.formats.enabled);
        assert_eq!(cfg.choices.severity, IssueSeverity::Warning);
        assert!(cfg.structure.allow_unknown_fields);
        assert_eq!(cfg.exec.max_issues, 25);
        assert!(!cfg.exec.fail_fast);
    }

    #[test]
    fn empty_yaml_sections_keep_preset_values() {
        let yaml = r#"
preset: Lenient
formats:
exec:
  max_issues:
  fail_fast: true
"#;
        let cfg = ValidatorConfig::from_yaml(yaml).unwrap();
        let lenient = ValidatorConfig::preset(Preset::Lenient);
        assert_eq!(cfg.formats, lenient.formats);
        assert_eq!(cfg.exec.max_issues, lenient.exec.max_issues);
        assert!(cfg.exec.fail_fast);
    }

    #[test]
    fn yaml_round_trip() {
        let cfg = ValidatorConfig::preset(Preset::Ingestion);
        let yaml = cfg.to_yaml().unwrap();
        assert_eq!(ValidatorConfig::from_yaml(&yaml).unwrap(), cfg);
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        assert!(matches!(
            ValidatorConfig::from_yaml("exec: [1, 2"),
            Err(ConfigError::Yaml(_))
        ));
    }
}
