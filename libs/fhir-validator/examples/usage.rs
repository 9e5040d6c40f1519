use serde_json::json;
use tessera_models::normalize_resource;
use tessera_schema::registry;
use tessera_validator::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Example 1: Using presets
    let ingestion_cfg = ValidatorConfig::preset(Preset::Ingestion);
    let plan = ingestion_cfg.compile()?;
    println!("Ingestion plan has {} steps", plan.steps.len());

    // Example 2: Builder pattern
    let custom_cfg = ValidatorConfig::builder()
        .preset(Preset::Strict)
        .allow_unknown_fields(true)
        .format_severity(IssueSeverity::Warning)
        .fail_fast(true)
        .max_issues(500)
        .build();

    let plan = custom_cfg.compile()?;
    println!("Custom plan has {} steps", plan.steps.len());

    // Example 3: YAML configuration
    let yaml = r#"
preset: Lenient
formats:
  severity: Error
exec:
  fail_fast: false
  max_issues: 1000
"#;

    let cfg = ValidatorConfig::from_yaml(yaml)?;
    let validator = Validator::from_config(&cfg, registry())?;

    // Example 4: Validate a normalized resource
    let observation = normalize_resource(json!({
        "resourceType": "Observation",
        "status": "final",
        "code": {"text": "weight"},
        "effectiveDateTime": "2024-13-01",
        "valueString": "72 kg",
        "valueInteger": 72
    }))?;

    let outcome = validator.validate(&observation);
    println!("Valid: {}", outcome.valid);
    println!("{}", serde_json::to_string_pretty(&outcome.to_operation_outcome())?);

    // Example 5: Error handling
    let invalid_cfg = ValidatorConfig::builder()
        .structure(false)
        .choices(false)
        .formats(false)
        .build();

    match invalid_cfg.compile() {
        Ok(_) => println!("Should not happen"),
        Err(e) => println!("Caught expected error: {}", e),
    }

    // Example 6: Export to YAML
    let cfg = ValidatorConfig::preset(Preset::Strict);
    println!("\nStrict preset as YAML:\n{}", cfg.to_yaml()?);

    Ok(())
}
