use tessera_schema::{
    registry, Cardinality, ChoiceGroup, FieldDef, FieldKind, PrimitiveKind, SchemaRegistry,
    TypeCategory, TypeRef,
};

#[test]
fn core_registry_loads_every_record_kind() {
    let registry = registry();
    for name in [
        "Basic",
        "Binary",
        "CarePlan",
        "Claim",
        "Contract",
        "Coverage",
        "MedicationRequest",
        "Observation",
        "Patient",
    ] {
        assert!(registry.resource(name).is_some(), "{name} should be a resource");
    }
    assert!(registry.get("Coding").is_some());
    assert!(registry.resource("Coding").is_none());
}

#[test]
fn every_resource_starts_with_the_envelope() {
    for resource in registry().resource_types() {
        assert_eq!(resource.fields[0].name, "id", "{}", resource.name);
        assert_eq!(resource.fields[1].name, "meta", "{}", resource.name);
        assert_eq!(
            resource.fields[1].kind,
            FieldKind::Single(TypeRef::Complex("Meta".to_string()))
        );
    }
}

#[test]
fn binary_is_a_plain_resource() {
    let binary = registry().resource("Binary").unwrap();
    assert_eq!(binary.category, TypeCategory::Resource);
    assert!(binary.field("contained").is_none());

    let content_type = binary.field("contentType").unwrap();
    assert_eq!(content_type.cardinality, Cardinality::REQUIRED);
    assert_eq!(
        content_type.kind,
        FieldKind::Single(TypeRef::Primitive(PrimitiveKind::Code))
    );
}

#[test]
fn care_plan_required_fields() {
    let care_plan = registry().resource("CarePlan").unwrap();
    let required: Vec<_> = care_plan.required_fields().map(|f| f.name.as_str()).collect();
    assert_eq!(required, ["status", "intent", "subject"]);
}

#[test]
fn medication_is_an_exactly_one_choice() {
    let request = registry().resource("MedicationRequest").unwrap();
    let medication = request.field("medication").unwrap();
    assert!(medication.is_required());
    let group = medication.choice_group().unwrap();
    assert_eq!(
        group.variant_for_key("medication", "medicationReference"),
        Some(&TypeRef::Complex("Reference".to_string()))
    );
    assert_eq!(
        ChoiceGroup::key_for("medication", &group.variants[0]),
        "medicationCodeableConcept"
    );
}

#[test]
fn core_builder_accepts_additional_record_kinds() {
    let registry = SchemaRegistry::core_builder()
        .unwrap()
        .domain_resource(
            "Widget",
            vec![
                FieldDef::from_codes("label", &["string"], "1..1").unwrap(),
                FieldDef::from_codes("owner", &["Reference"], "0..1").unwrap(),
            ],
        )
        .build()
        .unwrap();
    assert_eq!(registry.len(), tessera_schema::registry().len() + 1);
    assert!(registry.resource("Widget").unwrap().field("extension").is_some());
}
