use quickcheck::{QuickCheck, TestResult};
use serde_json::json;
use tessera_format::{
    datatype_to_xml, from_json, resource_from_json, resource_from_str, resource_to_json, to_json,
    to_json_string, to_xml, to_xml_with, FormatError, Resource, XmlOptions,
};
use tessera_models::{normalize, Choice, ComplexNode, Primitive, ResourceNode};

#[test]
fn care_plan_json_carries_resource_type() {
    let plan = resource_from_json(json!({
        "resourceType": "CarePlan",
        "subject": {"reference": "Patient/1"},
        "intent": "plan",
        "status": "active"
    }))
    .unwrap();

    let value = resource_to_json(&plan).unwrap();
    assert_eq!(value["resourceType"], "CarePlan");
    assert_eq!(value["status"], "active");
    assert_eq!(value["intent"], "plan");
    assert_eq!(value["subject"]["reference"], "Patient/1");

    let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, ["resourceType", "status", "intent", "subject"]);
}

#[test]
fn binary_xml_has_content_type_and_no_data() {
    let binary = resource_from_json(json!({
        "resourceType": "Binary",
        "contentType": "image/png"
    }))
    .unwrap();

    let xml = binary.to_xml().unwrap();
    assert!(xml.contains(r#"<contentType value="image/png"/>"#));
    assert!(!xml.contains("<data"));
}

#[test]
fn absent_values_are_never_written() {
    let observation = ResourceNode::new("Observation")
        .with("status", Primitive::code("final"))
        .with("code", ComplexNode::new("CodeableConcept"))
        .with("category", Vec::<ComplexNode>::new())
        .with("value", Choice::default());

    let text = to_json_string(&observation).unwrap();
    assert_eq!(
        text,
        r#"{"resourceType":"Observation","status":"final","code":{}}"#
    );
    assert!(!to_xml(&observation).unwrap().contains("category"));
}

#[test]
fn writers_reject_undeclared_fields() {
    let node = ResourceNode::new("Binary")
        .with("contentType", Primitive::code("text/plain"))
        .with("colour", Primitive::string("blue"));

    let err = resource_to_json(&node).unwrap_err();
    assert!(matches!(
        &err,
        FormatError::UnknownField { type_name, field } if type_name == "Binary" && field == "colour"
    ));
    assert!(matches!(to_xml(&node), Err(FormatError::UnknownField { .. })));
}

#[test]
fn hand_built_nodes_round_trip_whatever_the_build_order() {
    let binary = ResourceNode::new("Binary")
        .with("contentType", Primitive::code("text/plain"))
        .with_id("b1");
    let back = resource_from_str(&to_json_string(&binary).unwrap()).unwrap();
    assert_eq!(back, binary);

    let observation = ResourceNode::new("Observation")
        .with(
            "value",
            Choice::new("Quantity", ComplexNode::new("Quantity").with("unit", Primitive::string("kg"))),
        )
        .with("code", ComplexNode::new("CodeableConcept").with("text", Primitive::string("weight")))
        .with("status", Primitive::code("final"));
    let back = resource_from_json(resource_to_json(&observation).unwrap()).unwrap();
    assert_eq!(back, observation);
}

#[test]
fn multi_line_markdown_survives_xml() {
    let text = "first line\nsecond\tline\r\nthird";
    let observation = resource_from_json(json!({
        "resourceType": "Observation",
        "status": "final",
        "code": {},
        "note": [{"text": text}]
    }))
    .unwrap();

    for options in [XmlOptions::default(), XmlOptions::compact()] {
        let xml = to_xml_with(&observation, &options).unwrap();
        let doc = roxmltree::Document::parse(&xml).unwrap();
        let parsed = doc
            .descendants()
            .find(|n| n.has_tag_name("note"))
            .and_then(|note| note.children().find(|n| n.has_tag_name("text")))
            .and_then(|n| n.attribute("value"));
        assert_eq!(parsed, Some(text));
    }
}

#[test]
fn datatypes_round_trip_through_json() {
    let period = from_json("Period", json!({"end": "2024-02", "start": "2024-01"})).unwrap();
    assert_eq!(to_json(&period).unwrap(), json!({"start": "2024-01", "end": "2024-02"}));

    let xml = datatype_to_xml("period", &period).unwrap();
    let doc = roxmltree::Document::parse(&xml).unwrap();
    let names: Vec<_> = doc
        .root_element()
        .children()
        .filter(|n| n.is_element())
        .map(|n| n.tag_name().name().to_string())
        .collect();
    assert_eq!(names, ["start", "end"]);
}

#[test]
fn compact_and_pretty_xml_parse_the_same() {
    let patient = resource_from_json(json!({
        "resourceType": "Patient",
        "name": {"family": "Lovelace", "given": "Ada"},
        "multipleBirthBoolean": false
    }))
    .unwrap();

    let pretty = to_xml(&patient).unwrap();
    let compact = to_xml_with(&patient, &XmlOptions::compact()).unwrap();
    assert!(pretty.contains('\n'));
    assert!(!compact.contains('\n'));

    let stripped: String = pretty.lines().map(str::trim).collect();
    assert_eq!(stripped, compact);
}

fn observation_json(text: String, value: Option<i64>, flag: bool) -> serde_json::Value {
    let mut raw = json!({
        "resourceType": "Observation",
        "status": "final",
        "code": {"text": text.clone()}
    });
    match value {
        Some(n) => raw["valueInteger"] = json!(n),
        None if flag => raw["valueBoolean"] = json!(flag),
        None => raw["valueString"] = json!(text),
    }
    raw
}

#[test]
fn prop_json_round_trip_preserves_the_tree() {
    fn prop(text: String, value: Option<i64>, flag: bool) -> TestResult {
        let node = match normalize("Observation", observation_json(text, value, flag)) {
            Ok(node) => node,
            Err(_) => return TestResult::discard(),
        };
        let written = match to_json(&node) {
            Ok(v) => v,
            Err(e) => return TestResult::error(e.to_string()),
        };
        TestResult::from_bool(normalize("Observation", written).as_ref() == Ok(&node))
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(String, Option<i64>, bool) -> TestResult);
}

#[test]
fn prop_xml_attribute_text_survives_escaping() {
    fn prop(content_type: String) -> TestResult {
        let unrepresentable = |c: char| {
            (c.is_control() && !matches!(c, '\t' | '\n' | '\r'))
                || matches!(c, '\u{FFFE}' | '\u{FFFF}')
        };
        if content_type.chars().any(unrepresentable) {
            return TestResult::discard();
        }

        let binary =
            ResourceNode::new("Binary").with("contentType", Primitive::code(content_type.clone()));
        let xml = match to_xml(&binary) {
            Ok(xml) => xml,
            Err(e) => return TestResult::error(e.to_string()),
        };
        let doc = match roxmltree::Document::parse(&xml) {
            Ok(doc) => doc,
            Err(e) => return TestResult::error(format!("{e}: {xml}")),
        };

        let value = doc
            .descendants()
            .find(|n| n.has_tag_name("contentType"))
            .and_then(|n| n.attribute("value"));
        TestResult::from_bool(value == Some(content_type.as_str()))
    }

    QuickCheck::new()
        .tests(100)
        .quickcheck(prop as fn(String) -> TestResult);
}
