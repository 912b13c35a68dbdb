use waygraph_compiler::{CompilerConfig, compile};
use waygraph_data::RawDocument;

fn scenario() -> RawDocument {
    serde_json::from_str(include_str!("fixtures/scenario.json")).expect("scenario json parses")
}

#[test]
fn scenario_locations_golden() {
    let out = compile(&scenario(), &CompilerConfig::default()).expect("compile ok");
    let expected = include_str!("fixtures/scenario_locations.py");
    assert_eq!(out.locations, expected);
}

#[test]
fn scenario_regions_golden() {
    let out = compile(&scenario(), &CompilerConfig::default()).expect("compile ok");
    let expected = include_str!("fixtures/scenario_regions.py");
    assert_eq!(out.regions, expected);
}

#[test]
fn scenario_rules_golden() {
    let out = compile(&scenario(), &CompilerConfig::default()).expect("compile ok");
    let expected = include_str!("fixtures/scenario_rules.py");
    assert_eq!(out.rules, expected);
}

#[test]
fn boss_sorts_before_chest() {
    let out = compile(&scenario(), &CompilerConfig::default()).expect("compile ok");
    assert!(out.locations.contains("\"Boss\": base_id + 0,"));
    assert!(out.locations.contains("\"Chest 1\": base_id + 1,"));
}

#[test]
fn compiling_twice_is_byte_identical() {
    let config = CompilerConfig::default();
    let first = compile(&scenario(), &config).expect("compile ok");
    let second = compile(&scenario(), &config).expect("compile ok");
    assert_eq!(first, second);
}

#[test]
fn validation_failure_produces_no_artifacts() {
    let doc: RawDocument = serde_json::from_str(
        r#"{ "regions": [
            { "name": "A", "locations": [ { "name": "Twin" } ] },
            { "name": "B", "locations": [ { "name": "Twin" } ] }
        ] }"#,
    )
    .expect("json parses");
    let err = compile(&doc, &CompilerConfig::default()).unwrap_err();
    assert!(err.to_string().contains("duplicate location name 'Twin'"), "{err}");
}

#[test]
fn malformed_location_rule_names_the_location() {
    let doc: RawDocument = serde_json::from_str(
        r#"{ "regions": [ { "name": "A", "locations": [ { "name": "Altar", "rule": "Key and (Lamp" } ] } ] }"#,
    )
    .expect("json parses");
    let err = compile(&doc, &CompilerConfig::default()).unwrap_err();
    assert!(matches!(err, waygraph_compiler::CompileError::MalformedExpression { .. }));
    assert!(err.to_string().contains("location 'Altar' (region 'A')"), "{err}");
}

#[test]
fn colliding_region_tables_are_rejected() {
    let doc: RawDocument = serde_json::from_str(
        r#"{ "regions": [
            { "name": "Lava Ruins", "locations": [ { "name": "One" } ] },
            { "name": "Lava-Ruins", "locations": [ { "name": "Two" } ] }
        ] }"#,
    )
    .expect("json parses");
    let err = compile(&doc, &CompilerConfig::default()).unwrap_err();
    assert!(
        matches!(err, waygraph_compiler::CompileError::RegionIdentifierCollision { ref identifier, .. } if identifier == "lava_ruins_locations")
    );
}

#[test]
fn boolean_location_rule_is_rejected() {
    let doc: RawDocument = serde_json::from_str(
        r#"{ "regions": [ { "name": "Vault", "locations": [ { "name": "Sealed", "rule": false } ] } ] }"#,
    )
    .expect("json parses");
    let err = compile(&doc, &CompilerConfig::default()).unwrap_err();
    assert!(matches!(
        err,
        waygraph_compiler::CompileError::Validation(waygraph_data::ValidationError::NonStringLocationRule { .. })
    ));
    assert!(err.to_string().contains("location 'Sealed'"), "{err}");
}

#[test]
fn boolean_exit_rule_defaults_to_true() {
    let doc: RawDocument = serde_json::from_str(
        r#"{ "regions": [ { "name": "A", "exits": [ { "name": "B", "rule": false } ] }, { "name": "B" } ] }"#,
    )
    .expect("json parses");
    let out = compile(&doc, &CompilerConfig::default()).expect("compile ok");
    assert!(!out.rules.contains("get_entrance"));
}
