//! End-to-end tests for instance generation.
//!
//! Each test builds a schema, runs `generate`, and checks the populated
//! instance: primitives, enums, arrays, nested concepts and resources,
//! idempotence over pre-populated values, optional fields and defaults.

use modelgen::{
    ClassDeclaration, EnumDeclaration, Error, Field, GenerateOptions, Instance, ModelSchema,
    RelationshipDeclaration, Resource, Value, generate,
};
use pretty_assertions::assert_eq;

// ============================================================================
// Helpers
// ============================================================================

fn is_identifier(value: &str, field: &str) -> bool {
    match value.strip_prefix(field).and_then(|rest| rest.strip_prefix(':')) {
        Some(digits) => digits.len() == 4 && digits.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}

fn vehicle_schema() -> ModelSchema {
    ModelSchema::builder()
        .add_enum(EnumDeclaration::new("org.acme", "Fuel", ["PETROL", "DIESEL", "ELECTRIC"]))
        .add_class(
            ClassDeclaration::concept("org.acme", "Address")
                .with_property(Field::new("street", "String"))
                .with_property(Field::new("city", "String")),
        )
        .add_class(
            ClassDeclaration::participant("org.acme", "Person")
                .identified_by("email")
                .with_property(Field::new("email", "String"))
                .with_property(Field::new("home", "Address")),
        )
        .add_class(
            ClassDeclaration::asset("org.acme", "Vehicle")
                .identified_by("vin")
                .with_property(Field::new("vin", "String"))
                .with_property(Field::new("colour", "String"))
                .with_property(Field::new("manufacturer", "String")),
        )
        .add_class(
            ClassDeclaration::asset("org.acme", "Car")
                .identified_by("vin")
                .with_property(Field::new("vin", "String"))
                .with_property(Field::new("seats", "Integer"))
                .with_property(Field::new("mileage", "Long"))
                .with_property(Field::new("price", "Double"))
                .with_property(Field::new("insured", "Boolean"))
                .with_property(Field::new("registered", "DateTime"))
                .with_property(Field::new("fuel", "Fuel"))
                .with_property(Field::new("previousOwners", "String").array())
                .with_property(Field::new("fuels", "Fuel").array())
                .with_property(Field::new("garage", "Address"))
                .with_property(Field::new("keeper", "Person"))
                .with_property(RelationshipDeclaration::new("owner", "Person")),
        )
        .build()
        .unwrap()
}

fn generate_resource(schema: &ModelSchema, target: &str, options: &GenerateOptions) -> Resource {
    generate(schema, target, None, options)
        .unwrap()
        .into_resource()
        .expect("a resource")
}

// ============================================================================
// 1. The Vehicle example: identifier plus two strings
// ============================================================================

#[test]
fn test_vehicle_example() {
    let schema = vehicle_schema();
    let vehicle = generate_resource(&schema, "org.acme.Vehicle", &GenerateOptions::sample());

    assert_eq!(vehicle.namespace, "org.acme");
    assert_eq!(vehicle.type_name, "Vehicle");
    assert!(is_identifier(&vehicle.identifier, "vin"), "{}", vehicle.identifier);
    assert_eq!(vehicle.get("vin"), Some(&Value::String(vehicle.identifier.clone())));
    assert!(matches!(vehicle.get("colour"), Some(Value::String(_))));
    assert!(matches!(vehicle.get("manufacturer"), Some(Value::String(_))));
    assert_eq!(vehicle.properties.len(), 3);
}

// ============================================================================
// 2. Every primitive kind maps to its generator method
// ============================================================================

#[test]
fn test_primitive_kinds() {
    let schema = vehicle_schema();
    let car = generate_resource(&schema, "org.acme.Car", &GenerateOptions::sample());

    assert!(matches!(car.get("seats"), Some(Value::Integer(_))));
    assert!(matches!(car.get("mileage"), Some(Value::Long(_))));
    assert!(matches!(car.get("price"), Some(Value::Double(_))));
    assert!(matches!(car.get("insured"), Some(Value::Boolean(_))));
    assert!(matches!(car.get("registered"), Some(Value::DateTime(_))));
}

// ============================================================================
// 3. Enums produce a member literal, by name
// ============================================================================

#[test]
fn test_enum_literal() {
    let schema = vehicle_schema();
    for _ in 0..20 {
        let car = generate_resource(&schema, "org.acme.Car", &GenerateOptions::sample());
        let fuel = car.get("fuel").and_then(Value::as_str).unwrap();
        assert!(["PETROL", "DIESEL", "ELECTRIC"].contains(&fuel), "{fuel}");
    }
}

// ============================================================================
// 4. Arrays always hold exactly three elements
// ============================================================================

#[test]
fn test_arrays_have_three_elements() {
    let schema = vehicle_schema();
    let car = generate_resource(&schema, "org.acme.Car", &GenerateOptions::sample());

    let owners = car.get("previousOwners").and_then(Value::as_list).unwrap();
    assert_eq!(owners.len(), 3);
    assert!(owners.iter().all(|v| matches!(v, Value::String(_))));

    let fuels = car.get("fuels").and_then(Value::as_list).unwrap();
    assert_eq!(fuels.len(), 3);
    assert!(fuels.iter().all(|v| v.as_str().is_some()));
}

// ============================================================================
// 5. Concepts nest by value and are populated
// ============================================================================

#[test]
fn test_nested_concept() {
    let schema = vehicle_schema();
    let car = generate_resource(&schema, "org.acme.Car", &GenerateOptions::sample());

    let garage = car.get("garage").and_then(Value::as_concept).unwrap();
    assert_eq!(garage.fully_qualified_type(), "org.acme.Address");
    assert!(matches!(garage.get("street"), Some(Value::String(_))));
    assert!(matches!(garage.get("city"), Some(Value::String(_))));
}

// ============================================================================
// 6. Resource-typed fields nest a full resource with its own identifier
// ============================================================================

#[test]
fn test_nested_resource() {
    let schema = vehicle_schema();
    let car = generate_resource(&schema, "org.acme.Car", &GenerateOptions::sample());

    let keeper = car.get("keeper").and_then(Value::as_resource).unwrap();
    assert_eq!(keeper.fully_qualified_type(), "org.acme.Person");
    assert!(is_identifier(&keeper.identifier, "email"));
    assert!(keeper.get("home").and_then(Value::as_concept).is_some());
}

// ============================================================================
// 7. Relationships are pointers only
// ============================================================================

#[test]
fn test_relationship_is_pointer() {
    let schema = vehicle_schema();
    let car = generate_resource(&schema, "org.acme.Car", &GenerateOptions::sample());

    let owner = car.get("owner").and_then(Value::as_relationship).unwrap();
    assert_eq!(owner.namespace, "org.acme");
    assert_eq!(owner.type_name, "Person");
    assert!(is_identifier(&owner.identifier, "email"));
}

// ============================================================================
// 8. Pre-populated values are left alone
// ============================================================================

#[test]
fn test_prepopulated_values_untouched() {
    let schema = vehicle_schema();
    let partial = Resource::new("org.acme", "Vehicle", "VIN-123")
        .with_property("vin", "VIN-123")
        .with_property("colour", "red");

    let out = generate(&schema, "org.acme.Vehicle", Some(Instance::Resource(partial)), &GenerateOptions::sample())
        .unwrap()
        .into_resource()
        .unwrap();

    assert_eq!(out.identifier, "VIN-123");
    assert_eq!(out.get("vin"), Some(&Value::from("VIN-123")));
    assert_eq!(out.get("colour"), Some(&Value::from("red")));
    assert!(matches!(out.get("manufacturer"), Some(Value::String(_))));
}

#[test]
fn test_partial_identifier_field_mirrors_identifier() {
    let schema = vehicle_schema();
    let partial = Resource::new("org.acme", "Vehicle", "VIN-77");
    let out = generate(&schema, "org.acme.Vehicle", Some(partial.into()), &GenerateOptions::sample())
        .unwrap();
    assert_eq!(out.get("vin"), Some(&Value::from("VIN-77")));
}

#[test]
fn test_null_counts_as_unset() {
    let schema = vehicle_schema();
    let partial = Resource::new("org.acme", "Vehicle", "VIN-9")
        .with_property("vin", "VIN-9")
        .with_property("colour", Value::Null);

    let out = generate(&schema, "org.acme.Vehicle", Some(partial.into()), &GenerateOptions::sample())
        .unwrap();
    assert!(matches!(out.get("colour"), Some(Value::String(_))));
}

// ============================================================================
// 9. Regenerating a complete instance changes nothing
// ============================================================================

#[test]
fn test_idempotent() {
    let schema = vehicle_schema();
    let first = generate(&schema, "org.acme.Car", None, &GenerateOptions::sample()).unwrap();
    let second = generate(&schema, "org.acme.Car", Some(first.clone()), &GenerateOptions::sample()).unwrap();
    assert_eq!(first, second);
}

// ============================================================================
// 10. Empty generator yields zero values
// ============================================================================

#[test]
fn test_empty_generator() {
    let schema = vehicle_schema();
    let car = generate_resource(&schema, "org.acme.Car", &GenerateOptions::empty());

    assert_eq!(car.get("seats"), Some(&Value::Integer(0)));
    assert_eq!(car.get("mileage"), Some(&Value::Long(0)));
    assert_eq!(car.get("price"), Some(&Value::Double(0.0)));
    assert_eq!(car.get("insured"), Some(&Value::Boolean(false)));
    assert_eq!(car.get("fuel"), Some(&Value::from("PETROL")));
    assert_eq!(
        car.get("previousOwners"),
        Some(&Value::from(vec!["", "", ""]))
    );
    // Identifiers stay random even with zero values.
    assert!(is_identifier(&car.identifier, "vin"));
}

// ============================================================================
// 11. Optional fields and defaults
// ============================================================================

fn optional_schema() -> ModelSchema {
    ModelSchema::builder()
        .add_enum(EnumDeclaration::new("org.acme", "Size", ["S", "M", "L"]))
        .add_class(
            ClassDeclaration::asset("org.acme", "Shirt")
                .identified_by("sku")
                .with_property(Field::new("sku", "String"))
                .with_property(Field::new("note", "String").optional())
                .with_property(RelationshipDeclaration::new("maker", "Maker").optional())
                .with_property(Field::new("stock", "Integer").with_default("12"))
                .with_property(Field::new("size", "Size").with_default("M")),
        )
        .add_class(
            ClassDeclaration::participant("org.acme", "Maker")
                .identified_by("id")
                .with_property(Field::new("id", "String")),
        )
        .build()
        .unwrap()
}

#[test]
fn test_optional_fields_skipped_when_excluded() {
    let schema = optional_schema();
    let options = GenerateOptions::sample().include_optional_fields(false);
    let shirt = generate_resource(&schema, "org.acme.Shirt", &options);

    assert_eq!(shirt.get("note"), None);
    assert_eq!(shirt.get("maker"), None);
    assert!(shirt.get("sku").is_some());
}

#[test]
fn test_optional_fields_included_by_default() {
    let schema = optional_schema();
    let shirt = generate_resource(&schema, "org.acme.Shirt", &GenerateOptions::default());

    assert!(matches!(shirt.get("note"), Some(Value::String(_))));
    assert!(matches!(shirt.get("maker"), Some(Value::Relationship(_))));
}

#[test]
fn test_defaults_used() {
    let schema = optional_schema();
    for _ in 0..10 {
        let shirt = generate_resource(&schema, "org.acme.Shirt", &GenerateOptions::sample());
        assert_eq!(shirt.get("stock"), Some(&Value::Integer(12)));
        assert_eq!(shirt.get("size"), Some(&Value::from("M")));
    }
}

// ============================================================================
// 12. Concept roots and JSON-configured calls
// ============================================================================

#[test]
fn test_concept_root() {
    let schema = vehicle_schema();
    let address = generate(&schema, "org.acme.Address", None, &GenerateOptions::sample())
        .unwrap()
        .into_concept()
        .unwrap();
    assert_eq!(address.properties.len(), 2);
}

#[test]
fn test_json_schema_and_options() {
    let schema = ModelSchema::from_json(
        r#"{
            "classes": [{
                "namespace": "org.acme",
                "name": "Vehicle",
                "kind": "asset",
                "identifiedBy": "vin",
                "properties": [
                    {"kind": "field", "name": "vin", "type": "String"},
                    {"kind": "field", "name": "colour", "type": "String"},
                    {"kind": "field", "name": "doors", "type": "Integer", "array": true}
                ]
            }]
        }"#,
    )
    .unwrap();
    let options = GenerateOptions::from_json(r#"{"valueGenerator": "empty"}"#).unwrap();

    let vehicle = generate_resource(&schema, "org.acme.Vehicle", &options);
    assert_eq!(vehicle.get("colour"), Some(&Value::from("")));
    assert_eq!(vehicle.get("doors"), Some(&Value::from(vec![0, 0, 0])));
}

#[test]
fn test_unknown_target_type() {
    let schema = vehicle_schema();
    let err = generate(&schema, "org.acme.Boat", None, &GenerateOptions::sample()).unwrap_err();
    assert!(matches!(err, Error::TypeNotFound(t) if t == "org.acme.Boat"));
}
