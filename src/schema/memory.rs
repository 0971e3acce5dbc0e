//! In-memory schema.
//!
//! `ModelSchema` is the reference implementation of `Schema`: a validated
//! registry of parsed declarations, enumerated in registration order.
//! Build one with `SchemaBuilder` or load one from JSON.
//!
//! ## What `build()` checks
//!
//! - Names are unique across classes and enums
//! - Supertypes exist, share the subtype's kind, and never form a cycle
//! - Identifiable concrete classes name a single-valued `String` identifier
//! - Field and relationship types resolve; relationships never point at
//!   concepts or enums
//! - Default literals parse against their field's type
//! - No class contains itself by value (that would never terminate)

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use tracing::debug;

use crate::model::*;
use crate::{Error, Result};
use super::{Declaration, Schema};

// ============================================================================
// ModelSchema
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Class(usize),
    Enum(usize),
}

/// Validated in-memory type graph.
#[derive(Debug, Clone, Default)]
pub struct ModelSchema {
    classes: Vec<ClassDeclaration>,
    enums: Vec<EnumDeclaration>,
    index: HashMap<String, Slot>,
}

/// JSON document shape: `{"classes": [...], "enums": [...]}`.
#[derive(Debug, Deserialize)]
struct SchemaDocument {
    #[serde(default)]
    classes: Vec<ClassDeclaration>,
    #[serde(default)]
    enums: Vec<EnumDeclaration>,
}

impl ModelSchema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Load and validate a JSON schema document.
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: SchemaDocument = serde_json::from_str(json)?;
        let mut builder = SchemaBuilder::default();
        builder.classes = doc.classes;
        builder.enums = doc.enums;
        builder.build()
    }

    pub fn enum_declarations(&self) -> &[EnumDeclaration] {
        &self.enums
    }

    pub fn len(&self) -> usize {
        self.classes.len() + self.enums.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Schema for ModelSchema {
    fn declaration(&self, fqn: &str) -> Option<Declaration<'_>> {
        match self.index.get(fqn)? {
            Slot::Class(i) => Some(Declaration::Class(&self.classes[*i])),
            Slot::Enum(i) => Some(Declaration::Enum(&self.enums[*i])),
        }
    }

    fn class_declarations(&self) -> Vec<&ClassDeclaration> {
        self.classes.iter().collect()
    }
}

// ============================================================================
// SchemaBuilder
// ============================================================================

/// Collects declarations, then qualifies, flattens and validates them.
#[derive(Debug, Clone, Default)]
pub struct SchemaBuilder {
    classes: Vec<ClassDeclaration>,
    enums: Vec<EnumDeclaration>,
}

impl SchemaBuilder {
    pub fn add_class(mut self, class: ClassDeclaration) -> Self {
        self.classes.push(class);
        self
    }

    pub fn add_enum(mut self, decl: EnumDeclaration) -> Self {
        self.enums.push(decl);
        self
    }

    pub fn build(mut self) -> Result<ModelSchema> {
        for class in &mut self.classes {
            qualify_names(class);
        }

        let index = build_index(&self.classes, &self.enums)?;
        for e in &self.enums {
            if e.literals().is_empty() {
                return Err(invalid(format!("enum {} has no literals", e.fully_qualified_name())));
            }
        }

        let classes = flatten_inheritance(&self.classes, &index)?;
        let schema = ModelSchema { classes, enums: self.enums, index };

        for class in &schema.classes {
            validate_class(&schema, class)?;
        }
        check_containment_cycles(&schema)?;

        debug!(
            classes = schema.classes.len(),
            enums = schema.enums.len(),
            "schema built"
        );
        Ok(schema)
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidSchema(message.into())
}

/// Qualify short type names with the declaring namespace.
fn qualify_names(class: &mut ClassDeclaration) {
    let namespace = class.namespace().to_owned();
    if let Some(parent) = class.super_type_mut() {
        if !parent.contains('.') {
            *parent = qualify(&namespace, parent);
        }
    }
    for property in class.properties_mut() {
        if let Property::Field(field) = property {
            if PrimitiveType::from_type_name(&field.type_name).is_some() {
                field.primitive = true;
            }
            if field.primitive {
                continue;
            }
        }
        let type_name = property.type_name_mut();
        if !type_name.contains('.') {
            *type_name = qualify(&namespace, type_name);
        }
    }
}

fn build_index(
    classes: &[ClassDeclaration],
    enums: &[EnumDeclaration],
) -> Result<HashMap<String, Slot>> {
    let mut index = HashMap::new();
    let names = classes
        .iter()
        .enumerate()
        .map(|(i, c)| (c.fully_qualified_name(), Slot::Class(i)))
        .chain(
            enums
                .iter()
                .enumerate()
                .map(|(i, e)| (e.fully_qualified_name(), Slot::Enum(i))),
        );
    for (fqn, slot) in names {
        if index.insert(fqn.clone(), slot).is_some() {
            return Err(invalid(format!("duplicate declaration {fqn}")));
        }
    }
    Ok(index)
}

/// Fold inherited properties and identifier fields into every class.
fn flatten_inheritance(
    classes: &[ClassDeclaration],
    index: &HashMap<String, Slot>,
) -> Result<Vec<ClassDeclaration>> {
    let mut flattened = Vec::with_capacity(classes.len());

    for class in classes {
        let fqn = class.fully_qualified_name();

        // Self first, root last.
        let mut chain: Vec<&ClassDeclaration> = vec![class];
        let mut seen: HashSet<String> = HashSet::from([fqn.clone()]);
        let mut current = class;
        while let Some(parent) = current.super_type() {
            let parent_decl = match index.get(parent) {
                Some(Slot::Class(i)) => &classes[*i],
                _ => return Err(invalid(format!("{fqn}: unknown supertype {parent}"))),
            };
            if parent_decl.kind() != class.kind() {
                return Err(invalid(format!(
                    "{fqn}: {} cannot extend {} {parent}",
                    class.kind(),
                    parent_decl.kind()
                )));
            }
            if !seen.insert(parent.to_owned()) {
                return Err(invalid(format!("{fqn}: inheritance cycle through {parent}")));
            }
            chain.push(parent_decl);
            current = parent_decl;
        }

        let mut merged = class.clone();
        let mut properties: Vec<Property> = Vec::new();
        for ancestor in chain.iter().rev() {
            for property in ancestor.properties() {
                if properties.iter().any(|p| p.name() == property.name()) {
                    return Err(invalid(format!(
                        "{fqn}: property {} declared more than once",
                        property.name()
                    )));
                }
                properties.push(property.clone());
            }
        }
        *merged.properties_mut() = properties;
        let identifier = chain
            .iter()
            .find_map(|c| c.identifier_field_name())
            .map(str::to_owned);
        merged.set_identifier_field(identifier);

        flattened.push(merged);
    }

    Ok(flattened)
}

fn validate_class(schema: &ModelSchema, class: &ClassDeclaration) -> Result<()> {
    let fqn = class.fully_qualified_name();

    match (class.is_concept(), class.identifier_field_name()) {
        (true, Some(id)) => {
            return Err(invalid(format!("{fqn}: concepts cannot be identified by {id}")));
        }
        (false, None) if !class.is_abstract() => {
            return Err(invalid(format!("{fqn}: missing identifier field")));
        }
        (false, Some(id)) => match class.property(id) {
            Some(Property::Field(f))
                if f.primitive_type() == Some(PrimitiveType::String) && !f.array => {}
            _ => {
                return Err(invalid(format!(
                    "{fqn}: identifier {id} must be a single-valued String field"
                )));
            }
        },
        _ => {}
    }

    for property in class.properties() {
        match property {
            Property::Field(field) => validate_field(schema, &fqn, field)?,
            Property::Relationship(rel) => match schema.declaration(&rel.type_name) {
                Some(Declaration::Class(target))
                    if !target.is_concept() && target.identifier_field_name().is_some() => {}
                Some(_) => {
                    return Err(invalid(format!(
                        "{fqn}.{}: relationship must target an identifiable class, not {}",
                        rel.name, rel.type_name
                    )));
                }
                None => {
                    return Err(invalid(format!(
                        "{fqn}.{}: unknown type {}",
                        rel.name, rel.type_name
                    )));
                }
            },
        }
    }
    Ok(())
}

fn validate_field(schema: &ModelSchema, fqn: &str, field: &Field) -> Result<()> {
    if let Some(primitive) = field.primitive_type() {
        if let Some(literal) = &field.default {
            primitive.parse_literal(literal).map_err(|message| Error::InvalidDefault {
                field: format!("{fqn}.{}", field.name),
                message,
            })?;
        }
        return Ok(());
    }

    match schema.declaration(&field.type_name) {
        None => Err(invalid(format!(
            "{fqn}.{}: unknown type {}",
            field.name, field.type_name
        ))),
        Some(Declaration::Enum(e)) => match &field.default {
            Some(literal) if !e.has_literal(literal) => Err(Error::InvalidDefault {
                field: format!("{fqn}.{}", field.name),
                message: format!("{literal} is not a literal of {}", field.type_name),
            }),
            _ => Ok(()),
        },
        Some(Declaration::Class(_)) if field.default.is_some() => Err(Error::InvalidDefault {
            field: format!("{fqn}.{}", field.name),
            message: "defaults are only allowed on primitive and enum fields".into(),
        }),
        Some(Declaration::Class(_)) => Ok(()),
    }
}

/// Reject classes that reach themselves through by-value fields. Abstract
/// field types are followed to the leaf the engine would pick.
fn check_containment_cycles(schema: &ModelSchema) -> Result<()> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        InProgress,
        Done,
    }

    let position: HashMap<String, usize> = schema
        .classes
        .iter()
        .enumerate()
        .map(|(i, c)| (c.fully_qualified_name(), i))
        .collect();

    let edges: Vec<Vec<usize>> = schema
        .classes
        .iter()
        .map(|class| {
            class
                .properties()
                .iter()
                .filter_map(|p| match p {
                    Property::Field(f) if !f.primitive => schema.get_type(&f.type_name).ok(),
                    _ => None,
                })
                .filter_map(|target| {
                    if target.is_abstract() {
                        let fqn = target.fully_qualified_name();
                        schema.classes.iter().find(|c| {
                            c.super_type() == Some(fqn.as_str()) && !c.is_abstract()
                        })
                    } else {
                        Some(target)
                    }
                })
                .filter_map(|target| position.get(&target.fully_qualified_name()).copied())
                .collect()
        })
        .collect();

    let mut marks = vec![Mark::Unvisited; schema.classes.len()];
    for start in 0..schema.classes.len() {
        if marks[start] != Mark::Unvisited {
            continue;
        }
        // Iterative DFS: (node, next edge to explore).
        let mut stack = vec![(start, 0usize)];
        marks[start] = Mark::InProgress;
        while let Some((node, next)) = stack.pop() {
            if let Some(&target) = edges[node].get(next) {
                stack.push((node, next + 1));
                match marks[target] {
                    Mark::InProgress => {
                        return Err(invalid(format!(
                            "{} contains itself by value through {}",
                            schema.classes[target].fully_qualified_name(),
                            schema.classes[node].fully_qualified_name()
                        )));
                    }
                    Mark::Unvisited => {
                        marks[target] = Mark::InProgress;
                        stack.push((target, 0));
                    }
                    Mark::Done => {}
                }
            } else {
                marks[node] = Mark::Done;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle() -> ClassDeclaration {
        ClassDeclaration::asset("org.acme", "Vehicle")
            .identified_by("vin")
            .with_property(Field::new("vin", "String"))
            .with_property(Field::new("colour", "String"))
    }

    #[test]
    fn test_build_and_lookup() {
        let schema = ModelSchema::builder().add_class(vehicle()).build().unwrap();
        let decl = schema.get_type("org.acme.Vehicle").unwrap();
        assert_eq!(decl.identifier_field_name(), Some("vin"));
        assert_eq!(decl.properties().len(), 2);
        assert!(matches!(schema.get_type("org.acme.Nope"), Err(Error::TypeNotFound(_))));
    }

    #[test]
    fn test_inherited_properties_come_first() {
        let schema = ModelSchema::builder()
            .add_class(
                ClassDeclaration::participant("org.acme", "Person")
                    .into_abstract()
                    .identified_by("email")
                    .with_property(Field::new("email", "String")),
            )
            .add_class(
                ClassDeclaration::participant("org.acme", "Driver")
                    .extends("Person")
                    .with_property(Field::new("licence", "String")),
            )
            .build()
            .unwrap();

        let driver = schema.get_type("org.acme.Driver").unwrap();
        let names: Vec<&str> = driver.properties().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["email", "licence"]);
        assert_eq!(driver.identifier_field_name(), Some("email"));
        assert_eq!(driver.super_type(), Some("org.acme.Person"));
    }

    #[test]
    fn test_short_type_names_are_qualified() {
        let schema = ModelSchema::builder()
            .add_class(ClassDeclaration::concept("org.acme", "Address")
                .with_property(Field::new("city", "String")))
            .add_class(vehicle().with_property(Field::new("garage", "Address")))
            .build()
            .unwrap();
        let decl = schema.get_type("org.acme.Vehicle").unwrap();
        assert_eq!(decl.property("garage").unwrap().type_name(), "org.acme.Address");
        assert_eq!(decl.property("colour").unwrap().type_name(), "String");
    }

    #[test]
    fn test_duplicate_declaration_rejected() {
        let err = ModelSchema::builder()
            .add_class(vehicle())
            .add_enum(EnumDeclaration::new("org.acme", "Vehicle", ["A"]))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(m) if m.contains("duplicate")));
    }

    #[test]
    fn test_missing_identifier_rejected() {
        let err = ModelSchema::builder()
            .add_class(ClassDeclaration::asset("org.acme", "Thing"))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(m) if m.contains("missing identifier")));
    }

    #[test]
    fn test_inheritance_cycle_rejected() {
        let err = ModelSchema::builder()
            .add_class(ClassDeclaration::asset("org.acme", "A").extends("B").identified_by("id")
                .with_property(Field::new("id", "String")))
            .add_class(ClassDeclaration::asset("org.acme", "B").extends("A"))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(m) if m.contains("cycle")));
    }

    #[test]
    fn test_relationship_to_concept_rejected() {
        let err = ModelSchema::builder()
            .add_class(ClassDeclaration::concept("org.acme", "Address"))
            .add_class(vehicle().with_property(RelationshipDeclaration::new("home", "Address")))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(m) if m.contains("identifiable")));
    }

    #[test]
    fn test_relationship_to_unidentified_abstract_rejected() {
        let err = ModelSchema::builder()
            .add_class(ClassDeclaration::asset("org.acme", "Thing").into_abstract())
            .add_class(vehicle().with_property(RelationshipDeclaration::new("thing", "Thing")))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(m) if m.contains("identifiable")));
    }

    #[test]
    fn test_by_value_cycle_rejected() {
        let err = ModelSchema::builder()
            .add_class(ClassDeclaration::concept("org.acme", "Node")
                .with_property(Field::new("next", "Node")))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidSchema(m) if m.contains("by value")));
    }

    #[test]
    fn test_relationship_cycle_allowed() {
        let schema = ModelSchema::builder()
            .add_class(ClassDeclaration::participant("org.acme", "Person")
                .identified_by("email")
                .with_property(Field::new("email", "String"))
                .with_property(RelationshipDeclaration::new("friend", "Person")))
            .build();
        assert!(schema.is_ok());
    }

    #[test]
    fn test_bad_default_rejected() {
        let err = ModelSchema::builder()
            .add_class(vehicle().with_property(Field::new("wheels", "Integer").with_default("four")))
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDefault { field, .. } if field == "org.acme.Vehicle.wheels"));
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "classes": [{
                "namespace": "org.acme",
                "name": "Vehicle",
                "kind": "asset",
                "identifiedBy": "vin",
                "properties": [
                    {"kind": "field", "name": "vin", "type": "String"},
                    {"kind": "field", "name": "state", "type": "State"}
                ]
            }],
            "enums": [{"namespace": "org.acme", "name": "State", "literals": ["NEW", "USED"]}]
        }"#;
        let schema = ModelSchema::from_json(json).unwrap();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema.get_enum("org.acme.State").unwrap().literals().len(), 2);
        let vin = schema.get_type("org.acme.Vehicle").unwrap().property("vin").unwrap();
        assert!(matches!(vin, Property::Field(f) if f.primitive));
    }
}
