//! Declarations: the type graph instances are generated against.
//!
//! These are parsed model definitions handed to us by an external loader.
//! A `ClassDeclaration` registered in a built `ModelSchema` carries its
//! inherited properties too (supertype first), so callers never walk the
//! inheritance chain themselves.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Value;

// ============================================================================
// Class kinds
// ============================================================================

/// What a class declaration declares.
///
/// Everything except `Concept` is identifiable and may be the target of a
/// relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    Asset,
    Participant,
    Transaction,
    Event,
    Concept,
}

impl fmt::Display for ClassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ClassKind::Asset => "asset",
            ClassKind::Participant => "participant",
            ClassKind::Transaction => "transaction",
            ClassKind::Event => "event",
            ClassKind::Concept => "concept",
        };
        f.write_str(s)
    }
}

// ============================================================================
// Primitive types
// ============================================================================

/// Primitive type tags understood by the value generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimitiveType {
    String,
    Integer,
    Long,
    Double,
    Boolean,
    DateTime,
}

impl PrimitiveType {
    /// Recognize a primitive type name. Returns None for class/enum names.
    pub fn from_type_name(name: &str) -> Option<Self> {
        match name {
            "String" => Some(PrimitiveType::String),
            "Integer" => Some(PrimitiveType::Integer),
            "Long" => Some(PrimitiveType::Long),
            "Double" => Some(PrimitiveType::Double),
            "Boolean" => Some(PrimitiveType::Boolean),
            "DateTime" => Some(PrimitiveType::DateTime),
            _ => None,
        }
    }

    /// Parse a default-value literal as a value of this type.
    pub fn parse_literal(self, text: &str) -> std::result::Result<Value, String> {
        let text = text.trim();
        match self {
            PrimitiveType::String => Ok(Value::String(text.to_owned())),
            PrimitiveType::Integer => text
                .parse::<i32>()
                .map(Value::Integer)
                .map_err(|e| e.to_string()),
            PrimitiveType::Long => text
                .parse::<i64>()
                .map(Value::Long)
                .map_err(|e| e.to_string()),
            PrimitiveType::Double => match text.parse::<f64>() {
                Ok(d) if d.is_finite() => Ok(Value::Double(d)),
                Ok(d) => Err(format!("{d} is not a finite number")),
                Err(e) => Err(e.to_string()),
            },
            PrimitiveType::Boolean => text
                .parse::<bool>()
                .map(Value::Boolean)
                .map_err(|e| e.to_string()),
            PrimitiveType::DateTime => DateTime::parse_from_rfc3339(text)
                .map(|dt| Value::DateTime(dt.with_timezone(&Utc)))
                .map_err(|e| e.to_string()),
        }
    }
}

// ============================================================================
// Properties
// ============================================================================

/// A data-carrying property: primitive, enum-typed or class-typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    /// Primitive name, or the fully-qualified name of an enum or class.
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub array: bool,
    #[serde(default)]
    pub primitive: bool,
    #[serde(default)]
    pub optional: bool,
    /// Literal text, parsed against the field type at generation time.
    #[serde(default)]
    pub default: Option<String>,
}

impl Field {
    /// A single-valued, required field. The primitive flag is derived from
    /// the type name.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            name: name.into(),
            primitive: PrimitiveType::from_type_name(&type_name).is_some(),
            type_name,
            array: false,
            optional: false,
            default: None,
        }
    }

    pub fn array(mut self) -> Self {
        self.array = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn with_default(mut self, literal: impl Into<String>) -> Self {
        self.default = Some(literal.into());
        self
    }

    /// Primitive tag for a primitive field. Unknown primitive names map to
    /// `String`.
    pub fn primitive_type(&self) -> Option<PrimitiveType> {
        if !self.primitive {
            return None;
        }
        Some(PrimitiveType::from_type_name(&self.type_name).unwrap_or(PrimitiveType::String))
    }
}

/// A typed pointer to an identifiable class. Never embeds the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub array: bool,
    #[serde(default)]
    pub optional: bool,
}

impl RelationshipDeclaration {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            array: false,
            optional: false,
        }
    }

    pub fn array(mut self) -> Self {
        self.array = true;
        self
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }
}

/// Closed set of property kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Property {
    Field(Field),
    Relationship(RelationshipDeclaration),
}

impl Property {
    pub fn name(&self) -> &str {
        match self {
            Property::Field(f) => &f.name,
            Property::Relationship(r) => &r.name,
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            Property::Field(f) => &f.type_name,
            Property::Relationship(r) => &r.type_name,
        }
    }

    pub fn is_array(&self) -> bool {
        match self {
            Property::Field(f) => f.array,
            Property::Relationship(r) => r.array,
        }
    }

    pub fn is_optional(&self) -> bool {
        match self {
            Property::Field(f) => f.optional,
            Property::Relationship(r) => r.optional,
        }
    }

    pub(crate) fn type_name_mut(&mut self) -> &mut String {
        match self {
            Property::Field(f) => &mut f.type_name,
            Property::Relationship(r) => &mut r.type_name,
        }
    }
}

impl From<Field> for Property {
    fn from(f: Field) -> Self { Property::Field(f) }
}

impl From<RelationshipDeclaration> for Property {
    fn from(r: RelationshipDeclaration) -> Self { Property::Relationship(r) }
}

// ============================================================================
// Class declarations
// ============================================================================

/// A class in the model: asset, participant, transaction, event or concept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDeclaration {
    namespace: String,
    name: String,
    kind: ClassKind,
    #[serde(default)]
    super_type: Option<String>,
    #[serde(default, rename = "abstract")]
    is_abstract: bool,
    #[serde(default)]
    identified_by: Option<String>,
    #[serde(default)]
    properties: Vec<Property>,
}

impl ClassDeclaration {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            kind,
            super_type: None,
            is_abstract: false,
            identified_by: None,
            properties: Vec::new(),
        }
    }

    pub fn asset(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(namespace, name, ClassKind::Asset)
    }

    pub fn participant(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(namespace, name, ClassKind::Participant)
    }

    pub fn transaction(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(namespace, name, ClassKind::Transaction)
    }

    pub fn event(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(namespace, name, ClassKind::Event)
    }

    pub fn concept(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(namespace, name, ClassKind::Concept)
    }

    pub fn identified_by(mut self, field: impl Into<String>) -> Self {
        self.identified_by = Some(field.into());
        self
    }

    /// Short names are qualified with this declaration's namespace when the
    /// declaration is registered.
    pub fn extends(mut self, super_type: impl Into<String>) -> Self {
        self.super_type = Some(super_type.into());
        self
    }

    pub fn into_abstract(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    pub fn with_property(mut self, property: impl Into<Property>) -> Self {
        self.properties.push(property.into());
        self
    }

    pub fn namespace(&self) -> &str { &self.namespace }
    pub fn name(&self) -> &str { &self.name }
    pub fn kind(&self) -> ClassKind { self.kind }
    pub fn super_type(&self) -> Option<&str> { self.super_type.as_deref() }
    pub fn is_abstract(&self) -> bool { self.is_abstract }
    pub fn is_concept(&self) -> bool { self.kind == ClassKind::Concept }
    pub fn identifier_field_name(&self) -> Option<&str> { self.identified_by.as_deref() }

    /// Declared properties, inherited ones first.
    pub fn properties(&self) -> &[Property] { &self.properties }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name() == name)
    }

    pub fn fully_qualified_name(&self) -> String {
        qualify(&self.namespace, &self.name)
    }

    pub(crate) fn super_type_mut(&mut self) -> &mut Option<String> { &mut self.super_type }
    pub(crate) fn properties_mut(&mut self) -> &mut Vec<Property> { &mut self.properties }
    pub(crate) fn set_identifier_field(&mut self, field: Option<String>) { self.identified_by = field; }
}

// ============================================================================
// Enum declarations
// ============================================================================

/// An enumeration: an ordered set of literal names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDeclaration {
    namespace: String,
    name: String,
    literals: Vec<String>,
}

impl EnumDeclaration {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        literals: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            literals: literals.into_iter().map(Into::into).collect(),
        }
    }

    pub fn namespace(&self) -> &str { &self.namespace }
    pub fn name(&self) -> &str { &self.name }
    pub fn literals(&self) -> &[String] { &self.literals }

    pub fn has_literal(&self, literal: &str) -> bool {
        self.literals.iter().any(|l| l == literal)
    }

    pub fn fully_qualified_name(&self) -> String {
        qualify(&self.namespace, &self.name)
    }
}

// ============================================================================
// Names
// ============================================================================

/// Join a namespace and a short name.
pub fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_owned()
    } else {
        format!("{namespace}.{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_primitive_flag_from_type_name() {
        assert!(Field::new("colour", "String").primitive);
        assert!(!Field::new("owner", "org.acme.Person").primitive);
        assert_eq!(
            Field::new("made", "DateTime").primitive_type(),
            Some(PrimitiveType::DateTime)
        );
    }

    #[test]
    fn test_unknown_primitive_maps_to_string() {
        let mut f = Field::new("blob", "Bytes");
        f.primitive = true;
        assert_eq!(f.primitive_type(), Some(PrimitiveType::String));
    }

    #[test]
    fn test_parse_literal() {
        assert_eq!(PrimitiveType::Integer.parse_literal("42"), Ok(Value::Integer(42)));
        assert_eq!(PrimitiveType::Boolean.parse_literal(" true "), Ok(Value::Boolean(true)));
        assert!(PrimitiveType::Long.parse_literal("forty").is_err());
        assert_eq!(PrimitiveType::Double.parse_literal("2.5"), Ok(Value::Double(2.5)));
        assert!(PrimitiveType::Double.parse_literal("NaN").is_err());
        assert!(PrimitiveType::Double.parse_literal("-inf").is_err());
        assert!(PrimitiveType::DateTime.parse_literal("2024-01-01T00:00:00Z").is_ok());
    }

    #[test]
    fn test_qualified_names() {
        assert_eq!(qualify("org.acme", "Vehicle"), "org.acme.Vehicle");
        assert_eq!(qualify("", "Vehicle"), "Vehicle");
    }

    #[test]
    fn test_property_from_json() {
        let json = r#"{"kind": "relationship", "name": "owner", "type": "Person", "array": true}"#;
        let p: Property = serde_json::from_str(json).unwrap();
        assert_eq!(p.name(), "owner");
        assert!(p.is_array());
        assert!(matches!(p, Property::Relationship(_)));
    }
}
