//! Generated instances: resources, concepts and relationship pointers.
//!
//! Construct these through `Factory`, which checks the type against the
//! schema. The constructors here do no validation.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::declaration::qualify;
use super::{PropertyMap, Value};

/// An identifiable instance of a non-abstract, non-concept class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub namespace: String,
    pub type_name: String,
    pub identifier: String,
    pub properties: PropertyMap,
}

impl Resource {
    pub fn new(
        namespace: impl Into<String>,
        type_name: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            type_name: type_name.into(),
            identifier: identifier.into(),
            properties: PropertyMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn fully_qualified_type(&self) -> String {
        qualify(&self.namespace, &self.type_name)
    }

    /// A pointer to this resource.
    pub fn to_relationship(&self) -> Relationship {
        Relationship::new(&self.namespace, &self.type_name, &self.identifier)
    }
}

/// A by-value, non-identifiable instance nested inside another instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concept {
    pub namespace: String,
    pub type_name: String,
    pub properties: PropertyMap,
}

impl Concept {
    pub fn new(namespace: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            type_name: type_name.into(),
            properties: PropertyMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    pub fn fully_qualified_type(&self) -> String {
        qualify(&self.namespace, &self.type_name)
    }
}

/// A typed pointer to a resource. Carries no copied data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relationship {
    pub namespace: String,
    pub type_name: String,
    pub identifier: String,
}

impl Relationship {
    pub fn new(
        namespace: impl Into<String>,
        type_name: impl Into<String>,
        identifier: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            type_name: type_name.into(),
            identifier: identifier.into(),
        }
    }

    pub fn fully_qualified_type(&self) -> String {
        qualify(&self.namespace, &self.type_name)
    }
}

/// `resource:<fqn>#<identifier>`
impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "resource:{}#{}", self.fully_qualified_type(), self.identifier)
    }
}

/// Any top-level instance the engine can produce or accept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "instance", rename_all = "lowercase")]
pub enum Instance {
    Resource(Resource),
    Concept(Concept),
    Relationship(Relationship),
}

impl Instance {
    pub fn namespace(&self) -> &str {
        match self {
            Instance::Resource(r) => &r.namespace,
            Instance::Concept(c) => &c.namespace,
            Instance::Relationship(r) => &r.namespace,
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            Instance::Resource(r) => &r.type_name,
            Instance::Concept(c) => &c.type_name,
            Instance::Relationship(r) => &r.type_name,
        }
    }

    pub fn fully_qualified_type(&self) -> String {
        qualify(self.namespace(), self.type_name())
    }

    /// Property values; None for a relationship pointer.
    pub fn properties(&self) -> Option<&PropertyMap> {
        match self {
            Instance::Resource(r) => Some(&r.properties),
            Instance::Concept(c) => Some(&c.properties),
            Instance::Relationship(_) => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties().and_then(|p| p.get(key))
    }

    pub fn as_resource(&self) -> Option<&Resource> {
        match self {
            Instance::Resource(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_concept(&self) -> Option<&Concept> {
        match self {
            Instance::Concept(c) => Some(c),
            _ => None,
        }
    }

    pub fn into_resource(self) -> Option<Resource> {
        match self {
            Instance::Resource(r) => Some(r),
            _ => None,
        }
    }

    pub fn into_concept(self) -> Option<Concept> {
        match self {
            Instance::Concept(c) => Some(c),
            _ => None,
        }
    }
}

impl From<Resource> for Instance {
    fn from(r: Resource) -> Self { Instance::Resource(r) }
}

impl From<Concept> for Instance {
    fn from(c: Concept) -> Self { Instance::Concept(c) }
}

impl From<Relationship> for Instance {
    fn from(r: Relationship) -> Self { Instance::Relationship(r) }
}
