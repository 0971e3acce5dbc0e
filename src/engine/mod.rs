//! Instance generation engine.
//!
//! Depth-first walk over a class declaration's properties. Unset properties
//! get generated values; set ones are never touched, so running the engine
//! over its own output is a no-op.
//!
//! ```text
//! property ─┬─ array ────────────► 3 × single value
//!           └─ single ─┬─ primitive ──► ValueGenerator
//!                      ├─ enum ───────► literal name
//!                      ├─ class ──────► leaf if abstract, then
//!                      │                  concept  → new_concept + recurse
//!                      │                  resource → new_resource + recurse
//!                      └─ relationship► new_relationship (no recursion)
//! ```
//!
//! Relationships never recurse, which is what keeps generation finite on
//! graphs where types point at each other.

use std::mem;

use rand::Rng;
use tracing::{debug, trace};

use crate::factory::Factory;
use crate::generator::ValueGenerator;
use crate::model::*;
use crate::options::GenerateOptions;
use crate::schema::{Declaration, Schema};
use crate::{Error, Result};

/// Every array-typed property gets exactly this many elements.
pub const ARRAY_LENGTH: usize = 3;

/// Identifier digits are drawn from `0..=MAX_IDENTIFIER`.
pub const MAX_IDENTIFIER: u32 = 9999;

/// `<field>:NNNN` with a zero-padded random number. Not unique.
pub fn random_identifier(identifier_field: &str) -> String {
    let n = rand::thread_rng().gen_range(0..=MAX_IDENTIFIER);
    format!("{identifier_field}:{n:04}")
}

// ============================================================================
// InstanceGenerator
// ============================================================================

/// Generates populated instances against a schema.
///
/// Holds no per-call state; one generator can serve any number of calls,
/// concurrently if the schema allows it.
pub struct InstanceGenerator<'s, S: Schema + ?Sized> {
    schema: &'s S,
    factory: Factory<'s, S>,
}

impl<'s, S: Schema + ?Sized> InstanceGenerator<'s, S> {
    pub fn new(schema: &'s S) -> Self {
        Self { schema, factory: Factory::new(schema) }
    }

    pub fn schema(&self) -> &'s S {
        self.schema
    }

    pub fn factory(&self) -> Factory<'s, S> {
        self.factory
    }

    /// Populate `partial` (or a fresh instance) as a `target_type`.
    ///
    /// A fresh instance of an abstract target is created as its first
    /// direct concrete subtype. A partial instance keeps its own type, which
    /// must be the target or inherit from it.
    pub fn generate(
        &self,
        target_type: &str,
        partial: Option<Instance>,
        options: &GenerateOptions,
    ) -> Result<Instance> {
        let values = options.value_generator();
        let visit = Visit {
            schema: self.schema,
            factory: self.factory,
            values: values.as_ref(),
            include_optional: options.include_optional_fields,
        };
        debug!(target_type, generator = ?values, fresh = partial.is_none(), "generating instance");

        let declared = self.schema.get_type(target_type)?;
        match partial {
            None => {
                let concrete = visit.concrete(declared)?;
                visit.new_instance(concrete)
            }
            Some(Instance::Relationship(rel)) => Err(Error::Instantiation(format!(
                "cannot populate relationship {rel}"
            ))),
            Some(instance) => {
                let fqn = instance.fully_qualified_type();
                if !self.schema.is_assignable_to(&fqn, target_type) {
                    return Err(Error::Instantiation(format!(
                        "{fqn} is not a {target_type}"
                    )));
                }
                let decl = self.schema.get_type(&fqn)?;
                visit.populate_instance(decl, instance)
            }
        }
    }
}

// ============================================================================
// Traversal
// ============================================================================

/// Collaborators for one call. Each step takes the properties to fill and
/// hands them back; nothing is held between steps.
struct Visit<'a, S: Schema + ?Sized> {
    schema: &'a S,
    factory: Factory<'a, S>,
    values: &'a dyn ValueGenerator,
    include_optional: bool,
}

impl<'a, S: Schema + ?Sized> Visit<'a, S> {
    /// First class, in schema order, that directly extends `decl` and is
    /// concrete. Deeper descendants are not considered.
    fn resolve_leaf(&self, decl: &ClassDeclaration) -> Result<&'a ClassDeclaration> {
        let fqn = decl.fully_qualified_name();
        let leaf = self
            .schema
            .class_declarations()
            .into_iter()
            .find(|c| c.super_type() == Some(fqn.as_str()) && !c.is_abstract())
            .ok_or_else(|| Error::NoConcreteSubtype(fqn.clone()))?;
        debug!(abstract_type = %fqn, leaf = %leaf.fully_qualified_name(), "resolved abstract type");
        Ok(leaf)
    }

    fn concrete(&self, decl: &'a ClassDeclaration) -> Result<&'a ClassDeclaration> {
        if decl.is_abstract() {
            self.resolve_leaf(decl)
        } else {
            Ok(decl)
        }
    }

    fn identifier(&self, decl: &ClassDeclaration) -> Result<String> {
        decl.identifier_field_name()
            .map(random_identifier)
            .ok_or_else(|| {
                Error::InvalidSchema(format!(
                    "{}: missing identifier field",
                    decl.fully_qualified_name()
                ))
            })
    }

    /// New concept or resource of a concrete class, fully populated.
    fn new_instance(&self, decl: &ClassDeclaration) -> Result<Instance> {
        if decl.is_concept() {
            let mut concept = self.factory.new_concept(decl.namespace(), decl.name())?;
            concept.properties = self.populate(decl, mem::take(&mut concept.properties))?;
            Ok(Instance::Concept(concept))
        } else {
            let id = self.identifier(decl)?;
            let mut resource = self.factory.new_resource(decl.namespace(), decl.name(), &id)?;
            resource.properties = self.populate(decl, mem::take(&mut resource.properties))?;
            Ok(Instance::Resource(resource))
        }
    }

    fn populate_instance(&self, decl: &ClassDeclaration, instance: Instance) -> Result<Instance> {
        match instance {
            Instance::Resource(mut r) => {
                // The identifier field mirrors the resource identifier. An
                // empty identifier counts as unset.
                if let Some(id_field) = decl.identifier_field_name() {
                    if r.identifier.is_empty() {
                        r.identifier = match r.properties.get(id_field).and_then(Value::as_str) {
                            Some(id) if !id.is_empty() => id.to_owned(),
                            _ => random_identifier(id_field),
                        };
                    }
                    if !is_set(&r.properties, id_field) {
                        r.properties.insert(id_field.to_owned(), Value::String(r.identifier.clone()));
                    }
                }
                r.properties = self.populate(decl, r.properties)?;
                Ok(Instance::Resource(r))
            }
            Instance::Concept(mut c) => {
                c.properties = self.populate(decl, c.properties)?;
                Ok(Instance::Concept(c))
            }
            Instance::Relationship(rel) => Err(Error::Instantiation(format!(
                "cannot populate relationship {rel}"
            ))),
        }
    }

    /// Fill every unset property of `decl` in declaration order.
    fn populate(&self, decl: &ClassDeclaration, mut properties: PropertyMap) -> Result<PropertyMap> {
        for property in decl.properties() {
            if is_set(&properties, property.name()) {
                continue;
            }
            if property.is_optional() && !self.include_optional {
                continue;
            }
            let value = self.property_value(property)?;
            trace!(
                class = %decl.fully_qualified_name(),
                property = property.name(),
                kind = value.type_name(),
                "generated property"
            );
            properties.insert(property.name().to_owned(), value);
        }
        Ok(properties)
    }

    fn property_value(&self, property: &Property) -> Result<Value> {
        if property.is_array() {
            let items = (0..ARRAY_LENGTH)
                .map(|_| self.single_value(property))
                .collect::<Result<Vec<_>>>()?;
            return Ok(Value::List(items));
        }
        if let Property::Field(field) = property {
            if let Some(value) = self.default_value(field)? {
                return Ok(value);
            }
        }
        self.single_value(property)
    }

    fn default_value(&self, field: &Field) -> Result<Option<Value>> {
        let Some(literal) = &field.default else {
            return Ok(None);
        };
        let invalid = |message: String| Error::InvalidDefault {
            field: field.name.clone(),
            message,
        };
        match field.primitive_type() {
            Some(primitive) => primitive.parse_literal(literal).map(Some).map_err(invalid),
            None => match self.schema.resolve(&field.type_name)? {
                Declaration::Enum(_) => Ok(Some(Value::String(literal.clone()))),
                Declaration::Class(_) => Err(invalid(
                    "defaults are only allowed on primitive and enum fields".into(),
                )),
            },
        }
    }

    fn single_value(&self, property: &Property) -> Result<Value> {
        match property {
            Property::Field(field) => match field.primitive_type() {
                Some(primitive) => Ok(self.values.primitive(primitive)),
                None => match self.schema.resolve(&field.type_name)? {
                    Declaration::Enum(e) => {
                        Ok(Value::String(self.values.get_enum(e.literals()).to_owned()))
                    }
                    Declaration::Class(class) => self.class_value(class),
                },
            },
            Property::Relationship(rel) => self.relationship_value(rel),
        }
    }

    /// By-value nesting: construct, then recurse.
    fn class_value(&self, decl: &'a ClassDeclaration) -> Result<Value> {
        let concrete = self.concrete(decl)?;
        Ok(match self.new_instance(concrete)? {
            Instance::Concept(c) => Value::Concept(Box::new(c)),
            Instance::Resource(r) => Value::Resource(Box::new(r)),
            Instance::Relationship(r) => Value::Relationship(r),
        })
    }

    /// By-reference: a pointer to the declared target type. The target is
    /// never expanded, so abstract targets are not resolved to a leaf.
    fn relationship_value(&self, rel: &RelationshipDeclaration) -> Result<Value> {
        let target = self.schema.get_type(&rel.type_name)?;
        if target.is_concept() {
            return Err(Error::UnrecognizedNodeKind(format!(
                "relationship {} points at concept {}",
                rel.name,
                target.fully_qualified_name()
            )));
        }
        let id = self.identifier(target)?;
        let pointer = self.factory.new_relationship(target.namespace(), target.name(), &id)?;
        Ok(Value::Relationship(pointer))
    }
}
