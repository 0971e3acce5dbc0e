//! Instance factory, the only place instances are constructed.
//!
//! Every constructor checks the type against the schema first and fails
//! immediately on an unknown or unsuitable type.

use tracing::trace;

use crate::model::*;
use crate::schema::Schema;
use crate::{Error, Result};

/// Validated constructors for concepts, resources and relationships.
pub struct Factory<'s, S: Schema + ?Sized> {
    schema: &'s S,
}

impl<S: Schema + ?Sized> Clone for Factory<'_, S> {
    fn clone(&self) -> Self { *self }
}

impl<S: Schema + ?Sized> Copy for Factory<'_, S> {}

impl<'s, S: Schema + ?Sized> Factory<'s, S> {
    pub fn new(schema: &'s S) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'s S {
        self.schema
    }

    /// A new, empty concept.
    pub fn new_concept(&self, namespace: &str, type_name: &str) -> Result<Concept> {
        let decl = self.lookup(namespace, type_name)?;
        if !decl.is_concept() {
            return Err(Error::Instantiation(format!(
                "{} is a {}, not a concept",
                decl.fully_qualified_name(),
                decl.kind()
            )));
        }
        if decl.is_abstract() {
            return Err(abstract_type(decl));
        }
        trace!(type_name = %decl.fully_qualified_name(), "new concept");
        Ok(Concept::new(namespace, type_name))
    }

    /// A new resource whose identifier field already holds `identifier`.
    pub fn new_resource(&self, namespace: &str, type_name: &str, identifier: &str) -> Result<Resource> {
        let decl = self.lookup(namespace, type_name)?;
        if decl.is_concept() {
            return Err(Error::Instantiation(format!(
                "{} is a concept and has no identifier",
                decl.fully_qualified_name()
            )));
        }
        if decl.is_abstract() {
            return Err(abstract_type(decl));
        }
        let id_field = decl.identifier_field_name().ok_or_else(|| {
            Error::InvalidSchema(format!(
                "{}: missing identifier field",
                decl.fully_qualified_name()
            ))
        })?;
        trace!(type_name = %decl.fully_qualified_name(), identifier, "new resource");
        Ok(Resource::new(namespace, type_name, identifier).with_property(id_field, identifier))
    }

    /// A pointer to a resource. Abstract targets are allowed.
    pub fn new_relationship(&self, namespace: &str, type_name: &str, identifier: &str) -> Result<Relationship> {
        let decl = self.lookup(namespace, type_name)?;
        if decl.is_concept() {
            return Err(Error::Instantiation(format!(
                "cannot point at concept {}",
                decl.fully_qualified_name()
            )));
        }
        trace!(type_name = %decl.fully_qualified_name(), identifier, "new relationship");
        Ok(Relationship::new(namespace, type_name, identifier))
    }

    fn lookup(&self, namespace: &str, type_name: &str) -> Result<&'s ClassDeclaration> {
        self.schema.get_type(&qualify(namespace, type_name))
    }
}

fn abstract_type(decl: &ClassDeclaration) -> Error {
    Error::Instantiation(format!(
        "cannot instantiate abstract type {}",
        decl.fully_qualified_name()
    ))
}
