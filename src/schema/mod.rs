//! # Schema Trait
//!
//! The contract between the generator and whatever holds the parsed model.
//! The engine only ever asks two things: "what is this name?" and "list every
//! class you know, in your order".
//!
//! ## Implementations
//!
//! | Schema | Module | Description |
//! |--------|--------|-------------|
//! | `ModelSchema` | `memory` | Validated in-memory registry, JSON loadable |

pub mod memory;

use crate::model::{ClassDeclaration, EnumDeclaration};
use crate::{Error, Result};

pub use memory::{ModelSchema, SchemaBuilder};

/// A named declaration: class or enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Declaration<'a> {
    Class(&'a ClassDeclaration),
    Enum(&'a EnumDeclaration),
}

// ============================================================================
// Schema Trait
// ============================================================================

/// Read-only view of a type graph.
///
/// Implementations must return class declarations with inherited properties
/// already folded in (supertype first), and must enumerate classes in a
/// stable order for the lifetime of the schema value.
pub trait Schema: Send + Sync {
    /// Look up a class or enum by fully-qualified name.
    fn declaration(&self, fqn: &str) -> Option<Declaration<'_>>;

    /// Every class declaration, in the schema's enumeration order.
    fn class_declarations(&self) -> Vec<&ClassDeclaration>;

    /// Look up a class declaration. Fails with `TypeNotFound` for unknown
    /// names and for enum names.
    fn get_type(&self, fqn: &str) -> Result<&ClassDeclaration> {
        match self.declaration(fqn) {
            Some(Declaration::Class(c)) => Ok(c),
            _ => Err(Error::TypeNotFound(fqn.to_owned())),
        }
    }

    /// Look up an enum declaration.
    fn get_enum(&self, fqn: &str) -> Result<&EnumDeclaration> {
        match self.declaration(fqn) {
            Some(Declaration::Enum(e)) => Ok(e),
            _ => Err(Error::TypeNotFound(fqn.to_owned())),
        }
    }

    /// Look up any declaration, failing with `TypeNotFound`.
    fn resolve(&self, fqn: &str) -> Result<Declaration<'_>> {
        self.declaration(fqn)
            .ok_or_else(|| Error::TypeNotFound(fqn.to_owned()))
    }

    /// True when `fqn` is `ancestor` or inherits from it.
    fn is_assignable_to(&self, fqn: &str, ancestor: &str) -> bool {
        let mut current = fqn.to_owned();
        // Bounded walk: a malformed external schema may loop.
        for _ in 0..=self.class_declarations().len() {
            if current == ancestor {
                return true;
            }
            match self.get_type(&current).ok().and_then(|c| c.super_type()) {
                Some(parent) => current = parent.to_owned(),
                None => return false,
            }
        }
        false
    }
}
