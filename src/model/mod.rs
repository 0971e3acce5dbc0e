//! # Business Model Types
//!
//! Declarations (the type graph) and the instances generated against them.
//! These types cross every boundary: schema ↔ factory ↔ engine ↔ user.
//!
//! Design rule: this module is pure data. No schema lookups, no randomness.

pub mod declaration;
pub mod instance;
pub mod value;
pub mod property_map;

pub use declaration::{
    ClassDeclaration, ClassKind, EnumDeclaration, Field, PrimitiveType, Property,
    RelationshipDeclaration, qualify,
};
pub use instance::{Concept, Instance, Relationship, Resource};
pub use value::Value;
pub use property_map::{PropertyMap, is_set};
