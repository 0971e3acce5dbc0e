//! # modelgen: Sample Instances for Typed Business Models
//!
//! Synthesizes fully populated assets, participants, transactions, events
//! and concepts from a declarative model, filling only what the caller left
//! unset.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `Schema` is the contract between the engine and
//!    whatever holds the parsed model
//! 2. **Clean DTOs**: `Resource`, `Concept`, `Relationship`, `Value` cross
//!    all boundaries
//! 3. **One construction boundary**: the engine only creates instances
//!    through `Factory`
//! 4. **Pointers, not copies**: relationship properties never expand their
//!    target, so cyclic models terminate
//!
//! ## Quick Start
//!
//! ```rust
//! use modelgen::{ClassDeclaration, Field, GenerateOptions, ModelSchema};
//!
//! # fn example() -> modelgen::Result<()> {
//! let schema = ModelSchema::builder()
//!     .add_class(
//!         ClassDeclaration::asset("org.acme", "Vehicle")
//!             .identified_by("vin")
//!             .with_property(Field::new("vin", "String"))
//!             .with_property(Field::new("colour", "String")),
//!     )
//!     .build()?;
//!
//! let vehicle = modelgen::generate(&schema, "org.acme.Vehicle", None, &GenerateOptions::sample())?;
//! println!("{}", modelgen::serializer::to_json_string(&schema, &vehicle)?);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Value Generators
//!
//! | Generator | Option | Description |
//! |-----------|--------|-------------|
//! | Sample | `"sample"` (default) | Random lorem words and numbers |
//! | Empty | `"empty"` | Zero values, first enum literal |
//! | Custom | `with_value_generator` | Any `ValueGenerator` impl |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod schema;
pub mod generator;
pub mod factory;
pub mod engine;
pub mod options;
pub mod serializer;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    ClassDeclaration, ClassKind, EnumDeclaration, Field, PrimitiveType, Property,
    RelationshipDeclaration, Concept, Instance, Relationship, Resource, Value, PropertyMap,
};

// ============================================================================
// Re-exports: Schema, generation
// ============================================================================

pub use schema::{Declaration, ModelSchema, Schema, SchemaBuilder};
pub use generator::{EmptyValueGenerator, GeneratorKind, SampleValueGenerator, ValueGenerator};
pub use factory::Factory;
pub use engine::{ARRAY_LENGTH, InstanceGenerator};
pub use options::GenerateOptions;

// ============================================================================
// Entry point
// ============================================================================

/// Generate a fully populated `target_type`, keeping whatever `partial`
/// already has set.
pub fn generate<S: Schema + ?Sized>(
    schema: &S,
    target_type: &str,
    partial: Option<Instance>,
    options: &GenerateOptions,
) -> Result<Instance> {
    InstanceGenerator::new(schema).generate(target_type, partial, options)
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Type not found: {0}")]
    TypeNotFound(String),

    #[error("No concrete subtype found for abstract type {0}")]
    NoConcreteSubtype(String),

    #[error("Unrecognized node kind: {0}")]
    UnrecognizedNodeKind(String),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    #[error("Instantiation error: {0}")]
    Instantiation(String),

    #[error("Invalid default for {field}: {message}")]
    InvalidDefault { field: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
