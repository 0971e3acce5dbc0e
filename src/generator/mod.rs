//! # Value Generators
//!
//! Strategies that produce primitive values and pick enum literals.
//!
//! | Strategy | Module | Output |
//! |----------|--------|--------|
//! | `SampleValueGenerator` | `sample` | Random, illustrative values (default) |
//! | `EmptyValueGenerator` | `empty` | Zero values, first enum literal |
//!
//! Generators are shared across calls and threads, so every method takes
//! `&self`. A generator that keeps state must synchronize it internally.

pub mod sample;
pub mod empty;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{PrimitiveType, Value};
use crate::Error;

pub use sample::SampleValueGenerator;
pub use empty::EmptyValueGenerator;

/// Produces one value per call for each primitive kind.
pub trait ValueGenerator: Send + Sync + fmt::Debug {
    fn get_string(&self) -> String;
    fn get_integer(&self) -> i32;
    fn get_long(&self) -> i64;
    fn get_double(&self) -> f64;
    fn get_boolean(&self) -> bool;
    fn get_date_time(&self) -> DateTime<Utc>;

    /// Pick one literal. `literals` is never empty.
    fn get_enum<'a>(&self, literals: &'a [String]) -> &'a str;

    /// Dispatch on a primitive type tag.
    fn primitive(&self, kind: PrimitiveType) -> Value {
        match kind {
            PrimitiveType::String => Value::String(self.get_string()),
            PrimitiveType::Integer => Value::Integer(self.get_integer()),
            PrimitiveType::Long => Value::Long(self.get_long()),
            PrimitiveType::Double => Value::Double(self.get_double()),
            PrimitiveType::Boolean => Value::Boolean(self.get_boolean()),
            PrimitiveType::DateTime => Value::DateTime(self.get_date_time()),
        }
    }
}

// ============================================================================
// Named strategies
// ============================================================================

/// Built-in strategies selectable by name (`"sample"`, `"empty"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    #[default]
    Sample,
    #[serde(alias = "default")]
    Empty,
}

impl GeneratorKind {
    pub fn build(self) -> Arc<dyn ValueGenerator> {
        match self {
            GeneratorKind::Sample => Arc::new(SampleValueGenerator::new()),
            GeneratorKind::Empty => Arc::new(EmptyValueGenerator),
        }
    }
}

impl FromStr for GeneratorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sample" => Ok(GeneratorKind::Sample),
            "empty" | "default" => Ok(GeneratorKind::Empty),
            other => Err(Error::Config(format!("unknown value generator: {other}"))),
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorKind::Sample => f.write_str("sample"),
            GeneratorKind::Empty => f.write_str("empty"),
        }
    }
}
