//! Per-call generation options.
//!
//! Loadable from JSON with camelCase keys:
//!
//! ```json
//! { "valueGenerator": "empty", "includeOptionalFields": false }
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::generator::{GeneratorKind, ValueGenerator};
use crate::Result;

/// Options for one `generate` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateOptions {
    /// Built-in strategy, used unless a custom generator is set.
    pub value_generator: GeneratorKind,
    /// Generate values for optional properties too.
    pub include_optional_fields: bool,
    #[serde(skip)]
    custom_generator: Option<Arc<dyn ValueGenerator>>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            value_generator: GeneratorKind::Sample,
            include_optional_fields: true,
            custom_generator: None,
        }
    }
}

impl GenerateOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sample() -> Self {
        Self::default()
    }

    pub fn empty() -> Self {
        Self { value_generator: GeneratorKind::Empty, ..Self::default() }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Override the strategy for the whole call with a caller-supplied one.
    pub fn with_value_generator(mut self, generator: Arc<dyn ValueGenerator>) -> Self {
        self.custom_generator = Some(generator);
        self
    }

    pub fn include_optional_fields(mut self, include: bool) -> Self {
        self.include_optional_fields = include;
        self
    }

    /// The strategy this call will use.
    pub fn value_generator(&self) -> Arc<dyn ValueGenerator> {
        match &self.custom_generator {
            Some(g) => Arc::clone(g),
            None => self.value_generator.build(),
        }
    }
}
