//! # Presentation Files
//!
//! The toml format a presentation is stored in:
//!
//! ```toml
//! generators = 3
//! structure = "quandle"     # or "rack"
//! order = 2                  # or generator_orders = [2, 2, 3]
//! relations = [[3, 1, 2, 1, 3, 1, 2, 1, 2, 1]]
//! extra_secondary = [[2, 1, 3, 1, 2, -3]]
//!
//! [budget]
//! max_steps = 100000
//! max_vertices = 1000000
//! ```
//!
//! Command-line flags are applied on top of a loaded file with
//! [`PresentationFile::apply`].

use crate::files::{MAX_PRESENTATION_FILE_SIZE, read_bounded};
use quandle_core::primitives::DEFAULT_ORDER;
use quandle_core::{Budget, Presentation, QuandleError, Structure};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A presentation as written in a toml file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PresentationFile {
    pub generators: u32,

    #[serde(default)]
    pub structure: Structure,

    #[serde(default = "default_order")]
    pub order: u32,

    /// One order per generator; replaces `order` when present.
    #[serde(default)]
    pub generator_orders: Option<Vec<u32>>,

    /// Flat relations `[start, g1, ..., gk, end]`.
    #[serde(default)]
    pub relations: Vec<Vec<i64>>,

    /// Closed words `[g1, ..., gk]` applied at every vertex.
    #[serde(default)]
    pub extra_secondary: Vec<Vec<i64>>,

    #[serde(default)]
    pub budget: Budget,
}

fn default_order() -> u32 {
    DEFAULT_ORDER
}

/// Command-line values that replace file values when present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub generators: Option<u32>,
    /// Appended to the file's relations.
    pub relations: Vec<Vec<i64>>,
    /// Appended to the file's extra secondary relations.
    pub extra_secondary: Vec<Vec<i64>>,
    pub rack: bool,
    /// Replaces both the file's `order` and its `generator_orders`.
    pub order: Option<u32>,
    pub generator_orders: Option<Vec<u32>>,
    pub max_steps: Option<u64>,
    pub max_vertices: Option<usize>,
    pub max_closure_passes: Option<u64>,
}

impl PresentationFile {
    /// An empty presentation on `generators` generators.
    #[must_use]
    pub fn new(generators: u32) -> Self {
        Self {
            generators,
            structure: Structure::default(),
            order: DEFAULT_ORDER,
            generator_orders: None,
            relations: Vec::new(),
            extra_secondary: Vec::new(),
            budget: Budget::default(),
        }
    }

    /// Parse toml text.
    pub fn from_toml_str(text: &str) -> Result<Self, QuandleError> {
        toml::from_str(text).map_err(|e| {
            QuandleError::DeserializationError(format!("Invalid presentation file: {}", e))
        })
    }

    /// Read and parse a toml file.
    pub fn load(path: &Path) -> Result<Self, QuandleError> {
        let bytes = read_bounded(path, MAX_PRESENTATION_FILE_SIZE)?;
        let text = String::from_utf8(bytes).map_err(|e| {
            QuandleError::DeserializationError(format!("Presentation file is not UTF-8: {}", e))
        })?;
        Self::from_toml_str(&text)
    }

    /// Build from an optional file plus command-line overrides.
    ///
    /// Without a file, `--generators` is required.
    pub fn resolve(path: Option<&Path>, overrides: &Overrides) -> Result<Self, QuandleError> {
        let base = match (path, overrides.generators) {
            (Some(path), _) => Self::load(path)?,
            (None, Some(generators)) => Self::new(generators),
            (None, None) => {
                return Err(QuandleError::InvalidArguments(
                    "either --file or --generators is required".to_string(),
                ));
            }
        };
        Ok(base.apply(overrides))
    }

    /// Apply command-line overrides.
    #[must_use]
    pub fn apply(mut self, overrides: &Overrides) -> Self {
        if let Some(generators) = overrides.generators {
            self.generators = generators;
        }
        self.relations.extend(overrides.relations.iter().cloned());
        self.extra_secondary.extend(overrides.extra_secondary.iter().cloned());
        if overrides.rack {
            self.structure = Structure::Rack;
        }
        if let Some(order) = overrides.order {
            self.order = order;
            self.generator_orders = None;
        }
        if let Some(orders) = &overrides.generator_orders {
            self.generator_orders = Some(orders.clone());
        }
        if let Some(steps) = overrides.max_steps {
            self.budget.max_steps = Some(steps);
        }
        if let Some(vertices) = overrides.max_vertices {
            self.budget.max_vertices = Some(vertices);
        }
        if let Some(passes) = overrides.max_closure_passes {
            self.budget.max_closure_passes = Some(passes);
        }
        self
    }

    /// Validate into a core presentation.
    pub fn to_presentation(&self) -> Result<Presentation, QuandleError> {
        let mut presentation = Presentation::new(self.generators, &self.relations)?
            .with_structure(self.structure)
            .with_order(self.order)?;
        if let Some(orders) = &self.generator_orders {
            presentation = presentation.with_generator_orders(orders)?;
        }
        presentation.with_extra_secondary(&self.extra_secondary)
    }

    /// The configured budget, validated.
    pub fn to_budget(&self) -> Result<Budget, QuandleError> {
        self.budget.validate()?;
        Ok(self.budget)
    }
}

/// Parse a comma-separated relation such as `"3,1,-2,1"`.
pub fn parse_relation_arg(text: &str) -> Result<Vec<i64>, QuandleError> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>().map_err(|_| {
                QuandleError::DeserializationError(format!(
                    "Invalid relation '{}': '{}' is not an integer",
                    text, part
                ))
            })
        })
        .collect()
}

/// Parse a comma-separated order list such as `"2,2,3"`.
pub fn parse_order_arg(text: &str) -> Result<Vec<u32>, QuandleError> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u32>().map_err(|_| {
                QuandleError::DeserializationError(format!(
                    "Invalid order list '{}': '{}' is not a non-negative integer",
                    text, part
                ))
            })
        })
        .collect()
}
