//! # Presentation
//!
//! Validated input of an enumeration: the generator count, the initial
//! relations, and the axioms that produce the secondary relations.
//!
//! - Validate every relation before any graph mutation
//! - Reject malformed input instead of laying degenerate edges
//! - Derive the secondary relations applied at every vertex

use crate::primitives::{DEFAULT_ORDER, MAX_GENERATORS, MAX_ORDER, MAX_RELATIONS, MAX_WORD_LENGTH};
use crate::{Generator, InitialRelation, QuandleError, SecondaryRelation, Step, Vertex, Word};
use serde::{Deserialize, Serialize};

/// Which algebraic structure is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Structure {
    /// Every generator fixes its own vertex (`g^g = g`).
    #[default]
    Quandle,
    /// Generator vertices are seeded without self-loops.
    Rack,
}

/// A validated presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    generator_count: u32,
    relations: Vec<InitialRelation>,
    structure: Structure,
    /// Order of generator `g` at index `g - 1`.
    orders: Vec<u32>,
    /// Closed words applied at every vertex after the derived ones.
    extra_secondary: Vec<SecondaryRelation>,
}

impl Presentation {
    /// Build a presentation from flat relations `[start, g1, ..., gk, end]`.
    ///
    /// # Errors
    /// - `NoGenerators` / `TooManyGenerators` for an unusable generator count
    /// - `MalformedRelation` for the first relation that cannot be realised
    pub fn new(generator_count: u32, relations: &[Vec<i64>]) -> Result<Self, QuandleError> {
        Self::check_generator_count(generator_count)?;
        if relations.len() > MAX_RELATIONS {
            return Err(QuandleError::MalformedRelation {
                index: MAX_RELATIONS,
                reason: format!("at most {} relations are supported", MAX_RELATIONS),
            });
        }

        let relations = relations
            .iter()
            .enumerate()
            .map(|(index, flat)| Self::parse_relation(index, flat, generator_count))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            generator_count,
            relations,
            structure: Structure::default(),
            orders: vec![DEFAULT_ORDER; generator_count as usize],
            extra_secondary: Vec::new(),
        })
    }

    /// Build a presentation from already decoded relations.
    pub fn from_relations(
        generator_count: u32,
        relations: Vec<InitialRelation>,
    ) -> Result<Self, QuandleError> {
        let flat: Vec<Vec<i64>> = relations.iter().map(InitialRelation::to_flat).collect();
        Self::new(generator_count, &flat)
    }

    /// Select quandle or rack axioms.
    #[must_use]
    pub fn with_structure(mut self, structure: Structure) -> Self {
        self.structure = structure;
        self
    }

    /// Set the order of every generator (`x^{g^order} = x`).
    pub fn with_order(mut self, order: u32) -> Result<Self, QuandleError> {
        Self::check_order(order)?;
        self.orders.fill(order);
        Ok(self)
    }

    /// Set the order of each generator; `orders[g - 1]` belongs to `g`.
    ///
    /// # Errors
    /// - `GeneratorOrderCount` unless there is exactly one order per generator
    /// - `InvalidOrder` for the first unusable order
    pub fn with_generator_orders(mut self, orders: &[u32]) -> Result<Self, QuandleError> {
        if orders.len() != self.generator_count as usize {
            return Err(QuandleError::GeneratorOrderCount {
                expected: self.generator_count,
                found: orders.len(),
            });
        }
        for &order in orders {
            Self::check_order(order)?;
        }
        self.orders = orders.to_vec();
        Ok(self)
    }

    /// Add closed words `[g1, ..., gk]` meaning `x^{g1...gk} = x` at every
    /// vertex.
    ///
    /// # Errors
    /// `MalformedSecondary` for the first word that cannot be realised.
    pub fn with_extra_secondary(mut self, words: &[Vec<i64>]) -> Result<Self, QuandleError> {
        if self.extra_secondary.len().saturating_add(words.len()) > MAX_RELATIONS {
            return Err(QuandleError::MalformedSecondary {
                index: MAX_RELATIONS,
                reason: format!("at most {} secondary relations are supported", MAX_RELATIONS),
            });
        }

        let offset = self.extra_secondary.len();
        for (position, flat) in words.iter().enumerate() {
            let index = offset + position;
            let malformed = |reason: String| QuandleError::MalformedSecondary { index, reason };
            if flat.is_empty() {
                return Err(malformed("expected at least one step".to_string()));
            }
            let steps = Self::parse_steps(flat, self.generator_count).map_err(malformed)?;
            self.extra_secondary.push(SecondaryRelation::new(Word::new(steps)));
        }
        Ok(self)
    }

    #[must_use]
    pub fn generator_count(&self) -> u32 {
        self.generator_count
    }

    #[must_use]
    pub fn relations(&self) -> &[InitialRelation] {
        &self.relations
    }

    #[must_use]
    pub fn structure(&self) -> Structure {
        self.structure
    }

    /// Generator orders, `orders()[g - 1]` for generator `g`.
    #[must_use]
    pub fn orders(&self) -> &[u32] {
        &self.orders
    }

    /// The order of `g`, or the default for an undeclared generator.
    #[must_use]
    pub fn order_of(&self, g: Generator) -> u32 {
        (g.0 as usize)
            .checked_sub(1)
            .and_then(|index| self.orders.get(index))
            .copied()
            .unwrap_or(DEFAULT_ORDER)
    }

    #[must_use]
    pub fn extra_secondary(&self) -> &[SecondaryRelation] {
        &self.extra_secondary
    }

    /// Generators `1..=generator_count` in order.
    pub fn generators(&self) -> impl Iterator<Item = Generator> {
        (1..=self.generator_count).map(Generator)
    }

    /// The relations applied at every vertex during enumeration.
    ///
    /// One `[g; order(g)]` per generator, then one per initial relation
    /// `start^w = end`: `inv(w) start w inv(end)`, where `inv(w)` is `w`
    /// reversed with every step inverted. A generator of order at most 2 is
    /// its own inverse, so for involutory quandles this is
    /// `reverse(w) start w end`. The extra closed words come last.
    #[must_use]
    pub fn secondary_relations(&self) -> Vec<SecondaryRelation> {
        let powers = self.generators().map(|g| {
            SecondaryRelation::new(Word::new(vec![Step::forward(g); self.order_of(g) as usize]))
        });

        let conjugates = self.relations.iter().map(|rel| {
            let mut steps = Vec::with_capacity(rel.word.len() * 2 + 2);
            steps.extend(rel.word.steps().iter().rev().map(|&s| self.invert(s)));
            steps.push(Step::forward(Self::vertex_generator(rel.start)));
            steps.extend_from_slice(rel.word.steps());
            steps.push(self.invert(Step::forward(Self::vertex_generator(rel.end))));
            SecondaryRelation::new(Word::new(steps))
        });

        powers
            .chain(conjugates)
            .chain(self.extra_secondary.iter().cloned())
            .collect()
    }

    fn invert(&self, step: Step) -> Step {
        if self.order_of(step.generator) <= 2 {
            step
        } else {
            step.reversed()
        }
    }

    /// Endpoints are validated to name generator vertices.
    fn vertex_generator(v: Vertex) -> Generator {
        Generator(v.0 as u32)
    }

    fn check_generator_count(generator_count: u32) -> Result<(), QuandleError> {
        if generator_count == 0 {
            return Err(QuandleError::NoGenerators);
        }
        if generator_count > MAX_GENERATORS {
            return Err(QuandleError::TooManyGenerators(generator_count));
        }
        Ok(())
    }

    fn check_order(order: u32) -> Result<(), QuandleError> {
        if order == 0 || order > MAX_ORDER {
            return Err(QuandleError::InvalidOrder(order));
        }
        Ok(())
    }

    /// Decode and validate one flat relation.
    pub fn parse_relation(
        index: usize,
        flat: &[i64],
        generator_count: u32,
    ) -> Result<InitialRelation, QuandleError> {
        let malformed = |reason: String| QuandleError::MalformedRelation { index, reason };

        let [first, interior @ .., last] = flat else {
            return Err(malformed(
                "expected [start, g1, ..., gk, end] with at least one step".to_string(),
            ));
        };
        if interior.is_empty() {
            return Err(malformed(
                "expected [start, g1, ..., gk, end] with at least one step".to_string(),
            ));
        }

        let in_range = |value: i64| (1..=i64::from(generator_count)).contains(&value);

        for (label, endpoint) in [("start", *first), ("end", *last)] {
            if !in_range(endpoint) {
                return Err(malformed(format!(
                    "{} vertex {} is not a generator in 1..={}",
                    label, endpoint, generator_count
                )));
            }
        }

        let steps = Self::parse_steps(interior, generator_count).map_err(malformed)?;

        Ok(InitialRelation::new(
            Vertex(*first as u64),
            Word::new(steps),
            Vertex(*last as u64),
        ))
    }

    /// Decode signed steps, each naming a generator in `1..=generator_count`.
    fn parse_steps(values: &[i64], generator_count: u32) -> Result<Vec<Step>, String> {
        if values.len() > MAX_WORD_LENGTH {
            return Err(format!(
                "word has {} steps (maximum {})",
                values.len(),
                MAX_WORD_LENGTH
            ));
        }

        let mut steps = Vec::with_capacity(values.len());
        for (position, &value) in values.iter().enumerate() {
            if value == 0 {
                return Err(format!("step {} is zero", position + 1));
            }
            if !(1..=i64::from(generator_count)).contains(&value.saturating_abs()) {
                return Err(format!(
                    "step {} names generator {} outside 1..={}",
                    position + 1,
                    value,
                    generator_count
                ));
            }
            let step = Step::from_signed(value)
                .ok_or_else(|| format!("step {} is not a generator", position + 1))?;
            steps.push(step);
        }
        Ok(steps)
    }
}

// =============================================================================
// TESTS
// =============================================================================
