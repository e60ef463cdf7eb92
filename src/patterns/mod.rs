//! Per-datatype pattern builders and the dispatcher that picks one of them.
//!
//! Every builder turns exactly one [`Condition`] into a list of patterns. The
//! only per-compile state a builder sees is the [`ConditionScope`], which the
//! query compiler hands in for each condition.

mod date;
mod entity;
mod limited;
mod quantity;
mod string;
mod triples;

pub use date::DateValuePatternBuilder;
pub use entity::EntityValuePatternBuilder;
pub use limited::LimitedSupportPatternBuilder;
pub use quantity::QuantityValuePatternBuilder;
pub use string::StringValuePatternBuilder;
pub use triples::TripleBuilder;

use crate::ast::{Pattern, Variable};
use crate::config::CompilerConfig;
use crate::error::BuildError;
use crate::representation::{Condition, Datatype};
use crate::syntax;

/// Position of one condition inside the compile, plus the blank-node suffix
/// used when the same property repeats under "regardless of value".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConditionScope {
    index: Option<usize>,
    repeating_property_suffix: String,
}

impl ConditionScope {
    pub fn new(index: usize, repeating_property_suffix: impl Into<String>) -> Self {
        Self {
            index: Some(index),
            repeating_property_suffix: repeating_property_suffix.into(),
        }
    }

    /// Scope whose index has not been assigned yet.
    pub fn unset() -> Self {
        Self::default()
    }

    pub fn index(&self) -> Result<usize, BuildError> {
        self.index.ok_or(BuildError::UninitializedConditionIndex)
    }

    /// Empty unless the property repeats.
    pub fn repeating_property_suffix(&self) -> &str {
        &self.repeating_property_suffix
    }

    /// `?{prefix}{index}`, e.g. `?statement3`.
    pub fn variable(&self, prefix: &str) -> Result<Variable, BuildError> {
        Ok(syntax::variable(format!("{}{}", prefix, self.index()?)))
    }

    /// `?{prefix}_{index}`, e.g. `?statementValue_3`.
    pub fn underscored_variable(&self, prefix: &str) -> Result<Variable, BuildError> {
        Ok(syntax::variable(format!("{}_{}", prefix, self.index()?)))
    }
}

/// Common contract of the per-datatype strategies.
pub trait ValuePatternBuilder {
    fn build_value_patterns(
        &self,
        condition: &Condition,
        scope: &ConditionScope,
    ) -> Result<Vec<Pattern>, BuildError>;
}

/// The strategy chosen for one datatype.
enum DatatypeStrategy<'c> {
    String(StringValuePatternBuilder<'c>),
    Entity(EntityValuePatternBuilder<'c>),
    Quantity(QuantityValuePatternBuilder<'c>),
    Date(DateValuePatternBuilder<'c>),
    LimitedSupport(LimitedSupportPatternBuilder<'c>),
}

impl<'c> DatatypeStrategy<'c> {
    fn for_datatype(datatype: &Datatype, config: &'c CompilerConfig) -> Self {
        match datatype {
            Datatype::String | Datatype::ExternalId | Datatype::Url => {
                DatatypeStrategy::String(StringValuePatternBuilder::new(config))
            }
            Datatype::WikibaseItem
            | Datatype::WikibaseLexeme
            | Datatype::WikibaseSense
            | Datatype::WikibaseForm
            | Datatype::WikibaseProperty => {
                DatatypeStrategy::Entity(EntityValuePatternBuilder::new(config))
            }
            Datatype::Quantity => DatatypeStrategy::Quantity(QuantityValuePatternBuilder::new(config)),
            Datatype::Time => DatatypeStrategy::Date(DateValuePatternBuilder::new(config)),
            Datatype::Unsupported(_) => {
                DatatypeStrategy::LimitedSupport(LimitedSupportPatternBuilder::new(config))
            }
        }
    }
}

impl ValuePatternBuilder for DatatypeStrategy<'_> {
    fn build_value_patterns(
        &self,
        condition: &Condition,
        scope: &ConditionScope,
    ) -> Result<Vec<Pattern>, BuildError> {
        match self {
            DatatypeStrategy::String(builder) => builder.build_value_patterns(condition, scope),
            DatatypeStrategy::Entity(builder) => builder.build_value_patterns(condition, scope),
            DatatypeStrategy::Quantity(builder) => builder.build_value_patterns(condition, scope),
            DatatypeStrategy::Date(builder) => builder.build_value_patterns(condition, scope),
            DatatypeStrategy::LimitedSupport(builder) => builder.build_value_patterns(condition, scope),
        }
    }
}

/// Entry point used by the query compiler.
pub struct PatternBuilder<'c> {
    config: &'c CompilerConfig,
    triple_builder: TripleBuilder<'c>,
}

impl<'c> PatternBuilder<'c> {
    pub fn new(config: &'c CompilerConfig) -> Self {
        Self {
            config,
            triple_builder: TripleBuilder::new(config),
        }
    }

    /// `SERVICE wikibase:label` body.
    pub fn label_service_pattern(&self) -> Pattern {
        syntax::bgp(vec![self.triple_builder.label_service_triple()])
    }

    /// Placeholder that binds `?item` to anything with sitelinks.
    pub fn any_value_pattern(&self) -> Pattern {
        syntax::bgp(vec![self.triple_builder.any_value_triple()])
    }
}

impl ValuePatternBuilder for PatternBuilder<'_> {
    fn build_value_patterns(
        &self,
        condition: &Condition,
        scope: &ConditionScope,
    ) -> Result<Vec<Pattern>, BuildError> {
        DatatypeStrategy::for_datatype(&condition.datatype, self.config)
            .build_value_patterns(condition, scope)
    }
}

/// Wraps `patterns` in `MINUS` when the condition is negated.
pub(crate) fn negate_if_needed(patterns: Vec<Pattern>, negate: bool) -> Vec<Pattern> {
    if negate {
        vec![Pattern::Minus(patterns)]
    } else {
        patterns
    }
}
