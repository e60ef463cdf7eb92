use super::string::build_statement_value_patterns;
use super::triples::TripleBuilder;
use super::{ConditionScope, ValuePatternBuilder};
use crate::ast::Pattern;
use crate::config::CompilerConfig;
use crate::error::BuildError;
use crate::representation::{Condition, PropertyValueRelation};

/// Fallback for datatypes without full support: the condition only asserts
/// that the property has some value.
pub struct LimitedSupportPatternBuilder<'c> {
    config: &'c CompilerConfig,
    triple_builder: TripleBuilder<'c>,
}

impl<'c> LimitedSupportPatternBuilder<'c> {
    pub fn new(config: &'c CompilerConfig) -> Self {
        Self {
            config,
            triple_builder: TripleBuilder::new(config),
        }
    }
}

impl ValuePatternBuilder for LimitedSupportPatternBuilder<'_> {
    fn build_value_patterns(
        &self,
        condition: &Condition,
        scope: &ConditionScope,
    ) -> Result<Vec<Pattern>, BuildError> {
        if let relation @ (PropertyValueRelation::LessThan | PropertyValueRelation::MoreThan) =
            condition.property_value_relation
        {
            return Err(BuildError::UnsupportedRelation {
                datatype: condition.datatype.clone(),
                relation,
            });
        }

        let regardless = Condition {
            property_value_relation: PropertyValueRelation::Regardless,
            ..condition.clone()
        };
        let placeholder =
            TripleBuilder::any_value_blank_node(&condition.property_id, scope.repeating_property_suffix());
        build_statement_value_patterns(
            self.config,
            &self.triple_builder,
            &regardless,
            scope,
            placeholder,
            None,
        )
    }
}
