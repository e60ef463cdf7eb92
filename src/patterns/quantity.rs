use super::triples::TripleBuilder;
use super::{negate_if_needed, ConditionScope, ValuePatternBuilder};
use crate::ast::{Operator, Pattern, Variable};
use crate::config::CompilerConfig;
use crate::error::BuildError;
use crate::representation::{
    Condition, ConditionValue, Datatype, PropertyValueRelation, QuantityValue, ReferenceRelation,
};
use crate::syntax::{self, PathStep};

/// Quantities, optionally normalized to the coherent SI unit before comparing.
pub struct QuantityValuePatternBuilder<'c> {
    config: &'c CompilerConfig,
    triple_builder: TripleBuilder<'c>,
}

/// Comparison operator for a relation; `None` when any value matches.
fn filter_operator(relation: PropertyValueRelation) -> Option<Operator> {
    match relation {
        PropertyValueRelation::Matching => Some(Operator::Eq),
        PropertyValueRelation::NotMatching => Some(Operator::NotEq),
        PropertyValueRelation::LessThan => Some(Operator::Lt),
        PropertyValueRelation::MoreThan => Some(Operator::Gt),
        PropertyValueRelation::Regardless => None,
    }
}

impl<'c> QuantityValuePatternBuilder<'c> {
    pub fn new(config: &'c CompilerConfig) -> Self {
        Self {
            config,
            triple_builder: TripleBuilder::new(config),
        }
    }

    /// `?item p:P ?statementN. ?statementN (psv:P/wikibase:quantityAmount) ?numericQuantityN.`
    /// followed by the value filter against the raw amount, if any.
    fn build_unitless_patterns(
        &self,
        condition: &Condition,
        amount: Option<f64>,
        scope: &ConditionScope,
    ) -> Result<Vec<Pattern>, BuildError> {
        let namespaces = &self.config.namespaces;
        let property_id = condition.property_id.as_str();
        let statement = scope.variable("statement")?;
        let numeric_quantity = scope.variable("numericQuantity")?;

        let mut patterns = vec![syntax::bgp(vec![
            self.triple_builder.item_to_statement_triple(property_id, &statement),
            syntax::path_triple(
                statement.clone(),
                vec![
                    namespaces.statement_value(property_id).into(),
                    namespaces.wikibase("quantityAmount").into(),
                ],
                numeric_quantity.clone(),
            ),
        ])];

        // Regardless has no amount to compare
        if let (Some(operator), Some(amount)) = (filter_operator(condition.property_value_relation), amount) {
            patterns.push(syntax::operator_filter(
                numeric_quantity,
                operator,
                syntax::decimal_literal_from_number(amount),
            ));
        }

        self.push_reference_filter(&mut patterns, condition.reference_relation, &statement);
        Ok(patterns)
    }

    /// Converts the user's amount into the coherent unit and compares it with
    /// the statement's normalized amount.
    fn build_unit_conversion_patterns(
        &self,
        condition: &Condition,
        amount: f64,
        unit: &str,
        scope: &ConditionScope,
    ) -> Result<Vec<Pattern>, BuildError> {
        let namespaces = &self.config.namespaces;
        let property_id = condition.property_id.as_str();
        let conversion_property = self.config.si_conversion_property()?;

        let user_quantity = scope.variable("userQuantity")?;
        let user_unit = scope.variable("userUnit")?;
        let conversion_factor = scope.variable("conversionFactor")?;
        let coherent_unit = scope.variable("coherentUnit")?;
        let coherent_user_quantity = scope.variable("coherentUserQuantity")?;
        let statement = scope.variable("statement")?;
        let statement_quantity = scope.variable("statementQuantity")?;

        // User amount and unit
        let mut patterns = vec![
            syntax::bind(user_quantity.clone(), syntax::decimal_literal_from_number(amount)),
            syntax::bind(user_unit.clone(), syntax::iri(namespaces.entity(unit))),
        ];

        // Factor and coherent unit from the unit item's conversion statement
        let conversion_path = |field: &str| -> Vec<PathStep> {
            vec![
                namespaces.claim(conversion_property).into(),
                namespaces.statement_value(conversion_property).into(),
                namespaces.wikibase(field).into(),
            ]
        };
        patterns.push(syntax::bgp(vec![
            syntax::path_triple(
                user_unit.clone(),
                conversion_path("quantityAmount"),
                conversion_factor.clone(),
            ),
            syntax::path_triple(user_unit, conversion_path("quantityUnit"), coherent_unit.clone()),
        ]));

        patterns.push(syntax::bind(
            coherent_user_quantity.clone(),
            syntax::operation(user_quantity, Operator::Multiply, conversion_factor),
        ));

        // Statement amount already normalized to the coherent unit
        let normalized_path = |field: &str| -> Vec<PathStep> {
            vec![
                namespaces.statement_value_normalized(property_id).into(),
                namespaces.wikibase(field).into(),
            ]
        };
        patterns.push(syntax::bgp(vec![
            self.triple_builder.item_to_statement_triple(property_id, &statement),
            syntax::path_triple(
                statement.clone(),
                normalized_path("quantityAmount"),
                statement_quantity.clone(),
            ),
            syntax::path_triple(statement.clone(), normalized_path("quantityUnit"), coherent_unit),
        ]));

        if let Some(operator) = filter_operator(condition.property_value_relation) {
            patterns.push(syntax::operator_filter(
                statement_quantity,
                operator,
                coherent_user_quantity,
            ));
        }

        self.push_reference_filter(&mut patterns, condition.reference_relation, &statement);
        Ok(patterns)
    }

    fn push_reference_filter(
        &self,
        patterns: &mut Vec<Pattern>,
        reference_relation: ReferenceRelation,
        statement: &Variable,
    ) {
        if let Some(filter) = self
            .triple_builder
            .reference_filter_pattern(reference_relation, statement)
        {
            patterns.push(filter);
        }
    }
}

impl ValuePatternBuilder for QuantityValuePatternBuilder<'_> {
    fn build_value_patterns(
        &self,
        condition: &Condition,
        scope: &ConditionScope,
    ) -> Result<Vec<Pattern>, BuildError> {
        if condition.datatype != Datatype::Quantity {
            return Err(BuildError::UnexpectedDatatype {
                builder: "quantity",
                datatype: condition.datatype.clone(),
            });
        }

        let patterns = if condition.property_value_relation == PropertyValueRelation::Regardless {
            self.build_unitless_patterns(condition, None, scope)?
        } else {
            let ConditionValue::Quantity(QuantityValue { amount, unit }) = &condition.value else {
                return Err(BuildError::UnexpectedValue {
                    datatype: condition.datatype.clone(),
                    expected: "quantity value",
                    found: condition.value.kind(),
                });
            };
            match unit {
                Some(unit) => self.build_unit_conversion_patterns(condition, *amount, unit, scope)?,
                None => self.build_unitless_patterns(condition, Some(*amount), scope)?,
            }
        };

        Ok(negate_if_needed(patterns, condition.negate))
    }
}
