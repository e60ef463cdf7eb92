use super::triples::TripleBuilder;
use super::{negate_if_needed, ConditionScope, ValuePatternBuilder};
use crate::ast::{Pattern, PropertyPath, Term};
use crate::config::CompilerConfig;
use crate::error::BuildError;
use crate::representation::{Condition, ConditionValue, Datatype, PropertyValueRelation};
use crate::syntax::{self, PathStep};

/// Plain text, external identifiers and URLs.
pub struct StringValuePatternBuilder<'c> {
    config: &'c CompilerConfig,
    triple_builder: TripleBuilder<'c>,
}

impl<'c> StringValuePatternBuilder<'c> {
    pub fn new(config: &'c CompilerConfig) -> Self {
        Self {
            config,
            triple_builder: TripleBuilder::new(config),
        }
    }
}

impl ValuePatternBuilder for StringValuePatternBuilder<'_> {
    fn build_value_patterns(
        &self,
        condition: &Condition,
        scope: &ConditionScope,
    ) -> Result<Vec<Pattern>, BuildError> {
        if !matches!(
            condition.datatype,
            Datatype::String | Datatype::ExternalId | Datatype::Url
        ) {
            return Err(BuildError::UnexpectedDatatype {
                builder: "string",
                datatype: condition.datatype.clone(),
            });
        }
        let ConditionValue::Text(value) = &condition.value else {
            return Err(BuildError::UnexpectedValue {
                datatype: condition.datatype.clone(),
                expected: "string",
                found: condition.value.kind(),
            });
        };

        let value_term = if condition.datatype == Datatype::Url {
            Term::Iri(syntax::iri(value.clone()))
        } else {
            Term::Literal(syntax::plain_literal(value.clone()))
        };

        build_statement_value_patterns(self.config, &self.triple_builder, condition, scope, value_term, None)
    }
}

/// Shared shape of the string and entity builders:
///
/// ```text
/// ?item p:P ?statementN. ?statementN (ps:P[/tail]) object.
/// [FILTER(EXISTS { ... reference ... })]
/// [MINUS { ?item (p:P/ps:P[/tail]) value. }]      # not matching
/// ```
///
/// `value_path_tail` extends the statement-to-value path wherever the concrete
/// value is matched (used for subclass closure).
pub(super) fn build_statement_value_patterns(
    config: &CompilerConfig,
    triple_builder: &TripleBuilder<'_>,
    condition: &Condition,
    scope: &ConditionScope,
    value_term: Term,
    value_path_tail: Option<PropertyPath>,
) -> Result<Vec<Pattern>, BuildError> {
    let namespaces = &config.namespaces;
    let property_id = condition.property_id.as_str();
    let statement = scope.variable("statement")?;

    // Not matching binds any value here and excludes the concrete one below
    let mut statement_path: Vec<PathStep> = vec![namespaces.statement(property_id).into()];
    let object = match condition.property_value_relation {
        PropertyValueRelation::Matching => {
            if let Some(tail) = &value_path_tail {
                statement_path.push(tail.clone().into());
            }
            value_term.clone()
        }
        PropertyValueRelation::NotMatching => Term::Variable(scope.variable("instance")?),
        PropertyValueRelation::Regardless => {
            TripleBuilder::any_value_blank_node(property_id, scope.repeating_property_suffix())
        }
        relation @ (PropertyValueRelation::LessThan | PropertyValueRelation::MoreThan) => {
            return Err(BuildError::UnsupportedRelation {
                datatype: condition.datatype.clone(),
                relation,
            });
        }
    };

    let mut patterns = vec![syntax::bgp(vec![
        triple_builder.item_to_statement_triple(property_id, &statement),
        syntax::path_triple(statement.clone(), statement_path, object),
    ])];

    // The reference filter is grouped with its statement
    if let Some(reference_filter) =
        triple_builder.reference_filter_pattern(condition.reference_relation, &statement)
    {
        patterns.push(reference_filter);
        patterns = vec![Pattern::Group(patterns)];
    }

    let mut patterns = negate_if_needed(patterns, condition.negate);

    // MINUS stays outside the negation
    if condition.property_value_relation == PropertyValueRelation::NotMatching {
        let mut not_matching_path: Vec<PathStep> = vec![
            namespaces.claim(property_id).into(),
            namespaces.statement(property_id).into(),
        ];
        if let Some(tail) = value_path_tail {
            not_matching_path.push(tail.into());
        }
        patterns.push(Pattern::Minus(vec![syntax::bgp(vec![syntax::path_triple(
            TripleBuilder::item_variable(),
            not_matching_path,
            value_term,
        )])]));
    }

    Ok(patterns)
}
