//! Query assembler that turns a [`QueryRepresentation`] into a SPARQL AST.

use crate::ast::{Pattern, SelectQuery};
use crate::condition_tree::{build_condition_tree, RootElement};
use crate::config::CompilerConfig;
use crate::error::BuildError;
use crate::patterns::{ConditionScope, PatternBuilder, TripleBuilder, ValuePatternBuilder};
use crate::representation::{
    Condition, Datatype, PropertyValueRelation, QueryRepresentation, ReferenceRelation,
};
use crate::syntax;
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// State that lives for exactly one compile call.
struct CompileContext {
    next_condition_index: usize,
    repeating_properties: HashSet<String>,
}

impl CompileContext {
    fn new(conditions: &[Condition]) -> Self {
        Self {
            next_condition_index: 0,
            repeating_properties: repeating_regardless_properties(conditions),
        }
    }

    /// Scope for the next condition in declaration order.
    fn next_scope(&mut self, condition: &Condition) -> ConditionScope {
        let index = self.next_condition_index;
        self.next_condition_index += 1;
        let suffix = if self.repeating_properties.contains(&condition.property_id) {
            index.to_string()
        } else {
            String::new()
        };
        ConditionScope::new(index, suffix)
    }
}

/// Properties used more than once with an any-value blank node and no
/// reference constraint. Their blank nodes need a per-condition suffix.
fn repeating_regardless_properties(conditions: &[Condition]) -> HashSet<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for condition in conditions {
        if uses_any_value_blank_node(condition)
            && condition.reference_relation == ReferenceRelation::Regardless
        {
            *counts.entry(condition.property_id.as_str()).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(property_id, _)| property_id.to_string())
        .collect()
}

/// Unsupported datatypes always match any value, whatever the relation.
fn uses_any_value_blank_node(condition: &Condition) -> bool {
    condition.property_value_relation == PropertyValueRelation::Regardless
        || matches!(condition.datatype, Datatype::Unsupported(_))
}

/// Compiles query representations with one fixed configuration.
pub struct QueryCompiler {
    config: CompilerConfig,
}

impl Default for QueryCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCompiler {
    pub fn new() -> Self {
        Self::from_config(CompilerConfig::default())
    }

    pub fn from_config(config: CompilerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile a query representation into a `SELECT DISTINCT` query.
    pub fn compile(&self, representation: &QueryRepresentation) -> Result<SelectQuery, BuildError> {
        let pattern_builder = PatternBuilder::new(&self.config);
        let mut context = CompileContext::new(&representation.conditions);
        let root = build_condition_tree(&representation.conditions);

        // Singles are inlined, groups become one UNION each
        let mut query = SelectQuery::distinct(vec![TripleBuilder::item_variable()]);
        for element in &root {
            match element {
                RootElement::Single(condition) => {
                    let scope = context.next_scope(condition);
                    trace!(property = %condition.property_id, ?scope, "building condition");
                    query
                        .where_patterns
                        .extend(pattern_builder.build_value_patterns(condition, &scope)?);
                }
                RootElement::Group(conditions) => {
                    let mut arms = Vec::with_capacity(conditions.len());
                    for condition in conditions {
                        let scope = context.next_scope(condition);
                        trace!(property = %condition.property_id, ?scope, "building union arm");
                        arms.push(Pattern::Group(
                            pattern_builder.build_value_patterns(condition, &scope)?,
                        ));
                    }
                    query.where_patterns.push(Pattern::Union(arms));
                }
            }
        }

        // MINUS alone matches nothing
        if query.where_patterns.iter().all(Pattern::is_minus) {
            debug!("query has no positive pattern, prepending any-value placeholder");
            query.where_patterns.insert(0, pattern_builder.any_value_pattern());
        }

        query.limit = representation.limit;

        debug!(
            conditions = representation.conditions.len(),
            root_elements = root.len(),
            patterns = query.where_patterns.len(),
            limit = ?query.limit,
            omit_labels = representation.omit_labels,
            "compiled query representation"
        );

        // Labels wrap the limited inner query
        if representation.omit_labels {
            Ok(query)
        } else {
            Ok(self.wrap_with_labels(&pattern_builder, query))
        }
    }

    /// `SELECT DISTINCT ?item ?itemLabel WHERE { SERVICE wikibase:label {...} { inner } }`
    fn wrap_with_labels(&self, pattern_builder: &PatternBuilder<'_>, inner: SelectQuery) -> SelectQuery {
        let mut wrapper = SelectQuery::distinct(vec![
            TripleBuilder::item_variable(),
            syntax::variable("itemLabel"),
        ]);
        wrapper.where_patterns.push(Pattern::Service {
            name: syntax::iri(self.config.namespaces.wikibase("label")),
            patterns: vec![pattern_builder.label_service_pattern()],
            silent: false,
        });
        wrapper
            .where_patterns
            .push(Pattern::Group(vec![Pattern::SubSelect(Box::new(inner))]));
        wrapper
    }
}
