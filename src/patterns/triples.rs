use crate::ast::{Expression, Pattern, Term, Triple, Variable};
use crate::config::CompilerConfig;
use crate::representation::ReferenceRelation;
use crate::syntax;

/// Triples shared by several builders: item/statement links, the reference
/// filter and the label/any-value fragments.
pub struct TripleBuilder<'c> {
    config: &'c CompilerConfig,
}

impl<'c> TripleBuilder<'c> {
    pub fn new(config: &'c CompilerConfig) -> Self {
        Self { config }
    }

    pub fn item_variable() -> Variable {
        syntax::variable("item")
    }

    /// `?item p:{property} ?statement`
    pub fn item_to_statement_triple(&self, property_id: &str, statement: &Variable) -> Triple {
        syntax::simple_triple(
            Self::item_variable(),
            &self.config.namespaces.claim(property_id),
            statement.clone(),
        )
    }

    /// `FILTER(EXISTS { ?statement prov:wasDerivedFrom ?reference. })`, negated
    /// for `Without`; `None` when references do not matter.
    pub fn reference_filter_pattern(
        &self,
        reference_relation: ReferenceRelation,
        statement: &Variable,
    ) -> Option<Pattern> {
        let negated = match reference_relation {
            ReferenceRelation::With => false,
            ReferenceRelation::Without => true,
            ReferenceRelation::Regardless => return None,
        };

        let derived_from = syntax::simple_triple(
            statement.clone(),
            &self.config.namespaces.prov("wasDerivedFrom"),
            syntax::variable("reference"),
        );
        Some(Pattern::Filter(Expression::Exists {
            negated,
            patterns: vec![syntax::bgp(vec![derived_from])],
        }))
    }

    /// `bd:serviceParam wikibase:language "[AUTO_LANGUAGE]"`
    pub fn label_service_triple(&self) -> Triple {
        let namespaces = &self.config.namespaces;
        syntax::simple_triple(
            syntax::iri(namespaces.bd("serviceParam")),
            &namespaces.wikibase("language"),
            syntax::plain_literal(self.config.label_language.clone()),
        )
    }

    /// `?item wikibase:sitelinks _:anyValue`
    pub fn any_value_triple(&self) -> Triple {
        syntax::simple_triple(
            Self::item_variable(),
            &self.config.namespaces.wikibase("sitelinks"),
            syntax::blank_node("anyValue"),
        )
    }

    /// `_:anyValue{property}` or `_:anyValue{property}_{suffix}` for repeated properties.
    pub fn any_value_blank_node(property_id: &str, repeating_property_suffix: &str) -> Term {
        if repeating_property_suffix.is_empty() {
            syntax::blank_node(format!("anyValue{}", property_id))
        } else {
            syntax::blank_node(format!("anyValue{}_{}", property_id, repeating_property_suffix))
        }
    }
}
