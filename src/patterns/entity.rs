use super::string::build_statement_value_patterns;
use super::triples::TripleBuilder;
use super::{ConditionScope, ValuePatternBuilder};
use crate::ast::{Pattern, Term};
use crate::config::CompilerConfig;
use crate::error::BuildError;
use crate::representation::{Condition, ConditionValue, Datatype, PropertyValueRelation};
use crate::syntax;

/// Items, lexemes, senses, forms and properties: the value is an entity IRI.
pub struct EntityValuePatternBuilder<'c> {
    config: &'c CompilerConfig,
    triple_builder: TripleBuilder<'c>,
}

impl<'c> EntityValuePatternBuilder<'c> {
    pub fn new(config: &'c CompilerConfig) -> Self {
        Self {
            config,
            triple_builder: TripleBuilder::new(config),
        }
    }

    fn entity_id<'a>(&self, condition: &'a Condition) -> Result<Option<&'a str>, BuildError> {
        match (&condition.value, condition.property_value_relation) {
            (ConditionValue::Entity(entity), _) => Ok(Some(entity.id.as_str())),
            // the value is never rendered when any value matches
            (_, PropertyValueRelation::Regardless) => Ok(None),
            (other, _) => Err(BuildError::UnexpectedValue {
                datatype: condition.datatype.clone(),
                expected: "entity reference",
                found: other.kind(),
            }),
        }
    }
}

impl ValuePatternBuilder for EntityValuePatternBuilder<'_> {
    fn build_value_patterns(
        &self,
        condition: &Condition,
        scope: &ConditionScope,
    ) -> Result<Vec<Pattern>, BuildError> {
        if !matches!(
            condition.datatype,
            Datatype::WikibaseItem
                | Datatype::WikibaseLexeme
                | Datatype::WikibaseSense
                | Datatype::WikibaseForm
                | Datatype::WikibaseProperty
        ) {
            return Err(BuildError::UnexpectedDatatype {
                builder: "entity",
                datatype: condition.datatype.clone(),
            });
        }

        let Some(entity_id) = self.entity_id(condition)? else {
            let placeholder = Term::Iri(syntax::iri(self.config.namespaces.entity("")));
            return build_statement_value_patterns(
                self.config,
                &self.triple_builder,
                condition,
                scope,
                placeholder,
                None,
            );
        };

        let value_term = Term::Iri(syntax::iri(self.config.namespaces.entity(entity_id)));
        let matches_value = matches!(
            condition.property_value_relation,
            PropertyValueRelation::Matching | PropertyValueRelation::NotMatching
        );
        let subclass_path = if condition.datatype == Datatype::WikibaseItem
            && condition.subclasses
            && matches_value
        {
            let subclass_property = self.config.subclass_property_for(&condition.property_id)?;
            Some(syntax::zero_or_more(
                &self.config.namespaces.direct(subclass_property),
            ))
        } else {
            None
        };

        build_statement_value_patterns(
            self.config,
            &self.triple_builder,
            condition,
            scope,
            value_term,
            subclass_path,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::condition;
    use super::*;
    use crate::ast::{PathItem, PathOperator, Predicate, PropertyPath, Triple};
    use crate::representation::EntityValue;

    fn entity(id: &str) -> ConditionValue {
        ConditionValue::Entity(EntityValue { id: id.to_string() })
    }

    fn statement_triple(patterns: &[Pattern]) -> &Triple {
        match &patterns[0] {
            Pattern::Bgp(triples) => &triples[1],
            other => panic!("Expected bgp, got {:?}", other),
        }
    }

    #[test]
    fn test_item_value_is_entity_iri() {
        let config = CompilerConfig::default();
        let patterns = EntityValuePatternBuilder::new(&config)
            .build_value_patterns(
                &condition("P31", Datatype::WikibaseItem, entity("Q146")),
                &ConditionScope::new(0, ""),
            )
            .unwrap();
        assert_eq!(
            statement_triple(&patterns).object,
            Term::Iri(syntax::iri("http://www.wikidata.org/entity/Q146"))
        );
    }

    #[test]
    fn test_subclasses_extend_path_with_mapped_property() {
        let config = CompilerConfig::default().with_subclass_property("P666", "P66");
        let mut item = condition("P666", Datatype::WikibaseItem, entity("Q456"));
        item.subclasses = true;

        let patterns = EntityValuePatternBuilder::new(&config)
            .build_value_patterns(&item, &ConditionScope::new(0, ""))
            .unwrap();
        let Predicate::Path(path) = &statement_triple(&patterns).predicate else {
            panic!("Expected a property path");
        };
        assert_eq!(
            path.items[1],
            PathItem::Path(PropertyPath {
                operator: PathOperator::ZeroOrMore,
                items: vec![PathItem::Iri(syntax::iri("http://www.wikidata.org/prop/direct/P66"))],
            })
        );
    }

    #[test]
    fn test_subclasses_without_mapping_is_configuration_error() {
        let config = CompilerConfig::default();
        let mut item = condition("P666", Datatype::WikibaseItem, entity("Q456"));
        item.subclasses = true;

        let error = EntityValuePatternBuilder::new(&config)
            .build_value_patterns(&item, &ConditionScope::new(0, ""))
            .unwrap_err();
        assert!(error.is_configuration_error());
    }

    #[test]
    fn test_subclasses_ignored_for_non_item_datatypes() {
        let config = CompilerConfig::default();
        let mut lexeme = condition("P5238", Datatype::WikibaseLexeme, entity("L7"));
        lexeme.subclasses = true;

        let patterns = EntityValuePatternBuilder::new(&config)
            .build_value_patterns(&lexeme, &ConditionScope::new(0, ""))
            .unwrap();
        let Predicate::Path(path) = &statement_triple(&patterns).predicate else {
            panic!("Expected a property path");
        };
        assert_eq!(path.items.len(), 1);
    }

    #[test]
    fn test_not_matching_subclasses_extend_minus_path() {
        let config = CompilerConfig::default().with_subclass_property("default", "P279");
        let mut item = condition("P31", Datatype::WikibaseItem, entity("Q5"));
        item.subclasses = true;
        item.property_value_relation = PropertyValueRelation::NotMatching;

        let patterns = EntityValuePatternBuilder::new(&config)
            .build_value_patterns(&item, &ConditionScope::new(0, ""))
            .unwrap();
        let Pattern::Minus(minus) = &patterns[1] else {
            panic!("Expected minus, got {:?}", patterns[1]);
        };
        let Pattern::Bgp(triples) = &minus[0] else {
            panic!("Expected bgp");
        };
        let Predicate::Path(path) = &triples[0].predicate else {
            panic!("Expected a property path");
        };
        assert_eq!(path.items.len(), 3);
    }

    #[test]
    fn test_regardless_accepts_empty_value() {
        let config = CompilerConfig::default();
        let mut item = condition("P31", Datatype::WikibaseItem, "".into());
        item.property_value_relation = PropertyValueRelation::Regardless;
        item.subclasses = true;

        let patterns = EntityValuePatternBuilder::new(&config)
            .build_value_patterns(&item, &ConditionScope::new(0, ""))
            .unwrap();
        assert_eq!(
            statement_triple(&patterns).object,
            Term::BlankNode("anyValueP31".to_string())
        );
    }

    #[test]
    fn test_text_value_is_rejected_for_matching() {
        let config = CompilerConfig::default();
        let item = condition("P31", Datatype::WikibaseItem, "Q5".into());
        assert!(matches!(
            EntityValuePatternBuilder::new(&config)
                .build_value_patterns(&item, &ConditionScope::new(0, "")),
            Err(BuildError::UnexpectedValue { .. })
        ));
    }
}
