//! Low-level constructors for AST fragments.
//!
//! These know nothing about conditions; they only assemble terms, triples,
//! paths and expressions from plain arguments.

use crate::ast::{
    Expression, Iri, Literal, Operator, PathItem, PathOperator, Pattern, Predicate, PropertyPath,
    Term, Triple, Variable,
};

const XSD_DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";
const XSD_DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
const XSD_BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";

/// Element of a sequence path passed to [`path_triple`].
#[derive(Debug, Clone, PartialEq)]
pub enum PathStep {
    Iri(String),
    Path(PropertyPath),
}

impl From<String> for PathStep {
    fn from(iri: String) -> Self {
        PathStep::Iri(iri)
    }
}

impl From<PropertyPath> for PathStep {
    fn from(path: PropertyPath) -> Self {
        PathStep::Path(path)
    }
}

/// `subject <predicate> object`
pub fn simple_triple(subject: impl Into<Term>, predicate: &str, object: impl Into<Term>) -> Triple {
    Triple {
        subject: subject.into(),
        predicate: Predicate::Iri(Iri::new(predicate)),
        object: object.into(),
    }
}

/// `subject (step1/step2/...) object`. A single step still yields a path.
pub fn path_triple(subject: impl Into<Term>, steps: Vec<PathStep>, object: impl Into<Term>) -> Triple {
    let items = steps
        .into_iter()
        .map(|step| match step {
            PathStep::Iri(iri) => PathItem::Iri(Iri(iri)),
            PathStep::Path(path) => PathItem::Path(path),
        })
        .collect();
    Triple {
        subject: subject.into(),
        predicate: Predicate::Path(property_path(PathOperator::Sequence, items)),
        object: object.into(),
    }
}

pub fn property_path(operator: PathOperator, items: Vec<PathItem>) -> PropertyPath {
    PropertyPath { operator, items }
}

/// `(iri)*`
pub fn zero_or_more(iri: &str) -> PropertyPath {
    property_path(PathOperator::ZeroOrMore, vec![PathItem::Iri(Iri::new(iri))])
}

pub fn variable(name: impl Into<String>) -> Variable {
    Variable::new(name)
}

pub fn iri(value: impl Into<String>) -> Iri {
    Iri::new(value)
}

pub fn blank_node(label: impl Into<String>) -> Term {
    Term::BlankNode(label.into())
}

/// Plain literal without datatype or language tag.
pub fn plain_literal(value: impl Into<String>) -> Literal {
    Literal {
        value: value.into(),
        datatype: None,
    }
}

/// `"value"^^xsd:decimal`; the lexical form is passed through as given.
pub fn decimal_literal(value: impl Into<String>) -> Literal {
    Literal {
        value: value.into(),
        datatype: Some(Iri::new(XSD_DECIMAL)),
    }
}

/// Decimal literal from a number, written without exponent or locale formatting.
pub fn decimal_literal_from_number(value: f64) -> Literal {
    decimal_literal(value.to_string())
}

pub fn date_time_literal(value: impl Into<String>) -> Literal {
    Literal {
        value: value.into(),
        datatype: Some(Iri::new(XSD_DATE_TIME)),
    }
}

pub fn boolean_literal(value: bool) -> Literal {
    Literal {
        value: value.to_string(),
        datatype: Some(Iri::new(XSD_BOOLEAN)),
    }
}

pub fn bgp(triples: Vec<Triple>) -> Pattern {
    Pattern::Bgp(triples)
}

pub fn operation(left: impl Into<Expression>, operator: Operator, right: impl Into<Expression>) -> Expression {
    Expression::Operation {
        operator,
        left: Box::new(left.into()),
        right: Box::new(right.into()),
    }
}

/// `FILTER(left operator right)`
pub fn operator_filter(left: impl Into<Expression>, operator: Operator, right: impl Into<Expression>) -> Pattern {
    Pattern::Filter(operation(left, operator, right))
}

pub fn bind(variable: Variable, expression: impl Into<Expression>) -> Pattern {
    Pattern::Bind {
        variable,
        expression: expression.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_triple_wraps_single_step_in_sequence() {
        let triple = path_triple(
            variable("statement0"),
            vec!["http://www.wikidata.org/prop/statement/P31".to_string().into()],
            iri("http://www.wikidata.org/entity/Q5"),
        );
        match triple.predicate {
            Predicate::Path(path) => {
                assert_eq!(path.operator, PathOperator::Sequence);
                assert_eq!(path.items.len(), 1);
            }
            _ => panic!("Expected a property path"),
        }
    }

    #[test]
    fn test_path_triple_keeps_nested_paths() {
        let triple = path_triple(
            variable("statement0"),
            vec![
                "http://www.wikidata.org/prop/statement/P31".to_string().into(),
                zero_or_more("http://www.wikidata.org/prop/direct/P279").into(),
            ],
            iri("http://www.wikidata.org/entity/Q5"),
        );
        let Predicate::Path(path) = triple.predicate else {
            panic!("Expected a property path");
        };
        assert_eq!(
            path.items[1],
            PathItem::Path(PropertyPath {
                operator: PathOperator::ZeroOrMore,
                items: vec![PathItem::Iri(Iri::new("http://www.wikidata.org/prop/direct/P279"))],
            })
        );
    }

    #[test]
    fn test_decimal_literal_lexical_form() {
        assert_eq!(decimal_literal_from_number(12.0).value, "12");
        assert_eq!(decimal_literal_from_number(3.2).value, "3.2");
        assert_eq!(decimal_literal_from_number(-0.5).value, "-0.5");
        assert_eq!(decimal_literal_from_number(12.0).datatype, Some(Iri::new(XSD_DECIMAL)));
    }

    #[test]
    fn test_date_time_literal_is_verbatim() {
        let literal = date_time_literal("+1789-07-00T00:00:00Z");
        assert_eq!(literal.value, "+1789-07-00T00:00:00Z");
        assert_eq!(literal.datatype, Some(Iri::new(XSD_DATE_TIME)));
    }

    #[test]
    fn test_operator_filter_shape() {
        let filter = operator_filter(variable("a"), Operator::Gte, decimal_literal("9"));
        match filter {
            Pattern::Filter(Expression::Operation { operator, left, right }) => {
                assert_eq!(operator, Operator::Gte);
                assert_eq!(*left, Expression::from(variable("a")));
                assert_eq!(*right, Expression::from(decimal_literal("9")));
            }
            other => panic!("Expected filter, got {:?}", other),
        }
    }
}
