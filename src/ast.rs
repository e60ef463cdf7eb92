//! SPARQL query AST produced by the compiler.
//!
//! The node set is closed and only carries what a renderer needs to print
//! valid SPARQL 1.1: basic graph patterns, BIND, FILTER, UNION, MINUS, groups,
//! SERVICE blocks and sub-selects. IRIs are stored expanded; prefixes are a
//! rendering concern.

/// The root of a compiled query, and also the node used for sub-selects.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery {
    pub distinct: bool,
    pub variables: Vec<Variable>,
    pub where_patterns: Vec<Pattern>,
    pub limit: Option<u64>,
}

impl SelectQuery {
    pub fn distinct(variables: Vec<Variable>) -> Self {
        Self {
            distinct: true,
            variables,
            where_patterns: Vec::new(),
            limit: None,
        }
    }
}

/// A graph pattern inside a `WHERE` block.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern {
    /// Basic graph pattern
    Bgp(Vec<Triple>),
    /// `BIND(expression AS ?variable)`
    Bind { variable: Variable, expression: Expression },
    /// `FILTER(expression)`
    Filter(Expression),
    /// Alternatives joined by `UNION`; each arm is usually a `Group`
    Union(Vec<Pattern>),
    /// `MINUS { ... }`
    Minus(Vec<Pattern>),
    /// `{ ... }`
    Group(Vec<Pattern>),
    /// `SERVICE name { ... }`
    Service {
        name: Iri,
        patterns: Vec<Pattern>,
        silent: bool,
    },
    /// Nested `SELECT`
    SubSelect(Box<SelectQuery>),
}

impl Pattern {
    pub fn is_minus(&self) -> bool {
        matches!(self, Pattern::Minus(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Triple {
    pub subject: Term,
    pub predicate: Predicate,
    pub object: Term,
}

/// Predicate position: a plain IRI or a property path.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Iri(Iri),
    Path(PropertyPath),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertyPath {
    pub operator: PathOperator,
    pub items: Vec<PathItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathItem {
    Iri(Iri),
    Path(PropertyPath),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathOperator {
    /// `p/q`
    Sequence,
    /// `p|q`
    Alternative,
    /// `^p`
    Inverse,
    /// `p*`
    ZeroOrMore,
    /// `p+`
    OneOrMore,
    /// `p?`
    ZeroOrOne,
}

impl PathOperator {
    pub fn as_str(&self) -> &'static str {
        match self {
            PathOperator::Sequence => "/",
            PathOperator::Alternative => "|",
            PathOperator::Inverse => "^",
            PathOperator::ZeroOrMore => "*",
            PathOperator::OneOrMore => "+",
            PathOperator::ZeroOrOne => "?",
        }
    }

    /// Operators written between their operands rather than next to a single one.
    pub fn is_binary(&self) -> bool {
        matches!(self, PathOperator::Sequence | PathOperator::Alternative)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Iri(pub String);

impl Iri {
    pub fn new(value: impl Into<String>) -> Self {
        Iri(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable(pub String);

impl Variable {
    pub fn new(name: impl Into<String>) -> Self {
        Variable(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// A literal; `datatype` is `None` for plain (language-neutral) strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub value: String,
    pub datatype: Option<Iri>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    Variable(Variable),
    Iri(Iri),
    BlankNode(String),
    Literal(Literal),
}

impl From<Variable> for Term {
    fn from(variable: Variable) -> Self {
        Term::Variable(variable)
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Term::Iri(iri)
    }
}

impl From<Literal> for Term {
    fn from(literal: Literal) -> Self {
        Term::Literal(literal)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Term(Term),
    Operation {
        operator: Operator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// `EXISTS { ... }` / `NOT EXISTS { ... }`
    Exists { negated: bool, patterns: Vec<Pattern> },
}

impl From<Term> for Expression {
    fn from(term: Term) -> Self {
        Expression::Term(term)
    }
}

impl From<Variable> for Expression {
    fn from(variable: Variable) -> Self {
        Expression::Term(Term::Variable(variable))
    }
}

impl From<Literal> for Expression {
    fn from(literal: Literal) -> Self {
        Expression::Term(Term::Literal(literal))
    }
}

impl From<Iri> for Expression {
    fn from(iri: Iri) -> Self {
        Expression::Term(Term::Iri(iri))
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,    // =
    NotEq, // !=
    Lt,    // <
    Gt,    // >
    Lte,   // <=
    Gte,   // >=
    And,   // &&
    Or,    // ||
    Multiply, // *
}

impl Operator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "!=",
            Operator::Lt => "<",
            Operator::Gt => ">",
            Operator::Lte => "<=",
            Operator::Gte => ">=",
            Operator::And => "&&",
            Operator::Or => "||",
            Operator::Multiply => "*",
        }
    }
}
