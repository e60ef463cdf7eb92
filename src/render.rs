//! SPARQL 1.1 text output for a compiled [`SelectQuery`].

use crate::ast::{Expression, Literal, PathItem, Pattern, Predicate, PropertyPath, SelectQuery, Term, Triple};
use crate::namespaces::Namespaces;
use regex::Regex;
use std::sync::LazyLock;

const INDENT: &str = "  ";

/// Local names that may follow `prefix:` without escaping.
static LOCAL_NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[A-Za-z0-9_](?:[A-Za-z0-9_.\-]*[A-Za-z0-9_\-])?)?$").expect("valid local name regex")
});

/// Renders queries with IRIs compacted against `namespaces`.
pub struct SparqlRenderer<'n> {
    namespaces: &'n Namespaces,
    prefix_declarations: bool,
}

impl<'n> SparqlRenderer<'n> {
    pub fn new(namespaces: &'n Namespaces) -> Self {
        Self {
            namespaces,
            prefix_declarations: false,
        }
    }

    /// Emit a `PREFIX` line for every namespace before the query.
    pub fn with_prefix_declarations(mut self, enabled: bool) -> Self {
        self.prefix_declarations = enabled;
        self
    }

    pub fn render(&self, query: &SelectQuery) -> String {
        let mut out = String::new();
        if self.prefix_declarations {
            for (prefix, namespace) in self.namespaces.prefixes() {
                out.push_str(&format!("PREFIX {}: <{}>\n", prefix, escape_iri(namespace)));
            }
        }
        self.write_select(&mut out, query, 0);
        out
    }

    fn write_select(&self, out: &mut String, query: &SelectQuery, depth: usize) {
        let pad = INDENT.repeat(depth);
        let variables: Vec<String> = query
            .variables
            .iter()
            .map(|variable| format!("?{}", variable.name()))
            .collect();
        out.push_str(&format!(
            "{}SELECT {}{} WHERE {{\n",
            pad,
            if query.distinct { "DISTINCT " } else { "" },
            variables.join(" ")
        ));
        for pattern in &query.where_patterns {
            self.write_pattern(out, pattern, depth + 1);
        }
        out.push_str(&pad);
        out.push_str("}\n");
        if let Some(limit) = query.limit {
            out.push_str(&format!("{}LIMIT {}\n", pad, limit));
        }
    }

    fn write_pattern(&self, out: &mut String, pattern: &Pattern, depth: usize) {
        let pad = INDENT.repeat(depth);
        match pattern {
            Pattern::Bgp(triples) => {
                for triple in triples {
                    out.push_str(&format!("{}{}\n", pad, self.triple(triple)));
                }
            }
            Pattern::Bind { variable, expression } => {
                out.push_str(&format!(
                    "{}BIND({} AS ?{})\n",
                    pad,
                    self.expression(expression, false),
                    variable.name()
                ));
            }
            Pattern::Filter(expression) => {
                out.push_str(&format!("{}FILTER({})\n", pad, self.expression(expression, false)));
            }
            Pattern::Union(arms) => {
                for (index, arm) in arms.iter().enumerate() {
                    if index > 0 {
                        out.push_str(&format!("{}UNION\n", pad));
                    }
                    // Every arm needs braces
                    match arm {
                        Pattern::Group(_) => self.write_pattern(out, arm, depth),
                        other => self.write_block(out, "", std::slice::from_ref(other), depth),
                    }
                }
            }
            Pattern::Minus(patterns) => self.write_block(out, "MINUS ", patterns, depth),
            Pattern::Group(patterns) => self.write_block(out, "", patterns, depth),
            Pattern::Service { name, patterns, silent } => {
                let keyword = format!(
                    "SERVICE {}{} ",
                    if *silent { "SILENT " } else { "" },
                    self.iri(name.as_str())
                );
                self.write_block(out, &keyword, patterns, depth);
            }
            Pattern::SubSelect(query) => self.write_select(out, query, depth),
        }
    }

    /// `{keyword}{` patterns `}`
    fn write_block(&self, out: &mut String, keyword: &str, patterns: &[Pattern], depth: usize) {
        let pad = INDENT.repeat(depth);
        out.push_str(&format!("{}{}{{\n", pad, keyword));
        for pattern in patterns {
            self.write_pattern(out, pattern, depth + 1);
        }
        out.push_str(&pad);
        out.push_str("}\n");
    }

    fn triple(&self, triple: &Triple) -> String {
        let predicate = match &triple.predicate {
            Predicate::Iri(iri) => self.iri(iri.as_str()),
            Predicate::Path(path) => self.path(path),
        };
        format!("{} {} {}.", self.term(&triple.subject), predicate, self.term(&triple.object))
    }

    /// Always parenthesised: `(p:P31/ps:P31)`, `(wdt:P279*)`.
    fn path(&self, path: &PropertyPath) -> String {
        let items: Vec<String> = path
            .items
            .iter()
            .map(|item| match item {
                PathItem::Iri(iri) => self.iri(iri.as_str()),
                PathItem::Path(nested) => self.path(nested),
            })
            .collect();
        let operator = path.operator.as_str();
        if path.operator.is_binary() {
            format!("({})", items.join(operator))
        } else if operator == "^" {
            format!("(^{})", items.join(""))
        } else {
            format!("({}{})", items.join(""), operator)
        }
    }

    fn expression(&self, expression: &Expression, nested: bool) -> String {
        match expression {
            Expression::Term(term) => self.term(term),
            Expression::Operation { operator, left, right } => {
                let rendered = format!(
                    "{} {} {}",
                    self.expression(left, true),
                    operator.as_str(),
                    self.expression(right, true)
                );
                if nested {
                    format!("({})", rendered)
                } else {
                    rendered
                }
            }
            Expression::Exists { negated, patterns } => {
                let mut block = String::new();
                for pattern in patterns {
                    self.write_pattern(&mut block, pattern, 0);
                }
                // Inline on one line inside FILTER(...)
                let inline: Vec<&str> = block.lines().map(str::trim).collect();
                format!(
                    "{}EXISTS {{ {} }}",
                    if *negated { "NOT " } else { "" },
                    inline.join(" ")
                )
            }
        }
    }

    fn term(&self, term: &Term) -> String {
        match term {
            Term::Variable(variable) => format!("?{}", variable.name()),
            Term::Iri(iri) => self.iri(iri.as_str()),
            Term::BlankNode(label) => format!("_:{}", label),
            Term::Literal(literal) => self.literal(literal),
        }
    }

    fn literal(&self, literal: &Literal) -> String {
        let quoted = format!("\"{}\"", escape_string(&literal.value));
        match &literal.datatype {
            Some(datatype) => format!("{}^^{}", quoted, self.iri(datatype.as_str())),
            None => quoted,
        }
    }

    /// `prefix:local` for the longest matching namespace, `<iri>` otherwise.
    fn iri(&self, iri: &str) -> String {
        self.namespaces
            .prefixes()
            .into_iter()
            .filter(|(_, namespace)| !namespace.is_empty() && iri.starts_with(namespace))
            .max_by_key(|(_, namespace)| namespace.len())
            .and_then(|(prefix, namespace)| {
                let local = &iri[namespace.len()..];
                LOCAL_NAME_REGEX
                    .is_match(local)
                    .then(|| format!("{}:{}", prefix, local))
            })
            .unwrap_or_else(|| format!("<{}>", escape_iri(iri)))
    }
}

/// Percent-encodes the ASCII characters an `IRIREF` may not contain.
fn escape_iri(iri: &str) -> String {
    let mut escaped = String::with_capacity(iri.len());
    for c in iri.chars() {
        if c <= ' ' || c == '\u{7f}' || "<>\"{}|^`\\".contains(c) {
            escaped.push_str(&format!("%{:02X}", c as u32));
        } else {
            escaped.push(c);
        }
    }
    escaped
}

fn escape_string(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Operator;
    use crate::syntax;

    fn render_pattern(pattern: &Pattern) -> String {
        let namespaces = Namespaces::default();
        let renderer = SparqlRenderer::new(&namespaces);
        let mut out = String::new();
        renderer.write_pattern(&mut out, pattern, 0);
        out.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_iri_compaction() {
        let namespaces = Namespaces::default();
        let renderer = SparqlRenderer::new(&namespaces);
        assert_eq!(renderer.iri("http://www.wikidata.org/entity/Q5"), "wd:Q5");
        assert_eq!(renderer.iri("http://www.wikidata.org/prop/statement/P31"), "ps:P31");
        assert_eq!(
            renderer.iri("http://www.wikidata.org/prop/statement/value-normalized/P2048"),
            "psn:P2048"
        );
        assert_eq!(renderer.iri("https://example.org/a b"), "<https://example.org/a%20b>");
        assert_eq!(
            renderer.iri("http://www.wikidata.org/entity/Q5/"),
            "<http://www.wikidata.org/entity/Q5/>"
        );
    }

    #[test]
    fn test_iri_delimiters_cannot_break_out_of_iri() {
        let namespaces = Namespaces::default();
        let renderer = SparqlRenderer::new(&namespaces);
        assert_eq!(
            renderer.iri("https://x.org/> . ?item ?p ?o . <https://y.org/"),
            "<https://x.org/%3E%20.%20?item%20?p%20?o%20.%20%3Chttps://y.org/>"
        );
        assert_eq!(
            renderer.iri("https://x.org/{a}|\"b\"^`c`\\\n"),
            "<https://x.org/%7Ba%7D%7C%22b%22%5E%60c%60%5C%0A>"
        );
        assert_eq!(renderer.iri("https://x.org/caf\u{e9}"), "<https://x.org/caf\u{e9}>");
    }

    #[test]
    fn test_path_rendering() {
        let triple = syntax::path_triple(
            syntax::variable("statement0"),
            vec![
                "http://www.wikidata.org/prop/statement/P666".to_string().into(),
                syntax::zero_or_more("http://www.wikidata.org/prop/direct/P66").into(),
            ],
            syntax::iri("http://www.wikidata.org/entity/Q456"),
        );
        assert_eq!(
            render_pattern(&syntax::bgp(vec![triple])),
            "?statement0 (ps:P666/(wdt:P66*)) wd:Q456."
        );
    }

    #[test]
    fn test_nested_operations_parenthesised() {
        let filter = syntax::operator_filter(
            syntax::operation(
                syntax::date_time_literal("+1789-07-00T00:00:00Z"),
                Operator::Lte,
                syntax::variable("P585_0"),
            ),
            Operator::And,
            syntax::operation(
                syntax::variable("P585_0"),
                Operator::Lt,
                syntax::date_time_literal("+1789-08-00T00:00:00Z"),
            ),
        );
        assert_eq!(
            render_pattern(&filter),
            "FILTER((\"+1789-07-00T00:00:00Z\"^^xsd:dateTime <= ?P585_0) && \
             (?P585_0 < \"+1789-08-00T00:00:00Z\"^^xsd:dateTime))"
        );
    }

    #[test]
    fn test_exists_filter_inline() {
        let filter = Pattern::Filter(Expression::Exists {
            negated: true,
            patterns: vec![syntax::bgp(vec![syntax::simple_triple(
                syntax::variable("statement0"),
                "http://www.w3.org/ns/prov#wasDerivedFrom",
                syntax::variable("reference"),
            )])],
        });
        assert_eq!(
            render_pattern(&filter),
            "FILTER(NOT EXISTS { ?statement0 prov:wasDerivedFrom ?reference. })"
        );
    }

    #[test]
    fn test_bind_and_literals() {
        let bind = syntax::bind(
            syntax::variable("coherentUserQuantity0"),
            syntax::operation(
                syntax::variable("userQuantity0"),
                Operator::Multiply,
                syntax::variable("conversionFactor0"),
            ),
        );
        assert_eq!(
            render_pattern(&bind),
            "BIND(?userQuantity0 * ?conversionFactor0 AS ?coherentUserQuantity0)"
        );

        let quoted = syntax::bgp(vec![syntax::simple_triple(
            syntax::variable("s"),
            "http://www.wikidata.org/prop/statement/P1",
            syntax::plain_literal("say \"hi\"\n"),
        )]);
        assert_eq!(render_pattern(&quoted), r#"?s ps:P1 "say \"hi\"\n"."#);
    }

    #[test]
    fn test_union_arms_and_minus() {
        let arm = |name: &str| {
            Pattern::Group(vec![syntax::bgp(vec![syntax::simple_triple(
                syntax::variable("item"),
                "http://www.wikidata.org/prop/P17",
                syntax::variable(name),
            )])])
        };
        let union = Pattern::Union(vec![arm("statement0"), arm("statement1")]);
        assert_eq!(
            render_pattern(&union),
            "{ ?item p:P17 ?statement0. } UNION { ?item p:P17 ?statement1. }"
        );
        let minus = Pattern::Minus(vec![Pattern::Group(vec![syntax::bgp(Vec::new())])]);
        assert_eq!(render_pattern(&minus), "MINUS { { } }");
    }

    #[test]
    fn test_prefix_declarations_and_limit() {
        let namespaces = Namespaces::default();
        let mut query = SelectQuery::distinct(vec![syntax::variable("item")]);
        query.limit = Some(10);

        let plain = SparqlRenderer::new(&namespaces).render(&query);
        assert_eq!(plain, "SELECT DISTINCT ?item WHERE {\n}\nLIMIT 10\n");

        let declared = SparqlRenderer::new(&namespaces)
            .with_prefix_declarations(true)
            .render(&query);
        assert!(declared.starts_with("PREFIX wd: <http://www.wikidata.org/entity/>\n"));
        assert_eq!(declared.matches("PREFIX ").count(), 11);
    }
}
