use super::triples::TripleBuilder;
use super::{negate_if_needed, ConditionScope, ValuePatternBuilder};
use crate::ast::{Operator, Pattern, Variable};
use crate::config::CompilerConfig;
use crate::error::BuildError;
use crate::representation::{Condition, ConditionValue, Datatype, PropertyValueRelation, TimeValue};
use crate::syntax;
use regex::Regex;
use std::sync::LazyLock;

/// Wikibase time precisions the builder understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Precision {
    Day,
    Month,
    Year,
}

impl TryFrom<u8> for Precision {
    type Error = BuildError;

    fn try_from(precision: u8) -> Result<Self, Self::Error> {
        match precision {
            11 => Ok(Precision::Day),
            10 => Ok(Precision::Month),
            9 => Ok(Precision::Year),
            other => Err(BuildError::UnexpectedPrecision(other)),
        }
    }
}

static YEAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?<sign>[+-])(?<year>\d+)").expect("valid year regex"));

static MONTH_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?<sign>[+-])(?<year>\d+)-(?<month>\d{2})").expect("valid month regex")
});

/// Year after (`+`) or before (`-`) `year`, keeping the zero-padded width.
fn shift_year(sign: &str, year: &str, date_time: &str) -> Result<String, BuildError> {
    let malformed = || BuildError::MalformedDate(date_time.to_string());
    let numeric: u64 = year.parse().map_err(|_| malformed())?;
    let shifted = if sign == "+" {
        numeric.checked_add(1)
    } else {
        numeric.checked_sub(1)
    }
    .ok_or_else(malformed)?;
    Ok(format!("{:0width$}", shifted, width = year.len()))
}

/// First instant of the year following the one in `date_time`.
pub(crate) fn following_year_date_time(date_time: &str) -> Result<String, BuildError> {
    let captures = YEAR_REGEX
        .captures(date_time)
        .ok_or_else(|| BuildError::MalformedDate(date_time.to_string()))?;
    let sign = &captures["sign"];
    let year = shift_year(sign, &captures["year"], date_time)?;
    Ok(format!("{}{}-00-00T00:00:00Z", sign, year))
}

/// First instant of the month following the one in `date_time`, rolling the
/// year over after December.
pub(crate) fn following_month_date_time(date_time: &str) -> Result<String, BuildError> {
    let captures = MONTH_REGEX
        .captures(date_time)
        .ok_or_else(|| BuildError::MalformedDate(date_time.to_string()))?;
    let sign = &captures["sign"];
    let year = &captures["year"];
    let month = &captures["month"];

    // December rolls into January of the following year
    let (following_year, following_month) = if month == "12" {
        (shift_year(sign, year, date_time)?, "01".to_string())
    } else {
        let numeric: u8 = month
            .parse()
            .map_err(|_| BuildError::MalformedDate(date_time.to_string()))?;
        (year.to_string(), format!("{:02}", numeric + 1))
    };
    Ok(format!(
        "{}{}-{}-00T00:00:00Z",
        sign, following_year, following_month
    ))
}

/// Time values. Day precision compares exactly; month and year precision
/// compare against the half-open interval the stored instant stands for.
pub struct DateValuePatternBuilder<'c> {
    config: &'c CompilerConfig,
    triple_builder: TripleBuilder<'c>,
}

impl<'c> DateValuePatternBuilder<'c> {
    pub fn new(config: &'c CompilerConfig) -> Self {
        Self {
            config,
            triple_builder: TripleBuilder::new(config),
        }
    }

    fn time_value<'a>(&self, condition: &'a Condition) -> Result<&'a TimeValue, BuildError> {
        match &condition.value {
            ConditionValue::Time(time_value) => Ok(time_value),
            other => Err(BuildError::UnexpectedValue {
                datatype: condition.datatype.clone(),
                expected: "time value",
                found: other.kind(),
            }),
        }
    }

    fn date_time_variable(&self, property_id: &str, scope: &ConditionScope) -> Result<Variable, BuildError> {
        scope.underscored_variable(property_id)
    }

    /// `?item p:P ?statement_N.` then `?statement_N psv:P ?statementValue_N.`
    fn push_statement_value_patterns(
        &self,
        patterns: &mut Vec<Pattern>,
        property_id: &str,
        scope: &ConditionScope,
    ) -> Result<(), BuildError> {
        let statement = scope.underscored_variable("statement")?;
        let statement_value = scope.underscored_variable("statementValue")?;
        patterns.push(syntax::bgp(vec![self
            .triple_builder
            .item_to_statement_triple(property_id, &statement)]));
        patterns.push(syntax::bgp(vec![syntax::simple_triple(
            statement,
            &self.config.namespaces.statement_value(property_id),
            statement_value,
        )]));
        Ok(())
    }

    /// `?statementValue_N wikibase:timeValue ?P_N.`
    fn push_time_value_pattern(
        &self,
        patterns: &mut Vec<Pattern>,
        property_id: &str,
        scope: &ConditionScope,
    ) -> Result<(), BuildError> {
        patterns.push(syntax::bgp(vec![syntax::simple_triple(
            scope.underscored_variable("statementValue")?,
            &self.config.namespaces.wikibase("timeValue"),
            self.date_time_variable(property_id, scope)?,
        )]));
        Ok(())
    }

    /// `hint:Prior hint:rangeSafe true.` applied to the preceding triple.
    fn push_range_safe_hint(&self, patterns: &mut Vec<Pattern>) {
        let namespaces = &self.config.namespaces;
        patterns.push(syntax::bgp(vec![syntax::simple_triple(
            syntax::iri(namespaces.hint("Prior")),
            &namespaces.hint("rangeSafe"),
            syntax::boolean_literal(true),
        )]));
    }

    fn build_regardless_patterns(
        &self,
        property_id: &str,
        scope: &ConditionScope,
    ) -> Result<Vec<Pattern>, BuildError> {
        let mut patterns = Vec::new();
        self.push_statement_value_patterns(&mut patterns, property_id, scope)?;
        self.push_time_value_pattern(&mut patterns, property_id, scope)?;
        Ok(patterns)
    }

    fn build_day_precision_patterns(
        &self,
        condition: &Condition,
        time_value: &TimeValue,
        scope: &ConditionScope,
    ) -> Result<Vec<Pattern>, BuildError> {
        let property_id = condition.property_id.as_str();
        let date_time = self.date_time_variable(property_id, scope)?;
        let literal = syntax::date_time_literal(time_value.time.clone());

        let value_pattern = match condition.property_value_relation {
            PropertyValueRelation::Matching => syntax::bind(date_time, literal),
            PropertyValueRelation::NotMatching => syntax::operator_filter(date_time, Operator::NotEq, literal),
            PropertyValueRelation::LessThan => syntax::operator_filter(date_time, Operator::Lt, literal),
            PropertyValueRelation::MoreThan => syntax::operator_filter(date_time, Operator::Gt, literal),
            relation @ PropertyValueRelation::Regardless => {
                return Err(BuildError::UnsupportedRelation {
                    datatype: condition.datatype.clone(),
                    relation,
                })
            }
        };

        let mut patterns = Vec::new();
        self.push_statement_value_patterns(&mut patterns, property_id, scope)?;
        self.push_time_value_pattern(&mut patterns, property_id, scope)?;
        patterns.push(value_pattern);
        Ok(patterns)
    }

    fn build_low_precision_patterns(
        &self,
        condition: &Condition,
        time_value: &TimeValue,
        precision: Precision,
        scope: &ConditionScope,
    ) -> Result<Vec<Pattern>, BuildError> {
        let property_id = condition.property_id.as_str();
        let following = match precision {
            Precision::Month => following_month_date_time(&time_value.time)?,
            Precision::Year => following_year_date_time(&time_value.time)?,
            Precision::Day => return Err(BuildError::UnexpectedPrecision(time_value.precision)),
        };
        let date_time_filter =
            self.build_date_time_filter(condition, &time_value.time, &following, scope)?;

        let mut patterns = Vec::new();
        self.push_statement_value_patterns(&mut patterns, property_id, scope)?;

        // Values stored at a coarser precision never match
        let precision_variable = scope.underscored_variable("precision")?;
        patterns.push(syntax::bgp(vec![syntax::simple_triple(
            scope.underscored_variable("statementValue")?,
            &self.config.namespaces.wikibase("timePrecision"),
            precision_variable.clone(),
        )]));
        self.push_range_safe_hint(&mut patterns);
        patterns.push(syntax::operator_filter(
            precision_variable,
            Operator::Gte,
            syntax::decimal_literal(time_value.precision.to_string()),
        ));

        // Half-open interval [value, following)
        self.push_time_value_pattern(&mut patterns, property_id, scope)?;
        self.push_range_safe_hint(&mut patterns);
        patterns.push(date_time_filter);
        Ok(patterns)
    }

    fn build_date_time_filter(
        &self,
        condition: &Condition,
        value: &str,
        following: &str,
        scope: &ConditionScope,
    ) -> Result<Pattern, BuildError> {
        let date_time = self.date_time_variable(&condition.property_id, scope)?;
        let value_literal = || syntax::date_time_literal(value);
        let following_literal = || syntax::date_time_literal(following);

        let filter = match condition.property_value_relation {
            PropertyValueRelation::Matching => syntax::operator_filter(
                syntax::operation(value_literal(), Operator::Lte, date_time.clone()),
                Operator::And,
                syntax::operation(date_time, Operator::Lt, following_literal()),
            ),
            PropertyValueRelation::NotMatching => syntax::operator_filter(
                syntax::operation(value_literal(), Operator::Lt, date_time.clone()),
                Operator::Or,
                syntax::operation(date_time, Operator::Gte, following_literal()),
            ),
            PropertyValueRelation::LessThan => syntax::operator_filter(value_literal(), Operator::Lt, date_time),
            PropertyValueRelation::MoreThan => syntax::operator_filter(date_time, Operator::Gte, following_literal()),
            relation @ PropertyValueRelation::Regardless => {
                return Err(BuildError::UnsupportedRelation {
                    datatype: condition.datatype.clone(),
                    relation,
                })
            }
        };
        Ok(filter)
    }
}

impl ValuePatternBuilder for DateValuePatternBuilder<'_> {
    fn build_value_patterns(
        &self,
        condition: &Condition,
        scope: &ConditionScope,
    ) -> Result<Vec<Pattern>, BuildError> {
        if condition.datatype != Datatype::Time {
            return Err(BuildError::UnexpectedDatatype {
                builder: "date",
                datatype: condition.datatype.clone(),
            });
        }

        let mut patterns = if condition.property_value_relation == PropertyValueRelation::Regardless {
            self.build_regardless_patterns(&condition.property_id, scope)?
        } else {
            let time_value = self.time_value(condition)?;
            match Precision::try_from(time_value.precision)? {
                Precision::Day => self.build_day_precision_patterns(condition, time_value, scope)?,
                precision => {
                    self.build_low_precision_patterns(condition, time_value, precision, scope)?
                }
            }
        };

        let statement = scope.underscored_variable("statement")?;
        if let Some(reference_filter) = self
            .triple_builder
            .reference_filter_pattern(condition.reference_relation, &statement)
        {
            patterns.push(reference_filter);
            patterns = vec![Pattern::Group(patterns)];
        }

        Ok(negate_if_needed(patterns, condition.negate))
    }
}
