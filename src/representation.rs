//! Input data model: the structured description of a query as the form layer
//! hands it over.
//!
//! Wire names follow the form layer's JSON (`propertyValueRelation: "without"`,
//! `datatype: "wikibase-item"` and so on), so a serialized query can be fed to
//! the compiler unchanged.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The whole query: ordered conditions plus result modifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRepresentation {
    pub conditions: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(default)]
    pub omit_labels: bool,
}

/// One property/value condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub property_id: String,
    pub datatype: Datatype,
    pub value: ConditionValue,
    pub property_value_relation: PropertyValueRelation,
    #[serde(default)]
    pub reference_relation: ReferenceRelation,
    #[serde(default)]
    pub subclasses: bool,
    #[serde(default)]
    pub negate: bool,
    /// Relation to the immediately preceding condition; `None` only for the first.
    #[serde(default)]
    pub condition_relation: Option<ConditionRelation>,
}

/// Property datatypes. Anything the compiler does not know keeps its raw name
/// and is handled by the limited-support builder.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Datatype {
    String,
    ExternalId,
    Url,
    WikibaseItem,
    WikibaseLexeme,
    WikibaseSense,
    WikibaseForm,
    WikibaseProperty,
    Quantity,
    Time,
    Unsupported(String),
}

impl Datatype {
    pub fn as_str(&self) -> &str {
        match self {
            Datatype::String => "string",
            Datatype::ExternalId => "external-id",
            Datatype::Url => "url",
            Datatype::WikibaseItem => "wikibase-item",
            Datatype::WikibaseLexeme => "wikibase-lexeme",
            Datatype::WikibaseSense => "wikibase-sense",
            Datatype::WikibaseForm => "wikibase-form",
            Datatype::WikibaseProperty => "wikibase-property",
            Datatype::Quantity => "quantity",
            Datatype::Time => "time",
            Datatype::Unsupported(name) => name,
        }
    }
}

impl From<String> for Datatype {
    fn from(name: String) -> Self {
        match name.as_str() {
            "string" => Datatype::String,
            "external-id" => Datatype::ExternalId,
            "url" => Datatype::Url,
            "wikibase-item" => Datatype::WikibaseItem,
            "wikibase-lexeme" => Datatype::WikibaseLexeme,
            "wikibase-sense" => Datatype::WikibaseSense,
            "wikibase-form" => Datatype::WikibaseForm,
            "wikibase-property" => Datatype::WikibaseProperty,
            "quantity" => Datatype::Quantity,
            "time" => Datatype::Time,
            _ => Datatype::Unsupported(name),
        }
    }
}

impl From<Datatype> for String {
    fn from(datatype: Datatype) -> Self {
        match datatype {
            Datatype::Unsupported(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Condition value; the shape depends on the condition's datatype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Text(String),
    Entity(EntityValue),
    Time(TimeValue),
    Quantity(QuantityValue),
}

impl ConditionValue {
    /// Short name of the value's shape, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            ConditionValue::Text(_) => "string",
            ConditionValue::Entity(_) => "entity reference",
            ConditionValue::Time(_) => "time value",
            ConditionValue::Quantity(_) => "quantity value",
        }
    }
}

impl From<&str> for ConditionValue {
    fn from(text: &str) -> Self {
        ConditionValue::Text(text.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityValue {
    pub id: String,
}

/// Amount with an optional unit entity id (`None` for unitless quantities).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityValue {
    #[serde(alias = "value")]
    pub amount: f64,
    #[serde(default)]
    pub unit: Option<String>,
}

/// Parsed date: a `±YYYY-MM-DDThh:mm:ssZ` string and a Wikibase precision
/// (11 day, 10 month, 9 year).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeValue {
    #[serde(rename = "value", alias = "time")]
    pub time: String,
    pub precision: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyValueRelation {
    #[serde(rename = "matching")]
    Matching,
    #[serde(rename = "without")]
    NotMatching,
    #[serde(rename = "regardless-of-value")]
    Regardless,
    #[serde(rename = "less-than")]
    LessThan,
    #[serde(rename = "more-than")]
    MoreThan,
}

impl fmt::Display for PropertyValueRelation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PropertyValueRelation::Matching => "matching",
            PropertyValueRelation::NotMatching => "without",
            PropertyValueRelation::Regardless => "regardless-of-value",
            PropertyValueRelation::LessThan => "less-than",
            PropertyValueRelation::MoreThan => "more-than",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceRelation {
    With,
    Without,
    #[default]
    Regardless,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionRelation {
    And,
    Or,
}
