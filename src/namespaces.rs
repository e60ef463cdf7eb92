//! RDF namespaces of a Wikibase query service.

use serde::{Deserialize, Serialize};

/// Namespace IRIs used when building patterns. Defaults to Wikidata's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Namespaces {
    pub wd: String,
    pub wdt: String,
    pub p: String,
    pub ps: String,
    pub psv: String,
    pub psn: String,
    pub wikibase: String,
    pub prov: String,
    pub bd: String,
    pub hint: String,
    pub xsd: String,
}

impl Default for Namespaces {
    fn default() -> Self {
        Self {
            wd: "http://www.wikidata.org/entity/".to_string(),
            wdt: "http://www.wikidata.org/prop/direct/".to_string(),
            p: "http://www.wikidata.org/prop/".to_string(),
            ps: "http://www.wikidata.org/prop/statement/".to_string(),
            psv: "http://www.wikidata.org/prop/statement/value/".to_string(),
            psn: "http://www.wikidata.org/prop/statement/value-normalized/".to_string(),
            wikibase: "http://wikiba.se/ontology#".to_string(),
            prov: "http://www.w3.org/ns/prov#".to_string(),
            bd: "http://www.bigdata.com/rdf#".to_string(),
            hint: "http://www.bigdata.com/queryHints#".to_string(),
            xsd: "http://www.w3.org/2001/XMLSchema#".to_string(),
        }
    }
}

impl Namespaces {
    /// `(prefix, namespace IRI)` pairs in declaration order.
    pub fn prefixes(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("wd", self.wd.as_str()),
            ("wdt", self.wdt.as_str()),
            ("p", self.p.as_str()),
            ("ps", self.ps.as_str()),
            ("psv", self.psv.as_str()),
            ("psn", self.psn.as_str()),
            ("wikibase", self.wikibase.as_str()),
            ("prov", self.prov.as_str()),
            ("bd", self.bd.as_str()),
            ("hint", self.hint.as_str()),
            ("xsd", self.xsd.as_str()),
        ]
    }

    pub fn entity(&self, id: &str) -> String {
        format!("{}{}", self.wd, id)
    }

    pub fn direct(&self, property_id: &str) -> String {
        format!("{}{}", self.wdt, property_id)
    }

    pub fn claim(&self, property_id: &str) -> String {
        format!("{}{}", self.p, property_id)
    }

    pub fn statement(&self, property_id: &str) -> String {
        format!("{}{}", self.ps, property_id)
    }

    pub fn statement_value(&self, property_id: &str) -> String {
        format!("{}{}", self.psv, property_id)
    }

    pub fn statement_value_normalized(&self, property_id: &str) -> String {
        format!("{}{}", self.psn, property_id)
    }

    pub fn wikibase(&self, local: &str) -> String {
        format!("{}{}", self.wikibase, local)
    }

    pub fn prov(&self, local: &str) -> String {
        format!("{}{}", self.prov, local)
    }

    pub fn bd(&self, local: &str) -> String {
        format!("{}{}", self.bd, local)
    }

    pub fn hint(&self, local: &str) -> String {
        format!("{}{}", self.hint, local)
    }
}
