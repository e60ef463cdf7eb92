//! Compiles Wikibase query-builder condition lists into SPARQL SELECT queries.
//!
//! ```no_run
//! use sparql_query_builder::{CompilerConfig, QueryCompiler, QueryRepresentation, SparqlRenderer};
//!
//! let representation: QueryRepresentation = serde_json::from_str(r#"{
//!     "conditions": [{
//!         "propertyId": "P31",
//!         "datatype": "wikibase-item",
//!         "value": { "id": "Q146" },
//!         "propertyValueRelation": "matching",
//!         "referenceRelation": "regardless",
//!         "subclasses": false,
//!         "negate": false,
//!         "conditionRelation": null
//!     }],
//!     "omitLabels": true
//! }"#).unwrap();
//!
//! let compiler = QueryCompiler::from_config(CompilerConfig::default());
//! let query = compiler.compile(&representation).unwrap();
//! println!("{}", SparqlRenderer::new(&compiler.config().namespaces).render(&query));
//! ```

pub mod ast;
pub mod compiler;
pub mod condition_tree;
pub mod config;
pub mod error;
pub mod namespaces;
pub mod patterns;
pub mod render;
pub mod representation;
pub mod syntax;

pub use compiler::QueryCompiler;
pub use config::{CompilerConfig, ConfigError};
pub use error::BuildError;
pub use render::SparqlRenderer;
pub use representation::QueryRepresentation;
