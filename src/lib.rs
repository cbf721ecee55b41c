//! # salescompass-kg
//!
//! An ontology-backed knowledge graph for sales intelligence: domain
//! ontologies of typed concepts and weighted relationships, entity bindings
//! that attach CRM records to concepts, and reasoning on top (concept
//! inference, action recommendation, influence scoring, feature extraction).
//!
//! ## Architecture
//!
//! - **Ontologies** (`ontology`): Arena-allocated concept stores with typed,
//!   weighted relationships and BFS path inference
//! - **Graph** (`graph`): Multi-ontology [`graph::KnowledgeGraph`] with
//!   cross-ontology links, entity bindings, and pluggable inference rules
//! - **Export** (`export`): JSON snapshots and RDF Turtle serialization
//! - **Seeds** (`seeds`): Built-in sales and customer domain ontologies
//!
//! ## Library usage
//!
//! ```
//! use salescompass_kg::graph::{GraphConfig, KnowledgeGraph};
//! use salescompass_kg::registry::OntologyRegistry;
//! use salescompass_kg::seeds;
//! use std::collections::BTreeMap;
//!
//! let registry = OntologyRegistry::new();
//! seeds::bootstrap(&registry);
//! let kg = KnowledgeGraph::from_registry(&registry, GraphConfig::default());
//!
//! kg.bind_entity(
//!     "lead",
//!     "lead-42",
//!     vec!["hot_lead".to_string()],
//!     BTreeMap::new(),
//!     BTreeMap::new(),
//! );
//! let actions = kg.get_recommended_actions("lead", "lead-42");
//! assert_eq!(actions[0].0.id, "action_call");
//! ```

pub mod binding;
pub mod concept;
pub mod error;
pub mod export;
pub mod graph;
pub mod ontology;
pub mod registry;
pub mod seeds;
pub mod validate;
