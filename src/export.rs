//! Export surface: JSON records and RDF Turtle.
//!
//! JSON exports are serde records with resolved concept ids, suitable for
//! downstream pipelines. The Turtle export exists for OWL interoperability
//! only — it is not required to round-trip back into the graph. All
//! graph-defined terms live under the `sc:` namespace prefix.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::binding::EntityBinding;
use crate::concept::{Concept, RelationshipType};
use crate::error::{ExportError, KgResult};
use crate::graph::KnowledgeGraph;
use crate::ontology::Ontology;

/// Namespace for all graph-defined RDF terms.
pub const SC_NAMESPACE: &str = "http://salescompass.io/ontology/";

/// Exported relationship with resolved concept ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationshipExport {
    pub source_id: String,
    pub target_id: String,
    pub relationship_type: RelationshipType,
    pub weight: f64,
    pub confidence: f64,
    pub properties: BTreeMap<String, serde_json::Value>,
}

/// Exported ontology: full concept and relationship listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OntologyExport {
    pub name: String,
    pub version: String,
    pub concepts: Vec<Concept>,
    pub relationships: Vec<RelationshipExport>,
}

/// Exported cross-ontology link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossLinkExport {
    pub source_id: String,
    pub target_id: String,
    pub relationship_type: RelationshipType,
    pub weight: f64,
    pub confidence: f64,
    pub properties: BTreeMap<String, serde_json::Value>,
}

/// Exported knowledge graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphExport {
    pub name: String,
    /// Registered ontology names, in registration order.
    pub ontologies: Vec<String>,
    /// Bindings sorted by (entity_type, entity_id).
    pub entity_bindings: Vec<EntityBinding>,
    pub cross_ontology_links: Vec<CrossLinkExport>,
}

impl Ontology {
    /// Build the export record for this ontology.
    pub fn export(&self) -> OntologyExport {
        OntologyExport {
            name: self.name().to_string(),
            version: self.version().to_string(),
            concepts: self.concepts().cloned().collect(),
            relationships: self
                .relationships()
                .iter()
                .map(|rel| RelationshipExport {
                    source_id: self.concept(rel.source).id.clone(),
                    target_id: self.concept(rel.target).id.clone(),
                    relationship_type: rel.relationship_type,
                    weight: rel.weight,
                    confidence: rel.confidence,
                    properties: rel.properties.clone(),
                })
                .collect(),
        }
    }

    /// Serialize this ontology to pretty JSON.
    pub fn to_json(&self) -> KgResult<String> {
        serde_json::to_string_pretty(&self.export())
            .map_err(|source| ExportError::Json { source }.into())
    }
}

impl KnowledgeGraph {
    /// Build the export record for the whole graph.
    pub fn export(&self) -> GraphExport {
        let core = self.read_core();

        let mut entity_bindings: Vec<EntityBinding> =
            self.read_bindings().values().cloned().collect();
        entity_bindings.sort_by(|a, b| a.key().cmp(&b.key()));

        GraphExport {
            name: self.name().to_string(),
            ontologies: core.ontologies().map(|o| o.name().to_string()).collect(),
            entity_bindings,
            cross_ontology_links: core
                .cross_links()
                .iter()
                .map(|link| CrossLinkExport {
                    source_id: link.source_id.clone(),
                    target_id: link.target_id.clone(),
                    relationship_type: link.relationship_type,
                    weight: link.weight,
                    confidence: link.confidence,
                    properties: link.properties.clone(),
                })
                .collect(),
        }
    }

    /// Serialize the graph to pretty JSON.
    pub fn to_json(&self) -> KgResult<String> {
        serde_json::to_string_pretty(&self.export())
            .map_err(|source| ExportError::Json { source }.into())
    }

    /// Export the graph in RDF Turtle for OWL interoperability.
    ///
    /// One `owl:Class` per concept, one triple per relationship (predicate
    /// named after the relationship type), one `sc:Entity` instance per
    /// binding with `sc:classifiedAs` triples and an `sc:lastUpdated`
    /// literal.
    pub fn to_rdf_turtle(&self) -> String {
        let core = self.read_core();

        let mut lines = vec![
            format!("@prefix sc: <{SC_NAMESPACE}> ."),
            "@prefix rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#> .".to_string(),
            "@prefix owl: <http://www.w3.org/2002/07/owl#> .".to_string(),
            "@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .".to_string(),
            String::new(),
        ];

        for ontology in core.ontologies() {
            for concept in ontology.concepts() {
                lines.push(format!("sc:{} rdf:type owl:Class ;", concept.id));
                lines.push(format!(
                    "    rdfs:label \"{}\" ;",
                    escape_literal(&concept.name)
                ));
                lines.push(format!(
                    "    sc:conceptType \"{}\" .",
                    concept.concept_type
                ));
            }
        }

        for ontology in core.ontologies() {
            for rel in ontology.relationships() {
                lines.push(format!(
                    "sc:{} sc:{} sc:{} .",
                    ontology.concept(rel.source).id,
                    rel.relationship_type,
                    ontology.concept(rel.target).id,
                ));
            }
        }

        for link in core.cross_links() {
            lines.push(format!(
                "sc:{} sc:{} sc:{} .",
                link.source_id, link.relationship_type, link.target_id
            ));
        }

        let mut bindings: Vec<EntityBinding> = self.read_bindings().values().cloned().collect();
        bindings.sort_by(|a, b| a.key().cmp(&b.key()));
        for binding in bindings {
            lines.push(format!(
                "sc:{}_{} rdf:type sc:Entity ;",
                binding.entity_type, binding.entity_id
            ));
            for concept_id in &binding.concepts {
                lines.push(format!("    sc:classifiedAs sc:{concept_id} ;"));
            }
            lines.push(format!(
                "    sc:lastUpdated \"{}\" .",
                binding.last_updated.to_rfc3339()
            ));
        }

        lines.join("\n")
    }
}

fn escape_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
