//! Built-in SalesCompass domain ontologies.
//!
//! The sales and customer ontologies ship with the crate so a graph can be
//! stood up without any external schema files. Both are plain [`Ontology`]
//! builders; [`bootstrap`] registers them in the conventional order.

pub mod customer;
pub mod sales;

pub use customer::customer_ontology;
pub use sales::sales_ontology;

use std::sync::Arc;

use serde_json::Value;

use crate::concept::{Concept, ConceptType};
use crate::ontology::Ontology;
use crate::registry::OntologyRegistry;

/// Register the sales and customer ontologies.
pub fn bootstrap(registry: &OntologyRegistry) {
    registry.register(Arc::new(sales_ontology()));
    registry.register(Arc::new(customer_ontology()));
    tracing::info!("seed ontologies registered");
}

/// Build a concept from a JSON object of attributes.
pub(crate) fn seeded(
    id: &str,
    name: &str,
    concept_type: ConceptType,
    attributes: Value,
) -> Concept {
    let mut concept = Concept::new(id, name, concept_type);
    if let Value::Object(map) = attributes {
        concept.attributes.extend(map);
    }
    concept
}

/// Add a weighted relationship if both concepts exist.
pub(crate) fn relate_weighted(
    ontology: &mut Ontology,
    source_id: &str,
    target_id: &str,
    relationship_type: crate::concept::RelationshipType,
    weight: f64,
    confidence: f64,
) {
    if let (Some(source), Some(target)) = (
        ontology.concept_id(source_id),
        ontology.concept_id(target_id),
    ) {
        ontology.add_relationship(
            crate::ontology::Relationship::new(source, target, relationship_type)
                .with_weight(weight)
                .with_confidence(confidence),
        );
    }
}
