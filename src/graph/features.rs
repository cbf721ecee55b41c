//! Ontology-derived feature extraction for ML consumers.
//!
//! Produces a flat `String → f64` map from an entity's binding: per-type
//! concept counts, per-concept presence flags, and per-type outgoing
//! relationship counts, with the binding's stored features merged last so
//! stored values win on key collision.

use std::collections::BTreeMap;

use crate::concept::{ConceptType, RelationshipType};

use super::KnowledgeGraph;

impl KnowledgeGraph {
    /// Feature map for an entity, empty if it has no binding.
    ///
    /// Keys:
    /// - `concept_type_<type>` — count of bound concepts of each type,
    ///   zero-initialized for every type in the enumeration;
    /// - `has_<concept_id>` — 1.0 for every bound concept (resolved ones);
    /// - `rel_count_<type>` — outgoing edges of each relationship type
    ///   across all bound concepts;
    /// - the binding's stored features, overriding any of the above.
    pub fn extract_ontology_features(
        &self,
        entity_type: &str,
        entity_id: &str,
    ) -> BTreeMap<String, f64> {
        let Some(binding) = self.get_entity_binding(entity_type, entity_id) else {
            return BTreeMap::new();
        };
        let core = self.read_core();

        let mut features: BTreeMap<String, f64> = BTreeMap::new();

        for concept_type in ConceptType::ALL {
            features.insert(format!("concept_type_{concept_type}"), 0.0);
        }

        for concept_id in &binding.concepts {
            if let Some(concept) = core.get_concept(concept_id) {
                *features
                    .entry(format!("concept_type_{}", concept.concept_type))
                    .or_insert(0.0) += 1.0;
                features.insert(format!("has_{concept_id}"), 1.0);
            }
        }

        let mut rel_counts: BTreeMap<RelationshipType, usize> =
            RelationshipType::ALL.iter().map(|&rt| (rt, 0)).collect();
        for concept_id in &binding.concepts {
            for ontology in core.ontologies() {
                for rel in ontology.get_relationships(concept_id) {
                    *rel_counts.entry(rel.relationship_type).or_insert(0) += 1;
                }
            }
        }
        for (relationship_type, count) in rel_counts {
            features.insert(format!("rel_count_{relationship_type}"), count as f64);
        }

        // Stored features take precedence.
        features.extend(binding.features);

        features
    }
}
