//! Structural validation of a knowledge graph.
//!
//! Read-only checks in the spirit of SHACL shape validation: every concept
//! carries a name, every cross-ontology link still resolves at both ends,
//! and every binding's concept ids resolve to a registered concept.
//! Intra-ontology relationship integrity needs no check — arena handles can
//! only be obtained from the ontology that owns the endpoints.

use serde::Serialize;

use crate::graph::KnowledgeGraph;

/// One validation finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    /// A concept with an empty display name.
    EmptyConceptName { ontology: String, concept_id: String },
    /// A cross-ontology link endpoint that no longer resolves.
    UnresolvedLinkEndpoint {
        ontology: String,
        concept_id: String,
    },
    /// A binding concept id with no concept in any registered ontology.
    UnresolvedBindingConcept {
        entity_type: String,
        entity_id: String,
        concept_id: String,
    },
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationIssue::EmptyConceptName {
                ontology,
                concept_id,
            } => write!(f, "concept {ontology}/{concept_id} has an empty name"),
            ValidationIssue::UnresolvedLinkEndpoint {
                ontology,
                concept_id,
            } => write!(
                f,
                "cross-ontology link endpoint {ontology}/{concept_id} does not resolve"
            ),
            ValidationIssue::UnresolvedBindingConcept {
                entity_type,
                entity_id,
                concept_id,
            } => write!(
                f,
                "binding {entity_type}/{entity_id} references unknown concept {concept_id}"
            ),
        }
    }
}

/// Outcome of a validation pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Whether the graph passed every check.
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Number of findings.
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Whether there are no findings.
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }
}

impl KnowledgeGraph {
    /// Run all structural checks. Never mutates the graph.
    pub fn validate(&self) -> ValidationReport {
        let core = self.read_core();
        let mut issues = Vec::new();

        for ontology in core.ontologies() {
            for concept in ontology.concepts() {
                if concept.name.trim().is_empty() {
                    issues.push(ValidationIssue::EmptyConceptName {
                        ontology: ontology.name().to_string(),
                        concept_id: concept.id.clone(),
                    });
                }
            }
        }

        for link in core.cross_links() {
            for (ontology, concept_id) in [
                (&link.source_ontology, &link.source_id),
                (&link.target_ontology, &link.target_id),
            ] {
                let resolves = core
                    .get_ontology(ontology)
                    .is_some_and(|ont| ont.get_concept(concept_id).is_some());
                if !resolves {
                    issues.push(ValidationIssue::UnresolvedLinkEndpoint {
                        ontology: ontology.clone(),
                        concept_id: concept_id.clone(),
                    });
                }
            }
        }

        for binding in self.read_bindings().values() {
            for concept_id in &binding.concepts {
                if core.get_concept(concept_id).is_none() {
                    issues.push(ValidationIssue::UnresolvedBindingConcept {
                        entity_type: binding.entity_type.clone(),
                        entity_id: binding.entity_id.clone(),
                        concept_id: concept_id.clone(),
                    });
                }
            }
        }

        if !issues.is_empty() {
            tracing::warn!(findings = issues.len(), "graph validation found issues");
        }
        ValidationReport { issues }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concept::{Concept, ConceptType, RelationshipType};
    use crate::ontology::Ontology;
    use std::collections::BTreeMap;

    fn graph() -> KnowledgeGraph {
        let kg = KnowledgeGraph::default();
        let mut sales = Ontology::new("sales", "1.0.0");
        sales.add_concept(Concept::new("lead", "Lead", ConceptType::Entity));
        kg.register_ontology(sales);
        let mut customer = Ontology::new("customer", "1.0.0");
        customer.add_concept(Concept::new("churn_risk", "Churn Risk", ConceptType::Metric));
        kg.register_ontology(customer);
        kg
    }

    #[test]
    fn clean_graph_is_valid() {
        let kg = graph();
        kg.bind_entity("lead", "1", vec!["lead".into()], BTreeMap::new(), BTreeMap::new());
        let report = kg.validate();
        assert!(report.is_valid());
        assert!(report.is_empty());
    }

    #[test]
    fn empty_concept_name_is_reported() {
        let kg = graph();
        kg.add_concept("sales", Concept::new("anon", "  ", ConceptType::Category));
        let report = kg.validate();
        assert_eq!(report.len(), 1);
        assert_eq!(
            report.issues[0],
            ValidationIssue::EmptyConceptName {
                ontology: "sales".into(),
                concept_id: "anon".into(),
            }
        );
    }

    #[test]
    fn link_endpoint_dangles_after_ontology_replaced() {
        let kg = graph();
        assert!(kg.link_concepts(
            "sales",
            "lead",
            "customer",
            "churn_risk",
            RelationshipType::Influences,
            0.1,
            BTreeMap::new(),
        ));
        assert!(kg.validate().is_valid());

        // Replacing the customer ontology with an empty one strands the link
        // target.
        kg.register_ontology(Ontology::new("customer", "2.0.0"));
        let report = kg.validate();
        assert_eq!(report.len(), 1);
        assert!(matches!(
            report.issues[0],
            ValidationIssue::UnresolvedLinkEndpoint { ref concept_id, .. }
                if concept_id == "churn_risk"
        ));
    }

    #[test]
    fn unresolved_binding_concepts_are_reported() {
        let kg = graph();
        kg.bind_entity(
            "lead",
            "1",
            vec!["lead".into(), "ghost".into()],
            BTreeMap::new(),
            BTreeMap::new(),
        );
        let report = kg.validate();
        assert_eq!(report.len(), 1);
        assert_eq!(
            report.issues[0].to_string(),
            "binding lead/1 references unknown concept ghost"
        );
    }
}
