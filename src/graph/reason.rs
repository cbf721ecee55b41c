//! Inference, recommendation, and influence scoring.
//!
//! Inference combines two sources: registered [`InferenceRule`]s and a
//! one-hop walk along IsA/BelongsTo edges from the binding's concepts. A
//! rule failure is logged with the rule name and entity key and skipped —
//! it never aborts the pass. Recommendation confidence is combined with the
//! noisy-OR rule (the probability that at least one recommending path is
//! correct), not averaged.

use std::collections::{BTreeSet, HashMap};

use crate::binding::EntityBinding;
use crate::concept::{Concept, ConceptType, RelationshipType};
use crate::error::RuleError;

use super::{GraphCore, KnowledgeGraph};

/// A pluggable rule deriving additional concept ids for a binding.
///
/// Rules get a read-only view of the ontology set so they can resolve
/// concepts and relationships without touching the graph's outer locks.
pub trait InferenceRule: Send + Sync {
    /// Identity used in failure logs.
    fn name(&self) -> &str;

    /// Derive concept ids from the binding's current state.
    fn infer(
        &self,
        binding: &EntityBinding,
        graph: &GraphCore,
    ) -> Result<BTreeSet<String>, RuleError>;
}

/// Adapter turning a closure into a named [`InferenceRule`].
pub struct FnRule<F> {
    name: String,
    rule: F,
}

impl<F> FnRule<F>
where
    F: Fn(&EntityBinding, &GraphCore) -> Result<BTreeSet<String>, RuleError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, rule: F) -> Self {
        Self {
            name: name.into(),
            rule,
        }
    }
}

impl<F> InferenceRule for FnRule<F>
where
    F: Fn(&EntityBinding, &GraphCore) -> Result<BTreeSet<String>, RuleError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn infer(
        &self,
        binding: &EntityBinding,
        graph: &GraphCore,
    ) -> Result<BTreeSet<String>, RuleError> {
        (self.rule)(binding, graph)
    }
}

impl KnowledgeGraph {
    /// Register an inference rule.
    pub fn add_inference_rule(&self, rule: impl InferenceRule + 'static) {
        self.write_core().rules.push(Box::new(rule));
    }

    /// Infer additional concept ids for an entity.
    ///
    /// Runs every registered rule against the binding, unions the results
    /// with one-hop IsA/BelongsTo targets of the bound concepts, then
    /// subtracts concepts already present in the binding. Deduplicated;
    /// empty for an unknown binding.
    pub fn infer_concepts(&self, entity_type: &str, entity_id: &str) -> Vec<String> {
        let Some(binding) = self.get_entity_binding(entity_type, entity_id) else {
            return Vec::new();
        };
        let core = self.read_core();

        let mut inferred: BTreeSet<String> = BTreeSet::new();

        for rule in &core.rules {
            match rule.infer(&binding, &core) {
                Ok(concepts) => inferred.extend(concepts),
                Err(error) => {
                    tracing::error!(
                        rule = rule.name(),
                        entity_type,
                        entity_id,
                        %error,
                        "inference rule failed, skipping"
                    );
                }
            }
        }

        for concept_id in &binding.concepts {
            for ontology in core.ontologies() {
                for rel in ontology.get_relationships(concept_id) {
                    if matches!(
                        rel.relationship_type,
                        RelationshipType::IsA | RelationshipType::BelongsTo
                    ) {
                        inferred.insert(ontology.concept(rel.target).id.clone());
                    }
                }
            }
        }

        for concept_id in &binding.concepts {
            inferred.remove(concept_id);
        }

        inferred.into_iter().collect()
    }

    /// Recommended actions for an entity, sorted by confidence descending.
    ///
    /// Follows Recommends edges from every bound concept into Action-typed
    /// targets. When the same action is reached through multiple paths the
    /// confidences are combined with noisy-OR:
    /// `c = 1 - (1 - c1) * (1 - c2)`.
    pub fn get_recommended_actions(
        &self,
        entity_type: &str,
        entity_id: &str,
    ) -> Vec<(Concept, f64)> {
        let Some(binding) = self.get_entity_binding(entity_type, entity_id) else {
            return Vec::new();
        };
        let core = self.read_core();

        let mut recommendations: HashMap<String, (Concept, f64)> = HashMap::new();

        for concept_id in &binding.concepts {
            for ontology in core.ontologies() {
                for rel in ontology.get_relationships(concept_id) {
                    if rel.relationship_type != RelationshipType::Recommends {
                        continue;
                    }
                    let action = ontology.concept(rel.target);
                    if action.concept_type != ConceptType::Action {
                        continue;
                    }
                    recommendations
                        .entry(action.id.clone())
                        .and_modify(|(_, confidence)| {
                            *confidence = 1.0 - (1.0 - *confidence) * (1.0 - rel.confidence);
                        })
                        .or_insert_with(|| (action.clone(), rel.confidence));
                }
            }
        }

        let mut ranked: Vec<(Concept, f64)> = recommendations.into_values().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }

    /// Influence of an entity's bound concepts on a target metric, in
    /// [0, 1].
    ///
    /// Sums `weight * confidence` over intra-ontology Influences edges into
    /// the metric, plus raw `weight` over matching cross-ontology Influences
    /// links, then clamps. 0.0 for an unknown binding.
    pub fn compute_influence_score(
        &self,
        entity_type: &str,
        entity_id: &str,
        target_metric_id: &str,
    ) -> f64 {
        let Some(binding) = self.get_entity_binding(entity_type, entity_id) else {
            return 0.0;
        };
        let core = self.read_core();

        let mut total = 0.0;

        for concept_id in &binding.concepts {
            for ontology in core.ontologies() {
                for rel in ontology.get_relationships(concept_id) {
                    if rel.relationship_type == RelationshipType::Influences
                        && ontology.concept(rel.target).id == target_metric_id
                    {
                        total += rel.weight * rel.confidence;
                    }
                }
            }
        }

        for link in core.cross_links() {
            if link.relationship_type == RelationshipType::Influences
                && link.target_id == target_metric_id
                && binding.concepts.iter().any(|c| c == &link.source_id)
            {
                total += link.weight;
            }
        }

        total.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concept::Concept;
    use crate::ontology::{Ontology, Relationship};
    use std::collections::BTreeMap;

    fn sales() -> Ontology {
        let mut ont = Ontology::new("sales", "1.0.0");
        let lead = ont.add_concept(Concept::new("lead", "Lead", ConceptType::Entity));
        let hot = ont.add_concept(Concept::new("hot_lead", "Hot Lead", ConceptType::Category));
        let campaign =
            ont.add_concept(Concept::new("campaign", "Campaign", ConceptType::Entity));
        let call = ont.add_concept(Concept::new("action_call", "Make a Call", ConceptType::Action));
        let win = ont.add_concept(Concept::new(
            "win_probability",
            "Win Probability",
            ConceptType::Metric,
        ));
        let meeting = ont.add_concept(Concept::new(
            "meeting_held",
            "Meeting Held",
            ConceptType::Event,
        ));

        ont.add_relationship(Relationship::new(hot, lead, RelationshipType::IsA));
        ont.add_relationship(Relationship::new(hot, campaign, RelationshipType::BelongsTo));
        ont.add_relationship(
            Relationship::new(hot, call, RelationshipType::Recommends).with_confidence(0.5),
        );
        ont.add_relationship(
            Relationship::new(meeting, call, RelationshipType::Recommends).with_confidence(0.4),
        );
        ont.add_relationship(
            Relationship::new(hot, win, RelationshipType::Influences)
                .with_weight(0.4)
                .with_confidence(0.5),
        );
        ont.add_relationship(
            Relationship::new(meeting, win, RelationshipType::Influences)
                .with_weight(0.3)
                .with_confidence(1.0),
        );
        ont
    }

    fn graph_with_binding() -> KnowledgeGraph {
        let kg = KnowledgeGraph::default();
        kg.register_ontology(sales());
        kg.bind_entity(
            "lead",
            "1",
            vec!["hot_lead".into(), "meeting_held".into()],
            BTreeMap::new(),
            BTreeMap::new(),
        );
        kg
    }

    #[test]
    fn relationship_inference_is_one_hop() {
        let kg = graph_with_binding();
        let inferred = kg.infer_concepts("lead", "1");
        // IsA → lead, BelongsTo → campaign; Recommends/Influences targets
        // are not inferred concepts.
        assert_eq!(inferred, vec!["campaign".to_string(), "lead".to_string()]);
    }

    #[test]
    fn already_bound_concepts_are_subtracted() {
        let kg = graph_with_binding();
        kg.append_concept_if_absent("lead", "1", "lead");
        let inferred = kg.infer_concepts("lead", "1");
        assert_eq!(inferred, vec!["campaign".to_string()]);
    }

    #[test]
    fn rules_union_with_relationship_inference() {
        let kg = graph_with_binding();
        kg.add_inference_rule(FnRule::new("always-sql", |_binding, _core| {
            Ok(BTreeSet::from(["sql".to_string()]))
        }));
        let inferred = kg.infer_concepts("lead", "1");
        assert!(inferred.contains(&"sql".to_string()));
        assert!(inferred.contains(&"campaign".to_string()));
    }

    #[test]
    fn failing_rule_is_skipped_not_fatal() {
        let kg = graph_with_binding();
        kg.add_inference_rule(FnRule::new("broken", |_binding, _core| {
            Err(RuleError::Failed {
                message: "boom".into(),
            })
        }));
        kg.add_inference_rule(FnRule::new("working", |_binding, _core| {
            Ok(BTreeSet::from(["sql".to_string()]))
        }));

        let inferred = kg.infer_concepts("lead", "1");
        assert!(inferred.contains(&"sql".to_string()));
        assert!(inferred.contains(&"lead".to_string()));
    }

    #[test]
    fn rules_can_consult_the_ontology_set() {
        let kg = graph_with_binding();
        kg.add_inference_rule(FnRule::new("category-echo", |binding, core| {
            let mut out = BTreeSet::new();
            for id in &binding.concepts {
                if let Some(concept) = core.get_concept(id) {
                    if concept.concept_type == ConceptType::Category {
                        out.insert(format!("seen_{id}"));
                    }
                }
            }
            Ok(out)
        }));
        let inferred = kg.infer_concepts("lead", "1");
        assert!(inferred.contains(&"seen_hot_lead".to_string()));
    }

    #[test]
    fn inference_for_unknown_binding_is_empty() {
        let kg = graph_with_binding();
        assert!(kg.infer_concepts("lead", "999").is_empty());
    }

    #[test]
    fn recommendations_combine_with_noisy_or() {
        let kg = graph_with_binding();
        let actions = kg.get_recommended_actions("lead", "1");
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].0.id, "action_call");
        // 1 - (1 - 0.5)(1 - 0.4) = 0.7, not 0.45 (mean) and not 0.9 (sum).
        assert!((actions[0].1 - 0.7).abs() < 1e-9);
    }

    #[test]
    fn recommendations_only_include_action_concepts() {
        let kg = KnowledgeGraph::default();
        let mut ont = Ontology::new("sales", "1.0.0");
        let hot = ont.add_concept(Concept::new("hot_lead", "Hot Lead", ConceptType::Category));
        let metric = ont.add_concept(Concept::new("win", "Win", ConceptType::Metric));
        ont.add_relationship(
            Relationship::new(hot, metric, RelationshipType::Recommends).with_confidence(0.9),
        );
        kg.register_ontology(ont);
        kg.bind_entity("lead", "1", vec!["hot_lead".into()], BTreeMap::new(), BTreeMap::new());

        assert!(kg.get_recommended_actions("lead", "1").is_empty());
    }

    #[test]
    fn recommendations_sorted_by_confidence_desc() {
        let kg = KnowledgeGraph::default();
        let mut ont = Ontology::new("sales", "1.0.0");
        let hot = ont.add_concept(Concept::new("hot_lead", "Hot Lead", ConceptType::Category));
        let call = ont.add_concept(Concept::new("action_call", "Call", ConceptType::Action));
        let email = ont.add_concept(Concept::new("action_email", "Email", ConceptType::Action));
        ont.add_relationship(
            Relationship::new(hot, email, RelationshipType::Recommends).with_confidence(0.3),
        );
        ont.add_relationship(
            Relationship::new(hot, call, RelationshipType::Recommends).with_confidence(0.8),
        );
        kg.register_ontology(ont);
        kg.bind_entity("lead", "1", vec!["hot_lead".into()], BTreeMap::new(), BTreeMap::new());

        let actions = kg.get_recommended_actions("lead", "1");
        assert_eq!(actions[0].0.id, "action_call");
        assert_eq!(actions[1].0.id, "action_email");
    }

    #[test]
    fn influence_score_sums_weight_times_confidence() {
        let kg = graph_with_binding();
        // hot_lead: 0.4 * 0.5 + meeting_held: 0.3 * 1.0 = 0.5
        let score = kg.compute_influence_score("lead", "1", "win_probability");
        assert!((score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn influence_score_includes_cross_links_unscaled() {
        let kg = graph_with_binding();
        let mut customer = Ontology::new("customer", "1.0.0");
        customer.add_concept(Concept::new(
            "win_probability",
            "Win Probability",
            ConceptType::Metric,
        ));
        kg.register_ontology(customer);
        // Cross-link weight counts raw, without confidence scaling.
        assert!(kg.link_concepts(
            "sales",
            "hot_lead",
            "customer",
            "win_probability",
            RelationshipType::Influences,
            0.2,
            BTreeMap::new(),
        ));

        let score = kg.compute_influence_score("lead", "1", "win_probability");
        assert!((score - 0.7).abs() < 1e-9);
    }

    #[test]
    fn influence_score_is_clamped() {
        let kg = KnowledgeGraph::default();
        let mut ont = Ontology::new("sales", "1.0.0");
        let a = ont.add_concept(Concept::new("a", "A", ConceptType::Category));
        let metric = ont.add_concept(Concept::new("m", "M", ConceptType::Metric));
        ont.add_relationship(
            Relationship::new(a, metric, RelationshipType::Influences).with_weight(3.0),
        );
        kg.register_ontology(ont);
        kg.bind_entity("lead", "1", vec!["a".into()], BTreeMap::new(), BTreeMap::new());

        assert_eq!(kg.compute_influence_score("lead", "1", "m"), 1.0);
    }

    #[test]
    fn influence_score_for_unknown_binding_is_zero() {
        let kg = graph_with_binding();
        assert_eq!(kg.compute_influence_score("lead", "999", "win_probability"), 0.0);
    }
}
