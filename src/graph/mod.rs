//! Unified knowledge graph aggregating multiple domain ontologies.
//!
//! The [`KnowledgeGraph`] owns registered ontologies, cross-ontology links,
//! the entity-binding table, and the inference-rule list. It is the single
//! shared resource of this crate: construct one `Arc<KnowledgeGraph>` at
//! process start (usually via [`KnowledgeGraph::from_registry`]) and hand
//! the handle to every consumer. Sharing is explicit — two reader/writer
//! locks guard the two logical resources, one for the ontology set plus
//! cross-links and rules, one for the binding table. All operations are
//! in-memory CPU work; nothing here blocks on I/O.
//!
//! Lookups signal not-found with `Option`/empty returns and referential
//! mutation failures return `bool`, so scoring pipelines degrade gracefully
//! instead of crashing on incomplete ontology data.

pub mod features;
pub mod reason;

use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::binding::{BindingKey, EntityBinding};
use crate::concept::{Concept, ConceptType, RelationshipType};
use crate::ontology::traverse::DEFAULT_MAX_DEPTH;
use crate::ontology::{Ontology, Relationship};
use crate::registry::OntologyRegistry;

use reason::InferenceRule;

/// Default graph name.
pub const DEFAULT_GRAPH_NAME: &str = "salescompass_kg";

/// Configuration for a knowledge graph instance.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Display name, used in exports.
    pub name: String,
    /// Hop bound for [`KnowledgeGraph::find_path`].
    pub max_path_depth: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_GRAPH_NAME.to_string(),
            max_path_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// A relationship whose endpoints belong to two different ontologies.
///
/// Within-ontology relationships use arena handles; a cross-link names its
/// endpoints by ontology name and concept id instead, since handles are
/// meaningless across arenas.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossLink {
    pub source_ontology: String,
    pub source_id: String,
    pub target_ontology: String,
    pub target_id: String,
    pub relationship_type: RelationshipType,
    pub weight: f64,
    pub confidence: f64,
    pub properties: BTreeMap<String, serde_json::Value>,
}

/// The ontology set, cross-links, and rules behind the graph's first lock.
///
/// Inference rules receive a `&GraphCore` so they can resolve concepts
/// without re-entering the outer lock.
pub struct GraphCore {
    pub(crate) ontologies: Vec<Ontology>,
    pub(crate) by_name: HashMap<String, usize>,
    pub(crate) cross_links: Vec<CrossLink>,
    pub(crate) rules: Vec<Box<dyn InferenceRule>>,
}

impl GraphCore {
    fn new() -> Self {
        Self {
            ontologies: Vec::new(),
            by_name: HashMap::new(),
            cross_links: Vec::new(),
            rules: Vec::new(),
        }
    }

    fn register(&mut self, ontology: Ontology) {
        match self.by_name.get(ontology.name()) {
            Some(&slot) => self.ontologies[slot] = ontology,
            None => {
                self.by_name
                    .insert(ontology.name().to_string(), self.ontologies.len());
                self.ontologies.push(ontology);
            }
        }
    }

    /// Registered ontology by name.
    pub fn get_ontology(&self, name: &str) -> Option<&Ontology> {
        self.by_name.get(name).map(|&slot| &self.ontologies[slot])
    }

    /// First concept with this id, searching ontologies in registration
    /// order.
    pub fn get_concept(&self, concept_id: &str) -> Option<&Concept> {
        self.ontologies
            .iter()
            .find_map(|ont| ont.get_concept(concept_id))
    }

    /// Registered ontologies, in registration order.
    pub fn ontologies(&self) -> impl Iterator<Item = &Ontology> {
        self.ontologies.iter()
    }

    /// Cross-ontology links, in insertion order.
    pub fn cross_links(&self) -> &[CrossLink] {
        &self.cross_links
    }
}

/// Summary counters for a knowledge graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub ontologies: usize,
    pub total_concepts: usize,
    /// Intra-ontology relationships plus cross-ontology links.
    pub total_relationships: usize,
    pub entity_bindings: usize,
    pub cross_ontology_links: usize,
    pub inference_rules: usize,
}

/// Multi-ontology knowledge graph with entity bindings and reasoning.
pub struct KnowledgeGraph {
    config: GraphConfig,
    pub(crate) core: RwLock<GraphCore>,
    pub(crate) bindings: RwLock<HashMap<BindingKey, EntityBinding>>,
}

impl KnowledgeGraph {
    /// Create an empty knowledge graph.
    pub fn new(config: GraphConfig) -> Self {
        tracing::info!(name = %config.name, "creating knowledge graph");
        Self {
            config,
            core: RwLock::new(GraphCore::new()),
            bindings: RwLock::new(HashMap::new()),
        }
    }

    /// Create a graph pre-populated with every ontology in the registry,
    /// cloned in registration order.
    ///
    /// This is the constructor-injected replacement for a lazily built
    /// global instance: call it once at process start and share the result
    /// behind an `Arc`.
    pub fn from_registry(registry: &OntologyRegistry, config: GraphConfig) -> Self {
        let graph = Self::new(config);
        for name in registry.list_ontologies() {
            if let Some(ontology) = registry.get(&name) {
                graph.register_ontology(Ontology::clone(&ontology));
            }
        }
        graph
    }

    /// Graph name.
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// Active configuration.
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Ontologies
    // -----------------------------------------------------------------------

    /// Register an ontology, replacing any previous one of the same name.
    pub fn register_ontology(&self, ontology: Ontology) {
        tracing::info!(
            ontology = ontology.name(),
            concepts = ontology.concept_count(),
            relationships = ontology.relationship_count(),
            "registering ontology"
        );
        self.write_core().register(ontology);
    }

    /// Snapshot of a registered ontology.
    pub fn get_ontology(&self, name: &str) -> Option<Ontology> {
        self.read_core().get_ontology(name).cloned()
    }

    /// Registered ontology names, in registration order.
    pub fn list_ontologies(&self) -> Vec<String> {
        self.read_core()
            .ontologies()
            .map(|ont| ont.name().to_string())
            .collect()
    }

    /// First concept with this id across all ontologies, in registration
    /// order.
    pub fn get_concept(&self, concept_id: &str) -> Option<Concept> {
        self.read_core().get_concept(concept_id).cloned()
    }

    /// Insert a concept into a registered ontology. `None` if the ontology
    /// is unknown.
    pub fn add_concept(
        &self,
        ontology: &str,
        concept: Concept,
    ) -> Option<crate::ontology::ConceptId> {
        let mut core = self.write_core();
        let slot = *core.by_name.get(ontology)?;
        Some(core.ontologies[slot].add_concept(concept))
    }

    /// Append a relationship inside a registered ontology, resolving both
    /// concept ids. False (no change) if anything fails to resolve.
    pub fn add_relationship(
        &self,
        ontology: &str,
        source_id: &str,
        target_id: &str,
        relationship_type: RelationshipType,
        weight: f64,
        confidence: f64,
    ) -> bool {
        let mut core = self.write_core();
        let Some(&slot) = core.by_name.get(ontology) else {
            return false;
        };
        let ont = &mut core.ontologies[slot];
        match (ont.concept_id(source_id), ont.concept_id(target_id)) {
            (Some(source), Some(target)) => {
                ont.add_relationship(
                    Relationship::new(source, target, relationship_type)
                        .with_weight(weight)
                        .with_confidence(confidence),
                );
                true
            }
            _ => false,
        }
    }

    /// Create a cross-ontology link between two concepts.
    ///
    /// Resolves both endpoints first; on any lookup failure returns false
    /// and makes no change. The link is created with full confidence.
    pub fn link_concepts(
        &self,
        source_ontology: &str,
        source_concept_id: &str,
        target_ontology: &str,
        target_concept_id: &str,
        relationship_type: RelationshipType,
        weight: f64,
        properties: BTreeMap<String, serde_json::Value>,
    ) -> bool {
        let mut core = self.write_core();

        let resolves = |core: &GraphCore, ontology: &str, id: &str| {
            core.get_ontology(ontology)
                .is_some_and(|ont| ont.get_concept(id).is_some())
        };
        if !resolves(&core, source_ontology, source_concept_id)
            || !resolves(&core, target_ontology, target_concept_id)
        {
            return false;
        }

        core.cross_links.push(CrossLink {
            source_ontology: source_ontology.to_string(),
            source_id: source_concept_id.to_string(),
            target_ontology: target_ontology.to_string(),
            target_id: target_concept_id.to_string(),
            relationship_type,
            weight,
            confidence: 1.0,
            properties,
        });
        true
    }

    /// Find a relationship path inside one registered ontology, bounded by
    /// the configured `max_path_depth`.
    pub fn find_path(
        &self,
        ontology: &str,
        source_id: &str,
        target_id: &str,
    ) -> Option<Vec<Relationship>> {
        self.read_core()
            .get_ontology(ontology)?
            .infer_path(source_id, target_id, self.config.max_path_depth)
    }

    // -----------------------------------------------------------------------
    // Entity bindings
    // -----------------------------------------------------------------------

    /// Bind an entity to a set of concept ids, fully replacing any existing
    /// binding for the same key. Returns the new binding.
    pub fn bind_entity(
        &self,
        entity_type: &str,
        entity_id: &str,
        concept_ids: Vec<String>,
        features: BTreeMap<String, f64>,
        metadata: BTreeMap<String, serde_json::Value>,
    ) -> EntityBinding {
        let binding = EntityBinding::new(entity_type, entity_id, concept_ids, features, metadata);
        tracing::debug!(
            entity_type,
            entity_id,
            concepts = binding.concepts.len(),
            "binding entity"
        );
        self.write_bindings().insert(binding.key(), binding.clone());
        binding
    }

    /// Binding for an entity, if any.
    pub fn get_entity_binding(&self, entity_type: &str, entity_id: &str) -> Option<EntityBinding> {
        self.read_bindings()
            .get(&BindingKey::new(entity_type, entity_id))
            .cloned()
    }

    /// All bindings whose concept list contains the given id, sorted by
    /// binding key.
    pub fn get_entities_by_concept(&self, concept_id: &str) -> Vec<EntityBinding> {
        let mut matches: Vec<EntityBinding> = self
            .read_bindings()
            .values()
            .filter(|binding| binding.has_concept(concept_id))
            .cloned()
            .collect();
        matches.sort_by(|a, b| a.key().cmp(&b.key()));
        matches
    }

    /// Merge features into an existing binding (overwrite on key collision)
    /// and refresh its timestamp. False if no binding exists; a binding is
    /// never created implicitly.
    pub fn update_entity_features(
        &self,
        entity_type: &str,
        entity_id: &str,
        features: BTreeMap<String, f64>,
    ) -> bool {
        let mut bindings = self.write_bindings();
        match bindings.get_mut(&BindingKey::new(entity_type, entity_id)) {
            Some(binding) => {
                binding.features.extend(features);
                binding.touch();
                true
            }
            None => false,
        }
    }

    /// Append a concept id to a live binding unless already present.
    ///
    /// This is the sanctioned form of the in-place concept mutation that
    /// scoring consumers perform; it runs under the binding writer lock.
    /// Returns true only when the concept was appended; the timestamp is
    /// refreshed only in that case.
    pub fn append_concept_if_absent(
        &self,
        entity_type: &str,
        entity_id: &str,
        concept_id: &str,
    ) -> bool {
        let mut bindings = self.write_bindings();
        match bindings.get_mut(&BindingKey::new(entity_type, entity_id)) {
            Some(binding) if !binding.has_concept(concept_id) => {
                binding.concepts.push(concept_id.to_string());
                binding.touch();
                true
            }
            _ => false,
        }
    }

    /// Number of entity bindings.
    pub fn binding_count(&self) -> usize {
        self.read_bindings().len()
    }

    // -----------------------------------------------------------------------
    // Stats
    // -----------------------------------------------------------------------

    /// Summary counters across the whole graph.
    pub fn stats(&self) -> GraphStats {
        let core = self.read_core();
        let total_concepts = core.ontologies().map(Ontology::concept_count).sum();
        let intra: usize = core.ontologies().map(Ontology::relationship_count).sum();
        let cross = core.cross_links.len();
        GraphStats {
            ontologies: core.ontologies.len(),
            total_concepts,
            total_relationships: intra + cross,
            entity_bindings: self.binding_count(),
            cross_ontology_links: cross,
            inference_rules: core.rules.len(),
        }
    }

    // -----------------------------------------------------------------------
    // Lock plumbing
    // -----------------------------------------------------------------------

    pub(crate) fn read_core(&self) -> std::sync::RwLockReadGuard<'_, GraphCore> {
        self.core.read().expect("graph core lock poisoned")
    }

    pub(crate) fn write_core(&self) -> std::sync::RwLockWriteGuard<'_, GraphCore> {
        self.core.write().expect("graph core lock poisoned")
    }

    pub(crate) fn read_bindings(
        &self,
    ) -> std::sync::RwLockReadGuard<'_, HashMap<BindingKey, EntityBinding>> {
        self.bindings.read().expect("binding table lock poisoned")
    }

    pub(crate) fn write_bindings(
        &self,
    ) -> std::sync::RwLockWriteGuard<'_, HashMap<BindingKey, EntityBinding>> {
        self.bindings.write().expect("binding table lock poisoned")
    }
}

impl Default for KnowledgeGraph {
    fn default() -> Self {
        Self::new(GraphConfig::default())
    }
}

impl std::fmt::Debug for KnowledgeGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.stats();
        f.debug_struct("KnowledgeGraph")
            .field("name", &self.config.name)
            .field("ontologies", &stats.ontologies)
            .field("concepts", &stats.total_concepts)
            .field("relationships", &stats.total_relationships)
            .field("bindings", &stats.entity_bindings)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::concept::Concept;
    use std::sync::Arc;

    fn sales() -> Ontology {
        let mut ont = Ontology::new("sales", "1.0.0");
        let lead = ont.add_concept(Concept::new("lead", "Lead", ConceptType::Entity));
        let hot = ont.add_concept(Concept::new("hot_lead", "Hot Lead", ConceptType::Category));
        ont.add_relationship(Relationship::new(hot, lead, RelationshipType::IsA));
        ont
    }

    fn customer() -> Ontology {
        let mut ont = Ontology::new("customer", "1.0.0");
        ont.add_concept(Concept::new("churn_risk", "Churn Risk", ConceptType::Metric));
        ont
    }

    fn graph() -> KnowledgeGraph {
        let kg = KnowledgeGraph::default();
        kg.register_ontology(sales());
        kg.register_ontology(customer());
        kg
    }

    #[test]
    fn concept_lookup_searches_in_registration_order() {
        let kg = graph();
        assert_eq!(kg.list_ontologies(), vec!["sales", "customer"]);
        assert_eq!(kg.get_concept("hot_lead").unwrap().id, "hot_lead");
        assert_eq!(kg.get_concept("churn_risk").unwrap().id, "churn_risk");
        assert!(kg.get_concept("missing").is_none());
    }

    #[test]
    fn duplicate_concept_id_resolves_to_first_registered() {
        let kg = graph();
        let mut shadow = Ontology::new("shadow", "1.0.0");
        shadow.add_concept(Concept::new("hot_lead", "Shadowed", ConceptType::Entity));
        kg.register_ontology(shadow);
        assert_eq!(kg.get_concept("hot_lead").unwrap().name, "Hot Lead");
    }

    #[test]
    fn link_concepts_is_atomic() {
        let kg = graph();
        assert!(!kg.link_concepts(
            "sales",
            "hot_lead",
            "customer",
            "missing",
            RelationshipType::Influences,
            0.5,
            BTreeMap::new(),
        ));
        assert_eq!(kg.stats().cross_ontology_links, 0);

        assert!(kg.link_concepts(
            "sales",
            "hot_lead",
            "customer",
            "churn_risk",
            RelationshipType::Influences,
            0.5,
            BTreeMap::new(),
        ));
        assert_eq!(kg.stats().cross_ontology_links, 1);
    }

    #[test]
    fn bind_entity_is_a_full_upsert() {
        let kg = graph();
        kg.bind_entity(
            "lead",
            "1",
            vec!["hot_lead".into()],
            BTreeMap::from([("score".to_string(), 90.0)]),
            BTreeMap::new(),
        );
        let first = kg.get_entity_binding("lead", "1").unwrap();

        kg.bind_entity("lead", "1", vec!["lead".into()], BTreeMap::new(), BTreeMap::new());
        let second = kg.get_entity_binding("lead", "1").unwrap();

        assert_eq!(second.concepts, vec!["lead"]);
        assert!(second.features.is_empty());
        assert!(second.last_updated >= first.last_updated);
        assert_eq!(kg.binding_count(), 1);
    }

    #[test]
    fn bind_entity_is_idempotent_up_to_timestamp() {
        let kg = graph();
        let a = kg.bind_entity("lead", "1", vec!["hot_lead".into()], BTreeMap::new(), BTreeMap::new());
        let b = kg.bind_entity("lead", "1", vec!["hot_lead".into()], BTreeMap::new(), BTreeMap::new());
        assert_eq!(a.concepts, b.concepts);
        assert_eq!(a.features, b.features);
        assert_eq!(a.metadata, b.metadata);
        assert!(b.last_updated >= a.last_updated);
    }

    #[test]
    fn entities_by_concept_scans_all_bindings() {
        let kg = graph();
        kg.bind_entity("lead", "1", vec!["hot_lead".into()], BTreeMap::new(), BTreeMap::new());
        kg.bind_entity("lead", "2", vec!["lead".into()], BTreeMap::new(), BTreeMap::new());
        kg.bind_entity("account", "9", vec!["hot_lead".into()], BTreeMap::new(), BTreeMap::new());

        let hot = kg.get_entities_by_concept("hot_lead");
        assert_eq!(hot.len(), 2);
        // Sorted by key: account/9 before lead/1.
        assert_eq!(hot[0].entity_type, "account");
        assert!(kg.get_entities_by_concept("missing").is_empty());
    }

    #[test]
    fn update_features_merges_and_never_creates() {
        let kg = graph();
        assert!(!kg.update_entity_features(
            "lead",
            "1",
            BTreeMap::from([("score".to_string(), 1.0)])
        ));

        kg.bind_entity(
            "lead",
            "1",
            vec![],
            BTreeMap::from([("score".to_string(), 1.0), ("calls".to_string(), 2.0)]),
            BTreeMap::new(),
        );
        assert!(kg.update_entity_features(
            "lead",
            "1",
            BTreeMap::from([("score".to_string(), 5.0)])
        ));

        let binding = kg.get_entity_binding("lead", "1").unwrap();
        assert_eq!(binding.features["score"], 5.0);
        assert_eq!(binding.features["calls"], 2.0);
    }

    #[test]
    fn append_concept_if_absent_semantics() {
        let kg = graph();
        assert!(!kg.append_concept_if_absent("lead", "1", "hot_lead"));

        kg.bind_entity("lead", "1", vec!["lead".into()], BTreeMap::new(), BTreeMap::new());
        assert!(kg.append_concept_if_absent("lead", "1", "hot_lead"));
        let stamped = kg.get_entity_binding("lead", "1").unwrap();

        assert!(!kg.append_concept_if_absent("lead", "1", "hot_lead"));
        let binding = kg.get_entity_binding("lead", "1").unwrap();
        assert_eq!(binding.concepts, vec!["lead", "hot_lead"]);
        assert_eq!(binding.last_updated, stamped.last_updated);
    }

    #[test]
    fn add_concept_and_relationship_through_the_graph() {
        let kg = graph();
        assert!(kg
            .add_concept("sales", Concept::new("mql", "MQL", ConceptType::Category))
            .is_some());
        assert!(kg.add_concept("missing", Concept::new("x", "X", ConceptType::Entity)).is_none());

        assert!(kg.add_relationship("sales", "mql", "lead", RelationshipType::IsA, 1.0, 1.0));
        assert!(!kg.add_relationship("sales", "mql", "missing", RelationshipType::IsA, 1.0, 1.0));
        assert_eq!(kg.get_ontology("sales").unwrap().relationship_count(), 2);
    }

    #[test]
    fn stats_count_everything() {
        let kg = graph();
        kg.bind_entity("lead", "1", vec!["hot_lead".into()], BTreeMap::new(), BTreeMap::new());
        kg.link_concepts(
            "sales",
            "hot_lead",
            "customer",
            "churn_risk",
            RelationshipType::Influences,
            0.3,
            BTreeMap::new(),
        );

        let stats = kg.stats();
        assert_eq!(stats.ontologies, 2);
        assert_eq!(stats.total_concepts, 3);
        assert_eq!(stats.total_relationships, 2); // 1 intra + 1 cross
        assert_eq!(stats.entity_bindings, 1);
        assert_eq!(stats.cross_ontology_links, 1);
        assert_eq!(stats.inference_rules, 0);
    }

    #[test]
    fn from_registry_clones_in_registration_order() {
        let registry = OntologyRegistry::new();
        registry.register(Arc::new(sales()));
        registry.register(Arc::new(customer()));

        let kg = KnowledgeGraph::from_registry(&registry, GraphConfig::default());
        assert_eq!(kg.list_ontologies(), vec!["sales", "customer"]);
        assert_eq!(kg.stats().total_concepts, 3);
    }

    #[test]
    fn find_path_uses_configured_depth() {
        let kg = KnowledgeGraph::new(GraphConfig {
            max_path_depth: 1,
            ..Default::default()
        });
        let mut ont = Ontology::new("chain", "1.0.0");
        let a = ont.add_concept(Concept::new("a", "A", ConceptType::Entity));
        let b = ont.add_concept(Concept::new("b", "B", ConceptType::Entity));
        let c = ont.add_concept(Concept::new("c", "C", ConceptType::Entity));
        ont.add_relationship(Relationship::new(a, b, RelationshipType::Precedes));
        ont.add_relationship(Relationship::new(b, c, RelationshipType::Precedes));
        kg.register_ontology(ont);

        assert!(kg.find_path("chain", "a", "b").is_some());
        assert!(kg.find_path("chain", "a", "c").is_none());
        assert!(kg.find_path("missing", "a", "b").is_none());
    }
}
