//! Domain ontology: an arena of concepts plus typed, weighted relationships.
//!
//! An [`Ontology`] is a named, versioned container of [`Concept`]s for one
//! business domain ("sales", "customer"). Concepts live in an arena owned by
//! the ontology and are addressed by [`ConceptId`] handles; a
//! [`Relationship`] stores a pair of arena handles rather than references,
//! so cyclic graphs (A IsA B, B BelongsTo A) carry no lifetime concerns.
//!
//! Indices — by id, by concept type, and an outgoing-adjacency index — are
//! maintained incrementally on every insert. Concepts are append/overwrite
//! only; removal is not supported for the lifetime of the process.

pub mod traverse;

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::concept::{Concept, ConceptType, RelationshipType};

/// Handle to a concept slot in an [`Ontology`] arena.
///
/// Handles are only meaningful within the ontology that issued them and stay
/// valid forever: overwriting a concept by id reuses its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(transparent)]
pub struct ConceptId(u32);

impl ConceptId {
    /// Position of the concept in the arena.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A directed, typed edge between two concepts of the same ontology.
#[derive(Debug, Clone, PartialEq)]
pub struct Relationship {
    /// Source concept handle.
    pub source: ConceptId,
    /// Target concept handle.
    pub target: ConceptId,
    /// Edge classification.
    pub relationship_type: RelationshipType,
    /// Strength of the relationship. Domain-defined scale; signed for
    /// correlations.
    pub weight: f64,
    /// Confidence in [0.0, 1.0].
    pub confidence: f64,
    /// Free-form edge properties.
    pub properties: BTreeMap<String, serde_json::Value>,
}

impl Relationship {
    /// Create a relationship with weight 1.0 and full confidence.
    pub fn new(source: ConceptId, target: ConceptId, relationship_type: RelationshipType) -> Self {
        Self {
            source,
            target,
            relationship_type,
            weight: 1.0,
            confidence: 1.0,
            properties: BTreeMap::new(),
        }
    }

    /// Set the weight.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Set the confidence, clamped to [0.0, 1.0].
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence.clamp(0.0, 1.0);
        self
    }

    /// Attach an edge property.
    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Conjunctive concept query. Each predicate is optional and independently
/// applied; `relationship_type` narrows the `related_to` predicate only.
#[derive(Debug, Clone, Default)]
pub struct QueryFilter {
    /// Keep concepts of this type.
    pub concept_type: Option<ConceptType>,
    /// Keep concepts whose attributes contain every listed key/value pair.
    pub attributes: BTreeMap<String, serde_json::Value>,
    /// Keep concepts reachable as outgoing targets of this concept id.
    pub related_to: Option<String>,
    /// Edge type for the `related_to` predicate.
    pub relationship_type: Option<RelationshipType>,
}

/// A named, versioned container of concepts and relationships for one domain.
#[derive(Debug, Clone)]
pub struct Ontology {
    name: String,
    version: String,
    /// Concept arena. Slots are never removed; overwrite by id reuses a slot.
    concepts: Vec<Concept>,
    /// Concept id → arena handle.
    by_id: HashMap<String, ConceptId>,
    /// Append-only relationship log.
    relationships: Vec<Relationship>,
    /// Concept type → handles, in insertion order.
    type_index: HashMap<ConceptType, Vec<ConceptId>>,
    /// Source handle → indices into `relationships`, in insertion order.
    adjacency: HashMap<ConceptId, Vec<usize>>,
}

impl Ontology {
    /// Create an empty ontology.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            concepts: Vec::new(),
            by_id: HashMap::new(),
            relationships: Vec::new(),
            type_index: HashMap::new(),
            adjacency: HashMap::new(),
        }
    }

    /// Domain name of this ontology.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Version string.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Insert a concept, overwriting any existing concept with the same id.
    ///
    /// Overwriting reuses the arena slot, so previously issued handles and
    /// the adjacency index stay valid. The type index is updated if the
    /// concept type changed.
    pub fn add_concept(&mut self, concept: Concept) -> ConceptId {
        if let Some(&cid) = self.by_id.get(&concept.id) {
            let old_type = self.concepts[cid.index()].concept_type;
            if old_type != concept.concept_type {
                if let Some(ids) = self.type_index.get_mut(&old_type) {
                    ids.retain(|&existing| existing != cid);
                }
                self.type_index
                    .entry(concept.concept_type)
                    .or_default()
                    .push(cid);
            }
            self.concepts[cid.index()] = concept;
            return cid;
        }

        let cid = ConceptId(self.concepts.len() as u32);
        self.by_id.insert(concept.id.clone(), cid);
        self.type_index
            .entry(concept.concept_type)
            .or_default()
            .push(cid);
        self.concepts.push(concept);
        cid
    }

    /// Resolve a concept id string to its arena handle.
    pub fn concept_id(&self, id: &str) -> Option<ConceptId> {
        self.by_id.get(id).copied()
    }

    /// Concept for a handle issued by this ontology.
    pub fn concept(&self, cid: ConceptId) -> &Concept {
        &self.concepts[cid.index()]
    }

    /// Look up a concept by id.
    pub fn get_concept(&self, id: &str) -> Option<&Concept> {
        self.concept_id(id).map(|cid| self.concept(cid))
    }

    /// All concepts of a given type, in insertion order.
    pub fn get_concepts_by_type(&self, concept_type: ConceptType) -> Vec<&Concept> {
        self.type_index
            .get(&concept_type)
            .map(|ids| ids.iter().map(|&cid| self.concept(cid)).collect())
            .unwrap_or_default()
    }

    /// All concepts, in insertion order.
    pub fn concepts(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.iter()
    }

    /// Number of concepts.
    pub fn concept_count(&self) -> usize {
        self.concepts.len()
    }

    /// Append a relationship and index it by source.
    ///
    /// Both endpoint handles must have been issued by this ontology; that is
    /// the caller's referential-integrity obligation at insertion time.
    pub fn add_relationship(&mut self, relationship: Relationship) {
        let index = self.relationships.len();
        self.adjacency
            .entry(relationship.source)
            .or_default()
            .push(index);
        self.relationships.push(relationship);
    }

    /// Resolve both endpoints and append a relationship in one step.
    ///
    /// Returns false and makes no change if either id is unknown.
    pub fn relate(
        &mut self,
        source_id: &str,
        target_id: &str,
        relationship_type: RelationshipType,
    ) -> bool {
        match (self.concept_id(source_id), self.concept_id(target_id)) {
            (Some(source), Some(target)) => {
                self.add_relationship(Relationship::new(source, target, relationship_type));
                true
            }
            _ => false,
        }
    }

    /// Outgoing relationships of a concept, in insertion order. Empty if the
    /// concept is unknown.
    pub fn get_relationships(&self, concept_id: &str) -> Vec<&Relationship> {
        self.concept_id(concept_id)
            .map(|cid| self.outgoing(cid))
            .unwrap_or_default()
    }

    /// Outgoing relationships by handle.
    pub(crate) fn outgoing(&self, cid: ConceptId) -> Vec<&Relationship> {
        self.outgoing_indices(cid)
            .iter()
            .map(|&i| &self.relationships[i])
            .collect()
    }

    /// Indices into the relationship log for a source handle.
    pub(crate) fn outgoing_indices(&self, cid: ConceptId) -> &[usize] {
        self.adjacency.get(&cid).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All relationships, in insertion order.
    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Number of relationships.
    pub fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    /// Outgoing targets of a concept, optionally filtered by edge type.
    pub fn get_related_concepts(
        &self,
        concept_id: &str,
        relationship_type: Option<RelationshipType>,
    ) -> Vec<&Concept> {
        self.get_relationships(concept_id)
            .into_iter()
            .filter(|rel| {
                relationship_type.is_none_or(|rt| rel.relationship_type == rt)
            })
            .map(|rel| self.concept(rel.target))
            .collect()
    }

    /// Query concepts with a conjunctive filter. Results are in concept
    /// insertion order.
    pub fn query(&self, filter: &QueryFilter) -> Vec<&Concept> {
        let related_ids: Option<Vec<&str>> = filter.related_to.as_deref().map(|origin| {
            self.get_related_concepts(origin, filter.relationship_type)
                .into_iter()
                .map(|c| c.id.as_str())
                .collect()
        });

        self.concepts()
            .filter(|c| {
                filter
                    .concept_type
                    .is_none_or(|t| c.concept_type == t)
            })
            .filter(|c| {
                filter
                    .attributes
                    .iter()
                    .all(|(k, v)| c.attributes.get(k) == Some(v))
            })
            .filter(|c| {
                related_ids
                    .as_ref()
                    .is_none_or(|ids| ids.contains(&c.id.as_str()))
            })
            .collect()
    }
}
