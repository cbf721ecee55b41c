//! Core concept types for the knowledge graph.
//!
//! A [`Concept`] is a typed node in a domain ontology. Concepts are the
//! atomic units of the system: every lead tier, pipeline stage, engagement
//! event, metric, and recommended action is a concept identified by a string
//! id. Two concepts with the same id are the same node — equality and
//! hashing are defined solely by `id`, which the ontology indices rely on.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Classification of a concept in a domain ontology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConceptType {
    /// A concrete domain entity (lead, account, opportunity).
    Entity,
    /// A classification (hot lead, enterprise account).
    Category,
    /// A property (score, status, stage).
    Attribute,
    /// A temporal occurrence (engagement, conversion).
    Event,
    /// A measurable value (win rate, churn risk).
    Metric,
    /// A recommended action (call, email, meeting).
    Action,
}

impl ConceptType {
    /// Every concept type, in declaration order. Feature extraction emits one
    /// zero-initialized counter per entry.
    pub const ALL: [ConceptType; 6] = [
        ConceptType::Entity,
        ConceptType::Category,
        ConceptType::Attribute,
        ConceptType::Event,
        ConceptType::Metric,
        ConceptType::Action,
    ];

    /// Snake-case name used in feature keys and exports.
    pub fn as_str(self) -> &'static str {
        match self {
            ConceptType::Entity => "entity",
            ConceptType::Category => "category",
            ConceptType::Attribute => "attribute",
            ConceptType::Event => "event",
            ConceptType::Metric => "metric",
            ConceptType::Action => "action",
        }
    }
}

impl std::fmt::Display for ConceptType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classification of a directed edge between two concepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    /// Inheritance (hot lead IS-A lead).
    IsA,
    /// Composition (account HAS-A contact).
    HasA,
    /// Membership (lead BELONGS-TO campaign).
    BelongsTo,
    /// Causal (engagement INFLUENCES win rate).
    Influences,
    /// Event causation (low score TRIGGERS alert).
    Triggers,
    /// Statistical (revenue CORRELATES-WITH engagement).
    CorrelatesWith,
    /// Temporal (qualification PRECEDES proposal).
    Precedes,
    /// Suggestive (high score RECOMMENDS call).
    Recommends,
}

impl RelationshipType {
    /// Every relationship type, in declaration order.
    pub const ALL: [RelationshipType; 8] = [
        RelationshipType::IsA,
        RelationshipType::HasA,
        RelationshipType::BelongsTo,
        RelationshipType::Influences,
        RelationshipType::Triggers,
        RelationshipType::CorrelatesWith,
        RelationshipType::Precedes,
        RelationshipType::Recommends,
    ];

    /// Snake-case name used in feature keys, exports, and RDF predicates.
    pub fn as_str(self) -> &'static str {
        match self {
            RelationshipType::IsA => "is_a",
            RelationshipType::HasA => "has_a",
            RelationshipType::BelongsTo => "belongs_to",
            RelationshipType::Influences => "influences",
            RelationshipType::Triggers => "triggers",
            RelationshipType::CorrelatesWith => "correlates_with",
            RelationshipType::Precedes => "precedes",
            RelationshipType::Recommends => "recommends",
        }
    }
}

impl std::fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed node in a domain ontology.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concept {
    /// Unique identifier within an ontology.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Type classification.
    pub concept_type: ConceptType,
    /// Key-value properties (arbitrary JSON scalars or structures).
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
    /// Optional numeric vector representation for ML consumers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    /// Free-form context.
    #[serde(default)]
    pub metadata: BTreeMap<String, serde_json::Value>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Concept {
    /// Create a concept with the current timestamp and empty maps.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        concept_type: ConceptType,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            concept_type,
            attributes: BTreeMap::new(),
            embedding: None,
            metadata: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    /// Attach an attribute.
    pub fn with_attribute(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Attach an embedding vector.
    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Attach a metadata entry.
    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

// Identity is the id alone. Name, attributes, embeddings, and timestamps do
// not participate — the ontology indices depend on this.
impl PartialEq for Concept {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Concept {}

impl std::hash::Hash for Concept {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for Concept {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.id, self.concept_type)
    }
}
