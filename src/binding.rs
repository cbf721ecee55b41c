//! Entity bindings: the association between a real-world record and the
//! concepts, numeric features, and metadata that currently classify it.
//!
//! Bindings are keyed by `(entity_type, entity_id)` and fully replaced on
//! rebind (upsert, not merge). The concept list tolerates duplicates and is
//! deliberately mutable in place — scoring consumers append inferred concept
//! ids to a live binding through the knowledge graph's writer lock.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Key of a binding: the kind of record plus its id in the source system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingKey {
    /// Kind of entity (lead, opportunity, account, ...).
    pub entity_type: String,
    /// Identifier in the source system.
    pub entity_id: String,
}

impl BindingKey {
    pub fn new(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
        }
    }
}

impl std::fmt::Display for BindingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.entity_type, self.entity_id)
    }
}

/// The concepts, features, and metadata bound to one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityBinding {
    /// Kind of entity.
    pub entity_type: String,
    /// Identifier in the source system.
    pub entity_id: String,
    /// Concept ids classifying this entity. Ordered, duplicates tolerated.
    pub concepts: Vec<String>,
    /// Numeric features for ML consumption.
    pub features: BTreeMap<String, f64>,
    /// Free-form context.
    pub metadata: BTreeMap<String, serde_json::Value>,
    /// Refreshed on every write to the binding.
    pub last_updated: DateTime<Utc>,
}

impl EntityBinding {
    /// Create a binding stamped with the current time.
    pub fn new(
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
        concepts: Vec<String>,
        features: BTreeMap<String, f64>,
        metadata: BTreeMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            concepts,
            features,
            metadata,
            last_updated: Utc::now(),
        }
    }

    /// Key of this binding.
    pub fn key(&self) -> BindingKey {
        BindingKey::new(self.entity_type.clone(), self.entity_id.clone())
    }

    /// Whether a concept id is already bound.
    pub fn has_concept(&self, concept_id: &str) -> bool {
        self.concepts.iter().any(|c| c == concept_id)
    }

    /// Refresh `last_updated` to now.
    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }
}
