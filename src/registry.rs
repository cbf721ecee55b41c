//! Process-wide ontology registry.
//!
//! Domain bootstrap code builds one [`Ontology`] per business domain and
//! registers it here once at process start; everything after that is reads.
//! Backed by a `DashMap` for lock-free lookups plus an order log so that
//! [`crate::graph::KnowledgeGraph::from_registry`] sees ontologies in
//! registration order (lookup order matters for cross-ontology concept
//! resolution).

use std::sync::{Arc, RwLock};

use dashmap::DashMap;

use crate::ontology::Ontology;

/// Named lookup of shared ontology instances.
pub struct OntologyRegistry {
    by_name: DashMap<String, Arc<Ontology>>,
    /// Names in first-registration order.
    order: RwLock<Vec<String>>,
}

impl OntologyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            by_name: DashMap::new(),
            order: RwLock::new(Vec::new()),
        }
    }

    /// Register an ontology under its own name, replacing any previous
    /// registration of that name (the original registration keeps its slot
    /// in the ordering).
    pub fn register(&self, ontology: Arc<Ontology>) {
        let name = ontology.name().to_string();
        let previous = self.by_name.insert(name.clone(), ontology);
        if previous.is_none() {
            self.order.write().expect("registry order lock poisoned").push(name.clone());
        }
        tracing::info!(ontology = %name, "registered ontology");
    }

    /// Look up an ontology by name.
    pub fn get(&self, name: &str) -> Option<Arc<Ontology>> {
        self.by_name.get(name).map(|entry| Arc::clone(entry.value()))
    }

    /// Registered ontology names, in first-registration order.
    pub fn list_ontologies(&self) -> Vec<String> {
        self.order.read().expect("registry order lock poisoned").clone()
    }

    /// Number of registered ontologies.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

impl Default for OntologyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for OntologyRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OntologyRegistry")
            .field("ontologies", &self.list_ontologies())
            .finish()
    }
}
