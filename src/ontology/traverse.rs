//! Path inference and structural similarity over a single ontology.
//!
//! Both operations work on outgoing edges only. Path inference is a
//! breadth-first search with a visited set, so it terminates on cyclic
//! graphs and returns a shortest path in edge count. Similarity is the
//! Jaccard index of the two concepts' outgoing-target sets; incoming edges
//! and edge weights are deliberately ignored to keep the numeric scale
//! stable for downstream consumers.

use std::collections::{HashSet, VecDeque};

use super::{ConceptId, Ontology, Relationship};

/// Default hop bound for [`Ontology::infer_path`].
pub const DEFAULT_MAX_DEPTH: usize = 5;

impl Ontology {
    /// Find a relationship path from `source_id` to `target_id`.
    ///
    /// BFS over outgoing edges, pruned by a visited set and bounded by
    /// `max_depth` hops. Returns the first (shortest) path found, `None` if
    /// the target is unreachable within the bound. When source and target
    /// are the same id the path is empty, even at `max_depth` 0.
    pub fn infer_path(
        &self,
        source_id: &str,
        target_id: &str,
        max_depth: usize,
    ) -> Option<Vec<Relationship>> {
        if source_id == target_id {
            return Some(Vec::new());
        }

        let source = self.concept_id(source_id)?;
        let target = self.concept_id(target_id)?;

        let mut visited: HashSet<ConceptId> = HashSet::new();
        let mut queue: VecDeque<(ConceptId, Vec<usize>)> = VecDeque::new();
        queue.push_back((source, Vec::new()));

        while let Some((current, path)) = queue.pop_front() {
            if current == target {
                return Some(
                    path.iter()
                        .map(|&i| self.relationships()[i].clone())
                        .collect(),
                );
            }
            if !visited.insert(current) || path.len() >= max_depth {
                continue;
            }

            for &index in self.outgoing_indices(current) {
                let rel = &self.relationships()[index];
                if !visited.contains(&rel.target) {
                    let mut next = path.clone();
                    next.push(index);
                    queue.push_back((rel.target, next));
                }
            }
        }

        None
    }

    /// Jaccard similarity of the two concepts' outgoing-target sets.
    ///
    /// 0.0 when both sets are empty (or either id is unknown), 1.0 for
    /// identical non-empty sets.
    pub fn compute_similarity(&self, concept1_id: &str, concept2_id: &str) -> f64 {
        let targets = |id: &str| -> HashSet<ConceptId> {
            self.get_relationships(id)
                .into_iter()
                .map(|rel| rel.target)
                .collect()
        };

        let a = targets(concept1_id);
        let b = targets(concept2_id);

        if a.is_empty() && b.is_empty() {
            return 0.0;
        }

        let intersection = a.intersection(&b).count();
        let union = a.union(&b).count();
        if union == 0 {
            0.0
        } else {
            intersection as f64 / union as f64
        }
    }
}
