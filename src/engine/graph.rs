//! Rename graph: target -> source.
//!
//! With unique targets and unique sources every node has at most one successor
//! and one predecessor, so the graph is a disjoint union of simple paths
//! (chains) and simple cycles. Both properties are enforced at construction.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::entry::RenamePair;
use crate::errors::RenameError;

/// Injective target -> source mapping, remembering caller order.
#[derive(Debug, Clone, Default)]
pub struct RenameGraph {
    edges: HashMap<PathBuf, PathBuf>,
    order: Vec<PathBuf>,
}

/// A connected component of the graph, nodes listed in walk order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component {
    /// head -> ... -> sink. The head is only ever a target, the sink only ever a source.
    Chain(Vec<PathBuf>),
    /// seed -> ... (back to seed, not repeated).
    Cycle(Vec<PathBuf>),
}

impl Component {
    pub fn nodes(&self) -> &[PathBuf] {
        match self {
            Component::Chain(nodes) | Component::Cycle(nodes) => nodes,
        }
    }

    pub fn is_cycle(&self) -> bool {
        matches!(self, Component::Cycle(_))
    }
}

impl RenameGraph {
    /// Build from admitted pairs.
    pub fn build(pairs: &[RenamePair]) -> Result<Self, RenameError> {
        Self::from_edges(
            pairs
                .iter()
                .map(|p| (p.source.path().to_path_buf(), p.target.path().to_path_buf())),
        )
    }

    /// Build from raw `(source, target)` pairs.
    pub fn from_edges<I>(pairs: I) -> Result<Self, RenameError>
    where
        I: IntoIterator<Item = (PathBuf, PathBuf)>,
    {
        let mut graph = RenameGraph::default();
        let mut sources: HashSet<PathBuf> = HashSet::new();
        for (source, target) in pairs {
            if graph.edges.contains_key(&target) {
                return Err(RenameError::NonUniqueTarget(target));
            }
            if !sources.insert(source.clone()) {
                return Err(RenameError::NonUniqueSource(source));
            }
            graph.order.push(target.clone());
            graph.edges.insert(target, source);
        }
        Ok(graph)
    }

    /// The source that is renamed into `target`, if any.
    pub fn source_of(&self, target: &Path) -> Option<&Path> {
        self.edges.get(target).map(PathBuf::as_path)
    }

    /// True if `path` is a source or a target of any edge.
    pub fn contains(&self, path: &Path) -> bool {
        self.edges.contains_key(path) || self.edges.values().any(|s| s == path)
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Split the graph into chains (listed first) and cycles, each discovered once.
    ///
    /// Seeds are visited in insertion order. A walk that meets a node visited by an
    /// earlier walk is a longer prefix of that earlier chain, so the earlier head is
    /// replaced by the new seed. Self-loops are skipped.
    pub fn components(&self) -> Vec<Component> {
        let mut visited: HashSet<&Path> = HashSet::with_capacity(self.edges.len() * 2);
        let mut heads: Vec<&Path> = Vec::new();
        let mut seeds: Vec<&Path> = Vec::new();

        for seed in &self.order {
            let seed = seed.as_path();
            if visited.contains(seed) {
                continue;
            }
            let first = self.edges[seed].as_path();
            if first == seed {
                trace!(node = %seed.display(), "skipping self-loop");
                visited.insert(seed);
                continue;
            }
            visited.insert(seed);

            let mut node = first;
            let stop = loop {
                if node == seed {
                    break None;
                }
                let fresh = visited.insert(node);
                match self.edges.get(node) {
                    Some(next) if fresh => node = next.as_path(),
                    _ => break Some(node),
                }
            };

            match stop {
                None => seeds.push(seed),
                Some(stop) => {
                    heads.retain(|h| *h != stop);
                    heads.push(seed);
                }
            }
        }

        let chains = heads.into_iter().map(|h| Component::Chain(self.walk_chain(h)));
        let cycles = seeds.into_iter().map(|s| Component::Cycle(self.walk_cycle(s)));
        chains.chain(cycles).collect()
    }

    fn walk_chain(&self, head: &Path) -> Vec<PathBuf> {
        let mut nodes = vec![head.to_path_buf()];
        let mut node = head;
        while let Some(next) = self.source_of(node) {
            nodes.push(next.to_path_buf());
            node = next;
        }
        nodes
    }

    fn walk_cycle(&self, seed: &Path) -> Vec<PathBuf> {
        let mut nodes = vec![seed.to_path_buf()];
        let mut node = self.edges[seed].as_path();
        while node != seed {
            nodes.push(node.to_path_buf());
            node = self.edges[node].as_path();
        }
        nodes
    }
}
