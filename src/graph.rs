use std::collections::{BTreeMap, BTreeSet};

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};

use crate::atom::Symbol;
use crate::config::ConnectivityConfig;
use crate::geom::Geometry;

/// Node payload: the z-matrix key the node stands for and its symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphAtom {
    pub key: usize,
    pub symbol: Symbol,
}

/// Connectivity graph over z-matrix atom keys.
///
/// Nodes are addressed by atom key, not by petgraph index, so subgraphs
/// (connected components) keep the keys of the z-matrix they came from.
/// Graphs perceived from geometry never contain placeholder atoms.
#[derive(Debug, Clone, Default)]
pub struct MolGraph {
    graph: UnGraph<GraphAtom, ()>,
    index: BTreeMap<usize, NodeIndex>,
}

impl MolGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Perceives bonds from interatomic distances.
    pub fn from_geometry(geo: &Geometry, config: &ConnectivityConfig) -> Self {
        let mut graph = Self::new();
        let atoms: Vec<(usize, Symbol, [f64; 3])> = geo
            .atoms()
            .enumerate()
            .filter(|(_, (symbol, _))| !symbol.is_placeholder())
            .map(|(key, (symbol, xyz))| (key, symbol, xyz))
            .collect();
        for &(key, symbol, _) in &atoms {
            graph.add_atom(key, symbol);
        }
        for (i, &(a, sa, xa)) in atoms.iter().enumerate() {
            for &(b, sb, xb) in &atoms[i + 1..] {
                let cutoff = match (sa.is_hydrogen(), sb.is_hydrogen()) {
                    (false, false) => config.heavy_heavy,
                    (true, true) => config.hydrogen_hydrogen,
                    _ => config.heavy_hydrogen,
                };
                if crate::geom::distance(xa, xb) <= cutoff {
                    graph.add_bond(a, b);
                }
            }
        }
        graph
    }

    /// Adds an atom, or returns the existing node for `key`.
    pub fn add_atom(&mut self, key: usize, symbol: Symbol) -> NodeIndex {
        if let Some(&idx) = self.index.get(&key) {
            return idx;
        }
        let idx = self.graph.add_node(GraphAtom { key, symbol });
        self.index.insert(key, idx);
        idx
    }

    /// Bonds two existing atoms. Returns `None` if either key is unknown.
    pub fn add_bond(&mut self, a: usize, b: usize) -> Option<EdgeIndex> {
        let (na, nb) = (self.node(a)?, self.node(b)?);
        Some(self.graph.update_edge(na, nb, ()))
    }

    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, key: usize) -> bool {
        self.index.contains_key(&key)
    }

    pub fn symbol(&self, key: usize) -> Option<Symbol> {
        self.node(key).map(|idx| self.graph[idx].symbol)
    }

    /// Atom keys in ascending order.
    pub fn atom_keys(&self) -> impl Iterator<Item = usize> + '_ {
        self.index.keys().copied()
    }

    pub fn bond_between(&self, a: usize, b: usize) -> bool {
        match (self.node(a), self.node(b)) {
            (Some(na), Some(nb)) => self.graph.find_edge(na, nb).is_some(),
            _ => false,
        }
    }

    pub fn neighbors(&self, key: usize) -> BTreeSet<usize> {
        self.node(key)
            .map(|idx| self.graph.neighbors(idx).map(|n| self.graph[n].key).collect())
            .unwrap_or_default()
    }

    pub fn atom_neighbor_keys(&self) -> BTreeMap<usize, BTreeSet<usize>> {
        self.atom_keys().map(|key| (key, self.neighbors(key))).collect()
    }

    /// Connected components, ordered by their smallest atom key.
    pub fn connected_components(&self) -> Vec<MolGraph> {
        let mut visited = vec![false; self.graph.node_count()];
        let mut components = Vec::new();
        for &start in self.index.values() {
            if visited[start.index()] {
                continue;
            }
            let mut component = Vec::new();
            let mut stack = vec![start];
            while let Some(current) = stack.pop() {
                if visited[current.index()] {
                    continue;
                }
                visited[current.index()] = true;
                component.push(current);
                for neighbor in self.graph.neighbors(current) {
                    if !visited[neighbor.index()] {
                        stack.push(neighbor);
                    }
                }
            }
            components.push(self.subgraph(&component));
        }
        components
    }

    /// The connected component containing `key`.
    pub fn component_of(&self, key: usize) -> Option<MolGraph> {
        self.connected_components()
            .into_iter()
            .find(|c| c.contains(key))
    }

    /// Longest chain starting at every atom, see [`MolGraph::longest_chain`].
    pub fn atom_longest_chains(&self) -> BTreeMap<usize, Vec<usize>> {
        self.index
            .iter()
            .map(|(&key, &idx)| (key, self.chain_from(idx)))
            .collect()
    }

    /// Longest simple path that starts at `key` and continues only through
    /// heavy atoms.
    ///
    /// The start atom itself may be a hydrogen. Among paths of equal length
    /// the lexicographically smallest key sequence is returned, which makes
    /// the result independent of insertion order.
    pub fn longest_chain(&self, key: usize) -> Option<Vec<usize>> {
        self.node(key).map(|idx| self.chain_from(idx))
    }

    fn chain_from(&self, start: NodeIndex) -> Vec<usize> {
        let mut on_path = vec![false; self.graph.node_count()];
        on_path[start.index()] = true;
        let mut path = vec![start];
        let mut best = path.clone();
        self.extend_chain(&mut path, &mut on_path, &mut best);
        best.iter().map(|&n| self.graph[n].key).collect()
    }

    fn extend_chain(
        &self,
        path: &mut Vec<NodeIndex>,
        on_path: &mut [bool],
        best: &mut Vec<NodeIndex>,
    ) {
        // only strictly longer paths replace the best one, so the first
        // longest path in ascending-key order wins
        if path.len() > best.len() {
            best.clone_from(path);
        }
        let Some(&tail) = path.last() else {
            return;
        };
        for next in self.sorted_neighbors(tail) {
            if on_path[next.index()] || !self.graph[next].symbol.is_heavy() {
                continue;
            }
            on_path[next.index()] = true;
            path.push(next);
            self.extend_chain(path, on_path, best);
            path.pop();
            on_path[next.index()] = false;
        }
    }

    fn sorted_neighbors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> = self.graph.neighbors(idx).collect();
        neighbors.sort_by_key(|&n| self.graph[n].key);
        neighbors.dedup();
        neighbors
    }

    fn node(&self, key: usize) -> Option<NodeIndex> {
        self.index.get(&key).copied()
    }

    fn subgraph(&self, nodes: &[NodeIndex]) -> MolGraph {
        let mut sub = MolGraph::new();
        let mut sorted = nodes.to_vec();
        sorted.sort_by_key(|&n| self.graph[n].key);
        for &n in &sorted {
            let atom = self.graph[n];
            sub.add_atom(atom.key, atom.symbol);
        }
        for &n in &sorted {
            let key = self.graph[n].key;
            for m in self.graph.neighbors(n) {
                let other = self.graph[m].key;
                if key < other {
                    sub.add_bond(key, other);
                }
            }
        }
        sub
    }
}
