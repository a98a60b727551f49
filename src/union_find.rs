//! Union-Find (disjoint set forest).
//!
//! Uses path compression and union by rank, which together give near
//! constant amortized cost per operation.

use crate::error::{GraphError, Result};
use crate::types::VertexId;
use hashbrown::HashMap;

/// Disjoint set forest over vertex ids.
#[derive(Debug, Clone, Default)]
pub struct UnionFind {
    /// Maps a vertex id to its slot.
    slot: HashMap<VertexId, usize>,
    ids: Vec<VertexId>,
    /// `parent[i] == i` for roots.
    parent: Vec<usize>,
    /// Upper bound on subtree height, only grows.
    rank: Vec<u32>,
    components: usize,
}

impl UnionFind {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forest with one singleton set per vertex.
    pub fn from_vertices<I>(vertices: I) -> Self
    where
        I: IntoIterator<Item = VertexId>,
    {
        let mut uf = Self::new();
        for v in vertices {
            uf.make(v);
        }
        uf
    }

    /// Registers `v` as a singleton set. Returns `false` if it already exists.
    pub fn make(&mut self, v: VertexId) -> bool {
        if self.slot.contains_key(&v) {
            return false;
        }
        let i = self.ids.len();
        self.slot.insert(v, i);
        self.ids.push(v);
        self.parent.push(i);
        self.rank.push(0);
        self.components += 1;
        true
    }

    pub fn contains(&self, v: VertexId) -> bool {
        self.slot.contains_key(&v)
    }

    /// Number of registered vertices.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Number of disjoint sets.
    pub fn component_count(&self) -> usize {
        self.components
    }

    /// Representative of the set containing `v`.
    pub fn find(&mut self, v: VertexId) -> Result<VertexId> {
        let i = self.slot_of(v)?;
        let root = self.find_slot(i);
        Ok(self.ids[root])
    }

    /// Merges the sets of `v` and `w`.
    ///
    /// Returns `true` if two distinct sets were merged.
    pub fn union(&mut self, v: VertexId, w: VertexId) -> Result<bool> {
        let a = self.slot_of(v)?;
        let b = self.slot_of(w)?;
        let root_a = self.find_slot(a);
        let root_b = self.find_slot(b);
        if root_a == root_b {
            return Ok(false);
        }

        match self.rank[root_a].cmp(&self.rank[root_b]) {
            std::cmp::Ordering::Less => self.parent[root_a] = root_b,
            std::cmp::Ordering::Greater => self.parent[root_b] = root_a,
            std::cmp::Ordering::Equal => {
                self.parent[root_b] = root_a;
                self.rank[root_a] += 1;
            }
        }

        self.components -= 1;
        Ok(true)
    }

    pub fn connected(&mut self, v: VertexId, w: VertexId) -> Result<bool> {
        Ok(self.find(v)? == self.find(w)?)
    }

    /// Vertices grouped by set, groups ordered by their first registered member.
    pub fn groups(&mut self) -> Vec<Vec<VertexId>> {
        let mut group_of_root: HashMap<usize, usize> = HashMap::new();
        let mut groups: Vec<Vec<VertexId>> = Vec::new();
        for i in 0..self.ids.len() {
            let root = self.find_slot(i);
            let g = *group_of_root.entry(root).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[g].push(self.ids[i]);
        }
        groups
    }

    fn slot_of(&self, v: VertexId) -> Result<usize> {
        self.slot.get(&v).copied().ok_or(GraphError::UnknownVertex(v))
    }

    fn find_slot(&mut self, i: usize) -> usize {
        let mut root = i;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        // point every node on the walked path straight at the root
        let mut node = i;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }

        root
    }
}
