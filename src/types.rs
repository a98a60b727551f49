/// Integer identity of a vertex.
pub type VertexId = u32;

/// Edge weight. Unweighted algorithms treat every edge as weight 1.
pub type Weight = i64;

/// Weight used by breadth-first algorithms for a single hop.
pub const UNIT_WEIGHT: Weight = 1;

/// Directed weighted edge.
///
/// Undirected relations are stored as two edges, `(u, v)` and `(v, u)`, with
/// the same weight.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Edge {
    pub source: VertexId,
    pub target: VertexId,
    pub weight: Weight,
}

impl Edge {
    pub fn new(source: VertexId, target: VertexId, weight: Weight) -> Self {
        Self {
            source,
            target,
            weight,
        }
    }

    /// Same edge with source and target swapped.
    pub fn reversed(&self) -> Self {
        Self::new(self.target, self.source, self.weight)
    }

    /// Compares endpoints as an unordered pair, ignoring weight.
    pub fn same_endpoints(&self, other: &Edge) -> bool {
        (self.source == other.source && self.target == other.target)
            || (self.source == other.target && self.target == other.source)
    }

    /// Unordered endpoint pair, smaller id first.
    pub(crate) fn endpoint_key(&self) -> (VertexId, VertexId) {
        if self.source <= self.target {
            (self.source, self.target)
        } else {
            (self.target, self.source)
        }
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {} ({})", self.source, self.target, self.weight)
    }
}
