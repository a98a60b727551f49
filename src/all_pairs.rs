//! All-pairs shortest paths (Floyd-Warshall).

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::shortest_path::{Path, UNREACHED};
use crate::types::{VertexId, Weight};
use hashbrown::HashMap;
use tracing::{debug, instrument};

/// Distance matrix plus the table needed to rebuild every path.
#[derive(Debug, Clone)]
pub struct AllPairsShortestPaths {
    ids: Vec<VertexId>,
    slot: HashMap<VertexId, usize>,
    dist: Vec<Vec<Weight>>,
    /// Last intermediate vertex that improved `dist[i][j]`, `None` for a direct edge.
    via: Vec<Vec<Option<usize>>>,
}

impl AllPairsShortestPaths {
    /// Vertices in matrix order.
    pub fn vertices(&self) -> &[VertexId] {
        &self.ids
    }

    /// Shortest distance from `u` to `v`, `Ok(None)` if there is no path.
    pub fn distance(&self, u: VertexId, v: VertexId) -> Result<Option<Weight>> {
        let d = self.dist[self.slot(u)?][self.slot(v)?];
        Ok((d < UNREACHED).then_some(d))
    }

    /// Shortest path from `u` to `v`.
    ///
    /// `(i, j)` splits into `(i, k)` and `(k, j)` at its intermediate vertex
    /// `k` until every piece is a direct edge. Pieces are kept on an explicit
    /// stack, left piece on top.
    pub fn path(&self, u: VertexId, v: VertexId) -> Result<Path> {
        let (i, j) = (self.slot(u)?, self.slot(v)?);
        if self.dist[i][j] >= UNREACHED {
            return Err(GraphError::Unreachable { from: u, to: v });
        }

        let mut vertices = vec![u];
        if i != j {
            let mut pieces = vec![(i, j)];
            while let Some((a, b)) = pieces.pop() {
                match self.via[a][b] {
                    Some(k) => {
                        pieces.push((k, b));
                        pieces.push((a, k));
                    }
                    None => vertices.push(self.ids[b]),
                }
            }
        }
        Ok(Path {
            vertices,
            weight: self.dist[i][j],
        })
    }

    fn slot(&self, v: VertexId) -> Result<usize> {
        self.slot.get(&v).copied().ok_or(GraphError::UnknownVertex(v))
    }
}

/// Floyd-Warshall.
///
/// Starts from the cheapest direct edge between every ordered pair, then lets
/// each vertex `k` in turn serve as an intermediate:
/// `dist[i][j] = min(dist[i][j], dist[i][k] + dist[k][j])`. A negative entry
/// on the diagonal after the last round means a negative cycle, reported as
/// [`GraphError::NegativeCycle`].
#[instrument(level = "debug", skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn floyd_warshall(graph: &Graph) -> Result<AllPairsShortestPaths> {
    let adj = graph.adjacency();
    let n = adj.len();
    let mut dist = vec![vec![UNREACHED; n]; n];
    for (i, row) in dist.iter_mut().enumerate() {
        row[i] = 0;
    }
    for (s, t, w) in adj.edges() {
        dist[s][t] = dist[s][t].min(w);
    }
    let mut via = vec![vec![None; n]; n];

    for k in 0..n {
        for i in 0..n {
            let ik = dist[i][k];
            if ik >= UNREACHED {
                continue;
            }
            for j in 0..n {
                let kj = dist[k][j];
                if kj >= UNREACHED {
                    continue;
                }
                let candidate = ik.saturating_add(kj);
                if candidate < dist[i][j] {
                    dist[i][j] = candidate;
                    via[i][j] = Some(k);
                }
            }
        }
    }

    if let Some(i) = (0..n).find(|&i| dist[i][i] < 0) {
        let vertex = adj.ids[i];
        debug!(vertex, "negative diagonal entry");
        return Err(GraphError::NegativeCycle { vertex });
    }

    let slot = adj.ids.iter().enumerate().map(|(i, &v)| (v, i)).collect();
    Ok(AllPairsShortestPaths {
        ids: adj.ids,
        slot,
        dist,
        via,
    })
}
