//! Single-source shortest paths: BFS, Dijkstra and Bellman-Ford.
//!
//! Distance tables start at [`UNREACHED`], a sentinel well below
//! `Weight::MAX`, and relaxation saturates, so no sum can overflow. A path
//! whose weight reaches the sentinel counts as unreachable. Sums below
//! `Weight::MIN` clamp to it, so with negative weights that large
//! [`bellman_ford`] reports `Weight::MIN` rather than the true distance.

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::traversal::BreadthFirst;
use crate::types::{UNIT_WEIGHT, VertexId, Weight};
use fixedbitset::FixedBitSet;
use hashbrown::HashMap;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use tracing::{debug, instrument, trace};

/// Distance of a vertex that has not been reached.
pub const UNREACHED: Weight = Weight::MAX / 4;

/// A walk through the graph and its total weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    /// Source first, target last.
    pub vertices: Vec<VertexId>,
    pub weight: Weight,
}

impl Path {
    /// Number of edges on the path.
    pub fn hops(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }
}

/// Distances and predecessors from one source.
///
/// Only reached vertices have a distance. Following predecessors from any of
/// them leads back to the source along a shortest path.
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    source: usize,
    ids: Vec<VertexId>,
    slot: HashMap<VertexId, usize>,
    distance: Vec<Weight>,
    predecessor: Vec<Option<usize>>,
}

impl ShortestPaths {
    fn new(ids: Vec<VertexId>, source: usize) -> Self {
        let n = ids.len();
        let slot = ids.iter().enumerate().map(|(i, &v)| (v, i)).collect();
        let mut distance = vec![UNREACHED; n];
        distance[source] = 0;
        Self {
            source,
            ids,
            slot,
            distance,
            predecessor: vec![None; n],
        }
    }

    pub fn source(&self) -> VertexId {
        self.ids[self.source]
    }

    /// Shortest distance to `v`, `None` if unreachable or unknown.
    pub fn distance(&self, v: VertexId) -> Option<Weight> {
        let &i = self.slot.get(&v)?;
        (self.distance[i] < UNREACHED).then_some(self.distance[i])
    }

    /// Vertex preceding `v` on its shortest path; `None` for the source.
    pub fn predecessor(&self, v: VertexId) -> Option<VertexId> {
        let &i = self.slot.get(&v)?;
        self.predecessor[i].map(|p| self.ids[p])
    }

    pub fn is_reachable(&self, v: VertexId) -> bool {
        self.distance(v).is_some()
    }

    /// Reached vertices with their distances, in graph order.
    pub fn distances(&self) -> impl Iterator<Item = (VertexId, Weight)> + '_ {
        self.ids
            .iter()
            .zip(&self.distance)
            .filter(|&(_, &d)| d < UNREACHED)
            .map(|(&v, &d)| (v, d))
    }

    /// Vertex to distance mapping of every reached vertex.
    pub fn distance_map(&self) -> HashMap<VertexId, Weight> {
        self.distances().collect()
    }

    /// Vertex to predecessor mapping; the source has no entry.
    pub fn predecessor_map(&self) -> HashMap<VertexId, VertexId> {
        self.ids
            .iter()
            .zip(&self.predecessor)
            .filter_map(|(&v, p)| p.map(|p| (v, self.ids[p])))
            .collect()
    }

    /// Rebuilds the shortest path to `target` from the predecessor chain.
    pub fn path_to(&self, target: VertexId) -> Result<Path> {
        let &t = self
            .slot
            .get(&target)
            .ok_or(GraphError::UnknownVertex(target))?;
        let unreachable = GraphError::Unreachable {
            from: self.source(),
            to: target,
        };
        if self.distance[t] >= UNREACHED {
            return Err(unreachable);
        }

        let mut vertices = vec![target];
        let mut v = t;
        while v != self.source {
            v = self.predecessor[v].ok_or_else(|| unreachable.clone())?;
            vertices.push(self.ids[v]);
        }
        vertices.reverse();
        Ok(Path {
            vertices,
            weight: self.distance[t],
        })
    }

    /// Forgets every vertex outside `keep`.
    fn retain(&mut self, keep: &FixedBitSet) {
        for v in 0..self.ids.len() {
            if !keep.contains(v) {
                self.distance[v] = UNREACHED;
                self.predecessor[v] = None;
            }
        }
    }
}

/// Hop distances from `source`, every edge counting [`UNIT_WEIGHT`].
#[instrument(level = "debug", skip_all, fields(vertices = graph.vertex_count(), source))]
pub fn bfs(graph: &Graph, source: VertexId) -> Result<ShortestPaths> {
    let start = graph.position(source)?;
    let adj = graph.adjacency();
    let mut paths = ShortestPaths::new(adj.ids.clone(), start);

    let mut walk = BreadthFirst::new(adj, start);
    while let Some((v, depth, parent)) = walk.step() {
        paths.distance[v] = depth as Weight * UNIT_WEIGHT;
        paths.predecessor[v] = parent;
    }
    Ok(paths)
}

/// Fewest-hop path from `source` to `target`.
///
/// The walk stops the first time `target` is dequeued; its level is the
/// length of the path.
#[instrument(level = "debug", skip_all, fields(source, target))]
pub fn bfs_shortest_path(graph: &Graph, source: VertexId, target: VertexId) -> Result<Path> {
    let start = graph.position(source)?;
    let goal = graph.position(target)?;
    let adj = graph.adjacency();
    let mut paths = ShortestPaths::new(adj.ids.clone(), start);

    let mut walk = BreadthFirst::new(adj, start);
    while let Some((v, depth, parent)) = walk.step() {
        paths.distance[v] = depth as Weight * UNIT_WEIGHT;
        paths.predecessor[v] = parent;
        if v == goal {
            debug!(depth, "target dequeued");
            return paths.path_to(target);
        }
    }

    debug!("queue exhausted before reaching the target");
    Err(GraphError::Unreachable {
        from: source,
        to: target,
    })
}

/// Dijkstra configuration.
#[derive(Debug, Clone, Default)]
pub struct DijkstraConfig {
    /// Stop once this vertex is settled.
    pub target: Option<VertexId>,
}

impl DijkstraConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target(mut self, target: VertexId) -> Self {
        self.target = Some(target);
        self
    }
}

/// Dijkstra's algorithm over the whole graph.
pub fn dijkstra(graph: &Graph, source: VertexId) -> Result<ShortestPaths> {
    dijkstra_with_config(graph, source, &DijkstraConfig::default())
}

/// Dijkstra's algorithm with a binary heap.
///
/// Every edge weight must be non-negative, otherwise the call fails with
/// [`GraphError::NegativeWeight`] before any work is done. The heap may hold
/// several entries for one vertex; only the first pop settles it and the rest
/// are skipped. With a target set, the search stops when the target is
/// settled and the result holds only the settled vertices.
#[instrument(level = "debug", skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count(), source))]
pub fn dijkstra_with_config(
    graph: &Graph,
    source: VertexId,
    config: &DijkstraConfig,
) -> Result<ShortestPaths> {
    let start = graph.position(source)?;
    let goal = config.target.map(|t| graph.position(t)).transpose()?;
    let adj = graph.adjacency();
    if let Some((s, t, weight)) = adj.edges().find(|&(_, _, w)| w < 0) {
        return Err(GraphError::NegativeWeight {
            from: adj.ids[s],
            to: adj.ids[t],
            weight,
        });
    }

    let mut paths = ShortestPaths::new(adj.ids.clone(), start);
    let mut settled = FixedBitSet::with_capacity(adj.len());
    let mut heap: BinaryHeap<Reverse<(Weight, usize)>> = BinaryHeap::from([Reverse((0, start))]);

    while let Some(Reverse((d, v))) = heap.pop() {
        if settled.contains(v) {
            continue;
        }
        settled.insert(v);
        if Some(v) == goal {
            debug!(distance = d, "target settled");
            paths.retain(&settled);
            return Ok(paths);
        }

        for &(t, w) in &adj.out[v] {
            let candidate = d.saturating_add(w);
            if candidate < paths.distance[t] {
                trace!(vertex = adj.ids[t], distance = candidate, "relaxed");
                paths.distance[t] = candidate;
                paths.predecessor[t] = Some(v);
                heap.push(Reverse((candidate, t)));
            }
        }
    }

    debug!(settled = settled.count_ones(..), "heap exhausted");
    Ok(paths)
}

/// Bellman-Ford: shortest paths with negative weights allowed.
///
/// Runs at most `|V| - 1` rounds of relaxing every edge, stopping early once a
/// round changes nothing. If one more round still improves a distance, a
/// negative cycle is reachable from `source` and the call fails with
/// [`GraphError::NegativeCycle`]. The reported vertex lies on that cycle.
#[instrument(level = "debug", skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count(), source))]
pub fn bellman_ford(graph: &Graph, source: VertexId) -> Result<ShortestPaths> {
    let start = graph.position(source)?;
    let adj = graph.adjacency();
    let n = adj.len();
    let edges: Vec<_> = adj.edges().collect();
    let mut paths = ShortestPaths::new(adj.ids.clone(), start);

    let relax_all = |paths: &mut ShortestPaths| {
        let mut last_relaxed = None;
        for &(s, t, w) in &edges {
            if paths.distance[s] >= UNREACHED {
                continue;
            }
            let candidate = paths.distance[s].saturating_add(w);
            if candidate < paths.distance[t] {
                paths.distance[t] = candidate;
                paths.predecessor[t] = Some(s);
                last_relaxed = Some(t);
            }
        }
        last_relaxed
    };

    for round in 1..n {
        if relax_all(&mut paths).is_none() {
            debug!(round, "no distance changed, stopping early");
            return Ok(paths);
        }
    }

    let Some(relaxed) = relax_all(&mut paths) else {
        return Ok(paths);
    };
    // n steps back along the predecessors cannot all be off the cycle
    let mut v = relaxed;
    for _ in 0..n {
        match paths.predecessor[v] {
            Some(p) => v = p,
            None => break,
        }
    }
    let vertex = adj.ids[v];
    debug!(vertex, "negative cycle reachable from the source");
    Err(GraphError::NegativeCycle { vertex })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{grid_graph, random_connected_graph, random_directed_graph};

    fn assert_valid_path(g: &Graph, path: &Path) {
        let mut weight = 0;
        for pair in path.vertices.windows(2) {
            let best = g
                .edges_from(pair[0])
                .iter()
                .filter(|e| e.target == pair[1])
                .map(|e| e.weight)
                .min();
            weight += best.unwrap_or_else(|| panic!("{} -> {} is not an edge", pair[0], pair[1]));
        }
        assert_eq!(weight, path.weight);
    }

    #[test]
    fn test_dijkstra_takes_the_detour() {
        let g = Graph::from_edges([(0, 1, 4), (0, 2, 1), (2, 1, 2)]);
        let paths = dijkstra(&g, 0).unwrap();
        assert_eq!(paths.distance(1), Some(3));
        assert_eq!(paths.predecessor(1), Some(2));
        assert_eq!(
            paths.path_to(1).unwrap(),
            Path {
                vertices: vec![0, 2, 1],
                weight: 3
            }
        );
        assert_eq!(paths.path_to(0).unwrap().hops(), 0);
    }

    #[test]
    fn test_dijkstra_rejects_negative_weights() {
        let g = Graph::from_edges([(0, 1, 4), (1, 2, -1)]);
        assert_eq!(
            dijkstra(&g, 0).unwrap_err(),
            GraphError::NegativeWeight {
                from: 1,
                to: 2,
                weight: -1
            }
        );
    }

    #[test]
    fn test_dijkstra_stops_at_target() {
        let g = Graph::from_edges([(0, 1, 1), (1, 2, 1), (2, 3, 1)]);
        let paths = dijkstra_with_config(&g, 0, &DijkstraConfig::new().with_target(1)).unwrap();
        assert_eq!(paths.distance(1), Some(1));
        assert_eq!(paths.distance(2), None);
        assert_eq!(paths.distance(3), None);

        let full = dijkstra(&g, 0).unwrap();
        assert_eq!(full.distance(3), Some(3));
    }

    #[test]
    fn test_unknown_vertices() {
        let g = Graph::from_edges([(0, 1, 1)]);
        assert_eq!(dijkstra(&g, 7).unwrap_err(), GraphError::UnknownVertex(7));
        assert_eq!(bellman_ford(&g, 7).unwrap_err(), GraphError::UnknownVertex(7));
        assert_eq!(bfs(&g, 7).unwrap_err(), GraphError::UnknownVertex(7));
        assert_eq!(
            bfs_shortest_path(&g, 0, 7).unwrap_err(),
            GraphError::UnknownVertex(7)
        );
        let config = DijkstraConfig::new().with_target(9);
        assert_eq!(
            dijkstra_with_config(&g, 0, &config).unwrap_err(),
            GraphError::UnknownVertex(9)
        );
        assert_eq!(
            dijkstra(&g, 0).unwrap().path_to(9).unwrap_err(),
            GraphError::UnknownVertex(9)
        );
    }

    #[test]
    fn test_unreachable_target() {
        let mut g = Graph::from_edges([(0, 1, 1), (2, 0, 1)]);
        g.add_vertex(3);
        let unreachable = GraphError::Unreachable { from: 0, to: 2 };

        let paths = dijkstra(&g, 0).unwrap();
        assert!(!paths.is_reachable(2));
        assert_eq!(paths.path_to(2).unwrap_err(), unreachable);
        assert_eq!(bellman_ford(&g, 0).unwrap().path_to(2).unwrap_err(), unreachable);
        assert_eq!(bfs_shortest_path(&g, 0, 2).unwrap_err(), unreachable);
        assert_eq!(paths.distance_map().len(), 2);
    }

    #[test]
    fn test_bellman_ford_negative_edge() {
        let g = Graph::from_edges([(0, 1, 4), (0, 2, 1), (2, 1, -2), (1, 3, 1)]);
        let paths = bellman_ford(&g, 0).unwrap();
        assert_eq!(paths.distance(1), Some(-1));
        assert_eq!(paths.distance(3), Some(0));
        assert_eq!(paths.path_to(3).unwrap().vertices, vec![0, 2, 1, 3]);
    }

    #[test]
    fn test_bellman_ford_reports_negative_cycle() {
        // 1 -> 2 -> 1 weighs 2 - 5 = -3
        let g = Graph::from_edges([(0, 1, 1), (1, 2, 2), (2, 1, -5), (2, 3, 1)]);
        match bellman_ford(&g, 0) {
            Err(GraphError::NegativeCycle { vertex }) => assert!(vertex == 1 || vertex == 2),
            other => panic!("expected a negative cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_bellman_ford_ignores_unreachable_negative_cycle() {
        let g = Graph::from_edges([(0, 1, 3), (2, 3, -4), (3, 2, 1)]);
        let paths = bellman_ford(&g, 0).unwrap();
        assert_eq!(paths.distance(1), Some(3));
        assert_eq!(paths.distance(2), None);
        assert!(bellman_ford(&g, 2).is_err());
    }

    #[test]
    fn test_negative_sums_clamp_at_the_minimum() {
        let g = Graph::from_edges([(0, 1, Weight::MIN), (1, 2, -1)]);
        let paths = bellman_ford(&g, 0).unwrap();
        assert_eq!(paths.distance(1), Some(Weight::MIN));
        assert_eq!(paths.distance(2), Some(Weight::MIN));
    }

    #[test]
    fn test_extreme_weights_do_not_overflow() {
        let g = Graph::from_edges([(0, 1, Weight::MAX), (1, 2, Weight::MAX), (0, 2, 5)]);
        let paths = dijkstra(&g, 0).unwrap();
        assert_eq!(paths.distance(1), None);
        assert_eq!(paths.distance(2), Some(5));
        assert_eq!(bellman_ford(&g, 0).unwrap().distance_map(), paths.distance_map());
    }

    #[test]
    fn test_dijkstra_matches_bellman_ford() {
        for seed in 0..30 {
            let g = random_directed_graph(30, 90, 0..=20, seed);
            let fast = dijkstra(&g, 0).unwrap();
            let slow = bellman_ford(&g, 0).unwrap();
            assert_eq!(fast.distance_map(), slow.distance_map(), "seed {seed}");
            for (v, _) in fast.distances() {
                assert_valid_path(&g, &fast.path_to(v).unwrap());
                assert_valid_path(&g, &slow.path_to(v).unwrap());
            }
        }
    }

    #[test]
    fn test_bfs_matches_dijkstra_on_unit_weights() {
        for seed in 0..20 {
            let g = random_connected_graph(25, 40, 1..=1, seed);
            let hops = bfs(&g, 3).unwrap();
            assert_eq!(hops.distance_map(), dijkstra(&g, 3).unwrap().distance_map());
            assert_eq!(hops.distances().count(), 25);
        }
    }

    #[test]
    fn test_bfs_shortest_path_on_grid() {
        let g = grid_graph(3, 4);
        let path = bfs_shortest_path(&g, 0, 11).unwrap();
        assert_eq!(path.hops(), 5);
        assert_eq!(path.weight, 5);
        assert_valid_path(&g, &path);
        assert_eq!(bfs_shortest_path(&g, 5, 5).unwrap().vertices, vec![5]);
    }

    #[test]
    fn test_bfs_predecessors() {
        let g = Graph::from_edges([(0, 1, 9), (0, 2, 9), (1, 3, 9), (2, 3, 9)]);
        let hops = bfs(&g, 0).unwrap();
        assert_eq!(hops.distance(3), Some(2));
        assert_eq!(hops.predecessor(3), Some(1));
        assert_eq!(hops.predecessor(0), None);
        assert_eq!(hops.predecessor_map().len(), 3);
        assert_eq!(hops.source(), 0);
    }
}
