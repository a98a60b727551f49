//! Connected and strongly connected components.

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::traversal::{Control, DepthFirst, Visit, postorder};
use crate::types::{VertexId, Weight};
use crate::union_find::UnionFind;
use hashbrown::HashMap;
use tracing::{debug, instrument};

/// Partition of the vertices into components.
///
/// Component ids are dense, `0..count()`. Only the induced partition is
/// meaningful when comparing results of different algorithms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Components {
    /// Vertices in graph order.
    vertices: Vec<VertexId>,
    component_of: HashMap<VertexId, usize>,
    count: usize,
}

impl Components {
    fn from_labels(vertices: Vec<VertexId>, labels: &[usize], count: usize) -> Self {
        let component_of = vertices.iter().copied().zip(labels.iter().copied()).collect();
        Self {
            vertices,
            component_of,
            count,
        }
    }

    /// Number of components.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn component_of(&self, v: VertexId) -> Option<usize> {
        self.component_of.get(&v).copied()
    }

    pub fn same_component(&self, u: VertexId, v: VertexId) -> bool {
        match (self.component_of(u), self.component_of(v)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    /// Vertex to component id mapping.
    pub fn as_map(&self) -> &HashMap<VertexId, usize> {
        &self.component_of
    }

    /// Members of every component, indexed by component id, in graph order.
    pub fn groups(&self) -> Vec<Vec<VertexId>> {
        let mut groups = vec![Vec::new(); self.count];
        for &v in &self.vertices {
            groups[self.component_of[&v]].push(v);
        }
        groups
    }

    /// Canonical form of the partition: sorted members, groups sorted.
    ///
    /// Two results describe the same partition iff their `partition()` are equal.
    pub fn partition(&self) -> Vec<Vec<VertexId>> {
        let mut groups = self.groups();
        for group in &mut groups {
            group.sort_unstable();
        }
        groups.sort_unstable();
        groups
    }
}

/// Connected components by depth-first labeling.
///
/// Edge direction is ignored, so on a directed graph this yields the weakly
/// connected components.
#[instrument(level = "debug", skip_all, fields(vertices = graph.vertex_count()))]
pub fn connected_components(graph: &Graph) -> Components {
    let adj = graph.adjacency().symmetrized();
    let mut labels = vec![usize::MAX; adj.len()];
    let mut count = 0;
    let mut dfs = DepthFirst::new(&adj);

    for root in 0..adj.len() {
        if dfs.is_visited(root) {
            continue;
        }
        dfs.walk(root, &mut |visit| {
            if let Visit::Discover(v) = visit {
                labels[v] = count;
            }
            Control::Continue
        });
        count += 1;
    }

    debug!(components = count, "dfs labeling finished");
    Components::from_labels(adj.ids, &labels, count)
}

/// Connected components by union-find over the deduplicated edges.
///
/// Yields the same partition as [`connected_components`].
#[instrument(level = "debug", skip_all, fields(vertices = graph.vertex_count()))]
pub fn connected_components_union_find(graph: &Graph) -> Components {
    let mut uf = UnionFind::from_vertices(graph.vertices());
    for e in graph.all_edges() {
        // every endpoint of a stored edge is a registered vertex
        let _ = uf.union(e.source, e.target);
    }

    let groups = uf.groups();
    let count = groups.len();
    let mut component_of = HashMap::with_capacity(uf.len());
    for (id, group) in groups.into_iter().enumerate() {
        for v in group {
            component_of.insert(v, id);
        }
    }

    debug!(components = count, "union-find labeling finished");
    Components {
        vertices: graph.vertices().collect(),
        component_of,
        count,
    }
}

/// Strongly connected components, Kosaraju's two-pass algorithm.
///
/// Pass one records the finish order of a DFS over the graph. Pass two walks
/// the transposed graph, taking roots in reverse finish order; every tree of
/// that walk is one component.
///
/// The first root of pass two lies in a source component of the condensation.
/// Transposing turns its outgoing edges into incoming ones, so the walk cannot
/// leave it, and the same holds for every later root among the remaining
/// vertices. As a consequence component ids follow a topological order of the
/// condensation: every edge between components goes from a lower id to a
/// higher one.
#[instrument(level = "debug", skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn strongly_connected_components(graph: &Graph) -> Components {
    let adj = graph.adjacency();
    let finish_order = postorder(&adj);

    let transposed = adj.transposed();
    let mut labels = vec![usize::MAX; adj.len()];
    let mut count = 0;
    let mut dfs = DepthFirst::new(&transposed);

    for &root in finish_order.iter().rev() {
        if dfs.is_visited(root) {
            continue;
        }
        dfs.walk(root, &mut |visit| {
            if let Visit::Discover(v) = visit {
                labels[v] = count;
            }
            Control::Continue
        });
        count += 1;
    }

    debug!(components = count, "kosaraju finished");
    Components::from_labels(adj.ids, &labels, count)
}

/// Condensation of `graph`: one vertex per component, edges between components.
///
/// Vertex `i` of the result stands for component `i`. Parallel edges between
/// two components collapse into one carrying the smallest weight.
pub fn condensation(graph: &Graph, components: &Components) -> Result<Graph> {
    let mut dag = Graph::new();
    for id in 0..components.count() {
        dag.add_vertex(id as VertexId);
    }

    let mut cheapest: HashMap<(usize, usize), Weight> = HashMap::new();
    let mut order = Vec::new();
    for e in graph.directed_edges() {
        let from = components
            .component_of(e.source)
            .ok_or(GraphError::UnknownVertex(e.source))?;
        let to = components
            .component_of(e.target)
            .ok_or(GraphError::UnknownVertex(e.target))?;
        if from == to {
            continue;
        }
        cheapest
            .entry((from, to))
            .and_modify(|w| *w = (*w).min(e.weight))
            .or_insert_with(|| {
                order.push((from, to));
                e.weight
            });
    }

    for (from, to) in order {
        dag.add_edge(from as VertexId, to as VertexId, cheapest[&(from, to)]);
    }
    Ok(dag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{random_directed_graph, random_undirected_graph};
    use crate::traversal::breadth_first;
    use hashbrown::HashSet;

    fn reachable(g: &Graph, from: VertexId) -> HashSet<VertexId> {
        breadth_first(g, from).unwrap().map(|s| s.vertex).collect()
    }

    #[test]
    fn test_connected_components_of_forest() {
        let mut g = Graph::new();
        g.add_undirected_edge(0, 1, 1);
        g.add_undirected_edge(1, 2, 1);
        g.add_undirected_edge(3, 4, 1);
        g.add_vertex(5);

        let cc = connected_components(&g);
        assert_eq!(cc.count(), 3);
        assert_eq!(cc.groups(), vec![vec![0, 1, 2], vec![3, 4], vec![5]]);
        assert!(cc.same_component(0, 2));
        assert!(!cc.same_component(2, 3));
        assert!(!cc.same_component(0, 42));
    }

    #[test]
    fn test_connected_components_ignore_direction() {
        // 1 -> 0 and 1 -> 2: one weak component even though 0 cannot reach 2
        let g = Graph::from_edges([(1, 0, 1), (1, 2, 1)]);
        assert_eq!(connected_components(&g).count(), 1);
        assert_eq!(connected_components_union_find(&g).count(), 1);
    }

    #[test]
    fn test_dfs_and_union_find_agree() {
        for seed in 0..30 {
            let g = random_undirected_graph(25, 15, 1..=5, seed);
            let dfs = connected_components(&g);
            let uf = connected_components_union_find(&g);
            assert_eq!(dfs.partition(), uf.partition());
            assert_eq!(dfs.count(), uf.count());
        }
    }

    #[test]
    fn test_union_find_labels_isolated_vertices() {
        let mut g = Graph::from_edges([(0, 1, 1), (2, 1, 1)]);
        g.add_vertex(7);
        let cc = connected_components_union_find(&g);
        assert_eq!(cc.partition(), vec![vec![0, 1, 2], vec![7]]);
        assert_eq!(cc.partition(), connected_components(&g).partition());
    }

    #[test]
    fn test_empty_graph() {
        let g = Graph::new();
        assert_eq!(connected_components(&g).count(), 0);
        assert_eq!(strongly_connected_components(&g).count(), 0);
    }

    #[test]
    fn test_scc_textbook_example() {
        // {0,1,2} cycle -> {3,4} cycle -> {5}
        let g = Graph::from_edges([
            (0, 1, 1),
            (1, 2, 1),
            (2, 0, 1),
            (2, 3, 1),
            (3, 4, 1),
            (4, 3, 1),
            (4, 5, 1),
        ]);
        let scc = strongly_connected_components(&g);
        assert_eq!(scc.count(), 3);
        assert_eq!(scc.partition(), vec![vec![0, 1, 2], vec![3, 4], vec![5]]);
        assert_eq!(scc.component_of(0), Some(0));
        assert_eq!(scc.component_of(3), Some(1));
        assert_eq!(scc.component_of(5), Some(2));
    }

    #[test]
    fn test_scc_matches_mutual_reachability() {
        for seed in 0..25 {
            let g = random_directed_graph(18, 30, 1..=1, seed);
            let scc = strongly_connected_components(&g);
            let reach: HashMap<VertexId, HashSet<VertexId>> =
                g.vertices().map(|v| (v, reachable(&g, v))).collect();
            for u in g.vertices() {
                for v in g.vertices() {
                    let mutual = reach[&u].contains(&v) && reach[&v].contains(&u);
                    assert_eq!(scc.same_component(u, v), mutual, "seed {seed}: {u} {v}");
                }
            }
        }
    }

    #[test]
    fn test_scc_ids_are_topological() {
        for seed in 0..25 {
            let g = random_directed_graph(20, 35, 1..=3, seed);
            let scc = strongly_connected_components(&g);
            let dag = condensation(&g, &scc).unwrap();
            assert_eq!(dag.vertex_count(), scc.count());
            for e in dag.directed_edges() {
                assert!(e.source < e.target);
            }
        }
    }

    #[test]
    fn test_condensation_keeps_cheapest_edge() {
        let g = Graph::from_edges([(0, 1, 1), (1, 0, 1), (0, 2, 7), (1, 2, 3)]);
        let scc = strongly_connected_components(&g);
        let dag = condensation(&g, &scc).unwrap();
        assert_eq!(dag.directed_edges().len(), 1);
        assert_eq!(dag.directed_edges()[0].weight, 3);
    }

    #[test]
    fn test_condensation_rejects_foreign_components() {
        let g = Graph::from_edges([(0, 1, 1)]);
        let other = strongly_connected_components(&Graph::from_edges([(0, 2, 1)]));
        assert_eq!(
            condensation(&g, &other).unwrap_err(),
            GraphError::UnknownVertex(1)
        );
    }
}
