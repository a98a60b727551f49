//! Cycle detection for directed and undirected graphs.
//!
//! Both DFS variants look for a back edge, i.e. an edge into a vertex that is
//! still open on the current path. The path from that vertex down to the
//! edge's source, closed by the edge itself, is the returned cycle.

use crate::error::Result;
use crate::graph::{Adjacency, Graph};
use crate::traversal::{Control, DepthFirst, Visit};
use crate::types::VertexId;
use crate::union_find::UnionFind;
use tracing::{debug, instrument};

/// Closed vertex sequence `[w, .., v, w]`; consecutive vertices are joined by edges.
pub type Cycle = Vec<VertexId>;

/// Finds a directed cycle, if any.
#[instrument(level = "debug", skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn find_directed_cycle(graph: &Graph) -> Option<Cycle> {
    find_cycle(&graph.adjacency(), false)
}

pub fn has_directed_cycle(graph: &Graph) -> bool {
    find_directed_cycle(graph).is_some()
}

/// Finds a cycle in an undirected graph, if any.
///
/// The graph must store every edge in both directions. The edge leading back
/// to the DFS parent is not a cycle, so it is skipped; a self-loop is.
#[instrument(level = "debug", skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn find_undirected_cycle(graph: &Graph) -> Option<Cycle> {
    find_cycle(&graph.adjacency(), true)
}

pub fn has_undirected_cycle(graph: &Graph) -> bool {
    find_undirected_cycle(graph).is_some()
}

/// Undirected cycle check with union-find over the deduplicated edges.
///
/// A cycle exists as soon as an edge joins two vertices that are already
/// connected. Edge direction is lost in the union, so this answers nothing
/// about directed cycles: a DAG like `0 -> 1, 0 -> 2, 1 -> 3, 2 -> 3` is
/// reported as cyclic. Use [`find_directed_cycle`] for digraphs.
pub fn has_undirected_cycle_union_find(graph: &Graph) -> Result<bool> {
    let mut uf = UnionFind::from_vertices(graph.vertices());
    for e in graph.all_edges() {
        if !uf.union(e.source, e.target)? {
            debug!(edge = %e, "edge closes a cycle");
            return Ok(true);
        }
    }
    Ok(false)
}

fn find_cycle(adj: &Adjacency, skip_parent: bool) -> Option<Cycle> {
    let mut parent = vec![usize::MAX; adj.len()];
    let mut back_edge = None;
    let mut dfs = DepthFirst::new(adj);

    for root in 0..adj.len() {
        let control = dfs.walk(root, &mut |visit| match visit {
            Visit::Tree(s, t, _) => {
                parent[t] = s;
                Control::Continue
            }
            Visit::Back(s, t, _) if skip_parent && parent[s] == t => Control::Continue,
            Visit::Back(s, t, _) => {
                back_edge = Some((s, t));
                Control::Break
            }
            _ => Control::Continue,
        });
        if control == Control::Break {
            break;
        }
    }

    let (s, t) = back_edge?;
    // climb from the source of the back edge up to its target
    let mut path = vec![s];
    let mut v = s;
    while v != t {
        v = parent[v];
        path.push(v);
    }
    path.reverse();
    path.push(t);

    let cycle: Cycle = path.into_iter().map(|p| adj.ids[p]).collect();
    debug!(?cycle, "back edge found");
    Some(cycle)
}
