//! Bipartiteness check by two-coloring.

use crate::graph::Graph;
use crate::traversal::{Control, DepthFirst, Visit};
use crate::types::VertexId;
use tracing::{debug, instrument};

/// Two sides of a bipartite graph; every edge joins `left` and `right`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Bipartition {
    pub left: Vec<VertexId>,
    pub right: Vec<VertexId>,
}

/// Two-colors the graph, or returns `None` if it is not bipartite.
///
/// Every newly discovered vertex gets the opposite color of the vertex it was
/// reached from. An edge between two vertices of the same color rules the
/// graph out. Every component is colored, and the root of each starts on the
/// left side. Edge direction is ignored.
#[instrument(level = "debug", skip_all, fields(vertices = graph.vertex_count(), edges = graph.edge_count()))]
pub fn bipartition(graph: &Graph) -> Option<Bipartition> {
    let adj = graph.adjacency().symmetrized();
    let mut color: Vec<Option<bool>> = vec![None; adj.len()];
    let mut dfs = DepthFirst::new(&adj);

    for root in 0..adj.len() {
        let control = dfs.walk(root, &mut |visit| match visit {
            Visit::Discover(v) => {
                color[v].get_or_insert(false);
                Control::Continue
            }
            Visit::Tree(s, t, _) => {
                color[t] = color[s].map(|c| !c);
                Control::Continue
            }
            Visit::Back(s, t, _) | Visit::Cross(s, t, _) if color[s] == color[t] => {
                debug!(u = adj.ids[s], v = adj.ids[t], "edge joins two vertices of one color");
                Control::Break
            }
            _ => Control::Continue,
        });
        if control == Control::Break {
            return None;
        }
    }

    let mut sides = Bipartition::default();
    for (v, c) in adj.ids.iter().zip(&color) {
        if *c == Some(true) {
            sides.right.push(*v);
        } else {
            sides.left.push(*v);
        }
    }
    Some(sides)
}

pub fn is_bipartite(graph: &Graph) -> bool {
    bipartition(graph).is_some()
}
