//! Depth-first and breadth-first walks.
//!
//! Both walks run on an explicit stack/queue, so graph depth never touches
//! the call stack.

use crate::error::Result;
use crate::graph::{Adjacency, Graph};
use crate::types::{Edge, VertexId, Weight};
use fixedbitset::FixedBitSet;
use std::collections::VecDeque;

/// What a depth-first walk reports, in the order it happens.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DfsEvent {
    /// First time the vertex is reached.
    Discover(VertexId),
    /// Target was unvisited, the walk descends into it next.
    TreeEdge(Edge),
    /// Target is still open on the current path: the path plus this edge is a cycle.
    BackEdge(Edge),
    /// Target is already finished.
    ForwardOrCrossEdge(Edge),
    /// All outgoing edges of the vertex were examined.
    Finish(VertexId),
}

/// Returned by visitors to keep walking or stop the whole search.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Control {
    Continue,
    Break,
}

/// Runs a depth-first search over the whole graph.
///
/// Every vertex that is still unvisited starts a new tree, in insertion order.
/// Returns [`Control::Break`] if the visitor stopped the search.
pub fn depth_first_search<F>(graph: &Graph, mut visitor: F) -> Control
where
    F: FnMut(DfsEvent) -> Control,
{
    let adj = graph.adjacency();
    let mut dfs = DepthFirst::new(&adj);
    let mut on_visit = |visit: Visit| visitor(visit.resolve(&adj));
    for root in 0..adj.len() {
        if dfs.walk(root, &mut on_visit) == Control::Break {
            return Control::Break;
        }
    }
    Control::Continue
}

/// Runs a depth-first search over the vertices reachable from `root`.
pub fn depth_first_search_from<F>(graph: &Graph, root: VertexId, mut visitor: F) -> Result<Control>
where
    F: FnMut(DfsEvent) -> Control,
{
    let root = graph.position(root)?;
    let adj = graph.adjacency();
    let mut dfs = DepthFirst::new(&adj);
    Ok(dfs.walk(root, &mut |visit: Visit| visitor(visit.resolve(&adj))))
}

/// Starts a level-order walk from `source`.
pub fn breadth_first(graph: &Graph, source: VertexId) -> Result<BreadthFirst> {
    let source = graph.position(source)?;
    Ok(BreadthFirst::new(graph.adjacency(), source))
}

/// Depth-first event over dense positions.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Visit {
    Discover(usize),
    Tree(usize, usize, Weight),
    Back(usize, usize, Weight),
    Cross(usize, usize, Weight),
    Finish(usize),
}

impl Visit {
    fn resolve(self, adj: &Adjacency) -> DfsEvent {
        match self {
            Visit::Discover(v) => DfsEvent::Discover(adj.ids[v]),
            Visit::Tree(s, t, w) => DfsEvent::TreeEdge(adj.edge(s, t, w)),
            Visit::Back(s, t, w) => DfsEvent::BackEdge(adj.edge(s, t, w)),
            Visit::Cross(s, t, w) => DfsEvent::ForwardOrCrossEdge(adj.edge(s, t, w)),
            Visit::Finish(v) => DfsEvent::Finish(adj.ids[v]),
        }
    }
}

/// Depth-first walker with a frame stack of (vertex, next edge position).
///
/// The visited set is shared between calls to [`DepthFirst::walk`], so a
/// sequence of walks partitions the vertices into DFS trees.
pub(crate) struct DepthFirst<'a> {
    adj: &'a Adjacency,
    visited: FixedBitSet,
    on_stack: FixedBitSet,
    stack: Vec<(usize, usize)>,
}

impl<'a> DepthFirst<'a> {
    pub fn new(adj: &'a Adjacency) -> Self {
        Self {
            adj,
            visited: FixedBitSet::with_capacity(adj.len()),
            on_stack: FixedBitSet::with_capacity(adj.len()),
            stack: Vec::new(),
        }
    }

    pub fn is_visited(&self, v: usize) -> bool {
        self.visited.contains(v)
    }

    /// Walks the tree rooted at `root`; does nothing if `root` was visited.
    pub fn walk<F>(&mut self, root: usize, visitor: &mut F) -> Control
    where
        F: FnMut(Visit) -> Control,
    {
        if self.visited.contains(root) {
            return Control::Continue;
        }
        if self.open(root, visitor) == Control::Break {
            return self.abort();
        }

        while let Some(frame) = self.stack.last_mut() {
            let (v, pos) = *frame;
            let Some(&(t, w)) = self.adj.out[v].get(pos) else {
                self.stack.pop();
                self.on_stack.set(v, false);
                if visitor(Visit::Finish(v)) == Control::Break {
                    return self.abort();
                }
                continue;
            };
            frame.1 += 1;

            if !self.visited.contains(t) {
                if visitor(Visit::Tree(v, t, w)) == Control::Break
                    || self.open(t, visitor) == Control::Break
                {
                    return self.abort();
                }
            } else {
                let visit = if self.on_stack.contains(t) {
                    Visit::Back(v, t, w)
                } else {
                    Visit::Cross(v, t, w)
                };
                if visitor(visit) == Control::Break {
                    return self.abort();
                }
            }
        }

        Control::Continue
    }

    fn open<F>(&mut self, v: usize, visitor: &mut F) -> Control
    where
        F: FnMut(Visit) -> Control,
    {
        self.visited.insert(v);
        self.on_stack.insert(v);
        self.stack.push((v, 0));
        visitor(Visit::Discover(v))
    }

    fn abort(&mut self) -> Control {
        self.stack.clear();
        self.on_stack.clear();
        Control::Break
    }
}

/// Finish order of a full depth-first search, roots in position order.
pub(crate) fn postorder(adj: &Adjacency) -> Vec<usize> {
    let mut order = Vec::with_capacity(adj.len());
    let mut dfs = DepthFirst::new(adj);
    for root in 0..adj.len() {
        dfs.walk(root, &mut |visit| {
            if let Visit::Finish(v) = visit {
                order.push(v);
            }
            Control::Continue
        });
    }
    order
}

/// One vertex reached by a breadth-first walk.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BfsStep {
    pub vertex: VertexId,
    /// Number of edges from the source.
    pub depth: usize,
    /// Vertex this one was discovered from, `None` for the source.
    pub parent: Option<VertexId>,
}

/// Level-synchronous breadth-first iterator.
///
/// Every vertex at depth `k` is yielded before any vertex at depth `k + 1`.
pub struct BreadthFirst {
    adj: Adjacency,
    visited: FixedBitSet,
    queue: VecDeque<(usize, Option<usize>)>,
    depth: usize,
    /// Vertices of the current level still in the queue.
    level_left: usize,
}

impl BreadthFirst {
    pub(crate) fn new(adj: Adjacency, source: usize) -> Self {
        let mut visited = FixedBitSet::with_capacity(adj.len());
        visited.insert(source);
        Self {
            adj,
            visited,
            queue: VecDeque::from([(source, None)]),
            depth: 0,
            level_left: 1,
        }
    }

    /// Next vertex as `(position, depth, parent position)`.
    pub(crate) fn step(&mut self) -> Option<(usize, usize, Option<usize>)> {
        if self.level_left == 0 {
            // the queue now holds exactly the next level
            self.depth += 1;
            self.level_left = self.queue.len();
        }
        let (v, parent) = self.queue.pop_front()?;
        self.level_left -= 1;

        for &(t, _) in &self.adj.out[v] {
            if !self.visited.contains(t) {
                self.visited.insert(t);
                self.queue.push_back((t, Some(v)));
            }
        }
        Some((v, self.depth, parent))
    }
}

impl Iterator for BreadthFirst {
    type Item = BfsStep;

    fn next(&mut self) -> Option<Self::Item> {
        let (v, depth, parent) = self.step()?;
        Some(BfsStep {
            vertex: self.adj.ids[v],
            depth,
            parent: parent.map(|p| self.adj.ids[p]),
        })
    }
}
