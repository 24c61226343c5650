// SPDX-License-Identifier: MIT OR Apache-2.0
//! Read-only node visitation following edges.

use crate::graph::Graph;
use crate::node::{Node, NodeId};
use std::collections::{HashSet, VecDeque};

/// Result type for traversals
pub type TraversalResult<T> = Result<T, TraversalError>;

/// Error during traversal
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TraversalError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// A node was reached again from itself
    #[error("Cycle detected at node {0}")]
    CycleDetected(NodeId),

    /// Recursion nested deeper than the configured limit
    #[error("Traversal depth limit of {0} exceeded")]
    DepthLimitExceeded(usize),
}

#[derive(Clone, Copy)]
enum Order {
    Pre,
    Post,
}

impl Graph {
    /// Visit every node reachable from `start`, each node after all of its
    /// targets (post-order along edges).
    ///
    /// A node reachable along several paths is visited once per path.
    pub fn dfs<F>(&self, start: NodeId, mut visit: F) -> TraversalResult<()>
    where
        F: FnMut(&Node),
    {
        let mut path = Vec::new();
        self.walk(start, Order::Post, &mut path, &mut visit)
    }

    /// Visit `start`, then each target's full traversal in edge order
    /// (recursive pre-order).
    ///
    /// This is depth first despite the name; callers that depend on the
    /// historical visitation order rely on it. See [`Graph::level_order`]
    /// for a queue based breadth-first walk.
    pub fn bfs<F>(&self, start: NodeId, mut visit: F) -> TraversalResult<()>
    where
        F: FnMut(&Node),
    {
        let mut path = Vec::new();
        self.walk(start, Order::Pre, &mut path, &mut visit)
    }

    /// Visit reachable nodes level by level, each node exactly once.
    ///
    /// Cycles are harmless here since visited nodes are skipped.
    pub fn level_order<F>(&self, start: NodeId, mut visit: F) -> TraversalResult<()>
    where
        F: FnMut(&Node),
    {
        if self.node(start).is_none() {
            return Err(TraversalError::NodeNotFound(start));
        }

        let mut seen = HashSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(id) = queue.pop_front() {
            let Some(node) = self.node(id) else {
                continue;
            };
            visit(node);
            for target in self.node_targets(id) {
                if seen.insert(target) {
                    queue.push_back(target);
                }
            }
        }
        Ok(())
    }

    fn walk<F>(
        &self,
        id: NodeId,
        order: Order,
        path: &mut Vec<NodeId>,
        visit: &mut F,
    ) -> TraversalResult<()>
    where
        F: FnMut(&Node),
    {
        let node = self.node(id).ok_or(TraversalError::NodeNotFound(id))?;
        let config = self.config();
        if config.cycle_guard {
            if path.contains(&id) {
                tracing::warn!(node = node.name(), "traversal cycle detected");
                return Err(TraversalError::CycleDetected(id));
            }
        } else if path.len() >= config.max_depth {
            tracing::warn!(node = node.name(), depth = path.len(), "traversal depth limit reached");
            return Err(TraversalError::DepthLimitExceeded(config.max_depth));
        }

        if let Order::Pre = order {
            visit(node);
        }
        path.push(id);
        for target in self.node_targets(id) {
            self.walk(target, order, path, visit)?;
        }
        path.pop();
        if let Order::Post = order {
            visit(node);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GraphConfig;
    use crate::pin::PinRef;

    fn chain() -> (Graph, [NodeId; 3]) {
        let mut graph = Graph::new();
        let a = graph.add_node("A", 0, 1);
        let b = graph.add_node("B", 1, 1);
        let c = graph.add_node("C", 1, 0);
        graph.add_edge(PinRef::output(a, 0), PinRef::input(b, 0)).unwrap();
        graph.add_edge(PinRef::output(b, 0), PinRef::input(c, 0)).unwrap();
        (graph, [a, b, c])
    }

    #[test]
    fn test_dfs_is_post_order() {
        let (graph, [a, _, _]) = chain();
        let mut order = Vec::new();
        graph.dfs(a, |n| order.push(n.name().to_string())).unwrap();
        assert_eq!(order, ["C", "B", "A"]);
    }

    #[test]
    fn test_bfs_is_recursive_pre_order() {
        let (graph, [a, _, _]) = chain();
        let mut order = Vec::new();
        graph.bfs(a, |n| order.push(n.name().to_string())).unwrap();
        assert_eq!(order, ["A", "B", "C"]);
    }

    fn diamond() -> (Graph, NodeId) {
        // A -> B -> D, A -> C, C -> D
        let mut graph = Graph::new();
        let a = graph.add_node("A", 0, 1);
        let b = graph.add_node("B", 1, 1);
        let c = graph.add_node("C", 1, 1);
        let d = graph.add_node("D", 1, 0);
        graph.add_edge(PinRef::output(a, 0), PinRef::input(b, 0)).unwrap();
        graph.add_edge(PinRef::output(a, 0), PinRef::input(c, 0)).unwrap();
        graph.add_edge(PinRef::output(b, 0), PinRef::input(d, 0)).unwrap();
        graph.add_edge(PinRef::output(c, 0), PinRef::input(d, 0)).unwrap();
        (graph, a)
    }

    #[test]
    fn test_dfs_revisits_shared_descendants() {
        let (graph, a) = diamond();
        let mut order = Vec::new();
        graph.dfs(a, |n| order.push(n.name().to_string())).unwrap();
        assert_eq!(order, ["D", "B", "D", "C", "A"]);
    }

    #[test]
    fn test_bfs_revisits_shared_descendants() {
        let (graph, a) = diamond();
        let mut order = Vec::new();
        graph.bfs(a, |n| order.push(n.name().to_string())).unwrap();
        assert_eq!(order, ["A", "B", "D", "C", "D"]);
    }

    #[test]
    fn test_level_order_visits_once_per_level() {
        let (graph, a) = diamond();
        let mut order = Vec::new();
        graph.level_order(a, |n| order.push(n.name().to_string())).unwrap();
        assert_eq!(order, ["A", "B", "C", "D"]);
    }

    #[test]
    fn test_cycle_detected() {
        let mut graph = Graph::new();
        let x = graph.add_node("X", 1, 1);
        let y = graph.add_node("Y", 1, 1);
        graph.add_edge(PinRef::output(x, 0), PinRef::input(y, 0)).unwrap();
        graph.add_edge(PinRef::output(y, 0), PinRef::input(x, 0)).unwrap();

        assert_eq!(graph.dfs(x, |_| {}), Err(TraversalError::CycleDetected(x)));
        assert_eq!(graph.bfs(y, |_| {}), Err(TraversalError::CycleDetected(y)));

        let mut seen = 0;
        graph.level_order(x, |_| seen += 1).unwrap();
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_depth_limit_without_cycle_guard() {
        let mut graph = Graph::with_config(GraphConfig { cycle_guard: false, max_depth: 8 });
        let x = graph.add_node("X", 1, 1);
        graph.add_edge(PinRef::output(x, 0), PinRef::input(x, 0)).unwrap();

        assert_eq!(graph.dfs(x, |_| {}), Err(TraversalError::DepthLimitExceeded(8)));
    }

    #[test]
    fn test_deep_chain_with_default_config() {
        let mut graph = Graph::new();
        let head = graph.add_node("n0", 0, 1);
        let mut prev = head;
        for i in 1..300 {
            let next = graph.add_node(format!("n{i}"), 1, 1);
            graph.add_edge(PinRef::output(prev, 0), PinRef::input(next, 0)).unwrap();
            prev = next;
        }

        let mut visited = 0;
        graph.dfs(head, |_| visited += 1).unwrap();
        assert_eq!(visited, 300);

        let mut first = None;
        graph.bfs(head, |n| {
            first.get_or_insert_with(|| n.name().to_string());
        })
        .unwrap();
        assert_eq!(first.as_deref(), Some("n0"));
    }

    #[test]
    fn test_unknown_start() {
        let graph = Graph::new();
        let id = NodeId::new();
        assert_eq!(graph.dfs(id, |_| {}), Err(TraversalError::NodeNotFound(id)));
        assert_eq!(graph.level_order(id, |_| {}), Err(TraversalError::NodeNotFound(id)));
    }
}
