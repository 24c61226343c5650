// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure owning nodes and edges.

use crate::config::GraphConfig;
use crate::edge::{Edge, EdgeId};
use crate::flow::FlowGuard;
use crate::node::{Node, NodeId, NodeListener};
use crate::pin::{PinKind, PinRef};
use indexmap::IndexMap;
use std::rc::Rc;

/// Result type for graph mutations
pub type GraphResult<T> = Result<T, GraphError>;

/// A dataflow graph.
///
/// Owns its nodes (which own their pins) and its edges. Both collections
/// keep insertion order, which fixes fan-out order during propagation.
/// The graph is single threaded: listeners are `Rc`s and propagation state
/// lives in a `RefCell`.
#[derive(Debug, Default)]
pub struct Graph {
    nodes: IndexMap<NodeId, Node>,
    edges: IndexMap<EdgeId, Edge>,
    config: GraphConfig,
    pub(crate) guard: FlowGuard,
}

/// Node and edge counts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphStats {
    /// Number of nodes
    pub nodes: usize,
    /// Number of edges
    pub edges: usize,
}

impl Graph {
    /// Create a new empty graph with default guards
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty graph
    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Active configuration
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Add a node with a fixed number of input and output pins
    pub fn add_node(&mut self, name: impl Into<String>, num_inputs: usize, num_outputs: usize) -> NodeId {
        let node = Node::new(name, num_inputs, num_outputs);
        let id = node.id();
        tracing::debug!(node = node.name(), %id, num_inputs, num_outputs, "add node");
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node and every edge touching one of its pins
    pub fn remove_node(&mut self, node_id: NodeId) -> GraphResult<Node> {
        if !self.nodes.contains_key(&node_id) {
            return Err(GraphError::NodeNotFound(node_id));
        }

        let before = self.edges.len();
        self.edges.retain(|_, e| !e.involves_node(node_id));
        let removed_edges = before - self.edges.len();

        let node = self
            .nodes
            .shift_remove(&node_id)
            .ok_or(GraphError::NodeNotFound(node_id))?;
        tracing::debug!(node = node.name(), %node_id, removed_edges, "remove node");
        Ok(node)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a mutable node by ID
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Get all nodes in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all node IDs
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Check that a pin exists on a node of this graph
    pub fn contains_pin(&self, pin: PinRef) -> bool {
        self.nodes
            .get(&pin.node)
            .is_some_and(|node| node.pin(pin).is_some())
    }

    /// Register a listener on a node
    pub fn add_listener(&mut self, node_id: NodeId, listener: Rc<dyn NodeListener>) -> GraphResult<()> {
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(GraphError::NodeNotFound(node_id))?;
        node.add_listener(listener);
        Ok(())
    }

    /// Remove the first registration of a listener from a node.
    ///
    /// Returns `Ok(false)` if the listener was not registered.
    pub fn remove_listener<L: NodeListener + ?Sized>(
        &mut self,
        node_id: NodeId,
        listener: &Rc<L>,
    ) -> GraphResult<bool> {
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(GraphError::NodeNotFound(node_id))?;
        Ok(node.remove_listener(listener))
    }

    /// Connect an output pin to an input pin.
    ///
    /// Several edges between the same pair of pins are allowed.
    pub fn add_edge(&mut self, source: PinRef, target: PinRef) -> GraphResult<EdgeId> {
        if source.kind != PinKind::Output || target.kind != PinKind::Input {
            return Err(GraphError::InvalidConnection { from: source, to: target });
        }
        for pin in [source, target] {
            let node = self
                .nodes
                .get(&pin.node)
                .ok_or(GraphError::NodeNotFound(pin.node))?;
            if node.pin(pin).is_none() {
                return Err(GraphError::PinNotFound(pin));
            }
        }

        let edge = Edge::new(source, target);
        let id = edge.id;
        tracing::debug!(
            source_node = self.node_name(source.node),
            source_pin = source.order,
            target_node = self.node_name(target.node),
            target_pin = target.order,
            "add edge"
        );
        self.edges.insert(id, edge);
        Ok(id)
    }

    /// Remove an edge, keeping the order of the remaining edges
    pub fn remove_edge(&mut self, edge_id: EdgeId) -> GraphResult<Edge> {
        let edge = self
            .edges
            .shift_remove(&edge_id)
            .ok_or(GraphError::EdgeNotFound(edge_id))?;
        tracing::debug!(
            source_node = self.node_name(edge.source.node),
            source_pin = edge.source.order,
            target_node = self.node_name(edge.target.node),
            target_pin = edge.target.order,
            "remove edge"
        );
        Ok(edge)
    }

    /// Get an edge by ID
    pub fn edge(&self, edge_id: EdgeId) -> Option<&Edge> {
        self.edges.get(&edge_id)
    }

    /// Get all edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Get edges touching a node
    pub fn edges_for_node(&self, node_id: NodeId) -> impl Iterator<Item = &Edge> {
        self.edges.values().filter(move |e| e.involves_node(node_id))
    }

    /// Get the number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Target pins of every edge leaving `source`, in edge order
    pub fn pin_targets(&self, source: PinRef) -> Vec<PinRef> {
        self.edges
            .values()
            .filter(|e| e.source == source)
            .map(|e| e.target)
            .collect()
    }

    /// Source pins of every edge arriving at `target`, in edge order
    pub fn pin_sources(&self, target: PinRef) -> Vec<PinRef> {
        self.edges
            .values()
            .filter(|e| e.target == target)
            .map(|e| e.source)
            .collect()
    }

    /// Nodes reached by every edge leaving any pin of `source`, in edge
    /// order. A node reached by several edges appears once per edge.
    pub fn node_targets(&self, source: NodeId) -> Vec<NodeId> {
        self.edges
            .values()
            .filter(|e| e.source.node == source)
            .map(|e| e.target.node)
            .collect()
    }

    /// Remove every node and edge
    pub fn clear(&mut self) {
        tracing::debug!(nodes = self.nodes.len(), edges = self.edges.len(), "clear graph");
        self.edges.clear();
        self.nodes.clear();
    }

    /// Log and return node and edge counts
    pub fn report(&self) -> GraphStats {
        let stats = GraphStats {
            nodes: self.nodes.len(),
            edges: self.edges.len(),
        };
        tracing::info!(nodes = stats.nodes, edges = stats.edges, "graph report");
        stats
    }

    fn node_name(&self, node_id: NodeId) -> &str {
        self.nodes.get(&node_id).map_or("?", Node::name)
    }
}

/// Error when mutating the graph
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Edge not found
    #[error("Edge not found: {0:?}")]
    EdgeNotFound(EdgeId),

    /// Pin not found on its node
    #[error("Pin not found: {0}")]
    PinNotFound(PinRef),

    /// Source is not an output pin or target is not an input pin
    #[error("Invalid connection from {from} to {to}")]
    InvalidConnection {
        /// Requested source pin
        from: PinRef,
        /// Requested target pin
        to: PinRef,
    },
}
