// SPDX-License-Identifier: MIT OR Apache-2.0
//! Edge definitions for the graph.

use crate::node::NodeId;
use crate::pin::PinRef;
use std::fmt;
use uuid::Uuid;

/// Unique identifier for an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeId(pub Uuid);

impl EdgeId {
    /// Create a new random edge ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EdgeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A directed connection from an output pin to an input pin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    /// Unique edge ID
    pub id: EdgeId,
    /// Output pin the edge leaves from
    pub source: PinRef,
    /// Input pin the edge arrives at
    pub target: PinRef,
}

impl Edge {
    pub(crate) fn new(source: PinRef, target: PinRef) -> Self {
        Self {
            id: EdgeId::new(),
            source,
            target,
        }
    }

    /// Check if this edge involves a specific node
    pub fn involves_node(&self, node_id: NodeId) -> bool {
        self.source.node == node_id || self.target.node == node_id
    }

    /// Check if this edge involves a specific pin
    pub fn involves_pin(&self, pin: PinRef) -> bool {
        self.source == pin || self.target == pin
    }
}
