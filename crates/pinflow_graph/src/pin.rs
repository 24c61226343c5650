// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pin definitions for node inputs/outputs.

use crate::node::NodeId;
use std::fmt;

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinKind {
    /// Input pin, receives values into its node
    Input,
    /// Output pin, fans values out along edges
    Output,
}

impl fmt::Display for PinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "in"),
            Self::Output => write!(f, "out"),
        }
    }
}

/// Address of a pin: owning node, direction and position.
///
/// Stays valid until the owning node is removed from its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PinRef {
    /// Owning node
    pub node: NodeId,
    /// Direction
    pub kind: PinKind,
    /// Position among siblings of the same kind
    pub order: usize,
}

impl PinRef {
    /// Address the `order`th input pin of `node`
    pub fn input(node: NodeId, order: usize) -> Self {
        Self { node, kind: PinKind::Input, order }
    }

    /// Address the `order`th output pin of `node`
    pub fn output(node: NodeId, order: usize) -> Self {
        Self { node, kind: PinKind::Output, order }
    }

    /// Check if this is an input pin
    pub fn is_input(&self) -> bool {
        self.kind == PinKind::Input
    }

    /// Check if this is an output pin
    pub fn is_output(&self) -> bool {
        self.kind == PinKind::Output
    }
}

impl fmt::Display for PinRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}{}", self.node, self.kind, self.order)
    }
}

/// A pin on a node.
///
/// Pins are allocated with their node and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    kind: PinKind,
    order: usize,
    node: NodeId,
}

impl Pin {
    pub(crate) fn new(kind: PinKind, node: NodeId, order: usize) -> Self {
        Self { kind, order, node }
    }

    /// Pin direction
    pub fn kind(&self) -> PinKind {
        self.kind
    }

    /// Position among siblings of the same kind
    pub fn order(&self) -> usize {
        self.order
    }

    /// Owning node
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Address of this pin
    pub fn pin_ref(&self) -> PinRef {
        PinRef { node: self.node, kind: self.kind, order: self.order }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pin_ref_matches_pin() {
        let node = NodeId::new();
        let pin = Pin::new(PinKind::Output, node, 2);
        assert_eq!(pin.pin_ref(), PinRef::output(node, 2));
        assert!(pin.pin_ref().is_output());
        assert!(!pin.pin_ref().is_input());
    }

    #[test]
    fn test_same_order_different_kind_is_distinct() {
        let node = NodeId::new();
        assert_ne!(PinRef::input(node, 0), PinRef::output(node, 0));
    }
}
