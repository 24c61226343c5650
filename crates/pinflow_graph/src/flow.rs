// SPDX-License-Identifier: MIT OR Apache-2.0
//! Value propagation along pins and edges.
//!
//! Propagation is synchronous and depth first: an output pin hands the value
//! to each connected input pin in edge-insertion order, each input pin hands
//! it to its node's listeners, and a listener may publish again before the
//! next edge is visited.

use crate::config::GraphConfig;
use crate::graph::Graph;
use crate::node::NodeId;
use crate::pin::{PinKind, PinRef};
use crate::value::Value;
use std::cell::RefCell;

/// Result type for propagation
pub type FlowResult<T> = Result<T, FlowError>;

/// Error during propagation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FlowError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Pin not found on its node, or of the wrong kind for the call
    #[error("Pin not found: {0}")]
    PinNotFound(PinRef),

    /// A value re-entered a pin that was still propagating
    #[error("Cycle detected at pin {0}")]
    CycleDetected(PinRef),

    /// Propagation nested deeper than the configured limit
    #[error("Propagation depth limit of {0} exceeded")]
    DepthLimitExceeded(usize),

    /// Failure raised by a listener
    #[error("{0}")]
    Listener(String),
}

impl FlowError {
    /// Build a listener failure from any message
    pub fn listener(message: impl Into<String>) -> Self {
        Self::Listener(message.into())
    }
}

/// Pins currently on the propagation call stack.
#[derive(Debug, Default)]
pub(crate) struct FlowGuard {
    active: RefCell<Vec<PinRef>>,
}

impl FlowGuard {
    fn enter(&self, pin: PinRef, config: &GraphConfig) -> FlowResult<FlowScope<'_>> {
        let mut active = self.active.borrow_mut();
        // Endless recursion always repeats a pin, so depth only matters unguarded
        if config.cycle_guard {
            if active.contains(&pin) {
                tracing::warn!(%pin, "propagation cycle detected");
                return Err(FlowError::CycleDetected(pin));
            }
        } else if active.len() >= config.max_depth {
            tracing::warn!(%pin, depth = active.len(), "propagation depth limit reached");
            return Err(FlowError::DepthLimitExceeded(config.max_depth));
        }
        active.push(pin);
        Ok(FlowScope { guard: self })
    }

    /// Current nesting depth
    pub(crate) fn depth(&self) -> usize {
        self.active.borrow().len()
    }
}

struct FlowScope<'a> {
    guard: &'a FlowGuard,
}

impl Drop for FlowScope<'_> {
    fn drop(&mut self) {
        self.guard.active.borrow_mut().pop();
    }
}

impl Graph {
    /// Push a value through a pin.
    ///
    /// An input pin delivers the value to its node's listeners. An output
    /// pin forwards it to every connected input pin in edge-insertion order.
    pub fn flow(&self, pin: PinRef, value: &Value) -> FlowResult<()> {
        let node = self.node(pin.node).ok_or(FlowError::NodeNotFound(pin.node))?;
        if node.pin(pin).is_none() {
            return Err(FlowError::PinNotFound(pin));
        }

        let _scope = self.guard.enter(pin, self.config())?;
        match pin.kind {
            PinKind::Input => {
                tracing::trace!(node = node.name(), %pin, kind = value.type_name(), "flow into node");
                node.flow(self, pin, value)
            }
            PinKind::Output => {
                let targets = self.pin_targets(pin);
                tracing::trace!(node = node.name(), %pin, targets = targets.len(), "flow out of pin");
                for target in targets {
                    self.flow(target, value)?;
                }
                Ok(())
            }
        }
    }

    /// Flow a value out of every output pin of a node, in pin order.
    pub fn publish(&self, node_id: NodeId, value: &Value) -> FlowResult<()> {
        let node = self.node(node_id).ok_or(FlowError::NodeNotFound(node_id))?;
        tracing::trace!(node = node.name(), kind = value.type_name(), "publish");
        for pin in node.outputs() {
            self.flow(pin.pin_ref(), value)?;
        }
        Ok(())
    }

    /// Nesting depth of the propagation currently running, zero when idle
    pub fn flow_depth(&self) -> usize {
        self.guard.depth()
    }
}
