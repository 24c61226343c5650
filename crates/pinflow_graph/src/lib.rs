// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dataflow graph engine for `pinflow`.
//!
//! A [`Graph`] owns named nodes, each with a fixed set of ordered input and
//! output pins, and directed edges from output pins to input pins. Values
//! are pushed through the graph synchronously:
//! - flowing into an input pin notifies the node's listeners
//! - flowing out of an output pin fans out along its edges in insertion order
//! - publishing a node flows a value out of all of its outputs in pin order
//!
//! ## Architecture
//!
//! The graph is the only owner. Pins refer back to their node by
//! [`NodeId`], and listeners receive `&Graph` when called, so there are no
//! reference cycles. Editors and other hosts register [`NodeListener`]s to
//! observe values and call [`Graph::publish`] to emit computed results.
//!
//! Propagation and traversal recurse. A guard configured through
//! [`GraphConfig`] reports cycles and excessive nesting as errors.

pub mod config;
pub mod edge;
pub mod flow;
pub mod graph;
pub mod node;
pub mod pin;
pub mod traversal;
pub mod value;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, GraphConfig};
pub use edge::{Edge, EdgeId};
pub use flow::{FlowError, FlowResult};
pub use graph::{Graph, GraphError, GraphResult, GraphStats};
pub use node::{Node, NodeId, NodeListener};
pub use pin::{Pin, PinKind, PinRef};
pub use traversal::{TraversalError, TraversalResult};
pub use value::Value;
