// SPDX-License-Identifier: MIT OR Apache-2.0
//! A small sample patch and the listeners that drive it.
//!
//! ```text
//! source ──► scale ──► monitor.in0
//!    └──────────────► monitor.in1
//! ```

use pinflow_graph::{
    ConfigError, FlowError, FlowResult, Graph, GraphConfig, GraphError, Node, NodeId, NodeListener,
    PinRef, TraversalError, Value,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Error while building or driving the patch
#[derive(Debug, thiserror::Error)]
pub enum PatchError {
    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Graph mutation failed
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// Propagation failed
    #[error(transparent)]
    Flow(#[from] FlowError),

    /// Traversal failed
    #[error(transparent)]
    Traversal(#[from] TraversalError),
}

/// Multiplies numeric input and republishes it on every output
pub struct Scale {
    factor: f64,
}

impl Scale {
    /// Create a scaler
    pub fn new(factor: f64) -> Self {
        Self { factor }
    }
}

impl NodeListener for Scale {
    fn on_data(&self, graph: &Graph, node: &Node, pin: PinRef, value: &Value) -> FlowResult<()> {
        let Some(number) = value.as_f64() else {
            return Err(FlowError::listener(format!(
                "{} expects a number on {pin}, got {}",
                node.name(),
                value.type_name()
            )));
        };
        graph.publish(node.id(), &Value::Float(number * self.factor))
    }
}

/// Keeps every value it sees, tagged with the input it arrived on
#[derive(Debug, Default)]
pub struct Monitor {
    lines: RefCell<Vec<String>>,
}

impl Monitor {
    /// Lines received so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }
}

impl NodeListener for Monitor {
    fn on_data(&self, _graph: &Graph, node: &Node, pin: PinRef, value: &Value) -> FlowResult<()> {
        let line = format!("{}[{}] = {}", node.name(), pin.order, value);
        tracing::info!("{line}");
        self.lines.borrow_mut().push(line);
        Ok(())
    }
}

/// The wired sample graph
pub struct Patch {
    /// The graph itself
    pub graph: Graph,
    /// Value source, no inputs and one output
    pub source: NodeId,
    /// Scaler between source and monitor
    pub scale: NodeId,
    /// Sink with two inputs
    pub monitor: NodeId,
    /// Listener attached to the monitor
    pub sink: Rc<Monitor>,
}

impl Patch {
    /// Build the patch
    pub fn build(config: GraphConfig, factor: f64) -> Result<Self, PatchError> {
        let mut graph = Graph::with_config(config);
        let source = graph.add_node("source", 0, 1);
        let scale = graph.add_node("scale", 1, 1);
        let monitor = graph.add_node("monitor", 2, 0);

        graph.add_edge(PinRef::output(source, 0), PinRef::input(scale, 0))?;
        graph.add_edge(PinRef::output(scale, 0), PinRef::input(monitor, 0))?;
        graph.add_edge(PinRef::output(source, 0), PinRef::input(monitor, 1))?;

        let sink = Rc::new(Monitor::default());
        graph.add_listener(scale, Rc::new(Scale::new(factor)))?;
        graph.add_listener(monitor, sink.clone())?;

        Ok(Self {
            graph,
            source,
            scale,
            monitor,
            sink,
        })
    }

    /// Inject a value at the source
    pub fn send(&self, value: impl Into<Value>) -> Result<(), PatchError> {
        self.graph.publish(self.source, &value.into())?;
        Ok(())
    }

    /// Node names in post-order and recursive pre-order from the source
    pub fn orders(&self) -> Result<(Vec<String>, Vec<String>), PatchError> {
        let mut post = Vec::new();
        self.graph.dfs(self.source, |n| post.push(n.name().to_string()))?;
        let mut pre = Vec::new();
        self.graph.bfs(self.source, |n| pre.push(n.name().to_string()))?;
        Ok((post, pre))
    }
}
