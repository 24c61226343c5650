// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions and listener registration.

use crate::flow::{FlowError, FlowResult};
use crate::graph::Graph;
use crate::pin::{Pin, PinKind, PinRef};
use crate::value::Value;
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Observer notified whenever a value flows into one of a node's input pins.
///
/// Listeners run synchronously on the propagating call stack and receive the
/// graph, so they may `publish` or `flow` again from inside the callback.
/// An error returned here aborts the rest of the propagation and is handed
/// back to whoever started it.
pub trait NodeListener {
    /// Called with the receiving node, the input pin the value arrived on,
    /// and the value itself.
    fn on_data(&self, graph: &Graph, node: &Node, pin: PinRef, value: &Value) -> FlowResult<()>;
}

impl<F> NodeListener for F
where
    F: Fn(&Graph, &Node, PinRef, &Value) -> FlowResult<()>,
{
    fn on_data(&self, graph: &Graph, node: &Node, pin: PinRef, value: &Value) -> FlowResult<()> {
        self(graph, node, pin, value)
    }
}

/// A node instance in the graph
pub struct Node {
    id: NodeId,
    name: String,
    inputs: Vec<Pin>,
    outputs: Vec<Pin>,
    listeners: Vec<Rc<dyn NodeListener>>,
}

impl Node {
    /// Create a node with a fixed pin layout
    pub(crate) fn new(name: impl Into<String>, num_inputs: usize, num_outputs: usize) -> Self {
        let id = NodeId::new();
        Self {
            id,
            name: name.into(),
            inputs: (0..num_inputs).map(|i| Pin::new(PinKind::Input, id, i)).collect(),
            outputs: (0..num_outputs).map(|i| Pin::new(PinKind::Output, id, i)).collect(),
            listeners: Vec::new(),
        }
    }

    /// Node ID
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Display name, not required to be unique
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the node
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Input pins in order
    pub fn inputs(&self) -> &[Pin] {
        &self.inputs
    }

    /// Output pins in order
    pub fn outputs(&self) -> &[Pin] {
        &self.outputs
    }

    /// Get an input pin by index
    pub fn input(&self, index: usize) -> Option<&Pin> {
        self.inputs.get(index)
    }

    /// Get an output pin by index
    pub fn output(&self, index: usize) -> Option<&Pin> {
        self.outputs.get(index)
    }

    /// Look up a pin by address
    pub fn pin(&self, pin: PinRef) -> Option<&Pin> {
        if pin.node != self.id {
            return None;
        }
        match pin.kind {
            PinKind::Input => self.inputs.get(pin.order),
            PinKind::Output => self.outputs.get(pin.order),
        }
    }

    /// Get all pins, inputs first
    pub fn pins(&self) -> impl Iterator<Item = &Pin> {
        self.inputs.iter().chain(self.outputs.iter())
    }

    /// Register a listener. The same listener may be registered more than
    /// once and is then notified once per registration.
    pub fn add_listener(&mut self, listener: Rc<dyn NodeListener>) {
        self.listeners.push(listener);
    }

    /// Remove the first registration of `listener`.
    ///
    /// Returns `false` if it was not registered.
    pub fn remove_listener<L: NodeListener + ?Sized>(&mut self, listener: &Rc<L>) -> bool {
        let target = Rc::as_ptr(listener);
        match self
            .listeners
            .iter()
            .position(|l| std::ptr::addr_eq(Rc::as_ptr(l), target))
        {
            Some(index) => {
                self.listeners.remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of registered listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Deliver a value that arrived on one of this node's input pins.
    ///
    /// Listeners are notified in registration order. Nothing is forwarded to
    /// the outputs; a listener that wants to emit calls [`Graph::publish`].
    pub fn flow(&self, graph: &Graph, source: PinRef, value: &Value) -> FlowResult<()> {
        if !source.is_input() || self.pin(source).is_none() {
            return Err(FlowError::PinNotFound(source));
        }
        for listener in &self.listeners {
            listener.on_data(graph, self, source, value)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("inputs", &self.inputs.len())
            .field("outputs", &self.outputs.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Recorder;

    #[test]
    fn test_pin_layout() {
        let node = Node::new("mixer", 3, 2);
        assert_eq!(node.inputs().len(), 3);
        assert_eq!(node.outputs().len(), 2);
        for (i, pin) in node.inputs().iter().enumerate() {
            assert_eq!(pin.kind(), PinKind::Input);
            assert_eq!(pin.order(), i);
            assert_eq!(pin.node(), node.id());
        }
        for (i, pin) in node.outputs().iter().enumerate() {
            assert_eq!(pin.kind(), PinKind::Output);
            assert_eq!(pin.order(), i);
        }
        assert!(node.input(3).is_none());
        assert_eq!(node.pins().count(), 5);
    }

    #[test]
    fn test_rename_keeps_pins() {
        let mut node = Node::new("old", 1, 1);
        node.set_name("new");
        assert_eq!(node.name(), "new");
        assert_eq!(node.pins().count(), 2);
    }

    #[test]
    fn test_pin_lookup_rejects_foreign_node() {
        let node = Node::new("a", 1, 1);
        let other = NodeId::new();
        assert!(node.pin(PinRef::input(node.id(), 0)).is_some());
        assert!(node.pin(PinRef::input(other, 0)).is_none());
        assert!(node.pin(PinRef::output(node.id(), 1)).is_none());
    }

    #[test]
    fn test_listener_registration() {
        let mut node = Node::new("a", 1, 0);
        let recorder = Rc::new(Recorder::default());

        node.add_listener(recorder.clone());
        node.add_listener(recorder.clone());
        assert_eq!(node.listener_count(), 2);

        assert!(node.remove_listener(&recorder));
        assert_eq!(node.listener_count(), 1);
        assert!(node.remove_listener(&recorder));
        // Not registered any more, removal is a no-op
        assert!(!node.remove_listener(&recorder));
        assert_eq!(node.listener_count(), 0);
    }

    #[test]
    fn test_duplicate_listener_notified_per_registration() {
        let mut graph = Graph::new();
        let id = graph.add_node("sink", 1, 0);
        let recorder = Rc::new(Recorder::default());
        let node = graph.node_mut(id).unwrap();
        node.add_listener(recorder.clone());
        node.add_listener(recorder.clone());

        graph.flow(PinRef::input(id, 0), &Value::from(7)).unwrap();
        assert_eq!(recorder.values(), vec![Value::Int(7), Value::Int(7)]);
    }

    #[test]
    fn test_flow_rejects_output_pin() {
        let graph = Graph::new();
        let node = Node::new("a", 1, 1);
        let err = node.flow(&graph, PinRef::output(node.id(), 0), &Value::Null).unwrap_err();
        assert!(matches!(err, FlowError::PinNotFound(_)));
    }

    #[test]
    fn test_closure_listener() {
        let mut graph = Graph::new();
        let id = graph.add_node("sink", 1, 0);
        let seen = Rc::new(std::cell::RefCell::new(Vec::new()));
        let sink = seen.clone();
        graph
            .add_listener(
                id,
                Rc::new(move |_: &Graph, node: &Node, _: PinRef, value: &Value| -> FlowResult<()> {
                    sink.borrow_mut().push(format!("{}={}", node.name(), value));
                    Ok(())
                }),
            )
            .unwrap();

        graph.flow(PinRef::input(id, 0), &Value::from("x")).unwrap();
        assert_eq!(*seen.borrow(), vec!["sink=x".to_string()]);
    }
}
