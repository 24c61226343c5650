// SPDX-License-Identifier: MIT OR Apache-2.0
//! Listener that records deliveries, shared by the unit tests.

use crate::flow::FlowResult;
use crate::graph::Graph;
use crate::node::{Node, NodeId, NodeListener};
use crate::pin::PinRef;
use crate::value::Value;
use std::cell::RefCell;

/// One `on_data` call
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Delivery {
    pub node: NodeId,
    pub pin: PinRef,
    pub value: Value,
}

#[derive(Debug, Default)]
pub(crate) struct Recorder {
    events: RefCell<Vec<Delivery>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<Delivery> {
        self.events.borrow().clone()
    }

    pub fn values(&self) -> Vec<Value> {
        self.events.borrow().iter().map(|e| e.value.clone()).collect()
    }
}

impl NodeListener for Recorder {
    fn on_data(&self, _graph: &Graph, node: &Node, pin: PinRef, value: &Value) -> FlowResult<()> {
        self.events.borrow_mut().push(Delivery {
            node: node.id(),
            pin,
            value: value.clone(),
        });
        Ok(())
    }
}
