//! Ordered structural events over a parsed [`Definition`].
//!
//! Every port is announced first, then each binding reachable from a port
//! followed by its operations. An operation's input, output and fault events
//! always come right after the operation itself.

use tracing::trace;

use crate::{
    types::{BindingId, BindingOperationId, Definition, Direction, PortId},
    xml::Element,
};

#[derive(Debug, Clone, Copy)]
pub enum Event<'a> {
    Port {
        port: PortId,
        node: &'a Element,
    },
    Binding {
        binding: BindingId,
        node: &'a Element,
    },
    Operation {
        operation: BindingOperationId,
        node: &'a Element,
    },
    Message {
        operation: BindingOperationId,
        direction: Direction,
        node: &'a Element,
    },
    Fault {
        operation: BindingOperationId,
        name: &'a str,
        node: &'a Element,
    },
}

pub trait Listener {
    type Error;

    fn on_event(&mut self, definition: &Definition, event: Event<'_>) -> Result<(), Self::Error>;
}

impl Event<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Port { .. } => "service.port",
            Self::Binding { .. } => "binding",
            Self::Operation { .. } => "binding.operation",
            Self::Message { .. } => "binding.operation.message",
            Self::Fault { .. } => "binding.operation.fault",
        }
    }

    pub fn node(&self) -> &Element {
        match self {
            Self::Port { node, .. }
            | Self::Binding { node, .. }
            | Self::Operation { node, .. }
            | Self::Message { node, .. }
            | Self::Fault { node, .. } => *node,
        }
    }
}

impl Definition {
    pub fn events(&self) -> Vec<Event<'_>> {
        let mut events = Vec::new();
        let mut bindings = Vec::new();

        for id in self.port_ids() {
            let port = self.port(id);
            events.push(Event::Port {
                port: id,
                node: &port.node,
            });

            if !bindings.contains(&port.binding) {
                bindings.push(port.binding);
            }
        }

        for binding_id in bindings {
            let binding = self.binding(binding_id);
            events.push(Event::Binding {
                binding: binding_id,
                node: &binding.node,
            });

            for &operation_id in &binding.operations {
                let operation = self.binding_operation(operation_id);
                events.push(Event::Operation {
                    operation: operation_id,
                    node: &operation.node,
                });

                for direction in [Direction::Input, Direction::Output] {
                    if let Some(message) = operation.message(direction) {
                        events.push(Event::Message {
                            operation: operation_id,
                            direction,
                            node: &message.node,
                        });
                    }
                }

                for fault in &operation.faults {
                    events.push(Event::Fault {
                        operation: operation_id,
                        name: &fault.name,
                        node: &fault.node,
                    });
                }
            }
        }

        events
    }

    pub fn dispatch<L: Listener>(&self, listener: &mut L) -> Result<(), L::Error> {
        for event in self.events() {
            trace!(
                kind = event.kind(),
                node = %event.node().qualified_name(),
                "dispatching event"
            );
            listener.on_event(self, event)?;
        }

        Ok(())
    }
}
