//! Correlation of WSDL events into the SOAP model.
//!
//! Events only carry arena ids, so every lookup between a port, its binding
//! and the binding's operations goes through the [`Registry`] maps keyed by
//! those ids. Names are never used for correlation.

mod message;
mod operation;
mod service;

use std::collections::{HashMap, HashSet};

use soapreader_wsdl::{
    types::{BindingId, BindingOperationId, Definition, PortId},
    xml::Element,
    Event, Listener,
};

use crate::{
    error::Error,
    model::{Operation, Service, SoapVersion},
};

#[derive(Debug, Clone, Copy)]
struct OperationKey {
    service: usize,
    operation: usize,
}

/// `services_by_binding` and `services_by_port` are written on port events
/// only, `operations` on binding operation events only.
#[derive(Debug, Default)]
struct Registry {
    services: Vec<Service>,
    services_by_binding: HashMap<BindingId, usize>,
    services_by_port: HashMap<PortId, usize>,
    operations: HashMap<BindingOperationId, OperationKey>,
    seen_operations: HashSet<BindingOperationId>,
}

impl Registry {
    fn service_by_binding_mut(&mut self, binding: BindingId) -> Option<&mut Service> {
        let index = *self.services_by_binding.get(&binding)?;
        self.services.get_mut(index)
    }

    fn register_operation(&mut self, service: usize, operation: Operation) {
        let id = operation.binding_operation;
        let operations = &mut self.services[service].operations;
        operations.push(operation);

        self.operations.insert(
            id,
            OperationKey {
                service,
                operation: operations.len() - 1,
            },
        );
    }

    fn operation_mut(&mut self, id: BindingOperationId) -> Option<&mut Operation> {
        let key = *self.operations.get(&id)?;
        self.services
            .get_mut(key.service)?
            .operations
            .get_mut(key.operation)
    }
}

/// Builds the SOAP services of a definition while listening to its events.
#[derive(Debug, Default)]
pub struct SoapReader {
    registry: Registry,
}

impl SoapReader {
    pub fn new() -> Self {
        Default::default()
    }

    /// Dispatches every event of `definition` to a fresh reader.
    pub fn read(definition: &Definition) -> Result<Self, Error> {
        let mut reader = Self::new();
        definition.dispatch(&mut reader)?;
        Ok(reader)
    }

    pub fn service_by_port(&self, port: PortId) -> Option<&Service> {
        let index = *self.registry.services_by_port.get(&port)?;
        self.registry.services.get(index)
    }

    /// Services in the order their ports were discovered.
    pub fn services(&self) -> &[Service] {
        &self.registry.services
    }

    pub fn into_services(self) -> Vec<Service> {
        self.registry.services
    }
}

impl Listener for SoapReader {
    type Error = Error;

    fn on_event(&mut self, definition: &Definition, event: Event<'_>) -> Result<(), Error> {
        match event {
            Event::Port { port, node } => self.on_port(definition, port, node),
            Event::Binding { binding, node } => self.on_binding(definition, binding, node),
            Event::Operation { operation, node } => {
                self.on_operation(definition, operation, node)
            }
            Event::Message {
                operation,
                direction,
                node,
            } => self.on_message(definition, operation, direction, node),
            Event::Fault {
                operation,
                name,
                node,
            } => self.on_fault(definition, operation, name, node),
        }
    }
}

/// Direct children living in one of the SOAP binding namespaces, paired with
/// the SOAP version that namespace stands for.
fn soap_children(node: &Element) -> impl Iterator<Item = (SoapVersion, &Element)> + '_ {
    node.children.iter().filter_map(|child| {
        child
            .namespace
            .as_deref()
            .and_then(SoapVersion::from_namespace)
            .map(|version| (version, child))
    })
}

fn soap_children_named<'a>(
    node: &'a Element,
    name: &'a str,
) -> impl Iterator<Item = (SoapVersion, &'a Element)> + 'a {
    soap_children(node).filter(move |(_, child)| child.name == name)
}
