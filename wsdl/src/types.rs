use std::fmt;

use crate::xml::Element;

pub const WSDL_NS: &str = "http://schemas.xmlsoap.org/wsdl/";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    pub namespace: Option<String>,
    pub name: String,
}

macro_rules! arena_id {
    ($($(#[$meta:meta])* $id:ident),* $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
            pub struct $id(usize);
        )*
    };
}

arena_id! {
    MessageId,
    PortTypeId,
    /// Identity of a `wsdl:binding`. Two bindings with the same name in
    /// different documents still get different ids.
    BindingId,
    /// Identity of one `wsdl:operation` inside a binding.
    BindingOperationId,
    ServiceId,
    PortId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Input,
    Output,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub name: String,
    pub element: Option<QName>,
    pub ty: Option<QName>,
}

#[derive(Debug, Clone)]
pub struct Message {
    pub name: QName,
    pub parts: Vec<Part>,
}

/// The `input` or `output` of an abstract operation.
#[derive(Debug, Clone)]
pub struct OperationMessage {
    pub name: Option<String>,
    pub message: MessageId,
}

#[derive(Debug, Clone)]
pub struct OperationFault {
    pub name: String,
    pub message: MessageId,
}

#[derive(Debug, Clone)]
pub struct Operation {
    pub name: String,
    pub input: Option<OperationMessage>,
    pub output: Option<OperationMessage>,
    pub faults: Vec<OperationFault>,
}

#[derive(Debug, Clone)]
pub struct PortType {
    pub name: QName,
    pub operations: Vec<Operation>,
}

#[derive(Debug, Clone)]
pub struct BindingMessage {
    pub name: Option<String>,
    pub node: Element,
}

#[derive(Debug, Clone)]
pub struct BindingFault {
    pub name: String,
    pub node: Element,
}

#[derive(Debug, Clone)]
pub struct BindingOperation {
    pub name: String,
    pub binding: BindingId,
    pub input: Option<BindingMessage>,
    pub output: Option<BindingMessage>,
    pub faults: Vec<BindingFault>,
    pub node: Element,
}

#[derive(Debug, Clone)]
pub struct Binding {
    pub name: QName,
    pub ty: QName,
    pub port_type: PortTypeId,
    pub operations: Vec<BindingOperationId>,
    pub node: Element,
}

#[derive(Debug, Clone)]
pub struct Port {
    pub name: String,
    pub service: ServiceId,
    pub binding: BindingId,
    pub node: Element,
}

#[derive(Debug, Clone)]
pub struct Service {
    pub name: QName,
    pub ports: Vec<PortId>,
}

/// Every abstract and concrete WSDL object read from a document and its
/// imports. Objects refer to each other through arena ids.
#[derive(Default, Debug, Clone)]
pub struct Definition {
    pub target_namespace: Option<String>,
    pub messages: Vec<Message>,
    pub port_types: Vec<PortType>,
    pub bindings: Vec<Binding>,
    pub binding_operations: Vec<BindingOperation>,
    pub services: Vec<Service>,
    pub ports: Vec<Port>,
}

impl QName {
    pub fn new(namespace: Option<&str>, name: &str) -> Self {
        Self {
            namespace: namespace.map(ToOwned::to_owned),
            name: name.to_owned(),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(namespace) => write!(f, "{{{}}}{}", namespace, self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Output => "output",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Message {
    pub fn part(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|part| part.name == name)
    }
}

impl Operation {
    pub fn message(&self, direction: Direction) -> Option<&OperationMessage> {
        match direction {
            Direction::Input => self.input.as_ref(),
            Direction::Output => self.output.as_ref(),
        }
    }

    pub fn fault(&self, name: &str) -> Option<&OperationFault> {
        self.faults.iter().find(|fault| fault.name == name)
    }
}

impl PortType {
    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations
            .iter()
            .find(|operation| operation.name == name)
    }
}

impl BindingOperation {
    pub fn message(&self, direction: Direction) -> Option<&BindingMessage> {
        match direction {
            Direction::Input => self.input.as_ref(),
            Direction::Output => self.output.as_ref(),
        }
    }
}

impl Definition {
    pub fn message(&self, id: MessageId) -> &Message {
        &self.messages[id.0]
    }

    pub fn port_type(&self, id: PortTypeId) -> &PortType {
        &self.port_types[id.0]
    }

    pub fn binding(&self, id: BindingId) -> &Binding {
        &self.bindings[id.0]
    }

    pub fn binding_operation(&self, id: BindingOperationId) -> &BindingOperation {
        &self.binding_operations[id.0]
    }

    pub fn service(&self, id: ServiceId) -> &Service {
        &self.services[id.0]
    }

    pub fn port(&self, id: PortId) -> &Port {
        &self.ports[id.0]
    }

    pub fn port_ids(&self) -> impl Iterator<Item = PortId> {
        (0..self.ports.len()).map(PortId)
    }

    pub fn find_message(&self, name: &QName) -> Option<MessageId> {
        self.messages
            .iter()
            .position(|message| message.name == *name)
            .map(MessageId)
    }

    pub fn find_port_type(&self, name: &QName) -> Option<PortTypeId> {
        self.port_types
            .iter()
            .position(|port_type| port_type.name == *name)
            .map(PortTypeId)
    }

    pub fn find_binding(&self, name: &QName) -> Option<BindingId> {
        self.bindings
            .iter()
            .position(|binding| binding.name == *name)
            .map(BindingId)
    }

    /// The port type operation a binding operation gives concrete shape to.
    pub fn abstract_operation(&self, id: BindingOperationId) -> Option<&Operation> {
        let operation = self.binding_operation(id);
        let binding = self.binding(operation.binding);
        self.port_type(binding.port_type).operation(&operation.name)
    }

    pub(crate) fn binding_mut(&mut self, id: BindingId) -> &mut Binding {
        &mut self.bindings[id.0]
    }

    pub(crate) fn service_mut(&mut self, id: ServiceId) -> &mut Service {
        &mut self.services[id.0]
    }

    pub(crate) fn push_message(&mut self, message: Message) -> MessageId {
        self.messages.push(message);
        MessageId(self.messages.len() - 1)
    }

    pub(crate) fn push_port_type(&mut self, port_type: PortType) -> PortTypeId {
        self.port_types.push(port_type);
        PortTypeId(self.port_types.len() - 1)
    }

    pub(crate) fn push_binding(&mut self, binding: Binding) -> BindingId {
        self.bindings.push(binding);
        BindingId(self.bindings.len() - 1)
    }

    pub(crate) fn push_binding_operation(
        &mut self,
        operation: BindingOperation,
    ) -> BindingOperationId {
        self.binding_operations.push(operation);
        BindingOperationId(self.binding_operations.len() - 1)
    }

    pub(crate) fn push_service(&mut self, service: Service) -> ServiceId {
        self.services.push(service);
        ServiceId(self.services.len() - 1)
    }

    pub(crate) fn push_port(&mut self, port: Port) -> PortId {
        self.ports.push(port);
        PortId(self.ports.len() - 1)
    }
}
