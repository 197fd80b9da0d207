//! SOAP view of a WSDL document: one [`Service`] per port, carrying the
//! operations whose binding declares a SOAP `operation` element.

use std::fmt;

use soapreader_wsdl::types::{BindingOperationId, Direction, MessageId, Part, PortId};

pub const SOAP_NS: &str = "http://schemas.xmlsoap.org/wsdl/soap/";
pub const SOAP12_NS: &str = "http://schemas.xmlsoap.org/wsdl/soap12/";

pub const DEFAULT_STYLE: &str = "document";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SoapVersion {
    #[default]
    Soap11,
    Soap12,
}

/// Attributes shared by every SOAP element describing how message parts
/// travel: `body`, `header`, `headerfault` and `fault`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageBinding {
    pub namespace: Option<String>,
    /// Value of the `use` attribute, `literal` or `encoded`, as written.
    pub usage: Option<String>,
    pub encoding_style: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Body {
    pub binding: MessageBinding,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderFault {
    pub binding: MessageBinding,
    pub message: MessageId,
    pub part: Part,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub binding: MessageBinding,
    pub message: MessageId,
    pub part: Part,
    pub faults: Vec<HeaderFault>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    /// Name of the port type fault.
    pub fault: String,
    /// Name given on the binding's `fault` element.
    pub name: Option<String>,
    pub message: MessageId,
    pub body: Body,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationMessage {
    pub direction: Direction,
    pub name: Option<String>,
    pub message: Option<MessageId>,
    pub body: Option<Body>,
    pub headers: Vec<Header>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    pub binding_operation: BindingOperationId,
    pub name: String,
    pub action: Option<String>,
    /// Only ever set for SOAP 1.2 bindings.
    pub action_required: Option<bool>,
    pub style: Option<String>,
    pub input: Option<OperationMessage>,
    pub output: Option<OperationMessage>,
    pub faults: Vec<Fault>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub port: PortId,
    pub name: String,
    pub address: Option<String>,
    pub version: SoapVersion,
    pub transport: Option<String>,
    pub style: String,
    pub operations: Vec<Operation>,
}

impl SoapVersion {
    pub fn from_namespace(namespace: &str) -> Option<Self> {
        match namespace {
            SOAP_NS => Some(Self::Soap11),
            SOAP12_NS => Some(Self::Soap12),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Soap11 => "1.1",
            Self::Soap12 => "1.2",
        }
    }
}

impl fmt::Display for SoapVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Body {
    pub fn part_names(&self) -> Vec<&str> {
        self.parts.iter().map(|part| part.name.as_str()).collect()
    }
}

impl OperationMessage {
    pub fn new(direction: Direction, name: Option<String>, message: Option<MessageId>) -> Self {
        Self {
            direction,
            name,
            message,
            body: None,
            headers: Vec::new(),
        }
    }
}

impl Operation {
    pub fn new(binding_operation: BindingOperationId, name: &str) -> Self {
        Self {
            binding_operation,
            name: name.to_owned(),
            action: None,
            action_required: None,
            style: None,
            input: None,
            output: None,
            faults: Vec::new(),
        }
    }

    pub fn message(&self, direction: Direction) -> Option<&OperationMessage> {
        match direction {
            Direction::Input => self.input.as_ref(),
            Direction::Output => self.output.as_ref(),
        }
    }

    pub fn message_mut(&mut self, direction: Direction) -> &mut Option<OperationMessage> {
        match direction {
            Direction::Input => &mut self.input,
            Direction::Output => &mut self.output,
        }
    }

    pub fn fault(&self, name: &str) -> Option<&Fault> {
        self.faults.iter().find(|fault| fault.fault == name)
    }
}

impl Service {
    pub fn new(port: PortId, name: &str) -> Self {
        Self {
            port,
            name: name.to_owned(),
            address: None,
            version: SoapVersion::default(),
            transport: None,
            style: DEFAULT_STYLE.to_owned(),
            operations: Vec::new(),
        }
    }

    /// First operation with the given name. Names are only unique per
    /// binding, so this is a convenience for tests and summaries.
    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operations
            .iter()
            .find(|operation| operation.name == name)
    }

    pub fn operation_style<'a>(&'a self, operation: &'a Operation) -> &'a str {
        operation.style.as_deref().unwrap_or(&self.style)
    }
}

impl fmt::Display for MessageBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "use={}", self.usage.as_deref().unwrap_or("-"))?;

        if let Some(namespace) = &self.namespace {
            write!(f, " namespace={}", namespace)?;
        }

        if let Some(encoding_style) = &self.encoding_style {
            write!(f, " encodingStyle={}", encoding_style.join(" "))?;
        }

        Ok(())
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} (SOAP {}) {}",
            self.name,
            self.version,
            self.address.as_deref().unwrap_or("<no address>")
        )?;
        writeln!(
            f,
            "  transport: {}",
            self.transport.as_deref().unwrap_or("-")
        )?;

        for operation in &self.operations {
            writeln!(
                f,
                "  {} [{}] action={}",
                operation.name,
                self.operation_style(operation),
                operation.action.as_deref().unwrap_or("-")
            )?;

            for message in [Direction::Input, Direction::Output]
                .into_iter()
                .filter_map(|direction| operation.message(direction))
            {
                if let Some(body) = &message.body {
                    writeln!(
                        f,
                        "    {} body {} parts=[{}]",
                        message.direction,
                        body.binding,
                        body.part_names().join(", ")
                    )?;
                }

                for header in &message.headers {
                    writeln!(
                        f,
                        "    {} header {} part={} faults={}",
                        message.direction,
                        header.binding,
                        header.part.name,
                        header.faults.len()
                    )?;
                }
            }

            for fault in &operation.faults {
                writeln!(
                    f,
                    "    fault {} {}",
                    fault.name.as_deref().unwrap_or(&fault.fault),
                    fault.body.binding
                )?;
            }
        }

        Ok(())
    }
}
