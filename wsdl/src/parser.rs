use quick_xml::Reader;
use std::{collections::HashSet, io::BufReader};
use tracing::{debug, trace};
use url::Url;

use super::{
    error,
    types::{
        Binding, BindingFault, BindingMessage, BindingOperation, Definition, Message,
        Operation, OperationFault, OperationMessage, Part, Port, PortType, QName, Service,
        WSDL_NS,
    },
    xml::{self, Element},
};

struct Document {
    url: Option<Url>,
    root: Element,
}

impl Document {
    fn target_namespace(&self) -> Option<&str> {
        self.root.attribute("targetNamespace")
    }
}

#[derive(Default)]
struct Loader {
    documents: Vec<Document>,
    visited: HashSet<Url>,
}

fn resolve_import(base: Option<&Url>, location: &str) -> Result<Url, error::Error> {
    match Url::parse(location) {
        Ok(url) => Ok(url),

        Err(url::ParseError::RelativeUrlWithoutBase) => match base {
            Some(base) => Ok(base.join(location)?),
            None => Err(error::Error::RelativeImport(location.to_owned())),
        },

        Err(err) => Err(err.into()),
    }
}

fn read_url(url: &Url) -> Result<Element, error::Error> {
    debug!(%url, "reading WSDL document");

    match url.scheme() {
        "file" => xml::read_document(
            Reader::from_file(
                url.to_file_path()
                    .map_err(|()| error::Error::PathConversionError(None))?,
            )
            .map_err(error::Error::FileOpenError)?,
        ),

        "http" | "https" => xml::read_document(Reader::from_reader(BufReader::new(
            reqwest::blocking::get(url.clone())?.error_for_status()?,
        ))),

        other => Err(error::Error::UnsupportedScheme(other.into())),
    }
}

impl Loader {
    fn load_url(&mut self, url: Url) -> Result<(), error::Error> {
        if !self.visited.insert(url.clone()) {
            trace!(%url, "document already loaded");
            return Ok(());
        }

        let root = read_url(&url)?;
        self.add(Some(url), root)
    }

    fn add(&mut self, url: Option<Url>, root: Element) -> Result<(), error::Error> {
        if !root.is(WSDL_NS, "definitions") {
            return Err(error::Error::UnexpectedRoot(root.qualified_name()));
        }

        let imports = root
            .children_named(WSDL_NS, "import")
            .filter_map(|import| import.attribute("location"))
            .map(|location| resolve_import(url.as_ref(), location))
            .collect::<Result<Vec<_>, _>>()?;

        self.documents.push(Document { url, root });

        for import in imports {
            self.load_url(import)?;
        }

        Ok(())
    }
}

struct Parser {
    definition: Definition,
}

impl Parser {
    fn new() -> Self {
        Self {
            definition: Default::default(),
        }
    }

    fn resolve_message(&self, node: &Element) -> Result<OperationMessage, error::Error> {
        let name = node.split_qname(node.required_attribute("message")?)?;
        let message = self
            .definition
            .find_message(&name)
            .ok_or(error::Error::Unresolved {
                kind: "message",
                name,
            })?;

        Ok(OperationMessage {
            name: node.attribute("name").map(ToOwned::to_owned),
            message,
        })
    }

    fn read_part(node: &Element) -> Result<Part, error::Error> {
        Ok(Part {
            name: node.required_attribute("name")?.to_owned(),
            element: node
                .attribute("element")
                .map(|element| node.split_qname(element))
                .transpose()?,
            ty: node
                .attribute("type")
                .map(|ty| node.split_qname(ty))
                .transpose()?,
        })
    }

    fn read_messages(&mut self, document: &Document) -> Result<(), error::Error> {
        for message in document.root.children_named(WSDL_NS, "message") {
            let name = QName::new(
                document.target_namespace(),
                message.required_attribute("name")?,
            );

            let parts = message
                .children_named(WSDL_NS, "part")
                .map(Self::read_part)
                .collect::<Result<Vec<_>, _>>()?;

            trace!(%name, parts = parts.len(), "message");
            self.definition.push_message(Message { name, parts });
        }

        Ok(())
    }

    fn read_operation(&self, node: &Element) -> Result<Operation, error::Error> {
        let input = node
            .children_named(WSDL_NS, "input")
            .next()
            .map(|input| self.resolve_message(input))
            .transpose()?;

        let output = node
            .children_named(WSDL_NS, "output")
            .next()
            .map(|output| self.resolve_message(output))
            .transpose()?;

        let faults = node
            .children_named(WSDL_NS, "fault")
            .map(|fault| {
                let name = fault.required_attribute("name")?.to_owned();
                let message = self.resolve_message(fault)?.message;
                Ok(OperationFault { name, message })
            })
            .collect::<Result<Vec<_>, error::Error>>()?;

        Ok(Operation {
            name: node.required_attribute("name")?.to_owned(),
            input,
            output,
            faults,
        })
    }

    fn read_port_types(&mut self, document: &Document) -> Result<(), error::Error> {
        for port_type in document.root.children_named(WSDL_NS, "portType") {
            let name = QName::new(
                document.target_namespace(),
                port_type.required_attribute("name")?,
            );

            let operations = port_type
                .children_named(WSDL_NS, "operation")
                .map(|operation| self.read_operation(operation))
                .collect::<Result<Vec<_>, _>>()?;

            trace!(%name, operations = operations.len(), "port type");
            self.definition
                .push_port_type(PortType { name, operations });
        }

        Ok(())
    }

    fn read_bindings(&mut self, document: &Document) -> Result<(), error::Error> {
        for binding in document.root.children_named(WSDL_NS, "binding") {
            let name = QName::new(
                document.target_namespace(),
                binding.required_attribute("name")?,
            );

            let ty = binding.split_qname(binding.required_attribute("type")?)?;
            let port_type = self
                .definition
                .find_port_type(&ty)
                .ok_or_else(|| error::Error::Unresolved {
                    kind: "port type",
                    name: ty.clone(),
                })?;

            trace!(%name, port_type = %ty, "binding");
            let id = self.definition.push_binding(Binding {
                name,
                ty,
                port_type,
                operations: Vec::new(),
                node: binding.clone(),
            });

            for operation in binding.children_named(WSDL_NS, "operation") {
                let binding_message = |node: &Element| BindingMessage {
                    name: node.attribute("name").map(ToOwned::to_owned),
                    node: node.clone(),
                };

                let faults = operation
                    .children_named(WSDL_NS, "fault")
                    .map(|fault| {
                        Ok(BindingFault {
                            name: fault.required_attribute("name")?.to_owned(),
                            node: fault.clone(),
                        })
                    })
                    .collect::<Result<Vec<_>, error::Error>>()?;

                let operation_id = self.definition.push_binding_operation(BindingOperation {
                    name: operation.required_attribute("name")?.to_owned(),
                    binding: id,
                    input: operation
                        .children_named(WSDL_NS, "input")
                        .next()
                        .map(binding_message),
                    output: operation
                        .children_named(WSDL_NS, "output")
                        .next()
                        .map(binding_message),
                    faults,
                    node: operation.clone(),
                });

                self.definition.binding_mut(id).operations.push(operation_id);
            }
        }

        Ok(())
    }

    fn read_services(&mut self, document: &Document) -> Result<(), error::Error> {
        for service in document.root.children_named(WSDL_NS, "service") {
            let name = QName::new(
                document.target_namespace(),
                service.required_attribute("name")?,
            );

            trace!(%name, "service");
            let id = self.definition.push_service(Service {
                name,
                ports: Vec::new(),
            });

            for port in service.children_named(WSDL_NS, "port") {
                let binding_name = port.split_qname(port.required_attribute("binding")?)?;
                let binding = self
                    .definition
                    .find_binding(&binding_name)
                    .ok_or(error::Error::Unresolved {
                        kind: "binding",
                        name: binding_name,
                    })?;

                let port_id = self.definition.push_port(Port {
                    name: port.required_attribute("name")?.to_owned(),
                    service: id,
                    binding,
                    node: port.clone(),
                });

                self.definition.service_mut(id).ports.push(port_id);
            }
        }

        Ok(())
    }

    /// Each pass runs over every document before the next one starts, so
    /// references may point into imported documents regardless of order.
    fn parse(mut self, documents: &[Document]) -> Result<Definition, error::Error> {
        self.definition.target_namespace = documents
            .first()
            .and_then(|document| document.target_namespace())
            .map(ToOwned::to_owned);

        for document in documents {
            debug!(url = ?document.url.as_ref().map(Url::as_str), "reading messages");
            self.read_messages(document)?;
        }

        for document in documents {
            self.read_port_types(document)?;
        }

        for document in documents {
            self.read_bindings(document)?;
        }

        for document in documents {
            self.read_services(document)?;
        }

        debug!(
            messages = self.definition.messages.len(),
            bindings = self.definition.bindings.len(),
            ports = self.definition.ports.len(),
            "finished parsing definition"
        );

        Ok(self.definition)
    }
}

pub fn parse(url: Url) -> Result<Definition, error::Error> {
    let mut loader = Loader::default();
    loader.load_url(url)?;
    Parser::new().parse(&loader.documents)
}

pub fn parse_str(document: &str) -> Result<Definition, error::Error> {
    let mut loader = Loader::default();
    loader.add(None, xml::read_str(document)?)?;
    Parser::new().parse(&loader.documents)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"<?xml version="1.0"?>
<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"
             xmlns:tns="urn:calc"
             xmlns:xsd="http://www.w3.org/2001/XMLSchema"
             targetNamespace="urn:calc">
  <message name="AddRequest">
    <part name="a" type="xsd:int"/>
    <part name="b" type="xsd:int"/>
  </message>
  <message name="AddResponse">
    <part name="result" type="xsd:int"/>
  </message>
  <message name="Overflow">
    <part name="detail" element="tns:OverflowDetail"/>
  </message>
  <portType name="CalcPortType">
    <operation name="Add">
      <documentation>Adds two numbers</documentation>
      <input message="tns:AddRequest"/>
      <output name="AddOut" message="tns:AddResponse"/>
      <fault name="overflow" message="tns:Overflow"/>
    </operation>
  </portType>
  <binding name="CalcBinding" type="tns:CalcPortType">
    <operation name="Add">
      <input/>
      <output name="AddOut"/>
      <fault name="overflow"/>
    </operation>
  </binding>
  <service name="Calc">
    <port name="CalcPort" binding="tns:CalcBinding"/>
  </service>
</definitions>"#;

    #[test]
    fn test_parse_definition() {
        let definition = parse_str(DOCUMENT).unwrap();
        assert_eq!(definition.target_namespace.as_deref(), Some("urn:calc"));
        assert_eq!(definition.messages.len(), 3);

        let request = definition
            .find_message(&QName::new(Some("urn:calc"), "AddRequest"))
            .unwrap();
        let names = definition
            .message(request)
            .parts
            .iter()
            .map(|part| part.name.as_str())
            .collect::<Vec<_>>();
        assert_eq!(names, ["a", "b"]);
        assert_eq!(
            definition.message(request).parts[0].ty,
            Some(QName::new(Some("http://www.w3.org/2001/XMLSchema"), "int"))
        );

        let port_type = &definition.port_types[0];
        let add = port_type.operation("Add").unwrap();
        assert_eq!(add.input.as_ref().unwrap().message, request);
        assert_eq!(add.output.as_ref().unwrap().name.as_deref(), Some("AddOut"));
        assert!(add.fault("overflow").is_some());
        assert!(add.fault("underflow").is_none());
    }

    #[test]
    fn test_parse_bindings_and_ports() {
        let definition = parse_str(DOCUMENT).unwrap();
        let port = &definition.ports[0];
        assert_eq!(port.name, "CalcPort");

        let binding = definition.binding(port.binding);
        assert_eq!(binding.name, QName::new(Some("urn:calc"), "CalcBinding"));
        assert_eq!(binding.operations.len(), 1);

        let operation = definition.binding_operation(binding.operations[0]);
        assert_eq!(operation.name, "Add");
        assert!(operation.input.is_some());
        assert_eq!(
            operation.output.as_ref().unwrap().name.as_deref(),
            Some("AddOut")
        );
        assert_eq!(operation.faults[0].name, "overflow");

        let abstract_operation = definition
            .abstract_operation(binding.operations[0])
            .unwrap();
        assert_eq!(abstract_operation.name, "Add");
    }

    #[test]
    fn test_unresolved_message() {
        let document = DOCUMENT.replace("tns:AddResponse", "tns:Missing");
        let err = parse_str(&document).unwrap_err();
        assert!(matches!(
            err,
            error::Error::Unresolved { kind: "message", .. }
        ));
    }

    #[test]
    fn test_unresolved_binding() {
        let document = DOCUMENT.replace("binding=\"tns:CalcBinding\"", "binding=\"tns:Other\"");
        assert!(matches!(
            parse_str(&document),
            Err(error::Error::Unresolved { kind: "binding", .. })
        ));
    }

    #[test]
    fn test_unexpected_root() {
        assert!(matches!(
            parse_str("<schema/>"),
            Err(error::Error::UnexpectedRoot(name)) if name == "schema"
        ));
    }

    #[test]
    fn test_relative_import_needs_base() {
        let document = r#"<definitions xmlns="http://schemas.xmlsoap.org/wsdl/">
  <import namespace="urn:other" location="other.wsdl"/>
</definitions>"#;

        assert!(matches!(
            parse_str(document),
            Err(error::Error::RelativeImport(location)) if location == "other.wsdl"
        ));
    }

    #[test]
    fn test_resolve_import() {
        let base = Url::parse("http://example.com/wsdl/main.wsdl").unwrap();
        assert_eq!(
            resolve_import(Some(&base), "types/messages.wsdl")
                .unwrap()
                .as_str(),
            "http://example.com/wsdl/types/messages.wsdl"
        );
        assert_eq!(
            resolve_import(None, "file:///tmp/a.wsdl").unwrap().as_str(),
            "file:///tmp/a.wsdl"
        );
    }
}
