use soapreader_wsdl::{
    error::Error as WsdlError,
    types::{BindingOperationId, Definition, Direction, Message, MessageId, Part},
    xml::Element,
};
use tracing::{debug, trace};

use super::{soap_children, soap_children_named, SoapReader};
use crate::{
    error::Error,
    model::{Body, Fault, Header, HeaderFault, MessageBinding, OperationMessage},
};

fn read_message_binding(node: &Element) -> MessageBinding {
    MessageBinding {
        namespace: node.attribute("namespace").map(ToOwned::to_owned),
        usage: node.attribute("use").map(ToOwned::to_owned),
        encoding_style: node
            .attribute("encodingStyle")
            .map(|styles| styles.split_whitespace().map(ToOwned::to_owned).collect()),
    }
}

/// Parts keep the order they have in the message, whatever order the
/// `parts` attribute lists them in.
fn read_body(message: &Message, node: &Element) -> Body {
    let parts = match node.attribute("parts") {
        Some(names) => {
            let names = names.split_whitespace().collect::<Vec<_>>();
            message
                .parts
                .iter()
                .filter(|part| names.contains(&part.name.as_str()))
                .cloned()
                .collect()
        }

        None => message.parts.clone(),
    };

    Body {
        binding: read_message_binding(node),
        parts,
    }
}

/// Resolves the `message` and `part` attributes of a `header` or
/// `headerfault`, which may name any message of the definition.
fn read_header_part(definition: &Definition, node: &Element) -> Result<(MessageId, Part), Error> {
    let name = node.split_qname(node.required_attribute("message")?)?;
    let id = definition
        .find_message(&name)
        .ok_or(WsdlError::Unresolved {
            kind: "message",
            name,
        })?;

    let message = definition.message(id);
    let part_name = node.required_attribute("part")?;
    let part = message
        .part(part_name)
        .cloned()
        .ok_or_else(|| Error::UnknownPart {
            message: message.name.clone(),
            part: part_name.to_owned(),
        })?;

    Ok((id, part))
}

fn read_header(definition: &Definition, node: &Element) -> Result<Header, Error> {
    let (message, part) = read_header_part(definition, node)?;

    let faults = soap_children_named(node, "headerfault")
        .map(|(_, child)| {
            let (message, part) = read_header_part(definition, child)?;
            Ok(HeaderFault {
                binding: read_message_binding(child),
                message,
                part,
            })
        })
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(Header {
        binding: read_message_binding(node),
        message,
        part,
        faults,
    })
}

impl SoapReader {
    pub(super) fn on_message(
        &mut self,
        definition: &Definition,
        id: BindingOperationId,
        direction: Direction,
        node: &Element,
    ) -> Result<(), Error> {
        let operation = match self.registry.operation_mut(id) {
            Some(operation) => operation,
            None => {
                trace!(
                    operation = %definition.binding_operation(id).name,
                    %direction,
                    "not a SOAP operation"
                );
                return Ok(());
            }
        };

        let message_id = definition
            .abstract_operation(id)
            .and_then(|operation| operation.message(direction))
            .map(|message| message.message);

        let mut operation_message = OperationMessage::new(
            direction,
            definition
                .binding_operation(id)
                .message(direction)
                .and_then(|message| message.name.clone()),
            message_id,
        );

        if let Some(message_id) = message_id {
            let message = definition.message(message_id);

            for (_, child) in soap_children(node) {
                match child.name.as_str() {
                    "body" => operation_message.body = Some(read_body(message, child)),
                    "header" => operation_message
                        .headers
                        .push(read_header(definition, child)?),
                    // headerfault is only meaningful inside a header
                    _ => (),
                }
            }
        }

        debug!(
            operation = %operation.name,
            %direction,
            body = operation_message.body.is_some(),
            headers = operation_message.headers.len(),
            "read operation message"
        );

        *operation.message_mut(direction) = Some(operation_message);
        Ok(())
    }

    pub(super) fn on_fault(
        &mut self,
        definition: &Definition,
        id: BindingOperationId,
        name: &str,
        node: &Element,
    ) -> Result<(), Error> {
        let binding_operation = definition.binding_operation(id);

        if !self.registry.seen_operations.contains(&id) {
            return Err(Error::OperationNotFound {
                operation: binding_operation.name.clone(),
                fault: name.to_owned(),
            });
        }

        let operation = match self.registry.operation_mut(id) {
            Some(operation) => operation,
            None => {
                trace!(operation = %binding_operation.name, fault = name, "not a SOAP operation");
                return Ok(());
            }
        };

        let abstract_fault = definition
            .abstract_operation(id)
            .and_then(|operation| operation.fault(name))
            .ok_or_else(|| Error::UnknownFault {
                operation: binding_operation.name.clone(),
                fault: name.to_owned(),
            })?;

        let message = definition.message(abstract_fault.message);

        for (_, child) in soap_children_named(node, "fault") {
            operation.faults.push(Fault {
                fault: abstract_fault.name.clone(),
                name: node.attribute("name").map(ToOwned::to_owned),
                message: abstract_fault.message,
                body: read_body(message, child),
            });
        }

        debug!(operation = %operation.name, fault = name, "read operation fault");
        Ok(())
    }
}
