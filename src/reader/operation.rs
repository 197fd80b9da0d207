use soapreader_wsdl::{
    types::{BindingOperationId, Definition, Direction},
    xml::Element,
};
use tracing::debug;

use super::{soap_children_named, SoapReader};
use crate::{
    error::Error,
    model::{Operation, OperationMessage, SoapVersion},
};

fn action_required(value: &str) -> bool {
    matches!(value, "true" | "1")
}

impl SoapReader {
    pub(super) fn on_operation(
        &mut self,
        definition: &Definition,
        id: BindingOperationId,
        node: &Element,
    ) -> Result<(), Error> {
        self.registry.seen_operations.insert(id);

        let binding_operation = definition.binding_operation(id);
        let abstract_operation = definition.abstract_operation(id);
        let mut operation = Operation::new(id, &binding_operation.name);

        for direction in [Direction::Input, Direction::Output] {
            if let Some(message) = binding_operation.message(direction) {
                let abstract_message = abstract_operation
                    .and_then(|operation| operation.message(direction))
                    .map(|message| message.message);

                *operation.message_mut(direction) = Some(OperationMessage::new(
                    direction,
                    message.name.clone(),
                    abstract_message,
                ));
            }
        }

        let mut skip = true;

        for (version, child) in soap_children_named(node, "operation") {
            skip = false;

            if let Some(action) = child.attribute("soapAction") {
                operation.action = Some(action.to_owned());
            }

            if version == SoapVersion::Soap12 {
                if let Some(required) = child.attribute("soapActionRequired") {
                    operation.action_required = Some(action_required(required));
                }
            }

            if let Some(style) = child.attribute("style") {
                operation.style = Some(style.to_owned());
            }
        }

        if skip {
            debug!(operation = %operation.name, "no SOAP operation element, skipping");
            return Ok(());
        }

        let binding = binding_operation.binding;
        match self.registry.services_by_binding.get(&binding).copied() {
            Some(service) => {
                debug!(
                    operation = %operation.name,
                    action = ?operation.action,
                    "registered SOAP operation"
                );
                self.registry.register_operation(service, operation);
            }

            None => debug!(
                operation = %operation.name,
                binding = %definition.binding(binding).name,
                "no service for binding, dropping operation"
            ),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_required() {
        assert!(action_required("true"));
        assert!(action_required("1"));
        assert!(!action_required("false"));
        assert!(!action_required("0"));
        assert!(!action_required("TRUE"));
        assert!(!action_required("yes"));
    }
}
