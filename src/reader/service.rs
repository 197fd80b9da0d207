use soapreader_wsdl::{
    types::{BindingId, Definition, PortId},
    xml::Element,
};
use tracing::debug;

use super::{soap_children, soap_children_named, SoapReader};
use crate::{
    error::Error,
    model::{Service, SoapVersion},
};

impl SoapReader {
    pub(super) fn on_port(
        &mut self,
        definition: &Definition,
        id: PortId,
        node: &Element,
    ) -> Result<(), Error> {
        let port = definition.port(id);
        let mut service = Service::new(id, &port.name);

        for (version, child) in soap_children(node) {
            if let Some(location) = child.attribute("location") {
                service.address = Some(location.to_owned());
            }

            if version == SoapVersion::Soap12 {
                service.version = SoapVersion::Soap12;
            }
        }

        debug!(
            service = %definition.service(port.service).name,
            port = %port.name,
            address = ?service.address,
            version = %service.version,
            "found service port"
        );

        let registry = &mut self.registry;
        let index = registry.services.len();
        registry.services.push(service);
        registry.services_by_binding.insert(port.binding, index);
        registry.services_by_port.insert(id, index);

        Ok(())
    }

    pub(super) fn on_binding(
        &mut self,
        definition: &Definition,
        id: BindingId,
        node: &Element,
    ) -> Result<(), Error> {
        let service = self
            .registry
            .service_by_binding_mut(id)
            .ok_or_else(|| Error::ServiceNotFound(definition.binding(id).name.clone()))?;

        for (_, child) in soap_children_named(node, "binding") {
            service.transport = child.attribute("transport").map(ToOwned::to_owned);

            if let Some(style) = child.attribute("style") {
                service.style = style.to_owned();
            }
        }

        debug!(
            service = %service.name,
            transport = ?service.transport,
            style = %service.style,
            "bound service"
        );

        Ok(())
    }
}
