//! Integration tests for the soapreader crate.
//!
//! Each test parses a WSDL fixture, runs the SOAP reader over the resulting
//! definition and checks the assembled services.

use soapreader::{
    error::Error,
    model::{Service, SoapVersion},
    wsdl::{
        self,
        types::{Definition, QName},
        Event, Listener,
    },
    SoapReader,
};

const PING: &str = include_str!("fixtures/ping.wsdl");
const INVENTORY: &str = include_str!("fixtures/soap12.wsdl");
const STORE: &str = include_str!("fixtures/store.wsdl");
const SHARED: &str = include_str!("fixtures/shared.wsdl");

const HTTP_TRANSPORT: &str = "http://schemas.xmlsoap.org/soap/http";

fn read(document: &str) -> (Definition, Vec<Service>) {
    soapreader::from_xml(document).unwrap()
}

fn message(definition: &Definition, namespace: &str, name: &str) -> wsdl::types::MessageId {
    definition
        .find_message(&QName::new(Some(namespace), name))
        .unwrap()
}

// ============================================================================
// End to end
// ============================================================================

#[test]
fn test_ping_end_to_end() {
    let (definition, services) = read(PING);
    assert_eq!(services.len(), 1);

    let service = &services[0];
    assert_eq!(service.name, "PingPort");
    assert_eq!(service.address.as_deref(), Some("http://x/svc"));
    assert_eq!(service.version, SoapVersion::Soap11);
    assert_eq!(service.version.as_str(), "1.1");
    assert_eq!(service.transport.as_deref(), Some(HTTP_TRANSPORT));
    assert_eq!(service.style, "document");
    assert_eq!(service.operations.len(), 1);

    let operation = &service.operations[0];
    assert_eq!(operation.name, "Ping");
    assert_eq!(operation.action.as_deref(), Some("urn:Ping"));
    assert_eq!(operation.action_required, None);
    assert_eq!(operation.style, None);
    assert_eq!(service.operation_style(operation), "document");

    let input = operation.input.as_ref().unwrap();
    assert_eq!(
        input.message,
        Some(message(&definition, "urn:ping", "PingRequest"))
    );
    let body = input.body.as_ref().unwrap();
    assert_eq!(body.part_names(), ["payload", "sequence"]);
    assert_eq!(body.binding.usage.as_deref(), Some("literal"));
    assert!(input.headers.is_empty());

    let output = operation.output.as_ref().unwrap();
    assert_eq!(output.body.as_ref().unwrap().part_names(), ["echo"]);
    assert!(operation.faults.is_empty());
}

#[test]
fn test_service_by_port() {
    let definition = wsdl::parse_str(PING).unwrap();
    let reader = SoapReader::read(&definition).unwrap();

    let port = definition.services[0].ports[0];
    let service = reader.service_by_port(port).unwrap();
    assert_eq!(service.port, port);
    assert_eq!(service.address.as_deref(), Some("http://x/svc"));
    assert_eq!(reader.services().len(), 1);
}

#[test]
fn test_service_summary() {
    let (_, services) = read(PING);
    let summary = services[0].to_string();

    assert!(summary.starts_with("PingPort (SOAP 1.1) http://x/svc"));
    assert!(summary.contains("  Ping [document] action=urn:Ping"));
    assert!(summary.contains("    input body use=literal parts=[payload, sequence]"));
    assert!(summary.contains("    output body use=literal parts=[echo]"));
}

// ============================================================================
// SOAP 1.2
// ============================================================================

#[test]
fn test_soap12_service() {
    let (_, services) = read(INVENTORY);
    let service = &services[0];

    assert_eq!(service.version, SoapVersion::Soap12);
    assert_eq!(service.version.as_str(), "1.2");
    assert_eq!(
        service.address.as_deref(),
        Some("https://inventory.example.com/soap12")
    );
    assert_eq!(service.style, "rpc");
    assert_eq!(service.operations.len(), 4);
}

#[test]
fn test_soap12_action_required() {
    let (_, services) = read(INVENTORY);
    let service = &services[0];

    let required = |name: &str| service.operation(name).unwrap().action_required;
    assert_eq!(required("Required"), Some(true));
    assert_eq!(required("RequiredNumeric"), Some(true));
    assert_eq!(required("NotRequired"), Some(false));
    assert_eq!(required("Unset"), None);

    assert_eq!(service.operation("Unset").unwrap().action, None);
}

#[test]
fn test_soap12_style_override() {
    let (_, services) = read(INVENTORY);
    let service = &services[0];

    let not_required = service.operation("NotRequired").unwrap();
    assert_eq!(not_required.style.as_deref(), Some("document"));
    assert_eq!(service.operation_style(not_required), "document");

    let required = service.operation("Required").unwrap();
    assert_eq!(service.operation_style(required), "rpc");
}

#[test]
fn test_encoded_body() {
    let (_, services) = read(INVENTORY);
    let operation = services[0].operation("Required").unwrap();

    let body = operation.input.as_ref().unwrap().body.as_ref().unwrap();
    assert_eq!(body.binding.usage.as_deref(), Some("encoded"));
    assert_eq!(body.binding.namespace.as_deref(), Some("urn:inventory:rpc"));
    assert_eq!(
        body.binding.encoding_style,
        Some(vec!["http://www.w3.org/2003/05/soap-encoding".to_owned()])
    );

    let output = operation.output.as_ref().unwrap().body.as_ref().unwrap();
    assert_eq!(output.binding.encoding_style, None);
}

// ============================================================================
// Several bindings sharing one port type
// ============================================================================

#[test]
fn test_services_in_port_order() {
    let (_, services) = read(STORE);
    let names = services
        .iter()
        .map(|service| service.name.as_str())
        .collect::<Vec<_>>();

    assert_eq!(names, ["StoreSoapPort", "StoreSoap12Port", "StoreHttpPort"]);
    assert_eq!(services[0].version, SoapVersion::Soap11);
    assert_eq!(services[1].version, SoapVersion::Soap12);
}

#[test]
fn test_operations_with_same_name_stay_distinct() {
    let (_, services) = read(STORE);
    let soap = services[0].operation("Get").unwrap();
    let soap12 = services[1].operation("Get").unwrap();

    assert_ne!(soap.binding_operation, soap12.binding_operation);
    assert_eq!(soap.action.as_deref(), Some("urn:Get"));
    assert_eq!(soap12.action.as_deref(), Some("urn:Get12"));
    assert_eq!(
        soap12
            .output
            .as_ref()
            .unwrap()
            .body
            .as_ref()
            .unwrap()
            .part_names(),
        ["B"]
    );
}

#[test]
fn test_operation_without_soap_element_is_skipped() {
    let (_, services) = read(STORE);
    let soap = &services[0];

    let names = soap
        .operations
        .iter()
        .map(|operation| operation.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(names, ["Get"]);
    assert!(soap.operation("Put").is_none());
}

#[test]
fn test_non_soap_port() {
    let (_, services) = read(STORE);
    let http = &services[2];

    assert_eq!(http.version, SoapVersion::Soap11);
    assert_eq!(http.address, None);
    assert_eq!(http.transport, None);
    assert!(http.operations.is_empty());
}

#[test]
fn test_action_required_ignored_for_soap11() {
    let (_, services) = read(STORE);
    let get = services[0].operation("Get").unwrap();

    assert_eq!(get.action_required, None);
    assert_eq!(get.style.as_deref(), Some("rpc"));
    assert_eq!(services[0].operation_style(get), "rpc");
}

#[test]
fn test_body_parts_filtered_in_message_order() {
    let (_, services) = read(STORE);
    let output = services[0]
        .operation("Get")
        .unwrap()
        .output
        .as_ref()
        .unwrap();

    assert_eq!(output.body.as_ref().unwrap().part_names(), ["A", "C"]);
}

#[test]
fn test_headers_reference_their_own_message() {
    let (definition, services) = read(STORE);
    let input = services[0]
        .operation("Get")
        .unwrap()
        .input
        .as_ref()
        .unwrap();

    let request = message(&definition, "urn:store", "GetRequest");
    let auth = message(&definition, "urn:store", "AuthHeader");
    let auth_fault = message(&definition, "urn:store", "AuthFault");

    assert_eq!(input.name.as_deref(), Some("GetIn"));
    assert_eq!(input.message, Some(request));
    assert_eq!(input.body.as_ref().unwrap().part_names(), ["id"]);

    assert_eq!(input.headers.len(), 2);

    let token = &input.headers[0];
    assert_eq!(token.message, auth);
    assert_eq!(token.part.name, "token");
    assert_eq!(token.binding.usage.as_deref(), Some("literal"));
    assert_eq!(token.faults.len(), 1);
    assert_eq!(token.faults[0].message, auth_fault);
    assert_eq!(token.faults[0].part.name, "reason");

    let session = &input.headers[1];
    assert_eq!(session.message, auth);
    assert_eq!(session.part.name, "session");
    assert_eq!(
        session.binding.namespace.as_deref(),
        Some("urn:store:session")
    );
    assert!(session.faults.is_empty());
}

#[test]
fn test_faults() {
    let (definition, services) = read(STORE);
    let get = services[0].operation("Get").unwrap();

    assert_eq!(get.faults.len(), 1);
    let fault = get.fault("notFound").unwrap();
    assert_eq!(fault.name.as_deref(), Some("notFound"));
    assert_eq!(fault.message, message(&definition, "urn:store", "NotFound"));
    assert_eq!(fault.body.part_names(), ["detail"]);
    assert_eq!(fault.body.binding.usage.as_deref(), Some("encoded"));
    assert_eq!(
        fault.body.binding.encoding_style,
        Some(vec!["http://schemas.xmlsoap.org/soap/encoding/".to_owned()])
    );

    assert!(services[1].operation("Get").unwrap().faults.is_empty());
}

// ============================================================================
// Several ports sharing one binding
// ============================================================================

#[test]
fn test_last_port_owns_shared_binding() {
    let (_, services) = read(SHARED);
    assert_eq!(services.len(), 2);

    let east = &services[0];
    assert_eq!(east.name, "EastPort");
    assert_eq!(east.address.as_deref(), Some("http://east.example.com/echo"));
    assert_eq!(east.transport, None);
    assert_eq!(east.style, "document");
    assert!(east.operations.is_empty());

    let west = &services[1];
    assert_eq!(west.name, "WestPort");
    assert_eq!(west.address.as_deref(), Some("http://west.example.com/echo"));
    assert_eq!(west.transport.as_deref(), Some(HTTP_TRANSPORT));
    assert_eq!(west.style, "rpc");
    assert_eq!(west.operations.len(), 1);
    assert_eq!(
        west.operation("Echo").unwrap().action.as_deref(),
        Some("urn:Echo")
    );
}

// ============================================================================
// Imports
// ============================================================================

#[test]
fn test_imported_messages() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/imports/main.wsdl");
    let (definition, services) = soapreader::from_url(path).unwrap();

    assert_eq!(definition.target_namespace.as_deref(), Some("urn:weather"));
    assert_eq!(services.len(), 1);

    let service = &services[0];
    assert_eq!(
        service.address.as_deref(),
        Some("http://weather.example.com/soap")
    );

    let forecast = service.operation("Forecast").unwrap();
    let input = forecast.input.as_ref().unwrap();
    assert_eq!(input.body.as_ref().unwrap().part_names(), ["city"]);
    assert_eq!(
        input.headers[0].message,
        message(&definition, "urn:weather:messages", "Credentials")
    );
    assert_eq!(input.headers[0].part.name, "apiKey");

    let output = forecast.output.as_ref().unwrap();
    assert_eq!(output.body.as_ref().unwrap().part_names(), ["forecast"]);
}

// ============================================================================
// Errors
// ============================================================================

fn ping_with_input(replacement: &str) -> String {
    PING.replacen("<soap:body use=\"literal\"/>", replacement, 1)
}

#[test]
fn test_header_with_unknown_message() {
    let document = ping_with_input(r#"<soap:header message="tns:Missing" part="x"/>"#);

    assert!(matches!(
        soapreader::from_xml(&document),
        Err(Error::WsdlError(wsdl::error::Error::Unresolved { kind: "message", .. }))
    ));
}

#[test]
fn test_header_with_unknown_part() {
    let document = ping_with_input(r#"<soap:header message="tns:PingRequest" part="nope"/>"#);

    match soapreader::from_xml(&document) {
        Err(Error::UnknownPart { message, part }) => {
            assert_eq!(message, QName::new(Some("urn:ping"), "PingRequest"));
            assert_eq!(part, "nope");
        }
        other => panic!("unexpected result: {:?}", other.map(|(_, services)| services)),
    }
}

#[test]
fn test_header_without_part() {
    let document = ping_with_input(r#"<soap:header message="tns:PingRequest"/>"#);

    assert!(matches!(
        soapreader::from_xml(&document),
        Err(Error::WsdlError(wsdl::error::Error::MissingAttribute {
            attribute: "part",
            ..
        }))
    ));
}

#[test]
fn test_header_with_undeclared_prefix() {
    let document = ping_with_input(r#"<soap:header message="zz:PingRequest" part="payload"/>"#);

    assert!(matches!(
        soapreader::from_xml(&document),
        Err(Error::WsdlError(wsdl::error::Error::UndeclaredPrefix { .. }))
    ));
}

#[test]
fn test_binding_fault_unknown_to_port_type() {
    let document = PING.replacen(
        "<soap:operation soapAction=\"urn:Ping\"/>",
        "<soap:operation soapAction=\"urn:Ping\"/>\n<fault name=\"bogus\"><soap:fault name=\"bogus\"/></fault>",
        1,
    );

    assert!(matches!(
        soapreader::from_xml(&document),
        Err(Error::UnknownFault { fault, .. }) if fault == "bogus"
    ));
}

#[test]
fn test_binding_before_port_is_rejected() {
    let definition = wsdl::parse_str(PING).unwrap();
    let binding = definition.ports[0].binding;

    let mut reader = SoapReader::new();
    let result = reader.on_event(
        &definition,
        Event::Binding {
            binding,
            node: &definition.binding(binding).node,
        },
    );

    assert!(matches!(result, Err(Error::ServiceNotFound(name)) if name.name == "PingBinding"));
}

#[test]
fn test_fault_before_operation_is_rejected() {
    let definition = wsdl::parse_str(STORE).unwrap();
    let binding = definition.ports[0].binding;
    let operation = definition.binding(binding).operations[0];
    let fault = &definition.binding_operation(operation).faults[0];

    let mut reader = SoapReader::new();
    let result = reader.on_event(
        &definition,
        Event::Fault {
            operation,
            name: &fault.name,
            node: &fault.node,
        },
    );

    assert!(matches!(
        result,
        Err(Error::OperationNotFound { operation, fault }) if operation == "Get" && fault == "notFound"
    ));
}

#[test]
fn test_message_for_unknown_operation_is_ignored() {
    let definition = wsdl::parse_str(PING).unwrap();
    let binding = definition.ports[0].binding;
    let operation = definition.binding(binding).operations[0];
    let input = definition.binding_operation(operation).input.as_ref().unwrap();

    let mut reader = SoapReader::new();
    reader
        .on_event(
            &definition,
            Event::Message {
                operation,
                direction: wsdl::types::Direction::Input,
                node: &input.node,
            },
        )
        .unwrap();

    assert!(reader.services().is_empty());
}
