//! Extracts the SOAP binding information of a WSDL document.
//!
//! The WSDL document is parsed by [`soapreader_wsdl`] into an abstract
//! [`Definition`](wsdl::types::Definition). [`SoapReader`] then listens to the
//! definition's events and assembles one [`Service`](model::Service) per
//! port, with the SOAP operations, bodies, headers and faults of its binding.
//!
//! ```no_run
//! let (_definition, services) = soapreader::from_url("service.wsdl")?;
//!
//! for service in &services {
//!     println!("{}", service);
//! }
//! # Ok::<(), soapreader::error::Error>(())
//! ```

mod reader;

pub mod error;
pub mod model;

pub use reader::SoapReader;
pub use soapreader_wsdl as wsdl;

use wsdl::types::Definition;

pub fn from_url<S: AsRef<str>>(
    url: S,
) -> Result<(Definition, Vec<model::Service>), error::Error> {
    let definition = wsdl::parse(url)?;
    let services = from_definition(&definition)?;
    Ok((definition, services))
}

pub fn from_xml(document: &str) -> Result<(Definition, Vec<model::Service>), error::Error> {
    let definition = wsdl::parse_str(document)?;
    let services = from_definition(&definition)?;
    Ok((definition, services))
}

pub fn from_definition(definition: &Definition) -> Result<Vec<model::Service>, error::Error> {
    Ok(SoapReader::read(definition)?.into_services())
}
