use thiserror::Error;

use soapreader_wsdl::{error, types::QName};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Error reading WSDL")]
    WsdlError(#[from] error::Error),

    #[error("Binding {0} was announced before any port using it")]
    ServiceNotFound(QName),

    #[error("Fault {fault} was announced before binding operation {operation}")]
    OperationNotFound { operation: String, fault: String },

    #[error("Operation {operation} has no fault named {fault}")]
    UnknownFault { operation: String, fault: String },

    #[error("Message {message} has no part named {part}")]
    UnknownPart { message: QName, part: String },
}
