use thiserror::Error;

use crate::types::QName;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Unable to parse provided URL")]
    UrlParseError(#[from] url::ParseError),

    #[error("Unable to convert provided path")]
    PathConversionError(Option<std::io::Error>),

    #[error("Unable to open file")]
    FileOpenError(quick_xml::Error),

    #[error("Unable to get file from server")]
    ReqwestError(#[from] reqwest::Error),

    #[error("Unsupported URL scheme {0}")]
    UnsupportedScheme(String),

    #[error("Error parsing XML input")]
    XmlParseError(#[from] quick_xml::Error),

    #[error("Document has no root element")]
    EmptyDocument,

    #[error("Expected a wsdl:definitions root element, found {0}")]
    UnexpectedRoot(String),

    #[error("Element {element} is missing required attribute {attribute}")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    #[error("Namespace prefix {prefix} is not declared on {element}")]
    UndeclaredPrefix { prefix: String, element: String },

    #[error("Unable to resolve {kind} {name}")]
    Unresolved { kind: &'static str, name: QName },

    #[error("Relative import {0} needs a base URL")]
    RelativeImport(String),
}
