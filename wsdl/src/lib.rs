use std::path::Path;
use url::Url;

mod parser;

pub mod error;
pub mod events;
pub mod types;
pub mod xml;

pub use events::{Event, Listener};

/// Parses the document at `url`, which may also be a local file path, along
/// with every `wsdl:import` it pulls in.
pub fn parse<S: AsRef<str>>(url: S) -> Result<types::Definition, error::Error> {
    let url = {
        match Url::parse(url.as_ref()) {
            Ok(url) => url,
            Err(url::ParseError::RelativeUrlWithoutBase) => Url::from_file_path(
                &Path::new(url.as_ref())
                    .canonicalize()
                    .map_err(|err| error::Error::PathConversionError(Some(err)))?,
            )
            .map_err(|()| error::Error::PathConversionError(None))?,
            Err(err) => return Err(err.into()),
        }
    };

    parser::parse(url)
}

/// Parses an in-memory document. Imports must use absolute locations.
pub fn parse_str(document: &str) -> Result<types::Definition, error::Error> {
    parser::parse_str(document)
}
