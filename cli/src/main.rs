use structopt::StructOpt;
use thiserror::Error;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Debug, Error)]
enum Error {
    #[error("Error reading SOAP bindings")]
    ReadError(#[from] soapreader::error::Error),

    #[error("I/O error")]
    IoError(#[from] std::io::Error),

    #[error("Unable to install log subscriber")]
    LogError(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Prints the SOAP services, operations and messages described by a WSDL
/// document.
#[derive(StructOpt)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[structopt(short, long, default_value = "info")]
    log_level: Level,

    /// Path or URL of the WSDL document
    input: String,
}

#[paw::main]
fn main(args: Args) -> Result<(), Error> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!(input = %args.input, "reading WSDL");
    let (definition, services) = soapreader::from_url(&args.input)?;

    info!(
        services = services.len(),
        bindings = definition.bindings.len(),
        "read SOAP services"
    );

    for service in &services {
        print!("{}", service);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_converts() {
        let error = Error::from(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "service.wsdl",
        ));
        assert!(matches!(error, Error::IoError(_)));
    }

    #[test]
    fn test_args_defaults() {
        let args = Args::from_iter(["soapreader", "service.wsdl"]);
        assert_eq!(args.log_level, Level::INFO);
        assert_eq!(args.input, "service.wsdl");
    }

    #[test]
    fn test_args_log_level() {
        let args = Args::from_iter(["soapreader", "--log-level", "debug", "service.wsdl"]);
        assert_eq!(args.log_level, Level::DEBUG);
    }
}
