use miette::Diagnostic;
use thiserror::Error;

/// Result type for metadata loading and lowering
pub type Result<T> = std::result::Result<T, Error>;

/// A metadata document could not be loaded or does not describe a valid
/// schema graph.
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read metadata from '{uri}'")]
    #[diagnostic(
        code(odatagen::metadata::read),
        help("check that the 'metadata' path in your configuration exists")
    )]
    Read {
        uri: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch metadata from '{uri}'")]
    #[diagnostic(
        code(odatagen::metadata::fetch),
        help("check that the service is reachable and serves $metadata")
    )]
    Fetch {
        uri: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to parse metadata document '{uri}'")]
    #[diagnostic(code(odatagen::metadata::parse))]
    Xml {
        uri: String,
        #[source]
        source: quick_xml::DeError,
    },

    #[error("metadata document '{uri}' contains no schema")]
    #[diagnostic(code(odatagen::metadata::no_schema))]
    NoSchema { uri: String },

    #[error("invalid {element} '{name}' in namespace '{namespace}': {message}")]
    #[diagnostic(code(odatagen::metadata::invalid))]
    Invalid {
        element: &'static str,
        namespace: String,
        name: String,
        message: String,
    },
}

impl Error {
    pub(crate) fn invalid(
        element: &'static str,
        namespace: impl Into<String>,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Invalid {
            element,
            namespace: namespace.into(),
            name: name.into(),
            message: message.into(),
        }
    }
}
