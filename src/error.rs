//! Provides the [`Error`] type for usergql

use std::fmt::{Display, Formatter};

/// Error type for usergql
///
/// GraphQL parse and validation failures are not represented here. Those are reported to the
/// caller inside the `errors` array of the GraphQL response, exactly as the execution layer shapes
/// them. This type covers the failures that happen around execution: binding a listener, loading
/// configuration, relaying JSON, and talking to a remote endpoint.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use usergql::Error;
///
/// let e = Error::PayloadNotFound { response: json!{"surprise"} };
/// ```
#[derive(Debug)]
pub enum Error {
    /// Returned if the server cannot bind its listener because another process is already
    /// listening on the address and port. There is no retry and no fallback port.
    AddrInUse { source: std::io::Error },

    /// Returned if the server cannot bind its listener for any reason other than the address
    /// being in use, such as an address that is not local to the host
    AddrNotAvailable { source: std::io::Error },

    /// Returned if a [`Client`] is unable to submit a request to the server, such as due to a
    /// network or server error, or the response cannot be parsed as valid JSON. Inspect the
    /// [`reqwest::Error`] included as a source error for additional detail.
    ///
    /// [`Client`]: ./client/enum.Client.html
    ClientRequestFailed { source: reqwest::Error },

    /// Returned if a [`Configuration`] holds a value that cannot be served, such as an endpoint
    /// path without a leading slash. The `name` field holds the offending setting and `message`
    /// describes the problem.
    ///
    /// [`Configuration`]: ./engine/config/struct.Configuration.html
    ConfigItemInvalid { name: String, message: String },

    /// Returned if a `Configuration` file cannot be opened, typically because the configuration
    /// file cannot be found on disk
    ConfigOpenFailed { source: std::io::Error },

    /// Returned if a `Configuration` has a version other than the one this crate understands.
    /// The field `expected` holds the supported version, and `found` the version in the file.
    ConfigVersionMismatched { expected: i32, found: i32 },

    /// Returned if a `Configuration` fails to deserialize because the provided data does not
    /// match the expected data structure
    DeserializationFailed { source: serde_yaml::Error },

    /// Returned if a header name passed to a [`Client`] is not a valid HTTP header name
    ///
    /// [`Client`]: ./client/enum.Client.html
    InvalidHeaderName {
        source: reqwest::header::InvalidHeaderName,
    },

    /// Returned if a header value passed to a [`Client`] is not a valid HTTP header value
    ///
    /// [`Client`]: ./client/enum.Client.html
    InvalidHeaderValue {
        source: reqwest::header::InvalidHeaderValue,
    },

    /// Returned if a [`Client`] receives a valid JSON response that does not contain the
    /// expected 'data' object, or the requested field under it.
    ///
    /// The [`serde_json::Value`] tuple value contains the deserialized JSON response.
    ///
    /// [`Client`]: ./client/enum.Client.html
    PayloadNotFound { response: serde_json::Value },

    /// Returned if a GraphQL response cannot be converted to a serde_json::Value
    SerializationFailed { source: serde_json::Error },

    /// Returned if the HTTP server stops with an I/O error after it was successfully bound
    ServerStartupFailed { source: std::io::Error },

    /// Returned if the `variables` passed alongside a query are not a JSON object that can be
    /// converted into GraphQL input values
    VariablesNotParsed { source: serde_json::Error },
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Error::AddrInUse { source } => {
                write!(f, "Address already in use. Source error: {}", source)
            }
            Error::AddrNotAvailable { source } => {
                write!(f, "Address not available. Source error: {}", source)
            }
            Error::ClientRequestFailed { source } => {
                write!(f, "Client request failed. Source error: {}", source)
            }
            Error::ConfigItemInvalid { name, message } => {
                write!(f, "Config item {} is invalid: {}", name, message)
            }
            Error::ConfigOpenFailed { source } => {
                write!(f, "Config file could not be opened. Source error: {}", source)
            }
            Error::ConfigVersionMismatched { expected, found } => {
                write!(f, "Config version not supported: expected {} but found {}", expected, found)
            }
            Error::DeserializationFailed { source } => {
                write!(f, "Failed to deserialize configuration. Source error: {}", source)
            }
            Error::InvalidHeaderName { source } => {
                write!(f, "Invalid HTTP header name. Source error: {}", source)
            }
            Error::InvalidHeaderValue { source } => {
                write!(f, "Invalid HTTP header value. Source error: {}", source)
            }
            Error::PayloadNotFound { response } => {
                write!(f, "Required data field is missing from the response: {}", response)
            }
            Error::SerializationFailed { source } => {
                write!(f, "Serialization of the GraphQL response failed. Source error: {}", source)
            }
            Error::ServerStartupFailed { source } => {
                write!(f, "Server stopped with an error. Source error: {}", source)
            }
            Error::VariablesNotParsed { source } => {
                write!(f, "Query variables could not be parsed. Source error: {}", source)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::AddrInUse { source } => Some(source),
            Error::AddrNotAvailable { source } => Some(source),
            Error::ClientRequestFailed { source } => Some(source),
            Error::ConfigItemInvalid {
                name: _,
                message: _,
            } => None,
            Error::ConfigOpenFailed { source } => Some(source),
            Error::ConfigVersionMismatched {
                expected: _,
                found: _,
            } => None,
            Error::DeserializationFailed { source } => Some(source),
            Error::InvalidHeaderName { source } => Some(source),
            Error::InvalidHeaderValue { source } => Some(source),
            Error::PayloadNotFound { response: _ } => None,
            Error::SerializationFailed { source } => Some(source),
            Error::ServerStartupFailed { source } => Some(source),
            Error::VariablesNotParsed { source } => Some(source),
        }
    }
}

impl Error {
    /// Sorts a listener bind failure into [`AddrInUse`] or [`AddrNotAvailable`]
    ///
    /// [`AddrInUse`]: #variant.AddrInUse
    /// [`AddrNotAvailable`]: #variant.AddrNotAvailable
    pub(crate) fn from_bind(e: std::io::Error) -> Error {
        match e.kind() {
            std::io::ErrorKind::AddrInUse => Error::AddrInUse { source: e },
            _ => Error::AddrNotAvailable { source: e },
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::ClientRequestFailed { source: e }
    }
}

impl From<reqwest::header::InvalidHeaderName> for Error {
    fn from(e: reqwest::header::InvalidHeaderName) -> Self {
        Error::InvalidHeaderName { source: e }
    }
}

impl From<reqwest::header::InvalidHeaderValue> for Error {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
        Error::InvalidHeaderValue { source: e }
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Error::DeserializationFailed { source: e }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::SerializationFailed { source: e }
    }
}
