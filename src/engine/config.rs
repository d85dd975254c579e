//! Provides the [`Configuration`] that tells the usergql server where to listen and which paths
//! to serve.

use crate::error::Error;
use log::trace;
use serde::{Deserialize, Serialize};
use std::convert::TryFrom;
use std::fs::File;
use std::io::BufReader;

/// The only configuration file format version understood by this crate
pub const CONFIG_VERSION: i32 = 1;

/// Convenience function for setting serde default value
fn get_true() -> bool {
    true
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_bind_port() -> u16 {
    4000
}

fn default_graphql_endpoint() -> String {
    "/graphql".to_string()
}

/// Configuration for a usergql [`Server`]. The defaults reproduce the shipped service: listen on
/// all interfaces, port 4000, with the GraphQL endpoint and its playground at `/graphql`.
///
/// [`Server`]: ../../server/struct.Server.html
///
/// # Examples
///
/// ```rust
/// use std::convert::TryFrom;
/// use usergql::engine::config::Configuration;
///
/// let c = Configuration::try_from("
/// version: 1
/// bindAddr: 127.0.0.1
/// bindPort: 0
/// ".to_string()).unwrap();
///
/// assert_eq!(c.bind_port(), 0);
/// assert_eq!(c.graphql_endpoint(), "/graphql");
/// ```
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    /// Version of the configuration file format used
    version: i32,

    #[serde(default = "default_bind_addr")]
    bind_addr: String,

    #[serde(default = "default_bind_port")]
    bind_port: u16,

    #[serde(default = "default_graphql_endpoint")]
    graphql_endpoint: String,

    /// Serve the GraphQL Playground on `GET` at the GraphQL endpoint
    #[serde(default = "get_true")]
    playground: bool,
}

impl Configuration {
    /// Creates a new [`Configuration`] data structure
    ///
    /// [`Configuration`]: struct.Configuration.html
    ///
    /// # Examples
    ///
    /// ```rust
    /// use usergql::engine::config::Configuration;
    ///
    /// let c = Configuration::new(1, "127.0.0.1".to_string(), 0, "/graphql".to_string(), false);
    /// ```
    pub fn new(
        version: i32,
        bind_addr: String,
        bind_port: u16,
        graphql_endpoint: String,
        playground: bool,
    ) -> Configuration {
        Configuration {
            version,
            bind_addr,
            bind_port,
            graphql_endpoint,
            playground,
        }
    }

    /// Creates a new [`Configuration`] data structure from the contents of the specified YAML
    /// file. Returns an error if the file could not be opened or deserialized.
    ///
    /// [`Configuration`]: struct.Configuration.html
    pub fn from_file(path: &str) -> Result<Configuration, Error> {
        trace!("Configuration::from_file called -- path: {}", path);
        let f = File::open(path).map_err(|e| Error::ConfigOpenFailed { source: e })?;
        let c: Configuration = serde_yaml::from_reader(BufReader::new(f))?;
        c.validate()?;
        Ok(c)
    }

    /// Checks that the configuration can be served.
    ///
    /// # Errors
    ///
    /// * [`ConfigVersionMismatched`] - if the version is not [`CONFIG_VERSION`]
    /// * [`ConfigItemInvalid`] - if the GraphQL endpoint path does not start with `/`
    ///
    /// [`ConfigVersionMismatched`]: ../../enum.Error.html#variant.ConfigVersionMismatched
    /// [`ConfigItemInvalid`]: ../../enum.Error.html#variant.ConfigItemInvalid
    /// [`CONFIG_VERSION`]: constant.CONFIG_VERSION.html
    ///
    /// # Examples
    ///
    /// ```rust
    /// use usergql::engine::config::Configuration;
    ///
    /// assert!(Configuration::default().validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<(), Error> {
        if self.version != CONFIG_VERSION {
            return Err(Error::ConfigVersionMismatched {
                expected: CONFIG_VERSION,
                found: self.version,
            });
        }

        if !self.graphql_endpoint.starts_with('/') {
            return Err(Error::ConfigItemInvalid {
                name: "graphqlEndpoint".to_string(),
                message: format!("path must start with '/': {}", self.graphql_endpoint),
            });
        }

        if self.bind_addr.is_empty() {
            return Err(Error::ConfigItemInvalid {
                name: "bindAddr".to_string(),
                message: "address must not be empty".to_string(),
            });
        }

        Ok(())
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn bind_addr(&self) -> &str {
        &self.bind_addr
    }

    pub fn bind_port(&self) -> u16 {
        self.bind_port
    }

    pub fn graphql_endpoint(&self) -> &str {
        &self.graphql_endpoint
    }

    pub fn playground(&self) -> bool {
        self.playground
    }

    /// Returns the configuration with the listener moved to `bind_addr` and `bind_port`
    pub fn with_bind(mut self, bind_addr: &str, bind_port: u16) -> Configuration {
        self.bind_addr = bind_addr.to_string();
        self.bind_port = bind_port;
        self
    }
}

impl Default for Configuration {
    fn default() -> Configuration {
        Configuration {
            version: CONFIG_VERSION,
            bind_addr: default_bind_addr(),
            bind_port: default_bind_port(),
            graphql_endpoint: default_graphql_endpoint(),
            playground: true,
        }
    }
}

impl TryFrom<String> for Configuration {
    type Error = Error;

    fn try_from(yaml: String) -> Result<Configuration, Error> {
        let c: Configuration = serde_yaml::from_str(&yaml)?;
        c.validate()?;
        Ok(c)
    }
}
