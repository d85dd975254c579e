//! This module provides the usergql client.

use crate::{Engine, Error};
use log::{debug, trace};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::str::FromStr;

/// A usergql GraphQL client
///
/// The [`Client`] sends GraphQL queries either to a remote usergql endpoint over HTTP or
/// directly to an in-process [`Engine`], and unwraps the `data` object of the response.
///
/// [`Client`]: ./enum.Client.html
/// [`Engine`]: ../engine/struct.Engine.html
///
/// # Examples
///
/// ```rust
/// # use usergql::Client;
///
/// let client = Client::new_with_http("http://localhost:4000/graphql", None).unwrap();
/// ```
#[derive(Clone)]
pub enum Client {
    Http { endpoint: String, headers: HeaderMap },
    Local { engine: Box<Engine> },
}

impl Client {
    /// Takes the URL of a usergql GraphQL endpoint and returns a new [`Client`] initialized to
    /// query that endpoint, sending `headers_opt` with every request.
    ///
    /// [`Client`]: ./enum.Client.html
    ///
    /// # Errors
    ///
    /// * [`InvalidHeaderName`] - if a header name is not a valid HTTP header name
    /// * [`InvalidHeaderValue`] - if a header value is not a valid HTTP header value
    ///
    /// [`InvalidHeaderName`]: ../enum.Error.html#variant.InvalidHeaderName
    /// [`InvalidHeaderValue`]: ../enum.Error.html#variant.InvalidHeaderValue
    pub fn new_with_http(
        endpoint: &str,
        headers_opt: Option<HashMap<&str, &str>>,
    ) -> Result<Client, Error> {
        trace!("Client::new_with_http called -- endpoint: {}", endpoint);

        let mut header_map = HeaderMap::new();
        if let Some(headers) = headers_opt {
            for (key, value) in headers {
                header_map.insert(HeaderName::from_str(key)?, HeaderValue::from_str(value)?);
            }
        }

        Ok(Client::Http {
            endpoint: endpoint.to_string(),
            headers: header_map,
        })
    }

    /// Takes a usergql engine and returns a new [`Client`] that queries it in-process.
    ///
    /// [`Client`]: ./enum.Client.html
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use usergql::{Client, Engine};
    /// # use usergql::engine::schema::static_user;
    ///
    /// let client = Client::new_with_engine(Engine::new(static_user()));
    /// ```
    pub fn new_with_engine(engine: Engine) -> Client {
        trace!("Client::new_with_engine called");
        Client::Local {
            engine: Box::new(engine),
        }
    }

    /// Executes a graphql query
    ///
    /// # Arguments
    ///
    /// * query - text of the query statement
    /// * variables - an optional [`serde_json::Value`], specifically a Value::Object, containing
    /// the variables of the query
    /// * result_field_opt - an optional name of a field under 'data' that holds the GraphQL
    /// response. If present, the object with name `result_field` under `data` will be returned.
    /// If `None`, the `data` object will be returned.
    ///
    /// # Errors
    ///
    /// * [`ClientRequestFailed`] - if the request cannot be sent or the response is not JSON
    /// * [`PayloadNotFound`] - if the response holds no `data`, as when the query fails
    /// validation, or `data` holds no `result_field`
    ///
    /// [`ClientRequestFailed`]: ../enum.Error.html#variant.ClientRequestFailed
    /// [`PayloadNotFound`]: ../enum.Error.html#variant.PayloadNotFound
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// # use usergql::Client;
    ///
    /// # #[actix_web::main]
    /// # async fn main() {
    /// let client = Client::new_with_http("http://localhost:4000/graphql", None).unwrap();
    ///
    /// let user = client
    ///     .graphql(r#"query { GetUser(user_id: "1") { id name } }"#, None, Some("GetUser"))
    ///     .await;
    /// # }
    /// ```
    pub async fn graphql(
        &self,
        query: &str,
        variables: Option<&Value>,
        result_field_opt: Option<&str>,
    ) -> Result<Value, Error> {
        trace!(
            "Client::graphql called -- query: {} | variables: {:#?} | result_field: {:#?}",
            query,
            variables,
            result_field_opt,
        );

        let mut body = match self {
            Client::Http { endpoint, headers } => {
                let req_body = json!({
                    "query": query.to_string(),
                    "variables": variables
                });
                debug!("Client::graphql making request -- req_body: {}", req_body);

                let client = reqwest::Client::new();
                let response = client
                    .post(endpoint.as_str())
                    .headers(headers.clone())
                    .json(&req_body)
                    .send()
                    .await?;
                response.json::<Value>().await?
            }
            Client::Local { engine } => {
                engine
                    .execute(query.to_string(), variables.cloned())
                    .await?
            }
        };
        debug!("Client::graphql -- response body: {:#?}", body);

        let data = body
            .as_object_mut()
            .and_then(|m| m.remove("data"))
            .filter(|d| !d.is_null());

        match (data, result_field_opt) {
            (Some(mut d), Some(result_field)) => d
                .as_object_mut()
                .and_then(|dm| dm.remove(result_field))
                .ok_or(Error::PayloadNotFound { response: body }),
            (Some(d), None) => Ok(d),
            (None, _) => Err(Error::PayloadNotFound { response: body }),
        }
    }

    /// Reads the user through the `GetUser` query
    ///
    /// # Arguments
    ///
    /// * user_id - passed as the `user_id` argument of `GetUser`
    /// * shape - the GraphQL selection set of fields to return, such as `id name department { id }`
    ///
    /// # Return
    ///
    /// A [`serde_json::Value`] holding the selected fields of the user
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use usergql::{Client, Engine};
    /// # use usergql::engine::schema::static_user;
    ///
    /// # #[actix_web::main]
    /// # async fn main() -> Result<(), usergql::Error> {
    /// let client = Client::new_with_engine(Engine::new(static_user()));
    /// let user = client.get_user("anyone", "name age").await?;
    ///
    /// assert_eq!(user["name"], "Test user");
    /// assert_eq!(user["age"], 25);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_user(&self, user_id: &str, shape: &str) -> Result<Value, Error> {
        trace!(
            "Client::get_user called -- user_id: {} | shape: {}",
            user_id,
            shape
        );

        let query = format!(
            "query GetUser($user_id: String!) {{ GetUser(user_id: $user_id) {{ {} }} }}",
            shape
        );
        self.graphql(&query, Some(&json!({ "user_id": user_id })), Some("GetUser"))
            .await
    }
}
