//! This module provides the usergql engine, including supporting modules for configuration,
//! the GraphQL schema, and the request context handed to resolvers.
//!
//! The [`Engine`] is the only place that talks to the GraphQL execution library. Everything
//! outside this module hands it a query string and optional variables and gets JSON back.
//!
//! [`Engine`]: ./struct.Engine.html

use super::error::Error;
use context::GraphQLContext;
use juniper::http::GraphQLRequest;
use juniper::InputValue;
use log::{debug, trace};
use schema::{create_root_node, RootRef, User};
use std::sync::Arc;

pub mod config;
pub mod context;
pub mod schema;

/// A usergql GraphQL engine.
///
/// The [`Engine`] wraps the Juniper root node for the `Query`/`User`/`Department` schema
/// together with the context that holds the user record. Cloning an engine is cheap; clones share
/// the same root node and the same record.
///
/// [`Engine`]: ./struct.Engine.html
///
/// # Examples
///
/// ```rust
/// use usergql::engine::Engine;
/// use usergql::engine::schema::static_user;
///
/// let engine = Engine::new(static_user());
/// ```
#[derive(Clone)]
pub struct Engine {
    root_node: RootRef,
    context: GraphQLContext,
}

impl Engine {
    /// Creates a new [`Engine`] that answers every `GetUser` query with `user`.
    ///
    /// [`Engine`]: ./struct.Engine.html
    pub fn new(user: User) -> Engine {
        Engine {
            root_node: create_root_node(),
            context: GraphQLContext::new(Arc::new(user)),
        }
    }

    /// Executes a GraphQL query and returns the response as JSON.
    ///
    /// Parse and validation failures are not Rust errors. They come back as a JSON object with an
    /// `errors` array and no `data` key, shaped by the execution library.
    ///
    /// # Arguments
    ///
    /// * query - text of the GraphQL query
    /// * variables - an optional [`serde_json::Value`] object holding the query variables
    ///
    /// # Errors
    ///
    /// * [`VariablesNotParsed`] - if `variables` cannot be read as GraphQL input values
    /// * [`SerializationFailed`] - if the response cannot be converted to JSON
    ///
    /// [`VariablesNotParsed`]: ../enum.Error.html#variant.VariablesNotParsed
    /// [`SerializationFailed`]: ../enum.Error.html#variant.SerializationFailed
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use serde_json::json;
    /// # use usergql::engine::Engine;
    /// # use usergql::engine::schema::static_user;
    ///
    /// # #[actix_web::main]
    /// # async fn main() -> Result<(), usergql::Error> {
    /// let engine = Engine::new(static_user());
    /// let body = engine
    ///     .execute(r#"query { GetUser(user_id: "1") { name } }"#.to_string(), None)
    ///     .await?;
    ///
    /// assert_eq!(body, json!({"data": {"GetUser": {"name": "Test user"}}}));
    /// # Ok(())
    /// # }
    /// ```
    pub async fn execute(
        &self,
        query: String,
        variables: Option<serde_json::Value>,
    ) -> Result<serde_json::Value, Error> {
        trace!(
            "Engine::execute called -- query: {} | variables: {:?}",
            query,
            variables
        );

        let variables = variables
            .map(serde_json::from_value::<InputValue>)
            .transpose()
            .map_err(|e| Error::VariablesNotParsed { source: e })?;

        self.execute_request(&GraphQLRequest::new(query, None, variables))
            .await
    }

    /// Executes an already deserialized GraphQL request, as received by the HTTP transport,
    /// including its operation name. Returns the response as JSON.
    #[tracing::instrument(level = "info", name = "usergql-execute", skip(self, req))]
    pub async fn execute_request(&self, req: &GraphQLRequest) -> Result<serde_json::Value, Error> {
        debug!("Engine::execute_request -- operation: {:?}", req.operation_name);

        let res = req.execute(&self.root_node, &self.context).await;
        if !res.is_ok() {
            debug!("Engine::execute_request -- query rejected by execution layer");
        }

        let body = serde_json::to_value(&res)?;
        trace!("Engine::execute_request -- response: {}", body);

        Ok(body)
    }

    /// Returns the schema in GraphQL schema definition language
    pub fn schema_sdl(&self) -> String {
        self.root_node.as_sdl()
    }

    pub fn user(&self) -> &User {
        self.context.user()
    }
}
