//! This module provides a Juniper Context for usergql GraphQL queries. The context carries the
//! user record that every `GetUser` query resolves to.

use super::schema::User;
use juniper::Context;
use std::sync::Arc;

/// Juniper Context for usergql's GraphQL queries.
///
/// The record is built once when the [`Engine`] is created and shared read-only by every request
/// through an [`Arc`]. Nothing mutates it after construction, so requests need no locking.
///
/// [`Engine`]: ../struct.Engine.html
#[derive(Clone, Debug)]
pub struct GraphQLContext {
    user: Arc<User>,
}

impl GraphQLContext {
    /// Takes the shared user record and returns a [`GraphQLContext`] holding it.
    ///
    /// [`GraphQLContext`]: ./struct.GraphQLContext.html
    pub fn new(user: Arc<User>) -> GraphQLContext {
        GraphQLContext { user }
    }

    pub fn user(&self) -> &User {
        &self.user
    }
}

impl Context for GraphQLContext {}
