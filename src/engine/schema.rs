//! This module provides the GraphQL schema served by usergql: the `Query` root with its single
//! `GetUser` field, the `User` and `Department` object types, and the Juniper root node built from
//! them.
//!
//! Field and argument names are kept exactly as they appear on the wire (`GetUser`, `user_id`,
//! `created_at`), so automatic camel-casing is switched off on every type.

use super::context::GraphQLContext;
use juniper::{graphql_object, EmptyMutation, EmptySubscription, GraphQLObject, RootNode};
use log::trace;
use std::sync::Arc;

/// A department a [`User`] belongs to
#[derive(Clone, Debug, Eq, GraphQLObject, PartialEq)]
#[graphql(rename_all = "none")]
pub struct Department {
    pub id: String,
    pub name: String,
}

/// The user record returned by `GetUser`
#[derive(Clone, Debug, Eq, GraphQLObject, PartialEq)]
#[graphql(rename_all = "none")]
pub struct User {
    /// Opaque identifier. UUID-shaped, but never validated as one.
    pub id: String,
    pub name: String,
    pub age: Option<i32>,
    #[graphql(name = "type")]
    pub kind: String,
    /// Unix timestamp, seconds
    pub created_at: i32,
    pub department: Option<Department>,
}

/// Returns the hardcoded record the service answers every `GetUser` query with
///
/// # Examples
///
/// ```rust
/// use usergql::engine::schema::static_user;
///
/// let u = static_user();
/// assert_eq!(u.id, "8ab517a4-1234-1234-1234-81d618d0b7b7");
/// assert_eq!(u.department.unwrap().name, "Test department");
/// ```
pub fn static_user() -> User {
    User {
        id: "8ab517a4-1234-1234-1234-81d618d0b7b7".to_string(),
        name: "Test user".to_string(),
        age: Some(25),
        kind: "Employee".to_string(),
        created_at: 1_619_770_386,
        department: Some(Department {
            id: "987654".to_string(),
            name: "Test department".to_string(),
        }),
    }
}

/// Resolves `GetUser`. The `user_id` argument is accepted but has no effect on the result.
pub fn resolve_get_user(context: &GraphQLContext, user_id: &str) -> User {
    trace!("resolve_get_user called -- user_id: {}", user_id);
    context.user().clone()
}

/// The root query type
#[derive(Clone, Copy, Debug)]
pub struct Query;

#[graphql_object(context = GraphQLContext, rename_all = "none")]
impl Query {
    #[graphql(name = "GetUser")]
    fn get_user(&self, context: &GraphQLContext, user_id: String) -> User {
        resolve_get_user(context, &user_id)
    }
}

pub type Schema =
    RootNode<'static, Query, EmptyMutation<GraphQLContext>, EmptySubscription<GraphQLContext>>;

pub(super) type RootRef = Arc<Schema>;

pub(super) fn create_root_node() -> RootRef {
    Arc::new(Schema::new(
        Query,
        EmptyMutation::<GraphQLContext>::new(),
        EmptySubscription::<GraphQLContext>::new(),
    ))
}
