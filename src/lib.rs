//! usergql serves a GraphQL endpoint over HTTP that answers a single query field,
//! `GetUser(user_id: String!): User!`, with a static user record.
//!
//! The crate is split the way a larger GraphQL service would be: the [`Engine`] owns the schema
//! and executes queries, the [`Server`] relays HTTP requests to the engine, and the [`Client`]
//! queries either a remote endpoint or an engine in-process.
//!
//! ```rust
//! use serde_json::json;
//! use usergql::engine::schema::static_user;
//! use usergql::Engine;
//!
//! # #[actix_web::main]
//! # async fn main() -> Result<(), usergql::Error> {
//! let engine = Engine::new(static_user());
//! let body = engine
//!     .execute(
//!         r#"query { GetUser(user_id: "any") { department { id name } } }"#.to_string(),
//!         None,
//!     )
//!     .await?;
//!
//! assert_eq!(
//!     body,
//!     json!({"data": {"GetUser": {"department": {"id": "987654", "name": "Test department"}}}})
//! );
//! # Ok(())
//! # }
//! ```

pub use juniper;

pub use client::Client;
pub use engine::config::Configuration;
pub use engine::schema::{Department, User};
pub use engine::Engine;
pub use error::Error;
pub use server::{RunningServer, Server};

pub mod client;
pub mod engine;
pub mod error;
pub mod server;
