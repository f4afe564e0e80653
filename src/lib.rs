//! # Coredata API client
//!
//! A Rust client for the Coredata document API, covering create, read,
//! update, and delete over its fixed set of resource collections with
//! transparent pagination draining.
//!
//! ## Overview
//!
//! This crate provides:
//! - A closed [`Entity`] enum for the API's resource collections
//! - [`CoredataClient`] with `create`, `get`, `get_content`, `edit`, and
//!   `delete` operations
//! - A [`GetRequest`] builder for filters, nesting, and pagination inputs
//! - Pure query-parameter merging via [`add_url_parameters`]
//! - A single [`CoredataError`] taxonomy for every failure
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use coredata_api::{CoredataClient, Credentials, Entity, GetRequest};
//!
//! let client = CoredataClient::new(
//!     "https://example.coredata.is",
//!     Credentials::new("alice", "hunter2"),
//! )?;
//!
//! // Create a document; the new identifier comes from the Location header.
//! let payload = serde_json::json!({"space": space_id, "title": "From the API"});
//! let id = client.create(Entity::Projects, &payload, true).await?;
//!
//! // Fetch the whole collection. Server pagination is drained internally:
//! // the returned list holds every page's objects, in order.
//! let projects = client.get(&GetRequest::new(Entity::Projects)).await?;
//!
//! // Fetch one instance (always a one-element list), then replace it.
//! let mut doc = client
//!     .get(&GetRequest::new(Entity::Projects).id(&id))
//!     .await?
//!     .remove(0);
//! doc["title"] = "Renamed".into();
//! client.edit(Entity::Projects, &id, &doc, true).await?;
//!
//! // Raw file bytes bypass JSON decoding entirely.
//! let bytes = client.get_content(Entity::Files, &file_id, true).await?;
//!
//! client.delete(Entity::Projects, &id, true).await?;
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: the host and credential pair are explicit, owned,
//!   immutable values held by each client instance
//! - **Fail-fast validation**: the host is validated at construction, before
//!   any network activity; unknown collection names fail at the boundary
//! - **No retries**: every failure surfaces immediately as [`CoredataError`];
//!   a partial pagination failure aborts the whole call
//! - **Thread-safe**: the client is `Send + Sync`, with no locking of its own

pub mod client;
pub mod config;
pub mod entity;
pub mod error;
pub mod query;

// Re-export public types at crate root for convenience
pub use client::{CoredataClient, GetRequest, DEFAULT_LIMIT};
pub use config::Credentials;
pub use entity::Entity;
pub use error::CoredataError;
pub use query::add_url_parameters;
