//! Store layer for the admin dashboard.
//!
//! Provides the MongoDB connection handle, the opaque [`Record`] type, and
//! the [`DocumentStore`] seam that request-time code reads through.
//!
//! # Design decisions
//!
//! - **One client per process**: [`connect`] builds a single
//!   `mongodb::Client`, verifies it with a `ping`, and hands back a
//!   [`MongoConnection`]. The driver pools connections internally, so the
//!   handle is cloned rather than re-created.
//! - **Handle passed, not global**: callers own the connection and pass it
//!   to whatever needs it. A collection can only be resolved from a
//!   connection that already passed its liveness probe.
//! - **Schema-less records**: documents are returned as `bson::Document`
//!   exactly as the store holds them.

mod connection;
mod error;
mod store;

pub use connection::{connect, ConnectSettings, MongoConnection, DEFAULT_MONGO_URI};
pub use error::DbError;
pub use store::{fetch_all, DocumentStore, MemoryStore, Record};

pub use mongodb::bson;
