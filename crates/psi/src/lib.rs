//! Project Server (PSI) client library.
//!
//! Provides the JSON wire types, an HTTP client for the Project, Archive
//! and QueueSystem services, the [`server::ProjectServer`] seam used by the
//! deletion workflow, and the queue job poller.

pub mod api;
pub mod fault;
pub mod poller;
pub mod server;
pub mod wire;
