//! Domain types and pure logic for bulk project deletion.
//!
//! Nothing in this crate talks to the network; the remote client lives in
//! `purge-psi` and the command-line front end in `purge-cli`.

pub mod error;
pub mod input;
pub mod resolver;
pub mod types;
