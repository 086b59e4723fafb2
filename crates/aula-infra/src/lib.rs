//! Infrastructure layer for Aula.
//!
//! Contains implementations of the port traits defined in `aula-core`:
//! SQLite draft storage, HTTP clients for the hosted backend, session
//! providers (environment, OS keychain), and config/data-dir resolution.

pub mod config;
pub mod filesystem;
pub mod remote;
pub mod session;
pub mod sqlite;
