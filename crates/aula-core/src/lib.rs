//! Business logic and port trait definitions for Aula.
//!
//! This crate defines the "ports" (storage, session, generation and directory
//! traits) that the infrastructure layer implements. It depends only on
//! `aula-types` -- never on `aula-infra` or any database/HTTP crate.

pub mod auth;
pub mod directory;
pub mod draft;
pub mod generation;
pub mod wizard;
