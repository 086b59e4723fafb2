//! Shared domain types for Aula.
//!
//! This crate contains the types exchanged by every layer of the lesson
//! request wizard: the wizard state and its step enum, validation and draft
//! envelopes, generation request/result shapes, configuration, and errors.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod error;
pub mod generation;
pub mod wizard;
