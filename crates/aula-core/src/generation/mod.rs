//! Generation pipeline for the wizard's terminal step.
//!
//! - `GenerationClient`: RPITIT port to a remote generation function
//! - `build_request`: deterministic projection of the wizard state
//! - `classify_outcome`: ordered mapping of call results to `GenerationResult`
//! - `GenerationOrchestrator`: session check, call and classification

pub mod classify;
pub mod client;
pub mod orchestrator;
pub mod request;
