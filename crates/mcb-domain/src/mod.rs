//! Domain layer: core types and port traits for the code-aware retrieval platform.
//!
//! This crate has no dependency on any concrete provider, framework, or I/O library
//! beyond serialization and async trait plumbing. Everything here is pure business
//! logic and contracts that the application and provider layers build on.

/// Domain-level constants shared by the application and provider layers.
pub mod constants;
/// Core domain entities: chunks, vectors, search hits, evaluation data.
pub mod entities;
/// Error handling types.
pub mod error;
/// Port (trait) definitions that external layers implement.
pub mod ports;
/// Immutable value objects.
pub mod value_objects;
