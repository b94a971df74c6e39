//! Output packaging for shadercross.
//!
//! Compiled stages are routed by an [`OutputSink`](router::OutputSink) into one of
//! three formats: discrete per-stage files, named C byte arrays, or a single SGS binary
//! container.

/// C byte array emission.
pub mod bytearray;
/// The SGS binary container.
pub mod container;
/// Error types.
pub mod error;
/// Output routing.
pub mod router;

pub use container::{Container, ContainerWriter, CONTAINER_EXTENSION};
pub use router::{OutputSink, ReflectionTarget};
