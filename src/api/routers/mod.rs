//! Per-resource request builders.
//!
//! Each router is created from the client it forwards to, selects the entry
//! point its paths live under, and maps its methods onto fixed paths.

pub mod graphql;
pub mod hr;
pub mod metadata;
pub mod workdays;
