//! # bubble
//!
//! Command-line front end of `bubble-core`: reads bubble files, applies the
//! layered configuration, and prints reports or exported documents.

pub mod cli;
pub mod config;
