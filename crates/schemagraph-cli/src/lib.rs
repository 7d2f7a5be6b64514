//! schemagraph-cli - Manifest-driven schema and dispatch generation
//!
//! The `schemagraph` binary reads a `schemagraph.toml` manifest, resolves the
//! declared type graph with [`schemagraph_core`], and writes one JSON Schema
//! document per root plus Rust decode functions for every discriminated union.

pub mod codegen;
pub mod generate;
pub mod logging;
pub mod manifest;
pub mod scan;
pub mod type_expr;
