//! Compiles parsed YANG statement trees into a ConfM Java class model, its
//! rendered sources, a path-indexed schema and a documentation index.
pub mod cli;
pub mod codegen;
pub mod compile;
pub mod config;
pub mod diag;
pub mod emit;
pub mod error;
pub mod hierarchy;
pub mod model;
pub mod path_de;
pub mod schema;
pub mod stmt;
