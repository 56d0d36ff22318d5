//! Core types shared by every pathwise crate: the edge record, the error
//! type and the server configuration.

pub mod config;
pub mod error;
pub mod types;
