//! Parsing of protocol lines into typed commands.

pub mod parser;
