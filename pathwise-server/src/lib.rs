//! pathwise server: the command dispatcher and the TCP session loop.

pub mod engine;
pub mod session;
