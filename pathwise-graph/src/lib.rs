//! The graph store shared by every session, and the path engine it runs
//! for shortest-path and closer-than queries.

pub mod path;
pub mod store;
