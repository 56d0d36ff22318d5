//! Wire format for pathwise: newline-delimited UTF-8 text.
//!
//! `line` holds the tokio codec, `messages` the fixed strings and the
//! greeting/farewell grammar exchanged by server and client.

pub mod line;
pub mod messages;
