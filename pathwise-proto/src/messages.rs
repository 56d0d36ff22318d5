//! Fixed protocol strings and the handshake grammar.
//!
//! ```text
//! S: HI, I'M <session-id>
//! C: HI, I'M <NAME>
//! S: HI, <NAME>
//! C: <command>            (repeated)
//! S: <response>
//! C: BYE MATE!
//! S: BYE <NAME>, WE SPOKE FOR <ms> MS
//! ```

/// A line containing this phrase ends the session.
pub const TERMINATION_PHRASE: &str = "BYE MATE!";

/// Prefix of both greetings.
pub const GREETING_PREFIX: &str = "HI, I'M ";

pub const UNRECOGNIZED: &str = "SORRY, I DIDN'T UNDERSTAND THAT";
pub const NODE_ADDED: &str = "NODE ADDED";
pub const NODE_REMOVED: &str = "NODE REMOVED";
pub const EDGE_ADDED: &str = "EDGE ADDED";
pub const EDGE_REMOVED: &str = "EDGE REMOVED";
pub const NODE_ALREADY_EXISTS: &str = "ERROR: NODE ALREADY EXISTS";
pub const NODE_NOT_FOUND: &str = "ERROR: NODE NOT FOUND";

/// `HI, I'M <id>`, sent by the server on connect and by the client in reply.
pub fn greeting(id: &str) -> String {
    format!("{GREETING_PREFIX}{id}")
}

/// Extract the name from a client greeting. A line without the expected
/// prefix is taken whole as the name.
pub fn parse_greeting(line: &str) -> &str {
    line.strip_prefix(GREETING_PREFIX).unwrap_or(line).trim()
}

/// `HI, <name>`
pub fn greeting_reply(name: &str) -> String {
    format!("HI, {name}")
}

/// `BYE <name>, WE SPOKE FOR <ms> MS`
pub fn farewell(name: &str, elapsed_ms: u128) -> String {
    format!("BYE {name}, WE SPOKE FOR {elapsed_ms} MS")
}

/// Whether `line` is a server farewell.
pub fn is_farewell(line: &str) -> bool {
    line.starts_with("BYE ") && line.ends_with(" MS") && line.contains(", WE SPOKE FOR ")
}

/// Whether `line` asks to end the session.
pub fn is_termination(line: &str) -> bool {
    line.contains(TERMINATION_PHRASE)
}
