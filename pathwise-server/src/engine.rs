//! The pathwise engine: command dispatcher over the shared graph store.
//!
//! Turns a protocol line into a store call and the store's answer into a
//! response line. The engine holds no per-session state; one instance is
//! shared by every connection.

use std::fmt;

use pathwise_core::types::{Distance, NodeId, Weight};
use pathwise_graph::store::GraphStore;
use pathwise_proto::messages;
use pathwise_query::parser::{parse_command, Command};

// ─── Response types ──────────────────────────────────────────────────────────

/// Response from executing a command. `Display` renders the wire text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResponse {
    NodeAdded,
    NodeAlreadyExists,
    NodeRemoved,
    EdgeAdded,
    EdgeRemoved,
    NodeNotFound,
    Distance(Distance),
    Nodes(Vec<NodeId>),
    Unrecognized,
    /// The session should end. Renders as an empty line.
    Close,
}

impl CommandResponse {
    pub fn is_close(&self) -> bool {
        matches!(self, CommandResponse::Close)
    }
}

impl fmt::Display for CommandResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandResponse::NodeAdded => f.write_str(messages::NODE_ADDED),
            CommandResponse::NodeAlreadyExists => f.write_str(messages::NODE_ALREADY_EXISTS),
            CommandResponse::NodeRemoved => f.write_str(messages::NODE_REMOVED),
            CommandResponse::EdgeAdded => f.write_str(messages::EDGE_ADDED),
            CommandResponse::EdgeRemoved => f.write_str(messages::EDGE_REMOVED),
            CommandResponse::NodeNotFound => f.write_str(messages::NODE_NOT_FOUND),
            CommandResponse::Distance(d) => write!(f, "{d}"),
            CommandResponse::Nodes(nodes) => f.write_str(&nodes.join(",")),
            CommandResponse::Unrecognized => f.write_str(messages::UNRECOGNIZED),
            CommandResponse::Close => Ok(()),
        }
    }
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// Command dispatcher owning the graph store.
#[derive(Default)]
pub struct Engine {
    store: GraphStore,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(store: GraphStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    /// Process one line and return the text to send back. Empty for the
    /// termination phrase.
    pub fn process_response(&self, line: &str) -> String {
        self.execute_line(line).to_string()
    }

    /// Parse and execute one line. Parse failures become `Unrecognized`.
    pub fn execute_line(&self, line: &str) -> CommandResponse {
        tracing::info!(client = line, "command received");
        match parse_command(line) {
            Ok(cmd) => self.execute_command(cmd),
            Err(e) => {
                tracing::info!("rejected: {e}");
                CommandResponse::Unrecognized
            }
        }
    }

    /// Execute a parsed command and return a response.
    pub fn execute_command(&self, cmd: Command) -> CommandResponse {
        match cmd {
            Command::AddNode(id) => self.handle_add_node(&id),
            Command::RemoveNode(id) => self.handle_remove_node(&id),
            Command::AddEdge {
                source,
                destination,
                weight,
            } => self.handle_add_edge(&source, &destination, weight),
            Command::RemoveEdge {
                source,
                destination,
            } => self.handle_remove_edge(&source, &destination),
            Command::ShortestPath {
                source,
                destination,
            } => self.handle_shortest_path(&source, &destination),
            Command::CloserThan { limit, source } => self.handle_closer_than(limit, &source),
            Command::Bye => CommandResponse::Close,
        }
    }

    // ── Mutations ────────────────────────────────────────────────────────

    fn handle_add_node(&self, id: &str) -> CommandResponse {
        if self.store.add_node(id) {
            CommandResponse::NodeAdded
        } else {
            tracing::debug!(node = id, "node already exists");
            CommandResponse::NodeAlreadyExists
        }
    }

    fn handle_remove_node(&self, id: &str) -> CommandResponse {
        if self.store.remove_node(id) {
            CommandResponse::NodeRemoved
        } else {
            tracing::debug!(node = id, "node not found");
            CommandResponse::NodeNotFound
        }
    }

    fn handle_add_edge(&self, source: &str, destination: &str, weight: Weight) -> CommandResponse {
        if self.store.add_edge(source, destination, weight) {
            CommandResponse::EdgeAdded
        } else {
            CommandResponse::NodeNotFound
        }
    }

    fn handle_remove_edge(&self, source: &str, destination: &str) -> CommandResponse {
        if self.store.remove_edge(source, destination) {
            CommandResponse::EdgeRemoved
        } else {
            CommandResponse::NodeNotFound
        }
    }

    // ── Queries ──────────────────────────────────────────────────────────

    /// A zero distance is reported the same way as a missing node.
    fn handle_shortest_path(&self, source: &str, destination: &str) -> CommandResponse {
        match self.store.shortest_path(source, destination) {
            Some(d) if d > 0 => CommandResponse::Distance(d),
            _ => CommandResponse::NodeNotFound,
        }
    }

    fn handle_closer_than(&self, limit: Weight, source: &str) -> CommandResponse {
        match self.store.closer_than(Distance::from(limit), source) {
            Some(nodes) => CommandResponse::Nodes(nodes.into_iter().collect()),
            None => CommandResponse::NodeNotFound,
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn make_engine() -> Engine {
        Engine::new()
    }

    fn abc_engine() -> Engine {
        let engine = make_engine();
        for line in [
            "ADD NODE A",
            "ADD NODE B",
            "ADD NODE C",
            "ADD EDGE A B 1",
            "ADD EDGE B C 2",
        ] {
            let resp = engine.process_response(line);
            assert!(resp == "NODE ADDED" || resp == "EDGE ADDED", "{line}: {resp}");
        }
        engine
    }

    #[test]
    fn test_add_node() {
        let engine = make_engine();
        assert_eq!(engine.process_response("ADD NODE A"), "NODE ADDED");
        assert_eq!(
            engine.process_response("ADD NODE A"),
            "ERROR: NODE ALREADY EXISTS"
        );
    }

    #[test]
    fn test_remove_node() {
        let engine = make_engine();
        assert_eq!(engine.process_response("REMOVE NODE A"), "ERROR: NODE NOT FOUND");
        engine.process_response("ADD NODE A");
        assert_eq!(engine.process_response("REMOVE NODE A"), "NODE REMOVED");
    }

    #[test]
    fn test_add_edge_missing_node() {
        let engine = make_engine();
        engine.process_response("ADD NODE A");
        assert_eq!(
            engine.process_response("ADD EDGE A B 1"),
            "ERROR: NODE NOT FOUND"
        );
        assert_eq!(engine.store().edge_count(), 0);
    }

    #[test]
    fn test_remove_edge() {
        let engine = abc_engine();
        assert_eq!(engine.process_response("REMOVE EDGE A B"), "EDGE REMOVED");
        assert_eq!(
            engine.process_response("REMOVE EDGE A Z"),
            "ERROR: NODE NOT FOUND"
        );
        assert_eq!(
            engine.process_response("SHORTEST PATH A C"),
            "ERROR: NODE NOT FOUND"
        );
    }

    #[test]
    fn test_shortest_path() {
        let engine = abc_engine();
        assert_eq!(engine.process_response("SHORTEST PATH A C"), "3");
        assert_eq!(engine.process_response("SHORTEST PATH A B"), "1");
    }

    #[test]
    fn test_shortest_path_unreachable_renders_not_found() {
        let engine = abc_engine();
        assert_eq!(
            engine.process_response("SHORTEST PATH C A"),
            "ERROR: NODE NOT FOUND"
        );
    }

    #[test]
    fn test_shortest_path_zero_renders_not_found() {
        let engine = abc_engine();
        engine.process_response("ADD NODE D");
        engine.process_response("ADD EDGE C D 0");
        assert_eq!(engine.store().shortest_path("C", "D"), Some(0));
        assert_eq!(
            engine.process_response("SHORTEST PATH C D"),
            "ERROR: NODE NOT FOUND"
        );
        assert_eq!(
            engine.process_response("SHORTEST PATH A A"),
            "ERROR: NODE NOT FOUND"
        );
    }

    #[test]
    fn test_closer_than() {
        let engine = abc_engine();
        assert_eq!(engine.process_response("CLOSER THAN 3 A"), "B,C");
        assert_eq!(engine.process_response("CLOSER THAN 2 A"), "B");
        assert_eq!(engine.process_response("CLOSER THAN 0 A"), "");
        assert_eq!(
            engine.process_response("CLOSER THAN 3 Z"),
            "ERROR: NODE NOT FOUND"
        );
    }

    #[test]
    fn test_empty_closer_than_is_not_close() {
        let engine = abc_engine();
        let resp = engine.execute_line("CLOSER THAN 0 A");
        assert_eq!(resp, CommandResponse::Nodes(vec![]));
        assert!(!resp.is_close());
    }

    #[test]
    fn test_bye_closes() {
        let engine = make_engine();
        assert!(engine.execute_line("BYE MATE!").is_close());
        assert_eq!(engine.process_response("BYE MATE!"), "");
        assert_eq!(engine.process_response(""), "");
    }

    #[test]
    fn test_unrecognized() {
        let engine = make_engine();
        for line in [
            "HELLO",
            "ADD NODE",
            "ADD EDGE A B x",
            "CLOSER THAN x A",
            "REMOVE EDGE A",
            "SHORTEST PATH A",
        ] {
            assert_eq!(
                engine.process_response(line),
                "SORRY, I DIDN'T UNDERSTAND THAT",
                "{line}"
            );
        }
    }

    #[test]
    fn test_display_distance() {
        assert_eq!(CommandResponse::Distance(42).to_string(), "42");
        assert_eq!(
            CommandResponse::Nodes(vec!["A".into(), "B".into()]).to_string(),
            "A,B"
        );
    }
}
