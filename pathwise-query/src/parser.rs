//! Command parser for the pathwise line protocol.
//!
//! A line is recognised when it contains one of the six command phrases
//! anywhere; it is then dispatched on its leading phrase and its exact
//! token count. Anything else is an `UnrecognizedCommand`.

use pathwise_core::error::PathwiseError;
use pathwise_core::types::{NodeId, Weight};
use pathwise_proto::messages::is_termination;

// ─── Command types ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a node.
    AddNode(NodeId),
    /// Remove a node and the edges mentioning it.
    RemoveNode(NodeId),
    /// Add a weighted edge.
    AddEdge {
        source: NodeId,
        destination: NodeId,
        weight: Weight,
    },
    /// Remove matching edges.
    RemoveEdge { source: NodeId, destination: NodeId },
    /// Distance between two nodes.
    ShortestPath { source: NodeId, destination: NodeId },
    /// Closer-than chain from a node.
    CloserThan { limit: Weight, source: NodeId },
    /// Empty input or the termination phrase.
    Bye,
}

const ADD_NODE: &str = "ADD NODE";
const REMOVE_NODE: &str = "REMOVE NODE";
const ADD_EDGE: &str = "ADD EDGE";
const REMOVE_EDGE: &str = "REMOVE EDGE";
const SHORTEST_PATH: &str = "SHORTEST PATH";
const CLOSER_THAN: &str = "CLOSER THAN";

const PHRASES: [&str; 6] = [
    ADD_NODE,
    REMOVE_NODE,
    ADD_EDGE,
    REMOVE_EDGE,
    SHORTEST_PATH,
    CLOSER_THAN,
];

// ─── Tokenizer helpers ──────────────────────────────────────────────────────

/// Split on single spaces. Inner empty tokens are kept, trailing ones dropped.
fn tokenize(input: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = input.split(' ').collect();
    while tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }
    tokens
}

fn unrecognized(input: &str) -> PathwiseError {
    PathwiseError::UnrecognizedCommand(input.to_string())
}

fn parse_weight(token: &str, input: &str) -> Result<Weight, PathwiseError> {
    token.parse::<Weight>().map_err(|_| unrecognized(input))
}

// ─── Main parser ────────────────────────────────────────────────────────────

/// Parse one protocol line into a `Command`.
pub fn parse_command(input: &str) -> Result<Command, PathwiseError> {
    if input.is_empty() || is_termination(input) {
        return Ok(Command::Bye);
    }

    if !PHRASES.iter().any(|phrase| input.contains(phrase)) {
        return Err(unrecognized(input));
    }

    let tokens = tokenize(input);
    let arg = |idx: usize| tokens[idx].to_string();

    match tokens.len() {
        3 if input.starts_with(ADD_NODE) => Ok(Command::AddNode(arg(2))),
        3 if input.starts_with(REMOVE_NODE) => Ok(Command::RemoveNode(arg(2))),
        5 if input.starts_with(ADD_EDGE) => Ok(Command::AddEdge {
            source: arg(2),
            destination: arg(3),
            weight: parse_weight(tokens[4], input)?,
        }),
        4 if input.starts_with(REMOVE_EDGE) => Ok(Command::RemoveEdge {
            source: arg(2),
            destination: arg(3),
        }),
        4 if input.starts_with(SHORTEST_PATH) => Ok(Command::ShortestPath {
            source: arg(2),
            destination: arg(3),
        }),
        4 if input.starts_with(CLOSER_THAN) => Ok(Command::CloserThan {
            limit: parse_weight(tokens[2], input)?,
            source: arg(3),
        }),
        _ => Err(unrecognized(input)),
    }
}
