mod mcts_agent;
mod node;
mod search;

pub use mcts_agent::MctsAgent;
pub use node::{Node, NodeId, SearchTree};
pub use search::{mcts_search, MctsConfig, MctsSearch, Outcome};
