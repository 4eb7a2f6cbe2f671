mod base_agent;

pub use base_agent::Agent;
