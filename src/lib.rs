//! Construction of the pilot, the canonical LR automaton of a grammar given
//! as a net of finite-state machines, one machine per nonterminal.

pub mod config;
pub mod error;
pub mod grammar;
pub mod net;
pub mod pilot;

pub use config::{Config, LookaheadPolicy};
pub use error::NetError;
pub use grammar::{grammar, machine, Grammar};
pub use pilot::Pilot;

pub fn build(grammar: Grammar) -> Result<Pilot, NetError> {
  Pilot::new(grammar, &Config::default())
}

pub fn build_with(grammar: Grammar, config: &Config) -> Result<Pilot, NetError> {
  Pilot::new(grammar, config)
}
