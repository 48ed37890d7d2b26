/// Which condition promotes a caller's lookahead into the closure items of a
/// called machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookaheadPolicy {
  /// Promote when the position after the call is nullable.
  Continuation,
  /// Promote when the initial position of the called machine is nullable.
  Callee,
}

impl Default for LookaheadPolicy {
  fn default() -> Self {
    LookaheadPolicy::Continuation
  }
}

/// Symbol conventions and knobs used when loading a net and building its pilot.
#[derive(Debug, Clone)]
pub struct Config {
  /// Name of the axiom machine.
  pub axiom: String,
  /// Arc label denoting an empty move.
  pub epsilon: String,
  /// End-of-input lookahead. Never valid as an arc label.
  pub tap: String,
  pub lookahead: LookaheadPolicy,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      axiom: "S".to_owned(),
      epsilon: "ε".to_owned(),
      tap: "⊣".to_owned(),
      lookahead: LookaheadPolicy::default(),
    }
  }
}
