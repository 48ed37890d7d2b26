use thiserror::Error;

/// A machine net that cannot be turned into a pilot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetError {
  #[error("axiom machine `{0}` is not defined")]
  MissingAxiom(String),
  #[error("machine `{0}` is defined more than once")]
  DuplicateMachine(String),
  #[error("position `{position}` appears in machines `{first}` and `{second}`")]
  DuplicatePosition {
    position: String,
    first: String,
    second: String,
  },
  #[error("machine `{0}` has no initial position")]
  MissingInitial(String),
  #[error("machine `{machine}` has several initial positions: `{first}`, `{second}`")]
  MultipleInitial {
    machine: String,
    first: String,
    second: String,
  },
  #[error("arc {from} -> {to} in machine `{machine}` calls undefined nonterminal `{label}`")]
  UnknownNonterminal {
    machine: String,
    from: String,
    to: String,
    label: String,
  },
  #[error("arc {from} -> {to} is labeled with the reserved end marker `{label}`")]
  ReservedLabel {
    from: String,
    to: String,
    label: String,
  },
  #[error("arc {from} -> {to} has an empty label")]
  EmptyLabel {
    from: String,
    to: String,
  },
}
