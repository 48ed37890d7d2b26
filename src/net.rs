use std::collections::HashMap;
use crate::config::Config;
use crate::error::NetError;
use crate::grammar::Grammar;

/// A validated, immutable machine net.
///
/// Positions, machines and terminals are stored in arenas and referred to by
/// dense ids.
#[derive(Debug)]
pub struct Net {
  terms: Vec<String>,
  nonterms: Vec<Nonterm>,
  positions: Vec<Position>,
  position_names: HashMap<String, PosId>,
  axiom: MachineId,
  epsilon: String,
  tap: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PosId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MachineId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TermId(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
  Term(TermId),
  Nonterm(MachineId),
  Epsilon,
}

/// A lookahead symbol: end of input, or a terminal.
///
/// The tap orders before every terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Lookahead {
  Tap,
  Term(TermId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arc {
  pub target: PosId,
  pub label: Label,
}

#[derive(Debug)]
pub struct Position {
  name: String,
  machine: MachineId,
  initial: bool,
  accepting: bool,
  arcs: Vec<Arc>,
}

/// The machine of one nonterminal.
#[derive(Debug)]
pub struct Nonterm {
  name: String,
  initial: PosId,
  /// non-empty, initial first
  positions: Vec<PosId>,
}

impl Position {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn machine(&self) -> MachineId {
    self.machine
  }

  pub fn is_initial(&self) -> bool {
    self.initial
  }

  pub fn is_accepting(&self) -> bool {
    self.accepting
  }

  pub fn arcs(&self) -> &[Arc] {
    &self.arcs
  }
}

impl Nonterm {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn initial(&self) -> PosId {
    self.initial
  }

  pub fn positions(&self) -> &[PosId] {
    &self.positions
  }
}

impl Net {
  /// Validates `grammar` and lays it out in arenas.
  pub fn new(grammar: Grammar, config: &Config) -> Result<Net, NetError> {
    let mut nonterm_names = HashMap::new();
    for (i, machine) in grammar.machines.iter().enumerate() {
      if nonterm_names.insert(machine.name.clone(), MachineId(i as u32)).is_some() {
        return Err(NetError::DuplicateMachine(machine.name.clone()));
      }
    }

    let axiom = match nonterm_names.get(&config.axiom) {
      Some(&id) => id,
      None => return Err(NetError::MissingAxiom(config.axiom.clone())),
    };

    let mut positions = vec![];
    let mut position_names: HashMap<String, PosId> = HashMap::new();
    let mut nonterms = vec![];
    for (i, machine) in grammar.machines.iter().enumerate() {
      let machine_id = MachineId(i as u32);

      let mut ids = vec![];
      for name in machine.positions() {
        if let Some(&other) = position_names.get(name) {
          let owner: &Position = &positions[other.0 as usize];
          return Err(NetError::DuplicatePosition {
            position: name.to_owned(),
            first: grammar.machines[owner.machine.0 as usize].name.clone(),
            second: machine.name.clone(),
          });
        }
        let id = PosId(positions.len() as u32);
        positions.push(Position {
          name: name.to_owned(),
          machine: machine_id,
          initial: false,
          accepting: machine.accepting.iter().any(|a| a == name),
          arcs: vec![],
        });
        position_names.insert(name.to_owned(), id);
        ids.push(id);
      }

      let initial = match machine.initial.first() {
        Some(name) => name,
        None => return Err(NetError::MissingInitial(machine.name.clone())),
      };
      if let Some(other) = machine.initial.iter().find(|&n| n != initial) {
        return Err(NetError::MultipleInitial {
          machine: machine.name.clone(),
          first: initial.clone(),
          second: other.clone(),
        });
      }
      let initial = position_names[initial.as_str()];
      positions[initial.0 as usize].initial = true;
      // initial first
      ids.retain(|&id| id != initial);
      ids.insert(0, initial);

      nonterms.push(Nonterm {
        name: machine.name.clone(),
        initial,
        positions: ids,
      });
    }

    let mut tokens: HashMap<String, TermId> = HashMap::new();
    let mut terms = vec![];
    for machine in &grammar.machines {
      for arc in &machine.arcs {
        let label = if arc.label.is_empty() {
          return Err(NetError::EmptyLabel {
            from: arc.from.clone(),
            to: arc.to.clone(),
          });
        } else if arc.label == config.tap {
          return Err(NetError::ReservedLabel {
            from: arc.from.clone(),
            to: arc.to.clone(),
            label: arc.label.clone(),
          });
        } else if arc.label == config.epsilon {
          Label::Epsilon
        } else if is_nonterm_name(&arc.label) {
          match nonterm_names.get(&arc.label) {
            Some(&id) => Label::Nonterm(id),
            None => return Err(NetError::UnknownNonterminal {
              machine: machine.name.clone(),
              from: arc.from.clone(),
              to: arc.to.clone(),
              label: arc.label.clone(),
            }),
          }
        } else {
          let next = TermId(terms.len() as u32);
          let id = *tokens.entry(arc.label.clone()).or_insert(next);
          if id == next {
            terms.push(arc.label.clone());
          }
          Label::Term(id)
        };

        let from = position_names[arc.from.as_str()];
        let target = position_names[arc.to.as_str()];
        positions[from.0 as usize].arcs.push(Arc { target, label });
      }
    }

    Ok(Net {
      terms,
      nonterms,
      positions,
      position_names,
      axiom,
      epsilon: config.epsilon.clone(),
      tap: config.tap.clone(),
    })
  }

  pub fn axiom(&self) -> MachineId {
    self.axiom
  }

  pub fn nonterm(&self, id: MachineId) -> &Nonterm {
    &self.nonterms[id.0 as usize]
  }

  pub fn nonterms(&self) -> impl Iterator<Item = (MachineId, &Nonterm)> {
    self.nonterms.iter()
      .enumerate()
      .map(|(i, nt)| (MachineId(i as u32), nt))
  }

  /// Initial position of a machine.
  pub fn initial(&self, id: MachineId) -> PosId {
    self.nonterm(id).initial
  }

  pub fn position(&self, id: PosId) -> &Position {
    &self.positions[id.0 as usize]
  }

  pub fn positions(&self) -> impl Iterator<Item = (PosId, &Position)> {
    self.positions.iter()
      .enumerate()
      .map(|(i, pos)| (PosId(i as u32), pos))
  }

  pub fn position_id(&self, name: &str) -> Option<PosId> {
    self.position_names.get(name).copied()
  }

  pub fn num_positions(&self) -> usize {
    self.positions.len()
  }

  pub fn num_terms(&self) -> usize {
    self.terms.len()
  }

  pub fn term_id(&self, name: &str) -> Option<TermId> {
    self.terms.iter()
      .position(|t| t == name)
      .map(|i| TermId(i as u32))
  }

  pub fn term_name(&self, id: TermId) -> &str {
    &self.terms[id.0 as usize]
  }

  pub fn label_name(&self, label: Label) -> &str {
    match label {
      Label::Term(id) => self.term_name(id),
      Label::Nonterm(id) => self.nonterm(id).name(),
      Label::Epsilon => &self.epsilon,
    }
  }

  pub fn lookahead_name(&self, la: Lookahead) -> &str {
    match la {
      Lookahead::Tap => &self.tap,
      Lookahead::Term(id) => self.term_name(id),
    }
  }
}

fn is_nonterm_name(label: &str) -> bool {
  label.chars().next().map_or(false, char::is_uppercase)
}
