//! Plain description of a machine net, as produced by a loader.
//!
//! Nothing here is validated; [`Net::new`](crate::net::Net::new) does that.

/// An unvalidated machine net: one machine per nonterminal.
#[derive(Debug, Clone, Default)]
pub struct Grammar {
  pub(crate) machines: Vec<Machine>,
}

/// Description of the finite-state machine of one nonterminal.
#[derive(Debug, Clone)]
pub struct Machine {
  pub(crate) name: String,
  pub(crate) initial: Vec<String>,
  pub(crate) accepting: Vec<String>,
  pub(crate) arcs: Vec<Arc>,
}

#[derive(Debug, Clone)]
pub(crate) struct Arc {
  pub(crate) from: String,
  pub(crate) to: String,
  pub(crate) label: String,
}

impl Machine {
  /// Marks `pos` as the initial position.
  pub fn initial(mut self, pos: impl Into<String>) -> Self {
    self.initial.push(pos.into());
    self
  }

  /// Marks `pos` as an accepting position.
  pub fn accepting(mut self, pos: impl Into<String>) -> Self {
    self.accepting.push(pos.into());
    self
  }

  /// Adds a transition `from -label-> to`.
  ///
  /// `label` is a terminal, the name of a machine, or the configured epsilon.
  pub fn arc(
    mut self,
    from: impl Into<String>,
    to: impl Into<String>,
    label: impl Into<String>,
  ) -> Self {
    self.arcs.push(Arc {
      from: from.into(),
      to: to.into(),
      label: label.into(),
    });
    self
  }

  /// Position names in order of first mention: initial, arcs, accepting.
  pub(crate) fn positions(&self) -> Vec<&str> {
    let mut names: Vec<&str> = vec![];
    let mentioned = self.initial.iter()
      .map(String::as_str)
      .chain(self.arcs.iter().flat_map(|arc| {
        vec![arc.from.as_str(), arc.to.as_str()]
      }))
      .chain(self.accepting.iter().map(String::as_str));
    for name in mentioned {
      if !names.contains(&name) {
        names.push(name);
      }
    }
    names
  }
}

pub fn machine(
  name: impl Into<String>,
) -> Machine {
  Machine {
    name: name.into(),
    initial: vec![],
    accepting: vec![],
    arcs: vec![],
  }
}

pub fn grammar(
  machines: impl IntoIterator<Item = Machine>,
) -> Grammar {
  Grammar {
    machines: machines.into_iter().collect(),
  }
}
