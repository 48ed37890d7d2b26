use log::debug;
use crate::net::*;
use super::token_set::TermSet;

/// Nullability and initials of every position of a net.
#[derive(Debug)]
pub struct Analysis {
  nullable: Vec<bool>,
  initials: Vec<TermSet>,
}

impl Analysis {
  pub fn new(net: &Net) -> Self {
    let nullable = gen_nullable(net);
    let initials = gen_initials(net, &nullable);
    debug!("analysed {} positions over {} terminals, {} nullable",
      net.num_positions(), net.num_terms(),
      nullable.iter().filter(|&&n| n).count());
    Analysis {
      nullable,
      initials,
    }
  }

  /// Whether the empty string can be matched from `pos`.
  pub fn nullable(&self, pos: PosId) -> bool {
    self.nullable[pos.0 as usize]
  }

  /// Terminals that can be read first from `pos`.
  pub fn initials(&self, pos: PosId) -> &TermSet {
    &self.initials[pos.0 as usize]
  }
}

/// A position is nullable if it is accepting, or an empty move leads to a
/// nullable position, or it calls a machine whose initial position is
/// nullable and continues to a nullable position.
///
/// Least fixed point, so cycles of empty moves contribute nothing.
pub(super) fn gen_nullable(
  net: &Net,
) -> Vec<bool> {
  let mut nullable = net.positions()
    .map(|(_, pos)| pos.is_accepting())
    .collect::<Vec<_>>();

  loop {
    let mut changed = false;
    for (id, pos) in net.positions() {
      if nullable[id.0 as usize] {
        continue;
      }
      if pos.arcs().iter().any(|arc| is_nullable_arc(net, &nullable, arc)) {
        nullable[id.0 as usize] = true;
        changed = true;
      }
    }
    if !changed {
      break;
    }
  }

  nullable
}

fn is_nullable_arc(net: &Net, nullable: &[bool], arc: &Arc) -> bool {
  let target = nullable[arc.target.0 as usize];
  match arc.label {
    Label::Term(_) => false,
    Label::Epsilon => target,
    Label::Nonterm(id) => target && nullable[net.initial(id).0 as usize],
  }
}

/// Initials of every position, by iterating the defining equations until no
/// set grows. Each position collects
///
/// - terminals on its own arcs,
/// - initials of the initial position of every machine it calls,
/// - initials of the continuation of a call whose machine is nullable,
/// - initials of the target of an empty move.
pub(super) fn gen_initials(
  net: &Net,
  nullable: &[bool],
) -> Vec<TermSet> {
  let mut buf = TermSet::new(net.num_terms());
  let mut initials = vec![buf.clone(); net.num_positions()];

  let mut rounds = 0;
  loop {
    let mut changed = false;
    for (id, pos) in net.positions() {
      buf.clear();
      for arc in pos.arcs() {
        match arc.label {
          Label::Term(t) => buf.insert(t),
          Label::Nonterm(nt) => {
            let callee = net.initial(nt);
            buf.union_with(&initials[callee.0 as usize]);
            if nullable[callee.0 as usize] {
              buf.union_with(&initials[arc.target.0 as usize]);
            }
          }
          Label::Epsilon => {
            buf.union_with(&initials[arc.target.0 as usize]);
          }
        };
      }
      changed |= initials[id.0 as usize].union_with(&buf);
    }
    rounds += 1;
    if !changed {
      break;
    }
  }
  debug!("initials stable after {} rounds", rounds);

  initials
}
