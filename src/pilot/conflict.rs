use std::collections::BTreeMap;
use crate::net::*;
use super::state::{MacroState, StateId};

/// A conflict visible in one macro-state. Reported, never resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
  /// `reduce` is accepting with lookahead `lookahead`, which the state also shifts.
  ShiftReduce {
    state: StateId,
    lookahead: Lookahead,
    reduce: PosId,
  },
  /// Several accepting positions reduce on the same lookahead.
  ReduceReduce {
    state: StateId,
    lookahead: Lookahead,
    reduces: Vec<PosId>,
  },
}

pub(super) fn find_conflicts(
  net: &Net,
  states: &[MacroState],
) -> Vec<Conflict> {
  let mut conflicts = vec![];

  for state in states {
    let mut reduces: BTreeMap<Lookahead, Vec<PosId>> = BTreeMap::new();
    for item in state.items() {
      if net.position(item.pos).is_accepting() {
        reduces.entry(item.la).or_default().push(item.pos);
      }
    }

    for (lookahead, positions) in reduces {
      if let Lookahead::Term(t) = lookahead {
        if state.goto(Label::Term(t)).is_some() {
          for &reduce in &positions {
            conflicts.push(Conflict::ShiftReduce {
              state: state.id(),
              lookahead,
              reduce,
            });
          }
        }
      }
      if positions.len() > 1 {
        conflicts.push(Conflict::ReduceReduce {
          state: state.id(),
          lookahead,
          reduces: positions,
        });
      }
    }
  }

  conflicts
}
