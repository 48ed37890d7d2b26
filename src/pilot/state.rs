use std::collections::{BTreeSet, VecDeque};
use indexmap::IndexMap;
use log::{debug, trace};
use crate::config::LookaheadPolicy;
use crate::net::*;
use super::sets::Analysis;

/// A candidate: a position paired with one lookahead symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Item {
  pub pos: PosId,
  pub la: Lookahead,
}

impl Item {
  pub fn new(pos: PosId, la: Lookahead) -> Self {
    Item { pos, la }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(pub(crate) u32);

/// A node of the pilot: base items, the items their closure adds, and the
/// outgoing transitions.
#[derive(Debug)]
pub struct MacroState {
  id: StateId,
  base: BTreeSet<Item>,
  /// disjoint from `base`
  closure: BTreeSet<Item>,
  /// label -> target state, never an empty move
  transitions: IndexMap<Label, StateId>,
}

impl MacroState {
  pub fn id(&self) -> StateId {
    self.id
  }

  pub fn base(&self) -> &BTreeSet<Item> {
    &self.base
  }

  pub fn closure(&self) -> &BTreeSet<Item> {
    &self.closure
  }

  /// Base and closure items, in item order.
  pub fn items(&self) -> impl Iterator<Item = Item> + '_ {
    self.base.union(&self.closure).copied()
  }

  pub fn transitions(&self) -> &IndexMap<Label, StateId> {
    &self.transitions
  }

  pub fn goto(&self, label: Label) -> Option<StateId> {
    self.transitions.get(&label).copied()
  }
}

/// Identity of a macro-state: base and closure merged and sorted.
///
/// Hash and equality both derive from this single projection.
pub(crate) type StateKey = Vec<Item>;

pub(crate) fn state_key(base: &BTreeSet<Item>, closure: &BTreeSet<Item>) -> StateKey {
  base.union(closure).copied().collect()
}

/// Items added to `base` by the closure operator; never contains an item of
/// `base`.
pub(crate) fn closure(
  net: &Net,
  analysis: &Analysis,
  policy: LookaheadPolicy,
  base: &BTreeSet<Item>,
) -> BTreeSet<Item> {
  let mut closure = BTreeSet::new();
  let mut to_add: VecDeque<Item> = base.iter().copied().collect();

  while let Some(item) = to_add.pop_front() {
    let mut add = |new_item: Item| {
      if !base.contains(&new_item) && closure.insert(new_item) {
        to_add.push_back(new_item);
      }
    };
    for arc in net.position(item.pos).arcs() {
      match arc.label {
        Label::Nonterm(nt) => {
          let callee = net.initial(nt);
          let promote = match policy {
            LookaheadPolicy::Continuation => analysis.nullable(arc.target),
            LookaheadPolicy::Callee => analysis.nullable(callee),
          };
          if promote {
            add(Item::new(callee, item.la));
          }
          for t in analysis.initials(arc.target).iter() {
            add(Item::new(callee, Lookahead::Term(t)));
          }
        }
        Label::Epsilon => add(Item::new(arc.target, item.la)),
        Label::Term(_) => {}
      }
    }
  }

  closure
}

pub(super) struct States<'a> {
  net: &'a Net,
  analysis: &'a Analysis,
  policy: LookaheadPolicy,
  states: IndexMap<StateKey, MacroState>,
}

impl<'a> States<'a> {
  pub(super) fn new(
    net: &'a Net,
    analysis: &'a Analysis,
    policy: LookaheadPolicy,
  ) -> Self {
    States {
      net,
      analysis,
      policy,
      states: IndexMap::new(),
    }
  }

  /// Builds every macro-state reachable from the axiom's initial position
  /// with the tap as lookahead. The seed state gets id 0.
  pub(super) fn build(mut self) -> Vec<MacroState> {
    let seed = Item::new(self.net.initial(self.net.axiom()), Lookahead::Tap);
    self.intern(std::iter::once(seed).collect());

    let mut finished = 0;
    while finished < self.states.len() {
      let successors = match self.states.get_index(finished) {
        Some((_, state)) => self.successors(state),
        None => break,
      };
      for (label, base) in successors {
        let target = self.intern(base);
        trace!("I{} -{}-> I{}", finished, self.net.label_name(label), target.0);
        if let Some((_, state)) = self.states.get_index_mut(finished) {
          state.transitions.insert(label, target);
        }
      }
      finished += 1;
    }

    debug!("pilot has {} macro-states", self.states.len());
    self.states.into_iter().map(|(_, state)| state).collect()
  }

  /// Successor bases of `state`, grouped by arc label in order of first
  /// appearance.
  fn successors(&self, state: &MacroState) -> IndexMap<Label, BTreeSet<Item>> {
    let mut next_bases: IndexMap<Label, BTreeSet<Item>> = IndexMap::new();
    for item in state.items() {
      for arc in self.net.position(item.pos).arcs() {
        if arc.label == Label::Epsilon {
          continue;
        }
        next_bases.entry(arc.label)
          .or_insert_with(BTreeSet::new)
          .insert(Item::new(arc.target, item.la));
      }
    }
    next_bases
  }

  /// Closes `base` and returns the id of the structurally equal macro-state,
  /// creating it if there is none yet.
  fn intern(&mut self, base: BTreeSet<Item>) -> StateId {
    let closure = closure(self.net, self.analysis, self.policy, &base);
    let key = state_key(&base, &closure);

    if let Some((ix, _, existing)) = self.states.get_full(&key) {
      debug_assert_eq!(state_key(&existing.base, &existing.closure), key);
      trace!("merged into I{}", ix);
      return existing.id;
    }

    let id = StateId(self.states.len() as u32);
    debug!("new macro-state I{} with {} base and {} closure items",
      id.0, base.len(), closure.len());
    self.states.insert(key, MacroState {
      id,
      base,
      closure,
      transitions: IndexMap::new(),
    });
    id
  }
}
