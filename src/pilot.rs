use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use log::debug;
use crate::config::Config;
use crate::error::NetError;
use crate::grammar::Grammar;
use crate::net::Net;

mod conflict;
mod sets;
mod state;
mod token_set;

pub use conflict::Conflict;
pub use sets::Analysis;
pub use state::{Item, MacroState, StateId};
pub use token_set::TermSet;

/// The pilot automaton of a machine net, together with the net and its
/// analysis.
#[derive(Debug)]
pub struct Pilot {
  net: Net,
  analysis: Analysis,
  /// indexed by `StateId`, seed first
  states: Vec<MacroState>,
}

impl Pilot {
  pub(crate) fn new(grammar: Grammar, config: &Config) -> Result<Self, NetError> {
    let net = Net::new(grammar, config)?;
    debug!("loaded {} machines, axiom `{}`",
      net.nonterms().count(), net.nonterm(net.axiom()).name());
    let analysis = Analysis::new(&net);
    let states = state::States::new(&net, &analysis, config.lookahead).build();
    Ok(Pilot {
      net,
      analysis,
      states,
    })
  }

  pub fn net(&self) -> &Net {
    &self.net
  }

  pub fn analysis(&self) -> &Analysis {
    &self.analysis
  }

  pub fn states(&self) -> &[MacroState] {
    &self.states
  }

  pub fn state(&self, id: StateId) -> &MacroState {
    &self.states[id.0 as usize]
  }

  /// The state seeded with the axiom's initial position and the tap.
  pub fn initial(&self) -> StateId {
    StateId(0)
  }

  pub fn conflicts(&self) -> Vec<Conflict> {
    conflict::find_conflicts(&self.net, &self.states)
  }

  /// `S1 ⊣`, with accepting positions parenthesized: `(S2) ⊣`.
  pub fn item_name(&self, item: Item) -> String {
    let pos = self.net.position(item.pos);
    let la = self.net.lookahead_name(item.la);
    if pos.is_accepting() {
      format!("({}) {}", pos.name(), la)
    } else {
      format!("{} {}", pos.name(), la)
    }
  }

  fn join_items(&self, items: &BTreeSet<Item>) -> String {
    items.iter()
      .map(|&item| self.item_name(item))
      .collect::<Vec<_>>()
      .join(", ")
  }
}

impl Display for StateId {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "I{}", self.0)
  }
}

impl Display for Pilot {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    for (i, state) in self.states.iter().enumerate() {
      if i > 0 {
        writeln!(f)?;
      }
      write!(f, "{} [{}", state.id(), self.join_items(state.base()))?;
      if !state.closure().is_empty() {
        write!(f, " | {}", self.join_items(state.closure()))?;
      }
      write!(f, "]")?;
      for (&label, target) in state.transitions() {
        write!(f, "\n  {} -> {}", self.net.label_name(label), target)?;
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::LookaheadPolicy;
  use crate::grammar::{grammar, machine};
  use crate::net::{Label, Lookahead};
  use pretty_assertions::assert_eq;

  fn build(g: Grammar) -> Pilot {
    Pilot::new(g, &Config::default()).unwrap()
  }

  fn pos(pilot: &Pilot, name: &str) -> crate::net::PosId {
    pilot.net().position_id(name).unwrap()
  }

  fn term(pilot: &Pilot, name: &str) -> Lookahead {
    Lookahead::Term(pilot.net().term_id(name).unwrap())
  }

  fn items(pilot: &Pilot, items: &BTreeSet<Item>) -> Vec<String> {
    items.iter().map(|&item| pilot.item_name(item)).collect()
  }

  /// S -> a B, B -> b | ε
  fn optional_tail() -> Grammar {
    grammar(vec![
      machine("S")
        .initial("S0")
        .arc("S0", "S1", "a")
        .arc("S1", "S2", "B")
        .accepting("S2"),
      machine("B")
        .initial("B0")
        .arc("B0", "B1", "b")
        .accepting("B0")
        .accepting("B1"),
    ])
  }

  /// S -> a S b | ε
  fn balanced() -> Grammar {
    grammar(vec![
      machine("S")
        .initial("S0")
        .arc("S0", "S1", "a")
        .arc("S1", "S2", "S")
        .arc("S2", "S3", "b")
        .accepting("S0")
        .accepting("S3"),
    ])
  }

  #[test]
  fn optional_tail_pilot() {
    let pilot = build(optional_tail());

    insta::assert_snapshot!(pilot.to_string(), @r###"
    I0 [S0 ⊣]
      a -> I1
    I1 [S1 ⊣ | (B0) ⊣]
      B -> I2
      b -> I3
    I2 [(S2) ⊣]
    I3 [(B1) ⊣]
    "###);
  }

  #[test]
  fn optional_tail_item_sets() {
    let pilot = build(optional_tail());
    let seed = pilot.state(pilot.initial());
    assert_eq!(items(&pilot, seed.base()), vec!["S0 ⊣"]);
    assert!(seed.closure().is_empty());

    let a = Label::Term(pilot.net().term_id("a").unwrap());
    let after_a = pilot.state(seed.goto(a).unwrap());
    assert_eq!(items(&pilot, after_a.base()), vec!["S1 ⊣"]);
    assert_eq!(after_a.closure().iter().copied().collect::<Vec<_>>(),
      vec![Item::new(pos(&pilot, "B0"), Lookahead::Tap)]);
    assert!(pilot.conflicts().is_empty());
  }

  #[test]
  fn recursion_merges_states() {
    let pilot = build(balanced());

    insta::assert_snapshot!(pilot.to_string(), @r###"
    I0 [(S0) ⊣]
      a -> I1
    I1 [S1 ⊣ | (S0) b]
      a -> I2
      S -> I3
    I2 [S1 b | (S0) b]
      a -> I2
      S -> I4
    I3 [S2 ⊣]
      b -> I5
    I4 [S2 b]
      b -> I6
    I5 [(S3) ⊣]
    I6 [(S3) b]
    "###);
  }

  #[test]
  fn build_is_deterministic() {
    let first = build(balanced());
    let second = build(balanced());

    assert_eq!(first.states().len(), second.states().len());
    assert_eq!(first.to_string(), second.to_string());
    for (a, b) in first.states().iter().zip(second.states()) {
      assert_eq!(a.base(), b.base());
      assert_eq!(a.closure(), b.closure());
      assert_eq!(a.transitions(), b.transitions());
    }
  }

  /// S -> B a | c, B -> S b | ε
  #[test]
  fn mutual_recursion_terminates() {
    let g = || grammar(vec![
      machine("S")
        .initial("S0")
        .arc("S0", "S1", "B")
        .arc("S1", "S2", "a")
        .arc("S0", "S2", "c")
        .accepting("S2"),
      machine("B")
        .initial("B0")
        .arc("B0", "B1", "S")
        .arc("B1", "B2", "b")
        .accepting("B0")
        .accepting("B2"),
    ]);
    let first = build(g());
    let second = build(g());

    assert_eq!(first.states().len(), second.states().len());
    let seed = first.state(first.initial());
    let b0 = pos(&first, "B0");
    let s0 = pos(&first, "S0");
    assert!(seed.closure().contains(&Item::new(b0, term(&first, "a"))));
    assert!(seed.closure().contains(&Item::new(s0, term(&first, "b"))));
  }

  #[test]
  fn state_ids_are_per_build() {
    let _ = build(optional_tail());
    let pilot = build(balanced());
    assert_eq!(pilot.initial(), StateId(0));
    for (i, state) in pilot.states().iter().enumerate() {
      assert_eq!(state.id(), StateId(i as u32));
    }
  }

  #[test]
  fn reachable_states_only() {
    let pilot = build(grammar(vec![
      machine("S")
        .initial("S0")
        .arc("S0", "S1", "a")
        .accepting("S1"),
      machine("U")
        .initial("U0")
        .arc("U0", "U1", "u")
        .accepting("U1"),
    ]));

    assert_eq!(pilot.states().len(), 2);
    let u0 = pos(&pilot, "U0");
    assert!(pilot.states().iter().all(|s| s.items().all(|i| i.pos != u0)));
  }

  /// S -> a B, B -> b
  fn mandatory_tail() -> Grammar {
    grammar(vec![
      machine("S")
        .initial("S0")
        .arc("S0", "S1", "a")
        .arc("S1", "S2", "B")
        .accepting("S2"),
      machine("B")
        .initial("B0")
        .arc("B0", "B1", "b")
        .accepting("B1"),
    ])
  }

  #[test]
  fn continuation_policy_calls_non_nullable_machine() {
    let pilot = build(mandatory_tail());

    insta::assert_snapshot!(pilot.to_string(), @r###"
    I0 [S0 ⊣]
      a -> I1
    I1 [S1 ⊣ | B0 ⊣]
      B -> I2
      b -> I3
    I2 [(S2) ⊣]
    I3 [(B1) ⊣]
    "###);
  }

  #[test]
  fn callee_policy_drops_lookahead_at_end_of_rule() {
    let config = Config {
      lookahead: LookaheadPolicy::Callee,
      ..Config::default()
    };
    let pilot = Pilot::new(mandatory_tail(), &config).unwrap();

    let a = Label::Term(pilot.net().term_id("a").unwrap());
    let after_a = pilot.state(pilot.state(pilot.initial()).goto(a).unwrap());
    assert!(after_a.closure().is_empty());
    assert_eq!(after_a.transitions().len(), 1);
  }

  #[test]
  fn reports_reduce_reduce() {
    let pilot = build(grammar(vec![
      machine("S")
        .initial("S0")
        .arc("S0", "S1", "A")
        .arc("S0", "S2", "B")
        .accepting("S1")
        .accepting("S2"),
      machine("A")
        .initial("A0")
        .arc("A0", "A1", "a")
        .accepting("A1"),
      machine("B")
        .initial("B0")
        .arc("B0", "B1", "a")
        .accepting("B1"),
    ]));

    assert_eq!(pilot.conflicts(), vec![Conflict::ReduceReduce {
      state: StateId(3),
      lookahead: Lookahead::Tap,
      reduces: vec![pos(&pilot, "A1"), pos(&pilot, "B1")],
    }]);
  }

  #[test]
  fn reports_shift_reduce() {
    let pilot = build(grammar(vec![
      machine("S")
        .initial("S0")
        .arc("S0", "S1", "A")
        .arc("S1", "S2", "b")
        .accepting("S2"),
      machine("A")
        .initial("A0")
        .arc("A0", "A1", "a")
        .arc("A1", "A2", "b")
        .accepting("A1")
        .accepting("A2"),
    ]));

    assert_eq!(pilot.conflicts(), vec![Conflict::ShiftReduce {
      state: StateId(2),
      lookahead: term(&pilot, "b"),
      reduce: pos(&pilot, "A1"),
    }]);
  }

  #[test]
  fn load_errors_surface_before_analysis() {
    let err = Pilot::new(grammar(vec![
      machine("A").initial("A0").accepting("A0"),
    ]), &Config::default()).unwrap_err();
    assert_eq!(err, NetError::MissingAxiom("S".to_owned()));
  }

  #[test]
  fn custom_symbols() {
    let config = Config {
      axiom: "E".to_owned(),
      epsilon: "eps".to_owned(),
      tap: "$".to_owned(),
      ..Config::default()
    };
    let pilot = Pilot::new(grammar(vec![
      machine("E")
        .initial("E0")
        .arc("E0", "E1", "eps")
        .arc("E1", "E2", "x")
        .accepting("E2"),
    ]), &config).unwrap();

    insta::assert_snapshot!(pilot.to_string(), @r###"
    I0 [E0 $ | E1 $]
      x -> I1
    I1 [(E2) $]
    "###);
  }
}
