use std::fmt::{self, Debug, Formatter};
use crate::net::TermId;

type Block = u64;

const BLOCK_NBITS: usize = std::mem::size_of::<Block>() * 8;

/// Fixed-capacity set of terminals.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct TermSet {
  blocks: Box<[Block]>,
}

impl TermSet {
  pub fn new(num_terms: usize) -> Self {
    let len = (num_terms + BLOCK_NBITS - 1) / BLOCK_NBITS;
    Self {
      blocks: vec![0; len].into_boxed_slice(),
    }
  }

  pub fn clear(&mut self) {
    for x in self.blocks.iter_mut() {
      *x = 0;
    }
  }

  pub fn insert(&mut self, term: TermId) {
    let bit = term.0 as usize;
    self.blocks[bit / BLOCK_NBITS] |= 1 << (bit % BLOCK_NBITS);
  }

  pub fn contains(&self, term: TermId) -> bool {
    let bit = term.0 as usize;
    self.blocks[bit / BLOCK_NBITS] & (1 << (bit % BLOCK_NBITS)) != 0
  }

  pub fn is_empty(&self) -> bool {
    self.blocks.iter().all(|&x| x == 0)
  }

  /// Returns whether the set has changed.
  pub fn union_with(&mut self, other: &TermSet) -> bool {
    let mut changed = false;
    for (x, &y) in self.blocks.iter_mut().zip(other.blocks.iter()) {
      let old = *x;
      *x |= y;
      changed |= old != *x;
    }
    changed
  }

  pub fn iter(&self) -> Iter {
    Iter {
      blocks: &*self.blocks,
      bit: 0,
      index: 0,
    }
  }
}

pub struct Iter<'a> {
  blocks: &'a [Block],
  bit: usize,
  index: usize,
}

impl<'a> Iterator for Iter<'a> {
  type Item = TermId;

  fn next(&mut self) -> Option<TermId> {
    while self.index < self.blocks.len() {
      if self.bit < BLOCK_NBITS {
        let rest = self.blocks[self.index] >> self.bit;
        if rest != 0 {
          let bit = self.bit + rest.trailing_zeros() as usize;
          self.bit = bit + 1;
          return Some(TermId((self.index * BLOCK_NBITS + bit) as u32));
        }
      }

      self.index += 1;
      self.bit = 0;
    }
    None
  }
}

impl Debug for TermSet {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    f.debug_set().entries(self.iter().map(|t| t.0)).finish()
  }
}
