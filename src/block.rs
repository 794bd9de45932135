use std::ops::{Index, IndexMut};

/// Stable handle to a [`Block`] stored in a [`BlockArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockId(usize);

/// Descriptor for one contiguous run of the pool.
///
/// `prev` and `next` link blocks in pool order; the list is circular, so the
/// last block's `next` is the block at offset 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
  pub start: usize,
  pub size: usize,
  pub allocated: bool,
  pub prev: BlockId,
  pub next: BlockId,
}

impl Block {
  pub fn end(&self) -> usize {
    self.start + self.size
  }

  pub fn contains(
    &self,
    offset: usize,
  ) -> bool {
    self.start <= offset && offset < self.end()
  }

  pub fn is_free(&self) -> bool {
    !self.allocated
  }
}

/// Slot storage for block descriptors. Removed slots are recycled, and a
/// [`BlockId`] stays valid until its block is removed.
#[derive(Debug, Default)]
pub struct BlockArena {
  slots: Vec<Option<Block>>,
  vacant: Vec<usize>,
}

impl BlockArena {
  pub fn new() -> Self {
    Self::default()
  }

  /// Number of live blocks.
  pub fn len(&self) -> usize {
    self.slots.len() - self.vacant.len()
  }

  /// Creates a free block covering `[0, size)` that links to itself.
  pub fn insert_root(
    &mut self,
    size: usize,
  ) -> BlockId {
    let id = self.next_id();
    self.put(
      id,
      Block {
        start: 0,
        size,
        allocated: false,
        prev: id,
        next: id,
      },
    );
    id
  }

  /// Splits `id` so that it keeps its first `size` bytes. The rest becomes a
  /// new free block linked in right after it. Returns the new block.
  pub fn split(
    &mut self,
    id: BlockId,
    size: usize,
  ) -> BlockId {
    let (start, old_size, next) = {
      let block = &self[id];
      (block.start, block.size, block.next)
    };
    debug_assert!(size > 0 && size < old_size);

    let rest = self.next_id();
    self.put(
      rest,
      Block {
        start: start + size,
        size: old_size - size,
        allocated: false,
        prev: id,
        next,
      },
    );

    self[id].size = size;
    self[id].next = rest;
    self[next].prev = rest;

    rest
  }

  /// Folds `next` into its predecessor `id` and discards its descriptor.
  pub fn absorb_next(
    &mut self,
    id: BlockId,
  ) -> BlockId {
    let next = self[id].next;
    debug_assert_ne!(next, id);

    let Some(gone) = self.slots[next.0].take() else {
      unreachable!("dangling block link {:?}", next);
    };
    self.vacant.push(next.0);

    self[id].size += gone.size;
    self[id].next = gone.next;
    self[gone.next].prev = id;

    next
  }

  pub fn get(
    &self,
    id: BlockId,
  ) -> Option<&Block> {
    self.slots.get(id.0).and_then(Option::as_ref)
  }

  /// Visits every block once, following `next` from `from`.
  pub fn iter_from(
    &self,
    from: BlockId,
  ) -> Iter<'_> {
    Iter {
      arena: self,
      from,
      current: self.get(from).map(|_| from),
    }
  }

  fn next_id(&self) -> BlockId {
    BlockId(self.vacant.last().copied().unwrap_or(self.slots.len()))
  }

  fn put(
    &mut self,
    id: BlockId,
    block: Block,
  ) {
    if self.vacant.last() == Some(&id.0) {
      self.vacant.pop();
      self.slots[id.0] = Some(block);
    } else {
      self.slots.push(Some(block));
    }
  }
}

impl Index<BlockId> for BlockArena {
  type Output = Block;

  fn index(
    &self,
    id: BlockId,
  ) -> &Self::Output {
    match self.get(id) {
      Some(block) => block,
      None => panic!("Block index {:?} does not name a live block", id),
    }
  }
}

impl IndexMut<BlockId> for BlockArena {
  fn index_mut(
    &mut self,
    id: BlockId,
  ) -> &mut Self::Output {
    match self.slots.get_mut(id.0).and_then(Option::as_mut) {
      Some(block) => block,
      None => panic!("Block index {:?} does not name a live block", id),
    }
  }
}

/// Circular walk over a [`BlockArena`], ending when it returns to its start.
pub struct Iter<'a> {
  arena: &'a BlockArena,
  from: BlockId,
  current: Option<BlockId>,
}

impl<'a> Iterator for Iter<'a> {
  type Item = (BlockId, &'a Block);

  fn next(&mut self) -> Option<Self::Item> {
    let id = self.current?;
    let arena = self.arena;
    let block = &arena[id];
    self.current = (block.next != self.from).then_some(block.next);
    Some((id, block))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn layout(
    arena: &BlockArena,
    root: BlockId,
  ) -> Vec<(usize, usize, bool)> {
    arena
      .iter_from(root)
      .map(|(_, b)| (b.start, b.size, b.allocated))
      .collect()
  }

  #[test]
  fn test_root_is_self_linked() {
    let mut arena = BlockArena::new();
    let root = arena.insert_root(100);

    assert_eq!(arena[root].prev, root);
    assert_eq!(arena[root].next, root);
    assert_eq!(arena.iter_from(root).count(), 1);
  }

  #[test]
  fn test_split_links_remainder() {
    let mut arena = BlockArena::new();
    let root = arena.insert_root(100);

    let rest = arena.split(root, 30);
    let tail = arena.split(rest, 20);

    assert_eq!(layout(&arena, root), vec![(0, 30, false), (30, 20, false), (50, 50, false)]);
    assert_eq!(arena[root].prev, tail);
    assert_eq!(arena[tail].next, root);
    assert_eq!(arena[tail].prev, rest);

    // Walking from the middle still visits every block once.
    assert_eq!(arena.iter_from(rest).count(), 3);
  }

  #[test]
  fn test_absorb_recycles_slot() {
    let mut arena = BlockArena::new();
    let root = arena.insert_root(100);
    let rest = arena.split(root, 40);

    assert_eq!(arena.absorb_next(root), rest);
    assert_eq!(arena.len(), 1);
    assert!(arena.get(rest).is_none());
    assert_eq!(layout(&arena, root), vec![(0, 100, false)]);
    assert_eq!(arena[root].next, root);

    // The discarded slot is handed out again.
    assert_eq!(arena.split(root, 10), rest);
    assert_eq!(arena.len(), 2);
  }

  #[test]
  fn test_block_contains() {
    let mut arena = BlockArena::new();
    let root = arena.insert_root(100);
    let rest = arena.split(root, 40);

    assert!(arena[root].contains(0));
    assert!(arena[root].contains(39));
    assert!(!arena[root].contains(40));
    assert!(arena[rest].contains(40));
    assert_eq!(arena[rest].end(), 100);
  }
}
