use log::{debug, trace, warn};

use crate::{
  block::{BlockArena, BlockId},
  config::Config,
  error::{AllocError, Result},
  pool::Pool,
  strategy::Strategy,
};

/// State that exists between one `initialize` and the next.
pub(crate) struct Heap {
  pub(crate) strategy: Strategy,
  pub(crate) pool: Pool,
  pub(crate) blocks: BlockArena,
  /// The block at offset 0. It never has a predecessor to merge into, so it
  /// outlives every split and coalesce.
  pub(crate) anchor: BlockId,
  /// Where the next-fit search resumes. Always names a live block.
  pub(crate) cursor: BlockId,
}

/// A pool allocator that tracks free and used runs in a circular,
/// address-ordered block list.
///
/// Handles returned by [`allocate`](Self::allocate) are byte offsets into the
/// pool; [`Pool::address_of`] turns them into raw addresses.
#[derive(Default)]
pub struct BlockAllocator {
  heap: Option<Heap>,
}

fn misuse(err: AllocError) -> AllocError {
  warn!("{}", err);
  err
}

impl BlockAllocator {
  /// Creates an allocator with no pool. Call [`initialize`](Self::initialize)
  /// before allocating.
  pub fn new() -> Self {
    Self { heap: None }
  }

  pub fn with_strategy(
    strategy: Strategy,
    size: usize,
  ) -> Result<Self> {
    let mut allocator = Self::new();
    allocator.initialize(strategy, size)?;
    Ok(allocator)
  }

  pub fn from_config(config: &Config) -> Result<Self> {
    Self::with_strategy(config.strategy, config.size)
  }

  /// Discards any previous pool and block list, then starts over with a
  /// fresh pool of `size` bytes held in a single free block.
  pub fn initialize(
    &mut self,
    strategy: Strategy,
    size: usize,
  ) -> Result<()> {
    if size == 0 {
      return Err(misuse(AllocError::InvalidSize));
    }

    // Release the old pool before asking for a new one.
    self.heap = None;

    let pool = Pool::new(size);
    let mut blocks = BlockArena::new();
    let anchor = blocks.insert_root(size);

    debug!("initialize: {} bytes, {}-fit", size, strategy);

    self.heap = Some(Heap {
      strategy,
      pool,
      blocks,
      anchor,
      cursor: anchor,
    });

    Ok(())
  }

  pub(crate) fn heap(&self) -> Option<&Heap> {
    self.heap.as_ref()
  }

  pub fn strategy(&self) -> Option<Strategy> {
    self.heap.as_ref().map(|heap| heap.strategy)
  }

  pub fn pool_handle(&self) -> Option<&Pool> {
    self.heap.as_ref().map(|heap| &heap.pool)
  }

  /// Pool size in bytes, 0 before the first `initialize`.
  pub fn total_bytes(&self) -> usize {
    self.heap.as_ref().map_or(0, |heap| heap.pool.len())
  }

  /// Carves `requested` bytes out of a free block chosen by the configured
  /// strategy and returns the offset of the region.
  ///
  /// Returns [`AllocError::NoFit`] when no free block qualifies; the list is
  /// left untouched in that case.
  pub fn allocate(
    &mut self,
    requested: usize,
  ) -> Result<usize> {
    let heap = self
      .heap
      .as_mut()
      .ok_or_else(|| misuse(AllocError::Uninitialized))?;

    if requested == 0 {
      return Err(misuse(AllocError::InvalidSize));
    }

    let Some(id) = heap.find_free_block(requested) else {
      debug!("allocate({}): no fit under {}-fit", requested, heap.strategy);
      return Err(AllocError::NoFit { requested });
    };

    if heap.blocks[id].size > requested {
      let rest = heap.blocks.split(id, requested);
      trace!(
        "split block at {:#x}: remainder of {} bytes at {:#x}",
        heap.blocks[id].start,
        heap.blocks[rest].size,
        heap.blocks[rest].start
      );
      heap.cursor = rest;
    } else {
      heap.cursor = heap.blocks[id].next;
    }

    let block = &mut heap.blocks[id];
    block.allocated = true;

    debug!("allocate({}) -> {:#x}", requested, block.start);

    Ok(block.start)
  }

  /// Frees the allocated block containing `offset` and merges it with free
  /// neighbours on either side.
  pub fn release(
    &mut self,
    offset: usize,
  ) -> Result<()> {
    let heap = self
      .heap
      .as_mut()
      .ok_or_else(|| misuse(AllocError::Uninitialized))?;

    let Some(mut id) = heap.find_block(offset) else {
      return Err(misuse(AllocError::OutOfPool { offset }));
    };

    if heap.blocks[id].is_free() {
      return Err(misuse(AllocError::NotAllocated { offset }));
    }

    heap.blocks[id].allocated = false;

    debug!(
      "release({:#x}): {} bytes at {:#x}",
      offset, heap.blocks[id].size, heap.blocks[id].start
    );

    // The anchor's predecessor is the last block of the pool; never wrap.
    let prev = heap.blocks[id].prev;
    if id != heap.anchor && heap.blocks[prev].is_free() {
      heap.merge_into(prev);
      id = prev;
    }

    let next = heap.blocks[id].next;
    if next != heap.anchor && heap.blocks[next].is_free() {
      heap.merge_into(id);
    }

    Ok(())
  }
}

impl Heap {
  /// Block whose range contains `offset`.
  pub(crate) fn find_block(
    &self,
    offset: usize,
  ) -> Option<BlockId> {
    if !self.pool.contains(offset) {
      return None;
    }

    self
      .blocks
      .iter_from(self.anchor)
      .find(|(_, block)| block.contains(offset))
      .map(|(id, _)| id)
  }

  fn find_free_block(
    &self,
    requested: usize,
  ) -> Option<BlockId> {
    match self.strategy {
      Strategy::First => self.first_fit(requested),
      Strategy::Best => self.best_fit(requested),
      Strategy::Worst => self.worst_fit(requested),
      Strategy::Next => self.next_fit(requested),
    }
  }

  fn first_fit(
    &self,
    requested: usize,
  ) -> Option<BlockId> {
    self
      .blocks
      .iter_from(self.anchor)
      .find(|(_, block)| block.is_free() && block.size >= requested)
      .map(|(id, _)| id)
  }

  fn best_fit(
    &self,
    requested: usize,
  ) -> Option<BlockId> {
    // `min_by_key` keeps the first of several equal minima.
    self
      .blocks
      .iter_from(self.anchor)
      .filter(|(_, block)| block.is_free() && block.size >= requested)
      .min_by_key(|(_, block)| block.size)
      .map(|(id, _)| id)
  }

  /// Only the largest free block is ever considered. If it is too small the
  /// allocation fails, whatever the smaller blocks could hold.
  fn worst_fit(
    &self,
    requested: usize,
  ) -> Option<BlockId> {
    let (id, largest) = self
      .blocks
      .iter_from(self.anchor)
      .filter(|(_, block)| block.is_free())
      .reduce(|max, candidate| {
        if candidate.1.size > max.1.size {
          candidate
        } else {
          max
        }
      })?;

    (largest.size >= requested).then_some(id)
  }

  fn next_fit(
    &self,
    requested: usize,
  ) -> Option<BlockId> {
    self
      .blocks
      .iter_from(self.cursor)
      .find(|(_, block)| block.is_free() && block.size >= requested)
      .map(|(id, _)| id)
  }

  /// Folds the successor of `survivor` into it, moving the next-fit cursor
  /// off the discarded descriptor.
  fn merge_into(
    &mut self,
    survivor: BlockId,
  ) {
    let removed = self.blocks.absorb_next(survivor);

    trace!(
      "coalesced into block at {:#x}, now {} bytes",
      self.blocks[survivor].start,
      self.blocks[survivor].size
    );

    if self.cursor == removed {
      trace!("next-fit cursor moved to {:#x}", self.blocks[survivor].start);
      self.cursor = survivor;
    }
  }
}
