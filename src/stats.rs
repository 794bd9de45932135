//! Read-only queries over the block list. Nothing is cached: every answer
//! comes from a fresh walk of the list.

use std::fmt;

use serde::Serialize;

use crate::{
  block::Block,
  error::{AllocError, Result},
  list::BlockAllocator,
};

/// Snapshot of one block, as yielded by [`BlockAllocator::blocks`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BlockInfo {
  pub start: usize,
  pub size: usize,
  pub allocated: bool,
}

impl From<&Block> for BlockInfo {
  fn from(block: &Block) -> Self {
    Self {
      start: block.start,
      size: block.size,
      allocated: block.allocated,
    }
  }
}

/// Aggregate figures for a pool at one point in time.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MemoryStatus {
  pub total: usize,
  pub allocated: usize,
  pub free: usize,
  pub holes: usize,
  pub largest_free: usize,
  /// `free / holes`, or 0 when there are no holes.
  pub average_hole: f64,
}

impl BlockAllocator {
  /// Blocks in pool order, starting at offset 0. Empty before `initialize`.
  pub fn blocks(&self) -> impl Iterator<Item = BlockInfo> + '_ {
    self
      .heap()
      .into_iter()
      .flat_map(|heap| heap.blocks.iter_from(heap.anchor))
      .map(|(_, block)| BlockInfo::from(block))
  }

  pub fn block_count(&self) -> usize {
    self.blocks().count()
  }

  fn free_blocks(&self) -> impl Iterator<Item = BlockInfo> + '_ {
    self.blocks().filter(|block| !block.allocated)
  }

  pub fn free_bytes(&self) -> usize {
    self.free_blocks().map(|block| block.size).sum()
  }

  pub fn allocated_bytes(&self) -> usize {
    self.total_bytes() - self.free_bytes()
  }

  /// Size of the biggest free block, 0 if everything is allocated.
  pub fn largest_free_run(&self) -> usize {
    self
      .free_blocks()
      .map(|block| block.size)
      .max()
      .unwrap_or(0)
  }

  /// Number of free blocks of at most `threshold` bytes.
  pub fn small_free_count(
    &self,
    threshold: usize,
  ) -> usize {
    self
      .free_blocks()
      .filter(|block| block.size <= threshold)
      .count()
  }

  /// Number of free regions. Free neighbours are always merged, so this is
  /// simply the number of free blocks.
  pub fn hole_count(&self) -> usize {
    self.small_free_count(self.total_bytes() + 1)
  }

  /// Whether the block covering `offset` is in use. An offset on a block
  /// boundary belongs to the block that starts there.
  pub fn is_allocated(
    &self,
    offset: usize,
  ) -> Result<bool> {
    let heap = self.heap().ok_or(AllocError::Uninitialized)?;
    let id = heap
      .find_block(offset)
      .ok_or(AllocError::OutOfPool { offset })?;

    Ok(heap.blocks[id].allocated)
  }

  pub fn status(&self) -> MemoryStatus {
    let free = self.free_bytes();
    let holes = self.hole_count();

    MemoryStatus {
      total: self.total_bytes(),
      allocated: self.total_bytes() - free,
      free,
      holes,
      largest_free: self.largest_free_run(),
      average_hole: if holes == 0 {
        0.0
      } else {
        free as f64 / holes as f64
      },
    }
  }
}

impl fmt::Display for BlockInfo {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(
      f,
      "{:#08x}\tsize: {}\t{}",
      self.start,
      self.size,
      if self.allocated { "[allocd]" } else { "[free]" }
    )
  }
}

impl fmt::Display for MemoryStatus {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    writeln!(f, "{} out of {} bytes allocated.", self.allocated, self.total)?;
    writeln!(
      f,
      "{} bytes are free in {} holes; maximum allocatable block is {} bytes.",
      self.free, self.holes, self.largest_free
    )?;
    write!(f, "Average hole size is {:.2}.", self.average_hole)
  }
}

/// Lists every block, one per line.
impl fmt::Display for BlockAllocator {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    match self.strategy() {
      Some(strategy) => writeln!(f, "Current memory ({}-fit):", strategy)?,
      None => return write!(f, "Uninitialized allocator"),
    }
    for block in self.blocks() {
      writeln!(f, "\t{}", block)?;
    }
    Ok(())
  }
}
