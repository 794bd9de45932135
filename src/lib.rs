//! # fitalloc - A Simulated Pool Allocator
//!
//! This crate manages a single fixed-size memory pool purely through
//! bookkeeping: a circular, doubly-linked list of block descriptors records
//! which runs of the pool are free and which are in use. Requests are placed
//! with one of four classic strategies.
//!
//! ## Overview
//!
//! ```text
//!   Block List over a 500 byte Pool:
//!
//!   ┌──────────────────────────────────────────────────────────────────────┐
//!   │                              POOL                                    │
//!   │                                                                      │
//!   │   ┌────────┬──────────┬─────────┬──────────┬──────────────────────┐  │
//!   │   │ A  25  │  free 75 │  A  50  │  free 50 │ A 100 │   free 200   │  │
//!   │   └────────┴──────────┴─────────┴──────────┴──────────────────────┘  │
//!   │   ▲                                                               │  │
//!   │   │ anchor (offset 0)                                             │  │
//!   │   └────────────────────── next wraps around ◄─────────────────────┘  │
//!   │                                                                      │
//!   └──────────────────────────────────────────────────────────────────────┘
//!
//!   Blocks are contiguous, ordered by offset, and never overlap.
//!   Two free blocks are never neighbours.
//! ```
//!
//! ## Crate Structure
//!
//! ```text
//!   fitalloc
//!   ├── block      - Block descriptors and the slot arena holding the list
//!   ├── config     - Config and its builder
//!   ├── error      - AllocError
//!   ├── list       - BlockAllocator: placement, split and coalesce
//!   ├── pool       - Pool, the malloc'd backing buffer
//!   ├── stats      - Free/used byte counts, holes, block listing
//!   └── strategy   - Strategy (first, best, worst, next) and name parsing
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use fitalloc::{BlockAllocator, Strategy};
//!
//! let mut allocator = BlockAllocator::with_strategy(Strategy::First, 500).unwrap();
//!
//! let a = allocator.allocate(100).unwrap();
//! let b = allocator.allocate(100).unwrap();
//! allocator.release(a).unwrap();
//!
//! // The freed region is reused.
//! assert_eq!(allocator.allocate(50).unwrap(), a);
//! assert_eq!(allocator.free_bytes() + allocator.allocated_bytes(), 500);
//! # let _ = b;
//! ```
//!
//! ## How It Works
//!
//! Allocation asks the strategy for a free block, then splits it when it is
//! larger than the request:
//!
//! ```text
//!   allocate(30) on a free block of 100:
//!
//!   Before:  ┌──────────────────────────────────────┐
//!            │              free 100                │
//!            └──────────────────────────────────────┘
//!
//!   After:   ┌───────────┬──────────────────────────┐
//!            │  used 30  │         free 70          │ ◄── next-fit cursor
//!            └───────────┴──────────────────────────┘
//!            ▲
//!            └── offset returned to the caller
//! ```
//!
//! Releasing a block merges it with free neighbours on both sides:
//!
//! ```text
//!   release(B):
//!
//!   Before:  ┌─────────┬─────────┬─────────┬─────────┐
//!            │ free  A │ used  B │ free  C │ used  D │
//!            └─────────┴─────────┴─────────┴─────────┘
//!
//!   After:   ┌─────────────────────────────┬─────────┐
//!            │          free A+B+C         │ used  D │
//!            └─────────────────────────────┴─────────┘
//! ```
//!
//! ## Strategies
//!
//! | Strategy | Picks                                              |
//! |----------|----------------------------------------------------|
//! | `first`  | first free block that fits, from offset 0          |
//! | `best`   | smallest free block that fits                      |
//! | `worst`  | the largest free block, only if it fits            |
//! | `next`   | first free block that fits, from the last position |
//!
//! ## Limitations
//!
//! - **Single-threaded only**: `BlockAllocator` holds no locks
//! - **No alignment**: offsets are byte granular
//! - **No resizing**: there is no `realloc`
//! - **Linear time**: every search and query walks the whole list

mod block;
mod config;
mod error;
mod list;
mod pool;
mod stats;
mod strategy;

pub use config::{Config, ConfigBuilder, DEFAULT_POOL_SIZE};
pub use error::{AllocError, Result};
pub use list::BlockAllocator;
pub use pool::Pool;
pub use stats::{BlockInfo, MemoryStatus};
pub use strategy::{Strategy, UnknownStrategy, strategy_from_name, strategy_name};
