use std::{alloc::Layout, fmt, ptr::NonNull};

use log::debug;

/// The fixed byte region handed out by a [`BlockAllocator`](crate::BlockAllocator).
///
/// Obtained from the C heap with `malloc(3)` and returned with `free(3)` when
/// dropped. The allocator only tracks regions of it; contents are never read.
pub struct Pool {
  base: NonNull<u8>,
  len: usize,
}

impl Pool {
  /// Requests `len` bytes from the C heap.
  ///
  /// # Panics
  ///
  /// - If `len` is zero.
  ///
  /// Aborts through [`std::alloc::handle_alloc_error`] if the memory request
  /// cannot be satisfied.
  pub fn new(len: usize) -> Self {
    assert!(len > 0, "Attempted to create an empty pool");

    let base = unsafe { libc::malloc(len) } as *mut u8;

    let Some(base) = NonNull::new(base) else {
      let layout = Layout::array::<u8>(len).unwrap_or(Layout::new::<u8>());
      std::alloc::handle_alloc_error(layout);
    };

    debug!("pool of {} bytes at {:?}", len, base);

    Self { base, len }
  }

  pub fn as_ptr(&self) -> *mut u8 {
    self.base.as_ptr()
  }

  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  pub fn contains(
    &self,
    offset: usize,
  ) -> bool {
    offset < self.len
  }

  /// Address of the byte at `offset`, or `None` past the end of the pool.
  pub fn address_of(
    &self,
    offset: usize,
  ) -> Option<NonNull<u8>> {
    if !self.contains(offset) {
      return None;
    }
    // SAFETY: `offset < len`, so the result stays inside the malloc'd region.
    Some(unsafe { self.base.add(offset) })
  }

  /// Offset of `ptr` from the start of the pool, or `None` if it points
  /// elsewhere.
  pub fn offset_of(
    &self,
    ptr: *const u8,
  ) -> Option<usize> {
    let offset = (ptr as usize).checked_sub(self.base.as_ptr() as usize)?;
    self.contains(offset).then_some(offset)
  }
}

impl Drop for Pool {
  fn drop(&mut self) {
    debug!("releasing pool at {:?}", self.base);
    // SAFETY: `base` came from `malloc` and is freed exactly once, here.
    unsafe { libc::free(self.base.as_ptr() as *mut libc::c_void) }
  }
}

impl fmt::Debug for Pool {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.debug_struct("Pool")
      .field("base", &self.base)
      .field("len", &self.len)
      .finish()
  }
}
