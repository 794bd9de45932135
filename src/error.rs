use thiserror::Error;

/// Errors reported by [`BlockAllocator`](crate::BlockAllocator).
///
/// Running out of host memory while obtaining the pool is not represented
/// here: it aborts through [`std::alloc::handle_alloc_error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocError {
  #[error("allocator used before initialize()")]
  Uninitialized,

  #[error("invalid size (must be > 0)")]
  InvalidSize,

  #[error("no free block can hold {requested} bytes")]
  NoFit { requested: usize },

  #[error("offset {offset:#x} is outside the pool")]
  OutOfPool { offset: usize },

  #[error("offset {offset:#x} is not inside an allocated block")]
  NotAllocated { offset: usize },
}

impl AllocError {
  /// `true` for the ordinary "nothing fits" outcome of an allocation.
  pub fn is_no_fit(&self) -> bool {
    matches!(self, AllocError::NoFit { .. })
  }

  /// `true` when the caller broke the allocator's contract.
  pub fn is_misuse(&self) -> bool {
    !self.is_no_fit()
  }
}

pub type Result<T> = core::result::Result<T, AllocError>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn no_fit_is_not_misuse() {
    let err = AllocError::NoFit { requested: 8 };
    assert!(err.is_no_fit());
    assert!(!err.is_misuse());

    assert!(AllocError::Uninitialized.is_misuse());
    assert!(AllocError::NotAllocated { offset: 0 }.is_misuse());
  }

  #[test]
  fn messages_carry_offsets_in_hex() {
    let err = AllocError::OutOfPool { offset: 500 };
    assert_eq!(err.to_string(), "offset 0x1f4 is outside the pool");
  }
}
