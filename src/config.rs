use serde::{Deserialize, Serialize};

use crate::strategy::Strategy;

/// Pool size used when none is given.
pub const DEFAULT_POOL_SIZE: usize = 500;

/// Settings for a [`BlockAllocator`](crate::BlockAllocator) session.
///
/// ```rust
/// use fitalloc::{BlockAllocator, Config, Strategy};
///
/// let config = Config::builder().strategy(Strategy::Best).size(1024).build();
/// let allocator = BlockAllocator::from_config(&config).unwrap();
/// assert_eq!(allocator.total_bytes(), 1024);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  pub strategy: Strategy,
  /// Pool size in bytes.
  pub size: usize,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      strategy: Strategy::First,
      size: DEFAULT_POOL_SIZE,
    }
  }
}

impl Config {
  pub fn builder() -> ConfigBuilder {
    ConfigBuilder(Self::default())
  }
}

pub struct ConfigBuilder(Config);

impl ConfigBuilder {
  pub fn strategy(
    mut self,
    strategy: Strategy,
  ) -> Self {
    self.0.strategy = strategy;
    self
  }

  pub fn size(
    mut self,
    size: usize,
  ) -> Self {
    self.0.size = size;
    self
  }

  pub fn build(self) -> Config {
    self.0
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let config = Config::builder().build();
    assert_eq!(config.strategy, Strategy::First);
    assert_eq!(config.size, DEFAULT_POOL_SIZE);
  }

  #[test]
  fn test_deserialize_partial() {
    let config: Config = serde_json::from_str(r#"{ "strategy": "next" }"#).unwrap();
    assert_eq!(config.strategy, Strategy::Next);
    assert_eq!(config.size, DEFAULT_POOL_SIZE);

    let config: Config = serde_json::from_str(r#"{ "strategy": "worst", "size": 64 }"#).unwrap();
    assert_eq!(config, Config::builder().strategy(Strategy::Worst).size(64).build());

    assert!(serde_json::from_str::<Config>(r#"{ "strategy": "buddy" }"#).is_err());
  }
}
