use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Placement policy used to pick the free block an allocation is carved from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
  /// First free block large enough, scanning from the start of the pool.
  #[default]
  First,
  /// Smallest free block large enough.
  Best,
  /// Largest free block, if it is large enough.
  Worst,
  /// First free block large enough, resuming after the previous allocation.
  Next,
}

impl Strategy {
  pub const ALL: [Strategy; 4] = [
    Strategy::First,
    Strategy::Best,
    Strategy::Worst,
    Strategy::Next,
  ];

  pub const fn name(self) -> &'static str {
    match self {
      Strategy::First => "first",
      Strategy::Best => "best",
      Strategy::Worst => "worst",
      Strategy::Next => "next",
    }
  }
}

/// Short lowercase name of `strategy`, e.g. `"best"`.
pub fn strategy_name(strategy: Strategy) -> &'static str {
  strategy.name()
}

/// Parses a strategy from its short name. Matching is exact.
pub fn strategy_from_name(name: &str) -> Option<Strategy> {
  Strategy::ALL.into_iter().find(|s| s.name() == name)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownStrategy(pub String);

impl fmt::Display for UnknownStrategy {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(
      f,
      "unknown strategy `{}` (expected first, best, worst or next)",
      self.0
    )
  }
}

impl std::error::Error for UnknownStrategy {}

impl FromStr for Strategy {
  type Err = UnknownStrategy;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    strategy_from_name(s).ok_or_else(|| UnknownStrategy(s.to_owned()))
  }
}

impl fmt::Display for Strategy {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    f.write_str(self.name())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_names_round_trip() {
    for strategy in Strategy::ALL {
      assert_eq!(strategy_from_name(strategy_name(strategy)), Some(strategy));
      assert_eq!(strategy.to_string().parse::<Strategy>(), Ok(strategy));
    }
  }

  #[test]
  fn test_unknown_name() {
    assert_eq!(strategy_from_name("buddy"), None);
    assert_eq!(strategy_from_name("First"), None);
    assert_eq!(strategy_from_name(""), None);

    let err = "buddy".parse::<Strategy>().unwrap_err();
    assert_eq!(err, UnknownStrategy("buddy".to_owned()));
  }
}
