use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

/// The four independently fetched resources of a refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Global,
    Metrics,
    Chart,
    Ranking,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Slot::Global => "global market data",
            Slot::Metrics => "headline metrics",
            Slot::Chart => "chart data",
            Slot::Ranking => "top cryptocurrencies",
        };
        f.write_str(name)
    }
}

/// What to do with a slot whose fetch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Keep whatever the slot held before.
    #[default]
    Retain,
    /// Swap in the slot's static placeholder dataset.
    Placeholder,
}

impl FromStr for FallbackPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "retain" | "stale" => Ok(FallbackPolicy::Retain),
            "placeholder" | "mock" => Ok(FallbackPolicy::Placeholder),
            other => Err(format!("unknown fallback policy '{}', expected retain or placeholder", other)),
        }
    }
}

/// Result of one slot's fetch, before it touches controller state.
#[derive(Debug)]
pub enum SlotOutcome<T> {
    Fresh(T),
    Failed(FetchError),
}

impl<T> From<Result<T, FetchError>> for SlotOutcome<T> {
    fn from(result: Result<T, FetchError>) -> Self {
        match result {
            Ok(value) => SlotOutcome::Fresh(value),
            Err(err) => SlotOutcome::Failed(err),
        }
    }
}

/// The decision taken for a slot.
#[derive(Debug)]
pub enum Merge<T> {
    Apply(T),
    Placeholder(T, FetchError),
    Keep(FetchError),
}

impl<T> Merge<T> {
    pub fn is_failure(&self) -> bool {
        !matches!(self, Merge::Apply(_))
    }
}

/// Pure merge step: fresh data always wins, failures follow the policy.
///
/// The placeholder is only built when the policy asks for it.
pub fn decide<T>(
    outcome: SlotOutcome<T>,
    policy: FallbackPolicy,
    placeholder: impl FnOnce() -> T,
) -> Merge<T> {
    match (outcome, policy) {
        (SlotOutcome::Fresh(value), _) => Merge::Apply(value),
        (SlotOutcome::Failed(err), FallbackPolicy::Retain) => Merge::Keep(err),
        (SlotOutcome::Failed(err), FallbackPolicy::Placeholder) => Merge::Placeholder(placeholder(), err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_data_is_applied_under_any_policy() {
        for policy in [FallbackPolicy::Retain, FallbackPolicy::Placeholder] {
            let merge = decide(SlotOutcome::Fresh(7), policy, || panic!("placeholder not needed"));
            assert!(matches!(merge, Merge::Apply(7)));
        }
    }

    #[test]
    fn test_retain_keeps_prior_data() {
        let merge = decide(
            SlotOutcome::<u32>::Failed(FetchError::Status(500)),
            FallbackPolicy::Retain,
            || panic!("placeholder not needed"),
        );
        assert!(matches!(merge, Merge::Keep(FetchError::Status(500))));
        assert!(merge.is_failure());
    }

    #[test]
    fn test_placeholder_policy_substitutes() {
        let merge = decide(
            SlotOutcome::Failed(FetchError::Shape("bitcoin".to_string())),
            FallbackPolicy::Placeholder,
            || vec![1, 2, 3],
        );
        match merge {
            Merge::Placeholder(data, FetchError::Shape(field)) => {
                assert_eq!(data, vec![1, 2, 3]);
                assert_eq!(field, "bitcoin");
            }
            other => panic!("unexpected merge decision: {:?}", other),
        }
    }

    #[test]
    fn test_outcome_from_result() {
        let ok: SlotOutcome<u8> = Ok(1).into();
        let err: SlotOutcome<u8> = Err(FetchError::Orchestration).into();
        assert!(matches!(ok, SlotOutcome::Fresh(1)));
        assert!(matches!(err, SlotOutcome::Failed(FetchError::Orchestration)));
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("placeholder".parse::<FallbackPolicy>().unwrap(), FallbackPolicy::Placeholder);
        assert_eq!("Retain".parse::<FallbackPolicy>().unwrap(), FallbackPolicy::Retain);
        assert_eq!("mock".parse::<FallbackPolicy>().unwrap(), FallbackPolicy::Placeholder);
        assert!("sometimes".parse::<FallbackPolicy>().is_err());
        assert_eq!(FallbackPolicy::default(), FallbackPolicy::Retain);
    }

    #[test]
    fn test_slot_display() {
        assert_eq!(Slot::Global.to_string(), "global market data");
        assert_eq!(Slot::Ranking.to_string(), "top cryptocurrencies");
    }
}
