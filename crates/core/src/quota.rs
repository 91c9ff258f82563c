//! Quota arithmetic: how much of an item a customer, and the campaign as a
//! whole, may still order.
//!
//! The ledger has no persisted counter. Usage is recomputed from accepted
//! order lines on every call (the single source of truth is the orders
//! table); this module holds the pure arithmetic over those sums.

use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// Remaining
// ---------------------------------------------------------------------------

/// Remaining orderable quantity under one limit.
///
/// A missing limit is `Unbounded` -- an explicit tagged value, never a large
/// integer sentinel, so combining it with real sums cannot overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Remaining {
    Unbounded,
    Bounded(i64),
}

impl Remaining {
    /// Remaining quantity under an optional limit given consumed usage.
    /// Bounded results saturate at zero; they are never negative.
    pub fn from_limit(limit: Option<i64>, used: i64) -> Self {
        match limit {
            None => Self::Unbounded,
            Some(max) => Self::Bounded((max - used).max(0)),
        }
    }

    /// The smaller of two remainders. `Unbounded` is the identity.
    pub fn min(self, other: Self) -> Self {
        match (self, other) {
            (Self::Unbounded, r) | (r, Self::Unbounded) => r,
            (Self::Bounded(a), Self::Bounded(b)) => Self::Bounded(a.min(b)),
        }
    }

    /// Whether at least one unit may still be ordered.
    pub fn is_positive(self) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Bounded(n) => n > 0,
        }
    }

    /// Whether a proposed total quantity fits under this remainder.
    pub fn allows(self, quantity: i64) -> bool {
        match self {
            Self::Unbounded => true,
            Self::Bounded(n) => quantity <= n,
        }
    }

    /// Bounded value, or `None` when unbounded.
    pub fn bound(self) -> Option<i64> {
        match self {
            Self::Unbounded => None,
            Self::Bounded(n) => Some(n),
        }
    }
}

/// Serialized as the bounded value, or `null` for unbounded.
impl Serialize for Remaining {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unbounded => serializer.serialize_none(),
            Self::Bounded(n) => serializer.serialize_some(n),
        }
    }
}

// ---------------------------------------------------------------------------
// Usage and availability
// ---------------------------------------------------------------------------

/// Consumed quantities for one item, summed over non-cancelled orders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemUsage {
    /// Units ordered by the requesting (customer_number, country).
    pub customer_used: i64,
    /// Units ordered across all customers.
    pub global_used: i64,
}

/// What a given customer may still order of a given item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ItemAvailability {
    pub customer_remaining: Remaining,
    pub global_remaining: Remaining,
    pub max_orderable: Remaining,
    pub is_orderable: bool,
}

/// Compute availability from the item's limits and its consumed usage.
///
/// `max_orderable = min(customer_remaining, global_remaining)`;
/// `is_orderable` iff that minimum is positive.
pub fn availability(
    max_per_customer: Option<i64>,
    max_total: Option<i64>,
    usage: ItemUsage,
) -> ItemAvailability {
    let customer_remaining = Remaining::from_limit(max_per_customer, usage.customer_used);
    let global_remaining = Remaining::from_limit(max_total, usage.global_used);
    let max_orderable = customer_remaining.min(global_remaining);
    ItemAvailability {
        customer_remaining,
        global_remaining,
        max_orderable,
        is_orderable: max_orderable.is_positive(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_scenario_double_bounded() {
        // max_total = 5, max_per_customer = 3, customer has 2 accepted units
        // (which are also the only global units).
        let avail = availability(
            Some(3),
            Some(5),
            ItemUsage {
                customer_used: 2,
                global_used: 2,
            },
        );
        assert_eq!(avail.customer_remaining, Remaining::Bounded(1));
        assert_eq!(avail.global_remaining, Remaining::Bounded(3));
        assert_eq!(avail.max_orderable, Remaining::Bounded(1));
        assert!(avail.is_orderable);
    }

    #[test]
    fn unbounded_limits_stay_unbounded() {
        let avail = availability(
            None,
            None,
            ItemUsage {
                customer_used: 1_000_000,
                global_used: 9_000_000,
            },
        );
        assert_eq!(avail.customer_remaining, Remaining::Unbounded);
        assert_eq!(avail.global_remaining, Remaining::Unbounded);
        assert_eq!(avail.max_orderable, Remaining::Unbounded);
        assert!(avail.is_orderable);
    }

    #[test]
    fn global_limit_caps_unbounded_customer() {
        let avail = availability(
            None,
            Some(10),
            ItemUsage {
                customer_used: 4,
                global_used: 7,
            },
        );
        assert_eq!(avail.max_orderable, Remaining::Bounded(3));
        assert!(avail.is_orderable);
    }

    #[test]
    fn overshoot_saturates_at_zero_never_negative() {
        // Concurrent finalizations can leave usage above the limit; remaining
        // must clamp to 0, not go negative.
        let avail = availability(
            Some(3),
            Some(5),
            ItemUsage {
                customer_used: 4,
                global_used: 9,
            },
        );
        assert_eq!(avail.customer_remaining, Remaining::Bounded(0));
        assert_eq!(avail.global_remaining, Remaining::Bounded(0));
        assert_eq!(avail.max_orderable, Remaining::Bounded(0));
        assert!(!avail.is_orderable);
    }

    #[test]
    fn max_orderable_monotonically_non_increasing() {
        // As accepted usage grows, max_orderable never increases.
        let mut previous = i64::MAX;
        for used in 0..12 {
            let avail = availability(
                Some(8),
                Some(10),
                ItemUsage {
                    customer_used: used,
                    global_used: used,
                },
            );
            let bounded = avail.max_orderable.bound().unwrap();
            assert!(bounded <= previous);
            assert!(bounded >= 0);
            previous = bounded;
        }
    }

    #[test]
    fn allows_respects_bound() {
        assert!(Remaining::Bounded(3).allows(3));
        assert!(!Remaining::Bounded(3).allows(4));
        assert!(Remaining::Unbounded.allows(i64::MAX));
    }

    #[test]
    fn remaining_serializes_unbounded_as_null() {
        let json = serde_json::to_value(Remaining::Unbounded).unwrap();
        assert!(json.is_null());
        let json = serde_json::to_value(Remaining::Bounded(7)).unwrap();
        assert_eq!(json, serde_json::json!(7));
    }
}
