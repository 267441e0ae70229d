//! # Range Predicate — Size and Limit Checks
//!
//! `Bound` describes which values are acceptable for a size or limit
//! argument: nothing (always true), one exact value, an explicit set, a
//! range, or a set of named threshold comparisons.
//!
//! ## Named Comparisons
//!
//! [`Limits`] carries up to eight independent checks:
//!
//! | Key                        | Holds when            |
//! |----------------------------|-----------------------|
//! | `before`                   | `value <  limit`      |
//! | `after`                    | `value >  limit`      |
//! | `min`                      | `value >= limit`      |
//! | `max`                      | `value <= limit`      |
//! | `less_than`                | `value <  limit`      |
//! | `less_than_or_equal_to`    | `value <= limit`      |
//! | `greater_than`             | `value >  limit`      |
//! | `greater_than_or_equal_to` | `value >= limit`      |
//!
//! Every supplied check must hold. Conflicting checks are not reconciled,
//! so `{min: 5, max: 1}` accepts nothing. A `Limits` with no checks accepts
//! everything.
//!
//! All comparisons go through [`Value::compare`]: a value with no order
//! relative to the limit (text against a number, a date against a time)
//! fails the check rather than erroring.
//!
//! ## Configuration
//!
//! `Bound` and `Limits` deserialize from JSON or YAML: `null` is
//! unbounded, a list is a set, an object is a `Limits` (unknown keys are
//! ignored), and any other scalar is an exact value.

use std::cmp::Ordering;
use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::value::Value;

/// Acceptable values for a size or limit argument.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Bound {
    /// No constraint.
    #[default]
    Unbounded,
    /// The value must equal this one.
    Exact(Value),
    /// The value must equal one of these.
    OneOf(Vec<Value>),
    /// The value must lie between `start` and `end`.
    Between {
        start: Value,
        end: Value,
        /// Whether `end` itself is included.
        inclusive: bool,
    },
    /// Every named comparison must hold.
    Limits(Limits),
}

impl Bound {
    /// Returns true if `value` satisfies this bound.
    pub fn contains(&self, value: &Value) -> bool {
        match self {
            Bound::Unbounded => true,
            Bound::Exact(expected) => value.equals(expected),
            Bound::OneOf(members) => members.iter().any(|m| value.equals(m)),
            Bound::Between {
                start,
                end,
                inclusive,
            } => {
                let above_start = value.compare(start).is_some_and(Ordering::is_ge);
                let below_end = value.compare(end).is_some_and(|o| {
                    if *inclusive {
                        o.is_le()
                    } else {
                        o.is_lt()
                    }
                });
                above_start && below_end
            }
            Bound::Limits(limits) => limits.contains(value),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, Bound::Unbounded)
    }
}

/// Returns true if `value` satisfies `bound`.
pub fn in_range(value: &Value, bound: &Bound) -> bool {
    bound.contains(value)
}

/// Named threshold comparisons, all optional.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct Limits {
    pub before: Option<Value>,
    pub after: Option<Value>,
    pub min: Option<Value>,
    pub max: Option<Value>,
    pub less_than: Option<Value>,
    pub less_than_or_equal_to: Option<Value>,
    pub greater_than: Option<Value>,
    pub greater_than_or_equal_to: Option<Value>,
}

impl Limits {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_before(mut self, limit: impl Into<Value>) -> Self {
        self.before = Some(limit.into());
        self
    }

    pub fn with_after(mut self, limit: impl Into<Value>) -> Self {
        self.after = Some(limit.into());
        self
    }

    pub fn with_min(mut self, limit: impl Into<Value>) -> Self {
        self.min = Some(limit.into());
        self
    }

    pub fn with_max(mut self, limit: impl Into<Value>) -> Self {
        self.max = Some(limit.into());
        self
    }

    pub fn with_less_than(mut self, limit: impl Into<Value>) -> Self {
        self.less_than = Some(limit.into());
        self
    }

    pub fn with_less_than_or_equal_to(mut self, limit: impl Into<Value>) -> Self {
        self.less_than_or_equal_to = Some(limit.into());
        self
    }

    pub fn with_greater_than(mut self, limit: impl Into<Value>) -> Self {
        self.greater_than = Some(limit.into());
        self
    }

    pub fn with_greater_than_or_equal_to(mut self, limit: impl Into<Value>) -> Self {
        self.greater_than_or_equal_to = Some(limit.into());
        self
    }

    /// Returns true if every present comparison holds for `value`.
    pub fn contains(&self, value: &Value) -> bool {
        let checks: [(&Option<Value>, fn(Ordering) -> bool); 8] = [
            (&self.before, Ordering::is_lt),
            (&self.after, Ordering::is_gt),
            (&self.min, Ordering::is_ge),
            (&self.max, Ordering::is_le),
            (&self.less_than, Ordering::is_lt),
            (&self.less_than_or_equal_to, Ordering::is_le),
            (&self.greater_than, Ordering::is_gt),
            (&self.greater_than_or_equal_to, Ordering::is_ge),
        ];

        checks.into_iter().all(|(limit, holds)| match limit {
            Some(limit) => value.compare(limit).is_some_and(holds),
            None => true,
        })
    }
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<RangeFull> for Bound {
    fn from(_: RangeFull) -> Self {
        Bound::Unbounded
    }
}

impl From<Value> for Bound {
    fn from(value: Value) -> Self {
        Bound::Exact(value)
    }
}

impl From<Vec<Value>> for Bound {
    fn from(members: Vec<Value>) -> Self {
        Bound::OneOf(members)
    }
}

impl From<Limits> for Bound {
    fn from(limits: Limits) -> Self {
        Bound::Limits(limits)
    }
}

impl<T: Into<Bound>> From<Option<T>> for Bound {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Bound::Unbounded, Into::into)
    }
}

macro_rules! scalar_bounds {
    ($($t:ty),* $(,)?) => {
        $(
            impl From<$t> for Bound {
                fn from(value: $t) -> Self {
                    Bound::Exact(value.into())
                }
            }

            impl From<RangeInclusive<$t>> for Bound {
                fn from(range: RangeInclusive<$t>) -> Self {
                    let (start, end) = range.into_inner();
                    Bound::Between {
                        start: start.into(),
                        end: end.into(),
                        inclusive: true,
                    }
                }
            }

            impl From<Range<$t>> for Bound {
                fn from(range: Range<$t>) -> Self {
                    Bound::Between {
                        start: range.start.into(),
                        end: range.end.into(),
                        inclusive: false,
                    }
                }
            }

            impl From<RangeFrom<$t>> for Bound {
                fn from(range: RangeFrom<$t>) -> Self {
                    Bound::Limits(Limits::new().with_min(range.start))
                }
            }

            impl From<RangeTo<$t>> for Bound {
                fn from(range: RangeTo<$t>) -> Self {
                    Bound::Limits(Limits::new().with_less_than(range.end))
                }
            }

            impl From<RangeToInclusive<$t>> for Bound {
                fn from(range: RangeToInclusive<$t>) -> Self {
                    Bound::Limits(Limits::new().with_max(range.end))
                }
            }
        )*
    };
}

scalar_bounds!(i32, i64, f64, NaiveDate, NaiveTime, DateTime<Utc>);

impl From<&str> for Bound {
    fn from(value: &str) -> Self {
        Bound::Exact(value.into())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BoundRepr {
    Unbounded,
    OneOf(Vec<Value>),
    Limits(Limits),
    Exact(Value),
}

impl<'de> Deserialize<'de> for Bound {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match BoundRepr::deserialize(deserializer)? {
            BoundRepr::Unbounded => Bound::Unbounded,
            BoundRepr::OneOf(members) => Bound::OneOf(members),
            BoundRepr::Limits(limits) => Bound::Limits(limits),
            BoundRepr::Exact(value) => Bound::Exact(value),
        })
    }
}
