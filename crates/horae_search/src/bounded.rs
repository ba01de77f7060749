//! Partial results from guard-capped searches.

use serde::Serialize;

use crate::error::SearchError;

/// Result of a search whose loop is bounded by a guard iteration cap.
///
/// Hitting the cap is not a failure: whatever was found so far is returned
/// with `guard_exceeded` set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bounded<T> {
    pub items: T,
    pub guard_exceeded: bool,
    /// Loop iterations actually spent.
    pub iterations: u32,
}

impl<T> Bounded<T> {
    pub fn complete(items: T, iterations: u32) -> Self {
        Self {
            items,
            guard_exceeded: false,
            iterations,
        }
    }

    pub fn partial(items: T, iterations: u32) -> Self {
        Self {
            items,
            guard_exceeded: true,
            iterations,
        }
    }

    /// Treat a guard hit as an error.
    pub fn into_strict(self) -> Result<T, SearchError> {
        if self.guard_exceeded {
            Err(SearchError::GuardExceeded {
                iterations: self.iterations,
            })
        } else {
            Ok(self.items)
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Bounded<U> {
        Bounded {
            items: f(self.items),
            guard_exceeded: self.guard_exceeded,
            iterations: self.iterations,
        }
    }
}
