// Copyright (c) 2024 Mike Tsao. All rights reserved.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A [Uid] identifies a mounted widget. Every event on an
/// [EventBus](crate::events::EventBus) carries the [Uid] of the widget that
/// emitted it.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
pub struct Uid(pub usize);
impl From<usize> for Uid {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

/// Generates unique [Uid]s.
#[derive(Debug)]
pub struct UidFactory {
    next_uid_value: AtomicUsize,
}
impl Default for UidFactory {
    fn default() -> Self {
        Self::new(Self::FIRST_UID)
    }
}
impl UidFactory {
    /// The first [Uid] value minted by a default factory.
    pub const FIRST_UID: usize = 1024;

    /// Creates a new UidFactory starting with the given [Uid] value.
    pub fn new(first_uid: usize) -> Self {
        Self {
            next_uid_value: AtomicUsize::new(first_uid),
        }
    }

    /// Generates the next unique [Uid].
    pub fn mint_next(&self) -> Uid {
        Uid::from(self.next_uid_value.fetch_add(1, Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uids_are_unique_and_increasing() {
        let factory = UidFactory::default();
        let a = factory.mint_next();
        let b = factory.mint_next();
        assert_eq!(a, Uid(UidFactory::FIRST_UID));
        assert!(b > a);
    }
}
