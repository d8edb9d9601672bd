//! Per-connection subscription manager.
//!
//! Tracks which pool names a WebSocket client is subscribed to and
//! provides server-side event filtering.

use std::collections::HashSet;

use crate::domain::PoolName;

/// Manages the set of pool subscriptions for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed pool names. If `subscribe_all` is true, this set is ignored.
    pools: HashSet<PoolName>,
    /// Whether the client subscribes to all pools (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds pool names to the subscription set. `"*"` enables the wildcard.
    pub fn subscribe(&mut self, pools: &[PoolName], wildcard: bool) {
        if wildcard {
            self.subscribe_all = true;
        }
        for pool in pools {
            self.pools.insert(pool.clone());
        }
    }

    /// Removes pool names from the subscription set.
    pub fn unsubscribe(&mut self, pools: &[PoolName]) {
        for pool in pools {
            self.pools.remove(pool);
        }
    }

    /// Returns `true` if the given pool matches the subscription filter.
    #[must_use]
    pub fn matches(&self, pool: &PoolName) -> bool {
        self.subscribe_all || self.pools.contains(pool)
    }

    /// Returns the number of explicitly subscribed pools.
    #[must_use]
    pub fn count(&self) -> usize {
        self.pools.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn empty_matches_nothing() {
        let mgr = SubscriptionManager::new();
        assert!(!mgr.matches(&PoolName::from("pool1")));
    }

    #[test]
    fn subscribe_specific_pool() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[PoolName::from("pool1")], false);
        assert!(mgr.matches(&PoolName::from("pool1")));
        assert!(!mgr.matches(&PoolName::from("pool2")));
    }

    #[test]
    fn wildcard_matches_everything() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[], true);
        assert!(mgr.matches(&PoolName::from("pool1")));
        assert!(mgr.matches(&PoolName::from("pool2")));
    }

    #[test]
    fn unsubscribe_removes_pool() {
        let mut mgr = SubscriptionManager::new();
        mgr.subscribe(&[PoolName::from("pool1")], false);
        assert!(mgr.matches(&PoolName::from("pool1")));
        mgr.unsubscribe(&[PoolName::from("pool1")]);
        assert!(!mgr.matches(&PoolName::from("pool1")));
    }

    #[test]
    fn count_tracks_explicit() {
        let mut mgr = SubscriptionManager::new();
        assert_eq!(mgr.count(), 0);
        mgr.subscribe(&[PoolName::from("pool1"), PoolName::from("pool2")], false);
        assert_eq!(mgr.count(), 2);
    }
}
