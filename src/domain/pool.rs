//! Pool: a membership group of network elements plus per-APN down-state.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::{ApnName, ElementName, PoolName};

/// A membership group of network elements that mutually monitor shared APNs.
///
/// The member list preserves join order (propagation iterates members in
/// that order for determinism). The down-state map records, per APN, the
/// ordered set of members currently declaring that APN down. An entry is
/// removed as soon as its reporter set empties — readers never observe a
/// degenerate empty entry.
///
/// `Pool` only manages its own collections; the bidirectional link with
/// [`super::NetworkElement::pool`] is maintained by the directory inside a
/// single locked transaction.
#[derive(Debug, Clone)]
pub struct Pool {
    /// Identity key (immutable after creation).
    pub name: PoolName,

    /// Members in join order, no duplicates.
    pub members: Vec<ElementName>,

    /// Per-APN reporter sets, in declaration order.
    down_state: HashMap<ApnName, Vec<ElementName>>,

    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Pool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new(name: PoolName) -> Self {
        Self {
            name,
            members: Vec::new(),
            down_state: HashMap::new(),
            created_at: Utc::now(),
        }
    }

    /// Appends an element to the member list.
    pub fn push_member(&mut self, element: ElementName) {
        self.members.push(element);
    }

    /// Removes an element from the member list, returning `false` if absent.
    pub fn remove_member_entry(&mut self, element: &ElementName) -> bool {
        let Some(pos) = self.members.iter().position(|m| m == element) else {
            return false;
        };
        self.members.remove(pos);
        true
    }

    /// Returns the current reporter set for the APN, empty if none.
    #[must_use]
    pub fn down_reporters(&self, apn: &ApnName) -> &[ElementName] {
        self.down_state.get(apn).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` if the element currently reports the APN as down.
    #[must_use]
    pub fn is_reporting(&self, element: &ElementName, apn: &ApnName) -> bool {
        self.down_reporters(apn).contains(element)
    }

    /// Records a down declaration. Returns `false` if the element was
    /// already reporting (idempotent re-declaration).
    pub fn insert_reporter(&mut self, element: ElementName, apn: ApnName) -> bool {
        let reporters = self.down_state.entry(apn).or_default();
        if reporters.contains(&element) {
            return false;
        }
        reporters.push(element);
        true
    }

    /// Removes a down declaration, dropping the entry when it empties.
    ///
    /// Returns `false` if no entry existed or the element was not reporting.
    pub fn remove_reporter(&mut self, element: &ElementName, apn: &ApnName) -> bool {
        let Some(reporters) = self.down_state.get_mut(apn) else {
            return false;
        };
        let Some(pos) = reporters.iter().position(|r| r == element) else {
            return false;
        };
        reporters.remove(pos);
        if reporters.is_empty() {
            self.down_state.remove(apn);
        }
        true
    }

    /// Returns `true` if any member currently declares the APN down.
    #[must_use]
    pub fn has_alarm(&self, apn: &ApnName) -> bool {
        self.down_state.contains_key(apn)
    }

    /// Removes the element from every down-state entry of this pool,
    /// returning the APNs it was reporting.
    pub fn purge_reporter(&mut self, element: &ElementName) -> Vec<ApnName> {
        let affected: Vec<ApnName> = self
            .down_state
            .iter()
            .filter(|(_, reporters)| reporters.contains(element))
            .map(|(apn, _)| apn.clone())
            .collect();
        for apn in &affected {
            let _ = self.remove_reporter(element, apn);
        }
        affected
    }

    /// Returns the down-state map as `(apn, reporters)` pairs sorted by APN
    /// name for stable display.
    #[must_use]
    pub fn down_state_snapshot(&self) -> Vec<(ApnName, Vec<ElementName>)> {
        let mut snapshot: Vec<(ApnName, Vec<ElementName>)> = self
            .down_state
            .iter()
            .map(|(apn, reporters)| (apn.clone(), reporters.clone()))
            .collect();
        snapshot.sort_by(|a, b| a.0.cmp(&b.0));
        snapshot
    }

    /// Number of APNs with at least one active declaration.
    #[must_use]
    pub fn active_alarm_count(&self) -> usize {
        self.down_state.len()
    }
}
