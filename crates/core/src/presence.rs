//! Presence reconciliation
//!
//! Turns the transport's raw presence snapshot into the ordered member
//! list every other component works from. Peer payloads are untrusted, so
//! anything that does not parse is dropped here and never surfaces as an
//! error.

use serde_json::Value;
use tracing::debug;

use crate::channel::RawPresenceState;
use crate::invariants::assert_member_list_invariants;
use crate::models::{Member, MemberId};

/// Flatten a raw snapshot to one member per presence key, sorted by id.
///
/// When a key carries several payloads the latest well-formed one wins.
/// A payload whose `id` differs from its presence key is malformed.
pub fn reconcile(raw: &RawPresenceState) -> Vec<Member> {
    let mut members: Vec<Member> = raw
        .iter()
        .filter_map(|(key, payloads)| latest_payload(key, payloads))
        .collect();
    members.sort_by(|a, b| a.id.cmp(&b.id));
    assert_member_list_invariants(&members);
    members
}

fn latest_payload(key: &str, payloads: &[Value]) -> Option<Member> {
    payloads
        .iter()
        .rev()
        .find_map(|payload| parse_payload(key, payload))
}

fn parse_payload(key: &str, payload: &Value) -> Option<Member> {
    let member: Member = match serde_json::from_value(payload.clone()) {
        Ok(member) => member,
        Err(e) => {
            debug!(key = %key, error = %e, "Dropping malformed presence payload");
            return None;
        }
    };

    if member.id.is_empty() || member.id.as_str() != key {
        debug!(key = %key, id = %member.id, "Dropping presence payload with mismatched id");
        return None;
    }

    Some(member)
}

/// Membership change between two reconciliations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceChange {
    pub joined: Vec<MemberId>,
    pub left: Vec<MemberId>,
}

impl PresenceChange {
    pub fn is_empty(&self) -> bool {
        self.joined.is_empty() && self.left.is_empty()
    }
}

/// Holds the last reconciled member list so joins and leaves can be
/// reported.
#[derive(Debug, Clone, Default)]
pub struct PresenceTracker {
    members: Vec<Member>,
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the member list from a fresh snapshot
    pub fn update(&mut self, raw: &RawPresenceState) -> PresenceChange {
        let members = reconcile(raw);

        let joined = members
            .iter()
            .filter(|m| !self.contains(&m.id))
            .map(|m| m.id.clone())
            .collect();
        let left = self
            .members
            .iter()
            .filter(|old| !members.iter().any(|m| m.id == old.id))
            .map(|m| m.id.clone())
            .collect();

        self.members = members;
        PresenceChange { joined, left }
    }

    pub fn members(&self) -> &[Member] {
        &self.members
    }

    pub fn contains(&self, id: &MemberId) -> bool {
        self.members.iter().any(|m| &m.id == id)
    }
}
