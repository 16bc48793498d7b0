//! Host election for rooms
//!
//! The host is whoever holds the lexicographically smallest id among the
//! members currently present. Every client computes this on its own from
//! its presence snapshot, so no election messages exist: once snapshots
//! agree, hosts agree. Roles carried in presence payloads are never
//! consulted.

use crate::models::{Identity, Member, MemberId};

/// Elect the host from the present members
pub fn elect_host(members: &[Member]) -> Option<MemberId> {
    members.iter().map(|m| &m.id).min().cloned()
}

/// Result of a host election
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostElectionResult {
    /// Same host as before
    Unchanged,
    /// A different member is now host
    Elected(MemberId),
    /// Room is empty
    NoHost,
}

/// Locally observed hosting state
#[derive(Debug, Clone, Default)]
pub struct HostingState {
    /// Current host user ID
    host_id: Option<MemberId>,
    /// Number of host changes this client has observed
    election_epoch: u64,
}

impl HostingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host_id(&self) -> Option<&MemberId> {
        self.host_id.as_ref()
    }

    pub fn election_epoch(&self) -> u64 {
        self.election_epoch
    }

    /// Check if a member is currently the host
    pub fn is_host(&self, id: &MemberId) -> bool {
        self.host_id.as_ref() == Some(id)
    }

    /// Re-run the election over the current member list
    pub fn observe(&mut self, members: &[Member]) -> HostElectionResult {
        let elected = elect_host(members);
        if elected == self.host_id {
            return HostElectionResult::Unchanged;
        }

        self.host_id = elected.clone();
        self.election_epoch += 1;
        match elected {
            Some(id) => HostElectionResult::Elected(id),
            None => HostElectionResult::NoHost,
        }
    }

    /// True when the local client was elected but still records itself as
    /// a plain member, i.e. it must republish with `role = host`.
    pub fn needs_promotion(&self, local: &Identity) -> bool {
        self.is_host(&local.id) && !local.is_host()
    }
}
