//! Local identity model

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, stable participant identifier.
///
/// Ordering is plain lexicographic string ordering. Host election
/// depends on it, so never compare ids any other way.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MemberId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Role advertised in presence payloads.
///
/// Only a display hint: authority always comes from local election.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Host,
    #[default]
    Member,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Host => "host",
            Role::Member => "member",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "host" => Some(Role::Host),
            "member" => Some(Role::Member),
            _ => None,
        }
    }

    pub fn is_host(&self) -> bool {
        *self == Role::Host
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The local participant, persisted between sessions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: MemberId,
    pub name: String,
    pub role: Role,
}

impl Identity {
    pub fn new(id: MemberId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            role: Role::Member,
        }
    }

    /// Fresh identity with a random `Guest-N` display name
    pub fn guest(id: MemberId) -> Self {
        let suffix = rand::thread_rng().gen_range(0..1000);
        Self::new(id, format!("Guest-{suffix}"))
    }

    pub fn is_host(&self) -> bool {
        self.role.is_host()
    }
}

/// Source of new identity ids.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> MemberId;
}

/// Random v4 UUIDs
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&self) -> MemberId {
        MemberId::new(Uuid::new_v4().to_string())
    }
}

/// Deterministic ids (`<prefix>-0001`, `<prefix>-0002`, ...).
///
/// Zero-padded so lexicographic order matches creation order.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> MemberId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        MemberId::new(format!("{}-{:04}", self.prefix, n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_id_ordering_is_lexicographic() {
        let a = MemberId::from("a-9");
        let b = MemberId::from("b-1");
        assert!(a < b);
        assert!(MemberId::from("10") < MemberId::from("9"));
    }

    #[test]
    fn test_guest_name() {
        let identity = Identity::guest(MemberId::from("abc"));
        assert!(identity.name.starts_with("Guest-"));
        assert_eq!(identity.role, Role::Member);
    }

    #[test]
    fn test_sequential_ids_sort_in_creation_order() {
        let ids = SequentialIds::new("peer");
        let first = ids.next_id();
        let second = ids.next_id();
        assert_eq!(first.as_str(), "peer-0001");
        assert!(first < second);
    }

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_value(Role::Host).unwrap(), "host");
        assert_eq!(Role::parse("member"), Some(Role::Member));
        assert_eq!(Role::parse("owner"), None);
    }
}
