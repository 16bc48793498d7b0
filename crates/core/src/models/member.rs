//! Room member model

use serde::{Deserialize, Serialize};

use super::{Identity, MemberId, Role, Vote};

/// A participant currently present in the room.
///
/// This is also the presence payload each client tracks on the channel:
/// `{ "id", "name", "role", "vote" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub vote: Option<Vote>,
}

impl Member {
    pub fn from_identity(identity: &Identity, vote: Option<Vote>) -> Self {
        Self {
            id: identity.id.clone(),
            name: identity.name.clone(),
            role: identity.role,
            vote,
        }
    }

    pub fn has_voted(&self) -> bool {
        self.vote.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_presence_payload_shape() {
        let identity = Identity::new(MemberId::from("u1"), "Ada");
        let member = Member::from_identity(&identity, Some(Vote::Points(8)));
        assert_eq!(
            serde_json::to_value(&member).unwrap(),
            json!({ "id": "u1", "name": "Ada", "role": "member", "vote": 8 })
        );
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let member: Member = serde_json::from_value(json!({ "id": "u2", "name": "Bo" })).unwrap();
        assert_eq!(member.role, Role::Member);
        assert!(!member.has_voted());
    }
}
