//! Reconciled room view
//!
//! A `RoomView` is rebuilt from scratch after every event. It separates
//! the local participant (`me`) from everyone else so callers never have
//! to filter themselves out, and it hides other members' vote values
//! until the round is revealed.

use crate::invariants::assert_room_view_invariants;
use crate::models::{Member, MemberId, Role, Vote};
use crate::permissions::{PermissionMatrix, RoomAction};
use crate::settings::Settings;

/// What an observer may see of another member's vote
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoteDisplay {
    /// Not voted yet
    Missing,
    /// Voted, value hidden until reveal
    Hidden,
    /// Revealed value
    Shown(Vote),
}

impl VoteDisplay {
    fn of(vote: Option<&Vote>, revealed: bool) -> Self {
        match (vote, revealed) {
            (None, _) => VoteDisplay::Missing,
            (Some(_), false) => VoteDisplay::Hidden,
            (Some(vote), true) => VoteDisplay::Shown(vote.clone()),
        }
    }

    pub fn has_voted(&self) -> bool {
        !matches!(self, VoteDisplay::Missing)
    }
}

/// Another member as shown to the local participant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberView {
    pub id: MemberId,
    pub name: String,
    /// Role the member advertises; display only
    pub role: Role,
    /// Host according to the local election
    pub is_host: bool,
    pub vote: VoteDisplay,
}

/// Full, internally consistent snapshot of the room
#[derive(Debug, Clone, PartialEq)]
pub struct RoomView {
    pub me: Member,
    /// Everyone else, ordered by id
    pub others: Vec<MemberView>,
    pub revealed: bool,
    pub settings: Settings,
    pub host_id: Option<MemberId>,
}

impl RoomView {
    /// Build a view from the reconciled member list.
    ///
    /// `members` must be sorted by id; `me` is rendered from local state,
    /// so any presence entry with the same id is skipped.
    pub fn build(
        me: Member,
        members: &[Member],
        revealed: bool,
        settings: Settings,
        host_id: Option<MemberId>,
    ) -> Self {
        let others = members
            .iter()
            .filter(|m| m.id != me.id)
            .map(|m| MemberView {
                id: m.id.clone(),
                name: m.name.clone(),
                role: m.role,
                is_host: host_id.as_ref() == Some(&m.id),
                vote: VoteDisplay::of(m.vote.as_ref(), revealed),
            })
            .collect();

        let view = Self {
            me,
            others,
            revealed,
            settings,
            host_id,
        };
        assert_room_view_invariants(&view);
        view
    }

    /// Whether the local participant is the elected host
    pub fn is_host(&self) -> bool {
        self.host_id.as_ref() == Some(&self.me.id)
    }

    /// Advisory check for UI controls
    pub fn can(&self, action: RoomAction) -> bool {
        PermissionMatrix::can_perform(self.is_host(), self.revealed, action)
    }

    /// Number of participants including `me`
    pub fn participant_count(&self) -> usize {
        self.others.len() + 1
    }

    /// How many participants have voted, `me` included
    pub fn votes_cast(&self) -> usize {
        let mine = usize::from(self.me.has_voted());
        mine + self.others.iter().filter(|m| m.vote.has_voted()).count()
    }

    pub fn host_name(&self) -> Option<&str> {
        let host_id = self.host_id.as_ref()?;
        if host_id == &self.me.id {
            return Some(&self.me.name);
        }
        self.others
            .iter()
            .find(|m| &m.id == host_id)
            .map(|m| m.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Deck;

    fn member(id: &str, vote: Option<Vote>) -> Member {
        Member {
            id: MemberId::from(id),
            name: format!("name-{id}"),
            role: Role::Member,
            vote,
        }
    }

    #[test]
    fn test_self_is_excluded_from_others() {
        let me = member("b", None);
        let members = vec![
            member("a", None),
            member("b", Some(Vote::Points(1))),
            member("c", None),
        ];

        let view = RoomView::build(me, &members, false, Settings::default(), None);
        assert_eq!(view.others.len(), 2);
        assert!(view.others.iter().all(|m| m.id != view.me.id));
        assert_eq!(view.participant_count(), 3);
    }

    #[test]
    fn test_votes_hidden_until_revealed() {
        let me = member("a", Some(Vote::Points(1)));
        let members = vec![
            member("a", Some(Vote::Points(1))),
            member("b", Some(Vote::Points(3))),
            member("c", Some(Vote::Points(8))),
            member("d", None),
        ];

        let hidden = RoomView::build(me.clone(), &members, false, Settings::default(), None);
        let displays: Vec<_> = hidden.others.iter().map(|m| m.vote.clone()).collect();
        assert_eq!(
            displays,
            vec![VoteDisplay::Hidden, VoteDisplay::Hidden, VoteDisplay::Missing]
        );
        // own vote is always visible to self
        assert_eq!(hidden.me.vote, Some(Vote::Points(1)));

        let shown = RoomView::build(me, &members, true, Settings::default(), None);
        let displays: Vec<_> = shown.others.iter().map(|m| m.vote.clone()).collect();
        assert_eq!(
            displays,
            vec![
                VoteDisplay::Shown(Vote::Points(3)),
                VoteDisplay::Shown(Vote::Points(8)),
                VoteDisplay::Missing
            ]
        );
        assert_eq!(shown.votes_cast(), 3);
    }

    #[test]
    fn test_host_flag_and_controls() {
        let me = member("b", None);
        let members = vec![member("a", None), member("b", None)];

        let view = RoomView::build(
            me,
            &members,
            false,
            Settings::with_deck(Deck::Tshirt),
            Some(MemberId::from("a")),
        );
        assert!(!view.is_host());
        assert!(view.others[0].is_host);
        assert_eq!(view.host_name(), Some("name-a"));
        assert!(!view.can(RoomAction::Reveal));
        assert!(view.can(RoomAction::Vote));
    }
}
