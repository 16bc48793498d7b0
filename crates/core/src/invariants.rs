//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use crate::models::Member;
use crate::view::{RoomView, VoteDisplay};

/// Validate that a reconciled member list is sorted, unique and has no
/// blank ids
pub fn assert_member_list_invariants(members: &[Member]) {
    debug_assert!(
        members.iter().all(|m| !m.id.is_empty()),
        "Member list contains a blank id"
    );

    debug_assert!(
        members.windows(2).all(|pair| pair[0].id < pair[1].id),
        "Member list is not strictly sorted by id: {:?}",
        members.iter().map(|m| m.id.as_str()).collect::<Vec<_>>()
    );
}

/// Validate that a room view is internally consistent
pub fn assert_room_view_invariants(view: &RoomView) {
    // Self must never appear among the others
    debug_assert!(
        view.others.iter().all(|m| m.id != view.me.id),
        "Room view lists self {} among others",
        view.me.id
    );

    debug_assert!(
        view.others.windows(2).all(|pair| pair[0].id < pair[1].id),
        "Room view others are not strictly sorted by id"
    );

    // At most one member carries the elected host flag
    let host_count = view.others.iter().filter(|m| m.is_host).count() + usize::from(view.is_host());
    debug_assert!(
        host_count <= 1,
        "Room view has {} hosts, expected 0 or 1",
        host_count
    );

    // Hidden votes must stay hidden
    if !view.revealed {
        debug_assert!(
            view.others
                .iter()
                .all(|m| !matches!(m.vote, VoteDisplay::Shown(_))),
            "Room view exposes vote values before reveal"
        );
    }
}
