//! Advisory permissions for room actions
//!
//! Nothing on the wire enforces these: any subscriber may broadcast a
//! reveal or reset and peers will apply it. The matrix exists so a UI can
//! disable controls the local participant should not use.

/// Actions a participant can take in a room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomAction {
    Vote,
    Rename,
    Reveal,
    Reset,
    ChangeDeck,
}

/// Permission matrix for room participants
pub struct PermissionMatrix;

impl PermissionMatrix {
    /// Check if a participant may perform an action given the host
    /// election result and the round phase
    pub fn can_perform(is_host: bool, revealed: bool, action: RoomAction) -> bool {
        match action {
            // Everyone
            RoomAction::Vote | RoomAction::Rename => true,

            // Host, and only when the transition would do something
            RoomAction::Reveal => is_host && !revealed,
            RoomAction::Reset => is_host && revealed,

            // Host only
            RoomAction::ChangeDeck => is_host,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_permissions() {
        assert!(PermissionMatrix::can_perform(true, false, RoomAction::Reveal));
        assert!(!PermissionMatrix::can_perform(true, false, RoomAction::Reset));
        assert!(PermissionMatrix::can_perform(true, true, RoomAction::Reset));
        assert!(PermissionMatrix::can_perform(true, true, RoomAction::ChangeDeck));
    }

    #[test]
    fn test_member_permissions() {
        assert!(PermissionMatrix::can_perform(false, false, RoomAction::Vote));
        assert!(PermissionMatrix::can_perform(false, true, RoomAction::Rename));
        assert!(!PermissionMatrix::can_perform(false, false, RoomAction::Reveal));
        assert!(!PermissionMatrix::can_perform(false, true, RoomAction::Reset));
        assert!(!PermissionMatrix::can_perform(false, false, RoomAction::ChangeDeck));
    }
}
