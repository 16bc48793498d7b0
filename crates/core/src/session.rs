//! Room session façade
//!
//! A `RoomSession` is one client's membership in one room. It owns the
//! local identity, feeds channel events through presence reconciliation,
//! host election, the round state machine and settings sync, and turns
//! local actions into channel writes.
//!
//! Everything runs on the caller's task: `handle_event` is synchronous, so
//! two reconciliations for the same session can never overlap. The only
//! await point is `connect`, which waits for the subscription to be
//! acknowledged before tracking the initial presence payload.

use tracing::{debug, info, warn};

use crate::channel::{Channel, ChannelEvent, RawPresenceState, SubscribeStatus};
use crate::error::Error;
use crate::hosting::{HostElectionResult, HostingState};
use crate::models::{Deck, Identity, Member, Role, Vote};
use crate::presence::PresenceTracker;
use crate::protocol::BroadcastEvent;
use crate::round::Round;
use crate::settings::{deck_patch, merge_settings, Settings, SettingsPatch};
use crate::storage::IdentityStore;
use crate::view::RoomView;

/// Connection state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// One client's view of, and voice in, a room
pub struct RoomSession<C: Channel> {
    room_id: String,
    identity: Identity,
    channel: C,
    store: Box<dyn IdentityStore>,
    connection: ConnectionState,
    presence: PresenceTracker,
    hosting: HostingState,
    round: Round,
    settings: Settings,
    view: RoomView,
}

impl<C: Channel> RoomSession<C> {
    /// Create a session for `room_id`. The channel must already be scoped
    /// to the room topic and keyed by `identity.id`.
    pub fn new(
        room_id: impl Into<String>,
        identity: Identity,
        channel: C,
        store: Box<dyn IdentityStore>,
    ) -> Self {
        let view = RoomView::build(
            Member::from_identity(&identity, None),
            &[],
            false,
            Settings::default(),
            None,
        );

        Self {
            room_id: room_id.into(),
            identity,
            channel,
            store,
            connection: ConnectionState::Disconnected,
            presence: PresenceTracker::new(),
            hosting: HostingState::new(),
            round: Round::new(),
            settings: Settings::default(),
            view,
        }
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Latest reconciled view
    pub fn view(&self) -> &RoomView {
        &self.view
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection
    }

    pub fn is_connected(&self) -> bool {
        self.connection == ConnectionState::Connected
    }

    /// Host changes observed by this client
    pub fn election_epoch(&self) -> u64 {
        self.hosting.election_epoch()
    }

    /// Subscribe to the room and announce ourselves with no vote
    pub async fn connect(&mut self) -> SubscribeStatus {
        self.connection = ConnectionState::Connecting;
        info!(room = %self.room_id, id = %self.identity.id, "Joining room");

        let status = self.channel.subscribe().await;
        if status.is_subscribed() {
            self.connection = ConnectionState::Connected;
            self.publish_presence();
            info!(room = %self.room_id, "Subscribed to room");
        } else {
            self.connection = ConnectionState::Disconnected;
            warn!(room = %self.room_id, status = ?status, "Room subscription failed");
        }
        status
    }

    /// Process one inbound channel event and return the rebuilt view
    pub fn handle_event(&mut self, event: ChannelEvent) -> &RoomView {
        match event {
            ChannelEvent::PresenceSync(raw) => self.on_presence_sync(&raw),
            ChannelEvent::Broadcast { event, payload } => {
                match BroadcastEvent::decode(&event, &payload) {
                    Some(broadcast) => self.on_broadcast(broadcast),
                    None => debug!(event = %event, "Dropping unrecognised broadcast"),
                }
            }
        }
        self.rebuild_view();
        &self.view
    }

    /// Re-read presence straight from the channel
    pub fn resync(&mut self) -> &RoomView {
        let raw = self.channel.presence_state();
        self.handle_event(ChannelEvent::PresenceSync(raw))
    }

    /// Set (or with `None`, withdraw) the local vote
    pub fn vote(&mut self, vote: Option<Vote>) -> &RoomView {
        if !self.ready_for("vote") {
            return &self.view;
        }
        if self.round.cast(vote) {
            self.publish_presence();
            self.rebuild_view();
        }
        &self.view
    }

    /// Reveal all votes, for everyone
    pub fn reveal(&mut self) -> &RoomView {
        if !self.ready_for("reveal") {
            return &self.view;
        }
        self.note_if_not_host("reveal");
        self.broadcast(BroadcastEvent::Reveal);
        self.on_broadcast(BroadcastEvent::Reveal);
        self.rebuild_view();
        &self.view
    }

    /// Hide and clear all votes, for everyone
    pub fn reset(&mut self) -> &RoomView {
        if !self.ready_for("reset") {
            return &self.view;
        }
        self.note_if_not_host("reset");
        self.broadcast(BroadcastEvent::Reset);
        self.on_broadcast(BroadcastEvent::Reset);
        self.rebuild_view();
        &self.view
    }

    /// Broadcast a partial settings update and merge it locally
    pub fn change_settings(&mut self, patch: SettingsPatch) -> &RoomView {
        if !self.ready_for("change_settings") {
            return &self.view;
        }
        self.note_if_not_host("change_settings");
        let event = BroadcastEvent::Settings(patch);
        self.broadcast(event.clone());
        self.on_broadcast(event);
        self.rebuild_view();
        &self.view
    }

    pub fn change_deck(&mut self, deck: Deck) -> &RoomView {
        self.change_settings(deck_patch(deck))
    }

    /// Change the display name. Persisted even while offline; republished
    /// when connected.
    pub fn rename(&mut self, name: &str) -> &RoomView {
        let name = name.trim();
        if name.is_empty() {
            debug!("Ignoring blank rename");
            return &self.view;
        }
        if name == self.identity.name {
            return &self.view;
        }

        info!(from = %self.identity.name, to = %name, "Renaming");
        self.identity.name = name.to_string();
        self.persist_identity();
        if self.is_connected() {
            self.publish_presence();
        }
        self.rebuild_view();
        &self.view
    }

    /// Leave the room and hand back the (possibly promoted or renamed)
    /// identity
    pub fn leave(self) -> Identity {
        self.channel.unsubscribe();
        info!(room = %self.room_id, id = %self.identity.id, "Left room");
        self.identity
    }

    fn on_presence_sync(&mut self, raw: &RawPresenceState) {
        let change = self.presence.update(raw);
        if !change.is_empty() {
            info!(
                room = %self.room_id,
                joined = change.joined.len(),
                left = change.left.len(),
                present = self.presence.members().len(),
                "Room membership changed"
            );
        }

        match self.hosting.observe(self.presence.members()) {
            HostElectionResult::Elected(host_id) => {
                info!(host = %host_id, epoch = self.hosting.election_epoch(), "Host elected");
            }
            HostElectionResult::NoHost => debug!("Room has no members, no host"),
            HostElectionResult::Unchanged => {}
        }

        if self.hosting.needs_promotion(&self.identity) {
            self.promote_self();
        }

        let newcomer = change.joined.iter().any(|id| *id != self.identity.id);
        if newcomer && self.hosting.is_host(&self.identity.id) {
            self.share_settings();
        }
    }

    /// Bring late joiners up to date with the full settings object
    fn share_settings(&self) {
        if !self.ready_for("share_settings") {
            return;
        }
        debug!(room = %self.room_id, "Rebroadcasting settings for new members");
        self.broadcast(BroadcastEvent::Settings(self.settings.to_patch()));
    }

    fn on_broadcast(&mut self, event: BroadcastEvent) {
        match event {
            BroadcastEvent::Reveal => {
                if self.round.reveal() {
                    info!(room = %self.room_id, "Votes revealed");
                }
            }
            BroadcastEvent::Reset => {
                let outcome = self.round.reset();
                if outcome.phase_changed {
                    info!(room = %self.room_id, "Round reset");
                }
                if outcome.vote_cleared {
                    self.publish_presence();
                }
            }
            BroadcastEvent::Settings(patch) => {
                self.settings = merge_settings(&self.settings, &patch);
                debug!(deck = %self.settings.deck.code(), "Settings merged");
            }
        }
    }

    fn promote_self(&mut self) {
        info!(id = %self.identity.id, "Elected host, republishing presence");
        self.identity.role = Role::Host;
        self.persist_identity();
        self.publish_presence();
    }

    fn ready_for(&self, action: &str) -> bool {
        if self.is_connected() {
            return true;
        }
        debug!(action, state = ?self.connection, "Channel not subscribed, ignoring action");
        false
    }

    fn note_if_not_host(&self, action: &str) {
        if !self.view.is_host() {
            debug!(action, "Host-only action taken by non-host");
        }
    }

    fn publish_presence(&self) {
        if !self.is_connected() {
            return;
        }
        let payload = Member::from_identity(&self.identity, self.round.vote().cloned());
        let result = serde_json::to_value(&payload)
            .map_err(Error::from)
            .and_then(|value| self.channel.track(value));
        if let Err(e) = result {
            warn!(error = %e, "Failed to publish presence");
        }
    }

    fn broadcast(&self, event: BroadcastEvent) {
        if let Err(e) = self.channel.send(event.name(), event.payload()) {
            warn!(event = event.name(), error = %e, "Failed to broadcast");
        }
    }

    fn persist_identity(&self) {
        if let Err(e) = self.store.save(&self.identity) {
            warn!(error = %e, "Failed to persist identity");
        }
    }

    fn rebuild_view(&mut self) {
        self.view = RoomView::build(
            Member::from_identity(&self.identity, self.round.vote().cloned()),
            self.presence.members(),
            self.round.is_revealed(),
            self.settings.clone(),
            self.hosting.host_id().cloned(),
        );
    }
}
