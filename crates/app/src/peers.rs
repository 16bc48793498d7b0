//! Simulated participants
//!
//! Each peer is a full room session running on its own task, so the local
//! client sees it exactly as it would see a remote one.

use std::collections::HashMap;

use huddle_core::{Identity, IdGenerator, MemoryIdentityStore, RoomSession, UuidIds, Vote};
use huddle_net::{EventStream, MemoryChannel, MemoryHub};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::commands::PeerAction;

enum PeerCommand {
    Vote(Vote),
    Reveal,
    Reset,
    Leave,
}

struct PeerHandle {
    cmd_tx: mpsc::Sender<PeerCommand>,
    task: JoinHandle<()>,
}

/// Simulated peers in one room
pub struct Peers {
    hub: MemoryHub,
    room_id: String,
    ids: Box<dyn IdGenerator>,
    peers: HashMap<String, PeerHandle>,
}

impl Peers {
    pub fn new(hub: MemoryHub, room_id: impl Into<String>) -> Self {
        Self::with_ids(hub, room_id, Box::new(UuidIds))
    }

    pub fn with_ids(hub: MemoryHub, room_id: impl Into<String>, ids: Box<dyn IdGenerator>) -> Self {
        Self {
            hub,
            room_id: room_id.into(),
            ids,
            peers: HashMap::new(),
        }
    }

    /// Carry out a prompt command for the named peer
    pub async fn dispatch(&mut self, name: &str, action: PeerAction) -> Result<(), String> {
        let command = match action {
            PeerAction::Join => return self.add(name).await,
            PeerAction::Leave => return self.remove(name).await,
            PeerAction::Vote(vote) => PeerCommand::Vote(vote),
            PeerAction::Reveal => PeerCommand::Reveal,
            PeerAction::Reset => PeerCommand::Reset,
        };

        let peer = self
            .peers
            .get(name)
            .ok_or_else(|| format!("No peer named '{name}'"))?;
        peer.cmd_tx
            .send(command)
            .await
            .map_err(|_| format!("Peer '{name}' is no longer running"))
    }

    async fn add(&mut self, name: &str) -> Result<(), String> {
        if self.peers.contains_key(name) {
            return Err(format!("Peer '{name}' is already in the room"));
        }

        let identity = Identity::new(self.ids.next_id(), name);
        let (mut session, events) =
            self.hub
                .join(&self.room_id, identity, Box::new(MemoryIdentityStore::new()));
        let status = session.connect().await;
        if !status.is_subscribed() {
            return Err(format!("Peer '{name}' could not join: {status:?}"));
        }

        let (cmd_tx, cmd_rx) = mpsc::channel(16);
        let task = tokio::spawn(peer_task(session, events, cmd_rx));
        self.peers.insert(name.to_string(), PeerHandle { cmd_tx, task });
        info!(peer = %name, "Simulated peer joined");
        Ok(())
    }

    async fn remove(&mut self, name: &str) -> Result<(), String> {
        let peer = self
            .peers
            .remove(name)
            .ok_or_else(|| format!("No peer named '{name}'"))?;
        stop(name, peer).await;
        Ok(())
    }

    /// Make every peer leave
    pub async fn shutdown(&mut self) {
        for (name, peer) in self.peers.drain() {
            stop(&name, peer).await;
        }
    }
}

async fn stop(name: &str, peer: PeerHandle) {
    let _ = peer.cmd_tx.send(PeerCommand::Leave).await;
    if let Err(e) = peer.task.await {
        debug!(peer = %name, error = %e, "Peer task ended abnormally");
    }
}

/// Drive one simulated peer until told to leave or the hub goes away
async fn peer_task(
    mut session: RoomSession<MemoryChannel>,
    mut events: EventStream,
    mut cmd_rx: mpsc::Receiver<PeerCommand>,
) {
    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(PeerCommand::Vote(vote)) => {
                        session.vote(Some(vote));
                    }
                    Some(PeerCommand::Reveal) => {
                        session.reveal();
                    }
                    Some(PeerCommand::Reset) => {
                        session.reset();
                    }
                    Some(PeerCommand::Leave) | None => break,
                }
            }

            event = events.recv() => {
                match event {
                    Some(event) => {
                        session.handle_event(event);
                    }
                    None => {
                        debug!(room = %session.room_id(), "Peer event stream closed");
                        break;
                    }
                }
            }
        }
    }

    let identity = session.leave();
    info!(peer = %identity.name, "Simulated peer left");
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_core::{MemberId, SequentialIds, VoteDisplay};
    use huddle_net::drain;
    use std::time::Duration;

    /// Pump the local session until `done` holds
    async fn wait_for(
        session: &mut RoomSession<MemoryChannel>,
        events: &mut EventStream,
        done: impl Fn(&RoomSession<MemoryChannel>) -> bool,
    ) {
        for _ in 0..200 {
            drain(session, events);
            if done(session) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("condition not reached: {:?}", session.view());
    }

    #[tokio::test]
    async fn test_peers_join_vote_and_leave() {
        let hub = MemoryHub::new();
        let mut peers = Peers::with_ids(hub.clone(), "ROOM", Box::new(SequentialIds::new("peer")));
        let me = Identity::new(MemberId::from("zz-local"), "Me");
        let (mut session, mut events) = hub.join("ROOM", me, Box::new(MemoryIdentityStore::new()));
        session.connect().await;

        peers.dispatch("bob", PeerAction::Join).await.unwrap();
        assert!(peers.dispatch("bob", PeerAction::Join).await.is_err());
        wait_for(&mut session, &mut events, |s| s.view().others.len() == 1).await;
        assert_eq!(session.view().host_name(), Some("bob"));

        peers.dispatch("bob", PeerAction::Vote(Vote::Points(13))).await.unwrap();
        wait_for(&mut session, &mut events, |s| {
            s.view().others[0].vote == VoteDisplay::Hidden
        })
        .await;

        peers.dispatch("bob", PeerAction::Reveal).await.unwrap();
        wait_for(&mut session, &mut events, |s| s.view().revealed).await;
        assert_eq!(session.view().others[0].vote, VoteDisplay::Shown(Vote::Points(13)));

        peers.dispatch("bob", PeerAction::Leave).await.unwrap();
        wait_for(&mut session, &mut events, |s| s.view().is_host()).await;
        assert!(peers.dispatch("bob", PeerAction::Reset).await.is_err());
    }
}
