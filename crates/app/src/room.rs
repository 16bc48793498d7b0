//! Interactive room loop

use huddle_core::{load_or_create_identity, RoomAction, RoomSession, UuidIds};
use huddle_net::{drain, MemoryChannel, MemoryHub};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::commands::{Command, HELP};
use crate::peers::Peers;
use crate::render::render;
use crate::state::AppState;

/// Reprints the room only when it changed
#[derive(Default)]
struct Screen {
    last: Option<String>,
}

impl Screen {
    fn show(&mut self, frame: String) {
        if self.last.as_deref() != Some(frame.as_str()) {
            println!("{frame}");
            self.last = Some(frame);
        }
    }
}

/// Join `room_id` on a local hub and run the prompt until `quit` or EOF
pub async fn run(state: AppState, room_id: String) -> std::io::Result<()> {
    let store = state.open_identity_store();
    let identity = load_or_create_identity(
        store.as_ref(),
        &UuidIds,
        state.config().display_name.as_deref(),
    );

    let hub = MemoryHub::new();
    let (mut session, mut events) = hub.join(&room_id, identity, store);
    let mut peers = Peers::new(hub.clone(), room_id.clone());

    let status = session.connect().await;
    if !status.is_subscribed() {
        warn!(room = %room_id, status = ?status, "Could not join room");
        println!("Could not join room {room_id}: {status:?}");
    }
    println!(
        "Joined room {room_id} as {}. Type 'help' for commands.",
        session.identity().name
    );

    let mut screen = Screen::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        drain(&mut session, &mut events);
        screen.show(render(&room_id, session.view()));

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match Command::parse(&line) {
                    Ok(Some(Command::Quit)) => break,
                    Ok(Some(command)) => apply(command, &mut session, &mut peers).await,
                    Ok(None) => {}
                    Err(message) => println!("{message}"),
                }
            }

            event = events.recv() => {
                match event {
                    Some(event) => {
                        session.handle_event(event);
                    }
                    None => break,
                }
            }
        }
    }

    peers.shutdown().await;
    let identity = session.leave();
    info!(id = %identity.id, name = %identity.name, "Session ended");
    println!("Left room {room_id}");
    Ok(())
}

async fn apply(command: Command, session: &mut RoomSession<MemoryChannel>, peers: &mut Peers) {
    match command {
        Command::Vote(vote) => {
            let deck = session.view().settings.deck;
            if !deck.contains(&vote) {
                println!("Note: {vote} is not a {deck} card");
            }
            session.vote(Some(vote));
        }
        Command::Clear => {
            session.vote(None);
        }
        Command::Reveal => {
            if guard(session, RoomAction::Reveal, "reveal") {
                session.reveal();
            }
        }
        Command::Reset => {
            if guard(session, RoomAction::Reset, "reset") {
                session.reset();
            }
        }
        Command::Deck(deck) => {
            if guard(session, RoomAction::ChangeDeck, "change the deck") {
                session.change_deck(deck);
            }
        }
        Command::Name(name) => {
            session.rename(&name);
        }
        Command::Peer { name, action } => {
            if let Err(message) = peers.dispatch(&name, action).await {
                println!("{message}");
            }
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
}

/// Mirror the room's advisory controls at the prompt
fn guard(session: &RoomSession<MemoryChannel>, action: RoomAction, what: &str) -> bool {
    let allowed = session.view().can(action);
    if !allowed {
        if session.view().is_host() {
            println!("Cannot {what} right now");
        } else {
            println!("Only the host can {what}");
        }
    }
    allowed
}
