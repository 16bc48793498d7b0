//! Plain-text room rendering

use std::fmt::Write;

use huddle_core::{RoomAction, RoomView, Vote, VoteDisplay};

const NAME_WIDTH: usize = 24;
const NO_VOTE: &str = "-";
const HIDDEN_VOTE: &str = "*";

/// Render the room as a block of text
pub fn render(room_id: &str, view: &RoomView) -> String {
    let mut out = String::new();
    let phase = if view.revealed { "revealed" } else { "voting" };
    let _ = writeln!(
        out,
        "Room {room_id} | {} deck | {}/{} voted | {phase}",
        view.settings.deck,
        view.votes_cast(),
        view.participant_count(),
    );

    let me_label = format!("{} (you{})", view.me.name, if view.is_host() { ", host" } else { "" });
    let _ = writeln!(out, "  {:<NAME_WIDTH$} {}", me_label, own_vote(view.me.vote.as_ref()));

    for member in &view.others {
        let label = if member.is_host {
            format!("{} (host)", member.name)
        } else {
            member.name.clone()
        };
        let _ = writeln!(out, "  {:<NAME_WIDTH$} {}", label, other_vote(&member.vote));
    }

    let cards: Vec<String> = view.settings.deck.values().iter().map(Vote::to_string).collect();
    let _ = writeln!(out, "Cards: {}", cards.join(" "));

    let actions: Vec<&str> = [
        (RoomAction::Reveal, "reveal"),
        (RoomAction::Reset, "reset"),
        (RoomAction::ChangeDeck, "deck"),
    ]
    .into_iter()
    .filter(|(action, _)| view.can(*action))
    .map(|(_, name)| name)
    .collect();
    if !actions.is_empty() {
        let _ = writeln!(out, "Host actions: {}", actions.join(", "));
    }

    out
}

fn own_vote(vote: Option<&Vote>) -> String {
    vote.map_or_else(|| NO_VOTE.to_string(), Vote::to_string)
}

fn other_vote(vote: &VoteDisplay) -> String {
    match vote {
        VoteDisplay::Missing => NO_VOTE.to_string(),
        VoteDisplay::Hidden => HIDDEN_VOTE.to_string(),
        VoteDisplay::Shown(vote) => vote.to_string(),
    }
}
