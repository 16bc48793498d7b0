//! Terminal command parsing

use huddle_core::{Deck, Vote};

pub const HELP: &str = "\
Commands:
  vote <value>              cast a vote (e.g. 5, XL, ?)
  clear                     withdraw your vote
  reveal                    show all votes
  reset                     hide and clear all votes
  deck <fib|tshirt>         switch the room's deck
  name <new name>           change your display name
  peer add <name>           add a simulated participant
  peer vote <name> <value>  vote as a simulated participant
  peer reveal <name>        reveal as a simulated participant
  peer reset <name>         reset as a simulated participant
  peer leave <name>         remove a simulated participant
  help                      show this help
  quit                      leave the room";

/// A line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Vote(Vote),
    Clear,
    Reveal,
    Reset,
    Deck(Deck),
    Name(String),
    Peer { name: String, action: PeerAction },
    Help,
    Quit,
}

/// What a simulated participant should do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerAction {
    Join,
    Vote(Vote),
    Reveal,
    Reset,
    Leave,
}

impl Command {
    /// Parse one input line. Empty input is `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = split_word(line);
        let command = match word.to_ascii_lowercase().as_str() {
            "vote" | "v" => Command::Vote(parse_vote(rest)?),
            "clear" => Command::Clear,
            "reveal" => Command::Reveal,
            "reset" => Command::Reset,
            "deck" => Command::Deck(Deck::from_code(rest).ok_or_else(|| {
                format!("Unknown deck '{rest}', expected fib or tshirt")
            })?),
            "name" => {
                if rest.is_empty() {
                    return Err("Usage: name <new name>".to_string());
                }
                Command::Name(rest.to_string())
            }
            "peer" => parse_peer(rest)?,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(format!("Unknown command '{other}', try 'help'")),
        };
        Ok(Some(command))
    }
}

fn parse_peer(input: &str) -> Result<Command, String> {
    let (action, rest) = split_word(input);
    let (name, rest) = split_word(rest);
    if name.is_empty() {
        return Err("Usage: peer <add|vote|reveal|reset|leave> <name>".to_string());
    }

    let action = match action.to_ascii_lowercase().as_str() {
        "add" | "join" => PeerAction::Join,
        "vote" => PeerAction::Vote(parse_vote(rest)?),
        "reveal" => PeerAction::Reveal,
        "reset" => PeerAction::Reset,
        "leave" => PeerAction::Leave,
        other => return Err(format!("Unknown peer action '{other}'")),
    };

    Ok(Command::Peer {
        name: name.to_string(),
        action,
    })
}

fn parse_vote(input: &str) -> Result<Vote, String> {
    Vote::parse(input).ok_or_else(|| "Usage: vote <value>".to_string())
}

fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Command {
        Command::parse(line).unwrap().unwrap()
    }

    #[test]
    fn test_parse_local_commands() {
        assert_eq!(parse("vote 5"), Command::Vote(Vote::Points(5)));
        assert_eq!(parse("  VOTE xl "), Command::Vote(Vote::label("xl")));
        assert_eq!(parse("clear"), Command::Clear);
        assert_eq!(parse("reveal"), Command::Reveal);
        assert_eq!(parse("reset"), Command::Reset);
        assert_eq!(parse("deck tshirt"), Command::Deck(Deck::Tshirt));
        assert_eq!(parse("name Ada Lovelace"), Command::Name("Ada Lovelace".to_string()));
        assert_eq!(parse("q"), Command::Quit);
    }

    #[test]
    fn test_parse_peer_commands() {
        assert_eq!(
            parse("peer add bob"),
            Command::Peer {
                name: "bob".to_string(),
                action: PeerAction::Join
            }
        );
        assert_eq!(
            parse("peer vote bob 13"),
            Command::Peer {
                name: "bob".to_string(),
                action: PeerAction::Vote(Vote::Points(13))
            }
        );
        assert_eq!(
            parse("peer leave bob"),
            Command::Peer {
                name: "bob".to_string(),
                action: PeerAction::Leave
            }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Command::parse("   ").unwrap(), None);
        assert!(Command::parse("vote").is_err());
        assert!(Command::parse("deck poker").is_err());
        assert!(Command::parse("name").is_err());
        assert!(Command::parse("peer add").is_err());
        assert!(Command::parse("peer dance bob").is_err());
        assert!(Command::parse("fly").is_err());
    }
}
