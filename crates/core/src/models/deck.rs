//! Card decks

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Vote;

const FIB_POINTS: &[u32] = &[0, 1, 2, 3, 5, 8, 13, 20, 40, 100];
const TSHIRT_SIZES: &[&str] = &["XS", "S", "M", "L", "XL"];

/// The "no idea" card, present in every deck
pub const UNSURE: &str = "?";

/// Set of permissible vote values for a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Deck {
    #[default]
    #[serde(rename = "FIB")]
    Fib,
    #[serde(rename = "TSHIRT")]
    Tshirt,
}

impl Deck {
    /// Wire code used in `SETTINGS` payloads
    pub fn code(&self) -> &'static str {
        match self {
            Deck::Fib => "FIB",
            Deck::Tshirt => "TSHIRT",
        }
    }

    /// Accepts wire codes case-insensitively
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "FIB" => Some(Deck::Fib),
            "TSHIRT" => Some(Deck::Tshirt),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Deck::Fib => "Fibonacci",
            Deck::Tshirt => "T-Shirt",
        }
    }

    /// Cards in display order
    pub fn values(&self) -> Vec<Vote> {
        let mut values: Vec<Vote> = match self {
            Deck::Fib => FIB_POINTS.iter().copied().map(Vote::Points).collect(),
            Deck::Tshirt => TSHIRT_SIZES.iter().map(|s| Vote::label(*s)).collect(),
        };
        values.push(Vote::label(UNSURE));
        values
    }

    pub fn contains(&self, vote: &Vote) -> bool {
        match vote {
            Vote::Points(points) => *self == Deck::Fib && FIB_POINTS.contains(points),
            Vote::Label(label) if label == UNSURE => true,
            Vote::Label(label) => *self == Deck::Tshirt && TSHIRT_SIZES.contains(&label.as_str()),
        }
    }
}

impl fmt::Display for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deck_values() {
        let fib = Deck::Fib.values();
        assert_eq!(fib.len(), 11);
        assert_eq!(fib.first(), Some(&Vote::Points(0)));
        assert_eq!(fib.last(), Some(&Vote::label("?")));

        let tshirt = Deck::Tshirt.values();
        assert_eq!(tshirt.len(), 6);
        assert_eq!(tshirt.first(), Some(&Vote::label("XS")));
    }

    #[test]
    fn test_contains() {
        assert!(Deck::Fib.contains(&Vote::Points(13)));
        assert!(!Deck::Fib.contains(&Vote::Points(4)));
        assert!(!Deck::Fib.contains(&Vote::label("M")));
        assert!(Deck::Tshirt.contains(&Vote::label("M")));
        assert!(Deck::Tshirt.contains(&Vote::label("?")));
        assert!(!Deck::Tshirt.contains(&Vote::Points(3)));
    }

    #[test]
    fn test_codes() {
        assert_eq!(Deck::from_code("tshirt"), Some(Deck::Tshirt));
        assert_eq!(Deck::from_code("FIB"), Some(Deck::Fib));
        assert_eq!(Deck::from_code("POWERS"), None);
        assert_eq!(serde_json::to_value(Deck::Tshirt).unwrap(), "TSHIRT");
    }
}
