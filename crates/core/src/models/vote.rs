//! Vote values

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single estimate.
///
/// Numeric cards travel as JSON numbers, everything else (T-shirt sizes,
/// `?`) as strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Vote {
    Points(u32),
    Label(String),
}

impl Vote {
    /// Parse user input: integers become points, anything else a label
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        if input.is_empty() {
            return None;
        }
        Some(match input.parse::<u32>() {
            Ok(points) => Vote::Points(points),
            Err(_) => Vote::Label(input.to_string()),
        })
    }

    pub fn label(value: impl Into<String>) -> Self {
        Vote::Label(value.into())
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vote::Points(points) => write!(f, "{points}"),
            Vote::Label(label) => f.write_str(label),
        }
    }
}
