use serde::{Deserialize, Serialize};

/// Labels for the three gods, aligned to target indices 0..2.
pub const GOD_LABELS: [char; 3] = ['A', 'B', 'C'];

/// The player's working assignment for one god.
///
/// Serialized as the literal strings the game server expects
/// ("Unsure" | "True" | "False" | "Random").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Guess {
    Unsure,
    True,
    False,
    Random,
}

impl Guess {
    pub const ALL: [Guess; 4] = [Guess::Unsure, Guess::True, Guess::False, Guess::Random];

    pub fn label(&self) -> &'static str {
        match self {
            Guess::Unsure => "Unsure",
            Guess::True => "True",
            Guess::False => "False",
            Guess::Random => "Random",
        }
    }
}

/// A god's ground-truth role, revealed only at resolution or in a replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Identity {
    True,
    False,
    Random,
}

impl Identity {
    pub fn label(&self) -> &'static str {
        match self {
            Identity::True => "True",
            Identity::False => "False",
            Identity::Random => "Random",
        }
    }
}

impl Guess {
    /// Whether this guess names the given revealed identity.
    pub fn matches(&self, identity: Identity) -> bool {
        matches!(
            (self, identity),
            (Guess::True, Identity::True)
                | (Guess::False, Identity::False)
                | (Guess::Random, Identity::Random)
        )
    }
}
