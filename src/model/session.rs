use serde::{Deserialize, Serialize};

use crate::model::guess::{Guess, Identity};

/// Questions granted per session. The server owns the real counter; the
/// client only mirrors the value returned with each answer.
pub const QUESTION_BUDGET: u8 = 3;

/// Lifecycle of one play-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Starting,
    Active,
    Submitting,
    Resolved,
}

/// One question/answer exchange, as mirrored from the server's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub round: u32,
    pub target_index: usize,
    pub question: String,
    pub answer: String,
    pub is_masked: bool,
}

/// How the gods' fictional language encodes yes and no. Flavor only,
/// revealed at game end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageMap {
    #[serde(rename = "Yes")]
    pub yes: String,
    #[serde(rename = "No")]
    pub no: String,
}

/// Terminal resolution returned by the server after guesses are submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub win: bool,
    pub identities: [Identity; 3],
    pub language_map: LanguageMap,
}

/// The live session, owned exclusively by the session controller.
/// The UI only ever sees clones of this.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub phase: Phase,
    pub session_id: Option<i64>,
    /// Opening message from the server, shown at the top of the dialogue.
    pub greeting: Option<String>,
    pub selected_target: Option<usize>,
    pub guesses: [Guess; 3],
    pub history: Vec<Move>,
    pub questions_left: u8,
    pub result: Option<GameResult>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: Phase::Uninitialized,
            session_id: None,
            greeting: None,
            selected_target: None,
            guesses: [Guess::Unsure; 3],
            history: Vec::new(),
            questions_left: QUESTION_BUDGET,
            result: None,
        }
    }
}
