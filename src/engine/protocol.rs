use crate::engine::api::{GameDetail, GameHistoryItem};
use crate::model::guess::Guess;
use crate::model::session::{Move, SessionState};

/// Everything the UI may ask the engine to do.
pub enum EngineCommand {
    /// Point the engine at a (possibly different) server. Discards any live
    /// session.
    Configure { base_url: String, token: Option<String> },
    StartSession,
    SelectTarget(Option<usize>),
    SetGuess { target: usize, guess: Guess },
    /// `target` carries an inline `@<label>` resolution from the question
    /// text; it overrides (and persists as) the current selection.
    Ask { target: Option<usize>, question: String },
    Submit { confirmed: bool },
    PlayAgain,
    LoadHistory { limit: u32, offset: u32 },
    LoadDetail { session_id: i64 },
}

/// Everything the engine reports back. Session updates always carry the full
/// state; the UI renders it and owns nothing.
pub enum EngineResponse {
    SessionUpdated(SessionState),
    /// Guesses are still unresolved; the UI must ask the player to confirm
    /// before re-sending `Submit { confirmed: true }`.
    ConfirmSubmit,
    HistoryLoaded(Vec<GameHistoryItem>),
    ReplayLoaded { detail: GameDetail, timeline: Vec<Move> },
    ServiceFailure { context: &'static str, message: String },
    /// A 401 from any endpoint: the token is stale, re-authentication is the
    /// caller's problem.
    AuthExpired,
}
