use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::guess::Guess;
use crate::model::session::{GameResult, LanguageMap, Move};

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Every failure from the game service is normalized here, so callers never
/// inspect response bodies themselves.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    #[error("network error: {0}")]
    Network(String),

    #[error("session expired")]
    Unauthorized,

    #[error("{detail}")]
    Api { status: u16, detail: String },

    #[error("malformed server response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        ServiceError::Network(err.to_string())
    }
}

/* =========================
   Wire types
   ========================= */

#[derive(Debug, Clone, Deserialize)]
pub struct StartResponse {
    pub session_id: i64,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub questions_left: u8,
    pub history: Vec<MoveRecord>,
}

/// One history entry as the server records it. Older sessions predate the
/// explicit mask flag, hence the option.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoveRecord {
    pub round: u32,
    pub god_index: usize,
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_masked: Option<bool>,
}

/// The sentinel the server uses for invalid/unanswerable rounds.
pub const MASKED_ANSWER: &str = "Unknown";

impl MoveRecord {
    /// The explicit server flag wins when present; the textual sentinel is
    /// only a fallback, so a literal "Unknown" answer flagged as genuine is
    /// not misclassified.
    pub fn masked(&self) -> bool {
        self.is_masked.unwrap_or(self.answer == MASKED_ANSWER)
    }
}

impl From<&MoveRecord> for Move {
    fn from(rec: &MoveRecord) -> Self {
        Move {
            round: rec.round,
            target_index: rec.god_index,
            question: rec.question.clone(),
            answer: rec.answer.clone(),
            is_masked: rec.masked(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameHistoryItem {
    pub id: i64,
    pub date: String,
    pub win: bool,
    pub completed: bool,
    pub questions_asked: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameDetail {
    pub id: i64,
    pub date: String,
    pub win: bool,
    pub completed: bool,
    pub god_identities: [crate::model::guess::Identity; 3],
    pub language_map: LanguageMap,
    pub move_history: Vec<MoveRecord>,
    /// Null when the session was abandoned before submission.
    pub user_guesses: Option<[Guess; 3]>,
}

#[derive(Serialize)]
struct AskRequest<'a> {
    session_id: i64,
    god_index: usize,
    question: &'a str,
}

#[derive(Serialize)]
struct SubmitRequest<'a> {
    session_id: i64,
    guesses: &'a [Guess; 3],
}

/* =========================
   Service trait + HTTP impl
   ========================= */

/// The game server's surface, as the rest of the engine sees it.
pub trait GameService {
    fn start_session(&self) -> Result<StartResponse>;
    fn ask_question(&self, session_id: i64, god_index: usize, question: &str)
        -> Result<AskResponse>;
    fn submit_guesses(&self, session_id: i64, guesses: &[Guess; 3]) -> Result<GameResult>;
    fn fetch_history(&self, limit: u32, offset: u32) -> Result<Vec<GameHistoryItem>>;
    fn fetch_detail(&self, session_id: i64) -> Result<GameDetail>;
}

pub struct HttpGameService {
    client: reqwest::blocking::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpGameService {
    pub fn new(base_url: &str, token: Option<String>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.trim().is_empty()),
        }
    }

    fn request(&self, req: reqwest::blocking::RequestBuilder) -> Result<reqwest::blocking::Response> {
        let req = match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        };

        let resp = req.send()?;
        let status = resp.status();

        if status.as_u16() == 401 {
            return Err(ServiceError::Unauthorized);
        }

        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(ServiceError::Api {
                status: status.as_u16(),
                detail: extract_detail(&body),
            });
        }

        Ok(resp)
    }

    fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str, query: &[(&str, u32)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "GET");
        let resp = self.request(self.client.get(&url).query(query))?;
        decode(resp)
    }

    fn post_json<B: Serialize, T: serde::de::DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "POST");
        let resp = self.request(self.client.post(&url).json(body))?;
        decode(resp)
    }
}

fn decode<T: serde::de::DeserializeOwned>(resp: reqwest::blocking::Response) -> Result<T> {
    let body = resp.text()?;
    serde_json::from_str(&body).map_err(|e| ServiceError::Decode(e.to_string()))
}

/// Pull a human-readable message out of an error body. The server sends
/// `{"detail": "..."}`; anything else falls back to the raw text.
fn extract_detail(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(detail) = value.get("detail").and_then(|d| d.as_str()) {
            return detail.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "the server rejected the request".to_string()
    } else {
        trimmed.to_string()
    }
}

impl GameService for HttpGameService {
    fn start_session(&self) -> Result<StartResponse> {
        self.post_json("/game/start", &serde_json::json!({}))
    }

    fn ask_question(&self, session_id: i64, god_index: usize, question: &str)
        -> Result<AskResponse>
    {
        self.post_json("/game/ask", &AskRequest { session_id, god_index, question })
    }

    fn submit_guesses(&self, session_id: i64, guesses: &[Guess; 3]) -> Result<GameResult> {
        self.post_json("/game/submit", &SubmitRequest { session_id, guesses })
    }

    fn fetch_history(&self, limit: u32, offset: u32) -> Result<Vec<GameHistoryItem>> {
        self.get_json("/history", &[("limit", limit), ("offset", offset)])
    }

    fn fetch_detail(&self, session_id: i64) -> Result<GameDetail> {
        self.get_json(&format!("/history/{session_id}"), &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detail_extracted_from_json_body() {
        assert_eq!(
            extract_detail(r#"{"detail": "Session already resolved"}"#),
            "Session already resolved"
        );
    }

    #[test]
    fn detail_falls_back_to_raw_body() {
        assert_eq!(extract_detail("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn detail_falls_back_to_generic_message_on_empty_body() {
        assert_eq!(extract_detail("  "), "the server rejected the request");
    }

    #[test]
    fn move_record_masking_prefers_explicit_flag() {
        let mut rec = MoveRecord {
            round: 1,
            god_index: 0,
            question: "q".into(),
            answer: MASKED_ANSWER.into(),
            is_masked: Some(false),
        };
        assert!(!rec.masked());

        rec.is_masked = None;
        assert!(rec.masked());

        rec.answer = "Yes".into();
        assert!(!rec.masked());
    }

    #[test]
    fn guesses_serialize_as_server_literals() {
        let guesses = [Guess::True, Guess::Unsure, Guess::Random];
        let json = serde_json::to_string(&guesses).unwrap();
        assert_eq!(json, r#"["True","Unsure","Random"]"#);
    }

    #[test]
    fn ask_response_decodes_without_mask_flag() {
        let json = r#"{
            "answer": "Ja",
            "questions_left": 2,
            "history": [
                {"round": 1, "god_index": 0, "question": "Are you True?", "answer": "Ja"}
            ]
        }"#;
        let resp: AskResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.questions_left, 2);
        assert!(!resp.history[0].masked());
    }
}
