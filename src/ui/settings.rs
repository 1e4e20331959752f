use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone)]
pub struct UiSettings {
    pub ui_scale: f32,

    /// Base URL of the game server.
    pub server_url: String,

    /// Bearer token obtained out-of-band (login is not this client's job).
    pub token: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            ui_scale: 1.0,
            server_url: "http://localhost:8000".into(),
            token: String::new(),
        }
    }
}

impl UiSettings {
    pub fn token_opt(&self) -> Option<String> {
        let token = self.token.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }
}
