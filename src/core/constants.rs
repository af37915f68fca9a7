//! Fixed prompts and report markers shared by the probes

/// Gemini endpoint methods
pub mod method {
    /// Non-streaming content generation
    pub const GENERATE_CONTENT: &str = "generateContent";
}

/// Prompt texts
pub mod prompt {
    /// Minimal prompt sent by the key tester
    pub const KEY_CHECK: &str = "Say 'OK'";

    /// Health ping prompt
    pub const PING: &str = "Ping. Reply with 'Pong' if you are alive.";

    /// Output token cap for the health ping
    pub const PING_MAX_TOKENS: u32 = 10;
}

/// Interview request types
pub mod interview {
    pub const CHAT: &str = "chat";
    pub const VALIDATE: &str = "validate";

    /// Placeholder question sent with every chat scenario
    pub const CURRENT_QUESTION: &str = "Previous question context if any";
}

/// Health report status values
pub mod status {
    pub const OK: &str = "ok";
    pub const ERROR: &str = "error";
}
