//! Clients for the remote services the probes talk to

pub mod gemini;
pub mod interview;

pub use gemini::GeminiClient;
pub use interview::InterviewClient;
