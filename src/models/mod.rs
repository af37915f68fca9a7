//! API data models
//!
//! This module contains data structures for the Gemini API and the local
//! interview service.

pub mod gemini;
pub mod interview;
