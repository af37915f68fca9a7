//! Core application modules
//!
//! This module contains configuration, constants, logging, credentials and
//! the HTTP clients shared by the probes.

pub mod auth;
pub mod client;
pub mod config;
pub mod constants;
pub mod logging;
pub mod services;
