//! pomocoach — AI coaching orchestration service
//!
//! Turns pomodoro session statistics into structured, typed coaching
//! artifacts via an external generative model:
//!
//! - **context**: collaborator traits + per-request data assembly
//! - **prompt**: deterministic prompt construction per artifact type
//! - **gateway**: the single outbound model call, with failure taxonomy
//! - **parser**: JSON extraction + strict per-artifact schema validation
//! - **coach**: the orchestration façade and feedback recording
//! - **http**: the client-facing axum API

pub mod coach;
pub mod config;
pub mod context;
pub mod errors;
pub mod gateway;
pub mod http;
pub mod parser;
pub mod prompt;
pub mod types;

// Re-export commonly used types
pub use errors::{CoachError, Result};
