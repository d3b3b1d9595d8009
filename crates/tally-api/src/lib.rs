//! Tally API Library
//!
//! This crate provides the HTTP handlers, error mapping, and application setup
//! for the receipt extraction service.

pub mod constants;
mod handlers;
pub mod setup;
mod telemetry;
mod utils;

pub mod error;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
