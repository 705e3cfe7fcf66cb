//! # SongLike Common Library
//!
//! Shared code for the SongLike service:
//! - Startup error type (configuration, client setup)
//! - TOML bootstrap configuration
//! - API request/response types exchanged with the browser extension

pub mod api;
pub mod config;
pub mod error;

pub use error::{Error, Result};
