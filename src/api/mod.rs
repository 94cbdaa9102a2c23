//! FANBOX API module.
//!
//! This module provides:
//! - Browser session reuse and the `Session` seam
//! - API client for the creator listing and post detail endpoints
//! - API payload types

pub mod client;
pub mod session;
pub mod types;

pub use client::FanboxApi;
pub use session::{CookieSession, Session, SessionToken};
pub use types::*;
