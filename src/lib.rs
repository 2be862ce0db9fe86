//! Santa Studio - backend of the wishing console.
//!
//! Hexagonal Architecture:
//! - domain/: Pure business logic (profile, generation polling, av compositing)
//! - ports/: Trait definitions for everything outside the process
//! - adapters/: Google APIs, ffmpeg, HTTP media fetches and the HTTP server
//! - application/: Services combining ports with their offline fallbacks
//! - config: Environment configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;

pub use config::AppConfig;
pub use domain::av;
pub use error::{Result, StudioError};
