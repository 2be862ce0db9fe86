//! Ports - Trait definitions for everything outside the process.

pub mod media;
pub mod script;
pub mod source;
pub mod speech;
pub mod video;
