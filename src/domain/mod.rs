//! Domain layer - Pure business logic.

pub mod av;
pub mod generation;
pub mod profile;
