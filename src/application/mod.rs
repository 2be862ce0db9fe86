//! Application layer - Services that use ports.

pub mod composite;
pub mod proxy;
pub mod script;
pub mod speech;
pub mod video;

use std::sync::Arc;

/// Remote backend of a service. `Offline` services answer with their fallback
/// and never touch the network.
pub enum Upstream<T: ?Sized> {
    Live(Arc<T>),
    Offline,
}

impl<T: ?Sized> Clone for Upstream<T> {
    fn clone(&self) -> Self {
        match self {
            Upstream::Live(inner) => Upstream::Live(inner.clone()),
            Upstream::Offline => Upstream::Offline,
        }
    }
}

