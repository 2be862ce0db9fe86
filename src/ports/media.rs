use async_trait::async_trait;
use std::ffi::OsString;
use std::io;
use std::process::Output;

/// The external encoder and its prober, invoked with a prepared argument list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaEngine: Send + Sync {
    /// Run the encoder to completion.
    async fn encode(&self, args: Vec<OsString>) -> io::Result<Output>;

    /// Run the prober to completion.
    async fn probe(&self, args: Vec<OsString>) -> io::Result<Output>;
}

#[async_trait]
impl<T: MediaEngine + ?Sized> MediaEngine for std::sync::Arc<T> {
    async fn encode(&self, args: Vec<OsString>) -> io::Result<Output> {
        (**self).encode(args).await
    }

    async fn probe(&self, args: Vec<OsString>) -> io::Result<Output> {
        (**self).probe(args).await
    }
}
