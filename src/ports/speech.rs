use crate::error::Result;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Encoded audio (container included) for the given text.
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>>;
}
