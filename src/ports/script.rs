use crate::error::Result;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScriptWriter: Send + Sync {
    /// Send a prompt to the text model and return the generated text.
    async fn write_script(&self, prompt: &str) -> Result<String>;
}
