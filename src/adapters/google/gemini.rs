use super::rpc::{GenerateContentRequest, GenerateContentResponse};
use super::GoogleClient;
use crate::error::{Result, StudioError};
use crate::ports::script::ScriptWriter;
use async_trait::async_trait;
use tracing::info;

#[async_trait]
impl ScriptWriter for GoogleClient {
    async fn write_script(&self, prompt: &str) -> Result<String> {
        info!(model = self.script_model.as_str(), "Contacting script model");

        let url = self.model_url(&self.script_model, "generateContent");
        let response: GenerateContentResponse = self
            .post_json(
                &url,
                &GenerateContentRequest::from_prompt(prompt),
                Some(self.script_timeout),
            )
            .await?;

        response
            .into_first_text()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| StudioError::MalformedResponse("no candidate text".to_string()))
    }
}
