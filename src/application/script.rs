use super::Upstream;
use crate::domain::generation::GenerationMode;
use crate::domain::profile::ChildProfile;
use crate::error::Result;
use crate::ports::script::ScriptWriter;
use serde::Serialize;
use tracing::{error, info, warn};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptOutcome {
    pub script: String,
    /// Prompt the console forwards to video generation.
    pub visual_prompt: String,
    /// Label of the behavior band the script was written for.
    pub behavior_label: &'static str,
    pub mode: GenerationMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct ScriptService {
    upstream: Upstream<dyn ScriptWriter>,
}

impl ScriptService {
    pub fn new(upstream: Upstream<dyn ScriptWriter>) -> Self {
        Self { upstream }
    }

    /// Only an invalid profile is an error. Upstream trouble falls back to the
    /// templated script.
    pub async fn generate(&self, profile: &ChildProfile) -> Result<ScriptOutcome> {
        profile.validate()?;
        let visual_prompt = profile.visual_prompt();
        let behavior_label = profile.behavior_band().label();

        let writer = match &self.upstream {
            Upstream::Live(writer) => writer,
            Upstream::Offline => {
                warn!("No API key configured, using mock script");
                return Ok(ScriptOutcome {
                    script: profile.fallback_script(),
                    visual_prompt,
                    behavior_label,
                    mode: GenerationMode::Mock,
                    error: None,
                });
            }
        };

        match writer.write_script(&profile.script_prompt()).await {
            Ok(script) => {
                info!(name = profile.name.as_str(), "Script generated");
                Ok(ScriptOutcome {
                    script,
                    visual_prompt,
                    behavior_label,
                    mode: GenerationMode::Real,
                    error: None,
                })
            }
            Err(e) => {
                error!(error = %e, "Script generation failed");
                Ok(ScriptOutcome {
                    script: format!(
                        "(Error generating script: {}).\n\n{}",
                        e,
                        profile.fallback_script()
                    ),
                    visual_prompt,
                    behavior_label,
                    mode: GenerationMode::MockFallback,
                    error: Some(e.to_string()),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StudioError;
    use crate::ports::script::MockScriptWriter;
    use std::sync::Arc;

    fn profile() -> ChildProfile {
        ChildProfile {
            name: "Noor".into(),
            age: "6".into(),
            behavior: 70,
            gift_suggestion: "a kite".into(),
            ..ChildProfile::default()
        }
    }

    #[tokio::test]
    async fn test_offline_uses_template() {
        let service = ScriptService::new(Upstream::Offline);
        let outcome = service.generate(&profile()).await.unwrap();
        assert_eq!(outcome.mode, GenerationMode::Mock);
        assert_eq!(outcome.script, profile().fallback_script());
        assert!(outcome.visual_prompt.contains("Noor"));
        assert_eq!(outcome.behavior_label, "Good");
    }

    #[tokio::test]
    async fn test_live_returns_model_text() {
        let mut writer = MockScriptWriter::new();
        writer
            .expect_write_script()
            .withf(|prompt| prompt.contains("a child named Noor"))
            .times(1)
            .returning(|_| Ok("Ho ho ho, Noor!".to_string()));

        let service = ScriptService::new(Upstream::Live(Arc::new(writer)));
        let outcome = service.generate(&profile()).await.unwrap();
        assert_eq!(outcome.mode, GenerationMode::Real);
        assert_eq!(outcome.script, "Ho ho ho, Noor!");
        assert!(outcome.error.is_none());
    }

    #[tokio::test]
    async fn test_live_failure_prefixes_fallback() {
        let mut writer = MockScriptWriter::new();
        writer.expect_write_script().returning(|_| {
            Err(StudioError::UpstreamRejected {
                status: 500,
                body: "overloaded".into(),
            })
        });

        let service = ScriptService::new(Upstream::Live(Arc::new(writer)));
        let outcome = service.generate(&profile()).await.unwrap();
        assert_eq!(outcome.mode, GenerationMode::MockFallback);
        assert!(outcome
            .script
            .starts_with("(Error generating script: API Error: 500 - overloaded).\n\nHo Ho Ho!"));
        assert_eq!(outcome.error.as_deref(), Some("API Error: 500 - overloaded"));
    }

    #[tokio::test]
    async fn test_invalid_profile_is_rejected_before_any_call() {
        let mut writer = MockScriptWriter::new();
        writer.expect_write_script().never();

        let service = ScriptService::new(Upstream::Live(Arc::new(writer)));
        let err = service.generate(&ChildProfile::default()).await.unwrap_err();
        assert!(matches!(err, StudioError::Validation(_)));
    }
}
