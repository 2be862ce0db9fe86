use super::error::ApiError;
use super::extract::ApiJson;
use super::state::AppState;
use crate::application::script::ScriptOutcome;
use crate::domain::profile::ChildProfile;
use axum::{extract::State, Json};
use tracing::info;

pub async fn generate_script(
    State(state): State<AppState>,
    ApiJson(profile): ApiJson<ChildProfile>,
) -> Result<Json<ScriptOutcome>, ApiError> {
    info!(
        name = profile.name.as_str(),
        behavior = profile.behavior,
        "Received script request"
    );
    let outcome = state.script.generate(&profile).await?;
    Ok(Json(outcome))
}
