//! Settings handlers - brand profile, pillar catalog and topics.

use actix_web::{HttpResponse, web};

use pilot_core::domain::Settings;
use pilot_shared::dto::{AddPillarRequest, AddTopicRequest};

use crate::middleware::error::AppResult;
use crate::state::AppState;

const KEY_MASK: &str = "****";

/// Settings as sent to clients: the BYOK key is masked.
fn redacted(settings: &Settings) -> Settings {
    let mut out = settings.clone();
    out.open_router_key = settings.byok_key().map(mask_key);
    out
}

/// `****` followed by the last four characters of keys longer than eight.
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return KEY_MASK.to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{KEY_MASK}{tail}")
}

/// GET /api/settings
pub async fn get_settings(state: web::Data<AppState>) -> HttpResponse {
    let workspace = state.workspace.lock().await;
    HttpResponse::Ok().json(redacted(workspace.settings()))
}

/// PUT /api/settings
///
/// Sending back the masked key keeps the stored one.
pub async fn replace_settings(
    state: web::Data<AppState>,
    body: web::Json<Settings>,
) -> AppResult<HttpResponse> {
    let mut settings = body.into_inner();
    let mut workspace = state.workspace.lock().await;

    if let Some(current) = workspace.settings().byok_key() {
        let masked = settings.open_router_key.as_deref() == Some(mask_key(current).as_str());
        if masked {
            settings.open_router_key = Some(current.to_string());
        }
    }

    workspace.replace_settings(settings).await?;
    tracing::debug!(brand = %workspace.settings().brand_name, "Settings replaced");
    Ok(HttpResponse::Ok().json(redacted(workspace.settings())))
}

/// POST /api/settings/pillars
pub async fn add_pillar(
    state: web::Data<AppState>,
    body: web::Json<AddPillarRequest>,
) -> AppResult<HttpResponse> {
    let mut workspace = state.workspace.lock().await;
    workspace.add_pillar(&body.name, &body.description).await?;
    Ok(HttpResponse::Created().json(&workspace.settings().content_pillars))
}

/// DELETE /api/settings/pillars/{name}
pub async fn remove_pillar(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    state
        .workspace
        .lock()
        .await
        .remove_pillar(&path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// POST /api/settings/topics
pub async fn add_topic(
    state: web::Data<AppState>,
    body: web::Json<AddTopicRequest>,
) -> AppResult<HttpResponse> {
    let mut workspace = state.workspace.lock().await;
    workspace.add_topic(body.topic.trim()).await?;
    Ok(HttpResponse::Ok().json(&workspace.settings().topics))
}

/// DELETE /api/settings/topics/{topic}
pub async fn remove_topic(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    state
        .workspace
        .lock()
        .await
        .remove_topic(&path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_key_keeps_only_a_short_tail() {
        assert_eq!(mask_key("sk-or-v1-abcdef123456"), "****3456");
        assert_eq!(mask_key("short"), "****");
    }

    #[test]
    fn test_blank_key_is_not_masked() {
        let mut settings = Settings::default();
        settings.open_router_key = Some("   ".to_string());
        assert_eq!(redacted(&settings).open_router_key, None);
    }
}
