//! Persona registry handlers.

use actix_web::{HttpResponse, web};

use pilot_core::domain::PersonaPatch;
use pilot_shared::dto::PersonaCreatedResponse;

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/personas - adds a placeholder persona.
pub async fn create_persona(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let id = state.workspace.lock().await.add_persona().await?;
    tracing::debug!(persona_id = %id, "Persona created");
    Ok(HttpResponse::Created().json(PersonaCreatedResponse { id }))
}

/// PATCH /api/personas/{id}
pub async fn update_persona(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<PersonaPatch>,
) -> AppResult<HttpResponse> {
    state
        .workspace
        .lock()
        .await
        .update_persona(&path.into_inner(), body.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /api/personas/{id}
pub async fn delete_persona(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    let mut workspace = state.workspace.lock().await;
    let known = workspace.settings().personas.get(&id).is_some();
    if !workspace.remove_persona(&id).await? && known {
        return Err(AppError::Conflict(
            "the last remaining persona cannot be removed".to_string(),
        ));
    }
    Ok(HttpResponse::NoContent().finish())
}
