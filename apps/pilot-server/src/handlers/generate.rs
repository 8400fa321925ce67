//! Draft generation handler.

use actix_web::{HttpResponse, web};

use pilot_core::domain::Campaign;
use pilot_core::generation::generate_drafts;
use pilot_core::planner::CampaignSession;
use pilot_shared::dto::{GenerateRequest, GenerateResponse};

use super::convert::draft_dto;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/generate
///
/// Returns drafts only; approve them through `POST /api/posts/batch`.
/// At most one generation runs at a time.
pub async fn generate(
    state: web::Data<AppState>,
    body: web::Json<GenerateRequest>,
) -> AppResult<HttpResponse> {
    let Some(_guard) = state.begin_generation() else {
        return Err(AppError::Conflict(
            "a generation request is already in progress".to_string(),
        ));
    };

    let req = body.into_inner();
    let session = CampaignSession::from_campaigns(
        req.campaigns
            .into_iter()
            .map(|c| Campaign::new(c.instruction, c.persona_id)),
    );

    // The store lock is released before the backend call.
    let request = state
        .workspace
        .lock()
        .await
        .generation_request(&session, &req.pillars);

    tracing::info!(
        campaigns = session.entries().len(),
        pillars = req.pillars.len(),
        engine = ?request.settings.ai_engine,
        "Generating drafts"
    );

    let drafts = generate_drafts(state.generator.as_ref(), &request, req.simulate_media).await?;

    Ok(HttpResponse::Ok().json(GenerateResponse {
        drafts: drafts.into_iter().map(draft_dto).collect(),
    }))
}
