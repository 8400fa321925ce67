//! Post store handlers.

use actix_web::{HttpResponse, web};
use chrono::DateTime;

use pilot_core::domain::PostStatus;
use pilot_shared::dto::{
    ApproveBatchRequest, ReorderQueueRequest, StatsCounts, StatsResponse, UpdateScheduleRequest,
    UpdateStatusRequest,
};

use super::convert::{draft_from_dto, post_responses};
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Number of approved posts shown on the dashboard.
const UPCOMING_LIMIT: usize = 3;

/// GET /api/posts
pub async fn list_posts(state: web::Data<AppState>) -> HttpResponse {
    let workspace = state.workspace.lock().await;
    HttpResponse::Ok().json(post_responses(workspace.posts().posts()))
}

/// GET /api/posts/queue
pub async fn queue(state: web::Data<AppState>) -> HttpResponse {
    let workspace = state.workspace.lock().await;
    HttpResponse::Ok().json(post_responses(workspace.posts().queue()))
}

/// GET /api/posts/history
pub async fn history(state: web::Data<AppState>) -> HttpResponse {
    let workspace = state.workspace.lock().await;
    HttpResponse::Ok().json(post_responses(workspace.posts().history()))
}

/// GET /api/posts/stats
pub async fn stats(state: web::Data<AppState>) -> HttpResponse {
    let workspace = state.workspace.lock().await;
    let stats = workspace.posts().stats();
    HttpResponse::Ok().json(StatsResponse {
        counts: StatsCounts {
            drafts: stats.drafts,
            approved: stats.approved,
            posted: stats.posted,
        },
        posts_per_day: workspace.settings().posts_per_day(),
        upcoming: post_responses(workspace.posts().upcoming(UPCOMING_LIMIT)),
    })
}

/// POST /api/posts/batch
pub async fn approve_batch(
    state: web::Data<AppState>,
    body: web::Json<ApproveBatchRequest>,
) -> AppResult<HttpResponse> {
    let drafts = body
        .into_inner()
        .drafts
        .into_iter()
        .map(draft_from_dto)
        .collect::<Result<Vec<_>, _>>()?;

    let created = state.workspace.lock().await.approve_drafts(drafts).await?;
    Ok(HttpResponse::Created().json(post_responses(&created)))
}

/// PUT /api/posts/{id}/status
pub async fn update_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateStatusRequest>,
) -> AppResult<HttpResponse> {
    let status: PostStatus = body.status.parse()?;
    state
        .workspace
        .lock()
        .await
        .set_status(&path.into_inner(), status)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// PUT /api/posts/{id}/schedule
pub async fn update_schedule(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateScheduleRequest>,
) -> AppResult<HttpResponse> {
    let scheduled_for = DateTime::from_timestamp_millis(body.scheduled_for)
        .ok_or_else(|| AppError::BadRequest("scheduledFor is out of range".to_string()))?;
    state
        .workspace
        .lock()
        .await
        .set_schedule(&path.into_inner(), scheduled_for)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// DELETE /api/posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    state
        .workspace
        .lock()
        .await
        .remove_post(&path.into_inner())
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// PUT /api/posts/queue/order
pub async fn reorder_queue(
    state: web::Data<AppState>,
    body: web::Json<ReorderQueueRequest>,
) -> AppResult<HttpResponse> {
    let mut workspace = state.workspace.lock().await;
    if !workspace.reorder_queue(&body.ids).await? {
        return Err(AppError::BadRequest(
            "ids must list every queued post exactly once".to_string(),
        ));
    }
    Ok(HttpResponse::Ok().json(post_responses(workspace.posts().queue())))
}
