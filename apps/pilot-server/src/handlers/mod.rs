//! HTTP handlers and route configuration.

mod convert;
mod generate;
mod health;
mod personas;
mod posts;
mod settings;

#[cfg(test)]
mod tests;

use actix_web::web;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(|err, _req| {
                AppError::BadRequest(err.to_string()).into()
            }))
            .route("/health", web::get().to(health::health_check))
            // Static post routes are registered before the `{id}` ones.
            .service(
                web::scope("/posts")
                    .route("", web::get().to(posts::list_posts))
                    .route("/queue", web::get().to(posts::queue))
                    .route("/queue/order", web::put().to(posts::reorder_queue))
                    .route("/history", web::get().to(posts::history))
                    .route("/stats", web::get().to(posts::stats))
                    .route("/batch", web::post().to(posts::approve_batch))
                    .route("/{id}/status", web::put().to(posts::update_status))
                    .route("/{id}/schedule", web::put().to(posts::update_schedule))
                    .route("/{id}", web::delete().to(posts::delete_post)),
            )
            .service(
                web::scope("/settings")
                    .route("", web::get().to(settings::get_settings))
                    .route("", web::put().to(settings::replace_settings))
                    .route("/pillars", web::post().to(settings::add_pillar))
                    .route("/pillars/{name}", web::delete().to(settings::remove_pillar))
                    .route("/topics", web::post().to(settings::add_topic))
                    .route("/topics/{topic}", web::delete().to(settings::remove_topic)),
            )
            .service(
                web::scope("/personas")
                    .route("", web::post().to(personas::create_persona))
                    .route("/{id}", web::patch().to(personas::update_persona))
                    .route("/{id}", web::delete().to(personas::delete_persona)),
            )
            .route("/generate", web::post().to(generate::generate)),
    );
}
