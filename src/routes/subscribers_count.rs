//! src/routes/subscribers_count.rs
use crate::registry::SubscriberRegistry;
use crate::routes::error_chain_fmt;
use crate::telemetry::spawn_blocking_with_tracing;
use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;

#[derive(thiserror::Error)]
pub enum CountError {
    #[error("Failed to get subscriber count")]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for CountError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for CountError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}

#[tracing::instrument(name = "Counting subscribers", skip(registry))]
pub async fn subscribers_count(
    registry: web::Data<SubscriberRegistry>,
) -> Result<HttpResponse, CountError> {
    let registry = registry.into_inner();
    let count = spawn_blocking_with_tracing(move || registry.count())
        .await
        .context("Failed to spawn blocking task")?
        .context("Failed to read the subscriber registry")?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "count": count })))
}
