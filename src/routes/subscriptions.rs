//! src/routes/subscriptions.rs
use crate::domain::{NewSubscriber, SubscriberEmail};
use crate::registry::{RegistryError, SubscriberRegistry};
use crate::routes::error_chain_fmt;
use crate::telemetry::spawn_blocking_with_tracing;
use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use anyhow::Context;
use uuid::Uuid;

const CONFIRMATION: &str = "Thanks for subscribing! We'll notify you when we launch.";

#[derive(serde::Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(serde::Serialize)]
struct SubscribeResponse<'a> {
    success: bool,
    message: &'a str,
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("Please provide a valid email address")]
    InvalidInput(#[source] anyhow::Error),
    #[error("This email is already subscribed!")]
    AlreadySubscribed,
    #[error("Something went wrong. Please try again.")]
    UnexpectedError(#[source] anyhow::Error),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::InvalidInput(_) | SubscribeError::AlreadySubscribed => {
                StatusCode::BAD_REQUEST
            }
            SubscribeError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(SubscribeResponse {
            success: false,
            message: &self.to_string(),
        })
    }
}

impl From<RegistryError> for SubscribeError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::AlreadySubscribed(_) => SubscribeError::AlreadySubscribed,
            RegistryError::Store(e) => SubscribeError::UnexpectedError(
                anyhow::Error::new(e).context("Failed to store the new subscriber"),
            ),
        }
    }
}

/// Answers unreadable JSON bodies the same way as an invalid address.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    SubscribeError::InvalidInput(anyhow::anyhow!("Failed to parse request body: {}", err)).into()
}

#[tracing::instrument(
    name = "Adding a new subscriber",
    skip(body, registry, request),
    fields(
        request_id = %Uuid::new_v4(),
        subscriber_email = %body.email
    )
)]
pub async fn subscribe(
    body: web::Json<SubscribeRequest>,
    registry: web::Data<SubscriberRegistry>,
    request: HttpRequest,
) -> Result<HttpResponse, SubscribeError> {
    let email = SubscriberEmail::parse(body.into_inner().email)
        .context("Failed to parse subscriber email")
        .map_err(SubscribeError::InvalidInput)?;
    let new_subscriber = NewSubscriber {
        email,
        ip: source_ip(&request),
    };

    let registry = registry.into_inner();
    let subscriber = spawn_blocking_with_tracing(move || registry.subscribe(new_subscriber))
        .await
        .context("Failed to spawn blocking task")
        .map_err(SubscribeError::UnexpectedError)??;

    tracing::info!("New subscriber: {}", subscriber.email);

    Ok(HttpResponse::Ok().json(SubscribeResponse {
        success: true,
        message: CONFIRMATION,
    }))
}

/// Peer address first, then `X-Forwarded-For`, then `"unknown"`.
fn source_ip(request: &HttpRequest) -> String {
    request
        .peer_addr()
        .map(|addr| addr.ip().to_string())
        .or_else(|| {
            request
                .headers()
                .get("X-Forwarded-For")
                .and_then(|value| value.to_str().ok())
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        })
        .unwrap_or_else(|| "unknown".into())
}
