//! src/routes/health_check.rs
use actix_web::HttpResponse;
use chrono::{DateTime, Utc};

#[derive(serde::Serialize)]
struct Health {
    status: &'static str,
    timestamp: DateTime<Utc>,
}

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(Health {
        status: "ok",
        timestamp: Utc::now(),
    })
}
