//! API handlers for the signup/signin service.

pub mod error;
pub mod health;
pub mod signin;
pub mod signup;
pub mod types;

pub use self::health::health;
pub use self::signin::signin;
pub use self::signup::signup;

use axum::Json;

// axum handler for root
pub async fn root() -> &'static str {
    "🌱"
}

// axum handler for the OpenAPI document
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(super::openapi())
}
