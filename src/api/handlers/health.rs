use axum::{
    body::Body,
    extract::Extension,
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::{GIT_COMMIT_HASH, account::AuthState};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    commit: String,
    name: String,
    version: String,
    database: String,
}

#[utoipa::path(
    get,
    path= "/health",
    responses (
        (status = 200, description = "Account store is healthy", body = Health),
        (status = 503, description = "Account store is unhealthy", body = Health)
    ),
    tag= "health"
)]
// axum handler for health
pub async fn health(method: Method, auth: Extension<Arc<AuthState>>) -> impl IntoResponse {
    let result = match tokio::time::timeout(auth.store_timeout(), auth.store().ping()).await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => {
            error!("Account store ping failed: {:#}", err);

            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
        Err(_) => {
            error!("Account store ping timed out");

            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    };

    let health = Health {
        commit: GIT_COMMIT_HASH.to_string(),
        name: env!("CARGO_PKG_NAME").to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: if result.is_ok() {
            "ok".to_string()
        } else {
            "error".to_string()
        },
    };

    let body = if method == Method::GET {
        Json(&health).into_response()
    } else {
        Body::empty().into_response()
    };

    let short_hash = if health.commit.len() > 7 {
        health.commit.get(0..7).unwrap_or_default()
    } else {
        ""
    };

    let headers = format!("{}:{}:{}", health.name, health.version, short_hash)
        .parse::<HeaderValue>()
        .map(|x_app_header_value| {
            debug!("X-App header: {:?}", x_app_header_value);

            let mut headers = HeaderMap::new();

            headers.insert("X-App", x_app_header_value);

            headers
        })
        .map_err(|err| {
            error!("Failed to parse X-App header: {}", err);
        });

    let headers = headers.unwrap_or_else(|()| HeaderMap::new());

    match result {
        Ok(()) => {
            debug!("Account store is healthy");
            (StatusCode::OK, headers, body)
        }
        Err(status) => {
            debug!("Account store is unhealthy");
            (status, headers, body)
        }
    }
}
