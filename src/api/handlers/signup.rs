use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, instrument};

use super::{
    error::{Flow, auth_error_response, malformed_payload},
    types::{AuthResponse, ErrorResponse, SignupRequest, UserResponse},
};
use crate::account::AuthState;

#[utoipa::path(
    post,
    path= "/signup",
    request_body = SignupRequest,
    responses (
        (status = 201, description = "Signup successful", body = AuthResponse, content_type = "application/json"),
        (status = 400, description = "Empty field, invalid email, weak password or email already registered", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse),
    ),
    tag= "auth"
)]
// axum handler for signup
#[instrument(skip(auth, payload))]
pub async fn signup(
    auth: Extension<Arc<AuthState>>,
    payload: Option<Json<SignupRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return malformed_payload();
    };

    debug!("signup: {:?}", request);

    match auth
        .signup(
            request.name.as_deref(),
            request.password.as_deref(),
            request.email.as_deref(),
        )
        .await
    {
        Ok(account) => (
            StatusCode::CREATED,
            Json(AuthResponse {
                message: "Signup successful".to_string(),
                user: UserResponse::from(account),
            }),
        )
            .into_response(),
        Err(err) => auth_error_response(Flow::Signup, err),
    }
}
