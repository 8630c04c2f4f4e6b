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
    types::{AuthResponse, ErrorResponse, SigninRequest, UserResponse},
};
use crate::account::AuthState;

#[utoipa::path(
    post,
    path= "/signin",
    request_body = SigninRequest,
    responses (
        (status = 200, description = "Signin successful", body = AuthResponse, content_type = "application/json"),
        (status = 400, description = "Empty field, invalid email, unknown user or wrong password", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse),
    ),
    tag= "auth"
)]
// axum handler for signin
#[instrument(skip(auth, payload))]
pub async fn signin(
    auth: Extension<Arc<AuthState>>,
    payload: Option<Json<SigninRequest>>,
) -> Response {
    let Some(Json(request)) = payload else {
        return malformed_payload();
    };

    debug!("signin: {:?}", request);

    match auth
        .signin(request.email.as_deref(), request.password.as_deref())
        .await
    {
        Ok(account) => (
            StatusCode::OK,
            Json(AuthResponse {
                message: "Signin successful".to_string(),
                user: UserResponse::from(account),
            }),
        )
            .into_response(),
        Err(err) => auth_error_response(Flow::Signin, err),
    }
}
