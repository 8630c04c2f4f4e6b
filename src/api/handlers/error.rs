use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use super::types::ErrorResponse;
use crate::account::{AuthError, ValidationError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flow {
    Signup,
    Signin,
}

impl Flow {
    const fn generic_error(self) -> &'static str {
        match self {
            Self::Signup => "An error occurred during signup",
            Self::Signin => "An error occurred during signin",
        }
    }
}

pub(crate) fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

pub(crate) fn malformed_payload() -> Response {
    error_body(
        StatusCode::BAD_REQUEST,
        ValidationError::MalformedPayload.to_string(),
    )
}

/// Map a flow error to its HTTP response; internal causes are only logged.
pub(crate) fn auth_error_response(flow: Flow, err: AuthError) -> Response {
    match err {
        AuthError::Internal(cause) => {
            error!("{:?} error: {:#}", flow, cause);

            error_body(StatusCode::INTERNAL_SERVER_ERROR, flow.generic_error())
        }
        err => error_body(StatusCode::BAD_REQUEST, err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn business_errors_are_bad_request() {
        let response = auth_error_response(Flow::Signin, AuthError::InvalidPassword);
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = auth_error_response(
            Flow::Signup,
            AuthError::Validation(ValidationError::EmptyField),
        );
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_errors_are_generic() {
        let response = auth_error_response(
            Flow::Signup,
            AuthError::Internal(anyhow!("connection refused")),
        );
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            Flow::Signup.generic_error(),
            "An error occurred during signup"
        );
        assert_eq!(
            Flow::Signin.generic_error(),
            "An error occurred during signin"
        );
    }
}
