use super::handlers::{
    health::{self, __path_health},
    signin::__path_signin,
    signup::__path_signup,
    types,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(health, signup, signin),
    components(schemas(
        health::Health,
        types::SignupRequest,
        types::SigninRequest,
        types::AuthResponse,
        types::UserResponse,
        types::ErrorResponse
    )),
    tags(
        (name = "auth", description = "Account signup and signin"),
        (name = "health", description = "Service health")
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}
