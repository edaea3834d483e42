//! OpenAPI document served at `/docs`.

use utoipa::OpenApi;

use super::handlers::{
    auth::{login, session, signup, types},
    contact, health, init_db,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        login::login,
        signup::signup,
        session::me,
        session::logout,
        contact::contact,
        init_db::init_db,
    ),
    components(schemas(
        health::Health,
        types::LoginRequest,
        types::SignupRequest,
        types::ContactRequest,
        types::UserResponse,
        types::AuthResponse,
        types::MessageResponse,
        types::FieldError,
        types::ValidationErrorResponse,
    )),
    tags(
        (name = "auth", description = "Session authentication"),
        (name = "contact", description = "Contact-form relay"),
        (name = "health", description = "Service health"),
        (name = "admin", description = "Operational endpoints")
    )
)]
struct ApiDoc;

#[must_use]
pub fn openapi() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_all_routes() {
        let doc = openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/health",
            "/api/auth/login",
            "/api/auth/signup",
            "/api/auth/me",
            "/api/auth/logout",
            "/api/contact",
            "/api/init-db",
        ] {
            assert!(
                paths.iter().any(|path| path.as_str() == expected),
                "missing path {expected} in {paths:?}"
            );
        }
    }
}
