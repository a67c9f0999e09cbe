use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::get_user::get_user;
use super::handlers::home::home;
use super::handlers::login::login;
use super::handlers::register::register;
use super::middleware::require_bearer_token;
use crate::domain::user::ports::UserServicePort;

/// Process-wide state shared by every handler. Read-only after start-up.
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub authenticator: Arc<Authenticator>,
}

pub fn create_router(
    user_service: Arc<dyn UserServicePort>,
    authenticator: Arc<Authenticator>,
) -> Router {
    let state = AppState {
        user_service,
        authenticator,
    };

    let public_routes = Router::new()
        .route("/", get(home))
        .route("/auth/register", post(register))
        .route("/auth/user", post(login));

    let protected_routes = Router::new()
        .route("/user/:id", get(get_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_bearer_token,
        ));

    // Headers are left out of the span: they carry bearer tokens.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use tower::ServiceExt;

    use super::*;
    use crate::domain::user::models::LoginCommand;
    use crate::domain::user::models::RegisterUserCommand;
    use crate::domain::user::models::UserId;
    use crate::domain::user::models::UserProfile;
    use crate::user::errors::UserError;

    /// Service that must never be reached by the requests under test.
    struct UnreachableUserService;

    #[async_trait::async_trait]
    impl UserServicePort for UnreachableUserService {
        async fn register(&self, _command: RegisterUserCommand) -> Result<UserProfile, UserError> {
            Err(UserError::Internal("register reached".to_string()))
        }

        async fn login(&self, _command: LoginCommand) -> Result<String, UserError> {
            Err(UserError::Internal("login reached".to_string()))
        }

        async fn get_user(&self, _id: &UserId) -> Result<UserProfile, UserError> {
            Err(UserError::Internal("get_user reached".to_string()))
        }
    }

    fn router() -> Router {
        create_router(
            Arc::new(UnreachableUserService),
            Arc::new(Authenticator::new(
                b"test-secret-key-for-jwt-signing-at-least-32-bytes",
            )),
        )
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_home() {
        let response = router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["message"], "Hello Dev!");
    }

    #[tokio::test]
    async fn test_register_validation_never_reaches_service() {
        let request = Request::builder()
            .method("POST")
            .uri("/auth/register")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"name":"Ana","email":"ana@x.com"}"#))
            .unwrap();

        let response = router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body_json(response).await["message"],
            "The password is required"
        );
    }

    #[tokio::test]
    async fn test_malformed_json_is_unprocessable() {
        let request = Request::builder()
            .method("POST")
            .uri("/auth/user")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_json(response).await["message"], "Invalid request body");
    }

    #[tokio::test]
    async fn test_protected_route_requires_token() {
        let response = router()
            .oneshot(
                Request::builder()
                    .uri(format!("/user/{}", UserId::new()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
