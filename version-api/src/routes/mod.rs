use crate::services::version::VersionService;
use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub(crate) mod health;
pub(crate) mod version;

#[derive(Clone)]
pub struct Services {
    pub version: Arc<dyn VersionService>,
}

#[derive(Clone)]
pub struct AppState {
    pub services: Services,
}

/// Build a router for the entire service.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .route("/health", get(health::handler))
                .route("/version", get(version::handler))
                .with_state(state),
        )
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::{MetadataCache, MockMetadataSource},
        resolver::{ResolveError, VersionConfig},
        services::version::{DefaultVersionService, DefaultVersionServiceArgs, MockVersionService},
    };
    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header},
        response::Response,
    };
    use tower::ServiceExt;
    use tracing_test::traced_test;
    use version_api_models::version::VersionInfo;

    fn make_router(service: impl VersionService + 'static) -> Router {
        let state = AppState { services: Services { version: Arc::new(service) } };
        build_router(state)
    }

    fn make_default_service(version: &str, metadata: &'static str) -> DefaultVersionService {
        let mut source = MockMetadataSource::new();
        source.expect_read().returning(move || Ok(Some(metadata.to_string())));
        source.expect_describe().return_const("mock".to_string());
        let config = VersionConfig {
            application_name: "test-app".into(),
            environment: "test".into(),
            version: version.into(),
        };
        DefaultVersionService::new(DefaultVersionServiceArgs { config, metadata: MetadataCache::new(Box::new(source)) })
    }

    async fn send_get(router: Router, uri: &str) -> (StatusCode, Response) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = router.oneshot(request).await.unwrap();
        (response.status(), response)
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
    }

    #[tokio::test]
    async fn health() {
        let router = make_router(MockVersionService::new());
        let (status, response) = send_get(router, "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"OK");
    }

    #[tokio::test]
    async fn health_never_resolves_version() {
        let mut service = MockVersionService::new();
        service.expect_version_info().never();
        let router = make_router(service);
        let (status, response) = send_get(router, "/api/v1/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"OK");
    }

    #[tokio::test]
    async fn version() {
        let router = make_router(make_default_service("1.0.0-test", "git.commit.id.abbrev=abc123"));
        let (status, response) = send_get(router, "/api/v1/version").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).and_then(|value| value.to_str().ok()),
            Some("application/json")
        );

        let version_info: VersionInfo =
            serde_json::from_slice(&body_bytes(response).await).expect("invalid response body");
        assert_eq!(version_info.version, "1.0.0-test");
        assert_eq!(version_info.environment, "test");
        assert_eq!(version_info.commit_hash, "abc123");
        assert_eq!(version_info.application_name, "test-app");
    }

    #[traced_test]
    #[tokio::test]
    async fn version_logs_request() {
        let router = make_router(make_default_service("1.0.0-test", ""));
        let (status, _) = send_get(router, "/api/v1/version").await;
        assert_eq!(status, StatusCode::OK);
        assert!(logs_contain("GET /api/v1/version endpoint called"));
        assert!(logs_contain("Successfully retrieved version information"));
    }

    #[tokio::test]
    async fn version_json_fields() {
        let mut service = MockVersionService::new();
        service.expect_version_info().returning(|| {
            Ok(VersionInfo {
                version: "1.0.0-test".into(),
                environment: "test".into(),
                commit_hash: "abc123".into(),
                commit_time: "2023-12-01T10:00:00Z".into(),
                branch: "main".into(),
                build_time: "2023-12-01T10:00:00Z".into(),
                application_name: "test-app".into(),
            })
        });
        let router = make_router(service);
        let (status, response) = send_get(router, "/api/v1/version").await;
        assert_eq!(status, StatusCode::OK);

        let body: serde_json::Value =
            serde_json::from_slice(&body_bytes(response).await).expect("invalid response body");
        assert_eq!(body["version"], "1.0.0-test");
        assert_eq!(body["environment"], "test");
        assert_eq!(body["commit_hash"], "abc123");
        assert_eq!(body["commit_time"], "2023-12-01T10:00:00Z");
        assert_eq!(body["branch"], "main");
        assert_eq!(body["build_time"], "2023-12-01T10:00:00Z");
        assert_eq!(body["application_name"], "test-app");
    }

    #[tokio::test]
    async fn version_failure() {
        let mut service = MockVersionService::new();
        service.expect_version_info().returning(|| Err(ResolveError::EmptyVersion));
        let router = make_router(service);
        let (status, response) = send_get(router, "/api/v1/version").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn version_failure_from_resolver() {
        let router = make_router(make_default_service("", ""));
        let (status, response) = send_get(router, "/api/v1/version").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_bytes(response).await.is_empty());
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let router = make_router(MockVersionService::new());
        let request = Request::builder()
            .uri("/api/v1/health")
            .header(header::ORIGIN, "http://example.com")
            .body(Body::empty())
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).and_then(|value| value.to_str().ok()),
            Some("*")
        );
    }
}
