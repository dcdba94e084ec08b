pub mod config;
pub mod route_builder;

use crate::{
    config::Config,
    database::{DatabaseManager, DatabaseManagerImpl},
    error::AppError,
    health::HealthService,
    server::route_builder::{build_routes, middleware_factories::request_response_logger},
    shutdown::ShutdownCoordinator,
    subscription::SubscriptionService,
};
use axum::{Router, extract::FromRef, middleware};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};

#[derive(Clone)]
pub struct Server {
    pub config: Arc<Config>,
    pub database: Arc<dyn DatabaseManager>,
    pub subscriptions: SubscriptionService,
    pub health_service: Arc<HealthService>,
    pub shutdown_coordinator: Arc<ShutdownCoordinator>,
}

impl FromRef<Server> for Arc<HealthService> {
    fn from_ref(server: &Server) -> Self {
        server.health_service.clone()
    }
}

impl Server {
    pub async fn new(config: Config) -> Result<Self, AppError> {
        let database_impl = Arc::new(
            DatabaseManagerImpl::new_from_config(&config.database)
                .await
                .map_err(AppError::Database)?,
        );
        let database: Arc<dyn DatabaseManager> = database_impl.clone();

        let subscriptions = SubscriptionService::new(Arc::new(database.subscriptions()));

        let health_service = Arc::new(HealthService::new());
        health_service.register(database_impl).await;

        let shutdown_coordinator = Arc::new(ShutdownCoordinator::new());

        Ok(Self {
            config: Arc::new(config),
            database,
            subscriptions,
            health_service,
            shutdown_coordinator,
        })
    }

    pub async fn run(&self) -> Result<(), AppError> {
        if self.config.database.migration_on_startup {
            self.database.migrate().await.map_err(AppError::Database)?;
        } else {
            info!("Skipping database migrations on startup");
        }

        let app = self.create_app();

        let server_config = &self.config.server;
        let listener = TcpListener::bind((server_config.host.as_str(), server_config.port))
            .await
            .map_err(|e| AppError::Internal(format!("Failed to bind to address: {}", e)))?;
        let addr = listener
            .local_addr()
            .map_err(|e| AppError::Internal(format!("Failed to read bound address: {}", e)))?;

        info!("Server listening on http://{}", addr);

        let shutdown_coordinator = self.shutdown_coordinator.clone();
        tokio::spawn(async move {
            shutdown_coordinator.wait_for_shutdown_signal().await;
        });

        let shutdown_coordinator = self.shutdown_coordinator.clone();
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_coordinator.wait_for_shutdown().await;
                info!("Graceful shutdown initiated");
            })
            .await;

        if let Err(e) = result {
            error!("Server error: {}", e);
            return Err(AppError::Internal(format!("Server error: {}", e)));
        }

        if let Err(e) = self.database.connection().clone().close().await {
            error!("Failed to close database connection: {}", e);
        }
        info!("Server shutdown complete");

        Ok(())
    }

    // Creates an application router
    pub fn create_app(&self) -> Router {
        let mut app = build_routes().with_state(self.clone());

        if self.config.logging.log_request {
            app = app.layer(middleware::from_fn(request_response_logger));
        }
        app
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    async fn create_test_server() -> (Server, Config) {
        let server = crate::test_utils::TestServerBuilder::new().build().await;
        let config = (*server.config).clone();
        (server, config)
    }

    #[tokio::test]
    async fn test_server_creation() {
        let (server, config) = create_test_server().await;
        assert_eq!(server.config.server.port, config.server.port);
        assert_eq!(
            server.health_service.get_registered_checkers().await,
            vec!["database".to_string()]
        );
    }

    #[tokio::test]
    async fn test_server_keeps_custom_config() {
        let mut config = Config::default();
        config.server.port = 9191;
        config.database.migration_on_startup = false;

        let server = crate::test_utils::TestServerBuilder::new()
            .with_config(config)
            .build()
            .await;
        assert_eq!(server.config.server.port, 9191);
        assert!(!server.config.database.migration_on_startup);
        assert_eq!(
            server.config.database.url.as_deref(),
            Some("sqlite::memory:")
        );
    }

    #[tokio::test]
    async fn test_app_serves_health_and_api() {
        let (server, _config) = create_test_server().await;
        let app = server.create_app();

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let request = Request::builder()
            .uri("/api/v1/subscriptions")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_not_found() {
        let (server, _config) = create_test_server().await;
        let app = server.create_app();

        let request = Request::builder()
            .uri("/api/v2/subscriptions")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
