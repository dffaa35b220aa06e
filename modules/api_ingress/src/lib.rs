//! HTTP host for the roster server: owns the listener, the shared middleware
//! stack and the infrastructure endpoints (`/health`, `/openapi.json`, `/docs`).
//! Feature modules hand in their routers; this crate never knows their routes.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{middleware::from_fn, response::Response, routing::get, Router};
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::openapi::OpenApi;

mod config;
pub mod request_id;
pub mod shutdown;
mod web;

pub use config::ApiIngressConfig;

pub struct ApiIngress {
    config: ApiIngressConfig,
}

impl ApiIngress {
    pub fn new(config: ApiIngressConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ApiIngressConfig {
        &self.config
    }

    /// Address to bind: explicit `bind_addr`, else `host:port` from the server section.
    pub fn bind_addr(&self, host: &str, port: u16) -> Result<SocketAddr> {
        let raw = if self.config.bind_addr.trim().is_empty() {
            format!("{host}:{port}")
        } else {
            self.config.bind_addr.trim().to_string()
        };
        raw.parse()
            .with_context(|| format!("Invalid bind address '{raw}'"))
    }

    /// Wrap module routes with infrastructure endpoints and the middleware stack.
    ///
    /// Layer order, outermost first:
    /// SetRequestId -> PropagateRequestId -> push_req_id_to_extensions -> Trace
    /// -> Timeout -> CORS -> BodyLimit -> routes
    pub fn build_router(&self, routes: Router, openapi: Option<OpenApi>) -> Router {
        let mut router = Router::new()
            .route("/health", get(web::health_check))
            .merge(routes);

        match openapi {
            Some(doc) if self.config.enable_docs => {
                router = router.merge(web::docs_routes(doc));
            }
            _ => tracing::debug!("API docs disabled"),
        }

        router = router.layer(RequestBodyLimitLayer::new(self.config.body_limit_bytes));

        if self.config.cors_enabled {
            router = router.layer(CorsLayer::permissive());
        }

        let x_request_id = request_id::header();
        router
            .layer(TimeoutLayer::new(Duration::from_secs(self.config.timeout_sec)))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(request_id::http_span)
                    .on_response(record_response),
            )
            .layer(from_fn(request_id::push_req_id_to_extensions))
            .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
            .layer(SetRequestIdLayer::new(x_request_id, request_id::MakeReqId))
    }

    /// Bind and serve until `shutdown` resolves, then drain in-flight requests.
    pub async fn serve<F>(&self, addr: SocketAddr, router: Router, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        tracing::info!("HTTP server bound on {}", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await
            .context("HTTP server failed")?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn record_response(res: &Response, latency: Duration, span: &tracing::Span) {
    span.record("status", res.status().as_u16());
    span.record("latency_ms", u64::try_from(latency.as_millis()).unwrap_or(u64::MAX));
    tracing::debug!(parent: span, status = res.status().as_u16(), "request finished");
}
