use std::sync::Arc;

use axum::{
    response::{Html, Json},
    routing::get,
    Router,
};
use serde_json::{json, Value};
use utoipa::openapi::OpenApi;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

pub async fn serve_docs() -> Html<&'static str> {
    Html(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8"/>
  <title>Roster API</title>
  <script src="https://unpkg.com/@stoplight/elements@latest/web-components.min.js"></script>
  <link rel="stylesheet" href="https://unpkg.com/@stoplight/elements@latest/styles.min.css">
</head>
<body>
  <elements-api apiDescriptionUrl="/openapi.json" router="hash" layout="sidebar"></elements-api>
</body>
</html>"#,
    )
}

/// `/openapi.json` and `/docs`, serving a document built once at startup.
pub fn docs_routes(doc: OpenApi) -> Router {
    let doc = Arc::new(doc);
    Router::new()
        .route(
            "/openapi.json",
            get(move || {
                let doc = Arc::clone(&doc);
                async move { Json((*doc).clone()) }
            }),
        )
        .route("/docs", get(serve_docs))
}
