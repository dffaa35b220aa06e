use std::sync::Arc;

use axum::{
    routing::{delete, get, post, put},
    Extension, Router,
};

use crate::api::rest::handlers;
use crate::domain::chat::ChatBot;
use crate::domain::service::Service;

/// Mount the records endpoints on `router`. With `legacy` set, the `/api/...`
/// route set older clients use is mounted as well, sharing the same handlers.
pub fn register_routes(
    router: Router,
    service: Arc<Service>,
    chat: Arc<ChatBot>,
    legacy: bool,
) -> Router {
    let mut records = Router::new()
        .route("/users", post(handlers::create_user).get(handlers::list_users))
        .route("/users/search", get(handlers::search_all_users))
        .route("/users/search/{query}", get(handlers::search_users))
        .route(
            "/users/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .route("/scheds", post(handlers::create_sched).get(handlers::list_scheds))
        .route(
            "/scheds/{id}",
            get(handlers::get_sched)
                .put(handlers::update_sched)
                .delete(handlers::delete_sched),
        )
        .route("/login", post(handlers::login))
        .route("/chat", post(handlers::chat));

    if legacy {
        records = records.nest("/api", legacy_routes());
    }

    router.merge(records.layer(Extension(service)).layer(Extension(chat)))
}

fn legacy_routes() -> Router {
    Router::new()
        .route("/create_users", post(handlers::create_user))
        .route("/delete_user/{id}", delete(handlers::delete_user))
        .route("/get_users/{id}", get(handlers::get_user))
        .route("/users", get(handlers::list_users))
        .route("/update_user/{id}", put(handlers::update_user))
        .route("/create_scheds", post(handlers::create_sched))
        .route("/delete_sched/{id}", delete(handlers::delete_sched))
        .route("/get_sched/{id}", get(handlers::get_sched))
        .route("/scheds", get(handlers::list_scheds))
        .route("/update_sched/{id}", put(handlers::update_sched))
        .route("/login", post(handlers::login))
}
