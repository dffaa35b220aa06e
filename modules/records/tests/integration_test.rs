use std::sync::Arc;

use anyhow::Result;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use sea_orm::{Database, DatabaseConnection};
use serde_json::{json, Value};
use tower::ServiceExt;

use records::{
    config::RecordsConfig,
    contract::{client::RecordsApi, error::RecordsError},
    domain::{error::DomainError, service::Service},
    Credentials, NewSched, NewUser, RecordKind, RecordsModule, SchedPatch, UserPatch,
};

/// Create a fresh migrated database for each test
async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    RecordsModule::migrate(&db)
        .await
        .expect("Failed to run migrations");
    db
}

async fn create_test_module(config: RecordsConfig) -> RecordsModule {
    RecordsModule::new(create_test_db().await, config)
}

async fn create_test_service() -> Arc<Service> {
    create_test_module(RecordsConfig::default()).await.service()
}

async fn create_test_router() -> Router {
    create_test_module(RecordsConfig::default())
        .await
        .register_rest(Router::new())
}

fn s(v: &str) -> Option<String> {
    Some(v.to_owned())
}

fn ana() -> NewUser {
    NewUser {
        fullname: s("Ana"),
        username: s("ana1"),
        password: s("pw1"),
        address: s("Manila"),
    }
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let resp = router.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn call(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    send(router, req).await
}

// ---- domain service over SQLite ----

#[tokio::test]
async fn test_user_crud() -> Result<()> {
    let service = create_test_service().await;

    let created = service.create_user(ana()).await?;
    assert_eq!(created.id, 1);
    assert_eq!(created.username.as_deref(), Some("ana1"));

    let fetched = service.get_user(created.id).await?;
    assert_eq!(fetched, created);

    let updated = service
        .update_user(
            created.id,
            UserPatch {
                address: s("Quezon City"),
                fullname: s(""),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.address.as_deref(), Some("Quezon City"));
    assert_eq!(updated.fullname.as_deref(), Some("Ana"));
    assert_eq!(service.get_user(created.id).await?, updated);

    service.delete_user(created.id).await?;
    assert!(matches!(
        service.get_user(created.id).await,
        Err(DomainError::NotFound { kind: RecordKind::User, id: 1 })
    ));
    Ok(())
}

#[tokio::test]
async fn test_create_with_missing_fields_persists_nothing() -> Result<()> {
    let service = create_test_service().await;

    let res = service
        .create_user(NewUser {
            address: None,
            ..ana()
        })
        .await;
    assert!(matches!(res, Err(DomainError::Validation { .. })));
    assert!(service.list_users().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_update_twice_is_idempotent() -> Result<()> {
    let service = create_test_service().await;
    let user = service.create_user(ana()).await?;
    let patch = UserPatch {
        password: s("pw2"),
        ..Default::default()
    };

    let first = service.update_user(user.id, patch.clone()).await?;
    let second = service.update_user(user.id, patch).await?;
    assert_eq!(first, second);
    Ok(())
}

#[tokio::test]
async fn test_update_unknown_id_is_not_found() {
    let service = create_test_service().await;
    let res = service.update_user(42, UserPatch::default()).await;
    assert!(matches!(res, Err(DomainError::NotFound { id: 42, .. })));
}

#[tokio::test]
async fn test_delete_missing_row_is_store_error() {
    let service = create_test_service().await;
    assert!(matches!(
        service.delete_user(7).await,
        Err(DomainError::Store { .. })
    ));
    assert!(matches!(
        service.delete_sched(7).await,
        Err(DomainError::Store { .. })
    ));
}

#[tokio::test]
async fn test_search_users() -> Result<()> {
    let service = create_test_service().await;
    service.create_user(ana()).await?;
    service
        .create_user(NewUser {
            fullname: s("Ben Cruz"),
            username: s("ben"),
            password: s("pw"),
            address: s("Cebu"),
        })
        .await?;

    let all = service.search_users("").await?;
    assert_eq!(all.len(), 2);

    let by_address = service.search_users("Man").await?;
    assert_eq!(by_address.len(), 1);
    assert_eq!(by_address[0].username.as_deref(), Some("ana1"));

    let by_name = service.search_users("Cruz").await?;
    assert_eq!(by_name.len(), 1);
    assert_eq!(by_name[0].username.as_deref(), Some("ben"));

    assert!(service.search_users("Davao").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_search_treats_like_metacharacters_literally() -> Result<()> {
    let service = create_test_service().await;
    service.create_user(ana()).await?;
    service
        .create_user(NewUser {
            fullname: s("Ben"),
            username: s("ben"),
            password: s("pw"),
            address: s("Cebu"),
        })
        .await?;

    for needle in ["%", "_", "M_nila", "M%a", "\\"] {
        let found = service.search_users(needle).await?;
        assert!(found.is_empty(), "{needle:?} matched {} rows", found.len());
    }

    service
        .create_user(NewUser {
            fullname: s("Cy 100%_sure"),
            username: s("cy"),
            password: s("pw"),
            address: s("C:\\home"),
        })
        .await?;

    for needle in ["%", "_", "0%_s", ":\\h"] {
        let found = service.search_users(needle).await?;
        assert_eq!(found.len(), 1, "{needle:?}");
        assert_eq!(found[0].username.as_deref(), Some("cy"));
    }
    Ok(())
}

#[tokio::test]
async fn test_list_is_ordered_by_id() -> Result<()> {
    let service = create_test_service().await;
    for name in ["c", "a", "b"] {
        service
            .create_user(NewUser {
                username: s(name),
                ..ana()
            })
            .await?;
    }
    let ids: Vec<i32> = service.list_users().await?.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    Ok(())
}

#[tokio::test]
async fn test_authentication() -> Result<()> {
    let service = create_test_service().await;
    service.create_user(ana()).await?;

    let creds = |u: &str, p: &str| Credentials {
        username: u.to_owned(),
        password: p.to_owned(),
    };

    let user = service.authenticate(creds("ana1", "pw1")).await?;
    assert_eq!(user.id, 1);

    assert!(matches!(
        service.authenticate(creds("ana1", "wrong")).await,
        Err(DomainError::Authentication)
    ));
    assert!(matches!(
        service.authenticate(creds("nobody", "pw1")).await,
        Err(DomainError::Authentication)
    ));
    Ok(())
}

#[tokio::test]
async fn test_duplicate_login_names_fail_closed() -> Result<()> {
    let service = create_test_service().await;
    service.create_user(ana()).await?;
    service
        .create_user(NewUser {
            password: s("other"),
            ..ana()
        })
        .await?;

    let res = service
        .authenticate(Credentials {
            username: "ana1".into(),
            password: "pw1".into(),
        })
        .await;
    assert!(matches!(res, Err(DomainError::Authentication)));
    Ok(())
}

#[tokio::test]
async fn test_sched_crud() -> Result<()> {
    let service = create_test_service().await;

    let created = service
        .create_sched(NewSched {
            date: s("2024-06-01"),
            time: None,
            title: s("Dental"),
            reason: s("cleaning"),
        })
        .await?;
    assert_eq!(created.id, 1);
    assert_eq!(created.date.as_deref(), Some("2024-06-01"));
    assert_eq!(created.time, None);

    let updated = service
        .update_sched(
            created.id,
            SchedPatch {
                time: s("09:00"),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(updated.time.as_deref(), Some("09:00"));
    assert_eq!(updated.title.as_deref(), Some("Dental"));

    assert_eq!(service.list_scheds().await?.len(), 1);
    service.delete_sched(created.id).await?;
    assert!(service.list_scheds().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_local_client_maps_errors() -> Result<()> {
    let module = create_test_module(RecordsConfig::default()).await;
    let client: Arc<dyn RecordsApi> = module.client();

    let user = client.create_user(ana()).await?;
    assert_eq!(client.get_user(user.id).await?, user);

    let err = client.get_user(99).await.unwrap_err();
    assert_eq!(
        err.downcast_ref::<RecordsError>(),
        Some(&RecordsError::not_found(RecordKind::User, 99))
    );

    let err = client
        .create_sched(NewSched::default())
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<RecordsError>(),
        Some(RecordsError::Validation { .. })
    ));

    let err = client
        .authenticate(Credentials {
            username: "ana1".into(),
            password: "nope".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(err.downcast_ref::<RecordsError>(), Some(&RecordsError::Unauthorized));
    Ok(())
}

// ---- HTTP ----

#[tokio::test]
async fn test_http_user_scenario() {
    let router = create_test_router().await;

    let (status, body) = call(
        &router,
        "POST",
        "/users",
        Some(json!({"fullname": "Ana", "username": "ana1", "password": "pw1", "address": "Manila"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User has been added");
    assert_eq!(body["data"]["id"], 1);

    let (status, body) = call(
        &router,
        "PUT",
        "/users/1",
        Some(json!({"address": "Quezon City"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "user updated successfully");
    assert_eq!(body["data"]["address"], "Quezon City");
    assert_eq!(body["data"]["username"], "ana1");

    let (status, body) = call(
        &router,
        "POST",
        "/login",
        Some(json!({"username": "ana1", "password": "wrong"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"message": "Invalid username or password"}));

    let (status, body) = call(
        &router,
        "POST",
        "/login",
        Some(json!({"username": "ana1", "password": "pw1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "Login successful"}));
}

#[tokio::test]
async fn test_http_create_validation_and_payload_errors() {
    let router = create_test_router().await;

    let (status, body) = call(&router, "POST", "/users", Some(json!({"fullname": "Ana"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required fields");
    assert!(body.get("data").is_none());

    let req = Request::builder()
        .method("POST")
        .uri("/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&router, req).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Invalid request payload");

    let (status, _) = call(
        &router,
        "POST",
        "/scheds",
        Some(json!({"date": "2024-06-01", "title": "Dental", "reason": "cleaning"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let req = Request::builder()
        .method("PUT")
        .uri("/scheds/1")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("[]"))
        .unwrap();
    let (status, body) = send(&router, req).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "request failed");
}

#[tokio::test]
async fn test_http_update_unknown_id_wins_over_malformed_body() {
    let router = create_test_router().await;

    for (uri, message) in [
        ("/users/999", "could not retrieve the user"),
        ("/scheds/999", "could not retrieve the schedule"),
        ("/api/update_user/999", "could not retrieve the user"),
    ] {
        let req = Request::builder()
            .method("PUT")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&router, req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["message"], message, "{uri}");
    }

    let (status, _) = call(&router, "POST", "/users", Some(json!({
        "fullname": "Ana", "username": "ana1", "password": "pw1", "address": "Manila"
    })))
    .await;
    assert_eq!(status, StatusCode::OK);

    let req = Request::builder()
        .method("PUT")
        .uri("/users/1")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&router, req).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "request failed");
}

#[tokio::test]
async fn test_http_aliases_and_lookup_errors() {
    let router = create_test_router().await;

    let (status, body) = call(
        &router,
        "POST",
        "/users",
        Some(json!({"name": "Ben", "email": "ben@example.com", "password": "pw", "address": "Cebu"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["fullname"], "Ben");
    assert_eq!(body["data"]["username"], "ben@example.com");

    let (status, body) = call(&router, "GET", "/users/99", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "could not get the user");

    let (status, body) = call(&router, "PUT", "/users/99", Some(json!({"address": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "could not retrieve the user");

    let (status, body) = call(&router, "DELETE", "/users/99", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "could not delete user");

    let (status, body) = call(
        &router,
        "POST",
        "/users",
        Some(json!({"fullname": "Ben", "name": "Benny", "username": "ben2", "password": "pw", "address": "Cebu"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Invalid request payload");

    let (status, body) = call(&router, "GET", "/users/%20", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "id cannot be empty");
}

#[tokio::test]
async fn test_http_search_and_list() {
    let router = create_test_router().await;
    for (name, address) in [("Ana", "Manila"), ("Ben", "Quezon City")] {
        let (status, _) = call(
            &router,
            "POST",
            "/users",
            Some(json!({"fullname": name, "username": name, "password": "pw", "address": address})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = call(&router, "GET", "/users/search/Quezon%20City", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "users fetched successfully");
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = call(&router, "GET", "/users/search", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (_, body) = call(&router, "GET", "/users", None).await;
    assert_eq!(body["data"][0]["fullname"], "Ana");
    assert_eq!(body["data"][1]["fullname"], "Ben");
}

#[tokio::test]
async fn test_http_sched_flow() {
    let router = create_test_router().await;

    let (status, body) = call(
        &router,
        "POST",
        "/scheds",
        Some(json!({"date": "2024-06-01", "time": "10:00", "title": "Checkup", "reason": "annual"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Schedule has been added");

    let (status, body) = call(&router, "GET", "/scheds/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "schedule id fetched successfully");
    assert_eq!(body["data"]["title"], "Checkup");

    let (_, body) = call(&router, "PUT", "/scheds/1", Some(json!({"reason": "follow-up", "title": ""}))).await;
    assert_eq!(body["message"], "schedule updated successfully");
    assert_eq!(body["data"]["reason"], "follow-up");
    assert_eq!(body["data"]["title"], "Checkup");

    let (_, body) = call(&router, "GET", "/scheds", None).await;
    assert_eq!(body["message"], "schedules fetched successfully");
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = call(&router, "DELETE", "/scheds/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "schedule deleted successfully"}));

    let (status, body) = call(&router, "POST", "/scheds", Some(json!({"title": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Missing required fields");
}

#[tokio::test]
async fn test_http_login_with_basic_header() {
    let router = create_test_router().await;
    call(
        &router,
        "POST",
        "/users",
        Some(json!({"fullname": "Ana", "username": "ana1", "password": "pw1", "address": "Manila"})),
    )
    .await;

    // "ana1:pw1"
    let req = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::AUTHORIZATION, "Basic YW5hMTpwdzE=")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&router, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");

    let req = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::AUTHORIZATION, "Token abc")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&router, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authorization header missing or invalid");

    let (status, body) = call(&router, "POST", "/login", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authorization header missing or invalid");
}

#[tokio::test]
async fn test_http_legacy_routes() {
    let router = create_test_router().await;

    let (status, body) = call(
        &router,
        "POST",
        "/api/create_users",
        Some(json!({"fullname": "Ana", "username": "ana1", "password": "pw1", "address": "Manila"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], 1);

    let (status, body) = call(&router, "GET", "/api/get_users/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "ana1");

    let (_, body) = call(&router, "GET", "/api/users", None).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, _) = call(&router, "DELETE", "/api/delete_user/1", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_legacy_routes_can_be_disabled() {
    let router = create_test_module(RecordsConfig {
        legacy_routes: false,
        ..Default::default()
    })
    .await
    .register_rest(Router::new());

    let (status, _) = call(&router, "GET", "/api/users", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = call(&router, "GET", "/users", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_http_chat() {
    let mut config = RecordsConfig::default();
    config
        .chat
        .replies
        .insert("Do you take walk-ins?".into(), "Until 3 PM.".into());
    let router = create_test_module(config)
        .await
        .register_rest(Router::new());

    let (status, body) = call(&router, "POST", "/chat", Some(json!({"message": "  DO you take WALK-INS "}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"response": "Until 3 PM."}));

    let (_, body) = call(&router, "POST", "/chat", Some(json!({"message": "Thanks!"}))).await;
    assert_eq!(body["response"], "You're welcome!");

    let (status, body) = call(&router, "POST", "/chat", Some(json!({"text": "hi"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["message"], "Invalid request payload");
}

#[tokio::test]
async fn test_records_behind_ingress() {
    let module = create_test_module(RecordsConfig::default()).await;
    let ingress = api_ingress::ApiIngress::new(api_ingress::ApiIngressConfig::default());
    let router = ingress.build_router(module.register_rest(Router::new()), Some(module.openapi()));

    let (status, doc) = call(&router, "GET", "/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/users/{id}"]["put"].is_object());
    assert!(doc["components"]["schemas"]["UserDto"].is_object());

    let resp = router
        .clone()
        .oneshot(Request::builder().uri("/users").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));

    let (status, body) = call(&router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}
