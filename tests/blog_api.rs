//! HTTP-level tests driving the router against in-memory stores

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use bloglist::api::create_router;
use bloglist::{build_app_state, create_app_state, AppConfig};
use bloglist::domain::{Blog, User};
use bloglist::infrastructure::auth::JwtConfig;
use bloglist::infrastructure::storage::InMemoryStorage;

fn initial_blogs() -> Vec<Value> {
    vec![
        json!({"title": "React patterns", "author": "Michael Chan", "url": "https://reactpatterns.com/", "likes": 7}),
        json!({"title": "Go To Statement Considered Harmful", "author": "Edsger W. Dijkstra", "url": "http://www.u.arizona.edu/~rubinson/copyright_violations/Go_To_Considered_Harmful.html", "likes": 5}),
        json!({"title": "Canonical string reduction", "author": "Edsger W. Dijkstra", "url": "http://www.cs.utexas.edu/~EWD/transcriptions/EWD08xx/EWD808.html", "likes": 12}),
        json!({"title": "First class tests", "author": "Robert C. Martin", "url": "http://blog.cleancoder.com/uncle-bob/2017/05/05/TestDefinitions.htmll", "likes": 10}),
        json!({"title": "TDD harms architecture", "author": "Robert C. Martin", "url": "http://blog.cleancoder.com/uncle-bob/2017/03/03/TDD-Harms-Architecture.html", "likes": 0}),
        json!({"title": "Type wars", "author": "Robert C. Martin", "url": "http://blog.cleancoder.com/uncle-bob/2016/05/01/TypeWars.html", "likes": 2}),
    ]
}

fn app() -> Router {
    let state = build_app_state(
        Arc::new(InMemoryStorage::<Blog>::new()),
        Arc::new(InMemoryStorage::<User>::new()),
        JwtConfig::new("integration-secret", 1),
    );
    create_router(state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, value)
}

async fn seeded_app() -> Router {
    let app = app();
    for blog in initial_blogs() {
        let (status, _) = send(&app, Method::POST, "/api/blogs", Some(blog), None).await;
        assert_eq!(status, StatusCode::CREATED);
    }
    app
}

async fn list(app: &Router) -> Vec<Value> {
    let (status, body) = send(app, Method::GET, "/api/blogs", None, None).await;
    assert_eq!(status, StatusCode::OK);
    body.as_array().unwrap().clone()
}

async fn user_count(app: &Router) -> usize {
    let (_, body) = send(app, Method::GET, "/api/users", None, None).await;
    body.as_array().unwrap().len()
}

#[tokio::test]
async fn returns_all_blogs_as_json() {
    let app = seeded_app().await;

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/api/blogs").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    assert!(content_type.starts_with("application/json"));
    assert_eq!(list(&app).await.len(), initial_blogs().len());
}

#[tokio::test]
async fn blogs_expose_id_not_underscore_id() {
    let app = seeded_app().await;

    for blog in list(&app).await {
        assert!(blog.get("id").is_some());
        assert!(blog.get("_id").is_none());
        assert!(blog.get("__v").is_none());
    }
}

#[tokio::test]
async fn valid_blog_can_be_added_with_client_identifiers_ignored() {
    let app = seeded_app().await;

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/blogs",
        Some(json!({
            "_id": "5a422bc61b54a676234d1722",
            "title": "Test Blog 1",
            "author": "Test Blog 1 again",
            "url": "http://blog.cleancoder.com/uncle-bob/2016/05/01/TypeWars.html",
            "likes": 0,
            "__v": 0
        })),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_ne!(created["id"], "5a422bc61b54a676234d1722");
    assert!(created.get("_id").is_none());

    let blogs = list(&app).await;
    assert_eq!(blogs.len(), initial_blogs().len() + 1);
    assert!(blogs.iter().any(|b| b["title"] == "Test Blog 1"));
}

#[tokio::test]
async fn missing_likes_defaults_to_zero() {
    let app = app();

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/blogs",
        Some(json!({"title": "No likes", "url": "https://example.com"})),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["likes"], 0);
}

#[tokio::test]
async fn blog_without_title_or_url_is_rejected() {
    let app = seeded_app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/blogs",
        Some(json!({"author": "Nobody", "url": "https://example.com"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["type"], "invalid_request_error");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/blogs",
        Some(json!({"title": "No url", "url": ""})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(list(&app).await.len(), initial_blogs().len());
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = app();

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/blogs")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"title\": "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn single_blog_can_be_fetched() {
    let app = seeded_app().await;
    let first = list(&app).await[0].clone();
    let uri = format!("/api/blogs/{}", first["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::GET, &uri, None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, first);
}

#[tokio::test]
async fn unknown_blog_is_not_found() {
    let app = seeded_app().await;

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/blogs/5a422bc61b54a676234d1722",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["type"], "not_found_error");

    let (status, _) = send(
        &app,
        Method::PUT,
        "/api/blogs/5a422bc61b54a676234d1722",
        Some(json!({"likes": 1})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn blog_can_be_deleted() {
    let app = seeded_app().await;
    let target = list(&app).await[0].clone();
    let uri = format!("/api/blogs/{}", target["id"].as_str().unwrap());

    let (status, body) = send(&app, Method::DELETE, &uri, None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let blogs = list(&app).await;
    assert_eq!(blogs.len(), initial_blogs().len() - 1);
    assert!(blogs.iter().all(|b| b["title"] != target["title"]));

    let (status, _) = send(&app, Method::DELETE, &uri, None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(list(&app).await.len(), initial_blogs().len() - 1);
}

#[tokio::test]
async fn likes_can_be_updated_alone() {
    let app = seeded_app().await;
    let target = list(&app).await[0].clone();
    let uri = format!("/api/blogs/{}", target["id"].as_str().unwrap());

    let (status, updated) = send(&app, Method::PUT, &uri, Some(json!({"likes": 9001})), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["likes"], 9001);
    assert_eq!(updated["id"], target["id"]);
    assert_eq!(updated["title"], target["title"]);
    assert_eq!(updated["author"], target["author"]);
    assert_eq!(updated["url"], target["url"]);
}

#[tokio::test]
async fn negative_likes_update_is_rejected_and_not_persisted() {
    let app = seeded_app().await;
    let target = list(&app).await[0].clone();
    let uri = format!("/api/blogs/{}", target["id"].as_str().unwrap());

    let (status, _) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"title": "Changed", "likes": -1})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, current) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(current, target);
}

#[tokio::test]
async fn stats_summarize_the_list() {
    let app = seeded_app().await;

    let (status, stats) = send(&app, Method::GET, "/api/blogs/stats", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_blogs"], 6);
    assert_eq!(stats["total_likes"], 36);
    assert_eq!(stats["favorite_blog"]["title"], "Canonical string reduction");
    assert_eq!(stats["most_blogs"]["author"], "Robert C. Martin");
    assert_eq!(stats["most_blogs"]["blogs"], 3);
    assert_eq!(stats["most_likes"]["author"], "Edsger W. Dijkstra");
    assert_eq!(stats["most_likes"]["likes"], 17);
}

#[tokio::test]
async fn stats_survive_likes_at_the_limit() {
    let app = app();
    for title in ["A", "B", "C"] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/api/blogs",
            Some(json!({
                "title": title,
                "author": "Hoarder",
                "url": "https://example.com",
                "likes": i64::MAX
            })),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, stats) = send(&app, Method::GET, "/api/blogs/stats", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_likes"], u64::MAX);
    assert_eq!(stats["most_likes"]["author"], "Hoarder");
    assert_eq!(stats["most_likes"]["likes"], u64::MAX);
}

#[tokio::test]
async fn user_registration_with_existing_root() {
    let app = app();
    let (status, root) = send(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({"username": "root", "name": "Superuser", "password": "sekret"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(root["username"], "root");
    assert!(root.get("id").is_some());
    assert!(root.get("password").is_none());
    assert!(root.get("passwordHash").is_none());
    assert!(root.get("password_hash").is_none());

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({"username": "mluukkai", "name": "Matti Luukkainen", "password": "salainen"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["username"], "mluukkai");
    assert_eq!(user_count(&app).await, 2);

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({"username": "root", "name": "Superuser", "password": "salainen"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("expected `username` to be unique"));
    assert_eq!(user_count(&app).await, 2);
}

#[tokio::test]
async fn short_username_or_password_is_rejected() {
    let app = app();

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({"username": "ro", "password": "sekret"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({"username": "root", "password": "pw"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert_eq!(user_count(&app).await, 0);
}

#[tokio::test]
async fn login_token_records_blog_owner() {
    let app = app();
    send(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({"username": "root", "name": "Superuser", "password": "sekret"})),
        None,
    )
    .await;

    let (status, login) = send(
        &app,
        Method::POST,
        "/api/login",
        Some(json!({"username": "root", "password": "sekret"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["username"], "root");
    let token = login["token"].as_str().unwrap().to_string();

    let (status, blog) = send(
        &app,
        Method::POST,
        "/api/blogs",
        Some(json!({"title": "Owned", "url": "https://example.com/owned"})),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(blog["user"]["username"], "root");

    let (_, users) = send(&app, Method::GET, "/api/users", None, None).await;
    assert_eq!(users[0]["blogs"][0]["title"], "Owned");
    assert_eq!(users[0]["blogs"][0]["id"], blog["id"]);
}

#[tokio::test]
async fn bad_credentials_and_bad_tokens_are_unauthorized() {
    let app = app();
    send(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({"username": "root", "password": "sekret"})),
        None,
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/login",
        Some(json!({"username": "root", "password": "wrong"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["type"], "authentication_error");

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/blogs",
        Some(json!({"title": "T", "url": "https://example.com"})),
        Some("not-a-token"),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(list(&app).await.is_empty());
}

#[tokio::test]
async fn probes_respond() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = send(&app, Method::GET, "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"][0]["name"], "storage");

    let (status, _) = send(&app, Method::GET, "/live", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let app = app();

    let response = app
        .oneshot(Request::builder().uri("/live").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn default_config_rejects_tokens_signed_with_a_guessable_secret() {
    let app = create_router(create_app_state(&AppConfig::default()).await.unwrap());
    let (status, root) = send(
        &app,
        Method::POST,
        "/api/users",
        Some(json!({"username": "root", "password": "sekret"})),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let now = chrono::Utc::now().timestamp();
    let claims = json!({"sub": root["id"], "username": "root", "iat": now, "exp": now + 3600});
    let secrets: [&[u8]; 3] = [b"change-me-in-production", b"secret", b""];
    for secret in secrets {
        let forged = jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(secret),
        )
        .unwrap();

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/blogs",
            Some(json!({"title": "Forged", "url": "https://example.com/forged"})),
            Some(&forged),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }
    assert!(list(&app).await.is_empty());

    let (_, login) = send(
        &app,
        Method::POST,
        "/api/login",
        Some(json!({"username": "root", "password": "sekret"})),
        None,
    )
    .await;
    let (status, blog) = send(
        &app,
        Method::POST,
        "/api/blogs",
        Some(json!({"title": "Genuine", "url": "https://example.com/genuine"})),
        login["token"].as_str(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(blog["user"]["username"], "root");
}
