//! HTTP-level tests driving the full router in memory

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use newsdesk::{
    api::{build_router, AppState},
    config::AuthConfig,
    db::{
        create_test_pool, migrations,
        repositories::{SqlxUserRepository, UserRepository},
        DynDatabasePool,
    },
    models::User,
    services::hash_password,
};

const ADMIN_EMAIL: &str = "admin@example.com";
const PASSWORD: &str = "correct horse";

async fn setup() -> (Router, DynDatabasePool) {
    let pool = create_test_pool().await.expect("Failed to create test pool");
    migrations::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    let state = AppState::build(pool.clone(), &AuthConfig::default()).expect("Failed to build state");
    let app = build_router(state, "http://localhost:3000").expect("Failed to build router");
    (app, pool)
}

async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let (status, _, text) = send_raw(app, method, uri, token, body).await;
    let json = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };
    (status, json)
}

async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, axum::http::HeaderMap, String) {
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
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn login(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["token"].as_str().unwrap().to_string()
}

async fn admin_token(app: &Router) -> String {
    let (status, _) = send(
        app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({ "email": ADMIN_EMAIL, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    login(app, ADMIN_EMAIL).await
}

async fn create_article(app: &Router, token: &str, title: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v1/admin/articles",
        Some(token),
        Some(json!({ "title": title, "content": "Full **story** here.", "author": "Ana Ruiz" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body
}

#[tokio::test]
async fn admin_routes_require_a_session() {
    let (app, _) = setup().await;

    let (status, body) = send(&app, Method::GET, "/api/v1/admin/articles", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let (status, _) = send(&app, Method::GET, "/api/v1/admin/dashboard", Some("bogus"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn non_allow_listed_user_is_forbidden() {
    let (app, pool) = setup().await;
    let hash = hash_password(PASSWORD).unwrap();
    SqlxUserRepository::new(pool)
        .create(&User::new("reporter@example.com".into(), hash))
        .await
        .unwrap();

    let token = login(&app, "reporter@example.com").await;

    let (status, me) = send(&app, Method::GET, "/api/v1/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["is_admin"], false);

    let (status, body) = send(&app, Method::GET, "/api/v1/admin/articles", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn registration_closes_after_first_user() {
    let (app, _) = setup().await;
    admin_token(&app).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/auth/register",
        None,
        Some(json!({ "email": "danish@gmail.com", "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let (app, _) = setup().await;
    admin_token(&app).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": ADMIN_EMAIL, "password": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_cookie_authenticates_and_logout_revokes() {
    let (app, _) = setup().await;
    admin_token(&app).await;

    let (status, headers, _) = send_raw(
        &app,
        Method::POST,
        "/api/v1/auth/login",
        None,
        Some(json!({ "email": ADMIN_EMAIL, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let cookie = headers.get(header::SET_COOKIE).unwrap().to_str().unwrap();
    let pair = cookie.split(';').next().unwrap().to_string();
    assert!(pair.starts_with("session="));

    let me = Request::builder()
        .uri("/api/v1/auth/me")
        .header(header::COOKIE, &pair)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(me).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let logout = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/auth/logout")
        .header(header::COOKIE, &pair)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(logout).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let me = Request::builder()
        .uri("/api/v1/auth/me")
        .header(header::COOKIE, &pair)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(me).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_titles_get_suffixed_slugs() {
    let (app, _) = setup().await;
    let token = admin_token(&app).await;

    let first = create_article(&app, &token, "Breaking News").await;
    let second = create_article(&app, &token, "Breaking News").await;
    let third = create_article(&app, &token, "Breaking News!!").await;

    assert_eq!(first["slug"], "breaking-news");
    assert_eq!(second["slug"], "breaking-news-1");
    assert_eq!(third["slug"], "breaking-news-2");
}

#[tokio::test]
async fn missing_title_is_validation_error() {
    let (app, _) = setup().await;
    let token = admin_token(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/admin/articles",
        Some(&token),
        Some(json!({ "title": "  ", "content": "Body", "author": "Desk" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn unknown_category_is_validation_error() {
    let (app, _) = setup().await;
    let token = admin_token(&app).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v1/admin/articles",
        Some(&token),
        Some(json!({ "title": "Orphan", "content": "Body", "author": "Desk", "category_id": 999 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["message"], "Category not found");
}

#[tokio::test]
async fn toggle_publish_controls_public_visibility() {
    let (app, _) = setup().await;
    let token = admin_token(&app).await;
    let article = create_article(&app, &token, "Council votes on budget").await;
    let id = article["id"].as_i64().unwrap();
    assert_eq!(article["published"], false);
    assert!(article["published_at"].is_null());

    let (status, _) = send(&app, Method::GET, "/api/v1/articles/council-votes-on-budget", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let toggle = format!("/api/v1/admin/articles/{}/toggle-publish", id);
    let (status, live) = send(&app, Method::POST, &toggle, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(live["published"], true);
    assert!(live["published_at"].is_string());

    let (status, public) = send(&app, Method::GET, "/api/v1/articles/council-votes-on-budget", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(public["content_html"].as_str().unwrap().contains("<strong>story</strong>"));

    let (_, listed) = send(&app, Method::GET, "/api/v1/articles", None, None).await;
    assert_eq!(listed["total"], 1);

    let (_, draft) = send(&app, Method::POST, &toggle, Some(&token), None).await;
    assert_eq!(draft["published"], false);
    assert!(draft["published_at"].is_null());

    let (status, _) = send(&app, Method::GET, "/api/v1/articles/council-votes-on-budget", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_list_filters_by_status_and_query() {
    let (app, _) = setup().await;
    let token = admin_token(&app).await;

    let live = create_article(&app, &token, "Election results").await;
    create_article(&app, &token, "Election preview").await;
    create_article(&app, &token, "Football final").await;
    let toggle = format!("/api/v1/admin/articles/{}/toggle-publish", live["id"]);
    send(&app, Method::POST, &toggle, Some(&token), None).await;

    let (_, drafts) = send(&app, Method::GET, "/api/v1/admin/articles?status=draft", Some(&token), None).await;
    assert_eq!(drafts["total"], 2);

    let (_, found) = send(
        &app,
        Method::GET,
        "/api/v1/admin/articles?q=election&status=draft",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(found["total"], 1);
    assert_eq!(found["articles"][0]["title"], "Election preview");

    let (status, _) = send(&app, Method::GET, "/api/v1/admin/articles?status=archived", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_and_delete_article() {
    let (app, _) = setup().await;
    let token = admin_token(&app).await;
    let article = create_article(&app, &token, "Old headline").await;
    let uri = format!("/api/v1/admin/articles/{}", article["id"]);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &uri,
        Some(&token),
        Some(json!({ "title": "New headline", "content": "Body", "author": "Desk" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["slug"], "new-headline");

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn category_crud_and_public_listing() {
    let (app, _) = setup().await;
    let token = admin_token(&app).await;

    let (status, category) = send(
        &app,
        Method::POST,
        "/api/v1/admin/categories",
        Some(&token),
        Some(json!({ "name": "World News", "description": "Global coverage" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(category["slug"], "world-news");

    let (status, article) = send(
        &app,
        Method::POST,
        "/api/v1/admin/articles",
        Some(&token),
        Some(json!({
            "title": "Summit opens",
            "content": "Leaders meet.",
            "author": "Desk",
            "category_id": category["id"],
            "published": true
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(article["category"]["slug"], "world-news");

    let (_, listing) = send(&app, Method::GET, "/api/v1/categories/world-news/articles", None, None).await;
    assert_eq!(listing["category"]["name"], "World News");
    assert_eq!(listing["articles"][0]["slug"], "summit-opens");

    let (status, _) = send(&app, Method::GET, "/api/v1/categories/nope/articles", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/api/v1/admin/categories/{}", category["id"]);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, categories) = send(&app, Method::GET, "/api/v1/categories", None, None).await;
    assert_eq!(categories["categories"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn newsletter_duplicate_is_conflict() {
    let (app, _) = setup().await;

    let body = json!({ "email": "reader@news.test" });
    let (status, _) = send(&app, Method::POST, "/api/v1/newsletter", None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, err) = send(&app, Method::POST, "/api/v1/newsletter", None, Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(
        err["error"]["message"],
        "This email is already subscribed to our newsletter."
    );

    let token = admin_token(&app).await;
    let (_, subscribers) = send(&app, Method::GET, "/api/v1/admin/subscribers", Some(&token), None).await;
    assert_eq!(subscribers["total"], 1);
}

#[tokio::test]
async fn newsletter_closed_when_disabled() {
    let (app, _) = setup().await;
    let token = admin_token(&app).await;

    let (status, settings) = send(
        &app,
        Method::PUT,
        "/api/v1/admin/settings",
        Some(&token),
        Some(json!({ "newsletter_enabled": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settings["newsletter_enabled"], false);

    let (status, _) = send(
        &app,
        Method::POST,
        "/api/v1/newsletter",
        None,
        Some(json!({ "email": "reader@news.test" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, site) = send(&app, Method::GET, "/api/v1/site", None, None).await;
    assert_eq!(site["newsletter_enabled"], false);
    assert!(site.get("contact_email").is_none());
}

#[tokio::test]
async fn dashboard_counts() {
    let (app, _) = setup().await;
    let token = admin_token(&app).await;

    for i in 0..6 {
        create_article(&app, &token, &format!("Story {}", i)).await;
    }
    send(&app, Method::POST, "/api/v1/newsletter", None, Some(json!({ "email": "a@news.test" }))).await;

    let (status, dashboard) = send(&app, Method::GET, "/api/v1/admin/dashboard", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["total_articles"], 6);
    assert_eq!(dashboard["published_articles"], 0);
    assert_eq!(dashboard["draft_articles"], 6);
    assert_eq!(dashboard["total_subscribers"], 1);
    assert_eq!(dashboard["recent_articles"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn reading_pages_render() {
    let (app, _) = setup().await;
    let token = admin_token(&app).await;
    let article = create_article(&app, &token, "Harbour reopens").await;

    let (status, _, html) = send_raw(&app, Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Newsdesk"));
    assert!(!html.contains("Harbour reopens"));

    let (status, _, _) = send_raw(&app, Method::GET, "/article/harbour-reopens", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let toggle = format!("/api/v1/admin/articles/{}/toggle-publish", article["id"]);
    send(&app, Method::POST, &toggle, Some(&token), None).await;

    let (_, _, html) = send_raw(&app, Method::GET, "/", None, None).await;
    assert!(html.contains("Harbour reopens"));

    let (status, _, html) = send_raw(&app, Method::GET, "/article/harbour-reopens", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<strong>story</strong>"));

    let (status, _, html) = send_raw(&app, Method::GET, "/category/missing", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(html.contains("Page not found"));

    let (status, _, _) = send_raw(&app, Method::GET, "/no/such/page", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
