//! End-to-end tests for the login flow, the session gate and the user CRUD
//! routes, driven through the real router over an in-memory SQLite store.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sea_orm::{ColumnTrait, ConnectOptions, Database, EntityTrait, PaginatorTrait, QueryFilter};
use tower::ServiceExt; // for oneshot()

use user_admin::config::AdminConfig;
use user_admin::db::entities::user;
use user_admin::db::repository::UserRepository;
use user_admin::{create_router, run_bootstrap, AppState, SessionStore};

const ADMIN_LOGIN_BODY: &str = "email=admin%40admin.com&senha=1234";

async fn setup() -> (Router, AppState) {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options).await.unwrap();

    run_bootstrap(&db, &AdminConfig::default()).await;

    let state = AppState {
        repo: UserRepository::new(db.clone()),
        sessions: SessionStore::shared(),
        db,
    };
    (create_router(state.clone()), state)
}

fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

async fn body_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Log in as the seeded admin and return the session cookie pair
async fn login_as_admin(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(form_post("/login", ADMIN_LOGIN_BODY))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");

    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

// ── Session gate ───────────────────────────────────────────────

#[tokio::test]
async fn gated_routes_redirect_anonymous_to_login() {
    let (app, _state) = setup().await;

    let gated = [
        get("/users"),
        get("/users/add"),
        get("/users/1/edit"),
        form_post("/users", "nome=X&email=x%40x.com&senha=1&confirmSenha=1&papel=admin"),
        form_post("/users/1/edit", "nome=X&email=x%40x.com&papel=admin"),
        Request::builder()
            .method("DELETE")
            .uri("/users/1/delete")
            .body(Body::empty())
            .unwrap(),
    ];

    for request in gated {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");
    }
}

#[tokio::test]
async fn stale_cookie_is_still_redirected() {
    let (app, _state) = setup().await;

    let response = app
        .clone()
        .oneshot(get_with_cookie("/users", "session_id=not-a-real-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/login");
}

#[tokio::test]
async fn gated_route_does_not_touch_store_when_anonymous() {
    let (app, state) = setup().await;

    // A delete without a session must not remove anything
    let request = Request::builder()
        .method("DELETE")
        .uri("/users/1/delete")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let remaining = user::Entity::find().count(&state.db).await.unwrap();
    assert_eq!(remaining, 1);
}

// ── Home page ──────────────────────────────────────────────────

#[tokio::test]
async fn home_redirects_anonymous_and_greets_logged_in() {
    let (app, _state) = setup().await;

    let response = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/login");

    let cookie = login_as_admin(&app).await;
    let response = app.clone().oneshot(get_with_cookie("/", &cookie)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response.into_body()).await;
    assert!(body.contains("Administrador"));
}

// ── Login ──────────────────────────────────────────────────────

#[tokio::test]
async fn login_page_renders_form() {
    let (app, _state) = setup().await;

    let response = app.clone().oneshot(get("/login")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response.into_body()).await;
    assert!(body.contains("name=\"senha\""));
}

#[tokio::test]
async fn login_with_missing_fields_is_rejected() {
    let (app, _state) = setup().await;

    for body in ["", "email=admin%40admin.com", "senha=1234", "email=&senha="] {
        let response = app.clone().oneshot(form_post("/login", body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn login_failures_share_one_generic_message() {
    let (app, _state) = setup().await;

    let unknown = app
        .clone()
        .oneshot(form_post("/login", "email=ghost%40nowhere.com&senha=1234"))
        .await
        .unwrap();
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    let unknown_body = body_string(unknown.into_body()).await;

    let wrong = app
        .clone()
        .oneshot(form_post("/login", "email=admin%40admin.com&senha=wrong"))
        .await
        .unwrap();
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    let wrong_body = body_string(wrong.into_body()).await;

    // Neither response may disclose which part was wrong
    assert_eq!(unknown_body, wrong_body);
}

#[tokio::test]
async fn login_establishes_session_before_redirecting() {
    let (app, _state) = setup().await;

    let cookie = login_as_admin(&app).await;

    // The session must already be valid for the very next request
    let response = app
        .clone()
        .oneshot(get_with_cookie("/users", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response.into_body()).await;
    assert!(body.contains("admin@admin.com"));
}

#[tokio::test]
async fn deactivated_user_can_still_log_in() {
    let (app, state) = setup().await;
    let cookie = login_as_admin(&app).await;

    // Create a user with the active checkbox unchecked
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/users")
                .header(header::COOKIE, &cookie)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(
                    "nome=Inactive&email=inactive%40example.com&senha=pw123&confirmSenha=pw123&papel=viewer",
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let row = user::Entity::find()
        .filter(user::Column::Email.eq("inactive@example.com"))
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();
    assert!(!row.is_active);

    // The active flag is not consulted at login
    let response = app
        .clone()
        .oneshot(form_post("/login", "email=inactive%40example.com&senha=pw123"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

// ── Bootstrap ──────────────────────────────────────────────────

#[tokio::test]
async fn bootstrap_is_idempotent() {
    let (_app, state) = setup().await;

    // setup() already ran it once; run it twice more
    run_bootstrap(&state.db, &AdminConfig::default()).await;
    run_bootstrap(&state.db, &AdminConfig::default()).await;

    let admins = user::Entity::find()
        .filter(user::Column::Email.eq("admin@admin.com"))
        .count(&state.db)
        .await
        .unwrap();
    assert_eq!(admins, 1);
}

// ── User CRUD ──────────────────────────────────────────────────

#[tokio::test]
async fn create_user_round_trip() {
    let (app, state) = setup().await;
    let cookie = login_as_admin(&app).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/users")
                .header(header::COOKIE, &cookie)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(
                    "nome=Bruna&email=bruna%40example.com&senha=segredo&confirmSenha=segredo&papel=operador&ativo=on",
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/users");

    let row = user::Entity::find()
        .filter(user::Column::Email.eq("bruna@example.com"))
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.name, "Bruna");
    assert_eq!(row.role, "operador");
    assert!(row.is_active);
    // Stored value is a hash, never the plaintext
    assert_ne!(row.password_hash, "segredo");
    assert!(user_admin::auth::verify_password("segredo", &row.password_hash));

    // The new user shows up in the list
    let response = app
        .clone()
        .oneshot(get_with_cookie("/users", &cookie))
        .await
        .unwrap();
    let body = body_string(response.into_body()).await;
    assert!(body.contains("bruna@example.com"));
}

#[tokio::test]
async fn create_with_password_mismatch_inserts_nothing() {
    let (app, state) = setup().await;
    let cookie = login_as_admin(&app).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/users")
                .header(header::COOKIE, &cookie)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(
                    "nome=Caio&email=caio%40example.com&senha=abc&confirmSenha=xyz&papel=viewer",
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let count = user::Entity::find().count(&state.db).await.unwrap();
    assert_eq!(count, 1); // only the seeded admin
}

#[tokio::test]
async fn create_with_missing_fields_is_rejected() {
    let (app, _state) = setup().await;
    let cookie = login_as_admin(&app).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/users")
                .header(header::COOKIE, &cookie)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("nome=SemEmail&senha=abc&confirmSenha=abc"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn edit_page_renders_user_or_404() {
    let (app, _state) = setup().await;
    let cookie = login_as_admin(&app).await;

    let response = app
        .clone()
        .oneshot(get_with_cookie("/users/1/edit", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response.into_body()).await;
    assert!(body.contains("admin@admin.com"));

    let response = app
        .clone()
        .oneshot(get_with_cookie("/users/999/edit", &cookie))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_rehashes_password_only_when_provided() {
    let (app, state) = setup().await;
    let cookie = login_as_admin(&app).await;

    let before = user::Entity::find_by_id(1)
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();

    // Blank senha: everything else changes, the hash stays
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/users/1/edit")
                .header(header::COOKIE, &cookie)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(
                    "nome=Root&email=admin%40admin.com&senha=&papel=admin&ativo=on",
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/users");

    let after = user::Entity::find_by_id(1)
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(after.name, "Root");
    assert_eq!(after.password_hash, before.password_hash);
    assert!(after.updated_at >= before.updated_at);

    // Filled senha: a fresh hash, never the plaintext
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/users/1/edit")
                .header(header::COOKIE, &cookie)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(
                    "nome=Root&email=admin%40admin.com&senha=nova-senha&papel=admin&ativo=on",
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let rehashed = user::Entity::find_by_id(1)
        .one(&state.db)
        .await
        .unwrap()
        .unwrap();
    assert_ne!(rehashed.password_hash, before.password_hash);
    assert_ne!(rehashed.password_hash, "nova-senha");
    assert!(user_admin::auth::verify_password(
        "nova-senha",
        &rehashed.password_hash
    ));
}

#[tokio::test]
async fn delete_acknowledges_even_for_missing_id() {
    let (app, state) = setup().await;
    let cookie = login_as_admin(&app).await;

    let request = Request::builder()
        .method("DELETE")
        .uri("/users/999/delete")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response.into_body()).await;
    assert!(body.contains("message"));

    // And a real delete removes the row
    let request = Request::builder()
        .method("DELETE")
        .uri("/users/1/delete")
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let remaining = user::Entity::find().count(&state.db).await.unwrap();
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn duplicate_email_surfaces_as_server_error() {
    let (app, _state) = setup().await;
    let cookie = login_as_admin(&app).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/users")
                .header(header::COOKIE, &cookie)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(
                    "nome=Clone&email=admin%40admin.com&senha=x1&confirmSenha=x1&papel=admin",
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

// ── Health ─────────────────────────────────────────────────────

#[tokio::test]
async fn health_reports_ok_and_session_count() {
    let (app, _state) = setup().await;

    let response = app.clone().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response.into_body()).await;
    let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(parsed["status"], "ok");
    assert_eq!(parsed["active_sessions"], 0);

    let _cookie = login_as_admin(&app).await;
    let response = app.clone().oneshot(get("/health")).await.unwrap();
    let body = body_string(response.into_body()).await;
    let parsed: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(parsed["active_sessions"], 1);
}
