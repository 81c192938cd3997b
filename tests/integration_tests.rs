use std::{path::Path, sync::Arc};

use actix_web::{http::StatusCode, test, web, App};
use secrecy::SecretString;
use serde_json::{json, Value};

use quizforge_server::{
    app_state::{AppState, Repositories},
    auth::JwtService,
    config::{Config, DatabaseBackend},
    handlers,
    middleware::RequestIdMiddleware,
    models::domain::User,
    repositories::ImageRepository,
    services::LocalFileStorage,
};

const BOUNDARY: &str = "integration-boundary";
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

fn config(upload_dir: &Path) -> Config {
    Config {
        database_backend: DatabaseBackend::Memory,
        mongo_conn_string: "mongodb://localhost:27017".to_string(),
        mongo_db_name: "quizforge-integration".to_string(),
        web_server_host: "127.0.0.1".to_string(),
        web_server_port: 8080,
        jwt_secret: SecretString::from("integration_jwt_secret".to_string()),
        jwt_expiration_hours: 1,
        upload_dir: upload_dir.to_path_buf(),
        public_base_url: "http://cdn.test".to_string(),
        image_max_size_bytes: 512,
        cors_allowed_origin: None,
    }
}

struct Harness {
    repositories: Repositories,
    state: AppState,
    jwt: JwtService,
    _upload_dir: tempfile::TempDir,
}

impl Harness {
    async fn new() -> Self {
        let upload_dir = tempfile::tempdir().unwrap();
        let config = config(upload_dir.path());
        let jwt = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);
        let storage = LocalFileStorage::new(upload_dir.path()).await.unwrap();
        let repositories = Repositories::in_memory();
        let state = AppState::from_parts(config, repositories.clone(), Arc::new(storage), None);

        Self {
            repositories,
            state,
            jwt,
            _upload_dir: upload_dir,
        }
    }

    async fn user(&self, username: &str) -> (User, String) {
        let user = self
            .repositories
            .users
            .create(User::new(username))
            .await
            .unwrap();
        let token = format!("Bearer {}", self.jwt.create_token(&user).unwrap());
        (user, token)
    }
}

/// Builds the full application over the harness state.
macro_rules! app {
    ($h:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($h.state.clone()))
                .app_data(web::Data::new($h.jwt.clone()))
                .wrap(RequestIdMiddleware)
                .configure(handlers::configure),
        )
        .await
    };
}

/// Creates a quiz through the API and evaluates to its id.
macro_rules! create_quiz {
    ($app:expr, $token:expr) => {{
        let req = test::TestRequest::post()
            .uri("/api/quizzes")
            .insert_header(("Authorization", $token))
            .set_json(json!({ "title": "Integration quiz" }))
            .to_request();
        let resp = test::call_service(&$app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let quiz: Value = test::read_body_json(resp).await;
        quiz["id"].as_str().unwrap().to_string()
    }};
}

fn multipart_file(file_name: &str, content_type: &str, bytes: &[u8]) -> (String, Vec<u8>) {
    let mut body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}

#[actix_web::test]
async fn creator_creates_question_with_owned_image() {
    let h = Harness::new().await;
    let (author, token) = h.user("author").await;
    let app = app!(h);
    let quiz_id = create_quiz!(app, token.as_str());

    let req = test::TestRequest::post()
        .uri(&format!("/api/quizzes/{}/questions", quiz_id))
        .insert_header(("Authorization", token.as_str()))
        .set_json(json!({ "text": "What does `?` do?" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;

    assert_eq!(h.repositories.images.count().await.unwrap(), 1);
    let image = h
        .repositories
        .images
        .find_by_id(created["image_id"].as_str().unwrap())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(image.created_by_user_id, author.id);

    let questions = h.repositories.questions.find_by_quiz(&quiz_id).await.unwrap();
    assert_eq!(questions.len(), 1);
    assert_eq!(questions[0].id, created["id"].as_str().unwrap());

    let req = test::TestRequest::get()
        .uri(&format!("/api/images/{}", image.id))
        .insert_header(("Authorization", token.as_str()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let view: Value = test::read_body_json(resp).await;
    assert_eq!(view["id"], image.id.as_str());
    assert!(view["url"].is_null());
    assert!(view["size"].is_null());
}

#[actix_web::test]
async fn non_creator_is_forbidden_and_stores_are_unchanged() {
    let h = Harness::new().await;
    let (_, author_token) = h.user("author").await;
    let (_, other_token) = h.user("other").await;
    let app = app!(h);
    let quiz_id = create_quiz!(app, author_token.as_str());

    let req = test::TestRequest::post()
        .uri(&format!("/api/quizzes/{}/questions", quiz_id))
        .insert_header(("Authorization", other_token.as_str()))
        .set_json(json!({ "text": "Not mine" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        "You must be the quiz author to create a question related to it"
    );
    assert_eq!(body["code"], 403);
    assert_eq!(h.repositories.images.count().await.unwrap(), 0);
    assert_eq!(h.repositories.questions.count().await.unwrap(), 0);
}

#[actix_web::test]
async fn unknown_quiz_is_not_found_without_side_effects() {
    let h = Harness::new().await;
    let (_, token) = h.user("author").await;
    let app = app!(h);

    let req = test::TestRequest::post()
        .uri(&format!("/api/quizzes/{}/questions", uuid::Uuid::new_v4()))
        .insert_header(("Authorization", token.as_str()))
        .set_json(json!({ "text": "Orphan?" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(h.repositories.images.count().await.unwrap(), 0);
}

#[actix_web::test]
async fn upload_without_file_is_rejected_and_nothing_persists() {
    let h = Harness::new().await;
    let (_, token) = h.user("owner").await;
    let app = app!(h);

    let req = test::TestRequest::post()
        .uri("/api/images")
        .insert_header(("Authorization", token.as_str()))
        .to_request();
    let image: Value = test::call_and_read_body_json(&app, req).await;
    let image_id = image["id"].as_str().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/api/images/{}", image_id))
        .insert_header(("Authorization", token.as_str()))
        .insert_header(("content-type", format!("multipart/form-data; boundary={BOUNDARY}")))
        .set_payload(format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"caption\"\r\n\r\nno file\r\n--{BOUNDARY}--\r\n"
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let violations: Value = test::read_body_json(resp).await;
    assert!(!violations.as_array().unwrap().is_empty());

    let stored = h.repositories.images.find_by_id(image_id).await.unwrap().unwrap();
    assert!(!stored.is_bound());
}

#[actix_web::test]
async fn oversized_upload_mentions_limit_and_leaves_image_unbound() {
    let h = Harness::new().await;
    let (_, token) = h.user("owner").await;
    let app = app!(h);

    let req = test::TestRequest::post()
        .uri("/api/images")
        .insert_header(("Authorization", token.as_str()))
        .to_request();
    let image: Value = test::call_and_read_body_json(&app, req).await;
    let image_id = image["id"].as_str().unwrap();

    let mut png = PNG_MAGIC.to_vec();
    png.resize(4096, 0);
    let (content_type, body) = multipart_file("big.png", "image/png", &png);

    let req = test::TestRequest::post()
        .uri(&format!("/api/images/{}", image_id))
        .insert_header(("Authorization", token.as_str()))
        .insert_header(("content-type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let violations: Value = test::read_body_json(resp).await;
    assert!(violations
        .as_array()
        .unwrap()
        .iter()
        .any(|v| v["message"].as_str().unwrap().contains("maximum size")));

    let stored = h.repositories.images.find_by_id(image_id).await.unwrap().unwrap();
    assert!(!stored.is_bound());
}

#[actix_web::test]
async fn owner_uploads_file_to_question_image() {
    let h = Harness::new().await;
    let (_, token) = h.user("author").await;
    let app = app!(h);
    let quiz_id = create_quiz!(app, token.as_str());

    let req = test::TestRequest::post()
        .uri(&format!("/api/quizzes/{}/questions", quiz_id))
        .insert_header(("Authorization", token.as_str()))
        .set_json(json!({ "text": "Pick the picture" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let image_id = created["image_id"].as_str().unwrap();

    let mut png = PNG_MAGIC.to_vec();
    png.resize(128, 0);
    let (content_type, body) = multipart_file("pick.PNG", "image/png", &png);

    let req = test::TestRequest::post()
        .uri(&format!("/api/images/{}", image_id))
        .insert_header(("Authorization", token.as_str()))
        .insert_header(("content-type", content_type))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let view: Value = test::read_body_json(resp).await;
    assert_eq!(view["id"], image_id);
    assert_eq!(view["original_name"], "pick.PNG");
    assert!(view["url"]
        .as_str()
        .unwrap()
        .starts_with("http://cdn.test/uploads/"));
}

#[actix_web::test]
async fn api_requires_bearer_token_but_health_does_not() {
    let h = Harness::new().await;
    let app = app!(h);

    let req = test::TestRequest::get()
        .uri(&format!("/api/images/{}", uuid::Uuid::new_v4()))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));
}
