// Router-level tests: guard composition and the wire contract
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use classroom_api::auth::Claims;
use classroom_api::config::{Config, DatabaseConfig, JwtConfig, MailerConfig, ServerConfig};
use classroom_api::models::{credential, NewUser, Role};
use classroom_api::notify::{Notification, RecordingNotifier};
use classroom_api::routes::create_router;
use classroom_api::state::AppState;
use classroom_api::store::{
    MemoryLessonStore, MemoryProvisioningStore, MemoryUserStore, UserStore,
};

const SECRET: &str = "integration-test-secret-at-least-32-chars";

struct Harness {
    app: Router,
    users: Arc<MemoryUserStore>,
    notifier: Arc<RecordingNotifier>,
}

fn harness() -> Harness {
    let users = Arc::new(MemoryUserStore::new());
    let lessons = Arc::new(MemoryLessonStore::new());
    let provisioning = Arc::new(MemoryProvisioningStore::new());
    let notifier = Arc::new(RecordingNotifier::new());

    let config = Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        database: DatabaseConfig {
            url: "postgres://unused".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: SECRET.to_string(),
        },
        mailer: MailerConfig {
            api_url: None,
            api_token: None,
            from_address: "no-reply@classroom.test".to_string(),
            setup_link_base: "https://classroom.test/account".to_string(),
        },
    };

    let state = AppState::new(
        config,
        None,
        users.clone(),
        lessons,
        provisioning,
        notifier.clone(),
    );

    Harness {
        app: create_router(state),
        users,
        notifier,
    }
}

fn token_for(sub: &str, role: Role) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: sub.to_string(),
        role,
        exp: (now + 3600) as usize,
        iat: now as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn token(role: Role) -> String {
    token_for(&Uuid::new_v4().to_string(), role)
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", t));
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", t));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn lesson_payload() -> Value {
    json!({
        "lesson": {
            "title": "This is a title",
            "text": "This is text.",
            "assets_attributes": [
                { "storageURL": "http://www.example.com/assets/1" }
            ]
        }
    })
}

#[tokio::test]
async fn teacher_creates_and_reads_lessons() {
    let h = harness();
    let teacher = token(Role::Teacher);

    let response = h
        .app
        .clone()
        .oneshot(post_json("/api/v1/lessons", Some(&teacher), lesson_payload()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["lesson"]["title"], "This is a title");
    assert_eq!(
        body["assets"][0]["storageURL"],
        "http://www.example.com/assets/1"
    );
    let lesson_id = body["lesson"]["id"].as_str().unwrap().to_string();

    let response = h
        .app
        .clone()
        .oneshot(get(&format!("/api/v1/lessons/{}", lesson_id), Some(&teacher)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], lesson_id.as_str());
    assert_eq!(body["text"], "This is text.");
    assert_eq!(
        body["assets"][0]["storageURL"],
        "http://www.example.com/assets/1"
    );

    let response = h
        .app
        .clone()
        .oneshot(get("/api/v1/lessons", Some(&teacher)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["lessons"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn lesson_without_assets_is_rejected() {
    let h = harness();
    let teacher = token(Role::Teacher);

    let response = h
        .app
        .clone()
        .oneshot(post_json(
            "/api/v1/lessons",
            Some(&teacher),
            json!({ "lesson": { "title": "T", "text": "x" } }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await, json!({}));
}

#[tokio::test]
async fn lesson_routes_deny_everything_but_teacher_tokens() {
    let h = harness();

    // No token
    let response = h
        .app
        .clone()
        .oneshot(post_json("/api/v1/lessons", None, lesson_payload()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await, json!({}));

    // Undecodable token
    let response = h
        .app
        .clone()
        .oneshot(post_json("/api/v1/lessons", Some("garbage"), lesson_payload()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Student token
    let response = h
        .app
        .clone()
        .oneshot(post_json(
            "/api/v1/lessons",
            Some(&token(Role::Student)),
            lesson_payload(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Admin token: roles are strict equality, admin is not a teacher
    let response = h
        .app
        .clone()
        .oneshot(post_json(
            "/api/v1/lessons",
            Some(&token(Role::Admin)),
            lesson_payload(),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dashboards_return_the_callers_first_name() {
    let h = harness();

    let student = h
        .users
        .create(NewUser {
            first_name: "Dana".to_string(),
            last_name: "Scully".to_string(),
            email: "dana@x.com".to_string(),
            role: Role::Student,
            password_hash: credential::hash_password("Abc12345!").unwrap(),
        })
        .await
        .unwrap();

    let response = h
        .app
        .clone()
        .oneshot(get(
            "/api/v1/student/dashboard",
            Some(&token_for(&student.id.to_string(), Role::Student)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "firstName": "Dana" }));

    // A student token does not open the teacher dashboard
    let response = h
        .app
        .clone()
        .oneshot(get(
            "/api/v1/teacher/dashboard",
            Some(&token_for(&student.id.to_string(), Role::Student)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invite_and_set_password_over_http() {
    let h = harness();
    let admin = token(Role::Admin);

    let response = h
        .app
        .clone()
        .oneshot(post_json(
            "/api/v1/users/invite",
            Some(&admin),
            json!({
                "user": {
                    "first_name": "Ada",
                    "last_name": "Lovelace",
                    "email": "ada@x.com",
                    "role": "teacher"
                }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let sent = h.notifier.sent();
    assert_eq!(sent.len(), 1);
    let Notification::SetPassword { one_time_id, .. } = sent[0].clone() else {
        panic!("expected a set-password notification");
    };

    // Redemption requires no token: the invitee has no role yet
    let response = h
        .app
        .clone()
        .oneshot(post_json(
            "/api/v1/users/set_password",
            None,
            json!({
                "user": {
                    "uuid": one_time_id.to_string(),
                    "password": "Abc12345!",
                    "password_confirmation": "Abc12345!"
                }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let user = h.users.find_by_email("ada@x.com").await.unwrap().unwrap();
    assert_eq!(user.role, Role::Teacher);

    // The invite is single-use
    let response = h
        .app
        .clone()
        .oneshot(post_json(
            "/api/v1/users/set_password",
            None,
            json!({
                "user": {
                    "uuid": one_time_id.to_string(),
                    "password": "Abc12345!",
                    "password_confirmation": "Abc12345!"
                }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await, json!({}));
}

#[tokio::test]
async fn invite_requires_an_admin_token() {
    let h = harness();

    let response = h
        .app
        .clone()
        .oneshot(post_json(
            "/api/v1/users/invite",
            Some(&token(Role::Teacher)),
            json!({
                "user": {
                    "first_name": "Ada",
                    "last_name": "Lovelace",
                    "email": "ada@x.com",
                    "role": "teacher"
                }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(h.notifier.sent().is_empty());
}

#[tokio::test]
async fn forgot_and_reset_password_over_http() {
    let h = harness();
    let user = h
        .users
        .create(NewUser {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            email: "grace@x.com".to_string(),
            role: Role::Student,
            password_hash: credential::hash_password("OldPass99").unwrap(),
        })
        .await
        .unwrap();

    let response = h
        .app
        .clone()
        .oneshot(post_json(
            "/api/v1/users/forgot_password",
            None,
            json!({ "user": { "email": "grace@x.com" } }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let Notification::ResetPassword { one_time_id, .. } = h.notifier.sent()[0].clone() else {
        panic!("expected a reset-password notification");
    };

    let response = h
        .app
        .clone()
        .oneshot(post_json(
            "/api/v1/users/reset_password",
            None,
            json!({
                "user": {
                    "uuid": one_time_id.to_string(),
                    "password": "NewPass42!",
                    "password_confirmation": "NewPass42!"
                }
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let updated = h.users.find_by_id(user.id).await.unwrap().unwrap();
    assert!(credential::verify_password("NewPass42!", &updated.password_hash));
}

#[tokio::test]
async fn forgot_password_for_unknown_email_is_denied() {
    let h = harness();

    let response = h
        .app
        .clone()
        .oneshot(post_json(
            "/api/v1/users/forgot_password",
            None,
            json!({ "user": { "email": "missing@x.com" } }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await, json!({}));
    assert!(h.notifier.sent().is_empty());
}

#[tokio::test]
async fn students_index_lists_students_only() {
    let h = harness();

    for (first, last, email) in [
        ("Sam", "One", "sam@x.com"),
        ("Kim", "Two", "kim@x.com"),
    ] {
        h.users
            .create(NewUser {
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: email.to_string(),
                role: Role::Student,
                password_hash: credential::hash_password("Abc12345!").unwrap(),
            })
            .await
            .unwrap();
    }
    h.users
        .create(NewUser {
            first_name: "Terry".to_string(),
            last_name: "Teacher".to_string(),
            email: "terry@x.com".to_string(),
            role: Role::Teacher,
            password_hash: credential::hash_password("Abc12345!").unwrap(),
        })
        .await
        .unwrap();

    let response = h
        .app
        .clone()
        .oneshot(get("/api/v1/students", Some(&token(Role::Teacher))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let students = body["students"].as_array().unwrap();
    assert_eq!(students.len(), 2);
    assert_eq!(students[0]["first_name"], "Sam");
    assert!(students[0]["id"].is_string());
}

#[tokio::test]
async fn health_probe_reports_status() {
    let h = harness();

    let response = h.app.clone().oneshot(get("/api/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "not configured");
}
