//! In-process stand-in for the lunch backend, served by axum on an ephemeral port.
//!
//! Behavior mirrors the real API closely enough for client tests:
//! - `POST /api/users` rejects passwords shorter than 5 characters with 400
//!   and `{message}`; username `teapot` gets a plain-text 500; username
//!   `sparse` gets a record with `dietPreferences: null`; username `bare`
//!   gets a 201 with an empty body.
//! - `POST /api/sessions` rejects password `wrong` with 401 and `{message}`;
//!   otherwise returns a JWT whose claims carry the username.

use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};

use crate::token::test_helpers::make_token;

pub const SHORT_PASSWORD_MESSAGE: &str = "Your password must be at least 5 characters long.";
pub const BAD_LOGIN_MESSAGE: &str = "Incorrect username or password.";
pub const USER_ID: &str = "5a550ea739fbc4ca3ee0ce58";

#[derive(Clone, Default)]
struct MockState {
    hits: Arc<Mutex<Vec<String>>>,
}

pub struct MockBackend {
    pub base_url: String,
    hits: Arc<Mutex<Vec<String>>>,
}

impl MockBackend {
    /// Paths requested so far, in order.
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

/// Token the mock issues for `username`.
pub fn token_for(username: &str) -> String {
    make_token(&json!({
        "username": username,
        "_id": USER_ID,
        "iat": 1_517_840_280,
        "exp": 1_517_847_480
    }))
}

pub async fn spawn() -> MockBackend {
    let state = MockState::default();
    let hits = state.hits.clone();
    let app = Router::new()
        .route("/api/users", post(create_user))
        .route("/api/sessions", post(create_session))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockBackend { base_url: format!("http://{addr}/api"), hits }
}

fn field<'a>(body: &'a Value, key: &str) -> &'a str {
    body.get(key).and_then(Value::as_str).unwrap_or_default()
}

async fn create_user(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    state.hits.lock().unwrap().push("/users".to_owned());
    let username = field(&body, "username");
    if username == "teapot" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response();
    }
    if username == "sparse" {
        return Json(json!({ "username": username, "_id": "x", "dietPreferences": null })).into_response();
    }
    if username == "bare" {
        return StatusCode::CREATED.into_response();
    }
    if field(&body, "password").chars().count() < 5 {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": SHORT_PASSWORD_MESSAGE }))).into_response();
    }
    Json(json!({
        "__v": 0,
        "username": username,
        "password": "$2a$10$oF7YW1FyOSW3Gw7G4ThbO.ibduCgF3U0gVI/GE9fKQcGtVEBs0B.2",
        "_id": USER_ID,
        "dietPreferences": []
    }))
    .into_response()
}

async fn create_session(State(state): State<MockState>, Json(body): Json<Value>) -> Response {
    state.hits.lock().unwrap().push("/sessions".to_owned());
    if field(&body, "password") == "wrong" {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": BAD_LOGIN_MESSAGE }))).into_response();
    }
    Json(json!({ "token": token_for(field(&body, "username")) })).into_response()
}
