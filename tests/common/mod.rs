#![allow(dead_code)]

use actix_web::{
    body::MessageBody,
    dev::{Service, ServiceResponse},
    http::{header, StatusCode},
    test, web,
};
use collabhub::{config::Config, AppState};
use serde_json::{json, Value};

pub const TEST_SECRET: &str = "integration_test_secret";

/// Fresh in-memory state with a cheap bcrypt cost.
pub fn state() -> web::Data<AppState> {
    state_with(|_| {})
}

pub fn state_with(tweak: impl FnOnce(&mut Config)) -> web::Data<AppState> {
    let mut config = Config::new(TEST_SECRET);
    config.bcrypt_cost = collabhub::config::MIN_BCRYPT_COST;
    tweak(&mut config);
    web::Data::new(AppState::in_memory(&config))
}

pub struct TestUser {
    pub id: u64,
    pub token: String,
}

pub async fn register_user(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    username: &str,
    email: &str,
    password: &str,
) -> Result<TestUser, String> {
    let req = test::TestRequest::post()
        .uri("/api/register")
        .set_json(json!({
            "username": username,
            "email": email,
            "password": password
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status();
    let body = test::read_body(resp).await;

    if status != StatusCode::CREATED {
        return Err(format!(
            "Failed to register user. Status: {}. Body: {}",
            status,
            String::from_utf8_lossy(&body)
        ));
    }
    let json: Value = serde_json::from_slice(&body)
        .map_err(|e| format!("Failed to parse registration response: {}", e))?;

    Ok(TestUser {
        id: json["user"]["id"]
            .as_u64()
            .ok_or("registration response has no user id")?,
        token: json["token"]
            .as_str()
            .ok_or("registration response has no token")?
            .to_string(),
    })
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Sends a request and returns the status and JSON body, whether the response came
/// from a handler or from an error raised by the auth middleware.
pub async fn send(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    req: actix_http::Request,
) -> (StatusCode, Value) {
    match test::try_call_service(app, req).await {
        Ok(resp) => {
            let status = resp.status();
            let body = test::read_body(resp).await;
            let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
            (status, json)
        }
        Err(err) => {
            let resp = err.error_response();
            let status = resp.status();
            let body = actix_web::body::to_bytes(resp.into_body())
                .await
                .unwrap_or_default();
            let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
            (status, json)
        }
    }
}
