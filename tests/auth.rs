mod common;

use actix_web::http::StatusCode;
use actix_web::middleware::Logger;
use actix_web::{test, App};
use collabhub::routes;
use pretty_assertions::assert_eq;
use serde_json::json;

use common::{bearer, register_user, send};

#[test_log::test(actix_rt::test)]
async fn test_register_and_login_flow() {
    let state = common::state();
    let app = test::init_service(
        App::new()
            .wrap(Logger::default())
            .configure(routes::configure(state.clone())),
    )
    .await;

    let register_payload = json!({
        "username": "alice",
        "email": "a@x.com",
        "password": "secret1"
    });
    let req = test::TestRequest::post()
        .uri("/api/register")
        .set_json(&register_payload)
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::CREATED, "Registration failed: {}", body);
    assert_eq!(body["message"], "User registered successfully");
    assert_eq!(body["user"]["username"], "alice");
    assert_eq!(body["user"]["email"], "a@x.com");
    assert!(body["user"].get("passwordHash").is_none());
    assert!(!body.to_string().contains("secret1"));
    let registered_id = body["user"]["id"].as_u64().unwrap();

    // Same email, different everything else.
    let req = test::TestRequest::post()
        .uri("/api/register")
        .set_json(json!({
            "username": "mallory",
            "email": "a@x.com",
            "password": "another-password"
        }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already registered");

    let req = test::TestRequest::post()
        .uri("/api/login")
        .set_json(json!({ "email": "a@x.com", "password": "secret1" }))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK, "Login failed: {}", body);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["user"]["id"].as_u64(), Some(registered_id));

    let token = body["token"].as_str().unwrap();
    assert_eq!(state.tokens.verify(token).unwrap(), registered_id);

    // The token opens protected routes.
    let req = test::TestRequest::get()
        .uri("/api/projects")
        .insert_header(bearer(token))
        .to_request();
    let (status, projects) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(projects.as_array().unwrap().len(), 1);
}

#[actix_rt::test]
async fn test_invalid_registration_inputs() {
    let app = test::init_service(App::new().configure(routes::configure(common::state()))).await;

    let test_cases = vec![
        (
            json!({ "email": "t@x.com", "password": "secret1" }),
            "missing username",
        ),
        (
            json!({ "username": "tester", "password": "secret1" }),
            "missing email",
        ),
        (
            json!({ "username": "tester", "email": "t@x.com" }),
            "missing password",
        ),
        (
            json!({ "username": "", "email": "t@x.com", "password": "secret1" }),
            "empty username",
        ),
        (
            json!({ "username": "tester", "email": "t@x.com", "password": "12345" }),
            "password too short",
        ),
    ];

    for (payload, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/api/register")
            .set_json(&payload)
            .to_request();
        let (status, body) = send(&app, req).await;

        assert_eq!(
            status,
            StatusCode::BAD_REQUEST,
            "Test case failed: {}. Body: {}",
            description,
            body
        );
        assert!(body["message"].is_string(), "{} has no message", description);
    }

    let req = test::TestRequest::get().uri("/api/test").to_request();
    let (_, stats) = send(&app, req).await;
    assert_eq!(stats["users"], 0);
}

#[actix_rt::test]
async fn test_invalid_login_inputs() {
    let app = test::init_service(App::new().configure(routes::configure(common::state()))).await;

    register_user(&app, "login_user", "login@x.com", "secret1")
        .await
        .expect("Setup: failed to register test user");

    let test_cases = vec![
        (json!({ "password": "secret1" }), "missing email"),
        (json!({ "email": "login@x.com" }), "missing password"),
        (
            json!({ "email": "login@x.com", "password": "wrong-password" }),
            "incorrect password",
        ),
        (
            json!({ "email": "nobody@x.com", "password": "secret1" }),
            "non-existent user",
        ),
    ];

    for (payload, description) in test_cases {
        let req = test::TestRequest::post()
            .uri("/api/login")
            .set_json(&payload)
            .to_request();
        let (status, body) = send(&app, req).await;

        assert_eq!(
            status,
            StatusCode::BAD_REQUEST,
            "Test case failed: {}. Body: {}",
            description,
            body
        );
    }

    // Unknown email and wrong password read the same to the caller.
    let wrong = send(
        &app,
        test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({ "email": "login@x.com", "password": "wrong-password" }))
            .to_request(),
    )
    .await;
    let unknown = send(
        &app,
        test::TestRequest::post()
            .uri("/api/login")
            .set_json(json!({ "email": "nobody@x.com", "password": "secret1" }))
            .to_request(),
    )
    .await;
    assert_eq!(wrong, unknown);
}

#[actix_rt::test]
async fn test_gate_rejects_missing_and_bad_tokens() {
    let app = test::init_service(App::new().configure(routes::configure(common::state()))).await;

    let req = test::TestRequest::get().uri("/api/projects").to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].is_string());

    let req = test::TestRequest::get()
        .uri("/api/projects")
        .insert_header(bearer("not-a-real-token"))
        .to_request();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["message"].is_string());

    // Public endpoints need no token.
    for uri in ["/", "/health", "/api/test"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let (status, _) = send(&app, req).await;
        assert_eq!(status, StatusCode::OK, "{} should be public", uri);
    }
}

#[actix_rt::test]
async fn test_tokens_from_another_deployment_are_rejected() {
    let app = test::init_service(App::new().configure(routes::configure(common::state()))).await;

    let foreign = collabhub::auth::TokenService::new("some_other_secret", Some(24))
        .issue(1)
        .unwrap();
    let req = test::TestRequest::get()
        .uri("/api/projects")
        .insert_header(bearer(&foreign))
        .to_request();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
