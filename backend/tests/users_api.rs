//! End-to-end tests for the users API through the public router.
//!
//! The app is assembled from library pieces the same way the server binary
//! does, backed by the in-memory repository.

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use user_registry::Trace;
use user_registry::inbound::http::json_config;
use user_registry::inbound::http::routes::configure_users;
use user_registry::inbound::http::state::HttpState;
use user_registry::test_support::in_memory_state;

#[fixture]
fn state() -> HttpState {
    in_memory_state()
}

async fn init(
    state: HttpState,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    actix_test::init_service(
        App::new()
            .wrap(Trace)
            .app_data(json_config())
            .app_data(web::Data::new(state))
            .configure(configure_users),
    )
    .await
}

async fn call(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    request: actix_test::TestRequest,
) -> (StatusCode, Value) {
    let response = actix_test::call_service(app, request.to_request()).await;
    let status = response.status();
    let value: Value = actix_test::read_body_json(response).await;
    (status, value)
}

#[rstest]
#[actix_web::test]
async fn full_lifecycle(state: HttpState) {
    let app = init(state).await;

    let (status, created) = call(
        &app,
        actix_test::TestRequest::post().uri("/api/users").set_json(json!({
            "name": " Ana ",
            "email": "ANA@X.com",
            "phone": "555",
            "company": "Initech",
            "address": {"street": "1 Main St", "city": "Lisbon", "zipcode": "1000"}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["name"], "Ana");
    assert_eq!(created["data"]["email"], "ana@x.com");
    let id = created["data"]["id"].as_str().expect("id").to_owned();
    let item = format!("/api/users/{id}");

    let (status, fetched) = call(&app, actix_test::TestRequest::get().uri(&item)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"], created["data"]);

    let (status, updated) = call(
        &app,
        actix_test::TestRequest::put()
            .uri(&item)
            .set_json(json!({"address": {"city": "Porto"}})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["data"]["address"], json!({"city": "Porto"}));
    assert_eq!(updated["data"]["company"], "Initech");
    assert_eq!(updated["data"]["createdAt"], created["data"]["createdAt"]);

    let (status, listed) = call(&app, actix_test::TestRequest::get().uri("/api/users")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["count"], 1);

    let (status, _) = call(&app, actix_test::TestRequest::delete().uri(&item)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, listed) = call(&app, actix_test::TestRequest::get().uri("/api/users")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!({"success": true, "count": 0, "data": []}));

    let (status, missing) = call(&app, actix_test::TestRequest::delete().uri(&item)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(missing["message"], "User not found");
}

#[rstest]
#[actix_web::test]
async fn failure_responses_carry_trace_header(state: HttpState) {
    let app = init(state).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/users/65a1f0c2e4b0a1b2c3d4e5f6")
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let header = response
        .headers()
        .get("trace-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace header");
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["traceId"], header);
    assert_eq!(body["success"], false);
}

#[rstest]
#[actix_web::test]
async fn non_string_fields_are_rejected_as_malformed(state: HttpState) {
    let app = init(state).await;

    let (status, value) = call(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({"name": "Ana", "email": "ana@x.com", "phone": 555})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["code"], "invalid_request");
}
