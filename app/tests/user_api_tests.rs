// tests/user_api_tests.rs
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::Value;

use common::{bearer, MultipartBody, TestHarness, ADMIN_TOKEN, CUSTOMER_TOKEN};
use storefront::build_app;

#[actix_web::test]
async fn admin_lists_and_reads_users() {
  let harness = TestHarness::new();
  let app = test::init_service(build_app(harness.state())).await;

  let req = TestRequest::get()
    .uri("/api/users")
    .insert_header(bearer(ADMIN_TOKEN))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["meta"]["totalCount"], 3);
  assert_eq!(body["data"].as_array().map(Vec::len), Some(3));

  let req = TestRequest::get()
    .uri(&format!("/api/users/{}", harness.customer_id))
    .insert_header(bearer(ADMIN_TOKEN))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["data"]["name"], "Customer");
  assert_eq!(body["data"]["role"], "user");

  let req = TestRequest::get()
    .uri("/api/users/00000000-0000-0000-0000-000000000000")
    .insert_header(bearer(ADMIN_TOKEN))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn customers_cannot_list_users() {
  let harness = TestHarness::new();
  let app = test::init_service(build_app(harness.state())).await;

  let req = TestRequest::get()
    .uri("/api/users")
    .insert_header(bearer(CUSTOMER_TOKEN))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(
    body["error"],
    "You are not authenticated or unauthorized to access this resource"
  );
}

#[actix_web::test]
async fn caller_updates_their_own_profile() {
  let harness = TestHarness::new();
  let app = test::init_service(build_app(harness.state())).await;

  let req = MultipartBody::new()
    .text("name", "Renamed Customer")
    .text("address", "12 Market Street")
    .file("image", "me.jpg", "image/jpeg", &[0xff, 0xd8, 0xff, 0xe0])
    .attach(TestRequest::put().uri("/api/users").insert_header(bearer(CUSTOMER_TOKEN)))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["data"]["id"], harness.customer_id.to_string());
  assert_eq!(body["data"]["name"], "Renamed Customer");
  assert_eq!(body["data"]["address"], "12 Market Street");
  assert_eq!(body["data"]["image"], "https://media.test/users/me.jpg");

  let uploads = harness.uploader.uploads();
  assert_eq!(uploads.len(), 1);
  assert_eq!(uploads[0].folder, "users");
}

#[actix_web::test]
async fn profile_update_requires_name_and_address() {
  let harness = TestHarness::new();
  let app = test::init_service(build_app(harness.state())).await;

  let req = MultipartBody::new()
    .text("name", "Renamed Customer")
    .attach(TestRequest::put().uri("/api/users").insert_header(bearer(CUSTOMER_TOKEN)))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["error"]["address"].is_array());
  assert!(harness.uploader.uploads().is_empty());
}
