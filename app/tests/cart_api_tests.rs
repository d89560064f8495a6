// tests/cart_api_tests.rs
mod common;

use actix_web::http::header::CONTENT_TYPE;
use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::{json, Value};

use common::{bearer, TestHarness, CUSTOMER_TOKEN, OTHER_CUSTOMER_TOKEN};
use storefront::build_app;

#[actix_web::test]
async fn adding_the_same_product_twice_keeps_one_item_with_the_latest_quantity() {
  let harness = TestHarness::new();
  let category = harness.category("Books").await;
  let product = harness.product("Rust in Action", "39000", category.id).await;
  let app = test::init_service(build_app(harness.state())).await;

  let req = TestRequest::post()
    .uri("/api/carts")
    .insert_header(bearer(CUSTOMER_TOKEN))
    .set_json(json!({ "product_id": product.id, "quantity": 2 }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let first: Value = test::read_body_json(resp).await;
  assert_eq!(first["data"]["quantity"], 2);

  let req = TestRequest::get()
    .uri(&format!("/api/carts/{}", first["data"]["id"]))
    .insert_header(bearer(CUSTOMER_TOKEN))
    .to_request();
  let fetched: Value = test::read_body_json(test::call_service(&app, req).await).await;
  assert_eq!(fetched["data"]["id"], first["data"]["id"]);
  assert_eq!(fetched["data"]["cart_id"], first["data"]["cart_id"]);
  assert_eq!(fetched["data"]["product_id"], product.id);
  assert_eq!(fetched["data"]["quantity"], 2);

  let req = TestRequest::post()
    .uri("/api/carts")
    .insert_header(bearer(CUSTOMER_TOKEN))
    .set_json(json!({ "product_id": product.id, "quantity": 3 }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let second: Value = test::read_body_json(resp).await;
  assert_eq!(second["data"]["quantity"], 3);
  assert_eq!(second["data"]["id"], first["data"]["id"]);

  let req = TestRequest::get()
    .uri("/api/carts")
    .insert_header(bearer(CUSTOMER_TOKEN))
    .to_request();
  let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
  let items = body["data"]["cart_items"].as_array().expect("cart_items is an array");
  assert_eq!(items.len(), 1);
  assert_eq!(items[0]["quantity"], 3);
  assert_eq!(items[0]["product"]["name"], "Rust in Action");
  assert_eq!(body["data"]["user_id"], harness.customer_id.to_string());
}

#[actix_web::test]
async fn get_cart_creates_an_empty_cart() {
  let harness = TestHarness::new();
  let app = test::init_service(build_app(harness.state())).await;

  let req = TestRequest::get()
    .uri("/api/carts")
    .insert_header(bearer(CUSTOMER_TOKEN))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["data"]["cart_items"], json!([]));
}

#[actix_web::test]
async fn adding_an_unknown_product_is_not_found() {
  let harness = TestHarness::new();
  let app = test::init_service(build_app(harness.state())).await;

  let req = TestRequest::post()
    .uri("/api/carts")
    .insert_header(bearer(CUSTOMER_TOKEN))
    .set_json(json!({ "product_id": 999, "quantity": 1 }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn quantity_below_one_is_rejected() {
  let harness = TestHarness::new();
  let category = harness.category("Books").await;
  let product = harness.product("Rust in Action", "39000", category.id).await;
  let app = test::init_service(build_app(harness.state())).await;

  let req = TestRequest::post()
    .uri("/api/carts")
    .insert_header(bearer(CUSTOMER_TOKEN))
    .set_json(json!({ "product_id": product.id, "quantity": 0 }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"]["quantity"][0], "Quantity must be at least 1");
}

#[actix_web::test]
async fn updating_an_item_changes_its_quantity() {
  let harness = TestHarness::new();
  let category = harness.category("Books").await;
  let product = harness.product("Rust in Action", "39000", category.id).await;
  let app = test::init_service(build_app(harness.state())).await;

  let req = TestRequest::post()
    .uri("/api/carts")
    .insert_header(bearer(CUSTOMER_TOKEN))
    .set_json(json!({ "product_id": product.id, "quantity": 1 }))
    .to_request();
  let added: Value = test::read_body_json(test::call_service(&app, req).await).await;
  let item_id = added["data"]["id"].as_i64().expect("item has an id");

  let req = TestRequest::put()
    .uri(&format!("/api/carts/{}", item_id))
    .insert_header(bearer(CUSTOMER_TOKEN))
    .set_json(json!({ "quantity": 5 }))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let req = TestRequest::get()
    .uri(&format!("/api/carts/{}", item_id))
    .insert_header(bearer(CUSTOMER_TOKEN))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["data"]["quantity"], 5);

  let req = TestRequest::delete()
    .uri(&format!("/api/carts/{}", item_id))
    .insert_header(bearer(CUSTOMER_TOKEN))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);

  let req = TestRequest::get()
    .uri(&format!("/api/carts/{}", item_id))
    .insert_header(bearer(CUSTOMER_TOKEN))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn items_in_another_users_cart_are_not_found() {
  let harness = TestHarness::new();
  let category = harness.category("Books").await;
  let product = harness.product("Rust in Action", "39000", category.id).await;
  let app = test::init_service(build_app(harness.state())).await;

  let req = TestRequest::post()
    .uri("/api/carts")
    .insert_header(bearer(CUSTOMER_TOKEN))
    .set_json(json!({ "product_id": product.id, "quantity": 1 }))
    .to_request();
  let added: Value = test::read_body_json(test::call_service(&app, req).await).await;
  let item_id = added["data"]["id"].as_i64().expect("item has an id");

  // The other customer has a cart of their own, just not this item.
  let req = TestRequest::get()
    .uri("/api/carts")
    .insert_header(bearer(OTHER_CUSTOMER_TOKEN))
    .to_request();
  test::call_service(&app, req).await;

  for req in [
    TestRequest::get().uri(&format!("/api/carts/{}", item_id)),
    TestRequest::delete().uri(&format!("/api/carts/{}", item_id)),
  ] {
    let resp = test::call_service(&app, req.insert_header(bearer(OTHER_CUSTOMER_TOKEN)).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  let req = TestRequest::get()
    .uri(&format!("/api/carts/{}", item_id))
    .insert_header(bearer(CUSTOMER_TOKEN))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn malformed_requests_answer_with_envelopes() {
  let harness = TestHarness::new();
  let app = test::init_service(build_app(harness.state())).await;

  let req = TestRequest::post()
    .uri("/api/carts")
    .insert_header(bearer(CUSTOMER_TOKEN))
    .insert_header((CONTENT_TYPE, "application/json"))
    .set_payload("{ not json")
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["method"], "POST");
  assert!(body["data"].is_null());

  let req = TestRequest::get()
    .uri("/api/carts/not-a-number")
    .insert_header(bearer(CUSTOMER_TOKEN))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);

  let req = TestRequest::get().uri("/api/carts").to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}
