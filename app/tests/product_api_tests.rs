// tests/product_api_tests.rs
mod common;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use serde_json::Value;

use common::{bearer, MultipartBody, RecordingUploader, TestHarness, ADMIN_TOKEN};
use storefront::build_app;
use storefront::models::{PageRequest, ProductFilter};
use storefront::store::Store;

const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

fn product_form(category_id: &str) -> MultipartBody {
  MultipartBody::new()
    .text("name", "Rust in Action")
    .text("description", "Systems programming from the ground up")
    .text("price", "39000")
    .text("category_id", category_id)
}

#[actix_web::test]
async fn create_uploads_the_image_and_stores_its_url() {
  let harness = TestHarness::new();
  let category = harness.category("Books").await;
  let app = test::init_service(build_app(harness.state())).await;

  let req = product_form(&category.id.to_string())
    .file("image", "cover.png", "image/png", PNG_BYTES)
    .attach(TestRequest::post().uri("/api/products").insert_header(bearer(ADMIN_TOKEN)))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["data"]["name"], "Rust in Action");
  assert_eq!(body["data"]["category_id"], category.id);
  assert_eq!(body["data"]["image"], "https://media.test/products/cover.png");

  let uploads = harness.uploader.uploads();
  assert_eq!(uploads.len(), 1);
  assert_eq!(uploads[0].folder, "products");
  assert_eq!(uploads[0].size, PNG_BYTES.len());

  let req = TestRequest::get()
    .uri(&format!("/api/products/{}", body["data"]["id"]))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let fetched: Value = test::read_body_json(resp).await;
  assert_eq!(fetched["data"], body["data"]);
}

#[actix_web::test]
async fn oversized_image_is_rejected_without_upload() {
  let harness = TestHarness::new();
  let category = harness.category("Books").await;
  let app = test::init_service(build_app(harness.state())).await;

  let oversized = vec![0u8; 3 * 1024 * 1024];
  let req = product_form(&category.id.to_string())
    .file("image", "huge.png", "image/png", &oversized)
    .attach(TestRequest::post().uri("/api/products").insert_header(bearer(ADMIN_TOKEN)))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"]["image"][0], "Max image size is 2 MB");
  assert!(harness.uploader.uploads().is_empty());
}

#[actix_web::test]
async fn overlong_text_field_is_a_bad_request() {
  let harness = TestHarness::new();
  let category = harness.category("Books").await;
  let app = test::init_service(build_app(harness.state())).await;

  let description = "x".repeat(100 * 1024);
  let req = MultipartBody::new()
    .text("name", "Rust in Action")
    .text("description", &description)
    .text("price", "39000")
    .text("category_id", &category.id.to_string())
    .attach(TestRequest::post().uri("/api/products").insert_header(bearer(ADMIN_TOKEN)))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["data"].is_null());

  let req = TestRequest::get().uri("/api/products").to_request();
  let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
  assert_eq!(body["meta"]["totalCount"], 0);
}

#[actix_web::test]
async fn deleting_a_product_removes_it() {
  let harness = TestHarness::new();
  let category = harness.category("Books").await;
  let product = harness.product("Rust in Action", "39000", category.id).await;
  let app = test::init_service(build_app(harness.state())).await;

  let req = TestRequest::delete()
    .uri(&format!("/api/products/{}", product.id))
    .insert_header(bearer(ADMIN_TOKEN))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["data"]["id"], product.id);

  let req = TestRequest::get()
    .uri(&format!("/api/products/{}", product.id))
    .to_request();
  assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

  let req = TestRequest::delete()
    .uri(&format!("/api/products/{}", product.id))
    .insert_header(bearer(ADMIN_TOKEN))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["data"].is_null());
}

#[actix_web::test]
async fn zero_byte_image_counts_as_no_image() {
  let harness = TestHarness::new();
  let category = harness.category("Books").await;
  let app = test::init_service(build_app(harness.state())).await;

  let req = product_form(&category.id.to_string())
    .file("image", "empty.png", "image/png", &[])
    .attach(TestRequest::post().uri("/api/products").insert_header(bearer(ADMIN_TOKEN)))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::CREATED);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["data"]["image"].is_null());
  assert!(harness.uploader.uploads().is_empty());
}

#[actix_web::test]
async fn unknown_category_is_a_field_error() {
  let harness = TestHarness::new();
  let app = test::init_service(build_app(harness.state())).await;

  let req = product_form("42")
    .file("image", "cover.png", "image/png", PNG_BYTES)
    .attach(TestRequest::post().uri("/api/products").insert_header(bearer(ADMIN_TOKEN)))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["error"]["category_id"][0], "Category does not exist");
  assert!(harness.uploader.uploads().is_empty());
}

#[actix_web::test]
async fn wrong_image_type_is_rejected_before_upload() {
  let harness = TestHarness::new();
  let category = harness.category("Books").await;
  let app = test::init_service(build_app(harness.state())).await;

  let req = product_form(&category.id.to_string())
    .file("image", "notes.txt", "text/plain", b"not an image")
    .attach(TestRequest::post().uri("/api/products").insert_header(bearer(ADMIN_TOKEN)))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["error"]["image"].is_array());
  assert!(harness.uploader.uploads().is_empty());
}

#[actix_web::test]
async fn upload_failure_persists_nothing() {
  let harness = TestHarness::with_uploader(RecordingUploader::failing());
  let category = harness.category("Books").await;
  let app = test::init_service(build_app(harness.state())).await;

  let req = product_form(&category.id.to_string())
    .file("image", "cover.png", "image/png", PNG_BYTES)
    .attach(TestRequest::post().uri("/api/products").insert_header(bearer(ADMIN_TOKEN)))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["message"], "An error has occurred, please try again later");

  let products = harness
    .store
    .list_products(ProductFilter::default(), PageRequest::default())
    .await
    .expect("listing should succeed");
  assert_eq!(products.meta.total_count, 0);
}

#[actix_web::test]
async fn update_without_image_keeps_the_stored_one() {
  let harness = TestHarness::new();
  let category = harness.category("Books").await;
  let app = test::init_service(build_app(harness.state())).await;

  let req = product_form(&category.id.to_string())
    .file("image", "cover.png", "image/png", PNG_BYTES)
    .attach(TestRequest::post().uri("/api/products").insert_header(bearer(ADMIN_TOKEN)))
    .to_request();
  let created: Value = test::read_body_json(test::call_service(&app, req).await).await;
  let product_id = created["data"]["id"].as_i64().expect("created product has an id");

  let req = MultipartBody::new()
    .text("name", "Rust in Action, 2nd edition")
    .text("description", "Systems programming from the ground up")
    .text("price", "45000")
    .text("category_id", &category.id.to_string())
    .attach(
      TestRequest::put()
        .uri(&format!("/api/products/{}", product_id))
        .insert_header(bearer(ADMIN_TOKEN)),
    )
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["data"]["price"], "45000");
  assert_eq!(body["data"]["image"], "https://media.test/products/cover.png");
}

#[actix_web::test]
async fn update_of_missing_product_uploads_nothing() {
  let harness = TestHarness::new();
  let category = harness.category("Books").await;
  let app = test::init_service(build_app(harness.state())).await;

  let req = product_form(&category.id.to_string())
    .file("image", "cover.png", "image/png", PNG_BYTES)
    .attach(TestRequest::put().uri("/api/products/999").insert_header(bearer(ADMIN_TOKEN)))
    .to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  assert!(harness.uploader.uploads().is_empty());
}

#[actix_web::test]
async fn listing_pages_and_filters_by_category() {
  let harness = TestHarness::new();
  let books = harness.category("Books").await;
  let games = harness.category("Games").await;
  for n in 0..12 {
    harness.product(&format!("Book number {}", n), "10000", books.id).await;
  }
  harness.product("Board game classic", "25000", games.id).await;
  let app = test::init_service(build_app(harness.state())).await;

  let req = TestRequest::get().uri("/api/products?page=2").to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::OK);
  let body: Value = test::read_body_json(resp).await;
  assert_eq!(body["meta"]["totalCount"], 13);
  assert_eq!(body["meta"]["totalPages"], 2);
  assert_eq!(body["meta"]["page"], 2);
  assert_eq!(body["data"].as_array().map(Vec::len), Some(3));

  let req = TestRequest::get()
    .uri(&format!("/api/products?category_id={}", games.id))
    .to_request();
  let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
  assert_eq!(body["meta"]["totalCount"], 1);
  assert_eq!(body["data"][0]["name"], "Board game classic");
}

#[actix_web::test]
async fn non_numeric_product_id_is_not_found() {
  let harness = TestHarness::new();
  let app = test::init_service(build_app(harness.state())).await;

  let req = TestRequest::get().uri("/api/products/abc").to_request();
  let resp = test::call_service(&app, req).await;
  assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  let body: Value = test::read_body_json(resp).await;
  assert!(body["data"].is_null());
}
