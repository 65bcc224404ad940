//! HTTP routing tests for the allocation service
//!
//! Drives `AllocationService` directly, without opening a socket

use blockfit::{AllocationResponse, AllocationService, BlockfitConfig};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{header, Method, Request, Response, StatusCode};
use serde_json::{json, Value};

fn service() -> AllocationService {
    AllocationService::new(BlockfitConfig::default())
}

async fn body_json(response: Response<Full<Bytes>>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn post_allocate(service: &AllocationService, body: Value, query: Option<&str>) -> Response<Full<Bytes>> {
    let bytes = serde_json::to_vec(&body).unwrap();
    service.route(&Method::POST, "/allocate", query, &bytes)
}

#[tokio::test]
async fn test_allocate_first_fit() {
    let response = post_allocate(
        &service(),
        json!({
            "blockSizes": [100, 500, 200, 300, 600],
            "processSizes": [212, 417, 112, 426],
            "allocationType": "first-fit"
        }),
        None,
    );

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let body: AllocationResponse = serde_json::from_value(body_json(response).await).unwrap();
    assert_eq!(body.allocations, vec![1, 4, 1, -1]);
    assert_eq!(body.remaining_blocks, vec![100, 176, 200, 300, 183]);
    assert_eq!(body.fragmentations.len(), 4);
    assert_eq!(body.fragmentations[1], vec![100, 288, 200, 300, 183]);
}

#[tokio::test]
async fn test_allocate_empty_lists() {
    let response = post_allocate(
        &service(),
        json!({ "blockSizes": [], "processSizes": [10], "allocationType": "next-fit" }),
        None,
    );
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["allocations"], json!([-1]));
    assert_eq!(body["remainingBlocks"], json!([]));
    assert_eq!(body["fragmentations"], json!([[]]));
}

#[tokio::test]
async fn test_allocate_detail() {
    let response = post_allocate(
        &service(),
        json!({
            "blockSizes": [100, 500],
            "processSizes": [50, 40, 600],
            "allocationType": "best-fit"
        }),
        Some("detail=true"),
    );
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["allocations"], json!([0, 0, -1]));
    assert_eq!(body["allocationType"], "best-fit");
    assert_eq!(body["stats"]["assigned"], 2);
    assert_eq!(body["stats"]["rejected"], 1);
    assert_eq!(body["blocks"][0]["processes"], json!([0, 1]));
    assert_eq!(body["blocks"][0]["remaining"], 10);
}

#[tokio::test]
async fn test_negative_size_is_bad_request() {
    let response = post_allocate(
        &service(),
        json!({ "blockSizes": [100, -1], "processSizes": [5], "allocationType": "first-fit" }),
        None,
    );
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_input");
    assert!(body["message"].as_str().unwrap().contains("block 2"));
}

#[tokio::test]
async fn test_non_numeric_size_is_bad_request() {
    // parseInt("") on the form side serialises as null
    let response = post_allocate(
        &service(),
        json!({ "blockSizes": [100], "processSizes": [null], "allocationType": "first-fit" }),
        None,
    );
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "invalid_input");
}

#[tokio::test]
async fn test_unknown_strategy_is_bad_request() {
    let response = post_allocate(
        &service(),
        json!({ "blockSizes": [100], "processSizes": [5], "allocationType": "buddy" }),
        None,
    );
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "unknown_strategy");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let response = service().route(&Method::POST, "/allocate", None, b"{ not json");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "malformed_json");

    let response = post_allocate(&service(), json!({ "blockSizes": [1] }), None);
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_limits_enforced() {
    let mut config = BlockfitConfig::default();
    config.limits.max_processes = 2;
    let service = AllocationService::new(config);

    let response = post_allocate(
        &service,
        json!({ "blockSizes": [100], "processSizes": [1, 2, 3], "allocationType": "first-fit" }),
        None,
    );
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "limit_exceeded");
}

#[tokio::test]
async fn test_strategies_and_health() {
    let response = service().route(&Method::GET, "/strategies", None, b"");
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["first-fit", "best-fit", "worst-fit", "next-fit", "last-fit"]
    );

    let response = service().route(&Method::GET, "/health", None, b"");
    assert_eq!(body_json(response).await, json!({ "status": "ok" }));
}

#[tokio::test]
async fn test_handle_reads_body() {
    let body = json!({
        "blockSizes": [100, 500],
        "processSizes": [450],
        "allocationType": "worst-fit"
    });
    let request = Request::builder()
        .method(Method::POST)
        .uri("/allocate")
        .body(Full::new(Bytes::from(serde_json::to_vec(&body).unwrap())))
        .unwrap();

    let response = service().handle(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["allocations"], json!([1]));
}

#[tokio::test]
async fn test_handle_rejects_oversized_body() {
    let mut config = BlockfitConfig::default();
    config.limits.max_body_bytes = 16;
    let service = AllocationService::new(config);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/allocate")
        .body(Full::new(Bytes::from(vec![b' '; 64])))
        .unwrap();

    let response = service.handle(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body_json(response).await["error"], "body_too_large");
}

#[tokio::test]
async fn test_custom_origin() {
    let mut config = BlockfitConfig::default();
    config.server.allow_origin = "http://localhost:3000".to_string();
    let service = AllocationService::new(config);

    let response = service.route(&Method::OPTIONS, "/allocate", None, b"");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "http://localhost:3000"
    );
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}

#[tokio::test]
async fn test_allocate_near_u64_max_capacities() {
    let response = post_allocate(
        &service(),
        json!({
            "blockSizes": [u64::MAX, 1],
            "processSizes": [u64::MAX, 2],
            "allocationType": "worst-fit"
        }),
        Some("detail=true"),
    );
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let text = std::str::from_utf8(&bytes).unwrap();
    assert!(text.contains("\"totalCapacity\":18446744073709551616"));
    assert!(text.contains("\"totalAllocated\":18446744073709551615"));

    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["allocations"], json!([0, -1]));
    assert_eq!(body["remainingBlocks"], json!([0, 1]));
    assert_eq!(body["stats"]["rejected"], 1);
}
