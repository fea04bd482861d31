mod common;

#[tokio::test]
async fn test_health_endpoint_success() {
    let server = common::empty_server();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["checks"]["rate_limiter"]["status"], "ok");
}

#[tokio::test]
async fn test_unknown_path_is_json_404() {
    let server = common::empty_server();

    let response = server.get("/nowhere").await;

    response.assert_status_not_found();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"], "Not found");
    assert_eq!(json["details"]["path"], "/nowhere");
}
