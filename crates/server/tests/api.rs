//! HTTP API tests driving the router in-process with `oneshot`.

use std::path::PathBuf;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt; // for `oneshot`
use zpl_labeler_catalog::load_catalog_from_str;
use zpl_labeler_print_client::{
    DispatchConfig, Dispatcher, PrinterSettings, Transport, UnsupportedQueue,
};
use zpl_labeler_server::{AppState, build_router};

const CATALOG: &str = r#"
products:
  AB-HONEY-250:
    name_sv: Akaciahonung
    weight: 250 g
    disposal_sv: Glas återvinns
    qr_url: https://example.com/ab-honey-250
    producer: Biodlarna AB
    importer: Import AB
    origin: Sverige
    label_type: type_qr_57x32
    batch: L2405
  NAT-OIL-500:
    name_sv: Olivolja
    weight: 500 ml
    disposal_sv: Glas återvinns
    qr_url: https://example.com/nat-oil-500
    producer: Natura
    importer: Import AB
    origin: Grekland
    label_type: type_qr_57x32
common:
  company: Import AB
"#;

const TEMPLATE: &str = "^XA\n^FO10,10^FD{product_name}^FS\n^FO10,40^FD{weight}^FS\n\
^FO10,70^FDBF {best_before}^FS\n^FO10,100^FDLOT {batch}^FS\n^XZ\n";

// ── Fixture ─────────────────────────────────────────────────────────────

struct TestApp {
    router: Router,
    dir: TempDir,
}

impl TestApp {
    fn new() -> Self {
        Self::with_template(Some(TEMPLATE))
    }

    fn with_template(template: Option<&str>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let template_path = dir.path().join("label.zpl");
        if let Some(text) = template {
            std::fs::write(&template_path, text).unwrap();
        }
        let export_dir = dir.path().join("exports");
        std::fs::create_dir(&export_dir).unwrap();

        let mut config = DispatchConfig::default();
        config.export_dir = export_dir;
        let dispatcher = Dispatcher::new(Box::new(UnsupportedQueue::new("test")), config);

        let settings = PrinterSettings {
            transport: Transport::File,
            ..PrinterSettings::default()
        };
        let catalog = load_catalog_from_str(CATALOG).unwrap();
        let state = AppState::new(catalog, template_path, dispatcher, settings);

        Self {
            router: build_router(state),
            dir,
        }
    }

    fn template_path(&self) -> PathBuf {
        self.dir.path().join("label.zpl")
    }

    fn export_dir(&self) -> PathBuf {
        self.dir.path().join("exports")
    }

    async fn get(&self, uri: &str) -> (StatusCode, String) {
        let req = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(req).await
    }

    async fn get_json(&self, uri: &str) -> (StatusCode, Value) {
        let (status, body) = self.get(uri).await;
        (status, serde_json::from_str(&body).unwrap())
    }

    async fn post_raw(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, body) = self.send(req).await;
        (status, serde_json::from_str(&body).unwrap())
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.post_raw(uri, &body.to_string()).await
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, String) {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }
}

// ── Products ────────────────────────────────────────────────────────────

#[tokio::test]
async fn known_product_returns_catalog_fields() {
    let app = TestApp::new();
    let (status, body) = app.get_json("/api/product/AB-HONEY-250").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["product"]["name_sv"], "Akaciahonung");
    assert_eq!(body["product"]["weight"], "250 g");
    assert_eq!(body["product"]["batch"], "L2405");
}

#[tokio::test]
async fn unknown_product_is_404() {
    let app = TestApp::new();
    let (status, body) = app.get_json("/api/product/NOPE").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body,
        json!({ "status": "error", "message": "Product not found" })
    );
}

// ── Label generation ────────────────────────────────────────────────────

#[tokio::test]
async fn generate_uses_catalog_batch_when_none_given() {
    let app = TestApp::new();
    let (status, body) = app
        .post(
            "/api/generate-zpl",
            json!({ "sku": "AB-HONEY-250", "best_before": "2026-06-01" }),
        )
        .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["status"], "success");
    assert_eq!(body["quantity"], 1);
    assert_eq!(body["label_type"], "type_qr_57x32");
    assert_eq!(
        body["zpl_code"],
        "^XA\n^FO10,10^FDAkaciahonung^FS\n^FO10,40^FD250 g^FS\n\
         ^FO10,70^FDBF 2026-06-01^FS\n^FO10,100^FDLOT L2405^FS\n^XZ\n"
    );
}

#[tokio::test]
async fn generate_batch_precedence() {
    let app = TestApp::new();

    let (_, body) = app
        .post(
            "/api/generate-zpl",
            json!({ "sku": "AB-HONEY-250", "best_before": "2026-06-01", "batch": "X9", "quantity": "2" }),
        )
        .await;
    assert!(body["zpl_code"].as_str().unwrap().contains("LOT X9^FS"));
    assert_eq!(body["quantity"], 2);

    let (_, body) = app
        .post(
            "/api/generate-zpl",
            json!({ "sku": "AB-HONEY-250", "best_before": "2026-06-01", "batch": "  " }),
        )
        .await;
    assert!(body["zpl_code"].as_str().unwrap().contains("LOT L2405^FS"));

    let (_, body) = app
        .post(
            "/api/generate-zpl",
            json!({ "sku": "NAT-OIL-500", "best_before": "2026-06-01" }),
        )
        .await;
    assert!(body["zpl_code"].as_str().unwrap().contains("LOT NAT-OIL-500^FS"));
}

#[tokio::test]
async fn generate_rejects_bad_requests() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/api/generate-zpl", json!({ "sku": "NOPE", "best_before": "2026-06-01" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Product not found");

    let (status, body) = app
        .post("/api/generate-zpl", json!({ "sku": "AB-HONEY-250" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Missing field: best_before");
}

#[tokio::test]
async fn generate_without_template_is_500() {
    let app = TestApp::with_template(None);
    let (status, body) = app
        .post(
            "/api/generate-zpl",
            json!({ "sku": "AB-HONEY-250", "best_before": "2026-06-01" }),
        )
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body["message"],
        format!("Template not found: {}", app.template_path().display())
    );
}

#[tokio::test]
async fn generate_with_unknown_template_field_is_500() {
    let app = TestApp::with_template(Some("^XA^FD{lot_number}^FS^XZ"));
    let (status, body) = app
        .post(
            "/api/generate-zpl",
            json!({ "sku": "AB-HONEY-250", "best_before": "2026-06-01" }),
        )
        .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Template references unknown field: lot_number");
}

#[tokio::test]
async fn malformed_json_is_400_envelope() {
    let app = TestApp::new();
    let (status, body) = app.post_raw("/api/generate-zpl", "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
}

// ── Printing ────────────────────────────────────────────────────────────

#[tokio::test]
async fn print_requires_zpl() {
    let app = TestApp::new();
    for payload in [json!({}), json!({ "zpl_code": "" })] {
        let (status, body) = app.post("/api/print", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({ "status": "error", "message": "No ZPL code provided" })
        );
    }
}

#[tokio::test]
async fn print_to_file_writes_every_copy() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/api/print", json!({ "zpl_code": "^XA^FS^XZ", "quantity": 3 }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success", "{body}");
    assert_eq!(body["zpl_code"], "^XA^FS^XZ");
    let filename = body["filename"].as_str().unwrap();
    assert!(filename.starts_with("label_") && filename.ends_with(".zpl"));
    assert_eq!(body["message"], format!("ZPL exported to {filename}"));

    let written =
        std::fs::read_to_string(app.export_dir().join(filename)).unwrap();
    assert_eq!(
        written,
        "# Label 1/3\n^XA^FS^XZ\n\n# Label 2/3\n^XA^FS^XZ\n\n# Label 3/3\n^XA^FS^XZ\n\n"
    );
}

#[tokio::test]
async fn dispatch_failures_are_reported_with_200() {
    let app = TestApp::new();
    app.post("/api/config/printer", json!({ "type": "bluetooth" }))
        .await;

    let (status, body) = app.post("/api/print", json!({ "zpl_code": "^XA^XZ" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "status": "error", "message": "Unknown connection type: bluetooth" })
    );

    app.post("/api/config/printer", json!({ "type": "network", "ip": null }))
        .await;
    let (status, body) = app.post("/api/print", json!({ "zpl_code": "^XA^XZ" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "IP address not configured");
}

// ── Printer configuration ───────────────────────────────────────────────

#[tokio::test]
async fn config_roundtrip_and_partial_update() {
    let app = TestApp::new();

    let (status, body) = app.get_json("/api/config/printer").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["config"]["type"], "file");
    assert_eq!(body["config"]["port"], 9100);

    let (status, body) = app
        .post(
            "/api/config/printer",
            json!({ "type": "network", "ip": "192.168.1.100" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Configuration updated");
    assert_eq!(body["config"]["ip"], "192.168.1.100");

    // Only the port changes; everything else is kept.
    let (_, body) = app
        .post("/api/config/printer", json!({ "port": "6101" }))
        .await;
    assert_eq!(body["config"]["type"], "network");
    assert_eq!(body["config"]["ip"], "192.168.1.100");
    assert_eq!(body["config"]["port"], 6101);

    // Explicit null clears the address.
    let (_, body) = app.post("/api/config/printer", json!({ "ip": null })).await;
    assert_eq!(body["config"]["ip"], Value::Null);
    assert_eq!(body["config"]["port"], 6101);

    let (_, body) = app.get_json("/api/config/printer").await;
    assert_eq!(body["config"]["type"], "network");
    assert_eq!(body["config"]["ip"], Value::Null);
}

#[tokio::test]
async fn config_rejects_out_of_range_port() {
    let app = TestApp::new();
    let (status, body) = app
        .post("/api/config/printer", json!({ "port": 70000 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid port: 70000");

    let (_, body) = app.get_json("/api/config/printer").await;
    assert_eq!(body["config"]["port"], 9100);
}

#[tokio::test]
async fn test_connection_follows_transport() {
    let app = TestApp::new();
    let (status, body) = app.post("/api/test-connection", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "status": "success", "message": "File export mode - no connection needed" })
    );

    app.post("/api/config/printer", json!({ "type": "usb" })).await;
    let (_, body) = app.post("/api/test-connection", json!({})).await;
    assert_eq!(body["status"], "info");
}

// ── Pages ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn pages_render() {
    let app = TestApp::new();

    let (status, html) = app.get("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("AB-HONEY-250"));
    assert!(html.contains("Olive oil"));

    let (status, html) = app.get("/config").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<option value=\"file\" selected>"));
}
