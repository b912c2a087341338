//! Server-rendered HTML pages. The pages call the JSON API from the browser.

use std::fmt::Write as _;

use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use chrono::Local;
use zpl_labeler_catalog::{Catalog, DEFAULT_SHELF_LIFE_MONTHS, suggest_best_before};
use zpl_labeler_print_client::{PrinterSettings, Transport};

use crate::state::AppState;

pub(super) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/config", get(config_page))
}

/// GET /
async fn index(State(state): State<AppState>) -> Html<String> {
    let best_before = suggest_best_before(Local::now().date_naive(), DEFAULT_SHELF_LIFE_MONTHS)
        .format("%Y-%m-%d")
        .to_string();
    Html(render_index(&state.catalog, &best_before))
}

/// GET /config
async fn config_page(State(state): State<AppState>) -> Html<String> {
    Html(render_config(&state.printer.snapshot()))
}

/// Escape text for use in HTML content and double-quoted attributes.
fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = "<style>
body { font-family: sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }
label { display: block; margin-top: 0.75rem; }
input, select { width: 100%; padding: 0.3rem; }
button { margin-top: 1rem; margin-right: 0.5rem; padding: 0.4rem 1rem; }
pre { background: #f4f4f4; padding: 0.75rem; overflow-x: auto; }
.success { color: #186a1e; } .error { color: #a01818; } .info { color: #1a4e8a; }
</style>";

fn page_head(out: &mut String, title: &str) {
    out.push_str("<!DOCTYPE html>\n<html lang=\"sv\">\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(out, "<title>{}</title>", escape_html(title));
    out.push_str(STYLE);
    out.push_str("\n</head>\n<body>\n");
}

// ── Product selection ───────────────────────────────────────────────────

const INDEX_SCRIPT: &str = r#"<script>
let lastZpl = null;
function show(result) {
  const el = document.getElementById('result');
  el.className = result.status;
  el.textContent = result.message || result.status;
}
async function postJson(url, body) {
  const res = await fetch(url, {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify(body),
  });
  return res.json();
}
function labelRequest() {
  return {
    sku: document.getElementById('sku').value,
    best_before: document.getElementById('best_before').value,
    batch: document.getElementById('batch').value || null,
    quantity: document.getElementById('quantity').value,
  };
}
async function generate() {
  const result = await postJson('/api/generate-zpl', labelRequest());
  if (result.status === 'success') {
    lastZpl = result.zpl_code;
    document.getElementById('zpl').textContent = result.zpl_code;
    show({ status: 'info', message: 'Label generated (' + result.label_type + ')' });
  } else {
    show(result);
  }
  return result;
}
async function printLabel() {
  const generated = await generate();
  if (generated.status !== 'success') return;
  show(await postJson('/api/print', { zpl_code: lastZpl, quantity: generated.quantity }));
}
</script>"#;

fn render_index(catalog: &Catalog, best_before: &str) -> String {
    let mut out = String::new();
    page_head(&mut out, "Label printing");
    out.push_str("<h1>Label printing</h1>\n<p><a href=\"/config\">Printer settings</a></p>\n");

    if !catalog.common.is_empty() {
        out.push_str("<dl>\n");
        for (key, value) in &catalog.common {
            let text = value
                .as_str()
                .map_or_else(|| serde_json::to_string(value).unwrap_or_default(), str::to_owned);
            let _ = writeln!(
                out,
                "<dt>{}</dt><dd>{}</dd>",
                escape_html(key),
                escape_html(&text)
            );
        }
        out.push_str("</dl>\n");
    }

    out.push_str("<label for=\"sku\">Product</label>\n<select id=\"sku\">\n");
    for (group, products) in catalog.grouped() {
        let _ = writeln!(out, "<optgroup label=\"{}\">", escape_html(group.title()));
        for (sku, product) in products {
            let _ = writeln!(
                out,
                "<option value=\"{}\">{} ({}) - {}</option>",
                escape_html(sku),
                escape_html(&product.name),
                escape_html(&product.weight),
                escape_html(sku)
            );
        }
        out.push_str("</optgroup>\n");
    }
    out.push_str("</select>\n");

    let _ = writeln!(
        out,
        "<label for=\"best_before\">Best before</label>\n\
         <input id=\"best_before\" type=\"date\" value=\"{}\">",
        escape_html(best_before)
    );
    out.push_str(
        "<label for=\"batch\">Batch (optional)</label>\n<input id=\"batch\" type=\"text\">\n\
         <label for=\"quantity\">Quantity</label>\n\
         <input id=\"quantity\" type=\"number\" min=\"1\" value=\"1\">\n\
         <button onclick=\"generate()\">Preview</button>\
         <button onclick=\"printLabel()\">Print</button>\n\
         <p id=\"result\"></p>\n<pre id=\"zpl\"></pre>\n",
    );
    out.push_str(INDEX_SCRIPT);
    out.push_str("\n</body>\n</html>\n");
    out
}

// ── Printer configuration ───────────────────────────────────────────────

const CONFIG_SCRIPT: &str = r#"<script>
function show(result) {
  const el = document.getElementById('result');
  el.className = result.status;
  el.textContent = result.message || result.status;
}
async function postJson(url, body) {
  const res = await fetch(url, {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify(body),
  });
  return res.json();
}
async function save() {
  const ip = document.getElementById('ip').value.trim();
  show(await postJson('/api/config/printer', {
    type: document.getElementById('type').value,
    ip: ip === '' ? null : ip,
    port: document.getElementById('port').value,
    printer_name: document.getElementById('printer_name').value,
  }));
}
async function testConnection() {
  show(await postJson('/api/test-connection', {}));
}
</script>"#;

fn render_config(settings: &PrinterSettings) -> String {
    let mut out = String::new();
    page_head(&mut out, "Printer settings");
    out.push_str("<h1>Printer settings</h1>\n<p><a href=\"/\">Back to labels</a></p>\n");

    out.push_str("<label for=\"type\">Connection</label>\n<select id=\"type\">\n");
    for (transport, label) in [
        (Transport::Usb, "USB / print queue"),
        (Transport::Network, "Network (TCP 9100)"),
        (Transport::File, "Export to file"),
    ] {
        let selected = if settings.transport == transport {
            " selected"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "<option value=\"{}\"{selected}>{label}</option>",
            transport.as_str()
        );
    }
    out.push_str("</select>\n");

    let _ = writeln!(
        out,
        "<label for=\"ip\">IP address</label>\n\
         <input id=\"ip\" type=\"text\" value=\"{}\">\n\
         <label for=\"port\">Port</label>\n\
         <input id=\"port\" type=\"number\" value=\"{}\">\n\
         <label for=\"printer_name\">Printer name</label>\n\
         <input id=\"printer_name\" type=\"text\" value=\"{}\">",
        escape_html(settings.ip.as_deref().unwrap_or_default()),
        settings.port,
        escape_html(&settings.printer_name)
    );
    out.push_str(
        "<button onclick=\"save()\">Save</button>\
         <button onclick=\"testConnection()\">Test connection</button>\n\
         <p id=\"result\"></p>\n",
    );
    out.push_str(CONFIG_SCRIPT);
    out.push_str("\n</body>\n</html>\n");
    out
}
