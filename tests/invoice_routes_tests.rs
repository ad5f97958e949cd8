mod common;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use serde_json::{json, Value};
use std::sync::Arc;

use common::{memory_state, state_with, FailingRenderer, FakeRenderer, UnavailableRepository};
use optik_invoice_server::invoice::model::InvoiceData;
use optik_invoice_server::storage::{InMemoryInvoiceRepository, InvoiceRepository};
use optik_invoice_server::{configure_app, AppState};

fn invoice_json(receipt_no: &str) -> Value {
    json!({
        "receiptNo": receipt_no,
        "receivedFrom": "Fajar",
        "patientName": "Sidik",
        "optometrist": "Prasetio",
        "items": [
            { "label": "Jenis Frame", "details": "Titanium", "amount": 130000 },
            { "label": "Jenis Lensa", "details": "Photochromic", "amount": 350000 }
        ],
        "totalAmount": 480000,
        "location": "Bekasi",
        "date": "1 Agustus 2025",
        "receiver": "Nursafaat, Amd.RO"
    })
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .configure(configure_app),
        )
        .await
    };
}

fn content_disposition(resp: &actix_web::dev::ServiceResponse) -> String {
    resp.headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[actix_web::test]
async fn test_post_pdf_saves_invoice_and_downloads() {
    let (state, repository): (AppState, Arc<InMemoryInvoiceRepository>) = memory_state();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/pdf")
        .set_json(invoice_json("INV-100"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/pdf"
    );
    assert_eq!(
        content_disposition(&resp),
        r#"attachment; filename="invoice-INV-100.pdf""#
    );

    let body = test::read_body(resp).await;
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.starts_with("%PDF"));
    assert!(body.contains("Empat Ratus Delapan Puluh Ribu Rupiah"));

    let stored = repository.find_by_receipt_no("INV-100").await.unwrap().unwrap();
    assert_eq!(stored.total_amount, 480_000);
    assert_eq!(stored.amount_in_words, "Empat Ratus Delapan Puluh Ribu Rupiah");
    assert_eq!(stored.items.len(), 2);
}

#[actix_web::test]
async fn test_history_lists_newest_first() {
    let (state, _) = memory_state();
    let app = init_app!(state);

    for receipt_no in ["INV-001", "INV-002", "INV-003"] {
        let req = test::TestRequest::post()
            .uri("/api/pdf")
            .set_json(invoice_json(receipt_no))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    let req = test::TestRequest::get().uri("/api/invoices").to_request();
    let history: Vec<Value> = test::call_and_read_body_json(&app, req).await;

    let receipts: Vec<&str> = history
        .iter()
        .map(|invoice| invoice["receiptNo"].as_str().unwrap())
        .collect();
    assert_eq!(receipts, vec!["INV-003", "INV-002", "INV-001"]);
    assert_eq!(history[0]["patientName"], "Sidik");
    assert_eq!(history[0]["totalAmount"], 480000);
}

#[actix_web::test]
async fn test_history_reflects_new_invoice_after_cache_warmup() {
    let (state, _) = memory_state();
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/invoices").to_request();
    let empty: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert!(empty.is_empty());

    let req = test::TestRequest::post()
        .uri("/api/pdf")
        .set_json(invoice_json("INV-200"))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get().uri("/api/invoices").to_request();
    let history: Vec<Value> = test::call_and_read_body_json(&app, req).await;
    assert_eq!(history.len(), 1);
}

#[actix_web::test]
async fn test_get_pdf_renders_stored_invoice_inline() {
    let (state, _) = memory_state();
    state
        .save_invoice(&InvoiceData::sample("INV-300"))
        .await
        .unwrap();
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/pdf?id=INV-300").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        content_disposition(&resp),
        r#"inline; filename="invoice-INV-300.pdf""#
    );
}

#[actix_web::test]
async fn test_get_pdf_without_id_previews_sample() {
    let (state, _) = memory_state();
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/pdf").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        content_disposition(&resp),
        r#"inline; filename="invoice-INV-001.pdf""#
    );
}

#[actix_web::test]
async fn test_get_pdf_unknown_receipt_is_not_found() {
    let (state, _) = memory_state();
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/pdf?id=INV-404").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "NotFound");
    assert!(body["message"].as_str().unwrap().contains("INV-404"));
}

#[actix_web::test]
async fn test_post_pdf_rejects_missing_fields() {
    let (state, repository) = memory_state();
    let app = init_app!(state);

    let mut payload = invoice_json("");
    payload["patientName"] = json!("");
    let req = test::TestRequest::post()
        .uri("/api/pdf")
        .set_json(payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "BadRequest");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("No Transaksi tidak boleh kosong"));
    assert!(message.contains("Nama Pasien tidak boleh kosong"));

    assert!(repository.list_recent().await.unwrap().is_empty());
}

#[actix_web::test]
async fn test_post_pdf_keeps_supplied_words() {
    let (state, repository) = memory_state();
    let app = init_app!(state);

    let mut payload = invoice_json("INV-500");
    payload["amountInWords"] = json!("Empat Ratus Delapan Puluh Ribu RUpiah");
    let req = test::TestRequest::post()
        .uri("/api/pdf")
        .set_json(payload)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    let stored = repository.find_by_receipt_no("INV-500").await.unwrap().unwrap();
    assert_eq!(stored.amount_in_words, "Empat Ratus Delapan Puluh Ribu RUpiah");
}

#[actix_web::test]
async fn test_post_pdf_still_downloads_when_save_fails() {
    let (state, _) = memory_state();
    let app = init_app!(state);

    // Second submission collides on the unique receipt number.
    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/pdf")
            .set_json(invoice_json("INV-600"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    let state = state_with(Arc::new(UnavailableRepository), Arc::new(FakeRenderer));
    let app = init_app!(state);
    let req = test::TestRequest::post()
        .uri("/api/pdf")
        .set_json(invoice_json("INV-601"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(content_disposition(&resp).starts_with("attachment;"));
}

#[actix_web::test]
async fn test_render_failure_returns_error_body() {
    let state = state_with(Arc::new(InMemoryInvoiceRepository::new()), Arc::new(FailingRenderer));
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/pdf")
        .set_json(invoice_json("INV-700"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Failed to generate PDF from POST data");

    let req = test::TestRequest::get().uri("/api/pdf").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Failed to generate PDF");
}

#[actix_web::test]
async fn test_history_store_failure_is_reported() {
    let state = state_with(Arc::new(UnavailableRepository), Arc::new(FakeRenderer));
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/invoices").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Failed to fetch invoices");
}

#[actix_web::test]
async fn test_terbilang_endpoint() {
    let (state, _) = memory_state();
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/api/terbilang?amount=130000").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["amount"], 130000);
    assert_eq!(body["words"], "Seratus Tiga Puluh Ribu Rupiah");

    let req = test::TestRequest::get().uri("/api/terbilang?amount=-1").to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/terbilang?amount=1000000000000")
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_form_preview_computes_totals() {
    let (state, _) = memory_state();
    let app = init_app!(state);

    let req = test::TestRequest::post()
        .uri("/api/invoices/preview")
        .set_json(json!({
            "transactionNo": "INV-800",
            "receivedFrom": "Fajar",
            "patientName": "Sidik",
            "optometrist": "",
            "frameType": "Titanium",
            "framePrice": "130.000",
            "lensType": "Photochromic",
            "lensPrice": "350000"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["totals"]["total"], 480000);
    assert_eq!(body["totals"]["totalFormatted"], "480.000");
    assert_eq!(body["totals"]["inWords"], "Empat Ratus Delapan Puluh Ribu Rupiah");
    assert_eq!(body["invoice"]["optometrist"], "Kholidin, A.Md.RO");
    assert_eq!(body["invoice"]["location"], "Bekasi");
    assert_eq!(body["invoice"]["items"][0]["amount"], 130000);
    assert_eq!(body["invoice"]["items"][1]["details"], "Photochromic");

    let req = test::TestRequest::post()
        .uri("/api/invoices/preview")
        .set_json(json!({
            "transactionNo": "INV-801",
            "receivedFrom": "Fajar",
            "patientName": "Sidik",
            "frameType": "Titanium",
            "framePrice": "99.999.999.999.999.999.999",
            "lensType": "Photochromic",
            "lensPrice": "350000"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().contains("exceeds the supported maximum"));
}

#[actix_web::test]
async fn test_health_and_metrics() {
    let (state, _) = memory_state();
    let app = init_app!(state);

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");

    let req = test::TestRequest::get().uri("/metrics/invoices").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = test::read_body(resp).await;
    assert!(String::from_utf8_lossy(&body).contains("pdf_render_failures_total"));
}
