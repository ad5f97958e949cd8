use actix_web::http::header;
use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::invoice::form::{FormTotals, ReceiptForm};
use crate::invoice::model::{Invoice, InvoiceData, TerbilangResponse};
use crate::invoice::validation::Validator;
use crate::pdf::common::format_indonesian_date;
use crate::pdf::Disposition;
use crate::{metrics, terbilang, AppState, ErrorResponse};

const SAMPLE_RECEIPT_NO: &str = "INV-001";

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PdfQuery {
    /// Receipt number of a stored invoice. Omit to preview the sample receipt.
    pub id: Option<String>,
}

#[derive(Deserialize, Debug, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TerbilangQuery {
    /// Whole rupiah amount.
    pub amount: i64,
}

/// What the form would submit for the current input.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct FormPreview {
    pub totals: FormTotals,
    pub invoice: InvoiceData,
}

async fn render_pdf_response(
    state: &web::Data<AppState>,
    data: InvoiceData,
    disposition: Disposition,
    failure_message: &str,
) -> HttpResponse {
    let renderer = state.renderer.clone();
    let receipt_no = data.receipt_no.clone();

    let error = match web::block(move || renderer.render(&data)).await {
        Ok(Ok(document)) => {
            return HttpResponse::Ok()
                .content_type("application/pdf")
                .insert_header((
                    header::CONTENT_DISPOSITION,
                    disposition.header_value(&document.filename),
                ))
                .body(document.pdf);
        }
        Ok(Err(e)) => e.to_string(),
        Err(e) => e.to_string(),
    };

    log::error!("Failed to render receipt {}: {}", receipt_no, error);
    metrics::PDF_RENDER_FAILURES.inc();
    HttpResponse::InternalServerError().json(ErrorResponse::internal_error(failure_message))
}

#[utoipa::path(
    get,
    path = "/api/invoices",
    tag = "Invoice",
    responses(
        (status = 200, description = "Stored invoices, newest first", body = Vec<Invoice>),
        (status = 500, description = "Store unavailable", body = ErrorResponse)
    )
)]
pub async fn get_invoices(state: web::Data<AppState>) -> impl Responder {
    match state.get_invoice_history().await {
        Ok(history) => HttpResponse::Ok().json(history),
        Err(e) => {
            log::error!("Failed to fetch invoices: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Failed to fetch invoices"))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/pdf",
    tag = "Invoice",
    params(PdfQuery),
    responses(
        (status = 200, description = "Receipt PDF shown inline"),
        (status = 404, description = "Unknown receipt number", body = ErrorResponse),
        (status = 500, description = "Rendering failed", body = ErrorResponse)
    )
)]
pub async fn get_invoice_pdf(
    state: web::Data<AppState>,
    query: web::Query<PdfQuery>,
) -> impl Responder {
    let data = match query.into_inner().id.filter(|id| !id.trim().is_empty()) {
        None => InvoiceData::sample(SAMPLE_RECEIPT_NO),
        Some(receipt_no) => match state.find_invoice(&receipt_no).await {
            Ok(Some(invoice)) => invoice.to_data(),
            Ok(None) => {
                return HttpResponse::NotFound().json(ErrorResponse::not_found(&format!(
                    "Invoice {} not found",
                    receipt_no
                )));
            }
            Err(e) => {
                log::error!("Failed to load invoice {}: {}", receipt_no, e);
                return HttpResponse::InternalServerError()
                    .json(ErrorResponse::internal_error("Failed to generate PDF"));
            }
        },
    };

    render_pdf_response(&state, data, Disposition::Inline, "Failed to generate PDF").await
}

#[utoipa::path(
    post,
    path = "/api/pdf",
    tag = "Invoice",
    request_body = InvoiceData,
    responses(
        (status = 200, description = "Invoice saved and receipt PDF returned as a download"),
        (status = 400, description = "Invalid invoice", body = ErrorResponse),
        (status = 500, description = "Rendering failed", body = ErrorResponse)
    )
)]
pub async fn create_invoice_pdf(
    state: web::Data<AppState>,
    body: web::Json<InvoiceData>,
) -> impl Responder {
    let mut data = body.into_inner();

    if let Err(message) = data.validate() {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&message));
    }
    if let Err(e) = data.fill_amount_in_words() {
        return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&e.to_string()));
    }

    // A failed save still returns the PDF so staff are never left without a receipt.
    match state.save_invoice(&data).await {
        Ok(invoice) => {
            log::info!("Invoice saved to database: {}", invoice.receipt_no);
            metrics::INVOICES_SAVED.inc();
        }
        Err(e) => {
            log::error!("Database insertion error for {}: {}", data.receipt_no, e);
            metrics::INVOICE_SAVE_FAILURES.inc();
        }
    }

    render_pdf_response(
        &state,
        data,
        Disposition::Attachment,
        "Failed to generate PDF from POST data",
    )
    .await
}

#[utoipa::path(
    get,
    path = "/api/terbilang",
    tag = "Invoice",
    params(TerbilangQuery),
    responses(
        (status = 200, description = "Amount spelled in Indonesian", body = TerbilangResponse),
        (status = 400, description = "Amount is negative or too large", body = ErrorResponse)
    )
)]
pub async fn get_terbilang(query: web::Query<TerbilangQuery>) -> impl Responder {
    let amount = query.amount;
    match terbilang::convert_signed(amount) {
        Ok(words) => HttpResponse::Ok().json(TerbilangResponse { amount, words }),
        Err(e) => HttpResponse::BadRequest().json(ErrorResponse::bad_request(&e.to_string())),
    }
}

#[utoipa::path(
    post,
    path = "/api/invoices/preview",
    tag = "Invoice",
    request_body = ReceiptForm,
    responses(
        (status = 200, description = "Totals and the payload the form would submit", body = FormPreview),
        (status = 400, description = "Total is too large to spell", body = ErrorResponse)
    )
)]
pub async fn preview_form(
    state: web::Data<AppState>,
    body: web::Json<ReceiptForm>,
) -> impl Responder {
    let mut form = body.into_inner();
    if form.optometrist.trim().is_empty() {
        form.optometrist = state.config.clinic.optometrist.clone();
    }

    let totals = match form.totals() {
        Ok(totals) => totals,
        Err(e) => return HttpResponse::BadRequest().json(ErrorResponse::bad_request(&e.to_string())),
    };

    let clinic = &state.config.clinic;
    match form.into_invoice_data(&clinic.location, &format_indonesian_date(), &clinic.receiver) {
        Ok(invoice) => HttpResponse::Ok().json(FormPreview { totals, invoice }),
        Err(e) => HttpResponse::BadRequest().json(ErrorResponse::bad_request(&e.to_string())),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/invoices").route(web::get().to(get_invoices)))
        .service(web::resource("/invoices/preview").route(web::post().to(preview_form)))
        .service(
            web::resource("/pdf")
                .route(web::get().to(get_invoice_pdf))
                .route(web::post().to(create_invoice_pdf)),
        )
        .service(web::resource("/terbilang").route(web::get().to(get_terbilang)));
}
