use axum::{
    extract::State,
    response::{Json, Redirect},
    Form,
};
use common::{BarcodeLookupForm, BarcodeScanForm};
use serde::Serialize;
use tower_sessions::Session;
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::handlers::accounts::DASHBOARD_PATH;
use crate::messages::{self, FlashMessage, MessageLevel};
use crate::middleware::RequireAuth;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use crate::services::{ServiceError, barcode, categories, customers};
use crate::views::{CategoryView, CustomerView, GoodsView};

pub const SCANNER_PATH: &str = "/barcode_scanner/";
pub const PRODUCT_ADDED: &str = "Product added successfully!";
pub const PRODUCT_NOT_FOUND: &str = "Product not found.";

/// Scanner page: the choices for the scan form and pending messages.
#[derive(Debug, Serialize, ToSchema)]
pub struct BarcodeScannerView {
    pub categories: Vec<CategoryView>,
    pub customers: Vec<CustomerView>,
    pub messages: Vec<FlashMessage>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BarcodeRetrieveView {
    /// The barcode looked up, if any
    pub barcode: Option<String>,
    pub product: Option<GoodsView>,
    pub messages: Vec<FlashMessage>,
}

/// Barcode scanner page
#[utoipa::path(
    get,
    path = "/barcode_scanner/",
    tag = "barcode",
    responses(
        (status = 200, description = "Scanner view model", body = BarcodeScannerView),
        (status = 303, description = "Not logged in; redirect to the login page")
    )
)]
#[instrument(skip(state, session, user), fields(user_id = user.id))]
pub async fn barcode_scanner_page(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<ApiResponse<BarcodeScannerView>>, AppError> {
    let view = BarcodeScannerView {
        categories: categories::list_categories(&state.db, user.id).await?,
        customers: customers::list_customers(&state.db, user.id).await?,
        messages: messages::take(&session).await?,
    };
    Ok(Json(ApiResponse::ok(view)))
}

/// Create a good from a scanned barcode
///
/// The outcome is reported as a flash message on the page redirected to.
#[utoipa::path(
    post,
    path = "/barcode_scanner/",
    tag = "barcode",
    request_body(content = BarcodeScanForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created: redirect to the dashboard. Rejected: redirect back to the scanner"),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, session, user), fields(user_id = user.id))]
pub async fn barcode_scan(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<BarcodeScanForm>,
) -> Result<Redirect, AppError> {
    match barcode::scan_create(&state.db, user.id, form).await {
        Ok(good) => {
            info!("Good {} created from barcode {}", good.id, good.barcode);
            messages::push(&session, MessageLevel::Success, PRODUCT_ADDED).await?;
            Ok(Redirect::to(DASHBOARD_PATH))
        }
        Err(ServiceError::Scan(rejection)) => {
            warn!("Barcode scan rejected: {}", rejection);
            messages::push(&session, MessageLevel::Error, rejection.message()).await?;
            Ok(Redirect::to(SCANNER_PATH))
        }
        Err(e) => Err(e.into()),
    }
}

/// Barcode lookup page
#[utoipa::path(
    get,
    path = "/barcode_retrieve/",
    tag = "barcode",
    responses(
        (status = 200, description = "Empty lookup form", body = BarcodeRetrieveView),
        (status = 303, description = "Not logged in; redirect to the login page")
    )
)]
#[instrument(skip(session, _user))]
pub async fn barcode_retrieve_page(
    RequireAuth(_user): RequireAuth,
    session: Session,
) -> Result<Json<ApiResponse<BarcodeRetrieveView>>, AppError> {
    Ok(Json(ApiResponse::ok(BarcodeRetrieveView {
        barcode: None,
        product: None,
        messages: messages::take(&session).await?,
    })))
}

/// Look up a good by barcode
///
/// When several goods share the barcode the newest is returned.
#[utoipa::path(
    post,
    path = "/barcode_retrieve/",
    tag = "barcode",
    request_body(content = BarcodeLookupForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "The matching good, or a \"Product not found.\" message", body = BarcodeRetrieveView),
        (status = 303, description = "Not logged in; redirect to the login page")
    )
)]
#[instrument(skip(state, session, user), fields(user_id = user.id))]
pub async fn barcode_retrieve(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<BarcodeLookupForm>,
) -> Result<Json<ApiResponse<BarcodeRetrieveView>>, AppError> {
    let barcode = form.barcode.trim().to_string();
    let mut pending = messages::take(&session).await?;

    let product = barcode::lookup(&state.db, user.id, &barcode).await?;
    if product.is_none() {
        debug!("No product for barcode '{}'", barcode);
        pending.push(FlashMessage::new(MessageLevel::Error, PRODUCT_NOT_FOUND));
    }

    Ok(Json(ApiResponse::ok(BarcodeRetrieveView {
        barcode: Some(barcode),
        product,
        messages: pending,
    })))
}
