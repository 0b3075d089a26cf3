use crate::handlers::{
    accounts::{home, login, login_page, logout, signup, signup_page},
    barcode::{barcode_retrieve, barcode_retrieve_page, barcode_scan, barcode_scanner_page},
    categories::{category_list, create_category, delete_category, edit_category, edit_category_page},
    customers::{create_customer, customer_list, delete_customer, edit_customer, edit_customer_page},
    dashboard::{dashboard_page, dashboard_submit},
    goods::{delete_good, edit_good, edit_good_page, goods_list, search_goods},
    health::health_check,
};
use crate::middleware::create_session_layer;
use crate::schemas::{ApiDoc, AppState};
use axum::{
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Create application router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let session_layer = create_session_layer(&state.settings);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Accounts
        .route("/", get(home))
        .route("/login/", get(login_page).post(login))
        .route("/signup/", get(signup_page).post(signup))
        .route("/logout/", post(logout))
        // Dashboard
        .route("/dashboard/", get(dashboard_page).post(dashboard_submit))
        // Goods
        .route("/goods/", get(goods_list))
        .route("/search/", get(search_goods))
        .route("/edit/:id/", get(edit_good_page).post(edit_good))
        .route("/delete/:id/", post(delete_good))
        // Categories
        .route("/categories/", get(category_list).post(create_category))
        .route("/categories/edit/:id/", get(edit_category_page).post(edit_category))
        .route("/delete-category/:id/", post(delete_category))
        // Customers
        .route("/customers/", get(customer_list).post(create_customer))
        .route("/customers/edit/:id/", get(edit_customer_page).post(edit_customer))
        .route("/customers/delete/:id/", post(delete_customer))
        // Barcode
        .route("/barcode_scanner/", get(barcode_scanner_page).post(barcode_scan))
        .route("/barcode_retrieve/", get(barcode_retrieve_page).post(barcode_retrieve))
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(session_layer)
        // Add middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(TimeoutLayer::new(Duration::from_secs(30))),
        )
        .with_state(state)
}
