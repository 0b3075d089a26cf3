use common::{
    BarcodeLookupForm, BarcodeScanForm, CategoryForm, CustomerForm, GoodsForm, LoginForm,
    SignupForm,
};
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use utoipa::{OpenApi, ToSchema};

use crate::config::Settings;
use crate::handlers::{
    accounts::{HomeView, LoginView, SignupView},
    barcode::{BarcodeRetrieveView, BarcodeScannerView},
    categories::{CategoryEditView, CategoryListView},
    customers::{CustomerEditView, CustomerListView},
    dashboard::DashboardView,
    goods::{EditGoodView, GoodsListView, SearchView},
};
use crate::messages::{FlashMessage, MessageLevel};
use crate::middleware::CurrentUser;
use crate::views::{CategoryView, CustomerView, GoodsView};

/// Application state shared across handlers
#[derive(Clone, Debug)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Loaded configuration
    pub settings: Settings,
}

/// API response wrapper; `data` is the view model of the page.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success status
    pub success: bool,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data,
            message: String::new(),
            success: true,
        }
    }

    /// A page re-rendered because the submitted form was rejected.
    pub fn invalid(data: T) -> Self {
        Self {
            data,
            message: "Please correct the errors below.".to_string(),
            success: false,
        }
    }
}

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::accounts::home,
        crate::handlers::accounts::login_page,
        crate::handlers::accounts::login,
        crate::handlers::accounts::signup_page,
        crate::handlers::accounts::signup,
        crate::handlers::accounts::logout,
        crate::handlers::dashboard::dashboard_page,
        crate::handlers::dashboard::dashboard_submit,
        crate::handlers::goods::goods_list,
        crate::handlers::goods::search_goods,
        crate::handlers::goods::edit_good_page,
        crate::handlers::goods::edit_good,
        crate::handlers::goods::delete_good,
        crate::handlers::categories::category_list,
        crate::handlers::categories::create_category,
        crate::handlers::categories::edit_category_page,
        crate::handlers::categories::edit_category,
        crate::handlers::categories::delete_category,
        crate::handlers::customers::customer_list,
        crate::handlers::customers::create_customer,
        crate::handlers::customers::edit_customer_page,
        crate::handlers::customers::edit_customer,
        crate::handlers::customers::delete_customer,
        crate::handlers::barcode::barcode_scanner_page,
        crate::handlers::barcode::barcode_scan,
        crate::handlers::barcode::barcode_retrieve_page,
        crate::handlers::barcode::barcode_retrieve,
    ),
    components(
        schemas(
            ErrorResponse,
            HealthResponse,
            CurrentUser,
            FlashMessage,
            MessageLevel,
            GoodsView,
            CategoryView,
            CustomerView,
            GoodsForm,
            CategoryForm,
            CustomerForm,
            BarcodeScanForm,
            BarcodeLookupForm,
            LoginForm,
            SignupForm,
            HomeView,
            LoginView,
            SignupView,
            DashboardView,
            GoodsListView,
            SearchView,
            EditGoodView,
            CategoryListView,
            CategoryEditView,
            CustomerListView,
            CustomerEditView,
            BarcodeScannerView,
            BarcodeRetrieveView,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "accounts", description = "Signup, login and logout"),
        (name = "dashboard", description = "Inventory dashboard"),
        (name = "goods", description = "Goods listing, search and editing"),
        (name = "categories", description = "Category management"),
        (name = "customers", description = "Customer management"),
        (name = "barcode", description = "Barcode scanning and lookup"),
    ),
    info(
        title = "Supplychain Inventory",
        description = "Multi-tenant inventory of goods, categories and customers",
        version = "0.1.0",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    )
)]
pub struct ApiDoc;
