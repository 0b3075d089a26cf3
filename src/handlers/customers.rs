use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
    Form,
};
use common::{CustomerForm, FormErrors};
use serde::Serialize;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::handlers::id_path::IdPath;
use crate::middleware::RequireAuth;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use crate::services::{ServiceError, customers};
use crate::views::{CustomerView, customer_form_for};

pub const CUSTOMERS_PATH: &str = "/customers/";

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerListView {
    /// Newest first
    pub customers: Vec<CustomerView>,
    pub form: CustomerForm,
    #[schema(value_type = Option<Object>)]
    pub errors: Option<FormErrors>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerEditView {
    pub customer: CustomerView,
    pub form: CustomerForm,
    #[schema(value_type = Option<Object>)]
    pub errors: Option<FormErrors>,
}

/// Customers of the current user
#[utoipa::path(
    get,
    path = "/customers/",
    tag = "customers",
    responses(
        (status = 200, description = "Customers with an empty create form", body = CustomerListView),
        (status = 303, description = "Not logged in; redirect to the login page")
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn customer_list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CustomerListView>>, AppError> {
    let customers = customers::list_customers(&state.db, user.id).await?;
    Ok(Json(ApiResponse::ok(CustomerListView {
        customers,
        form: CustomerForm::default(),
        errors: None,
    })))
}

/// Create a customer
#[utoipa::path(
    post,
    path = "/customers/",
    tag = "customers",
    request_body(content = CustomerForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created; redirect to the customer list"),
        (status = 422, description = "Customer list with form errors", body = CustomerListView),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn create_customer(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Form(form): Form<CustomerForm>,
) -> Result<Response, AppError> {
    match customers::save_customer(&state.db, user.id, form.clone(), None).await {
        Ok(customer) => {
            info!("Customer {} created", customer.id);
            Ok(Redirect::to(CUSTOMERS_PATH).into_response())
        }
        Err(ServiceError::Validation(errors)) => {
            warn!("Rejected customer: {}", errors);
            let view = CustomerListView {
                customers: customers::list_customers(&state.db, user.id).await?,
                form,
                errors: Some(errors),
            };
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(ApiResponse::invalid(view))).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Edit form for one customer
#[utoipa::path(
    get,
    path = "/customers/edit/{id}/",
    tag = "customers",
    params(("id" = i32, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Edit form filled with the customer", body = CustomerEditView),
        (status = 404, description = "Customer not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn edit_customer_page(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<ApiResponse<CustomerEditView>>, AppError> {
    let customer = customers::get_customer(&state.db, user.id, id).await?;
    Ok(Json(ApiResponse::ok(CustomerEditView {
        form: customer_form_for(&customer),
        customer: customer.into(),
        errors: None,
    })))
}

/// Update one customer
#[utoipa::path(
    post,
    path = "/customers/edit/{id}/",
    tag = "customers",
    params(("id" = i32, Path, description = "Customer ID")),
    request_body(content = CustomerForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Saved; redirect to the customer list"),
        (status = 404, description = "Customer not found", body = ErrorResponse),
        (status = 422, description = "Edit form with errors", body = CustomerEditView)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn edit_customer(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    IdPath(id): IdPath,
    Form(form): Form<CustomerForm>,
) -> Result<Response, AppError> {
    match customers::save_customer(&state.db, user.id, form.clone(), Some(id)).await {
        Ok(_) => Ok(Redirect::to(CUSTOMERS_PATH).into_response()),
        Err(ServiceError::Validation(errors)) => {
            warn!("Rejected update of customer {}: {}", id, errors);
            let customer = customers::get_customer(&state.db, user.id, id).await?;
            let view = CustomerEditView {
                customer: customer.into(),
                form,
                errors: Some(errors),
            };
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(ApiResponse::invalid(view))).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete one customer and its goods
#[utoipa::path(
    post,
    path = "/customers/delete/{id}/",
    tag = "customers",
    params(("id" = i32, Path, description = "Customer ID")),
    responses(
        (status = 303, description = "Deleted; redirect to the customer list"),
        (status = 404, description = "Customer not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn delete_customer(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Redirect, AppError> {
    customers::delete_customer(&state.db, user.id, id).await?;
    Ok(Redirect::to(CUSTOMERS_PATH))
}
