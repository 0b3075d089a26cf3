use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
    Form,
};
use common::{CategoryForm, FormErrors};
use serde::Serialize;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::handlers::id_path::IdPath;
use crate::middleware::RequireAuth;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use crate::services::{ServiceError, categories};
use crate::views::{CategoryView, category_form_for};

pub const CATEGORIES_PATH: &str = "/categories/";

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryListView {
    pub categories: Vec<CategoryView>,
    pub form: CategoryForm,
    #[schema(value_type = Option<Object>)]
    pub errors: Option<FormErrors>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryEditView {
    pub category: CategoryView,
    pub form: CategoryForm,
    #[schema(value_type = Option<Object>)]
    pub errors: Option<FormErrors>,
}

/// Categories of the current user
#[utoipa::path(
    get,
    path = "/categories/",
    tag = "categories",
    responses(
        (status = 200, description = "Categories with an empty create form", body = CategoryListView),
        (status = 303, description = "Not logged in; redirect to the login page")
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn category_list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<CategoryListView>>, AppError> {
    let categories = categories::list_categories(&state.db, user.id).await?;
    Ok(Json(ApiResponse::ok(CategoryListView {
        categories,
        form: CategoryForm::default(),
        errors: None,
    })))
}

/// Create a category
#[utoipa::path(
    post,
    path = "/categories/",
    tag = "categories",
    request_body(content = CategoryForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created; redirect to the category list"),
        (status = 422, description = "Category list with form errors", body = CategoryListView),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn create_category(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Form(form): Form<CategoryForm>,
) -> Result<Response, AppError> {
    match categories::create_category(&state.db, user.id, form.clone()).await {
        Ok(category) => {
            info!("Category {} created", category.id);
            Ok(Redirect::to(CATEGORIES_PATH).into_response())
        }
        Err(ServiceError::Validation(errors)) => {
            warn!("Rejected category: {}", errors);
            let view = CategoryListView {
                categories: categories::list_categories(&state.db, user.id).await?,
                form,
                errors: Some(errors),
            };
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(ApiResponse::invalid(view))).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Edit form for one category
#[utoipa::path(
    get,
    path = "/categories/edit/{id}/",
    tag = "categories",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Edit form filled with the category", body = CategoryEditView),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn edit_category_page(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<ApiResponse<CategoryEditView>>, AppError> {
    let category = categories::get_category(&state.db, user.id, id).await?;
    Ok(Json(ApiResponse::ok(CategoryEditView {
        form: category_form_for(&category),
        category: category.into(),
        errors: None,
    })))
}

/// Rename one category
#[utoipa::path(
    post,
    path = "/categories/edit/{id}/",
    tag = "categories",
    params(("id" = i32, Path, description = "Category ID")),
    request_body(content = CategoryForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Saved; redirect to the category list"),
        (status = 404, description = "Category not found", body = ErrorResponse),
        (status = 422, description = "Edit form with errors", body = CategoryEditView)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn edit_category(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    IdPath(id): IdPath,
    Form(form): Form<CategoryForm>,
) -> Result<Response, AppError> {
    match categories::rename_category(&state.db, user.id, id, form.clone()).await {
        Ok(_) => Ok(Redirect::to(CATEGORIES_PATH).into_response()),
        Err(ServiceError::Validation(errors)) => {
            warn!("Rejected rename of category {}: {}", id, errors);
            let category = categories::get_category(&state.db, user.id, id).await?;
            let view = CategoryEditView {
                category: category.into(),
                form,
                errors: Some(errors),
            };
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(ApiResponse::invalid(view))).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete one category and its goods
#[utoipa::path(
    post,
    path = "/delete-category/{id}/",
    tag = "categories",
    params(("id" = i32, Path, description = "Category ID")),
    responses(
        (status = 303, description = "Deleted; redirect to the category list"),
        (status = 404, description = "Category not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn delete_category(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Redirect, AppError> {
    categories::delete_category(&state.db, user.id, id).await?;
    Ok(Redirect::to(CATEGORIES_PATH))
}
