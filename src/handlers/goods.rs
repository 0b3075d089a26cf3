use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
    Form,
};
use common::{FormErrors, GoodsForm};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use utoipa::{IntoParams, ToSchema};

use crate::error::AppError;
use crate::handlers::id_path::IdPath;
use crate::handlers::accounts::DASHBOARD_PATH;
use crate::middleware::RequireAuth;
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use crate::services::{ServiceError, categories, customers, goods};
use crate::views::{CategoryView, CustomerView, GoodsView, goods_form_for};

pub const GOODS_PATH: &str = "/goods/";

#[derive(Debug, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Case-insensitive text matched against name, description and category
    pub q: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GoodsListView {
    pub goods: Vec<GoodsView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SearchView {
    pub query: String,
    pub results: Vec<GoodsView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EditGoodView {
    pub good_id: i32,
    pub form: GoodsForm,
    pub categories: Vec<CategoryView>,
    pub customers: Vec<CustomerView>,
    #[schema(value_type = Option<Object>)]
    pub errors: Option<FormErrors>,
}

/// List all goods of the current user
#[utoipa::path(
    get,
    path = "/goods/",
    tag = "goods",
    responses(
        (status = 200, description = "Goods, newest first", body = GoodsListView),
        (status = 303, description = "Not logged in; redirect to the login page")
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn goods_list(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<GoodsListView>>, AppError> {
    let goods = goods::list_goods(&state.db, user.id, None).await?;
    Ok(Json(ApiResponse::ok(GoodsListView { goods })))
}

/// Search goods
///
/// An empty query returns no results.
#[utoipa::path(
    get,
    path = "/search/",
    tag = "goods",
    params(SearchQuery),
    responses(
        (status = 200, description = "Matching goods, newest first", body = SearchView),
        (status = 303, description = "Not logged in; redirect to the login page")
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn search_goods(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<SearchView>>, AppError> {
    let query = query.q.unwrap_or_default().trim().to_string();
    let results = if query.is_empty() {
        debug!("Empty search query");
        Vec::new()
    } else {
        goods::list_goods(&state.db, user.id, Some(&query)).await?
    };

    Ok(Json(ApiResponse::ok(SearchView { query, results })))
}

async fn edit_view(
    state: &AppState,
    user_id: i32,
    good_id: i32,
    form: GoodsForm,
    errors: Option<FormErrors>,
) -> Result<EditGoodView, AppError> {
    Ok(EditGoodView {
        good_id,
        form,
        categories: categories::list_categories(&state.db, user_id).await?,
        customers: customers::list_customers(&state.db, user_id).await?,
        errors,
    })
}

/// Edit form for one good
#[utoipa::path(
    get,
    path = "/edit/{id}/",
    tag = "goods",
    params(("id" = i32, Path, description = "Good ID")),
    responses(
        (status = 200, description = "Edit form filled with the good", body = EditGoodView),
        (status = 404, description = "Good not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn edit_good_page(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Json<ApiResponse<EditGoodView>>, AppError> {
    let good = goods::get_good(&state.db, user.id, id).await?;
    let view = edit_view(&state, user.id, good.id, goods_form_for(&good), None).await?;
    Ok(Json(ApiResponse::ok(view)))
}

/// Update one good
#[utoipa::path(
    post,
    path = "/edit/{id}/",
    tag = "goods",
    params(("id" = i32, Path, description = "Good ID")),
    request_body(content = GoodsForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Saved; redirect to the dashboard"),
        (status = 404, description = "Good not found", body = ErrorResponse),
        (status = 422, description = "Edit form with errors", body = EditGoodView)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn edit_good(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    IdPath(id): IdPath,
    Form(form): Form<GoodsForm>,
) -> Result<Response, AppError> {
    match goods::save_good(&state.db, user.id, form.clone(), Some(id)).await {
        Ok(good) => {
            info!("Good {} updated", good.id);
            Ok(Redirect::to(DASHBOARD_PATH).into_response())
        }
        Err(ServiceError::Validation(errors)) => {
            warn!("Rejected update of good {}: {}", id, errors);
            let view = edit_view(&state, user.id, id, form, Some(errors)).await?;
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(ApiResponse::invalid(view))).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete one good
#[utoipa::path(
    post,
    path = "/delete/{id}/",
    tag = "goods",
    params(("id" = i32, Path, description = "Good ID")),
    responses(
        (status = 303, description = "Deleted; redirect to the goods list"),
        (status = 404, description = "Good not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, user), fields(user_id = user.id))]
pub async fn delete_good(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> Result<Redirect, AppError> {
    goods::delete_good(&state.db, user.id, id).await?;
    Ok(Redirect::to(GOODS_PATH))
}
