//! The dashboard: goods listing with search, plus the goods, category and
//! customer forms, all posted back to the same URL.

use axum::{
    body::Bytes,
    extract::{Query, RawForm, State},
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
};
use common::{CategoryForm, CustomerForm, FormErrors, GoodsForm};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tower_sessions::Session;
use tracing::{debug, info, instrument, trace};
use utoipa::{IntoParams, ToSchema};

use crate::error::AppError;
use crate::handlers::accounts::DASHBOARD_PATH;
use crate::messages::{self, FlashMessage};
use crate::middleware::{CurrentUser, RequireAuth};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};
use crate::services::{ServiceError, categories, customers, goods};
use crate::views::{CategoryView, CustomerView, GoodsView, goods_form_for};

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DashboardQuery {
    /// Free-text filter over name, description and category
    pub q: Option<String>,
    /// ID of the good loaded into the goods form
    pub edit_good: Option<String>,
}

/// Which of the dashboard forms was submitted.
#[derive(Debug, Default, Deserialize)]
struct Submission {
    submit_good: Option<String>,
    submit_category: Option<String>,
    submit_customer: Option<String>,
}

#[derive(Debug, Default, Serialize, ToSchema)]
pub struct DashboardView {
    pub username: String,
    pub query: Option<String>,
    pub goods: Vec<GoodsView>,
    pub categories: Vec<CategoryView>,
    pub customers: Vec<CustomerView>,
    /// Set when the goods form edits an existing good
    pub editing_good_id: Option<i32>,
    pub goods_form: GoodsForm,
    pub category_form: CategoryForm,
    pub customer_form: CustomerForm,
    #[schema(value_type = Option<Object>)]
    pub goods_errors: Option<FormErrors>,
    #[schema(value_type = Option<Object>)]
    pub category_errors: Option<FormErrors>,
    #[schema(value_type = Option<Object>)]
    pub customer_errors: Option<FormErrors>,
    pub messages: Vec<FlashMessage>,
}

/// `?edit_good=` that is not a number can never name a good.
fn parse_edit_good(raw: Option<&str>) -> Result<Option<i32>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<i32>()
            .map(Some)
            .map_err(|_| AppError::NotFound(format!("Goods with ID {raw} not found"))),
    }
}

fn decode<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_urlencoded::from_bytes(body).map_err(|e| AppError::BadRequest(e.to_string()))
}

/// Fills in everything the page lists; forms and errors are left to the caller.
async fn load_view(
    state: &AppState,
    session: &Session,
    user: &CurrentUser,
    query: &DashboardQuery,
    editing_good_id: Option<i32>,
) -> Result<DashboardView, AppError> {
    let search = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty());

    let goods = goods::list_goods(&state.db, user.id, search).await?;
    let categories = categories::list_categories(&state.db, user.id).await?;
    let customers = customers::list_customers(&state.db, user.id).await?;
    let messages = messages::take(session).await?;
    trace!(
        "Dashboard for user {}: {} goods, {} categories, {} customers",
        user.id,
        goods.len(),
        categories.len(),
        customers.len()
    );

    Ok(DashboardView {
        username: user.username.clone(),
        query: search.map(str::to_string),
        goods,
        categories,
        customers,
        editing_good_id,
        messages,
        ..Default::default()
    })
}

/// Dashboard page
#[utoipa::path(
    get,
    path = "/dashboard/",
    tag = "dashboard",
    params(DashboardQuery),
    responses(
        (status = 200, description = "Dashboard view model", body = DashboardView),
        (status = 303, description = "Not logged in; redirect to the login page"),
        (status = 404, description = "Edited good not found", body = ErrorResponse)
    )
)]
#[instrument(skip(state, session, user), fields(user_id = user.id))]
pub async fn dashboard_page(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ApiResponse<DashboardView>>, AppError> {
    let editing = match parse_edit_good(query.edit_good.as_deref())? {
        Some(id) => Some(goods::get_good(&state.db, user.id, id).await?),
        None => None,
    };

    let mut view = load_view(&state, &session, &user, &query, editing.as_ref().map(|g| g.id)).await?;
    if let Some(good) = &editing {
        debug!("Editing good {} on the dashboard", good.id);
        view.goods_form = goods_form_for(good);
    }

    Ok(Json(ApiResponse::ok(view)))
}

/// Submit one of the dashboard forms
///
/// The form is picked by the `submit_good`, `submit_category` or
/// `submit_customer` field of the body.
#[utoipa::path(
    post,
    path = "/dashboard/",
    tag = "dashboard",
    params(DashboardQuery),
    request_body(content = GoodsForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Saved; redirect to the dashboard"),
        (status = 404, description = "Edited good not found", body = ErrorResponse),
        (status = 422, description = "Dashboard with the rejected form and its errors", body = DashboardView)
    )
)]
#[instrument(skip(state, session, user, body), fields(user_id = user.id))]
pub async fn dashboard_submit(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<DashboardQuery>,
    RawForm(body): RawForm,
) -> Result<Response, AppError> {
    let submission: Submission = decode(&body)?;
    // A stale or foreign `edit_good` fails every submission, not only the goods form.
    let editing = match parse_edit_good(query.edit_good.as_deref())? {
        Some(id) => Some(goods::get_good(&state.db, user.id, id).await?.id),
        None => None,
    };

    let view = if submission.submit_good.is_some() {
        let form: GoodsForm = decode(&body)?;
        match goods::save_good(&state.db, user.id, form.clone(), editing).await {
            Ok(good) => {
                info!("Saved good {} from the dashboard", good.id);
                return Ok(Redirect::to(DASHBOARD_PATH).into_response());
            }
            Err(ServiceError::Validation(errors)) => {
                let mut view = load_view(&state, &session, &user, &query, editing).await?;
                view.goods_form = form;
                view.goods_errors = Some(errors);
                view
            }
            Err(e) => return Err(e.into()),
        }
    } else if submission.submit_category.is_some() {
        let form: CategoryForm = decode(&body)?;
        match categories::create_category(&state.db, user.id, form.clone()).await {
            Ok(category) => {
                info!("Created category {} from the dashboard", category.id);
                return Ok(Redirect::to(DASHBOARD_PATH).into_response());
            }
            Err(ServiceError::Validation(errors)) => {
                let mut view = load_view(&state, &session, &user, &query, editing).await?;
                view.category_form = form;
                view.category_errors = Some(errors);
                view
            }
            Err(e) => return Err(e.into()),
        }
    } else if submission.submit_customer.is_some() {
        let form: CustomerForm = decode(&body)?;
        match customers::save_customer(&state.db, user.id, form.clone(), None).await {
            Ok(customer) => {
                info!("Created customer {} from the dashboard", customer.id);
                return Ok(Redirect::to(DASHBOARD_PATH).into_response());
            }
            Err(ServiceError::Validation(errors)) => {
                let mut view = load_view(&state, &session, &user, &query, editing).await?;
                view.customer_form = form;
                view.customer_errors = Some(errors);
                view
            }
            Err(e) => return Err(e.into()),
        }
    } else {
        debug!("Dashboard POST without a known submit field");
        let view = load_view(&state, &session, &user, &query, editing).await?;
        return Ok(Json(ApiResponse::ok(view)).into_response());
    };

    Ok((StatusCode::UNPROCESSABLE_ENTITY, Json(ApiResponse::invalid(view))).into_response())
}
