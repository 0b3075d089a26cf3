use std::collections::HashMap;

use chrono::Utc;
use common::{FormErrors, GoodsForm, GoodsInput, validators::INVALID_CHOICE};
use model::entities::{category, customer, goods};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use tracing::{debug, info, instrument, trace, warn};

use super::{ServiceError, ServiceResult};
use crate::views::GoodsView;

const ENTITY: &str = "Goods";

/// Goods of `user_id`, newest first, optionally narrowed by a free-text
/// query over name, description and category name.
#[instrument(skip(db))]
pub async fn list_goods(
    db: &DatabaseConnection,
    user_id: i32,
    query: Option<&str>,
) -> ServiceResult<Vec<GoodsView>> {
    let rows = goods::Entity::search(user_id, query).all(db).await?;
    debug!("Found {} goods for user {}", rows.len(), user_id);

    let mut customer_ids: Vec<i32> = rows.iter().filter_map(|(good, _)| good.customer_id).collect();
    customer_ids.sort_unstable();
    customer_ids.dedup();
    let customers: HashMap<i32, customer::Model> = if customer_ids.is_empty() {
        HashMap::new()
    } else {
        customer::Entity::find()
            .filter(customer::Column::UserId.eq(user_id))
            .filter(customer::Column::Id.is_in(customer_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect()
    };

    Ok(rows
        .into_iter()
        .map(|(good, category)| {
            let customer = good.customer_id.and_then(|id| customers.get(&id));
            GoodsView::new(good, category.as_ref(), customer)
        })
        .collect())
}

#[instrument(skip(db))]
pub async fn get_good(db: &DatabaseConnection, user_id: i32, id: i32) -> ServiceResult<goods::Model> {
    goods::Entity::find_owned_by_id(user_id, id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound { entity: ENTITY, id })
}

/// A single good with its category and customer resolved.
pub async fn view_good(db: &DatabaseConnection, good: goods::Model) -> ServiceResult<GoodsView> {
    let category = match good.category_id {
        Some(id) => category::Entity::find_owned_by_id(good.user_id, id).one(db).await?,
        None => None,
    };
    let customer = match good.customer_id {
        Some(id) => customer::Entity::find_owned_by_id(good.user_id, id).one(db).await?,
        None => None,
    };
    Ok(GoodsView::new(good, category.as_ref(), customer.as_ref()))
}

/// Creates a good, or replaces the editable fields of `existing_id`.
///
/// Barcode and creation time of an edited good are kept.
#[instrument(skip(db))]
pub async fn save_good(
    db: &DatabaseConnection,
    user_id: i32,
    form: GoodsForm,
    existing_id: Option<i32>,
) -> ServiceResult<goods::Model> {
    let existing = match existing_id {
        Some(id) => Some(get_good(db, user_id, id).await?),
        None => None,
    };
    let input = form.parse()?;
    check_choices(db, user_id, &input).await?;

    match existing {
        Some(existing) => {
            trace!("Updating good {}", existing.id);
            let mut good: goods::ActiveModel = existing.into();
            good.name = Set(input.name);
            good.quantity = Set(input.quantity);
            good.description = Set(input.description);
            good.price = Set(input.price);
            good.category_id = Set(input.category_id);
            good.customer_id = Set(input.customer_id);
            let good = good.update(db).await?;
            info!("Updated good {} ('{}')", good.id, good.name);
            Ok(good)
        }
        None => {
            let good = goods::ActiveModel {
                name: Set(input.name),
                quantity: Set(input.quantity),
                description: Set(input.description),
                price: Set(input.price),
                barcode: Set(goods::DEFAULT_BARCODE.to_string()),
                category_id: Set(input.category_id),
                customer_id: Set(input.customer_id),
                created_at: Set(Utc::now()),
                user_id: Set(user_id),
                ..Default::default()
            }
            .insert(db)
            .await?;
            info!("Created good '{}' with ID {}", good.name, good.id);
            Ok(good)
        }
    }
}

/// Category and customer choices must name rows of the same user.
async fn check_choices(db: &DatabaseConnection, user_id: i32, input: &GoodsInput) -> ServiceResult<()> {
    let mut errors = FormErrors::new();

    if let Some(id) = input.category_id {
        if category::Entity::find_owned_by_id(user_id, id).one(db).await?.is_none() {
            warn!("Category {} is not a valid choice for user {}", id, user_id);
            errors.add("category", INVALID_CHOICE);
        }
    }
    if let Some(id) = input.customer_id {
        if customer::Entity::find_owned_by_id(user_id, id).one(db).await?.is_none() {
            warn!("Customer {} is not a valid choice for user {}", id, user_id);
            errors.add("customer", INVALID_CHOICE);
        }
    }

    errors.into_result(()).map_err(ServiceError::from)
}

#[instrument(skip(db))]
pub async fn delete_good(db: &DatabaseConnection, user_id: i32, id: i32) -> ServiceResult<()> {
    let result = goods::Entity::delete_many()
        .filter(goods::Column::Id.eq(id))
        .filter(goods::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        debug!("Good {} not owned by user {}", id, user_id);
        return Err(ServiceError::NotFound { entity: ENTITY, id });
    }

    info!("Deleted good {}", id);
    Ok(())
}
