use chrono::Utc;
use common::{BarcodeScanForm, ScanRejection};
use model::entities::{category, customer, goods};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use tracing::{debug, info, instrument, warn};

use super::{ServiceError, ServiceResult, goods::view_good};
use crate::views::GoodsView;

/// Creates a good from a scanned barcode.
///
/// Checks run in a fixed order: every field present, then category and
/// customer owned by `user_id`, then quantity and price parseable.
#[instrument(skip(db))]
pub async fn scan_create(
    db: &DatabaseConnection,
    user_id: i32,
    form: BarcodeScanForm,
) -> ServiceResult<goods::Model> {
    let input = form.parse()?;

    let category = category::Entity::find_owned_by_id(user_id, input.category_id)
        .one(db)
        .await?;
    let customer = customer::Entity::find_owned_by_id(user_id, input.customer_id)
        .one(db)
        .await?;
    if category.is_none() || customer.is_none() {
        warn!(
            "Scan rejected: category {} or customer {} not owned by user {}",
            input.category_id, input.customer_id, user_id
        );
        return Err(ServiceError::Scan(ScanRejection::InvalidSelection));
    }

    let (quantity, price) = input.amounts()?;

    let good = goods::ActiveModel {
        name: Set(input.name),
        quantity: Set(quantity),
        description: Set(input.description),
        price: Set(price),
        barcode: Set(input.barcode),
        category_id: Set(Some(input.category_id)),
        customer_id: Set(Some(input.customer_id)),
        created_at: Set(Utc::now()),
        user_id: Set(user_id),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Scanned good '{}' (barcode {}) with ID {}", good.name, good.barcode, good.id);
    Ok(good)
}

/// The newest good of `user_id` carrying `barcode`.
#[instrument(skip(db))]
pub async fn lookup(
    db: &DatabaseConnection,
    user_id: i32,
    barcode: &str,
) -> ServiceResult<Option<GoodsView>> {
    let barcode = barcode.trim();
    let Some(good) = goods::Entity::find_by_barcode(user_id, barcode).one(db).await? else {
        debug!("No good with barcode {} for user {}", barcode, user_id);
        return Ok(None);
    };

    Ok(Some(view_good(db, good).await?))
}
