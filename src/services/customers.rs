use chrono::Utc;
use common::CustomerForm;
use model::entities::{customer, goods};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::{debug, error, info, instrument, trace};

use super::{ServiceError, ServiceResult};
use crate::views::CustomerView;

const ENTITY: &str = "Customer";

/// Customers of `user_id`, newest first.
#[instrument(skip(db))]
pub async fn list_customers(db: &DatabaseConnection, user_id: i32) -> ServiceResult<Vec<CustomerView>> {
    let customers = customer::Entity::find_owned(user_id).all(db).await?;
    debug!("Found {} customers for user {}", customers.len(), user_id);
    Ok(customers.into_iter().map(CustomerView::from).collect())
}

#[instrument(skip(db))]
pub async fn get_customer(
    db: &DatabaseConnection,
    user_id: i32,
    id: i32,
) -> ServiceResult<customer::Model> {
    customer::Entity::find_owned_by_id(user_id, id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound { entity: ENTITY, id })
}

/// Creates a customer, or replaces the fields of `existing_id` when given.
#[instrument(skip(db))]
pub async fn save_customer(
    db: &DatabaseConnection,
    user_id: i32,
    form: CustomerForm,
    existing_id: Option<i32>,
) -> ServiceResult<customer::Model> {
    let existing = match existing_id {
        Some(id) => Some(get_customer(db, user_id, id).await?),
        None => None,
    };
    let input = form.parse()?;

    match existing {
        Some(existing) => {
            trace!("Updating customer {}", existing.id);
            let mut customer: customer::ActiveModel = existing.into();
            customer.name = Set(input.name);
            customer.email = Set(input.email);
            customer.phone = Set(input.phone);
            customer.address = Set(input.address);
            let customer = customer.update(db).await?;
            info!("Updated customer {} ('{}')", customer.id, customer.name);
            Ok(customer)
        }
        None => {
            let customer = customer::ActiveModel {
                name: Set(input.name),
                email: Set(input.email),
                phone: Set(input.phone),
                address: Set(input.address),
                created_at: Set(Utc::now()),
                user_id: Set(user_id),
                ..Default::default()
            }
            .insert(db)
            .await?;
            info!("Created customer '{}' with ID {}", customer.name, customer.id);
            Ok(customer)
        }
    }
}

/// Deletes a customer owned by `user_id` together with its goods.
#[instrument(skip(db))]
pub async fn delete_customer(db: &DatabaseConnection, user_id: i32, id: i32) -> ServiceResult<()> {
    let txn = db.begin().await?;

    let Some(customer) = customer::Entity::find_owned_by_id(user_id, id).one(&txn).await? else {
        debug!("Customer {} not owned by user {}", id, user_id);
        txn.rollback().await?;
        return Err(ServiceError::NotFound { entity: ENTITY, id });
    };

    let removed_goods = goods::Entity::delete_many()
        .filter(goods::Column::CustomerId.eq(customer.id))
        .filter(goods::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    customer::Entity::delete_by_id(customer.id).exec(&txn).await?;

    if let Err(e) = txn.commit().await {
        error!("Failed to commit deletion of customer {}: {}", id, e);
        return Err(e.into());
    }

    info!(
        "Deleted customer {} and {} dependent goods",
        id, removed_goods.rows_affected
    );
    Ok(())
}
