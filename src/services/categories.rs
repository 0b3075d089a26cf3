use common::CategoryForm;
use model::entities::{category, goods};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use tracing::{debug, error, info, instrument, trace};

use super::{ServiceError, ServiceResult};
use crate::views::CategoryView;

const ENTITY: &str = "Category";

#[instrument(skip(db))]
pub async fn list_categories(db: &DatabaseConnection, user_id: i32) -> ServiceResult<Vec<CategoryView>> {
    let categories = category::Entity::find_owned(user_id).all(db).await?;
    debug!("Found {} categories for user {}", categories.len(), user_id);
    Ok(categories.into_iter().map(CategoryView::from).collect())
}

#[instrument(skip(db))]
pub async fn get_category(
    db: &DatabaseConnection,
    user_id: i32,
    id: i32,
) -> ServiceResult<category::Model> {
    category::Entity::find_owned_by_id(user_id, id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound { entity: ENTITY, id })
}

#[instrument(skip(db))]
pub async fn create_category(
    db: &DatabaseConnection,
    user_id: i32,
    form: CategoryForm,
) -> ServiceResult<category::Model> {
    let input = form.parse()?;
    let new_category = category::ActiveModel {
        name: Set(input.name),
        user_id: Set(user_id),
        ..Default::default()
    };

    let category = new_category.insert(db).await?;
    info!("Created category '{}' with ID {}", category.name, category.id);
    Ok(category)
}

/// Renames a category owned by `user_id`.
#[instrument(skip(db))]
pub async fn rename_category(
    db: &DatabaseConnection,
    user_id: i32,
    id: i32,
    form: CategoryForm,
) -> ServiceResult<category::Model> {
    let existing = get_category(db, user_id, id).await?;
    let input = form.parse()?;

    let mut category: category::ActiveModel = existing.into();
    category.name = Set(input.name);
    let category = category.update(db).await?;
    info!("Renamed category {} to '{}'", category.id, category.name);
    Ok(category)
}

/// Deletes a category owned by `user_id` together with its goods.
#[instrument(skip(db))]
pub async fn delete_category(db: &DatabaseConnection, user_id: i32, id: i32) -> ServiceResult<()> {
    let txn = db.begin().await?;

    let Some(category) = category::Entity::find_owned_by_id(user_id, id).one(&txn).await? else {
        debug!("Category {} not owned by user {}", id, user_id);
        txn.rollback().await?;
        return Err(ServiceError::NotFound { entity: ENTITY, id });
    };

    trace!("Deleting goods of category {}", category.id);
    let removed_goods = goods::Entity::delete_many()
        .filter(goods::Column::CategoryId.eq(category.id))
        .filter(goods::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    category::Entity::delete_by_id(category.id).exec(&txn).await?;

    if let Err(e) = txn.commit().await {
        error!("Failed to commit deletion of category {}: {}", id, e);
        return Err(e.into());
    }

    info!(
        "Deleted category {} and {} dependent goods",
        id, removed_goods.rows_affected
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_utils::{create_test_good, create_test_user, setup_test_db};
    use sea_orm::PaginatorTrait;

    fn form(name: &str) -> CategoryForm {
        CategoryForm {
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_and_list_are_scoped_to_owner() {
        let db = setup_test_db().await.unwrap();
        let alice = create_test_user(&db, "alice").await.unwrap();
        let bob = create_test_user(&db, "bob").await.unwrap();

        create_category(&db, alice.id, form("  Beverages ")).await.unwrap();
        create_category(&db, alice.id, form("Snacks")).await.unwrap();

        let names: Vec<_> = list_categories(&db, alice.id)
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Beverages", "Snacks"]);
        assert!(list_categories(&db, bob.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_name_is_rejected() {
        let db = setup_test_db().await.unwrap();
        let alice = create_test_user(&db, "alice").await.unwrap();

        let error = create_category(&db, alice.id, form("   ")).await.unwrap_err();
        match error {
            ServiceError::Validation(errors) => assert!(errors.contains(CategoryForm::NAME_FIELD)),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_other_users_category_is_not_found() {
        let db = setup_test_db().await.unwrap();
        let alice = create_test_user(&db, "alice").await.unwrap();
        let bob = create_test_user(&db, "bob").await.unwrap();
        let beverages = create_category(&db, alice.id, form("Beverages")).await.unwrap();

        let rename = rename_category(&db, bob.id, beverages.id, form("Mine")).await;
        assert!(matches!(rename, Err(ServiceError::NotFound { .. })));
        let delete = delete_category(&db, bob.id, beverages.id).await;
        assert!(matches!(delete, Err(ServiceError::NotFound { .. })));

        let unchanged = get_category(&db, alice.id, beverages.id).await.unwrap();
        assert_eq!(unchanged.name, "Beverages");
    }

    #[tokio::test]
    async fn test_delete_removes_dependent_goods() {
        let db = setup_test_db().await.unwrap();
        let alice = create_test_user(&db, "alice").await.unwrap();
        let beverages = create_category(&db, alice.id, form("Beverages")).await.unwrap();

        create_test_good(&db, alice.id, "Cola", Some(beverages.id), None).await.unwrap();
        create_test_good(&db, alice.id, "Soap", None, None).await.unwrap();

        delete_category(&db, alice.id, beverages.id).await.unwrap();

        assert_eq!(goods::Entity::find().count(&db).await.unwrap(), 1);
        assert!(category::Entity::find_by_id(beverages.id).one(&db).await.unwrap().is_none());
    }
}
