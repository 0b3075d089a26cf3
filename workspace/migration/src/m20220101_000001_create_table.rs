use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string_len(Users::Username, 150).unique_key())
                    .col(string_len(Users::Email, 254))
                    .col(string(Users::PasswordHash))
                    .col(timestamp_with_time_zone(Users::DateJoined))
                    .to_owned(),
            )
            .await?;

        // Create categories table
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(pk_auto(Categories::Id))
                    .col(string_len(Categories::Name, 100))
                    .col(integer(Categories::UserId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_categories_user")
                            .from(Categories::Table, Categories::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create customers table
        manager
            .create_table(
                Table::create()
                    .table(Customers::Table)
                    .if_not_exists()
                    .col(pk_auto(Customers::Id))
                    .col(string_len(Customers::Name, 100))
                    .col(string_len(Customers::Email, 254).default(""))
                    .col(string_len(Customers::Phone, 20).default(""))
                    .col(text(Customers::Address).default(""))
                    .col(timestamp_with_time_zone(Customers::CreatedAt))
                    .col(integer(Customers::UserId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_customers_user")
                            .from(Customers::Table, Customers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create goods table
        manager
            .create_table(
                Table::create()
                    .table(Goods::Table)
                    .if_not_exists()
                    .col(pk_auto(Goods::Id))
                    .col(string_len(Goods::Name, 255))
                    .col(integer(Goods::Quantity))
                    .col(text(Goods::Description).default(""))
                    .col(decimal(Goods::Price).decimal_len(10, 2).default(0))
                    .col(string_len(Goods::Barcode, 255).default("000000"))
                    .col(integer_null(Goods::CategoryId))
                    .col(integer_null(Goods::CustomerId))
                    .col(timestamp_with_time_zone(Goods::CreatedAt))
                    .col(integer(Goods::UserId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_goods_user")
                            .from(Goods::Table, Goods::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_goods_category")
                            .from(Goods::Table, Goods::CategoryId)
                            .to(Categories::Table, Categories::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_goods_customer")
                            .from(Goods::Table, Goods::CustomerId)
                            .to(Customers::Table, Customers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Listing is always "goods of one user, newest first"
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_goods_user_created_at")
                    .table(Goods::Table)
                    .col(Goods::UserId)
                    .col(Goods::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_goods_user_barcode")
                    .table(Goods::Table)
                    .col(Goods::UserId)
                    .col(Goods::Barcode)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Goods::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Customers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    DateJoined,
}

#[derive(DeriveIden)]
enum Categories {
    Table,
    Id,
    Name,
    UserId,
}

#[derive(DeriveIden)]
enum Customers {
    Table,
    Id,
    Name,
    Email,
    Phone,
    Address,
    CreatedAt,
    UserId,
}

#[derive(DeriveIden)]
enum Goods {
    Table,
    Id,
    Name,
    Quantity,
    Description,
    Price,
    Barcode,
    CategoryId,
    CustomerId,
    CreatedAt,
    UserId,
}
