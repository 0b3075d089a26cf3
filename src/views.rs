//! Serializable rows shared by several pages.

use chrono::{DateTime, Utc};
use common::{CategoryForm, CustomerForm, GoodsForm, validators::PRICE_DECIMAL_PLACES};
use model::entities::{category, customer, goods};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A good as listed on the dashboard, goods list and search pages.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GoodsView {
    pub id: i32,
    pub name: String,
    pub quantity: i32,
    pub description: String,
    #[schema(value_type = String, example = "15.50")]
    pub price: Decimal,
    pub barcode: String,
    /// `price * quantity`
    #[schema(value_type = String, example = "155.00")]
    pub total_value: Decimal,
    pub category_id: Option<i32>,
    pub category_name: Option<String>,
    pub customer_id: Option<i32>,
    pub customer_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl GoodsView {
    pub fn new(
        good: goods::Model,
        category: Option<&category::Model>,
        customer: Option<&customer::Model>,
    ) -> Self {
        Self {
            total_value: money(good.total_value()),
            id: good.id,
            name: good.name,
            quantity: good.quantity,
            description: good.description,
            price: money(good.price),
            barcode: good.barcode,
            category_id: good.category_id,
            category_name: category.map(|c| c.name.clone()),
            customer_id: good.customer_id,
            customer_name: customer.map(|c| c.name.clone()),
            created_at: good.created_at,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CategoryView {
    pub id: i32,
    pub name: String,
}

impl From<category::Model> for CategoryView {
    fn from(model: category::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CustomerView {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl From<customer::Model> for CustomerView {
    fn from(model: customer::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            address: model.address,
            created_at: model.created_at,
        }
    }
}

/// Amounts always carry two decimal places.
fn money(mut value: Decimal) -> Decimal {
    value.rescale(PRICE_DECIMAL_PLACES);
    value
}

/// Form values for editing an existing good.
pub fn goods_form_for(good: &goods::Model) -> GoodsForm {
    GoodsForm {
        name: good.name.clone(),
        quantity: good.quantity.to_string(),
        description: good.description.clone(),
        price: money(good.price).to_string(),
        category: good.category_id.map(|id| id.to_string()).unwrap_or_default(),
        customer: good.customer_id.map(|id| id.to_string()).unwrap_or_default(),
    }
}

pub fn category_form_for(category: &category::Model) -> CategoryForm {
    CategoryForm {
        name: category.name.clone(),
    }
}

pub fn customer_form_for(customer: &customer::Model) -> CustomerForm {
    CustomerForm {
        name: customer.name.clone(),
        email: customer.email.clone(),
        phone: customer.phone.clone(),
        address: customer.address.clone(),
    }
}
