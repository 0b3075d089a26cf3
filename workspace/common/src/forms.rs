use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::errors::FormErrors;
use crate::validators::{self, REQUIRED, parse_choice, parse_price, parse_quantity, parse_scan_price};

fn validation_errors<T: Validate>(form: &T) -> FormErrors {
    match form.validate() {
        Ok(()) => FormErrors::new(),
        Err(errors) => errors.into(),
    }
}

// ===================== Categories =====================

/// Category form; posted as `category-name` on every page that embeds it.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct CategoryForm {
    #[serde(rename = "category-name", default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInput {
    pub name: String,
}

impl CategoryForm {
    pub const NAME_FIELD: &'static str = "category-name";
    const NAME_MAX_LEN: usize = 100;

    pub fn parse(self) -> Result<CategoryInput, FormErrors> {
        let name = self.name.trim().to_string();
        let mut errors = FormErrors::new();
        if name.is_empty() {
            errors.add(Self::NAME_FIELD, REQUIRED);
        } else if name.chars().count() > Self::NAME_MAX_LEN {
            errors.add(
                Self::NAME_FIELD,
                format!("Ensure this value has at most {} characters.", Self::NAME_MAX_LEN),
            );
        }
        errors.into_result(CategoryInput { name })
    }
}

// ===================== Customers =====================

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(default)]
pub struct CustomerForm {
    #[validate(custom(function = "validators::required"), length(max = 100))]
    pub name: String,
    #[validate(custom(function = "validators::gmail_address"), length(max = 254))]
    pub email: String,
    #[validate(custom(function = "validators::ph_mobile"), length(max = 20))]
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl CustomerForm {
    fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: self.address.trim().to_string(),
        }
    }

    pub fn parse(self) -> Result<CustomerInput, FormErrors> {
        let form = self.trimmed();
        validation_errors(&form).into_result(CustomerInput {
            name: form.name,
            email: form.email,
            phone: form.phone,
            address: form.address,
        })
    }
}

// ===================== Goods =====================

/// Goods form. `category` and `customer` carry optional ids; an empty value
/// leaves the reference unset.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(default)]
pub struct GoodsForm {
    #[validate(custom(function = "validators::required"), length(max = 255))]
    pub name: String,
    #[validate(custom(function = "validators::required"))]
    pub quantity: String,
    pub description: String,
    #[validate(custom(function = "validators::required"))]
    pub price: String,
    pub category: String,
    pub customer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoodsInput {
    pub name: String,
    pub quantity: i32,
    pub description: String,
    pub price: Decimal,
    pub category_id: Option<i32>,
    pub customer_id: Option<i32>,
}

impl GoodsForm {
    fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            quantity: self.quantity.trim().to_string(),
            description: self.description.trim().to_string(),
            price: self.price.trim().to_string(),
            category: self.category.trim().to_string(),
            customer: self.customer.trim().to_string(),
        }
    }

    pub fn parse(self) -> Result<GoodsInput, FormErrors> {
        let form = self.trimmed();
        let mut errors = validation_errors(&form);

        let quantity = match form.quantity.as_str() {
            "" => None,
            raw => parse_quantity(raw)
                .map_err(|message| errors.add("quantity", message))
                .ok(),
        };
        let price = match form.price.as_str() {
            "" => None,
            raw => parse_price(raw).map_err(|message| errors.add("price", message)).ok(),
        };
        let category_id = parse_choice(&form.category)
            .map_err(|message| errors.add("category", message))
            .ok()
            .flatten();
        let customer_id = parse_choice(&form.customer)
            .map_err(|message| errors.add("customer", message))
            .ok()
            .flatten();

        match (quantity, price) {
            (Some(quantity), Some(price)) if errors.is_empty() => Ok(GoodsInput {
                name: form.name,
                quantity,
                description: form.description,
                price,
                category_id,
                customer_id,
            }),
            _ => Err(errors),
        }
    }
}

// ===================== Barcode scanner =====================

/// Why a barcode scan submission was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanRejection {
    MissingFields,
    InvalidSelection,
    InvalidAmount,
}

impl ScanRejection {
    pub fn message(self) -> &'static str {
        match self {
            Self::MissingFields => "All fields must be filled out.",
            Self::InvalidSelection => "Invalid category or customer selection.",
            Self::InvalidAmount => "Invalid quantity or price entered.",
        }
    }
}

impl fmt::Display for ScanRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Barcode scanner form. Every field is mandatory.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct BarcodeScanForm {
    pub barcode: String,
    pub name: String,
    pub quantity: String,
    pub price: String,
    pub description: String,
    pub category: String,
    pub customer: String,
}

/// A complete scan submission. The amounts stay raw until the category and
/// customer have been checked, so a bad selection is reported first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodeScanInput {
    pub barcode: String,
    pub name: String,
    pub description: String,
    pub category_id: i32,
    pub customer_id: i32,
    quantity: String,
    price: String,
}

impl BarcodeScanForm {
    pub fn parse(self) -> Result<BarcodeScanInput, ScanRejection> {
        let fields = [
            &self.barcode,
            &self.name,
            &self.quantity,
            &self.price,
            &self.description,
            &self.category,
            &self.customer,
        ];
        if fields.iter().any(|value| value.trim().is_empty()) {
            return Err(ScanRejection::MissingFields);
        }

        let category_id = self.category.trim().parse::<i32>();
        let customer_id = self.customer.trim().parse::<i32>();
        let (Ok(category_id), Ok(customer_id)) = (category_id, customer_id) else {
            return Err(ScanRejection::InvalidSelection);
        };

        Ok(BarcodeScanInput {
            barcode: self.barcode.trim().to_string(),
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            category_id,
            customer_id,
            quantity: self.quantity.trim().to_string(),
            price: self.price.trim().to_string(),
        })
    }
}

impl BarcodeScanInput {
    pub fn amounts(&self) -> Result<(i32, Decimal), ScanRejection> {
        let quantity = parse_quantity(&self.quantity).map_err(|_| ScanRejection::InvalidAmount)?;
        let price = parse_scan_price(&self.price).ok_or(ScanRejection::InvalidAmount)?;
        Ok((quantity, price))
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct BarcodeLookupForm {
    pub barcode: String,
}

// ===================== Accounts =====================

#[derive(Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    /// Local path to continue to after a successful login.
    pub next: Option<String>,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .field("next", &self.next)
            .finish()
    }
}

#[derive(Clone, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(default)]
pub struct SignupForm {
    #[validate(custom(function = "validators::required"), length(max = 150))]
    pub username: String,
    #[validate(custom(function = "validators::email_address"), length(max = 254))]
    pub email: String,
    #[validate(custom(function = "validators::required"))]
    pub password: String,
}

impl fmt::Debug for SignupForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupForm")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct SignupInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for SignupInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupInput")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl SignupForm {
    pub fn parse(self) -> Result<SignupInput, FormErrors> {
        let form = Self {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
        };
        validation_errors(&form).into_result(SignupInput {
            username: form.username,
            email: form.email,
            password: form.password,
        })
    }
}
