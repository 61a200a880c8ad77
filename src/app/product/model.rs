//! 商品数据模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

/// 商品名称最大长度（字符数）
pub const NAME_MAX_LENGTH: usize = 100;

/// 价格保留的小数位数，与 `NUMERIC(18, 2)` 列一致
pub const PRICE_SCALE: u32 = 2;

/// 最低价格 0.01
const PRICE_MIN: Decimal = Decimal::from_parts(1, 0, 0, false, PRICE_SCALE);

/// `NUMERIC(18, 2)` 可容纳的最大值 9999999999999999.99
const PRICE_MAX: Decimal =
    Decimal::from_parts(2_808_348_671, 232_830_643, 0, false, PRICE_SCALE);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "database", derive(sqlx::FromRow))]
pub struct Product {
    /// 由存储分配，0 表示尚未持久化
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
}

impl Product {
    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }
}

/// 创建商品请求
///
/// 缺失的 `name` / `price` 反序列化为空串和 0，交给校验报告字段错误。
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProductRequest {
    #[serde(default)]
    #[validate(custom(function = "validate_name"))]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,
}

impl CreateProductRequest {
    pub fn into_product(self) -> Product {
        Product {
            id: 0,
            name: self.name,
            description: self.description,
            price: self.price,
        }
    }
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(field_error("required", "Name is required."));
    }
    if name.chars().count() > NAME_MAX_LENGTH {
        return Err(field_error(
            "length",
            "Name must be at most 100 characters long.",
        ));
    }
    Ok(())
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < PRICE_MIN {
        return Err(field_error("range", "Price must be greater than zero."));
    }
    if price.normalize().scale() > PRICE_SCALE {
        return Err(field_error(
            "range",
            "Price must have at most two decimal places.",
        ));
    }
    if *price > PRICE_MAX {
        return Err(field_error("range", "Price is too large."));
    }
    Ok(())
}

fn field_error(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}
