//! Normalization of raw product records into [`ProductDetails`].
//!
//! The detail endpoint has shipped several naming schemes over time, so each
//! output field probes an ordered list of candidate keys and takes the first
//! non-empty value. Store name and rating additionally look inside the
//! nested `store_info` object.

use std::str::FromStr;

use coinsbot_core::{ProductDetails, NOT_AVAILABLE};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::types::RawProduct;

/// Shown instead of a missing product title.
pub const TITLE_NOT_AVAILABLE: &str = "اسم المنتج غير متوفر";

const PRICE_FIELDS: &[&str] = &[
    "target_sale_price",
    "target_app_sale_price",
    "sale_price",
    "app_sale_price",
];
const TITLE_FIELDS: &[&str] = &["product_title", "subject"];
const IMAGE_FIELDS: &[&str] = &["product_main_image_url", "image_url"];
const STORE_NAME_FIELDS: &[&str] = &["store_name", "shop_name", "shopName"];
const SELLER_RATING_FIELDS: &[&str] = &[
    "seller_positive_rate",
    "seller_rating",
    "shopPositiveRate",
    "store_score",
];
const NESTED_STORE_OBJECT: &str = "store_info";
const NESTED_STORE_NAME: &str = "store_name";
const NESTED_SELLER_RATING: &str = "seller_positive_rate";

/// Maps a raw record onto the fixed display model.
///
/// Never fails: every field has a fallback (`0` price, sentinel strings).
#[must_use]
pub fn normalize_product(raw: &RawProduct) -> ProductDetails {
    let price = PRICE_FIELDS
        .iter()
        .filter_map(|key| text_field(raw, key))
        .find_map(|text| parse_price(&text))
        .unwrap_or(Decimal::ZERO);

    let title = first_text(raw, TITLE_FIELDS).unwrap_or_else(|| TITLE_NOT_AVAILABLE.to_owned());
    let image_url = first_text(raw, IMAGE_FIELDS);

    let store_name = first_text(raw, STORE_NAME_FIELDS)
        .or_else(|| nested_text(raw, NESTED_STORE_NAME))
        .unwrap_or_else(|| NOT_AVAILABLE.to_owned());
    let seller_rating = first_text(raw, SELLER_RATING_FIELDS)
        .or_else(|| nested_text(raw, NESTED_SELLER_RATING))
        .unwrap_or_else(|| NOT_AVAILABLE.to_owned());

    ProductDetails {
        title,
        price,
        image_url,
        store_name,
        seller_rating,
    }
}

/// Parses a price string such as `"19.99"` or `"1,234.50"`.
///
/// Returns `None` for anything that is not a plain decimal number.
#[must_use]
pub fn parse_price(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_str(raw.replace(',', "").trim()))
        .ok()
}

fn first_text(raw: &RawProduct, candidates: &[&str]) -> Option<String> {
    candidates.iter().find_map(|key| text_field(raw, key))
}

fn nested_text(raw: &RawProduct, key: &str) -> Option<String> {
    raw.get(NESTED_STORE_OBJECT)
        .and_then(Value::as_object)
        .and_then(|inner| text_field(inner, key))
}

fn text_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
