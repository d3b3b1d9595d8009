//! Receipt schema validation
//!
//! The parsed model reply is untrusted. `validate_receipt` either narrows it to an
//! `ExtractedReceipt` or names the first rule it breaks. There is no partial
//! acceptance and no defaulting of missing fields.

use serde_json::{Map, Value};
use tally_core::models::{ExtractedReceipt, ReceiptItem};

const CURRENCY_CODE_LEN: usize = 3;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaViolation {
    #[error("response is not a JSON object")]
    NotAnObject,

    #[error("field `{0}` is missing")]
    MissingField(&'static str),

    #[error("field `{field}` must be a {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("currency must be exactly 3 characters, got {0:?}")]
    InvalidCurrency(String),

    #[error("receipt_items[{0}] is not an object")]
    ItemNotAnObject(usize),

    #[error("receipt_items[{index}].{field} is missing or not a {expected}")]
    InvalidItem {
        index: usize,
        field: &'static str,
        expected: &'static str,
    },
}

fn required<'a>(obj: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, SchemaViolation> {
    obj.get(field).ok_or(SchemaViolation::MissingField(field))
}

fn string_field(obj: &Map<String, Value>, field: &'static str) -> Result<String, SchemaViolation> {
    required(obj, field)?
        .as_str()
        .map(str::to_string)
        .ok_or(SchemaViolation::WrongType {
            field,
            expected: "string",
        })
}

fn number_field(obj: &Map<String, Value>, field: &'static str) -> Result<f64, SchemaViolation> {
    required(obj, field)?
        .as_f64()
        .ok_or(SchemaViolation::WrongType {
            field,
            expected: "number",
        })
}

fn receipt_item(index: usize, value: &Value) -> Result<ReceiptItem, SchemaViolation> {
    let obj = value
        .as_object()
        .ok_or(SchemaViolation::ItemNotAnObject(index))?;

    let item_name = obj
        .get("item_name")
        .and_then(Value::as_str)
        .ok_or(SchemaViolation::InvalidItem {
            index,
            field: "item_name",
            expected: "string",
        })?;

    let item_cost = obj
        .get("item_cost")
        .and_then(Value::as_f64)
        .ok_or(SchemaViolation::InvalidItem {
            index,
            field: "item_cost",
            expected: "number",
        })?;

    Ok(ReceiptItem {
        item_name: item_name.to_string(),
        item_cost,
    })
}

/// Check the parsed model reply against the receipt schema.
///
/// Rules, checked in this order: `date` is a string (not calendar-checked),
/// `currency` is a 3-character string, `vendor_name` is a string,
/// `receipt_items` is an array whose elements all have a string `item_name` and
/// a numeric `item_cost` (empty is fine), `tax` and `total` are numbers.
pub fn validate_receipt(value: &Value) -> Result<ExtractedReceipt, SchemaViolation> {
    let obj = value.as_object().ok_or(SchemaViolation::NotAnObject)?;

    let date = string_field(obj, "date")?;

    let currency = string_field(obj, "currency")?;
    if currency.chars().count() != CURRENCY_CODE_LEN {
        return Err(SchemaViolation::InvalidCurrency(currency));
    }

    let vendor_name = string_field(obj, "vendor_name")?;

    let receipt_items = required(obj, "receipt_items")?
        .as_array()
        .ok_or(SchemaViolation::WrongType {
            field: "receipt_items",
            expected: "array",
        })?
        .iter()
        .enumerate()
        .map(|(index, item)| receipt_item(index, item))
        .collect::<Result<Vec<_>, _>>()?;

    let tax = number_field(obj, "tax")?;
    let total = number_field(obj, "total")?;

    Ok(ExtractedReceipt {
        date,
        currency,
        vendor_name,
        receipt_items,
        tax,
        total,
    })
}
