//! Normalization of series response bodies.
//!
//! The provider is inconsistent about the envelope it wraps prices in. Known
//! shapes are tried in order and the first match wins:
//!
//! | Shape | Example |
//! |-------|---------|
//! | root array | `[{"price": 1.0}]` |
//! | `data` field | `{"data": [{"price": 1.0}]}` |
//! | `prices` field | `{"prices": [{"price": "1.0"}]}` |

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayloadError {
    #[error("response body is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("response body has no recognized price array")]
    UnrecognizedShape,
}

/// Prices extracted from a body, in upstream order.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPayload {
    pub shape: &'static str,
    pub prices: Vec<f64>,
}

type ShapeMatcher = fn(&Value) -> Option<&Vec<Value>>;

const SHAPES: [(&str, ShapeMatcher); 3] = [
    ("root_array", root_array),
    ("data_field", data_field),
    ("prices_field", prices_field),
];

fn root_array(value: &Value) -> Option<&Vec<Value>> {
    value.as_array()
}

fn data_field(value: &Value) -> Option<&Vec<Value>> {
    array_field(value, "data")
}

fn prices_field(value: &Value) -> Option<&Vec<Value>> {
    array_field(value, "prices")
}

fn array_field<'a>(value: &'a Value, field: &str) -> Option<&'a Vec<Value>> {
    value.as_object()?.get(field)?.as_array()
}

pub fn normalize_series_body(body: &str) -> Result<NormalizedPayload, PayloadError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| PayloadError::InvalidJson(e.to_string()))?;
    normalize_series_value(&value)
}

pub fn normalize_series_value(value: &Value) -> Result<NormalizedPayload, PayloadError> {
    SHAPES
        .iter()
        .find_map(|&(shape, matcher)| {
            matcher(value).map(|items| NormalizedPayload {
                shape,
                prices: items.iter().map(price_of).collect(),
            })
        })
        .ok_or(PayloadError::UnrecognizedShape)
}

/// Price of one element; anything missing, non-numeric or non-finite is 0.
pub fn price_of(item: &Value) -> f64 {
    let parsed = match item.get("price") {
        Some(Value::Number(number)) => number.as_f64(),
        Some(Value::String(raw)) => parse_leading_float(raw),
        _ => None,
    };
    parsed.filter(|price| price.is_finite()).unwrap_or(0.0)
}

/// Parse the longest leading decimal literal, ignoring trailing garbage
/// (`"12.5 USD"` -> 12.5). `None` if no digits lead the string.
pub fn parse_leading_float(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |mut at: usize| {
        while at < bytes.len() && bytes[at].is_ascii_digit() {
            at += 1;
        }
        at
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_from(end);
    let mut digit_count = int_end - end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        digit_count += frac_end - (end + 1);
        end = frac_end;
    }

    if digit_count == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_start = end + 1;
        if matches!(bytes.get(exp_start), Some(b'+' | b'-')) {
            exp_start += 1;
        }
        let exp_end = digits_from(exp_start);
        if exp_end > exp_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok().filter(|value| value.is_finite())
}
