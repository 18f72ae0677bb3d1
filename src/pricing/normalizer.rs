//! Numeric input normalization.
//!
//! Form fields arrive mid-edit: a user may clear a field, paste text, or type a
//! minus sign before the digits. Everything that enters the engine passes
//! through [`normalize`], which is total: it never fails and always yields a
//! non-negative amount.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerce an arbitrary JSON value into a non-negative decimal.
///
/// * numbers and numeric strings parse normally (`"1,250.50"` is accepted)
/// * `null`, empty strings, booleans, arrays, objects and unparseable text map to zero
/// * negative values clamp to zero
/// * values outside the representable range map to zero
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use serde_json::json;
/// use hajj_costing::pricing::normalize;
///
/// assert_eq!(normalize(&json!("12.5")), dec!(12.5));
/// assert_eq!(normalize(&json!(-3)), dec!(0));
/// assert_eq!(normalize(&json!(null)), dec!(0));
/// assert_eq!(normalize(&json!("abc")), dec!(0));
/// ```
pub fn normalize(raw: &Value) -> Decimal {
    match raw {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                normalize_decimal(Decimal::from(i))
            } else if let Some(u) = n.as_u64() {
                normalize_decimal(Decimal::from(u))
            } else {
                n.as_f64().map(normalize_f64).unwrap_or(Decimal::ZERO)
            }
        }
        Value::String(s) => normalize_str(s),
        _ => Decimal::ZERO,
    }
}

/// Parse free text into a non-negative decimal.
pub fn normalize_str(raw: &str) -> Decimal {
    let cleaned: String = raw.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Decimal::ZERO;
    }

    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .map(normalize_decimal)
        .unwrap_or(Decimal::ZERO)
}

/// Convert a float into a non-negative decimal. NaN and infinities become zero.
pub fn normalize_f64(raw: f64) -> Decimal {
    if !raw.is_finite() {
        return Decimal::ZERO;
    }
    // Display gives the shortest round-tripping representation, so 0.1 stays 0.1.
    Decimal::from_str(&raw.to_string())
        .map(normalize_decimal)
        .unwrap_or(Decimal::ZERO)
}

/// Clamp a decimal at zero and strip trailing zeros from its scale.
pub fn normalize_decimal(raw: Decimal) -> Decimal {
    if raw.is_sign_negative() {
        Decimal::ZERO
    } else {
        raw.normalize()
    }
}

/// Serde helper applying [`normalize`] while deserializing.
///
/// Use with `#[serde(default, deserialize_with = "lenient")]` so that a
/// missing, null or malformed field loads as zero instead of failing.
pub fn lenient<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.as_ref().map(normalize).unwrap_or(Decimal::ZERO))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_normalize_numbers() {
        assert_eq!(normalize(&json!(500)), dec!(500));
        assert_eq!(normalize(&json!(0.1)), dec!(0.1));
        assert_eq!(normalize(&json!(12.75)), dec!(12.75));
        assert_eq!(normalize(&json!(u64::MAX)), Decimal::from(u64::MAX));
    }

    #[test]
    fn test_normalize_negative_clamps_to_zero() {
        assert_eq!(normalize(&json!(-1)), dec!(0));
        assert_eq!(normalize(&json!(-0.5)), dec!(0));
        assert_eq!(normalize(&json!("-200")), dec!(0));
        assert_eq!(normalize_decimal(dec!(-7.25)), dec!(0));
    }

    #[test]
    fn test_normalize_strings() {
        assert_eq!(normalize_str("  42 "), dec!(42));
        assert_eq!(normalize_str("1,250.50"), dec!(1250.5));
        assert_eq!(normalize_str("1e3"), dec!(1000));
        assert_eq!(normalize_str(""), dec!(0));
        assert_eq!(normalize_str("   "), dec!(0));
        assert_eq!(normalize_str("twelve"), dec!(0));
        assert_eq!(normalize_str("NaN"), dec!(0));
        assert_eq!(normalize_str("12abc"), dec!(0));
    }

    #[test]
    fn test_normalize_non_numeric_values() {
        assert_eq!(normalize(&Value::Null), dec!(0));
        assert_eq!(normalize(&json!(true)), dec!(0));
        assert_eq!(normalize(&json!([1, 2])), dec!(0));
        assert_eq!(normalize(&json!({"amount": 3})), dec!(0));
    }

    #[test]
    fn test_normalize_non_finite_floats() {
        assert_eq!(normalize_f64(f64::NAN), dec!(0));
        assert_eq!(normalize_f64(f64::INFINITY), dec!(0));
        assert_eq!(normalize_f64(f64::NEG_INFINITY), dec!(0));
        // Out of Decimal's range
        assert_eq!(normalize_f64(1e300), dec!(0));
    }

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "lenient")]
        amount: Decimal,
    }

    #[test]
    fn test_lenient_deserialization() {
        let row: Row = serde_json::from_value(json!({"amount": "300"})).unwrap();
        assert_eq!(row.amount, dec!(300));

        let row: Row = serde_json::from_value(json!({"amount": null})).unwrap();
        assert_eq!(row.amount, dec!(0));

        let row: Row = serde_json::from_value(json!({"amount": -5})).unwrap();
        assert_eq!(row.amount, dec!(0));

        let row: Row = serde_json::from_value(json!({})).unwrap();
        assert_eq!(row.amount, dec!(0));
    }
}
