// src/common/lenient.rs
//
// Registros antigos no store guardavam quantidade e preço como texto
// ("5", "19.90") ou nem guardavam. Estes desserializadores aceitam número,
// texto numérico ou ausência (vira zero).

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{de::Error, Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Raw {
    Number(serde_json::Number),
    Text(String),
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return Some(Decimal::ZERO);
    }
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

pub fn decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Option::<Raw>::deserialize(deserializer)? {
        None => return Ok(Decimal::ZERO),
        Some(Raw::Number(n)) => n.to_string(),
        Some(Raw::Text(s)) => s,
    };
    parse_decimal(&text).ok_or_else(|| D::Error::custom(format!("valor decimal inválido: {text}")))
}

pub fn quantity<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = match Option::<Raw>::deserialize(deserializer)? {
        None => return Ok(0),
        Some(Raw::Number(n)) => n.to_string(),
        Some(Raw::Text(s)) => s,
    };

    let parsed = parse_decimal(&value)
        .filter(|d| d.fract().is_zero() && !d.is_sign_negative())
        .and_then(|d| d.to_u32());

    parsed.ok_or_else(|| D::Error::custom(format!("quantidade inválida: {value}")))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "quantity")]
        quantity: u32,
        #[serde(default, deserialize_with = "decimal")]
        price: Decimal,
    }

    fn row(value: serde_json::Value) -> Result<Row, serde_json::Error> {
        serde_json::from_value(value)
    }

    #[test]
    fn accepts_numbers() {
        let r = row(json!({ "quantity": 7, "price": 19.9 })).unwrap();
        assert_eq!(r.quantity, 7);
        assert_eq!(r.price, dec!(19.9));
    }

    #[test]
    fn accepts_numeric_strings() {
        let r = row(json!({ "quantity": "12", "price": " 3.50 " })).unwrap();
        assert_eq!(r.quantity, 12);
        assert_eq!(r.price, dec!(3.50));
    }

    #[test]
    fn missing_or_null_fields_are_zero() {
        let r = row(json!({ "price": null })).unwrap();
        assert_eq!(r.quantity, 0);
        assert_eq!(r.price, Decimal::ZERO);
    }

    #[test]
    fn integral_floats_are_quantities() {
        assert_eq!(row(json!({ "quantity": 4.0 })).unwrap().quantity, 4);
    }

    #[test]
    fn rejects_negative_or_fractional_quantities() {
        assert!(row(json!({ "quantity": -1 })).is_err());
        assert!(row(json!({ "quantity": "2.5" })).is_err());
        assert!(row(json!({ "quantity": "abc" })).is_err());
    }
}
