//! Boundary validation: raw JSON request bodies in, typed values out.
//!
//! Numbers may arrive as JSON numbers or as numeric strings (HTML form
//! submissions send strings). Everything past this module works on typed
//! values only.

use crate::domain::stock::{PreferenceVector, StockRecord, Volatility};
use crate::error::{Result, StockError};
use serde_json::{Map, Value};

pub const DEFAULT_PREFERENCE: i64 = 50;
pub const DEFAULT_TOP_N: usize = 3;

/// Keys a new record must carry, in the order they are checked.
pub const REQUIRED_STOCK_KEYS: [&str; 13] = [
    "n", "c", "e", "s", "g", "y", "vol", "f", "d", "gr", "p", "w", "risk",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzeParams {
    pub prefs: PreferenceVector,
    pub top_n: usize,
}

/// Parses an analyze request. A missing body, or a body that is not a JSON
/// object, means "all defaults".
pub fn parse_analyze(body: Option<&Value>) -> Result<AnalyzeParams> {
    let empty = Map::new();
    let obj = body.and_then(Value::as_object).unwrap_or(&empty);

    let mut scores = [0u8; 4];
    for (slot, name) in scores.iter_mut().zip(["e", "s", "g", "y"]) {
        let value = match present(obj, name) {
            Some(raw) => coerce_int(raw).ok_or_else(|| {
                StockError::validation(format!("Invalid {name} value: {}", display_raw(raw)))
            })?,
            None => DEFAULT_PREFERENCE,
        };
        if !(0..=i64::from(PreferenceVector::MAX)).contains(&value) {
            return Err(StockError::validation(format!(
                "Invalid {name} value: {value}"
            )));
        }
        *slot = value as u8;
    }

    let top_n = match present(obj, "top_n") {
        Some(raw) => {
            let n = coerce_int(raw).ok_or_else(|| {
                StockError::validation(format!("Invalid top_n value: {}", display_raw(raw)))
            })?;
            usize::try_from(n.max(0)).unwrap_or(usize::MAX)
        }
        None => DEFAULT_TOP_N,
    };

    let [e, s, g, y] = scores;
    let prefs = PreferenceVector::new(e, s, g, y)
        .map_err(|err| StockError::validation(err.to_string()))?;
    Ok(AnalyzeParams { prefs, top_n })
}

/// Validates and coerces a raw add-record body into a [`StockRecord`].
///
/// Check order: body shape, required keys, integer scores, yield, score
/// ranges, volatility tier, narrative fields.
pub fn parse_new_stock(body: Option<&Value>) -> Result<StockRecord> {
    let obj = body
        .and_then(Value::as_object)
        .filter(|o| !o.is_empty())
        .ok_or_else(|| StockError::validation("Invalid JSON body"))?;

    for key in REQUIRED_STOCK_KEYS {
        if is_missing(obj.get(key)) {
            return Err(StockError::validation(format!(
                "Missing required field: {key}"
            )));
        }
    }

    let mut scores = [0i64; 3];
    for (slot, key) in scores.iter_mut().zip(["e", "s", "g"]) {
        *slot = obj
            .get(key)
            .and_then(coerce_int)
            .ok_or_else(|| StockError::validation(format!("Invalid number for {key}")))?;
    }

    let dividend_yield = obj
        .get("y")
        .and_then(coerce_float)
        .ok_or_else(|| StockError::validation("Invalid number for yield"))?;

    if scores.iter().any(|v| !(0..=100).contains(v)) {
        return Err(StockError::validation("E, S, G must be 0-100"));
    }
    let [environmental, social, governance] = scores.map(|v| v as u8);

    let vol_raw = text_field(obj, "vol")?;
    let volatility = vol_raw
        .parse::<Volatility>()
        .map_err(|_| StockError::validation(format!("Invalid volatility: {vol_raw}")))?;

    Ok(StockRecord {
        name: text_field(obj, "n")?,
        ticker: text_field(obj, "c")?,
        environmental,
        social,
        governance,
        dividend_yield,
        volatility,
        highlight: text_field(obj, "f")?,
        dividend_note: text_field(obj, "d")?,
        growth_note: text_field(obj, "gr")?,
        positioning_note: text_field(obj, "p")?,
        website: text_field(obj, "w")?,
        risk_note: text_field(obj, "risk")?,
    })
}

fn present<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

fn is_missing(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Integer from a JSON integer, a finite float (truncated) or a numeric string.
fn coerce_int(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && f.abs() < i64::MAX as f64)
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

fn coerce_float(v: &Value) -> Option<f64> {
    let f = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    f.is_finite().then_some(f)
}

fn text_field(obj: &Map<String, Value>, key: &str) -> Result<String> {
    match obj.get(key) {
        Some(Value::String(s)) => Ok(s.trim().to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        _ => Err(StockError::validation(format!("Invalid value for {key}"))),
    }
}

fn display_raw(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
