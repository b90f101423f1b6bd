use anyhow::ensure;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A listed company annotated with ESG scores and dividend yield.
///
/// Field names on the wire (and in persisted data) use the short keys of the
/// existing `stocks.json` files, so old data keeps loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    #[serde(rename = "n")]
    pub name: String,
    #[serde(rename = "c")]
    pub ticker: String,
    #[serde(rename = "e")]
    pub environmental: u8,
    #[serde(rename = "s")]
    pub social: u8,
    #[serde(rename = "g")]
    pub governance: u8,
    /// Dividend yield in percent (5.2 means 5.2%).
    #[serde(rename = "y")]
    pub dividend_yield: f64,
    #[serde(rename = "vol")]
    pub volatility: Volatility,
    #[serde(rename = "f")]
    pub highlight: String,
    #[serde(rename = "d")]
    pub dividend_note: String,
    #[serde(rename = "gr")]
    pub growth_note: String,
    #[serde(rename = "p")]
    pub positioning_note: String,
    #[serde(rename = "w")]
    pub website: String,
    #[serde(rename = "risk")]
    pub risk_note: String,
}

/// Volatility tier. New records must be `Low`, `Med` or `High`; collections
/// written before that check may carry other labels, which load as `Other`
/// and are written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Volatility {
    Low,
    Med,
    High,
    Other(String),
}

impl Volatility {
    pub fn as_str(&self) -> &str {
        match self {
            Volatility::Low => "Low",
            Volatility::Med => "Med",
            Volatility::High => "High",
            Volatility::Other(label) => label,
        }
    }
}

impl From<String> for Volatility {
    fn from(label: String) -> Self {
        label.parse().unwrap_or(Volatility::Other(label))
    }
}

impl From<Volatility> for String {
    fn from(vol: Volatility) -> Self {
        match vol {
            Volatility::Other(label) => label,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Volatility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Volatility {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim() {
            "Low" => Ok(Volatility::Low),
            "Med" => Ok(Volatility::Med),
            "High" => Ok(Volatility::High),
            other => anyhow::bail!("unknown volatility tier: {other}"),
        }
    }
}

impl StockRecord {
    pub const MAX_SCORE: u8 = 100;

    /// Whether E, S and G all lie in `0..=100`.
    pub fn scores_in_range(&self) -> bool {
        [self.environmental, self.social, self.governance]
            .iter()
            .all(|&v| v <= Self::MAX_SCORE)
    }
}

/// Per-request preference weights. `yield_scaled` is already on the 0-100
/// scale (a 5.2% yield corresponds to 78).
///
/// Only built through [`PreferenceVector::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PreferenceVector {
    #[serde(rename = "e")]
    environmental: u8,
    #[serde(rename = "s")]
    social: u8,
    #[serde(rename = "g")]
    governance: u8,
    #[serde(rename = "y")]
    yield_scaled: u8,
}

impl PreferenceVector {
    pub const MAX: u8 = 100;

    pub fn new(environmental: u8, social: u8, governance: u8, yield_scaled: u8) -> anyhow::Result<Self> {
        for (name, v) in [
            ("e", environmental),
            ("s", social),
            ("g", governance),
            ("y", yield_scaled),
        ] {
            ensure!(v <= Self::MAX, "Invalid {name} value: {v}");
        }
        Ok(Self {
            environmental,
            social,
            governance,
            yield_scaled,
        })
    }

    pub fn environmental(&self) -> u8 {
        self.environmental
    }

    pub fn social(&self) -> u8 {
        self.social
    }

    pub fn governance(&self) -> u8 {
        self.governance
    }

    pub fn yield_scaled(&self) -> u8 {
        self.yield_scaled
    }
}

impl Default for PreferenceVector {
    fn default() -> Self {
        Self {
            environmental: 50,
            social: 50,
            governance: 50,
            yield_scaled: 50,
        }
    }
}

/// A record paired with its match score. Serializes flat: the record's keys
/// plus `match`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    #[serde(flatten)]
    pub stock: StockRecord,
    #[serde(rename = "match")]
    pub match_score: f64,
}
