use crate::domain::stock::{PreferenceVector, RankedResult, StockRecord};

/// Maps a dividend-yield percentage onto the 0-100 preference scale.
pub const YIELD_SCALE: f64 = 15.0;
/// Divides the summed score gaps into match points.
pub const DIFF_DIVISOR: f64 = 4.5;

/// Match score for one record: 100 at a perfect fit, floored at 0, rounded to
/// one decimal.
pub fn match_score(stock: &StockRecord, prefs: &PreferenceVector) -> f64 {
    let gap = |score: u8, pref: u8| (f64::from(score) - f64::from(pref)).abs();

    let diff = gap(stock.environmental, prefs.environmental())
        + gap(stock.social, prefs.social())
        + gap(stock.governance, prefs.governance())
        + (stock.dividend_yield * YIELD_SCALE - f64::from(prefs.yield_scaled())).abs();

    let raw = (100.0 - diff / DIFF_DIVISOR).max(0.0);
    (raw * 10.0).round() / 10.0
}

/// Scores every record and returns the best `top_n`, highest first. Ties keep
/// the input order.
pub fn rank(stocks: &[StockRecord], prefs: &PreferenceVector, top_n: usize) -> Vec<RankedResult> {
    let mut ranked: Vec<RankedResult> = stocks
        .iter()
        .map(|stock| RankedResult {
            match_score: match_score(stock, prefs),
            stock: stock.clone(),
        })
        .collect();

    // `sort_by` is stable.
    ranked.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
    ranked.truncate(top_n);

    tracing::debug!(
        candidates = stocks.len(),
        returned = ranked.len(),
        top_match = ranked.first().map(|r| r.match_score),
        "ranked stocks"
    );
    ranked
}
