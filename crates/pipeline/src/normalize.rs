//! Rescales biased scores onto a readable 0 to 100 range.
//!
//! Biased scores span many orders of magnitude, so a fourth root flattens
//! them before rescaling against the top candidate. The +1 shift keeps the
//! root defined at zero.

use crate::collector::ScoredRec;

/// Root applied before rescaling; tames the spread without reordering.
pub const RESCALE_EXPONENT: f64 = 0.25;

/// Rescales scores in place so the strongest candidate reads 100.00.
pub fn normalize(recs: &mut [ScoredRec]) {
    let top = recs
        .iter()
        .map(|rec| rec.score)
        .fold(f64::NEG_INFINITY, f64::max);
    if !top.is_finite() {
        return;
    }
    let top = (top + 1.0).powf(RESCALE_EXPONENT);
    for rec in recs.iter_mut() {
        rec.score = round2((rec.score + 1.0).powf(RESCALE_EXPONENT) / top * 100.0);
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
