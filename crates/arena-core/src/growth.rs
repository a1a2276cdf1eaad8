//! Projected traffic / conversion growth for an analyzed site.
//!
//! Both series start at 100 (today's baseline, as a percentage) and grow
//! toward `100 + (100 - score) * 0.6` over twelve months.

use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Projection {
    pub month: &'static str,
    pub traffic: f64,
    pub conversions: f64,
}

pub fn improvement(current_score: f64) -> f64 {
    (100.0 - current_score.clamp(0.0, 100.0)) * 0.6
}

pub fn projections(current_score: f64) -> [Projection; 4] {
    let i = improvement(current_score);
    let row = |month: &'static str, traffic: f64, conversions: f64| Projection {
        month,
        traffic: 100.0 + i * traffic,
        conversions: 100.0 + i * conversions,
    };
    [
        row("Current", 0.0, 0.0),
        row("3 Months", 0.3, 0.25),
        row("6 Months", 0.6, 0.5),
        row("12 Months", 1.0, 0.8),
    ]
}
