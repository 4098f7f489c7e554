use serde::Serialize;

/// A ratio below this is an improvement.
pub const IMPROVED_BELOW: f64 = 0.95;
/// A ratio above this is a regression.
pub const REGRESSED_ABOVE: f64 = 1.05;

/// Side-by-side ratio `v2 / v1` to two decimals; `"1.0"` when `v1` is zero.
pub fn ratio(v1: f64, v2: f64) -> String {
    if v1 == 0.0 {
        return "1.0".to_string();
    }
    format!("{:.2}", v2 / v1)
}

/// Numeric value of the displayed ratio.
pub fn ratio_value(v1: f64, v2: f64) -> f64 {
    ratio(v1, v2).parse().unwrap_or(1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improved,
    Regressed,
    Neutral,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Improved => "improved",
            Trend::Regressed => "regressed",
            Trend::Neutral => "neutral",
        }
    }
}

/// Classify the ratio of `v2` against `v1`, as displayed.
pub fn trend(v1: f64, v2: f64) -> Trend {
    let value = ratio_value(v1, v2);
    if value < IMPROVED_BELOW {
        Trend::Improved
    } else if value > REGRESSED_ABOVE {
        Trend::Regressed
    } else {
        Trend::Neutral
    }
}

/// `part` as a percentage of `total`; zero when there is no total.
pub fn rate(part: f64, total: f64) -> f64 {
    if total <= 0.0 {
        return 0.0;
    }
    part / total * 100.0
}

/// Relative change from `v1` to `v2` in percent; zero when `v1` is zero.
pub fn percent_change(v1: f64, v2: f64) -> f64 {
    if v1 == 0.0 {
        return 0.0;
    }
    (v2 - v1) / v1 * 100.0
}
