//! Derived analytics that are not present in raw tool payloads.

mod compare;
mod efficiency;
mod format;
mod ratio;

pub use compare::{ComparisonSet, Pair, operator_delta, three_way};
pub use efficiency::{
    DURATION_WEIGHT, EfficiencyInputs, GC_PENALTY_WEIGHT, TASK_WEIGHT, Winner, efficiency_score,
    winner,
};
pub use format::{format_bytes, format_seconds, format_tasks, parse_timestamp_ms};
pub use ratio::{
    IMPROVED_BELOW, REGRESSED_ABOVE, Trend, percent_change, rate, ratio, ratio_value, trend,
};
