use serde::Serialize;

pub const DURATION_WEIGHT: f64 = 0.5;
pub const TASK_WEIGHT: f64 = 0.3;
pub const GC_PENALTY_WEIGHT: f64 = 2.0;

/// Performance counters of one application side.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EfficiencyInputs {
    pub gc_time_ms: f64,
    pub completed_tasks: f64,
    pub total_tasks: f64,
}

/// Heuristic efficiency score; higher is better and the value may go negative.
///
/// Shorter runs, less GC overhead and a higher completion ratio all raise the
/// score. A zero duration has no defined efficiency and scores `0`.
pub fn efficiency_score(duration_ms: f64, perf: &EfficiencyInputs) -> i64 {
    if duration_ms == 0.0 {
        return 0;
    }

    let gc_penalty = (perf.gc_time_ms / duration_ms) * 100.0;
    let duration_score = (100.0 - (duration_ms / 100_000.0) * 10.0).max(0.0);
    let task_score = (perf.completed_tasks / perf.total_tasks.max(1.0)) * 100.0;

    let raw = duration_score * DURATION_WEIGHT + task_score * TASK_WEIGHT
        - gc_penalty * GC_PENALTY_WEIGHT;

    // Half-up rounding, so -2.5 becomes -2
    (raw + 0.5).floor() as i64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    App1,
    App2,
    Tie,
}

impl Winner {
    pub fn as_str(&self) -> &'static str {
        match self {
            Winner::App1 => "App 1",
            Winner::App2 => "App 2",
            Winner::Tie => "Tie",
        }
    }
}

/// Strictly greater score wins; equal scores are a tie.
pub fn winner(score1: i64, score2: i64) -> Winner {
    match score1.cmp(&score2) {
        std::cmp::Ordering::Greater => Winner::App1,
        std::cmp::Ordering::Less => Winner::App2,
        std::cmp::Ordering::Equal => Winner::Tie,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perf(gc: f64, completed: f64, total: f64) -> EfficiencyInputs {
        EfficiencyInputs {
            gc_time_ms: gc,
            completed_tasks: completed,
            total_tasks: total,
        }
    }

    #[test]
    fn test_zero_duration_scores_zero() {
        assert_eq!(efficiency_score(0.0, &perf(1_000_000.0, 5.0, 10.0)), 0);
        assert_eq!(efficiency_score(0.0, &EfficiencyInputs::default()), 0);
    }

    #[test]
    fn test_reference_score() {
        // duration 120s: duration_score 88, task_score 100, gc_penalty 1
        let score = efficiency_score(120_000.0, &perf(1_200.0, 10.0, 10.0));
        assert_eq!(score, 72); // 44 + 30 - 2
    }

    #[test]
    fn test_long_runs_floor_duration_score() {
        // 2_000_000 ms would give a negative duration score; it is clamped to 0
        let score = efficiency_score(2_000_000.0, &perf(0.0, 1.0, 1.0));
        assert_eq!(score, 30);
    }

    #[test]
    fn test_heavy_gc_goes_negative() {
        let score = efficiency_score(1_000.0, &perf(1_000.0, 0.0, 0.0));
        // 99.9*0.5 + 0 - 200
        assert_eq!(score, -150);
    }

    #[test]
    fn test_zero_task_count_is_guarded() {
        let score = efficiency_score(100_000.0, &perf(0.0, 0.0, 0.0));
        assert_eq!(score, 45);
    }

    #[test]
    fn test_score_is_monotonic_in_gc_time() {
        let low = efficiency_score(60_000.0, &perf(100.0, 5.0, 5.0));
        let high = efficiency_score(60_000.0, &perf(10_000.0, 5.0, 5.0));
        assert!(low > high);
    }

    #[test]
    fn test_winner_is_antisymmetric() {
        let scores = [-20, 0, 5, 72, 72];
        for a in scores {
            for b in scores {
                let forward = winner(a, b);
                let backward = winner(b, a);
                match forward {
                    Winner::App1 => assert_eq!(backward, Winner::App2),
                    Winner::App2 => assert_eq!(backward, Winner::App1),
                    Winner::Tie => {
                        assert_eq!(backward, Winner::Tie);
                        assert_eq!(a, b);
                    }
                }
            }
        }
    }
}
