//! Daily difficulty scoring: within-day percentile ranks over a fixed
//! feature set, an equally-weighted composite score, a dense daily rank,
//! and a three-tier classification.

use tracing::{debug, info};

use crate::pipeline::rank::{dense_ranks_desc, percentile_ranks, quantile};
use crate::pipeline::types::{DifficultyClass, FlightRecord, day_partitions};

/// Quantile thresholds splitting each day's scores into Easy / Medium /
/// Difficult.
const CLASS_QUANTILES: (f64, f64) = (0.33, 0.66);

struct DifficultyFeature {
    name: &'static str,
    /// When false the rank is inverted: smaller raw values score as more
    /// difficult (only ground_time_deficit, where less slack is worse).
    higher_is_worse: bool,
    value: fn(&FlightRecord) -> f64,
    set_rank: fn(&mut FlightRecord, f64),
}

/// The fixed feature set feeding the composite score, with rank polarity.
static DIFFICULTY_FEATURES: [DifficultyFeature; 10] = [
    DifficultyFeature {
        name: "load_factor",
        higher_is_worse: true,
        value: |r| r.load_factor,
        set_rank: |r, v| r.load_factor_rank = v,
    },
    DifficultyFeature {
        name: "ssr_per_pax",
        higher_is_worse: true,
        value: |r| r.ssr_per_pax,
        set_rank: |r, v| r.ssr_per_pax_rank = v,
    },
    DifficultyFeature {
        name: "child_ratio",
        higher_is_worse: true,
        value: |r| r.child_ratio,
        set_rank: |r, v| r.child_ratio_rank = v,
    },
    DifficultyFeature {
        name: "basic_economy_ratio",
        higher_is_worse: true,
        value: |r| r.basic_economy_ratio,
        set_rank: |r, v| r.basic_economy_ratio_rank = v,
    },
    DifficultyFeature {
        name: "bags_per_pax",
        higher_is_worse: true,
        value: |r| r.bags_per_pax,
        set_rank: |r, v| r.bags_per_pax_rank = v,
    },
    DifficultyFeature {
        name: "is_international",
        higher_is_worse: true,
        value: |r| r.is_international as f64,
        set_rank: |r, v| r.is_international_rank = v,
    },
    DifficultyFeature {
        name: "ground_time_deficit",
        higher_is_worse: false,
        value: |r| r.ground_time_deficit,
        set_rank: |r, v| r.ground_time_deficit_rank = v,
    },
    DifficultyFeature {
        name: "fleet_complexity_score",
        higher_is_worse: true,
        value: |r| r.fleet_complexity_score as f64,
        set_rank: |r, v| r.fleet_complexity_score_rank = v,
    },
    DifficultyFeature {
        name: "time_pressure_score",
        higher_is_worse: true,
        value: |r| r.time_pressure_score as f64,
        set_rank: |r, v| r.time_pressure_score_rank = v,
    },
    DifficultyFeature {
        name: "is_high_risk_transfer",
        higher_is_worse: true,
        value: |r| r.is_high_risk_transfer as f64,
        set_rank: |r, v| r.is_high_risk_transfer_rank = v,
    },
];

/// Scores, ranks, and classifies every flight within its departure-day
/// partition. Fills the 10 rank columns, `difficulty_score`,
/// `difficulty_rank_daily`, and `difficulty_class`.
pub fn calculate_daily_score(rows: &mut [FlightRecord]) {
    info!(flights = rows.len(), "Calculating daily difficulty scores");

    let feature_names: Vec<&str> = DIFFICULTY_FEATURES.iter().map(|f| f.name).collect();
    debug!(features = ?feature_names, "Difficulty feature set");

    let partitions = day_partitions(rows);

    for (date, indices) in &partitions {
        let mut rank_sums = vec![0.0; indices.len()];

        for feature in &DIFFICULTY_FEATURES {
            let values: Vec<f64> = indices.iter().map(|&i| (feature.value)(&rows[i])).collect();
            let ranks = percentile_ranks(&values);
            for (slot, &i) in indices.iter().enumerate() {
                let r = if feature.higher_is_worse {
                    ranks[slot]
                } else {
                    1.0 - ranks[slot]
                };
                (feature.set_rank)(&mut rows[i], r);
                rank_sums[slot] += r;
            }
        }

        for (slot, &i) in indices.iter().enumerate() {
            rows[i].difficulty_score =
                rank_sums[slot] / DIFFICULTY_FEATURES.len() as f64 * 100.0;
        }

        let scores: Vec<f64> = indices.iter().map(|&i| rows[i].difficulty_score).collect();
        let daily_ranks = dense_ranks_desc(&scores);
        for (slot, &i) in indices.iter().enumerate() {
            rows[i].difficulty_rank_daily = daily_ranks[slot];
        }

        classify_day(rows, indices, &scores);
        debug!(%date, flights = indices.len(), "Day partition scored");
    }

    info!(days = partitions.len(), "Daily scoring and classification complete");
}

/// Splits one day's flights into Easy / Medium / Difficult at the day's
/// score quantiles. Duplicate thresholds collapse adjacent bins rather
/// than failing, so degenerate days (few distinct scores, or a single
/// flight) yield fewer classes instead of an error.
fn classify_day(rows: &mut [FlightRecord], indices: &[usize], scores: &[f64]) {
    let (q_easy, q_medium) = CLASS_QUANTILES;
    // indices is non-empty, so both quantiles are defined
    let Some(t_easy) = quantile(scores, q_easy) else {
        return;
    };
    let Some(t_medium) = quantile(scores, q_medium) else {
        return;
    };

    for (slot, &i) in indices.iter().enumerate() {
        rows[i].difficulty_class = if scores[slot] <= t_easy {
            DifficultyClass::Easy
        } else if scores[slot] <= t_medium {
            DifficultyClass::Medium
        } else {
            DifficultyClass::Difficult
        };
    }
}
