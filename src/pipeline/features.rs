//! Feature builder: derives the per-flight operational metrics the scorer
//! consumes. Total over its inputs: zero denominators, unmatched airports,
//! and unrecognized fleet types resolve to defaults, never errors.

use chrono::Timelike;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::pipeline::classify::{fleet_complexity, time_pressure};
use crate::pipeline::rank::quantile;
use crate::pipeline::types::{FlightRecord, day_partitions};

/// Transfer-bag-ratio percentile a flight must reach, within its day, to
/// qualify as a high-risk transfer flight.
const HIGH_TRANSFER_QUANTILE: f64 = 0.75;
/// Ground-time-deficit percentile a flight must fall at or below, within
/// its day, to qualify as a high-risk transfer flight.
const LOW_GROUND_TIME_QUANTILE: f64 = 0.25;

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Extends every record with the derived feature columns.
///
/// `airports` maps station codes to ISO country codes; arrival stations
/// missing from the map are treated as domestic per the fill policy.
pub fn build_features(rows: &mut [FlightRecord], airports: &HashMap<String, String>) {
    info!(flights = rows.len(), "Building difficulty features");

    // Kept as Option until the per-day quantiles are taken: a flight with
    // zero bags has no defined transfer ratio and must not influence the
    // high-transfer threshold.
    let mut transfer_ratios: Vec<Option<f64>> = Vec::with_capacity(rows.len());

    for row in rows.iter_mut() {
        row.ground_time_deficit = row.scheduled_ground_time_minutes - row.minimum_turn_minutes;

        let pax = row.total_pax as f64;
        row.load_factor = ratio(pax, row.total_seats as f64);
        row.ssr_per_pax = ratio(row.ssr_count as f64, pax);
        row.child_ratio = ratio((row.lap_child_count + row.is_child_count) as f64, pax);
        row.basic_economy_ratio = ratio(row.basic_economy_pax as f64, pax);

        row.total_bags = row.checked_bag_count + row.transfer_bag_count;
        row.bags_per_pax = ratio(row.total_bags as f64, pax);

        row.is_international = match airports.get(&row.scheduled_arrival_station_code) {
            Some(country) if country != "US" => 1,
            _ => 0,
        };

        row.fleet_complexity_score = fleet_complexity(&row.fleet_type);
        row.departure_hour = row.scheduled_departure_datetime_local.hour();
        row.time_pressure_score = time_pressure(row.departure_hour);

        let transfer_ratio = if row.total_bags == 0 {
            None
        } else {
            Some(row.transfer_bag_count as f64 / row.total_bags as f64)
        };
        row.transfer_bag_ratio = transfer_ratio.unwrap_or(0.0);
        transfer_ratios.push(transfer_ratio);
    }

    flag_high_risk_transfers(rows, &transfer_ratios);

    info!("Feature engineering complete");
}

/// Flags flights sitting in the joint tail of their day: transfer-bag
/// ratio at or above the day's P75 while ground-time deficit is at or
/// below the day's P25. Every flag is recomputed from scratch, so the
/// stage stays re-runnable whatever state the rows arrive in.
fn flag_high_risk_transfers(rows: &mut [FlightRecord], transfer_ratios: &[Option<f64>]) {
    for (date, indices) in day_partitions(rows) {
        let defined_ratios: Vec<f64> = indices
            .iter()
            .filter_map(|&i| transfer_ratios[i])
            .collect();
        let deficits: Vec<f64> = indices.iter().map(|&i| rows[i].ground_time_deficit).collect();

        // None when no flight on this day carried any bags; nothing can
        // qualify then, but flags still get reset.
        let high_transfer = quantile(&defined_ratios, HIGH_TRANSFER_QUANTILE);
        let low_ground_time = quantile(&deficits, LOW_GROUND_TIME_QUANTILE);

        let mut flagged = 0usize;
        for &i in &indices {
            let qualifies = match (transfer_ratios[i], high_transfer, low_ground_time) {
                (Some(r), Some(high), Some(low)) => {
                    r >= high && rows[i].ground_time_deficit <= low
                }
                _ => false,
            };
            rows[i].is_high_risk_transfer = u8::from(qualifies);
            flagged += usize::from(qualifies);
        }
        debug!(%date, flights = indices.len(), flagged, "High-risk transfer flags assigned");
    }
}
