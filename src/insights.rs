//! Post-scoring analysis: finds the most consistently difficult
//! destinations, profiles what drives their difficulty, and emits
//! operational recommendations plus a machine-readable JSON summary.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::pipeline::rank::mean;
use crate::pipeline::types::{DifficultyClass, FlightRecord};

/// How many destinations make the headline summary.
const TOP_DESTINATIONS: usize = 5;

/// Average values of the features that most often explain a high score.
#[derive(Debug, Serialize)]
pub struct DriverProfile {
    pub child_ratio: f64,
    pub ssr_per_pax: f64,
    pub is_high_risk_transfer: f64,
    pub fleet_complexity_score: f64,
    pub time_pressure_score: f64,
}

/// Per-destination difficulty summary.
#[derive(Debug, Serialize)]
pub struct DestinationInsight {
    pub station: String,
    pub flight_count: usize,
    pub avg_difficulty_score: f64,
    pub difficult_flight_count: usize,
    pub drivers: DriverProfile,
}

/// The JSON artifact written next to the final CSV.
#[derive(Debug, Serialize)]
pub struct InsightsSummary {
    pub generated_at: DateTime<Utc>,
    pub total_flights: usize,
    pub top_destinations: Vec<DestinationInsight>,
}

/// Summarizes every arrival station, sorted by average difficulty score
/// descending.
pub fn destination_analysis(rows: &[FlightRecord]) -> Vec<DestinationInsight> {
    let mut by_station: BTreeMap<&str, Vec<&FlightRecord>> = BTreeMap::new();
    for row in rows {
        by_station
            .entry(row.scheduled_arrival_station_code.as_str())
            .or_default()
            .push(row);
    }

    let mut insights: Vec<DestinationInsight> = by_station
        .into_iter()
        .map(|(station, flights)| {
            let scores: Vec<f64> = flights.iter().map(|f| f.difficulty_score).collect();
            let difficult = flights
                .iter()
                .filter(|f| f.difficulty_class == DifficultyClass::Difficult)
                .count();
            let collect = |get: fn(&FlightRecord) -> f64| {
                mean(&flights.iter().map(|&f| get(f)).collect::<Vec<f64>>())
            };
            DestinationInsight {
                station: station.to_string(),
                flight_count: flights.len(),
                avg_difficulty_score: mean(&scores),
                difficult_flight_count: difficult,
                drivers: DriverProfile {
                    child_ratio: collect(|f| f.child_ratio),
                    ssr_per_pax: collect(|f| f.ssr_per_pax),
                    is_high_risk_transfer: collect(|f| f.is_high_risk_transfer as f64),
                    fleet_complexity_score: collect(|f| f.fleet_complexity_score as f64),
                    time_pressure_score: collect(|f| f.time_pressure_score as f64),
                },
            }
        })
        .collect();

    insights.sort_by(|a, b| b.avg_difficulty_score.total_cmp(&a.avg_difficulty_score));
    insights
}

/// Logs the top destinations and their driver profiles, prints the
/// operational recommendations, and writes `difficulty_insights.json`
/// into the output directory.
pub fn generate_insights(rows: &[FlightRecord], output_dir: &Path) -> Result<()> {
    info!("Analyzing results for insights and recommendations");

    let mut analysis = destination_analysis(rows);
    analysis.truncate(TOP_DESTINATIONS);

    info!(count = analysis.len(), "Top difficult destinations");
    for dest in &analysis {
        info!(
            station = %dest.station,
            flights = dest.flight_count,
            avg_score = dest.avg_difficulty_score,
            difficult_flights = dest.difficult_flight_count,
            child_ratio = dest.drivers.child_ratio,
            ssr_per_pax = dest.drivers.ssr_per_pax,
            high_risk_transfer = dest.drivers.is_high_risk_transfer,
            fleet_complexity = dest.drivers.fleet_complexity_score,
            time_pressure = dest.drivers.time_pressure_score,
            "Destination difficulty profile"
        );
    }

    log_recommendations();

    let summary = InsightsSummary {
        generated_at: Utc::now(),
        total_flights: rows.len(),
        top_destinations: analysis,
    };
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join("difficulty_insights.json");
    std::fs::write(&path, serde_json::to_string_pretty(&summary)?)?;
    info!(path = %path.display(), "Insights summary saved");

    Ok(())
}

fn log_recommendations() {
    info!(
        "Recommendation: destinations with high child_ratio and ssr_per_pax benefit from a \
         special-assistance coordinator assigned at the gate"
    );
    info!(
        "Recommendation: flights combining high-risk transfers with complex fleets should be \
         flagged in ground operations, with baggage crews pre-staged at the arrival gate"
    );
    info!(
        "Recommendation: during peak departure windows (07-09 and 16-19 local) position an \
         operations duty manager to reallocate staff toward the highest-scoring flights"
    );
}
