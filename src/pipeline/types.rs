//! Row types shared across the pipeline stages.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identity of one flight occurrence. The loader guarantees uniqueness of
/// this tuple; the pipeline never mutates it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlightKey {
    pub scheduled_departure_date_local: NaiveDate,
    pub company_id: String,
    pub flight_number: String,
    pub scheduled_departure_station_code: String,
    pub scheduled_arrival_station_code: String,
}

/// Three-tier difficulty classification, ascending in score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DifficultyClass {
    #[default]
    Easy,
    Medium,
    Difficult,
}

impl fmt::Display for DifficultyClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DifficultyClass::Easy => "Easy",
            DifficultyClass::Medium => "Medium",
            DifficultyClass::Difficult => "Difficult",
        };
        f.write_str(s)
    }
}

/// One flight occurrence with every column the pipeline reads or writes.
///
/// The loader fills the identity, raw, and aggregate groups; the feature
/// builder fills the derived group; the scorer fills the rank and score
/// groups. Columns are only ever added, never removed.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct FlightRecord {
    // identity
    pub scheduled_departure_date_local: NaiveDate,
    pub company_id: String,
    pub flight_number: String,
    pub scheduled_departure_station_code: String,
    pub scheduled_arrival_station_code: String,

    // raw flight-level columns
    pub scheduled_ground_time_minutes: f64,
    pub minimum_turn_minutes: f64,
    pub total_seats: u32,
    pub fleet_type: String,
    pub scheduled_departure_datetime_local: NaiveDateTime,

    // merge aggregates
    pub total_pax: u32,
    pub lap_child_count: u32,
    pub is_child_count: u32,
    pub is_stroller_user_count: u32,
    pub basic_economy_pax: u32,
    pub ssr_count: u32,
    pub checked_bag_count: u32,
    pub transfer_bag_count: u32,

    // derived features
    pub ground_time_deficit: f64,
    pub load_factor: f64,
    pub ssr_per_pax: f64,
    pub child_ratio: f64,
    pub basic_economy_ratio: f64,
    pub total_bags: u32,
    pub bags_per_pax: f64,
    pub is_international: u8,
    pub fleet_complexity_score: u8,
    pub departure_hour: u32,
    pub time_pressure_score: u8,
    pub transfer_bag_ratio: f64,
    pub is_high_risk_transfer: u8,

    // per-day percentile ranks, one per difficulty feature
    pub load_factor_rank: f64,
    pub ssr_per_pax_rank: f64,
    pub child_ratio_rank: f64,
    pub basic_economy_ratio_rank: f64,
    pub bags_per_pax_rank: f64,
    pub is_international_rank: f64,
    pub ground_time_deficit_rank: f64,
    pub fleet_complexity_score_rank: f64,
    pub time_pressure_score_rank: f64,
    pub is_high_risk_transfer_rank: f64,

    // score outputs
    pub difficulty_score: f64,
    pub difficulty_rank_daily: u32,
    pub difficulty_class: DifficultyClass,
}

impl FlightRecord {
    pub fn key(&self) -> FlightKey {
        FlightKey {
            scheduled_departure_date_local: self.scheduled_departure_date_local,
            company_id: self.company_id.clone(),
            flight_number: self.flight_number.clone(),
            scheduled_departure_station_code: self.scheduled_departure_station_code.clone(),
            scheduled_arrival_station_code: self.scheduled_arrival_station_code.clone(),
        }
    }
}

/// Groups row indices by departure date. All ranking and quantile work is
/// scoped to one of these partitions; rows are never copied, only indexed.
pub fn day_partitions(rows: &[FlightRecord]) -> BTreeMap<NaiveDate, Vec<usize>> {
    let mut partitions: BTreeMap<NaiveDate, Vec<usize>> = BTreeMap::new();
    for (i, row) in rows.iter().enumerate() {
        partitions
            .entry(row.scheduled_departure_date_local)
            .or_default()
            .push(i);
    }
    partitions
}
