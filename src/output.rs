//! CSV persistence for the scored flight table.

use anyhow::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::pipeline::types::{DifficultyClass, FlightRecord};

/// The reporter's column subset: identity, headline features, score
/// outputs, and the per-feature rank columns kept for driver analysis.
#[derive(Debug, Serialize, Deserialize)]
pub struct FinalRow {
    pub scheduled_departure_date_local: NaiveDate,
    pub company_id: String,
    pub flight_number: String,
    pub scheduled_departure_station_code: String,
    pub scheduled_arrival_station_code: String,
    pub load_factor: f64,
    pub ground_time_deficit: f64,
    pub ssr_count: u32,
    pub total_bags: u32,
    pub fleet_complexity_score: u8,
    pub time_pressure_score: u8,
    pub is_high_risk_transfer: u8,
    pub departure_hour: u32,
    pub difficulty_score: f64,
    pub difficulty_rank_daily: u32,
    pub difficulty_class: DifficultyClass,
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
}

impl From<&FlightRecord> for FinalRow {
    fn from(r: &FlightRecord) -> Self {
        FinalRow {
            scheduled_departure_date_local: r.scheduled_departure_date_local,
            company_id: r.company_id.clone(),
            flight_number: r.flight_number.clone(),
            scheduled_departure_station_code: r.scheduled_departure_station_code.clone(),
            scheduled_arrival_station_code: r.scheduled_arrival_station_code.clone(),
            load_factor: r.load_factor,
            ground_time_deficit: r.ground_time_deficit,
            ssr_count: r.ssr_count,
            total_bags: r.total_bags,
            fleet_complexity_score: r.fleet_complexity_score,
            time_pressure_score: r.time_pressure_score,
            is_high_risk_transfer: r.is_high_risk_transfer,
            departure_hour: r.departure_hour,
            difficulty_score: r.difficulty_score,
            difficulty_rank_daily: r.difficulty_rank_daily,
            difficulty_class: r.difficulty_class,
            load_factor_rank: r.load_factor_rank,
            ssr_per_pax_rank: r.ssr_per_pax_rank,
            child_ratio_rank: r.child_ratio_rank,
            basic_economy_ratio_rank: r.basic_economy_ratio_rank,
            bags_per_pax_rank: r.bags_per_pax_rank,
            is_international_rank: r.is_international_rank,
            ground_time_deficit_rank: r.ground_time_deficit_rank,
            fleet_complexity_score_rank: r.fleet_complexity_score_rank,
            time_pressure_score_rank: r.time_pressure_score_rank,
            is_high_risk_transfer_rank: r.is_high_risk_transfer_rank,
        }
    }
}

/// Writes the scored table sorted by (date ascending, score descending)
/// to `output_dir/filename`, creating the directory if needed.
pub fn write_final_csv(output_dir: &Path, filename: &str, rows: &[FlightRecord]) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(filename);

    let mut order: Vec<&FlightRecord> = rows.iter().collect();
    order.sort_by(|a, b| {
        a.scheduled_departure_date_local
            .cmp(&b.scheduled_departure_date_local)
            .then(b.difficulty_score.total_cmp(&a.difficulty_score))
    });

    let mut writer = csv::Writer::from_path(&path)?;
    for row in order {
        writer.serialize(FinalRow::from(row))?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = rows.len(), "Final analysis file saved");
    Ok(path)
}

/// Dumps the full feature table (every column) for debugging and driver
/// analysis, in input order.
pub fn write_feature_table(path: &Path, rows: &[FlightRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = rows.len(), "Feature table saved");
    Ok(())
}

/// Reads a previously written final CSV back in.
pub fn read_final_csv(path: &Path) -> Result<Vec<FinalRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}
