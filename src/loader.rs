//! Loading and merging of the raw input CSVs into the flight-level table.
//!
//! Five files are expected in the data directory: flight-level data, PNR
//! booking data, PNR remark (special-service-request) data, bag-level
//! data, and the airport reference. A missing file or a missing required
//! column aborts the whole batch; flights with no matching PNR, remark,
//! or bag rows simply get zero counts.

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{info, warn};

use crate::pipeline::types::{FlightKey, FlightRecord};

pub const FLIGHT_FILE: &str = "Flight Level Data.csv";
pub const PNR_FILE: &str = "PNR+Flight+Level+Data.csv";
pub const REMARK_FILE: &str = "PNR Remark Level Data.csv";
pub const BAG_FILE: &str = "Bag+Level+Data.csv";
pub const AIRPORT_FILE: &str = "Airports Data.csv";

/// Accepts both `YYYY-MM-DD HH:MM:SS` and the RFC3339-style `T` separator.
fn de_local_datetime<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    NaiveDateTime::parse_from_str(&s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(&s, "%Y-%m-%dT%H:%M:%S"))
        .map_err(serde::de::Error::custom)
}

/// `Y`/`N` indicator columns.
fn de_yn<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(s == "Y")
}

#[derive(Debug, Deserialize)]
pub struct FlightRow {
    pub scheduled_departure_date_local: NaiveDate,
    pub company_id: String,
    pub flight_number: String,
    pub scheduled_departure_station_code: String,
    pub scheduled_arrival_station_code: String,
    pub scheduled_ground_time_minutes: f64,
    pub minimum_turn_minutes: f64,
    pub total_seats: u32,
    pub fleet_type: String,
    #[serde(deserialize_with = "de_local_datetime")]
    pub scheduled_departure_datetime_local: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
pub struct PnrRow {
    pub record_locator: String,
    pub scheduled_departure_date_local: NaiveDate,
    pub company_id: String,
    pub flight_number: String,
    pub scheduled_departure_station_code: String,
    pub scheduled_arrival_station_code: String,
    pub total_pax: u32,
    pub lap_child_count: u32,
    #[serde(deserialize_with = "de_yn")]
    pub is_child: bool,
    #[serde(deserialize_with = "de_yn")]
    pub is_stroller_user: bool,
    #[serde(alias = "basic_economy_pax")]
    pub basic_economy_ind: u32,
}

/// One special-service-request remark; joined to flights through the PNR
/// table's record locators, so only the locator matters here.
#[derive(Debug, Deserialize)]
pub struct RemarkRow {
    pub record_locator: String,
}

#[derive(Debug, Deserialize)]
pub struct BagRow {
    pub scheduled_departure_date_local: NaiveDate,
    pub company_id: String,
    pub flight_number: String,
    pub scheduled_departure_station_code: String,
    pub scheduled_arrival_station_code: String,
    pub bag_type: String,
}

#[derive(Debug, Deserialize)]
struct AirportRow {
    airport_iata_code: String,
    iso_country_code: String,
}

impl FlightRow {
    fn key(&self) -> FlightKey {
        FlightKey {
            scheduled_departure_date_local: self.scheduled_departure_date_local,
            company_id: self.company_id.clone(),
            flight_number: self.flight_number.clone(),
            scheduled_departure_station_code: self.scheduled_departure_station_code.clone(),
            scheduled_arrival_station_code: self.scheduled_arrival_station_code.clone(),
        }
    }
}

impl PnrRow {
    fn key(&self) -> FlightKey {
        FlightKey {
            scheduled_departure_date_local: self.scheduled_departure_date_local,
            company_id: self.company_id.clone(),
            flight_number: self.flight_number.clone(),
            scheduled_departure_station_code: self.scheduled_departure_station_code.clone(),
            scheduled_arrival_station_code: self.scheduled_arrival_station_code.clone(),
        }
    }
}

impl BagRow {
    fn key(&self) -> FlightKey {
        FlightKey {
            scheduled_departure_date_local: self.scheduled_departure_date_local,
            company_id: self.company_id.clone(),
            flight_number: self.flight_number.clone(),
            scheduled_departure_station_code: self.scheduled_departure_station_code.clone(),
            scheduled_arrival_station_code: self.scheduled_arrival_station_code.clone(),
        }
    }
}

fn read_csv<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let mut rows = Vec::new();
    for record in reader.deserialize() {
        let row: T = record.with_context(|| format!("parsing {}", path.display()))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Loads the airport reference table as a station code to country code map.
pub fn load_airports(data_dir: &Path) -> Result<HashMap<String, String>> {
    let rows: Vec<AirportRow> = read_csv(&data_dir.join(AIRPORT_FILE))?;
    info!(airports = rows.len(), "Airport reference loaded");
    Ok(rows
        .into_iter()
        .map(|r| (r.airport_iata_code, r.iso_country_code))
        .collect())
}

/// Loads all raw CSVs and merges them into one row per flight occurrence.
pub fn load_and_prepare_all_data(data_dir: &Path) -> Result<Vec<FlightRecord>> {
    info!(data_dir = %data_dir.display(), "Loading and preparing data");

    let flights: Vec<FlightRow> = read_csv(&data_dir.join(FLIGHT_FILE))?;
    let pnrs: Vec<PnrRow> = read_csv(&data_dir.join(PNR_FILE))?;
    let remarks: Vec<RemarkRow> = read_csv(&data_dir.join(REMARK_FILE))?;
    let bags: Vec<BagRow> = read_csv(&data_dir.join(BAG_FILE))?;

    info!(
        flights = flights.len(),
        pnr_rows = pnrs.len(),
        remark_rows = remarks.len(),
        bag_rows = bags.len(),
        "Input files loaded"
    );

    let records = merge_tables(flights, &pnrs, &remarks, &bags);
    info!(flights = records.len(), "Data loading and merging complete");
    Ok(records)
}

#[derive(Default)]
struct PnrAggregate {
    total_pax: u32,
    lap_child_count: u32,
    is_child_count: u32,
    is_stroller_user_count: u32,
    basic_economy_pax: u32,
}

/// Left-joins the PNR, remark, and bag aggregates onto the flight table.
/// Flight keys are unique by contract; duplicate flight rows are dropped
/// with a warning.
pub fn merge_tables(
    flights: Vec<FlightRow>,
    pnrs: &[PnrRow],
    remarks: &[RemarkRow],
    bags: &[BagRow],
) -> Vec<FlightRecord> {
    // PNR aggregation per flight key, plus the locator -> flight keys map
    // used to attach remarks. One locator can span several legs; a remark
    // then counts once on each leg, matching the booking-level join.
    let mut pnr_agg: HashMap<FlightKey, PnrAggregate> = HashMap::new();
    let mut locator_keys: HashMap<&str, Vec<FlightKey>> = HashMap::new();

    for pnr in pnrs {
        let key = pnr.key();
        let agg = pnr_agg.entry(key.clone()).or_default();
        agg.total_pax += pnr.total_pax;
        agg.lap_child_count += pnr.lap_child_count;
        agg.is_child_count += u32::from(pnr.is_child);
        agg.is_stroller_user_count += u32::from(pnr.is_stroller_user);
        agg.basic_economy_pax += pnr.basic_economy_ind;

        let keys = locator_keys.entry(pnr.record_locator.as_str()).or_default();
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    // Remarks with no matching locator have no flight to land on and are
    // dropped.
    let mut ssr_counts: HashMap<FlightKey, u32> = HashMap::new();
    let mut orphaned_remarks = 0usize;
    for remark in remarks {
        match locator_keys.get(remark.record_locator.as_str()) {
            Some(keys) => {
                for key in keys {
                    *ssr_counts.entry(key.clone()).or_default() += 1;
                }
            }
            None => orphaned_remarks += 1,
        }
    }
    if orphaned_remarks > 0 {
        warn!(orphaned_remarks, "Remarks with no matching PNR were dropped");
    }

    // Per-flight bag counts by type.
    let mut checked_counts: HashMap<FlightKey, u32> = HashMap::new();
    let mut transfer_counts: HashMap<FlightKey, u32> = HashMap::new();
    for bag in bags {
        match bag.bag_type.as_str() {
            "Origin" | "Checked" => *checked_counts.entry(bag.key()).or_default() += 1,
            "Transfer" => *transfer_counts.entry(bag.key()).or_default() += 1,
            other => warn!(bag_type = other, "Unrecognized bag type ignored"),
        }
    }

    let mut records = Vec::with_capacity(flights.len());
    let mut seen: HashSet<FlightKey> = HashSet::with_capacity(flights.len());

    for flight in flights {
        let key = flight.key();
        if !seen.insert(key.clone()) {
            warn!(
                date = %key.scheduled_departure_date_local,
                flight = %key.flight_number,
                "Duplicate flight key dropped"
            );
            continue;
        }

        let pnr = pnr_agg.remove(&key).unwrap_or_default();
        records.push(FlightRecord {
            scheduled_departure_date_local: flight.scheduled_departure_date_local,
            company_id: flight.company_id,
            flight_number: flight.flight_number,
            scheduled_departure_station_code: flight.scheduled_departure_station_code,
            scheduled_arrival_station_code: flight.scheduled_arrival_station_code,
            scheduled_ground_time_minutes: flight.scheduled_ground_time_minutes,
            minimum_turn_minutes: flight.minimum_turn_minutes,
            total_seats: flight.total_seats,
            fleet_type: flight.fleet_type,
            scheduled_departure_datetime_local: flight.scheduled_departure_datetime_local,
            total_pax: pnr.total_pax,
            lap_child_count: pnr.lap_child_count,
            is_child_count: pnr.is_child_count,
            is_stroller_user_count: pnr.is_stroller_user_count,
            basic_economy_pax: pnr.basic_economy_pax,
            ssr_count: ssr_counts.remove(&key).unwrap_or(0),
            checked_bag_count: checked_counts.remove(&key).unwrap_or(0),
            transfer_bag_count: transfer_counts.remove(&key).unwrap_or(0),
            ..Default::default()
        });
    }

    records
}
