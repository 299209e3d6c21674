use flight_difficulty::insights::destination_analysis;
use flight_difficulty::loader::{load_airports, load_and_prepare_all_data};
use flight_difficulty::output::{read_final_csv, write_final_csv};
use flight_difficulty::pipeline::features::build_features;
use flight_difficulty::pipeline::scoring::calculate_daily_score;
use flight_difficulty::pipeline::types::{DifficultyClass, FlightRecord, day_partitions};
use std::collections::BTreeSet;
use std::path::Path;

fn fixtures_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures"))
}

fn scored_fixture_rows() -> Vec<FlightRecord> {
    let mut rows = load_and_prepare_all_data(fixtures_dir()).expect("fixtures should load");
    let airports = load_airports(fixtures_dir()).expect("airport fixture should load");
    build_features(&mut rows, &airports);
    calculate_daily_score(&mut rows);
    rows
}

fn flight<'a>(rows: &'a [FlightRecord], number: &str) -> &'a FlightRecord {
    rows.iter()
        .find(|r| r.flight_number == number)
        .unwrap_or_else(|| panic!("flight {number} missing"))
}

#[test]
fn test_loader_merges_all_sources() {
    let rows = load_and_prepare_all_data(fixtures_dir()).unwrap();
    assert_eq!(rows.len(), 5);

    let keys: BTreeSet<_> = rows.iter().map(|r| r.key()).collect();
    assert_eq!(keys.len(), rows.len());

    let f100 = flight(&rows, "100");
    assert_eq!(f100.total_pax, 5);
    assert_eq!(f100.lap_child_count, 1);
    assert_eq!(f100.is_child_count, 1);
    assert_eq!(f100.basic_economy_pax, 1);
    assert_eq!(f100.ssr_count, 2); // two remarks on AAA111; orphan ZZZ999 dropped
    assert_eq!(f100.checked_bag_count, 2);
    assert_eq!(f100.transfer_bag_count, 1);

    // flight 400 has no PNR, remark, or bag rows
    let f400 = flight(&rows, "400");
    assert_eq!(f400.total_pax, 0);
    assert_eq!(f400.ssr_count, 0);
    assert_eq!(f400.checked_bag_count, 0);
}

#[test]
fn test_total_bags_identity() {
    let rows = scored_fixture_rows();
    for r in &rows {
        assert_eq!(r.total_bags, r.checked_bag_count + r.transfer_bag_count);
    }
}

#[test]
fn test_zero_pax_flight_has_zero_ratios() {
    let rows = scored_fixture_rows();
    let f400 = flight(&rows, "400");

    assert_eq!(f400.total_pax, 0);
    assert_eq!(f400.load_factor, 0.0);
    assert_eq!(f400.ssr_per_pax, 0.0);
    assert_eq!(f400.child_ratio, 0.0);
    assert_eq!(f400.basic_economy_ratio, 0.0);
    assert_eq!(f400.bags_per_pax, 0.0);
    assert_eq!(f400.transfer_bag_ratio, 0.0);
}

#[test]
fn test_feature_values_for_known_flights() {
    let rows = scored_fixture_rows();

    let f200 = flight(&rows, "200");
    assert_eq!(f200.ground_time_deficit, -15.0);
    assert_eq!(f200.is_international, 1);
    assert_eq!(f200.fleet_complexity_score, 3);
    assert_eq!(f200.departure_hour, 17);
    assert_eq!(f200.time_pressure_score, 3);

    let f300 = flight(&rows, "300");
    assert_eq!(f300.fleet_complexity_score, 1);
    assert_eq!(f300.time_pressure_score, 2);

    let f400 = flight(&rows, "400");
    assert_eq!(f400.is_international, 0);
    assert_eq!(f400.time_pressure_score, 1);
}

#[test]
fn test_high_risk_transfer_flag_joint_tail_only() {
    let rows = scored_fixture_rows();

    // flight 200 combines the day's highest transfer ratio (3/4) with the
    // day's lowest ground-time deficit (-15)
    assert_eq!(flight(&rows, "200").is_high_risk_transfer, 1);
    assert_eq!(flight(&rows, "100").is_high_risk_transfer, 0);
    assert_eq!(flight(&rows, "300").is_high_risk_transfer, 0);
    assert_eq!(flight(&rows, "400").is_high_risk_transfer, 0);
}

#[test]
fn test_lowest_deficit_gets_highest_inverted_rank() {
    let rows = scored_fixture_rows();
    let f200 = flight(&rows, "200");

    let day_max = rows
        .iter()
        .filter(|r| r.scheduled_departure_date_local == f200.scheduled_departure_date_local)
        .map(|r| r.ground_time_deficit_rank)
        .fold(0.0f64, f64::max);
    assert_eq!(f200.ground_time_deficit_rank, day_max);
}

#[test]
fn test_daily_ranks_dense_within_each_day() {
    let rows = scored_fixture_rows();

    for (_, indices) in day_partitions(&rows) {
        let ranks: BTreeSet<u32> = indices.iter().map(|&i| rows[i].difficulty_rank_daily).collect();
        let expected: BTreeSet<u32> = (1..=ranks.len() as u32).collect();
        assert_eq!(ranks, expected);
    }
}

#[test]
fn test_score_descends_with_rank() {
    let rows = scored_fixture_rows();

    for (_, indices) in day_partitions(&rows) {
        let mut day: Vec<&FlightRecord> = indices.iter().map(|&i| &rows[i]).collect();
        day.sort_by_key(|r| r.difficulty_rank_daily);
        for pair in day.windows(2) {
            assert!(pair[0].difficulty_score >= pair[1].difficulty_score);
        }
    }
}

#[test]
fn test_scores_bounded_and_classes_defined() {
    let rows = scored_fixture_rows();
    for r in &rows {
        assert!(r.difficulty_score >= 0.0 && r.difficulty_score <= 100.0);
        assert!(r.difficulty_rank_daily >= 1);
    }
}

#[test]
fn test_single_flight_day_classifies_without_panic() {
    let rows = scored_fixture_rows();
    let f500 = flight(&rows, "500");

    assert_eq!(f500.difficulty_rank_daily, 1);
    assert_eq!(f500.difficulty_class, DifficultyClass::Easy);
}

#[test]
fn test_pipeline_is_idempotent() {
    let mut first = scored_fixture_rows();
    let snapshot: Vec<(String, f64, u32, DifficultyClass)> = first
        .iter()
        .map(|r| {
            (
                r.flight_number.clone(),
                r.difficulty_score,
                r.difficulty_rank_daily,
                r.difficulty_class,
            )
        })
        .collect();

    calculate_daily_score(&mut first);
    let rerun: Vec<(String, f64, u32, DifficultyClass)> = first
        .iter()
        .map(|r| {
            (
                r.flight_number.clone(),
                r.difficulty_score,
                r.difficulty_rank_daily,
                r.difficulty_class,
            )
        })
        .collect();

    assert_eq!(snapshot, rerun);
}

#[test]
fn test_final_csv_written_sorted() {
    let rows = scored_fixture_rows();
    let dir = std::env::temp_dir().join("flight_difficulty_integration_csv");
    let _ = std::fs::remove_dir_all(&dir);

    let path = write_final_csv(&dir, "scored.csv", &rows).unwrap();
    let written = read_final_csv(&path).unwrap();

    assert_eq!(written.len(), rows.len());
    for pair in written.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        assert!(
            a.scheduled_departure_date_local < b.scheduled_departure_date_local
                || (a.scheduled_departure_date_local == b.scheduled_departure_date_local
                    && a.difficulty_score >= b.difficulty_score)
        );
    }

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_destination_analysis_over_scored_table() {
    let rows = scored_fixture_rows();
    let analysis = destination_analysis(&rows);

    // DEN appears on both days, so four distinct destinations total
    assert_eq!(analysis.len(), 4);
    let den = analysis.iter().find(|d| d.station == "DEN").unwrap();
    assert_eq!(den.flight_count, 2);
}
