/// Maps a fleet-type string to an ordinal handling-complexity score.
///
/// | Family                  | Score |
/// |-------------------------|-------|
/// | B777 / B787 / B767      | 3     |
/// | B737 / A320 / A319      | 2     |
/// | ERJ / CRJ               | 1     |
/// | anything else           | 1     |
///
/// Rules are checked top to bottom on substring membership; an
/// unrecognized type falls through to the regional default.
pub fn fleet_complexity(fleet_type: &str) -> u8 {
    const WIDE_BODY: [&str; 3] = ["B777", "B787", "B767"];
    const NARROW_BODY: [&str; 3] = ["B737", "A320", "A319"];
    const REGIONAL: [&str; 2] = ["ERJ", "CRJ"];

    if WIDE_BODY.iter().any(|s| fleet_type.contains(s)) {
        return 3;
    }
    if NARROW_BODY.iter().any(|s| fleet_type.contains(s)) {
        return 2;
    }
    if REGIONAL.iter().any(|s| fleet_type.contains(s)) {
        return 1;
    }
    1
}

/// Maps a local departure hour (0-23) to an ordinal time-pressure score.
///
/// | Window                      | Score |
/// |-----------------------------|-------|
/// | 07-09, 16-19 (peaks)        | 3     |
/// | 05-06, 10-15, 20-21         | 2     |
/// | everything else             | 1     |
pub fn time_pressure(hour: u32) -> u8 {
    match hour {
        7..=9 | 16..=19 => 3,
        5..=6 | 10..=15 | 20..=21 => 2,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fleet_complexity_wide_body() {
        assert_eq!(fleet_complexity("B777-300ER"), 3);
        assert_eq!(fleet_complexity("B787-9"), 3);
        assert_eq!(fleet_complexity("B767-300"), 3);
    }

    #[test]
    fn test_fleet_complexity_narrow_body() {
        assert_eq!(fleet_complexity("B737-MAX8"), 2);
        assert_eq!(fleet_complexity("A320neo"), 2);
        assert_eq!(fleet_complexity("A319-100"), 2);
    }

    #[test]
    fn test_fleet_complexity_regional() {
        assert_eq!(fleet_complexity("ERJ-175"), 1);
        assert_eq!(fleet_complexity("CRJ900"), 1);
    }

    #[test]
    fn test_fleet_complexity_unknown_defaults_to_one() {
        assert_eq!(fleet_complexity("UNKNOWN"), 1);
        assert_eq!(fleet_complexity(""), 1);
    }

    #[test]
    fn test_time_pressure_boundaries() {
        assert_eq!(time_pressure(0), 1);
        assert_eq!(time_pressure(4), 1);
        assert_eq!(time_pressure(5), 2);
        assert_eq!(time_pressure(6), 2);
        assert_eq!(time_pressure(7), 3);
        assert_eq!(time_pressure(8), 3);
        assert_eq!(time_pressure(9), 3);
        assert_eq!(time_pressure(10), 2);
        assert_eq!(time_pressure(12), 2);
        assert_eq!(time_pressure(15), 2);
        assert_eq!(time_pressure(16), 3);
        assert_eq!(time_pressure(19), 3);
        assert_eq!(time_pressure(20), 2);
        assert_eq!(time_pressure(21), 2);
        assert_eq!(time_pressure(22), 1);
        assert_eq!(time_pressure(23), 1);
    }
}
