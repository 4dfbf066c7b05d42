//! District/thana address matching.
//!
//! Reports are scoped to viewers by comparing "District-Thana"-shaped
//! strings. No fuzzy matching, no geocoding: citizens get exact
//! (case-insensitive) equality against their own address, police get
//! substring containment in either direction against their station string.
//!
//! A blank viewer string disables filtering entirely, so an account with
//! no recognizable district token sees everything rather than nothing.

/// Case-insensitive equality between a report's address and a citizen
/// viewer's address.
#[must_use]
pub fn matches_citizen_address(reporter_address: &str, viewer_address: &str) -> bool {
    let viewer = viewer_address.trim();
    if viewer.is_empty() {
        return true;
    }
    reporter_address.trim().eq_ignore_ascii_case(viewer)
}

/// Station match for police viewers.
///
/// The report's `location` is authoritative; `reporter_address` is only
/// consulted when the location is blank. The match is case-insensitive
/// equality or substring containment in either direction.
#[must_use]
pub fn matches_station(location: &str, reporter_address: &str, station: &str) -> bool {
    let station = station.trim();
    if station.is_empty() {
        return true;
    }

    let field = if location.trim().is_empty() {
        reporter_address
    } else {
        location
    };

    contains_either_way(field.trim(), station)
}

fn contains_either_way(a: &str, b: &str) -> bool {
    let a = a.to_lowercase();
    let b = b.to_lowercase();
    a == b || a.contains(&b) || b.contains(&a)
}

/// Filters reports for a citizen viewer, preserving input order.
pub fn filter_citizen<'a, T>(
    reports: impl IntoIterator<Item = &'a T>,
    reporter_address: impl Fn(&T) -> &str,
    viewer_address: &str,
) -> Vec<&'a T> {
    reports
        .into_iter()
        .filter(|r| matches_citizen_address(reporter_address(r), viewer_address))
        .collect()
}

/// Filters reports for a police viewer, preserving input order.
pub fn filter_station<'a, T>(
    reports: impl IntoIterator<Item = &'a T>,
    fields: impl Fn(&T) -> (&str, &str),
    station: &str,
) -> Vec<&'a T> {
    reports
        .into_iter()
        .filter(|r| {
            let (location, reporter_address) = fields(r);
            matches_station(location, reporter_address, station)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_citizen_match_is_exact_case_insensitive() {
        assert!(matches_citizen_address("Dhaka-Mirpur", "dhaka-mirpur"));
        assert!(matches_citizen_address(" Dhaka-Mirpur ", "Dhaka-Mirpur"));
        // Substring is not enough for citizens
        assert!(!matches_citizen_address("Dhaka-Mirpur, Block D", "Dhaka-Mirpur"));
        assert!(!matches_citizen_address("Chittagong-Agrabad", "Dhaka-Mirpur"));
    }

    #[test]
    fn test_station_match_substring_either_direction() {
        // Report location contains the station
        assert!(matches_station("Dhaka-Mirpur, Block D", "", "Dhaka-Mirpur"));
        // Station contains the report location
        assert!(matches_station("Mirpur", "", "Dhaka-Mirpur"));
        // Exact
        assert!(matches_station("dhaka-mirpur", "", "Dhaka-Mirpur"));
        // Different district
        assert!(!matches_station("Chittagong-Agrabad", "", "Dhaka-Mirpur"));
    }

    #[test]
    fn test_station_match_falls_back_to_reporter_address() {
        assert!(matches_station("", "Dhaka-Mirpur", "Dhaka-Mirpur"));
        assert!(!matches_station("", "Chittagong-Agrabad", "Dhaka-Mirpur"));
        // Location wins when both are present
        assert!(!matches_station("Chittagong-Agrabad", "Dhaka-Mirpur", "Dhaka-Mirpur"));
    }

    #[test]
    fn test_blank_viewer_string_disables_filtering() {
        assert!(matches_station("Chittagong-Agrabad", "", ""));
        assert!(matches_station("anything at all", "", "  "));
        assert!(matches_citizen_address("Dhaka-Mirpur", ""));
    }

    #[test]
    fn test_filter_preserves_order_and_is_idempotent() {
        struct R {
            location: String,
        }
        let reports = vec![
            R { location: "Dhaka-Mirpur, Block D".into() },
            R { location: "Chittagong-Agrabad".into() },
            R { location: "Dhaka-Mirpur".into() },
        ];

        let once = filter_station(&reports, |r| (r.location.as_str(), ""), "Dhaka-Mirpur");
        assert_eq!(once.len(), 2);
        assert_eq!(once[0].location, "Dhaka-Mirpur, Block D");
        assert_eq!(once[1].location, "Dhaka-Mirpur");

        // Filtering an already-matching list again returns the same list
        let twice = filter_station(
            once.iter().copied(),
            |r| (r.location.as_str(), ""),
            "Dhaka-Mirpur",
        );
        assert_eq!(twice.len(), once.len());
        assert!(twice
            .iter()
            .zip(once.iter())
            .all(|(a, b)| a.location == b.location));
    }
}
