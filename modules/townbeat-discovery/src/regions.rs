//! Region-name → postal-code lookup for the popular-location entry point.

/// US state and territory names with their postal codes.
const STATE_CODES: &[(&str, &str)] = &[
    ("alabama", "AL"),
    ("alaska", "AK"),
    ("arizona", "AZ"),
    ("arkansas", "AR"),
    ("california", "CA"),
    ("colorado", "CO"),
    ("connecticut", "CT"),
    ("delaware", "DE"),
    ("district of columbia", "DC"),
    ("florida", "FL"),
    ("georgia", "GA"),
    ("hawaii", "HI"),
    ("idaho", "ID"),
    ("illinois", "IL"),
    ("indiana", "IN"),
    ("iowa", "IA"),
    ("kansas", "KS"),
    ("kentucky", "KY"),
    ("louisiana", "LA"),
    ("maine", "ME"),
    ("maryland", "MD"),
    ("massachusetts", "MA"),
    ("michigan", "MI"),
    ("minnesota", "MN"),
    ("mississippi", "MS"),
    ("missouri", "MO"),
    ("montana", "MT"),
    ("nebraska", "NE"),
    ("nevada", "NV"),
    ("new hampshire", "NH"),
    ("new jersey", "NJ"),
    ("new mexico", "NM"),
    ("new york", "NY"),
    ("north carolina", "NC"),
    ("north dakota", "ND"),
    ("ohio", "OH"),
    ("oklahoma", "OK"),
    ("oregon", "OR"),
    ("pennsylvania", "PA"),
    ("puerto rico", "PR"),
    ("rhode island", "RI"),
    ("south carolina", "SC"),
    ("south dakota", "SD"),
    ("tennessee", "TN"),
    ("texas", "TX"),
    ("utah", "UT"),
    ("vermont", "VT"),
    ("virginia", "VA"),
    ("washington", "WA"),
    ("west virginia", "WV"),
    ("wisconsin", "WI"),
    ("wyoming", "WY"),
];

/// Map a free-form region name to a postal code. Unknown names fall back
/// to the first two letters, uppercased.
pub fn state_code(region_name: &str) -> String {
    let needle = region_name.trim().to_lowercase();
    for (name, code) in STATE_CODES {
        if *name == needle {
            return (*code).to_string();
        }
    }
    needle.chars().take(2).collect::<String>().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_states_map_to_codes() {
        assert_eq!(state_code("Minnesota"), "MN");
        assert_eq!(state_code("new york"), "NY");
        assert_eq!(state_code("  Wisconsin  "), "WI");
    }

    #[test]
    fn unknown_region_falls_back_to_first_two_letters() {
        assert_eq!(state_code("Ontario"), "ON");
        assert_eq!(state_code("x"), "X");
    }
}
