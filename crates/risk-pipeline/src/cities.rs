//! Preset city coordinates for the CLI.

use geo_context::Location;

/// Well-known cities accepted by `--city`, name-matched case-insensitively
/// on the part before the comma.
pub const CITY_PRESETS: &[(&str, f64, f64)] = &[
    ("Delhi, India", 28.6139, 77.2090),
    ("Mumbai, India", 19.0760, 72.8777),
    ("Kolkata, India", 22.5726, 88.3639),
    ("Chennai, India", 13.0827, 80.2707),
    ("Bangalore, India", 12.9716, 77.5946),
    ("Hyderabad, India", 17.3850, 78.4867),
    ("Goa, India", 15.2993, 74.1240),
    ("Kerala, India", 10.8505, 76.2711),
    ("Tokyo, Japan", 35.6762, 139.6503),
    ("Kathmandu, Nepal", 27.7172, 85.3240),
    ("Jakarta, Indonesia", -6.2088, 106.8456),
    ("Singapore", 1.3521, 103.8198),
    ("Beijing, China", 39.9042, 116.4074),
    ("Manila, Philippines", 14.5995, 120.9842),
    ("Bangkok, Thailand", 13.7563, 100.5018),
    ("Dubai, UAE", 25.2048, 55.2708),
    ("New York, USA", 40.7128, -74.0060),
    ("Miami, USA", 25.7617, -80.1918),
    ("San Francisco, USA", 37.7749, -122.4194),
    ("Los Angeles, USA", 34.0522, -118.2437),
    ("Rio de Janeiro, Brazil", -22.9068, -43.1729),
    ("Mexico City, Mexico", 19.4326, -99.1332),
    ("Toronto, Canada", 43.6532, -79.3832),
    ("Vancouver, Canada", 49.2827, -123.1207),
    ("London, UK", 51.5074, -0.1278),
    ("Paris, France", 48.8566, 2.3522),
    ("Rome, Italy", 41.9028, 12.4964),
    ("Berlin, Germany", 52.5200, 13.4050),
    ("Athens, Greece", 37.9838, 23.7275),
    ("Sydney, Australia", -33.8688, 151.2093),
    ("Wellington, New Zealand", -41.2865, 174.7762),
    ("Cairo, Egypt", 30.0444, 31.2357),
];

/// Resolve a preset by full name or by the city part alone.
pub fn lookup(name: &str) -> Option<Location> {
    let query = name.trim().to_lowercase();
    CITY_PRESETS
        .iter()
        .find(|(preset, _, _)| {
            let preset = preset.to_lowercase();
            preset == query
                || preset
                    .split(',')
                    .next()
                    .is_some_and(|city| city.trim() == query)
        })
        .and_then(|&(_, lat, lon)| Location::new(lat, lon).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_full_name() {
        let loc = lookup("Kathmandu, Nepal").unwrap();
        assert_eq!(loc.latitude(), 27.7172);
        assert_eq!(loc.longitude(), 85.3240);
    }

    #[test]
    fn test_lookup_city_part_case_insensitive() {
        assert!(lookup("miami").is_some());
        assert!(lookup("TOKYO").is_some());
        assert!(lookup("Singapore").is_some());
    }

    #[test]
    fn test_lookup_unknown() {
        assert!(lookup("Atlantis").is_none());
    }

    #[test]
    fn test_all_presets_are_valid_locations() {
        for &(name, lat, lon) in CITY_PRESETS {
            assert!(Location::new(lat, lon).is_ok(), "{name}");
        }
    }
}
