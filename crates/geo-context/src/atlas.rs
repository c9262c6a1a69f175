//! Data-driven band tables
//!
//! Three ordered region tables back every context lookup: landlocked
//! regions (coastal flag), forest-coverage regions, and seismic zones.
//! Tables are scanned in order and the first matching region wins, so
//! narrower regions must precede the broader ones that contain them
//! (e.g. the Nepal collision zone before the Eastern Himalayan belt).

use crate::{GeoContext, Location, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

/// Axis-aligned latitude/longitude box.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BoundingBox {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl BoundingBox {
    pub const fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        }
    }

    pub fn contains(&self, location: &Location) -> bool {
        let (lat, lon) = (location.latitude(), location.longitude());
        lat >= self.lat_min && lat <= self.lat_max && lon >= self.lon_min && lon <= self.lon_max
    }
}

/// Forest-coverage band, ordinal 0..3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForestBand {
    /// Urban or desert, no meaningful fuel load
    Barren,
    /// Low coverage (the default outside mapped regions)
    Sparse,
    /// Moderate coverage
    Moderate,
    /// Rainforest or dense boreal forest
    Dense,
}

impl ForestBand {
    pub fn ordinal(&self) -> u8 {
        match self {
            ForestBand::Barren => 0,
            ForestBand::Sparse => 1,
            ForestBand::Moderate => 2,
            ForestBand::Dense => 3,
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ForestBand::Barren => "Urban/Desert (No Forest)",
            ForestBand::Sparse => "Low Forest Coverage",
            ForestBand::Moderate => "Moderate Forest Coverage",
            ForestBand::Dense => "High Forest Coverage",
        }
    }
}

/// Seismic-hazard band, ordinal 0..4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeismicBand {
    /// Stable craton, microseismic activity only
    Stable,
    /// Occasional intraplate events
    Low,
    /// Some fault activity
    Moderate,
    /// Active fault zones
    High,
    /// Major plate boundaries
    Extreme,
}

impl SeismicBand {
    pub fn ordinal(&self) -> u8 {
        match self {
            SeismicBand::Stable => 0,
            SeismicBand::Low => 1,
            SeismicBand::Moderate => 2,
            SeismicBand::High => 3,
            SeismicBand::Extreme => 4,
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            SeismicBand::Stable => "Stable Region - Minimal Seismic Activity",
            SeismicBand::Low => "Low Risk - Minor Earthquakes",
            SeismicBand::Moderate => "Moderate Risk - Occasional Earthquakes",
            SeismicBand::High => "High Risk - Significant Earthquakes",
            SeismicBand::Extreme => "Extreme Risk - Major Earthquakes Possible",
        }
    }
}

/// Named bounding region without a band (landlocked table).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub name: String,
    pub bounds: BoundingBox,
}

/// Named bounding region carrying a forest band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestRegion {
    pub name: String,
    pub bounds: BoundingBox,
    pub band: ForestBand,
}

/// Named bounding region carrying a seismic band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeismicZone {
    pub name: String,
    pub bounds: BoundingBox,
    pub band: SeismicBand,
}

/// Zone name reported for locations outside every mapped seismic zone.
pub const STABLE_CRATON: &str = "Stable Craton";

/// The startup-loaded region tables backing all band lookups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeoAtlas {
    /// Regions known to be landlocked; anything else is treated as coastal.
    pub landlocked_regions: Vec<Region>,
    /// Forest-coverage regions, first match wins; default band is Sparse.
    pub forest_regions: Vec<ForestRegion>,
    /// Seismic zones, first match wins; default band is Stable.
    pub seismic_zones: Vec<SeismicZone>,
}

impl GeoAtlas {
    /// Create an empty atlas (every location coastal, sparse, stable).
    pub fn new() -> Self {
        Self::default()
    }

    /// Atlas with the built-in region tables.
    pub fn with_defaults() -> Self {
        let mut atlas = Self::new();
        atlas.load_default_regions();
        atlas
    }

    /// Load an atlas from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading geo atlas from {:?}", path);
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let atlas: GeoAtlas = serde_json::from_reader(reader)?;
        info!(
            "Loaded atlas: {} landlocked regions, {} forest regions, {} seismic zones",
            atlas.landlocked_regions.len(),
            atlas.forest_regions.len(),
            atlas.seismic_zones.len()
        );
        Ok(atlas)
    }

    fn load_default_regions(&mut self) {
        // Landlocked exclusions. Conservative default: unmapped = coastal.
        let landlocked: &[(&str, f64, f64, f64, f64)] = &[
            ("Northern India Interior", 20.0, 30.0, 75.0, 82.0),
            ("Gujarat Interior", 21.0, 24.0, 72.0, 75.0),
            ("Madhya Pradesh / Bihar", 23.0, 27.0, 82.0, 87.0),
            ("US Midwest", 30.0, 45.0, -105.0, -85.0),
            ("Central Europe", 45.0, 55.0, 10.0, 30.0),
            ("Berlin Area", 48.0, 53.0, 13.0, 15.0),
            ("Central Asia", 35.0, 50.0, 50.0, 90.0),
            ("Inland Brazil", -30.0, -15.0, -58.0, -47.0),
            ("Central Africa Interior", -2.0, 2.0, 28.0, 32.0),
            ("Inland China", 30.0, 42.0, 108.0, 118.0),
        ];
        for &(name, lat_min, lat_max, lon_min, lon_max) in landlocked {
            self.landlocked_regions.push(Region {
                name: name.to_string(),
                bounds: BoundingBox::new(lat_min, lat_max, lon_min, lon_max),
            });
        }

        // Forest coverage. Barren regions listed first so dense urban cores
        // shadow the broader bands around them.
        let forests: &[(&str, f64, f64, f64, f64, ForestBand)] = &[
            ("Delhi NCR", 28.0, 29.0, 76.5, 77.5, ForestBand::Barren),
            ("Arabian Desert", 15.0, 35.0, 35.0, 60.0, ForestBand::Barren),
            ("Sahara Desert", 15.0, 35.0, -15.0, 35.0, ForestBand::Barren),
            ("Australian Outback", -30.0, -20.0, 130.0, 145.0, ForestBand::Barren),
            ("New York Metro", 40.5, 41.0, -74.5, -73.5, ForestBand::Barren),
            ("Greater London", 51.3, 51.7, -0.3, 0.2, ForestBand::Barren),
            ("Paris Metro", 48.7, 49.0, 2.2, 2.5, ForestBand::Barren),
            ("Tokyo Metro", 35.5, 35.8, 139.5, 139.9, ForestBand::Barren),
            ("Beijing Metro", 39.8, 40.0, 116.2, 116.6, ForestBand::Barren),
            ("Amazon Rainforest", -10.0, 5.0, -75.0, -50.0, ForestBand::Dense),
            ("Congo Basin", -5.0, 5.0, 15.0, 30.0, ForestBand::Dense),
            ("Southeast Asian Rainforest", -10.0, 10.0, 95.0, 120.0, ForestBand::Dense),
            ("Pacific Northwest", 45.0, 60.0, -130.0, -115.0, ForestBand::Dense),
            ("Eastern Canadian Forest", 45.0, 60.0, -80.0, -70.0, ForestBand::Dense),
            ("Siberian Taiga", 50.0, 70.0, 60.0, 140.0, ForestBand::Dense),
            ("Western Ghats", 8.0, 16.0, 73.0, 78.0, ForestBand::Moderate),
            ("California Coast", 35.0, 42.0, -125.0, -115.0, ForestBand::Moderate),
            ("European Mixed Forest", 45.0, 55.0, 5.0, 20.0, ForestBand::Moderate),
        ];
        for &(name, lat_min, lat_max, lon_min, lon_max, band) in forests {
            self.forest_regions.push(ForestRegion {
                name: name.to_string(),
                bounds: BoundingBox::new(lat_min, lat_max, lon_min, lon_max),
                band,
            });
        }

        // Seismic zones, from plate-boundary hazard maps. Extreme zones
        // first: several sit inside broader high/moderate belts.
        let zones: &[(&str, f64, f64, f64, f64, SeismicBand)] = &[
            ("Nepal Himalayan Collision Zone", 26.5, 28.5, 84.0, 87.0, SeismicBand::Extreme),
            ("Japan Subduction Zone", 34.0, 42.0, 138.0, 143.0, SeismicBand::Extreme),
            ("San Andreas Fault System", 33.0, 38.5, -123.0, -117.0, SeismicBand::Extreme),
            ("Sunda Megathrust", -6.0, 6.0, 95.0, 107.0, SeismicBand::Extreme),
            ("New Zealand Alpine Fault", -43.0, -40.0, 172.0, 175.0, SeismicBand::Extreme),
            ("Chilean Subduction Zone", -38.0, -33.0, -73.0, -70.0, SeismicBand::Extreme),
            ("Philippine Fault Zone", 14.0, 16.0, 120.0, 122.0, SeismicBand::Extreme),
            // Starts north of the Delhi basin, which sits on the stable craton.
            ("Kashmir Seismic Zone", 29.0, 35.0, 73.0, 81.0, SeismicBand::High),
            ("North Anatolian Fault", 38.0, 42.0, 26.0, 45.0, SeismicBand::High),
            ("Iranian Plateau Faults", 28.0, 38.0, 48.0, 62.0, SeismicBand::High),
            ("Hellenic Arc", 36.0, 41.0, 20.0, 28.0, SeismicBand::High),
            ("Alaska Subduction Zone", 60.0, 65.0, -152.0, -147.0, SeismicBand::High),
            ("Mexican Volcanic Belt", 18.0, 20.0, -100.0, -98.0, SeismicBand::High),
            ("Cascadia Subduction Zone", 47.0, 50.0, -125.0, -122.0, SeismicBand::High),
            ("Eastern Himalayan Belt", 25.0, 32.0, 82.0, 95.0, SeismicBand::Moderate),
            ("Apennines Fault", 40.0, 43.0, 12.0, 16.0, SeismicBand::Moderate),
            ("Taiwan Collision Zone", 22.0, 25.0, 120.0, 122.0, SeismicBand::Moderate),
            ("Central American Arc", 10.0, 15.0, -92.0, -85.0, SeismicBand::Moderate),
            ("Eastern US Intraplate", 35.0, 42.0, -80.0, -70.0, SeismicBand::Low),
            ("Central European Platform", 48.0, 52.0, 10.0, 16.0, SeismicBand::Low),
            ("Sydney Basin", -35.0, -33.0, 150.0, 152.0, SeismicBand::Low),
        ];
        for &(name, lat_min, lat_max, lon_min, lon_max, band) in zones {
            self.seismic_zones.push(SeismicZone {
                name: name.to_string(),
                bounds: BoundingBox::new(lat_min, lat_max, lon_min, lon_max),
                band,
            });
        }
    }

    /// Coastal flag: true unless the location falls in a landlocked region.
    pub fn is_coastal(&self, location: &Location) -> bool {
        !self
            .landlocked_regions
            .iter()
            .any(|r| r.bounds.contains(location))
    }

    /// Forest band, first matching region wins; Sparse outside all regions.
    pub fn forest_band(&self, location: &Location) -> ForestBand {
        self.forest_regions
            .iter()
            .find(|r| r.bounds.contains(location))
            .map(|r| r.band)
            .unwrap_or(ForestBand::Sparse)
    }

    /// Seismic band and zone name, first matching zone wins.
    pub fn seismic_zone(&self, location: &Location) -> (SeismicBand, &str) {
        self.seismic_zones
            .iter()
            .find(|z| z.bounds.contains(location))
            .map(|z| (z.band, z.name.as_str()))
            .unwrap_or((SeismicBand::Stable, STABLE_CRATON))
    }

    /// Derive the full context for one location.
    pub fn context(&self, location: &Location) -> GeoContext {
        let (seismic_band, zone_name) = self.seismic_zone(location);
        GeoContext {
            is_coastal: self.is_coastal(location),
            forest_band: self.forest_band(location),
            seismic_band,
            seismic_zone: zone_name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn loc(lat: f64, lon: f64) -> Location {
        Location::new(lat, lon).unwrap()
    }

    #[test]
    fn test_coastal_flag() {
        let atlas = GeoAtlas::with_defaults();

        // Delhi is landlocked, Miami and Mumbai are coastal
        assert!(!atlas.is_coastal(&loc(28.6139, 77.2090)), "Delhi");
        assert!(atlas.is_coastal(&loc(25.7617, -80.1918)), "Miami");
        assert!(atlas.is_coastal(&loc(19.0760, 72.8777)), "Mumbai");
        // Chicago sits in the US Midwest exclusion
        assert!(!atlas.is_coastal(&loc(41.8781, -87.6298)), "Chicago");
    }

    #[test]
    fn test_forest_bands() {
        let atlas = GeoAtlas::with_defaults();

        assert_eq!(atlas.forest_band(&loc(28.65, 77.2)), ForestBand::Barren, "Delhi NCR");
        assert_eq!(atlas.forest_band(&loc(-3.0, -60.0)), ForestBand::Dense, "Amazon");
        assert_eq!(atlas.forest_band(&loc(25.0, 10.0)), ForestBand::Barren, "Sahara");
        assert_eq!(atlas.forest_band(&loc(12.0, 75.5)), ForestBand::Moderate, "Western Ghats");
        // Unmapped location falls to the Sparse default
        assert_eq!(atlas.forest_band(&loc(-50.0, -70.0)), ForestBand::Sparse);
    }

    #[test]
    fn test_seismic_zones() {
        let atlas = GeoAtlas::with_defaults();

        let (band, name) = atlas.seismic_zone(&loc(27.7172, 85.3240));
        assert_eq!(band, SeismicBand::Extreme, "Kathmandu");
        assert_eq!(name, "Nepal Himalayan Collision Zone");

        let (band, _) = atlas.seismic_zone(&loc(35.6762, 139.6503));
        assert_eq!(band, SeismicBand::Extreme, "Tokyo");

        let (band, name) = atlas.seismic_zone(&loc(28.6139, 77.2090));
        assert_eq!(band, SeismicBand::Stable, "Delhi");
        assert_eq!(name, STABLE_CRATON);

        let (band, _) = atlas.seismic_zone(&loc(51.5074, -0.1278));
        assert_eq!(band, SeismicBand::Stable, "London");
    }

    #[test]
    fn test_zone_order_precedence() {
        let atlas = GeoAtlas::with_defaults();

        // Kathmandu lies inside both the Nepal collision zone (Extreme) and
        // the broader Eastern Himalayan belt (Moderate); the narrower zone
        // is listed first and must win.
        let (band, name) = atlas.seismic_zone(&loc(27.7172, 85.3240));
        assert_eq!(band, SeismicBand::Extreme);
        assert_eq!(name, "Nepal Himalayan Collision Zone");

        // A point in the belt but outside the Nepal box gets Moderate.
        let (band, name) = atlas.seismic_zone(&loc(26.0, 92.0));
        assert_eq!(band, SeismicBand::Moderate);
        assert_eq!(name, "Eastern Himalayan Belt");
    }

    #[test]
    fn test_empty_atlas_defaults() {
        let atlas = GeoAtlas::new();
        let anywhere = loc(28.6139, 77.2090);

        assert!(atlas.is_coastal(&anywhere));
        assert_eq!(atlas.forest_band(&anywhere), ForestBand::Sparse);
        assert_eq!(atlas.seismic_zone(&anywhere), (SeismicBand::Stable, STABLE_CRATON));
    }

    #[test]
    fn test_atlas_json_round_trip() {
        let json = r#"{
            "landlocked_regions": [
                {"name": "Test Basin", "bounds": {"lat_min": 10.0, "lat_max": 20.0, "lon_min": 30.0, "lon_max": 40.0}}
            ],
            "forest_regions": [
                {"name": "Test Forest", "bounds": {"lat_min": -5.0, "lat_max": 5.0, "lon_min": 0.0, "lon_max": 10.0}, "band": "dense"}
            ],
            "seismic_zones": [
                {"name": "Test Fault", "bounds": {"lat_min": 40.0, "lat_max": 45.0, "lon_min": 70.0, "lon_max": 75.0}, "band": "extreme"}
            ]
        }"#;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let atlas = GeoAtlas::from_json_file(file.path()).unwrap();
        assert!(!atlas.is_coastal(&loc(15.0, 35.0)));
        assert_eq!(atlas.forest_band(&loc(0.0, 5.0)), ForestBand::Dense);
        let (band, name) = atlas.seismic_zone(&loc(42.0, 72.0));
        assert_eq!(band, SeismicBand::Extreme);
        assert_eq!(name, "Test Fault");
    }

    #[test]
    fn test_context_combines_tables() {
        let atlas = GeoAtlas::with_defaults();
        let ctx = atlas.context(&loc(28.6139, 77.2090));

        assert!(!ctx.is_coastal);
        assert_eq!(ctx.forest_band, ForestBand::Barren);
        assert_eq!(ctx.seismic_band, SeismicBand::Stable);
        assert_eq!(ctx.seismic_zone, STABLE_CRATON);
    }
}
