//! Feature estimation
//!
//! Synthesizes one fixed-order feature vector per hazard from the
//! location's geographic context plus seasonal rules keyed on the request
//! date. Feature names and order are positionally aligned to the model
//! artifacts' schemas. Filler features the upstream data cannot supply
//! are bounded uniform draws through the caller's RNG, so a seeded RNG
//! makes the whole estimate reproducible.

use chrono::{DateTime, Datelike, NaiveDate, Timelike, Utc};
use geo_context::{BoundingBox, ForestBand, GeoContext, Location, SeismicBand};
use hazard_models::Hazard;
use rand::Rng;

/// Flood model schema, 20 features.
pub const FLOOD_FEATURES: [&str; 20] = [
    "MonsoonIntensity",
    "TopographyDrainage",
    "RiverManagement",
    "Deforestation",
    "Urbanization",
    "ClimateChange",
    "DamsQuality",
    "Siltation",
    "AgriculturalPractices",
    "Encroachments",
    "IneffectiveDisasterPreparedness",
    "DrainageSystems",
    "CoastalVulnerability",
    "Landslides",
    "Watersheds",
    "DeterioratingInfrastructure",
    "PopulationScore",
    "WetlandLoss",
    "InadequatePlanning",
    "PoliticalFactors",
];

/// Cyclone model schema, 9 features.
pub const CYCLONE_FEATURES: [&str; 9] = [
    "Sea_Surface_Temperature",
    "Atmospheric_Pressure",
    "Humidity",
    "Wind_Shear",
    "Vorticity",
    "Latitude",
    "Ocean_Depth",
    "Proximity_to_Coastline",
    "Pre_existing_Disturbance",
];

/// Fire model schema, 12 features.
pub const FIRE_FEATURES: [&str; 12] = [
    "FFMC", "DMC", "DC", "ISI", "temp", "RH", "wind", "rain", "X", "Y", "month_num", "day_num",
];

/// Earthquake model schema, 7 features.
pub const EARTHQUAKE_FEATURES: [&str; 7] =
    ["latitude", "longitude", "depth", "mag", "month", "day", "hour"];

/// Feature names, in model order, for a hazard.
pub fn feature_schema(hazard: Hazard) -> &'static [&'static str] {
    match hazard {
        Hazard::Flood => &FLOOD_FEATURES,
        Hazard::Cyclone => &CYCLONE_FEATURES,
        Hazard::Fire => &FIRE_FEATURES,
        Hazard::Earthquake => &EARTHQUAKE_FEATURES,
    }
}

/// A fixed-order feature vector for one hazard, built fresh per prediction.
#[derive(Debug, Clone)]
pub struct FeatureVector {
    hazard: Hazard,
    values: Vec<f64>,
}

impl FeatureVector {
    fn new(hazard: Hazard, values: Vec<f64>) -> Self {
        debug_assert_eq!(values.len(), feature_schema(hazard).len());
        Self { hazard, values }
    }

    pub fn hazard(&self) -> Hazard {
        self.hazard
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value by schema name, for tests and diagnostics.
    pub fn get(&self, name: &str) -> Option<f64> {
        feature_schema(self.hazard)
            .iter()
            .position(|&f| f == name)
            .map(|i| self.values[i])
    }
}

// Monsoon regions for the flood seasonal rule.
const INDIAN_SUBCONTINENT: BoundingBox = BoundingBox::new(8.0, 35.0, 68.0, 97.0);
const SOUTHEAST_ASIA: BoundingBox = BoundingBox::new(-10.0, 25.0, 95.0, 125.0);

// Dry-summer boxes for the fire rule.
const CALIFORNIA: BoundingBox = BoundingBox::new(30.0, 45.0, -125.0, -115.0);
const MEDITERRANEAN: BoundingBox = BoundingBox::new(35.0, 45.0, -10.0, 40.0);

/// Tropical cyclone formation belt in degrees of absolute latitude.
const CYCLONE_BELT_LAT: (f64, f64) = (5.0, 30.0);

fn in_months(month: u32, months: &[u32]) -> bool {
    months.contains(&month)
}

/// Monsoon intensity index 0-10 for the flood model.
fn monsoon_intensity(location: &Location, month: u32) -> f64 {
    if INDIAN_SUBCONTINENT.contains(location) {
        if in_months(month, &[6, 7, 8, 9]) {
            9.0
        } else if in_months(month, &[10, 11]) {
            7.0
        } else {
            4.0
        }
    } else if SOUTHEAST_ASIA.contains(location) {
        if in_months(month, &[5, 6, 7, 8, 9]) {
            8.0
        } else {
            5.0
        }
    } else if location.latitude().abs() < 25.0 {
        if in_months(month, &[6, 7, 8, 9]) {
            6.0
        } else {
            4.0
        }
    } else {
        3.0
    }
}

/// Flood feature vector.
pub fn flood(location: &Location, ctx: &GeoContext, month: u32, rng: &mut impl Rng) -> FeatureVector {
    let monsoon = monsoon_intensity(location, month);
    let climate_change = ((location.latitude().abs() / 10.0).trunc() + 5.0).clamp(3.0, 10.0);
    let coastal_vulnerability = if ctx.is_coastal { 8.0 } else { 3.0 };

    let values = vec![
        monsoon,
        rng.gen_range(4..8) as f64,  // TopographyDrainage
        rng.gen_range(4..7) as f64,  // RiverManagement
        rng.gen_range(3..7) as f64,  // Deforestation
        rng.gen_range(4..8) as f64,  // Urbanization
        climate_change,
        rng.gen_range(4..8) as f64,  // DamsQuality
        rng.gen_range(2..6) as f64,  // Siltation
        rng.gen_range(3..7) as f64,  // AgriculturalPractices
        rng.gen_range(2..6) as f64,  // Encroachments
        rng.gen_range(3..7) as f64,  // IneffectiveDisasterPreparedness
        rng.gen_range(5..9) as f64,  // DrainageSystems
        coastal_vulnerability,
        rng.gen_range(2..6) as f64,  // Landslides
        rng.gen_range(3..7) as f64,  // Watersheds
        rng.gen_range(3..7) as f64,  // DeterioratingInfrastructure
        rng.gen_range(3..8) as f64,  // PopulationScore
        rng.gen_range(3..7) as f64,  // WetlandLoss
        rng.gen_range(3..7) as f64,  // InadequatePlanning
        rng.gen_range(3..7) as f64,  // PoliticalFactors
    ];

    FeatureVector::new(Hazard::Flood, values)
}

/// Cyclone feature vector.
///
/// Landlocked locations get a fixed benign vector: no warm sea surface,
/// normal pressure, high shear, no ocean, far coast.
pub fn cyclone(
    location: &Location,
    ctx: &GeoContext,
    month: u32,
    rng: &mut impl Rng,
) -> FeatureVector {
    let abs_lat = location.latitude().abs();

    if !ctx.is_coastal {
        let values = vec![20.0, 1013.0, 50.0, 25.0, 1e-5, abs_lat, 0.0, 999.0, 0.0];
        return FeatureVector::new(Hazard::Cyclone, values);
    }

    let in_belt = (CYCLONE_BELT_LAT.0..=CYCLONE_BELT_LAT.1).contains(&abs_lat);
    let in_season = in_months(month, &[5, 6, 7, 8, 9, 10]);

    let mut base_temp = 27.0;
    if abs_lat < 20.0 && in_belt {
        base_temp = 28.5;
        if in_season {
            base_temp += 1.5;
        }
    } else if abs_lat > 40.0 {
        base_temp = 22.0;
    }

    let pressure = if in_belt && in_season {
        rng.gen_range(995.0..1008.0)
    } else {
        1010.0
    };

    let humidity = if in_belt {
        rng.gen_range(70.0..90.0)
    } else {
        rng.gen_range(50.0..70.0)
    };
    let wind_shear = if in_belt {
        rng.gen_range(5.0..12.0)
    } else {
        rng.gen_range(15.0..25.0)
    };
    let vorticity = if in_belt {
        rng.gen_range(5e-5..1e-4)
    } else {
        rng.gen_range(1e-5..3e-5)
    };
    let disturbance = if in_belt && rng.gen::<f64>() > 0.6 {
        1.0
    } else {
        0.0
    };

    let values = vec![
        base_temp + rng.gen_range(-0.5..0.5),
        pressure,
        humidity,
        wind_shear,
        vorticity,
        abs_lat,
        rng.gen_range(200.0..500.0),
        0.1, // coastal by construction here
        disturbance,
    ];

    FeatureVector::new(Hazard::Cyclone, values)
}

/// Fire-weather index bases per forest band: (FFMC, DMC, DC, ISI).
fn fire_index_bases(band: ForestBand) -> (f64, f64, f64, f64) {
    match band {
        ForestBand::Dense => (85.0, 100.0, 400.0, 10.0),
        ForestBand::Moderate => (82.0, 80.0, 300.0, 8.0),
        // Barren is handled before the bases are consulted
        ForestBand::Sparse | ForestBand::Barren => (78.0, 60.0, 200.0, 5.0),
    }
}

/// Fire feature vector.
pub fn fire(location: &Location, ctx: &GeoContext, date: NaiveDate, rng: &mut impl Rng) -> FeatureVector {
    let lat = location.latitude();
    let lon = location.longitude();
    let month = date.month();
    let grid_x = (lon.abs() % 9.0).trunc() + 1.0;
    let grid_y = (lat.abs() % 9.0).trunc() + 1.0;
    let weekday = date.weekday().number_from_monday() as f64;

    // No fuel load: uniformly low indices regardless of season.
    if ctx.forest_band == ForestBand::Barren {
        let values = vec![
            rng.gen_range(70.0..80.0),
            rng.gen_range(20.0..50.0),
            rng.gen_range(50.0..150.0),
            rng.gen_range(1.0..3.0),
            rng.gen_range(15.0..30.0),
            rng.gen_range(40.0..70.0),
            rng.gen_range(2.0..6.0),
            rng.gen_range(0.0..5.0),
            grid_x,
            grid_y,
            month as f64,
            weekday,
        ];
        return FeatureVector::new(Hazard::Fire, values);
    }

    let mut base_temp = if lat.abs() < 30.0 {
        27.0
    } else if lat.abs() > 50.0 {
        8.0
    } else {
        18.0
    };

    // Hemisphere-specific season adjustment
    let mut is_summer = false;
    if lat > 0.0 && in_months(month, &[5, 6, 7, 8]) {
        base_temp += 10.0;
        is_summer = true;
    } else if lat < 0.0 && in_months(month, &[11, 12, 1, 2]) {
        base_temp += 10.0;
        is_summer = true;
    } else if lat > 0.0 && in_months(month, &[12, 1, 2]) {
        base_temp -= 10.0;
    } else if lat < 0.0 && in_months(month, &[6, 7, 8]) {
        base_temp -= 10.0;
    }

    let mut humidity = if is_summer { 30.0 } else { 60.0 };

    // Mediterranean-climate dry summers run hotter and drier still
    if is_summer && (CALIFORNIA.contains(location) || MEDITERRANEAN.contains(location)) {
        humidity = 25.0;
        base_temp += 5.0;
    }

    let (ffmc_base, dmc_base, dc_base, isi_base) = fire_index_bases(ctx.forest_band);

    let (ffmc, dmc, dc, isi) = if is_summer {
        (
            ffmc_base + rng.gen_range(-5.0..10.0),
            dmc_base + rng.gen_range(-20.0..50.0),
            dc_base + rng.gen_range(-100.0..300.0),
            isi_base + rng.gen_range(-2.0..5.0),
        )
    } else {
        (
            ffmc_base + rng.gen_range(-10.0..5.0),
            dmc_base + rng.gen_range(-30.0..20.0),
            dc_base + rng.gen_range(-150.0..100.0),
            isi_base + rng.gen_range(-3.0..2.0),
        )
    };

    let values = vec![
        ffmc,
        dmc,
        dc,
        isi,
        base_temp + rng.gen_range(-5.0..5.0),
        humidity + rng.gen_range(-10.0..10.0),
        rng.gen_range(2.0..10.0),
        rng.gen_range(0.0..2.0),
        grid_x,
        grid_y,
        month as f64,
        weekday,
    ];

    FeatureVector::new(Hazard::Fire, values)
}

/// Expected event magnitude base per seismic band.
fn base_magnitude(band: SeismicBand) -> f64 {
    match band {
        SeismicBand::Extreme => 5.5,
        SeismicBand::High => 4.5,
        SeismicBand::Moderate => 3.5,
        SeismicBand::Low => 2.5,
        SeismicBand::Stable => 1.5,
    }
}

/// Earthquake feature vector.
pub fn earthquake(
    location: &Location,
    ctx: &GeoContext,
    when: DateTime<Utc>,
    rng: &mut impl Rng,
) -> FeatureVector {
    let band = ctx.seismic_band;

    // Subduction zones run deep, fault zones moderate, stable crust shallow
    let depth = match band {
        SeismicBand::Extreme | SeismicBand::High => rng.gen_range(10.0..70.0),
        SeismicBand::Moderate => rng.gen_range(5.0..30.0),
        _ => rng.gen_range(1.0..10.0),
    };

    let variation = match band {
        SeismicBand::Extreme | SeismicBand::High => rng.gen_range(-0.5..1.5),
        _ => rng.gen_range(-0.5..0.5),
    };

    let values = vec![
        location.latitude(),
        location.longitude(),
        depth,
        base_magnitude(band) + variation,
        when.month() as f64,
        when.day() as f64,
        when.hour() as f64,
    ];

    FeatureVector::new(Hazard::Earthquake, values)
}

/// Feature vector for one hazard at one timestamp.
pub fn for_hazard(
    hazard: Hazard,
    location: &Location,
    ctx: &GeoContext,
    when: DateTime<Utc>,
    rng: &mut impl Rng,
) -> FeatureVector {
    match hazard {
        Hazard::Flood => flood(location, ctx, when.month(), rng),
        Hazard::Cyclone => cyclone(location, ctx, when.month(), rng),
        Hazard::Fire => fire(location, ctx, when.date_naive(), rng),
        Hazard::Earthquake => earthquake(location, ctx, when, rng),
    }
}

/// All four feature vectors, in [`Hazard::ALL`] order.
pub fn estimate_all(
    location: &Location,
    ctx: &GeoContext,
    when: DateTime<Utc>,
    rng: &mut impl Rng,
) -> Vec<FeatureVector> {
    Hazard::ALL
        .iter()
        .map(|&hazard| for_hazard(hazard, location, ctx, when, rng))
        .collect()
}
