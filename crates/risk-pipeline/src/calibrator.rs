//! Geographic calibration
//!
//! Deterministic post-processing that rescales a model's raw probability
//! using non-learned geographic priors: landlocked locations cannot see
//! cyclones, fuel-free land cannot carry forest fires, and earthquake
//! probability is pinned to the seismic band's window. First matching rule
//! per hazard wins, identity otherwise, and the result is always clamped
//! to [0, 1].

use geo_context::{ForestBand, GeoContext, SeismicBand};
use hazard_models::Hazard;

/// Cyclone suppression for landlocked locations.
pub const INLAND_CYCLONE_SCALE: f64 = 0.10;
pub const INLAND_CYCLONE_CAP: f64 = 0.15;

/// Fire suppression on fuel-free (urban/desert) land.
pub const BARREN_FIRE_SCALE: f64 = 0.15;
pub const BARREN_FIRE_CAP: f64 = 0.20;

/// Fire damping on low-coverage land.
pub const SPARSE_FIRE_SCALE: f64 = 0.60;

/// Per-band earthquake transform: (scale, floor, cap).
///
/// The raw probability is scaled, then pinned into [floor, cap]. Bands 2-4
/// carry a floor: the geological override holds even when the model output
/// is low, which is the behavior the extreme-band scenarios require.
pub fn earthquake_rule(band: SeismicBand) -> (f64, f64, f64) {
    match band {
        SeismicBand::Stable => (0.05, 0.0, 0.10),
        SeismicBand::Low => (0.30, 0.0, 0.25),
        SeismicBand::Moderate => (0.50, 0.25, 0.50),
        SeismicBand::High => (0.80, 0.50, 0.75),
        SeismicBand::Extreme => (1.0, 0.70, 0.95),
    }
}

/// Rescale a raw model probability with the location's geographic priors.
pub fn calibrate(hazard: Hazard, raw: f64, ctx: &GeoContext) -> f64 {
    let adjusted = match hazard {
        Hazard::Flood => raw,
        Hazard::Cyclone => {
            if ctx.is_coastal {
                raw
            } else {
                (raw * INLAND_CYCLONE_SCALE).min(INLAND_CYCLONE_CAP)
            }
        }
        Hazard::Fire => match ctx.forest_band {
            ForestBand::Barren => (raw * BARREN_FIRE_SCALE).min(BARREN_FIRE_CAP),
            ForestBand::Sparse => raw * SPARSE_FIRE_SCALE,
            ForestBand::Moderate | ForestBand::Dense => raw,
        },
        Hazard::Earthquake => {
            let (scale, floor, cap) = earthquake_rule(ctx.seismic_band);
            (raw * scale).max(floor).min(cap)
        }
    };

    adjusted.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(is_coastal: bool, forest_band: ForestBand, seismic_band: SeismicBand) -> GeoContext {
        GeoContext {
            is_coastal,
            forest_band,
            seismic_band,
            seismic_zone: String::new(),
        }
    }

    fn probabilities() -> impl Iterator<Item = f64> {
        (0..=20).map(|i| i as f64 / 20.0)
    }

    #[test]
    fn test_flood_is_identity() {
        let c = ctx(false, ForestBand::Barren, SeismicBand::Stable);
        for raw in probabilities() {
            assert_eq!(calibrate(Hazard::Flood, raw, &c), raw);
        }
    }

    #[test]
    fn test_inland_cyclone_capped() {
        let inland = ctx(false, ForestBand::Sparse, SeismicBand::Stable);
        for raw in probabilities() {
            let p = calibrate(Hazard::Cyclone, raw, &inland);
            assert!(p <= INLAND_CYCLONE_CAP, "raw {raw} -> {p}");
            assert!(p <= raw, "suppression never amplifies");
        }
        // Coastal is untouched
        let coastal = ctx(true, ForestBand::Sparse, SeismicBand::Stable);
        assert_eq!(calibrate(Hazard::Cyclone, 0.9, &coastal), 0.9);
    }

    #[test]
    fn test_fire_band_suppression() {
        let barren = ctx(true, ForestBand::Barren, SeismicBand::Stable);
        let sparse = ctx(true, ForestBand::Sparse, SeismicBand::Stable);
        let dense = ctx(true, ForestBand::Dense, SeismicBand::Stable);

        for raw in probabilities() {
            let p = calibrate(Hazard::Fire, raw, &barren);
            assert!(p <= raw, "barren fire never exceeds raw");
            assert!(p <= BARREN_FIRE_CAP);

            let p = calibrate(Hazard::Fire, raw, &sparse);
            assert!((p - raw * SPARSE_FIRE_SCALE).abs() < 1e-12);

            assert_eq!(calibrate(Hazard::Fire, raw, &dense), raw);
        }
    }

    #[test]
    fn test_earthquake_band_windows() {
        for raw in probabilities() {
            let stable = calibrate(
                Hazard::Earthquake,
                raw,
                &ctx(true, ForestBand::Sparse, SeismicBand::Stable),
            );
            assert!(stable <= 0.10, "stable craton capped: raw {raw} -> {stable}");

            let low = calibrate(
                Hazard::Earthquake,
                raw,
                &ctx(true, ForestBand::Sparse, SeismicBand::Low),
            );
            assert!(low <= 0.25);

            let moderate = calibrate(
                Hazard::Earthquake,
                raw,
                &ctx(true, ForestBand::Sparse, SeismicBand::Moderate),
            );
            assert!((0.25..=0.50).contains(&moderate));

            let high = calibrate(
                Hazard::Earthquake,
                raw,
                &ctx(true, ForestBand::Sparse, SeismicBand::High),
            );
            assert!((0.50..=0.75).contains(&high));

            let extreme = calibrate(
                Hazard::Earthquake,
                raw,
                &ctx(true, ForestBand::Sparse, SeismicBand::Extreme),
            );
            assert!(
                (0.70..=0.95).contains(&extreme),
                "extreme floor holds regardless of raw output: raw {raw} -> {extreme}"
            );
        }
    }

    #[test]
    fn test_output_always_in_unit_interval() {
        let contexts = [
            ctx(false, ForestBand::Barren, SeismicBand::Stable),
            ctx(true, ForestBand::Dense, SeismicBand::Extreme),
            ctx(false, ForestBand::Sparse, SeismicBand::Moderate),
        ];
        for c in &contexts {
            for hazard in Hazard::ALL {
                for raw in probabilities() {
                    let p = calibrate(hazard, raw, c);
                    assert!((0.0..=1.0).contains(&p), "{hazard} raw {raw} -> {p}");
                }
            }
        }
    }
}
