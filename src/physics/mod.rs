//! # Physics Module - Continuous-Energy Cross Sections
//!
//! Read-only physics views queried once per collision: [`isotope::IsotopeView`]
//! for per-nuclide reaction probabilities, [`material::Material`] for the
//! macroscopic mixture quantities the history loop samples against, and the
//! shared [`grid::MasterGrid`] that lets every isotope in a run share a single
//! binary search per collision energy.

pub mod grid;
pub mod isotope;
pub mod kinematics;
pub mod material;
pub mod nu;
pub mod reaction;

pub use grid::{Energy, MasterGrid};
pub use isotope::{IsotopeSpec, IsotopeView};
pub use material::{Material, Nuclide};

/// Default kT multiplier below which elastic scattering uses free-gas kinematics
/// rather than a target-at-rest approximation. Mirrors
/// `AceIsotopeBase::energy_freegas_threshold`.
pub const DEFAULT_ENERGY_FREEGAS_THRESHOLD: f64 = 400.0;

/// Default maximum target mass (in neutron masses) for which free-gas kinematics
/// apply. Mirrors `AceIsotopeBase::awr_freegas_threshold`.
pub const DEFAULT_AWR_FREEGAS_THRESHOLD: f64 = 1.0;

/// Boltzmann constant in MeV/K, used to convert a material temperature into the
/// kT the free-gas threshold is expressed in multiples of.
pub const BOLTZMANN_MEV_PER_K: f64 = 8.617_333_262e-11;

/// Whether elastic scattering off `awr` at `temperature` (K) should use free-gas
/// kinematics rather than treating the target as at rest.
pub fn uses_free_gas(
    energy: Energy,
    awr: f64,
    temperature: f64,
    energy_freegas_threshold: f64,
    awr_freegas_threshold: f64,
) -> bool {
    awr <= awr_freegas_threshold
        && energy <= energy_freegas_threshold * BOLTZMANN_MEV_PER_K * temperature
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_cold_target_uses_free_gas() {
        assert!(uses_free_gas(
            1e-10,
            1.0,
            300.0,
            DEFAULT_ENERGY_FREEGAS_THRESHOLD,
            DEFAULT_AWR_FREEGAS_THRESHOLD
        ));
    }

    #[test]
    fn heavy_or_fast_target_does_not_use_free_gas() {
        assert!(!uses_free_gas(
            1.0,
            238.0,
            300.0,
            DEFAULT_ENERGY_FREEGAS_THRESHOLD,
            DEFAULT_AWR_FREEGAS_THRESHOLD
        ));
    }
}
