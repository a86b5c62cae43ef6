//! Run configuration: the recognised options table, their defaults, TOML
//! deserialization and validation, plus a reference in-memory geometry/physics
//! builder so the crate can run a criticality calculation end to end without a
//! real ACE-table/CSG-deck loader.

use serde::Deserialize;

use crate::driver::SchedulerPolicy;
use crate::error::ConfigError;
use crate::geometry::cell::CellSurface;
use crate::geometry::surface::BoundaryCondition;
use crate::geometry::{Cell, Geometry, Surface};
use crate::physics::isotope::IsotopeSpec;
use crate::physics::nu::NuSampler;
use crate::physics::{IsotopeView, Material, MasterGrid, Nuclide};
use crate::source::PointSource;
use crate::world::World;

fn default_max_rng_per_history() -> u64 {
    100_000
}

fn default_max_source_samples() -> usize {
    100
}

fn default_multithread() -> String {
    "rayon".to_string()
}

fn default_energy_freegas_threshold() -> f64 {
    crate::physics::DEFAULT_ENERGY_FREEGAS_THRESHOLD
}

fn default_awr_freegas_threshold() -> f64 {
    crate::physics::DEFAULT_AWR_FREEGAS_THRESHOLD
}

/// `[criticality]` table: the cycle-count and population-size knobs of a
/// power-iteration run.
#[derive(Debug, Clone, Deserialize)]
pub struct CriticalityConfig {
    pub particles: usize,
    #[serde(default)]
    pub inactive: u64,
    #[serde(default)]
    pub active: u64,
}

/// The full set of recognised top-level options.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    pub seed: u64,
    #[serde(default = "default_max_rng_per_history")]
    pub max_rng_per_history: u64,
    #[serde(default = "default_max_source_samples")]
    pub max_source_samples: usize,
    #[serde(default = "default_multithread")]
    pub multithread: String,
    #[serde(default = "default_energy_freegas_threshold")]
    pub energy_freegas_threshold: f64,
    #[serde(default = "default_awr_freegas_threshold")]
    pub awr_freegas_threshold: f64,
    pub criticality: CriticalityConfig,
}

impl EngineConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Parse(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.criticality.particles == 0 {
            return Err(ConfigError::ZeroParticles);
        }
        self.scheduler_policy()?;
        Ok(())
    }

    pub fn scheduler_policy(&self) -> Result<SchedulerPolicy, ConfigError> {
        self.multithread.parse()
    }
}

/// Builds the bare critical sphere reference scenario: a single toy U235-like
/// fuel region bounded by a vacuum sphere, with a point source at its center.
/// Exists so the engine is runnable end to end without a real continuous-energy
/// table loader or CSG deck parser, both out of scope per the external
/// collaborators this crate treats as fixed interfaces.
pub fn bare_sphere_scenario(
    radius: f64,
    energy_freegas_threshold: f64,
    awr_freegas_threshold: f64,
) -> Result<(World, PointSource), ConfigError> {
    let spec = toy_u235_spec();
    let master_grid = MasterGrid::build([spec.energies.as_slice()]);
    let isotope = IsotopeView::build(spec, &master_grid)
        .map_err(|e| ConfigError::Parse(e.to_string()))?;
    let material = Material::build(
        "fuel",
        vec![Nuclide {
            isotope,
            density: 0.048,
        }],
        300.0,
    )
    .map_err(|e| ConfigError::Parse(e.to_string()))?;

    let surfaces = vec![Surface::sphere(
        0,
        crate::geometry::Coordinate::zero(),
        radius,
        BoundaryCondition::Vacuum,
    )];
    let cells = vec![Cell::new(
        0,
        vec![CellSurface { surface: 0, sense: false }],
        Some(0),
    )];
    let geometry = Geometry::new(surfaces, cells);
    let world = World::new(
        geometry,
        vec![material],
        master_grid,
        energy_freegas_threshold,
        awr_freegas_threshold,
    );

    let source = PointSource {
        position: crate::geometry::Coordinate::zero(),
        energy: 2.0,
    };
    Ok((world, source))
}

/// A coarse toy U235 tabulation: not a real ACE table, just enough energy
/// points and reaction channels to exercise every code path (fission, capture,
/// elastic, a single inelastic channel) across a thermal-to-fast range.
fn toy_u235_spec() -> IsotopeSpec {
    IsotopeSpec {
        name: "U235".to_string(),
        awr: 233.0,
        energies: vec![1e-11, 1e-6, 1e-3, 1.0, 14.1, 20.0],
        total_xs: vec![680.0, 120.0, 45.0, 7.0, 4.5, 4.0],
        elastic_xs: vec![15.0, 12.0, 10.0, 4.0, 2.8, 2.5],
        absorption_xs: vec![665.0, 108.0, 35.0, 3.0, 1.7, 1.5],
        fission_xs: Some(vec![585.0, 95.0, 30.0, 1.2, 1.9, 1.7]),
        chance_fission_xs: Vec::new(),
        inelastic_channels: vec![(4, vec![0.0, 0.0, 0.0, 1.8, 0.0, 0.0])],
        nu: Some(NuSampler::Polynomial {
            coeffs: vec![2.43, 0.065],
        }),
    }
}
