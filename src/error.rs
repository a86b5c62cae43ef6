//! Typed error kinds surfaced by the geometry, physics, configuration and
//! transport layers.

use crate::geometry::CellIx;

/// A geometry inconsistency discovered while walking a particle through the CSG
/// tree: a crossing into a cell the arena doesn't know about, or a bounded cell
/// with no exit along the current direction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum GeometryError {
    #[error("cell {0} has no surface intersection along the current direction")]
    NoExit(CellIx),
    #[error(
        "surface {surface} has no registered neighbour on the required side \
         when leaving cell {target}: a transmission/reflecting boundary \
         cannot be left unresolved like a vacuum leak"
    )]
    DanglingNeighbor { surface: usize, target: CellIx },
}

/// A failure building or querying the continuous-energy physics tables.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PhysicsError {
    #[error("isotope {isotope} is missing cross section for required reaction mt={mt}")]
    MissingReaction { isotope: String, mt: u32 },
    #[error("isotope {isotope} has a fission cross section but no NU block")]
    MissingNuBlock { isotope: String },
    #[error("material {0} has no constituent isotopes")]
    EmptyMaterial(String),
    #[error("energy grid for isotope {isotope} is empty or unsorted")]
    InvalidGrid { isotope: String },
}

/// A problem with the run configuration.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown scheduler policy '{0}', expected one of single/rayon/rayon_chunked")]
    UnknownScheduler(String),
    #[error("missing required configuration key '{0}'")]
    MissingKey(String),
    #[error("criticality.particles must be nonzero")]
    ZeroParticles,
    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

/// A particle attribute became non-finite after a reaction or transport step.
#[derive(Debug, Clone, thiserror::Error)]
#[error("non-finite particle attribute '{field}' = {value} in cell {cell} at cycle {cycle}")]
pub struct NumericError {
    pub field: &'static str,
    pub value: f64,
    pub cell: CellIx,
    pub cycle: u64,
}

/// The union of everything that can abort a run.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error(transparent)]
    Physics(#[from] PhysicsError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Numeric(#[from] NumericError),
}
