//! The read-only context shared across every worker for the duration of a run:
//! geometry, materials and the master energy grid. Built once at startup and
//! handed to workers behind an `Arc`, with no interior mutability — matching the
//! "shared, read-only" half of the concurrency model the transport loop depends
//! on for thread safety without locks.

use crate::geometry::Geometry;
use crate::physics::{Material, MasterGrid};

pub struct World {
    pub geometry: Geometry,
    pub materials: Vec<Material>,
    pub master_grid: MasterGrid,
    pub energy_freegas_threshold: f64,
    pub awr_freegas_threshold: f64,
}

impl World {
    pub fn new(
        geometry: Geometry,
        materials: Vec<Material>,
        master_grid: MasterGrid,
        energy_freegas_threshold: f64,
        awr_freegas_threshold: f64,
    ) -> Self {
        World {
            geometry,
            materials,
            master_grid,
            energy_freegas_threshold,
            awr_freegas_threshold,
        }
    }

    pub fn material(&self, ix: Option<usize>) -> Option<&Material> {
        ix.map(|i| &self.materials[i])
    }
}
