//! # IO Module - Data Persistence
//!
//! Handles saving and loading criticality-run reports under `./data/criticality/`,
//! in both a compact binary form (`bin`, via `bincode`) and a human-readable form
//! (`json`, via `serde_json`).

pub mod bin;
pub mod json;

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::tally::TallyReport;

/// Which `./data/` subfolder a persisted type belongs under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Criticality,
}

impl DataType {
    pub fn folder(&self) -> &'static str {
        match self {
            DataType::Criticality => "criticality",
        }
    }
}

/// A type that can be saved to and loaded from `./data/<folder>/`, either as
/// binary or as pretty JSON. Implementors name their own folder and file stem;
/// [`bin::save_file`]/[`bin::load_file`]/[`json::export_json`] do the rest.
pub trait DataPersistence: Serialize + for<'de> Deserialize<'de> {
    fn data_type() -> DataType;

    /// Filename without extension, used to build both the binary and JSON paths.
    fn file_stem(&self) -> String;

    fn binary_path(&self) -> PathBuf {
        PathBuf::from("./data")
            .join(Self::data_type().folder())
            .join(format!("{}.bin", self.file_stem()))
    }

    fn json_path(&self) -> PathBuf {
        PathBuf::from("./data")
            .join(Self::data_type().folder())
            .join(format!("{}.json", self.file_stem()))
    }
}

/// Ensures the data directory structure exists.
pub fn ensure_data_directories() -> Result<(), std::io::Error> {
    std::fs::create_dir_all("./data/criticality")
}

/// One tallied metric's mean and standard error, in a form that round-trips
/// through both serialization backends (`TallyKind` itself stays internal).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TallyRecord {
    pub label: String,
    pub mean: f64,
    pub stderr: f64,
}

impl From<TallyReport> for TallyRecord {
    fn from(r: TallyReport) -> Self {
        TallyRecord {
            label: r.kind.label().to_string(),
            mean: r.mean,
            stderr: r.stderr,
        }
    }
}

/// The persisted summary of one completed criticality run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CriticalityReport {
    pub seed: u64,
    pub particles: usize,
    pub inactive_cycles: u64,
    pub active_cycles: u64,
    pub keff: f64,
    pub tallies: Vec<TallyRecord>,
}

impl DataPersistence for CriticalityReport {
    fn data_type() -> DataType {
        DataType::Criticality
    }

    fn file_stem(&self) -> String {
        format!("seed{}-{}p", self.seed, self.particles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stem_is_stable_for_repeated_runs() {
        let report = CriticalityReport {
            seed: 7,
            particles: 500,
            inactive_cycles: 10,
            active_cycles: 40,
            keff: 1.0,
            tallies: Vec::new(),
        };
        assert_eq!(report.file_stem(), "seed7-500p");
        assert_eq!(report.binary_path(), PathBuf::from("./data/criticality/seed7-500p.bin"));
        assert_eq!(report.json_path(), PathBuf::from("./data/criticality/seed7-500p.json"));
    }
}
