//! Run output storage.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::critical::CriticalSummary;
use crate::sankey::SankeyDiagram;
use crate::types::RunManifest;
use crate::{ResultsError, ResultsResult};

const MANIFEST: &str = "manifest.json";
const CRITICAL: &str = "critical.json";
const COALESCED: &str = "coalesced.json";
const SUMMARY: &str = "critical_summary.json";

/// Writes each run's diagrams and summary under `<root>/<run id>/`.
#[derive(Debug, Clone)]
pub struct OutputStore {
    root_dir: PathBuf,
}

impl OutputStore {
    pub fn new(root_dir: PathBuf) -> ResultsResult<Self> {
        if !root_dir.exists() {
            fs::create_dir_all(&root_dir)?;
        }
        Ok(Self { root_dir })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn run_dir(&self, run_id: &str) -> PathBuf {
        self.root_dir.join(run_id)
    }

    pub fn has_run(&self, run_id: &str) -> bool {
        self.run_dir(run_id).join(MANIFEST).exists()
    }

    pub fn save_run(
        &self,
        manifest: &RunManifest,
        critical: &SankeyDiagram,
        coalesced: &SankeyDiagram,
        summary: &CriticalSummary,
    ) -> ResultsResult<PathBuf> {
        let run_dir = self.run_dir(&manifest.run_id);
        fs::create_dir_all(&run_dir)?;
        // A rerun replaces the files; drop the old manifest so an interrupted
        // rewrite is not taken for a complete run.
        let manifest_path = run_dir.join(MANIFEST);
        if manifest_path.exists() {
            fs::remove_file(&manifest_path)?;
        }

        write_json(&run_dir.join(CRITICAL), critical)?;
        write_json(&run_dir.join(COALESCED), coalesced)?;
        write_json(&run_dir.join(SUMMARY), summary)?;
        // Manifest last: its presence marks a complete run.
        write_json(&manifest_path, manifest)?;

        Ok(run_dir)
    }

    pub fn load_manifest(&self, run_id: &str) -> ResultsResult<RunManifest> {
        self.load(run_id, MANIFEST)
    }

    pub fn load_critical(&self, run_id: &str) -> ResultsResult<SankeyDiagram> {
        self.load(run_id, CRITICAL)
    }

    pub fn load_coalesced(&self, run_id: &str) -> ResultsResult<SankeyDiagram> {
        self.load(run_id, COALESCED)
    }

    pub fn load_summary(&self, run_id: &str) -> ResultsResult<CriticalSummary> {
        self.load(run_id, SUMMARY)
    }

    fn load<T: DeserializeOwned>(&self, run_id: &str, file: &str) -> ResultsResult<T> {
        let path = self.run_dir(run_id).join(file);
        if !path.exists() {
            return Err(ResultsError::RunNotFound {
                run_id: run_id.to_string(),
            });
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Manifests of all complete runs for `project`.
    pub fn list_runs(&self, project: &str) -> ResultsResult<Vec<RunManifest>> {
        let mut runs = Vec::new();

        if !self.root_dir.exists() {
            return Ok(runs);
        }

        for entry in fs::read_dir(&self.root_dir)? {
            let entry = entry?;
            if entry.path().is_dir() {
                let run_id = entry.file_name().to_string_lossy().to_string();
                if let Ok(manifest) = self.load_manifest(&run_id)
                    && manifest.project == project
                {
                    runs.push(manifest);
                }
            }
        }
        runs.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

        Ok(runs)
    }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> ResultsResult<()> {
    fs::write(path, serde_json::to_string_pretty(value)?)?;
    Ok(())
}
