//! tix-artifacts
//!
//! Run-artifact persistence. Each run gets its own directory under the
//! exports root, holding the allocation dump and a manifest describing the
//! run (id, label, timestamp, input feeds).

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tix_report::AllocationDump;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: i32,
    pub run_id: Uuid,
    pub label: String,
    pub created_at_utc: DateTime<Utc>,
    pub inputs: InputList,
    pub artifacts: ArtifactList,
}

/// The three feed paths the run was built from, as given by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputList {
    pub declared: String,
    pub delegated: String,
    pub results: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactList {
    pub allocation_json: String,
    pub manifest_json: String,
}

pub struct WriteRunArtifactsArgs<'a> {
    pub exports_root: &'a Path, // e.g. ./exports
    pub schema_version: i32,
    pub run_id: Uuid,
    pub label: &'a str,
    pub declared_path: &'a str,
    pub delegated_path: &'a str,
    pub results_path: &'a str,
    pub allocation: &'a AllocationDump,
}

pub struct WriteRunArtifactsResult {
    pub run_dir: PathBuf,
    pub allocation_path: PathBuf,
    pub manifest_path: PathBuf,
}

/// Write `allocation.json` and `manifest.json` under `<exports_root>/<run_id>/`.
///
/// The run id is fresh per run, so the directory is expected to be new;
/// writing into an existing one overwrites both files deterministically.
pub fn write_run_artifacts(args: WriteRunArtifactsArgs<'_>) -> Result<WriteRunArtifactsResult> {
    let run_dir = args.exports_root.join(args.run_id.to_string());
    fs::create_dir_all(&run_dir)
        .with_context(|| format!("create exports dir failed: {}", run_dir.display()))?;

    let allocation_path = run_dir.join("allocation.json");
    let json =
        serde_json::to_string_pretty(args.allocation).context("serialize allocation failed")?;
    fs::write(&allocation_path, format!("{json}\n"))
        .with_context(|| format!("write allocation failed: {}", allocation_path.display()))?;

    let manifest = RunManifest {
        schema_version: args.schema_version,
        run_id: args.run_id,
        label: args.label.to_string(),
        created_at_utc: Utc::now(),
        inputs: InputList {
            declared: args.declared_path.to_string(),
            delegated: args.delegated_path.to_string(),
            results: args.results_path.to_string(),
        },
        artifacts: ArtifactList {
            allocation_json: "allocation.json".to_string(),
            manifest_json: "manifest.json".to_string(),
        },
    };

    let manifest_path = run_dir.join("manifest.json");
    let json = serde_json::to_string_pretty(&manifest).context("serialize manifest failed")?;
    fs::write(&manifest_path, format!("{json}\n"))
        .with_context(|| format!("write manifest failed: {}", manifest_path.display()))?;

    Ok(WriteRunArtifactsResult {
        run_dir,
        allocation_path,
        manifest_path,
    })
}
