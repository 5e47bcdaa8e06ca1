//! Loading of compiled L2 contract bytecodes.

use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

use alloy_primitives::Bytes;
use era_bridge_primitives::BridgeBytecodes;
use serde::Deserialize;
use thiserror::Error;
use walkdir::WalkDir;

/// Errors raised while reading contract artifacts.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// A file or directory could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The artifacts directory could not be walked.
    #[error("failed to walk {dir}: {source}")]
    Walk {
        /// Directory being walked.
        dir: PathBuf,
        /// Underlying error.
        #[source]
        source: walkdir::Error,
    },
    /// An artifact is not valid JSON or has no bytecode.
    #[error("failed to parse artifact {path}: {source}")]
    Parse {
        /// Path of the artifact.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },
    /// No artifact of the contract exists under the directory.
    #[error("artifact {name} not found under {dir}")]
    NotFound {
        /// Contract name.
        name: &'static str,
        /// Searched directory.
        dir: PathBuf,
    },
}

#[derive(Deserialize)]
struct HardhatArtifact {
    bytecode: Bytes,
}

/// Contract names of the L2 bridge counterpart.
#[derive(Debug, Clone, Copy)]
pub struct BridgeArtifacts;

impl BridgeArtifacts {
    /// `L2ERC20Bridge`.
    pub const L2_BRIDGE: &'static str = "L2ERC20Bridge";
    /// `TransparentUpgradeableProxy`.
    pub const BRIDGE_PROXY: &'static str = "TransparentUpgradeableProxy";
    /// `BeaconProxy`.
    pub const TOKEN_PROXY: &'static str = "BeaconProxy";
    /// `L2StandardERC20`.
    pub const STANDARD_TOKEN: &'static str = "L2StandardERC20";
    /// `UpgradeableBeacon`.
    pub const TOKEN_BEACON: &'static str = "UpgradeableBeacon";

    /// Reads the counterpart bytecodes from a Hardhat artifacts directory.
    ///
    /// Each contract is looked up as `<Name>.sol/<Name>.json` anywhere under `dir`.
    pub fn load_from_dir(dir: &Path) -> Result<BridgeBytecodes, ArtifactError> {
        Ok(BridgeBytecodes {
            l2_bridge_implementation: read_bytecode(dir, Self::L2_BRIDGE)?,
            l2_bridge_proxy: read_bytecode(dir, Self::BRIDGE_PROXY)?,
            l2_token_proxy: read_bytecode(dir, Self::TOKEN_PROXY)?,
            l2_standard_token: read_bytecode(dir, Self::STANDARD_TOKEN)?,
            l2_token_beacon: read_bytecode(dir, Self::TOKEN_BEACON)?,
        })
    }
}

/// Reads the `bytecode` field of the artifact of `name` under `dir`.
pub fn read_bytecode(dir: &Path, name: &'static str) -> Result<Bytes, ArtifactError> {
    let path = find_artifact(dir, name)?
        .ok_or_else(|| ArtifactError::NotFound { name, dir: dir.to_path_buf() })?;
    let contents = fs::read_to_string(&path)
        .map_err(|source| ArtifactError::Io { path: path.clone(), source })?;
    let artifact: HardhatArtifact = serde_json::from_str(&contents)
        .map_err(|source| ArtifactError::Parse { path: path.clone(), source })?;
    tracing::debug!(name, path = %path.display(), len = artifact.bytecode.len(), "Loaded artifact");
    Ok(artifact.bytecode)
}

fn find_artifact(dir: &Path, name: &str) -> Result<Option<PathBuf>, ArtifactError> {
    let file_name = format!("{name}.json");
    let source_dir = format!("{name}.sol");

    // Symlinks are not followed, and siblings are visited in name order.
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry =
            entry.map_err(|source| ArtifactError::Walk { dir: dir.to_path_buf(), source })?;
        if !entry.file_type().is_file() || entry.file_name() != OsStr::new(&file_name) {
            continue;
        }
        let parent = entry.path().parent().and_then(Path::file_name);
        if parent == Some(OsStr::new(&source_dir)) {
            return Ok(Some(entry.into_path()));
        }
    }
    Ok(None)
}
