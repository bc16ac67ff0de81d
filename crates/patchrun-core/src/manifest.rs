use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::operation::{Operation, RawOperation};

pub const MANIFEST_FILE_NAME: &str = "operations.json";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UpdateManifest {
    pub operations: Vec<Operation>,
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    operations: Vec<RawOperation>,
}

impl UpdateManifest {
    pub fn from_json_str(input: &str) -> Result<Self> {
        let raw: RawManifest =
            serde_json::from_str(input).context("failed to parse update manifest")?;
        let operations = raw
            .operations
            .into_iter()
            .enumerate()
            .map(|(index, raw_operation)| {
                Operation::decode(raw_operation)
                    .with_context(|| format!("invalid operation at index {index}"))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { operations })
    }

    pub fn load_from_dir(staging_dir: &Path) -> Result<Self> {
        let path = staging_dir.join(MANIFEST_FILE_NAME);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read manifest: {}", path.display()));
            }
        };
        Self::from_json_str(&raw)
            .with_context(|| format!("failed to decode manifest: {}", path.display()))
    }
}
